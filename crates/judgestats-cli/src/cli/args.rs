use clap::{ArgAction, Parser};
use std::path::PathBuf;

/// `-h` selects judgehosts, so clap's short help flag is disabled.
#[derive(Parser, Debug, Clone)]
#[command(
    name = "judgestats",
    version,
    about = "Runtime extremes and cross-host consistency of contest judgings",
    disable_help_flag = true
)]
pub struct Cli {
    #[arg(long, action = ArgAction::Help, help = "Print help")]
    pub help: Option<bool>,

    /// Contest ids (comma separated)
    #[arg(short = 'c', value_name = "IDS")]
    pub contests: Option<String>,

    /// Judgehost names (comma separated)
    #[arg(short = 'h', value_name = "HOSTS")]
    pub hosts: Option<String>,

    /// Language ids (comma separated)
    #[arg(short = 'l', value_name = "LANGS")]
    pub languages: Option<String>,

    /// Problem ids (comma separated)
    #[arg(short = 'p', value_name = "IDS")]
    pub problems: Option<String>,

    /// Submission ids (comma separated)
    #[arg(short = 's', value_name = "IDS")]
    pub submissions: Option<String>,

    /// Team ids (comma separated)
    #[arg(short = 't', value_name = "IDS")]
    pub teams: Option<String>,

    /// Judging start time interval, yyyy-mm-ddThh:mm_yyyy-mm-ddThh:mm (UTC, end exclusive)
    #[arg(short = 'J', value_name = "INTERVAL")]
    pub judged: Option<String>,

    /// Submission time interval, yyyy-mm-ddThh:mm_yyyy-mm-ddThh:mm (UTC, end exclusive)
    #[arg(short = 'S', value_name = "INTERVAL")]
    pub submitted: Option<String>,

    /// Only valid judgings of valid submissions
    #[arg(short = 'v')]
    pub valid_only: bool,

    /// Per-problem runtime report over correct judgings
    #[arg(short = 'P')]
    pub problem_report: bool,

    /// Cross-judging variance report
    #[arg(short = 'T')]
    pub variance_report: bool,

    /// SQLite judging database [env: JUDGESTATS_DB] [default: judgings.db]
    #[arg(long)]
    pub db: Option<PathBuf>,

    /// YAML config file [default: judgestats.yaml if present]
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Number of submissions listed in the variance ranking [default: 10]
    #[arg(long)]
    pub top: Option<usize>,

    /// Output format: text | json
    #[arg(long)]
    pub format: Option<String>,

    /// tracing filter, e.g. `debug` or `judgestats_core=trace` [env: JUDGESTATS_LOG]
    #[arg(long)]
    pub log_level: Option<String>,
}
