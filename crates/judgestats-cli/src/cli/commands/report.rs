use super::exit_codes;
use crate::cli::args::Cli;
use anyhow::Context;
use judgestats_core::config::{load_or_default, OutputFormat, StatsConfig};
use judgestats_core::engine::{self, ReportOptions, RunOutcome, NO_DATA_MESSAGE};
use judgestats_core::errors::InvalidFilterError;
use judgestats_core::filter::{parse_id_list, parse_name_list, FilterBuilder, Predicate};
use judgestats_core::report::console::render_text;
use judgestats_core::storage::Store;

pub fn run(cli: Cli) -> anyhow::Result<i32> {
    let cfg = resolve_config(&cli)?;
    crate::init_logging(&cfg.log_level);
    if !cfg.ignored_keys.is_empty() {
        tracing::warn!(keys = ?cfg.ignored_keys, "ignored unknown config fields");
    }

    // a malformed filter aborts before the database is touched
    let predicate = build_predicate(&cli)?;

    if !cfg.db.exists() {
        anyhow::bail!("judging database not found: {}", cfg.db.display());
    }
    let store = Store::open(&cfg.db)?;

    let opts = ReportOptions {
        problems: cli.problem_report,
        variance: cli.variance_report,
        top_n: cfg.top,
    };

    let report = match engine::run(&store, &predicate, &opts)? {
        RunOutcome::NoData => {
            eprintln!("{}", NO_DATA_MESSAGE);
            return Ok(exit_codes::NO_DATA);
        }
        RunOutcome::Report(r) => r,
    };

    match cfg.format {
        OutputFormat::Text => print!("{}", render_text(&report)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
    }
    Ok(exit_codes::OK)
}

/// Precedence: flags, then environment, then config file, then defaults.
fn resolve_config(cli: &Cli) -> anyhow::Result<StatsConfig> {
    let mut cfg = load_or_default(cli.config.as_deref())
        .context("config error")?
        .apply_env();

    if let Some(db) = &cli.db {
        cfg.db = db.clone();
    }
    if let Some(top) = cli.top {
        if top == 0 {
            anyhow::bail!("config error: --top must be at least 1");
        }
        cfg.top = top;
    }
    if let Some(format) = &cli.format {
        cfg.format = format.parse().context("config error")?;
    }
    if let Some(level) = &cli.log_level {
        cfg.log_level = level.clone();
    }
    Ok(cfg)
}

fn build_predicate(cli: &Cli) -> Result<Predicate, InvalidFilterError> {
    let mut b = FilterBuilder::new().valid_only(cli.valid_only);

    if let Some(raw) = &cli.contests {
        b = b.contests(parse_id_list("contest", raw)?);
    }
    if let Some(raw) = &cli.hosts {
        b = b.hosts(parse_name_list(raw));
    }
    if let Some(raw) = &cli.languages {
        b = b.languages(parse_name_list(raw));
    }
    if let Some(raw) = &cli.problems {
        b = b.problems(parse_id_list("problem", raw)?);
    }
    if let Some(raw) = &cli.submissions {
        b = b.submissions(parse_id_list("submission", raw)?);
    }
    if let Some(raw) = &cli.teams {
        b = b.teams(parse_id_list("team", raw)?);
    }
    if let Some(raw) = &cli.judged {
        b = b.judged_between(raw.parse()?);
    }
    if let Some(raw) = &cli.submitted {
        b = b.submitted_between(raw.parse()?);
    }

    Ok(b.build())
}
