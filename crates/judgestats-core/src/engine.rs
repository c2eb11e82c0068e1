//! Loader, index and reporters wired together for one run.

use crate::filter::Predicate;
use crate::index::GroupingIndex;
use crate::report::{self, StatsReport};
use crate::storage::{JudgingStore, ProblemStore};

pub const NO_DATA_MESSAGE: &str = "found no judgings satisfying the constraints";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub problems: bool,
    pub variance: bool,
    pub top_n: usize,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            problems: false,
            variance: false,
            top_n: report::variance::DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RunOutcome {
    NoData,
    Report(StatsReport),
}

pub fn run<S>(store: &S, predicate: &Predicate, opts: &ReportOptions) -> anyhow::Result<RunOutcome>
where
    S: JudgingStore + ProblemStore + ?Sized,
{
    let set = store.query(predicate)?;
    if set.is_empty() {
        tracing::info!(restricted = !predicate.is_unrestricted(), "{}", NO_DATA_MESSAGE);
        return Ok(RunOutcome::NoData);
    }

    let index = GroupingIndex::build(&set);
    let summary = report::summarize(&set, &index);

    let problems = if opts.problems {
        let meta = store.lookup(&index.problem_ids())?;
        Some(report::build_problem_report(&set, &index, &meta))
    } else {
        None
    };

    let variance = if opts.variance {
        Some(report::build_variance_report(
            store,
            &set,
            &index,
            opts.top_n,
        )?)
    } else {
        None
    };

    tracing::info!(
        judgings = summary.judgings,
        submissions = summary.submissions,
        problems = summary.problems,
        "report complete"
    );

    Ok(RunOutcome::Report(StatsReport {
        summary,
        problems,
        variance,
    }))
}
