pub mod console;
pub mod problems;
pub mod variance;

use crate::index::GroupingIndex;
use crate::model::{verdict_label, JudgingSet, Verdict};
use serde::{Serialize, Serializer};
use std::collections::BTreeMap;

pub use problems::{build_problem_report, ProblemSection};
pub use variance::{build_variance_report, VarianceReport};

pub(crate) fn serialize_verdict<S: Serializer>(
    v: &Option<Verdict>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(verdict_label(*v))
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub judgings: usize,
    pub submissions: usize,
    pub problems: usize,
    /// Judging count per verdict label.
    pub verdicts: BTreeMap<String, usize>,
}

pub fn summarize(set: &JudgingSet, index: &GroupingIndex) -> Summary {
    let mut verdicts = BTreeMap::new();
    for r in set.records() {
        *verdicts
            .entry(verdict_label(r.verdict).to_string())
            .or_insert(0) += 1;
    }
    Summary {
        judgings: set.len(),
        submissions: index.submission_count(),
        problems: index.problem_count(),
        verdicts,
    }
}

/// Complete output of one run; every requested section is computed before anything is printed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StatsReport {
    pub summary: Summary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problems: Option<Vec<ProblemSection>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variance: Option<VarianceReport>,
}
