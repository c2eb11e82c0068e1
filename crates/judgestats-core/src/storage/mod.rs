pub mod schema;
pub mod store;

pub use store::Store;

use crate::filter::Predicate;
use crate::model::{JudgingSet, ProblemMeta, TestcaseRuntimeRow};
use std::collections::BTreeMap;

/// Read access to judgings and their testcase runs.
pub trait JudgingStore {
    /// Completed judgings matching `predicate`, ordered by ascending judging id.
    fn query(&self, predicate: &Predicate) -> anyhow::Result<JudgingSet>;

    /// Per-testcase runtime aggregates across all completed judgings of one submission.
    fn testcase_aggregates(&self, submission_id: i64) -> anyhow::Result<Vec<TestcaseRuntimeRow>>;
}

pub trait ProblemStore {
    fn lookup(&self, problem_ids: &[i64]) -> anyhow::Result<BTreeMap<i64, ProblemMeta>>;
}
