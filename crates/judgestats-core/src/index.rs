use crate::model::JudgingSet;
use std::collections::BTreeMap;

/// Problem and submission groupings over a loaded [`JudgingSet`].
///
/// Keys iterate in ascending order; each list holds judging ids in ascending order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GroupingIndex {
    by_problem: BTreeMap<i64, Vec<i64>>,
    by_submission: BTreeMap<i64, Vec<i64>>,
}

impl GroupingIndex {
    pub fn build(set: &JudgingSet) -> Self {
        let mut idx = GroupingIndex::default();
        for r in set.records() {
            match set.problem_of(r) {
                Some(problem_id) => idx.by_problem.entry(problem_id).or_default().push(r.judging_id),
                None => tracing::warn!(
                    judging_id = r.judging_id,
                    submission_id = r.submission_id,
                    "judging without loaded submission; excluded from problem grouping"
                ),
            }
            idx.by_submission
                .entry(r.submission_id)
                .or_default()
                .push(r.judging_id);
        }
        idx
    }

    pub fn problems(&self) -> impl Iterator<Item = (i64, &[i64])> {
        self.by_problem.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn submissions(&self) -> impl Iterator<Item = (i64, &[i64])> {
        self.by_submission.iter().map(|(k, v)| (*k, v.as_slice()))
    }

    pub fn judgings_of_problem(&self, problem_id: i64) -> &[i64] {
        self.by_problem
            .get(&problem_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn judgings_of_submission(&self, submission_id: i64) -> &[i64] {
        self.by_submission
            .get(&submission_id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn problem_ids(&self) -> Vec<i64> {
        self.by_problem.keys().copied().collect()
    }

    pub fn problem_count(&self) -> usize {
        self.by_problem.len()
    }

    pub fn submission_count(&self) -> usize {
        self.by_submission.len()
    }
}
