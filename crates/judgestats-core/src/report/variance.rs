//! Cross-judging consistency: verdict divergence and per-testcase runtime spread
//! for submissions judged more than once.

use super::serialize_verdict;
use crate::index::GroupingIndex;
use crate::model::{verdict_label, JudgingSet, Spread, TestcaseRuntimeRow, Verdict};
use crate::storage::JudgingStore;
use serde::{Serialize, Serializer};
use std::fmt;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VerdictGroup {
    #[serde(serialize_with = "serialize_verdict")]
    pub verdict: Option<Verdict>,
    pub judging_ids: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DivergentSubmission {
    pub submission_id: i64,
    /// In first-seen order.
    pub groups: Vec<VerdictGroup>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerdictSummary {
    Single(Option<Verdict>),
    Multiple,
}

impl fmt::Display for VerdictSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VerdictSummary::Single(v) => f.write_str(verdict_label(*v)),
            VerdictSummary::Multiple => f.write_str("*multiple*"),
        }
    }
}

impl Serialize for VerdictSummary {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionSpread {
    pub submission_id: i64,
    pub spread: Spread,
    pub judging_count: usize,
    pub verdict: VerdictSummary,
    /// Testcase with the largest max-min runtime difference.
    pub worst_testcase: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VarianceReport {
    pub divergent: Vec<DivergentSubmission>,
    /// Every submission, by descending spread then ascending submission id.
    pub ranked: Vec<SubmissionSpread>,
    pub top_n: usize,
}

impl VarianceReport {
    pub fn top(&self) -> &[SubmissionSpread] {
        &self.ranked[..self.top_n.min(self.ranked.len())]
    }
}

/// Groups judging ids by verdict, keeping the order in which verdicts first appear.
pub fn group_by_verdict(set: &JudgingSet, judging_ids: &[i64]) -> Vec<VerdictGroup> {
    let mut groups: Vec<VerdictGroup> = Vec::new();
    for rec in judging_ids.iter().filter_map(|id| set.get(*id)) {
        match groups.iter_mut().find(|g| g.verdict == rec.verdict) {
            Some(g) => g.judging_ids.push(rec.judging_id),
            None => groups.push(VerdictGroup {
                verdict: rec.verdict,
                judging_ids: vec![rec.judging_id],
            }),
        }
    }
    groups
}

/// Maximum per-testcase spread, or [`Spread::UNKNOWN`] when there are no rows.
pub fn representative_spread(rows: &[TestcaseRuntimeRow]) -> (Spread, Option<i64>) {
    let mut best: Option<(f64, i64)> = None;
    for row in rows {
        let s = row.spread();
        if best.map_or(true, |(b, _)| s > b) {
            best = Some((s, row.testcase_id));
        }
    }
    match best {
        Some((s, tc)) => (Spread::new(s), Some(tc)),
        None => (Spread::UNKNOWN, None),
    }
}

/// Ties on spread are broken by ascending submission id.
pub fn rank_by_spread(entries: &mut [SubmissionSpread]) {
    entries.sort_by(|a, b| {
        b.spread
            .value()
            .total_cmp(&a.spread.value())
            .then_with(|| a.submission_id.cmp(&b.submission_id))
    });
}

pub fn build_variance_report<S: JudgingStore + ?Sized>(
    store: &S,
    set: &JudgingSet,
    index: &GroupingIndex,
    top_n: usize,
) -> anyhow::Result<VarianceReport> {
    let mut divergent = Vec::new();
    let mut ranked = Vec::with_capacity(index.submission_count());

    for (submission_id, judging_ids) in index.submissions() {
        let groups = group_by_verdict(set, judging_ids);
        let verdict = match groups.as_slice() {
            [only] => VerdictSummary::Single(only.verdict),
            _ => VerdictSummary::Multiple,
        };
        if groups.len() > 1 {
            divergent.push(DivergentSubmission {
                submission_id,
                groups,
            });
        }

        let rows = store.testcase_aggregates(submission_id)?;
        let (spread, worst_testcase) = representative_spread(&rows);
        ranked.push(SubmissionSpread {
            submission_id,
            spread,
            judging_count: judging_ids.len(),
            verdict,
            worst_testcase,
        });
    }

    rank_by_spread(&mut ranked);
    tracing::debug!(
        submissions = ranked.len(),
        divergent = divergent.len(),
        "computed cross-judging variance"
    );

    Ok(VarianceReport {
        divergent,
        ranked,
        top_n,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{JudgingRecord, SubmissionRef};
    use std::collections::BTreeMap;

    fn j(id: i64, sub: i64, verdict: Option<Verdict>) -> JudgingRecord {
        JudgingRecord {
            judging_id: id,
            contest_id: 1,
            submission_id: sub,
            host: None,
            verdict,
            start_time: 0.0,
            duration: 0.5,
            min_runtime: None,
            max_runtime: None,
            avg_runtime: None,
            testcase_count: 0,
        }
    }

    fn row(tc: i64, min: f64, max: f64) -> TestcaseRuntimeRow {
        TestcaseRuntimeRow {
            submission_id: 1,
            testcase_id: tc,
            min_runtime: min,
            max_runtime: max,
            avg_runtime: (min + max) / 2.0,
            judging_count: 2,
        }
    }

    fn entry(id: i64, spread: Spread) -> SubmissionSpread {
        SubmissionSpread {
            submission_id: id,
            spread,
            judging_count: 1,
            verdict: VerdictSummary::Single(Some(Verdict::Correct)),
            worst_testcase: None,
        }
    }

    #[test]
    fn test_group_by_verdict_first_seen_order() {
        let set = JudgingSet::new(
            vec![
                j(1, 2, Some(Verdict::WrongAnswer)),
                j(2, 2, Some(Verdict::Correct)),
                j(3, 2, Some(Verdict::WrongAnswer)),
                j(4, 2, None),
            ],
            BTreeMap::<i64, SubmissionRef>::new(),
        );
        let groups = group_by_verdict(&set, &[1, 2, 3, 4]);
        assert_eq!(
            groups,
            vec![
                VerdictGroup {
                    verdict: Some(Verdict::WrongAnswer),
                    judging_ids: vec![1, 3]
                },
                VerdictGroup {
                    verdict: Some(Verdict::Correct),
                    judging_ids: vec![2]
                },
                VerdictGroup {
                    verdict: None,
                    judging_ids: vec![4]
                },
            ]
        );
    }

    #[test]
    fn test_representative_spread() {
        assert_eq!(representative_spread(&[]), (Spread::UNKNOWN, None));

        let (s, tc) = representative_spread(&[row(1, 0.1, 0.2), row(2, 0.5, 0.9), row(3, 0.0, 0.4)]);
        assert!((s.value() - 0.4).abs() < 1e-9);
        assert_eq!(tc, Some(2));

        let (s, _) = representative_spread(&[row(1, 0.3, 0.3)]);
        assert_eq!(s, Spread::new(0.0));
        assert!(s.is_known());
    }

    #[test]
    fn test_ranking_breaks_ties_by_submission_id() {
        let mut entries = vec![
            entry(5, Spread::new(0.2)),
            entry(3, Spread::UNKNOWN),
            entry(4, Spread::new(0.7)),
            entry(1, Spread::new(0.2)),
            entry(2, Spread::new(0.0)),
        ];
        rank_by_spread(&mut entries);
        let order: Vec<i64> = entries.iter().map(|e| e.submission_id).collect();
        assert_eq!(order, vec![4, 1, 5, 2, 3]);
    }

    #[test]
    fn test_top_is_bounded() {
        let report = VarianceReport {
            divergent: vec![],
            ranked: vec![entry(1, Spread::new(0.1)), entry(2, Spread::new(0.0))],
            top_n: 10,
        };
        assert_eq!(report.top().len(), 2);
        let report = VarianceReport { top_n: 1, ..report };
        assert_eq!(report.top()[0].submission_id, 1);
    }

    #[test]
    fn test_multiple_marker() {
        assert_eq!(VerdictSummary::Multiple.to_string(), "*multiple*");
        assert_eq!(VerdictSummary::Single(None).to_string(), "pending");
    }
}
