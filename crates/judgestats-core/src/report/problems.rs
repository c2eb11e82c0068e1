//! Runtime extremes among correct judgings, per problem.

use crate::index::GroupingIndex;
use crate::model::{JudgingRecord, JudgingSet, ProblemMeta, Spread, Verdict};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Extreme {
    pub judging_id: i64,
    pub submission_id: i64,
    pub runtime: f64,
    pub language_id: String,
    pub host: Option<String>,
    pub spread: Spread,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemExtremes {
    pub problem_id: i64,
    pub name: String,
    pub timelimit: Option<f64>,
    pub correct_count: usize,
    pub best: Extreme,
    pub worst: Extreme,
    /// `worst.runtime / timelimit`.
    pub timelimit_ratio: Option<f64>,
}

impl ProblemExtremes {
    pub fn range(&self) -> (f64, f64) {
        (self.best.runtime, self.worst.runtime)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ProblemSection {
    NoCorrect {
        problem_id: i64,
        name: String,
    },
    NoRuntimeData {
        problem_id: i64,
        name: String,
        correct_count: usize,
    },
    Extremes(ProblemExtremes),
}

impl ProblemSection {
    pub fn problem_id(&self) -> i64 {
        match self {
            ProblemSection::NoCorrect { problem_id, .. }
            | ProblemSection::NoRuntimeData { problem_id, .. } => *problem_id,
            ProblemSection::Extremes(e) => e.problem_id,
        }
    }
}

enum Toward {
    Slower,
    Faster,
}

pub fn build_problem_report(
    set: &JudgingSet,
    index: &GroupingIndex,
    problems: &BTreeMap<i64, ProblemMeta>,
) -> Vec<ProblemSection> {
    let mut sections = Vec::new();

    for (problem_id, judging_ids) in index.problems() {
        let meta = problems.get(&problem_id);
        let name = meta
            .map(|m| m.name.clone())
            .unwrap_or_else(|| "<unknown>".to_string());

        let correct: Vec<&JudgingRecord> = judging_ids
            .iter()
            .filter_map(|id| set.get(*id))
            .filter(|j| j.verdict == Some(Verdict::Correct))
            .collect();

        if correct.is_empty() {
            sections.push(ProblemSection::NoCorrect { problem_id, name });
            continue;
        }

        // Strict comparisons: among equal runtimes the lowest judging id is kept.
        let mut best: Option<(&JudgingRecord, f64)> = None;
        let mut worst: Option<(&JudgingRecord, f64)> = None;
        for &j in &correct {
            let Some(rt) = j.max_runtime else { continue };
            if best.map_or(true, |(_, b)| rt < b) {
                best = Some((j, rt));
            }
            if worst.map_or(true, |(_, w)| rt > w) {
                worst = Some((j, rt));
            }
        }

        let (Some((best, best_rt)), Some((worst, worst_rt))) = (best, worst) else {
            tracing::warn!(problem_id, correct = correct.len(), "correct judgings carry no runtimes");
            sections.push(ProblemSection::NoRuntimeData {
                problem_id,
                name,
                correct_count: correct.len(),
            });
            continue;
        };

        let timelimit = meta.map(|m| m.timelimit);
        sections.push(ProblemSection::Extremes(ProblemExtremes {
            problem_id,
            name,
            timelimit,
            correct_count: correct.len(),
            best: extreme(set, index, best, best_rt, Toward::Slower),
            worst: extreme(set, index, worst, worst_rt, Toward::Faster),
            timelimit_ratio: timelimit.filter(|t| *t > 0.0).map(|t| worst_rt / t),
        }));
    }

    sections
}

fn extreme(
    set: &JudgingSet,
    index: &GroupingIndex,
    anchor: &JudgingRecord,
    runtime: f64,
    toward: Toward,
) -> Extreme {
    Extreme {
        judging_id: anchor.judging_id,
        submission_id: anchor.submission_id,
        runtime,
        language_id: set
            .submission(anchor.submission_id)
            .map(|s| s.language_id.clone())
            .unwrap_or_default(),
        host: anchor.host.clone(),
        spread: submission_spread(set, index, anchor.submission_id, runtime, toward),
    }
}

/// Largest distance from `anchor_runtime` to any other judging of the same submission,
/// measured in the direction away from the extreme.
fn submission_spread(
    set: &JudgingSet,
    index: &GroupingIndex,
    submission_id: i64,
    anchor_runtime: f64,
    toward: Toward,
) -> Spread {
    let mut spread = 0.0_f64;
    for id in index.judgings_of_submission(submission_id) {
        let Some(rt) = set.get(*id).and_then(|j| j.max_runtime) else {
            continue;
        };
        let d = match toward {
            Toward::Slower => rt - anchor_runtime,
            Toward::Faster => anchor_runtime - rt,
        };
        spread = spread.max(d);
    }
    Spread::new(spread)
}
