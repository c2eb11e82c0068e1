use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

/// Outcome of a judging. A judging without a result is pending and carries `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Verdict {
    Correct,
    WrongAnswer,
    Timelimit,
    RunError,
    CompilerError,
    NoOutput,
    OutputLimit,
}

impl Verdict {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "correct" => Some(Verdict::Correct),
            "wrong-answer" => Some(Verdict::WrongAnswer),
            "timelimit" | "time-limit-exceeded" => Some(Verdict::Timelimit),
            "run-error" => Some(Verdict::RunError),
            "compiler-error" => Some(Verdict::CompilerError),
            "no-output" => Some(Verdict::NoOutput),
            "output-limit" => Some(Verdict::OutputLimit),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Verdict::Correct => "correct",
            Verdict::WrongAnswer => "wrong-answer",
            Verdict::Timelimit => "timelimit",
            Verdict::RunError => "run-error",
            Verdict::CompilerError => "compiler-error",
            Verdict::NoOutput => "no-output",
            Verdict::OutputLimit => "output-limit",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Label used wherever a possibly-pending verdict is printed or grouped.
pub fn verdict_label(v: Option<Verdict>) -> &'static str {
    v.map(|v| v.as_str()).unwrap_or("pending")
}

/// One completed judging together with runtime aggregates over its testcase runs.
///
/// `min_runtime`, `max_runtime` and `avg_runtime` are `None` when the judging has no
/// testcase rows; `testcase_count` is then 0.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JudgingRecord {
    pub judging_id: i64,
    pub contest_id: i64,
    pub submission_id: i64,
    pub host: Option<String>,
    pub verdict: Option<Verdict>,
    pub start_time: f64,
    pub duration: f64,
    pub min_runtime: Option<f64>,
    pub max_runtime: Option<f64>,
    pub avg_runtime: Option<f64>,
    pub testcase_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubmissionRef {
    pub submission_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub language_id: String,
    pub submit_time: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProblemMeta {
    pub problem_id: i64,
    pub name: String,
    /// Seconds.
    pub timelimit: f64,
}

/// Aggregate over all judgings of one submission for a single testcase.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TestcaseRuntimeRow {
    pub submission_id: i64,
    pub testcase_id: i64,
    pub min_runtime: f64,
    pub max_runtime: f64,
    pub avg_runtime: f64,
    pub judging_count: u32,
}

impl TestcaseRuntimeRow {
    pub fn spread(&self) -> f64 {
        self.max_runtime - self.min_runtime
    }
}

/// Difference between runtime extremes. `-1` means no data was available.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Spread(f64);

impl Spread {
    pub const UNKNOWN: Spread = Spread(-1.0);

    /// Negative inputs clamp to zero; only [`Spread::UNKNOWN`] is below zero.
    pub fn new(v: f64) -> Self {
        Spread(v.max(0.0))
    }

    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn is_known(&self) -> bool {
        self.0 >= 0.0
    }
}

impl fmt::Display for Spread {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_known() {
            write!(f, "{:.3}s", self.0)
        } else {
            f.write_str("-1")
        }
    }
}

/// Loader output: completed judgings in ascending judging-id order, plus the submissions
/// they belong to.
#[derive(Debug, Clone, Default)]
pub struct JudgingSet {
    records: Vec<JudgingRecord>,
    submissions: BTreeMap<i64, SubmissionRef>,
}

impl JudgingSet {
    /// Sorts by judging id and drops duplicate ids (first occurrence wins).
    pub fn new(mut records: Vec<JudgingRecord>, submissions: BTreeMap<i64, SubmissionRef>) -> Self {
        records.sort_by_key(|r| r.judging_id);
        records.dedup_by_key(|r| r.judging_id);
        Self {
            records,
            submissions,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn records(&self) -> &[JudgingRecord] {
        &self.records
    }

    pub fn get(&self, judging_id: i64) -> Option<&JudgingRecord> {
        self.records
            .binary_search_by_key(&judging_id, |r| r.judging_id)
            .ok()
            .map(|i| &self.records[i])
    }

    pub fn submission(&self, submission_id: i64) -> Option<&SubmissionRef> {
        self.submissions.get(&submission_id)
    }

    pub fn submissions(&self) -> &BTreeMap<i64, SubmissionRef> {
        &self.submissions
    }

    pub fn problem_of(&self, record: &JudgingRecord) -> Option<i64> {
        self.submission(record.submission_id).map(|s| s.problem_id)
    }
}
