//! Selection criteria for judgings.
//!
//! Every present criterion narrows the result (criteria are AND-ed); an absent criterion
//! imposes no restriction. The output [`Predicate`] is a SQL fragment over the aliases
//! `j` (judging) and `s` (submission) plus its bound parameters.

use crate::errors::InvalidFilterError;
use chrono::NaiveDateTime;
use regex::Regex;
use rusqlite::types::Value;
use std::str::FromStr;
use std::sync::OnceLock;

const INTERVAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

fn interval_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^(\d{4}-\d{2}-\d{2}T\d{2}:\d{2})_(\d{4}-\d{2}-\d{2}T\d{2}:\d{2})$")
            .expect("static regex")
    })
}

/// Half-open `[start, end)` interval, interpreted in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TimeInterval {
    pub fn start_epoch(&self) -> f64 {
        self.start.and_utc().timestamp() as f64
    }

    pub fn end_epoch(&self) -> f64 {
        self.end.and_utc().timestamp() as f64
    }

    pub fn contains(&self, epoch_secs: f64) -> bool {
        epoch_secs >= self.start_epoch() && epoch_secs < self.end_epoch()
    }
}

impl FromStr for TimeInterval {
    type Err = InvalidFilterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = interval_re()
            .captures(s)
            .ok_or_else(|| InvalidFilterError::IntervalFormat {
                value: s.to_string(),
            })?;

        let parse = |part: &str| {
            NaiveDateTime::parse_from_str(part, INTERVAL_FORMAT).map_err(|e| {
                InvalidFilterError::IntervalDate {
                    value: s.to_string(),
                    reason: e.to_string(),
                }
            })
        };

        Ok(TimeInterval {
            start: parse(&caps[1])?,
            end: parse(&caps[2])?,
        })
    }
}

/// Parses a comma-separated list of integer ids such as `1,4,7`.
pub fn parse_id_list(dimension: &'static str, raw: &str) -> Result<Vec<i64>, InvalidFilterError> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<i64>().map_err(|_| InvalidFilterError::IdList {
                dimension,
                value: s.to_string(),
            })
        })
        .collect()
}

/// Parses a comma-separated list of string ids (hosts, languages).
pub fn parse_name_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[derive(Debug, Clone, Default)]
pub struct FilterBuilder {
    contests: Option<Vec<i64>>,
    hosts: Option<Vec<String>>,
    languages: Option<Vec<String>>,
    problems: Option<Vec<i64>>,
    submissions: Option<Vec<i64>>,
    teams: Option<Vec<i64>>,
    judged_between: Option<TimeInterval>,
    submitted_between: Option<TimeInterval>,
    valid_only: bool,
}

impl FilterBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contests(mut self, ids: Vec<i64>) -> Self {
        self.contests = Some(ids);
        self
    }

    pub fn hosts(mut self, hosts: Vec<String>) -> Self {
        self.hosts = Some(hosts);
        self
    }

    pub fn languages(mut self, langs: Vec<String>) -> Self {
        self.languages = Some(langs);
        self
    }

    pub fn problems(mut self, ids: Vec<i64>) -> Self {
        self.problems = Some(ids);
        self
    }

    pub fn submissions(mut self, ids: Vec<i64>) -> Self {
        self.submissions = Some(ids);
        self
    }

    pub fn teams(mut self, ids: Vec<i64>) -> Self {
        self.teams = Some(ids);
        self
    }

    pub fn judged_between(mut self, interval: TimeInterval) -> Self {
        self.judged_between = Some(interval);
        self
    }

    pub fn submitted_between(mut self, interval: TimeInterval) -> Self {
        self.submitted_between = Some(interval);
        self
    }

    pub fn valid_only(mut self, yes: bool) -> Self {
        self.valid_only = yes;
        self
    }

    pub fn build(self) -> Predicate {
        let mut p = Predicate::default();

        if let Some(ids) = self.contests {
            p.push_in("j.cid", ids.into_iter().map(Value::Integer).collect());
        }
        if let Some(hosts) = self.hosts {
            p.push_in("j.judgehost", hosts.into_iter().map(Value::Text).collect());
        }
        if let Some(langs) = self.languages {
            p.push_in("s.langid", langs.into_iter().map(Value::Text).collect());
        }
        if let Some(ids) = self.problems {
            p.push_in("s.probid", ids.into_iter().map(Value::Integer).collect());
        }
        if let Some(ids) = self.submissions {
            p.push_in("s.submitid", ids.into_iter().map(Value::Integer).collect());
        }
        if let Some(ids) = self.teams {
            p.push_in("s.teamid", ids.into_iter().map(Value::Integer).collect());
        }
        if let Some(iv) = self.judged_between {
            p.push_interval("j.starttime", &iv);
        }
        if let Some(iv) = self.submitted_between {
            p.push_interval("s.submittime", &iv);
        }
        if self.valid_only {
            p.clauses.push("j.valid = 1 AND s.valid = 1".to_string());
        }

        tracing::debug!(clauses = p.clauses.len(), params = p.params.len(), "built judging filter");
        p
    }
}

/// Conjunction of SQL conditions with positional parameters.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Predicate {
    clauses: Vec<String>,
    params: Vec<Value>,
}

impl Predicate {
    /// A predicate that imposes no restriction.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn is_unrestricted(&self) -> bool {
        self.clauses.is_empty()
    }

    /// SQL condition suitable for a `WHERE` clause; `1` when unrestricted.
    pub fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            "1".to_string()
        } else {
            self.clauses
                .iter()
                .map(|c| format!("({})", c))
                .collect::<Vec<_>>()
                .join(" AND ")
        }
    }

    pub fn params(&self) -> &[Value] {
        &self.params
    }

    fn push_in(&mut self, column: &str, values: Vec<Value>) {
        if values.is_empty() {
            // an explicitly empty set admits nothing
            self.clauses.push("0".to_string());
            return;
        }
        let marks = vec!["?"; values.len()].join(", ");
        self.clauses.push(format!("{} IN ({})", column, marks));
        self.params.extend(values);
    }

    fn push_interval(&mut self, column: &str, iv: &TimeInterval) {
        if iv.end <= iv.start {
            tracing::warn!(column, start = %iv.start, end = %iv.end, "time interval is empty");
        }
        self.clauses
            .push(format!("{col} >= ? AND {col} < ?", col = column));
        self.params.push(Value::Real(iv.start_epoch()));
        self.params.push(Value::Real(iv.end_epoch()));
    }
}
