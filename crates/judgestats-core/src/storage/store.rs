use super::{JudgingStore, ProblemStore};
use crate::filter::Predicate;
use crate::model::{
    JudgingRecord, JudgingSet, ProblemMeta, SubmissionRef, TestcaseRuntimeRow, Verdict,
};
use anyhow::Context;
use rusqlite::types::{FromSql, FromSqlError, FromSqlResult, ValueRef};
use rusqlite::{params, params_from_iter, Connection};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct Store {
    pub conn: Arc<Mutex<Connection>>,
}

/// Submission row for seeding a database.
#[derive(Debug, Clone, Default)]
pub struct NewSubmission {
    pub submission_id: i64,
    pub contest_id: i64,
    pub team_id: i64,
    pub problem_id: i64,
    pub language_id: String,
    pub submit_time: f64,
    pub valid: bool,
}

/// Judging row for seeding a database. `result` is stored verbatim.
#[derive(Debug, Clone, Default)]
pub struct NewJudging {
    pub judging_id: i64,
    pub contest_id: i64,
    pub submission_id: i64,
    pub host: Option<String>,
    pub result: Option<String>,
    pub start_time: f64,
    pub end_time: Option<f64>,
    pub valid: bool,
}

impl FromSql for Verdict {
    fn column_result(value: ValueRef<'_>) -> FromSqlResult<Self> {
        let s = value.as_str()?;
        Verdict::parse(s).ok_or_else(|| FromSqlError::Other(format!("unknown verdict '{}'", s).into()))
    }
}

impl Store {
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        let conn = Connection::open(path)
            .with_context(|| format!("failed to open judging db {}", path.display()))?;
        conn.execute("PRAGMA foreign_keys = ON", [])?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn memory() -> anyhow::Result<Self> {
        let conn = Connection::open_in_memory().context("failed to open in-memory sqlite db")?;
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn init_schema(&self) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute_batch(super::schema::DDL)?;
        Ok(())
    }

    /// Joins judging, submission and testcase runs; aggregates are computed once per judging.
    pub fn load_judgings(&self, predicate: &Predicate) -> anyhow::Result<JudgingSet> {
        let conn = self.conn.lock().unwrap();
        let sql = format!(
            "SELECT
                j.judgingid, j.cid, j.submitid, j.judgehost, j.result, j.starttime, j.endtime,
                MIN(r.runtime), MAX(r.runtime), AVG(r.runtime), COUNT(r.runid),
                s.teamid, s.probid, s.langid, s.submittime
             FROM judging j
             JOIN submission s ON s.submitid = j.submitid
             LEFT JOIN judging_run r ON r.judgingid = j.judgingid
             WHERE j.endtime IS NOT NULL AND {}
             GROUP BY j.judgingid
             ORDER BY j.judgingid ASC",
            predicate.where_sql()
        );
        let mut stmt = conn.prepare(&sql).context("prepare judging query")?;

        let rows = stmt.query_map(params_from_iter(predicate.params()), |row| {
            let start_time: f64 = row.get(5)?;
            let end_time: f64 = row.get(6)?;
            let count: i64 = row.get(10)?;
            let record = JudgingRecord {
                judging_id: row.get(0)?,
                contest_id: row.get(1)?,
                submission_id: row.get(2)?,
                host: row.get(3)?,
                verdict: row.get(4)?,
                start_time,
                duration: end_time - start_time,
                min_runtime: row.get(7)?,
                max_runtime: row.get(8)?,
                avg_runtime: row.get(9)?,
                testcase_count: count as u32,
            };
            let submission = SubmissionRef {
                submission_id: record.submission_id,
                team_id: row.get(11)?,
                problem_id: row.get(12)?,
                language_id: row.get(13)?,
                submit_time: row.get(14)?,
            };
            Ok((record, submission))
        })?;

        let mut records = Vec::new();
        let mut submissions = BTreeMap::new();
        for r in rows {
            let (record, submission) = r.context("read judging row")?;
            submissions
                .entry(submission.submission_id)
                .or_insert(submission);
            records.push(record);
        }

        tracing::debug!(
            judgings = records.len(),
            submissions = submissions.len(),
            "loaded judgings"
        );
        Ok(JudgingSet::new(records, submissions))
    }

    pub fn fetch_testcase_aggregates(
        &self,
        submission_id: i64,
    ) -> anyhow::Result<Vec<TestcaseRuntimeRow>> {
        let conn = self.conn.lock().unwrap();
        let mut stmt = conn.prepare(
            "SELECT r.testcaseid, MIN(r.runtime), MAX(r.runtime), AVG(r.runtime),
                    COUNT(DISTINCT r.judgingid)
             FROM judging_run r
             JOIN judging j ON j.judgingid = r.judgingid
             WHERE j.submitid = ?1 AND j.endtime IS NOT NULL AND r.runtime IS NOT NULL
             GROUP BY r.testcaseid
             ORDER BY r.testcaseid ASC",
        )?;

        let rows = stmt
            .query_map(params![submission_id], |row| {
                Ok(TestcaseRuntimeRow {
                    submission_id,
                    testcase_id: row.get(0)?,
                    min_runtime: row.get(1)?,
                    max_runtime: row.get(2)?,
                    avg_runtime: row.get(3)?,
                    judging_count: row.get::<_, i64>(4)? as u32,
                })
            })?
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("read testcase aggregates for s{}", submission_id))?;
        Ok(rows)
    }

    pub fn fetch_problems(&self, problem_ids: &[i64]) -> anyhow::Result<BTreeMap<i64, ProblemMeta>> {
        if problem_ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let conn = self.conn.lock().unwrap();
        let marks = vec!["?"; problem_ids.len()].join(", ");
        let sql = format!(
            "SELECT probid, name, timelimit FROM problem WHERE probid IN ({})",
            marks
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(params_from_iter(problem_ids), |row| {
            Ok(ProblemMeta {
                problem_id: row.get(0)?,
                name: row.get(1)?,
                timelimit: row.get(2)?,
            })
        })?;

        let mut out = BTreeMap::new();
        for r in rows {
            let meta = r?;
            out.insert(meta.problem_id, meta);
        }
        Ok(out)
    }

    // --- Seeding ---

    pub fn insert_problem(&self, p: &ProblemMeta) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO problem(probid, name, timelimit) VALUES (?1, ?2, ?3)",
            params![p.problem_id, p.name, p.timelimit],
        )
        .context("insert problem")?;
        Ok(())
    }

    pub fn insert_submission(&self, s: &NewSubmission) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO submission(submitid, cid, teamid, probid, langid, submittime, valid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                s.submission_id,
                s.contest_id,
                s.team_id,
                s.problem_id,
                s.language_id,
                s.submit_time,
                s.valid
            ],
        )
        .context("insert submission")?;
        Ok(())
    }

    pub fn insert_judging(&self, j: &NewJudging) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO judging(judgingid, cid, submitid, judgehost, result, starttime, endtime, valid)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                j.judging_id,
                j.contest_id,
                j.submission_id,
                j.host,
                j.result,
                j.start_time,
                j.end_time,
                j.valid
            ],
        )
        .context("insert judging")?;
        Ok(())
    }

    pub fn insert_run(
        &self,
        judging_id: i64,
        testcase_id: i64,
        runtime: Option<f64>,
        runresult: &str,
    ) -> anyhow::Result<()> {
        let conn = self.conn.lock().unwrap();
        conn.execute(
            "INSERT INTO judging_run(judgingid, testcaseid, runresult, runtime) VALUES (?1, ?2, ?3, ?4)",
            params![judging_id, testcase_id, runresult, runtime],
        )
        .context("insert judging run")?;
        Ok(())
    }
}

impl JudgingStore for Store {
    fn query(&self, predicate: &Predicate) -> anyhow::Result<JudgingSet> {
        self.load_judgings(predicate)
    }

    fn testcase_aggregates(&self, submission_id: i64) -> anyhow::Result<Vec<TestcaseRuntimeRow>> {
        self.fetch_testcase_aggregates(submission_id)
    }
}

impl ProblemStore for Store {
    fn lookup(&self, problem_ids: &[i64]) -> anyhow::Result<BTreeMap<i64, ProblemMeta>> {
        self.fetch_problems(problem_ids)
    }
}
