use assert_cmd::Command;
use judgestats_core::model::ProblemMeta;
use judgestats_core::storage::store::{NewJudging, NewSubmission};
use judgestats_core::storage::Store;
use predicates::prelude::*;
use predicates::str::contains;
use std::path::PathBuf;
use tempfile::TempDir;

fn seeded_db(dir: &TempDir) -> PathBuf {
    let path = dir.path().join("judgings.db");
    let store = Store::open(&path).unwrap();
    store.init_schema().unwrap();

    for (id, name) in [(1, "hello"), (5, "boxes")] {
        store
            .insert_problem(&ProblemMeta {
                problem_id: id,
                name: name.into(),
                timelimit: 2.0,
            })
            .unwrap();
    }
    for (id, prob) in [(1, 1), (2, 5)] {
        store
            .insert_submission(&NewSubmission {
                submission_id: id,
                contest_id: 1,
                team_id: 1,
                problem_id: prob,
                language_id: "cpp".into(),
                submit_time: 1000.0,
                valid: true,
            })
            .unwrap();
    }
    // (judging, submission, host, result, runtime)
    let judgings = [
        (1, 1, "judge-a", "correct", 1.25),
        (2, 1, "judge-b", "correct", 1.5),
        (3, 2, "judge-a", "correct", 0.5),
        (4, 2, "judge-b", "wrong-answer", 0.75),
    ];
    for (id, sub, host, result, rt) in judgings {
        store
            .insert_judging(&NewJudging {
                judging_id: id,
                contest_id: 1,
                submission_id: sub,
                host: Some(host.into()),
                result: Some(result.into()),
                start_time: 2000.0,
                end_time: Some(2005.0),
                valid: true,
            })
            .unwrap();
        store.insert_run(id, 1, Some(rt), result).unwrap();
    }
    path
}

fn judgestats(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("judgestats").unwrap();
    cmd.current_dir(dir.path())
        .env_remove("JUDGESTATS_DB")
        .env_remove("JUDGESTATS_LOG");
    cmd
}

#[test]
fn test_problem_report_for_selected_problem() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    judgestats(&dir)
        .arg("--db")
        .arg(&db)
        .args(["-p", "5", "-P"])
        .assert()
        .success()
        .stdout(contains("Judgings: 2 (1 submissions, 1 problems)"))
        .stdout(contains("p5 boxes"))
        .stdout(contains("p1 hello").not());
}

#[test]
fn test_variance_report_marks_divergent_submission() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    judgestats(&dir)
        .arg("--db")
        .arg(&db)
        .arg("-T")
        .assert()
        .success()
        .stdout(contains("Submissions with diverging verdicts: 1"))
        .stdout(contains("s2 {correct: [j3], wrong-answer: [j4]}"))
        .stdout(contains("*multiple*"));
}

#[test]
fn test_host_filter_uses_short_h() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    judgestats(&dir)
        .arg("--db")
        .arg(&db)
        .args(["-h", "judge-a", "-P"])
        .assert()
        .success()
        .stdout(contains("Judgings: 2 (2 submissions, 2 problems)"));
}

#[test]
fn test_empty_selection_exits_with_one() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    judgestats(&dir)
        .arg("--db")
        .arg(&db)
        .args(["-t", "999"])
        .assert()
        .code(1)
        .stderr(contains("found no judgings satisfying the constraints"))
        .stdout("");
}

#[test]
fn test_malformed_interval_is_fatal() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);

    judgestats(&dir)
        .arg("--db")
        .arg(&db)
        .args(["-J", "2024-03-01T10:00-2024-03-01T12:00", "-P"])
        .assert()
        .code(2)
        .stderr(contains("invalid time interval"))
        .stdout("");
}

#[test]
fn test_missing_database_is_fatal() {
    let dir = TempDir::new().unwrap();

    judgestats(&dir)
        .args(["--db", "nope.db"])
        .assert()
        .code(2)
        .stderr(contains("judging database not found"));
    assert!(!dir.path().join("nope.db").exists());
}

#[test]
fn test_json_output_and_config_file() {
    let dir = TempDir::new().unwrap();
    let db = seeded_db(&dir);
    std::fs::write(
        dir.path().join("judgestats.yaml"),
        format!("db: {}\nformat: json\ntop: 1\n", db.display()),
    )
    .unwrap();

    let out = judgestats(&dir).args(["-P", "-T"]).output().unwrap();
    assert!(out.status.success());
    let report: serde_json::Value = serde_json::from_slice(&out.stdout).unwrap();
    assert_eq!(report["summary"]["judgings"], 4);
    assert_eq!(report["variance"]["top_n"], 1);
    assert_eq!(report["variance"]["ranked"][0]["submission_id"], 1);
    assert_eq!(report["problems"][0]["status"], "extremes");
    assert_eq!(report["problems"][0]["best"]["judging_id"], 1);
}
