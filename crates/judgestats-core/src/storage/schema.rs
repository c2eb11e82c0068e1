pub const DDL: &str = r#"
CREATE TABLE IF NOT EXISTS problem (
  probid INTEGER PRIMARY KEY,
  name TEXT NOT NULL,
  timelimit REAL NOT NULL
);

CREATE TABLE IF NOT EXISTS submission (
  submitid INTEGER PRIMARY KEY,
  cid INTEGER NOT NULL,
  teamid INTEGER NOT NULL,
  probid INTEGER NOT NULL REFERENCES problem(probid),
  langid TEXT NOT NULL,
  submittime REAL NOT NULL,
  valid INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS judging (
  judgingid INTEGER PRIMARY KEY,
  cid INTEGER NOT NULL,
  submitid INTEGER NOT NULL REFERENCES submission(submitid),
  judgehost TEXT,
  result TEXT,
  starttime REAL NOT NULL,
  endtime REAL,
  valid INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS judging_run (
  runid INTEGER PRIMARY KEY AUTOINCREMENT,
  judgingid INTEGER NOT NULL REFERENCES judging(judgingid),
  testcaseid INTEGER NOT NULL,
  runresult TEXT,
  runtime REAL
);

CREATE INDEX IF NOT EXISTS idx_judging_submitid ON judging(submitid);
CREATE INDEX IF NOT EXISTS idx_judging_run_judgingid ON judging_run(judgingid);
"#;
