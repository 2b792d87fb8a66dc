#[allow(deprecated)]
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

const TODAY: &str = "2026-10-19";

// ─── helpers ───────────────────────────────────────────────────────

struct TestEnv {
    dir: TempDir,
}

impl TestEnv {
    /// Temp working dir with a config that keeps the database inside it.
    fn new() -> Self {
        let dir = TempDir::new().expect("create tempdir");
        fs::write(
            dir.path().join("todo-matrix.toml"),
            "[database]\npath = \"data/tasks.db\"\nbusy_timeout_ms = 2000\n\n[logging]\nlevel = \"warn\"\n",
        )
        .expect("write config");
        Self { dir }
    }

    fn db_path(&self) -> PathBuf {
        self.dir.path().join("data/tasks.db")
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("todo-matrix").expect("binary");
        cmd.current_dir(self.dir.path());
        cmd
    }

    fn run_json(&self, args: &[&str]) -> Value {
        let mut a: Vec<&str> = args.to_vec();
        a.push("--json");
        let output = self.cmd().args(&a).output().expect("run");
        let stdout = String::from_utf8_lossy(&output.stdout);
        serde_json::from_str(&stdout)
            .unwrap_or_else(|e| panic!("parse JSON failed: {e}\nstdout: {stdout}"))
    }

    fn run_ok(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], true, "expected success=true: {v}");
        v
    }

    fn run_err(&self, args: &[&str]) -> Value {
        let v = self.run_json(args);
        assert_eq!(v["success"], false, "expected success=false: {v}");
        v
    }

    /// `add --today TODAY` plus extra args; returns the created task.
    fn add(&self, title: &str, extra: &[&str]) -> Value {
        let mut args = vec!["add", title, "--today", TODAY];
        args.extend_from_slice(extra);
        self.run_ok(&args)["data"].clone()
    }
}

fn initialized() -> TestEnv {
    let env = TestEnv::new();
    env.run_ok(&["init"]);
    env
}

// ─── 1. init / config ──────────────────────────────────────────────

#[test]
fn test_init_creates_configured_database() {
    let env = TestEnv::new();
    let v = env.run_ok(&["init"]);
    assert!(v["data"]["path"].as_str().unwrap().ends_with("tasks.db"));
    assert!(env.db_path().exists());
}

#[test]
fn test_init_idempotent() {
    let env = initialized();
    env.add("Keep me around", &[]);
    env.run_ok(&["init"]);
    let v = env.run_ok(&["list"]);
    assert_eq!(v["data"]["count"], 1);
}

#[test]
fn test_init_required_before_commands() {
    let env = TestEnv::new();
    let v = env.run_err(&["list"]);
    assert_eq!(v["error"]["code"], "NOT_INITIALIZED");
    env.cmd().args(["stats", "--json"]).assert().failure().code(1);
}

#[test]
fn test_explicit_config_path() {
    let env = TestEnv::new();
    fs::write(
        env.dir.path().join("other.toml"),
        "[database]\npath = \"elsewhere/other.db\"\n",
    )
    .unwrap();
    env.run_ok(&["init", "--config", "other.toml"]);
    assert!(env.dir.path().join("elsewhere/other.db").exists());
    assert!(!env.db_path().exists());
}

#[test]
fn test_invalid_config_is_reported() {
    let env = TestEnv::new();
    fs::write(
        env.dir.path().join("todo-matrix.toml"),
        "[scheduler]\ndaily_hour = 24\n",
    )
    .unwrap();
    let v = env.run_err(&["init"]);
    assert_eq!(v["error"]["code"], "CONFIG_ERROR");
}

// ─── 2. add and classification ─────────────────────────────────────

#[test]
fn test_add_important_without_deadline_is_q2() {
    let env = initialized();
    let t = env.add("Plan the quarter", &["--important"]);
    assert_eq!(t["quadrant"], "Q2");
    assert_eq!(t["is_urgent"], false);
    assert!(t["deadline_at"].is_null());
    assert!(t["days_until_deadline"].is_null());
}

#[test]
fn test_add_unimportant_due_today_is_q3() {
    let env = initialized();
    let t = env.add("Answer the survey", &["--deadline", TODAY]);
    assert_eq!(t["quadrant"], "Q3");
    assert_eq!(t["is_urgent"], true);
    assert_eq!(t["days_until_deadline"], 0);
}

#[test]
fn test_add_urgency_window_boundary() {
    let env = initialized();
    let edge = env.add("Three days out", &["--important", "--deadline", "2026-10-22"]);
    assert_eq!(edge["quadrant"], "Q1");
    let beyond = env.add("Four days out", &["--important", "--deadline", "2026-10-23"]);
    assert_eq!(beyond["quadrant"], "Q2");
    let overdue = env.add("Long overdue", &["--deadline", "2026-10-01"]);
    assert_eq!(overdue["quadrant"], "Q3");
}

#[test]
fn test_add_urgent_flag_only_without_deadline() {
    let env = initialized();
    let flagged = env.add("Call the plumber", &["--important", "--urgent"]);
    assert_eq!(flagged["quadrant"], "Q1");

    let far = env.add(
        "Renew passport",
        &["--important", "--urgent", "--deadline", "2026-12-01"],
    );
    assert_eq!(far["quadrant"], "Q2");
    assert_eq!(far["is_urgent"], false);
}

#[test]
fn test_add_validation() {
    let env = initialized();
    let v = env.run_err(&["add", "ab"]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let long = "x".repeat(101);
    let v = env.run_err(&["add", &long]);
    assert_eq!(v["error"]["code"], "VALIDATION_ERROR");

    let v = env.run_ok(&["list"]);
    assert_eq!(v["data"]["count"], 0);
}

#[test]
fn test_add_text_output() {
    let env = initialized();
    env.cmd()
        .args(["add", "Water the plants", "--today", TODAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task 1 in Q4"));
}

// ─── 3. list / complete ────────────────────────────────────────────

#[test]
fn test_list_filters() {
    let env = initialized();
    env.add("Important one", &["--important"]);
    env.add("Important two", &["--important"]);
    let done = env.add("Unimportant", &[]);
    env.run_ok(&["complete", &done["id"].to_string()]);

    let v = env.run_ok(&["list", "--quadrant", "Q2"]);
    assert_eq!(v["data"]["count"], 2);

    let v = env.run_ok(&["list", "--status", "completed"]);
    assert_eq!(v["data"]["count"], 1);
    assert_eq!(v["data"]["tasks"][0]["title"], "Unimportant");

    let v = env.run_ok(&["list", "--quadrant", "Q2", "--status", "completed"]);
    assert_eq!(v["data"]["count"], 0);
}

#[test]
fn test_list_rejects_bad_filters() {
    let env = initialized();
    let v = env.run_err(&["list", "--quadrant", "Q5"]);
    assert_eq!(v["error"]["code"], "INVALID_QUADRANT");
    let v = env.run_err(&["list", "--status", "done"]);
    assert_eq!(v["error"]["code"], "INVALID_STATUS");
}

#[test]
fn test_complete_sets_timestamp() {
    let env = initialized();
    let t = env.add("Send invoice", &[]);
    let v = env.run_ok(&["complete", &t["id"].to_string()]);
    assert_eq!(v["data"]["completed"], true);
    assert!(v["data"]["completed_at"].is_string());
}

#[test]
fn test_complete_unknown_task() {
    let env = initialized();
    let v = env.run_err(&["complete", "42"]);
    assert_eq!(v["error"]["code"], "TASK_NOT_FOUND");
    env.cmd()
        .args(["complete", "42"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("Task with ID 42 not found"));
}

// ─── 4. reconcile ──────────────────────────────────────────────────

#[test]
fn test_reconcile_moves_tasks_as_deadlines_approach() {
    let env = initialized();
    let t = env.add("File taxes", &["--important", "--deadline", "2026-10-25"]);
    assert_eq!(t["quadrant"], "Q2");

    let v = env.run_ok(&["reconcile", "--today", "2026-10-23"]);
    assert_eq!(v["data"]["scanned"], 1);
    assert_eq!(v["data"]["updated"], 1);

    let v = env.run_ok(&["list", "--quadrant", "Q1"]);
    assert_eq!(v["data"]["tasks"][0]["id"], t["id"]);

    let v = env.run_ok(&["reconcile", "--today", "2026-10-23"]);
    assert_eq!(v["data"]["updated"], 0);
}

#[test]
fn test_reconcile_skips_completed_tasks() {
    let env = initialized();
    let t = env.add("Archive mail", &["--important", "--deadline", "2026-11-30"]);
    env.run_ok(&["complete", &t["id"].to_string()]);

    let v = env.run_ok(&["reconcile", "--today", "2026-11-29"]);
    assert_eq!(v["data"]["scanned"], 0);
    let v = env.run_ok(&["list", "--status", "completed"]);
    assert_eq!(v["data"]["tasks"][0]["quadrant"], "Q2");
}

#[test]
fn test_reconcile_normalizes_manual_urgency() {
    let env = initialized();
    env.add("Flagged by hand", &["--urgent"]);
    let v = env.run_ok(&["reconcile", "--today", TODAY]);
    assert_eq!(v["data"]["updated"], 1);
    let v = env.run_ok(&["list", "--quadrant", "Q4"]);
    assert_eq!(v["data"]["count"], 1);
}

#[test]
fn test_reconcile_text_output() {
    let env = initialized();
    env.cmd()
        .args(["reconcile", "--today", TODAY])
        .assert()
        .success()
        .stdout(predicate::str::contains("updated 0 of 0 open tasks"));
}

// ─── 5. stats ──────────────────────────────────────────────────────

#[test]
fn test_stats() {
    let env = initialized();
    env.add("Q1 task", &["--important", "--deadline", TODAY]);
    env.add("Q2 task", &["--important"]);
    env.add("Q3 task", &["--deadline", TODAY]);
    let q4 = env.add("Q4 task", &[]);
    env.run_ok(&["complete", &q4["id"].to_string()]);

    let v = env.run_ok(&["stats"]);
    let data = &v["data"];
    assert_eq!(data["total_tasks"], 4);
    for q in ["Q1", "Q2", "Q3", "Q4"] {
        assert_eq!(data["by_quadrant"][q], 1, "{q}");
    }
    assert_eq!(data["by_status"]["completed"], 1);
    assert_eq!(data["by_status"]["pending"], 3);
    assert_eq!(data["percentage_completed"], 25.0);
}

#[test]
fn test_stats_empty_store() {
    let env = initialized();
    let v = env.run_ok(&["stats"]);
    assert_eq!(v["data"]["total_tasks"], 0);
    assert_eq!(v["data"]["percentage_completed"], 0.0);
}
