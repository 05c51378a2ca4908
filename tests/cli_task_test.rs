//! Integration tests for task CRUD, search and the dashboard summary via CLI.

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the planner binary with storage isolated in `dir`.
fn planner_in(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_planner"));
    cmd.env("PLANNER_DATA_DIR", dir.path().join("data"))
        .env("PLANNER_CONFIG", dir.path().join("config.toml"))
        .env_remove("PLANNER_SEED");
    cmd
}

fn add(dir: &TempDir, title: &str, duration: &str, tag: &str) {
    planner_in(dir)
        .args(["add", "-t", title, "-m", duration, "-g", tag, "-d", "2024-03-15"])
        .assert()
        .success();
}

fn list_output(dir: &TempDir) -> String {
    let output = planner_in(dir).arg("list").output().unwrap();
    assert!(output.status.success());
    String::from_utf8(output.stdout).unwrap()
}

// === Add Tests ===

#[test]
fn test_add_valid_task() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .args([
            "add", "--title", "Study", "--duration", "90", "--tag", "School Work", "--due",
            "2024-03-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rec_001 \"Study\""));

    assert!(list_output(&temp).contains("rec_001  Study  [School Work]  due 2024-03-15  1 hr 30 mins"));
}

#[test]
fn test_add_trims_input() {
    let temp = TempDir::new().unwrap();
    add(&temp, "  Study  ", "30", " Lab ");
    assert!(list_output(&temp).contains("rec_001  Study  [Lab]"));
}

#[test]
fn test_add_invalid_reports_every_error() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .args(["add", "-t", "", "-m", "-5", "-g", "School123", "-d", "2024-02-30"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid title format"))
        .stderr(predicate::str::contains("Invalid duration"))
        .stderr(predicate::str::contains("Invalid date format"))
        .stderr(predicate::str::contains("Invalid tag format"));

    assert!(list_output(&temp).contains("No tasks"));
}

#[test]
fn test_add_truncates_fractional_duration() {
    let temp = TempDir::new().unwrap();
    add(&temp, "Study", "12.5", "School");

    planner_in(&temp)
        .args(["show", "rec_001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 12 mins"));
}

#[test]
fn test_add_rejects_malformed_duration_as_validation_error() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .args(["add", "-t", "Study", "-m", "12x5", "-g", "School", "-d", "2024-03-15"])
        .assert()
        .failure()
        .stderr("Error: Invalid duration\n");
}

#[test]
fn test_ids_unique_after_delete_and_add() {
    let temp = TempDir::new().unwrap();
    add(&temp, "One", "10", "A");
    add(&temp, "Two", "10", "A");
    add(&temp, "Three", "10", "A");

    planner_in(&temp).args(["delete", "rec_002"]).assert().success();

    planner_in(&temp)
        .args(["add", "-t", "Four", "-m", "10", "-g", "A", "-d", "2024-03-15"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Added rec_004"));

    let list = list_output(&temp);
    assert_eq!(list.matches("rec_003").count(), 1);
    assert!(!list.contains("rec_002"));
}

// === Edit / Show / Delete Tests ===

#[test]
fn test_edit_changes_only_given_fields() {
    let temp = TempDir::new().unwrap();
    add(&temp, "Study", "90", "School");

    planner_in(&temp)
        .args(["edit", "rec_001", "--duration", "45"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated rec_001"));

    planner_in(&temp)
        .args(["show", "rec_001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Duration: 45 mins"))
        .stdout(predicate::str::contains("Tag:      School"));
}

#[test]
fn test_edit_rejects_invalid_fields() {
    let temp = TempDir::new().unwrap();
    add(&temp, "Study", "90", "School");

    planner_in(&temp)
        .args(["edit", "rec_001", "--tag", "Tag42"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid tag format"));

    planner_in(&temp)
        .args(["show", "rec_001"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Tag:      School"));
}

#[test]
fn test_edit_unknown_id_fails() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .args(["edit", "rec_404", "--title", "Nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task not found: rec_404"));
}

#[test]
fn test_delete_unknown_id_is_noop() {
    let temp = TempDir::new().unwrap();
    add(&temp, "One", "10", "A");
    let before = list_output(&temp);

    planner_in(&temp)
        .args(["delete", "rec_404"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing deleted"));

    assert_eq!(list_output(&temp), before);
}

// === Search / Stats Tests ===

#[test]
fn test_search_title_and_tag() {
    let temp = TempDir::new().unwrap();
    add(&temp, "Study algebra", "30", "School");
    add(&temp, "Gym session", "45", "Health");

    planner_in(&temp)
        .args(["search", "HEALTH"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Gym session"))
        .stdout(predicate::str::contains("Study algebra").not());

    planner_in(&temp)
        .args(["search", "(broken"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid search pattern"));
}

#[test]
fn test_stats_in_minutes_and_hours() {
    let temp = TempDir::new().unwrap();
    add(&temp, "One", "60", "A");
    add(&temp, "Two", "65", "B");
    add(&temp, "Three", "1", "B");

    planner_in(&temp)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tasks:    3"))
        .stdout(predicate::str::contains("Total duration: 126 mins"))
        .stdout(predicate::str::contains("Most used tag:  B"))
        .stdout(predicate::str::contains("Two (B - 1 hr 5 mins)"))
        .stdout(predicate::str::contains("Three (B - 1 min)"));

    planner_in(&temp).args(["format", "hours"]).assert().success();

    planner_in(&temp)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total duration: 2.10 hrs"));
}

#[test]
fn test_stats_empty() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .arg("stats")
        .assert()
        .success()
        .stdout(predicate::str::contains("Total tasks:    0"))
        .stdout(predicate::str::contains("Most used tag:  -"));
}

// === Check Tests ===

#[test]
fn test_check_reports_hints() {
    let temp = TempDir::new().unwrap();

    planner_in(&temp)
        .args([
            "check", "-t", "Meet the the team at 09:30", "-m", "12.5", "-g", "Work", "-d",
            "2024-03-15",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Hint: title repeats a word"))
        .stdout(predicate::str::contains("Times mentioned: 09:30"))
        .stdout(predicate::str::contains("Valid"));

    planner_in(&temp)
        .args(["check", "-t", "Ok", "-m", "12x5", "-g", "Work", "-d", "2024-03-15"])
        .assert()
        .failure()
        .stderr("Error: Invalid duration\n");
}

#[test]
fn test_check_duration_verdicts() {
    let temp = TempDir::new().unwrap();

    for duration in ["12.5", "90"] {
        planner_in(&temp)
            .args(["check", "-t", "Ok", "-m", duration, "-g", "Work", "-d", "2024-03-15"])
            .assert()
            .success()
            .stdout(predicate::str::contains("Valid"));
    }
    for duration in ["12x5", "-5", "0", "12.345"] {
        planner_in(&temp)
            .args(["check", "-t", "Ok", "-m", duration, "-g", "Work", "-d", "2024-03-15"])
            .assert()
            .failure()
            .stderr("Error: Invalid duration\n");
    }
}
