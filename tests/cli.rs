use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn stride(temp_dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("stride").unwrap();
    cmd.current_dir(temp_dir);
    cmd
}

#[test]
fn test_full_workflow() {
    let temp_dir = TempDir::new().unwrap();
    let today = chrono::Utc::now().date_naive().format("%Y-%m-%d").to_string();

    stride(&temp_dir).arg("init").assert().success();

    // Add two tasks due today
    stride(&temp_dir)
        .args(["add", "Reading", "--priority", "Low", "--due", &today])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task #1"));

    stride(&temp_dir)
        .args(["add", "Essay", "--priority", "High", "--due", &today])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created task #2"));

    // Essay comes first on today's list
    let output = stride(&temp_dir).arg("today").output().unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let essay = stdout.find("Essay").unwrap();
    let reading = stdout.find("Reading").unwrap();
    assert!(essay < reading);

    // Complete the essay; it drops off the schedule
    stride(&temp_dir)
        .args([
            "edit",
            "2",
            "--title",
            "Essay",
            "--status",
            "Completed",
            "--priority",
            "High",
            "--due",
            &today,
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Updated task #2"));

    stride(&temp_dir)
        .arg("schedule")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading"))
        .stdout(predicate::str::contains("Essay").not());

    // Show reflects the edit
    stride(&temp_dir)
        .args(["show", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Completed"));

    // Delete and list
    stride(&temp_dir).args(["rm", "1"]).assert().success();
    stride(&temp_dir)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Reading").not())
        .stdout(predicate::str::contains("Essay"));
}

#[test]
fn test_commands_require_init() {
    let temp_dir = TempDir::new().unwrap();

    stride(&temp_dir)
        .args(["add", "Essay"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"));
}

#[test]
fn test_init_twice_succeeds() {
    let temp_dir = TempDir::new().unwrap();

    stride(&temp_dir).arg("init").assert().success();
    stride(&temp_dir).arg("init").assert().success();

    stride(&temp_dir)
        .arg("settings")
        .assert()
        .success()
        .stdout(predicate::str::contains("Study hours: 09:00-17:00"));
}

#[test]
fn test_settings_update() {
    let temp_dir = TempDir::new().unwrap();
    stride(&temp_dir).arg("init").assert().success();

    stride(&temp_dir)
        .args(["settings", "--start", "08:30", "--end", "21:00", "--excluded", "Sunday"])
        .assert()
        .success()
        .stdout(predicate::str::contains("08:30-21:00"))
        .stdout(predicate::str::contains("Excluded days: Sunday"));
}

#[test]
fn test_custom_db_path() {
    let temp_dir = TempDir::new().unwrap();

    stride(&temp_dir)
        .args(["--db", "custom.db", "init"])
        .assert()
        .success();
    assert!(temp_dir.path().join("custom.db").exists());
    assert!(!temp_dir.path().join("stride.db").exists());
}

#[test]
fn test_invalid_due_date_rejected() {
    let temp_dir = TempDir::new().unwrap();
    stride(&temp_dir).arg("init").assert().success();

    stride(&temp_dir)
        .args(["add", "Essay", "--due", "next week"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date"));
}

#[test]
fn test_edit_unknown_task_fails() {
    let temp_dir = TempDir::new().unwrap();
    stride(&temp_dir).arg("init").assert().success();

    stride(&temp_dir)
        .args(["edit", "9", "--title", "Ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Task #9 not found"));
}
