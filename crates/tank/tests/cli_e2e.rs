#![allow(deprecated)]

use assert_cmd::cargo::cargo_bin;
use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn tank_cmd(root: &Path) -> Command {
    let mut cmd = Command::new(cargo_bin("tank"));
    cmd.env_remove("TANK_ROOT")
        .env_remove("TANK_LOG_FILE")
        .env_remove("TANK_HIDE_DELETED")
        .env_remove("RUST_LOG")
        .arg("--root")
        .arg(root);
    cmd
}

fn stdout_json(output: &[u8]) -> Value {
    serde_json::from_slice(output).unwrap()
}

const NEMO: &str = r#"{"name":"Nemo","userName":"alice","apiKey":"k1","waterType":"Saltwater","aggression":"2","size":"Extra Large"}"#;

#[test]
fn test_create_list_update_delete_workflow() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");

    // 1. Create
    tank_cmd(&root)
        .args(["create", NEMO])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"roomID\": \"Nemo\""))
        .stdout(predicate::str::contains("New fish Nemo created"));
    assert!(root.join("Nemo").join("info").is_file());

    // 2. List
    let output = tank_cmd(&root).arg("list").assert().success();
    let listed = stdout_json(&output.get_output().stdout);
    assert_eq!(listed["Nemo"]["waterType"], "salt");
    assert_eq!(listed["Nemo"]["size"], "extra-large");
    assert_eq!(listed["Nemo"]["aggression"], 2);

    // 3. Update from stdin
    let output = tank_cmd(&root)
        .arg("update")
        .write_stdin(r#"{"name":"Nemo","aggression":0,"size":""}"#)
        .assert()
        .success();
    let body = stdout_json(&output.get_output().stdout);
    assert_eq!(body["status"], "Fish Nemo updated");
    assert_eq!(body["info"]["aggression"], 1);
    assert_eq!(body["info"]["size"], "extra-large");
    assert_eq!(body["info"]["createdBy"], "alice");

    // 4. Delete
    tank_cmd(&root)
        .args(["delete", "Nemo"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Fish Nemo deleted"));
    assert!(!root.join("Nemo").exists());
}

#[test]
fn test_duplicate_create_is_conflict() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    tank_cmd(&root).args(["create", NEMO]).assert().success();

    tank_cmd(&root)
        .args(["create", NEMO])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("Fish name already exists"))
        .stderr(predicate::str::contains("409"));
}

#[test]
fn test_missing_fields_is_validation_error() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");

    tank_cmd(&root)
        .args(["create", r#"{"name":"Nemo"}"#])
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "Required fields: name, userName, apiKey",
        ))
        .stderr(predicate::str::contains("400"));
}

#[test]
fn test_malformed_json_is_validation_error() {
    let temp = TempDir::new().unwrap();
    tank_cmd(&temp.path().join("Tank"))
        .args(["create", "{not json"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("400"));
}

#[test]
fn test_unknown_fish_is_not_found() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");

    tank_cmd(&root)
        .args(["get", "Dory"])
        .assert()
        .failure()
        .stdout(predicate::str::contains("No fish named Dory exists"))
        .stderr(predicate::str::contains("404"));

    tank_cmd(&root)
        .args(["update", r#"{"name":"Dory","size":"large"}"#])
        .assert()
        .failure()
        .stderr(predicate::str::contains("404"));
}

#[test]
fn test_unreadable_root_reports_path() {
    let temp = TempDir::new().unwrap();
    let blocker = temp.path().join("file");
    fs::write(&blocker, "not a directory").unwrap();

    let output = tank_cmd(&blocker)
        .arg("list")
        .assert()
        .failure()
        .stderr(predicate::str::contains("500"));
    let body = stdout_json(&output.get_output().stdout);
    assert_eq!(body["path"], blocker.display().to_string());
}

#[test]
fn test_list_hide_deleted() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    tank_cmd(&root).args(["create", NEMO]).assert().success();
    tank_cmd(&root)
        .args(["update", r#"{"name":"Nemo","deleted":true}"#])
        .assert()
        .success();

    tank_cmd(&root)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nemo"));
    tank_cmd(&root)
        .args(["list", "--hide-deleted"])
        .assert()
        .success()
        .stdout(predicate::str::diff("{}\n"));
}

#[test]
fn test_sweep_removes_orphans() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    fs::create_dir_all(root.join("Ghost")).unwrap();

    let output = tank_cmd(&root).arg("sweep").assert().success();
    let body = stdout_json(&output.get_output().stdout);
    assert_eq!(body["removedUnits"], 1);
    assert!(!root.join("Ghost").exists());
}

#[test]
fn test_operation_log_file() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    let log = temp.path().join("tank.log");

    tank_cmd(&root)
        .arg("--log-file")
        .arg(&log)
        .args(["create", NEMO])
        .assert()
        .success();
    tank_cmd(&root)
        .arg("--log-file")
        .arg(&log)
        .args(["create", NEMO])
        .assert()
        .failure();

    let content = fs::read_to_string(&log).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert!(lines[0].ends_with("create - ok: New fish Nemo created"));
    assert!(lines[1].contains("create - error(conflict)"));
}

#[test]
fn test_noop_echoes_input() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    let output = tank_cmd(&root)
        .args(["noop", r#"{"name":"Nemo","fins":2}"#])
        .assert()
        .success();
    let body = stdout_json(&output.get_output().stdout);
    assert_eq!(body["status"], "noop");
    assert_eq!(body["input"]["fins"], 2);
    assert!(!root.exists());
}

#[test]
fn test_noop_is_logged() {
    let temp = TempDir::new().unwrap();
    let root = temp.path().join("Tank");
    let log = temp.path().join("tank.log");

    tank_cmd(&root)
        .arg("--log-file")
        .arg(&log)
        .args(["noop", "{}"])
        .assert()
        .success();

    let content = fs::read_to_string(&log).unwrap();
    assert!(content.trim_end().ends_with("noop - ok: noop called"));
    assert!(!root.exists());
}
