//! Integration tests for the clickpush CLI.
//!
//! Database-backed paths need a live SQL Server, so these tests drive the
//! argument surface and the dry-run pipeline through the real binary.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Get the clickpush binary
#[allow(deprecated)]
fn clickpush_cmd() -> Command {
    Command::cargo_bin("clickpush").unwrap()
}

const SAMPLE_ROWS: &str = "\
2016-05-10 17:14:30-1,_Living_Room,ddev1,e100,mVerizon
2016-05-10 17:14:31-1,_Bedroom,ddev2,e101,mComcast
2016-05-10 17:14:32-1,_Den,ddev3,e102,mCox
";

fn write_input(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("events.csv");
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_help() {
    clickpush_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Load clickstream event CSV files into SQL Server",
        ))
        .stdout(predicate::str::contains("--server"))
        .stdout(predicate::str::contains("--max-records"))
        .stdout(predicate::str::contains("--dry-run"));
}

#[test]
fn test_version() {
    clickpush_cmd()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_missing_required_settings() {
    let temp_dir = TempDir::new().unwrap();

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "server, database, and input file are required",
        ));
}

#[test]
fn test_invalid_max_records() {
    clickpush_cmd()
        .args(["-m", "lots"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

#[test]
fn test_dry_run_generates_statements() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, SAMPLE_ROWS);

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--server",
            "dbhost",
            "--database",
            "Clickstream",
            "--input",
            input.to_str().unwrap(),
            "--max-records",
            "2",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "INSERT INTO clickstreamEventsLog \
             ([timestamp],[received],[deviceId],[eventCode],[msoName]) VALUES ",
        ))
        .stdout(predicate::str::contains(
            "('2016-05-10 17:14:30', 'Living Room', 'dev1', '100', 'Verizon')",
        ))
        .stdout(predicate::function(|out: &str| {
            // 3 records at batch size 2: one full statement, one remainder.
            out.matches("INSERT INTO").count() == 2
        }))
        .stdout(predicate::str::contains("Generated 2 statement(s)"));
}

#[test]
fn test_dry_run_respects_table_and_rule_flags() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, SAMPLE_ROWS);

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--server",
            "dbhost",
            "--database",
            "Clickstream",
            "--input",
            input.to_str().unwrap(),
            "--table",
            "stagingEvents",
            "--timestamp-rule",
            "last-hyphen",
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("INSERT INTO stagingEvents "))
        .stdout(predicate::str::contains("('2016-05-10 17:14:3',"));
}

#[test]
fn test_dry_run_reports_malformed_rows() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, "2016,_a,db,ec,md\n");

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--server",
            "dbhost",
            "--database",
            "Clickstream",
            "--input",
            input.to_str().unwrap(),
            "--dry-run",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("malformed record 0: field 0"));
}

#[test]
fn test_settings_file_provides_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let input = write_input(&temp_dir, SAMPLE_ROWS);

    let config_path = temp_dir.path().join("clickpush.toml");
    fs::write(
        &config_path,
        "server = \"dbhost\"\ndatabase = \"Clickstream\"\nmax_records = 1\n",
    )
    .unwrap();

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--config",
            config_path.to_str().unwrap(),
            "--input",
            input.to_str().unwrap(),
            "--dry-run",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("Generated 3 statement(s)"));
}

#[test]
fn test_missing_input_file_is_a_source_error() {
    let temp_dir = TempDir::new().unwrap();

    clickpush_cmd()
        .current_dir(temp_dir.path())
        .args([
            "--server",
            "dbhost",
            "--database",
            "Clickstream",
            "--input",
            "no-such-file.csv",
            "--dry-run",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot open"));
}
