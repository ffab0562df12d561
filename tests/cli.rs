#![cfg(feature = "cli")]

use assert_cmd::{Command, cargo};
use predicates::prelude::*;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn advisor_cmd() -> Command {
    let mut cmd = cargo::cargo_bin_cmd!();
    cmd.env_remove("WORKER_ADVISOR_NUM_WORKERS");
    // Log filtering comes from `-v`/`-q` only
    cmd.env_remove("RUST_LOG");
    cmd
}

fn write_config(content: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("workers.toml");
    fs::write(&config_path, content).unwrap();
    (temp_dir, config_path)
}

#[test]
fn prints_half_the_physical_cores() {
    advisor_cmd()
        .args(["--physical-cores", "4"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn clamps_to_bounds() {
    advisor_cmd()
        .args(["--physical-cores", "32", "--logical-cores", "4"])
        .assert()
        .success()
        .stdout("4\n");

    advisor_cmd()
        .args(["--physical-cores", "0"])
        .assert()
        .success()
        .stdout("1\n");
}

#[test]
fn host_detection_stays_within_bounds() {
    let output = advisor_cmd().output().unwrap();
    assert!(output.status.success());
    let n: usize = String::from_utf8_lossy(&output.stdout).trim().parse().unwrap();
    assert!((1..=4).contains(&n));
}

#[test]
fn json_output_has_the_breakdown() {
    advisor_cmd()
        .args(["--physical-cores", "4", "--logical-cores", "8", "--json"])
        .assert()
        .success()
        .stdout(
            predicate::str::contains(r#""num-workers": 2"#)
                .and(predicate::str::contains(r#""worker-source": "heuristic""#))
                .and(predicate::str::contains(r#""logical-cores": 8"#))
                .and(predicate::str::contains(r#""physical-source": "detected""#)),
        );
}

#[test]
fn env_var_overrides_config() {
    let (_temp_dir, config_path) = write_config("[workers]\nnum-workers = 3\n");

    advisor_cmd()
        .args(["--config-file", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("3\n");

    advisor_cmd()
        .env("WORKER_ADVISOR_NUM_WORKERS", "7")
        .args(["--config-file", config_path.to_str().unwrap()])
        .assert()
        .success()
        .stdout("7\n");
}

#[test]
fn invalid_env_var_is_ignored() {
    advisor_cmd()
        .env("WORKER_ADVISOR_NUM_WORKERS", "lots")
        .args(["--physical-cores", "4"])
        .assert()
        .success()
        .stdout("2\n")
        .stderr(predicate::str::contains("WORKER_ADVISOR_NUM_WORKERS"));
}

#[test]
fn config_limits_replace_defaults() {
    let (_temp_dir, config_path) = write_config("[workers]\nmin = 2\nmax = 8\n");

    advisor_cmd()
        .args([
            "--config-file",
            config_path.to_str().unwrap(),
            "--physical-cores",
            "32",
        ])
        .assert()
        .success()
        .stdout("8\n");

    advisor_cmd()
        .args([
            "--config-file",
            config_path.to_str().unwrap(),
            "--physical-cores",
            "1",
        ])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn fails_on_invalid_config() {
    let (_temp_dir, config_path) = write_config("[workers]\nmin = 4\nmax = 2\n");

    advisor_cmd()
        .args(["--config-file", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load config"));
}

#[test]
fn fails_on_missing_config() {
    let temp_dir = TempDir::new().unwrap();
    let config_path = temp_dir.path().join("nope.toml");

    advisor_cmd()
        .args(["--config-file", config_path.to_str().unwrap()])
        .assert()
        .failure()
        .stderr(predicate::str::contains("nope.toml"));
}
