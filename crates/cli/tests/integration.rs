//! Integration tests for the bx CLI
//!
//! These tests require a running S3-compatible server and an existing bucket.
//!
//! Run with:
//! ```bash
//! TEST_S3_ENDPOINT=http://localhost:9000 \
//! TEST_S3_ACCESS_KEY=accesskey \
//! TEST_S3_SECRET_KEY=secretkey \
//! TEST_S3_BUCKET=bx-test \
//!     cargo test --features integration
//! ```
//!
//! Each test works inside its own folder of the bucket and removes it again.

#![cfg(feature = "integration")]

use std::path::Path;
use std::process::{Command, Output};

use tempfile::TempDir;

struct TestConfig {
    endpoint: String,
    access_key: String,
    secret_key: String,
    bucket: String,
}

/// S3 test configuration from the environment
fn get_test_config() -> Option<TestConfig> {
    Some(TestConfig {
        endpoint: std::env::var("TEST_S3_ENDPOINT").ok()?,
        access_key: std::env::var("TEST_S3_ACCESS_KEY").ok()?,
        secret_key: std::env::var("TEST_S3_SECRET_KEY").ok()?,
        bucket: std::env::var("TEST_S3_BUCKET").ok()?,
    })
}

/// Run bx with an isolated configuration directory
fn run_bx(args: &[&str], config_dir: &Path) -> Output {
    Command::new(env!("CARGO_BIN_EXE_bx"))
        .args(args)
        .env("BX_CONFIG_DIR", config_dir)
        .env_remove("BX_PROFILE")
        .output()
        .expect("Failed to execute bx command")
}

fn stdout_json(output: &Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("Invalid JSON output")
}

/// Generate unique suffix for test folders
fn unique_suffix() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};
    let duration = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    format!("{:x}", duration.as_nanos() % 0xFFFF_FFFF)
}

/// Config directory with a default profile, plus a fresh folder name
fn setup(name: &str) -> Option<(TempDir, String)> {
    let config = get_test_config()?;
    let config_dir = tempfile::tempdir().ok()?;

    let output = run_bx(
        &[
            "profile",
            "add",
            "test",
            &config.bucket,
            "--endpoint",
            &config.endpoint,
            "--access-key",
            &config.access_key,
            "--secret-key",
            &config.secret_key,
            "--path-style",
        ],
        config_dir.path(),
    );
    if !output.status.success() {
        eprintln!(
            "Failed to add profile: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        return None;
    }

    Some((config_dir, format!("bx-it-{name}-{}", unique_suffix())))
}

fn cleanup(config_dir: &Path, folder: &str) {
    let _ = run_bx(&["rm", "-r", folder, "-q"], config_dir);
}

#[test]
fn test_mkdir_then_ls_shows_empty_folder() {
    let Some((config_dir, folder)) = setup("mkdir") else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };

    let output = run_bx(&["mkdir", &format!("{folder}/empty"), "--json"], config_dir.path());
    let json = stdout_json(&output);
    assert_eq!(json["key"], format!("{folder}/empty/"));

    let json = stdout_json(&run_bx(&["ls", &folder, "--json"], config_dir.path()));
    let entries = json["entries"].as_array().expect("entries array");
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0]["name"], "empty");
    assert_eq!(entries[0]["kind"], "folder");

    let json = stdout_json(&run_bx(
        &["ls", &format!("{folder}/empty"), "--json"],
        config_dir.path(),
    ));
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(0));

    cleanup(config_dir.path(), &folder);
}

#[test]
fn test_put_builds_nested_folders() {
    let Some((config_dir, folder)) = setup("put") else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };

    let local = tempfile::tempdir().unwrap();
    let photos = local.path().join("photos");
    std::fs::create_dir_all(photos.join("2024")).unwrap();
    std::fs::write(photos.join("2024/a.png"), vec![0u8; 2048]).unwrap();
    std::fs::write(local.path().join("notes.md"), b"hello").unwrap();

    let output = run_bx(
        &[
            "put",
            "-r",
            photos.to_str().unwrap(),
            local.path().join("notes.md").to_str().unwrap(),
            "--to",
            &folder,
            "--json",
        ],
        config_dir.path(),
    );
    let json = stdout_json(&output);
    assert_eq!(json["uploaded"].as_array().map(Vec::len), Some(2));

    // Folders first, then files
    let json = stdout_json(&run_bx(&["ls", &folder, "--json"], config_dir.path()));
    let names: Vec<&str> = json["entries"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["photos", "notes.md"]);

    let json = stdout_json(&run_bx(
        &["ls", &format!("{folder}/photos/2024"), "--json"],
        config_dir.path(),
    ));
    assert_eq!(json["entries"][0]["size_human"], "2 KB");

    cleanup(config_dir.path(), &folder);
}

#[test]
fn test_get_downloads_object() {
    let Some((config_dir, folder)) = setup("get") else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };

    let local = tempfile::tempdir().unwrap();
    let source = local.path().join("data.txt");
    std::fs::write(&source, b"round trip").unwrap();
    let output = run_bx(
        &["put", source.to_str().unwrap(), "--to", &folder, "-q"],
        config_dir.path(),
    );
    assert!(output.status.success());

    let out_dir = local.path().join("out");
    let output = run_bx(
        &[
            "get",
            &format!("{folder}/data.txt"),
            "-o",
            out_dir.to_str().unwrap(),
            "-q",
        ],
        config_dir.path(),
    );
    assert!(output.status.success());
    assert_eq!(std::fs::read(out_dir.join("data.txt")).unwrap(), b"round trip");

    cleanup(config_dir.path(), &folder);
}

#[test]
fn test_rm_recursive_dry_run_then_delete() {
    let Some((config_dir, folder)) = setup("rm") else {
        eprintln!("Skipping: S3 test config not available");
        return;
    };

    for name in ["a", "b"] {
        let output = run_bx(&["mkdir", &format!("{folder}/{name}"), "-q"], config_dir.path());
        assert!(output.status.success());
    }

    let json = stdout_json(&run_bx(
        &["rm", "-r", &folder, "--dry-run", "--json"],
        config_dir.path(),
    ));
    assert_eq!(json["total"], 2);

    let json = stdout_json(&run_bx(&["rm", "-r", &folder, "--json"], config_dir.path()));
    assert_eq!(json["total"], 2);

    let json = stdout_json(&run_bx(&["ls", &folder, "--json"], config_dir.path()));
    assert_eq!(json["entries"].as_array().map(Vec::len), Some(0));
}

#[test]
fn test_missing_profile_exit_code() {
    let config_dir = tempfile::tempdir().unwrap();
    let output = run_bx(&["ls", "-p", "nope"], config_dir.path());
    assert_eq!(output.status.code(), Some(5));
}
