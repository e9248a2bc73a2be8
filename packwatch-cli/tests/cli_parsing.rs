//! CLI argument parsing edge case tests.

#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn packwatch() -> Command {
    let mut cmd = Command::cargo_bin("packwatch").expect("packwatch binary");
    // Pin the filter so error lines land on stdout regardless of the
    // caller's RUST_LOG.
    cmd.env("RUST_LOG", "error");
    cmd
}

#[test]
fn test_help_flag() {
    packwatch()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("packwatch"))
        .stdout(predicate::str::contains("--from-tag"))
        .stdout(predicate::str::contains("--check-patch-apply-only"))
        .stdout(predicate::str::contains("--json-output"));
}

#[test]
fn test_version_flag() {
    packwatch()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("packwatch"));
}

#[test]
fn test_missing_repository_is_a_usage_error() {
    packwatch()
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_analysis_requires_comparison_tags() {
    // Without --check-patch-apply-only both tags are mandatory.
    packwatch()
        .arg("psf/requests")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));

    packwatch()
        .arg("psf/requests")
        .arg("--from-tag")
        .arg("v2.31.0")
        .assert()
        .failure()
        .stderr(predicate::str::contains("required"));
}

#[test]
fn test_check_mode_does_not_require_tags() {
    let temp = TempDir::new().expect("tempdir");
    let missing = temp.path().join("no-such-patches");

    // Gets past argument parsing and fails on the missing directory.
    packwatch()
        .arg("psf/requests")
        .arg("--check-patch-apply-only")
        .arg("--patches-dir")
        .arg(&missing)
        .assert()
        .code(1)
        .stdout(predicate::str::contains("no-such-patches"));
}

#[test]
fn test_bad_locator_is_rejected() {
    packwatch()
        .arg("not-a-locator")
        .arg("--from-tag")
        .arg("v1")
        .arg("--to-tag")
        .arg("v2")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("unrecognized repository locator"));
}

#[test]
fn test_json_output_requires_check_mode() {
    packwatch()
        .arg("psf/requests")
        .arg("--from-tag")
        .arg("v1")
        .arg("--to-tag")
        .arg("v2")
        .arg("--json-output")
        .assert()
        .code(1)
        .stdout(predicate::str::contains(
            "--json-output requires --check-patch-apply-only",
        ));
}

#[test]
fn test_check_mode_requires_patches_dir() {
    packwatch()
        .arg("psf/requests")
        .arg("--check-patch-apply-only")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("needs --patches-dir"));
}

#[test]
fn test_invalid_max_commits() {
    packwatch()
        .arg("psf/requests")
        .arg("--from-tag")
        .arg("v1")
        .arg("--to-tag")
        .arg("v2")
        .arg("--max-commits")
        .arg("abc")
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid"));
}

#[test]
fn test_analysis_rejects_non_github_locator() {
    // file:// locators can be validated but not compared via the API.
    packwatch()
        .arg("file:///srv/mirrors/requests.git")
        .arg("--from-tag")
        .arg("v1")
        .arg("--to-tag")
        .arg("v2")
        .assert()
        .code(1)
        .stdout(predicate::str::contains("needs a GitHub repository"));
}
