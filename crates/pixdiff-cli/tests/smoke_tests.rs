//! Smoke tests for the pixdiff CLI
//!
//! Each test runs the binary inside a fresh temporary directory so the
//! default `./source`, `./target`, `diff` and `logs` paths stay isolated.

#![allow(deprecated)] // Command::cargo_bin
#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Get a command for the pixdiff binary, running in `dir`
fn pixdiff(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("pixdiff").expect("pixdiff binary should exist");
    cmd.current_dir(dir).env_remove("PIXDIFF_LOG_DIR");
    cmd
}

fn workspace() -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir(tmp.path().join("source")).unwrap();
    fs::create_dir(tmp.path().join("target")).unwrap();
    tmp
}

fn png(path: &Path, changed: Option<(u32, u32)>) {
    let mut img = RgbImage::from_pixel(16, 9, Rgb([30, 60, 90]));
    if let Some((x, y)) = changed {
        img.put_pixel(x, y, Rgb([30, 60, 91]));
    }
    img.save(path).unwrap();
}

fn files_in(dir: &Path) -> Vec<String> {
    let mut names: Vec<_> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Basic CLI Tests
// ============================================================================

#[test]
fn test_version_flag() {
    let tmp = TempDir::new().unwrap();
    pixdiff(tmp.path())
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn test_help_flag() {
    let tmp = TempDir::new().unwrap();
    pixdiff(tmp.path())
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SOURCE"))
        .stdout(predicate::str::contains("--exclude"))
        .stdout(predicate::str::contains("--logdelete"));
}

// ============================================================================
// Comparison Runs
// ============================================================================

#[test]
fn test_default_patterns_identical_images() {
    let tmp = workspace();
    png(&tmp.path().join("source/shot1.png"), None);
    png(&tmp.path().join("target/shot1.png"), None);

    pixdiff(tmp.path())
        .args(["--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "1 benchmark image(s), 1 target image(s).",
        ))
        .stderr(predicate::str::contains("DOES NOT match").not());

    assert!(files_in(&tmp.path().join("diff")).is_empty());
    let logs = files_in(&tmp.path().join("logs"));
    assert_eq!(logs.len(), 1);
    assert!(logs[0].starts_with("log_image_diff_"));
}

#[test]
fn test_mismatch_writes_artifact_and_still_succeeds() {
    let tmp = workspace();
    png(&tmp.path().join("source/shot1.png"), None);
    png(&tmp.path().join("target/shot1_retry.png"), Some((3, 2)));

    pixdiff(tmp.path())
        .args(["source/*.png", "target/*.png", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DOES NOT match"));

    assert_eq!(
        files_in(&tmp.path().join("diff")),
        ["diff_shot1_vs_shot1_retry.png"]
    );
    let artifact = image::open(tmp.path().join("diff/diff_shot1_vs_shot1_retry.png")).unwrap();
    assert_eq!((artifact.width(), artifact.height()), (16, 9));
}

#[test]
fn test_verbose_prints_mismatch_region_and_unpaired_paths() {
    let tmp = workspace();
    png(&tmp.path().join("source/a.png"), None);
    png(&tmp.path().join("source/b.png"), None);
    png(&tmp.path().join("target/a.png"), Some((3, 2)));

    pixdiff(tmp.path())
        .args(["-v", "--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains(
            "1x1 region at (3, 2), 1 differing pixel(s)",
        ))
        .stderr(predicate::str::contains("unpaired: "))
        .stderr(predicate::str::contains("b.png"));
}

#[test]
fn test_without_verbose_no_detail_lines() {
    let tmp = workspace();
    png(&tmp.path().join("source/a.png"), None);
    png(&tmp.path().join("target/a.png"), Some((3, 2)));

    pixdiff(tmp.path())
        .args(["--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("DOES NOT match"))
        .stderr(predicate::str::contains("differing pixel(s)").not());
}

#[test]
fn test_strict_exits_with_two_on_mismatch() {
    let tmp = workspace();
    png(&tmp.path().join("source/a.png"), None);
    png(&tmp.path().join("target/a.png"), Some((0, 0)));

    pixdiff(tmp.path()).args(["--strict", "-q"]).assert().code(2);
}

#[test]
fn test_missing_source_files_is_fatal() {
    let tmp = workspace();
    png(&tmp.path().join("target/a.png"), None);

    pixdiff(tmp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Could not find the source files"));
}

#[test]
fn test_undecodable_pair_is_skipped() {
    let tmp = workspace();
    fs::write(tmp.path().join("source/a.png"), "garbage").unwrap();
    png(&tmp.path().join("target/a.png"), None);
    png(&tmp.path().join("source/b.png"), None);
    png(&tmp.path().join("target/b.png"), Some((1, 1)));

    pixdiff(tmp.path())
        .args(["--color", "never"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Cannot process image"));

    assert_eq!(files_in(&tmp.path().join("diff")), ["diff_b.png"]);
}

#[test]
fn test_exclusion_and_json_summary() {
    let tmp = workspace();
    for name in ["one.png", "two.png"] {
        png(&tmp.path().join("source").join(name), None);
        png(&tmp.path().join("target").join(name), None);
    }
    png(&tmp.path().join("source/three_nc.png"), None);
    png(&tmp.path().join("target/three_nc.png"), Some((5, 5)));

    let output = pixdiff(tmp.path())
        .args(["-x", "_nc.png", "--format", "json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    let summary: serde_json::Value = serde_json::from_slice(&output).unwrap();
    assert_eq!(summary["source_images"], 2);
    assert_eq!(summary["target_images"], 2);
    assert_eq!(summary["matched"], 2);
    assert_eq!(summary["mismatches"].as_array().unwrap().len(), 0);
}

#[test]
fn test_gif_artifacts() {
    let tmp = workspace();
    png(&tmp.path().join("source/a.png"), None);
    png(&tmp.path().join("target/a.png"), Some((2, 2)));

    pixdiff(tmp.path()).args(["--gif", "-q"]).assert().success();

    assert_eq!(files_in(&tmp.path().join("diff")), ["diff_a.png.gif"]);
}

#[test]
fn test_keep_diffs_and_logdelete() {
    let tmp = workspace();
    fs::create_dir(tmp.path().join("diff")).unwrap();
    fs::write(tmp.path().join("diff/old.png"), "old").unwrap();
    fs::create_dir(tmp.path().join("logs")).unwrap();
    fs::write(
        tmp.path().join("logs/log_image_diff_20000101000000.log"),
        "old",
    )
    .unwrap();
    png(&tmp.path().join("source/a.png"), None);
    png(&tmp.path().join("target/a.png"), None);

    pixdiff(tmp.path())
        .args(["--keep-diffs", "--logdelete"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Deleted 1 log file(s)."));

    assert!(tmp.path().join("diff/old.png").exists());
    let logs = files_in(&tmp.path().join("logs"));
    assert_eq!(logs.len(), 1);
    assert_ne!(logs[0], "log_image_diff_20000101000000.log");
}
