mod common;

use serde_json::Value;
use std::path::Path;
use std::process::{Command, Output};

fn docscan(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_docscan"))
        .args(args)
        .env_remove("RUST_LOG")
        .output()
        .expect("Failed to run docscan")
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp path should be UTF-8")
}

#[test]
fn test_scan_writes_binary_png_and_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.png");
    let output = dir.path().join("scan.png");
    let (page, _) = common::rotated_page(480, 400, 240.0, 160.0, 15.0);
    page.save(&input).unwrap();

    let result = docscan(&[
        path_str(&input),
        path_str(&output),
        "--step",
        "resize:400,denoise:5",
        "--rho-resolution",
        "2",
        "--vote-threshold",
        "60",
        "--report",
    ]);

    assert!(
        result.status.success(),
        "docscan failed: {}",
        String::from_utf8_lossy(&result.stderr)
    );

    let report: Value = serde_json::from_slice(&result.stdout).expect("report should be JSON");
    assert_eq!(report["outcome"]["outcome"], "rectified");
    let stages: Vec<_> = report["stages"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(stages, ["resize", "denoise", "detect_corners", "rectify", "binarize"]);

    let scan = image::open(&output).unwrap().to_luma8();
    assert_eq!(scan.width() as u64, report["width"].as_u64().unwrap());
    assert!(scan.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
}

#[test]
fn test_featureless_photo_falls_back() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.png");
    let output = dir.path().join("scan.png");
    common::faint_noise(120, 80, 3).save(&input).unwrap();

    let result = docscan(&[path_str(&input), path_str(&output), "--report"]);

    assert!(result.status.success());
    let report: Value = serde_json::from_slice(&result.stdout).unwrap();
    assert_eq!(report["outcome"]["outcome"], "fallback");
    let scan = image::open(&output).unwrap();
    assert_eq!((scan.width(), scan.height()), (120, 80));
}

#[test]
fn test_undecodable_input_fails() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("photo.jpg");
    let output = dir.path().join("scan.png");
    std::fs::write(&input, b"this is not a jpeg").unwrap();

    let result = docscan(&[path_str(&input), path_str(&output)]);

    assert!(!result.status.success());
    assert!(!output.exists());
    assert!(String::from_utf8_lossy(&result.stderr).contains("DECODE_ERROR"));
}

#[test]
fn test_invalid_configuration_fails_fast() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("scan.png");

    // input does not exist: configuration is checked before it is read
    let result = docscan(&[
        "missing.png",
        path_str(&output),
        "--vote-threshold",
        "0",
    ]);

    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("CONFIGURATION_ERROR"));
}

#[test]
fn test_unknown_step_is_rejected_by_argument_parser() {
    let result = docscan(&["in.png", "out.png", "--step", "sharpen:3"]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("unknown preprocessing step"));
}

#[test]
fn test_debug_dir_collects_stage_images() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("blank.png");
    let output = dir.path().join("scan.png");
    let stages = dir.path().join("stages");
    common::faint_noise(120, 80, 3).save(&input).unwrap();

    let result = docscan(&[
        path_str(&input),
        path_str(&output),
        "--debug-dir",
        path_str(&stages),
    ]);

    assert!(result.status.success());
    for stage in ["preprocessed", "edges", "binary"] {
        assert!(stages.join(format!("{}.png", stage)).exists(), "{} missing", stage);
    }
    // nothing was rectified
    assert!(!stages.join("rectified.png").exists());
}
