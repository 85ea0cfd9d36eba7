//! Integration tests for the rarpeval CLI

use assert_cmd::Command;
use image::{GrayImage, Luma};
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// One video: 12 action samples (labels 0 then 1) and the two matching masks
fn write_video(root: &Path, name: &str, action_lines: usize) {
    let video = root.join(name);
    let segmentation = video.join("segmentation");
    fs::create_dir_all(&segmentation).unwrap();

    let body: String = (0..action_lines)
        .map(|i| format!("{:09},{}\n", i * 6, usize::from(i >= 6)))
        .collect();
    fs::write(video.join("action_discrete.txt"), body).unwrap();

    for frame in [0, 60] {
        let mask = GrayImage::from_fn(8, 8, |x, _| Luma([u8::from(x < 4)]));
        mask.save(segmentation.join(format!("{frame:09}.png"))).unwrap();
    }
}

fn dataset(action_lines: usize) -> (TempDir, TempDir) {
    let reference = TempDir::new().unwrap();
    let prediction = TempDir::new().unwrap();
    write_video(reference.path(), "video_41", 12);
    write_video(prediction.path(), "video_41", action_lines);
    (reference, prediction)
}

fn rarpeval() -> Command {
    let mut cmd = Command::cargo_bin("rarpeval").unwrap();
    cmd.env_remove("RARPEVAL_THREADS").env_remove("RUST_LOG");
    cmd
}

#[test]
fn test_evaluate_perfect_predictions() {
    let (reference, prediction) = dataset(12);

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .arg("--quiet")
        .assert()
        .success()
        .stdout(predicate::str::contains("video_id"))
        .stdout(predicate::str::contains("action_score: 1.0000"));

    assert!(prediction.path().join("per_video_results.csv").is_file());
    assert!(prediction.path().join("final_results.csv").is_file());
    assert!(prediction.path().join("evaluation.log").is_file());

    let per_video = fs::read_to_string(prediction.path().join("per_video_results.csv")).unwrap();
    assert!(per_video.starts_with("video_id,seg_mIoU,seg_mNSD,ar_acc,ar_f1@10"));
}

#[test]
fn test_evaluate_output_dir_and_class_errors() {
    let (reference, prediction) = dataset(12);
    let output = TempDir::new().unwrap();

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .arg("--quiet")
        .arg("--no-log-file")
        .arg("--class-errors")
        .arg("-o")
        .arg(output.path())
        .arg("-f")
        .arg("json")
        .assert()
        .success()
        .stdout(predicate::str::contains("\"summary\""));

    assert!(output.path().join("final_results.csv").is_file());
    assert!(output.path().join("video_41_class_stats_iou.csv").is_file());
    assert!(!prediction.path().join("evaluation.log").exists());
}

#[test]
fn test_evaluate_actions_only() {
    let (reference, prediction) = dataset(12);
    fs::remove_dir_all(prediction.path().join("video_41/segmentation")).unwrap();

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .args(["--quiet", "--no-log-file", "-t", "actions", "-f", "markdown"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ar_acc"))
        .stdout(predicate::str::contains("seg_mIoU").not());
}

#[test]
fn test_evaluate_rejects_short_action_file() {
    let (reference, prediction) = dataset(11);

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .args(["--quiet", "--no-log-file"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Validation failed for 1 video(s)"));

    assert!(!prediction.path().join("final_results.csv").exists());
}

#[test]
fn test_validate_reports_failures() {
    let (reference, prediction) = dataset(11);

    rarpeval()
        .arg("validate")
        .arg(reference.path())
        .arg(prediction.path())
        .assert()
        .failure()
        .stdout(predicate::str::contains("video_41"))
        .stdout(predicate::str::contains("contained 12 lines"));
}

#[test]
fn test_validate_success() {
    let (reference, prediction) = dataset(12);

    rarpeval()
        .arg("validate")
        .arg(reference.path())
        .arg(prediction.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("✓ All 1 videos are valid!"));
}

#[test]
fn test_generate_then_evaluate() {
    let (reference, _) = dataset(12);
    let out = TempDir::new().unwrap();
    let prediction = out.path().join("mock");

    rarpeval()
        .arg("generate")
        .arg(reference.path())
        .arg(&prediction)
        .args(["--seed", "3"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1 action files, 2 masks"));

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(&prediction)
        .args(["--quiet", "--no-log-file"])
        .assert()
        .success()
        .stdout(predicate::str::contains("segmentation_score"));

    rarpeval()
        .arg("generate")
        .arg(reference.path())
        .arg(&prediction)
        .assert()
        .failure();
}

#[test]
fn test_generate_config_and_use_it() {
    let (reference, prediction) = dataset(12);
    let dir = TempDir::new().unwrap();
    let config = dir.path().join("rarpeval.toml");

    rarpeval()
        .arg("generate-config")
        .arg("-o")
        .arg(&config)
        .assert()
        .success()
        .stdout(predicate::str::contains("Configuration template generated"));

    let edited = fs::read_to_string(&config)
        .unwrap()
        .replace("log_file = true", "log_file = false");
    fs::write(&config, edited).unwrap();

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .arg("--quiet")
        .arg("-c")
        .arg(&config)
        .assert()
        .success();
    assert!(!prediction.path().join("evaluation.log").exists());
}

#[test]
fn test_invalid_config_value() {
    let (reference, prediction) = dataset(12);

    rarpeval()
        .arg("evaluate")
        .arg(reference.path())
        .arg(prediction.path())
        .args(["--quiet", "--no-log-file", "--f1-overlap", "150"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Configuration error"));
}

#[test]
fn test_missing_directory() {
    let prediction = TempDir::new().unwrap();

    rarpeval()
        .arg("evaluate")
        .arg("/nonexistent/test_set")
        .arg(prediction.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("Not a directory"));
}

#[test]
fn test_list_metrics() {
    rarpeval()
        .args(["list", "metrics"])
        .assert()
        .success()
        .stdout(predicate::str::contains("seg_mNSD"))
        .stdout(predicate::str::contains("ar_f1@10"));
}

#[test]
fn test_list_classes() {
    rarpeval()
        .args(["list", "classes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Suturing Needle"));
}
