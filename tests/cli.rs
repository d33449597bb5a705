use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::{Value, json};
use std::path::Path;
use tempfile::TempDir;

fn airscribe_cmd() -> Command {
    Command::cargo_bin("airscribe").expect("binary exists")
}

/// Upright hand, palm to the camera, thumb side towards -x.
fn hand(fingers: [bool; 5]) -> Value {
    let mut points = vec![(0.50, 0.80), (0.44, 0.76), (0.40, 0.70), (0.36, 0.66)];
    points.push(if fingers[0] { (0.30, 0.62) } else { (0.44, 0.64) });
    for (slot, x) in [0.45, 0.50, 0.55, 0.60].into_iter().enumerate() {
        let up = fingers[slot + 1];
        points.push((x, 0.62));
        points.push((x, 0.55));
        points.push((x, if up { 0.48 } else { 0.58 }));
        points.push((x, if up { 0.40 } else { 0.62 }));
    }
    let landmarks: Vec<Value> = points
        .into_iter()
        .map(|(x, y)| json!({ "x": x, "y": y }))
        .collect();
    json!({ "landmarks": landmarks })
}

fn drawing_at(x: f64, y: f64) -> Value {
    let mut value = hand([true, true, false, false, false]);
    value["landmarks"][8] = json!({ "x": x, "y": y });
    value
}

fn write_recording(dir: &Path, frames: &[Vec<Value>]) -> std::path::PathBuf {
    let lines: Vec<String> = frames
        .iter()
        .map(|hands| json!({ "hands": hands }).to_string())
        .collect();
    let path = dir.join("frames.jsonl");
    std::fs::write(&path, lines.join("\n")).unwrap();
    path
}

fn empty_config(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("config.toml");
    std::fs::write(&path, "[canvas]\nwidth = 200\nheight = 100\n").unwrap();
    path
}

#[test]
fn airscribe_help_prints_usage() {
    airscribe_cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Draw in the air with hand gestures"))
        .stdout(predicate::str::contains("draw"))
        .stdout(predicate::str::contains("quiz"));
}

#[test]
fn draw_requires_a_recording() {
    airscribe_cmd()
        .arg("draw")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "required arguments were not provided",
        ));
}

#[test]
fn draw_replays_and_writes_png() {
    let temp = TempDir::new().unwrap();
    let recording = write_recording(
        temp.path(),
        &[
            vec![drawing_at(0.20, 0.30)],
            vec![drawing_at(0.40, 0.30)],
            vec![drawing_at(0.60, 0.30)],
            vec![],
        ],
    );
    let output = temp.path().join("out.png");

    airscribe_cmd()
        .arg("draw")
        .arg("--config")
        .arg(empty_config(temp.path()))
        .arg("--replay")
        .arg(&recording)
        .arg("--output")
        .arg(&output)
        .args(["--frame-rate", "120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gesture: Drawing"))
        .stdout(predicate::str::contains("strokes: 2"))
        .stdout(predicate::str::contains("saved drawing to"));

    let png = std::fs::read(&output).unwrap();
    assert_eq!(&png[0..8], &[137, 80, 78, 71, 13, 10, 26, 10]);
}

#[test]
fn analyzing_gesture_saves_a_snapshot() {
    let temp = TempDir::new().unwrap();
    let snapshots = temp.path().join("snaps");
    let recording = write_recording(
        temp.path(),
        &[
            vec![drawing_at(0.20, 0.30)],
            vec![drawing_at(0.40, 0.30)],
            vec![hand([false, true, true, false, false])],
            vec![],
        ],
    );

    airscribe_cmd()
        .arg("draw")
        .arg("--config")
        .arg(empty_config(temp.path()))
        .arg("--replay")
        .arg(&recording)
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .arg("--snapshot-dir")
        .arg(&snapshots)
        .args(["--frame-rate", "120"])
        .assert()
        .success()
        .stdout(predicate::str::contains("analysis: pending"))
        .stdout(predicate::str::contains("analysis: ready:"))
        .stdout(predicate::str::contains("analyses: 1"));

    let saved: Vec<_> = std::fs::read_dir(&snapshots).unwrap().collect();
    assert_eq!(saved.len(), 1);
}

#[test]
fn draw_reports_missing_recording() {
    let temp = TempDir::new().unwrap();
    airscribe_cmd()
        .arg("draw")
        .arg("--config")
        .arg(empty_config(temp.path()))
        .arg("--replay")
        .arg(temp.path().join("missing.jsonl"))
        .arg("--output")
        .arg(temp.path().join("out.png"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to acquire landmark source"));
}

#[test]
fn invalid_config_is_reported() {
    let temp = TempDir::new().unwrap();
    let config = temp.path().join("broken.toml");
    std::fs::write(&config, "[canvas\n").unwrap();
    let recording = write_recording(temp.path(), &[vec![]]);

    airscribe_cmd()
        .arg("draw")
        .arg("--config")
        .arg(&config)
        .arg("--replay")
        .arg(&recording)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse config"));
}

#[test]
fn quiz_prints_hint_and_option() {
    let temp = TempDir::new().unwrap();
    let mut thumbs_down = hand([false; 5]);
    thumbs_down["landmarks"][4] = json!({ "x": 0.40, "y": 0.90 });
    let recording = write_recording(
        temp.path(),
        &[
            vec![hand([false; 5])],
            vec![thumbs_down],
            vec![hand([false, true, true, true, false])],
        ],
    );

    airscribe_cmd()
        .arg("quiz")
        .arg("--replay")
        .arg(&recording)
        .assert()
        .success()
        .stdout(predicate::str::contains("frame 2: hint"))
        .stdout(predicate::str::contains("frame 3: option 3"));

    airscribe_cmd()
        .arg("quiz")
        .arg("--replay")
        .arg(&recording)
        .arg("--no-options")
        .assert()
        .success()
        .stdout(predicate::str::contains("option").not());
}
