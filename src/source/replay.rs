//! Replays a JSON-lines landmark recording at a fixed frame rate.
//!
//! One frame per line:
//!
//! ```json
//! {"hands":[{"handedness":"right","landmarks":[{"x":0.5,"y":0.4,"z":0.0}]}]}
//! ```
//!
//! Blank lines are skipped, malformed lines are logged and skipped.

use super::{LandmarkSource, SourceError};
use crate::engine::SessionToken;
use crate::gesture::HandFrame;
use async_trait::async_trait;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc::{self, error::TrySendError};
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

#[derive(Debug, Deserialize)]
struct RecordedFrame {
    #[serde(default)]
    hands: Vec<HandFrame>,
}

/// Parses one recording line; `Ok(None)` for blank lines.
pub fn parse_frame_line(line: &str) -> Result<Option<Vec<HandFrame>>, serde_json::Error> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    let frame: RecordedFrame = serde_json::from_str(line)?;
    Ok(Some(frame.hands))
}

/// Reads every usable frame from a recording.
pub fn load_frames(path: &Path) -> Result<Vec<Vec<HandFrame>>, SourceError> {
    let contents = fs::read_to_string(path).map_err(|source| SourceError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let mut frames = Vec::new();
    for (index, line) in contents.lines().enumerate() {
        match parse_frame_line(line) {
            Ok(Some(hands)) => frames.push(hands),
            Ok(None) => {}
            Err(e) => log::warn!("Skipping malformed frame on line {}: {}", index + 1, e),
        }
    }

    log::info!("Loaded {} frames from {}", frames.len(), path.display());
    Ok(frames)
}

enum Recording {
    File(PathBuf),
    Frames(Vec<Vec<HandFrame>>),
}

/// [`LandmarkSource`] that plays back recorded frames.
pub struct ReplaySource {
    recording: Recording,
    frame_interval: Duration,
    task: Option<JoinHandle<()>>,
}

impl ReplaySource {
    /// Replays the recording at `path`; the file is read when the source starts.
    pub fn from_file(path: impl Into<PathBuf>, frame_rate: u32) -> Self {
        Self::with_recording(Recording::File(path.into()), frame_rate)
    }

    /// Replays frames already in memory.
    pub fn from_frames(frames: Vec<Vec<HandFrame>>, frame_rate: u32) -> Self {
        Self::with_recording(Recording::Frames(frames), frame_rate)
    }

    fn with_recording(recording: Recording, frame_rate: u32) -> Self {
        Self {
            recording,
            frame_interval: Duration::from_secs_f64(1.0 / f64::from(frame_rate.max(1))),
            task: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

#[async_trait]
impl LandmarkSource for ReplaySource {
    async fn start(
        &mut self,
        frames: mpsc::Sender<Vec<HandFrame>>,
        token: SessionToken,
    ) -> Result<(), SourceError> {
        if self.is_running() {
            return Err(SourceError::AlreadyRunning);
        }

        let recorded = match &self.recording {
            Recording::File(path) => load_frames(path)?,
            Recording::Frames(frames) => frames.clone(),
        };

        let period = self.frame_interval;
        self.task = Some(tokio::spawn(async move {
            let mut ticker = time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            for hands in recorded {
                ticker.tick().await;
                if !token.is_active() {
                    break;
                }
                match frames.try_send(hands) {
                    Ok(()) => {}
                    Err(TrySendError::Full(_)) => log::debug!("Frame channel full, dropping frame"),
                    Err(TrySendError::Closed(_)) => break,
                }
            }
            log::debug!("Replay finished");
        }));

        Ok(())
    }

    async fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("Replay source stopped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const LINE: &str = r#"{"hands":[{"handedness":"left","landmarks":[{"x":0.1,"y":0.2}]}]}"#;

    #[test]
    fn parses_hands_and_skips_blank_lines() {
        let hands = parse_frame_line(LINE).unwrap().unwrap();
        assert_eq!(hands.len(), 1);
        assert_eq!(hands[0].landmarks[0].z, 0.0);
        assert!(parse_frame_line("   ").unwrap().is_none());
        assert!(parse_frame_line("{}").unwrap().unwrap().is_empty());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "{LINE}").unwrap();
        writeln!(file, "not json").unwrap();
        writeln!(file).unwrap();
        writeln!(file, r#"{{"hands":[]}}"#).unwrap();

        let frames = load_frames(file.path()).unwrap();
        assert_eq!(frames.len(), 2);
        assert!(frames[1].is_empty());
    }

    #[tokio::test]
    async fn missing_file_fails_to_start() {
        let mut source = ReplaySource::from_file("/nonexistent/recording.jsonl", 30);
        let (tx, _rx) = mpsc::channel(1);
        let err = source.start(tx, SessionToken::new(1)).await.unwrap_err();
        assert!(matches!(err, SourceError::Open { .. }));
        assert!(!source.is_running());
    }

    #[tokio::test]
    async fn delivers_frames_then_closes_the_channel() {
        let frames = vec![Vec::new(), Vec::new(), Vec::new()];
        let mut source = ReplaySource::from_frames(frames, 120);
        let (tx, mut rx) = mpsc::channel(8);
        source.start(tx, SessionToken::new(1)).await.unwrap();

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert_eq!(received, 3);
    }

    #[tokio::test]
    async fn cancelled_token_stops_delivery() {
        let token = SessionToken::new(1);
        token.cancel();
        let mut source = ReplaySource::from_frames(vec![Vec::new(); 5], 120);
        let (tx, mut rx) = mpsc::channel(8);
        source.start(tx, token).await.unwrap();

        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn stop_aborts_playback() {
        let mut source = ReplaySource::from_frames(vec![Vec::new(); 1000], 1);
        let (tx, mut rx) = mpsc::channel(8);
        source.start(tx, SessionToken::new(1)).await.unwrap();
        source.stop().await;
        source.stop().await;

        let mut received = 0;
        while rx.recv().await.is_some() {
            received += 1;
        }
        assert!(received <= 1);
    }
}
