//! Drives a session on the current task.
//!
//! Frames and analysis completions are multiplexed with `tokio::select!` so
//! the engine and its surface are only ever touched from one place.

use super::controller::{AnalysisCompletion, FrameOutcome, GestureEngine};
use super::observer::AnalysisState;
use super::session::Session;
use crate::draw::DrawingSurface;
use crate::gesture::Gesture;
use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time;

#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Frames buffered between source and engine
    pub channel_capacity: usize,
    /// How long to wait for an outstanding analysis once the source ends
    pub completion_grace: Duration,
    /// Where the final drawing is written as PNG
    pub output: Option<PathBuf>,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            channel_capacity: 4,
            completion_grace: Duration::from_secs(10),
            output: None,
        }
    }
}

/// Totals for a finished run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    pub frames: usize,
    pub mutations: usize,
    pub analyses_requested: usize,
    pub final_gesture: Gesture,
    pub analysis: AnalysisState,
}

/// Runs one session until the source is exhausted, then stops it.
///
/// # Errors
/// Returns an error if the source cannot be acquired or the final drawing
/// cannot be exported.
pub async fn run_session<S: DrawingSurface>(
    engine: &mut GestureEngine<S>,
    completions: &mut mpsc::UnboundedReceiver<AnalysisCompletion>,
    session: &mut Session,
    options: &RunOptions,
) -> Result<RunSummary> {
    let (frame_tx, mut frame_rx) = mpsc::channel(options.channel_capacity.max(1));
    let token = session.start(frame_tx).await?;
    engine.start(token);

    let mut summary = RunSummary {
        frames: 0,
        mutations: 0,
        analyses_requested: 0,
        final_gesture: Gesture::None,
        analysis: AnalysisState::Empty,
    };

    loop {
        tokio::select! {
            frame = frame_rx.recv() => {
                let Some(hands) = frame else {
                    break;
                };
                summary.frames += 1;
                if let FrameOutcome::Processed { mutations, analysis_requested, .. } =
                    engine.on_frame(&hands)
                {
                    summary.mutations += mutations;
                    if analysis_requested {
                        summary.analyses_requested += 1;
                    }
                }
            }
            Some(completion) = completions.recv() => {
                engine.apply_completion(completion);
            }
        }
    }
    log::info!("Source finished after {} frames", summary.frames);

    if engine.is_analysis_pending() {
        log::info!(
            "Waiting up to {:?} for the pending analysis",
            options.completion_grace
        );
        let drain = async {
            while engine.is_analysis_pending() {
                match completions.recv().await {
                    Some(completion) => {
                        engine.apply_completion(completion);
                    }
                    None => break,
                }
            }
        };
        if time::timeout(options.completion_grace, drain).await.is_err() {
            log::warn!("Analysis still pending, abandoning it");
        }
    }

    session.stop().await;
    engine.stop();

    summary.final_gesture = engine.gesture();
    summary.analysis = engine.analysis().clone();

    if let Some(path) = &options.output {
        let png = engine
            .surface()
            .export_image()
            .context("Failed to export final drawing")?;
        fs::write(path, png)
            .with_context(|| format!("Failed to write drawing to {}", path.display()))?;
        log::info!("Saved drawing to {}", path.display());
    }

    Ok(summary)
}
