//! Command-line front ends: replayed drawing sessions and the quiz detector.

use crate::analysis::{AnalysisSink, CommandSink, SnapshotSink};
use crate::config::Config;
use crate::draw::CairoSurface;
use crate::engine::{
    AnalysisState, EngineDependencies, EngineSettings, GestureEngine, GestureObserver,
    LogKeepAlive, RunOptions, RunSummary, Session, run_session,
};
use crate::gesture::{Gesture, QuizGestureDetector, QuizSignal};
use crate::source::{ReplaySource, load_frames};
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Settings for one `draw` run, after CLI overrides.
#[derive(Debug, Clone)]
pub struct DrawOptions {
    pub replay: PathBuf,
    pub output: PathBuf,
    pub analyze_with: Option<Vec<String>>,
    pub snapshot_dir: Option<PathBuf>,
    pub frame_rate: Option<u32>,
}

/// Prints every change on stdout, one line each.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleObserver;

impl GestureObserver for ConsoleObserver {
    fn gesture_changed(&self, gesture: Gesture) {
        println!("gesture: {}", gesture);
    }

    fn analysis_changed(&self, state: &AnalysisState) {
        println!("analysis: {}", state);
    }
}

/// Picks the analysis destination: an explicit command wins over a snapshot
/// directory, the CLI wins over the config file.
pub fn select_sink(config: &Config, options: &DrawOptions) -> Arc<dyn AnalysisSink> {
    let command = options
        .analyze_with
        .as_deref()
        .or(config.analysis.command.as_deref())
        .and_then(CommandSink::from_argv);
    if let Some(sink) = command {
        log::info!("Analyzing drawings with an external command");
        return Arc::new(sink);
    }

    let directory = options
        .snapshot_dir
        .clone()
        .or_else(|| config.analysis.snapshot_dir.clone())
        .unwrap_or_else(default_snapshot_dir);
    log::info!("Saving analyzed drawings to {}", directory.display());
    Arc::new(SnapshotSink::new(directory))
}

fn default_snapshot_dir() -> PathBuf {
    dirs::picture_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("Airscribe")
}

/// Replays a recording through the engine and writes the final drawing.
pub fn run_draw(config: &Config, options: &DrawOptions) -> Result<RunSummary> {
    let runtime = tokio::runtime::Runtime::new().context("Failed to create Tokio runtime")?;

    let surface = CairoSurface::new(config.canvas.width, config.canvas.height)?
        .with_export_background(config.canvas.export_background.color());
    let (mut engine, mut completions) = GestureEngine::new(
        runtime.handle(),
        surface,
        EngineSettings::from_config(config),
        EngineDependencies {
            sink: select_sink(config, options),
            observer: Box::new(ConsoleObserver),
        },
    );

    let frame_rate = options.frame_rate.unwrap_or(config.source.frame_rate);
    let mut session = Session::new(
        Box::new(ReplaySource::from_file(&options.replay, frame_rate)),
        Arc::new(LogKeepAlive),
        config.heartbeat_period(),
    );
    let run_options = RunOptions {
        channel_capacity: config.source.channel_capacity,
        completion_grace: config.completion_grace(),
        output: Some(options.output.clone()),
    };

    let summary = runtime.block_on(run_session(
        &mut engine,
        &mut completions,
        &mut session,
        &run_options,
    ));

    // Analyses abandoned after the grace period may still hold blocking threads
    runtime.shutdown_background();
    summary
}

/// Runs the quiz detector over a recording, returning each signal with the
/// (1-based) frame it fired on.
pub fn run_quiz(replay: &Path, options_enabled: bool) -> Result<Vec<(usize, QuizSignal)>> {
    let frames = load_frames(replay)?;
    let mut detector = QuizGestureDetector::new(options_enabled);

    let signals = frames
        .iter()
        .enumerate()
        .flat_map(|(index, hands)| {
            detector
                .observe(hands)
                .into_iter()
                .map(move |signal| (index + 1, signal))
        })
        .collect();
    Ok(signals)
}
