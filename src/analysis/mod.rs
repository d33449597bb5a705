//! Destinations for analyzed drawings.
//!
//! When the Analyzing gesture fires, the engine exports the drawing as PNG and
//! hands the bytes to an [`AnalysisSink`]. The sink's text result ends up in
//! the engine's result slot.

pub mod command;
pub mod snapshot;

pub use command::CommandSink;
pub use snapshot::SnapshotSink;

use async_trait::async_trait;
use thiserror::Error;

/// Errors that can occur while analyzing a drawing.
#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("Failed to run analysis command: {0}")]
    Spawn(#[from] std::io::Error),

    #[error("Analysis command exited with {status}: {stderr}")]
    CommandFailed { status: String, stderr: String },

    #[error("Analysis task failed: {0}")]
    Task(String),

    #[error("Analysis rejected the drawing: {0}")]
    Rejected(String),
}

/// Turns an exported drawing into a text result.
#[async_trait]
pub trait AnalysisSink: Send + Sync {
    async fn analyze(&self, image: Vec<u8>) -> Result<String, AnalysisError>;
}
