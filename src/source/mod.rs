//! Landmark frame producers.
//!
//! A [`LandmarkSource`] pushes one `Vec<HandFrame>` per camera frame into a
//! bounded channel until its session token is cancelled or it runs dry.
//! Dropping the sender signals the end of the stream.

pub mod replay;

pub use replay::{ReplaySource, load_frames, parse_frame_line};

use crate::engine::SessionToken;
use crate::gesture::HandFrame;
use async_trait::async_trait;
use std::path::PathBuf;
use thiserror::Error;
use tokio::sync::mpsc;

/// Errors raised while acquiring a landmark source.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("Failed to open recording {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Landmark source is already running")]
    AlreadyRunning,

    #[error("Landmark source unavailable: {0}")]
    Unavailable(String),
}

/// Push-based producer of hand landmark frames.
#[async_trait]
pub trait LandmarkSource: Send {
    /// Starts delivering frames into `frames` for as long as `token` is active.
    async fn start(
        &mut self,
        frames: mpsc::Sender<Vec<HandFrame>>,
        token: SessionToken,
    ) -> Result<(), SourceError>;

    /// Stops delivery and releases the underlying resource. Idempotent.
    async fn stop(&mut self);
}
