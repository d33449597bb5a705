//! Saves each analyzed drawing to a directory.

use super::{AnalysisError, AnalysisSink};
use async_trait::async_trait;
use chrono::Local;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::task;

/// Writes the PNG under `directory` and reports the saved path.
#[derive(Debug, Clone)]
pub struct SnapshotSink {
    directory: PathBuf,
    filename_template: String,
}

impl SnapshotSink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
            filename_template: "drawing_%Y-%m-%d_%H%M%S%.3f".to_string(),
        }
    }

    /// Overrides the chrono format used for file names.
    pub fn with_filename_template(mut self, template: impl Into<String>) -> Self {
        self.filename_template = template.into();
        self
    }

    fn save(&self, image: &[u8]) -> Result<PathBuf, AnalysisError> {
        if !self.directory.exists() {
            log::info!("Creating snapshot directory: {}", self.directory.display());
            fs::create_dir_all(&self.directory)?;
        }

        let path = unique_path(&self.directory, &generate_filename(&self.filename_template));
        fs::write(&path, image)?;
        log::info!("Saved drawing to {}", path.display());
        Ok(path)
    }
}

fn generate_filename(template: &str) -> String {
    Local::now().format(template).to_string()
}

// Two snapshots in the same tick get a numeric suffix
fn unique_path(directory: &Path, stem: &str) -> PathBuf {
    let mut path = directory.join(format!("{stem}.png"));
    let mut n = 1;
    while path.exists() {
        path = directory.join(format!("{stem}-{n}.png"));
        n += 1;
    }
    path
}

#[async_trait]
impl AnalysisSink for SnapshotSink {
    async fn analyze(&self, image: Vec<u8>) -> Result<String, AnalysisError> {
        if image.is_empty() {
            return Err(AnalysisError::Rejected("empty image".to_string()));
        }
        let sink = self.clone();
        let path = task::spawn_blocking(move || sink.save(&image))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))??;
        Ok(path.display().to_string())
    }
}
