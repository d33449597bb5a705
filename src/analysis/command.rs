//! Pipes the drawing to an external program.

use super::{AnalysisError, AnalysisSink};
use async_trait::async_trait;
use std::io::Write;
use std::process::{Command, Stdio};
use std::thread;
use tokio::task;

/// Runs `program args..` with the PNG on stdin and reports its trimmed stdout.
#[derive(Debug, Clone)]
pub struct CommandSink {
    program: String,
    args: Vec<String>,
}

impl CommandSink {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Builds a sink from a `[program, args..]` list; `None` when it is empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, args) = argv.split_first()?;
        Some(Self::new(program.clone(), args.to_vec()))
    }

    fn run(&self, image: Vec<u8>) -> Result<String, AnalysisError> {
        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        // Stdin is fed from its own thread while the output pipes drain
        let writer = child.stdin.take().map(|mut stdin| {
            thread::spawn(move || {
                // A program that exits without reading closes the pipe early
                if let Err(e) = stdin.write_all(&image) {
                    log::debug!("Analysis command stopped reading stdin: {}", e);
                }
            })
        });

        let output = child.wait_with_output()?;
        if let Some(writer) = writer {
            if writer.join().is_err() {
                log::warn!("Analysis stdin writer panicked");
            }
        }
        if !output.status.success() {
            return Err(AnalysisError::CommandFailed {
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

#[async_trait]
impl AnalysisSink for CommandSink {
    async fn analyze(&self, image: Vec<u8>) -> Result<String, AnalysisError> {
        log::debug!(
            "Running analysis command {} on {} bytes",
            self.program,
            image.len()
        );
        let sink = self.clone();
        task::spawn_blocking(move || sink.run(image))
            .await
            .map_err(|e| AnalysisError::Task(e.to_string()))?
    }
}
