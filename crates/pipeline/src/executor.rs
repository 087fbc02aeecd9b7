//! The execution boundary.
//!
//! The pipeline runner is an external collaborator: this crate only hands
//! it a finished [`PipelineDescription`] and surfaces its failure verbatim.
//! Cancellation mid-pipeline is not supported; a caller can only decline to
//! start.

use std::io::Write;
use std::path::PathBuf;
use std::process::Command;

use tracing::{debug, info};

use crate::description::PipelineDescription;
use crate::error::{PipelineError, Result};

/// Runs a pipeline description to completion.
pub trait PipelineExecutor {
    fn execute(&self, pipeline: &PipelineDescription) -> Result<ExecutionReport>;
}

/// What the executor reported back.
#[derive(Debug, Clone, Default)]
pub struct ExecutionReport {
    /// Raw standard output of the run, if any.
    pub stdout: String,
}

/// Executor backed by the PDAL command-line runner.
///
/// The description is written to a temporary JSON file and handed to
/// `pdal pipeline <file>`; a non-zero exit becomes
/// [`PipelineError::Execution`] carrying the captured stderr.
#[derive(Debug, Clone)]
pub struct PdalCliExecutor {
    binary: PathBuf,
}

impl PdalCliExecutor {
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }
}

impl Default for PdalCliExecutor {
    fn default() -> Self {
        Self::new("pdal")
    }
}

impl PipelineExecutor for PdalCliExecutor {
    fn execute(&self, pipeline: &PipelineDescription) -> Result<ExecutionReport> {
        let json = pipeline.to_json_string()?;

        let mut file = tempfile::NamedTempFile::new()?;
        file.write_all(json.as_bytes())?;
        file.flush()?;
        debug!(path = %file.path().display(), "wrote pipeline description");

        info!(stages = pipeline.len(), "running pipeline");
        let output = Command::new(&self.binary)
            .arg("pipeline")
            .arg(file.path())
            .output()
            .map_err(|e| {
                PipelineError::execution(format!(
                    "failed to launch '{}': {e}",
                    self.binary.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(PipelineError::execution(format!(
                "executor exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        Ok(ExecutionReport {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}
