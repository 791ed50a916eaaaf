//! Error taxonomy for the execution pipeline.
//!
//! Nothing here crosses the public `execute` boundary as an `Err`: the
//! executor folds every variant into `ExecutionResult` fields. The enum
//! exists so the failure classes have one place to carry their messages.

use thiserror::Error;

/// Faults the pipeline can produce, classified per stage.
#[derive(Debug, Error)]
pub enum ExecutorError {
    /// One or more resolved packages could not be installed. Execution is
    /// skipped entirely; the failing names are enumerated for the caller.
    #[error("Failed to install packages: {}", .packages.join(", "))]
    DependencyInstall { packages: Vec<String> },

    /// The program raised (non-zero interpreter exit). `stderr` already
    /// carries the interpreter traceback; this wraps the framing message.
    #[error("Execution error: {message}")]
    ProgramFault { message: String },

    /// Program execution exceeded the caller's timeout and was killed.
    #[error("Execution killed: exceeded timeout of {timeout_secs} seconds")]
    Timeout { timeout_secs: u64 },

    /// The working tree or program file could not be materialised.
    #[error("Sandbox setup failed: {0}")]
    Setup(String),

    /// The interpreter itself could not be launched.
    #[error("Failed to launch interpreter '{interpreter}': {message}")]
    Spawn {
        interpreter: String,
        message: String,
    },
}
