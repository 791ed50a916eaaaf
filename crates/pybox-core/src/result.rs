//! The structured result returned to external collaborators.
//!
//! This is the shared "currency" between the executor and the (external)
//! service layer: every field is always present, with empty strings and
//! sequences rather than absent keys. Serialised field names match the
//! wire layout the service layer relays to clients.

use serde::Serialize;

/// The sole value `execute` returns. Invariants:
/// - `success == false` implies `artifacts` is empty;
/// - `failed` non-empty implies the program never ran and
///   `stdout`/`stderr` reflect only the installation phase.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Whether installation and execution both completed cleanly.
    pub success: bool,
    /// Full captured standard output (partial output survives faults).
    #[serde(rename = "output")]
    pub stdout: String,
    /// Captured standard error, or the pipeline's failure message.
    #[serde(rename = "error")]
    pub stderr: String,
    /// Wall-clock seconds for the whole request (install + execution).
    #[serde(rename = "execution_time")]
    pub elapsed_seconds: f64,
    /// Packages confirmed present, in deterministic first-seen order.
    #[serde(rename = "installed_packages")]
    pub installed: Vec<String>,
    /// Packages that failed to install within their timeout.
    #[serde(rename = "failed_packages")]
    pub failed: Vec<String>,
    /// Stored artifact file names in the durable output directory.
    #[serde(rename = "generated_files")]
    pub artifacts: Vec<String>,
}

impl ExecutionResult {
    /// A failed result carrying only a message, with every other field empty.
    pub fn failure(message: impl Into<String>, elapsed_seconds: f64) -> Self {
        Self {
            success: false,
            stdout: String::new(),
            stderr: message.into(),
            elapsed_seconds,
            installed: Vec::new(),
            failed: Vec::new(),
            artifacts: Vec::new(),
        }
    }
}
