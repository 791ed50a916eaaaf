//! Out-of-process execution of the submitted program.
//!
//! The program is materialised as `main.py` inside the working tree and run
//! by a child interpreter whose `current_dir` is the tree — the process-wide
//! working directory is never touched, so concurrent executions cannot
//! observe each other's trees. The caller's timeout hard-kills the child.

use crate::augment;
use crate::common::wait_with_timeout;
use crate::workdir::{WorkingTree, PROGRAM_FILE};
use pybox_core::config::RenderConfig;
use pybox_core::error::ExecutorError;
use std::path::Path;
use std::process::{Command, Stdio};

/// Captured outcome of one program run.
#[derive(Debug)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    pub timed_out: bool,
}

impl RunOutput {
    pub fn succeeded(&self) -> bool {
        self.exit_code == 0 && !self.timed_out
    }
}

/// Execute `source` inside `tree` with output captured in full.
///
/// When `render_augment` is set, the renderer config is written first and
/// the source gains render bootstrap code if a scene class is detected;
/// otherwise the source runs unmodified. Faults in the program itself are
/// not errors here — they surface as a non-zero `exit_code` with the
/// interpreter's traceback in `stderr`.
pub fn run(
    python: &Path,
    tree: &WorkingTree,
    source: &str,
    render_augment: bool,
    timeout_secs: u64,
    render: &RenderConfig,
) -> Result<RunOutput, ExecutorError> {
    let program = if render_augment {
        augment::write_renderer_config(tree.path(), render)
            .map_err(|e| ExecutorError::Setup(format!("{e:#}")))?;
        let (augmented, detected) = augment::augment_source(source);
        match detected {
            Some(name) => tracing::info!(scene = %name, "render augmentation applied"),
            None => tracing::debug!("no scene class detected, running source unmodified"),
        }
        augmented
    } else {
        source.to_string()
    };

    tree.write_program(&program)
        .map_err(|e| ExecutorError::Setup(format!("{e:#}")))?;

    let mut child = Command::new(python)
        .arg(PROGRAM_FILE)
        .current_dir(tree.path())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| ExecutorError::Spawn {
            interpreter: python.display().to_string(),
            message: e.to_string(),
        })?;

    let outcome = wait_with_timeout(&mut child, timeout_secs)
        .map_err(|e| ExecutorError::ProgramFault {
            message: e.to_string(),
        })?;

    let stderr = if outcome.exit_code != 0 {
        rewrite_native_linkage_fault(&outcome.stderr).unwrap_or(outcome.stderr)
    } else {
        outcome.stderr
    };

    Ok(RunOutput {
        stdout: outcome.stdout,
        stderr,
        exit_code: outcome.exit_code,
        timed_out: outcome.timed_out,
    })
}

/// Rewrite a recognised Cairo linkage fault into an actionable remediation
/// message, preserving the original fault text appended at the end.
pub fn rewrite_native_linkage_fault(stderr: &str) -> Option<String> {
    let lower = stderr.to_lowercase();
    if !(lower.contains("cairo") && lower.contains("symbol not found")) {
        return None;
    }
    Some(format!(
        "Manim/Cairo Installation Error: The Cairo graphics library is not properly linked.\n\
         To fix this:\n\
         1. Install system dependencies (e.g. `apt install libcairo2-dev pkg-config` or `brew install cairo pkg-config`)\n\
         2. Reinstall pycairo: pip uninstall pycairo && pip install pycairo --no-binary pycairo\n\
         3. Or use a conda environment: conda install -c conda-forge manim\n\n\
         Original error: {stderr}"
    ))
}
