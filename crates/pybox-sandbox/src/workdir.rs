//! Ephemeral per-request working tree.
//!
//! The tree is the execution's filesystem scope and the harvester's search
//! space. It is removed on drop on every exit path — success or fault —
//! so no trace remains visible to subsequent requests. No process-wide
//! current-directory mutation: the path is handed explicitly to every
//! operation that needs it.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Name of the materialised program file inside the tree.
pub const PROGRAM_FILE: &str = "main.py";

/// RAII handle over the per-request temporary directory.
#[derive(Debug)]
pub struct WorkingTree {
    dir: TempDir,
}

impl WorkingTree {
    /// Create a fresh tree under the system temp directory.
    pub fn create() -> Result<Self> {
        let dir = tempfile::Builder::new()
            .prefix("pybox-")
            .tempdir()
            .context("Create working tree")?;
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write the (possibly augmented) program text as `main.py` and return
    /// its path.
    pub fn write_program(&self, source: &str) -> Result<PathBuf> {
        let path = self.dir.path().join(PROGRAM_FILE);
        std::fs::write(&path, source).context("Write program file")?;
        Ok(path)
    }
}
