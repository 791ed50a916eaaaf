//! Package installation with a process-lifetime memo.
//!
//! Each package is installed by invoking pip as a child process with a
//! bounded wall-clock timeout; success is solely the child's exit status.
//! Failures are independent — the loop never aborts early. Names on the
//! stdlib allow-list (or already in the memo) short-circuit without a
//! subprocess call. A per-package mutex keyed by resolved name prevents
//! two concurrent requests from racing pip for the same package.

use crate::common::wait_with_timeout;
use crate::resolve::ResolvedPackage;
use pybox_core::config::RuntimeConfig;
use std::collections::{HashMap, HashSet};
use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::sync::{Arc, Mutex};

/// Module names shipped with the interpreter; never installed.
const STDLIB: &[&str] = &[
    "os", "sys", "json", "time", "datetime", "random", "math",
    "collections", "itertools", "functools", "operator", "typing",
    "pathlib", "urllib", "http", "email", "html", "xml", "csv",
    "sqlite3", "pickle", "base64", "hashlib", "hmac", "secrets",
    "uuid", "decimal", "fractions", "statistics", "enum", "dataclasses",
    "contextlib", "copy", "pprint", "reprlib", "weakref", "gc",
    "inspect", "dis", "ast", "importlib", "pkgutil", "modulefinder",
    "runpy", "site", "sysconfig", "platform", "errno", "io", "codecs",
    "locale", "gettext", "argparse", "optparse", "logging", "getpass",
    "curses", "shutil", "glob", "fnmatch", "linecache", "tempfile",
    "gzip", "bz2", "lzma", "zipfile", "tarfile", "configparser",
    "netrc", "plistlib", "calendar", "zoneinfo", "threading",
    "multiprocessing", "concurrent", "subprocess", "sched", "queue",
    "select", "selectors", "asyncio", "socket", "ssl", "signal",
    "mmap", "array", "struct", "ctypes", "unicodedata", "stringprep",
    "readline", "rlcompleter", "cmd", "shlex", "tkinter", "turtle",
    "pydoc", "doctest", "unittest", "venv", "ensurepip", "zipapp",
    "trace", "tabnanny", "compileall", "py_compile", "pyclbr",
    "tokenize", "keyword", "token", "string", "textwrap", "abc", "types",
    "numbers", "cmath", "bisect", "heapq", "graphlib", "traceback",
    "warnings", "atexit",
];

/// Partition of requested packages after the installation phase.
/// A package appears in exactly one of the two sequences.
#[derive(Debug, Clone, Default)]
pub struct InstallationOutcome {
    pub installed: Vec<String>,
    pub failed: Vec<String>,
}

/// Installs packages via pip, memoising names confirmed present for the
/// lifetime of the installer.
pub struct PackageInstaller {
    python: PathBuf,
    timeout_secs: u64,
    /// Override for the install command (program + leading args); the
    /// package name is appended. Used by tests and alternative package
    /// managers (e.g. `uv pip install`).
    install_command: Option<(String, Vec<String>)>,
    memo: Mutex<HashSet<String>>,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl PackageInstaller {
    pub fn new(runtime: &RuntimeConfig) -> Self {
        Self {
            python: runtime.python.clone(),
            timeout_secs: runtime.pip_timeout_secs,
            install_command: None,
            memo: Mutex::new(HashSet::new()),
            locks: Mutex::new(HashMap::new()),
        }
    }

    /// Replace the pip invocation. The package name is appended to `args`.
    pub fn with_install_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.install_command = Some((program.into(), args));
        self
    }

    /// Install every package not already confirmed present, in first-seen
    /// order. Failures are recorded and the loop continues.
    pub fn install_all(&self, packages: &[ResolvedPackage]) -> InstallationOutcome {
        let mut outcome = InstallationOutcome::default();
        for pkg in packages {
            if self.install_one(&pkg.resolved) {
                outcome.installed.push(pkg.resolved.clone());
            } else {
                outcome.failed.push(pkg.resolved.clone());
            }
        }
        outcome
    }

    fn install_one(&self, name: &str) -> bool {
        if self.memo.lock().expect("memo lock").contains(name) {
            return true;
        }
        if STDLIB.contains(&name) {
            self.memo.lock().expect("memo lock").insert(name.to_string());
            return true;
        }

        // One pip at a time per package name; concurrent requests for
        // different packages proceed in parallel.
        let lock = {
            let mut locks = self.locks.lock().expect("locks lock");
            locks
                .entry(name.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        let _guard = lock.lock().expect("package lock");

        // Another request may have finished this install while we waited.
        if self.memo.lock().expect("memo lock").contains(name) {
            return true;
        }

        tracing::info!(package = %name, "installing package");
        let mut cmd = match &self.install_command {
            Some((program, args)) => {
                let mut c = Command::new(program);
                c.args(args);
                c
            }
            None => {
                let mut c = Command::new(&self.python);
                c.args(["-m", "pip", "install"]);
                c
            }
        };
        cmd.arg(name)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = match cmd.spawn() {
            Ok(child) => child,
            Err(e) => {
                tracing::warn!(package = %name, error = %e, "failed to spawn installer");
                return false;
            }
        };

        match wait_with_timeout(&mut child, self.timeout_secs) {
            Ok(outcome) if outcome.timed_out => {
                tracing::warn!(package = %name, "install timed out");
                false
            }
            Ok(outcome) if outcome.exit_code == 0 => {
                self.memo.lock().expect("memo lock").insert(name.to_string());
                tracing::info!(package = %name, "installed");
                true
            }
            Ok(outcome) => {
                tracing::warn!(
                    package = %name,
                    exit_code = outcome.exit_code,
                    stderr = %outcome.stderr.trim(),
                    "install failed"
                );
                false
            }
            Err(e) => {
                tracing::warn!(package = %name, error = %e, "install wait failed");
                false
            }
        }
    }
}
