//! Execute submitted Python source end to end: extract dependencies,
//! resolve and install packages, run the program in an ephemeral working
//! tree, and harvest generated media artifacts.
//!
//! The single entry point is [`Executor::execute`]. It never panics and
//! never returns an error across the boundary: installation failures,
//! program faults and harvest misses are all folded into the
//! [`ExecutionResult`] it returns, so the (external) service layer always
//! receives a well-formed value.

use pybox_core::config::{OutputConfig, RenderConfig, RuntimeConfig};
use pybox_core::error::ExecutorError;
pub use pybox_core::result::ExecutionResult;
use pybox_sandbox::install::PackageInstaller;
use pybox_sandbox::resolve::PackageResolver;
use pybox_sandbox::workdir::WorkingTree;
use pybox_sandbox::{deps, harvest, runner};
use std::path::PathBuf;
use std::time::Instant;

/// Orchestrates the pipeline stages for one or more requests.
///
/// The only cross-request state is the installer's memo of packages
/// already confirmed present. `Executor` is `Send + Sync`; concurrent
/// requests each get their own working tree and never share a current
/// directory.
pub struct Executor {
    runtime: RuntimeConfig,
    render: RenderConfig,
    output_dir: PathBuf,
    resolver: PackageResolver,
    installer: PackageInstaller,
}

impl Default for Executor {
    fn default() -> Self {
        Self::new()
    }
}

impl Executor {
    /// Executor configured from the environment (PYBOX_* variables).
    pub fn new() -> Self {
        let runtime = RuntimeConfig::from_env();
        let installer = PackageInstaller::new(&runtime);
        Self {
            runtime,
            render: RenderConfig::from_env(),
            output_dir: OutputConfig::from_env().output_dir,
            resolver: PackageResolver::new(),
            installer,
        }
    }

    /// Override the durable artifact output directory.
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    /// Replace the package resolver (e.g. with extra table entries).
    pub fn with_resolver(mut self, resolver: PackageResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Replace the pip invocation used by the installer. The package name
    /// is appended to `args`.
    pub fn with_install_command(mut self, program: impl Into<String>, args: Vec<String>) -> Self {
        self.installer = PackageInstaller::new(&self.runtime).with_install_command(program, args);
        self
    }

    /// Default execution timeout for callers that pass none of their own.
    pub fn default_timeout_secs(&self) -> u64 {
        self.runtime.default_timeout_secs
    }

    /// Run `source` with a hard `timeout_secs` bound on the execution
    /// phase. Installation is gated first: if any dependency fails to
    /// install, the program is never run and the result names the failing
    /// packages. The per-request working tree is removed on every exit
    /// path.
    pub fn execute(&self, source: &str, timeout_secs: u64, render_augment: bool) -> ExecutionResult {
        let start = Instant::now();

        let raw = deps::extract(source);
        let resolved = self.resolver.resolve_all(&raw);
        tracing::info!(
            dependencies = resolved.len(),
            render_augment,
            "request accepted"
        );

        let outcome = self.installer.install_all(&resolved);
        if !outcome.failed.is_empty() {
            let err = ExecutorError::DependencyInstall {
                packages: outcome.failed.clone(),
            };
            tracing::warn!(%err, "skipping execution");
            let mut result =
                ExecutionResult::failure(err.to_string(), start.elapsed().as_secs_f64());
            result.installed = outcome.installed;
            result.failed = outcome.failed;
            return result;
        }

        let tree = match WorkingTree::create() {
            Ok(tree) => tree,
            Err(e) => {
                let err = ExecutorError::Setup(format!("{e:#}"));
                let mut result =
                    ExecutionResult::failure(err.to_string(), start.elapsed().as_secs_f64());
                result.installed = outcome.installed;
                return result;
            }
        };

        let run = runner::run(
            &self.runtime.python,
            &tree,
            source,
            render_augment,
            timeout_secs,
            &self.render,
        );

        let result = match run {
            Err(err) => {
                let mut result =
                    ExecutionResult::failure(err.to_string(), start.elapsed().as_secs_f64());
                result.installed = outcome.installed;
                result
            }
            Ok(out) if out.timed_out => {
                let err = ExecutorError::Timeout { timeout_secs };
                let mut result = ExecutionResult::failure(
                    join_nonempty(&err.to_string(), &out.stderr),
                    start.elapsed().as_secs_f64(),
                );
                result.stdout = out.stdout;
                result.installed = outcome.installed;
                result
            }
            Ok(out) if !out.succeeded() => {
                let err = ExecutorError::ProgramFault {
                    message: format!("program exited with status {}", out.exit_code),
                };
                let mut result = ExecutionResult::failure(
                    join_nonempty(&err.to_string(), &out.stderr),
                    start.elapsed().as_secs_f64(),
                );
                result.stdout = out.stdout;
                result.installed = outcome.installed;
                result
            }
            Ok(out) => {
                let artifacts = if render_augment {
                    self.harvest_one(tree.path())
                } else {
                    Vec::new()
                };
                ExecutionResult {
                    success: true,
                    stdout: out.stdout,
                    stderr: out.stderr,
                    elapsed_seconds: start.elapsed().as_secs_f64(),
                    installed: outcome.installed,
                    failed: Vec::new(),
                    artifacts,
                }
            }
        };

        // `tree` drops here: the working tree is gone on every path.
        drop(tree);
        tracing::info!(
            success = result.success,
            elapsed = result.elapsed_seconds,
            artifacts = result.artifacts.len(),
            "request finished"
        );
        result
    }

    /// Harvest the canonical artifact, if any. An empty harvest is not an
    /// error — the result simply carries no artifacts.
    fn harvest_one(&self, tree: &std::path::Path) -> Vec<String> {
        let discovered = harvest::discover(tree);
        let Some(selected) = harvest::select(&discovered) else {
            tracing::info!("no playable artifact found");
            return Vec::new();
        };
        match harvest::store(selected, &self.output_dir) {
            Ok(name) => vec![name],
            Err(e) => {
                tracing::warn!(error = %format!("{e:#}"), "failed to store artifact");
                Vec::new()
            }
        }
    }
}

fn join_nonempty(head: &str, tail: &str) -> String {
    if tail.trim().is_empty() {
        head.to_string()
    } else {
        format!("{head}\n{tail}")
    }
}
