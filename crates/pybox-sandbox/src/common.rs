//! Shared child-process plumbing for the installer and the runner.

use anyhow::Result;
use std::io::Read;
use std::process::Child;
use std::thread;
use std::time::{Duration, Instant};

/// Poll interval for the wait loop in milliseconds.
pub const POLL_INTERVAL_MS: u64 = 100;

/// Outcome of waiting on a child with a deadline.
#[derive(Debug)]
pub struct WaitOutcome {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
    /// True when the child was killed for exceeding the timeout.
    pub timed_out: bool,
}

/// Wait for a child process with a hard wall-clock timeout.
///
/// Reads stdout/stderr in background threads while the process runs.
/// Without this, a child writing large output (>64KB pipe buffer) would
/// block on write, and we'd deadlock waiting for the child to exit.
/// On timeout the child is killed and reaped; whatever output was produced
/// before the kill is still returned.
pub fn wait_with_timeout(child: &mut Child, timeout_secs: u64) -> Result<WaitOutcome> {
    let start = Instant::now();
    let timeout = Duration::from_secs(timeout_secs);
    let check_interval = Duration::from_millis(POLL_INTERVAL_MS);

    let stdout_handle = child.stdout.take().map(|mut out| {
        thread::spawn(move || {
            let mut s = String::new();
            let _ = out.read_to_string(&mut s);
            s
        })
    });
    let stderr_handle = child.stderr.take().map(|mut err| {
        thread::spawn(move || {
            let mut s = String::new();
            let _ = err.read_to_string(&mut s);
            s
        })
    });

    loop {
        match child.try_wait() {
            Ok(Some(status)) => {
                let stdout = stdout_handle
                    .map(|h| h.join().unwrap_or_default())
                    .unwrap_or_default();
                let stderr = stderr_handle
                    .map(|h| h.join().unwrap_or_default())
                    .unwrap_or_default();
                return Ok(WaitOutcome {
                    stdout,
                    stderr,
                    exit_code: status.code().unwrap_or(-1),
                    timed_out: false,
                });
            }
            Ok(None) => {}
            Err(e) => {
                let _ = stdout_handle.map(|h| h.join());
                let _ = stderr_handle.map(|h| h.join());
                return Err(anyhow::anyhow!("Failed to wait for process: {}", e));
            }
        }

        if start.elapsed() > timeout {
            let _ = child.kill();
            let _ = child.wait();
            let stdout = stdout_handle
                .map(|h| h.join().unwrap_or_default())
                .unwrap_or_default();
            let stderr = stderr_handle
                .map(|h| h.join().unwrap_or_default())
                .unwrap_or_default();
            return Ok(WaitOutcome {
                stdout,
                stderr,
                exit_code: -1,
                timed_out: true,
            });
        }

        thread::sleep(check_interval);
    }
}
