//! sclang subprocess execution.
//!
//! The interpreter is run with its working directory forced to its own
//! install location and, on Linux, with `QT_QPA_PLATFORM=offscreen` so it can
//! run headless. Both output streams are captured. The wait loop polls with
//! `try_wait` and hard-kills the process when the timeout expires - the only
//! operation in this system allowed to block indefinitely is the interpreter,
//! so it is the only one carrying a timeout.

use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

use crate::error::RenderError;
use crate::paths::SclangConfig;

/// Default render timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);

/// Captured outcome of one sclang invocation.
#[derive(Debug)]
pub struct SclangOutput {
    /// Process exit code, if the process exited on its own.
    /// Untrusted as a success signal; kept for display only.
    pub exit_code: Option<i32>,
    /// Captured stdout (the interpreter writes its diagnostics here).
    pub stdout: String,
    /// Captured stderr.
    pub stderr: String,
    /// True if the process was killed because the timeout expired.
    pub timed_out: bool,
}

impl SclangOutput {
    /// stdout and stderr concatenated, for error-marker scanning.
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            self.stdout.clone()
        } else {
            format!("{}\n{}", self.stdout, self.stderr)
        }
    }
}

/// Executes a prepared script with sclang.
///
/// Returns `Ok` even when the interpreter reports errors or the timeout
/// fires; only spawn/validation problems are `Err`. Classification of the
/// captured text is the caller's job.
pub fn run_sclang(
    config: &SclangConfig,
    script_path: &Path,
    timeout: Duration,
) -> Result<SclangOutput, RenderError> {
    config.validate()?;

    let mut cmd = Command::new(config.sclang_path());
    cmd.arg(script_path)
        .current_dir(config.working_dir())
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    // Headless operation: offscreen Qt platform on Linux. macOS runs without
    // a display on the cocoa platform; offscreen is not available there.
    if cfg!(target_os = "linux") {
        cmd.env("QT_QPA_PLATFORM", "offscreen");
    }

    let mut child = cmd.spawn().map_err(RenderError::SpawnFailed)?;

    // Drain both pipes on threads so a chatty interpreter cannot deadlock the
    // poll loop by filling a pipe buffer.
    let stdout_reader = spawn_pipe_reader(child.stdout.take());
    let stderr_reader = spawn_pipe_reader(child.stderr.take());

    let (exit_code, timed_out) = wait_with_timeout(&mut child, timeout)?;

    let stdout = join_pipe_reader(stdout_reader);
    let stderr = join_pipe_reader(stderr_reader);

    Ok(SclangOutput {
        exit_code,
        stdout,
        stderr,
        timed_out,
    })
}

fn spawn_pipe_reader<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<String>> {
    pipe.map(|mut pipe| {
        std::thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        })
    })
}

fn join_pipe_reader(handle: Option<JoinHandle<String>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Polls the child until exit or timeout. On timeout the process is killed
/// and reaped; `(None, true)` is returned.
fn wait_with_timeout(
    child: &mut Child,
    timeout: Duration,
) -> Result<(Option<i32>, bool), RenderError> {
    let start = Instant::now();

    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Ok((status.code(), false)),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Ok((None, true));
                }
                std::thread::sleep(Duration::from_millis(50));
            }
            Err(e) => return Err(RenderError::SpawnFailed(e)),
        }
    }
}
