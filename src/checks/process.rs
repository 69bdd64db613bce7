//! Blocking process runner with a timeout
//!
//! Runs one command to completion, capturing its output. stdout and stderr are
//! drained on helper threads while the child runs, so a process that writes
//! more than a pipe buffer's worth of output cannot stall waiting for us.

use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::{debug, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Outcome of running one external command
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommandResult {
    /// Program name (first argv element)
    pub name: String,
    /// Full command line, space separated
    pub command: String,
    pub cwd: String,
    /// Exit code; absent on spawn failure, timeout, or death by signal
    pub return_code: Option<i32>,
    pub duration_secs: f64,
    /// Trimmed standard output
    pub stdout: String,
    /// Trimmed standard error, or the reason the command never ran
    pub stderr: String,
    pub timed_out: bool,
}

impl CommandResult {
    /// Whether the command exited with status 0
    pub fn passed(&self) -> bool {
        self.return_code == Some(0)
    }

    pub(crate) fn not_run(argv: &[String], cwd: &Path, error: String) -> Self {
        Self {
            name: argv.first().cloned().unwrap_or_default(),
            command: argv.join(" "),
            cwd: cwd.display().to_string(),
            return_code: None,
            duration_secs: 0.0,
            stdout: String::new(),
            stderr: error,
            timed_out: false,
        }
    }
}

/// Run `argv` in `cwd`, killing it after `timeout_secs` (0 = no timeout).
///
/// Never fails: spawn errors and timeouts are reported through the result.
pub fn run_command(argv: &[String], cwd: &Path, timeout_secs: u64) -> CommandResult {
    let Some((program, args)) = argv.split_first() else {
        return CommandResult::not_run(argv, cwd, "Empty command".to_string());
    };

    debug!("Running {} {:?} in {}", program, args, cwd.display());

    let started = Instant::now();
    let mut child = match Command::new(program)
        .args(args)
        .current_dir(cwd)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
    {
        Ok(child) => child,
        Err(e) => {
            let reason = if e.kind() == std::io::ErrorKind::NotFound {
                format!("{} not found. Please install it first.", program)
            } else {
                format!("Failed to run {}: {}", program, e)
            };
            warn!("{}", reason);
            return CommandResult::not_run(argv, cwd, reason);
        }
    };

    let stdout_reader = drain(child.stdout.take());
    let stderr_reader = drain(child.stderr.take());

    let timeout = (timeout_secs > 0).then(|| Duration::from_secs(timeout_secs));
    let waited = wait_with_timeout(&mut child, timeout);

    let (return_code, timed_out, stdout, stderr) = match waited {
        Wait::Exited(status) => (
            status.code(),
            false,
            join_reader(stdout_reader),
            join_reader(stderr_reader),
        ),
        // Grandchildren may still hold the pipes open, so the readers are
        // detached rather than joined
        Wait::TimedOut => {
            warn!("{} timed out after {}s", program, timeout_secs);
            let note = format!("{} timed out after {}s", program, timeout_secs);
            (None, true, String::new(), note)
        }
        Wait::Failed(e) => {
            warn!("Failed to wait for {}: {}", program, e);
            (None, false, String::new(), format!("Failed to wait for {}: {}", program, e))
        }
    };
    let duration_secs = started.elapsed().as_secs_f64();

    debug!(
        "{} finished in {:.2}s with code {:?}",
        program, duration_secs, return_code
    );

    CommandResult {
        name: program.clone(),
        command: argv.join(" "),
        cwd: cwd.display().to_string(),
        return_code,
        duration_secs,
        stdout: stdout.trim().to_string(),
        stderr: stderr.trim().to_string(),
        timed_out,
    }
}

enum Wait {
    Exited(ExitStatus),
    TimedOut,
    Failed(std::io::Error),
}

/// Poll the child until it exits or the deadline passes
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> Wait {
    let Some(timeout) = timeout else {
        return match child.wait() {
            Ok(status) => Wait::Exited(status),
            Err(e) => Wait::Failed(e),
        };
    };

    let start = Instant::now();
    loop {
        match child.try_wait() {
            Ok(Some(status)) => return Wait::Exited(status),
            Ok(None) => {
                if start.elapsed() > timeout {
                    let _ = child.kill();
                    let _ = child.wait();
                    return Wait::TimedOut;
                }
                thread::sleep(POLL_INTERVAL);
            }
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Wait::Failed(e);
            }
        }
    }
}

fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> Option<JoinHandle<Vec<u8>>> {
    pipe.map(|mut pipe| {
        thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = pipe.read_to_end(&mut buf);
            buf
        })
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> String {
    handle
        .and_then(|h| h.join().ok())
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
        .unwrap_or_default()
}

/// The last `n` lines of `text`
pub fn tail_lines(text: &str, n: usize) -> String {
    let lines: Vec<&str> = text.lines().collect();
    let start = lines.len().saturating_sub(n);
    lines[start..].join("\n")
}
