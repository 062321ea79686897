// Copyright (c) 2026 - present Codewise contributors
// SPDX-License-Identifier: MIT

//! Running the git executable
//!
//! Every query the collector makes goes through [`GitRunner`], always against
//! an explicit repository path (`git -C <repo> ...`). The production runner,
//! [`GitCli`], bounds each invocation with a timeout and kills the child when
//! it elapses.

use std::io::{ErrorKind, Read};
use std::path::Path;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::error::GitError;

/// Default upper bound for a single git invocation
pub const DEFAULT_GIT_TIMEOUT: Duration = Duration::from_secs(120);

const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Something that can run a git subcommand against a repository and return
/// its standard output.
pub trait GitRunner {
    /// Run `git -C <repo> <args...>` and return stdout.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotInstalled`] when git cannot be spawned,
    /// [`GitError::CommandFailed`] for a non-zero exit and
    /// [`GitError::TimedOut`] when the invocation exceeds its time budget.
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError>;
}

impl<T: GitRunner + ?Sized> GitRunner for &T {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        (**self).run(repo, args)
    }
}

/// Runs the real `git` binary as a child process
#[derive(Debug, Clone)]
pub struct GitCli {
    program: String,
    timeout: Duration,
}

impl Default for GitCli {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeout: DEFAULT_GIT_TIMEOUT,
        }
    }
}

impl GitCli {
    /// Create a runner for `git` on PATH with the default timeout
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different executable (mostly useful for tests)
    #[must_use]
    pub fn with_program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    /// Set the per-invocation timeout
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// The configured per-invocation timeout
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn spawn(&self, repo: &Path, args: &[&str]) -> Result<Child, GitError> {
        Command::new(&self.program)
            .arg("-C")
            .arg(repo)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => GitError::NotInstalled {
                    program: self.program.clone(),
                },
                _ => GitError::Io {
                    path: repo.to_path_buf(),
                    source: e,
                },
            })
    }
}

impl GitRunner for GitCli {
    fn run(&self, repo: &Path, args: &[&str]) -> Result<String, GitError> {
        let joined = args.join(" ");
        debug!(repo = %repo.display(), args = %joined, "running git");

        let mut child = self.spawn(repo, args)?;

        // Drain both pipes on their own threads so a chatty child can never
        // block on a full pipe while we poll for exit.
        let stdout = child.stdout.take();
        let stderr = child.stderr.take();
        let stdout_reader = thread::spawn(move || read_pipe(stdout));
        let stderr_reader = thread::spawn(move || read_pipe(stderr));

        let status = wait_or_kill(&mut child, self.timeout).map_err(|e| GitError::Io {
            path: repo.to_path_buf(),
            source: e,
        })?;

        let Some(status) = status else {
            warn!(args = %joined, timeout_secs = self.timeout.as_secs(), "git timed out, killed");
            return Err(GitError::TimedOut {
                args: joined,
                timeout_secs: self.timeout.as_secs(),
            });
        };

        let stdout = stdout_reader.join().unwrap_or_default();
        let stderr = stderr_reader.join().unwrap_or_default();

        if !status.success() {
            return Err(GitError::CommandFailed {
                args: joined,
                status: status.to_string(),
                stderr: String::from_utf8_lossy(&stderr).trim().to_string(),
            });
        }

        Ok(String::from_utf8_lossy(&stdout).into_owned())
    }
}

fn read_pipe<R: Read>(pipe: Option<R>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(mut pipe) = pipe {
        let _ = pipe.read_to_end(&mut buf);
    }
    buf
}

/// Poll the child until it exits or `timeout` elapses (`Ok(None)`).
fn wait_with_timeout(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let started = Instant::now();
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if started.elapsed() >= timeout {
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Wait for the child; unless it exited in time it is killed and reaped.
fn wait_or_kill(child: &mut Child, timeout: Duration) -> std::io::Result<Option<ExitStatus>> {
    let result = wait_with_timeout(child, timeout);
    if !matches!(result, Ok(Some(_))) {
        let _ = child.kill();
        let _ = child.wait();
    }
    result
}
