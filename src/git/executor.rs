// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Process boundary to the system `git` binary.

use crate::error::{CsError, GitError, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

/// Runs git with an argument vector and returns its stdout.
///
/// Arguments are passed to the process directly, never through a shell.
#[cfg_attr(test, mockall::automock)]
pub trait GitExecutor: Send + Sync {
    /// Run `git <args>` and return stdout on success.
    fn run(&self, args: &[String]) -> Result<String>;
}

/// Executor that calls the real git binary inside a working directory.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
}

impl SystemGit {
    /// Create an executor rooted at `workdir`.
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    /// Create an executor rooted at the current directory.
    pub fn current_dir() -> Result<Self> {
        let dir = std::env::current_dir()?;
        Ok(Self::new(dir))
    }

    /// Working directory of the executor.
    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl GitExecutor for SystemGit {
    fn run(&self, args: &[String]) -> Result<String> {
        let command = command_name(args);
        tracing::debug!(?args, workdir = ?self.workdir, "Running git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.workdir)
            .output()
            .map_err(|e| {
                CsError::Git(GitError::CommandFailed {
                    command: command.clone(),
                    message: format!("failed to run git: {}", e),
                })
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(CsError::Git(GitError::CommandFailed {
                command,
                message: stderr.trim().to_string(),
            }));
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

/// First argument after any leading `-c key=value` overrides.
fn command_name(args: &[String]) -> String {
    let mut rest = args;
    while let [flag, _, tail @ ..] = rest {
        if flag != "-c" {
            break;
        }
        rest = tail;
    }
    rest.first().cloned().unwrap_or_default()
}
