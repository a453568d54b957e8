// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git integration module.
//!
//! Repository discovery goes through git2; status, staging, diffs and
//! commits go through the git binary behind [`GitExecutor`].

mod commands;
pub mod diff;
mod executor;
mod repo;
pub mod sanitize;
pub mod status;

pub use commands::GitCommands;
pub use diff::{diff_summary, FileStat, StagedChanges};
pub use executor::{GitExecutor, SystemGit};
pub use repo::Repository;
pub use sanitize::{commit_command_line, escape_commit_message, sanitize_path};
pub use status::{FileEntry, WorkingTreeStatus};

#[cfg(test)]
pub use executor::MockGitExecutor;
