// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Git command wrappers for status, staging and committing.

use crate::error::{CommitError, CsError, GitError, Result};

use super::diff::{parse_numstat, FileStat, StagedChanges};
use super::executor::{GitExecutor, SystemGit};
use super::sanitize::{commit_command_line, sanitize_path};
use super::status::WorkingTreeStatus;

/// The version-control command surface.
///
/// Every path is sanitized before it reaches git.
pub struct GitCommands<E: GitExecutor = SystemGit> {
    executor: E,
}

impl<E: GitExecutor> GitCommands<E> {
    /// Create a command surface on top of an executor.
    pub fn new(executor: E) -> Self {
        Self { executor }
    }

    fn git(&self, args: &[&str]) -> Result<String> {
        let args: Vec<String> = args.iter().map(|a| a.to_string()).collect();
        self.executor.run(&args)
    }

    /// Run a command whose output lists paths, with non-ASCII bytes left unescaped.
    fn git_paths(&self, args: &[&str]) -> Result<String> {
        let mut full = vec!["-c", "core.quotePath=false"];
        full.extend_from_slice(args);
        self.git(&full)
    }

    /// Whether the executor runs inside a work tree.
    pub fn is_repository(&self) -> bool {
        self.git(&["rev-parse", "--is-inside-work-tree"])
            .map(|out| out.trim() == "true")
            .unwrap_or(false)
    }

    /// Staged and unstaged files.
    pub fn status(&self) -> Result<WorkingTreeStatus> {
        let output = self.git_paths(&["status", "--porcelain=v1", "--untracked-files=all"])?;
        Ok(WorkingTreeStatus::from_porcelain(&output))
    }

    /// Stage a single path.
    pub fn stage_file(&self, path: &str) -> Result<()> {
        let path = checked_path(path, "add")?;
        self.git(&["add", "--", &path])?;
        Ok(())
    }

    /// Remove a single path from the index, keeping the worktree copy.
    pub fn unstage_file(&self, path: &str) -> Result<()> {
        let path = checked_path(path, "restore")?;
        self.git(&["restore", "--staged", "--", &path])?;
        Ok(())
    }

    /// Stage every change in the work tree, including deletions.
    pub fn stage_all(&self) -> Result<()> {
        self.git(&["add", "-A"])?;
        Ok(())
    }

    /// Unified diff of the index.
    pub fn staged_diff(&self) -> Result<String> {
        self.git_paths(&["diff", "--cached"])
    }

    /// Per-file counts of the index.
    pub fn staged_numstat(&self) -> Result<Vec<FileStat>> {
        let output = self.git_paths(&["diff", "--cached", "--numstat"])?;
        Ok(parse_numstat(&output))
    }

    /// Counts and patch of the index together.
    pub fn staged_changes(&self) -> Result<StagedChanges> {
        Ok(StagedChanges {
            files: self.staged_numstat()?,
            patch: self.staged_diff()?,
        })
    }

    /// Commit the index with `message`. Returns git's summary line.
    pub fn commit(&self, message: &str) -> Result<String> {
        let message = message.trim();
        if message.is_empty() {
            return Err(CsError::Commit(CommitError::EmptyMessage));
        }

        tracing::debug!(command = %commit_command_line(message), "Creating commit");
        let output = self.git(&["commit", "-m", message])?;
        Ok(output.lines().next().unwrap_or_default().to_string())
    }
}

fn checked_path(path: &str, command: &str) -> Result<String> {
    let cleaned = sanitize_path(path);
    if cleaned.is_empty() {
        return Err(CsError::Git(GitError::CommandFailed {
            command: command.to_string(),
            message: format!("refusing unsafe or empty path '{}'", path),
        }));
    }
    if cleaned != path {
        tracing::warn!(original = path, sanitized = %cleaned, "Sanitized path before invoking git");
    }
    Ok(cleaned)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::git::executor::MockGitExecutor;

    fn args_are(expected: &'static [&'static str]) -> impl Fn(&[String]) -> bool {
        move |args: &[String]| args.iter().map(String::as_str).eq(expected.iter().copied())
    }

    #[test]
    fn test_stage_file_strips_shell_metacharacters() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .withf(args_are(&["add", "--", "a rm -rf /.ts"]))
            .times(1)
            .returning(|_| Ok(String::new()));

        GitCommands::new(mock).stage_file("a; rm -rf /.ts").unwrap();
    }

    #[test]
    fn test_unstage_file_strips_traversal() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .withf(args_are(&["restore", "--staged", "--", "etc/passwd"]))
            .times(1)
            .returning(|_| Ok(String::new()));

        GitCommands::new(mock).unstage_file("../../etc/passwd").unwrap();
    }

    #[test]
    fn test_stage_empty_path_never_runs_git() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run().times(0);

        let err = GitCommands::new(mock).stage_file(";;&&").unwrap_err();
        assert!(matches!(err, CsError::Git(GitError::CommandFailed { .. })));
    }

    #[test]
    fn test_commit_passes_message_verbatim() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .withf(args_are(&["commit", "-m", "feat(auth): say \"hi\" for $5"]))
            .times(1)
            .returning(|_| Ok("[main abc1234] feat(auth): say \"hi\" for $5\n".to_string()));

        let summary = GitCommands::new(mock)
            .commit("feat(auth): say \"hi\" for $5\n")
            .unwrap();
        assert!(summary.starts_with("[main abc1234]"));
    }

    #[test]
    fn test_commit_rejects_empty_message() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run().times(0);

        let err = GitCommands::new(mock).commit("   ").unwrap_err();
        assert!(matches!(err, CsError::Commit(CommitError::EmptyMessage)));
    }

    #[test]
    fn test_commit_failure_is_surfaced() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run().returning(|_| {
            Err(CsError::Git(GitError::CommandFailed {
                command: "commit".to_string(),
                message: "nothing to commit".to_string(),
            }))
        });

        let err = GitCommands::new(mock).commit("fix: x").unwrap_err();
        assert!(err.to_string().contains("nothing to commit"));
    }

    #[test]
    fn test_staged_changes() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .withf(args_are(&["-c", "core.quotePath=false", "diff", "--cached", "--numstat"]))
            .returning(|_| Ok("4\t1\tsrc/lib.rs\n".to_string()));
        mock.expect_run()
            .withf(args_are(&["-c", "core.quotePath=false", "diff", "--cached"]))
            .returning(|_| Ok("diff --git a/src/lib.rs b/src/lib.rs\n".to_string()));

        let changes = GitCommands::new(mock).staged_changes().unwrap();
        assert_eq!(changes.files.len(), 1);
        assert_eq!(changes.lines_added(), 4);
        assert!(changes.patch.starts_with("diff --git"));
    }

    #[test]
    fn test_status_and_repository_check() {
        let mut mock = MockGitExecutor::new();
        mock.expect_run()
            .withf(args_are(&["rev-parse", "--is-inside-work-tree"]))
            .returning(|_| Ok("true\n".to_string()));
        mock.expect_run()
            .withf(args_are(&[
                "-c",
                "core.quotePath=false",
                "status",
                "--porcelain=v1",
                "--untracked-files=all",
            ]))
            .returning(|_| Ok("M  a.rs\n?? b.rs\n".to_string()));

        let git = GitCommands::new(mock);
        assert!(git.is_repository());
        let status = git.status().unwrap();
        assert_eq!(status.staged.len(), 1);
        assert_eq!(status.unstaged.len(), 1);
    }
}
