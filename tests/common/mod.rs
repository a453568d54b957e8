// Author: Eshan Roy
// SPDX-License-Identifier: MIT

//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::path::Path;

use commitsense::git::{GitCommands, SystemGit};
use git2::{Repository, Signature};

/// A throwaway repository with one initial commit.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let repo = Repository::init(dir.path()).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }

        let test_repo = Self { dir, repo };
        test_repo.write("README.md", "# fixture\n");
        test_repo.initial_commit();
        test_repo
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Write a file relative to the work tree, creating directories.
    pub fn write(&self, relative: &str, content: &str) {
        let path = self.dir.path().join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create directories");
        }
        std::fs::write(path, content).expect("Failed to write file");
    }

    /// Command surface rooted at this repository.
    pub fn git(&self) -> GitCommands {
        GitCommands::new(SystemGit::new(self.dir.path()))
    }

    /// Subject line of HEAD.
    pub fn head_subject(&self) -> String {
        let head = self.repo.head().unwrap().peel_to_commit().unwrap();
        head.summary().unwrap_or_default().to_string()
    }

    fn initial_commit(&self) {
        let mut index = self.repo.index().unwrap();
        index.add_path(Path::new("README.md")).unwrap();
        index.write().unwrap();
        let tree_id = index.write_tree().unwrap();
        let tree = self.repo.find_tree(tree_id).unwrap();
        let sig = Signature::now("Test User", "test@example.com").unwrap();
        self.repo
            .commit(Some("HEAD"), &sig, &sig, "chore: initial commit", &tree, &[])
            .unwrap();
    }
}
