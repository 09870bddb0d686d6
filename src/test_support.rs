//! Helpers for building throwaway git repositories in tests.
//!
//! Repositories are created by running the real `git` binary with a fixed
//! identity, so the same tool the checker shells out to builds the
//! fixtures.

use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

pub struct TestRepo {
    _dir: TempDir,
    path: PathBuf,
}

impl TestRepo {
    /// Initialise an empty repository named `name` whose unborn branch is `main`.
    pub fn init(name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        fs::create_dir_all(&path).unwrap();
        let repo = TestRepo { _dir: dir, path };
        repo.git(&["init", "-q"]);
        repo.git(&["symbolic-ref", "HEAD", "refs/heads/main"]);
        repo
    }

    /// Clone this repository into a fresh temporary directory.
    pub fn clone_to(&self, name: &str) -> Self {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(name);
        let source = self.path.to_string_lossy().into_owned();
        run_git(dir.path(), &["clone", "-q", source.as_str(), name]);
        TestRepo { _dir: dir, path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn write_file(&self, rel: &str, contents: &str) {
        fs::write(self.path.join(rel), contents).unwrap();
    }

    pub fn commit_file(&self, rel: &str, contents: &str, message: &str) {
        self.write_file(rel, contents);
        self.git(&["add", rel]);
        self.git(&["-c", "commit.gpgsign=false", "commit", "-q", "-m", message]);
    }

    pub fn git(&self, args: &[&str]) {
        run_git(&self.path, args);
    }
}

fn run_git(dir: &Path, args: &[&str]) {
    let output = Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .output()
        .expect("Failed to execute git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
}

/// Compile `pattern` the way the command line does.
pub fn anchored(pattern: &str) -> Regex {
    crate::anchored_regex(pattern).unwrap()
}
