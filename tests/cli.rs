//! Integration tests for the gitcheck binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

fn git(dir: &Path, args: &[&str]) {
    let status = std::process::Command::new("git")
        .current_dir(dir)
        .args(args)
        .env("GIT_AUTHOR_NAME", "Test")
        .env("GIT_AUTHOR_EMAIL", "test@test.com")
        .env("GIT_COMMITTER_NAME", "Test")
        .env("GIT_COMMITTER_EMAIL", "test@test.com")
        .status()
        .expect("Failed to execute git");
    assert!(status.success(), "git {:?} failed", args);
}

/// A repository at `<base>/proj` with one committed, then modified, file.
fn modified_repo(base: &Path) {
    let repo = base.join("proj");
    fs::create_dir_all(&repo).unwrap();
    git(&repo, &["init", "-q"]);
    git(&repo, &["symbolic-ref", "HEAD", "refs/heads/main"]);
    fs::write(repo.join("README"), "hello").unwrap();
    git(&repo, &["config", "commit.gpgsign", "false"]);
    git(&repo, &["add", "README"]);
    git(&repo, &["commit", "-q", "-m", "Initial commit"]);
    fs::write(repo.join("README"), "changed").unwrap();
}

fn gitcheck(home: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("gitcheck").unwrap();
    cmd.env("GITCHECK_HOME", home.path());
    cmd
}

#[test]
fn test_no_color_output_has_no_escapes() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    modified_repo(work.path());

    gitcheck(&home)
        .args(["--no-color", "-v"])
        .arg(work.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("proj/main Local[To Commit:1]"))
        .stdout(predicate::str::contains("     |-- M README"))
        .stdout(predicate::str::contains("\x1b").not());
}

#[test]
fn test_quiet_run_over_clean_tree_prints_nothing() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();
    fs::create_dir_all(work.path().join("not-a-repo")).unwrap();

    gitcheck(&home)
        .args(["-q", "--no-color"])
        .arg(work.path())
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn test_init_email_twice_keeps_backup() {
    let home = TempDir::new().unwrap();

    gitcheck(&home)
        .arg("--init-email")
        .assert()
        .success()
        .stdout(predicate::str::contains("Please, modify config file located here"));
    assert!(home.path().join("mail.properties").is_file());
    assert!(!home.path().join("mail.properties.old").exists());

    gitcheck(&home).arg("--init-email").assert().success();
    assert!(home.path().join("mail.properties").is_file());
    assert!(home.path().join("mail.properties.old").is_file());
}

#[test]
fn test_email_without_config_exits_with_error() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    gitcheck(&home)
        .arg("-e")
        .arg(work.path())
        .assert()
        .code(1)
        .stderr(predicate::str::contains("mail.properties"));
}

#[test]
fn test_invalid_theme_is_fatal() {
    let home = TempDir::new().unwrap();
    let theme = r#"{"glitter": {"control": ""}}"#;
    fs::write(home.path().join("theme.json"), theme).unwrap();

    gitcheck(&home)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("glitter"));
}

#[test]
fn test_invalid_pattern_is_rejected() {
    let home = TempDir::new().unwrap();

    gitcheck(&home).args(["-i", "("]).assert().failure();
}

#[test]
fn test_unrepresentable_watch_interval_is_rejected() {
    let home = TempDir::new().unwrap();
    let work = TempDir::new().unwrap();

    for interval in ["1e30", "inf"] {
        gitcheck(&home)
            .args(["-w", interval])
            .arg(work.path())
            .assert()
            .code(2)
            .stderr(predicate::str::contains("not a valid number of seconds"));
    }
}
