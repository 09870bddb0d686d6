use crate::error::CheckError;
use crate::runner::git_exec;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

static SHORT_STATUS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(.{2}) (.*)").expect("valid status regex"));
static CURRENT_BRANCH: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\* (.*)$").expect("valid branch regex"));

/// One locally modified, added, deleted or untracked file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Change {
    /// Two-character `git status -s` code, e.g. ` M` or `??`.
    pub status: String,
    pub path: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RemoteStatus {
    pub name: String,
    /// `--oneline` summaries of commits on the branch but not the remote.
    pub to_push: Vec<String>,
    /// `--oneline` summaries of commits on the remote but not the branch.
    pub to_pull: Vec<String>,
}

/// Which way commits need to travel between a branch and its remote.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Push,
    Pull,
}

impl Direction {
    pub const BOTH: [Direction; 2] = [Direction::Push, Direction::Pull];

    pub fn label(self) -> &'static str {
        match self {
            Direction::Push => "Push",
            Direction::Pull => "Pull",
        }
    }
}

impl RemoteStatus {
    pub fn commits(&self, direction: Direction) -> &[String] {
        match direction {
            Direction::Push => &self.to_push,
            Direction::Pull => &self.to_pull,
        }
    }
}

/// Everything known about one branch of one repository after a check.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BranchStatus {
    pub branch: String,
    pub changes: Vec<Change>,
    pub remotes: Vec<RemoteStatus>,
}

impl BranchStatus {
    pub fn has_remotes(&self) -> bool {
        !self.remotes.is_empty()
    }

    pub fn push_count(&self) -> usize {
        self.remotes.iter().map(|r| r.to_push.len()).sum()
    }

    pub fn pull_count(&self) -> usize {
        self.remotes.iter().map(|r| r.to_pull.len()).sum()
    }

    /// Unpushed or unpulled commits exist. Local file changes don't count.
    pub fn action_needed(&self) -> bool {
        self.push_count() > 0 || self.pull_count() > 0
    }

    /// Local changes or pending commits in either direction.
    pub fn has_changes(&self) -> bool {
        !self.changes.is_empty() || self.action_needed()
    }
}

/// Files changed in the working copy, minus those whose status line
/// matches `ignore`.
pub fn local_changes(
    repo: &Path,
    ignore: &Regex,
    include_untracked: bool,
) -> Result<Vec<Change>, CheckError> {
    let args = if include_untracked {
        "status -s"
    } else {
        "status -s -uno"
    };
    let output = git_exec(repo, args)?;
    Ok(parse_short_status(&output, ignore))
}

pub fn remotes(repo: &Path) -> Result<Vec<String>, CheckError> {
    let output = git_exec(repo, "remote")?;
    Ok(non_empty_lines(&output))
}

pub fn has_remote_branch(repo: &Path, remote: &str, branch: &str) -> Result<bool, CheckError> {
    let output = git_exec(repo, "branch -r")?;
    Ok(contains_remote_branch(&output, remote, branch))
}

pub fn to_push(repo: &Path, remote: &str, branch: &str) -> Result<Vec<String>, CheckError> {
    commits_between(repo, remote, branch, &format!("{remote}/{branch}..{branch}"))
}

pub fn to_pull(repo: &Path, remote: &str, branch: &str) -> Result<Vec<String>, CheckError> {
    commits_between(repo, remote, branch, &format!("{branch}..{remote}/{branch}"))
}

/// One-line summaries of the commits in `range`; empty when `remote` has
/// no copy of `branch`.
fn commits_between(
    repo: &Path,
    remote: &str,
    branch: &str,
    range: &str,
) -> Result<Vec<String>, CheckError> {
    if !has_remote_branch(repo, remote, branch)? {
        return Ok(Vec::new());
    }
    let output = git_exec(repo, &format!("log {} --oneline", quoted(range)))?;
    Ok(non_empty_lines(&output))
}

/// The checked-out branch, or `None` when `git branch` marks none
/// (a repository without commits).
pub fn default_branch(repo: &Path) -> Result<Option<String>, CheckError> {
    let output = git_exec(repo, "branch")?;
    Ok(parse_current_branch(&output))
}

pub fn all_branches(repo: &Path) -> Result<Vec<String>, CheckError> {
    let output = git_exec(repo, "branch")?;
    Ok(parse_branch_list(&output))
}

pub fn update_remotes(repo: &Path) -> Result<(), CheckError> {
    git_exec(repo, "remote update")?;
    Ok(())
}

/// Runs every query needed to report on `branch`. Remotes are skipped for
/// an empty branch name since there is nothing to compare.
pub fn branch_status(
    repo: &Path,
    branch: &str,
    local_ignore: &Regex,
    include_untracked: bool,
) -> Result<BranchStatus, CheckError> {
    let changes = local_changes(repo, local_ignore, include_untracked)?;

    let mut remote_statuses = Vec::new();
    if !branch.is_empty() {
        for name in remotes(repo)? {
            let to_push = to_push(repo, &name, branch)?;
            let to_pull = to_pull(repo, &name, branch)?;
            remote_statuses.push(RemoteStatus {
                name,
                to_push,
                to_pull,
            });
        }
    }

    Ok(BranchStatus {
        branch: branch.to_string(),
        changes,
        remotes: remote_statuses,
    })
}

fn parse_short_status(output: &str, ignore: &Regex) -> Vec<Change> {
    output
        .split('\n')
        .filter(|line| !ignore.is_match(line))
        .filter_map(|line| SHORT_STATUS.captures(line))
        .map(|caps| Change {
            status: caps[1].to_string(),
            path: caps[2].to_string(),
        })
        .collect()
}

fn contains_remote_branch(output: &str, remote: &str, branch: &str) -> bool {
    let wanted = format!("{remote}/{branch}");
    output.lines().any(|line| {
        // `origin/HEAD -> origin/main` names origin/HEAD, not origin/main
        let name = line.trim().split(" -> ").next().unwrap_or_default();
        name == wanted
    })
}

fn parse_current_branch(output: &str) -> Option<String> {
    CURRENT_BRANCH
        .captures(output)
        .map(|caps| caps[1].trim_end_matches('\r').to_string())
}

fn parse_branch_list(output: &str) -> Vec<String> {
    output
        .lines()
        .map(|line| line.get(2..).unwrap_or_default().to_string())
        .collect()
}

fn non_empty_lines(output: &str) -> Vec<String> {
    output
        .split('\n')
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

fn quoted(arg: &str) -> String {
    shlex::try_quote(arg)
        .map(|q| q.into_owned())
        .unwrap_or_else(|_| arg.to_string())
}
