use crate::error::CheckError;
use std::path::Path;
use std::process::Command;
use tracing::{debug, warn};

/// Runs `git -C <dir> <args>` and returns its stdout.
///
/// `args` is split like a shell would split it, so quoted arguments may
/// contain spaces. A non-zero exit status is reported as
/// [`CheckError::ExternalTool`] carrying git's stderr.
pub fn git_exec(dir: &Path, args: &str) -> Result<String, CheckError> {
    let command = format!("git -C \"{}\" {}", dir.display(), args);
    let tokens = shlex::split(args).ok_or_else(|| CheckError::InvalidCommand {
        command: command.clone(),
    })?;

    debug!("EXECUTE GIT COMMAND {:?}", tokens);

    let output = Command::new("git")
        .arg("-C")
        .arg(dir)
        .args(&tokens)
        .output()
        .map_err(|source| CheckError::Spawn {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        warn!(command = %command, stderr = %stderr, "git command failed");
        return Err(CheckError::ExternalTool { command, stderr });
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_failing_command_carries_stderr() {
        let dir = TempDir::new().unwrap();
        let err = git_exec(dir.path(), "rev-parse --verify \"no such ref\"").unwrap_err();
        match err {
            CheckError::ExternalTool { command, stderr } => {
                assert!(command.contains("rev-parse"));
                assert!(!stderr.is_empty());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_unbalanced_quotes_are_rejected() {
        let dir = TempDir::new().unwrap();
        let err = git_exec(dir.path(), "log \"unterminated").unwrap_err();
        assert!(matches!(err, CheckError::InvalidCommand { .. }));
    }

    #[test]
    fn test_successful_command_returns_stdout() {
        let dir = TempDir::new().unwrap();
        let out = git_exec(dir.path(), "--version").unwrap();
        assert!(out.starts_with("git version"));
    }
}
