use std::path::PathBuf;

/// Everything that can go wrong while checking repositories.
///
/// Variants are split into two tiers: configuration problems that end the
/// process, and per-pass failures (mostly from `git`) that only abort the
/// current pass. See [`CheckError::is_fatal`].
#[derive(Debug, thiserror::Error)]
pub enum CheckError {
    #[error("Failed running {command}: {stderr}")]
    ExternalTool { command: String, stderr: String },

    #[error("Failed to execute {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid command line: {command}")]
    InvalidCommand { command: String },

    #[error("IO error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error("Unable to open mail config {}: {source}", path.display())]
    MailConfigMissing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to load {}, invalid format: {source}", path.display())]
    MailConfigInvalid {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unable to create {}: {source}", path.display())]
    ConfigDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unable to create {}: {source}", path.display())]
    ConfigWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not back up email properties file {}: {source}", path.display())]
    Backup {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid theme file {}: {message}", path.display())]
    ThemeInvalid { path: PathBuf, message: String },

    #[error("Could not find your home directory; set GITCHECK_HOME instead")]
    HomeDir,
}

impl CheckError {
    /// Fatal errors end the process; the rest only abort the current pass.
    pub fn is_fatal(&self) -> bool {
        match self {
            CheckError::ExternalTool { .. }
            | CheckError::Spawn { .. }
            | CheckError::InvalidCommand { .. }
            | CheckError::Io { .. } => false,
            CheckError::MailConfigMissing { .. }
            | CheckError::MailConfigInvalid { .. }
            | CheckError::ConfigDir { .. }
            | CheckError::ConfigWrite { .. }
            | CheckError::Backup { .. }
            | CheckError::ThemeInvalid { .. }
            | CheckError::HomeDir => true,
        }
    }
}
