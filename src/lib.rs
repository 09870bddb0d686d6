use regex::Regex;
use std::env;
use std::path::PathBuf;

pub mod commands;
pub mod error;
pub mod locator;
pub mod mail;
pub mod report;
pub mod runner;
pub mod status;
pub mod theme;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::CheckError;

/// Directory holding `mail.properties`, `result.html` and `theme.json`.
///
/// `$GITCHECK_HOME` wins when set, otherwise `~/Documents/.gitcheck`.
pub fn config_home() -> Result<PathBuf, CheckError> {
    if let Ok(dir) = env::var("GITCHECK_HOME") {
        if !dir.is_empty() {
            return Ok(PathBuf::from(dir));
        }
    }

    dirs::home_dir()
        .map(|home| home.join("Documents").join(".gitcheck"))
        .ok_or(CheckError::HomeDir)
}

/// Compiles a user-supplied pattern so that it only matches at the start
/// of the text, like the ignore options expect.
pub fn anchored_regex(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(&format!("^(?:{pattern})"))
}
