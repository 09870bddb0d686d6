use crate::error::CheckError;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use termcolor::{Color, ColorSpec};

/// Named places in the output that can be styled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Default,
    PrjChanged,
    PrjRemote,
    PrjName,
    RepoName,
    BranchName,
    FileUpdated,
    RemoteTo,
    CommitTo,
    CommitInfo,
    CommitState,
    Bell,
    Reset,
}

impl Slot {
    pub const ALL: [Slot; 13] = [
        Slot::Default,
        Slot::PrjChanged,
        Slot::PrjRemote,
        Slot::PrjName,
        Slot::RepoName,
        Slot::BranchName,
        Slot::FileUpdated,
        Slot::RemoteTo,
        Slot::CommitTo,
        Slot::CommitInfo,
        Slot::CommitState,
        Slot::Bell,
        Slot::Reset,
    ];

    /// Key used for this slot in `theme.json`.
    pub fn key(self) -> &'static str {
        match self {
            Slot::Default => "default",
            Slot::PrjChanged => "prjchanged",
            Slot::PrjRemote => "prjremote",
            Slot::PrjName => "prjname",
            Slot::RepoName => "reponame",
            Slot::BranchName => "branchname",
            Slot::FileUpdated => "fileupdated",
            Slot::RemoteTo => "remoteto",
            Slot::CommitTo => "committo",
            Slot::CommitInfo => "commitinfo",
            Slot::CommitState => "commitstate",
            Slot::Bell => "bell",
            Slot::Reset => "reset",
        }
    }

    pub fn from_key(key: &str) -> Option<Slot> {
        Slot::ALL.into_iter().find(|slot| slot.key() == key)
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// What a slot renders as: a colour change, or a raw control string such
/// as the terminal bell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Style {
    Color(ColorSpec),
    Control(String),
}

#[derive(Debug, Clone)]
pub struct Theme {
    styles: [Style; 13],
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            styles: Slot::ALL.map(default_style),
        }
    }
}

impl Theme {
    /// A theme where every slot renders as nothing.
    pub fn plain() -> Self {
        Self {
            styles: Slot::ALL.map(|slot| match default_style(slot) {
                Style::Color(_) => Style::Color(ColorSpec::new()),
                Style::Control(_) => Style::Control(String::new()),
            }),
        }
    }

    /// Defaults, with any slots named in `path` replaced. A missing file
    /// leaves the defaults untouched.
    pub fn load(path: &Path) -> Result<Self, CheckError> {
        let mut theme = Self::default();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(theme),
            Err(e) => {
                return Err(CheckError::ThemeInvalid {
                    path: path.to_path_buf(),
                    message: e.to_string(),
                });
            }
        };

        let invalid = |message: String| CheckError::ThemeInvalid {
            path: path.to_path_buf(),
            message,
        };

        let overrides: HashMap<String, StyleOverride> =
            serde_json::from_str(&contents).map_err(|e| invalid(e.to_string()))?;

        for (key, value) in overrides {
            let slot = Slot::from_key(&key)
                .ok_or_else(|| invalid(format!("unknown slot '{key}'")))?;
            theme.set(slot, value.into_style().map_err(invalid)?);
        }

        Ok(theme)
    }

    pub fn get(&self, slot: Slot) -> &Style {
        &self.styles[slot.index()]
    }

    pub fn set(&mut self, slot: Slot, style: Style) {
        self.styles[slot.index()] = style;
    }

    /// The literal string for a control slot; empty for colour slots.
    pub fn control(&self, slot: Slot) -> &str {
        match self.get(slot) {
            Style::Control(s) => s,
            Style::Color(_) => "",
        }
    }
}

fn fg(code: u8) -> ColorSpec {
    let mut spec = ColorSpec::new();
    spec.set_fg(Some(Color::Ansi256(code)));
    spec
}

fn default_style(slot: Slot) -> Style {
    let spec = match slot {
        Slot::Default | Slot::BranchName => fg(15),
        Slot::PrjChanged => {
            let mut spec = fg(198);
            spec.set_bold(true);
            spec
        }
        // reverse video: the name sits on a light cyan block
        Slot::PrjRemote => {
            let mut spec = ColorSpec::new();
            spec.set_fg(Some(Color::Black))
                .set_bg(Some(Color::Ansi256(195)));
            spec
        }
        Slot::PrjName => fg(118),
        Slot::RepoName | Slot::FileUpdated => fg(222),
        Slot::RemoteTo | Slot::CommitInfo => fg(32),
        Slot::CommitTo => fg(177),
        Slot::CommitState => fg(198),
        Slot::Bell => return Style::Control("\x07".to_string()),
        Slot::Reset => return Style::Control("\x1b[2J\x1b[H".to_string()),
    };
    Style::Color(spec)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "lowercase")]
enum StyleOverride {
    Color {
        fg: Option<String>,
        bg: Option<String>,
        #[serde(default)]
        bold: bool,
        #[serde(default)]
        underline: bool,
        #[serde(default)]
        intense: bool,
    },
    Control(String),
}

impl StyleOverride {
    fn into_style(self) -> Result<Style, String> {
        match self {
            StyleOverride::Control(s) => Ok(Style::Control(s)),
            StyleOverride::Color {
                fg,
                bg,
                bold,
                underline,
                intense,
            } => {
                let parse = |name: Option<String>| -> Result<Option<Color>, String> {
                    name.map(|n| Color::from_str(&n).map_err(|e| e.to_string()))
                        .transpose()
                };
                let mut spec = ColorSpec::new();
                spec.set_fg(parse(fg)?)
                    .set_bg(parse(bg)?)
                    .set_bold(bold)
                    .set_underline(underline)
                    .set_intense(intense);
                Ok(Style::Color(spec))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_every_slot_has_a_unique_key() {
        for slot in Slot::ALL {
            assert_eq!(Slot::from_key(slot.key()), Some(slot));
        }
        assert_eq!(Slot::from_key("nope"), None);
    }

    #[test]
    fn test_plain_theme_is_empty() {
        let theme = Theme::plain();
        assert_eq!(theme.control(Slot::Bell), "");
        assert_eq!(theme.control(Slot::Reset), "");
        assert_eq!(theme.get(Slot::PrjChanged), &Style::Color(ColorSpec::new()));
    }

    #[test]
    fn test_missing_override_file_keeps_defaults() {
        let dir = TempDir::new().unwrap();
        let theme = Theme::load(&dir.path().join("theme.json")).unwrap();
        assert_eq!(theme.control(Slot::Bell), "\x07");
    }

    #[test]
    fn test_override_replaces_named_slots() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.json");
        fs::write(
            &path,
            r#"{
                "prjchanged": {"color": {"fg": "red", "bold": true}},
                "bell": {"control": ""}
            }"#,
        )
        .unwrap();

        let theme = Theme::load(&path).unwrap();
        let mut expected = ColorSpec::new();
        expected.set_fg(Some(Color::Red)).set_bold(true);
        assert_eq!(theme.get(Slot::PrjChanged), &Style::Color(expected));
        assert_eq!(theme.control(Slot::Bell), "");
        assert_eq!(theme.get(Slot::PrjName), Theme::default().get(Slot::PrjName));
    }

    #[test]
    fn test_override_rejects_unknown_slot_and_colour() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("theme.json");

        fs::write(&path, r#"{"sparkle": {"control": "*"}}"#).unwrap();
        let err = Theme::load(&path).unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("sparkle"));

        fs::write(&path, r#"{"default": {"color": {"fg": "mauve-ish"}}}"#).unwrap();
        assert!(matches!(
            Theme::load(&path),
            Err(CheckError::ThemeInvalid { .. })
        ));
    }
}
