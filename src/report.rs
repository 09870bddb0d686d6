use crate::status::{BranchStatus, Direction};
use crate::theme::{Slot, Style, Theme};
use std::io;
use std::path::{Path, PathBuf};
use termcolor::WriteColor;

/// How a repository's name is presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
    /// Local changes, or commits waiting to be pushed or pulled.
    Changed,
    /// Clean, but nothing to compare against.
    NoRemote,
    Clean,
}

impl Category {
    pub fn of(status: &BranchStatus) -> Self {
        if status.has_changes() {
            Category::Changed
        } else if !status.has_remotes() {
            Category::NoRemote
        } else {
            Category::Clean
        }
    }

    fn slot(self) -> Slot {
        match self {
            Category::Changed => Slot::PrjChanged,
            Category::NoRemote => Slot::PrjRemote,
            Category::Clean => Slot::PrjName,
        }
    }

    fn html_color(self) -> &'static str {
        match self {
            Category::Changed => "red",
            Category::NoRemote => "magenta",
            Category::Clean => "green",
        }
    }
}

/// Whether a branch is worth a line of output.
pub fn needs_display(status: &BranchStatus, quiet: bool) -> bool {
    status.has_changes() || !quiet
}

/// Name shown for `repo`: the full path if asked for, otherwise the path
/// relative to the first root containing it (the basename when the root
/// is the repository itself).
pub fn display_name(repo: &Path, roots: &[PathBuf], full_path: bool) -> String {
    if full_path {
        return repo.display().to_string();
    }

    for root in roots {
        if let Ok(rel) = repo.strip_prefix(root) {
            if rel.as_os_str().is_empty() {
                return repo
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_else(|| repo.display().to_string());
            }
            return rel.display().to_string();
        }
    }

    repo.display().to_string()
}

/// HTML fragment built up over one pass, plus what the email needs to
/// describe it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlReport {
    path: String,
    body: String,
    timestamp: Option<String>,
}

impl HtmlReport {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            body: "<ul>\n".to_string(),
            timestamp: None,
        }
    }

    pub fn push(&mut self, fragment: &str) {
        self.body.push_str(fragment);
    }

    /// Closes the list and stamps the report.
    pub fn finish(&mut self, timestamp: impl Into<String>) {
        let timestamp = timestamp.into();
        self.body
            .push_str(&format!("</ul>\n<p>Report created on {}</p>\n", timestamp));
        self.timestamp = Some(timestamp);
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn timestamp(&self) -> &str {
        self.timestamp.as_deref().unwrap_or_default()
    }

    /// Complete page, as saved to disk and mailed.
    pub fn to_document(&self) -> String {
        format!(
            "<html>\n<head>\n<h1>Gitcheck Report</h1>\n<h2>{}</h2>\n</head>\n<body>\n<p>{}</p>\n</body>\n</html>",
            escape_html(&self.path),
            self.body
        )
    }

    pub fn to_plain_text(&self) -> String {
        format!(
            "Gitcheck report for {} created on {}\n\n This file can be seen in html only.",
            self.path,
            self.timestamp()
        )
    }
}

pub struct Reporter<'a> {
    pub theme: &'a Theme,
    pub roots: &'a [PathBuf],
    pub verbose: bool,
    pub quiet: bool,
    pub full_path: bool,
}

impl Reporter<'_> {
    /// Renders `status` to `out` and appends it to `html` when it needs
    /// display. Returns whether commits are waiting to be pushed or pulled.
    pub fn report(
        &self,
        repo: &Path,
        status: &BranchStatus,
        out: &mut dyn WriteColor,
        html: &mut HtmlReport,
    ) -> io::Result<bool> {
        let action_needed = status.action_needed();
        if !needs_display(status, self.quiet) {
            return Ok(action_needed);
        }

        let name = display_name(repo, self.roots, self.full_path);
        let category = Category::of(status);

        self.write_summary(out, &name, category, status)?;
        html.push(&html_summary(&name, category, status));

        if self.verbose {
            self.write_details(out, status)?;
            html.push(&html_details(status));
        }

        Ok(action_needed)
    }

    fn write_summary(
        &self,
        out: &mut dyn WriteColor,
        name: &str,
        category: Category,
        status: &BranchStatus,
    ) -> io::Result<()> {
        self.paint(out, category.slot(), name)?;
        self.paint(out, Slot::Default, "/")?;
        self.paint(out, Slot::BranchName, &status.branch)?;
        write!(out, " ")?;

        if !status.changes.is_empty() {
            self.paint(out, Slot::RepoName, "Local")?;
            self.paint(out, Slot::Default, "[")?;
            self.paint(out, Slot::RemoteTo, "To Commit:")?;
            self.paint(out, Slot::Default, &format!("{}]", status.changes.len()))?;
        }

        for direction in Direction::BOTH {
            for remote in &status.remotes {
                let count = remote.commits(direction).len();
                if count == 0 {
                    continue;
                }
                write!(out, " ")?;
                self.paint(out, Slot::RepoName, &remote.name)?;
                self.paint(out, Slot::Default, "[")?;
                self.paint(out, Slot::RemoteTo, &format!("To {}:", direction.label()))?;
                self.paint(out, Slot::Default, &format!("{count}]"))?;
            }
        }

        out.reset()?;
        writeln!(out)
    }

    fn write_details(&self, out: &mut dyn WriteColor, status: &BranchStatus) -> io::Result<()> {
        if !status.changes.is_empty() {
            writeln!(out, "  |--Local")?;
            for change in &status.changes {
                write!(out, "     |--")?;
                self.paint(out, Slot::CommitState, &change.status)?;
                self.paint(out, Slot::FileUpdated, &format!(" {}", change.path))?;
                out.reset()?;
                writeln!(out)?;
            }
        }

        for direction in Direction::BOTH {
            for remote in &status.remotes {
                let commits = remote.commits(direction);
                if commits.is_empty() {
                    continue;
                }
                writeln!(out, "  |--{}", remote.name)?;
                for commit in commits {
                    write!(out, "     |--")?;
                    self.paint(out, Slot::CommitTo, &format!("[To {}]", direction.label()))?;
                    self.paint(out, Slot::Default, " ")?;
                    self.paint(out, Slot::CommitInfo, commit)?;
                    out.reset()?;
                    writeln!(out)?;
                }
            }
        }

        Ok(())
    }

    fn paint(&self, out: &mut dyn WriteColor, slot: Slot, text: &str) -> io::Result<()> {
        match self.theme.get(slot) {
            Style::Color(spec) => out.set_color(spec)?,
            Style::Control(literal) => write!(out, "{literal}")?,
        }
        write!(out, "{text}")
    }
}

fn html_summary(name: &str, category: Category, status: &BranchStatus) -> String {
    let prjname = format!(
        "<b style=\"color:{}\">{}</b>",
        category.html_color(),
        escape_html(name)
    );

    let local = if status.changes.is_empty() {
        String::new()
    } else {
        format!(
            "<b style=\"color:orange\"> Local</b><b style=\"color:black\">[To Commit:{}]</b>",
            status.changes.len()
        )
    };

    let counts = |direction: Direction| {
        status
            .remotes
            .iter()
            .filter(|r| !r.commits(direction).is_empty())
            .map(|r| {
                format!(
                    "<b style=\"color:black\">{}</b>[<b style=\"color:blue\">To {}:</b><b style=\"color:black\">{}</b>]",
                    escape_html(&r.name),
                    direction.label(),
                    r.commits(direction).len()
                )
            })
            .collect::<String>()
    };
    let to_push = counts(Direction::Push);
    let to_pull = counts(Direction::Pull);

    format!(
        "<li>{}/{} {} {} {}</li>\n",
        prjname,
        escape_html(&status.branch),
        local,
        to_push,
        to_pull
    )
}

fn html_details(status: &BranchStatus) -> String {
    let mut html = String::new();

    if !status.changes.is_empty() {
        html.push_str("<ul><li><b>Local</b></li></ul>\n<ul>\n");
        for change in &status.changes {
            html.push_str(&format!(
                "<li> <b style=\"color:orange\">[To Commit] </b>{}</li>\n",
                escape_html(&change.path)
            ));
        }
        html.push_str("</ul>\n");
    }

    for direction in Direction::BOTH {
        for remote in &status.remotes {
            let commits = remote.commits(direction);
            if commits.is_empty() {
                continue;
            }
            html.push_str(&format!(
                "<ul><li><b>{}</b></li>\n</ul>\n<ul>\n",
                escape_html(&remote.name)
            ));
            for commit in commits {
                html.push_str(&format!(
                    "<li><b style=\"color:blue\">[To {}] </b>{}</li>\n",
                    direction.label(),
                    escape_html(commit)
                ));
            }
            html.push_str("</ul>\n");
        }
    }

    html
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
