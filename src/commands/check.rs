use crate::error::CheckError;
use crate::locator::search_repositories;
use crate::mail;
use crate::report::{HtmlReport, Reporter};
use crate::status;
use crate::theme::{Slot, Theme};
use chrono::Local;
use regex::Regex;
use std::io;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use termcolor::{ColorChoice, NoColor, StandardStream, WriteColor};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CheckOptions {
    pub verbose: bool,
    pub check_remote: bool,
    pub untracked: bool,
    pub bell: bool,
    /// Pause between passes; zero runs once.
    pub watch: Duration,
    pub ignore_branch: Regex,
    /// 0 means unbounded.
    pub max_depth: usize,
    pub quiet: bool,
    pub email: bool,
    pub all_branches: bool,
    pub local_ignore: Regex,
    pub full_path: bool,
    pub color: bool,
}

impl Default for CheckOptions {
    fn default() -> Self {
        let empty = crate::anchored_regex("^$").expect("valid default pattern");
        Self {
            verbose: false,
            check_remote: false,
            untracked: false,
            bell: false,
            watch: Duration::ZERO,
            ignore_branch: empty.clone(),
            max_depth: 0,
            quiet: false,
            email: false,
            all_branches: false,
            local_ignore: empty,
            full_path: false,
            color: true,
        }
    }
}

/// Result of one scan over every root.
#[derive(Debug)]
pub struct PassOutcome {
    pub report: HtmlReport,
    /// Some repository has commits to push or pull.
    pub action_needed: bool,
}

/// Checks every repository under `roots` once, writing to `out`.
pub fn run_pass(
    opts: &CheckOptions,
    theme: &Theme,
    roots: &[PathBuf],
    out: &mut dyn WriteColor,
) -> Result<PassOutcome, CheckError> {
    let repos = search_repositories(roots, opts.max_depth);

    if opts.check_remote {
        for repo in &repos {
            writeln!(out, "Updating {} remotes...", repo.display())?;
            status::update_remotes(repo)?;
        }
    }

    if !opts.watch.is_zero() {
        writeln!(out, "{}", theme.control(Slot::Reset))?;
        writeln!(out, "{}", timestamp())?;
    }

    let reporter = Reporter {
        theme,
        roots,
        verbose: opts.verbose,
        quiet: opts.quiet,
        full_path: opts.full_path,
    };
    let mut report = HtmlReport::new(report_path(roots));
    let mut action_needed = false;
    // The report goes out by mail instead of to the terminal.
    let mut silent = NoColor::new(io::sink());

    debug!("Processing repositories... please wait.");
    for repo in &repos {
        for branch in branches(repo, opts.all_branches)? {
            if opts.ignore_branch.is_match(&branch) {
                debug!("Skipping ignored branch {} in {}", branch, repo.display());
                continue;
            }

            let status = status::branch_status(repo, &branch, &opts.local_ignore, opts.untracked)?;
            let target: &mut dyn WriteColor = if opts.email { &mut silent } else { &mut *out };
            if reporter.report(repo, &status, target, &mut report)? {
                action_needed = true;
            }
        }
    }

    report.finish(timestamp());

    if action_needed && opts.bell {
        writeln!(out, "{}", theme.control(Slot::Bell))?;
    }
    out.flush()?;

    Ok(PassOutcome {
        report,
        action_needed,
    })
}

/// Runs passes until done: once, or forever in watch mode. Recoverable
/// errors are printed and the next pass goes ahead; fatal ones are
/// returned.
pub fn execute(
    opts: &CheckOptions,
    theme: &Theme,
    roots: &[PathBuf],
    config_dir: &Path,
) -> Result<(), CheckError> {
    debug!("Global Vars: {:#?}", opts);

    let choice = if opts.color {
        ColorChoice::Auto
    } else {
        ColorChoice::Never
    };
    let mut stdout = StandardStream::stdout(choice);

    loop {
        let result = run_pass(opts, theme, roots, &mut stdout).and_then(|outcome| {
            if opts.email {
                mail::send_report(config_dir, &outcome.report)
            } else {
                Ok(())
            }
        });

        match result {
            Ok(()) => {}
            Err(e) if e.is_fatal() => return Err(e),
            Err(e) => println!("Unexpected error: {}", e),
        }

        if !opts.watch.is_zero() {
            thread::sleep(opts.watch);
        } else {
            return Ok(());
        }
    }
}

fn branches(repo: &Path, all: bool) -> Result<Vec<String>, CheckError> {
    if all {
        status::all_branches(repo)
    } else {
        Ok(vec![status::default_branch(repo)?.unwrap_or_default()])
    }
}

fn report_path(roots: &[PathBuf]) -> String {
    roots
        .iter()
        .map(|root| root.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

fn timestamp() -> String {
    Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
