use anyhow::{Context, Result};
use clap::Parser;
use gitcheck::commands::{check, init_email};
use gitcheck::theme::Theme;
use gitcheck::{anchored_regex, config_home};
use regex::Regex;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "gitcheck")]
#[command(about = "Check multiple git repository in one pass.")]
#[command(version)]
#[command(after_help = "example: gitcheck -m 1 -q target")]
struct Cli {
    /// Show files & commits
    #[arg(short, long)]
    verbose: bool,

    /// Show debug message
    #[arg(long)]
    debug: bool,

    /// Force remote update (slow)
    #[arg(short, long)]
    remote: bool,

    /// Show untracked files
    #[arg(short, long)]
    untracked: bool,

    /// Bell on action needed
    #[arg(short, long)]
    bell: bool,

    /// After displaying, wait <sec> and run again
    #[arg(short, long, value_name = "sec", default_value = "0", value_parser = parse_interval)]
    watch: Duration,

    /// Ignore branches matching the regex <re>
    #[arg(short = 'i', long, value_name = "re", default_value = "^$", value_parser = parse_pattern)]
    ignore_branch: Regex,

    /// Limit to <depth> the repositories search
    #[arg(short = 'm', long, value_name = "depth", default_value_t = 0)]
    maxdepth: usize,

    /// Display info only when repository needs action
    #[arg(short, long)]
    quiet: bool,

    /// Send an email with result as html, using mail.properties parameters
    #[arg(short, long)]
    email: bool,

    /// Show the status of all branches
    #[arg(short, long)]
    all: bool,

    /// Ignore changes in local files which match the regex <re>
    #[arg(short = 'l', long, value_name = "re", default_value = "^$", value_parser = parse_pattern)]
    localignore: Regex,

    /// Initialize mail.properties file (has to be modified by user using JSON Format)
    #[arg(long)]
    init_email: bool,

    /// Show repository full path
    #[arg(short, long)]
    full_path: bool,

    /// Disable colored output
    #[arg(long)]
    no_color: bool,

    /// Tree or directory to check
    #[arg(value_name = "DIR")]
    dirs: Vec<PathBuf>,
}

fn parse_pattern(s: &str) -> Result<Regex, String> {
    anchored_regex(s).map_err(|e| e.to_string())
}

fn parse_interval(s: &str) -> Result<Duration, String> {
    let secs: f64 = s.parse().map_err(|e| format!("{e}"))?;
    Duration::try_from_secs_f64(secs)
        .map_err(|_| format!("{s} is not a valid number of seconds"))
}

fn resolve_root(dir: &Path) -> Result<PathBuf> {
    if let Ok(canonical) = dir.canonicalize() {
        return Ok(canonical);
    }
    std::path::absolute(dir).with_context(|| format!("Failed to resolve {}", dir.display()))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.debug {
        tracing::Level::DEBUG
    } else {
        tracing::Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    ctrlc::set_handler(|| std::process::exit(0)).context("Failed to install interrupt handler")?;

    let roots = cli
        .dirs
        .iter()
        .map(|dir| resolve_root(dir))
        .collect::<Result<Vec<_>>>()?;

    let config_dir = config_home()?;

    let theme = if cli.no_color {
        Theme::plain()
    } else {
        Theme::load(&config_dir.join("theme.json"))?
    };

    if cli.init_email {
        init_email::execute(&config_dir)?;
    }

    let opts = check::CheckOptions {
        verbose: cli.verbose,
        check_remote: cli.remote,
        untracked: cli.untracked,
        bell: cli.bell,
        watch: cli.watch,
        ignore_branch: cli.ignore_branch,
        max_depth: cli.maxdepth,
        quiet: cli.quiet,
        email: cli.email,
        all_branches: cli.all,
        local_ignore: cli.localignore,
        full_path: cli.full_path,
        color: !cli.no_color,
    };

    check::execute(&opts, &theme, &roots, &config_dir)?;
    Ok(())
}
