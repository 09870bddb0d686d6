use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// Name of the directory that marks a git working copy.
pub const MARKER: &str = ".git";

/// Finds every git working copy below `roots`.
///
/// A directory `d` levels below its root (the root itself is level 0) is
/// only considered when `max_depth` is 0 or `d <= max_depth`. The result
/// is sorted and free of duplicates, even when roots overlap.
pub fn search_repositories(roots: &[PathBuf], max_depth: usize) -> Vec<PathBuf> {
    debug!("Beginning scan... building list of git folders");
    let mut repos = BTreeSet::new();

    for root in roots {
        let root = trim_trailing_separator(root);
        debug!("  Scan git repositories from {}", root.display());

        let mut walker = WalkDir::new(&root).follow_links(false);
        if max_depth > 0 {
            // The marker sits one level below the repository it marks.
            walker = walker.max_depth(max_depth + 1);
        }

        let entries = walker
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !is_inside_marker(e.path()));

        for entry in entries {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };

            if entry.depth() == 0 || !entry.file_type().is_dir() || entry.file_name() != MARKER {
                continue;
            }

            if let Some(repo) = entry.path().parent() {
                debug!("  Add {} repository", repo.display());
                repos.insert(repo.to_path_buf());
            }
        }
    }

    debug!("Done");
    repos.into_iter().collect()
}

/// True when `path` is a marker directory's content, which is never
/// worth walking.
fn is_inside_marker(path: &Path) -> bool {
    path.parent()
        .and_then(Path::file_name)
        .is_some_and(|name| name == MARKER)
}

fn trim_trailing_separator(path: &Path) -> PathBuf {
    // Path::components already ignores trailing separators.
    path.components().collect()
}
