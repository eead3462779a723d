//! Platform-specific directory paths.
//!
//! Uses XDG on Linux, standard locations on macOS/Windows.

use std::fs;
use std::path::Path;
use std::path::PathBuf;

use directories::ProjectDirs;

const QUALIFIER: &str = "kr";
const ORGANIZATION: &str = "ksis";
const APPLICATION: &str = "ksis";

/// Maximum number of archived log files to keep.
const MAX_OLD_LOGS: usize = 10;

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
}

/// Cache directory, which holds the logs.
///
/// - Linux: `$XDG_CACHE_HOME/ksis` or `~/.cache/ksis`
/// - macOS: `~/Library/Caches/kr.ksis.ksis`
pub fn cache_dir() -> Option<PathBuf> {
    project_dirs().map(|dirs| dirs.cache_dir().to_path_buf())
}

/// Path of the log file for this run.
pub fn log_file() -> Option<PathBuf> {
    cache_dir().map(|dir| dir.join("latest.log"))
}

/// Archives the previous run's log under a timestamped name and prunes old
/// archives. Call before opening the new log file.
pub fn rotate_logs() {
    let Some(cache) = cache_dir() else { return };
    if fs::create_dir_all(&cache).is_err() {
        return;
    }

    let latest = cache.join("latest.log");
    if latest.exists() {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        let _ = fs::rename(&latest, cache.join(format!("{timestamp}.log")));
    }

    prune_logs(&cache);
}

fn prune_logs(cache: &Path) {
    let Ok(entries) = fs::read_dir(cache) else { return };

    let mut archived: Vec<_> = entries
        .filter_map(Result::ok)
        .filter(|e| {
            let name = e.file_name();
            let name = name.to_string_lossy();
            name.ends_with(".log") && name != "latest.log"
        })
        .collect();

    if archived.len() <= MAX_OLD_LOGS {
        return;
    }

    // Oldest first.
    archived.sort_by_key(|e| e.metadata().and_then(|m| m.modified()).ok());
    for entry in &archived[..archived.len() - MAX_OLD_LOGS] {
        let _ = fs::remove_file(entry.path());
    }
}
