//! Path utilities for locating calculator data on the host.
//!
//! Resolves the per-user data directory and expands `~` in configured paths.

use std::path::{Path, PathBuf};

/// Directory name used under the platform data directory.
const APP_DIR: &str = "popcalc";

/// Returns the default data directory for popcalc storage and logs.
///
/// This is `<platform data dir>/popcalc`, e.g. `~/.local/share/popcalc` on
/// Linux. Falls back to `./popcalc` when the platform reports no data directory.
///
/// # Examples
///
/// ```
/// use popcalc::infrastructure::get_data_dir;
///
/// assert!(get_data_dir().ends_with("popcalc"));
/// ```
#[must_use]
pub fn get_data_dir() -> PathBuf {
    dirs::data_dir().map_or_else(|| PathBuf::from(APP_DIR), |dir| dir.join(APP_DIR))
}

/// Expands a leading `~` to the user's home directory.
///
/// Paths without a leading tilde, and all paths when no home directory is
/// known, are returned unchanged.
///
/// # Examples
///
/// ```
/// use popcalc::infrastructure::expand_tilde;
/// use std::path::PathBuf;
///
/// assert_eq!(expand_tilde("/absolute/path"), PathBuf::from("/absolute/path"));
/// if let Some(home) = dirs::home_dir() {
///     assert_eq!(expand_tilde("~/calc"), home.join("calc"));
///     assert_eq!(expand_tilde("~"), home);
/// }
/// ```
#[must_use]
pub fn expand_tilde(path: &str) -> PathBuf {
    let home = dirs::home_dir();
    match (path, home) {
        ("~", Some(home)) => home,
        (p, Some(home)) if p.starts_with("~/") => home.join(&p[2..]),
        (p, _) => PathBuf::from(p),
    }
}

/// Path of the log file inside `data_dir`.
#[must_use]
pub fn log_file(data_dir: &Path) -> PathBuf {
    data_dir.join("popcalc.log")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_tilde_paths_unchanged() {
        assert_eq!(expand_tilde("relative/dir"), PathBuf::from("relative/dir"));
        assert_eq!(expand_tilde("~user/dir"), PathBuf::from("~user/dir"));
    }

    #[test]
    fn test_log_file_location() {
        assert_eq!(
            log_file(Path::new("/data/popcalc")),
            PathBuf::from("/data/popcalc/popcalc.log")
        );
    }
}
