//! Path expansion for user-supplied paths.

use std::path::{Path, PathBuf};

/// Expands a leading `~` to the home directory.
///
/// Surrounding whitespace is trimmed; an empty input yields an empty path.
#[must_use]
pub fn expand(path: &str) -> PathBuf {
    let path = path.trim();
    if path.is_empty() {
        return PathBuf::new();
    }

    PathBuf::from(shellexpand::tilde(path).as_ref())
}

/// Expands `path` and anchors it at `base_dir` when it is still relative.
///
/// Used for paths written in the configuration file, which are relative to
/// the file's own directory.
///
/// # Arguments
///
/// * `path` - The path as written by the user
/// * `base_dir` - Directory relative paths are resolved against
#[must_use]
pub fn expand_and_resolve(path: &str, base_dir: &Path) -> PathBuf {
    let expanded = expand(path);
    if expanded.as_os_str().is_empty() || expanded.is_absolute() {
        return expanded;
    }

    base_dir.join(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_blank_is_empty() {
        assert_eq!(expand(""), PathBuf::new());
        assert_eq!(expand("  \t"), PathBuf::new());
    }

    #[test]
    fn test_expand_tilde() {
        let state = expand("~/.cache/windowcharmer/state.json");
        assert!(!state.to_string_lossy().starts_with('~'));
        assert!(state.ends_with(".cache/windowcharmer/state.json"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let base = Path::new("/home/user/.config/windowcharmer");
        assert_eq!(
            expand_and_resolve("/dev/shm/windowcharmer/state.json", base),
            PathBuf::from("/dev/shm/windowcharmer/state.json")
        );
    }

    #[test]
    fn test_relative_paths_resolve_against_base() {
        let base = Path::new("/home/user/.config/windowcharmer");
        assert_eq!(
            expand_and_resolve(" state.json ", base),
            PathBuf::from("/home/user/.config/windowcharmer/state.json")
        );
        assert_eq!(expand_and_resolve("", base), PathBuf::new());
    }

    #[test]
    fn test_tilde_is_not_anchored_at_base() {
        let base = Path::new("/etc/windowcharmer");
        let resolved = expand_and_resolve("~/state.json", base);
        assert!(!resolved.starts_with(base));
        assert!(resolved.ends_with("state.json"));
    }
}
