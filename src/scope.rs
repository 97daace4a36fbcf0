//! Path scoping for library metadata.
//!
//! Every metadata file is addressed by a name relative to the library root.
//! [`PathScope`] is the seam that maps those names to absolute paths, and
//! [`ref_path_within`] keeps ref names read out of `.git/HEAD` from pointing
//! anywhere outside the git directory.

use std::path::{Component, Path, PathBuf};

/// Environment variable consulted by [`LibraryRoot::from_env`].
pub const ROOT_ENV_VAR: &str = "VERSTAMP_ROOT";

/// Maps a name relative to the library root to a path on disk.
pub trait PathScope {
    fn scope(&self, relative: &str) -> PathBuf;
}

/// The directory a library is installed (or checked out) in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LibraryRoot {
    root: PathBuf,
}

impl LibraryRoot {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        LibraryRoot { root: root.into() }
    }

    /// Root taken from `VERSTAMP_ROOT`, or the current directory when unset.
    ///
    /// Relative values are resolved against the current directory so the
    /// root stays stable if the process later changes directory.
    pub fn from_env() -> Self {
        let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        match std::env::var_os(ROOT_ENV_VAR) {
            Some(value) if !value.is_empty() => {
                let root = PathBuf::from(value);
                if root.is_absolute() {
                    LibraryRoot::new(root)
                } else {
                    LibraryRoot::new(cwd.join(root))
                }
            }
            _ => LibraryRoot::new(cwd),
        }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }
}

impl PathScope for LibraryRoot {
    fn scope(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }
}

impl<S: PathScope + ?Sized> PathScope for &S {
    fn scope(&self, relative: &str) -> PathBuf {
        (**self).scope(relative)
    }
}

/// Resolve a ref name (as written after `ref: ` in HEAD) to its loose ref
/// file under `git_dir`.
///
/// Returns `None` for names that are empty, absolute, or contain `..`, `.`
/// or prefix components. Those could only come from a corrupted or hostile
/// HEAD and must not be followed.
pub fn ref_path_within(git_dir: &Path, refname: &str) -> Option<PathBuf> {
    if refname.is_empty() || has_escaping_component(refname) {
        return None;
    }
    Some(git_dir.join(refname))
}

/// Check whether a relative ref name could leave the directory it is joined to.
pub fn has_escaping_component(refname: &str) -> bool {
    // Backslash is a separator on Windows; normalize before splitting.
    let normalized = refname.replace('\\', "/");
    if normalized.starts_with('/') {
        return true;
    }

    Path::new(&normalized)
        .components()
        .any(|component| !matches!(component, Component::Normal(_)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_library_root_scopes_relative_names() {
        let temp_dir = TempDir::new().unwrap();
        let root = LibraryRoot::new(temp_dir.path());

        assert_eq!(root.scope("VERSION"), temp_dir.path().join("VERSION"));
        assert_eq!(root.scope(".git/HEAD"), temp_dir.path().join(".git/HEAD"));
        assert_eq!(root.path(), temp_dir.path());
    }

    #[test]
    fn test_scope_through_reference() {
        let root = LibraryRoot::new("/opt/lib");
        let by_ref: &LibraryRoot = &root;
        assert_eq!(by_ref.scope("VERSION_NAME"), PathBuf::from("/opt/lib/VERSION_NAME"));
    }

    #[test]
    fn test_has_escaping_component_parent_patterns() {
        assert!(has_escaping_component("../../../etc/passwd"));
        assert!(has_escaping_component("refs/../../config"));
        assert!(has_escaping_component("..\\..\\config"));
        assert!(has_escaping_component("/etc/passwd"));
        assert!(has_escaping_component("./refs/heads/master"));
    }

    #[test]
    fn test_has_escaping_component_normal_refs() {
        assert!(!has_escaping_component("refs/heads/master"));
        assert!(!has_escaping_component("refs/heads/feature/nested-name"));
        assert!(!has_escaping_component("refs/tags/v2.1.0"));
    }

    #[test]
    fn test_ref_path_within_joins_valid_refs() {
        let git_dir = Path::new("/lib/.git");
        assert_eq!(
            ref_path_within(git_dir, "refs/heads/master"),
            Some(PathBuf::from("/lib/.git/refs/heads/master"))
        );
    }

    #[test]
    fn test_ref_path_within_rejects_escapes() {
        let git_dir = Path::new("/lib/.git");
        assert_eq!(ref_path_within(git_dir, ""), None);
        assert_eq!(ref_path_within(git_dir, "../VERSION"), None);
        assert_eq!(ref_path_within(git_dir, "/etc/shadow"), None);
    }
}
