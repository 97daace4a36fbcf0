//! Fatal errors raised while computing a version descriptor.
//!
//! Only the required metadata (`VERSION`, `VERSION_NAME`) can fail a
//! resolution, and only by being absent or unreadable. Revision lookup never
//! produces an error; it degrades to "no revision" instead.
//!
//! Error codes follow the pattern `VER-{CATEGORY}-{3-digit number}` and are
//! stable; a retired code is never reused.
//!
//! | Code | Description | Remediation |
//! |------|-------------|-------------|
//! | VER-IO-001 | Metadata file not found | Check the library root; `VERSION` and `VERSION_NAME` must both exist |
//! | VER-IO-002 | Metadata file unreadable | Check read permissions and that the file is UTF-8 text |

use std::io;
use std::path::{Path, PathBuf};

/// Required metadata file not found
pub const VER_IO_001_METADATA_NOT_FOUND: &str = "VER-IO-001";

/// Required metadata file exists but cannot be read
pub const VER_IO_002_METADATA_UNREADABLE: &str = "VER-IO-002";

/// Errors surfaced by [`crate::VersionResolver::get_version`].
#[derive(Debug, thiserror::Error)]
pub enum VersionError {
    /// A required metadata file does not exist
    #[error("required metadata file {file} not found at {}", .path.display())]
    MissingMetadata { file: &'static str, path: PathBuf },

    /// A required metadata file exists but could not be read
    #[error("cannot read metadata file {file} at {}: {source}", .path.display())]
    UnreadableMetadata {
        file: &'static str,
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl VersionError {
    /// Stable error code for this failure.
    pub fn code(&self) -> &'static str {
        match self {
            VersionError::MissingMetadata { .. } => VER_IO_001_METADATA_NOT_FOUND,
            VersionError::UnreadableMetadata { .. } => VER_IO_002_METADATA_UNREADABLE,
        }
    }

    /// Name of the metadata file involved, e.g. `VERSION`.
    pub fn file(&self) -> &'static str {
        match self {
            VersionError::MissingMetadata { file, .. }
            | VersionError::UnreadableMetadata { file, .. } => file,
        }
    }

    /// Path of the metadata file involved.
    pub fn path(&self) -> &Path {
        match self {
            VersionError::MissingMetadata { path, .. }
            | VersionError::UnreadableMetadata { path, .. } => path,
        }
    }

    /// Map an I/O failure on a required file to the matching variant.
    pub(crate) fn from_io(file: &'static str, path: PathBuf, err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::NotFound {
            VersionError::MissingMetadata { file, path }
        } else {
            VersionError::UnreadableMetadata {
                file,
                path,
                source: err,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_missing_metadata() {
        let err = VersionError::from_io(
            "VERSION",
            PathBuf::from("/lib/VERSION"),
            io::Error::new(io::ErrorKind::NotFound, "gone"),
        );
        assert!(matches!(err, VersionError::MissingMetadata { file: "VERSION", .. }));
        assert_eq!(err.code(), VER_IO_001_METADATA_NOT_FOUND);
        assert_eq!(err.file(), "VERSION");
        assert!(err.to_string().contains("/lib/VERSION"));
    }

    #[test]
    fn test_other_io_errors_map_to_unreadable() {
        let err = VersionError::from_io(
            "VERSION_NAME",
            PathBuf::from("/lib/VERSION_NAME"),
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(matches!(err, VersionError::UnreadableMetadata { .. }));
        assert_eq!(err.code(), VER_IO_002_METADATA_UNREADABLE);
        assert_eq!(err.path(), Path::new("/lib/VERSION_NAME"));
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_codes_are_distinct_per_variant() {
        let missing = VersionError::MissingMetadata {
            file: "VERSION",
            path: PathBuf::from("VERSION"),
        };
        let unreadable = VersionError::from_io(
            "VERSION",
            PathBuf::from("VERSION"),
            io::Error::new(io::ErrorKind::InvalidData, "not utf-8"),
        );
        assert_ne!(missing.code(), unreadable.code());
        assert!(missing.code().starts_with("VER-IO-"));
        assert!(unreadable.code().starts_with("VER-IO-"));
    }
}
