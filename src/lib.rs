//! verstamp: version descriptors for libraries
//!
//! verstamp reads a library's release metadata and reports its version the way
//! users see it: `2.1.0.9616393 (Silky Siena)`.
//!
//! # Metadata Files
//!
//! All paths are relative to the library root (see [`scope::LibraryRoot`]):
//!
//! | File | Required | Contents |
//! |------|----------|----------|
//! | `VERSION` | yes | period-delimited integers, e.g. `2.1.0` |
//! | `VERSION_NAME` | yes | release name |
//! | `REVISION` | no | pinned revision, or a placeholder such as `(unknown)` |
//! | `.git/HEAD` | no | `ref: <refname>` or a raw commit id |
//! | `.git/<refname>` | no | raw commit id |
//! | `.git/info/refs` | no | `<sha>\t<refname>` lines |
//! | `.git/packed-refs` | no | `<sha> <refname>` lines, read only when `info/refs` is absent |
//!
//! A missing or unreadable `VERSION`/`VERSION_NAME` is an error
//! ([`VersionError`]). Version tokens are read leniently (`2.1.0-rc1` reads as
//! `2.1.0`). The revision is best-effort and simply absent when it cannot be
//! found.
//!
//! # Usage
//!
//! ```no_run
//! use verstamp::VersionResolver;
//!
//! let resolver = VersionResolver::from_root("/usr/lib/mylib");
//! let version = resolver.get_version()?;
//! println!("mylib {}", version);
//! # Ok::<(), verstamp::VersionError>(())
//! ```
//!
//! # Logging
//!
//! Diagnostics are emitted through `tracing` at `debug` (revision lookup
//! misses) and `warn` (suspicious HEAD refs). No subscriber is installed.

pub mod error;
pub mod revision;
pub mod scope;
pub mod version;

pub use error::VersionError;
pub use revision::{resolve_revision, RevisionStrategy, UNKNOWN_REVISION};
pub use scope::{LibraryRoot, PathScope};
pub use version::{parse_version_number, VersionInfo, VersionResolver};
