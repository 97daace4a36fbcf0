//! Version descriptors built from a library's metadata files.
//!
//! Provides [`VersionInfo`] (the computed descriptor) and [`VersionResolver`]
//! (reads `VERSION`, `VERSION_NAME` and the optional revision marker, then
//! memoizes the result).

use std::fmt;
use std::path::PathBuf;
use std::sync::OnceLock;

use serde::Serialize;
use tracing::debug;

use crate::error::VersionError;
use crate::revision;
use crate::scope::{LibraryRoot, PathScope};

/// Required file holding the period-delimited version number (e.g. `2.1.0`).
pub const VERSION_FILE: &str = "VERSION";

/// Required file holding the release name.
pub const VERSION_NAME_FILE: &str = "VERSION_NAME";

/// Number of revision characters appended to the display string.
pub const SHORT_REVISION_LEN: usize = 7;

/// A library's version, as reported to users.
///
/// Serializes as a mapping with keys `major`, `minor`, `teeny`, `name`,
/// `number`, `string` and `rev`. Missing numeric components serialize as
/// `null`; `rev` is left out when no revision was resolved.
///
/// # Example
///
/// ```
/// use verstamp::VersionInfo;
///
/// let info = VersionInfo::new(
///     [Some(2), Some(1), Some(0)],
///     "Silky Siena".to_string(),
///     Some("9616393b8924ef36639c7e82aa88a51a24d16949".to_string()),
/// );
/// assert_eq!(info.number(), "2.1.0");
/// assert_eq!(info.display(), "2.1.0.9616393 (Silky Siena)");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VersionInfo {
    major: Option<u32>,
    minor: Option<u32>,
    teeny: Option<u32>,
    name: String,
    number: String,
    #[serde(rename = "string")]
    display: String,
    #[serde(rename = "rev", skip_serializing_if = "Option::is_none")]
    revision: Option<String>,
}

impl VersionInfo {
    /// Assemble a descriptor from its parts, deriving `number` and the
    /// display string.
    pub fn new(components: [Option<u32>; 3], name: String, revision: Option<String>) -> Self {
        let [major, minor, teeny] = components;
        let number = components
            .iter()
            .flatten()
            .map(|component| component.to_string())
            .collect::<Vec<_>>()
            .join(".");

        let mut display = number.clone();
        if let Some(rev) = revision.as_deref() {
            // Placeholders like "(unknown)" are kept in `rev` but never shown.
            if !rev.starts_with('(') {
                display.push('.');
                display.extend(rev.chars().take(SHORT_REVISION_LEN));
            }
        }
        display.push_str(" (");
        display.push_str(&name);
        display.push(')');

        VersionInfo {
            major,
            minor,
            teeny,
            name,
            number,
            display,
            revision,
        }
    }

    pub fn major(&self) -> Option<u32> {
        self.major
    }

    pub fn minor(&self) -> Option<u32> {
        self.minor
    }

    pub fn teeny(&self) -> Option<u32> {
        self.teeny
    }

    /// Release name, e.g. "Silky Siena"
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Present numeric components joined with periods, e.g. "2.1"
    pub fn number(&self) -> &str {
        &self.number
    }

    /// Full revision marker, if one was resolved
    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    /// Human-readable string, e.g. "2.1.0.9616393 (Silky Siena)"
    pub fn display(&self) -> &str {
        &self.display
    }

    /// The mapping view of this descriptor.
    pub fn to_map(&self) -> serde_json::Result<serde_json::Map<String, serde_json::Value>> {
        serde_json::from_value(serde_json::to_value(self)?)
    }
}

impl fmt::Display for VersionInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

/// Parse `VERSION` content into `[major, minor, teeny]`.
///
/// Tokens are read leniently: each one contributes its leading ASCII digits,
/// or 0 when it has none, so `2.1.0-rc1` reads as `2.1.0` and `3.0.0.beta.1`
/// as `3.0.0`. Trailing empty tokens are dropped (`2.1.` is `2.1`), as are
/// components past the third. Missing components are `None`.
pub fn parse_version_number(content: &str) -> [Option<u32>; 3] {
    let mut tokens: Vec<&str> = content.trim().split('.').collect();
    while tokens.last().is_some_and(|token| token.is_empty()) {
        tokens.pop();
    }

    let mut components = [None; 3];
    for (slot, token) in components.iter_mut().zip(tokens) {
        *slot = Some(leading_integer(token));
    }
    components
}

/// Leading decimal digits of `token` as an integer; saturates at `u32::MAX`.
fn leading_integer(token: &str) -> u32 {
    token
        .trim_start()
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0u32, |value, digit| {
            value
                .saturating_mul(10)
                .saturating_add(u32::from(digit - b'0'))
        })
}

/// Computes a library's [`VersionInfo`] once and hands out the cached value
/// on every later call.
///
/// The cache lives in the resolver, so a new resolver re-reads the metadata
/// files. Failed resolutions are not cached.
#[derive(Debug)]
pub struct VersionResolver<S = LibraryRoot> {
    scope: S,
    cache: OnceLock<VersionInfo>,
}

impl VersionResolver<LibraryRoot> {
    /// Resolver for a library rooted at `root`.
    pub fn from_root(root: impl Into<PathBuf>) -> Self {
        VersionResolver::new(LibraryRoot::new(root))
    }

    /// Resolver rooted at `VERSTAMP_ROOT` (or the current directory).
    pub fn from_env() -> Self {
        VersionResolver::new(LibraryRoot::from_env())
    }
}

impl<S: PathScope> VersionResolver<S> {
    pub fn new(scope: S) -> Self {
        VersionResolver {
            scope,
            cache: OnceLock::new(),
        }
    }

    pub fn scope(&self) -> &S {
        &self.scope
    }

    /// Whether a version has already been computed and cached.
    pub fn is_resolved(&self) -> bool {
        self.cache.get().is_some()
    }

    /// Get the library version, computing it on first use.
    ///
    /// Concurrent first callers may each read the files; the first result
    /// stored is the one every caller sees.
    ///
    /// # Errors
    /// Returns [`VersionError`] when `VERSION` or `VERSION_NAME` is missing
    /// or unreadable.
    pub fn get_version(&self) -> Result<&VersionInfo, VersionError> {
        if let Some(info) = self.cache.get() {
            return Ok(info);
        }
        let info = self.compute()?;
        Ok(self.cache.get_or_init(|| info))
    }

    fn compute(&self) -> Result<VersionInfo, VersionError> {
        let content = read_required(VERSION_FILE, self.scope.scope(VERSION_FILE))?;
        let components = parse_version_number(&content);

        let name = read_required(VERSION_NAME_FILE, self.scope.scope(VERSION_NAME_FILE))?
            .trim()
            .to_string();

        let info = VersionInfo::new(components, name, self.resolve_revision());
        debug!(number = %info.number(), rev = ?info.revision(), "computed version");
        Ok(info)
    }

    fn resolve_revision(&self) -> Option<String> {
        revision::resolve_revision(&self.scope)
    }
}

fn read_required(file: &'static str, path: PathBuf) -> Result<String, VersionError> {
    std::fs::read_to_string(&path).map_err(|err| VersionError::from_io(file, path, err))
}
