//! Revision marker lookup.
//!
//! A revision is optional metadata, so nothing in here returns an error: every
//! missing or unreadable file along the way just means "no revision".
//!
//! Lookup is an ordered list of [`RevisionStrategy`] values tried first to
//! last; the first one that produces a value wins.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{debug, warn};

use crate::scope::{ref_path_within, PathScope};

/// Pinned revision file shipped with packaged releases.
pub const REVISION_FILE: &str = "REVISION";

/// Git directory, relative to the library root.
pub const GIT_DIR: &str = ".git";

/// HEAD file, relative to the library root.
pub const GIT_HEAD_FILE: &str = ".git/HEAD";

/// Ref listing written by `git update-server-info`, relative to the git directory.
pub const INFO_REFS_FILE: &str = "info/refs";

/// Packed ref store, relative to the git directory.
pub const PACKED_REFS_FILE: &str = "packed-refs";

/// Placeholder written into REVISION when a release was cut without a revision.
pub const UNKNOWN_REVISION: &str = "(unknown)";

const HEAD_REF_PREFIX: &str = "ref: ";

/// A single way of finding the current revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevisionStrategy {
    /// Raw revision baked into the REVISION file
    Pinned,
    /// HEAD of a git checkout, following one level of `ref: ...`
    GitCheckout,
}

impl RevisionStrategy {
    /// Strategies in precedence order.
    pub const ORDER: [RevisionStrategy; 2] = [RevisionStrategy::Pinned, RevisionStrategy::GitCheckout];

    pub fn name(&self) -> &'static str {
        match self {
            RevisionStrategy::Pinned => "pinned",
            RevisionStrategy::GitCheckout => "git",
        }
    }

    pub fn resolve<S: PathScope + ?Sized>(&self, scope: &S) -> Option<String> {
        let revision = match self {
            RevisionStrategy::Pinned => pinned_revision(scope),
            RevisionStrategy::GitCheckout => git_revision(scope),
        };
        if revision.is_none() {
            debug!(strategy = self.name(), "no revision from strategy");
        }
        revision
    }
}

/// Resolve the revision marker for the library under `scope`.
pub fn resolve_revision<S: PathScope + ?Sized>(scope: &S) -> Option<String> {
    RevisionStrategy::ORDER
        .iter()
        .find_map(|strategy| strategy.resolve(scope))
}

/// True for a non-empty string of `0-9a-f`.
pub fn is_lowercase_hex(value: &str) -> bool {
    !value.is_empty() && value.bytes().all(|b| matches!(b, b'0'..=b'9' | b'a'..=b'f'))
}

/// True for a string that opens with `(` and closes with `)`.
pub fn is_parenthesized(value: &str) -> bool {
    value.len() >= 2 && value.starts_with('(') && value.ends_with(')')
}

/// Whether pinned REVISION content should be ignored in favour of asking git.
///
/// Note the coupling: a pinned file holding what looks like a real commit hash
/// is *not* trusted here. Hash-like and placeholder contents both send lookup
/// on to the checkout, and only free-form markers (e.g. `v2.1-custom`) are
/// used verbatim. Packaging tools rely on this, so keep it as is.
pub fn defers_to_source_control(pinned: &str) -> bool {
    // An empty REVISION would otherwise be reported as "" and render as a
    // bare "." in the display string; it defers to git instead.
    pinned.is_empty()
        || is_lowercase_hex(pinned)
        || is_parenthesized(pinned)
        || pinned == UNKNOWN_REVISION
}

fn pinned_revision<S: PathScope + ?Sized>(scope: &S) -> Option<String> {
    let path = scope.scope(REVISION_FILE);
    if !path.exists() {
        return None;
    }
    let pinned = read_trimmed(&path)?;
    if defers_to_source_control(&pinned) {
        debug!(path = %path.display(), pinned = %pinned, "pinned revision defers to source control");
        return None;
    }
    Some(pinned)
}

fn git_revision<S: PathScope + ?Sized>(scope: &S) -> Option<String> {
    let head_path = scope.scope(GIT_HEAD_FILE);
    if !head_path.exists() {
        return None;
    }
    let head = read_trimmed(&head_path)?;

    match head.strip_prefix(HEAD_REF_PREFIX) {
        Some(refname) => resolve_ref(&scope.scope(GIT_DIR), refname),
        // Detached head: HEAD holds the commit itself
        None => non_empty(head),
    }
}

/// Resolve a symbolic ref to a commit id: loose ref file first, then the
/// `info/refs` listing. `packed-refs` is read only when `info/refs` does not
/// exist; a miss in an existing `info/refs` means no revision.
fn resolve_ref(git_dir: &Path, refname: &str) -> Option<String> {
    let Some(loose_ref) = ref_path_within(git_dir, refname) else {
        warn!(refname = %refname, "HEAD names a ref outside the git directory, ignoring");
        return None;
    };
    if loose_ref.exists() {
        return read_trimmed(&loose_ref).and_then(non_empty);
    }

    let info_refs = git_dir.join(INFO_REFS_FILE);
    if info_refs.exists() {
        lookup_listing(&info_refs, refname, RefListing::InfoRefs)
    } else {
        lookup_listing(&git_dir.join(PACKED_REFS_FILE), refname, RefListing::PackedRefs)
    }
}

/// On-disk ref listing formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RefListing {
    /// `<sha>\t<refname>` per line
    InfoRefs,
    /// `<sha> <refname>` per line, with `#` headers and `^` peeled entries
    PackedRefs,
}

impl RefListing {
    fn separator(&self) -> char {
        match self {
            RefListing::InfoRefs => '\t',
            RefListing::PackedRefs => ' ',
        }
    }

    fn parse_line<'a>(&self, line: &'a str) -> Option<(&'a str, &'a str)> {
        let line = line.trim();
        if *self == RefListing::PackedRefs && (line.starts_with('#') || line.starts_with('^')) {
            return None;
        }
        line.split_once(self.separator())
    }
}

fn lookup_listing(path: &Path, refname: &str, listing: RefListing) -> Option<String> {
    let file = match File::open(path) {
        Ok(file) => file,
        Err(err) => {
            debug!(path = %path.display(), error = %err, "ref listing unavailable");
            return None;
        }
    };
    let found = scan_ref_listing(BufReader::new(file), refname, listing);
    if found.is_none() {
        debug!(path = %path.display(), refname = %refname, "ref not present in listing");
    }
    found
}

/// Scan a ref listing line by line and return the commit id of the first
/// entry whose ref name equals `refname` exactly.
pub fn scan_ref_listing<R: BufRead>(reader: R, refname: &str, listing: RefListing) -> Option<String> {
    reader
        .lines()
        .map_while(Result::ok)
        .find_map(|line| {
            let (sha, name) = listing.parse_line(&line)?;
            (name == refname && !sha.is_empty()).then(|| sha.to_string())
        })
}

fn read_trimmed(path: &Path) -> Option<String> {
    match std::fs::read_to_string(path) {
        Ok(contents) => Some(contents.trim().to_string()),
        Err(err) => {
            debug!(path = %path.display(), error = %err, "cannot read revision file");
            None
        }
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}
