//! Shared fixtures for verstamp integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::Path;
use tempfile::TempDir;

pub const SHA: &str = "9616393b8924ef36639c7e82aa88a51a24d16949";
pub const OTHER_SHA: &str = "1d2c3b4a5f6e7d8c9b0a1f2e3d4c5b6a7f8e9d0c";

/// A library root populated with VERSION and VERSION_NAME.
pub fn library(version: &str, name: &str) -> TempDir {
    let temp_dir = TempDir::new().unwrap();
    write(temp_dir.path(), "VERSION", &format!("{}\n", version));
    write(temp_dir.path(), "VERSION_NAME", &format!("{}\n", name));
    temp_dir
}

/// Write `contents` to `root/relative`, creating parent directories.
pub fn write(root: &Path, relative: &str, contents: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}
