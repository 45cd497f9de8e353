//! Shared fixtures for integration tests

#![allow(dead_code)]

pub mod scanner_helpers;

use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Create a repository directory holding the given relative files
pub fn repository(files: &[&str]) -> TempDir {
    let dir = TempDir::new().expect("create temp repository");
    for file in files {
        write_file(dir.path(), file, file.as_bytes());
    }
    dir
}

pub fn write_file(root: &Path, relative: &str, contents: &[u8]) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).expect("create parent directories");
    }
    fs::write(path, contents).expect("write fixture file");
}
