//! Java source discovery.

use crate::error::{CoreError, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;
use walkdir::{DirEntry, WalkDir};

/// Suffix of files sent to the model.
pub const JAVA_SUFFIX: &str = ".java";

/// Directory names never descended into: build output, VCS and IDE metadata,
/// and test sources.
pub const IGNORED_DIRS: [&str; 7] = [
    "target",
    ".git",
    ".settings",
    ".vscode",
    "test",
    "bin",
    "build",
];

/// Whether a directory name is on the exclusion list.
pub fn is_ignored_dir(name: &str) -> bool {
    IGNORED_DIRS.contains(&name)
}

fn is_ignored_entry(entry: &DirEntry) -> bool {
    // The scan root itself is never excluded by name.
    entry.depth() > 0
        && entry.file_type().is_dir()
        && entry.file_name().to_str().is_some_and(is_ignored_dir)
}

/// Absolute paths of every `.java` file under `root`, skipping ignored
/// directories at any depth.
///
/// Siblings are visited in file-name order. Unreadable entries are skipped.
pub fn scan_java_project(root: &Path) -> Vec<PathBuf> {
    let abs_root = std::path::absolute(root).unwrap_or_else(|_| root.to_path_buf());

    WalkDir::new(&abs_root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_ignored_entry(entry))
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(err) => {
                debug!(error = %err, "Skipping unreadable entry");
                None
            }
        })
        .filter(|entry| {
            entry.path().is_file()
                && entry
                    .file_name()
                    .to_str()
                    .is_some_and(|name| name.ends_with(JAVA_SUFFIX))
        })
        .map(DirEntry::into_path)
        .collect()
}

/// Read a source file as UTF-8 text.
pub fn read_file_contents(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|e| CoreError::io(path, e))
}

/// Leading characters of one scanned file.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FilePreview {
    pub path: PathBuf,
    pub file_name: String,
    /// First characters of the file, or the read error text.
    pub preview: String,
}

/// Scan `root` and take the first `max_chars` characters of every match.
pub fn preview_project(root: &Path, max_chars: usize) -> Vec<FilePreview> {
    scan_java_project(root)
        .into_iter()
        .map(|path| {
            let file_name = path
                .file_name()
                .map(|n| n.to_string_lossy().to_string())
                .unwrap_or_default();
            let preview = match read_file_contents(&path) {
                Ok(content) => content.chars().take(max_chars).collect(),
                Err(err) => format!("Error reading file {}: {}", path.display(), err),
            };
            FilePreview {
                path,
                file_name,
                preview,
            }
        })
        .collect()
}
