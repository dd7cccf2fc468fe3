//! Output workspace preparation.

use crate::error::{CoreError, Result};
use std::path::{Path, PathBuf};
use tracing::info;
use walkdir::WalkDir;

/// Input project and the output tree the pipeline mutates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    input_root: PathBuf,
    output_root: PathBuf,
}

impl Workspace {
    pub fn new(input_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Workspace {
            input_root: input_root.into(),
            output_root: output_root.into(),
        }
    }

    pub fn input_root(&self) -> &Path {
        &self.input_root
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Destroy the output root and recreate it as a full copy of the input.
    ///
    /// Returns the number of files copied. Refuses overlapping roots, since
    /// clearing the output would otherwise delete or recurse into the input.
    pub fn prepare(&self) -> Result<usize> {
        if !self.input_root.is_dir() {
            return Err(CoreError::InputNotFound(self.input_root.clone()));
        }
        self.check_overlap()?;

        info!(
            input = %self.input_root.display(),
            output = %self.output_root.display(),
            "Preparing workspace"
        );

        if self.output_root.exists() {
            std::fs::remove_dir_all(&self.output_root)
                .map_err(|e| CoreError::io(&self.output_root, e))?;
        }

        let copied = copy_tree(&self.input_root, &self.output_root)?;
        info!(output = %self.output_root.display(), files = copied, "Workspace prepared");
        Ok(copied)
    }

    fn check_overlap(&self) -> Result<()> {
        let input = resolve(&self.input_root);
        let output = resolve(&self.output_root);
        if input.starts_with(&output) || output.starts_with(&input) {
            return Err(CoreError::WorkspaceOverlap { input, output });
        }
        Ok(())
    }
}

/// Canonical form of `path`, resolving through the nearest existing ancestor
/// when the path itself does not exist yet.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    let absolute = std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf());
    match (absolute.parent(), absolute.file_name()) {
        (Some(parent), Some(name)) => resolve(parent).join(name),
        _ => absolute,
    }
}

/// Recursively copy `from` into `to`, following symlinks.
fn copy_tree(from: &Path, to: &Path) -> Result<usize> {
    let mut copied = 0;
    for entry in WalkDir::new(from).follow_links(true) {
        let entry = entry?;
        let relative = entry.path().strip_prefix(from).unwrap_or(entry.path());
        let target = to.join(relative);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target).map_err(|e| CoreError::io(&target, e))?;
        } else {
            std::fs::copy(entry.path(), &target).map_err(|e| CoreError::io(entry.path(), e))?;
            copied += 1;
        }
    }
    Ok(copied)
}
