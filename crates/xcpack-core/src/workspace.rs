//! Build output directory management

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::{PackError, Result};

/// The build output directory tree
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Remove the whole tree. Succeeds whether or not it existed.
    pub fn clean(&self) -> Result<bool> {
        let removed = remove_tree(&self.root)?;
        debug!(path = %self.root.display(), removed, "build directory cleaned");
        Ok(removed)
    }

    /// Create the tree and its parents if absent
    pub fn ensure(&self) -> Result<()> {
        std::fs::create_dir_all(&self.root).map_err(|e| PackError::workspace(&self.root, e))?;
        debug!(path = %self.root.display(), "build directory ready");
        Ok(())
    }
}

/// Remove a directory tree, treating absence as success.
///
/// Returns whether anything was removed.
pub fn remove_tree(path: &Path) -> Result<bool> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(PackError::workspace(path, e)),
    }
}
