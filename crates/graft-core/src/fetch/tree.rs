//! Handle to a fetched, patched working tree.

use std::io;
use std::path::{Path, PathBuf};

use crate::fs::hash_tree_excluding;

/// Name of the VCS metadata directory left behind by the clone.
pub const VCS_METADATA_DIR: &str = ".git";

/// The on-disk tree produced by a successful fetch.
///
/// The tree itself is never deleted by this crate; only its contents are
/// touched by later stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkingTree {
    root: PathBuf,
    commit: String,
}

impl WorkingTree {
    pub(crate) fn new(root: PathBuf, commit: String) -> Self {
        Self { root, commit }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The commit the tree was checked out at (before patching).
    pub fn commit(&self) -> &str {
        &self.commit
    }

    /// Remove the `.git` directory so the tree can be committed into the
    /// host project as plain files.
    ///
    /// Returns `false` when there was nothing to remove.
    pub fn strip_vcs_metadata(&self) -> io::Result<bool> {
        let git_dir = self.root.join(VCS_METADATA_DIR);
        match std::fs::symlink_metadata(&git_dir) {
            Ok(meta) if meta.is_dir() => {
                std::fs::remove_dir_all(&git_dir)?;
                tracing::info!(path = %git_dir.display(), "removed VCS metadata");
                Ok(true)
            }
            // Worktrees and submodules use a `.git` file instead.
            Ok(_) => {
                std::fs::remove_file(&git_dir)?;
                tracing::info!(path = %git_dir.display(), "removed VCS metadata");
                Ok(true)
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Deterministic hash of the tree's content, ignoring VCS metadata.
    pub fn content_hash(&self) -> anyhow::Result<String> {
        hash_tree_excluding(&self.root, &[VCS_METADATA_DIR])
    }
}
