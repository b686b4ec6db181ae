//! Vendor fetcher: clone, checkout, patch.

use std::path::{Path, PathBuf};

use super::{FetchError, VendorSpec, WorkingTree};
use crate::tools::{GitCli, VendorTools};

/// Fetches a pinned, patched snapshot of an upstream repository.
///
/// Steps run once each, in order; the first failure aborts the fetch.
#[derive(Debug, Clone, Default)]
pub struct VendorFetcher<T = GitCli> {
    tools: T,
}

impl<T: VendorTools> VendorFetcher<T> {
    pub fn new(tools: T) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &T {
        &self.tools
    }

    /// Clone `spec.source_url` into `destination`, check out the pinned
    /// commit and apply the patch.
    ///
    /// `destination` must not exist yet or be an empty directory. Relative
    /// paths are made absolute before any tool runs.
    pub fn fetch(&self, spec: &VendorSpec, destination: &Path) -> Result<WorkingTree, FetchError> {
        let destination = absolute(destination).map_err(|diagnostic| FetchError::Clone {
            url: spec.source_url.clone(),
            destination: destination.to_path_buf(),
            diagnostic,
        })?;

        let patch = check_patch_file(spec, &destination)?;
        check_commit(spec, &destination)?;
        check_destination(spec, &destination)?;

        tracing::info!(url = %spec.source_url, destination = %destination.display(), "cloning");
        self.tools
            .clone_repo(&spec.source_url, &destination)
            .map_err(|e| {
                tracing::error!(error = %e, "clone failed");
                FetchError::Clone {
                    url: spec.source_url.clone(),
                    destination: destination.clone(),
                    diagnostic: e.to_string(),
                }
            })?;

        tracing::info!(commit = %spec.pinned_commit, "checking out pinned commit");
        self.tools
            .checkout(&destination, &spec.pinned_commit)
            .map_err(|e| {
                tracing::error!(error = %e, "checkout failed");
                FetchError::Checkout {
                    commit: spec.pinned_commit.clone(),
                    worktree: destination.clone(),
                    diagnostic: e.to_string(),
                }
            })?;

        tracing::info!(patch = %patch.display(), "applying patch");
        self.tools.apply_patch(&destination, &patch).map_err(|e| {
            tracing::error!(error = %e, "patch did not apply");
            FetchError::Patch {
                patch: patch.clone(),
                worktree: destination.clone(),
                diagnostic: e.to_string(),
            }
        })?;

        Ok(WorkingTree::new(destination, spec.pinned_commit.clone()))
    }
}

/// The patch must exist before anything is cloned.
fn check_patch_file(spec: &VendorSpec, worktree: &Path) -> Result<PathBuf, FetchError> {
    let patch_error = |diagnostic: String| FetchError::Patch {
        patch: spec.patch_file.clone(),
        worktree: worktree.to_path_buf(),
        diagnostic,
    };

    let patch = absolute(&spec.patch_file).map_err(patch_error)?;
    match std::fs::metadata(&patch) {
        Ok(meta) if meta.is_file() => Ok(patch),
        Ok(_) => Err(patch_error("patch path is not a regular file".to_string())),
        Err(e) => Err(patch_error(format!("patch file is not readable: {e}"))),
    }
}

fn check_commit(spec: &VendorSpec, worktree: &Path) -> Result<(), FetchError> {
    let commit = spec.pinned_commit.trim();
    let reason = if commit.is_empty() {
        Some("commit id is empty")
    } else if commit.len() != spec.pinned_commit.len() {
        Some("commit id has surrounding whitespace")
    } else if commit.starts_with('-') {
        Some("commit id must not start with '-'")
    } else {
        None
    };
    match reason {
        Some(reason) => Err(FetchError::Checkout {
            commit: spec.pinned_commit.clone(),
            worktree: worktree.to_path_buf(),
            diagnostic: reason.to_string(),
        }),
        None => Ok(()),
    }
}

fn check_destination(spec: &VendorSpec, destination: &Path) -> Result<(), FetchError> {
    let clone_error = |diagnostic: String| FetchError::Clone {
        url: spec.source_url.clone(),
        destination: destination.to_path_buf(),
        diagnostic,
    };

    match std::fs::symlink_metadata(destination) {
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(clone_error(format!("cannot inspect destination: {e}"))),
        Ok(meta) if !meta.is_dir() => Err(clone_error(
            "destination exists and is not a directory".to_string(),
        )),
        Ok(_) => {
            let mut entries = std::fs::read_dir(destination)
                .map_err(|e| clone_error(format!("cannot read destination: {e}")))?;
            if entries.next().is_some() {
                return Err(clone_error("destination is not empty".to_string()));
            }
            Ok(())
        }
    }
}

fn absolute(path: &Path) -> Result<PathBuf, String> {
    std::path::absolute(path).map_err(|e| format!("cannot resolve {}: {e}", path.display()))
}
