//! Boundary to the external version-control and patch tools.
//!
//! The fetcher only ever talks to a [`VendorTools`] implementation, so the
//! pipeline logic can be exercised without spawning processes.

mod git_cli;

use std::path::Path;

pub use git_cli::GitCli;

/// A failed invocation of an external tool.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("`{command}` failed: {diagnostic}")]
pub struct ToolFailure {
    /// Rendered command line
    pub command: String,
    /// Raw diagnostic text reported by the tool
    pub diagnostic: String,
}

impl ToolFailure {
    pub fn new(command: impl Into<String>, diagnostic: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            diagnostic: diagnostic.into(),
        }
    }
}

/// Capabilities the vendor fetcher needs from the outside world.
///
/// Every path handed to an implementation is absolute; implementations must
/// not rely on (or change) the process working directory.
pub trait VendorTools {
    /// Clone `url` into `destination`.
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<(), ToolFailure>;

    /// Check out `commit` exactly inside `worktree`.
    fn checkout(&self, worktree: &Path, commit: &str) -> Result<(), ToolFailure>;

    /// Apply the unified diff at `patch_file` to `worktree`.
    ///
    /// Either every hunk applies or nothing is written.
    fn apply_patch(&self, worktree: &Path, patch_file: &Path) -> Result<(), ToolFailure>;
}
