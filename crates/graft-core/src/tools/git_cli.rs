//! [`VendorTools`] backed by the `git` command line.

use std::ffi::{OsStr, OsString};
use std::path::Path;
use std::process::Command;

use super::{ToolFailure, VendorTools};

/// Runs `git` for cloning, checkout, and patch application.
///
/// Patches go through `git apply`, which refuses to write anything unless
/// every hunk applies.
#[derive(Debug, Clone)]
pub struct GitCli {
    program: OsString,
}

impl Default for GitCli {
    fn default() -> Self {
        Self::new()
    }
}

impl GitCli {
    /// Use the `git` found on `PATH`.
    pub fn new() -> Self {
        Self::with_program("git")
    }

    /// Use a specific git executable.
    pub fn with_program(program: impl Into<OsString>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    /// Run git with the given arguments, failing on a non-zero exit status.
    fn run_git(&self, args: &[&OsStr]) -> Result<(), ToolFailure> {
        let command = self.render(args);
        tracing::debug!(%command, "running git");

        let output = Command::new(&self.program)
            .args(args)
            .env("GIT_TERMINAL_PROMPT", "0")
            .output()
            .map_err(|e| ToolFailure::new(&command, format!("failed to spawn: {e}")))?;

        if output.status.success() {
            return Ok(());
        }

        let stderr = String::from_utf8_lossy(&output.stderr);
        let stdout = String::from_utf8_lossy(&output.stdout);
        let diagnostic = if !stderr.trim().is_empty() {
            stderr.trim().to_string()
        } else if !stdout.trim().is_empty() {
            stdout.trim().to_string()
        } else {
            format!("exited with {}", output.status)
        };
        Err(ToolFailure::new(command, diagnostic))
    }

    fn render(&self, args: &[&OsStr]) -> String {
        std::iter::once(self.program.as_os_str())
            .chain(args.iter().copied())
            .map(|a| a.to_string_lossy().into_owned())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl VendorTools for GitCli {
    fn clone_repo(&self, url: &str, destination: &Path) -> Result<(), ToolFailure> {
        self.run_git(&[
            OsStr::new("clone"),
            OsStr::new("--"),
            OsStr::new(url),
            destination.as_os_str(),
        ])
    }

    fn checkout(&self, worktree: &Path, commit: &str) -> Result<(), ToolFailure> {
        self.run_git(&[
            OsStr::new("-C"),
            worktree.as_os_str(),
            OsStr::new("-c"),
            OsStr::new("advice.detachedHead=false"),
            OsStr::new("checkout"),
            OsStr::new("--detach"),
            OsStr::new(commit),
        ])
    }

    fn apply_patch(&self, worktree: &Path, patch_file: &Path) -> Result<(), ToolFailure> {
        self.run_git(&[
            OsStr::new("-C"),
            worktree.as_os_str(),
            OsStr::new("apply"),
            patch_file.as_os_str(),
        ])
    }
}
