use std::path::PathBuf;

/// A fetch step failed. Each variant names the step, the path or
/// identifier involved and the raw diagnostic text.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("failed to clone {url} into {}: {diagnostic}", destination.display())]
    Clone {
        url: String,
        destination: PathBuf,
        diagnostic: String,
    },

    #[error("failed to check out commit {commit} in {}: {diagnostic}", worktree.display())]
    Checkout {
        commit: String,
        worktree: PathBuf,
        diagnostic: String,
    },

    #[error("failed to apply patch {} to {}: {diagnostic}", patch.display(), worktree.display())]
    Patch {
        patch: PathBuf,
        worktree: PathBuf,
        diagnostic: String,
    },
}

impl FetchError {
    /// Name of the step that failed.
    pub fn step(&self) -> &'static str {
        match self {
            FetchError::Clone { .. } => "clone",
            FetchError::Checkout { .. } => "checkout",
            FetchError::Patch { .. } => "patch",
        }
    }

    pub fn diagnostic(&self) -> &str {
        match self {
            FetchError::Clone { diagnostic, .. }
            | FetchError::Checkout { diagnostic, .. }
            | FetchError::Patch { diagnostic, .. } => diagnostic,
        }
    }
}
