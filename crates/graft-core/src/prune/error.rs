use std::io;
use std::path::PathBuf;

use super::PruneReport;

/// Why pruning one root stopped.
#[derive(Debug, thiserror::Error)]
pub enum PruneRootError {
    #[error("failed to delete {}: {source}", path.display())]
    Deletion {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to traverse {}: {source}", path.display())]
    Traversal {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PruneRootError {
    pub fn path(&self) -> &std::path::Path {
        match self {
            PruneRootError::Deletion { path, .. } | PruneRootError::Traversal { path, .. } => path,
        }
    }
}

/// A named root whose traversal was aborted.
#[derive(Debug)]
pub struct RootFailure {
    pub name: String,
    pub error: PruneRootError,
}

/// At least one root failed. `report` still describes every root,
/// including files removed before a failure.
#[derive(Debug, thiserror::Error)]
#[error("pruning failed for {} root(s){}", .failures.len(), render(.failures))]
pub struct PruneError {
    pub report: PruneReport,
    pub failures: Vec<RootFailure>,
}

fn render(failures: &[RootFailure]) -> String {
    failures
        .iter()
        .map(|failure| format!("; {}: {}", failure.name, failure.error))
        .collect()
}
