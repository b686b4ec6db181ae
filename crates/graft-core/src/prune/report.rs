use serde::Serialize;
use std::path::PathBuf;

/// Outcome of pruning one named subdirectory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RootReport {
    pub name: String,
    pub path: PathBuf,
    /// Whether the directory existed when pruning started
    pub existed: bool,
    pub files_removed: usize,
}

/// Per-root file counts for one prune run, in target order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PruneReport {
    pub roots: Vec<RootReport>,
}

impl PruneReport {
    pub fn total_files_removed(&self) -> usize {
        self.roots.iter().map(|r| r.files_removed).sum()
    }

    pub fn root(&self, name: &str) -> Option<&RootReport> {
        self.roots.iter().find(|r| r.name == name)
    }
}
