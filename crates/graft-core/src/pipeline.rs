//! Fetch, optionally strip VCS metadata, then prune.
//!
//! Pruning never runs unless the fetch succeeded: pruning a tree that was
//! not fetched and patched correctly would silently produce a wrong result.

use serde::Serialize;
use std::path::PathBuf;

use crate::fetch::{FetchError, VendorFetcher, VendorSpec, WorkingTree};
use crate::prune::{PruneError, PruneReport, PruneTarget, prune};
use crate::tools::{GitCli, VendorTools};

/// Everything one run needs, with all paths already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub spec: VendorSpec,
    pub destination: PathBuf,
    pub strip_vcs_metadata: bool,
    /// Hash the patched tree before stripping and pruning
    pub hash_tree: bool,
    pub prune: Option<PruneTarget>,
    pub git_program: String,
}

/// What a successful run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub root: PathBuf,
    pub commit: String,
    /// Content hash right after patching; `None` if disabled or hashing failed
    pub content_hash: Option<String>,
    pub stripped_vcs_metadata: bool,
    pub prune: Option<PruneReport>,
}

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("failed to remove VCS metadata from {}: {source}", path.display())]
    Strip {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Prune(#[from] PruneError),
}

/// Sequences the vendor fetcher and the tree pruner.
#[derive(Debug, Clone)]
pub struct Pipeline<T = GitCli> {
    fetcher: VendorFetcher<T>,
}

impl Pipeline<GitCli> {
    /// Pipeline using the git executable named in `config`.
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self::new(GitCli::with_program(&config.git_program))
    }
}

impl<T: VendorTools> Pipeline<T> {
    pub fn new(tools: T) -> Self {
        Self {
            fetcher: VendorFetcher::new(tools),
        }
    }

    pub fn fetcher(&self) -> &VendorFetcher<T> {
        &self.fetcher
    }

    /// Fetch stage only.
    pub fn fetch(&self, config: &PipelineConfig) -> Result<WorkingTree, PipelineError> {
        let tree = self.fetcher.fetch(&config.spec, &config.destination)?;
        if config.strip_vcs_metadata {
            strip(&tree)?;
        }
        Ok(tree)
    }

    /// Run every stage in order.
    ///
    /// With `hash_tree` set, every file of the patched tree is read once to
    /// compute its content hash; on a large upstream that dominates the
    /// local cost of a run.
    pub fn run(&self, config: &PipelineConfig) -> Result<PipelineReport, PipelineError> {
        let tree = self.fetcher.fetch(&config.spec, &config.destination)?;

        let content_hash = if config.hash_tree {
            hash(&tree)
        } else {
            None
        };

        let stripped_vcs_metadata = if config.strip_vcs_metadata {
            strip(&tree)?
        } else {
            false
        };

        let prune_report = match &config.prune {
            Some(target) => Some(prune(target)?),
            None => {
                tracing::debug!("no prune target configured");
                None
            }
        };

        Ok(PipelineReport {
            root: tree.root().to_path_buf(),
            commit: tree.commit().to_string(),
            content_hash,
            stripped_vcs_metadata,
            prune: prune_report,
        })
    }
}

fn hash(tree: &WorkingTree) -> Option<String> {
    match tree.content_hash() {
        Ok(hash) => {
            tracing::info!(root = %tree.root().display(), %hash, "fetched tree");
            Some(hash)
        }
        Err(e) => {
            tracing::warn!(
                root = %tree.root().display(),
                error = %e,
                "could not hash fetched tree"
            );
            None
        }
    }
}

fn strip(tree: &WorkingTree) -> Result<bool, PipelineError> {
    tree.strip_vcs_metadata().map_err(|source| PipelineError::Strip {
        path: tree.root().to_path_buf(),
        source,
    })
}
