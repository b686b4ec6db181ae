//! Configuration schema for graft.toml
//!
//! ```toml
//! [vendor]
//! url = "https://github.com/ankitects/anki"
//! commit = "5dab7ed47ec6d17226d2fc0529c32a56e40e5f8a"
//! patch = "anki_patch/5dab7ed47ec6d17226d2fc0529c32a56e40e5f8a_anki_rslib.patch"
//! destination = "anki"
//!
//! [prune]
//! dirs = ["sass", "ts", "python", "pylib", "qt", "tools"]
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::ConfigError;
use crate::fetch::VendorSpec;
use crate::pipeline::PipelineConfig;
use crate::prune::PruneTarget;

/// Root configuration structure for graft.toml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GraftConfig {
    /// Upstream source and patch
    pub vendor: VendorSection,

    /// Subdirectories to empty after fetching (absent: prune nothing)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prune: Option<PruneSection>,

    /// External tool overrides
    #[serde(default)]
    pub tools: ToolsSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct VendorSection {
    /// Repository URL passed to `git clone`
    pub url: String,

    /// Exact commit to check out
    pub commit: String,

    /// Patch applied after checkout
    pub patch: PathBuf,

    /// Where the upstream tree is cloned
    pub destination: PathBuf,

    /// Remove `.git` from the tree before pruning
    #[serde(default)]
    pub strip_vcs_metadata: bool,

    /// Hash the patched tree after fetching (reads every file)
    #[serde(default = "default_hash_tree")]
    pub hash_tree: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PruneSection {
    /// Base directory for `dirs` (defaults to `vendor.destination`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Subdirectory names whose files are deleted
    #[serde(default)]
    pub dirs: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolsSection {
    /// git executable
    #[serde(default = "default_git")]
    pub git: String,
}

impl Default for ToolsSection {
    fn default() -> Self {
        Self { git: default_git() }
    }
}

fn default_git() -> String {
    "git".to_string()
}

fn default_hash_tree() -> bool {
    true
}

/// Starter configuration written by `graft init`.
pub const TEMPLATE: &str = r#"# graft.toml - vendor a pinned upstream snapshot and prune it.
#
# Relative paths are resolved against the directory holding this file.

[vendor]
url = "https://github.com/ankitects/anki"
commit = "5dab7ed47ec6d17226d2fc0529c32a56e40e5f8a"
patch = "anki_patch/5dab7ed47ec6d17226d2fc0529c32a56e40e5f8a_anki_rslib.patch"
destination = "anki"
# Remove the clone's .git directory before pruning.
strip_vcs_metadata = false
# Hash the patched tree; reads every file, so turn off for large upstreams.
hash_tree = true

[prune]
# root = "anki"   # defaults to vendor.destination
dirs = ["sass", "ts", "python", "pylib", "qt", "tools"]

[tools]
git = "git"
"#;

impl GraftConfig {
    /// The starter configuration as a string.
    pub fn template() -> &'static str {
        TEMPLATE
    }

    /// Semantic checks that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let vendor = &self.vendor;
        if vendor.url.trim().is_empty() {
            return Err(ConfigError::invalid("vendor.url must not be empty"));
        }
        if vendor.commit.trim().is_empty() {
            return Err(ConfigError::invalid("vendor.commit must not be empty"));
        }
        if vendor.patch.as_os_str().is_empty() {
            return Err(ConfigError::invalid("vendor.patch must not be empty"));
        }
        if vendor.destination.as_os_str().is_empty() {
            return Err(ConfigError::invalid("vendor.destination must not be empty"));
        }
        if self.tools.git.trim().is_empty() {
            return Err(ConfigError::invalid("tools.git must not be empty"));
        }
        if let Some(prune) = &self.prune {
            if let Some(root) = &prune.root
                && root.as_os_str().is_empty()
            {
                return Err(ConfigError::invalid("prune.root must not be empty"));
            }
            PruneTarget::new(Path::new(""), prune.dirs.iter().cloned())
                .map_err(|e| ConfigError::invalid(format!("prune.dirs: {e}")))?;
        }
        Ok(())
    }

    /// Resolve every path against `base_dir` and build a runnable config.
    pub fn resolve(&self, base_dir: &Path) -> Result<PipelineConfig, ConfigError> {
        self.validate()?;

        let destination = base_dir.join(&self.vendor.destination);
        let spec = VendorSpec::new(
            self.vendor.url.clone(),
            self.vendor.commit.clone(),
            base_dir.join(&self.vendor.patch),
        );

        let prune = match &self.prune {
            Some(section) => {
                let root = section
                    .root
                    .as_ref()
                    .map(|r| base_dir.join(r))
                    .unwrap_or_else(|| destination.clone());
                let target = PruneTarget::new(root, section.dirs.iter().cloned())
                    .map_err(|e| ConfigError::invalid(format!("prune.dirs: {e}")))?;
                Some(target)
            }
            None => None,
        };

        Ok(PipelineConfig {
            spec,
            destination,
            strip_vcs_metadata: self.vendor.strip_vcs_metadata,
            hash_tree: self.vendor.hash_tree,
            prune,
            git_program: self.tools.git.clone(),
        })
    }
}
