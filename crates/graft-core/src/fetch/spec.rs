//! Vendor source specification types.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// What to vendor: an upstream repository pinned to one commit, plus the
/// patch that adapts that commit for reuse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorSpec {
    /// Repository URL (anything `git clone` accepts, including local paths)
    pub source_url: String,
    /// Exact revision identifier to check out
    pub pinned_commit: String,
    /// Unified diff applied on top of the pinned commit
    pub patch_file: PathBuf,
}

impl VendorSpec {
    pub fn new(
        source_url: impl Into<String>,
        pinned_commit: impl Into<String>,
        patch_file: impl Into<PathBuf>,
    ) -> Self {
        Self {
            source_url: source_url.into(),
            pinned_commit: pinned_commit.into(),
            patch_file: patch_file.into(),
        }
    }

    /// Conventional patch file name for a commit: `<commit><suffix>`.
    ///
    /// e.g. `patch_file_name_for("5dab7ed", "_anki_rslib.patch")`
    /// gives `5dab7ed_anki_rslib.patch`.
    pub fn patch_file_name_for(commit: &str, suffix: &str) -> String {
        format!("{commit}{suffix}")
    }

    /// Spec whose patch lives in `patch_dir` under the conventional name.
    pub fn with_conventional_patch(
        source_url: impl Into<String>,
        pinned_commit: impl Into<String>,
        patch_dir: &Path,
        suffix: &str,
    ) -> Self {
        let pinned_commit = pinned_commit.into();
        let patch_file = patch_dir.join(Self::patch_file_name_for(&pinned_commit, suffix));
        Self::new(source_url, pinned_commit, patch_file)
    }
}
