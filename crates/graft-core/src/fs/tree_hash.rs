//! Deterministic tree hashing for content verification
//!
//! Computes a stable hash of a directory tree, useful for:
//! - Logging which exact content a vendored tree holds
//! - Comparing a fetched tree against a reference checkout

use anyhow::Context;
use std::fs;
use std::path::{Path, PathBuf};

/// Compute deterministic tree hash of a directory
///
/// # Algorithm
/// - Directory traversal over an explicit work list
/// - Sort entries lexicographically for determinism
/// - Files: `rel_path || 0x00 || content`
/// - Directories: `rel_path || 0xFF`
/// - Symlinks: `rel_path || 0x01 || link target` (never followed)
/// - Output: blake3 hex string
///
/// # Example
/// ```no_run
/// use graft_core::fs::tree_hash::hash_tree;
/// use std::path::Path;
///
/// let hash = hash_tree(Path::new("/path/to/dir"))?;
/// assert_eq!(hash.len(), 64); // blake3 hex output
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn hash_tree(path: &Path) -> anyhow::Result<String> {
    hash_tree_excluding(path, &[])
}

/// Like [`hash_tree`], but skips entries with any of the given names at
/// every depth (e.g. `.git`).
pub fn hash_tree_excluding(path: &Path, excluded: &[&str]) -> anyhow::Result<String> {
    let mut hasher = blake3::Hasher::new();
    // Stack of (directory, relative path); popped in reverse so that
    // traversal stays in sorted depth-first order.
    let mut pending: Vec<(PathBuf, String)> = vec![(path.to_path_buf(), String::new())];

    while let Some((dir, base)) = pending.pop() {
        let entries = fs::read_dir(&dir)
            .with_context(|| format!("Failed to read directory: {}", dir.display()))?;

        let mut sorted_entries: Vec<_> = entries
            .collect::<Result<Vec<_>, _>>()
            .with_context(|| format!("Failed to read directory entries: {}", dir.display()))?;
        sorted_entries.sort_by_key(|e| e.file_name());

        let mut subdirs = Vec::new();
        for entry in sorted_entries {
            let name = entry.file_name();
            let name_str = name.to_string_lossy();
            if excluded.iter().any(|ex| *ex == name_str) {
                continue;
            }
            let rel_path = if base.is_empty() {
                name_str.to_string()
            } else {
                format!("{}/{}", base, name_str)
            };

            let ty = entry
                .file_type()
                .with_context(|| format!("Failed to stat file: {}", entry.path().display()))?;

            if ty.is_dir() {
                hasher.update(rel_path.as_bytes());
                hasher.update(&[0xFF]);
                subdirs.push((entry.path(), rel_path));
            } else if ty.is_file() {
                hasher.update(rel_path.as_bytes());
                hasher.update(&[0x00]);
                let content = fs::read(entry.path())
                    .with_context(|| format!("Failed to read file: {}", entry.path().display()))?;
                hasher.update(&content);
            } else if ty.is_symlink() {
                hasher.update(rel_path.as_bytes());
                hasher.update(&[0x01]);
                let target = fs::read_link(entry.path()).with_context(|| {
                    format!("Failed to read symlink: {}", entry.path().display())
                })?;
                hasher.update(target.to_string_lossy().as_bytes());
            } else {
                anyhow::bail!(
                    "Unsupported filesystem entry type: {}",
                    entry.path().display()
                );
            }
        }

        // Directory contents are hashed after all siblings of the directory
        // itself, which keeps the digest stable for a given tree.
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(hasher.finalize().to_hex().to_string())
}
