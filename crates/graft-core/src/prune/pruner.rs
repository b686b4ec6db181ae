use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{PruneError, PruneReport, PruneRootError, PruneTarget, RootFailure, RootReport};

/// Delete every file below each of the target's named subdirectories.
///
/// Roots are processed independently: a failure aborts only the root it
/// happens in, and the remaining roots are still pruned. Missing roots are
/// a no-op. Running twice yields the same tree and a zero count.
pub fn prune(target: &PruneTarget) -> Result<PruneReport, PruneError> {
    let mut report = PruneReport::default();
    let mut failures = Vec::new();

    for (name, path) in target.prune_roots() {
        let mut files_removed = 0;
        let outcome = match check_ancestors(target.root(), name) {
            Ok(true) => prune_root(&path, &mut files_removed),
            Ok(false) => {
                tracing::debug!(root = %path.display(), "prune root missing, skipping");
                Ok(false)
            }
            Err(error) => Err(error),
        };

        let existed = match outcome {
            Ok(existed) => {
                tracing::info!(root = %path.display(), files_removed, existed, "pruned");
                existed
            }
            Err(error) => {
                tracing::error!(root = %path.display(), files_removed, %error, "pruning aborted");
                failures.push(RootFailure {
                    name: name.to_string(),
                    error,
                });
                true
            }
        };

        report.roots.push(RootReport {
            name: name.to_string(),
            path,
            existed,
            files_removed,
        });
    }

    if failures.is_empty() {
        Ok(report)
    } else {
        Err(PruneError { report, failures })
    }
}

/// Every component of `name` above the last one must be a real directory
/// under `base`, otherwise the prune root could resolve outside the tree.
///
/// Returns `false` when one of them does not exist.
fn check_ancestors(base: &Path, name: &str) -> Result<bool, PruneRootError> {
    let mut components: Vec<_> = Path::new(name).components().collect();
    components.pop();

    let mut current = base.to_path_buf();
    for component in components {
        current.push(component);
        match fs::symlink_metadata(&current) {
            Ok(meta) if meta.file_type().is_symlink() => {
                return Err(traversal(&current, "path component is a symbolic link"));
            }
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Err(traversal(&current, "path component is not a directory")),
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
            Err(source) => {
                return Err(PruneRootError::Traversal {
                    path: current,
                    source,
                });
            }
        }
    }
    Ok(true)
}

/// Depth-first over an explicit stack of directories. At each directory
/// the files are deleted before any subdirectory is visited.
///
/// Returns whether the root existed.
fn prune_root(root: &Path, files_removed: &mut usize) -> Result<bool, PruneRootError> {
    match fs::symlink_metadata(root) {
        Ok(meta) if meta.is_dir() => {}
        Ok(meta) if meta.file_type().is_symlink() => {
            return Err(traversal(root, "prune root is a symbolic link"));
        }
        Ok(_) => return Err(traversal(root, "prune root is not a directory")),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!(root = %root.display(), "prune root missing, skipping");
            return Ok(false);
        }
        Err(source) => {
            return Err(PruneRootError::Traversal {
                path: root.to_path_buf(),
                source,
            });
        }
    }

    let mut pending = vec![root.to_path_buf()];
    while let Some(dir) = pending.pop() {
        let entries = fs::read_dir(&dir).map_err(|source| PruneRootError::Traversal {
            path: dir.clone(),
            source,
        })?;

        let mut subdirs = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|source| PruneRootError::Traversal {
                path: dir.clone(),
                source,
            })?;
            let path = entry.path();
            let file_type = entry
                .file_type()
                .map_err(|source| PruneRootError::Traversal {
                    path: path.clone(),
                    source,
                })?;

            // `file_type` does not follow symlinks, so a link to a
            // directory is removed like a file and never descended into.
            if file_type.is_dir() {
                subdirs.push(path);
                continue;
            }

            fs::remove_file(&path).map_err(|source| PruneRootError::Deletion {
                path: path.clone(),
                source,
            })?;
            tracing::trace!(path = %path.display(), "removed");
            *files_removed += 1;
        }

        subdirs.sort();
        pending.extend(subdirs.into_iter().rev());
    }

    Ok(true)
}

fn traversal(path: &Path, reason: &str) -> PruneRootError {
    PruneRootError::Traversal {
        path: PathBuf::from(path),
        source: io::Error::other(reason.to_string()),
    }
}
