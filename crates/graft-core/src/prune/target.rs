//! Prune target specification.

use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// A prune directory name that cannot be resolved safely under the root.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid prune directory '{name}': {reason}")]
pub struct InvalidTarget {
    pub name: String,
    pub reason: &'static str,
}

/// A root directory plus the names of the subdirectories to empty.
///
/// Names are kept as a set and iterated in sorted order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PruneTarget {
    root: PathBuf,
    names: BTreeSet<String>,
}

impl PruneTarget {
    /// Validate `names` and build a target.
    ///
    /// A name may contain several components (`web/sass`) but must stay
    /// below `root`: no `..`, no `.`, no absolute paths.
    pub fn new<I, S>(root: impl Into<PathBuf>, names: I) -> Result<Self, InvalidTarget>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names = names
            .into_iter()
            .map(Into::into)
            .map(|name| validate_name(&name).map(|()| name))
            .collect::<Result<BTreeSet<_>, _>>()?;
        Ok(Self {
            root: root.into(),
            names,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.names.iter().map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Each name paired with the directory it resolves to.
    pub fn prune_roots(&self) -> impl Iterator<Item = (&str, PathBuf)> {
        self.names
            .iter()
            .map(|name| (name.as_str(), self.root.join(name)))
    }
}

fn validate_name(name: &str) -> Result<(), InvalidTarget> {
    let invalid = |reason| InvalidTarget {
        name: name.to_string(),
        reason,
    };

    if name.trim().is_empty() {
        return Err(invalid("name is empty"));
    }
    for component in Path::new(name).components() {
        match component {
            Component::Normal(_) => {}
            Component::ParentDir => return Err(invalid("'..' is not allowed")),
            Component::CurDir => return Err(invalid("'.' is not allowed")),
            Component::RootDir | Component::Prefix(_) => {
                return Err(invalid("must be relative to the prune root"));
            }
        }
    }
    Ok(())
}
