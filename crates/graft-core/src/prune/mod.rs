//! Tree pruner: delete every file below a set of named subdirectories.
//!
//! Directories themselves are left in place; only files (and symlinks,
//! which are never followed) are removed.

mod error;
mod pruner;
mod report;
mod target;

pub use error::{PruneError, PruneRootError, RootFailure};
pub use pruner::prune;
pub use report::{PruneReport, RootReport};
pub use target::{InvalidTarget, PruneTarget};

#[cfg(test)]
mod tests;
