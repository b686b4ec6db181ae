//! Graft Core Library
//!
//! Vendors a pinned snapshot of an upstream repository into a host project:
//! clone, check out an exact commit, apply a local patch, then prune the
//! vendored tree down to the parts the host actually needs.

pub mod config;
pub mod fetch;
pub mod fs;
pub mod pipeline;
pub mod prune;
pub mod tools;

/// Re-exports of commonly used types
pub mod prelude {
    // Configuration
    pub use crate::config::{ConfigError, GraftConfig};

    // Fetching
    pub use crate::fetch::{FetchError, VendorFetcher, VendorSpec, WorkingTree};

    // Pruning
    pub use crate::prune::{PruneError, PruneReport, PruneRootError, PruneTarget, prune};

    // Pipeline
    pub use crate::pipeline::{Pipeline, PipelineConfig, PipelineError, PipelineReport};

    // External tools
    pub use crate::tools::{GitCli, ToolFailure, VendorTools};
}
