//! Configuration for a vendoring run (`graft.toml`).
//!
//! Relative paths in the file are resolved against the directory holding
//! the file, never against the process working directory.

mod error;
pub mod parser;
pub mod schema;

pub use error::ConfigError;
pub use parser::{load_config, parse_config_str, to_toml, write_template};
pub use schema::{GraftConfig, PruneSection, ToolsSection, VendorSection};

/// Default configuration file name.
pub const CONFIG_FILE_NAME: &str = "graft.toml";
