//! Vendor fetcher: clone an upstream repository, pin it to an exact commit
//! and apply a local patch on top.

mod error;
mod fetcher;
mod spec;
mod tree;

pub use error::FetchError;
pub use fetcher::VendorFetcher;
pub use spec::VendorSpec;
pub use tree::WorkingTree;
