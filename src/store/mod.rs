//! Content stores: where the resolver reads `.prs` source text from.
//!
//! Paths handed to a store are already normalized by the resolver
//! (forward slashes, no leading `/`, `.prs` suffix). Registry paths keep their
//! `@namespace/` prefix so a store can route them separately.

mod fs;
mod memory;

pub use fs::FsContentStore;
pub use memory::MemoryContentStore;

use anyhow::Result;
use std::future::Future;

/// Async source of file contents.
pub trait ContentStore {
    /// Whether `path` exists in this store.
    fn exists(&self, path: &str) -> impl Future<Output = bool> + Send;

    /// Read the full text of `path`.
    fn read(&self, path: &str) -> impl Future<Output = Result<String>> + Send;
}
