use anyhow::{Result, anyhow};
use std::collections::HashMap;

use super::ContentStore;

/// In-memory store keyed by normalized path.
#[derive(Debug, Clone, Default)]
pub struct MemoryContentStore {
    files: HashMap<String, String>,
}

impl MemoryContentStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, path: impl Into<String>, content: impl Into<String>) {
        self.files.insert(path.into(), content.into());
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<String>, content: impl Into<String>) -> Self {
        self.insert(path, content);
        self
    }

    pub fn remove(&mut self, path: &str) -> Option<String> {
        self.files.remove(path)
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

impl ContentStore for MemoryContentStore {
    async fn exists(&self, path: &str) -> bool {
        self.files.contains_key(path)
    }

    async fn read(&self, path: &str) -> Result<String> {
        self.files
            .get(path)
            .cloned()
            .ok_or_else(|| anyhow!("No such file in memory store: {path}"))
    }
}
