use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::trace;

use super::ContentStore;

/// Reads sources from disk.
///
/// Local paths resolve against `local_root`. Registry paths
/// (`@namespace/...`) resolve against `registry_root` with the `@` dropped,
/// falling back to `local_root` when no registry root is configured.
#[derive(Debug, Clone)]
pub struct FsContentStore {
    local_root: PathBuf,
    registry_root: Option<PathBuf>,
}

impl FsContentStore {
    pub fn new(local_root: impl Into<PathBuf>) -> Self {
        Self {
            local_root: local_root.into(),
            registry_root: None,
        }
    }

    #[must_use]
    pub fn with_registry(mut self, registry_root: impl Into<PathBuf>) -> Self {
        self.registry_root = Some(registry_root.into());
        self
    }

    pub fn local_root(&self) -> &Path {
        &self.local_root
    }

    pub fn registry_root(&self) -> Option<&Path> {
        self.registry_root.as_deref()
    }

    /// Map a normalized resolver path to a file on disk.
    pub fn full_path(&self, path: &str) -> PathBuf {
        match (path.strip_prefix('@'), &self.registry_root) {
            (Some(registry_path), Some(root)) => root.join(registry_path),
            (Some(registry_path), None) => self.local_root.join(registry_path),
            (None, _) => self.local_root.join(path),
        }
    }
}

impl ContentStore for FsContentStore {
    async fn exists(&self, path: &str) -> bool {
        let full = self.full_path(path);
        let found = fs::try_exists(&full).await.unwrap_or(false);
        trace!("exists {} -> {}", full.display(), found);
        found
    }

    async fn read(&self, path: &str) -> Result<String> {
        let full = self.full_path(path);
        fs::read_to_string(&full)
            .await
            .with_context(|| format!("Failed to read {}", full.display()))
    }
}
