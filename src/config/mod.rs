//! Resolver configuration.
//!
//! [`ResolverOptions`] are the knobs the [`Resolver`](crate::resolver::Resolver)
//! reads at runtime. [`ResolverConfig`] is their TOML form plus the roots of a
//! filesystem [`FsContentStore`], for callers that keep resolver settings in a
//! file:
//!
//! ```toml
//! local_path = "prompts"
//! registry_path = "registry"
//! cache = true
//!
//! [env_vars]
//! TEAM = "platform"
//! ```
//!
//! Relative roots are taken relative to the directory of the config file when
//! loaded with [`ResolverConfig::load_from`].

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::store::FsContentStore;

/// Runtime options of a resolver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolverOptions {
    /// Reuse resolved files across `resolve` calls on the same resolver.
    pub cache: bool,
    /// Forwarded to the parser untouched.
    pub env_vars: Option<BTreeMap<String, String>>,
}

impl Default for ResolverOptions {
    fn default() -> Self {
        Self {
            cache: true,
            env_vars: None,
        }
    }
}

impl ResolverOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_cache(mut self, cache: bool) -> Self {
        self.cache = cache;
        self
    }

    #[must_use]
    pub fn with_env_vars(mut self, env_vars: BTreeMap<String, String>) -> Self {
        self.env_vars = Some(env_vars);
        self
    }

    #[must_use]
    pub fn with_env_var(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.env_vars
            .get_or_insert_with(BTreeMap::new)
            .insert(name.into(), value.into());
        self
    }
}

/// File form of the resolver settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Root for local paths. Defaults to the current directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,

    /// Root for `@namespace/...` registry paths.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registry_path: Option<PathBuf>,

    /// Whether to cache resolved files. Defaults to true.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cache: Option<bool>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env_vars: BTreeMap<String, String>,
}

impl ResolverConfig {
    /// Parse a config from TOML text.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse resolver config")
    }

    /// Load a config file. Relative roots are anchored at the file's directory.
    pub async fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read resolver config from {}", path.display()))?;

        let mut config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse resolver config from {}", path.display()))?;

        if let Some(base) = path.parent() {
            config.local_path = Some(anchor(base, config.local_path.take()));
            config.registry_path = config.registry_path.map(|p| anchor(base, Some(p)));
        }
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).context("Failed to serialize resolver config")
    }

    pub fn options(&self) -> ResolverOptions {
        ResolverOptions {
            cache: self.cache.unwrap_or(true),
            env_vars: (!self.env_vars.is_empty()).then(|| self.env_vars.clone()),
        }
    }

    pub fn content_store(&self) -> FsContentStore {
        let local = self
            .local_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("."));
        let store = FsContentStore::new(local);
        match &self.registry_path {
            Some(registry) => store.with_registry(registry.clone()),
            None => store,
        }
    }
}

fn anchor(base: &Path, path: Option<PathBuf>) -> PathBuf {
    match path {
        Some(p) if p.is_absolute() => p,
        Some(p) => base.join(p),
        None => base.to_path_buf(),
    }
}
