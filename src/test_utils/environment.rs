//! In-memory workspaces for resolver tests

use anyhow::Result;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ast::Program;
use crate::config::ResolverOptions;
use crate::parser::{JsonParser, ParseOptions, ParseOutcome, Parser};
use crate::resolver::Resolver;
use crate::resolver::path::normalize;
use crate::store::MemoryContentStore;

/// A set of source files held in memory, stored in JSON AST form.
#[derive(Debug, Clone, Default)]
pub struct TestWorkspace {
    store: MemoryContentStore,
}

impl TestWorkspace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a program under `path` (normalized like the resolver does).
    pub fn add(&mut self, path: &str, program: &Program) -> Result<&mut Self> {
        let json = serde_json::to_string(program)?;
        self.store.insert(normalize(path), json);
        Ok(self)
    }

    /// Add raw source text under `path`, bypassing serialization.
    pub fn add_raw(&mut self, path: &str, source: &str) -> &mut Self {
        self.store.insert(normalize(path), source);
        self
    }

    pub fn store(&self) -> &MemoryContentStore {
        &self.store
    }

    /// A resolver with default options over a snapshot of the workspace.
    pub fn resolver(&self) -> Resolver<MemoryContentStore, JsonParser> {
        self.resolver_with_options(ResolverOptions::default())
    }

    pub fn resolver_with_options(
        &self,
        options: ResolverOptions,
    ) -> Resolver<MemoryContentStore, JsonParser> {
        Resolver::with_options(self.store.clone(), JsonParser, options)
    }

    /// A resolver whose parser counts how often it is called.
    pub fn counting_resolver(
        &self,
        options: ResolverOptions,
    ) -> Resolver<MemoryContentStore, CountingParser> {
        Resolver::with_options(self.store.clone(), CountingParser::new(), options)
    }
}

/// A [`JsonParser`] that counts its calls.
///
/// Clones share the counter.
#[derive(Debug, Clone, Default)]
pub struct CountingParser {
    calls: Arc<AtomicUsize>,
    filenames: Arc<std::sync::Mutex<Vec<String>>>,
}

impl CountingParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Filenames in the order they were parsed.
    pub fn parsed_files(&self) -> Vec<String> {
        self.filenames
            .lock()
            .map(|names| names.clone())
            .unwrap_or_default()
    }
}

impl Parser for CountingParser {
    fn parse(&self, source: &str, options: &ParseOptions) -> ParseOutcome {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Ok(mut names) = self.filenames.lock() {
            names.push(options.filename.clone());
        }
        JsonParser.parse(source, options)
    }
}
