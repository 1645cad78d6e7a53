//! Resolution of `@inherit`, `@use` and `@extend` into one self-contained AST.
//!
//! # Overview
//!
//! [`Resolver::resolve`] loads an entry file from a [`ContentStore`], parses it
//! with a [`Parser`] and then, in this order:
//!
//! 1. resolves the `@inherit` parent (recursively) and merges the child over
//!    it ([`inherit`]);
//! 2. resolves each `@use` in declaration order and layers it under the
//!    current AST ([`imports`]);
//! 3. applies `@extend` patches and strips synthetic import blocks
//!    ([`extend`]).
//!
//! Parents and imports are themselves fully resolved before they are merged.
//! Parameterized references bind their arguments and interpolate a copy of the
//! target AST first (see [`templating`](crate::templating)).
//!
//! # Errors
//!
//! Missing files, parse failures, unresolved parents or imports and binding
//! problems are collected in [`ResolvedAst::errors`] and resolution continues
//! with whatever AST is available. A cycle is the only fatal condition and is
//! returned as a [`CircularDependencyError`].
//!
//! # Caching and the cycle guard
//!
//! A resolver keeps the files it is currently resolving in an ordered set and,
//! when [`ResolverOptions::cache`] is on, every result it produced, failed
//! loads included.
//! `resolve` takes `&mut self`, so one resolver runs one top-level resolution
//! at a time. Independent resolutions use independent resolvers.
//!
//! # Example
//!
//! ```rust
//! use prs_resolver::parser::JsonParser;
//! use prs_resolver::resolver::Resolver;
//! use prs_resolver::store::MemoryContentStore;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let store = MemoryContentStore::new()
//!     .with_file("base.prs", r#"{"blocks":[{"name":"identity","content":{"type":"TextContent","value":"Base"}}]}"#)
//!     .with_file("app.prs", r#"{"inherit":{"path":{"raw":"./base","isRelative":true}},
//!         "blocks":[{"name":"identity","content":{"type":"TextContent","value":"App"}}]}"#);
//!
//! let mut resolver = Resolver::new(store, JsonParser);
//! let resolved = resolver.resolve("app").await.unwrap();
//! let ast = resolved.ast.unwrap();
//! assert_eq!(ast.blocks[0].content.text_value(), Some("Base\n\nApp"));
//! assert_eq!(resolved.sources, vec!["app.prs", "base.prs"]);
//! # }
//! ```

pub mod extend;
pub mod imports;
pub mod inherit;
pub mod merge;
pub mod path;

use indexmap::IndexSet;
use std::collections::HashMap;
use tracing::{debug, trace};

use self::extend::apply_extends;
use self::imports::merge_import;
use self::inherit::merge_inherited;
use self::path::{normalize, resolve_reference};
use crate::ast::{Program, Properties, SourceLocation};
use crate::config::ResolverOptions;
use crate::core::{CircularDependencyError, ResolveError};
use crate::parser::{ParseOptions, Parser};
use crate::store::ContentStore;
use crate::templating::{InterpolationContext, bind_params, interpolate_program, needs_binding};

/// Outcome of resolving one file.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedAst {
    /// The merged program, or `None` when the file itself failed to load or parse.
    pub ast: Option<Program>,
    /// Every contributing file, deduplicated, in discovery order.
    pub sources: Vec<String>,
    /// Accumulated non-fatal errors.
    pub errors: Vec<ResolveError>,
}

impl ResolvedAst {
    fn failed(path: &str, errors: Vec<ResolveError>) -> Self {
        Self {
            ast: None,
            sources: vec![path.to_string()],
            errors,
        }
    }

    /// True when an AST was produced and no errors were collected.
    pub fn is_clean(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }
}

/// Recursive resolver over a content store and a parser.
#[derive(Debug)]
pub struct Resolver<S, P> {
    store: S,
    parser: P,
    options: ResolverOptions,
    cache: HashMap<String, ResolvedAst>,
    resolving: IndexSet<String>,
}

/// Per-file accumulator for sources and errors.
#[derive(Default)]
struct Collected {
    sources: IndexSet<String>,
    errors: Vec<ResolveError>,
}

impl Collected {
    fn absorb(&mut self, other: &ResolvedAst) {
        self.sources.extend(other.sources.iter().cloned());
        self.errors.extend(other.errors.iter().cloned());
    }
}

impl<S: ContentStore, P: Parser> Resolver<S, P> {
    pub fn new(store: S, parser: P) -> Self {
        Self::with_options(store, parser, ResolverOptions::default())
    }

    pub fn with_options(store: S, parser: P, options: ResolverOptions) -> Self {
        Self {
            store,
            parser,
            options,
            cache: HashMap::new(),
            resolving: IndexSet::new(),
        }
    }

    pub fn options(&self) -> &ResolverOptions {
        &self.options
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn parser(&self) -> &P {
        &self.parser
    }

    /// Whether a resolved result for `path` is cached.
    pub fn is_cached(&self, path: &str) -> bool {
        self.cache.contains_key(&normalize(path))
    }

    /// Forget every cached result.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }

    /// Resolve `entry` and everything it depends on.
    ///
    /// `entry` is normalized first, so `"app"`, `"/app"` and `"app.prs"` name
    /// the same file.
    ///
    /// # Errors
    ///
    /// Returns [`CircularDependencyError`] when a file is reached again while
    /// it is still being resolved. The chain holds every file being resolved,
    /// in order, followed by the repeated one. All other problems are reported
    /// through [`ResolvedAst::errors`].
    pub async fn resolve(&mut self, entry: &str) -> Result<ResolvedAst, CircularDependencyError> {
        let path = normalize(entry);

        if self.resolving.contains(&path) {
            let mut chain: Vec<String> = self.resolving.iter().cloned().collect();
            chain.push(path);
            debug!("Cycle detected: {}", chain.join(" -> "));
            return Err(CircularDependencyError::new(chain));
        }

        if self.options.cache
            && let Some(cached) = self.cache.get(&path)
        {
            trace!("Cache hit for {}", path);
            return Ok(cached.clone());
        }

        self.resolving.insert(path.clone());
        let result = Box::pin(self.resolve_uncached(&path)).await;
        self.resolving.shift_remove(&path);
        let resolved = result?;

        if self.options.cache {
            self.cache.insert(path, resolved.clone());
        }
        Ok(resolved)
    }

    async fn resolve_uncached(&mut self, path: &str) -> Result<ResolvedAst, CircularDependencyError> {
        debug!("Resolving {}", path);

        let program = match self.load(path).await {
            Ok(program) => program,
            Err(errors) => return Ok(ResolvedAst::failed(path, errors)),
        };

        let mut collected = Collected::default();
        collected.sources.insert(path.to_string());

        let program = self.resolve_inherit(program, path, &mut collected).await?;
        let program = self.resolve_imports(program, path, &mut collected).await?;
        let program = apply_extends(program);

        debug!(
            "Resolved {} ({} sources, {} errors)",
            path,
            collected.sources.len(),
            collected.errors.len()
        );
        Ok(ResolvedAst {
            ast: Some(program),
            sources: collected.sources.into_iter().collect(),
            errors: collected.errors,
        })
    }

    /// Read and parse one file.
    async fn load(&self, path: &str) -> Result<Program, Vec<ResolveError>> {
        if !self.store.exists(path).await {
            return Err(vec![ResolveError::FileNotFound {
                path: path.to_string(),
            }]);
        }

        let source = self.store.read(path).await.map_err(|e| {
            vec![ResolveError::ReadFailed {
                path: path.to_string(),
                reason: format!("{e:#}"),
            }]
        })?;

        let options = ParseOptions {
            filename: path.to_string(),
            env_vars: self.options.env_vars.clone(),
        };
        let outcome = self.parser.parse(&source, &options);

        if !outcome.errors.is_empty() {
            return Err(outcome
                .errors
                .into_iter()
                .map(|diagnostic| ResolveError::Parse {
                    path: path.to_string(),
                    message: diagnostic.message,
                    location: diagnostic.location,
                })
                .collect());
        }
        outcome.ast.ok_or_else(|| {
            vec![ResolveError::Parse {
                path: path.to_string(),
                message: "parser produced no AST".to_string(),
                location: None,
            }]
        })
    }

    async fn resolve_inherit(
        &mut self,
        child: Program,
        path: &str,
        collected: &mut Collected,
    ) -> Result<Program, CircularDependencyError> {
        let Some(inherit) = child.inherit.clone() else {
            return Ok(child);
        };

        let parent_path = resolve_reference(&inherit.path, path);
        debug!("{} inherits {}", path, parent_path);
        let parent = Box::pin(self.resolve(&parent_path)).await?;
        collected.absorb(&parent);

        let Some(parent_ast) = parent.ast else {
            collected.errors.push(ResolveError::ParentUnresolved {
                path: path.to_string(),
                parent: parent_path,
            });
            return Ok(Program {
                inherit: None,
                ..child
            });
        };

        let parent_ast = bind_and_interpolate(
            parent_ast,
            inherit.params.as_ref(),
            &parent_path,
            inherit.loc.as_ref().or(inherit.path.loc.as_ref()),
            collected,
        );
        Ok(merge_inherited(&parent_ast, &child))
    }

    async fn resolve_imports(
        &mut self,
        mut program: Program,
        path: &str,
        collected: &mut Collected,
    ) -> Result<Program, CircularDependencyError> {
        let uses = program.uses.clone();

        for decl in &uses {
            let import_path = resolve_reference(&decl.path, path);
            debug!(
                "{} uses {}{}",
                path,
                import_path,
                decl.alias
                    .as_deref()
                    .map(|alias| format!(" as {alias}"))
                    .unwrap_or_default()
            );
            let imported = Box::pin(self.resolve(&import_path)).await?;
            collected.absorb(&imported);

            let Some(imported_ast) = imported.ast else {
                collected.errors.push(ResolveError::ImportUnresolved {
                    path: path.to_string(),
                    import: import_path,
                });
                continue;
            };

            let imported_ast = bind_and_interpolate(
                imported_ast,
                decl.params.as_ref(),
                &import_path,
                decl.loc.as_ref().or(decl.path.loc.as_ref()),
                collected,
            );
            program = merge_import(program, &imported_ast, decl.alias.as_deref(), &import_path);
        }

        Ok(program)
    }
}

/// Bind call-site arguments against `target`'s params and interpolate it.
///
/// On a binding or interpolation error the error is collected and `target`
/// is returned un-interpolated.
fn bind_and_interpolate(
    target: Program,
    args: Option<&Properties>,
    target_path: &str,
    call_site: Option<&SourceLocation>,
    collected: &mut Collected,
) -> Program {
    if !needs_binding(args, target.params()) {
        return target;
    }

    let interpolated = bind_params(args, target.params(), target_path, call_site).and_then(|bound| {
        interpolate_program(&target, &InterpolationContext::new(&bound, target_path))
    });
    match interpolated {
        Ok(program) => program,
        Err(e) => {
            debug!("Template binding failed for {}: {}", target_path, e);
            collected.errors.push(e);
            target
        }
    }
}
