//! PromptScript resolution engine.
//!
//! A PromptScript (`.prs`) file declares metadata, an optional parent
//! (`@inherit`), mixins (`@use`), named content blocks and patch-style
//! extensions (`@extend`) to blocks defined elsewhere. This crate takes the
//! parsed AST of one file and expands it into a single self-contained AST:
//! parents and imports are resolved recursively, merged with type-aware
//! rules, extensions are applied and template parameters are bound.
//!
//! # Layout
//!
//! - [`ast`] - the program model shared with the parser
//! - [`parser`] - the parser boundary and a JSON parser for the AST form
//! - [`store`] - where source text is read from
//! - [`resolver`] - the recursive resolver and its merge stages
//! - [`templating`] - parameter binding and interpolation
//! - [`config`] - resolver options and their TOML form
//! - [`core`] - error types
//!
//! # Quick start
//!
//! ```rust,no_run
//! use prs_resolver::config::ResolverConfig;
//! use prs_resolver::parser::JsonParser;
//! use prs_resolver::resolver::Resolver;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ResolverConfig::load_from(std::path::Path::new("prs.toml")).await?;
//! let mut resolver = Resolver::with_options(config.content_store(), JsonParser, config.options());
//!
//! let resolved = resolver.resolve("project.prs").await?;
//! for error in &resolved.errors {
//!     eprintln!("{error}");
//! }
//! # Ok(())
//! # }
//! ```

// Data model
pub mod ast;
pub mod constants;

// Boundaries
pub mod parser;
pub mod store;

// Resolution
pub mod config;
pub mod core;
pub mod resolver;
pub mod templating;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
