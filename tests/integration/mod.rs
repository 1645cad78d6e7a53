//! Integration test suite for the resolver
//!
//! These tests drive [`prs_resolver::resolver::Resolver`] end to end over
//! in-memory and on-disk source trees.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **caching**: cache hits, cache disabled, failed loads cached like any other result
//! - **cycles**: circular `@inherit`/`@use` detection
//! - **extends**: `@extend` paths, aliased targets, dropped targets
//! - **fs_store**: resolution from disk through `ResolverConfig`
//! - **hierarchy**: an organization / team / project tree
//! - **imports**: `@use` precedence and failures
//! - **inheritance**: `@inherit` merging and failures
//! - **invariants**: properties every resolved program satisfies
//! - **templating**: parameterized `@inherit`/`@use`

mod hierarchy;
mod imports;
mod inheritance;
mod invariants;
mod templating;
