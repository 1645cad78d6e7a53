//! Error handling for the resolution engine
//!
//! Resolution distinguishes two kinds of failure:
//! 1. **Accumulated errors** ([`ResolveError`]) - a missing file, a parse failure, a
//!    parent or import that could not be resolved, or a template binding problem.
//!    These are collected into [`ResolvedAst::errors`](crate::resolver::ResolvedAst)
//!    so one pass over a large dependency graph reports every independent problem.
//! 2. **Fatal errors** ([`CircularDependencyError`]) - a cycle makes the rest of the
//!    resolution meaningless, so it unwinds the whole recursive resolution.
//!
//! # Examples
//!
//! ```rust
//! use prs_resolver::core::{CircularDependencyError, ResolveError};
//!
//! let err = ResolveError::FileNotFound { path: "base.prs".to_string() };
//! assert_eq!(err.to_string(), "File not found: base.prs");
//! assert_eq!(err.path(), Some("base.prs"));
//!
//! let cycle = CircularDependencyError::new(vec!["a.prs".into(), "b.prs".into(), "a.prs".into()]);
//! assert!(cycle.to_string().contains("Circular dependency detected"));
//! ```

use thiserror::Error;

use crate::ast::SourceLocation;

/// A recoverable resolution problem.
///
/// Every variant is cheap to clone because resolved results, errors included,
/// are cached and handed out to multiple dependents.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    /// The content store has no file at the canonical path.
    #[error("File not found: {path}")]
    FileNotFound {
        /// Canonical path that was looked up
        path: String,
    },

    /// The content store reported the file but reading it failed.
    #[error("Failed to read {path}: {reason}")]
    ReadFailed {
        /// Canonical path of the file
        path: String,
        /// Underlying I/O failure, including its context chain
        reason: String,
    },

    /// The parser rejected the file.
    #[error("Parse error in {path}{}: {message}", display_location(.location))]
    Parse {
        /// Canonical path of the file
        path: String,
        /// Parser diagnostic
        message: String,
        /// Where the parser stopped, when known
        location: Option<SourceLocation>,
    },

    /// The `@inherit` target produced no AST.
    #[error("Failed to resolve parent {parent} inherited by {path}")]
    ParentUnresolved {
        /// File declaring the `@inherit`
        path: String,
        /// Canonical path of the parent
        parent: String,
    },

    /// A `@use` target produced no AST.
    #[error("Failed to resolve import {import} used by {path}")]
    ImportUnresolved {
        /// File declaring the `@use`
        path: String,
        /// Canonical path of the import
        import: String,
    },

    /// A required parameter was not supplied and has no default.
    #[error("Missing required parameter '{name}' for {source_path}{}", display_location(.location))]
    MissingParam {
        /// Parameter name
        name: String,
        /// File declaring the parameter
        source_path: String,
        /// Call site of the `@inherit`/`@use`
        location: Option<SourceLocation>,
    },

    /// A supplied argument does not fit the declared parameter type.
    #[error("Invalid value for parameter '{name}' of {source_path}: expected {expected}, got {found}")]
    InvalidParam {
        /// Parameter name
        name: String,
        /// File declaring the parameter
        source_path: String,
        /// Declared type
        expected: String,
        /// Supplied value
        found: String,
    },

    /// A template expression references a name that is not bound.
    #[error("Undefined template variable '{name}' in {source_path}{}", display_location(.location))]
    UnboundTemplate {
        /// Referenced name
        name: String,
        /// File being interpolated
        source_path: String,
        /// Location of the expression itself
        location: Option<SourceLocation>,
    },
}

impl ResolveError {
    /// The file this error is about, when there is a single one.
    pub fn path(&self) -> Option<&str> {
        match self {
            ResolveError::FileNotFound { path }
            | ResolveError::ReadFailed { path, .. }
            | ResolveError::Parse { path, .. }
            | ResolveError::ParentUnresolved { path, .. }
            | ResolveError::ImportUnresolved { path, .. } => Some(path),
            ResolveError::MissingParam { source_path, .. }
            | ResolveError::InvalidParam { source_path, .. }
            | ResolveError::UnboundTemplate { source_path, .. } => Some(source_path),
        }
    }

    /// A short hint for the user, when one applies.
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            ResolveError::FileNotFound { .. } => Some(
                "Check the @inherit/@use path; relative paths start with ./ or ../ and resolve against the referencing file",
            ),
            ResolveError::MissingParam { .. } => {
                Some("Pass the parameter in the @inherit/@use arguments or give it a default")
            }
            ResolveError::UnboundTemplate { .. } => {
                Some("Declare the parameter in @meta params of the file that uses it")
            }
            _ => None,
        }
    }
}

fn display_location(location: &Option<SourceLocation>) -> String {
    location
        .as_ref()
        .map(|loc| format!(" at {loc}"))
        .unwrap_or_default()
}

/// A resolution chain revisited a file that is still being resolved.
///
/// The chain lists the files in the order they were entered, ending with the
/// file that closed the loop.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Circular dependency detected: {}", .chain.join(" -> "))]
pub struct CircularDependencyError {
    /// Ordered canonical paths that formed the loop
    pub chain: Vec<String>,
}

impl CircularDependencyError {
    pub fn new(chain: Vec<String>) -> Self {
        Self { chain }
    }
}
