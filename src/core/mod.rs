//! Core types shared across the engine.
//!
//! Currently this is the error model; see [`error`] for how accumulated and
//! fatal errors differ.

pub mod error;

pub use error::{CircularDependencyError, ResolveError};
