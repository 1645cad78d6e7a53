//! The parser boundary.
//!
//! Grammar parsing of PRS source text lives outside this crate. The resolver
//! only needs something that turns source text into a [`Program`] and reports
//! diagnostics with locations, which is what [`Parser`] describes.
//! [`JsonParser`] reads the JSON interchange form of the AST.

use std::collections::BTreeMap;
use std::fmt;

use crate::ast::{Program, SourceLocation};

/// Options passed to every parse call.
#[derive(Debug, Clone, Default)]
pub struct ParseOptions {
    /// Normalized path of the file being parsed.
    pub filename: String,
    /// Environment variables forwarded from the resolver options, untouched.
    pub env_vars: Option<BTreeMap<String, String>>,
}

/// A single parse problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDiagnostic {
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.location {
            Some(loc) => write!(f, "{} at {}", self.message, loc),
            None => f.write_str(&self.message),
        }
    }
}

/// Result of a parse: an AST when parsing succeeded, diagnostics otherwise.
#[derive(Debug, Clone, Default)]
pub struct ParseOutcome {
    pub ast: Option<Program>,
    pub errors: Vec<ParseDiagnostic>,
}

impl ParseOutcome {
    pub fn success(ast: Program) -> Self {
        Self {
            ast: Some(ast),
            errors: Vec::new(),
        }
    }

    pub fn failure(errors: Vec<ParseDiagnostic>) -> Self {
        Self { ast: None, errors }
    }

    /// True when an AST was produced without diagnostics.
    pub fn is_ok(&self) -> bool {
        self.ast.is_some() && self.errors.is_empty()
    }
}

/// Turns source text into a [`Program`].
pub trait Parser {
    fn parse(&self, source: &str, options: &ParseOptions) -> ParseOutcome;
}

/// Parser for the JSON form of [`Program`].
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonParser;

impl Parser for JsonParser {
    fn parse(&self, source: &str, options: &ParseOptions) -> ParseOutcome {
        match serde_json::from_str::<Program>(source) {
            Ok(program) => ParseOutcome::success(program),
            Err(e) => {
                let location = (e.line() > 0).then(|| {
                    SourceLocation::new(
                        options.filename.clone(),
                        u32::try_from(e.line()).unwrap_or(u32::MAX),
                        u32::try_from(e.column()).unwrap_or(u32::MAX),
                    )
                });
                ParseOutcome::failure(vec![ParseDiagnostic {
                    message: e.to_string(),
                    location,
                }])
            }
        }
    }
}
