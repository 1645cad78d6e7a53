//! Template parameters for parameterized `@inherit` and `@use`.
//!
//! A file declares the parameters it accepts in its `@meta` block. A file that
//! inherits or imports it supplies arguments at the call site:
//!
//! ```text
//! # base.prs
//! @meta { id: "base" params: { tone: string = "neutral", level: enum(junior, senior) } }
//! @identity { """You are a {{level}} reviewer with a {{tone}} tone.""" }
//!
//! # app.prs
//! @inherit ./base(level: senior)
//! ```
//!
//! Resolution binds the arguments against the declarations with
//! [`bind_params`], then substitutes every placeholder in a copy of the
//! imported AST with [`interpolate_program`]. The importing file's own AST is
//! never interpolated.
//!
//! # Binding rules
//!
//! - A supplied argument wins over the declared default.
//! - A parameter is optional when it is declared `optional` or has a default;
//!   omitted optional parameters without a default stay unbound.
//! - A required parameter without an argument is a [`ResolveError::MissingParam`].
//! - Arguments are checked against the declared type; enum arguments must be
//!   one of the declared options ([`ResolveError::InvalidParam`]).
//! - Arguments that match no declaration are logged and ignored.

mod interpolate;

pub use interpolate::{InterpolationContext, interpolate_program, interpolate_text};

use indexmap::IndexMap;
use tracing::warn;

use crate::ast::{ParamDefinition, ParamType, Properties, SourceLocation, Value};
use crate::core::ResolveError;

/// Bound parameter values by name.
pub type BoundParams = IndexMap<String, Value>;

/// Whether a call site needs binding at all.
///
/// Binding and interpolation are skipped entirely when the target declares no
/// params and the call site passes no arguments.
pub fn needs_binding(args: Option<&Properties>, defs: &[ParamDefinition]) -> bool {
    !defs.is_empty() || args.is_some_and(|a| !a.is_empty())
}

/// Bind call-site arguments to the parameters declared by `source_path`.
///
/// `location` is the call site and is attached to missing-parameter errors.
///
/// # Errors
///
/// Returns the first [`ResolveError::MissingParam`] or
/// [`ResolveError::InvalidParam`] encountered, in declaration order.
///
/// # Examples
///
/// ```rust
/// use prs_resolver::ast::{ParamDefinition, ParamType, Properties, Value};
/// use prs_resolver::templating::bind_params;
///
/// let mut tone = ParamDefinition::new("tone", ParamType::String);
/// tone.default_value = Some(Value::from("neutral"));
///
/// let mut args = Properties::new();
/// args.insert("tone".into(), Value::from("friendly"));
///
/// let bound = bind_params(Some(&args), &[tone], "base.prs", None).unwrap();
/// assert_eq!(bound["tone"], Value::from("friendly"));
/// ```
pub fn bind_params(
    args: Option<&Properties>,
    defs: &[ParamDefinition],
    source_path: &str,
    location: Option<&SourceLocation>,
) -> Result<BoundParams, ResolveError> {
    let mut bound = BoundParams::new();

    for def in defs {
        match args.and_then(|a| a.get(&def.name)) {
            Some(value) => {
                check_type(def, value, source_path)?;
                bound.insert(def.name.clone(), value.clone());
            }
            None => match &def.default_value {
                Some(default) => {
                    bound.insert(def.name.clone(), default.clone());
                }
                None if def.is_optional() => {}
                None => {
                    return Err(ResolveError::MissingParam {
                        name: def.name.clone(),
                        source_path: source_path.to_string(),
                        location: location.cloned(),
                    });
                }
            },
        }
    }

    if let Some(args) = args {
        for name in args.keys().filter(|name| !defs.iter().any(|d| &d.name == *name)) {
            match closest_param(name, defs) {
                Some(suggestion) => warn!(
                    "Argument '{}' is not a parameter of {} (did you mean '{}'?)",
                    name, source_path, suggestion
                ),
                None => warn!("Argument '{}' is not a parameter of {}", name, source_path),
            }
        }
    }

    Ok(bound)
}

fn check_type(def: &ParamDefinition, value: &Value, source_path: &str) -> Result<(), ResolveError> {
    let matches = match (&def.param_type, value) {
        (ParamType::String, Value::String(_) | Value::Text(_)) => true,
        (ParamType::Number, Value::Number(_)) => true,
        (ParamType::Boolean, Value::Bool(_)) => true,
        (ParamType::Enum { options }, value) => value
            .as_str()
            .is_some_and(|s| options.iter().any(|option| option == s)),
        _ => false,
    };

    if matches {
        Ok(())
    } else {
        Err(ResolveError::InvalidParam {
            name: def.name.clone(),
            source_path: source_path.to_string(),
            expected: def.param_type.to_string(),
            found: value.to_string(),
        })
    }
}

fn closest_param<'a>(name: &str, defs: &'a [ParamDefinition]) -> Option<&'a str> {
    // Suggest only within half the argument's length.
    let max_distance = name.chars().count().div_ceil(2);
    defs.iter()
        .map(|def| (def.name.as_str(), strsim::levenshtein(name, &def.name)))
        .filter(|(_, distance)| *distance <= max_distance)
        .min_by_key(|(_, distance)| *distance)
        .map(|(candidate, _)| candidate)
}
