//! Placeholder substitution through a program.

use regex::{Captures, Regex};
use std::sync::LazyLock;

use super::BoundParams;
use crate::ast::{Block, Content, ExtendBlock, MetaBlock, Program, Properties, TextContent, Value};
use crate::core::ResolveError;

static PLACEHOLDER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\{\{\s*([A-Za-z_][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
});

/// Bound values plus the file being interpolated (for error reporting).
#[derive(Debug, Clone, Copy)]
pub struct InterpolationContext<'a> {
    pub params: &'a BoundParams,
    pub source_file: &'a str,
}

impl<'a> InterpolationContext<'a> {
    pub fn new(params: &'a BoundParams, source_file: &'a str) -> Self {
        Self {
            params,
            source_file,
        }
    }
}

/// Produce a copy of `program` with every template expression replaced.
///
/// Template expression nodes are replaced by the bound value itself, so a
/// number parameter stays a number. `{{name}}` placeholders inside text and
/// string values are replaced by the value's plain string form; placeholders
/// naming an unbound parameter are left as written.
///
/// # Errors
///
/// Returns [`ResolveError::UnboundTemplate`] for the first template expression
/// node whose name is not bound, located at the expression itself.
pub fn interpolate_program(
    program: &Program,
    ctx: &InterpolationContext<'_>,
) -> Result<Program, ResolveError> {
    let meta = program
        .meta
        .as_ref()
        .map(|meta| -> Result<MetaBlock, ResolveError> {
            Ok(MetaBlock {
                fields: interpolate_properties(&meta.fields, ctx)?,
                ..meta.clone()
            })
        })
        .transpose()?;

    let blocks = program
        .blocks
        .iter()
        .map(|block| {
            Ok(Block {
                content: interpolate_content(&block.content, ctx)?,
                ..block.clone()
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;

    let extends = program
        .extends
        .iter()
        .map(|ext| {
            Ok(ExtendBlock {
                content: interpolate_content(&ext.content, ctx)?,
                ..ext.clone()
            })
        })
        .collect::<Result<Vec<_>, ResolveError>>()?;

    Ok(Program {
        meta,
        blocks,
        extends,
        ..program.clone()
    })
}

/// Replace `{{name}}` placeholders in `text` with bound values.
///
/// ```rust
/// use prs_resolver::ast::Value;
/// use prs_resolver::templating::{BoundParams, interpolate_text};
///
/// let mut params = BoundParams::new();
/// params.insert("project".into(), Value::from("atlas"));
/// assert_eq!(
///     interpolate_text("Work on {{project}} ({{ other }})", &params),
///     "Work on atlas ({{ other }})"
/// );
/// ```
pub fn interpolate_text(text: &str, params: &BoundParams) -> String {
    if !text.contains("{{") {
        return text.to_string();
    }
    PLACEHOLDER
        .replace_all(text, |caps: &Captures<'_>| match params.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

fn interpolate_content(content: &Content, ctx: &InterpolationContext<'_>) -> Result<Content, ResolveError> {
    Ok(match content {
        Content::Text { value, loc } => Content::Text {
            value: interpolate_text(value, ctx.params),
            loc: loc.clone(),
        },
        Content::Object { properties } => Content::Object {
            properties: interpolate_properties(properties, ctx)?,
        },
        Content::Array { elements } => Content::Array {
            elements: interpolate_elements(elements, ctx)?,
        },
        Content::Mixed { text, properties } => Content::Mixed {
            text: text.as_ref().map(|t| interpolate_text_node(t, ctx)),
            properties: interpolate_properties(properties, ctx)?,
        },
    })
}

fn interpolate_properties(
    properties: &Properties,
    ctx: &InterpolationContext<'_>,
) -> Result<Properties, ResolveError> {
    properties
        .iter()
        .map(|(key, value)| Ok((key.clone(), interpolate_value(value, ctx)?)))
        .collect()
}

fn interpolate_elements(
    elements: &[Value],
    ctx: &InterpolationContext<'_>,
) -> Result<Vec<Value>, ResolveError> {
    elements.iter().map(|v| interpolate_value(v, ctx)).collect()
}

fn interpolate_text_node(text: &TextContent, ctx: &InterpolationContext<'_>) -> TextContent {
    TextContent {
        value: interpolate_text(&text.value, ctx.params),
        loc: text.loc.clone(),
    }
}

fn interpolate_value(value: &Value, ctx: &InterpolationContext<'_>) -> Result<Value, ResolveError> {
    Ok(match value {
        Value::Template(expr) => match ctx.params.get(&expr.name) {
            Some(bound) => bound.clone(),
            None => {
                return Err(ResolveError::UnboundTemplate {
                    name: expr.name.clone(),
                    source_path: ctx.source_file.to_string(),
                    location: expr.loc.clone(),
                });
            }
        },
        Value::String(s) => Value::String(interpolate_text(s, ctx.params)),
        Value::Text(text) => Value::Text(interpolate_text_node(text, ctx)),
        Value::Array(elements) => Value::Array(interpolate_elements(elements, ctx)?),
        Value::Object(properties) => Value::Object(interpolate_properties(properties, ctx)?),
        scalar => scalar.clone(),
    })
}
