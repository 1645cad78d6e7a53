//! `@extend`: dot-path patches applied onto merged blocks.
//!
//! The first segment of a target path names a block. When an aliased import
//! marker with that name exists and the path has at least two segments, the
//! target is the namespaced copy of the imported block instead, so
//! `@extend header.title.style` patches `style` inside the block `title`
//! imported as `header`.
//!
//! Targets that do not exist are dropped without an error.

use tracing::debug;

use super::merge::merge_content;
use crate::ast::{Block, Content, ExtendBlock, Program, Properties, TextContent, Value};
use crate::constants::{
    EXTEND_PATH_SEPARATOR, MIXED_TEXT_KEY, import_marker_name, is_import_marker,
    namespaced_block_name,
};

/// Apply every extension in declaration order, then strip import markers.
///
/// The returned program has no `extends` and no blocks whose name starts with
/// the import marker prefix.
#[must_use]
pub fn apply_extends(program: Program) -> Program {
    let Program {
        meta,
        inherit,
        uses,
        mut blocks,
        extends,
        loc,
    } = program;

    for ext in &extends {
        apply_extend(&mut blocks, ext);
    }
    blocks.retain(|block| !is_import_marker(&block.name));

    Program {
        meta,
        inherit,
        uses,
        blocks,
        extends: Vec::new(),
        loc,
    }
}

/// Apply the extensions rooted at `alias` to a block list holding that alias'
/// marker and namespaced blocks. Other extensions are ignored.
pub fn apply_scoped_extends(blocks: &mut [Block], alias: &str, extends: &[ExtendBlock]) {
    for ext in extends {
        let mut segments = ext.target_path.split(EXTEND_PATH_SEPARATOR);
        if segments.next() == Some(alias) && segments.next().is_some() {
            apply_extend(blocks, ext);
        }
    }
}

/// Apply one extension. Returns false when the target block does not exist.
pub fn apply_extend(blocks: &mut [Block], ext: &ExtendBlock) -> bool {
    let segments: Vec<&str> = ext.target_path.split(EXTEND_PATH_SEPARATOR).collect();
    let Some((root, rest)) = segments.split_first() else {
        return false;
    };

    let marker = import_marker_name(root);
    let (target, path) = if segments.len() >= 2 && blocks.iter().any(|b| b.name == marker) {
        (namespaced_block_name(root, segments[1]), &segments[2..])
    } else {
        (root.to_string(), rest)
    };

    let Some(block) = blocks.iter_mut().find(|b| b.name == target) else {
        debug!(
            "Dropping @extend {}: no block named '{}'",
            ext.target_path, target
        );
        return false;
    };

    block.content = if path.is_empty() {
        merge_content(&block.content, &ext.content)
    } else {
        merge_at_path(&block.content, path, &ext.content)
    };
    true
}

/// Merge `ext` into `content` at the nested property `path` (non-empty).
///
/// Missing intermediate keys, or keys holding something other than an object,
/// are replaced by a fresh nested structure. Text content gains properties and
/// becomes mixed content. Array content has no addressable properties and is
/// returned unchanged.
#[must_use]
pub fn merge_at_path(content: &Content, path: &[&str], ext: &Content) -> Content {
    match content {
        Content::Object { properties } => Content::Object {
            properties: merge_into_properties(properties, path, ext),
        },
        Content::Mixed { text, properties } => Content::Mixed {
            text: text.clone(),
            properties: merge_into_properties(properties, path, ext),
        },
        Content::Text { value, loc } => Content::Mixed {
            text: Some(TextContent {
                value: value.clone(),
                loc: loc.clone(),
            }),
            properties: merge_into_properties(&Properties::new(), path, ext),
        },
        Content::Array { .. } => {
            debug!(
                "Dropping @extend at '{}': array content has no properties",
                path.join(".")
            );
            content.clone()
        }
    }
}

fn merge_into_properties(properties: &Properties, path: &[&str], ext: &Content) -> Properties {
    let mut merged = properties.clone();
    let Some((key, rest)) = path.split_first() else {
        return merged;
    };

    let value = if rest.is_empty() {
        merge_leaf(properties.get(*key), ext)
    } else {
        match properties.get(*key) {
            Some(Value::Object(inner)) => Value::Object(merge_into_properties(inner, rest, ext)),
            _ => build_path_value(rest, ext),
        }
    };
    merged.insert((*key).to_string(), value);
    merged
}

fn merge_leaf(existing: Option<&Value>, ext: &Content) -> Value {
    let Some(existing) = existing else {
        return content_to_value(ext);
    };
    match value_to_content(existing) {
        Some(base) => {
            let merged = merge_content(&base, ext);
            match (existing, merged) {
                (Value::String(_), Content::Text { value, .. }) => Value::String(value),
                (_, merged) => content_to_value(&merged),
            }
        }
        None => content_to_value(ext),
    }
}

/// Build the nested value `{a: {b: ... ext}}` for the remaining `path`.
#[must_use]
pub fn build_path_value(path: &[&str], ext: &Content) -> Value {
    match path.split_first() {
        None => content_to_value(ext),
        Some((key, rest)) => {
            let mut properties = Properties::new();
            properties.insert((*key).to_string(), build_path_value(rest, ext));
            Value::Object(properties)
        }
    }
}

fn value_to_content(value: &Value) -> Option<Content> {
    match value {
        Value::Object(properties) => Some(Content::Object {
            properties: properties.clone(),
        }),
        Value::Array(elements) => Some(Content::Array {
            elements: elements.clone(),
        }),
        Value::Text(text) => Some(Content::Text {
            value: text.value.clone(),
            loc: text.loc.clone(),
        }),
        Value::String(s) => Some(Content::text(s.clone())),
        _ => None,
    }
}

fn content_to_value(content: &Content) -> Value {
    match content {
        Content::Text { value, loc } => Value::Text(TextContent {
            value: value.clone(),
            loc: loc.clone(),
        }),
        Content::Object { properties } => Value::Object(properties.clone()),
        Content::Array { elements } => Value::Array(elements.clone()),
        Content::Mixed { text, properties } => {
            let mut properties = properties.clone();
            if let Some(text) = text {
                properties
                    .entry(MIXED_TEXT_KEY.to_string())
                    .or_insert_with(|| Value::Text(text.clone()));
            }
            Value::Object(properties)
        }
    }
}
