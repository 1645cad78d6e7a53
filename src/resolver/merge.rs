//! Type-directed merging of block content.
//!
//! Every function here is pure: inputs are borrowed and the result is a freshly
//! cloned value, so a cached parent can be merged into any number of children
//! without aliasing.
//!
//! Merges are always expressed as `(base, override)`. For `@inherit` the parent
//! is the base; for `@use` the imported file is the base and the importer the
//! override; for `@extend` the target block is the base.
//!
//! | base \ override | Text        | Object      | Array        | Mixed       |
//! |-----------------|-------------|-------------|--------------|-------------|
//! | Text            | text rule   | override    | override     | fold: Mixed |
//! | Object          | override    | object rule | override     | fold: Mixed |
//! | Array           | override    | override    | unique concat| override    |
//! | Mixed           | fold: Mixed | fold: Mixed | override     | both rules  |

use crate::ast::{Content, Properties, TextContent, Value};

/// Merge two block contents, `child` taking precedence.
///
/// # Examples
///
/// ```rust
/// use prs_resolver::ast::{Content, Value};
/// use prs_resolver::resolver::merge::merge_content;
///
/// let merged = merge_content(
///     &Content::array(vec![Value::from(1), Value::from(2), Value::from(3)]),
///     &Content::array(vec![Value::from(2), Value::from(3), Value::from(4)]),
/// );
/// assert_eq!(
///     merged,
///     Content::array(vec![Value::from(1), Value::from(2), Value::from(3), Value::from(4)])
/// );
/// ```
#[must_use]
pub fn merge_content(parent: &Content, child: &Content) -> Content {
    match (parent, child) {
        (
            Content::Text {
                value: parent_value,
                ..
            },
            Content::Text {
                value: child_value,
                loc,
            },
        ) => Content::Text {
            value: merge_text(parent_value, child_value),
            loc: loc.clone(),
        },

        (
            Content::Object {
                properties: parent_props,
            },
            Content::Object {
                properties: child_props,
            },
        ) => Content::Object {
            properties: merge_properties(parent_props, child_props),
        },

        (
            Content::Array {
                elements: parent_elements,
            },
            Content::Array {
                elements: child_elements,
            },
        ) => Content::Array {
            elements: unique_concat(parent_elements, child_elements),
        },

        (
            Content::Mixed {
                text: parent_text,
                properties: parent_props,
            },
            Content::Mixed {
                text: child_text,
                properties: child_props,
            },
        ) => Content::Mixed {
            text: merge_optional_text(parent_text.as_ref(), child_text.as_ref()),
            properties: merge_properties(parent_props, child_props),
        },

        (
            Content::Mixed {
                text: parent_text,
                properties,
            },
            Content::Text { value, loc },
        ) => Content::Mixed {
            text: merge_optional_text(
                parent_text.as_ref(),
                Some(&TextContent {
                    value: value.clone(),
                    loc: loc.clone(),
                }),
            ),
            properties: properties.clone(),
        },

        (
            Content::Text { value, loc },
            Content::Mixed {
                text: child_text,
                properties,
            },
        ) => Content::Mixed {
            text: merge_optional_text(
                Some(&TextContent {
                    value: value.clone(),
                    loc: loc.clone(),
                }),
                child_text.as_ref(),
            ),
            properties: properties.clone(),
        },

        (
            Content::Mixed {
                text,
                properties: parent_props,
            },
            Content::Object {
                properties: child_props,
            },
        ) => Content::Mixed {
            text: text.clone(),
            properties: merge_properties(parent_props, child_props),
        },

        (
            Content::Object {
                properties: parent_props,
            },
            Content::Mixed {
                text,
                properties: child_props,
            },
        ) => Content::Mixed {
            text: text.clone(),
            properties: merge_properties(parent_props, child_props),
        },

        // Remaining shape mismatches: no structural merge, the override replaces the base.
        (_, child) => child.clone(),
    }
}

/// Merge two text values.
///
/// Both sides are trimmed before comparison:
/// - equal: the child's value;
/// - the child restates the parent (contains it): the child's value;
/// - the parent already contains the child: the parent's value;
/// - otherwise the two are concatenated, separated by a blank line.
///
/// ```rust
/// use prs_resolver::resolver::merge::merge_text;
///
/// assert_eq!(merge_text("Hello", "Hello world"), "Hello world");
/// assert_eq!(merge_text("Hello world", "Hello"), "Hello world");
/// assert_eq!(merge_text("A", "B"), "A\n\nB");
/// ```
#[must_use]
pub fn merge_text(parent: &str, child: &str) -> String {
    let parent_trimmed = parent.trim();
    let child_trimmed = child.trim();

    if parent_trimmed == child_trimmed || child_trimmed.contains(parent_trimmed) {
        child.to_string()
    } else if parent_trimmed.contains(child_trimmed) {
        parent.to_string()
    } else {
        format!("{parent_trimmed}\n\n{child_trimmed}")
    }
}

fn merge_optional_text(
    parent: Option<&TextContent>,
    child: Option<&TextContent>,
) -> Option<TextContent> {
    match (parent, child) {
        (Some(parent), Some(child)) => Some(TextContent {
            value: merge_text(&parent.value, &child.value),
            loc: child.loc.clone(),
        }),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

/// Recursively merge two property maps, `child` taking precedence.
///
/// Parent keys keep their position; keys only the child has are appended.
/// For keys present on both sides: arrays are unique-concatenated, nested
/// objects merge recursively, and anything else (scalars, text nodes,
/// mismatched kinds) takes the child's value.
///
/// ```rust
/// use prs_resolver::ast::{Properties, Value};
/// use prs_resolver::resolver::merge::merge_properties;
///
/// let mut inner_a = Properties::new();
/// inner_a.insert("x".into(), Value::from(1));
/// let mut parent = Properties::new();
/// parent.insert("a".into(), Value::Object(inner_a));
///
/// let mut inner_b = Properties::new();
/// inner_b.insert("y".into(), Value::from(2));
/// let mut child = Properties::new();
/// child.insert("a".into(), Value::Object(inner_b));
///
/// let merged = merge_properties(&parent, &child);
/// let a = merged["a"].as_object().unwrap();
/// assert_eq!(a["x"], Value::from(1));
/// assert_eq!(a["y"], Value::from(2));
/// ```
#[must_use]
pub fn merge_properties(parent: &Properties, child: &Properties) -> Properties {
    let mut merged = parent.clone();

    for (key, child_value) in child {
        let value = match merged.get(key) {
            None => child_value.clone(),
            Some(parent_value) => merge_values(parent_value, child_value),
        };
        merged.insert(key.clone(), value);
    }

    merged
}

/// Merge two property values present on both sides of a merge.
#[must_use]
pub fn merge_values(parent: &Value, child: &Value) -> Value {
    match (parent, child) {
        (Value::Array(parent_elements), Value::Array(child_elements)) => {
            Value::Array(unique_concat(parent_elements, child_elements))
        }
        (Value::Object(parent_props), Value::Object(child_props)) => {
            Value::Object(merge_properties(parent_props, child_props))
        }
        (_, child) => child.clone(),
    }
}

/// Concatenate two arrays dropping later duplicates.
///
/// Duplicates are detected with [`Value::dedupe_key`]; the first occurrence
/// keeps its position.
#[must_use]
pub fn unique_concat(parent: &[Value], child: &[Value]) -> Vec<Value> {
    let mut seen = std::collections::HashSet::new();
    parent
        .iter()
        .chain(child)
        .filter(|element| seen.insert(element.dedupe_key()))
        .cloned()
        .collect()
}
