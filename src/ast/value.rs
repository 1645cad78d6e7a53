//! Property values carried by meta fields, object content and array content.
//!
//! [`Value`] mirrors JSON with two extra node kinds: [`TextContent`] (a text
//! literal that keeps its source location) and [`TemplateExpression`] (a
//! `{{name}}` placeholder bound during template interpolation). The JSON
//! interchange form encodes both as objects tagged with a `type` field, so
//! conversion goes through [`serde_json::Value`] instead of a derived impl.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

use super::SourceLocation;

/// Ordered property map. Key order is insertion order and survives every merge.
pub type Properties = IndexMap<String, Value>;

const TEXT_NODE_TAG: &str = "TextContent";
const TEMPLATE_NODE_TAG: &str = "TemplateExpression";

/// A text literal with its source location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextContent {
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl TextContent {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            loc: None,
        }
    }
}

/// A `{{name}}` placeholder substituted when a parameterized file is bound.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TemplateExpression {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl TemplateExpression {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            loc: None,
        }
    }
}

/// A property value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value", into = "serde_json::Value")]
pub enum Value {
    Null,
    Bool(bool),
    Number(serde_json::Number),
    String(String),
    Array(Vec<Value>),
    Object(Properties),
    Text(TextContent),
    Template(TemplateExpression),
}

impl Value {
    /// Convenience constructor for string values.
    pub fn string(value: impl Into<String>) -> Self {
        Value::String(value.into())
    }

    /// Convenience constructor for text nodes.
    pub fn text(value: impl Into<String>) -> Self {
        Value::Text(TextContent::new(value))
    }

    /// Convenience constructor for template placeholders.
    pub fn template(name: impl Into<String>) -> Self {
        Value::Template(TemplateExpression::new(name))
    }

    pub fn as_object(&self) -> Option<&Properties> {
        match self {
            Value::Object(properties) => Some(properties),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            Value::Text(text) => Some(&text.value),
            _ => None,
        }
    }

    /// Short name of the value kind, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
            Value::Text(_) => "text",
            Value::Template(_) => "template expression",
        }
    }

    /// The JSON form of this value.
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::from(self.clone())
    }

    /// Key used to detect duplicates when concatenating arrays.
    ///
    /// Structured values (arrays, objects and the tagged text/template nodes)
    /// are keyed by their JSON encoding, scalars by their plain string form.
    /// Numbers are keyed by their `f64` value, so `1` and `1.0` are the same
    /// element. A number and a string with the same spelling also collide.
    pub fn dedupe_key(&self) -> String {
        match self {
            Value::Array(_) | Value::Object(_) | Value::Text(_) | Value::Template(_) => {
                self.to_json().to_string()
            }
            Value::Number(n) => n
                .as_f64()
                .map_or_else(|| n.to_string(), |f| f.to_string()),
            scalar => scalar.to_string(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => write!(f, "null"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Text(text) => write!(f, "{}", text.value),
            Value::Template(expr) => write!(f, "{{{{{}}}}}", expr.name),
            Value::Array(_) | Value::Object(_) => write!(f, "{}", self.to_json()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number(value.into())
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Number(value.into())
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value).map_or(Value::Null, Value::Number)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Value::Array(value)
    }
}

impl From<Properties> for Value {
    fn from(value: Properties) -> Self {
        Value::Object(value)
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = String;

    fn try_from(json: serde_json::Value) -> Result<Self, Self::Error> {
        use serde_json::Value as Json;

        Ok(match json {
            Json::Null => Value::Null,
            Json::Bool(b) => Value::Bool(b),
            Json::Number(n) => Value::Number(n),
            Json::String(s) => Value::String(s),
            Json::Array(items) => Value::Array(
                items
                    .into_iter()
                    .map(Value::try_from)
                    .collect::<Result<_, _>>()?,
            ),
            Json::Object(map) => match map.get("type").and_then(Json::as_str) {
                Some(TEXT_NODE_TAG) => Value::Text(
                    serde_json::from_value(Json::Object(map))
                        .map_err(|e| format!("invalid {TEXT_NODE_TAG} node: {e}"))?,
                ),
                Some(TEMPLATE_NODE_TAG) => Value::Template(
                    serde_json::from_value(Json::Object(map))
                        .map_err(|e| format!("invalid {TEMPLATE_NODE_TAG} node: {e}"))?,
                ),
                _ => Value::Object(
                    map.into_iter()
                        .map(|(key, value)| Ok((key, Value::try_from(value)?)))
                        .collect::<Result<_, String>>()?,
                ),
            },
        })
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        use serde_json::Value as Json;

        match value {
            Value::Null => Json::Null,
            Value::Bool(b) => Json::Bool(b),
            Value::Number(n) => Json::Number(n),
            Value::String(s) => Json::String(s),
            Value::Array(items) => Json::Array(items.into_iter().map(Json::from).collect()),
            Value::Object(properties) => Json::Object(
                properties
                    .into_iter()
                    .map(|(key, value)| (key, Json::from(value)))
                    .collect(),
            ),
            Value::Text(text) => tagged_node(TEXT_NODE_TAG, "value", text.value, text.loc),
            Value::Template(expr) => tagged_node(TEMPLATE_NODE_TAG, "name", expr.name, expr.loc),
        }
    }
}

fn tagged_node(
    tag: &str,
    field: &str,
    value: String,
    loc: Option<SourceLocation>,
) -> serde_json::Value {
    let mut node = serde_json::Map::new();
    node.insert("type".to_string(), json!(tag));
    node.insert(field.to_string(), json!(value));
    if let Some(loc) = loc {
        node.insert(
            "loc".to_string(),
            json!({ "file": loc.file, "line": loc.line, "column": loc.column }),
        );
    }
    serde_json::Value::Object(node)
}
