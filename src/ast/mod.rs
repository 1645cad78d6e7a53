//! Abstract syntax tree of a PromptScript program.
//!
//! A [`Program`] is produced by the parser for exactly one `.prs` file and is
//! consumed (never mutated) by the [`resolver`](crate::resolver). All types
//! serialize with camelCase field names; this JSON shape is the interchange
//! format accepted by [`JsonParser`](crate::parser::JsonParser).
//!
//! # Example
//!
//! ```rust
//! use prs_resolver::ast::{Block, Content, Program};
//!
//! let mut program = Program::default();
//! program.blocks.push(Block::new("identity", Content::text("You are a reviewer.")));
//! assert!(program.block("identity").is_some());
//! ```

mod value;

pub use value::{Properties, TemplateExpression, TextContent, Value};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a node in its source file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceLocation {
    pub file: String,
    pub line: u32,
    pub column: u32,
}

impl SourceLocation {
    pub fn new(file: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file, self.line, self.column)
    }
}

/// Root node: one parsed source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Program {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<MetaBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherit: Option<InheritDecl>,
    #[serde(default)]
    pub uses: Vec<UseDecl>,
    #[serde(default)]
    pub blocks: Vec<Block>,
    #[serde(default)]
    pub extends: Vec<ExtendBlock>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl Program {
    /// Look up a block by name.
    pub fn block(&self, name: &str) -> Option<&Block> {
        self.blocks.iter().find(|b| b.name == name)
    }

    /// Parameters this file declares in its `@meta` block.
    pub fn params(&self) -> &[ParamDefinition] {
        self.meta
            .as_ref()
            .and_then(|meta| meta.params.as_deref())
            .unwrap_or_default()
    }
}

/// The `@meta` block.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaBlock {
    #[serde(default)]
    pub fields: Properties,
    /// Parameters accepted when this file is inherited or imported with arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Vec<ParamDefinition>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `@inherit <path>(args)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InheritDecl {
    pub path: PathReference,
    /// Call-site arguments bound against the parent's declared params.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// `@use <path>(args) [as alias]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UseDecl {
    pub path: PathReference,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Properties>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// A named content block such as `@identity` or `@standards`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub name: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl Block {
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            content,
            loc: None,
        }
    }
}

/// `@extend a.b.c { ... }`: a patch onto an already merged block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtendBlock {
    pub target_path: String,
    pub content: Content,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl ExtendBlock {
    pub fn new(target_path: impl Into<String>, content: Content) -> Self {
        Self {
            target_path: target_path.into(),
            content,
            loc: None,
        }
    }
}

/// Block content. The shape may differ between a parent and a child block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Content {
    #[serde(rename = "TextContent")]
    Text {
        value: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        loc: Option<SourceLocation>,
    },
    #[serde(rename = "ObjectContent")]
    Object {
        #[serde(default)]
        properties: Properties,
    },
    #[serde(rename = "ArrayContent")]
    Array {
        #[serde(default)]
        elements: Vec<Value>,
    },
    #[serde(rename = "MixedContent")]
    Mixed {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        text: Option<TextContent>,
        #[serde(default)]
        properties: Properties,
    },
}

impl Content {
    pub fn text(value: impl Into<String>) -> Self {
        Content::Text {
            value: value.into(),
            loc: None,
        }
    }

    pub fn object(properties: Properties) -> Self {
        Content::Object { properties }
    }

    pub fn array(elements: Vec<Value>) -> Self {
        Content::Array { elements }
    }

    pub fn mixed(text: Option<&str>, properties: Properties) -> Self {
        Content::Mixed {
            text: text.map(TextContent::new),
            properties,
        }
    }

    /// Short name of the content shape, used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Content::Text { .. } => "text",
            Content::Object { .. } => "object",
            Content::Array { .. } => "array",
            Content::Mixed { .. } => "mixed",
        }
    }

    /// Object or mixed properties.
    pub fn properties(&self) -> Option<&Properties> {
        match self {
            Content::Object { properties } | Content::Mixed { properties, .. } => Some(properties),
            _ => None,
        }
    }

    /// Text of a text block, or the text part of mixed content.
    pub fn text_value(&self) -> Option<&str> {
        match self {
            Content::Text { value, .. } => Some(value),
            Content::Mixed { text, .. } => text.as_ref().map(|t| t.value.as_str()),
            _ => None,
        }
    }
}

/// Reference to another source file from `@inherit` or `@use`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathReference {
    pub raw: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub namespace: Option<String>,
    #[serde(default)]
    pub segments: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default)]
    pub is_relative: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

/// A parameter a file accepts when inherited or imported with arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParamDefinition {
    pub name: String,
    pub param_type: ParamType,
    #[serde(default)]
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loc: Option<SourceLocation>,
}

impl ParamDefinition {
    pub fn new(name: impl Into<String>, param_type: ParamType) -> Self {
        Self {
            name: name.into(),
            param_type,
            optional: false,
            default_value: None,
            loc: None,
        }
    }

    /// A parameter may be omitted when it is declared optional or has a default.
    pub fn is_optional(&self) -> bool {
        self.optional || self.default_value.is_some()
    }
}

/// Declared type of a template parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ParamType {
    String,
    Number,
    Boolean,
    Enum { options: Vec<String> },
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::String => write!(f, "string"),
            ParamType::Number => write!(f, "number"),
            ParamType::Boolean => write!(f, "boolean"),
            ParamType::Enum { options } => write!(f, "enum({})", options.join(", ")),
        }
    }
}
