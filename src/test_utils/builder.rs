//! Fluent builder for test programs
//!
//! Building [`Program`] values by hand is verbose; the builder keeps tests
//! focused on the shapes being merged.

use anyhow::Result;

use crate::ast::{
    Block, Content, ExtendBlock, InheritDecl, MetaBlock, ParamDefinition, PathReference, Program,
    Properties, UseDecl, Value,
};

/// Build a [`Properties`] map from `(key, value)` pairs.
pub fn props<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Properties
where
    K: Into<String>,
    V: Into<Value>,
{
    entries
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// A builder for [`Program`] values with a fluent API
#[derive(Debug, Clone, Default)]
pub struct ProgramBuilder {
    program: Program,
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    fn meta_mut(&mut self) -> &mut MetaBlock {
        self.program.meta.get_or_insert_with(MetaBlock::default)
    }

    /// Set one `@meta` field
    pub fn meta_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.meta_mut().fields.insert(key.into(), value.into());
        self
    }

    /// Declare a template parameter in `@meta`
    pub fn param(mut self, param: ParamDefinition) -> Self {
        self.meta_mut()
            .params
            .get_or_insert_with(Vec::new)
            .push(param);
        self
    }

    /// `@inherit <path>`
    pub fn inherit(self, path: &str) -> Self {
        self.inherit_with(path, None)
    }

    /// `@inherit <path>(args)`
    pub fn inherit_with(mut self, path: &str, args: Option<Properties>) -> Self {
        self.program.inherit = Some(InheritDecl {
            path: PathReference::parse(path),
            params: args,
            loc: None,
        });
        self
    }

    /// `@use <path>`
    pub fn uses(self, path: &str) -> Self {
        self.use_with(path, None, None)
    }

    /// `@use <path> as <alias>`
    pub fn use_as(self, path: &str, alias: &str) -> Self {
        self.use_with(path, Some(alias), None)
    }

    /// `@use <path>(args) [as alias]`
    pub fn use_with(mut self, path: &str, alias: Option<&str>, args: Option<Properties>) -> Self {
        self.program.uses.push(UseDecl {
            path: PathReference::parse(path),
            alias: alias.map(str::to_string),
            params: args,
            loc: None,
        });
        self
    }

    pub fn block(mut self, name: &str, content: Content) -> Self {
        self.program.blocks.push(Block::new(name, content));
        self
    }

    pub fn text_block(self, name: &str, text: &str) -> Self {
        self.block(name, Content::text(text))
    }

    pub fn object_block(self, name: &str, properties: Properties) -> Self {
        self.block(name, Content::object(properties))
    }

    pub fn array_block(self, name: &str, elements: Vec<Value>) -> Self {
        self.block(name, Content::array(elements))
    }

    /// `@extend <target_path> { ... }`
    pub fn extend(mut self, target_path: &str, content: Content) -> Self {
        self.program
            .extends
            .push(ExtendBlock::new(target_path, content));
        self
    }

    pub fn build(self) -> Program {
        self.program
    }

    /// The JSON interchange form read by [`JsonParser`](crate::parser::JsonParser)
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.program)?)
    }
}
