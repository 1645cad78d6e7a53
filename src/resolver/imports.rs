//! `@use`: mixin merge where the importing file wins conflicts.
//!
//! Imports are layered *under* existing content, the reverse of `@inherit`.
//! An aliased import (`@use ./frag as header`) also leaves a marker block and
//! namespaced copies of the imported blocks behind, so that
//! `@extend header.title` can address the imported `title` rather than the
//! importer's own block of the same name:
//!
//! ```text
//! __import__header        { __source: "frag.prs", __blocks: ["title"] }
//! __import__header.title  <verbatim copy of frag's title>
//! ```
//!
//! These synthetic blocks are removed by [`apply_extends`](super::extend::apply_extends).

use std::collections::HashSet;

use super::extend::apply_scoped_extends;
use super::merge::merge_content;
use crate::ast::{Block, Content, Program, Properties, Value};
use crate::constants::{
    MARKER_BLOCKS_KEY, MARKER_SOURCE_KEY, import_marker_name, namespaced_block_name,
};

/// Layer one resolved import under `target`.
///
/// Only blocks are merged; the importer keeps its own meta, uses and extends.
/// With an alias, the importer's extensions rooted at that alias are applied
/// to the imported blocks before layering, then the marker and verbatim
/// namespaced copies are injected.
#[must_use]
pub fn merge_import(
    target: Program,
    source: &Program,
    alias: Option<&str>,
    source_path: &str,
) -> Program {
    let Some(alias) = alias else {
        let blocks = merge_blocks_for_import(&target.blocks, &source.blocks);
        return Program { blocks, ..target };
    };

    let aliased = alias_blocks(alias, source_path, &source.blocks);
    let mut scoped = aliased.clone();
    apply_scoped_extends(&mut scoped, alias, &target.extends);

    let extended: Vec<Block> = source
        .blocks
        .iter()
        .map(|block| {
            let namespaced = namespaced_block_name(alias, &block.name);
            match scoped.iter().find(|b| b.name == namespaced) {
                Some(patched) => Block {
                    name: block.name.clone(),
                    content: patched.content.clone(),
                    loc: block.loc.clone(),
                },
                None => block.clone(),
            }
        })
        .collect();

    let mut blocks = merge_blocks_for_import(&target.blocks, &extended);
    // The copies stay unpatched: `apply_extends` re-applies alias paths to them
    // and strips them, so the patch only reaches the output through `extended`.
    inject_blocks(&mut blocks, aliased);
    Program { blocks, ..target }
}

/// Merge imported `source` blocks under `target` blocks.
///
/// Target order is kept; a same-named pair merges with the source as base
/// and the target as override. Source-only blocks are appended.
#[must_use]
pub fn merge_blocks_for_import(target: &[Block], source: &[Block]) -> Vec<Block> {
    let target_names: HashSet<&str> = target.iter().map(|b| b.name.as_str()).collect();

    let mut merged: Vec<Block> = target
        .iter()
        .map(|target_block| match source.iter().find(|b| b.name == target_block.name) {
            Some(source_block) => Block {
                name: target_block.name.clone(),
                content: merge_content(&source_block.content, &target_block.content),
                loc: target_block.loc.clone(),
            },
            None => target_block.clone(),
        })
        .collect();

    merged.extend(
        source
            .iter()
            .filter(|b| !target_names.contains(b.name.as_str()))
            .cloned(),
    );
    merged
}

/// The marker block for `alias` followed by namespaced copies of `blocks`.
#[must_use]
pub fn alias_blocks(alias: &str, source_path: &str, blocks: &[Block]) -> Vec<Block> {
    let mut marker = Properties::new();
    marker.insert(MARKER_SOURCE_KEY.to_string(), Value::from(source_path));
    marker.insert(
        MARKER_BLOCKS_KEY.to_string(),
        Value::Array(blocks.iter().map(|b| Value::from(b.name.as_str())).collect()),
    );

    let mut aliased = Vec::with_capacity(blocks.len() + 1);
    aliased.push(Block::new(import_marker_name(alias), Content::object(marker)));
    aliased.extend(blocks.iter().map(|block| Block {
        name: namespaced_block_name(alias, &block.name),
        content: block.content.clone(),
        loc: block.loc.clone(),
    }));
    aliased
}

/// Add `injected` to `blocks`, replacing any block with the same name in place.
fn inject_blocks(blocks: &mut Vec<Block>, injected: Vec<Block>) {
    for block in injected {
        match blocks.iter_mut().find(|b| b.name == block.name) {
            Some(existing) => *existing = block,
            None => blocks.push(block),
        }
    }
}
