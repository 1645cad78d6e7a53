//! `@inherit`: single-parent merge where the child overrides its base.

use std::collections::HashSet;

use super::merge::{merge_content, merge_properties};
use crate::ast::{Block, MetaBlock, Program};

/// Merge a resolved `parent` into `child`.
///
/// - meta: fields deep-merge with the child winning; the child's param
///   declarations are kept. When only one side has meta, that side is used.
/// - blocks: the parent's order is kept, same-named blocks are merged with
///   [`merge_content`], and child-only blocks are appended in child order.
/// - `inherit` is cleared; `uses` and `extends` come from the child alone.
///
/// Neither input is modified.
#[must_use]
pub fn merge_inherited(parent: &Program, child: &Program) -> Program {
    Program {
        meta: merge_meta(parent.meta.as_ref(), child.meta.as_ref()),
        inherit: None,
        uses: child.uses.clone(),
        blocks: merge_blocks(&parent.blocks, &child.blocks),
        extends: child.extends.clone(),
        loc: child.loc.clone(),
    }
}

fn merge_meta(parent: Option<&MetaBlock>, child: Option<&MetaBlock>) -> Option<MetaBlock> {
    match (parent, child) {
        (Some(parent), Some(child)) => Some(MetaBlock {
            fields: merge_properties(&parent.fields, &child.fields),
            params: child.params.clone(),
            loc: child.loc.clone(),
        }),
        (Some(only), None) | (None, Some(only)) => Some(only.clone()),
        (None, None) => None,
    }
}

fn merge_blocks(parent: &[Block], child: &[Block]) -> Vec<Block> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut merged = Vec::with_capacity(parent.len() + child.len());

    for parent_block in parent {
        match child.iter().find(|b| b.name == parent_block.name) {
            Some(child_block) => {
                seen.insert(child_block.name.as_str());
                merged.push(Block {
                    name: parent_block.name.clone(),
                    content: merge_content(&parent_block.content, &child_block.content),
                    loc: child_block.loc.clone(),
                });
            }
            None => merged.push(parent_block.clone()),
        }
    }

    merged.extend(
        child
            .iter()
            .filter(|b| !seen.contains(b.name.as_str()))
            .cloned(),
    );
    merged
}
