//! Properties that hold for every resolved program

use anyhow::Result;
use std::collections::HashSet;
use prs_resolver::ast::{Content, Program, Value};
use prs_resolver::constants::IMPORT_MARKER_PREFIX;
use prs_resolver::resolver::extend::apply_extends;
use prs_resolver::resolver::inherit::merge_inherited;
use prs_resolver::resolver::merge::merge_content;
use prs_resolver::test_utils::{ProgramBuilder, TestWorkspace, layered_workspace, props};

fn assert_resolved_shape(program: &Program) {
    assert!(program.inherit.is_none());
    assert!(program.extends.is_empty());
    assert!(
        program
            .blocks
            .iter()
            .all(|b| !b.name.starts_with(IMPORT_MARKER_PREFIX)),
        "synthetic import blocks leaked: {:?}",
        program.blocks.iter().map(|b| &b.name).collect::<Vec<_>>()
    );
}

#[tokio::test]
async fn test_every_file_resolves_to_a_flat_program() -> Result<()> {
    let workspace = layered_workspace()?;
    let mut resolver = workspace.resolver();
    for entry in [
        "@org/base",
        "teams/web/shared/review",
        "teams/web/team",
        "teams/web/project",
    ] {
        let resolved = resolver.resolve(entry).await?;
        assert!(resolved.is_clean(), "{entry}: {:?}", resolved.errors);
        assert_resolved_shape(resolved.ast.as_ref().unwrap());

        let unique: HashSet<&String> = resolved.sources.iter().collect();
        assert_eq!(unique.len(), resolved.sources.len());
    }
    Ok(())
}

#[tokio::test]
async fn test_standalone_file_resolves_to_itself() -> Result<()> {
    let program = ProgramBuilder::new()
        .meta_field("id", "standalone")
        .meta_field("tags", vec![Value::from("a"), Value::from("b")])
        .text_block("identity", "You are a careful reviewer.")
        .object_block(
            "standards",
            props([
                ("indent", Value::from(2)),
                ("note", Value::text("keep it short")),
                ("nested", Value::Object(props([("strict", true)]))),
            ]),
        )
        .array_block("restrictions", vec![Value::from("no secrets"), Value::from(3)])
        .block(
            "context",
            Content::mixed(Some("Project notes"), props([("links", "docs")])),
        )
        .build();

    let mut workspace = TestWorkspace::new();
    workspace.add("x", &program)?;

    let resolved = workspace.resolver().resolve("x").await?;
    assert!(resolved.errors.is_empty(), "{:?}", resolved.errors);
    assert_eq!(resolved.sources, vec!["x.prs"]);
    assert_eq!(resolved.ast, Some(program));
    Ok(())
}

#[test]
fn test_merge_is_idempotent() {
    let contents = [
        Content::text("  Indented text  "),
        Content::object(props([
            ("a", Value::from(1)),
            ("list", Value::Array(vec![Value::from("x"), Value::from("x")])),
        ])),
        Content::array(vec![Value::from(1), Value::from(2)]),
        Content::mixed(Some("Notes"), props([("k", "v")])),
    ];
    for content in &contents {
        let once = merge_content(content, content);
        assert_eq!(merge_content(&once, &once), once, "{content:?}");
    }
    assert_eq!(
        merge_content(&contents[0], &contents[0]),
        contents[0],
        "equal text keeps the child value"
    );
}

#[test]
fn test_self_inheritance_keeps_blocks() {
    let program = ProgramBuilder::new()
        .text_block("identity", "Same")
        .object_block("standards", props([("a", 1)]))
        .array_block("restrictions", vec![Value::from("r")])
        .build();

    let merged = merge_inherited(&program, &program);
    assert_eq!(merged.blocks, program.blocks);
}

#[test]
fn test_apply_extends_is_a_pure_transformation() {
    let program = ProgramBuilder::new()
        .object_block("standards", props([("a", 1)]))
        .extend("standards.b", Content::text("two"))
        .build();
    let before = program.clone();

    let first = apply_extends(program.clone());
    let second = apply_extends(program.clone());
    assert_eq!(first, second);
    assert_eq!(program, before);
    assert_resolved_shape(&first);
}

#[tokio::test]
async fn test_cached_results_are_independent_copies() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "base",
        &ProgramBuilder::new().object_block("standards", props([("a", 1)])).build(),
    )?;
    let mut resolver = workspace.resolver();

    let mut first = resolver.resolve("base").await?.ast.unwrap();
    first.blocks.clear();

    let second = resolver.resolve("base").await?.ast.unwrap();
    assert_eq!(second.blocks.len(), 1);
    Ok(())
}
