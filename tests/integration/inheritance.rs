//! `@inherit` end to end

use anyhow::Result;
use prs_resolver::ast::{Content, Value};
use prs_resolver::core::ResolveError;
use prs_resolver::test_utils::{ProgramBuilder, TestWorkspace, init_test_logging, props};

#[tokio::test]
async fn test_child_text_appended_to_parent() -> Result<()> {
    init_test_logging(None);
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "lib/base",
        &ProgramBuilder::new()
            .text_block("identity", "You are helpful.")
            .build(),
    )?;
    workspace.add(
        "lib/app",
        &ProgramBuilder::new()
            .inherit("./base")
            .text_block("identity", "Be concise.")
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("lib/app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    let ast = resolved.ast.unwrap();
    assert_eq!(
        ast.block("identity").unwrap().content.text_value(),
        Some("You are helpful.\n\nBe concise.")
    );
    assert!(ast.inherit.is_none());
    assert_eq!(resolved.sources, vec!["lib/app.prs", "lib/base.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_contained_text_is_not_duplicated() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "base",
        &ProgramBuilder::new().text_block("identity", "Be concise.").build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit("./base")
            .text_block("identity", "  You are helpful. Be concise.  ")
            .build(),
    )?;

    let ast = workspace.resolver().resolve("app").await?.ast.unwrap();
    assert_eq!(
        ast.blocks[0].content.text_value(),
        Some("  You are helpful. Be concise.  ")
    );
    Ok(())
}

#[tokio::test]
async fn test_multi_level_chain() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "a",
        &ProgramBuilder::new()
            .object_block("standards", props([("a", 1)]))
            .array_block("restrictions", vec![Value::from("x")])
            .build(),
    )?;
    workspace.add(
        "b",
        &ProgramBuilder::new()
            .inherit("./a")
            .object_block("standards", props([("b", 2)]))
            .array_block("restrictions", vec![Value::from("x"), Value::from("y")])
            .build(),
    )?;
    workspace.add(
        "c",
        &ProgramBuilder::new()
            .inherit("./b")
            .object_block("standards", props([("a", 10)]))
            .text_block("context", "Only in c")
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("c").await?;
    let ast = resolved.ast.unwrap();
    let names: Vec<&str> = ast.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["standards", "restrictions", "context"]);
    assert_eq!(
        ast.blocks[0].content,
        Content::object(props([("a", 10), ("b", 2)]))
    );
    assert_eq!(
        ast.blocks[1].content,
        Content::array(vec![Value::from("x"), Value::from("y")])
    );
    assert_eq!(resolved.sources, vec!["c.prs", "b.prs", "a.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_shape_mismatch_child_wins() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "base",
        &ProgramBuilder::new()
            .array_block("knowledge", vec![Value::from("a")])
            .build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit("./base")
            .text_block("knowledge", "Replaced")
            .build(),
    )?;

    let ast = workspace.resolver().resolve("app").await?.ast.unwrap();
    assert_eq!(ast.blocks[0].content, Content::text("Replaced"));
    Ok(())
}

#[tokio::test]
async fn test_missing_parent_is_accumulated() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit("./nowhere")
            .text_block("identity", "Still here")
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert_eq!(
        resolved.errors,
        vec![
            ResolveError::FileNotFound {
                path: "nowhere.prs".into()
            },
            ResolveError::ParentUnresolved {
                path: "app.prs".into(),
                parent: "nowhere.prs".into(),
            },
        ]
    );
    let ast = resolved.ast.unwrap();
    assert!(ast.inherit.is_none());
    assert_eq!(ast.blocks[0].content.text_value(), Some("Still here"));
    assert_eq!(resolved.sources, vec!["app.prs", "nowhere.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_parent_parse_error_is_accumulated() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add_raw("base", "{ not json");
    workspace.add("app", &ProgramBuilder::new().inherit("./base").build())?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(resolved.ast.is_some());
    assert_eq!(resolved.errors.len(), 2);
    assert!(matches!(
        &resolved.errors[0],
        ResolveError::Parse { path, location: Some(_), .. } if path == "base.prs"
    ));
    assert!(matches!(
        &resolved.errors[1],
        ResolveError::ParentUnresolved { .. }
    ));
    Ok(())
}

#[tokio::test]
async fn test_meta_merge_through_inheritance() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "base",
        &ProgramBuilder::new()
            .meta_field("id", "base")
            .meta_field("syntax", "1.0.0")
            .meta_field("tags", vec![Value::from("core")])
            .build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit("./base")
            .meta_field("id", "app")
            .meta_field("tags", vec![Value::from("web")])
            .build(),
    )?;

    let meta = workspace
        .resolver()
        .resolve("app")
        .await?
        .ast
        .unwrap()
        .meta
        .unwrap();
    assert_eq!(meta.fields["id"], Value::from("app"));
    assert_eq!(meta.fields["syntax"], Value::from("1.0.0"));
    assert_eq!(
        meta.fields["tags"],
        Value::Array(vec![Value::from("core"), Value::from("web")])
    );
    Ok(())
}
