//! `@use` end to end

use anyhow::Result;
use prs_resolver::ast::{Content, Value};
use prs_resolver::core::ResolveError;
use prs_resolver::test_utils::{ProgramBuilder, TestWorkspace, init_test_logging, props};

#[tokio::test]
async fn test_importer_wins_and_mixin_blocks_are_appended() -> Result<()> {
    init_test_logging(None);
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "mixins/style",
        &ProgramBuilder::new()
            .object_block("standards", props([("indent", 4), ("semicolons", 1)]))
            .text_block("shortcuts", "/review - review the diff")
            .build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .uses("./mixins/style")
            .object_block("standards", props([("indent", 2)]))
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    let ast = resolved.ast.unwrap();

    let names: Vec<&str> = ast.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["standards", "shortcuts"]);
    assert_eq!(
        ast.blocks[0].content,
        Content::object(props([("indent", 2), ("semicolons", 1)]))
    );
    assert_eq!(ast.uses.len(), 1, "declarations stay on the resolved program");
    assert_eq!(resolved.sources, vec!["app.prs", "mixins/style.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_imports_apply_in_declaration_order() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "first",
        &ProgramBuilder::new()
            .array_block("restrictions", vec![Value::from("a")])
            .object_block("limits", props([("tokens", 100)]))
            .build(),
    )?;
    workspace.add(
        "second",
        &ProgramBuilder::new()
            .array_block("restrictions", vec![Value::from("b"), Value::from("a")])
            .object_block("limits", props([("tokens", 200)]))
            .build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new().uses("./first").uses("./second").build(),
    )?;

    let ast = workspace.resolver().resolve("app").await?.ast.unwrap();
    // The second import is layered under what the first one produced.
    assert_eq!(
        ast.block("restrictions").unwrap().content,
        Content::array(vec![Value::from("b"), Value::from("a")])
    );
    assert_eq!(
        ast.block("limits").unwrap().content,
        Content::object(props([("tokens", 100)]))
    );
    Ok(())
}

#[tokio::test]
async fn test_failed_import_does_not_block_others() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "good",
        &ProgramBuilder::new().text_block("knowledge", "Good").build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new().uses("./missing").uses("./good").build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert_eq!(
        resolved.errors,
        vec![
            ResolveError::FileNotFound {
                path: "missing.prs".into()
            },
            ResolveError::ImportUnresolved {
                path: "app.prs".into(),
                import: "missing.prs".into(),
            },
        ]
    );
    let ast = resolved.ast.unwrap();
    assert_eq!(ast.block("knowledge").unwrap().content.text_value(), Some("Good"));
    assert_eq!(resolved.sources, vec!["app.prs", "missing.prs", "good.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_registry_import_with_version() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "@core/security",
        &ProgramBuilder::new()
            .array_block("restrictions", vec![Value::from("never print tokens")])
            .build(),
    )?;
    workspace.add(
        "teams/app",
        &ProgramBuilder::new().uses("@core/security@1.2.0").build(),
    )?;

    let resolved = workspace.resolver().resolve("teams/app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    assert_eq!(resolved.sources, vec!["teams/app.prs", "@core/security.prs"]);
    Ok(())
}

#[tokio::test]
async fn test_shared_import_resolved_once_per_resolver() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add(
        "shared",
        &ProgramBuilder::new().text_block("context", "Shared").build(),
    )?;
    workspace.add("a", &ProgramBuilder::new().uses("./shared").build())?;
    workspace.add(
        "app",
        &ProgramBuilder::new().uses("./a").uses("./shared").build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    assert_eq!(resolved.sources, vec!["app.prs", "a.prs", "shared.prs"]);
    assert_eq!(
        resolved.ast.unwrap().block("context").unwrap().content.text_value(),
        Some("Shared")
    );
    Ok(())
}
