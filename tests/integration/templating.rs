//! Parameterized `@inherit` and `@use`

use anyhow::Result;
use prs_resolver::ast::{Content, ParamDefinition, ParamType, Value};
use prs_resolver::core::ResolveError;
use prs_resolver::test_utils::{ProgramBuilder, TestWorkspace, init_test_logging, props};

fn level_param() -> ParamDefinition {
    ParamDefinition::new(
        "level",
        ParamType::Enum {
            options: vec!["junior".into(), "senior".into()],
        },
    )
}

fn reviewer_base() -> ProgramBuilder {
    let mut tone = ParamDefinition::new("tone", ParamType::String);
    tone.default_value = Some(Value::from("neutral"));
    let mut max = ParamDefinition::new("max_files", ParamType::Number);
    max.optional = true;

    ProgramBuilder::new()
        .param(level_param())
        .param(tone)
        .param(max)
        .text_block("identity", "A {{level}} reviewer with a {{tone}} tone.")
        .object_block(
            "limits",
            props([("files", Value::template("max_files"))]),
        )
}

#[tokio::test]
async fn test_inherit_with_arguments() -> Result<()> {
    init_test_logging(None);
    let mut workspace = TestWorkspace::new();
    workspace.add("reviewer", &reviewer_base().build())?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit_with(
                "./reviewer",
                Some(props([
                    ("level", Value::from("senior")),
                    ("max_files", Value::from(20)),
                ])),
            )
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    let ast = resolved.ast.unwrap();
    assert_eq!(
        ast.block("identity").unwrap().content.text_value(),
        Some("A senior reviewer with a neutral tone.")
    );
    assert_eq!(
        ast.block("limits").unwrap().content,
        Content::object(props([("files", 20)]))
    );
    Ok(())
}

#[tokio::test]
async fn test_missing_required_param_keeps_uninterpolated_parent() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add("reviewer", &reviewer_base().build())?;
    workspace.add("app", &ProgramBuilder::new().inherit("./reviewer").build())?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert_eq!(resolved.errors.len(), 1);
    assert!(matches!(
        &resolved.errors[0],
        ResolveError::MissingParam { name, source_path, .. }
            if name == "level" && source_path == "reviewer.prs"
    ));
    let ast = resolved.ast.unwrap();
    assert_eq!(
        ast.block("identity").unwrap().content.text_value(),
        Some("A {{level}} reviewer with a {{tone}} tone.")
    );
    Ok(())
}

#[tokio::test]
async fn test_unbound_optional_expression_is_an_error() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add("reviewer", &reviewer_base().build())?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit_with("./reviewer", Some(props([("level", "junior")])))
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert_eq!(resolved.errors.len(), 1);
    assert!(matches!(
        &resolved.errors[0],
        ResolveError::UnboundTemplate { name, .. } if name == "max_files"
    ));
    Ok(())
}

#[tokio::test]
async fn test_enum_violation() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add("reviewer", &reviewer_base().build())?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .inherit_with("./reviewer", Some(props([("level", "principal")])))
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(matches!(
        &resolved.errors[0],
        ResolveError::InvalidParam { name, found, .. } if name == "level" && found == "principal"
    ));
    Ok(())
}

#[tokio::test]
async fn test_parameterized_import() -> Result<()> {
    let mut project = ParamDefinition::new("project", ParamType::String);
    project.default_value = Some(Value::from("unknown"));

    let mut workspace = TestWorkspace::new();
    workspace.add(
        "mixins/context",
        &ProgramBuilder::new()
            .param(project)
            .text_block("context", "Working on {{project}}.")
            .build(),
    )?;
    workspace.add(
        "app",
        &ProgramBuilder::new()
            .use_with(
                "./mixins/context",
                Some("ctx"),
                Some(props([("project", "atlas")])),
            )
            .text_block("identity", "Helper")
            .build(),
    )?;

    let resolved = workspace.resolver().resolve("app").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    let ast = resolved.ast.unwrap();
    assert_eq!(
        ast.block("context").unwrap().content.text_value(),
        Some("Working on atlas.")
    );
    Ok(())
}

#[tokio::test]
async fn test_cached_parent_is_interpolated_per_child() -> Result<()> {
    let mut workspace = TestWorkspace::new();
    workspace.add("reviewer", &reviewer_base().build())?;
    workspace.add(
        "junior",
        &ProgramBuilder::new()
            .inherit_with(
                "./reviewer",
                Some(props([("level", Value::from("junior")), ("max_files", Value::from(5))])),
            )
            .build(),
    )?;
    workspace.add(
        "senior",
        &ProgramBuilder::new()
            .inherit_with(
                "./reviewer",
                Some(props([("level", Value::from("senior")), ("max_files", Value::from(50))])),
            )
            .build(),
    )?;

    let mut resolver = workspace.resolver();
    let junior = resolver.resolve("junior").await?.ast.unwrap();
    let senior = resolver.resolve("senior").await?.ast.unwrap();

    assert_eq!(
        junior.block("identity").unwrap().content.text_value(),
        Some("A junior reviewer with a neutral tone.")
    );
    assert_eq!(
        senior.block("identity").unwrap().content.text_value(),
        Some("A senior reviewer with a neutral tone.")
    );
    Ok(())
}
