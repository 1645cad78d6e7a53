//! An organization / team / project tree

use anyhow::Result;
use prs_resolver::ast::{Content, Value};
use prs_resolver::test_utils::{init_test_logging, layered_workspace, props};

#[tokio::test]
async fn test_project_resolution() -> Result<()> {
    init_test_logging(None);
    let workspace = layered_workspace()?;
    let resolved = workspace.resolver().resolve("teams/web/project").await?;
    assert!(resolved.is_clean(), "{:?}", resolved.errors);
    assert_eq!(
        resolved.sources,
        vec![
            "teams/web/project.prs",
            "teams/web/team.prs",
            "@org/base.prs",
            "teams/web/shared/review.prs",
        ]
    );

    let ast = resolved.ast.unwrap();
    let names: Vec<&str> = ast.blocks.iter().map(|b| b.name.as_str()).collect();
    assert_eq!(names, vec!["identity", "standards", "restrictions", "review"]);

    assert_eq!(
        ast.block("identity").unwrap().content.text_value(),
        Some("You are an assistant for the web team.\n\nFocus on the storefront.")
    );
    assert_eq!(
        ast.block("standards").unwrap().content,
        Content::object(props([(
            "code",
            Value::Object(props([
                ("indent", Value::from(2)),
                ("framework", Value::from("react")),
            ])),
        )]))
    );
    assert_eq!(
        ast.block("restrictions").unwrap().content,
        Content::array(vec![
            Value::from("no force pushes"),
            Value::from("no secrets"),
            Value::from("no inline styles"),
        ])
    );
    assert_eq!(
        ast.block("review").unwrap().content,
        Content::object(props([("required", true)]))
    );

    let meta = ast.meta.unwrap();
    assert_eq!(meta.fields["id"], Value::from("storefront"));
    assert_eq!(
        meta.fields["tags"],
        Value::Array(vec![Value::from("org"), Value::from("web")])
    );
    Ok(())
}

#[tokio::test]
async fn test_default_param_when_inherited_directly() -> Result<()> {
    let mut workspace = layered_workspace()?;
    workspace.add(
        "direct",
        &prs_resolver::test_utils::ProgramBuilder::new()
            .inherit("@org/base")
            .build(),
    )?;

    let ast = workspace.resolver().resolve("direct").await?.ast.unwrap();
    assert_eq!(
        ast.block("identity").unwrap().content.text_value(),
        Some("You are an assistant for the platform team.")
    );
    Ok(())
}
