//! Ready-made source trees

use anyhow::Result;

use super::{ProgramBuilder, TestWorkspace, props};
use crate::ast::{Content, ParamDefinition, ParamType, Value};

/// An organization / team / project hierarchy.
///
/// ```text
/// @org/base.prs          identity, standards, restrictions; param `team`
/// teams/web/team.prs     @inherit @org/base(team: "web"); @use ./shared/review as review
/// teams/web/shared/review.prs
/// teams/web/project.prs  @inherit ./team; @extend standards.code
/// ```
pub fn layered_workspace() -> Result<TestWorkspace> {
    let mut workspace = TestWorkspace::new();

    let mut team_param = ParamDefinition::new("team", ParamType::String);
    team_param.default_value = Some(Value::from("platform"));

    workspace.add(
        "@org/base",
        &ProgramBuilder::new()
            .meta_field("id", "org-base")
            .meta_field("tags", vec![Value::from("org")])
            .param(team_param)
            .text_block("identity", "You are an assistant for the {{team}} team.")
            .object_block(
                "standards",
                props([("code", Value::Object(props([("indent", 2)])))]),
            )
            .array_block("restrictions", vec![Value::from("no secrets")])
            .build(),
    )?;

    workspace.add(
        "teams/web/shared/review",
        &ProgramBuilder::new()
            .object_block("review", props([("required", true)]))
            .array_block("restrictions", vec![Value::from("no force pushes")])
            .build(),
    )?;

    workspace.add(
        "teams/web/team",
        &ProgramBuilder::new()
            .meta_field("id", "web-team")
            .meta_field("tags", vec![Value::from("web")])
            .inherit_with("@org/base", Some(props([("team", "web")])))
            .use_as("./shared/review", "review")
            .array_block("restrictions", vec![Value::from("no inline styles")])
            .build(),
    )?;

    workspace.add(
        "teams/web/project",
        &ProgramBuilder::new()
            .meta_field("id", "storefront")
            .inherit("./team")
            .text_block("identity", "Focus on the storefront.")
            .extend(
                "standards.code",
                Content::object(props([("framework", "react")])),
            )
            .build(),
    )?;

    Ok(workspace)
}
