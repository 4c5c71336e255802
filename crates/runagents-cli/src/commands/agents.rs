use std::io::Write;

use crate::cli::AgentRefArgs;
use crate::client::{AppContext, CliResult};
use crate::commands::{path_segment, write_message};
use crate::output::{Column, DetailField, DetailSpec, TableSpec, write_list, write_record};

const AGENT_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("NAME", "name"),
        Column::plain("STATUS", "status"),
        Column::plain("IMAGE", "image"),
    ],
    empty_message: "No agents found.",
};

const AGENT_DETAIL: DetailSpec = DetailSpec {
    fields: &[
        DetailField::required("Name", "name"),
        DetailField::required("Namespace", "namespace"),
        DetailField::required("Status", "status"),
        DetailField::required("Image", "image"),
        DetailField::optional_list("Tools", "required_tools"),
        DetailField::optional("LLM", "llm_config"),
    ],
};

fn agent_path(args: &AgentRefArgs) -> CliResult<String> {
    Ok(format!(
        "/api/agents/{}/{}",
        path_segment(&args.namespace)?,
        path_segment(&args.name)?
    ))
}

pub(crate) async fn handle_agents_list<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    let body = ctx.api.get("/api/agents").await?;
    write_list(out, &body, &AGENT_TABLE, ctx.output)
}

pub(crate) async fn handle_agents_get<W: Write>(
    ctx: &AppContext,
    args: &AgentRefArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&agent_path(args)?).await?;
    write_record(out, &body, &AGENT_DETAIL, ctx.output)
}

pub(crate) async fn handle_agents_delete<W: Write>(
    ctx: &AppContext,
    args: &AgentRefArgs,
    out: &mut W,
) -> CliResult<()> {
    ctx.api.delete(&agent_path(args)?).await?;
    write_message(
        out,
        &format!("Agent {}/{} deleted.", args.namespace, args.name),
    )
}
