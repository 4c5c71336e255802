use std::io::Write;

use url::form_urlencoded;

use crate::cli::{RunIdArgs, RunsListArgs};
use crate::client::{AppContext, CliResult};
use crate::commands::path_segment;
use crate::output::{Column, DetailField, DetailSpec, TableSpec, write_list, write_record};

const RUN_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("ID", "id"),
        Column::plain("AGENT", "agent"),
        Column::plain("STATUS", "status"),
        Column::plain("CREATED", "created_at"),
    ],
    empty_message: "No runs found.",
};

const RUN_DETAIL: DetailSpec = DetailSpec {
    fields: &[
        DetailField::required("ID", "id"),
        DetailField::required("Agent", "agent"),
        DetailField::required("Status", "status"),
        DetailField::required("Created", "created_at"),
        DetailField::optional_list("Blocked", "blocked_actions"),
    ],
};

const EVENT_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("SEQ", "sequence"),
        Column::plain("TYPE", "type"),
        Column::plain("MESSAGE", "message"),
        Column::plain("TIMESTAMP", "timestamp"),
    ],
    empty_message: "No events found.",
};

fn runs_path(agent: Option<&str>) -> String {
    match agent.filter(|agent| !agent.is_empty()) {
        Some(agent) => {
            let query = form_urlencoded::Serializer::new(String::new())
                .append_pair("agent", agent)
                .finish();
            format!("/runs?{query}")
        }
        None => "/runs".to_string(),
    }
}

fn run_path(id: &str) -> CliResult<String> {
    Ok(format!("/runs/{}", path_segment(id)?))
}

pub(crate) async fn handle_runs_list<W: Write>(
    ctx: &AppContext,
    args: &RunsListArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&runs_path(args.agent.as_deref())).await?;
    write_list(out, &body, &RUN_TABLE, ctx.output)
}

pub(crate) async fn handle_runs_get<W: Write>(
    ctx: &AppContext,
    args: &RunIdArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&run_path(&args.id)?).await?;
    write_record(out, &body, &RUN_DETAIL, ctx.output)
}

pub(crate) async fn handle_runs_events<W: Write>(
    ctx: &AppContext,
    args: &RunIdArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&format!("{}/events", run_path(&args.id)?)).await?;
    write_list(out, &body, &EVENT_TABLE, ctx.output)
}
