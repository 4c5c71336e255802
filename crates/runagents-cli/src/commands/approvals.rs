use std::io::Write;

use serde_json::Value;

use crate::cli::RequestIdArgs;
use crate::client::{AppContext, CliResult};
use crate::commands::{path_segment, write_message};
use crate::output::{Column, TableSpec, write_list};

const REQUESTS_PATH: &str = "/governance/requests";

const REQUEST_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("ID", "id"),
        Column::plain("AGENT", "agent"),
        Column::plain("TOOL", "tool"),
        Column::plain("STATUS", "status"),
        Column::plain("CREATED", "created_at"),
    ],
    empty_message: "No access requests found.",
};

#[derive(Debug, Clone, Copy)]
enum Decision {
    Approve,
    Reject,
}

impl Decision {
    const fn action(self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }

    const fn outcome(self) -> &'static str {
        match self {
            Self::Approve => "approved",
            Self::Reject => "rejected",
        }
    }
}

pub(crate) async fn handle_approvals_list<W: Write>(
    ctx: &AppContext,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(REQUESTS_PATH).await?;
    write_list(out, &body, &REQUEST_TABLE, ctx.output)
}

pub(crate) async fn handle_approvals_approve<W: Write>(
    ctx: &AppContext,
    args: &RequestIdArgs,
    out: &mut W,
) -> CliResult<()> {
    decide(ctx, &args.id, Decision::Approve, out).await
}

pub(crate) async fn handle_approvals_reject<W: Write>(
    ctx: &AppContext,
    args: &RequestIdArgs,
    out: &mut W,
) -> CliResult<()> {
    decide(ctx, &args.id, Decision::Reject, out).await
}

async fn decide<W: Write>(
    ctx: &AppContext,
    id: &str,
    decision: Decision,
    out: &mut W,
) -> CliResult<()> {
    let path = format!(
        "{REQUESTS_PATH}/{}/{}",
        path_segment(id)?,
        decision.action()
    );
    ctx.api.post::<Value>(&path, None).await?;
    write_message(
        out,
        &format!("Access request \"{id}\" {}.", decision.outcome()),
    )
}
