use std::io::Write;

use crate::cli::{CreateArgs, NameArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::commands::{path_segment, read_json_file, write_message};
use crate::output::{
    Column, DetailField, DetailSpec, TableSpec, output_error, write_list, write_raw, write_record,
};

const MODEL_PROVIDERS_PATH: &str = "/api/model-providers";

const MODEL_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("NAME", "name"),
        Column::plain("PROVIDER", "provider"),
        Column::list("MODELS", "models"),
        Column::plain("STATUS", "status"),
    ],
    empty_message: "No model providers found.",
};

const MODEL_DETAIL: DetailSpec = DetailSpec {
    fields: &[
        DetailField::required("Name", "name"),
        DetailField::required("Provider", "provider"),
        DetailField::list("Models", "models"),
        DetailField::required("Status", "status"),
        DetailField::required("Endpoint", "endpoint"),
    ],
};

fn provider_path(name: &str) -> CliResult<String> {
    Ok(format!("{MODEL_PROVIDERS_PATH}/{}", path_segment(name)?))
}

pub(crate) async fn handle_models_list<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    let body = ctx.api.get(MODEL_PROVIDERS_PATH).await?;
    write_list(out, &body, &MODEL_TABLE, ctx.output)
}

pub(crate) async fn handle_models_get<W: Write>(
    ctx: &AppContext,
    args: &NameArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&provider_path(&args.name)?).await?;
    write_record(out, &body, &MODEL_DETAIL, ctx.output)
}

pub(crate) async fn handle_models_create<W: Write>(
    ctx: &AppContext,
    args: &CreateArgs,
    out: &mut W,
) -> CliResult<()> {
    let definition = read_json_file(&args.file)?;
    let body = ctx.api.post(MODEL_PROVIDERS_PATH, Some(&definition)).await?;
    match ctx.output {
        OutputFormat::Json => write_raw(out, &body).map_err(output_error),
        OutputFormat::Table => write_message(out, "Model provider created successfully."),
    }
}

pub(crate) async fn handle_models_delete<W: Write>(
    ctx: &AppContext,
    args: &NameArgs,
    out: &mut W,
) -> CliResult<()> {
    ctx.api.delete(&provider_path(&args.name)?).await?;
    write_message(out, &format!("Model provider \"{}\" deleted.", args.name))
}
