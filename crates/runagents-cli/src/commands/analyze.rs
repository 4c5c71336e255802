//! `runagents analyze`: ask the ingestion service what a codebase needs.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::cli::{AnalyzeArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::commands::{read_source_files, write_message};
use crate::output::{
    Column, TableSpec, decode_value, field_text, output_error, value_text, write_raw, write_table,
};

const NONE_MARKER: &str = "  (none)";

const MODEL_USAGE_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("ROLE", "role"),
        Column::plain("MODEL", "variable_name"),
        Column::plain("FILE", "file"),
        Column::plain("LINE", "line"),
    ],
    empty_message: NONE_MARKER,
};

#[derive(Debug, Serialize)]
struct AnalyzeRequest {
    files: BTreeMap<String, String>,
}

pub(crate) async fn handle_analyze<W: Write>(
    ctx: &AppContext,
    args: &AnalyzeArgs,
    out: &mut W,
) -> CliResult<()> {
    let request = AnalyzeRequest {
        files: read_source_files(&args.files)?,
    };
    let body = ctx.api.post("/ingestion/analyze", Some(&request)).await?;

    match ctx.output {
        OutputFormat::Json => write_raw(out, &body).map_err(output_error),
        OutputFormat::Table => {
            let result = decode_value(&body)?;
            write_analysis(out, &result)
        }
    }
}

/// Render each section the service reported, in a fixed order.
pub(crate) fn write_analysis<W: Write>(out: &mut W, result: &Value) -> CliResult<()> {
    if let Some(tools) = result.get("tools") {
        write_section(out, "Detected Tools", tools)?;
    }
    if let Some(usages) = result.get("model_usages") {
        write_model_usages(out, usages)?;
    }
    if let Some(secrets) = result.get("secrets") {
        write_secrets(out, secrets)?;
    }
    if let Some(requirements) = result.get("detected_requirements") {
        write_section(out, "Detected Requirements", requirements)?;
    }
    if let Some(destinations) = result.get("outbound_destinations") {
        write_section(out, "Outbound Destinations", destinations)?;
    }
    if let Some(entry_point) = result.get("entry_point") {
        write_message(out, &format!("\nEntry Point: {}", value_text(entry_point)))?;
    }
    Ok(())
}

fn section_items(data: &Value) -> &[Value] {
    data.as_array().map(Vec::as_slice).unwrap_or_default()
}

fn write_heading<W: Write>(out: &mut W, title: &str) -> CliResult<()> {
    write_message(out, &format!("\n{title}:"))
}

fn write_section<W: Write>(out: &mut W, title: &str, data: &Value) -> CliResult<()> {
    write_heading(out, title)?;
    let items = section_items(data);
    if items.is_empty() {
        return write_message(out, NONE_MARKER);
    }
    for item in items {
        write_message(out, &format!("  - {}", value_text(item)))?;
    }
    Ok(())
}

fn write_model_usages<W: Write>(out: &mut W, data: &Value) -> CliResult<()> {
    write_heading(out, "Model Usages")?;
    let rows: Vec<Value> = section_items(data)
        .iter()
        .filter(|item| item.is_object())
        .cloned()
        .collect();
    write_table(out, &MODEL_USAGE_TABLE, &rows).map_err(output_error)
}

fn write_secrets<W: Write>(out: &mut W, data: &Value) -> CliResult<()> {
    write_heading(out, "Secrets Detected")?;
    let items = section_items(data);
    if items.is_empty() {
        return write_message(out, NONE_MARKER);
    }
    for item in items {
        let line = if item.is_object() {
            format!(
                "  - {}:{} {}",
                field_text(item, "file"),
                field_text(item, "line"),
                field_text(item, "description")
            )
        } else {
            format!("  - {}", value_text(item))
        };
        write_message(out, &line)?;
    }
    Ok(())
}
