//! Output renderers and formatting helpers for CLI commands.
//!
//! Responses are either echoed verbatim (`--output json`) or decoded into
//! loosely-typed JSON and projected through per-resource column maps. Field
//! extraction never fails: absent fields render as empty cells and non-string
//! values fall back to their JSON text.

use std::io::{self, Write};

use anyhow::anyhow;
use serde_json::Value;

use crate::cli::OutputFormat;
use crate::client::{CliError, CliResult};

const COLUMN_GAP: &str = "   ";

/// How a projected value is turned into display text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum CellStyle {
    Plain,
    /// Arrays are joined with `, ` instead of printed as JSON.
    List,
}

impl CellStyle {
    pub(crate) fn render(self, value: &Value) -> String {
        match self {
            Self::Plain => value_text(value),
            Self::List => list_text(value),
        }
    }
}

/// One `(header, field)` pair of a table projection.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Column {
    pub(crate) header: &'static str,
    pub(crate) field: &'static str,
    pub(crate) style: CellStyle,
}

impl Column {
    pub(crate) const fn plain(header: &'static str, field: &'static str) -> Self {
        Self {
            header,
            field,
            style: CellStyle::Plain,
        }
    }

    pub(crate) const fn list(header: &'static str, field: &'static str) -> Self {
        Self {
            header,
            field,
            style: CellStyle::List,
        }
    }

    fn cell(&self, record: &Value) -> String {
        record
            .get(self.field)
            .map_or_else(String::new, |value| self.style.render(value))
    }
}

/// Projection map plus the message printed instead of an empty table.
#[derive(Debug, Clone, Copy)]
pub(crate) struct TableSpec {
    pub(crate) columns: &'static [Column],
    pub(crate) empty_message: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Presence {
    Always,
    WhenPresent,
}

/// A labelled line of a single-record detail view.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DetailField {
    pub(crate) label: &'static str,
    pub(crate) field: &'static str,
    pub(crate) style: CellStyle,
    pub(crate) presence: Presence,
}

impl DetailField {
    pub(crate) const fn required(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            style: CellStyle::Plain,
            presence: Presence::Always,
        }
    }

    pub(crate) const fn list(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            style: CellStyle::List,
            presence: Presence::Always,
        }
    }

    /// Printed only when the record carries a non-null value for the field.
    pub(crate) const fn optional(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            style: CellStyle::Plain,
            presence: Presence::WhenPresent,
        }
    }

    pub(crate) const fn optional_list(label: &'static str, field: &'static str) -> Self {
        Self {
            label,
            field,
            style: CellStyle::List,
            presence: Presence::WhenPresent,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct DetailSpec {
    pub(crate) fields: &'static [DetailField],
}

/// Display text for any JSON value: strings verbatim, `null` empty, anything
/// else as compact JSON.
#[must_use]
pub(crate) fn value_text(value: &Value) -> String {
    match value {
        Value::String(text) => text.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Like [`value_text`], but arrays become their elements joined with `, `.
#[must_use]
pub(crate) fn list_text(value: &Value) -> String {
    match value {
        Value::Array(items) => items.iter().map(value_text).collect::<Vec<_>>().join(", "),
        other => value_text(other),
    }
}

/// Extract a named field from a record; total over every JSON shape.
#[must_use]
pub(crate) fn field_text(record: &Value, field: &str) -> String {
    record.get(field).map_or_else(String::new, value_text)
}

pub(crate) fn decode_value(body: &[u8]) -> CliResult<Value> {
    serde_json::from_slice(body)
        .map_err(|err| CliError::failure(anyhow!("failed to parse response: {err}")))
}

/// Decode a list payload; a single object is promoted to a one-row list.
pub(crate) fn decode_rows(body: &[u8]) -> CliResult<Vec<Value>> {
    match decode_value(body)? {
        Value::Array(items) => Ok(items),
        Value::Null => Ok(Vec::new()),
        object @ Value::Object(_) => Ok(vec![object]),
        other => Err(CliError::failure(anyhow!(
            "failed to parse response: expected a JSON array or object, got {other}"
        ))),
    }
}

pub(crate) fn write_raw<W: Write>(out: &mut W, body: &[u8]) -> io::Result<()> {
    out.write_all(body)?;
    if !body.ends_with(b"\n") {
        out.write_all(b"\n")?;
    }
    Ok(())
}

pub(crate) fn write_table<W: Write>(out: &mut W, spec: &TableSpec, rows: &[Value]) -> io::Result<()> {
    if rows.is_empty() {
        return writeln!(out, "{}", spec.empty_message);
    }

    let headers: Vec<String> = spec
        .columns
        .iter()
        .map(|column| column.header.to_string())
        .collect();
    let cells: Vec<Vec<String>> = rows
        .iter()
        .map(|row| {
            spec.columns
                .iter()
                .map(|column| single_line(&column.cell(row)))
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| display_width(header)).collect();
    for row in &cells {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(display_width(cell));
        }
    }

    write_row(out, &headers, &widths)?;
    for row in &cells {
        write_row(out, row, &widths)?;
    }
    Ok(())
}

fn write_row<W: Write>(out: &mut W, cells: &[String], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    for (index, (cell, width)) in cells.iter().zip(widths).enumerate() {
        if index > 0 {
            line.push_str(COLUMN_GAP);
        }
        line.push_str(cell);
        line.push_str(&" ".repeat(width.saturating_sub(display_width(cell))));
    }
    writeln!(out, "{}", line.trim_end())
}

pub(crate) fn write_detail<W: Write>(
    out: &mut W,
    spec: &DetailSpec,
    record: &Value,
) -> io::Result<()> {
    let width = spec
        .fields
        .iter()
        .map(|field| display_width(field.label) + 1)
        .max()
        .unwrap_or(0);

    for field in spec.fields {
        let value = record.get(field.field);
        if field.presence == Presence::WhenPresent && value.is_none_or(Value::is_null) {
            continue;
        }
        let text = value.map_or_else(String::new, |value| field.style.render(value));
        let label = format!("{}:", field.label);
        let line = format!("{label:<width$} {text}");
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}

pub(crate) fn write_list<W: Write>(
    out: &mut W,
    body: &[u8],
    spec: &TableSpec,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_raw(out, body).map_err(output_error),
        OutputFormat::Table => {
            let rows = decode_rows(body)?;
            write_table(out, spec, &rows).map_err(output_error)
        }
    }
}

pub(crate) fn write_record<W: Write>(
    out: &mut W,
    body: &[u8],
    spec: &DetailSpec,
    format: OutputFormat,
) -> CliResult<()> {
    match format {
        OutputFormat::Json => write_raw(out, body).map_err(output_error),
        OutputFormat::Table => {
            let record = decode_value(body)?;
            write_detail(out, spec, &record).map_err(output_error)
        }
    }
}

pub(crate) fn output_error(err: io::Error) -> CliError {
    CliError::failure(anyhow!("failed to write output: {err}"))
}

fn single_line(text: &str) -> String {
    text.replace(['\r', '\n'], " ")
}

fn display_width(text: &str) -> usize {
    text.chars().count()
}
