use std::io::Write;

use crate::cli::{CreateArgs, NameArgs, OutputFormat};
use crate::client::{AppContext, CliResult};
use crate::commands::{path_segment, read_json_file, write_message};
use crate::output::{
    Column, DetailField, DetailSpec, TableSpec, output_error, write_list, write_raw, write_record,
};

const TOOL_TABLE: TableSpec = TableSpec {
    columns: &[
        Column::plain("NAME", "name"),
        Column::plain("TOPOLOGY", "topology"),
        Column::plain("BASE_URL", "base_url"),
        Column::plain("ACCESS", "access_mode"),
        Column::plain("STATUS", "status"),
    ],
    empty_message: "No tools found.",
};

const TOOL_DETAIL: DetailSpec = DetailSpec {
    fields: &[
        DetailField::required("Name", "name"),
        DetailField::required("Topology", "topology"),
        DetailField::required("Base URL", "base_url"),
        DetailField::required("Access", "access_mode"),
        DetailField::required("Status", "status"),
        DetailField::optional("Auth", "auth"),
    ],
};

fn tool_path(name: &str) -> CliResult<String> {
    Ok(format!("/api/tools/{}", path_segment(name)?))
}

pub(crate) async fn handle_tools_list<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    let body = ctx.api.get("/api/tools").await?;
    write_list(out, &body, &TOOL_TABLE, ctx.output)
}

pub(crate) async fn handle_tools_get<W: Write>(
    ctx: &AppContext,
    args: &NameArgs,
    out: &mut W,
) -> CliResult<()> {
    let body = ctx.api.get(&tool_path(&args.name)?).await?;
    write_record(out, &body, &TOOL_DETAIL, ctx.output)
}

pub(crate) async fn handle_tools_create<W: Write>(
    ctx: &AppContext,
    args: &CreateArgs,
    out: &mut W,
) -> CliResult<()> {
    let definition = read_json_file(&args.file)?;
    let body = ctx.api.post("/api/tools", Some(&definition)).await?;
    match ctx.output {
        OutputFormat::Json => write_raw(out, &body).map_err(output_error),
        OutputFormat::Table => write_message(out, "Tool created successfully."),
    }
}

pub(crate) async fn handle_tools_delete<W: Write>(
    ctx: &AppContext,
    args: &NameArgs,
    out: &mut W,
) -> CliResult<()> {
    ctx.api.delete(&tool_path(&args.name)?).await?;
    write_message(out, &format!("Tool \"{}\" deleted.", args.name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, text};
    use httpmock::prelude::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;

    fn name(value: &str) -> NameArgs {
        NameArgs {
            name: value.to_string(),
        }
    }

    #[tokio::test]
    async fn list_renders_tool_columns() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tools");
            then.status(200).json_body(json!([{
                "name": "echo-tool",
                "topology": "external",
                "base_url": "https://echo.test",
                "access_mode": "open",
                "status": "Ready"
            }]));
        });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle_tools_list(&ctx, &mut out).await.expect("list tools");
        assert_eq!(
            text(out),
            "NAME        TOPOLOGY   BASE_URL            ACCESS   STATUS\n\
             echo-tool   external   https://echo.test   open     Ready\n"
        );
    }

    #[tokio::test]
    async fn get_shows_auth_block_when_present() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(GET).path("/api/tools/echo-tool");
            then.status(200).json_body(json!({
                "name": "echo-tool",
                "topology": "external",
                "base_url": "https://echo.test",
                "access_mode": "restricted",
                "status": "Ready",
                "auth": {"type": "bearer"}
            }));
        });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle_tools_get(&ctx, &name("echo-tool"), &mut out)
            .await
            .expect("get tool");
        assert_eq!(
            text(out),
            "Name:     echo-tool\n\
             Topology: external\n\
             Base URL: https://echo.test\n\
             Access:   restricted\n\
             Status:   Ready\n\
             Auth:     {\"type\":\"bearer\"}\n"
        );
    }

    #[tokio::test]
    async fn create_posts_file_contents() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.json");
        fs::write(&path, r#"{"name":"echo-tool","base_url":"https://echo.test"}"#)
            .expect("write definition");

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/tools")
                .header("content-type", "application/json")
                .json_body(json!({"name": "echo-tool", "base_url": "https://echo.test"}));
            then.status(201).body(r#"{"name":"echo-tool"}"#);
        });

        let args = CreateArgs { file: path };
        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle_tools_create(&ctx, &args, &mut out)
            .await
            .expect("create tool");
        mock.assert();
        assert_eq!(text(out), "Tool created successfully.\n");

        let ctx = context(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle_tools_create(&ctx, &args, &mut out)
            .await
            .expect("create tool");
        assert_eq!(text(out), "{\"name\":\"echo-tool\"}\n");
    }

    #[tokio::test]
    async fn create_rejects_invalid_json_before_any_request() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("tool.json");
        fs::write(&path, "name: echo").expect("write definition");

        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST).path("/api/tools");
            then.status(201);
        });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        let err = handle_tools_create(&ctx, &CreateArgs { file: path }, &mut out)
            .await
            .expect_err("invalid JSON");
        assert!(err.display_message().starts_with("invalid JSON in"));
        mock.assert_calls(0);
    }

    #[test]
    fn tool_path_keeps_traversal_inside_the_segment() -> CliResult<()> {
        assert_eq!(
            tool_path("../agents/default/helper")?,
            "/api/tools/..%2Fagents%2Fdefault%2Fhelper"
        );
        Ok(())
    }

    #[tokio::test]
    async fn delete_rejects_dot_name_before_any_request() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE);
            then.status(200);
        });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        let err = handle_tools_delete(&ctx, &name("."), &mut out)
            .await
            .expect_err("dot segment");
        assert_eq!(err.exit_code(), 2);
        mock.assert_calls(0);
    }

    #[tokio::test]
    async fn delete_prints_quoted_name() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(DELETE).path("/api/tools/echo-tool");
            then.status(200).body("{}");
        });

        let ctx = context(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle_tools_delete(&ctx, &name("echo-tool"), &mut out)
            .await
            .expect("delete tool");
        mock.assert();
        assert_eq!(text(out), "Tool \"echo-tool\" deleted.\n");
    }
}
