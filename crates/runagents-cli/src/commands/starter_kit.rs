use std::io::Write;

use serde_json::Value;

use crate::cli::OutputFormat;
use crate::client::{AppContext, CliResult};
use crate::commands::write_message;
use crate::output::{DetailField, DetailSpec, output_error, write_detail, write_raw};

const SEED_SUMMARY: DetailSpec = DetailSpec {
    fields: &[
        DetailField::optional_list("Tools created", "tools_created"),
        DetailField::optional_list("Model providers created", "model_providers_created"),
        DetailField::optional("Message", "message"),
    ],
};

pub(crate) async fn handle_starter_kit<W: Write>(ctx: &AppContext, out: &mut W) -> CliResult<()> {
    let body = ctx.api.post::<Value>("/api/starter-kit", None).await?;
    match ctx.output {
        OutputFormat::Json => write_raw(out, &body).map_err(output_error),
        OutputFormat::Table => write_seed_summary(out, &body),
    }
}

fn write_seed_summary<W: Write>(out: &mut W, body: &[u8]) -> CliResult<()> {
    write_message(out, "Starter kit seeded successfully.")?;
    match serde_json::from_slice::<Value>(body) {
        Ok(summary) if summary.is_object() => {
            write_detail(out, &SEED_SUMMARY, &summary).map_err(output_error)
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::test_support::{context, text};
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn seeds_with_empty_post_and_summarises() {
        let server = MockServer::start_async().await;
        let mock = server.mock(|when, then| {
            when.method(POST)
                .path("/api/starter-kit")
                .header("authorization", "Bearer test-key")
                .header_missing("content-type");
            then.status(200).json_body(json!({
                "tools_created": ["echo-tool"],
                "model_providers_created": ["playground-llm"],
                "message": "ready"
            }));
        });

        let ctx = context(&server, OutputFormat::Table);
        let mut out = Vec::new();
        handle_starter_kit(&ctx, &mut out).await.expect("seed");
        mock.assert();
        assert_eq!(
            text(out),
            "Starter kit seeded successfully.\n\
             Tools created:           echo-tool\n\
             Model providers created: playground-llm\n\
             Message:                 ready\n"
        );
    }

    #[test]
    fn non_object_bodies_only_confirm() {
        for body in [&b"seeded"[..], b"[]", b""] {
            let mut out = Vec::new();
            write_seed_summary(&mut out, body).expect("summary");
            assert_eq!(text(out), "Starter kit seeded successfully.\n");
        }
    }

    #[tokio::test]
    async fn json_mode_prints_raw_response() {
        let server = MockServer::start_async().await;
        server.mock(|when, then| {
            when.method(POST).path("/api/starter-kit");
            then.status(200).body(r#"{"message":"ready"}"#);
        });

        let ctx = context(&server, OutputFormat::Json);
        let mut out = Vec::new();
        handle_starter_kit(&ctx, &mut out).await.expect("seed");
        assert_eq!(text(out), "{\"message\":\"ready\"}\n");
    }
}
