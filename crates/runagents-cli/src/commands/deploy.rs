//! `runagents deploy`: upload source files and create an agent.

use std::collections::BTreeMap;
use std::io::Write;

use serde::Serialize;
use serde_json::Value;

use crate::cli::{DeployArgs, OutputFormat};
use crate::client::{AppContext, CliError, CliResult};
use crate::commands::{read_source_files, write_message};
use crate::output::{list_text, output_error, value_text, write_raw};

const MODEL_FORMAT_HINT: &str = "--model must be in provider/model format (e.g., openai/gpt-4o-mini)";

/// Body of `POST /api/deploy`.
#[derive(Debug, Serialize)]
pub(crate) struct DeployRequest {
    pub(crate) name: String,
    pub(crate) source_files: BTreeMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub(crate) required_tools: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub(crate) llm_configs: Option<Vec<LlmConfig>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub(crate) struct LlmConfig {
    pub(crate) provider: String,
    pub(crate) model: String,
}

/// Split `provider/model`; everything after the first `/` is the model name.
pub(crate) fn parse_model_spec(input: &str) -> CliResult<LlmConfig> {
    match input.split_once('/') {
        Some((provider, model)) if !provider.is_empty() && !model.is_empty() => Ok(LlmConfig {
            provider: provider.to_string(),
            model: model.to_string(),
        }),
        _ => Err(CliError::validation(MODEL_FORMAT_HINT)),
    }
}

impl DeployRequest {
    fn from_args(args: &DeployArgs) -> CliResult<Self> {
        let llm_configs = args
            .model
            .as_deref()
            .filter(|model| !model.is_empty())
            .map(parse_model_spec)
            .transpose()?
            .map(|config| vec![config]);
        let source_files = read_source_files(&args.files)?;

        Ok(Self {
            name: args.name.clone(),
            source_files,
            required_tools: args.tools.clone(),
            llm_configs,
        })
    }
}

pub(crate) async fn handle_deploy<W: Write>(
    ctx: &AppContext,
    args: &DeployArgs,
    out: &mut W,
) -> CliResult<()> {
    let request = DeployRequest::from_args(args)?;
    tracing::debug!(
        agent = %request.name,
        files = request.source_files.len(),
        tools = request.required_tools.len(),
        "deploying agent"
    );
    let body = ctx.api.post("/api/deploy", Some(&request)).await?;

    match ctx.output {
        OutputFormat::Json => write_raw(out, &body).map_err(output_error),
        OutputFormat::Table => write_deploy_summary(out, &request.name, &body),
    }
}

fn write_deploy_summary<W: Write>(out: &mut W, name: &str, body: &[u8]) -> CliResult<()> {
    let Ok(result @ Value::Object(_)) = serde_json::from_slice::<Value>(body) else {
        return write_message(out, "Deploy request submitted.");
    };

    write_message(out, &format!("Agent \"{name}\" deployed successfully."))?;
    if let Some(agent) = present(&result, "agent") {
        write_message(out, &format!("Agent: {}", value_text(agent)))?;
    }
    if let Some(tools) = present(&result, "tools_created") {
        write_message(out, &format!("Tools created: {}", list_text(tools)))?;
    }
    Ok(())
}

fn present<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field).filter(|value| !value.is_null())
}
