//! Command-line surface for the RunAgents platform client.

use std::io::{self, Write};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use runagents_config::{ConfigKey, ConfigStore};
use runagents_telemetry::{LogFormat, LoggingConfig, init_logging};
use tracing::Instrument;

use crate::client::{AppContext, CliResult, DEFAULT_TIMEOUT_SECS};
use crate::commands::agents::{handle_agents_delete, handle_agents_get, handle_agents_list};
use crate::commands::analyze::handle_analyze;
use crate::commands::approvals::{
    handle_approvals_approve, handle_approvals_list, handle_approvals_reject,
};
use crate::commands::config::{handle_config_get, handle_config_set};
use crate::commands::deploy::handle_deploy;
use crate::commands::models::{
    handle_models_create, handle_models_delete, handle_models_get, handle_models_list,
};
use crate::commands::runs::{handle_runs_events, handle_runs_get, handle_runs_list};
use crate::commands::starter_kit::handle_starter_kit;
use crate::commands::tools::{
    handle_tools_create, handle_tools_delete, handle_tools_get, handle_tools_list,
};
use crate::commands::version::handle_version;
use crate::output::output_error;

/// Parses CLI arguments, executes the requested command, and reports any
/// failure on stderr. Returns the process exit code.
pub async fn run() -> i32 {
    let cli = Cli::parse();

    let logging = LoggingConfig::for_verbosity(cli.global.verbose, cli.global.log_format.into());
    if let Err(err) = init_logging(&logging) {
        eprintln!("warning: {err:#}");
    }

    let span = tracing::info_span!("command", command = command_label(&cli.command));
    match dispatch(cli).instrument(span).await {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("error: {}", err.display_message());
            err.exit_code()
        }
    }
}

async fn dispatch(cli: Cli) -> CliResult<()> {
    let mut out = io::stdout();
    let global = cli.global;

    match cli.command {
        Command::Version => handle_version(&mut out)?,
        Command::Config(command) => {
            let store = ConfigStore::from_home()?;
            match command {
                ConfigCommand::Set(args) => handle_config_set(&store, &args, &mut out)?,
                ConfigCommand::Get => handle_config_get(&store, &mut out)?,
            }
        }
        command => {
            let ctx = AppContext::from_global(&global, &ConfigStore::from_home()?)?;
            dispatch_remote(&ctx, command, &mut out).await?;
        }
    }

    out.flush().map_err(output_error)
}

async fn dispatch_remote<W: Write>(ctx: &AppContext, command: Command, out: &mut W) -> CliResult<()> {
    match command {
        Command::Agents(agents) => match agents {
            AgentsCommand::List => handle_agents_list(ctx, out).await,
            AgentsCommand::Get(args) => handle_agents_get(ctx, &args, out).await,
            AgentsCommand::Delete(args) => handle_agents_delete(ctx, &args, out).await,
        },
        Command::Tools(tools) => match tools {
            ToolsCommand::List => handle_tools_list(ctx, out).await,
            ToolsCommand::Get(args) => handle_tools_get(ctx, &args, out).await,
            ToolsCommand::Create(args) => handle_tools_create(ctx, &args, out).await,
            ToolsCommand::Delete(args) => handle_tools_delete(ctx, &args, out).await,
        },
        Command::Models(models) => match models {
            ModelsCommand::List => handle_models_list(ctx, out).await,
            ModelsCommand::Get(args) => handle_models_get(ctx, &args, out).await,
            ModelsCommand::Create(args) => handle_models_create(ctx, &args, out).await,
            ModelsCommand::Delete(args) => handle_models_delete(ctx, &args, out).await,
        },
        Command::Runs(runs) => match runs {
            RunsCommand::List(args) => handle_runs_list(ctx, &args, out).await,
            RunsCommand::Get(args) => handle_runs_get(ctx, &args, out).await,
            RunsCommand::Events(args) => handle_runs_events(ctx, &args, out).await,
        },
        Command::Approvals(approvals) => match approvals {
            ApprovalsCommand::List => handle_approvals_list(ctx, out).await,
            ApprovalsCommand::Approve(args) => handle_approvals_approve(ctx, &args, out).await,
            ApprovalsCommand::Reject(args) => handle_approvals_reject(ctx, &args, out).await,
        },
        Command::Deploy(args) => handle_deploy(ctx, &args, out).await,
        Command::Analyze(args) => handle_analyze(ctx, &args, out).await,
        Command::StarterKit => handle_starter_kit(ctx, out).await,
        Command::Version | Command::Config(_) => Ok(()),
    }
}

#[derive(Parser)]
#[command(
    name = "runagents",
    about = "RunAgents CLI -- manage AI agents, tools, and runs",
    version
)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) global: GlobalArgs,
    #[command(subcommand)]
    pub(crate) command: Command,
}

/// Flags shared by every subcommand.
#[derive(Args, Debug, Clone)]
pub(crate) struct GlobalArgs {
    #[arg(long, global = true, help = "API endpoint URL (overrides config)")]
    pub(crate) endpoint: Option<String>,
    #[arg(long, global = true, help = "API key (overrides config)")]
    pub(crate) api_key: Option<String>,
    #[arg(
        short = 'o',
        long = "output",
        alias = "format",
        global = true,
        value_enum,
        default_value_t = OutputFormat::Table,
        help = "Output format"
    )]
    pub(crate) output: OutputFormat,
    #[arg(
        long,
        global = true,
        default_value_t = DEFAULT_TIMEOUT_SECS,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Per-request timeout in seconds"
    )]
    pub(crate) timeout: u64,
    #[arg(short = 'v', long, global = true, help = "Enable debug logging on stderr")]
    pub(crate) verbose: bool,
    #[arg(
        long,
        global = true,
        value_enum,
        default_value_t = LogFormatArg::Pretty,
        help = "Log line format"
    )]
    pub(crate) log_format: LogFormatArg,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    #[default]
    Table,
    Json,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogFormatArg {
    Pretty,
    Json,
}

impl From<LogFormatArg> for LogFormat {
    fn from(value: LogFormatArg) -> Self {
        match value {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Json => Self::Json,
        }
    }
}

#[derive(Subcommand)]
pub(crate) enum Command {
    /// Print the CLI version
    Version,
    /// Manage CLI configuration
    #[command(subcommand)]
    Config(ConfigCommand),
    /// Manage agents
    #[command(subcommand)]
    Agents(AgentsCommand),
    /// Manage tools
    #[command(subcommand)]
    Tools(ToolsCommand),
    /// Manage model providers
    #[command(subcommand)]
    Models(ModelsCommand),
    /// Inspect agent runs
    #[command(subcommand)]
    Runs(RunsCommand),
    /// Review access requests
    #[command(subcommand)]
    Approvals(ApprovalsCommand),
    /// Deploy an agent from source files
    Deploy(DeployArgs),
    /// Analyze source files for tools, models, and secrets
    Analyze(AnalyzeArgs),
    /// Seed the platform with starter resources
    StarterKit,
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommand {
    /// Set a configuration value
    Set(ConfigSetArgs),
    /// Show the current configuration
    Get,
}

#[derive(Args)]
pub(crate) struct ConfigSetArgs {
    #[arg(value_parser = parse_config_key, help = "endpoint or api-key")]
    pub(crate) key: ConfigKey,
    pub(crate) value: String,
}

#[derive(Subcommand)]
pub(crate) enum AgentsCommand {
    /// List all agents
    List,
    /// Get details of an agent
    Get(AgentRefArgs),
    /// Delete an agent
    Delete(AgentRefArgs),
}

#[derive(Args)]
pub(crate) struct AgentRefArgs {
    pub(crate) namespace: String,
    pub(crate) name: String,
}

#[derive(Subcommand)]
pub(crate) enum ToolsCommand {
    /// List all tools
    List,
    /// Get details of a tool
    Get(NameArgs),
    /// Create a tool from a JSON file
    Create(CreateArgs),
    /// Delete a tool
    Delete(NameArgs),
}

#[derive(Subcommand)]
pub(crate) enum ModelsCommand {
    /// List all model providers
    List,
    /// Get details of a model provider
    Get(NameArgs),
    /// Create a model provider from a JSON file
    Create(CreateArgs),
    /// Delete a model provider
    Delete(NameArgs),
}

#[derive(Args)]
pub(crate) struct NameArgs {
    pub(crate) name: String,
}

#[derive(Args)]
pub(crate) struct CreateArgs {
    #[arg(short = 'f', long = "file", help = "Path to a JSON definition")]
    pub(crate) file: PathBuf,
}

#[derive(Subcommand)]
pub(crate) enum RunsCommand {
    /// List runs
    List(RunsListArgs),
    /// Get details of a run
    Get(RunIdArgs),
    /// Show the events of a run
    Events(RunIdArgs),
}

#[derive(Args, Default)]
pub(crate) struct RunsListArgs {
    #[arg(long, help = "Only show runs of this agent")]
    pub(crate) agent: Option<String>,
}

#[derive(Args)]
pub(crate) struct RunIdArgs {
    pub(crate) id: String,
}

#[derive(Subcommand)]
pub(crate) enum ApprovalsCommand {
    /// List access requests
    List,
    /// Approve an access request
    Approve(RequestIdArgs),
    /// Reject an access request
    Reject(RequestIdArgs),
}

#[derive(Args)]
pub(crate) struct RequestIdArgs {
    pub(crate) id: String,
}

#[derive(Args)]
pub(crate) struct DeployArgs {
    #[arg(long, help = "Agent name")]
    pub(crate) name: String,
    #[arg(long = "file", required = true, help = "Source file to deploy (repeatable)")]
    pub(crate) files: Vec<PathBuf>,
    #[arg(long = "tool", help = "Required tool name (repeatable)")]
    pub(crate) tools: Vec<String>,
    #[arg(long, help = "Model in provider/model format (e.g., openai/gpt-4o-mini)")]
    pub(crate) model: Option<String>,
}

#[derive(Args)]
pub(crate) struct AnalyzeArgs {
    #[arg(long = "file", required = true, help = "Source file to analyze (repeatable)")]
    pub(crate) files: Vec<PathBuf>,
}

fn parse_config_key(input: &str) -> Result<ConfigKey, String> {
    input.parse::<ConfigKey>().map_err(|err| err.to_string())
}

const fn command_label(command: &Command) -> &'static str {
    match command {
        Command::Version => "version",
        Command::Config(ConfigCommand::Set(_)) => "config_set",
        Command::Config(ConfigCommand::Get) => "config_get",
        Command::Agents(AgentsCommand::List) => "agents_list",
        Command::Agents(AgentsCommand::Get(_)) => "agents_get",
        Command::Agents(AgentsCommand::Delete(_)) => "agents_delete",
        Command::Tools(ToolsCommand::List) => "tools_list",
        Command::Tools(ToolsCommand::Get(_)) => "tools_get",
        Command::Tools(ToolsCommand::Create(_)) => "tools_create",
        Command::Tools(ToolsCommand::Delete(_)) => "tools_delete",
        Command::Models(ModelsCommand::List) => "models_list",
        Command::Models(ModelsCommand::Get(_)) => "models_get",
        Command::Models(ModelsCommand::Create(_)) => "models_create",
        Command::Models(ModelsCommand::Delete(_)) => "models_delete",
        Command::Runs(RunsCommand::List(_)) => "runs_list",
        Command::Runs(RunsCommand::Get(_)) => "runs_get",
        Command::Runs(RunsCommand::Events(_)) => "runs_events",
        Command::Approvals(ApprovalsCommand::List) => "approvals_list",
        Command::Approvals(ApprovalsCommand::Approve(_)) => "approvals_approve",
        Command::Approvals(ApprovalsCommand::Reject(_)) => "approvals_reject",
        Command::Deploy(_) => "deploy",
        Command::Analyze(_) => "analyze",
        Command::StarterKit => "starter_kit",
    }
}
