mod client;
mod config;

use std::io::{self, Read};

use clap::{Args, Parser, Subcommand};
use queries::conformance::ShapeError;
use queries::create_experiment::CreationOutcome;
use queries::get_config::NimbusConfig;
use queries::{ExperimentInput, NimbusExperimentApplication, OperationName};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use client::{ClientError, NimbusClient};
use config::{ClientConfig, ConfigError};

#[derive(Debug, thiserror::Error)]
enum CliError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Client(#[from] ClientError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error("failed to read {path}: {source}")]
    Read { path: String, source: io::Error },
    #[error("failed to render JSON: {0}")]
    Render(#[from] serde_json::Error),
    #[error("createExperiment returned no payload")]
    EmptyPayload,
    #[error("experiment was not created (status {status}): {reason}")]
    Rejected { status: String, reason: String },
}

#[derive(Parser, Debug)]
#[command(name = "nimbus", about = "Nimbus experiment GraphQL client")]
struct Cli {
    /// GraphQL endpoint.
    #[arg(long, global = true, env = "NIMBUS_GRAPHQL_URL")]
    url: Option<String>,

    /// Identity header value.
    #[arg(long, global = true, env = "NIMBUS_AUTH_EMAIL")]
    auth_email: Option<String>,

    /// Request timeout in seconds.
    #[arg(long, global = true, env = "NIMBUS_REQUEST_TIMEOUT_SECS")]
    timeout: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch the experiment form configuration (`getConfig`).
    Config {
        /// Print option lists as `label = value` lines instead of JSON.
        #[arg(long, default_value_t = false)]
        summary: bool,
    },
    /// Create an experiment (`createExperiment`).
    Create(CreateArgs),
    /// Validate a captured response payload against an operation's shape.
    Check {
        #[arg(long)]
        operation: OperationName,

        #[arg(default_value = "-", help = "Payload file path, or - for stdin")]
        input: String,
    },
    /// Print an operation's GraphQL document.
    Document { operation: OperationName },
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    name: String,

    #[arg(long)]
    hypothesis: String,

    /// desktop, fenix or reference-browser.
    #[arg(long)]
    application: NimbusExperimentApplication,

    #[arg(long)]
    client_mutation_id: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    init_tracing();
    let cli = Cli::parse();

    let result = run(&cli).await;
    if let Err(CliError::Client(err)) = &result
        && err.retryable()
    {
        tracing::warn!(error = %err, "transient failure; retrying may succeed");
    }
    result
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    match &cli.command {
        Command::Check { operation, input } => run_check(*operation, input),
        Command::Document { operation } => {
            print!("{}", operation.document());
            Ok(())
        }
        Command::Config { summary } => {
            let client = build_client(cli)?;
            run_config(&client, *summary).await
        }
        Command::Create(args) => {
            let client = build_client(cli)?;
            run_create(&client, args).await
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(io::stderr)
        .init();
}

fn build_client(cli: &Cli) -> Result<NimbusClient, CliError> {
    let config = resolve_config(ClientConfig::from_env()?, cli)?;
    let client = NimbusClient::new(&config)?;
    tracing::debug!(endpoint = client.endpoint(), "client configured");
    Ok(client)
}

fn resolve_config(mut config: ClientConfig, cli: &Cli) -> Result<ClientConfig, CliError> {
    if let Some(url) = &cli.url {
        config = config.with_endpoint(url)?;
    }
    if let Some(email) = &cli.auth_email {
        config = config.with_auth_email(email.clone());
    }
    if let Some(secs) = cli.timeout {
        config = config.with_request_timeout(secs);
    }
    Ok(config)
}

async fn run_config(client: &NimbusClient, summary: bool) -> Result<(), CliError> {
    let data = client.get_config().await?;
    if summary {
        match &data.nimbus_config {
            Some(config) => print!("{}", render_summary(config)),
            None => println!("(no configuration)"),
        }
        return Ok(());
    }
    print_json(&data)
}

async fn run_create(client: &NimbusClient, args: &CreateArgs) -> Result<(), CliError> {
    let mut input = ExperimentInput::new(args.name.clone(), args.hypothesis.clone(), args.application);
    if let Some(id) = &args.client_mutation_id {
        input = input.with_client_mutation_id(id.clone());
    }

    let data = client.create_experiment(input).await?;
    let payload = data.create_experiment.ok_or(CliError::EmptyPayload)?;
    match payload.outcome() {
        CreationOutcome::Created(experiment) => print_json(experiment),
        CreationOutcome::Rejected { status, message } => {
            for (field, messages) in payload.field_errors() {
                for message in messages {
                    eprintln!("{field}: {message}");
                }
            }
            Err(CliError::Rejected {
                status: status.map_or_else(|| "none".to_owned(), |s| s.to_string()),
                reason: rejection_reason(payload.message_text(), message.is_some()),
            })
        }
    }
}

fn rejection_reason(text: Option<&str>, has_message: bool) -> String {
    match text {
        Some(text) => text.to_owned(),
        None if has_message => "see field errors above".to_owned(),
        None => "no message".to_owned(),
    }
}

fn run_check(operation: OperationName, input: &str) -> Result<(), CliError> {
    let text = read_input(input)?;
    operation.check_str(&text)?;
    println!("ok");
    Ok(())
}

fn read_input(input: &str) -> Result<String, CliError> {
    if input == "-" {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .map_err(|source| CliError::Read { path: "stdin".to_owned(), source })?;
        return Ok(text);
    }
    std::fs::read_to_string(input).map_err(|source| CliError::Read { path: input.to_owned(), source })
}

/// Render each option list of a configuration as `label = value` lines.
fn render_summary(config: &NimbusConfig) -> String {
    let mut out = String::new();
    let sections = [
        ("application", config.applications().collect::<Vec<_>>()),
        ("channel", config.channels().collect()),
        ("firefoxMinVersion", config.firefox_min_versions().collect()),
        ("targetingConfigSlug", config.targeting_configs().collect()),
        ("documentationLink", config.documentation_links().collect()),
    ];
    for (title, options) in sections {
        out.push_str(&format!("[{title}]\n"));
        for option in options {
            let label = option.label.as_deref().unwrap_or("-");
            let value = option.value.as_deref().unwrap_or("-");
            out.push_str(&format!("{label} = {value}\n"));
        }
    }

    out.push_str("[featureConfig]\n");
    for feature in config.feature_configs() {
        let application = feature.application.map_or("-", |app| app.as_str());
        out.push_str(&format!("{} = {} ({application})\n", feature.name, feature.slug));
    }

    out.push_str("[probeSets]\n");
    for probe_set in config.probe_sets() {
        out.push_str(&format!("{} = {}\n", probe_set.name, probe_set.slug));
    }

    if let Some(hypothesis) = &config.hypothesis_default {
        out.push_str(&format!("[hypothesisDefault]\n{hypothesis}\n"));
    }
    out
}

fn print_json(value: &impl Serialize) -> Result<(), CliError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
#[path = "main_test.rs"]
mod tests;
