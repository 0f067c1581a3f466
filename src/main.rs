use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use n8n_mirror::provider::{DataSource, Provider, Severity};
use n8n_mirror::{schema, server, ProviderConfig, ScalarPolicy};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// URL of the n8n instance
    #[arg(long, env = "N8N_HOST_URL", global = true)]
    host_url: Option<String>,

    /// API key for the n8n instance
    #[arg(long, env = "N8N_API_KEY", hide_env_values = true, global = true)]
    api_key: Option<String>,

    /// Stringify numbers and booleans in node parameters instead of rejecting them
    #[arg(long, env = "N8N_LENIENT_SCALARS", global = true)]
    lenient_scalars: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Json, global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Read a single workflow
    Workflow {
        #[arg(long)]
        id: String,
    },
    /// Read every workflow
    Workflows,
    /// Print a schema
    Schema {
        #[arg(value_enum, default_value_t = SchemaTarget::Workflow)]
        target: SchemaTarget,
    },
    /// Serve the data sources over HTTP
    Serve {
        #[arg(short, long, default_value_t = 8080)]
        port: u16,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Json,
    Yaml,
}

#[derive(Clone, Copy, ValueEnum)]
enum SchemaTarget {
    Provider,
    Workflow,
    Workflows,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();

    env_logger::init();
    let cli = Cli::parse();

    match &cli.command {
        Command::Schema { target } => {
            let schema = match target {
                SchemaTarget::Provider => schema::provider_schema(),
                SchemaTarget::Workflow => schema::workflow_data_source_schema(),
                SchemaTarget::Workflows => schema::workflows_data_source_schema(),
            };
            print_output(&schema, cli.format)
        }
        Command::Workflow { id } => {
            let provider = configure(&cli)?;
            let data_source = provider
                .data_source("n8n_workflow")
                .context("n8n_workflow data source is not registered")?;
            read(data_source.as_ref(), serde_json::json!({ "id": id }), cli.format).await
        }
        Command::Workflows => {
            let provider = configure(&cli)?;
            let data_source = provider
                .data_source("n8n_workflows")
                .context("n8n_workflows data source is not registered")?;
            read(data_source.as_ref(), serde_json::json!({}), cli.format).await
        }
        Command::Serve { port } => {
            let provider = configure(&cli)?;
            server::run_server(Arc::new(provider), *port).await
        }
    }
}

fn configure(cli: &Cli) -> Result<Provider> {
    let host_url = cli
        .host_url
        .as_deref()
        .context("--host-url or N8N_HOST_URL is required")?;
    let api_key = cli
        .api_key
        .as_deref()
        .context("--api-key or N8N_API_KEY is required")?;

    let policy = if cli.lenient_scalars {
        ScalarPolicy::Lenient
    } else {
        ScalarPolicy::Strict
    };
    let config = ProviderConfig::new(host_url, api_key)
        .context("Invalid provider configuration")?
        .with_scalar_policy(policy);

    Ok(Provider::configure(&config))
}

async fn read(data_source: &dyn DataSource, config: Value, format: OutputFormat) -> Result<()> {
    let response = data_source.read(&config).await;
    for warning in response
        .diagnostics
        .iter()
        .filter(|d| d.severity == Severity::Warning)
    {
        log::warn!("{}: {}", warning.summary, warning.detail);
    }
    if let Some(diagnostic) = response
        .diagnostics
        .iter()
        .find(|d| d.severity == Severity::Error)
    {
        anyhow::bail!("{}: {}", diagnostic.summary, diagnostic.detail);
    }

    let state = response
        .state
        .with_context(|| format!("{} returned no state", data_source.type_name()))?;
    print_output(&state, format)
}

fn print_output<T: Serialize>(value: &T, format: OutputFormat) -> Result<()> {
    let rendered = match format {
        OutputFormat::Json => serde_json::to_string_pretty(value).context("Failed to render JSON")?,
        OutputFormat::Yaml => serde_yaml::to_string(value).context("Failed to render YAML")?,
    };
    println!("{}", rendered);
    Ok(())
}
