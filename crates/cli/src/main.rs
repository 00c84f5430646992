//! `aitable-node` CLI entry-point.
//!
//! Available sub-commands:
//! - `run`: execute the Aitable node over a JSON file of input items.
//! - `fields`: list a datasheet's fields as dropdown options.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::EnvFilter;

use aitable::{load_field_options, AitableConfig, AitableNode, NodeVersion, CREDENTIAL_NAME};
use nodes::{ExecutableNode, ExecutionContext, HttpHelperConfig, NodeItem, NodeParameters, ReqwestHelper};

#[derive(Parser)]
#[command(
    name = "aitable-node",
    about = "Run the Aitable workflow node outside a workflow engine",
    version
)]
struct Cli {
    /// Aitable API token.
    #[arg(long, env = "AITABLE_API_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Execute the node once per input item and print the output items.
    Run {
        /// Node parameters: a flat JSON object, or `{ "node": {…}, "items": [{…}] }`.
        #[arg(long)]
        params: PathBuf,
        /// JSON array of input items; a single empty item when omitted.
        #[arg(long)]
        items: Option<PathBuf>,
        #[arg(long, default_value = "v1", value_parser = parse_version)]
        node_version: NodeVersion,
        /// Record failures as `{ "error": … }` items instead of aborting.
        #[arg(long)]
        continue_on_fail: bool,
    },
    /// List the fields of a datasheet.
    Fields {
        datasheet_id: String,
    },
}

fn parse_version(value: &str) -> Result<NodeVersion, String> {
    NodeVersion::parse(value).ok_or_else(|| format!("unknown node version '{value}' (expected v1 or v2)"))
}

fn read_json(path: &Path) -> anyhow::Result<Value> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("cannot read file {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("invalid JSON in {}", path.display()))
}

fn load_parameters(path: &Path) -> anyhow::Result<NodeParameters> {
    let value = read_json(path)?;
    if value.get("node").is_some_and(Value::is_object) {
        return serde_json::from_value(value)
            .with_context(|| format!("invalid parameter file {}", path.display()));
    }
    if !value.is_object() {
        bail!("{} must contain a JSON object", path.display());
    }
    Ok(NodeParameters::from_value(value))
}

fn load_items(path: Option<&Path>) -> anyhow::Result<Vec<NodeItem>> {
    let Some(path) = path else {
        return Ok(vec![NodeItem::default()]);
    };
    match read_json(path)? {
        Value::Array(items) => Ok(items.into_iter().map(NodeItem::new).collect()),
        _ => bail!("{} must contain a JSON array", path.display()),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = AitableConfig::from_env();
    let http_config = HttpHelperConfig {
        user_agent: concat!("aitable-node/", env!("CARGO_PKG_VERSION")).to_string(),
        ..HttpHelperConfig::default()
    };
    let http = Arc::new(ReqwestHelper::new(&http_config)?);

    match cli.command {
        Command::Run { params, items, node_version, continue_on_fail } => {
            let parameters = load_parameters(&params)?;
            let items = load_items(items.as_deref())?;

            let mut ctx = ExecutionContext::new("Aitable", parameters).with_continue_on_fail(continue_on_fail);
            if let Some(token) = cli.token {
                ctx = ctx.with_credential(CREDENTIAL_NAME, serde_json::json!({ "apiToken": token }));
            }

            info!("Running Aitable node {node_version} against {}", config.base_url);
            let node = AitableNode::new(node_version, config, http);
            let output = node.execute(items, &ctx).await?;

            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        Command::Fields { datasheet_id } => {
            let Some(token) = cli.token else {
                bail!("an API token is required (--token or AITABLE_API_TOKEN)");
            };
            let options = load_field_options(http.as_ref(), &config, &token, &datasheet_id).await?;
            println!("{}", serde_json::to_string_pretty(&options)?);
        }
    }

    Ok(())
}
