/*
[INPUT]:  CLI arguments, optional YAML configuration file, credential environment variables
[OUTPUT]: Pretty-printed JSON results of one Deribit API call
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags or startup flow
*/

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use std::path::Path;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use deribit_adapter::{DeribitClient, DeribitWebSocket};
use deribit_cli::{Cli, CliConfig, execute};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();
    init_tracing(&args.log_level)?;

    let mut config = match &args.config_path {
        Some(path) => load_config(path)?,
        None => CliConfig::default(),
    }
    .with_env_overrides(|key| std::env::var(key).ok());
    if args.mainnet {
        config.testnet = false;
    }

    let client_config = config.client_config();
    info!(
        testnet = client_config.testnet,
        transport = if args.ws { "websocket" } else { "http" },
        authenticated = config.credentials.is_some(),
        "starting deribit-cli"
    );

    let value = if args.ws {
        let mut ws = DeribitWebSocket::new(client_config);
        if let Some(credentials) = config.credentials() {
            ws = ws.with_credentials(credentials);
        }
        ws.connect().await.context("connect websocket")?;
        let outcome = execute(&ws, &args.command).await;
        ws.close().await;
        outcome?
    } else {
        let mut client = DeribitClient::with_config(client_config).context("create http client")?;
        if let Some(credentials) = config.credentials() {
            client.set_credentials(credentials);
        }
        execute(&client, &args.command).await?
    };

    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

fn init_tracing(log_level: &str) -> Result<()> {
    let filter = EnvFilter::try_new(log_level).context("invalid log level")?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow!(err))
        .context("initialize tracing subscriber")?;
    Ok(())
}

fn load_config(path: &Path) -> Result<CliConfig> {
    let path_str = path.to_str().context("config path must be valid utf-8")?;
    if !path.exists() {
        warn!(path = path_str, "config file not found");
    }
    CliConfig::from_file(path_str).context("load config")
}
