/*
[INPUT]:  Process arguments
[OUTPUT]: Parsed global flags and subcommand
[POS]:    CLI layer - argument definitions
[UPDATE]: When changing CLI flags or subcommands
*/

use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "deribit-cli", version, about = "Deribit JSON-RPC command line client")]
pub struct Cli {
    /// YAML configuration file
    #[arg(long = "config", value_name = "PATH")]
    pub config_path: Option<PathBuf>,
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,
    /// Route calls through the WebSocket transport instead of HTTP
    #[arg(long)]
    pub ws: bool,
    /// Use mainnet endpoints regardless of the configuration file
    #[arg(long)]
    pub mainnet: bool,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ticker for one instrument
    Ticker { instrument: String },
    /// Order book snapshot
    OrderBook {
        instrument: String,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Funding rate history; defaults to the last eight hours
    FundingHistory {
        instrument: String,
        #[arg(long = "start-ms")]
        start_ms: Option<i64>,
        #[arg(long = "end-ms")]
        end_ms: Option<i64>,
    },
    /// Instruments for a currency
    Instruments {
        currency: String,
        /// future, option, spot, future_combo or option_combo
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        expired: bool,
    },
    /// Server time in milliseconds
    Time,
    /// Raw JSON-RPC call with optional JSON object params
    Call {
        method: String,
        params: Option<String>,
    },
}
