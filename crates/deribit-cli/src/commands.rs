/*
[INPUT]:  A parsed subcommand and any JsonRpcTransport
[OUTPUT]: JSON result ready for printing
[POS]:    CLI layer - subcommand execution
[UPDATE]: When adding subcommands
*/

use anyhow::{Context, Result, bail};
use chrono::{Duration, Utc};
use deribit_adapter::{InstrumentKind, JsonRpcTransport, MarketDataApi};
use serde_json::Value;
use tracing::debug;

use crate::cli::Command;

const FUNDING_LOOKBACK_HOURS: i64 = 8;

/// Run one subcommand against `transport` and return its result as JSON
pub async fn execute<T: JsonRpcTransport>(transport: &T, command: &Command) -> Result<Value> {
    debug!(?command, "executing command");
    let value = match command {
        Command::Ticker { instrument } => serde_json::to_value(transport.get_ticker(instrument).await?)?,
        Command::OrderBook { instrument, depth } => {
            serde_json::to_value(transport.get_order_book(instrument, *depth).await?)?
        }
        Command::FundingHistory {
            instrument,
            start_ms,
            end_ms,
        } => {
            let end = end_ms.unwrap_or_else(|| Utc::now().timestamp_millis());
            let start = start_ms
                .unwrap_or_else(|| end - Duration::hours(FUNDING_LOOKBACK_HOURS).num_milliseconds());
            serde_json::to_value(transport.get_funding_rate_history(instrument, start, end).await?)?
        }
        Command::Instruments {
            currency,
            kind,
            expired,
        } => {
            let kind = kind.as_deref().map(parse_kind).transpose()?;
            serde_json::to_value(transport.get_instruments(currency, kind, *expired).await?)?
        }
        Command::Time => Value::from(transport.get_time().await?),
        Command::Call { method, params } => {
            let params = parse_params(params.as_deref())?;
            transport.call_typed(method, params).await?
        }
    };
    Ok(value)
}

pub fn parse_kind(raw: &str) -> Result<InstrumentKind> {
    serde_json::from_value(Value::String(raw.to_string()))
        .with_context(|| format!("unknown instrument kind: {raw}"))
}

/// Parse raw call params; absent params become an empty object
pub fn parse_params(raw: Option<&str>) -> Result<Value> {
    let Some(raw) = raw else {
        return Ok(Value::Object(Default::default()));
    };
    let value: Value = serde_json::from_str(raw).context("params must be valid JSON")?;
    if !value.is_object() {
        bail!("params must be a JSON object");
    }
    Ok(value)
}
