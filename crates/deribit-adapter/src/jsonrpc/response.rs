/*
[INPUT]:  Raw JSON-RPC response payloads (HTTP bodies, WebSocket frames)
[OUTPUT]: Validated response envelopes with a success/failure payload
[POS]:    JSON-RPC layer - response decoding
[UPDATE]: When the server adds envelope metadata or changes error shape
*/

use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::id::RequestId;
use super::request::JSONRPC_VERSION;
use crate::http::{DeribitError, Result};

/// JSON-RPC error object
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RpcErrorObject {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<Value>,
}

/// Outcome carried by a response: exactly one of result or error
#[derive(Debug, Clone, PartialEq)]
pub enum RpcPayload {
    Success(Value),
    Failure(RpcErrorObject),
}

/// Server-side timing metadata (microseconds)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServerTiming {
    pub us_in: Option<u64>,
    pub us_out: Option<u64>,
    pub us_diff: Option<u64>,
}

/// Validated JSON-RPC 2.0 response envelope
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "WireResponse")]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    pub id: Option<RequestId>,
    pub payload: RpcPayload,
    pub testnet: bool,
    pub timing: ServerTiming,
}

#[derive(Deserialize)]
struct WireResponse {
    #[serde(default = "default_version")]
    jsonrpc: String,
    #[serde(default)]
    id: Option<RequestId>,
    #[serde(default, deserialize_with = "present_value")]
    result: Option<Value>,
    #[serde(default)]
    error: Option<RpcErrorObject>,
    #[serde(default)]
    testnet: bool,
    #[serde(rename = "usIn", default)]
    us_in: Option<u64>,
    #[serde(rename = "usOut", default)]
    us_out: Option<u64>,
    #[serde(rename = "usDiff", default)]
    us_diff: Option<u64>,
}

fn default_version() -> String {
    JSONRPC_VERSION.to_string()
}

/// A present `"result": null` is a success carrying null, not an absent field.
fn present_value<'de, D>(deserializer: D) -> std::result::Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

impl TryFrom<WireResponse> for JsonRpcResponse {
    type Error = String;

    fn try_from(wire: WireResponse) -> std::result::Result<Self, Self::Error> {
        let payload = match (wire.result, wire.error) {
            (Some(result), None) => RpcPayload::Success(result),
            (None, Some(error)) => RpcPayload::Failure(error),
            (Some(_), Some(_)) => {
                return Err("response carries both result and error".to_string());
            }
            (None, None) => {
                return Err("response carries neither result nor error".to_string());
            }
        };

        Ok(Self {
            jsonrpc: wire.jsonrpc,
            id: wire.id,
            payload,
            testnet: wire.testnet,
            timing: ServerTiming {
                us_in: wire.us_in,
                us_out: wire.us_out,
                us_diff: wire.us_diff,
            },
        })
    }
}

impl JsonRpcResponse {
    /// Decode from raw text. Invalid JSON is `Decode`; a bad envelope is `InvalidResponse`.
    pub fn from_json(raw: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value).map_err(|err| DeribitError::InvalidResponse(err.to_string()))
    }

    pub fn is_error(&self) -> bool {
        matches!(self.payload, RpcPayload::Failure(_))
    }

    pub fn result(&self) -> Option<&Value> {
        match &self.payload {
            RpcPayload::Success(value) => Some(value),
            RpcPayload::Failure(_) => None,
        }
    }

    pub fn error(&self) -> Option<&RpcErrorObject> {
        match &self.payload {
            RpcPayload::Success(_) => None,
            RpcPayload::Failure(error) => Some(error),
        }
    }

    /// Collapse into the caller-facing outcome
    pub fn into_result(self) -> Result<Value> {
        match self.payload {
            RpcPayload::Success(value) => Ok(value),
            RpcPayload::Failure(error) => Err(DeribitError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
        }
    }
}
