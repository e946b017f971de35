/*
[INPUT]:  Method name, parameter mapping, allocated request id
[OUTPUT]: Immutable JSON-RPC 2.0 request envelopes and their wire form
[POS]:    JSON-RPC layer - request builder
[UPDATE]: When changing envelope fields or parameter validation
*/

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::id::RequestId;
use crate::http::{DeribitError, Result};

pub const JSONRPC_VERSION: &str = "2.0";

/// JSON-RPC 2.0 request envelope.
///
/// Fields are fixed at construction; the request is serialized once per dispatch.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JsonRpcRequest {
    jsonrpc: &'static str,
    method: String,
    params: Map<String, Value>,
    id: RequestId,
}

#[derive(Deserialize)]
struct WireRequest {
    jsonrpc: String,
    method: String,
    #[serde(default)]
    params: Option<Value>,
    id: RequestId,
}

impl JsonRpcRequest {
    /// Build a request. Fails on an empty method name.
    pub fn new(id: RequestId, method: &str, params: Map<String, Value>) -> Result<Self> {
        let method = method.trim().trim_start_matches('/');
        if method.is_empty() {
            return Err(DeribitError::InvalidArgument(
                "JSON-RPC method name must not be empty".to_string(),
            ));
        }

        Ok(Self {
            jsonrpc: JSONRPC_VERSION,
            method: method.to_string(),
            params,
            id,
        })
    }

    /// Build a request from any serializable params value.
    ///
    /// The value must serialize to a JSON object; `null` (e.g. `()`) becomes `{}`.
    pub fn from_serializable<P: Serialize>(id: RequestId, method: &str, params: P) -> Result<Self> {
        let params = match serde_json::to_value(params)? {
            Value::Object(map) => map,
            Value::Null => Map::new(),
            other => {
                return Err(DeribitError::InvalidArgument(format!(
                    "JSON-RPC params must be an object, got {}",
                    json_type_name(&other)
                )));
            }
        };
        Self::new(id, method, params)
    }

    /// Parse a request from its wire form
    pub fn from_json(raw: &str) -> Result<Self> {
        let wire: WireRequest = serde_json::from_str(raw)?;
        if wire.jsonrpc != JSONRPC_VERSION {
            return Err(DeribitError::InvalidResponse(format!(
                "unsupported jsonrpc version {}",
                wire.jsonrpc
            )));
        }
        let params = wire.params.unwrap_or(Value::Null);
        Self::from_serializable(wire.id, &wire.method, params)
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn params(&self) -> &Map<String, Value> {
        &self.params
    }

    pub fn id(&self) -> &RequestId {
        &self.id
    }

    pub fn jsonrpc(&self) -> &str {
        self.jsonrpc
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("test params must be an object"),
        }
    }

    #[test]
    fn empty_method_is_rejected() {
        let err = JsonRpcRequest::new(RequestId::Number(1), "  ", Map::new()).unwrap_err();
        assert!(matches!(err, DeribitError::InvalidArgument(_)));
    }

    #[test]
    fn leading_slash_is_stripped() {
        let req = JsonRpcRequest::new(RequestId::Number(1), "/public/get_instruments", Map::new())
            .unwrap();
        assert_eq!(req.method(), "public/get_instruments");
    }

    #[test]
    fn wire_form_matches_envelope() {
        let req = JsonRpcRequest::new(
            RequestId::from("123"),
            "public/get_order_book",
            params(json!({"instrument_name": "BTC-PERPETUAL", "depth": 10})),
        )
        .unwrap();

        let value: Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(
            value,
            json!({
                "jsonrpc": "2.0",
                "method": "public/get_order_book",
                "params": {"instrument_name": "BTC-PERPETUAL", "depth": 10},
                "id": "123"
            })
        );
    }

    #[test]
    fn empty_params_serialize_as_object() {
        let req = JsonRpcRequest::from_serializable(RequestId::Number(4), "public/get_time", ())
            .unwrap();
        let value: Value = serde_json::from_str(&req.to_json().unwrap()).unwrap();
        assert_eq!(value["params"], json!({}));
    }

    #[test]
    fn non_object_params_are_rejected() {
        let err = JsonRpcRequest::from_serializable(RequestId::Number(1), "public/test", vec![1, 2])
            .unwrap_err();
        assert!(matches!(err, DeribitError::InvalidArgument(message) if message.contains("array")));
    }

    #[test]
    fn request_survives_encode_decode() {
        let original = JsonRpcRequest::new(
            RequestId::Number(99),
            "private/buy",
            params(json!({"instrument_name": "ETH-PERPETUAL", "amount": 10, "label": null})),
        )
        .unwrap();

        let decoded = JsonRpcRequest::from_json(&original.to_json().unwrap()).unwrap();
        assert_eq!(decoded.method(), original.method());
        assert_eq!(decoded.params(), original.params());
        assert_eq!(decoded.id(), original.id());
    }
}
