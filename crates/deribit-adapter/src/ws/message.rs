/*
[INPUT]:  Raw WebSocket text frames
[OUTPUT]: Classified frames (correlated response, notification, or unrecognized)
[POS]:    WebSocket layer - message parsing and validation
[UPDATE]: When adding new message types or changing format
*/

use serde_json::Value;

use crate::http::DeribitError;
use crate::jsonrpc::{JsonRpcResponse, RequestId};

/// Server-pushed message without an id (e.g. `"method": "subscription"`)
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    pub method: String,
    pub params: Value,
}

impl Notification {
    /// Subscription channel name, when present
    pub fn channel(&self) -> Option<&str> {
        self.params.get("channel").and_then(Value::as_str)
    }

    /// Subscription payload, when present
    pub fn data(&self) -> Option<&Value> {
        self.params.get("data")
    }
}

/// One inbound frame after classification
#[derive(Debug)]
pub enum InboundFrame {
    Response(JsonRpcResponse),
    Notification(Notification),
    /// Envelope that failed validation; `id` is kept when it is readable
    Invalid {
        id: Option<RequestId>,
        error: DeribitError,
    },
    /// Valid JSON that is neither a response nor a notification
    Unrecognized(Value),
}

impl InboundFrame {
    /// Classify a text frame.
    ///
    /// Anything carrying `result` or `error` is a response, even without an
    /// id, so the correlator can report it as an orphan. A frame with
    /// `method` and no id is a notification. A frame with an id but no
    /// `result`, `error` or `method` is an invalid response to that id.
    /// Only text that is not JSON at all is an `Err`.
    pub fn parse(text: &str) -> crate::http::Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<RequestId>(id.clone()).ok());

        let is_response = value.get("result").is_some() || value.get("error").is_some();
        if is_response {
            return Ok(match JsonRpcResponse::from_value(value) {
                Ok(response) => InboundFrame::Response(response),
                Err(error) => InboundFrame::Invalid { id, error },
            });
        }

        let method = value.get("method").and_then(Value::as_str);
        match (id, method) {
            (None, Some(method)) => {
                let params = value.get("params").cloned().unwrap_or(Value::Null);
                Ok(InboundFrame::Notification(Notification {
                    method: method.to_string(),
                    params,
                }))
            }
            (Some(id), None) => Ok(InboundFrame::Invalid {
                id: Some(id),
                error: DeribitError::InvalidResponse(
                    "response has neither result nor error".to_string(),
                ),
            }),
            _ => Ok(InboundFrame::Unrecognized(value)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_frames_are_classified() {
        let frame = InboundFrame::parse(r#"{"jsonrpc":"2.0","id":"123","result":{"a":1}}"#).unwrap();
        match frame {
            InboundFrame::Response(response) => {
                assert_eq!(response.id, Some(RequestId::from("123")));
                assert!(!response.is_error());
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn subscription_frames_are_notifications() {
        let frame = InboundFrame::parse(
            r#"{"jsonrpc":"2.0","method":"subscription","params":{"channel":"ticker.BTC-PERPETUAL.100ms","data":{"mark_price":1}}}"#,
        )
        .unwrap();
        match frame {
            InboundFrame::Notification(notification) => {
                assert_eq!(notification.method, "subscription");
                assert_eq!(notification.channel(), Some("ticker.BTC-PERPETUAL.100ms"));
                assert_eq!(notification.data().and_then(|d| d.get("mark_price")), Some(&Value::from(1)));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn heartbeat_without_params_is_a_notification() {
        let frame = InboundFrame::parse(r#"{"jsonrpc":"2.0","method":"heartbeat"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Notification(n) if n.method == "heartbeat" && n.channel().is_none()));
    }

    #[test]
    fn other_json_is_unrecognized() {
        let frame = InboundFrame::parse(r#"{"hello":"world"}"#).unwrap();
        assert!(matches!(frame, InboundFrame::Unrecognized(_)));
    }

    #[test]
    fn conflicting_envelope_keeps_its_id() {
        let frame = InboundFrame::parse(
            r#"{"jsonrpc":"2.0","id":7,"result":1,"error":{"code":1,"message":"x"}}"#,
        )
        .unwrap();
        match frame {
            InboundFrame::Invalid { id, error } => {
                assert_eq!(id, Some(RequestId::from(7u64)));
                assert!(matches!(error, DeribitError::InvalidResponse(_)));
            }
            other => panic!("unexpected frame: {other:?}"),
        }
    }

    #[test]
    fn id_without_payload_is_invalid() {
        let frame = InboundFrame::parse(r#"{"jsonrpc":"2.0","id":"abc"}"#).unwrap();
        assert!(matches!(
            frame,
            InboundFrame::Invalid { id: Some(ref id), error: DeribitError::InvalidResponse(_) }
                if *id == RequestId::from("abc")
        ));
    }

    #[test]
    fn invalid_envelope_with_unreadable_id_has_none() {
        let frame =
            InboundFrame::parse(r#"{"jsonrpc":"2.0","id":[1],"result":1,"error":{"code":1,"message":"x"}}"#)
                .unwrap();
        assert!(matches!(frame, InboundFrame::Invalid { id: None, .. }));
    }

    #[test]
    fn invalid_json_is_a_decode_error() {
        let err = InboundFrame::parse("not json").unwrap_err();
        assert!(matches!(err, DeribitError::Decode(_)));
    }
}
