/*
[INPUT]:  Successful JSON-RPC result payloads for private and session methods
[OUTPUT]: Typed Rust response structs with serialization support
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use super::models::{Order, Trade};

/// Result of `private/buy` and `private/sell`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order: Order,
    #[serde(default)]
    pub trades: Vec<Trade>,
}

/// Result of `public/auth`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthToken {
    pub access_token: String,
    pub refresh_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    pub scope: String,
    pub token_type: String,
}

impl AuthToken {
    /// Expiry relative to `issued_at`
    pub fn expires_at(&self, issued_at: DateTime<Utc>) -> DateTime<Utc> {
        issued_at + Duration::seconds(self.expires_in)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::decode_record;
    use serde_json::json;

    #[test]
    fn order_response_without_trades() {
        let value = json!({
            "order": {
                "order_id": "ETH-349249",
                "instrument_name": "ETH-PERPETUAL",
                "direction": "buy",
                "amount": 40,
                "filled_amount": 0,
                "order_state": "open",
                "order_type": "limit",
                "creation_timestamp": 1590486335742i64,
                "last_update_timestamp": 1590486335742i64,
                "price": 190.5,
                "label": "market0000234",
                "post_only": true
            }
        });
        let response: OrderResponse = decode_record("OrderResponse", value).unwrap();
        assert!(response.trades.is_empty());
        assert_eq!(response.order.label.as_deref(), Some("market0000234"));
        assert!(response.order.post_only);
    }

    #[test]
    fn auth_token_expiry() {
        let token = AuthToken {
            access_token: "a".to_string(),
            refresh_token: "r".to_string(),
            expires_in: 900,
            scope: "session:name".to_string(),
            token_type: "bearer".to_string(),
        };
        let issued = DateTime::<Utc>::from_timestamp(1_000, 0).unwrap();
        assert_eq!(token.expires_at(issued).timestamp(), 1_900);
    }
}
