/*
[INPUT]:  Endpoint arguments from callers
[OUTPUT]: Typed params objects serialized into JSON-RPC requests
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use rust_decimal::Decimal;
use serde::Serialize;

use super::enums::{Direction, InstrumentKind, OrderType, TimeInForce};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentParams<'a> {
    pub instrument_name: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderBookParams<'a> {
    pub instrument_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub depth: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstrumentsParams<'a> {
    pub currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<InstrumentKind>,
    pub expired: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookSummaryParams<'a> {
    pub currency: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<InstrumentKind>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FundingRateHistoryParams<'a> {
    pub instrument_name: &'a str,
    pub start_timestamp: i64,
    pub end_timestamp: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CancelOrderParams<'a> {
    pub order_id: &'a str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SubscriptionParams<'a> {
    pub channels: &'a [String],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClientCredentialsParams<'a> {
    pub grant_type: &'static str,
    pub client_id: &'a str,
    pub client_secret: &'a str,
}

/// Order placement request. `direction` selects `private/buy` or `private/sell`
/// and is not part of the params object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRequest {
    #[serde(skip)]
    pub direction: Direction,
    pub instrument_name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub order_type: OrderType,
    #[serde(
        with = "rust_decimal::serde::float_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub price: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_in_force: Option<TimeInForce>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_only: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reduce_only: Option<bool>,
}

impl OrderRequest {
    pub fn limit(
        direction: Direction,
        instrument_name: impl Into<String>,
        amount: Decimal,
        price: Decimal,
    ) -> Self {
        Self {
            direction,
            instrument_name: instrument_name.into(),
            amount,
            order_type: OrderType::Limit,
            price: Some(price),
            label: None,
            time_in_force: None,
            post_only: None,
            reduce_only: None,
        }
    }

    pub fn market(direction: Direction, instrument_name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            direction,
            instrument_name: instrument_name.into(),
            amount,
            order_type: OrderType::Market,
            price: None,
            label: None,
            time_in_force: None,
            post_only: None,
            reduce_only: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = Some(time_in_force);
        self
    }

    pub fn post_only(mut self, post_only: bool) -> Self {
        self.post_only = Some(post_only);
        self
    }

    pub fn reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = Some(reduce_only);
        self
    }
}
