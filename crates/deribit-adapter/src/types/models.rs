/*
[INPUT]:  Successful JSON-RPC result payloads
[OUTPUT]: Typed read-only market and trading records
[POS]:    Data layer - type definitions for API communication
[UPDATE]: When API schema changes or new types added
*/

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{
    BookState, Direction, InstrumentKind, OptionType, OrderState, OrderType, TimeInForce,
};
use super::millis_to_utc;

/// One `[price, amount]` ladder entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceLevel(pub Decimal, pub Decimal);

impl PriceLevel {
    pub fn price(&self) -> Decimal {
        self.0
    }

    pub fn amount(&self) -> Decimal {
        self.1
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickerStats {
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub price_change: Option<Decimal>,
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default)]
    pub volume_usd: Option<Decimal>,
}

/// Option Greeks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Greeks {
    pub delta: Decimal,
    pub gamma: Decimal,
    pub rho: Decimal,
    pub theta: Decimal,
    pub vega: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderBook {
    pub timestamp: i64,
    pub state: BookState,
    pub bids: Vec<PriceLevel>,
    pub asks: Vec<PriceLevel>,
    #[serde(default)]
    pub instrument_name: Option<String>,
    #[serde(default)]
    pub change_id: Option<i64>,
    #[serde(default)]
    pub best_bid_price: Option<Decimal>,
    #[serde(default)]
    pub best_bid_amount: Option<Decimal>,
    #[serde(default)]
    pub best_ask_price: Option<Decimal>,
    #[serde(default)]
    pub best_ask_amount: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub index_price: Option<Decimal>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
    #[serde(default)]
    pub settlement_price: Option<Decimal>,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub funding_8h: Option<Decimal>,
    #[serde(default)]
    pub current_funding: Option<Decimal>,
    #[serde(default)]
    pub underlying_price: Option<Decimal>,
    #[serde(default)]
    pub underlying_index: Option<String>,
    #[serde(default)]
    pub mark_iv: Option<Decimal>,
    #[serde(default)]
    pub bid_iv: Option<Decimal>,
    #[serde(default)]
    pub ask_iv: Option<Decimal>,
    #[serde(default)]
    pub stats: Option<TickerStats>,
    #[serde(default)]
    pub greeks: Option<Greeks>,
}

impl OrderBook {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }

    /// Best ask minus best bid, when both sides are quoted
    pub fn spread(&self) -> Option<Decimal> {
        let bid = self.bids.first()?.price();
        let ask = self.asks.first()?.price();
        Some(ask - bid)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    pub instrument_name: String,
    pub timestamp: i64,
    pub mark_price: Decimal,
    pub index_price: Decimal,
    #[serde(default)]
    pub state: Option<BookState>,
    #[serde(default)]
    pub best_bid_price: Option<Decimal>,
    #[serde(default)]
    pub best_bid_amount: Option<Decimal>,
    #[serde(default)]
    pub best_ask_price: Option<Decimal>,
    #[serde(default)]
    pub best_ask_amount: Option<Decimal>,
    #[serde(default)]
    pub last_price: Option<Decimal>,
    #[serde(default)]
    pub settlement_price: Option<Decimal>,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub min_price: Option<Decimal>,
    #[serde(default)]
    pub max_price: Option<Decimal>,
    #[serde(default)]
    pub funding_8h: Option<Decimal>,
    #[serde(default)]
    pub current_funding: Option<Decimal>,
    #[serde(default)]
    pub estimated_delivery_price: Option<Decimal>,
    #[serde(default)]
    pub interest_value: Option<Decimal>,
    #[serde(default)]
    pub underlying_price: Option<Decimal>,
    #[serde(default)]
    pub mark_iv: Option<Decimal>,
    #[serde(default)]
    pub bid_iv: Option<Decimal>,
    #[serde(default)]
    pub ask_iv: Option<Decimal>,
    #[serde(default)]
    pub stats: Option<TickerStats>,
    #[serde(default)]
    pub greeks: Option<Greeks>,
}

impl Ticker {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }
}

/// One entry of `public/get_funding_rate_history`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingRateEntry {
    pub timestamp: i64,
    pub index_price: Decimal,
    pub prev_index_price: Decimal,
    pub interest_8h: Decimal,
    pub interest_1h: Decimal,
}

impl FundingRateEntry {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instrument {
    pub instrument_name: String,
    pub kind: InstrumentKind,
    pub base_currency: String,
    pub quote_currency: String,
    pub tick_size: Decimal,
    pub contract_size: Decimal,
    pub min_trade_amount: Decimal,
    pub is_active: bool,
    pub creation_timestamp: i64,
    pub expiration_timestamp: i64,
    #[serde(default)]
    pub settlement_currency: Option<String>,
    #[serde(default)]
    pub settlement_period: Option<String>,
    #[serde(default)]
    pub option_type: Option<OptionType>,
    #[serde(default)]
    pub strike: Option<Decimal>,
    #[serde(default)]
    pub maker_commission: Option<Decimal>,
    #[serde(default)]
    pub taker_commission: Option<Decimal>,
}

impl Instrument {
    pub fn expiration(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.expiration_timestamp)
    }

    pub fn created(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.creation_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookSummary {
    pub instrument_name: String,
    pub base_currency: String,
    pub quote_currency: String,
    pub creation_timestamp: i64,
    #[serde(default)]
    pub volume: Option<Decimal>,
    #[serde(default)]
    pub volume_usd: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
    #[serde(default)]
    pub last: Option<Decimal>,
    #[serde(default)]
    pub bid_price: Option<Decimal>,
    #[serde(default)]
    pub ask_price: Option<Decimal>,
    #[serde(default)]
    pub mid_price: Option<Decimal>,
    #[serde(default)]
    pub high: Option<Decimal>,
    #[serde(default)]
    pub low: Option<Decimal>,
    #[serde(default)]
    pub open_interest: Option<Decimal>,
    #[serde(default)]
    pub price_change: Option<Decimal>,
    #[serde(default)]
    pub funding_8h: Option<Decimal>,
    #[serde(default)]
    pub current_funding: Option<Decimal>,
    #[serde(default)]
    pub estimated_delivery_price: Option<Decimal>,
    #[serde(default)]
    pub mark_iv: Option<Decimal>,
}

impl BookSummary {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.creation_timestamp)
    }
}

/// Result of `public/get_contract_size`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContractSize {
    pub contract_size: Decimal,
}

/// Order price: numeric for priced orders, `"market_price"` for market orders
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OrderPrice {
    Value(Decimal),
    Market(String),
}

impl OrderPrice {
    pub fn value(&self) -> Option<Decimal> {
        match self {
            OrderPrice::Value(price) => Some(*price),
            OrderPrice::Market(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub order_id: String,
    pub instrument_name: String,
    pub direction: Direction,
    pub amount: Decimal,
    pub filled_amount: Decimal,
    pub order_state: OrderState,
    pub order_type: OrderType,
    pub creation_timestamp: i64,
    pub last_update_timestamp: i64,
    #[serde(default)]
    pub price: Option<OrderPrice>,
    #[serde(default)]
    pub average_price: Option<Decimal>,
    #[serde(default)]
    pub time_in_force: Option<TimeInForce>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub post_only: bool,
    #[serde(default)]
    pub reduce_only: bool,
}

impl Order {
    pub fn created(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.creation_timestamp)
    }

    pub fn last_updated(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.last_update_timestamp)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trade {
    pub trade_id: String,
    pub instrument_name: String,
    pub order_id: String,
    pub direction: Direction,
    pub price: Decimal,
    pub amount: Decimal,
    pub timestamp: i64,
    #[serde(default)]
    pub trade_seq: Option<i64>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub fee_currency: Option<String>,
    #[serde(default)]
    pub index_price: Option<Decimal>,
    #[serde(default)]
    pub mark_price: Option<Decimal>,
}

impl Trade {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.timestamp)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::decode_record;
    use crate::http::DeribitError;
    use chrono::{Datelike, Timelike};
    use serde_json::json;

    #[test]
    fn empty_order_book_decodes_with_utc_timestamp() {
        let value = json!({"timestamp": 1744208208919i64, "state": "open", "bids": [], "asks": []});
        let book: OrderBook = decode_record("OrderBook", value).expect("order book");

        assert!(book.bids.is_empty());
        assert!(book.asks.is_empty());
        assert_eq!(book.timestamp, 1_744_208_208_919);

        let at = book.datetime().expect("in range");
        assert_eq!(at.timestamp_millis(), 1_744_208_208_919);
        assert_eq!((at.year(), at.month(), at.day()), (2025, 4, 9));
        assert_eq!((at.hour(), at.minute(), at.second()), (14, 16, 48));
        assert_eq!(book.spread(), None);
    }

    #[test]
    fn order_book_ladders_and_extra_fields() {
        let value = json!({
            "timestamp": 1744208208919i64,
            "state": "open",
            "bids": [[50000, 1.0], [49900, 2.0]],
            "asks": [[50100, 1.5], [50200, 3.0]],
            "best_bid_price": 50000,
            "best_ask_price": 50100,
            "last_price": null,
            "stats": {"high": 51000, "low": 49000, "price_change": null, "volume": 12.5},
            "some_future_field": {"nested": true}
        });
        let book: OrderBook = decode_record("OrderBook", value).expect("order book");

        assert_eq!(book.bids.len(), 2);
        assert_eq!(book.asks[1].price(), Decimal::from(50200));
        assert_eq!(book.asks[1].amount(), Decimal::from(3));
        assert_eq!(book.best_bid_price, Some(Decimal::from(50000)));
        assert_eq!(book.last_price, None);
        assert_eq!(book.spread(), Some(Decimal::from(100)));
        assert_eq!(book.stats.and_then(|stats| stats.price_change), None);
    }

    #[test]
    fn missing_required_field_names_it() {
        let value = json!({"state": "open", "bids": [], "asks": []});
        let err = decode_record::<OrderBook>("OrderBook", value).unwrap_err();
        match err {
            DeribitError::SchemaMismatch { record, message } => {
                assert_eq!(record, "OrderBook");
                assert!(message.contains("timestamp"), "message was {message}");
            }
            other => panic!("expected SchemaMismatch, got {other:?}"),
        }
    }

    #[test]
    fn ticker_with_greeks() {
        let value = json!({
            "instrument_name": "BTC-10APR25-80000-C",
            "timestamp": 1744208208919i64,
            "state": "open",
            "mark_price": 0.0123,
            "index_price": 81234.5,
            "best_bid_price": 0.012,
            "best_ask_price": 0.0125,
            "mark_iv": 52.1,
            "greeks": {"delta": 0.51, "gamma": 0.0001, "rho": 1.2, "theta": -120.5, "vega": 20.3}
        });
        let ticker: Ticker = decode_record("Ticker", value).expect("ticker");

        assert_eq!(ticker.mark_price, "0.0123".parse::<Decimal>().unwrap());
        let greeks = ticker.greeks.expect("greeks");
        assert_eq!(greeks.theta, "-120.5".parse::<Decimal>().unwrap());
    }

    #[test]
    fn market_order_price_is_not_numeric() {
        let value = json!({
            "order_id": "ETH-584849853",
            "instrument_name": "ETH-PERPETUAL",
            "direction": "sell",
            "amount": 40,
            "filled_amount": 40,
            "order_state": "filled",
            "order_type": "market",
            "creation_timestamp": 1590486335742i64,
            "last_update_timestamp": 1590486335742i64,
            "price": "market_price",
            "average_price": 203.3
        });
        let order: Order = decode_record("Order", value).expect("order");
        assert_eq!(order.price, Some(OrderPrice::Market("market_price".to_string())));
        assert_eq!(order.price.and_then(|price| price.value()), None);
        assert!(!order.post_only);
    }
}
