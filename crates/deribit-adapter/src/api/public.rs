/*
[INPUT]:  Instrument names, currencies and time ranges
[OUTPUT]: Market data (ticker, order book, instruments, book summaries, contract size, funding history, server time)
[POS]:    API layer - public market data methods (no auth required)
[UPDATE]: When adding new public endpoints or changing response format
*/

use async_trait::async_trait;

use crate::http::{DeribitError, Result};
use crate::jsonrpc::JsonRpcTransport;
use crate::types::{
    BookSummary, BookSummaryParams, ContractSize, FundingRateEntry, FundingRateHistoryParams, Instrument,
    InstrumentKind, InstrumentParams, InstrumentsParams, OrderBook, OrderBookParams, Ticker,
    decode_record,
};

pub const DEFAULT_BOOK_DEPTH: u32 = 10;

/// Public market data methods, available on every transport
#[async_trait]
pub trait MarketDataApi {
    /// `public/ticker`
    async fn get_ticker(&self, instrument_name: &str) -> Result<Ticker>;

    /// `public/get_order_book`, depth defaults to 10
    async fn get_order_book(&self, instrument_name: &str, depth: Option<u32>) -> Result<OrderBook>;

    /// `public/get_instruments`
    async fn get_instruments(
        &self,
        currency: &str,
        kind: Option<InstrumentKind>,
        expired: bool,
    ) -> Result<Vec<Instrument>>;

    /// `public/get_book_summary_by_currency`
    async fn get_book_summary_by_currency(
        &self,
        currency: &str,
        kind: Option<InstrumentKind>,
    ) -> Result<Vec<BookSummary>>;

    /// `public/get_book_summary_by_instrument`
    async fn get_book_summary_by_instrument(&self, instrument_name: &str) -> Result<Vec<BookSummary>>;

    /// `public/get_contract_size`
    async fn get_contract_size(&self, instrument_name: &str) -> Result<ContractSize>;

    /// `public/get_funding_rate_history` over `[start_ms, end_ms]`
    async fn get_funding_rate_history(
        &self,
        instrument_name: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<FundingRateEntry>>;

    /// `public/get_time`, server clock in milliseconds
    async fn get_time(&self) -> Result<i64>;
}

#[async_trait]
impl<T: JsonRpcTransport> MarketDataApi for T {
    async fn get_ticker(&self, instrument_name: &str) -> Result<Ticker> {
        let value = self
            .call_typed("public/ticker", InstrumentParams { instrument_name })
            .await?;
        decode_record("Ticker", value)
    }

    async fn get_order_book(&self, instrument_name: &str, depth: Option<u32>) -> Result<OrderBook> {
        let params = OrderBookParams {
            instrument_name,
            depth: Some(depth.unwrap_or(DEFAULT_BOOK_DEPTH)),
        };
        let value = self.call_typed("public/get_order_book", params).await?;
        decode_record("OrderBook", value)
    }

    async fn get_instruments(
        &self,
        currency: &str,
        kind: Option<InstrumentKind>,
        expired: bool,
    ) -> Result<Vec<Instrument>> {
        let params = InstrumentsParams {
            currency,
            kind,
            expired,
        };
        let value = self.call_typed("public/get_instruments", params).await?;
        decode_record("Instrument", value)
    }

    async fn get_book_summary_by_currency(
        &self,
        currency: &str,
        kind: Option<InstrumentKind>,
    ) -> Result<Vec<BookSummary>> {
        let value = self
            .call_typed(
                "public/get_book_summary_by_currency",
                BookSummaryParams { currency, kind },
            )
            .await?;
        decode_record("BookSummary", value)
    }

    async fn get_book_summary_by_instrument(&self, instrument_name: &str) -> Result<Vec<BookSummary>> {
        let value = self
            .call_typed(
                "public/get_book_summary_by_instrument",
                InstrumentParams { instrument_name },
            )
            .await?;
        decode_record("BookSummary", value)
    }

    async fn get_contract_size(&self, instrument_name: &str) -> Result<ContractSize> {
        let value = self
            .call_typed("public/get_contract_size", InstrumentParams { instrument_name })
            .await?;
        decode_record("ContractSize", value)
    }

    async fn get_funding_rate_history(
        &self,
        instrument_name: &str,
        start_ms: i64,
        end_ms: i64,
    ) -> Result<Vec<FundingRateEntry>> {
        if start_ms > end_ms {
            return Err(DeribitError::InvalidArgument(format!(
                "start timestamp {start_ms} is after end timestamp {end_ms}"
            )));
        }
        let params = FundingRateHistoryParams {
            instrument_name,
            start_timestamp: start_ms,
            end_timestamp: end_ms,
        };
        let value = self
            .call_typed("public/get_funding_rate_history", params)
            .await?;
        decode_record("FundingRateEntry", value)
    }

    async fn get_time(&self) -> Result<i64> {
        let value = self.call("public/get_time", serde_json::Map::new()).await?;
        decode_record("ServerTime", value)
    }
}
