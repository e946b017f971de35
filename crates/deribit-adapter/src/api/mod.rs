/*
[INPUT]:  Any JsonRpcTransport (HTTP or WebSocket client)
[OUTPUT]: Typed Deribit endpoint wrappers shared by both transports
[POS]:    API layer - method names, params and result decoding
[UPDATE]: When adding new endpoints
*/

pub mod public;
pub mod trading;

pub use public::{DEFAULT_BOOK_DEPTH, MarketDataApi};
pub use trading::TradingApi;
