/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public Deribit adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod api;
pub mod config;
pub mod http;
pub mod jsonrpc;
pub mod types;
pub mod ws;

mod logging;

pub use api::{MarketDataApi, TradingApi};

pub use config::{ClientConfig, Credentials};

// Re-export commonly used types from http
pub use http::{DeribitClient, DeribitError, Result, RpcErrorKind};

pub use jsonrpc::{
    IdStrategy,
    JsonRpcRequest,
    JsonRpcResponse,
    JsonRpcTransport,
    RequestId,
    RpcErrorObject,
    RpcPayload,
    ServerTiming,
};

// Re-export all types
pub use types::*;

pub use ws::{Correlation, DeribitWebSocket, InboundFrame, Notification, PendingCalls};
