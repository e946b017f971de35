/*
[INPUT]:  HTTP client configuration and JSON-RPC requests
[OUTPUT]: Correlated JSON-RPC results and the crate error type
[POS]:    HTTP layer - one-shot JSON-RPC transport
[UPDATE]: When adding connection options or changing error mapping
*/

pub mod client;
pub mod error;

pub use client::DeribitClient;
pub use error::{DeribitError, Result, RpcErrorKind};
