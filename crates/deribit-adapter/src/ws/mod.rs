/*
[INPUT]:  WebSocket configuration, JSON-RPC requests, subscription channels
[OUTPUT]: Correlated JSON-RPC results and server notifications
[POS]:    WebSocket layer - persistent multiplexed transport
[UPDATE]: When adding frame types or changing connection logic
*/

pub mod client;
pub mod message;
pub mod pending;

pub use client::DeribitWebSocket;
pub use message::{InboundFrame, Notification};
pub use pending::{Correlation, PendingCalls};
