/*
[INPUT]:  Method names, parameters, raw response payloads
[OUTPUT]: JSON-RPC 2.0 envelopes shared by the HTTP and WebSocket transports
[POS]:    JSON-RPC layer - message model and transport seam
[UPDATE]: When changing envelope format or the transport trait
*/

pub mod id;
pub mod request;
pub mod response;
pub mod transport;

pub use id::{IdStrategy, RequestId, RequestIdGenerator};
pub use request::{JSONRPC_VERSION, JsonRpcRequest};
pub use response::{JsonRpcResponse, RpcErrorObject, RpcPayload, ServerTiming};
pub use transport::JsonRpcTransport;
