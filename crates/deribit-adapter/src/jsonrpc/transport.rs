/*
[INPUT]:  JSON-RPC requests built by endpoint wrappers
[OUTPUT]: Transport-agnostic call results (success value or typed error)
[POS]:    JSON-RPC layer - seam implemented by the HTTP and WebSocket clients
[UPDATE]: When adding transports or changing the call contract
*/

use async_trait::async_trait;
use serde::Serialize;
use serde_json::{Map, Value};

use super::id::RequestId;
use super::request::JsonRpcRequest;
use crate::http::Result;

/// A JSON-RPC dispatcher: one request in, one correlated outcome out.
///
/// Implementations never retry; a failed call is reported once to its caller.
#[async_trait]
pub trait JsonRpcTransport: Send + Sync {
    /// Allocate a correlation id unique among this client's outstanding requests
    fn next_request_id(&self) -> RequestId;

    /// Whether API credentials were supplied at construction
    fn has_credentials(&self) -> bool;

    /// Dispatch an already-built request and wait for its outcome
    async fn send_request(&self, request: JsonRpcRequest) -> Result<Value>;

    /// Build and dispatch a request from a method name and params object
    async fn call(&self, method: &str, params: Map<String, Value>) -> Result<Value> {
        let request = JsonRpcRequest::new(self.next_request_id(), method, params)?;
        self.send_request(request).await
    }

    /// Build and dispatch a request from a typed params struct
    async fn call_typed<P>(&self, method: &str, params: P) -> Result<Value>
    where
        P: Serialize + Send,
        Self: Sized,
    {
        let request = JsonRpcRequest::from_serializable(self.next_request_id(), method, params)?;
        self.send_request(request).await
    }
}
