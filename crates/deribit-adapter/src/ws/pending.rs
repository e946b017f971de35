/*
[INPUT]:  Outstanding request ids and inbound JSON-RPC responses
[OUTPUT]: Per-call completion slots resolved exactly once
[POS]:    WebSocket layer - response correlation table
[UPDATE]: When changing correlation or connection-loss semantics
*/

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::Mutex;
use serde_json::Value;
use tokio::sync::oneshot;
use tracing::{debug, warn};

use crate::http::{DeribitError, Result};
use crate::jsonrpc::{JsonRpcResponse, RequestId};

type Slot = oneshot::Sender<Result<Value>>;

/// Outcome of routing one inbound response
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Correlation {
    /// The waiting caller received the outcome
    Delivered(RequestId),
    /// No caller is waiting for this id (late, duplicate or unknown)
    Orphan(Option<RequestId>),
}

/// Table of calls awaiting a response on a persistent connection.
///
/// Every entry leaves the table exactly once: resolved by a response,
/// failed by the connection task, or removed by its caller.
#[derive(Debug, Default)]
pub struct PendingCalls {
    slots: Mutex<HashMap<RequestId, Slot>>,
}

impl PendingCalls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `id` and return the receiver its outcome will arrive on
    pub fn insert(&self, id: RequestId) -> Result<oneshot::Receiver<Result<Value>>> {
        let mut slots = self.slots.lock();
        if slots.contains_key(&id) {
            return Err(DeribitError::InvalidArgument(format!(
                "request id {id} is already outstanding"
            )));
        }
        let (tx, rx) = oneshot::channel();
        slots.insert(id, tx);
        Ok(rx)
    }

    /// Route a response to the caller registered under its id
    pub fn resolve(&self, response: JsonRpcResponse) -> Correlation {
        let Some(id) = response.id.clone() else {
            warn!(is_error = response.is_error(), "ws response without id dropped");
            return Correlation::Orphan(None);
        };

        let Some(slot) = self.slots.lock().remove(&id) else {
            warn!(id = %id, "ws response for unknown request id dropped");
            return Correlation::Orphan(Some(id));
        };

        if slot.send(response.into_result()).is_err() {
            debug!(id = %id, "ws caller stopped waiting before response arrived");
            return Correlation::Orphan(Some(id));
        }
        Correlation::Delivered(id)
    }

    /// Complete one call with an error; returns whether it was outstanding
    pub fn fail(&self, id: &RequestId, error: DeribitError) -> bool {
        match self.slots.lock().remove(id) {
            Some(slot) => {
                let _ = slot.send(Err(error));
                true
            }
            None => false,
        }
    }

    /// Forget a call without completing it
    pub fn remove(&self, id: &RequestId) -> bool {
        self.slots.lock().remove(id).is_some()
    }

    /// Fail every outstanding call with `ConnectionClosed`, returning how many there were
    pub fn fail_all(&self) -> usize {
        let drained: Vec<(RequestId, Slot)> = self.slots.lock().drain().collect();
        let count = drained.len();
        for (_, slot) in drained {
            let _ = slot.send(Err(DeribitError::ConnectionClosed));
        }
        count
    }

    pub fn contains(&self, id: &RequestId) -> bool {
        self.slots.lock().contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.slots.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.lock().is_empty()
    }
}

/// Removes its entry when the waiting caller gives up (timeout or cancellation)
pub(crate) struct PendingGuard {
    calls: Arc<PendingCalls>,
    id: RequestId,
}

impl PendingGuard {
    pub(crate) fn new(calls: Arc<PendingCalls>, id: RequestId) -> Self {
        Self { calls, id }
    }
}

impl Drop for PendingGuard {
    fn drop(&mut self) {
        self.calls.remove(&self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(value: Value) -> JsonRpcResponse {
        JsonRpcResponse::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn resolve_delivers_to_matching_caller() {
        let calls = PendingCalls::new();
        let rx = calls.insert(RequestId::Number(7)).unwrap();

        let outcome = calls.resolve(response(json!({"jsonrpc": "2.0", "id": 7, "result": {"ok": true}})));
        assert_eq!(outcome, Correlation::Delivered(RequestId::Number(7)));
        assert!(calls.is_empty());
        assert_eq!(rx.await.unwrap().unwrap(), json!({"ok": true}));
    }

    #[tokio::test]
    async fn error_response_reaches_caller_as_rpc_error() {
        let calls = PendingCalls::new();
        let rx = calls.insert(RequestId::Number(3)).unwrap();
        calls.resolve(response(json!({
            "jsonrpc": "2.0",
            "id": 3,
            "error": {"code": 10009, "message": "not_enough_funds"}
        })));

        let err = rx.await.unwrap().unwrap_err();
        assert!(matches!(err, DeribitError::Rpc { code: 10009, .. }));
    }

    #[test]
    fn unknown_and_duplicate_responses_are_orphans() {
        let calls = PendingCalls::new();
        let _rx = calls.insert(RequestId::Number(1)).unwrap();

        let stray = calls.resolve(response(json!({"jsonrpc": "2.0", "id": 99, "result": 1})));
        assert_eq!(stray, Correlation::Orphan(Some(RequestId::Number(99))));
        assert_eq!(calls.len(), 1);

        let first = calls.resolve(response(json!({"jsonrpc": "2.0", "id": 1, "result": 1})));
        assert_eq!(first, Correlation::Delivered(RequestId::Number(1)));
        let second = calls.resolve(response(json!({"jsonrpc": "2.0", "id": 1, "result": 2})));
        assert_eq!(second, Correlation::Orphan(Some(RequestId::Number(1))));
    }

    #[test]
    fn duplicate_insert_is_rejected() {
        let calls = PendingCalls::new();
        let _rx = calls.insert(RequestId::from("abc")).unwrap();
        assert!(matches!(
            calls.insert(RequestId::from("abc")),
            Err(DeribitError::InvalidArgument(_))
        ));
    }

    #[tokio::test]
    async fn fail_all_closes_every_outstanding_call() {
        let calls = PendingCalls::new();
        let a = calls.insert(RequestId::Number(1)).unwrap();
        let b = calls.insert(RequestId::Number(2)).unwrap();

        assert_eq!(calls.fail_all(), 2);
        assert!(calls.is_empty());
        assert!(matches!(a.await.unwrap(), Err(DeribitError::ConnectionClosed)));
        assert!(matches!(b.await.unwrap(), Err(DeribitError::ConnectionClosed)));
        assert_eq!(calls.fail_all(), 0);
    }

    #[test]
    fn guard_removes_entry_on_drop() {
        let calls = Arc::new(PendingCalls::new());
        let _rx = calls.insert(RequestId::Number(5)).unwrap();
        {
            let _guard = PendingGuard::new(calls.clone(), RequestId::Number(5));
            assert!(calls.contains(&RequestId::Number(5)));
        }
        assert!(!calls.contains(&RequestId::Number(5)));
    }
}
