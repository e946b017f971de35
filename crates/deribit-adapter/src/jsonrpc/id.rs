/*
[INPUT]:  Id strategy selected in client configuration
[OUTPUT]: Correlation identifiers unique per client instance
[POS]:    JSON-RPC layer - request id allocation
[UPDATE]: When adding id strategies or changing id wire format
*/

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use uuid::Uuid;

/// JSON-RPC correlation id (number or string on the wire)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RequestId {
    Number(u64),
    String(String),
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestId::Number(n) => write!(f, "{n}"),
            RequestId::String(s) => f.write_str(s),
        }
    }
}

impl From<u64> for RequestId {
    fn from(value: u64) -> Self {
        RequestId::Number(value)
    }
}

impl From<&str> for RequestId {
    fn from(value: &str) -> Self {
        RequestId::String(value.to_string())
    }
}

impl From<String> for RequestId {
    fn from(value: String) -> Self {
        RequestId::String(value)
    }
}

/// How a client allocates request ids
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdStrategy {
    /// Monotonic counter starting at 1
    #[default]
    Counter,
    /// Random UUID v4 rendered as a string
    Uuid,
}

/// Allocates ids for one client. Never reset, so ids stay unique across reconnects.
#[derive(Debug)]
pub struct RequestIdGenerator {
    strategy: IdStrategy,
    next: AtomicU64,
}

impl RequestIdGenerator {
    pub fn new(strategy: IdStrategy) -> Self {
        Self {
            strategy,
            next: AtomicU64::new(1),
        }
    }

    pub fn strategy(&self) -> IdStrategy {
        self.strategy
    }

    pub fn next_id(&self) -> RequestId {
        match self.strategy {
            IdStrategy::Counter => RequestId::Number(self.next.fetch_add(1, Ordering::Relaxed)),
            IdStrategy::Uuid => RequestId::String(Uuid::new_v4().to_string()),
        }
    }
}

impl Default for RequestIdGenerator {
    fn default() -> Self {
        Self::new(IdStrategy::default())
    }
}
