/*
[INPUT]:  Environment flag, timeouts, id strategy, API credentials
[OUTPUT]: Client configuration shared by the HTTP and WebSocket clients
[POS]:    Configuration layer - endpoint selection and client tuning
[UPDATE]: When adding connection options or changing default endpoints
*/

use std::fmt;
use std::time::Duration;

use crate::jsonrpc::IdStrategy;

pub const TESTNET_HTTP_URL: &str = "https://test.deribit.com/api/v2/";
pub const MAINNET_HTTP_URL: &str = "https://www.deribit.com/api/v2/";
pub const TESTNET_WS_URL: &str = "wss://test.deribit.com/ws/api/v2";
pub const MAINNET_WS_URL: &str = "wss://www.deribit.com/ws/api/v2";

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Use the testnet endpoints instead of mainnet
    pub testnet: bool,
    /// Whole-request HTTP timeout
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// How long a WebSocket call waits for its response
    pub request_timeout: Duration,
    pub id_strategy: IdStrategy,
    /// Buffered server notifications before new ones are dropped
    pub notification_capacity: usize,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            testnet: true,
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            id_strategy: IdStrategy::Counter,
            notification_capacity: 1024,
        }
    }
}

impl ClientConfig {
    pub fn testnet() -> Self {
        Self::default()
    }

    pub fn mainnet() -> Self {
        Self {
            testnet: false,
            ..Self::default()
        }
    }

    pub fn http_url(&self) -> &'static str {
        if self.testnet {
            TESTNET_HTTP_URL
        } else {
            MAINNET_HTTP_URL
        }
    }

    pub fn ws_url(&self) -> &'static str {
        if self.testnet {
            TESTNET_WS_URL
        } else {
            MAINNET_WS_URL
        }
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_id_strategy(mut self, strategy: IdStrategy) -> Self {
        self.id_strategy = strategy;
        self
    }

    pub fn with_notification_capacity(mut self, capacity: usize) -> Self {
        self.notification_capacity = capacity;
        self
    }
}

/// API key pair used by the authentication collaborator
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}
