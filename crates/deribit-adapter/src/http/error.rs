/*
[INPUT]:  Error sources (HTTP, JSON-RPC envelopes, WebSocket, record decoding)
[OUTPUT]: Structured error types with context and retry hints
[POS]:    Error handling layer - unified error types for entire crate
[UPDATE]: When adding new error sources or improving error messages
*/

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

/// Main error type for the Deribit adapter
#[derive(Error, Debug)]
pub enum DeribitError {
    /// Caller input rejected before any network activity
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// HTTP transport failed (DNS, refused connection, TLS, reset)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server answered with a non-success HTTP status
    #[error("HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    /// Server returned a JSON-RPC error envelope
    #[error("RPC error (code {code}): {message}")]
    Rpc {
        code: i64,
        message: String,
        data: Option<Value>,
    },

    /// Payload is not valid JSON
    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload is JSON but not a usable JSON-RPC envelope
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Successful result did not match the expected record shape
    #[error("Schema mismatch decoding {record}: {message}")]
    SchemaMismatch {
        record: &'static str,
        message: String,
    },

    /// WebSocket transport failed
    #[error("WebSocket error: {0}")]
    WebSocket(String),

    /// WebSocket dropped while the call was pending
    #[error("WebSocket connection closed")]
    ConnectionClosed,

    /// No WebSocket connection is open
    #[error("WebSocket not connected")]
    NotConnected,

    /// Call did not complete within the configured request timeout
    #[error("Request {method} timed out after {after_ms}ms")]
    Timeout { method: String, after_ms: u64 },

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    UrlParse(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Classification of server-assigned JSON-RPC error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcErrorKind {
    InvalidRequest,
    MethodNotFound,
    InvalidParams,
    Internal,
    Authentication,
    Authorization,
    NotFound,
    InvalidSession,
    Unsupported,
    RequestLimit,
    ServiceUnavailable,
    NotEnoughFunds,
    TooManyRequests,
    InvalidCredentials,
    Unauthorized,
    Other,
}

impl RpcErrorKind {
    /// Map a server error code to its kind
    pub fn from_code(code: i64) -> Self {
        match code {
            -32600 => RpcErrorKind::InvalidRequest,
            -32601 => RpcErrorKind::MethodNotFound,
            -32602 => RpcErrorKind::InvalidParams,
            -32603 => RpcErrorKind::Internal,
            -32000 => RpcErrorKind::Authentication,
            -32001 => RpcErrorKind::Authorization,
            -32002 => RpcErrorKind::NotFound,
            -32003 => RpcErrorKind::InvalidSession,
            -32004 => RpcErrorKind::Unsupported,
            -32005 => RpcErrorKind::RequestLimit,
            -32099 => RpcErrorKind::ServiceUnavailable,
            10009 => RpcErrorKind::NotEnoughFunds,
            10028 => RpcErrorKind::TooManyRequests,
            13004 => RpcErrorKind::InvalidCredentials,
            13009 => RpcErrorKind::Unauthorized,
            _ => RpcErrorKind::Other,
        }
    }
}

impl DeribitError {
    /// Check if the error is retryable. Advisory only: nothing in this crate retries.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeribitError::Http(_)
            | DeribitError::WebSocket(_)
            | DeribitError::ConnectionClosed
            | DeribitError::Timeout { .. } => true,
            DeribitError::HttpStatus { status, .. } => *status == 429 || *status >= 500,
            DeribitError::Rpc { code, .. } => matches!(
                RpcErrorKind::from_code(*code),
                RpcErrorKind::TooManyRequests
                    | RpcErrorKind::RequestLimit
                    | RpcErrorKind::ServiceUnavailable
            ),
            _ => false,
        }
    }

    /// Check if error indicates authentication failure
    pub fn is_auth_error(&self) -> bool {
        match self {
            DeribitError::HttpStatus { status, .. } => *status == 401,
            DeribitError::Rpc { code, .. } => matches!(
                RpcErrorKind::from_code(*code),
                RpcErrorKind::Authentication
                    | RpcErrorKind::Authorization
                    | RpcErrorKind::InvalidSession
                    | RpcErrorKind::InvalidCredentials
                    | RpcErrorKind::Unauthorized
            ),
            _ => false,
        }
    }

    /// Connection-level failure on either transport
    pub fn is_transport(&self) -> bool {
        matches!(self, DeribitError::Http(_) | DeribitError::WebSocket(_))
    }

    /// Payload could not be read as a JSON-RPC envelope
    pub fn is_decode(&self) -> bool {
        matches!(
            self,
            DeribitError::Decode(_) | DeribitError::InvalidResponse(_)
        )
    }

    /// Kind of a server-assigned RPC error, if this is one
    pub fn rpc_kind(&self) -> Option<RpcErrorKind> {
        match self {
            DeribitError::Rpc { code, .. } => Some(RpcErrorKind::from_code(*code)),
            _ => None,
        }
    }

    /// Create an HTTP status error from status code and response body
    pub fn http_status(status: StatusCode, body: impl Into<String>) -> Self {
        DeribitError::HttpStatus {
            status: status.as_u16(),
            body: body.into(),
        }
    }
}

/// Result type alias for Deribit operations
pub type Result<T> = std::result::Result<T, DeribitError>;
