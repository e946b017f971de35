/*
[INPUT]:  Client configuration, credentials, JSON-RPC requests
[OUTPUT]: Correlated JSON-RPC results over one-shot HTTP POSTs
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Client, Url};
use serde_json::Value;
use tracing::debug;

use crate::config::{ClientConfig, Credentials};
use crate::http::{DeribitError, Result};
use crate::jsonrpc::{JsonRpcRequest, JsonRpcResponse, JsonRpcTransport, RequestId, RequestIdGenerator};
use crate::logging::{RAW_LOG_MAX_BYTES, truncate_for_log};

/// HTTP JSON-RPC client for the Deribit API.
///
/// Holds no per-call state: each call is an independent POST/response round trip.
#[derive(Debug)]
pub struct DeribitClient {
    http_client: Client,
    base_url: Url,
    config: ClientConfig,
    credentials: Option<Credentials>,
    ids: RequestIdGenerator,
}

impl DeribitClient {
    /// Create a client for testnet or mainnet with default configuration
    pub fn new(testnet: bool) -> Result<Self> {
        let config = if testnet {
            ClientConfig::testnet()
        } else {
            ClientConfig::mainnet()
        };
        Self::with_config(config)
    }

    /// Create a new client with custom configuration
    pub fn with_config(config: ClientConfig) -> Result<Self> {
        let base_url = config.http_url();
        Self::with_config_and_base_url(config, base_url)
    }

    /// Create a client against an explicit JSON-RPC base URL
    pub fn with_config_and_base_url(config: ClientConfig, base_url: &str) -> Result<Self> {
        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;

        let mut base_url = Url::parse(base_url)?;
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self {
            http_client,
            base_url,
            ids: RequestIdGenerator::new(config.id_strategy),
            config,
            credentials: None,
        })
    }

    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = Some(credentials);
        self
    }

    /// Set credentials for authenticated requests
    pub fn set_credentials(&mut self, credentials: Credentials) {
        self.credentials = Some(credentials);
    }

    /// Get credentials if set
    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Build full URL for a JSON-RPC method (`{base}/{method}`)
    fn method_url(&self, method: &str) -> Result<Url> {
        Ok(self.base_url.join(method)?)
    }

    async fn post_request(&self, request: &JsonRpcRequest) -> Result<JsonRpcResponse> {
        let url = self.method_url(request.method())?;
        let body = request.to_json()?;
        debug!(method = request.method(), id = %request.id(), "http rpc request");

        let mut builder = self
            .http_client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body);
        if let Some(credentials) = &self.credentials {
            builder = builder.basic_auth(&credentials.client_id, Some(&credentials.client_secret));
        }

        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await?;
        debug!(
            method = request.method(),
            id = %request.id(),
            status = status.as_u16(),
            bytes = text.len(),
            "http rpc response"
        );

        if !status.is_success() {
            // Deribit reports RPC failures with a 4xx status and a JSON-RPC error body
            if let Ok(envelope) = JsonRpcResponse::from_json(&text)
                && envelope.is_error()
            {
                return Ok(envelope);
            }
            return Err(DeribitError::http_status(
                status,
                truncate_for_log(&text, RAW_LOG_MAX_BYTES),
            ));
        }

        JsonRpcResponse::from_json(&text)
    }
}

/// Check that a one-shot response answers the request that produced it
fn correlate(expected: &RequestId, response: JsonRpcResponse) -> Result<Value> {
    match &response.id {
        Some(id) if id != expected => Err(DeribitError::InvalidResponse(format!(
            "response id {id} does not match request id {expected}"
        ))),
        None if !response.is_error() => Err(DeribitError::InvalidResponse(
            "success response without id".to_string(),
        )),
        _ => response.into_result(),
    }
}

#[async_trait]
impl JsonRpcTransport for DeribitClient {
    fn next_request_id(&self) -> RequestId {
        self.ids.next_id()
    }

    fn has_credentials(&self) -> bool {
        self.credentials.is_some()
    }

    async fn send_request(&self, request: JsonRpcRequest) -> Result<Value> {
        let response = self.post_request(&request).await?;
        correlate(request.id(), response)
    }
}
