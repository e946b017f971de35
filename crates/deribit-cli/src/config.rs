/*
[INPUT]:  YAML configuration file, DERIBIT_CLIENT_ID / DERIBIT_CLIENT_SECRET environment
[OUTPUT]: Parsed CLI configuration and derived client settings
[POS]:    Configuration layer - client setup
[UPDATE]: When adding new configuration options
*/

use std::time::Duration;

use deribit_adapter::{ClientConfig, Credentials, IdStrategy};
use serde::{Deserialize, Serialize};

pub const ENV_CLIENT_ID: &str = "DERIBIT_CLIENT_ID";
pub const ENV_CLIENT_SECRET: &str = "DERIBIT_CLIENT_SECRET";

/// Top-level configuration for the command line client
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CliConfig {
    /// Use testnet endpoints
    #[serde(default = "default_testnet")]
    pub testnet: bool,
    /// Whole-request HTTP timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// WebSocket per-call timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default)]
    pub id_strategy: IdStrategy,
    /// API key pair for private methods
    #[serde(default)]
    pub credentials: Option<CredentialsConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsConfig {
    pub client_id: String,
    pub client_secret: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            testnet: default_testnet(),
            timeout_secs: default_timeout_secs(),
            request_timeout_secs: default_timeout_secs(),
            id_strategy: IdStrategy::default(),
            credentials: None,
        }
    }
}

fn default_testnet() -> bool {
    true
}

fn default_timeout_secs() -> u64 {
    30
}

impl CliConfig {
    /// Load configuration from YAML file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> anyhow::Result<Self> {
        let config: Self = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Replace file credentials with environment ones when both variables are set
    pub fn with_env_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let (Some(client_id), Some(client_secret)) = (lookup(ENV_CLIENT_ID), lookup(ENV_CLIENT_SECRET)) {
            self.credentials = Some(CredentialsConfig {
                client_id,
                client_secret,
            });
        }
        self
    }

    pub fn client_config(&self) -> ClientConfig {
        let base = if self.testnet {
            ClientConfig::testnet()
        } else {
            ClientConfig::mainnet()
        };
        ClientConfig {
            timeout: Duration::from_secs(self.timeout_secs),
            ..base
        }
        .with_request_timeout(Duration::from_secs(self.request_timeout_secs))
        .with_id_strategy(self.id_strategy)
    }

    pub fn credentials(&self) -> Option<Credentials> {
        self.credentials
            .as_ref()
            .map(|c| Credentials::new(c.client_id.clone(), c.client_secret.clone()))
    }
}
