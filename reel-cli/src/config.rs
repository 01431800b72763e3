//! Configuration module
//!
//! Handles CLI configuration and turns it into a client configuration.

use anyhow::{Context, Result, bail};
use reel_client::{ClientConfig, SieveClient};

/// CLI configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// API key for the job API
    pub api_key: Option<String>,
    /// Base URL of the job API
    pub api_url: String,
    /// Attempts per idempotent request
    pub max_retries: u32,
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        let mut config = ClientConfig::without_key().with_base_url(self.api_url.clone());
        config.api_key = self.api_key.clone();
        config.retry.max_attempts = self.max_retries;
        config
    }

    /// Build a client for commands that talk to the job API
    pub fn api_client(&self) -> Result<SieveClient> {
        if self.api_key.is_none() {
            bail!("missing API key: pass --api-key or set SIEVE_API_KEY");
        }

        self.build_client()
    }

    /// Build a client for plain downloads, which need no API key
    pub fn download_client(&self) -> Result<SieveClient> {
        self.build_client()
    }

    fn build_client(&self) -> Result<SieveClient> {
        SieveClient::new(self.client_config()).context("Failed to initialize job API client")
    }
}
