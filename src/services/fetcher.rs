//! Ranking page fetcher.
//!
//! One best-effort GET per call; retries are left to the next poll cycle.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::Result;
use crate::models::Config;
use crate::utils::http::{create_async_client, fetch_text};

/// Source of the raw ranking page markup.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch the current markup of the ranking page.
    async fn fetch(&self) -> Result<String>;
}

/// Fetches the ranking page over HTTP.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    url: String,
}

impl HttpFetcher {
    /// Create a fetcher for `url` using an existing client.
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    /// Create a fetcher from the application configuration.
    pub fn from_config(config: &Config) -> Result<Self> {
        let client = create_async_client(&config.http)?;
        Ok(Self::new(client, &config.source.url))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self) -> Result<String> {
        log::debug!("Fetching ranking page: {}", self.url);
        let body = fetch_text(&self.client, &self.url).await?;
        log::debug!("Fetched {} bytes", body.len());
        Ok(body)
    }
}
