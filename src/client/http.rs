//! HTTP page source
//!
//! Calls one of the pagination endpoints and decodes the `{books,
//! nextPageToken}` body. There is no retry layer: a failed request is
//! returned to the caller as is.

use super::source::PageSource;
use crate::error::{Error, Result};
use crate::fetcher::BoundaryStrategy;
use crate::types::{BooksResponse, Page};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Configuration for the HTTP page source
#[derive(Debug, Clone)]
pub struct HttpSourceConfig {
    /// Server base URL, e.g. `http://localhost:8080`
    pub base_url: String,
    /// Which endpoint to call
    pub strategy: BoundaryStrategy,
    /// Page size to request; the server default applies when `None`
    pub limit: Option<u32>,
    /// Request timeout
    pub timeout: Duration,
    /// User agent string
    pub user_agent: String,
}

impl Default for HttpSourceConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
            strategy: BoundaryStrategy::default(),
            limit: None,
            timeout: Duration::from_secs(30),
            user_agent: format!("cursor-pagination/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

impl HttpSourceConfig {
    /// Create a new config builder
    pub fn builder() -> HttpSourceConfigBuilder {
        HttpSourceConfigBuilder::default()
    }
}

/// Builder for HTTP source config
#[derive(Default)]
pub struct HttpSourceConfigBuilder {
    config: HttpSourceConfig,
}

impl HttpSourceConfigBuilder {
    /// Set the base URL
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = url.into();
        self
    }

    /// Set the endpoint strategy
    pub fn strategy(mut self, strategy: BoundaryStrategy) -> Self {
        self.config.strategy = strategy;
        self
    }

    /// Set the page size
    pub fn limit(mut self, limit: u32) -> Self {
        self.config.limit = Some(limit);
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.config.timeout = timeout;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.config.user_agent = agent.into();
        self
    }

    /// Build the config
    pub fn build(self) -> HttpSourceConfig {
        self.config
    }
}

/// Page source backed by a pagination endpoint
#[derive(Debug, Clone)]
pub struct HttpPageSource {
    client: Client,
    endpoint: Url,
    config: HttpSourceConfig,
}

impl HttpPageSource {
    /// Create a source from config
    pub fn new(config: HttpSourceConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let endpoint = endpoint_url(&config.base_url, config.strategy)?;

        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// Endpoint URL without query parameters
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Build the request URL for a cursor
    pub fn page_url(&self, cursor: Option<&str>) -> Url {
        let mut url = self.endpoint.clone();
        {
            let mut query = url.query_pairs_mut();
            if let Some(limit) = self.config.limit {
                query.append_pair("limit", &limit.to_string());
            }
            if let Some(cursor) = cursor {
                query.append_pair("nextPageToken", cursor);
            }
        }
        if url.query() == Some("") {
            url.set_query(None);
        }
        url
    }
}

/// Resolve the endpoint below `base_url`, keeping any path prefix such as a
/// deployment stage
fn endpoint_url(base_url: &str, strategy: BoundaryStrategy) -> Result<Url> {
    let mut base = Url::parse(base_url)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    Ok(base.join(strategy.route().trim_start_matches('/'))?)
}

#[async_trait]
impl PageSource for HttpPageSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        let url = self.page_url(cursor);
        debug!(%url, "requesting page");

        let response = self.client.get(url).send().await.map_err(|e| {
            if e.is_timeout() {
                Error::Timeout {
                    timeout_ms: self.config.timeout.as_millis() as u64,
                }
            } else {
                Error::Http(e)
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(Error::http_status(status.as_u16(), body));
        }

        let body: BooksResponse = response.json().await?;
        Ok(body.into())
    }
}
