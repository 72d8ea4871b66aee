//! CLI runner - executes commands

use crate::cli::commands::{Cli, Commands, Endpoint};
use crate::client::{
    FetchStatus, HttpPageSource, HttpSourceConfig, PageSource, PaginationClient,
    PrefetchingSource,
};
use crate::config::{AppConfig, StoreConfig};
use crate::error::Result;
use crate::fetcher::BoundaryStrategy;
use crate::types::BooksResponse;
use serde_json::json;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let config = AppConfig::load(self.cli.config.as_deref())?;

        match &self.cli.command {
            Commands::Serve { port, duckdb, seed } => {
                self.serve(config, *port, duckdb.clone(), *seed).await
            }
            Commands::Fetch {
                url,
                endpoint,
                limit,
                token,
            } => {
                self.fetch(&config, url.as_deref(), *endpoint, *limit, token.as_deref())
                    .await
            }
            Commands::Browse {
                url,
                endpoint,
                limit,
                prefetch,
                max_pages,
            } => {
                self.browse(
                    &config,
                    url.as_deref(),
                    *endpoint,
                    *limit,
                    *prefetch,
                    *max_pages,
                )
                .await
            }
        }
    }

    async fn serve(
        &self,
        mut config: AppConfig,
        port: Option<u16>,
        duckdb: Option<PathBuf>,
        seed: Option<usize>,
    ) -> Result<()> {
        if let Some(port) = port {
            config.server.port = port;
        }
        if let Some(path) = duckdb {
            config.store = StoreConfig::Duckdb { path: Some(path) };
        }
        if let Some(seed) = seed {
            config.seed_count = seed;
        }
        crate::cli::serve(&config).await
    }

    /// Build the HTTP source for a command
    fn http_source(
        &self,
        config: &AppConfig,
        url: Option<&str>,
        endpoint: Endpoint,
        limit: Option<u32>,
    ) -> Result<HttpPageSource> {
        let mut builder = HttpSourceConfig::builder()
            .base_url(url.unwrap_or(&config.client.base_url))
            .strategy(BoundaryStrategy::from(endpoint))
            .timeout(Duration::from_secs(config.client.timeout_secs));
        if let Some(limit) = limit {
            builder = builder.limit(limit);
        }
        HttpPageSource::new(builder.build())
    }

    async fn fetch(
        &self,
        config: &AppConfig,
        url: Option<&str>,
        endpoint: Endpoint,
        limit: Option<u32>,
        token: Option<&str>,
    ) -> Result<()> {
        let source = self.http_source(config, url, endpoint, limit)?;
        if self.cli.verbose {
            eprintln!("GET {}", source.page_url(token));
        }

        let page = source.fetch_page(token).await?;
        let body = serde_json::to_string_pretty(&BooksResponse::from(page))?;
        println!("{body}");
        Ok(())
    }

    async fn browse(
        &self,
        config: &AppConfig,
        url: Option<&str>,
        endpoint: Endpoint,
        limit: Option<u32>,
        prefetch: bool,
        max_pages: Option<usize>,
    ) -> Result<()> {
        let source = self.http_source(config, url, endpoint, limit)?;
        let start = Instant::now();

        let (summary, stats) = if prefetch {
            let client = PaginationClient::new(PrefetchingSource::new(
                source,
                config.client.cache_capacity,
            ));
            let summary = self.walk(&client, max_pages).await?;
            let stats = client.source().stats();
            (summary, Some(stats))
        } else {
            let client = PaginationClient::new(source);
            (self.walk(&client, max_pages).await?, None)
        };

        let mut result = json!({
            "type": "BROWSE_RESULT",
            "endpoint": BoundaryStrategy::from(endpoint).route(),
            "pages": summary.pages,
            "records": summary.records,
            "exhausted": summary.exhausted,
            "duration_ms": start.elapsed().as_millis() as u64,
        });
        if let Some(stats) = stats {
            result["cache"] = json!({ "hits": stats.hits, "misses": stats.misses });
        }
        println!("{result}");
        Ok(())
    }

    /// Fetch every page, printing each record as a JSON line
    async fn walk<S: PageSource>(
        &self,
        client: &PaginationClient<S>,
        max_pages: Option<usize>,
    ) -> Result<WalkSummary> {
        if let Err(e) = client.fetch_all(max_pages).await {
            if let FetchStatus::Errored { message } = client.status().await {
                eprintln!(
                    "Fetch failed after {} pages ({}): {message}",
                    client.page_count().await,
                    if e.is_retryable() { "retryable" } else { "not retryable" }
                );
            }
            return Err(e);
        }

        let items = client.items().await;
        for record in &items {
            println!("{}", json!({ "type": "RECORD", "record": record }));
        }

        Ok(WalkSummary {
            pages: client.page_count().await,
            records: items.len(),
            exhausted: !client.has_next_page().await,
        })
    }
}

struct WalkSummary {
    pages: usize,
    records: usize,
    exhausted: bool,
}
