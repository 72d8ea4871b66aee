//! Pagination client module
//!
//! Consumes pages one `fetch_next` at a time and accumulates them.
//!
//! # Overview
//!
//! - `PageSource` - where pages come from (HTTP endpoint or in-process fetcher)
//! - `PaginationClient` - accumulated pages plus an in-flight guard
//! - `PrefetchingSource` - a `PageSource` wrapper that fetches one page ahead
//!   and serves the next explicit request from its cache
//!
//! Prefetching is opt-in by composition:
//! `PaginationClient::new(PrefetchingSource::new(source, capacity))`.

mod http;
mod paginator;
mod prefetch;
mod source;

pub use http::{HttpPageSource, HttpSourceConfig, HttpSourceConfigBuilder};
pub use paginator::{FetchOutcome, FetchStatus, PaginationClient, SkipReason};
pub use prefetch::{PrefetchStats, PrefetchingSource, DEFAULT_CACHE_CAPACITY};
pub use source::{FetcherSource, PageSource};
