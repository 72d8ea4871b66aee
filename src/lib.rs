// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::unused_self)]
#![allow(clippy::unused_async)]
#![allow(clippy::needless_pass_by_value)]

//! # Cursor Pagination
//!
//! Cursor-based pagination over a partitioned key-value store, with a client
//! that accumulates pages and an optional prefetching cache.
//!
//! ## Features
//!
//! - **Opaque cursors**: URL-safe tokens encoding the last returned position
//! - **Two boundary strategies**: store continuation key vs. lookahead sentinel
//! - **Pagination client**: ordered page accumulation with an in-flight guard
//! - **Prefetch cache**: fetch page N+1 with page N, detect the end one page early
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cursor_pagination::client::{HttpPageSource, HttpSourceConfig, PaginationClient};
//! use cursor_pagination::Result;
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let source = HttpPageSource::new(
//!         HttpSourceConfig::builder().base_url("http://localhost:8080").build(),
//!     )?;
//!     let client = PaginationClient::new(source);
//!
//!     while client.fetch_next().await?.is_fetched() {}
//!     println!("{} books", client.items().await.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! PaginationClient ──▶ [PrefetchingSource] ──▶ HttpPageSource
//!                                                   │ GET /better-pagination
//!                                                   ▼
//!                        axum router ──▶ PageFetcher ──▶ RecordStore
//!                                        (cursor decode,   (Memory / DuckDB)
//!                                         boundary check)
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// Records, pages and the endpoint wire format
pub mod types;

/// Cursor encoding and decoding
pub mod cursor;

/// Record storage
pub mod store;

/// Server-side page fetchers
pub mod fetcher;

/// Pagination client and prefetch cache
pub mod client;

/// Configuration
pub mod config;

/// Command-line interface and HTTP server
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use error::{Error, Result};
pub use types::{BooksResponse, Page, Record};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
