//! Fetcher types and traits

use crate::error::{Error, Result};
use crate::types::{Page, DEFAULT_PAGE_SIZE};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Parameters of a single page fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// Maximum number of records in the page
    pub limit: u32,
    /// Token returned with the previous page, `None` for the first page
    pub cursor: Option<String>,
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::first(DEFAULT_PAGE_SIZE)
    }
}

impl PageRequest {
    /// Request for the first page
    pub fn first(limit: u32) -> Self {
        Self {
            limit: limit.max(1),
            cursor: None,
        }
    }

    /// Request for the page after `cursor`
    pub fn after(limit: u32, cursor: Option<String>) -> Self {
        Self {
            limit: limit.max(1),
            cursor: cursor.filter(|c| !c.is_empty()),
        }
    }
}

/// Parse a raw `limit` value, falling back to `default` when it is missing,
/// not a number, or not positive
pub fn parse_limit(raw: Option<&str>, default: u32) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|&limit| limit > 0)
        .unwrap_or(default)
}

/// How a fetcher decides that another page follows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryStrategy {
    /// Trust the continuation key reported by the store
    StoreNative,
    /// Read one record past the page and look for it
    #[default]
    Lookahead,
}

impl BoundaryStrategy {
    /// Endpoint path serving this strategy
    pub fn route(self) -> &'static str {
        match self {
            Self::StoreNative => "/default-pagination",
            Self::Lookahead => "/better-pagination",
        }
    }

    /// Short name used in logs and on the command line
    pub fn as_str(self) -> &'static str {
        match self {
            Self::StoreNative => "default",
            Self::Lookahead => "better",
        }
    }
}

impl fmt::Display for BoundaryStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BoundaryStrategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "default" | "store_native" | "store-native" => Ok(Self::StoreNative),
            "better" | "lookahead" => Ok(Self::Lookahead),
            other => Err(Error::invalid_value(
                "strategy",
                format!("unknown pagination strategy '{other}'"),
            )),
        }
    }
}

/// Core trait for page fetchers
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page
    async fn fetch(&self, request: &PageRequest) -> Result<Page>;

    /// Boundary strategy this fetcher implements
    fn strategy(&self) -> BoundaryStrategy;
}
