//! Page sources

use crate::error::Result;
use crate::fetcher::{PageFetcher, PageRequest};
use crate::types::Page;
use async_trait::async_trait;
use std::sync::Arc;

/// Anything that can hand out the page following a cursor
#[async_trait]
pub trait PageSource: Send + Sync {
    /// Fetch the page after `cursor`, or the first page when `None`
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page>;
}

#[async_trait]
impl<T: PageSource + ?Sized> PageSource for Arc<T> {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        (**self).fetch_page(cursor).await
    }
}

/// In-process source calling a fetcher directly, with a fixed page size
#[derive(Clone)]
pub struct FetcherSource {
    fetcher: Arc<dyn PageFetcher>,
    limit: u32,
}

impl FetcherSource {
    /// Create a source
    pub fn new(fetcher: Arc<dyn PageFetcher>, limit: u32) -> Self {
        Self { fetcher, limit }
    }
}

#[async_trait]
impl PageSource for FetcherSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        let request = PageRequest::after(self.limit, cursor.map(str::to_string));
        self.fetcher.fetch(&request).await
    }
}
