//! Prefetching page source
//!
//! Every request also fetches the page after the one asked for and keeps it,
//! keyed by the cursor that retrieves it. The following explicit request for
//! that cursor is then answered without touching the inner source.
//!
//! An empty speculative page means the current page is the last one, so the
//! current page is returned without a cursor. Callers never see the trailing
//! empty page a continuation-key endpoint produces.
//!
//! The cache belongs to one source instance. Sharing a source between
//! independent consumers lets them observe each other's prefetched pages.

use super::source::PageSource;
use crate::error::Result;
use crate::types::Page;
use async_trait::async_trait;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::Mutex;
use tracing::debug;

/// Pages kept when no capacity is configured
pub const DEFAULT_CACHE_CAPACITY: usize = 64;

/// Cache counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PrefetchStats {
    /// Requests answered from the cache
    pub hits: u64,
    /// Requests sent to the inner source
    pub misses: u64,
}

/// [`PageSource`] wrapper that fetches one page ahead
#[derive(Debug)]
pub struct PrefetchingSource<S> {
    inner: S,
    cache: Mutex<LruCache<String, Page>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl<S: PageSource> PrefetchingSource<S> {
    /// Wrap `inner`, keeping at most `capacity` prefetched pages
    pub fn new(inner: S, capacity: usize) -> Self {
        let capacity =
            NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            inner,
            cache: Mutex::new(LruCache::new(capacity)),
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Wrapped source
    pub fn inner(&self) -> &S {
        &self.inner
    }

    /// Number of cached pages
    pub async fn cached_pages(&self) -> usize {
        self.cache.lock().await.len()
    }

    /// Whether a page for `cursor` is cached
    pub async fn is_cached(&self, cursor: &str) -> bool {
        self.cache.lock().await.contains(cursor)
    }

    /// Hit and miss counters
    pub fn stats(&self) -> PrefetchStats {
        PrefetchStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
        }
    }

    /// Serve `cursor` from the cache, or fetch it from the inner source
    async fn cached_or_fetch(&self, cursor: Option<&str>) -> Result<Page> {
        if let Some(key) = cursor {
            if let Some(page) = self.cache.lock().await.get(key).cloned() {
                self.hits.fetch_add(1, Ordering::Relaxed);
                debug!(cursor = key, "prefetch cache hit");
                return Ok(page);
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        self.inner.fetch_page(cursor).await
    }
}

#[async_trait]
impl<S: PageSource> PageSource for PrefetchingSource<S> {
    async fn fetch_page(&self, cursor: Option<&str>) -> Result<Page> {
        let current = self.cached_or_fetch(cursor).await?;

        let Some(next_cursor) = current.next_cursor.clone() else {
            return Ok(current);
        };

        // A failed lookahead fails the whole request
        let upcoming = self.cached_or_fetch(Some(&next_cursor)).await?;

        if upcoming.items.is_empty() {
            debug!("lookahead page is empty, marking current page as last");
            return Ok(Page::last(current.items));
        }

        self.cache.lock().await.put(next_cursor, upcoming);
        Ok(current)
    }
}
