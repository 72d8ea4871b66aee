//! Page fetcher implementations
//!
//! Each fetcher issues exactly one range query per page.

use super::types::{BoundaryStrategy, PageFetcher, PageRequest};
use crate::cursor::{CursorCodec, Position};
use crate::error::Result;
use crate::store::{RangeQuery, RecordStore};
use crate::types::Page;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::debug;

/// Decode the request cursor, if any, into a position inside `partition`
fn resume_position(request: &PageRequest, partition: &str) -> Result<Option<Position>> {
    request
        .cursor
        .as_deref()
        .map(|token| CursorCodec::decode_for(token, partition))
        .transpose()
}

// ============================================================================
// Store-native boundary detection
// ============================================================================

/// Fetcher that trusts the store's continuation key
///
/// One query for exactly `limit` records. The page gets a cursor whenever the
/// store reports a continuation key.
#[derive(Clone)]
pub struct ContinuationKeyFetcher {
    store: Arc<dyn RecordStore>,
    partition: String,
}

impl ContinuationKeyFetcher {
    /// Create a fetcher over one partition
    pub fn new(store: Arc<dyn RecordStore>, partition: impl Into<String>) -> Self {
        Self {
            store,
            partition: partition.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for ContinuationKeyFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Page> {
        let start = resume_position(request, &self.partition)?;
        let query = RangeQuery::new(&self.partition, request.limit).after(start);

        let output = self.store.query(&query).await?;
        let next_cursor = output
            .last_evaluated_key
            .as_ref()
            .map(CursorCodec::encode);

        debug!(
            strategy = %self.strategy(),
            limit = request.limit,
            returned = output.items.len(),
            has_next = next_cursor.is_some(),
            "fetched page"
        );
        Ok(Page::new(output.items, next_cursor))
    }

    fn strategy(&self) -> BoundaryStrategy {
        BoundaryStrategy::StoreNative
    }
}

// ============================================================================
// Lookahead boundary detection
// ============================================================================

/// Fetcher that reads one sentinel record past the page
///
/// Only `(pk, sk)` of the last returned record goes into the cursor, so the
/// token never depends on store-internal scan state.
#[derive(Clone)]
pub struct LookaheadFetcher {
    store: Arc<dyn RecordStore>,
    partition: String,
}

impl LookaheadFetcher {
    /// Create a fetcher over one partition
    pub fn new(store: Arc<dyn RecordStore>, partition: impl Into<String>) -> Self {
        Self {
            store,
            partition: partition.into(),
        }
    }
}

#[async_trait]
impl PageFetcher for LookaheadFetcher {
    async fn fetch(&self, request: &PageRequest) -> Result<Page> {
        let start = resume_position(request, &self.partition)?;
        let query =
            RangeQuery::new(&self.partition, request.limit.saturating_add(1)).after(start);

        let mut items = self.store.query(&query).await?.items;
        let page_size = request.limit as usize;

        let next_cursor = if items.len() > page_size {
            items.truncate(page_size);
            items.last().map(|last| CursorCodec::encode(&Position::from(last)))
        } else {
            None
        };

        debug!(
            strategy = %self.strategy(),
            limit = request.limit,
            returned = items.len(),
            has_next = next_cursor.is_some(),
            "fetched page"
        );
        Ok(Page::new(items, next_cursor))
    }

    fn strategy(&self) -> BoundaryStrategy {
        BoundaryStrategy::Lookahead
    }
}

/// Build the fetcher for a strategy
pub fn build_fetcher(
    strategy: BoundaryStrategy,
    store: Arc<dyn RecordStore>,
    partition: &str,
) -> Arc<dyn PageFetcher> {
    match strategy {
        BoundaryStrategy::StoreNative => Arc::new(ContinuationKeyFetcher::new(store, partition)),
        BoundaryStrategy::Lookahead => Arc::new(LookaheadFetcher::new(store, partition)),
    }
}
