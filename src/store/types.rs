//! Store types and traits

use crate::cursor::Position;
use crate::error::Result;
use crate::types::Record;
use async_trait::async_trait;

/// Range query: equality on partition key, ascending sort key
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RangeQuery {
    /// Partition to scan
    pub partition: String,
    /// Resume strictly after this position
    pub exclusive_start: Option<Position>,
    /// Maximum number of records to return
    pub limit: u32,
}

impl RangeQuery {
    /// Query from the start of a partition
    pub fn new(partition: impl Into<String>, limit: u32) -> Self {
        Self {
            partition: partition.into(),
            exclusive_start: None,
            limit,
        }
    }

    /// Resume after a position
    #[must_use]
    pub fn after(mut self, position: Option<Position>) -> Self {
        self.exclusive_start = position;
        self
    }
}

/// Records returned by a range query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOutput {
    /// Records in ascending sort key order
    pub items: Vec<Record>,
    /// Continuation key, set whenever the scan stopped at the limit.
    ///
    /// Stores set this even if nothing follows the last record, so a
    /// caller relying on it alone sees one extra, empty page at the end.
    pub last_evaluated_key: Option<Position>,
}

impl QueryOutput {
    /// Build the output of a scan that asked for `limit` records
    pub fn from_scan(items: Vec<Record>, limit: u32) -> Self {
        let hit_limit = limit > 0 && items.len() >= limit as usize;
        let last_evaluated_key = if hit_limit {
            items.last().map(Position::from)
        } else {
            None
        };
        Self {
            items,
            last_evaluated_key,
        }
    }
}

/// Ordered, partitioned key-value storage for records
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Run a range query
    async fn query(&self, query: &RangeQuery) -> Result<QueryOutput>;

    /// Insert or replace a batch of records
    async fn put_batch(&self, records: &[Record]) -> Result<()>;

    /// Short backend name, used in logs
    fn backend(&self) -> &'static str;
}
