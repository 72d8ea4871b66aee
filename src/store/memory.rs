//! In-memory record store

use super::types::{QueryOutput, RangeQuery, RecordStore};
use crate::error::Result;
use crate::types::Record;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::ops::Bound;
use tokio::sync::RwLock;

/// Record store backed by nested ordered maps (partition, then sort key)
#[derive(Debug, Default)]
pub struct MemoryStore {
    partitions: RwLock<BTreeMap<String, BTreeMap<String, Record>>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store holding `records`
    pub fn with_records(records: impl IntoIterator<Item = Record>) -> Self {
        let mut partitions: BTreeMap<String, BTreeMap<String, Record>> = BTreeMap::new();
        for record in records {
            partitions
                .entry(record.pk.clone())
                .or_default()
                .insert(record.sk.clone(), record);
        }
        Self {
            partitions: RwLock::new(partitions),
        }
    }

    /// Number of records in a partition
    pub async fn len(&self, partition: &str) -> usize {
        self.partitions
            .read()
            .await
            .get(partition)
            .map_or(0, BTreeMap::len)
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn query(&self, query: &RangeQuery) -> Result<QueryOutput> {
        let partitions = self.partitions.read().await;
        let Some(partition) = partitions.get(&query.partition) else {
            return Ok(QueryOutput::default());
        };

        let lower = match &query.exclusive_start {
            Some(position) => Bound::Excluded(position.sk.clone()),
            None => Bound::Unbounded,
        };

        let items: Vec<Record> = partition
            .range((lower, Bound::Unbounded))
            .take(query.limit as usize)
            .map(|(_, record)| record.clone())
            .collect();

        Ok(QueryOutput::from_scan(items, query.limit))
    }

    async fn put_batch(&self, records: &[Record]) -> Result<()> {
        let mut partitions = self.partitions.write().await;
        for record in records {
            partitions
                .entry(record.pk.clone())
                .or_default()
                .insert(record.sk.clone(), record.clone());
        }
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
