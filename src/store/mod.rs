//! Record store module
//!
//! The range-query capability pagination is built on: all records of one
//! partition, ascending by sort key, resumable after an explicit position.
//!
//! # Overview
//!
//! - `RecordStore` - the async trait fetchers query
//! - `MemoryStore` - ordered in-process map
//! - `DuckDbStore` - table in an in-memory or file-backed DuckDB database
//! - `seed_books` - fills a store with the demo collection

mod engine;
mod memory;
mod seed;
mod types;

pub use engine::DuckDbStore;
pub use memory::MemoryStore;
pub use seed::{demo_books, seed_books, SEED_BATCH_SIZE};
pub use types::{QueryOutput, RangeQuery, RecordStore};

#[cfg(test)]
mod tests;
