//! Demo collection seeding

use super::types::RecordStore;
use crate::error::Result;
use crate::types::Record;
use futures::future::try_join_all;
use tracing::info;

/// Records written per batch
pub const SEED_BATCH_SIZE: usize = 25;

/// Build the demo collection: `count` books in one partition.
///
/// Sort keys are zero-padded so lexicographic order matches numeric order.
pub fn demo_books(partition: &str, count: usize) -> Vec<Record> {
    let width = count.saturating_sub(1).to_string().len();
    (0..count)
        .map(|i| Record::new(partition, format!("Book#{i:0width$}"), format!("Book {i}")))
        .collect()
}

/// Write the demo collection into `store`, returning the number of records
pub async fn seed_books(store: &dyn RecordStore, partition: &str, count: usize) -> Result<usize> {
    let books = demo_books(partition, count);
    try_join_all(
        books
            .chunks(SEED_BATCH_SIZE)
            .map(|chunk| store.put_batch(chunk)),
    )
    .await?;

    info!(
        backend = store.backend(),
        partition,
        count = books.len(),
        "seeded demo collection"
    );
    Ok(books.len())
}
