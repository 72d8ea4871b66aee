//! Tests for store module

use super::*;
use crate::cursor::Position;
use crate::types::Record;
use pretty_assertions::assert_eq;
use std::sync::Arc;
use tempfile::TempDir;

fn sort_keys(output: &QueryOutput) -> Vec<String> {
    output.items.iter().map(|r| r.sk.clone()).collect()
}

// ============================================================================
// Seeding Tests
// ============================================================================

#[test]
fn test_demo_books_are_zero_padded() {
    let books = demo_books("Book", 40);
    assert_eq!(books.len(), 40);
    assert_eq!(books[0], Record::new("Book", "Book#00", "Book 0"));
    assert_eq!(books[39], Record::new("Book", "Book#39", "Book 39"));

    let mut sorted = books.clone();
    sorted.sort_by(|a, b| a.sk.cmp(&b.sk));
    assert_eq!(sorted, books);
}

#[test]
fn test_demo_books_small_and_empty() {
    assert!(demo_books("Book", 0).is_empty());
    assert_eq!(demo_books("Book", 1)[0].sk, "Book#0");
    assert_eq!(demo_books("Book", 101)[100].sk, "Book#100");
    assert_eq!(demo_books("Book", 101)[7].sk, "Book#007");
}

#[tokio::test]
async fn test_seed_books_in_batches() {
    let store = MemoryStore::new();
    let written = seed_books(&store, "Book", 40).await.unwrap();

    assert_eq!(written, 40);
    assert_eq!(store.len("Book").await, 40);
    assert!(40 > SEED_BATCH_SIZE);
}

// ============================================================================
// MemoryStore Tests
// ============================================================================

#[tokio::test]
async fn test_memory_query_from_start() {
    let store = MemoryStore::with_records(demo_books("Book", 10));
    let output = store.query(&RangeQuery::new("Book", 3)).await.unwrap();

    assert_eq!(sort_keys(&output), vec!["Book#0", "Book#1", "Book#2"]);
    assert_eq!(
        output.last_evaluated_key,
        Some(Position::new("Book", "Book#2"))
    );
}

#[tokio::test]
async fn test_memory_query_resumes_exclusively() {
    let store = MemoryStore::with_records(demo_books("Book", 10));
    let query = RangeQuery::new("Book", 2).after(Some(Position::new("Book", "Book#4")));
    let output = store.query(&query).await.unwrap();

    assert_eq!(sort_keys(&output), vec!["Book#5", "Book#6"]);
}

#[tokio::test]
async fn test_memory_continuation_key_at_exact_end() {
    // The key is reported because the limit was hit, not because more data exists
    let store = MemoryStore::with_records(demo_books("Book", 4));
    let query = RangeQuery::new("Book", 2).after(Some(Position::new("Book", "Book#1")));
    let output = store.query(&query).await.unwrap();

    assert_eq!(sort_keys(&output), vec!["Book#2", "Book#3"]);
    assert_eq!(
        output.last_evaluated_key,
        Some(Position::new("Book", "Book#3"))
    );

    let tail = store
        .query(&query.after(output.last_evaluated_key))
        .await
        .unwrap();
    assert!(tail.items.is_empty());
    assert!(tail.last_evaluated_key.is_none());
}

#[tokio::test]
async fn test_memory_short_scan_has_no_key() {
    let store = MemoryStore::with_records(demo_books("Book", 3));
    let output = store.query(&RangeQuery::new("Book", 5)).await.unwrap();

    assert_eq!(output.items.len(), 3);
    assert!(output.last_evaluated_key.is_none());
}

#[tokio::test]
async fn test_memory_partitions_are_isolated() {
    let mut records = demo_books("Book", 3);
    records.push(Record::new("Author", "Author#1", "Someone"));
    let store = MemoryStore::with_records(records);

    let output = store.query(&RangeQuery::new("Author", 10)).await.unwrap();
    assert_eq!(sort_keys(&output), vec!["Author#1"]);

    let missing = store.query(&RangeQuery::new("Film", 10)).await.unwrap();
    assert_eq!(missing, QueryOutput::default());
}

#[tokio::test]
async fn test_memory_put_replaces() {
    let store = MemoryStore::with_records(demo_books("Book", 2));
    store
        .put_batch(&[Record::new("Book", "Book#0", "Renamed")])
        .await
        .unwrap();

    let output = store.query(&RangeQuery::new("Book", 10)).await.unwrap();
    assert_eq!(output.items.len(), 2);
    assert_eq!(output.items[0].title, "Renamed");
}

// ============================================================================
// DuckDbStore Tests
// ============================================================================

#[tokio::test]
async fn test_duckdb_query_matches_memory() {
    let duck = DuckDbStore::open_in_memory("books").unwrap();
    seed_books(&duck, "Book", 40).await.unwrap();
    let memory = MemoryStore::with_records(demo_books("Book", 40));

    let mut start = None;
    loop {
        let query = RangeQuery::new("Book", 15).after(start.clone());
        let from_duck = duck.query(&query).await.unwrap();
        let from_memory = memory.query(&query).await.unwrap();
        assert_eq!(from_duck, from_memory);

        if from_duck.last_evaluated_key.is_none() {
            break;
        }
        start = from_duck.last_evaluated_key;
    }
}

#[tokio::test]
async fn test_duckdb_file_persists() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("books.duckdb");

    {
        let store = DuckDbStore::open(&path, "books").unwrap();
        seed_books(&store, "Book", 5).await.unwrap();
    }

    let reopened = DuckDbStore::open(&path, "books").unwrap();
    let output = reopened.query(&RangeQuery::new("Book", 10)).await.unwrap();
    assert_eq!(output.items.len(), 5);
    assert_eq!(reopened.table(), "books");
}

#[test]
fn test_duckdb_rejects_bad_table_name() {
    let err = DuckDbStore::open_in_memory("books; DROP TABLE x").unwrap_err();
    assert!(err.to_string().contains("table_name"));
}

#[tokio::test(flavor = "current_thread")]
async fn test_duckdb_queries_from_spawned_tasks() {
    let store = Arc::new(DuckDbStore::open_in_memory("books").unwrap());
    seed_books(store.as_ref(), "Book", 40).await.unwrap();

    // A single-threaded runtime still makes progress while statements run
    let handles: Vec<_> = (0u8..8)
        .map(|i| {
            let store = store.clone();
            tokio::spawn(async move {
                let start = Position::new("Book", format!("Book#{:02}", i * 4));
                store
                    .query(&RangeQuery::new("Book", 4).after(Some(start)))
                    .await
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        let output = handle.await.unwrap().unwrap();
        let first = i * 4 + 1;
        assert_eq!(
            sort_keys(&output),
            (first..first + 4)
                .map(|n| format!("Book#{n:02}"))
                .collect::<Vec<_>>()
        );
        assert!(output.last_evaluated_key.is_some());
    }
}
