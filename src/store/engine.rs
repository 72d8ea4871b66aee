//! DuckDB-backed record store
//!
//! Records live in a single table keyed by `(pk, sk)`. Range queries are
//! plain `ORDER BY sk LIMIT n` scans with an exclusive lower bound.

use super::types::{QueryOutput, RangeQuery, RecordStore};
use crate::config::validate_identifier;
use crate::error::{Error, Result};
use crate::types::Record;
use async_trait::async_trait;
use duckdb::{params, Connection};
use std::path::Path;
use std::sync::{Arc, Mutex};
use tracing::debug;

/// Record store using a DuckDB table.
///
/// Statements run on the blocking thread pool; the connection is shared with
/// those tasks behind a mutex.
pub struct DuckDbStore {
    /// DuckDB connection
    conn: Arc<Mutex<Connection>>,
    /// Table holding the records
    table: String,
}

impl DuckDbStore {
    /// Create a store in an in-memory DuckDB database
    pub fn open_in_memory(table: &str) -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::config(format!("Failed to create DuckDB connection: {e}")))?;
        Self::with_connection(conn, table)
    }

    /// Create a store in a DuckDB database file, creating it if needed
    pub fn open(path: impl AsRef<Path>, table: &str) -> Result<Self> {
        let path = path.as_ref();
        let conn = Connection::open(path).map_err(|e| {
            Error::config(format!(
                "Failed to open DuckDB database {}: {e}",
                path.display()
            ))
        })?;
        Self::with_connection(conn, table)
    }

    fn with_connection(conn: Connection, table: &str) -> Result<Self> {
        validate_identifier("table_name", table)?;

        conn.execute_batch(&format!(
            "CREATE TABLE IF NOT EXISTS {table} (
                pk VARCHAR NOT NULL,
                sk VARCHAR NOT NULL,
                title VARCHAR NOT NULL,
                PRIMARY KEY (pk, sk)
            );"
        ))
        .map_err(|e| Error::config(format!("Failed to create table {table}: {e}")))?;

        debug!(table, "duckdb store ready");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            table: table.to_string(),
        })
    }

    /// Table name
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Run `f` against the connection on the blocking thread pool
    async fn with_conn<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection, &str) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let table = self.table.clone();
        tokio::task::spawn_blocking(move || {
            let conn = conn
                .lock()
                .map_err(|_| Error::store("DuckDB connection lock poisoned"))?;
            f(&conn, &table)
        })
        .await
        .map_err(|e| Error::store(format!("DuckDB task failed: {e}")))?
    }
}

fn map_record(row: &duckdb::Row<'_>) -> duckdb::Result<Record> {
    Ok(Record {
        pk: row.get(0)?,
        sk: row.get(1)?,
        title: row.get(2)?,
    })
}

fn select_range(conn: &Connection, table: &str, query: &RangeQuery) -> Result<Vec<Record>> {
    let limit = i64::from(query.limit);

    match &query.exclusive_start {
        Some(start) => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT pk, sk, title FROM {table} WHERE pk = ? AND sk > ? ORDER BY sk LIMIT ?"
                ))
                .map_err(|e| Error::store(format!("Failed to prepare query: {e}")))?;
            let rows = stmt
                .query_map(params![query.partition, start.sk, limit], map_record)
                .map_err(|e| Error::store(format!("Query failed: {e}")))?;
            rows.collect::<duckdb::Result<Vec<_>>>()
        }
        None => {
            let mut stmt = conn
                .prepare(&format!(
                    "SELECT pk, sk, title FROM {table} WHERE pk = ? ORDER BY sk LIMIT ?"
                ))
                .map_err(|e| Error::store(format!("Failed to prepare query: {e}")))?;
            let rows = stmt
                .query_map(params![query.partition, limit], map_record)
                .map_err(|e| Error::store(format!("Query failed: {e}")))?;
            rows.collect::<duckdb::Result<Vec<_>>>()
        }
    }
    .map_err(|e| Error::store(format!("Failed to read row: {e}")))
}

fn insert_records(conn: &Connection, table: &str, records: &[Record]) -> Result<()> {
    let mut stmt = conn
        .prepare(&format!(
            "INSERT OR REPLACE INTO {table} (pk, sk, title) VALUES (?, ?, ?)"
        ))
        .map_err(|e| Error::store(format!("Failed to prepare insert: {e}")))?;

    for record in records {
        stmt.execute(params![record.pk, record.sk, record.title])
            .map_err(|e| Error::store(format!("Failed to insert {}: {e}", record.sk)))?;
    }
    Ok(())
}

#[async_trait]
impl RecordStore for DuckDbStore {
    async fn query(&self, query: &RangeQuery) -> Result<QueryOutput> {
        let query = query.clone();
        self.with_conn(move |conn, table| {
            let items = select_range(conn, table, &query)?;
            Ok(QueryOutput::from_scan(items, query.limit))
        })
        .await
    }

    async fn put_batch(&self, records: &[Record]) -> Result<()> {
        let records = records.to_vec();
        self.with_conn(move |conn, table| insert_records(conn, table, &records))
            .await
    }

    fn backend(&self) -> &'static str {
        "duckdb"
    }
}

impl std::fmt::Debug for DuckDbStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DuckDbStore")
            .field("table", &self.table)
            .finish_non_exhaustive()
    }
}
