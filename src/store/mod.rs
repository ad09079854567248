//! Row storage collaborator
//!
//! The persistence adapter talks to storage only through [`RowStore`]:
//! select one row by key, upsert a row, or insert a row that must not exist
//! yet. [`MemoryStore`] backs tests and the `--memory` server mode;
//! [`SqliteStore`] is the on-disk backend.

pub mod memory;
pub mod schema;
pub mod sqlite;

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

pub use memory::MemoryStore;
pub use schema::{SchemaVersion, TableSchema};
pub use sqlite::SqliteStore;

/// A stored row: column name to value
pub type Row = BTreeMap<String, Value>;

/// Errors reported by a row store
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StoreError {
    /// The table exists but lacks a column the row writes
    #[error("column '{column}' does not exist on table '{table}'")]
    MissingColumn { table: String, column: String },

    /// An insert collided with an existing key
    #[error("a row with this key already exists in '{table}'")]
    Conflict { table: String },

    /// Any other backend failure
    #[error("{0}")]
    Backend(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        StoreError::Backend(err.to_string())
    }
}

/// Key column values identifying one row
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RowKey {
    pairs: Vec<(&'static str, String)>,
}

impl RowKey {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.pairs.push((column, value.into()));
        self
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Whether `row` carries this key
    pub fn matches(&self, row: &Row) -> bool {
        self.pairs
            .iter()
            .all(|(column, value)| row.get(*column).and_then(Value::as_str) == Some(value))
    }

    /// Key of `row` under `table`'s key columns
    pub fn of(table: &TableSchema, row: &Row) -> RowKey {
        let pairs = table
            .key
            .iter()
            .map(|column| {
                let value = row
                    .get(*column)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                (*column, value)
            })
            .collect();
        RowKey { pairs }
    }
}

/// Keyed row storage
#[async_trait]
pub trait RowStore: Send + Sync {
    /// Fetch the row with `key`, if any
    async fn select(&self, table: &TableSchema, key: &RowKey) -> Result<Option<Row>, StoreError>;

    /// Insert or replace the row identified by its key columns
    async fn upsert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError>;

    /// Insert a row whose key must not exist yet
    async fn insert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError>;
}
