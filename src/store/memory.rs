//! In-memory row store

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;

use super::schema::{SchemaVersion, TableSchema, ALL_TABLES};
use super::{Row, RowKey, RowStore, StoreError};

#[derive(Debug, Default)]
struct TableState {
    columns: HashSet<String>,
    rows: Vec<Row>,
}

#[derive(Debug, Default)]
struct Inner {
    tables: HashMap<&'static str, TableState>,
    failing_selects: HashSet<(&'static str, String)>,
}

/// Row store held in process memory.
///
/// Columns are tracked per table so that a store created with an older
/// schema rejects writes to columns it does not have, like a real backend
/// awaiting a migration.
#[derive(Debug)]
pub struct MemoryStore {
    inner: Mutex<Inner>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Store with every table at the current schema
    pub fn new() -> Self {
        Self::with_version(SchemaVersion::Current)
    }

    /// Store with every table at `version`
    pub fn with_version(version: SchemaVersion) -> Self {
        let tables = ALL_TABLES
            .iter()
            .map(|table| {
                let columns = table
                    .columns_for(version)
                    .map(|c| c.name.to_string())
                    .collect();
                (
                    table.name,
                    TableState {
                        columns,
                        rows: Vec::new(),
                    },
                )
            })
            .collect();
        Self {
            inner: Mutex::new(Inner {
                tables,
                failing_selects: HashSet::new(),
            }),
        }
    }

    /// Remove one column, as if its migration had not run
    pub fn without_column(self, table: &TableSchema, column: &str) -> Self {
        if let Ok(mut inner) = self.inner.lock() {
            if let Some(state) = inner.tables.get_mut(table.name) {
                state.columns.remove(column);
            }
        }
        self
    }

    /// Make selects against rows whose first key column equals `value` fail
    pub fn fail_selects(&self, table: &TableSchema, value: &str) {
        if let Ok(mut inner) = self.inner.lock() {
            inner.failing_selects.insert((table.name, value.to_string()));
        }
    }

    /// Number of stored rows in a table
    pub fn row_count(&self, table: &TableSchema) -> usize {
        self.inner
            .lock()
            .map(|inner| inner.tables.get(table.name).map_or(0, |t| t.rows.len()))
            .unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, StoreError> {
        self.inner
            .lock()
            .map_err(|_| StoreError::Backend("memory store lock poisoned".to_string()))
    }
}

fn check_columns(table: &TableSchema, state: &TableState, row: &Row) -> Result<(), StoreError> {
    match row.keys().find(|name| !state.columns.contains(*name)) {
        Some(missing) => Err(StoreError::MissingColumn {
            table: table.name.to_string(),
            column: missing.clone(),
        }),
        None => Ok(()),
    }
}

fn table_state<'a>(inner: &'a mut Inner, table: &TableSchema) -> Result<&'a mut TableState, StoreError> {
    inner
        .tables
        .get_mut(table.name)
        .ok_or_else(|| StoreError::Backend(format!("no such table: {}", table.name)))
}

#[async_trait]
impl RowStore for MemoryStore {
    async fn select(&self, table: &TableSchema, key: &RowKey) -> Result<Option<Row>, StoreError> {
        let mut inner = self.lock()?;
        if let Some((_, first)) = key.pairs().first() {
            if inner.failing_selects.contains(&(table.name, first.clone())) {
                return Err(StoreError::Backend(format!(
                    "simulated read failure on {}",
                    table.name
                )));
            }
        }
        let state = table_state(&mut inner, table)?;
        Ok(state.rows.iter().find(|row| key.matches(row)).cloned())
    }

    async fn upsert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let state = table_state(&mut inner, table)?;
        check_columns(table, state, row)?;

        let key = RowKey::of(table, row);
        match state.rows.iter_mut().find(|existing| key.matches(existing)) {
            Some(existing) => *existing = row.clone(),
            None => state.rows.push(row.clone()),
        }
        Ok(())
    }

    async fn insert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError> {
        let mut inner = self.lock()?;
        let state = table_state(&mut inner, table)?;
        check_columns(table, state, row)?;

        let key = RowKey::of(table, row);
        if state.rows.iter().any(|existing| key.matches(existing)) {
            return Err(StoreError::Conflict {
                table: table.name.to_string(),
            });
        }
        state.rows.push(row.clone());
        Ok(())
    }
}
