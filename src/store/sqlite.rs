//! SQLite row store
//!
//! Column presence is read from `PRAGMA table_info` before every write, so
//! a database created from an older schema reports
//! [`StoreError::MissingColumn`] instead of a free-form SQL error.

use std::collections::HashSet;

use async_trait::async_trait;
use log::debug;
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{QueryBuilder, Row as _, Sqlite, SqlitePool};

use super::schema::{ColumnKind, SchemaVersion, TableSchema, ALL_TABLES};
use super::{Row, RowKey, RowStore, StoreError};

/// Row store backed by a SQLite database
#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (creating if needed) the database at `url`
    pub async fn connect(url: &str) -> Result<Self, StoreError> {
        let options: SqliteConnectOptions = url.parse::<SqliteConnectOptions>()?.create_if_missing(true);
        // A single connection keeps `sqlite::memory:` databases coherent.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Create every table at `version` if it does not exist yet
    pub async fn create_schema(&self, version: SchemaVersion) -> Result<(), StoreError> {
        for table in ALL_TABLES {
            let columns: Vec<String> = table
                .columns_for(version)
                .map(|c| {
                    if table.is_key(c.name) {
                        format!("{} TEXT NOT NULL", c.name)
                    } else {
                        format!("{} {}", c.name, c.kind.sql_type())
                    }
                })
                .collect();
            let sql = format!(
                "CREATE TABLE IF NOT EXISTS {} ({}, PRIMARY KEY ({}))",
                table.name,
                columns.join(", "),
                table.key.join(", ")
            );
            sqlx::query(&sql).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Add any missing optional columns (the pending migration)
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for table in ALL_TABLES {
            let present = self.existing_columns(&table).await?;
            for column in table.columns.iter().filter(|c| !present.contains(c.name)) {
                debug!("adding column {}.{}", table.name, column.name);
                let sql = format!(
                    "ALTER TABLE {} ADD COLUMN {} {}",
                    table.name,
                    column.name,
                    column.kind.sql_type()
                );
                sqlx::query(&sql).execute(&self.pool).await?;
            }
        }
        Ok(())
    }

    async fn existing_columns(&self, table: &TableSchema) -> Result<HashSet<String>, StoreError> {
        let rows = sqlx::query(&format!("PRAGMA table_info({})", table.name))
            .fetch_all(&self.pool)
            .await?;
        rows.iter()
            .map(|row| row.try_get::<String, _>("name").map_err(StoreError::from))
            .collect()
    }

    async fn checked_columns<'r>(
        &self,
        table: &TableSchema,
        row: &'r Row,
    ) -> Result<Vec<(&'r String, &'r Value, ColumnKind)>, StoreError> {
        let present = self.existing_columns(table).await?;
        if present.is_empty() {
            return Err(StoreError::Backend(format!("no such table: {}", table.name)));
        }
        row.iter()
            .map(|(name, value)| {
                let kind = table.column(name).map(|c| c.kind);
                match kind {
                    Some(kind) if present.contains(name) => Ok((name, value, kind)),
                    _ => Err(StoreError::MissingColumn {
                        table: table.name.to_string(),
                        column: name.clone(),
                    }),
                }
            })
            .collect()
    }

    fn insert_builder<'r>(
        table: &TableSchema,
        columns: &[(&'r String, &'r Value, ColumnKind)],
    ) -> QueryBuilder<'r, Sqlite> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("INSERT INTO {} (", table.name));
        let mut names = builder.separated(", ");
        for (name, _, _) in columns {
            names.push(name.as_str());
        }
        builder.push(") VALUES (");
        let mut values = builder.separated(", ");
        for (_, value, kind) in columns {
            match kind {
                ColumnKind::Real => {
                    values.push_bind(value.as_f64());
                }
                ColumnKind::Text => {
                    values.push_bind(value.as_str().map(str::to_string));
                }
                ColumnKind::Json => {
                    let encoded = match value {
                        Value::Null => None,
                        other => Some(other.to_string()),
                    };
                    values.push_bind(encoded);
                }
            }
        }
        builder.push(")");
        builder
    }
}

fn decode_row(table: &TableSchema, row: &SqliteRow) -> Row {
    let mut decoded = Row::new();
    for column in table.columns {
        let value = match column.kind {
            ColumnKind::Real => match row.try_get::<Option<f64>, _>(column.name) {
                Ok(Some(number)) => serde_json::Number::from_f64(number)
                    .map(Value::Number)
                    .unwrap_or(Value::Null),
                Ok(None) => Value::Null,
                // Column absent from an older schema
                Err(_) => continue,
            },
            ColumnKind::Text => match row.try_get::<Option<String>, _>(column.name) {
                Ok(text) => text.map(Value::String).unwrap_or(Value::Null),
                Err(_) => continue,
            },
            ColumnKind::Json => match row.try_get::<Option<String>, _>(column.name) {
                Ok(Some(text)) => serde_json::from_str(&text).unwrap_or(Value::Null),
                Ok(None) => Value::Null,
                Err(_) => continue,
            },
        };
        decoded.insert(column.name.to_string(), value);
    }
    decoded
}

#[async_trait]
impl RowStore for SqliteStore {
    async fn select(&self, table: &TableSchema, key: &RowKey) -> Result<Option<Row>, StoreError> {
        let mut builder = QueryBuilder::<Sqlite>::new(format!("SELECT * FROM {} WHERE ", table.name));
        let mut conditions = builder.separated(" AND ");
        for (column, value) in key.pairs() {
            conditions.push(format!("{} = ", column));
            conditions.push_bind_unseparated(value.clone());
        }
        let row = builder.build().fetch_optional(&self.pool).await?;
        Ok(row.map(|row| decode_row(table, &row)))
    }

    async fn upsert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError> {
        let columns = self.checked_columns(table, row).await?;
        let mut builder = Self::insert_builder(table, &columns);
        builder.push(format!(" ON CONFLICT ({}) ", table.key.join(", ")));

        let updates: Vec<String> = columns
            .iter()
            .filter(|(name, _, _)| !table.is_key(name))
            .map(|(name, _, _)| format!("{name} = excluded.{name}"))
            .collect();
        if updates.is_empty() {
            builder.push("DO NOTHING");
        } else {
            builder.push("DO UPDATE SET ");
            builder.push(updates.join(", "));
        }
        builder.build().execute(&self.pool).await?;
        Ok(())
    }

    async fn insert(&self, table: &TableSchema, row: &Row) -> Result<(), StoreError> {
        let columns = self.checked_columns(table, row).await?;
        let mut builder = Self::insert_builder(table, &columns);
        match builder.build().execute(&self.pool).await {
            Ok(_) => Ok(()),
            Err(sqlx::Error::Database(db)) if db.is_unique_violation() => {
                Err(StoreError::Conflict {
                    table: table.name.to_string(),
                })
            }
            Err(other) => Err(other.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::schema::{PAGES, SHELF_LAYOUTS};
    use serde_json::json;

    async fn memory_store(version: SchemaVersion) -> SqliteStore {
        let store = SqliteStore::connect("sqlite::memory:").await.unwrap();
        store.create_schema(version).await.unwrap();
        store
    }

    fn shelf_row(templates: bool) -> Row {
        let mut row = Row::new();
        row.insert("page_key".into(), json!("poetry"));
        row.insert("books".into(), json!([{"key": "a", "x": 20}]));
        row.insert("updated_by".into(), json!("admin-1"));
        if templates {
            row.insert("templates".into(), json!({"gold": {}}));
        }
        row
    }

    #[tokio::test]
    async fn test_upsert_and_select() {
        let store = memory_store(SchemaVersion::Current).await;
        store.upsert(&SHELF_LAYOUTS, &shelf_row(true)).await.unwrap();
        let mut changed = shelf_row(true);
        changed.insert("updated_by".into(), json!("admin-2"));
        store.upsert(&SHELF_LAYOUTS, &changed).await.unwrap();

        let key = RowKey::new().with("page_key", "poetry");
        let row = store.select(&SHELF_LAYOUTS, &key).await.unwrap().unwrap();
        assert_eq!(row["updated_by"], json!("admin-2"));
        assert_eq!(row["books"], json!([{"key": "a", "x": 20}]));
        assert_eq!(row["admin_logo"], Value::Null);
    }

    #[tokio::test]
    async fn test_legacy_schema_reports_missing_column() {
        let store = memory_store(SchemaVersion::Legacy).await;
        let err = store.upsert(&SHELF_LAYOUTS, &shelf_row(true)).await.unwrap_err();
        assert_eq!(
            err,
            StoreError::MissingColumn {
                table: "shelf_layouts".into(),
                column: "templates".into()
            }
        );
        store.upsert(&SHELF_LAYOUTS, &shelf_row(false)).await.unwrap();

        let key = RowKey::new().with("page_key", "poetry");
        let row = store.select(&SHELF_LAYOUTS, &key).await.unwrap().unwrap();
        assert!(!row.contains_key("templates"));
    }

    #[tokio::test]
    async fn test_migrate_adds_optional_columns() {
        let store = memory_store(SchemaVersion::Legacy).await;
        store.migrate().await.unwrap();
        store.upsert(&SHELF_LAYOUTS, &shelf_row(true)).await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_conflict() {
        let store = memory_store(SchemaVersion::Current).await;
        let mut row = Row::new();
        row.insert("page_key".into(), json!("poems"));
        row.insert("label".into(), json!("Poems"));
        store.insert(&PAGES, &row).await.unwrap();
        let err = store.insert(&PAGES, &row).await.unwrap_err();
        assert!(matches!(err, StoreError::Conflict { .. }));
    }
}
