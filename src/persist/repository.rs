//! Load/save operations for every layout family

use std::collections::BTreeMap;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::{json, Value};

use super::pages::{validate_page_key, CreatePage, CreatedPage, PageRecord};
use super::{LayoutSource, Loaded, Saved};
use crate::error::LayoutError;
use crate::geometry::defaults::{default_hotspot, default_shelf};
use crate::geometry::{Hotspot, Normalize, ShelfLayout};
use crate::identity::Actor;
use crate::profile::{self, Namespace, ProfileKey};
use crate::store::schema::{PAGES, PAGE_LAYOUTS, PROFILE_LAYOUTS, SHELF_LAYOUTS};
use crate::store::{Row, RowKey, RowStore, StoreError, TableSchema};

/// Page-level rows use an empty profile key
const NO_PROFILE: &str = "";

/// Require an authenticated administrator
pub fn authorize(actor: Option<&Actor>) -> Result<&Actor, LayoutError> {
    match actor {
        None => Err(LayoutError::Unauthorized),
        Some(actor) if !actor.is_admin => Err(LayoutError::Forbidden),
        Some(actor) => Ok(actor),
    }
}

fn validate_hotspot(hotspot: &Hotspot) -> Result<(), LayoutError> {
    if hotspot.label.is_empty() {
        return Err(LayoutError::invalid("label", "must not be empty"));
    }
    if !hotspot.target_path.starts_with('/') {
        return Err(LayoutError::invalid("targetPath", "must start with '/'"));
    }
    Ok(())
}

fn validate_shelf(shelf: &ShelfLayout) -> Result<(), LayoutError> {
    for (index, book) in shelf.books.iter().enumerate() {
        if book.label.is_empty() {
            return Err(LayoutError::invalid(
                format!("books[{}].label", index),
                "must not be empty",
            ));
        }
        if !book.target_path.starts_with('/') {
            return Err(LayoutError::invalid(
                format!("books[{}].targetPath", index),
                "must start with '/'",
            ));
        }
    }
    Ok(())
}

/// Raw hotspot input from a stored row, accepting the flat legacy columns
fn hotspot_raw(row: &Row) -> Value {
    match row.get("hotspot") {
        Some(nested @ Value::Object(_)) => nested.clone(),
        _ => json!({
            "xPercent": row.get("x_percent").cloned().unwrap_or(Value::Null),
            "yPercent": row.get("y_percent").cloned().unwrap_or(Value::Null),
            "label": row.get("label").cloned().unwrap_or(Value::Null),
            "targetPath": row.get("target_path").cloned().unwrap_or(Value::Null),
        }),
    }
}

fn shelf_raw(row: &Row) -> Value {
    json!({
        "books": row.get("books").cloned().unwrap_or(Value::Null),
        "templates": row.get("templates").cloned().unwrap_or(Value::Null),
        "adminLogo": row.get("admin_logo").cloned().unwrap_or(Value::Null),
    })
}

fn missing_columns_warning(table: &TableSchema, dropped: &[String]) -> Option<String> {
    match dropped {
        [] => None,
        [column] => Some(format!(
            "column '{}' is missing from {}; saved without it until the schema is migrated",
            column, table.name
        )),
        columns => Some(format!(
            "columns '{}' are missing from {}; saved without them until the schema is migrated",
            columns.join("', '"),
            table.name
        )),
    }
}

fn to_value<T: serde::Serialize>(entity: &T) -> Result<Value, LayoutError> {
    serde_json::to_value(entity).map_err(|e| StoreError::Backend(e.to_string()).into())
}

/// Persistence adapter over a [`RowStore`]
#[derive(Clone)]
pub struct LayoutRepository {
    store: Arc<dyn RowStore>,
}

impl LayoutRepository {
    pub fn new(store: Arc<dyn RowStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RowStore> {
        &self.store
    }

    /// Upsert, dropping each optional column the store reports missing.
    ///
    /// Only the reported column is removed before the retry, so optional
    /// columns the store does have keep their values. Returns the warning to
    /// surface when any column was dropped.
    async fn write(&self, table: &TableSchema, mut row: Row) -> Result<Option<String>, LayoutError> {
        let mut dropped: Vec<String> = Vec::new();
        loop {
            let result = self.store.upsert(table, &row).await;
            match result {
                Ok(()) => break,
                Err(StoreError::MissingColumn { column, .. })
                    if table.is_optional(&column) && row.contains_key(&column) =>
                {
                    warn!(
                        "{} is missing optional column '{}', retrying without it",
                        table.name, column
                    );
                    row.remove(&column);
                    dropped.push(column);
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(missing_columns_warning(table, &dropped))
    }

    // ── Page hotspots ───────────────────────────────────────────────

    /// Load the hotspot for a page, preferring the profile-specific row
    pub async fn load_hotspot(&self, page_key: &str, profile: Option<ProfileKey>) -> Loaded<Hotspot> {
        let fallback = default_hotspot(page_key);
        let mut warning = None;

        if let Some(profile) = profile {
            let key = RowKey::new()
                .with("page_key", page_key)
                .with("profile_key", profile.as_str());
            match self.store.select(&PAGE_LAYOUTS, &key).await {
                Ok(Some(row)) => {
                    let layout = Hotspot::normalize(&hotspot_raw(&row), &fallback);
                    return Loaded::new(layout, LayoutSource::StoredProfile);
                }
                Ok(None) => debug!("no {} row for {}/{}", PAGE_LAYOUTS.name, page_key, profile),
                Err(err) => {
                    warn!("profile hotspot load failed for {}/{}: {}", page_key, profile, err);
                    warning = Some(err.to_string());
                }
            }
        }

        let key = RowKey::new()
            .with("page_key", page_key)
            .with("profile_key", NO_PROFILE);
        match self.store.select(&PAGE_LAYOUTS, &key).await {
            Ok(Some(row)) => {
                let layout = Hotspot::normalize(&hotspot_raw(&row), &fallback);
                let source = if profile.is_some() {
                    LayoutSource::StoredFallback
                } else {
                    LayoutSource::Stored
                };
                Loaded::new(layout, source).with_warning(warning)
            }
            Ok(None) => Loaded::new(fallback, LayoutSource::Default).with_warning(warning),
            Err(err) => {
                warn!("hotspot load failed for {}: {}", page_key, err);
                Loaded::new(fallback, LayoutSource::Default).with_warning(Some(err.to_string()))
            }
        }
    }

    /// Validate and store a hotspot
    pub async fn save_hotspot(
        &self,
        page_key: &str,
        profile: Option<ProfileKey>,
        raw: &Value,
        actor: Option<&Actor>,
    ) -> Result<Saved<Hotspot>, LayoutError> {
        let actor = authorize(actor)?;
        if page_key.trim().is_empty() {
            return Err(LayoutError::invalid("pageKey", "must not be empty"));
        }
        if let Some(path) = raw.get("targetPath").and_then(Value::as_str) {
            if !path.trim().starts_with('/') {
                return Err(LayoutError::invalid("targetPath", "must start with '/'"));
            }
        }

        let current = self.load_hotspot(page_key, profile).await.layout;
        let mut hotspot = Hotspot::normalize(raw, &current);
        hotspot.key = page_key.to_string();
        validate_hotspot(&hotspot)?;

        let mut row = Row::new();
        row.insert("page_key".into(), json!(page_key));
        row.insert(
            "profile_key".into(),
            json!(profile.map_or(NO_PROFILE, ProfileKey::as_str)),
        );
        row.insert("hotspot".into(), to_value(&hotspot)?);
        row.insert("x_percent".into(), json!(hotspot.x_percent));
        row.insert("y_percent".into(), json!(hotspot.y_percent));
        row.insert("label".into(), json!(hotspot.label));
        row.insert("target_path".into(), json!(hotspot.target_path));
        row.insert("updated_by".into(), json!(actor.id));

        let warning = self.write(&PAGE_LAYOUTS, row).await?;
        info!("saved hotspot for {} ({:?}) by {}", page_key, profile, actor.id);
        Ok(Saved::new(hotspot, warning))
    }

    // ── Shelves ─────────────────────────────────────────────────────

    /// Load a shelf page layout
    pub async fn load_shelf(&self, page_key: &str) -> Loaded<ShelfLayout> {
        let fallback = default_shelf();
        let key = RowKey::new().with("page_key", page_key);
        match self.store.select(&SHELF_LAYOUTS, &key).await {
            Ok(Some(row)) => Loaded::new(
                ShelfLayout::normalize(&shelf_raw(&row), &fallback),
                LayoutSource::Stored,
            ),
            Ok(None) => Loaded::new(fallback, LayoutSource::Default),
            Err(err) => {
                warn!("shelf load failed for {}: {}", page_key, err);
                Loaded::new(fallback, LayoutSource::Default).with_warning(Some(err.to_string()))
            }
        }
    }

    /// Validate and store a shelf layout
    pub async fn save_shelf(
        &self,
        page_key: &str,
        raw: &Value,
        actor: Option<&Actor>,
    ) -> Result<Saved<ShelfLayout>, LayoutError> {
        let actor = authorize(actor)?;
        if page_key.trim().is_empty() {
            return Err(LayoutError::invalid("pageKey", "must not be empty"));
        }
        let current = self.load_shelf(page_key).await.layout;
        let shelf = ShelfLayout::normalize(raw, &current);
        validate_shelf(&shelf)?;

        let warning = self.write_shelf(page_key, &shelf, &actor.id).await?;
        info!("saved shelf {} ({} books) by {}", page_key, shelf.books.len(), actor.id);
        Ok(Saved::new(shelf, warning))
    }

    async fn write_shelf(
        &self,
        page_key: &str,
        shelf: &ShelfLayout,
        actor_id: &str,
    ) -> Result<Option<String>, LayoutError> {
        let mut row = Row::new();
        row.insert("page_key".into(), json!(page_key));
        row.insert("books".into(), to_value(&shelf.books)?);
        row.insert("templates".into(), to_value(&shelf.templates)?);
        row.insert("admin_logo".into(), to_value(&shelf.admin_logo)?);
        row.insert("updated_by".into(), json!(actor_id));
        self.write(&SHELF_LAYOUTS, row).await
    }

    // ── Profile variables ───────────────────────────────────────────

    /// Load a profile's variable map for one namespace
    pub async fn load_profile_vars(
        &self,
        ns: Namespace,
        profile: ProfileKey,
    ) -> Loaded<BTreeMap<String, String>> {
        let key = RowKey::new()
            .with("namespace", ns.as_str())
            .with("profile_key", profile.as_str());
        match self.store.select(&PROFILE_LAYOUTS, &key).await {
            Ok(Some(row)) => {
                let raw = row.get("vars").cloned().unwrap_or(Value::Null);
                Loaded::new(profile::merge(ns, profile, &raw), LayoutSource::StoredProfile)
            }
            Ok(None) => Loaded::new(profile::defaults(ns, profile), LayoutSource::Default),
            Err(err) => {
                warn!("{} vars load failed for {}: {}", ns, profile, err);
                Loaded::new(profile::defaults(ns, profile), LayoutSource::Default)
                    .with_warning(Some(err.to_string()))
            }
        }
    }

    /// Merge and store a profile's variable map
    pub async fn save_profile_vars(
        &self,
        ns: Namespace,
        profile: ProfileKey,
        raw: &Value,
        actor: Option<&Actor>,
    ) -> Result<Saved<BTreeMap<String, String>>, LayoutError> {
        let actor = authorize(actor)?;
        if !raw.is_object() {
            return Err(LayoutError::invalid("vars", "must be an object"));
        }
        let current = self.load_profile_vars(ns, profile).await.layout;
        // Start from the stored values so a partial update keeps the rest.
        let mut combined: serde_json::Map<String, Value> = current
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();
        if let Some(overrides) = raw.as_object() {
            combined.extend(overrides.iter().map(|(k, v)| (k.clone(), v.clone())));
        }
        let vars = profile::merge(ns, profile, &Value::Object(combined));

        let mut row = Row::new();
        row.insert("namespace".into(), json!(ns.as_str()));
        row.insert("profile_key".into(), json!(profile.as_str()));
        row.insert("vars".into(), to_value(&vars)?);
        row.insert("updated_by".into(), json!(actor.id));
        let warning = self.write(&PROFILE_LAYOUTS, row).await?;
        info!("saved {} vars for {} by {}", ns, profile, actor.id);
        Ok(Saved::new(vars, warning))
    }

    // ── Pages ───────────────────────────────────────────────────────

    /// Create a page, optionally cloning another shelf's geometry.
    ///
    /// The clone keeps every geometry field verbatim and empties labels,
    /// target paths and media URLs. The cloned shelf is written before the
    /// page row, so a failed clone leaves the key free for a retry.
    pub async fn create_page(
        &self,
        request: &CreatePage,
        actor: Option<&Actor>,
    ) -> Result<CreatedPage, LayoutError> {
        let actor = authorize(actor)?;
        let key = request.key.trim();
        validate_page_key(key)?;

        let by_key = RowKey::new().with("page_key", key);
        if self.store.select(&SHELF_LAYOUTS, &by_key).await?.is_some()
            || self.store.select(&PAGES, &by_key).await?.is_some()
        {
            return Err(LayoutError::Conflict {
                key: key.to_string(),
            });
        }

        let source = match request.clone_from.as_deref().map(str::trim) {
            Some(source_key) if !source_key.is_empty() => {
                let loaded = self.load_shelf(source_key).await;
                if loaded.source == LayoutSource::Default {
                    return Err(LayoutError::invalid(
                        "cloneFrom",
                        format!("no stored layout for '{}'", source_key),
                    ));
                }
                Some(loaded.layout)
            }
            _ => None,
        };

        let label = match request.label.as_deref().map(str::trim) {
            Some(label) if !label.is_empty() => label.to_string(),
            _ => default_hotspot(key).label,
        };
        let page = PageRecord {
            key: key.to_string(),
            label,
            path: format!("/{}", key),
        };

        let mut warning = None;
        if let Some(source) = source {
            let cloned = ShelfLayout {
                books: source.books.iter().map(|b| b.geometry_only()).collect(),
                ..source
            };
            warning = self.write_shelf(key, &cloned, &actor.id).await?;
            info!(
                "cloned geometry from {:?} into {}",
                request.clone_from, key
            );
        }

        let mut row = Row::new();
        row.insert("page_key".into(), json!(page.key));
        row.insert("label".into(), json!(page.label));
        row.insert("path".into(), json!(page.path));
        row.insert("created_by".into(), json!(actor.id));
        match self.store.insert(&PAGES, &row).await {
            Ok(()) => {}
            Err(StoreError::Conflict { .. }) => {
                return Err(LayoutError::Conflict {
                    key: key.to_string(),
                })
            }
            Err(err) => return Err(err.into()),
        }
        info!("created page {} by {}", key, actor.id);
        Ok(CreatedPage {
            created: true,
            page,
            warning,
        })
    }
}
