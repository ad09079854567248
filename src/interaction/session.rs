//! Editor session: selection, cancellable loads and explicit saves

use std::collections::BTreeMap;

use log::{debug, info};
use serde_json::Value;

use super::controller::{Controller, Draft, EditorSettings};
use crate::error::LayoutError;
use crate::geometry::default_shelf;
use crate::geometry::ShelfLayout;
use crate::identity::Actor;
use crate::persist::{LayoutRepository, Loaded};
use crate::profile::{self, Namespace, ProfileKey};

/// What the editor is currently showing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    pub page_key: String,
    pub profile: ProfileKey,
}

impl Selection {
    pub fn new(page_key: impl Into<String>, profile: ProfileKey) -> Self {
        Self {
            page_key: page_key.into(),
            profile,
        }
    }
}

/// Issued when a load starts; only the newest ticket may apply its result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadTicket(u64);

/// Everything a load produces for one selection
#[derive(Debug, Clone)]
pub struct LoadedDraft {
    pub shelf: Loaded<ShelfLayout>,
    pub nav: Loaded<BTreeMap<String, String>>,
}

impl LoadedDraft {
    pub fn warnings(&self) -> Vec<String> {
        [&self.shelf.warning, &self.nav.warning]
            .into_iter()
            .flatten()
            .cloned()
            .collect()
    }
}

/// Fetch the shelf and nav variables for a selection
pub async fn fetch_draft(repo: &LayoutRepository, selection: &Selection) -> LoadedDraft {
    let shelf = repo.load_shelf(&selection.page_key).await;
    let nav = repo
        .load_profile_vars(Namespace::Nav, selection.profile)
        .await;
    LoadedDraft { shelf, nav }
}

/// One admin's editing session
#[derive(Debug, Clone)]
pub struct EditorSession {
    selection: Selection,
    generation: u64,
    controller: Controller,
}

impl EditorSession {
    pub fn new(settings: EditorSettings, selection: Selection) -> Self {
        let nav = profile::defaults(Namespace::Nav, selection.profile);
        let controller = Controller::new(settings, default_shelf(), selection.profile, nav);
        Self {
            selection,
            generation: 0,
            controller,
        }
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn controller_mut(&mut self) -> &mut Controller {
        &mut self.controller
    }

    pub fn draft(&self) -> &Draft {
        self.controller.draft()
    }

    /// Change the selection; any load still in flight becomes stale
    pub fn select(&mut self, selection: Selection) -> LoadTicket {
        self.selection = selection;
        self.begin_load()
    }

    pub fn begin_load(&mut self) -> LoadTicket {
        self.generation += 1;
        LoadTicket(self.generation)
    }

    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        ticket.0 == self.generation
    }

    /// Apply a load result; returns false and discards it when superseded
    pub fn finish_load(&mut self, ticket: LoadTicket, loaded: LoadedDraft) -> bool {
        if !self.is_current(ticket) {
            debug!(
                "discarding stale load {} (current {})",
                ticket.0, self.generation
            );
            return false;
        }
        self.controller.replace_draft(
            loaded.shelf.layout,
            self.selection.profile,
            loaded.nav.layout,
        );
        true
    }

    /// Load the current selection and apply it
    pub async fn reload(&mut self, repo: &LayoutRepository) -> Vec<String> {
        let ticket = self.begin_load();
        let loaded = fetch_draft(repo, &self.selection).await;
        let warnings = loaded.warnings();
        self.finish_load(ticket, loaded);
        warnings
    }

    /// Persist the draft: the shelf, then the nav variables.
    ///
    /// Returns any schema warnings reported by the saves.
    pub async fn save(
        &mut self,
        repo: &LayoutRepository,
        actor: Option<&Actor>,
    ) -> Result<Vec<String>, LayoutError> {
        let draft = self.controller.draft().clone();
        let shelf_raw =
            serde_json::to_value(&draft.shelf).map_err(|e| LayoutError::invalid("shelf", e.to_string()))?;
        let nav_raw: serde_json::Map<String, Value> = draft
            .nav
            .into_iter()
            .map(|(name, value)| (name, Value::String(value)))
            .collect();

        let shelf = repo
            .save_shelf(&self.selection.page_key, &shelf_raw, actor)
            .await?;
        let nav = repo
            .save_profile_vars(
                Namespace::Nav,
                draft.nav_profile,
                &Value::Object(nav_raw),
                actor,
            )
            .await?;

        info!("saved editor draft for {}", self.selection.page_key);
        self.controller.mark_saved();
        Ok([shelf.warning, nav.warning].into_iter().flatten().collect())
    }
}
