//! JSON handlers for layouts, shelves, profile variables and pages

use std::collections::BTreeMap;

use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;

use super::{auth::CurrentActor, error::ApiError, AppState};
use crate::geometry::{Hotspot, ShelfLayout};
use crate::persist::repository::authorize;
use crate::persist::{CreatePage, CreatedPage, Loaded, Saved};
use crate::profile::{profiles, Namespace, ProfileInfo, ProfileKey};

#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    pub page: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ProfileQuery {
    pub profile: Option<String>,
}

fn required_page(page: Option<&str>) -> Result<String, ApiError> {
    match page.map(str::trim) {
        Some(page) if !page.is_empty() => Ok(page.to_string()),
        _ => Err(ApiError::bad_request("page key is required")),
    }
}

fn optional_profile(profile: Option<&str>) -> Result<Option<ProfileKey>, ApiError> {
    match profile.map(str::trim) {
        None | Some("") => Ok(None),
        Some(key) => key.parse().map(Some).map_err(ApiError::bad_request),
    }
}

fn required_profile(profile: Option<&str>) -> Result<ProfileKey, ApiError> {
    optional_profile(profile)?.ok_or_else(|| ApiError::bad_request("profile is required"))
}

fn namespace(raw: &str) -> Result<Namespace, ApiError> {
    raw.parse().map_err(ApiError::bad_request)
}

fn body_str<'a>(body: &'a Value, key: &str) -> Option<&'a str> {
    body.get(key).and_then(Value::as_str)
}

pub async fn get_layout(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Loaded<Hotspot>>, ApiError> {
    let Query(query) = query?;
    let page = required_page(query.page.as_deref())?;
    let profile = optional_profile(query.profile.as_deref())?;
    Ok(Json(state.repo.load_hotspot(&page, profile).await))
}

pub async fn save_layout(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Saved<Hotspot>>, ApiError> {
    authorize(actor.as_ref())?;
    let Json(body) = body?;
    let page = required_page(body_str(&body, "pageKey"))?;
    let profile = optional_profile(body_str(&body, "profile"))?;
    let saved = state
        .repo
        .save_hotspot(&page, profile, &body, actor.as_ref())
        .await?;
    Ok(Json(saved))
}

pub async fn get_shelf(
    State(state): State<AppState>,
    query: Result<Query<PageQuery>, QueryRejection>,
) -> Result<Json<Loaded<ShelfLayout>>, ApiError> {
    let Query(query) = query?;
    let page = required_page(query.page.as_deref())?;
    Ok(Json(state.repo.load_shelf(&page).await))
}

pub async fn save_shelf(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Saved<ShelfLayout>>, ApiError> {
    authorize(actor.as_ref())?;
    let Json(body) = body?;
    let page = required_page(body_str(&body, "pageKey"))?;
    let saved = state.repo.save_shelf(&page, &body, actor.as_ref()).await?;
    Ok(Json(saved))
}

pub async fn list_profiles() -> Json<Vec<ProfileInfo>> {
    Json(profiles())
}

pub async fn get_profile_layout(
    State(state): State<AppState>,
    Path(raw_namespace): Path<String>,
    query: Result<Query<ProfileQuery>, QueryRejection>,
) -> Result<Json<Loaded<BTreeMap<String, String>>>, ApiError> {
    let Query(query) = query?;
    let ns = namespace(&raw_namespace)?;
    let profile = required_profile(query.profile.as_deref())?;
    Ok(Json(state.repo.load_profile_vars(ns, profile).await))
}

pub async fn save_profile_layout(
    State(state): State<AppState>,
    Path(raw_namespace): Path<String>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<Saved<BTreeMap<String, String>>>, ApiError> {
    authorize(actor.as_ref())?;
    let Json(body) = body?;
    let ns = namespace(&raw_namespace)?;
    let profile = required_profile(body_str(&body, "profile"))?;
    let vars = body.get("vars").cloned().unwrap_or(Value::Null);
    let saved = state
        .repo
        .save_profile_vars(ns, profile, &vars, actor.as_ref())
        .await?;
    Ok(Json(saved))
}

pub async fn create_page(
    State(state): State<AppState>,
    CurrentActor(actor): CurrentActor,
    body: Result<Json<CreatePage>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedPage>), ApiError> {
    authorize(actor.as_ref())?;
    let Json(request) = body?;
    let created = state.repo.create_page(&request, actor.as_ref()).await?;
    Ok((StatusCode::CREATED, Json(created)))
}
