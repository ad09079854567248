//! JSON HTTP surface over the persistence adapter

pub mod api;
pub mod auth;
pub mod error;

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use log::info;
use tokio::net::TcpListener;

use crate::identity::IdentityProvider;
use crate::persist::LayoutRepository;
use crate::store::RowStore;

pub use error::ApiError;

#[derive(Clone)]
pub struct AppState {
    pub repo: LayoutRepository,
    pub identity: Arc<dyn IdentityProvider>,
}

impl AppState {
    pub fn new(store: Arc<dyn RowStore>, identity: Arc<dyn IdentityProvider>) -> Self {
        Self {
            repo: LayoutRepository::new(store),
            identity,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/layout", get(api::get_layout).post(api::save_layout))
        .route("/api/shelf", get(api::get_shelf).post(api::save_shelf))
        .route("/api/profiles", get(api::list_profiles))
        .route(
            "/api/profile-layout/:namespace",
            get(api::get_profile_layout).post(api::save_profile_layout),
        )
        .route("/api/pages", post(api::create_page))
        .with_state(state)
}

/// Serve the API on an already-bound listener until the task is dropped
pub async fn serve(listener: TcpListener, state: AppState) -> std::io::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("layout-studio listening on http://{}", addr);
    }
    axum::serve(listener, router(state).into_make_service()).await
}
