//! Volunteer Hub Server
//!
//! HTTP front for the record store: admin login, volunteer and event
//! management, event registration, hours logging and the static frontend.

pub mod config;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod services;
pub mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use services::AuthService;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;
use volunteer_core::RecordStore;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub auth_service: Arc<AuthService>,
}

/// Build the full router. Unknown paths fall through to the static
/// directory and then to its `index.html`.
pub fn build_router(state: AppState, static_dir: &Path) -> Router {
    let index_path = static_dir.join("index.html");

    Router::new()
        .route("/health", get(handlers::health))
        .merge(api_routes())
        .fallback_service(ServeDir::new(static_dir).fallback(ServeFile::new(index_path)))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(handlers::auth::login))
        .route("/logout", get(handlers::auth::logout))
        .route("/add-volunteers", post(handlers::volunteers::create))
        .route("/volunteers", get(handlers::volunteers::list))
        .route("/volunteers/import", post(handlers::volunteers::bulk_import))
        .route("/add-event", post(handlers::events::create))
        .route("/events", get(handlers::events::list))
        .route("/events/:id/register", post(handlers::events::register))
        .route(
            "/hours",
            get(handlers::hours::list).post(handlers::hours::log),
        )
}
