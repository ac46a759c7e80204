//! Event handlers

use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::handlers::raw_text;
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::Value;
use volunteer_core::{Event, NewEvent};

#[derive(Debug, Deserialize)]
pub struct CreateEventRequest {
    #[serde(default)]
    title: String,
    date: Option<String>,
    location: Option<String>,
    capacity: Option<Value>,
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateEventRequest>,
) -> Result<(StatusCode, Json<Event>), ApiError> {
    let event = state
        .store
        .create_event(NewEvent {
            title: req.title,
            date: req.date,
            location: req.location,
            capacity: raw_text(req.capacity),
        })
        .await?;
    Ok((StatusCode::CREATED, Json(event)))
}

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<Event>>, ApiError> {
    Ok(Json(state.store.list_events().await?))
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    email: String,
}

pub async fn register(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<Event>, ApiError> {
    let event = state.store.register_for_event(&id, &req.email).await?;
    Ok(Json(event))
}
