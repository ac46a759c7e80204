//! Service hours handlers

use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::handlers::raw_text;
use crate::AppState;
use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use serde_json::Value;
use volunteer_core::{HoursEntry, NewHoursEntry};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogHoursRequest {
    #[serde(default, alias = "volunteerEmail")]
    email: String,
    event_id: Option<String>,
    hours: Option<Value>,
    notes: Option<String>,
}

pub async fn log(
    State(state): State<AppState>,
    Json(req): Json<LogHoursRequest>,
) -> Result<(StatusCode, Json<HoursEntry>), ApiError> {
    let entry = state
        .store
        .log_hours(NewHoursEntry {
            volunteer_email: req.email,
            event_id: req.event_id,
            hours: raw_text(req.hours).unwrap_or_default(),
            notes: req.notes,
        })
        .await?;
    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<HoursEntry>>, ApiError> {
    Ok(Json(state.store.list_hours().await?))
}
