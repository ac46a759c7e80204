//! Volunteer handlers (admin only)

use crate::error::ApiError;
use crate::extractors::AdminUser;
use crate::AppState;
use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use volunteer_core::{import, split_full_name, Volunteer};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVolunteerRequest {
    #[serde(default)]
    first_name: String,
    #[serde(default)]
    last_name: String,
    /// Single-field name from older forms, split on the first space
    name: Option<String>,
    #[serde(default)]
    email: String,
}

impl CreateVolunteerRequest {
    fn names(&self) -> (String, String) {
        if !self.first_name.trim().is_empty() || !self.last_name.trim().is_empty() {
            return (self.first_name.clone(), self.last_name.clone());
        }
        self.name
            .as_deref()
            .map(split_full_name)
            .unwrap_or_default()
    }
}

pub async fn create(
    _admin: AdminUser,
    State(state): State<AppState>,
    Json(req): Json<CreateVolunteerRequest>,
) -> Result<(StatusCode, Json<Volunteer>), ApiError> {
    let (first_name, last_name) = req.names();
    let volunteer = state
        .store
        .create_volunteer(&first_name, &last_name, &req.email)
        .await?;
    Ok((StatusCode::CREATED, Json(volunteer)))
}

pub async fn list(
    _admin: AdminUser,
    State(state): State<AppState>,
) -> Result<Json<Vec<Volunteer>>, ApiError> {
    Ok(Json(state.store.list_volunteers().await?))
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    imported: usize,
    volunteers: Vec<Volunteer>,
}

/// Multipart upload of a comma-separated file, one volunteer per line.
/// Uses the `file` field, or the first field if none is named so. Lines
/// that are not valid UTF-8 are dropped with the other malformed lines.
pub async fn bulk_import(
    _admin: AdminUser,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ImportResponse>, ApiError> {
    let mut upload: Option<Vec<u8>> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e)))?
    {
        let is_file_field = field.name() == Some("file");
        if upload.is_some() && !is_file_field {
            continue;
        }
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Invalid upload: {}", e)))?;
        upload = Some(bytes.to_vec());
        if is_file_field {
            break;
        }
    }

    let upload = upload.ok_or_else(|| ApiError::bad_request("No file uploaded"))?;
    let volunteers = state
        .store
        .bulk_import_volunteers(import::decode_lines(&upload))
        .await?;

    Ok(Json(ImportResponse {
        imported: volunteers.len(),
        volunteers,
    }))
}
