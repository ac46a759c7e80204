//! Admin login and logout

use crate::extractors::SESSION_COOKIE;
use crate::services::auth::SESSION_TTL_HOURS;
use crate::AppState;
use axum::{
    extract::State,
    http::header,
    response::{IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

/// Failed logins answer 200 with `success: false`, which is what the
/// bundled frontend expects.
pub async fn login(State(state): State<AppState>, Json(req): Json<LoginRequest>) -> Response {
    match state.auth_service.login(&req.username, &req.password) {
        Ok(token) => {
            info!("Admin login: {}", req.username);
            let cookie = format!(
                "{}={}; Path=/; HttpOnly; SameSite=Lax; Max-Age={}",
                SESSION_COOKIE,
                token,
                SESSION_TTL_HOURS * 3600
            );
            (
                [(header::SET_COOKIE, cookie)],
                Json(json!({
                    "success": true,
                    "redirect": "/admin.html",
                    "token": token,
                })),
            )
                .into_response()
        }
        Err(e) => {
            warn!("Login failed for {:?}: {}", req.username, e);
            Json(json!({
                "success": false,
                "message": "Invalid credentials",
            }))
            .into_response()
        }
    }
}

pub async fn logout() -> Response {
    let cookie = format!(
        "{}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0",
        SESSION_COOKIE
    );
    ([(header::SET_COOKIE, cookie)], Redirect::to("/")).into_response()
}
