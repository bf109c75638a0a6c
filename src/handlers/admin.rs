use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::auth;
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

// POST /admin/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(body): Json<LoginRequest>,
) -> Result<Json<serde_json::Value>, AppError> {
    let mut missing = vec![];
    if body.username.is_empty() {
        missing.push("username".to_string());
    }
    if body.password.is_empty() {
        missing.push("password".to_string());
    }
    if !missing.is_empty() {
        return Err(AppError::Validation(missing));
    }

    let cfg = &state.config;
    if cfg.admin_username.is_empty()
        || body.username != cfg.admin_username
        || body.password != cfg.admin_password
    {
        return Err(AppError::Unauthorized);
    }

    let token = auth::issue_token(&cfg.jwt_secret, &body.username)?;
    Ok(Json(serde_json::json!({ "token": token })))
}
