use axum::{Extension, Json, extract::State, http::StatusCode};
use serde::Deserialize;
use serde_json::json;

use crate::{
    api::{error::ApiError, response::ApiResponse},
    auth::token::Claims,
    utils::app_config::AppConfig,
};

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: Option<String>,
    /// Older clients send the login name as `account`
    pub account: Option<String>,
    pub password: Option<String>,
}

/// POST /api/auth/login
pub async fn login(
    State(app_config): State<AppConfig>,
    Json(body): Json<LoginRequest>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    let username = body
        .username
        .filter(|u| !u.is_empty())
        .or(body.account)
        .filter(|u| !u.is_empty());
    let password = body.password.filter(|p| !p.is_empty());

    let (Some(username), Some(password)) = (username, password) else {
        return Err(ApiError::bad_request("Missing username or password"));
    };

    let outcome = app_config
        .auth
        .login(&username, &password)
        .map_err(|e| {
            tracing::error!("Login error: {}", e);
            ApiError::internal_error("Login failed")
        })?
        .ok_or_else(|| ApiError::unauthorized("Invalid credentials"))?;

    let json = serde_json::to_value(&outcome)
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize: {}", e)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(json))))
}

/// POST /api/auth/logout - tokens are stateless, the client discards its copy
pub async fn logout() -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({ "message": "Logout successful" }))),
    )
}

/// GET /api/auth/info
pub async fn info(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    let info = app_config
        .auth
        .user_info(&claims)
        .map_err(|e| ApiError::database_error(format!("Failed to load user: {}", e)))?;

    let json = serde_json::to_value(&info)
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize: {}", e)))?;

    Ok((StatusCode::OK, Json(ApiResponse::success(json))))
}
