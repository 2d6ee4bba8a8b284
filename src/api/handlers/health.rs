use axum::{Json, extract::State, http::StatusCode};
use serde_json::json;

use crate::{api::response::ApiResponse, utils::app_config::AppConfig};

/// GET /health
pub async fn health(
    State(app_config): State<AppConfig>,
) -> (StatusCode, Json<ApiResponse<serde_json::Value>>) {
    (
        StatusCode::OK,
        Json(ApiResponse::success(json!({
            "status": "ok",
            "auth_mode": app_config.auth.mode(),
            "database": app_config.pool.is_some(),
        }))),
    )
}
