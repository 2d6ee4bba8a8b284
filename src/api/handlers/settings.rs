use axum::{extract::State, http::StatusCode, Extension, Json};

use crate::{
    action_router::{ActionRouterInput, ActionRouterOutput},
    api::{error::ApiError, middleware::auth::require_permission, response::ApiResponse},
    auth::{roles::Permission, token::Claims},
    settings::{
        processor_enums::{SettingsProcessorInput, SettingsProcessorOutput},
        store::SettingsError,
    },
    utils::app_config::AppConfig,
};

type HandlerResult = Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError>;

async fn run(app_config: AppConfig, input: SettingsProcessorInput) -> Result<SettingsProcessorOutput, ApiError> {
    match ActionRouterInput::Settings(input).process(app_config).await {
        Ok(ActionRouterOutput::Settings(output)) => Ok(output),
        Ok(_) => Err(ApiError::internal_error("Unexpected response type")),
        Err(e) if e.is::<SettingsError>() => Err(ApiError::bad_request(e.to_string())),
        Err(e) => {
            tracing::error!("Settings operation failed: {}", e);
            Err(ApiError::internal_error(format!("Settings operation failed: {}", e)))
        }
    }
}

/// GET /api/settings/schema
pub async fn get_schema(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> HandlerResult {
    require_permission(&claims, Permission::Settings)?;

    match run(app_config, SettingsProcessorInput::GetSchema).await? {
        SettingsProcessorOutput::GetSchema(schema) => {
            Ok((StatusCode::OK, Json(ApiResponse::success(schema))))
        }
        _ => Err(ApiError::internal_error("Unexpected response type")),
    }
}

/// GET /api/settings/values
pub async fn get_values(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> HandlerResult {
    require_permission(&claims, Permission::Settings)?;

    match run(app_config, SettingsProcessorInput::GetValues).await? {
        SettingsProcessorOutput::GetValues(values) => {
            Ok((StatusCode::OK, Json(ApiResponse::success(values))))
        }
        _ => Err(ApiError::internal_error("Unexpected response type")),
    }
}

/// POST /api/settings/save
pub async fn save_settings(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<serde_json::Value>,
) -> HandlerResult {
    require_permission(&claims, Permission::Settings)?;

    match run(app_config, SettingsProcessorInput::Save(payload)).await? {
        SettingsProcessorOutput::Save(outcome) => {
            let json = serde_json::to_value(&outcome)
                .map_err(|e| ApiError::internal_error(format!("Failed to serialize: {}", e)))?;
            Ok((StatusCode::OK, Json(ApiResponse::success(json))))
        }
        _ => Err(ApiError::internal_error("Unexpected response type")),
    }
}
