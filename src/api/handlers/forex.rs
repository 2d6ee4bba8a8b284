use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;

use crate::{
    action_router::{ActionRouterInput, ActionRouterOutput},
    api::{
        error::ApiError,
        response::ApiResponse,
        validation::{validate_limit, validate_not_empty},
    },
    forex::processor_enums::{ForexProcessorInput, ForexProcessorOutput, GetKlineInputArgs},
    utils::app_config::AppConfig,
};

/// Query parameters for forex candles
#[derive(Debug, Deserialize)]
pub struct KlineParams {
    pub symbol: String,
    pub timeframe: String,
    pub limit: Option<u32>,
    /// Unix seconds; candles end at or before this instant
    pub before_time: Option<i64>,
}

/// GET /api/forex/kline
pub async fn get_kline(
    State(app_config): State<AppConfig>,
    Query(params): Query<KlineParams>,
) -> Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError> {
    validate_not_empty(&params.symbol, "symbol")?;
    validate_not_empty(&params.timeframe, "timeframe")?;
    let count = validate_limit(params.limit)?;

    let action = ActionRouterInput::Forex(ForexProcessorInput::GetKline(GetKlineInputArgs {
        symbol: params.symbol,
        timeframe: params.timeframe,
        count,
        before_time: params.before_time,
    }));

    let result = action
        .process(app_config)
        .await
        .map_err(|e| ApiError::internal_error(format!("Failed to fetch candles: {}", e)))?;

    match result {
        ActionRouterOutput::Forex(ForexProcessorOutput::GetKline(kline)) => {
            let json = serde_json::to_value(&kline)
                .map_err(|e| ApiError::internal_error(format!("Failed to serialize: {}", e)))?;
            Ok((StatusCode::OK, Json(ApiResponse::success(json))))
        }
        _ => Err(ApiError::internal_error("Unexpected response type")),
    }
}
