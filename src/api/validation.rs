use crate::api::error::ApiError;

pub const DEFAULT_KLINE_LIMIT: u32 = 100;
pub const DEFAULT_PAGE_SIZE: i64 = 20;

pub fn validate_uuid(uuid_str: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(uuid_str)
        .map_err(|_| ApiError::bad_request("Invalid UUID format"))
}

pub fn validate_not_empty(value: &str, field_name: &str) -> Result<(), ApiError> {
    if value.trim().is_empty() {
        return Err(ApiError::bad_request(format!("{} cannot be empty", field_name)));
    }
    Ok(())
}

pub fn validate_limit(limit: Option<u32>) -> Result<u32, ApiError> {
    match limit {
        None => Ok(DEFAULT_KLINE_LIMIT),
        Some(0) => Err(ApiError::bad_request("limit must be at least 1")),
        Some(limit) => Ok(limit),
    }
}

/// Returns `(page, page_size)` with page ≥ 1 and page_size in 1..=100.
pub fn normalize_paging(page: Option<i64>, page_size: Option<i64>) -> (i64, i64) {
    let page = page.unwrap_or(1).max(1);
    let page_size = page_size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, 100);
    (page, page_size)
}
