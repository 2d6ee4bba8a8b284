use axum::http::HeaderMap;

use crate::api::error::ApiError;
use crate::auth::AuthService;
use crate::auth::roles::Permission;
use crate::auth::token::Claims;

/// Paths served without a token
pub const PUBLIC_PATHS: &[&str] = &["/health", "/api/auth/login", "/api/auth/logout"];

pub fn is_public(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Extract and validate Bearer token from Authorization header
pub async fn validate_auth(headers: &HeaderMap, auth: &AuthService) -> Result<Claims, ApiError> {
    let auth_header = headers
        .get("authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| ApiError::unauthorized("Missing authorization header"))?;

    // Expected format: "Bearer <token>"
    let parts: Vec<&str> = auth_header.split_whitespace().collect();
    if parts.len() != 2 || parts[0] != "Bearer" {
        return Err(ApiError::unauthorized(
            "Invalid authorization header format. Expected: Bearer <token>",
        ));
    }

    auth.verify_token(parts[1]).map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        ApiError::unauthorized("Invalid or expired token")
    })
}

pub fn require_permission(claims: &Claims, permission: Permission) -> Result<(), ApiError> {
    if claims.role.allows(permission) {
        return Ok(());
    }
    Err(ApiError::forbidden("Insufficient permissions"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::roles::Role;
    use uuid::Uuid;

    fn claims(role: Role) -> Claims {
        Claims {
            sub: Uuid::nil(),
            username: "u".to_string(),
            role,
            iat: 0,
            exp: 0,
        }
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public("/health"));
        assert!(is_public("/api/auth/login"));
        assert!(!is_public("/api/auth/info"));
    }

    #[test]
    fn test_permission_check() {
        assert!(require_permission(&claims(Role::Admin), Permission::UserManage).is_ok());
        assert!(matches!(
            require_permission(&claims(Role::Manager), Permission::UserManage),
            Err(ApiError::Forbidden(_))
        ));
    }
}
