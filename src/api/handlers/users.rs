use axum::{
    extract::{Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use crate::{
    action_router::{ActionRouterInput, ActionRouterOutput},
    api::{
        error::ApiError,
        middleware::auth::require_permission,
        response::ApiResponse,
        validation::{normalize_paging, validate_not_empty, validate_uuid},
    },
    auth::{config::AuthMode, roles::{Permission, Role}, token::Claims},
    users::{
        db_types::{UserChangeset, UserView},
        error::UserError,
        processor_enums::*,
    },
    utils::app_config::AppConfig,
};

type HandlerResult = Result<(StatusCode, Json<ApiResponse<serde_json::Value>>), ApiError>;

pub const MULTI_USER_REQUIRED: &str = "user management requires multi-user mode";

#[derive(Debug, Deserialize)]
pub struct PagingParams {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct IdParams {
    pub id: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub user_id: Uuid,
    pub new_password: String,
}

#[derive(Debug, Deserialize)]
pub struct ProfileUpdateRequest {
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChangePasswordRequest {
    pub old_password: Option<String>,
    pub new_password: Option<String>,
}

fn require_multi_user(app_config: &AppConfig) -> Result<(), ApiError> {
    match app_config.auth.mode() {
        AuthMode::MultiUser => Ok(()),
        AuthMode::SingleUser => Err(ApiError::bad_request(MULTI_USER_REQUIRED)),
    }
}

fn map_user_error(e: anyhow::Error) -> ApiError {
    match e.downcast_ref::<UserError>() {
        Some(UserError::NotFound) => ApiError::not_found(UserError::NotFound.to_string()),
        Some(other) => ApiError::bad_request(other.to_string()),
        None => ApiError::database_error(format!("User operation failed: {}", e)),
    }
}

async fn run(app_config: AppConfig, input: UsersProcessorInput) -> Result<UsersProcessorOutput, ApiError> {
    match ActionRouterInput::Users(input).process(app_config).await {
        Ok(ActionRouterOutput::Users(output)) => Ok(output),
        Ok(_) => Err(ApiError::internal_error("Unexpected response type")),
        Err(e) => Err(map_user_error(e)),
    }
}

fn respond(value: impl serde::Serialize) -> HandlerResult {
    let json = serde_json::to_value(value)
        .map_err(|e| ApiError::internal_error(format!("Failed to serialize: {}", e)))?;
    Ok((StatusCode::OK, Json(ApiResponse::success(json))))
}

fn unexpected() -> HandlerResult {
    Err(ApiError::internal_error("Unexpected response type"))
}

/// GET /api/users/list
pub async fn list_users(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<PagingParams>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    let (page, page_size) = normalize_paging(params.page, params.page_size);
    let input = UsersProcessorInput::ListUsers(ListUsersInputArgs { page, page_size });

    match run(app_config, input).await? {
        UsersProcessorOutput::ListUsers(page) => respond(page),
        _ => unexpected(),
    }
}

/// GET /api/users/detail?id=
pub async fn get_user_detail(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<IdParams>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    let id = validate_uuid(&params.id)?;
    let input = UsersProcessorInput::GetUser(GetUserInputArgs::ById(id));

    match run(app_config, input).await? {
        UsersProcessorOutput::GetUser(user) => respond(UserView::from(user)),
        _ => unexpected(),
    }
}

/// POST /api/users/create
pub async fn create_user(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<CreateUserRequest>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    validate_not_empty(&body.username, "username")?;
    let role = body
        .role
        .filter(|r| !r.is_empty())
        .map(|r| r.parse::<Role>())
        .transpose()
        .map_err(|e| ApiError::bad_request(e.to_string()))?;

    let input = UsersProcessorInput::CreateUser(CreateUserInputArgs {
        username: body.username,
        password: body.password,
        email: body.email,
        nickname: body.nickname,
        role,
    });

    match run(app_config, input).await? {
        UsersProcessorOutput::CreateUser(user) => respond(UserView::from(user)),
        _ => unexpected(),
    }
}

/// PUT /api/users/update?id=
pub async fn update_user(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<IdParams>,
    Json(changes): Json<UserChangeset>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    let id = validate_uuid(&params.id)?;
    let input = UsersProcessorInput::UpdateUser(UpdateUserInputArgs { id, changes });

    match run(app_config, input).await? {
        UsersProcessorOutput::UpdateUser(user) => respond(UserView::from(user)),
        _ => unexpected(),
    }
}

/// DELETE /api/users/delete?id=
pub async fn delete_user(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Query(params): Query<IdParams>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    let id = validate_uuid(&params.id)?;
    let input = UsersProcessorInput::DeleteUser(DeleteUserInputArgs {
        id,
        requested_by: Some(claims.sub),
    });

    match run(app_config, input).await? {
        UsersProcessorOutput::DeleteUser => respond(json!({ "id": id })),
        _ => unexpected(),
    }
}

/// POST /api/users/reset-password
pub async fn reset_password(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ResetPasswordRequest>,
) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;
    require_multi_user(&app_config)?;

    let input = UsersProcessorInput::ResetPassword(ResetPasswordInputArgs {
        id: body.user_id,
        new_password: body.new_password,
    });

    match run(app_config, input).await? {
        UsersProcessorOutput::ResetPassword => respond(json!({ "id": body.user_id })),
        _ => unexpected(),
    }
}

/// GET /api/users/roles - static, available in either auth mode
pub async fn get_roles(Extension(claims): Extension<Claims>) -> HandlerResult {
    require_permission(&claims, Permission::UserManage)?;

    let roles: Vec<serde_json::Value> = Role::ALL
        .iter()
        .map(|role| {
            json!({
                "id": role,
                "name": role.name(),
                "permissions": role.permissions(),
            })
        })
        .collect();

    respond(json!({ "roles": roles }))
}

/// GET /api/users/profile
pub async fn get_profile(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
) -> HandlerResult {
    require_multi_user(&app_config)?;

    let input = UsersProcessorInput::GetUser(GetUserInputArgs::ById(claims.sub));

    match run(app_config, input).await? {
        UsersProcessorOutput::GetUser(user) => respond(UserView::from(user)),
        _ => unexpected(),
    }
}

/// PUT /api/users/profile/update
pub async fn update_profile(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ProfileUpdateRequest>,
) -> HandlerResult {
    require_multi_user(&app_config)?;

    let changes = UserChangeset {
        nickname: body.nickname,
        email: body.email,
        avatar: body.avatar,
        ..Default::default()
    }
    .profile_only();

    let input = UsersProcessorInput::UpdateUser(UpdateUserInputArgs {
        id: claims.sub,
        changes,
    });

    match run(app_config, input).await? {
        UsersProcessorOutput::UpdateUser(user) => respond(UserView::from(user)),
        _ => unexpected(),
    }
}

/// POST /api/users/change-password
pub async fn change_password(
    State(app_config): State<AppConfig>,
    Extension(claims): Extension<Claims>,
    Json(body): Json<ChangePasswordRequest>,
) -> HandlerResult {
    require_multi_user(&app_config)?;

    let old_password = body.old_password.filter(|p| !p.is_empty());
    let new_password = body.new_password.filter(|p| !p.is_empty());
    let (Some(old_password), Some(new_password)) = (old_password, new_password) else {
        return Err(ApiError::bad_request("Both old and new password required"));
    };

    let input = UsersProcessorInput::ChangePassword(ChangePasswordInputArgs {
        id: claims.sub,
        old_password,
        new_password,
    });

    match run(app_config, input).await? {
        UsersProcessorOutput::ChangePassword => respond(json!({ "id": claims.sub })),
        _ => unexpected(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_errors_map_to_statuses() {
        assert!(matches!(
            map_user_error(UserError::NotFound.into()),
            ApiError::NotFound(msg) if msg == "User not found"
        ));
        assert!(matches!(
            map_user_error(UserError::UsernameTaken.into()),
            ApiError::BadRequest(msg) if msg == "Username already exists"
        ));
        assert!(matches!(
            map_user_error(anyhow::anyhow!("connection refused")),
            ApiError::Database(_)
        ));
    }
}
