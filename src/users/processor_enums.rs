use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::roles::Role;
use crate::users::db_types::{UserChangeset, UserPage, UserRecord};

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct CreateUserInputArgs {
    pub username: String,
    pub password: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub role: Option<Role>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub enum GetUserInputArgs {
    ById(Uuid),
    ByUsername(String),
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ListUsersInputArgs {
    pub page: i64,
    pub page_size: i64,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct UpdateUserInputArgs {
    pub id: Uuid,
    pub changes: UserChangeset,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ChangePasswordInputArgs {
    pub id: Uuid,
    pub old_password: String,
    pub new_password: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct ResetPasswordInputArgs {
    pub id: Uuid,
    pub new_password: String,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct DeleteUserInputArgs {
    pub id: Uuid,
    /// Account performing the deletion, if any
    pub requested_by: Option<Uuid>,
}

#[derive(Deserialize, Serialize, Clone, Debug)]
pub struct EnsureAdminInputArgs {
    pub username: String,
    pub password: String,
}

pub enum UsersProcessorInput {
    CreateUser(CreateUserInputArgs),
    GetUser(GetUserInputArgs),
    ListUsers(ListUsersInputArgs),
    UpdateUser(UpdateUserInputArgs),
    ChangePassword(ChangePasswordInputArgs),
    ResetPassword(ResetPasswordInputArgs),
    DeleteUser(DeleteUserInputArgs),
    CountUsers,
    EnsureAdmin(EnsureAdminInputArgs),
}

pub enum UsersProcessorOutput {
    CreateUser(UserRecord),
    GetUser(UserRecord),
    ListUsers(UserPage),
    UpdateUser(UserRecord),
    ChangePassword,
    ResetPassword,
    DeleteUser,
    CountUsers(i64),
    /// `true` when a fresh admin was inserted
    EnsureAdmin(bool),
}
