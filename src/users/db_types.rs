use chrono::NaiveDateTime;
use diesel::prelude::*;
use diesel_derive_enum::DbEnum;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::roles::{Permission, Role};
use crate::schema::users as UsersTable;

#[derive(DbEnum, Deserialize, Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[ExistingTypePath = "crate::schema::sql_types::UserStatus"]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Disabled,
}

#[derive(Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = UsersTable)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct UserRecord {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub role: Role,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable, Debug, Clone)]
#[diesel(table_name = UsersTable)]
pub struct CreateUserRecord {
    pub username: String,
    pub password_hash: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub status: UserStatus,
    pub role: Role,
}

#[derive(AsChangeset, Deserialize, Serialize, Debug, Clone, Default)]
#[diesel(table_name = UsersTable)]
pub struct UserChangeset {
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl UserChangeset {
    pub fn is_empty(&self) -> bool {
        self.email.is_none()
            && self.nickname.is_none()
            && self.avatar.is_none()
            && self.role.is_none()
            && self.status.is_none()
    }

    /// Only the fields a user may change on their own profile.
    pub fn profile_only(self) -> Self {
        Self {
            email: self.email,
            nickname: self.nickname,
            avatar: self.avatar,
            role: None,
            status: None,
        }
    }
}

/// User as returned over the API, without the password hash
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserView {
    pub id: Uuid,
    pub username: String,
    pub email: Option<String>,
    pub nickname: Option<String>,
    pub avatar: Option<String>,
    pub status: UserStatus,
    pub role: Role,
    pub permissions: Vec<Permission>,
    pub last_login_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl From<UserRecord> for UserView {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            email: record.email,
            nickname: record.nickname,
            avatar: record.avatar,
            status: record.status,
            permissions: record.role.permissions().to_vec(),
            role: record.role,
            last_login_at: record.last_login_at,
            created_at: record.created_at,
            updated_at: record.updated_at,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct UserPage {
    pub items: Vec<UserView>,
    pub total: i64,
    pub page: i64,
    pub page_size: i64,
    pub total_pages: i64,
}

impl UserPage {
    pub fn new(items: Vec<UserView>, total: i64, page: i64, page_size: i64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: (total + page_size - 1) / page_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        let now = chrono::Utc::now().naive_utc();
        UserRecord {
            id: Uuid::new_v4(),
            username: "alice".to_string(),
            password_hash: "sha256$aa$bb".to_string(),
            email: None,
            nickname: Some("Alice".to_string()),
            avatar: None,
            status: UserStatus::Active,
            role: Role::Manager,
            last_login_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_view_hides_hash_and_lists_permissions() {
        let view = UserView::from(record());
        let json = serde_json::to_value(&view).unwrap();

        assert!(json.get("password_hash").is_none());
        assert_eq!(json["role"], "manager");
        assert_eq!(view.permissions.len(), 7);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        assert_eq!(UserPage::new(vec![], 41, 1, 20).total_pages, 3);
        assert_eq!(UserPage::new(vec![], 40, 1, 20).total_pages, 2);
        assert_eq!(UserPage::new(vec![], 0, 1, 20).total_pages, 0);
    }

    #[test]
    fn test_profile_changeset_drops_privileged_fields() {
        let changes = UserChangeset {
            nickname: Some("Al".to_string()),
            role: Some(Role::Admin),
            status: Some(UserStatus::Disabled),
            ..Default::default()
        }
        .profile_only();

        assert_eq!(changes.nickname.as_deref(), Some("Al"));
        assert!(changes.role.is_none());
        assert!(changes.status.is_none());
        assert!(!changes.is_empty());
        assert!(UserChangeset::default().is_empty());
    }
}
