use std::sync::Arc;

use anyhow::{Result, anyhow};
use uuid::Uuid;

use crate::auth::config::{AuthConfig, AuthMode};
use crate::auth::password::verify_password;
use crate::auth::roles::Role;
use crate::users::db_types::{UserRecord, UserStatus};
use crate::users::operations;
use crate::users::processor_enums::GetUserInputArgs;
use crate::utils::db::{DbPool, get_conn};

#[derive(Debug, Clone, PartialEq)]
pub struct AuthenticatedUser {
    pub id: Uuid,
    pub username: String,
    pub role: Role,
    pub nickname: Option<String>,
    pub email: Option<String>,
    pub avatar: Option<String>,
}

impl From<UserRecord> for AuthenticatedUser {
    fn from(record: UserRecord) -> Self {
        Self {
            id: record.id,
            username: record.username,
            role: record.role,
            nickname: record.nickname,
            email: record.email,
            avatar: record.avatar,
        }
    }
}

/// Credential check and user lookup backing the login flow.
pub trait Authenticator: Send + Sync {
    /// `Ok(None)` means the credentials were rejected.
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<AuthenticatedUser>>;

    fn lookup(&self, id: Uuid) -> Result<Option<AuthenticatedUser>>;
}

/// Single administrator configured through the environment
pub struct LegacyAuthenticator {
    admin_user: String,
    admin_password: String,
}

impl LegacyAuthenticator {
    pub fn new(admin_user: impl Into<String>, admin_password: impl Into<String>) -> Self {
        Self {
            admin_user: admin_user.into(),
            admin_password: admin_password.into(),
        }
    }

    fn admin(&self) -> AuthenticatedUser {
        AuthenticatedUser {
            id: Uuid::nil(),
            username: self.admin_user.clone(),
            role: Role::Admin,
            nickname: Some(self.admin_user.clone()),
            email: None,
            avatar: None,
        }
    }
}

impl Authenticator for LegacyAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<AuthenticatedUser>> {
        if username == self.admin_user && password == self.admin_password {
            return Ok(Some(self.admin()));
        }
        Ok(None)
    }

    fn lookup(&self, id: Uuid) -> Result<Option<AuthenticatedUser>> {
        Ok((id == Uuid::nil()).then(|| self.admin()))
    }
}

pub struct DatabaseAuthenticator {
    pool: DbPool,
}

impl DatabaseAuthenticator {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl Authenticator for DatabaseAuthenticator {
    fn authenticate(&self, username: &str, password: &str) -> Result<Option<AuthenticatedUser>> {
        let mut conn = get_conn(self.pool.clone())?;

        let Some(user) =
            operations::get_user(&mut conn, &GetUserInputArgs::ByUsername(username.to_string()))?
        else {
            return Ok(None);
        };

        if user.status != UserStatus::Active {
            tracing::warn!("Login attempt for disabled user {}", username);
            return Ok(None);
        }

        if !verify_password(password, &user.password_hash) {
            return Ok(None);
        }

        if let Err(e) = operations::record_login(&mut conn, user.id) {
            tracing::warn!("Failed to record login for {}: {}", username, e);
        }

        Ok(Some(user.into()))
    }

    fn lookup(&self, id: Uuid) -> Result<Option<AuthenticatedUser>> {
        let mut conn = get_conn(self.pool.clone())?;
        let user = operations::get_user(&mut conn, &GetUserInputArgs::ById(id))?;
        Ok(user.map(AuthenticatedUser::from))
    }
}

pub fn build_authenticator(
    config: &AuthConfig,
    pool: Option<&DbPool>,
) -> Result<Arc<dyn Authenticator>> {
    match config.mode() {
        AuthMode::SingleUser => Ok(Arc::new(LegacyAuthenticator::new(
            config.admin_user.clone(),
            config.admin_password.clone(),
        ))),
        AuthMode::MultiUser => {
            let pool = pool.ok_or_else(|| anyhow!("Multi-user mode requires DATABASE_URL"))?;
            Ok(Arc::new(DatabaseAuthenticator::new(pool.clone())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_legacy_accepts_only_configured_admin() {
        let auth = LegacyAuthenticator::new("admin", "secret1");

        let user = auth.authenticate("admin", "secret1").unwrap().unwrap();
        assert_eq!(user.id, Uuid::nil());
        assert_eq!(user.role, Role::Admin);

        assert!(auth.authenticate("admin", "wrong").unwrap().is_none());
        assert!(auth.authenticate("root", "secret1").unwrap().is_none());
    }

    #[test]
    fn test_legacy_lookup() {
        let auth = LegacyAuthenticator::new("admin", "secret1");
        assert_eq!(auth.lookup(Uuid::nil()).unwrap().unwrap().username, "admin");
        assert!(auth.lookup(Uuid::new_v4()).unwrap().is_none());
    }

    #[test]
    fn test_multi_user_without_pool_fails() {
        let config = AuthConfig::try_parse_from(["auth", "--single-user-mode", "false"]).unwrap();
        assert!(build_authenticator(&config, None).is_err());

        let config = AuthConfig::try_parse_from(["auth", "--single-user-mode", "true"]).unwrap();
        assert!(build_authenticator(&config, None).is_ok());
    }
}
