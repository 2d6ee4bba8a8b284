pub mod authenticator;
pub mod config;
pub mod password;
pub mod roles;
pub mod token;

use std::sync::Arc;

use anyhow::Result;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::auth::authenticator::{AuthenticatedUser, Authenticator};
use crate::auth::config::{AuthConfig, AuthMode};
use crate::auth::roles::{Permission, Role};
use crate::auth::token::{Claims, TokenIssuer};

pub const DEFAULT_AVATAR: &str = "/avatar2.jpg";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RoleInfo {
    pub id: Role,
    pub permissions: Vec<Permission>,
}

impl From<Role> for RoleInfo {
    fn from(role: Role) -> Self {
        Self {
            id: role,
            permissions: role.permissions().to_vec(),
        }
    }
}

/// User details handed to the frontend after login
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UserInfo {
    pub id: Uuid,
    pub username: String,
    pub nickname: String,
    pub email: Option<String>,
    pub avatar: String,
    pub is_demo: bool,
    pub role: RoleInfo,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub userinfo: UserInfo,
}

pub struct AuthService {
    mode: AuthMode,
    demo_mode: bool,
    authenticator: Arc<dyn Authenticator>,
    tokens: TokenIssuer,
}

impl std::fmt::Debug for AuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthService")
            .field("mode", &self.mode)
            .field("demo_mode", &self.demo_mode)
            .finish()
    }
}

impl AuthService {
    pub fn new(config: &AuthConfig, authenticator: Arc<dyn Authenticator>) -> Self {
        Self {
            mode: config.mode(),
            demo_mode: config.is_demo_mode,
            authenticator,
            tokens: TokenIssuer::new(&config.secret_key, config.token_ttl()),
        }
    }

    pub fn mode(&self) -> AuthMode {
        self.mode
    }

    pub fn is_demo(&self) -> bool {
        self.demo_mode
    }

    /// Returns `None` for rejected credentials.
    pub fn login(&self, username: &str, password: &str) -> Result<Option<LoginOutcome>> {
        let Some(user) = self.authenticator.authenticate(username, password)? else {
            tracing::info!("Rejected login for {}", username);
            return Ok(None);
        };

        let token = self.tokens.issue(user.id, &user.username, user.role)?;
        tracing::info!("User {} logged in", user.username);

        Ok(Some(LoginOutcome {
            token,
            userinfo: self.describe(&user),
        }))
    }

    pub fn verify_token(&self, token: &str) -> Result<Claims> {
        self.tokens.verify(token)
    }

    /// Current details for the token holder, falling back to the claims
    /// when the account can no longer be looked up.
    pub fn user_info(&self, claims: &Claims) -> Result<UserInfo> {
        let user = match self.authenticator.lookup(claims.sub)? {
            Some(user) => user,
            None => AuthenticatedUser {
                id: claims.sub,
                username: claims.username.clone(),
                role: claims.role,
                nickname: None,
                email: None,
                avatar: None,
            },
        };
        Ok(self.describe(&user))
    }

    fn describe(&self, user: &AuthenticatedUser) -> UserInfo {
        let mut nickname = user.nickname.clone().unwrap_or_else(|| "User".to_string());
        if self.demo_mode {
            nickname.push_str(" (Demo)");
        }

        UserInfo {
            id: user.id,
            username: user.username.clone(),
            nickname,
            email: user.email.clone(),
            avatar: user
                .avatar
                .clone()
                .filter(|a| !a.is_empty())
                .unwrap_or_else(|| DEFAULT_AVATAR.to_string()),
            is_demo: self.demo_mode,
            role: user.role.into(),
        }
    }
}
