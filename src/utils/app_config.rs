use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, anyhow};

use crate::auth::AuthService;
use crate::auth::authenticator::build_authenticator;
use crate::auth::config::{AuthConfig, AuthMode};
use crate::forex::config::ForexConfig;
use crate::forex::data_source::ForexDataSource;
use crate::settings::store::SettingsStore;
use crate::users::config::UsersConfig;
use crate::users::operations::ensure_admin;
use crate::utils::db::{DbPool, connect, get_conn};

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Present only when DATABASE_URL is configured
    pub pool: Option<DbPool>,
    pub forex: Arc<ForexDataSource>,
    pub auth: Arc<AuthService>,
    pub settings: Arc<SettingsStore>,
    pub users: UsersConfig,
}

impl AppConfig {
    pub fn new(
        pool: Option<DbPool>,
        forex: ForexDataSource,
        auth: AuthService,
        settings: SettingsStore,
    ) -> Self {
        Self {
            pool,
            forex: Arc::new(forex),
            auth: Arc::new(auth),
            settings: Arc::new(settings),
            users: UsersConfig::default(),
        }
    }

    pub fn from_env(settings_env_file: impl Into<PathBuf>) -> Result<Self> {
        let auth_config = AuthConfig::from_env()?;
        let forex_config = ForexConfig::from_env()?;

        let pool = match std::env::var("DATABASE_URL") {
            Ok(url) if !url.is_empty() => Some(connect(&url)?),
            _ => None,
        };

        match auth_config.mode() {
            AuthMode::SingleUser => {
                tracing::info!("Single-user mode, authenticating {}", auth_config.admin_user);
            }
            AuthMode::MultiUser => {
                let pool = pool
                    .as_ref()
                    .ok_or_else(|| anyhow!("DATABASE_URL must be set in multi-user mode"))?;
                let mut conn = get_conn(pool.clone())?;
                if ensure_admin(&mut conn, &auth_config.admin_user, &auth_config.admin_password)? {
                    tracing::warn!(
                        "Seeded admin account {}, change its password",
                        auth_config.admin_user
                    );
                }
            }
        }

        let authenticator = build_authenticator(&auth_config, pool.as_ref())?;
        let auth = AuthService::new(&auth_config, authenticator);
        let forex = ForexDataSource::from_config(&forex_config)?;
        let settings = SettingsStore::new(settings_env_file);

        Ok(Self::new(pool, forex, auth, settings))
    }

    pub fn require_pool(&self) -> Result<DbPool> {
        self.pool
            .clone()
            .ok_or_else(|| anyhow!("Database is not configured"))
    }
}
