use anyhow::{Result, anyhow};
use clap::{ArgAction, Parser, builder::BoolishValueParser};
use serde::{Deserialize, Serialize};

pub const DEFAULT_SECRET_KEY: &str = "quant-back-end-secret-key-change-me";

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// One administrator configured through the environment
    SingleUser,
    /// Accounts stored in the users table
    MultiUser,
}

#[derive(Parser, Clone, Debug)]
pub struct AuthConfig {
    #[clap(long, env, default_value = DEFAULT_SECRET_KEY)]
    pub secret_key: String,
    #[clap(long, env, default_value = "admin")]
    pub admin_user: String,
    #[clap(long, env, default_value = "admin123")]
    pub admin_password: String,
    #[clap(long, env, default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub single_user_mode: bool,
    #[clap(long, env, default_value_t = false, action = ArgAction::Set, value_parser = BoolishValueParser::new())]
    pub is_demo_mode: bool,
    #[clap(long, env, default_value_t = 24)]
    pub token_ttl_hours: i64,
}

impl AuthConfig {
    pub fn from_env() -> Result<Self> {
        let config = Self::try_parse_from(["auth"]).map_err(|e| anyhow!(e))?;
        if config.secret_key == DEFAULT_SECRET_KEY {
            tracing::warn!("SECRET_KEY not set in environment, using default");
        }
        Ok(config)
    }

    pub fn mode(&self) -> AuthMode {
        if self.single_user_mode {
            AuthMode::SingleUser
        } else {
            AuthMode::MultiUser
        }
    }

    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.token_ttl_hours)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_selection() {
        let config = AuthConfig::try_parse_from(["auth", "--single-user-mode", "true"]).unwrap();
        assert_eq!(config.mode(), AuthMode::SingleUser);

        let config = AuthConfig::try_parse_from(["auth", "--single-user-mode", "no"]).unwrap();
        assert_eq!(config.mode(), AuthMode::MultiUser);
    }

    #[test]
    fn test_ttl() {
        let config = AuthConfig::try_parse_from(["auth", "--token-ttl-hours", "2"]).unwrap();
        assert_eq!(config.token_ttl(), chrono::Duration::hours(2));
    }
}
