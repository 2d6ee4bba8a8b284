use anyhow::{Result, anyhow};
use clap::Parser;

#[derive(Parser, Clone, Debug)]
pub struct ApiConfig {
    #[clap(long, env, default_value_t = 6969)]
    pub port: u16,
    /// `.env` file edited through the settings endpoints
    #[clap(long, env, default_value = ".env")]
    pub settings_env_file: String,
}

impl ApiConfig {
    pub fn from_env() -> Result<Self> {
        Self::try_parse_from(["api"]).map_err(|e| anyhow!(e))
    }
}
