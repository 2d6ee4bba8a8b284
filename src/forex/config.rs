use std::time::Duration;

use anyhow::{Result, anyhow};
use clap::Parser;
use serde::{Deserialize, Serialize};
use url::Url;

/// Limits applied when translating a request into a provider fetch
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PlanLimits {
    /// Longest history window the provider serves, in days
    pub max_history_days: i64,
    /// Most weekly candles synthesized per request
    pub max_weekly_periods: u32,
    /// Most monthly candles synthesized per request
    pub max_monthly_periods: u32,
}

impl Default for PlanLimits {
    fn default() -> Self {
        Self {
            max_history_days: 365 * 3,
            max_weekly_periods: 100,
            max_monthly_periods: 36,
        }
    }
}

#[derive(Parser, Clone, Debug)]
pub struct ForexConfig {
    #[clap(long, env)]
    pub tiingo_api_key: Option<String>,
    #[clap(long, env, default_value = "https://api.tiingo.com/tiingo")]
    pub tiingo_base_url: String,
    /// Request timeout in seconds
    #[clap(long, env, default_value_t = 10)]
    pub tiingo_timeout: u64,
    #[clap(long, env, default_value_t = 365 * 3)]
    pub forex_max_history_days: i64,
    #[clap(long, env, default_value_t = 100)]
    pub forex_max_weekly_periods: u32,
    #[clap(long, env, default_value_t = 36)]
    pub forex_max_monthly_periods: u32,
}

impl ForexConfig {
    pub fn from_env() -> Result<Self> {
        Self::try_parse_from(["forex"]).map_err(|e| anyhow!(e))
    }

    pub fn base_url(&self) -> Result<Url> {
        Url::parse(&self.tiingo_base_url)
            .map_err(|e| anyhow!("Invalid TIINGO_BASE_URL {}: {}", self.tiingo_base_url, e))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.tiingo_timeout)
    }

    pub fn limits(&self) -> PlanLimits {
        PlanLimits {
            max_history_days: self.forex_max_history_days,
            max_weekly_periods: self.forex_max_weekly_periods,
            max_monthly_periods: self.forex_max_monthly_periods,
        }
    }
}
