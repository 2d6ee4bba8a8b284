use anyhow::Result;

use crate::action_router::{ActionRouterInput, ActionRouterOutput};
use crate::api::config::ApiConfig;
use crate::utils::app_config::AppConfig;

/// Initialize AppConfig for CLI operations
pub fn initialize_app_config() -> Result<AppConfig> {
    let _ = dotenvy::dotenv();
    let api_config = ApiConfig::from_env()?;
    AppConfig::from_env(&api_config.settings_env_file)
}

/// Execute an action through the ActionRouter
pub async fn call_action_router(
    input: ActionRouterInput,
    app_config: AppConfig,
) -> Result<ActionRouterOutput> {
    input.process(app_config).await
}
