use anyhow::Result;

use crate::forex::processor_enums::{ForexProcessorInput, ForexProcessorOutput};
use crate::settings::processor_enums::{SettingsProcessorInput, SettingsProcessorOutput};
use crate::users::processor_enums::{UsersProcessorInput, UsersProcessorOutput};
use crate::utils::app_config::AppConfig;
use crate::utils::db::get_conn;
use crate::utils::traits::ActionProcessor;

pub enum ActionRouterInput {
    Forex(ForexProcessorInput),
    Users(UsersProcessorInput),
    Settings(SettingsProcessorInput),
}

pub enum ActionRouterOutput {
    Forex(ForexProcessorOutput),
    Users(UsersProcessorOutput),
    Settings(SettingsProcessorOutput),
}

impl ActionRouterInput {
    pub async fn process(&self, app_config: AppConfig) -> Result<ActionRouterOutput> {
        match self {
            ActionRouterInput::Forex(processor) => {
                let mut config = (*app_config.forex).clone();

                let res = processor
                    .process(&mut app_config.clone(), &mut config, None)
                    .await?;

                Ok(ActionRouterOutput::Forex(res))
            }
            ActionRouterInput::Users(processor) => {
                let mut conn = get_conn(app_config.require_pool()?)?;

                let mut config = app_config.users.clone();

                let res = processor
                    .process(&mut app_config.clone(), &mut config, Some(&mut conn))
                    .await?;

                Ok(ActionRouterOutput::Users(res))
            }
            ActionRouterInput::Settings(processor) => {
                let mut config = (*app_config.settings).clone();

                let res = processor
                    .process(&mut app_config.clone(), &mut config, None)
                    .await?;

                Ok(ActionRouterOutput::Settings(res))
            }
        }
    }
}
