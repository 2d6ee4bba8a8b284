use super::processor_enums::*;
use crate::settings::store::SettingsStore;
use crate::utils::app_config::AppConfig;
use crate::utils::db::DbConn;
use crate::utils::traits::ActionProcessor;

impl ActionProcessor<SettingsStore, SettingsProcessorOutput> for SettingsProcessorInput {
    async fn process(
        &self,
        _app_config: &mut AppConfig,
        local_config: &mut SettingsStore,
        _conn: Option<&mut DbConn>,
    ) -> anyhow::Result<SettingsProcessorOutput> {
        match self {
            SettingsProcessorInput::GetSchema => {
                Ok(SettingsProcessorOutput::GetSchema(local_config.schema()))
            }
            SettingsProcessorInput::GetValues => {
                let res = local_config.values()?;
                Ok(SettingsProcessorOutput::GetValues(res))
            }
            SettingsProcessorInput::Save(payload) => {
                let res = local_config.save(payload)?;
                Ok(SettingsProcessorOutput::Save(res))
            }
        }
    }
}
