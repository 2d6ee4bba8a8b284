use super::processor_enums::*;
use crate::forex::data_source::ForexDataSource;
use crate::utils::app_config::AppConfig;
use crate::utils::db::DbConn;
use crate::utils::traits::ActionProcessor;

impl ActionProcessor<ForexDataSource, ForexProcessorOutput> for ForexProcessorInput {
    async fn process(
        &self,
        _app_config: &mut AppConfig,
        local_config: &mut ForexDataSource,
        _conn: Option<&mut DbConn>,
    ) -> anyhow::Result<ForexProcessorOutput> {
        match self {
            ForexProcessorInput::GetKline(args) => {
                let res = local_config
                    .get_kline(&args.symbol, &args.timeframe, args.count, args.before_time)
                    .await;
                Ok(ForexProcessorOutput::GetKline(res))
            }
        }
    }
}
