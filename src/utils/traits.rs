use anyhow::Result;

use crate::utils::app_config::AppConfig;
use crate::utils::db::DbConn;

pub trait ActionProcessor<Config, Output> {
    async fn process(
        &self,
        app_config: &mut AppConfig,
        local_config: &mut Config,
        conn: Option<&mut DbConn>,
    ) -> Result<Output>;
}
