use serde::{Deserialize, Serialize};

use crate::forex::data_source::KlineResult;

#[derive(Deserialize, Serialize, Debug, Clone)]
pub struct GetKlineInputArgs {
    pub symbol: String,
    pub timeframe: String,
    pub count: u32,
    pub before_time: Option<i64>,
}

pub enum ForexProcessorInput {
    GetKline(GetKlineInputArgs),
}

pub enum ForexProcessorOutput {
    GetKline(KlineResult),
}
