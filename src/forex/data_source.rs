use serde::{Deserialize, Serialize};
use tracing::{debug, error, warn};

use crate::forex::aggregation::aggregate;
use crate::forex::candle::{Candle, keep_last};
use crate::forex::config::{ForexConfig, PlanLimits};
use crate::forex::plan::{PlanNotice, translate_request};
use crate::forex::tiingo::{CandleProvider, TiingoClient};

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct KlineResult {
    pub candles: Vec<Candle>,
    pub notices: Vec<PlanNotice>,
}

/// Forex candles over a provider that only serves intraday and daily bars.
#[derive(Clone, Debug)]
pub struct ForexDataSource<P = TiingoClient> {
    provider: P,
    limits: PlanLimits,
}

impl ForexDataSource<TiingoClient> {
    pub fn from_config(config: &ForexConfig) -> anyhow::Result<Self> {
        let client = TiingoClient::new(
            config.base_url()?,
            config.tiingo_api_key.clone(),
            config.timeout(),
        )?;

        Ok(Self::new(client, config.limits()))
    }
}

impl<P: CandleProvider> ForexDataSource<P> {
    pub fn new(provider: P, limits: PlanLimits) -> Self {
        Self { provider, limits }
    }

    pub fn limits(&self) -> &PlanLimits {
        &self.limits
    }

    /// Fetches `count` candles ending at `before_time` (now when absent).
    /// Unsupported timeframes and upstream failures yield an empty result.
    pub async fn get_kline(
        &self,
        symbol: &str,
        timeframe: &str,
        count: u32,
        before_time: Option<i64>,
    ) -> KlineResult {
        let Some(plan) = translate_request(symbol, timeframe, count, before_time, &self.limits)
        else {
            warn!(timeframe, "Provider does not support timeframe");
            return KlineResult::default();
        };

        let candles = match self.provider.fetch_candles(&plan).await {
            Ok(candles) => candles,
            Err(e) => {
                error!(symbol, timeframe, "Failed to fetch forex candles: {}", e);
                return KlineResult {
                    candles: Vec::new(),
                    notices: plan.notices,
                };
            }
        };

        let candles = match plan.aggregation {
            Some(aggregation) => {
                let periods = aggregate(&candles, aggregation);
                debug!(
                    "Aggregated {} {:?} candles from {} daily",
                    periods.len(),
                    aggregation,
                    candles.len()
                );
                periods
            }
            None => candles,
        };

        KlineResult {
            candles: keep_last(candles, plan.count as usize),
            notices: plan.notices,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forex::error::ForexError;
    use crate::forex::plan::FetchPlan;
    use std::sync::Mutex;

    const DAY: i64 = 86_400;
    // Monday 2023-01-02
    const MON: i64 = 1_672_617_600;

    struct FakeProvider {
        candles: Vec<Candle>,
        fail: bool,
        seen: Mutex<Vec<FetchPlan>>,
    }

    impl FakeProvider {
        fn with(candles: Vec<Candle>) -> Self {
            Self {
                candles,
                fail: false,
                seen: Mutex::new(Vec::new()),
            }
        }

        fn failing() -> Self {
            Self {
                candles: Vec::new(),
                fail: true,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    impl CandleProvider for FakeProvider {
        async fn fetch_candles(&self, plan: &FetchPlan) -> Result<Vec<Candle>, ForexError> {
            self.seen.lock().unwrap().push(plan.clone());
            if self.fail {
                return Err(ForexError::NotAList("{}".to_string()));
            }
            Ok(self.candles.clone())
        }
    }

    fn daily(n: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| Candle::new(MON + i * DAY, 1.0, 1.0 + i as f64, 0.5, 1.0, 1.0))
            .collect()
    }

    #[tokio::test]
    async fn test_weekly_is_truncated_to_requested_count() {
        // 14 whole weeks of daily data
        let source = ForexDataSource::new(FakeProvider::with(daily(14 * 7)), PlanLimits::default());

        let result = source.get_kline("EURUSD", "1W", 10, Some(MON + 200 * DAY)).await;

        assert_eq!(result.candles.len(), 10);
        assert_eq!(result.candles[0].timestamp, MON + 4 * 7 * DAY);
        assert_eq!(result.candles[9].timestamp, MON + 13 * 7 * DAY);
        assert!(result.notices.is_empty());

        let seen = source.provider.seen.lock().unwrap();
        assert_eq!(seen[0].resolution, "1day");
    }

    #[tokio::test]
    async fn test_monthly_uses_daily_source() {
        let source = ForexDataSource::new(FakeProvider::with(daily(70)), PlanLimits::default());

        let result = source.get_kline("EURUSD", "1M", 12, Some(MON + 80 * DAY)).await;
        assert_eq!(result.candles.len(), 3);
        assert_eq!(result.candles[2].timestamp, 1_677_628_800);
    }

    #[tokio::test]
    async fn test_native_timeframe_passes_through() {
        let source = ForexDataSource::new(FakeProvider::with(daily(5)), PlanLimits::default());

        let result = source.get_kline("EURUSD", "1D", 3, Some(MON + 10 * DAY)).await;
        assert_eq!(result.candles, daily(5)[2..].to_vec());
    }

    #[tokio::test]
    async fn test_unsupported_timeframe_is_empty_without_fetch() {
        let source = ForexDataSource::new(FakeProvider::with(daily(5)), PlanLimits::default());

        let result = source.get_kline("EURUSD", "3D", 3, None).await;
        assert_eq!(result, KlineResult::default());
        assert!(source.provider.seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fetch_failure_is_empty_but_keeps_notices() {
        let source = ForexDataSource::new(FakeProvider::failing(), PlanLimits::default());

        let result = source.get_kline("EURUSD", "1W", 500, Some(MON)).await;
        assert!(result.candles.is_empty());
        assert_eq!(
            result.notices,
            vec![PlanNotice::PeriodCountClamped {
                requested: 500,
                max: 100
            }]
        );
    }
}
