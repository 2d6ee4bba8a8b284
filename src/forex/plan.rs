use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::forex::config::PlanLimits;
use crate::forex::granularity::{Aggregation, Granularity};

/// History is padded by half again to cover weekends and holidays.
const HISTORY_BUFFER: f64 = 1.5;

/// Pairs the provider is known to list; anything else is passed through lower-cased.
pub const KNOWN_PAIRS: [&str; 9] = [
    "XAUUSD", "XAGUSD", "EURUSD", "GBPUSD", "USDJPY", "AUDUSD", "USDCAD", "USDCHF", "NZDUSD",
];

/// A limit applied while building the plan. Returned to callers so a clamped
/// result is distinguishable from a full one.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PlanNotice {
    PeriodCountClamped { requested: u32, max: u32 },
    HistoryWindowClamped { max_days: i64 },
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct FetchPlan {
    pub ticker: String,
    pub granularity: Granularity,
    pub resolution: String,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    pub aggregation: Option<Aggregation>,
    /// Number of candles to hand back after aggregation.
    pub count: u32,
    pub notices: Vec<PlanNotice>,
}

impl FetchPlan {
    pub fn start_date(&self) -> NaiveDate {
        self.start.date_naive()
    }

    pub fn end_date(&self) -> NaiveDate {
        self.end.date_naive()
    }

    pub fn start_date_str(&self) -> String {
        self.start.format("%Y-%m-%d").to_string()
    }

    pub fn end_date_str(&self) -> String {
        self.end.format("%Y-%m-%d").to_string()
    }
}

pub fn provider_ticker(symbol: &str) -> String {
    let upper = symbol.to_uppercase();
    if !KNOWN_PAIRS.contains(&upper.as_str()) {
        info!(symbol, "Symbol not in known pair list, passing through");
    }
    symbol.to_lowercase()
}

/// Translates a caller request into what the provider can actually serve.
/// Returns `None` for timeframes the provider has no mapping for.
pub fn translate_request(
    symbol: &str,
    timeframe: &str,
    count: u32,
    end_time: Option<i64>,
    limits: &PlanLimits,
) -> Option<FetchPlan> {
    let granularity = match timeframe.parse::<Granularity>() {
        Ok(g) => g,
        Err(e) => {
            warn!(timeframe, "{}", e);
            return None;
        }
    };

    let source = granularity.source();
    let resolution = source.provider_resolution()?;
    let aggregation = granularity.aggregation();

    if granularity == Granularity::OneMinute {
        info!("Minute forex data requires a paid provider subscription");
    }

    let mut notices = Vec::new();
    let mut count = count;
    let mut bars = i64::from(count);

    if let Some(aggregation) = aggregation {
        let max = match aggregation {
            Aggregation::Weekly => limits.max_weekly_periods,
            Aggregation::Monthly => limits.max_monthly_periods,
        };
        if count > max {
            info!(requested = count, max, "Clamping period count");
            notices.push(PlanNotice::PeriodCountClamped {
                requested: count,
                max,
            });
            count = max;
        }
        bars = i64::from(count) * i64::from(aggregation.days_per_period());
    }

    let end = end_time
        .and_then(|ts| DateTime::from_timestamp(ts, 0))
        .unwrap_or_else(Utc::now);

    let window_secs = (bars as f64 * source.seconds_per_bar() as f64 * HISTORY_BUFFER) as i64;
    let mut window = Duration::seconds(window_secs);

    if window.num_days() > limits.max_history_days {
        window = Duration::days(limits.max_history_days);
        info!(max_days = limits.max_history_days, "Limited history window");
        notices.push(PlanNotice::HistoryWindowClamped {
            max_days: limits.max_history_days,
        });
    }

    // Timestamps near the lower bound of the calendar have no room for a window
    let Some(start) = end.checked_sub_signed(window) else {
        warn!(end = %end, "History window starts before the earliest representable date");
        return None;
    };

    Some(FetchPlan {
        ticker: provider_ticker(symbol),
        granularity,
        resolution: resolution.to_string(),
        start,
        end,
        aggregation,
        count,
        notices,
    })
}
