use std::future::Future;
use std::time::Duration;

use chrono::DateTime;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, error};
use url::Url;

use crate::forex::candle::Candle;
use crate::forex::error::ForexError;
use crate::forex::plan::FetchPlan;

/// Source of provider-native candles for a plan.
pub trait CandleProvider: Send + Sync {
    fn fetch_candles(
        &self,
        plan: &FetchPlan,
    ) -> impl Future<Output = Result<Vec<Candle>, ForexError>> + Send;
}

// {
//   "date": "2023-01-01T00:00:00.000Z",
//   "ticker": "eurusd",
//   "open": 1.07, "high": 1.08, "low": 1.06, "close": 1.07
// }
#[derive(Deserialize, Debug)]
struct TiingoPrice {
    date: String,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
}

#[derive(Clone, Debug)]
pub struct TiingoClient {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl TiingoClient {
    pub fn new(base_url: Url, api_key: Option<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let api_key = api_key.filter(|k| !k.is_empty());
        if api_key.is_none() {
            tracing::warn!("Tiingo API key is not configured; FX data will be unavailable");
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    fn prices_url(&self, ticker: &str) -> Result<Url, ForexError> {
        let base = self.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{}/fx/{}/prices", base, ticker))?)
    }
}

impl CandleProvider for TiingoClient {
    async fn fetch_candles(&self, plan: &FetchPlan) -> Result<Vec<Candle>, ForexError> {
        let api_key = self.api_key.as_deref().ok_or(ForexError::MissingApiKey)?;
        let url = self.prices_url(&plan.ticker)?;

        debug!(%url, start = %plan.start_date_str(), end = %plan.end_date_str(), resolution = %plan.resolution, "Tiingo request");

        let response = self
            .client
            .get(url)
            .header(AUTHORIZATION, format!("Token {}", api_key))
            .query(&[
                ("startDate", plan.start_date_str().as_str()),
                ("endDate", plan.end_date_str().as_str()),
                ("resampleFreq", plan.resolution.as_str()),
                ("format", "json"),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::FORBIDDEN {
            error!("Tiingo returned 403 for {}", plan.ticker);
            return Err(ForexError::PermissionDenied);
        }

        let body = response.error_for_status()?.json::<Value>().await?;
        parse_prices(body)
    }
}

/// Normalizes a Tiingo FX price list into ascending candles. One bad item
/// rejects the whole response.
pub fn parse_prices(body: Value) -> Result<Vec<Candle>, ForexError> {
    let Value::Array(items) = body else {
        return Err(ForexError::NotAList(body.to_string()));
    };

    let mut candles = items
        .into_iter()
        .map(|item| {
            let raw = item.to_string();
            let price: TiingoPrice = serde_json::from_value(item)
                .map_err(|e| ForexError::MalformedItem(e.to_string(), raw.clone()))?;
            let ts = DateTime::parse_from_rfc3339(&price.date)
                .map_err(|e| ForexError::MalformedItem(e.to_string(), raw))?
                .timestamp();

            Ok(Candle::new(ts, price.open, price.high, price.low, price.close, 0.0))
        })
        .collect::<Result<Vec<_>, ForexError>>()?;

    candles.sort_by_key(|c| c.timestamp);
    Ok(candles)
}
