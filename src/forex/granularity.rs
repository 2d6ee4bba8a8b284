use std::str::FromStr;

use anyhow::anyhow;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Granularity {
    #[serde(rename = "1m")]
    OneMinute,
    #[serde(rename = "5m")]
    FiveMinutes,
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "30m")]
    ThirtyMinutes,
    #[serde(rename = "1H")]
    OneHour,
    #[serde(rename = "4H")]
    FourHours,
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

/// How a coarse granularity is synthesized from daily bars.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Aggregation {
    Weekly,
    Monthly,
}

impl Aggregation {
    /// Daily bars needed per output period.
    pub fn days_per_period(&self) -> u32 {
        match self {
            Aggregation::Weekly => 7,
            Aggregation::Monthly => 30,
        }
    }
}

impl Granularity {
    pub fn seconds_per_bar(&self) -> i64 {
        match self {
            Granularity::OneMinute => 60,
            Granularity::FiveMinutes => 300,
            Granularity::FifteenMinutes => 900,
            Granularity::ThirtyMinutes => 1_800,
            Granularity::OneHour => 3_600,
            Granularity::FourHours => 14_400,
            Granularity::OneDay => 86_400,
            Granularity::OneWeek => 604_800,
            Granularity::OneMonth => 2_592_000,
        }
    }

    /// Tiingo `resampleFreq` code, `None` when the provider cannot serve it directly.
    pub fn provider_resolution(&self) -> Option<&'static str> {
        match self {
            Granularity::OneMinute => Some("1min"),
            Granularity::FiveMinutes => Some("5min"),
            Granularity::FifteenMinutes => Some("15min"),
            Granularity::ThirtyMinutes => Some("30min"),
            Granularity::OneHour => Some("1hour"),
            Granularity::FourHours => Some("4hour"),
            Granularity::OneDay => Some("1day"),
            Granularity::OneWeek | Granularity::OneMonth => None,
        }
    }

    pub fn aggregation(&self) -> Option<Aggregation> {
        match self {
            Granularity::OneWeek => Some(Aggregation::Weekly),
            Granularity::OneMonth => Some(Aggregation::Monthly),
            _ => None,
        }
    }

    /// The granularity actually requested from the provider.
    pub fn source(&self) -> Granularity {
        match self.aggregation() {
            Some(_) => Granularity::OneDay,
            None => *self,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Granularity::OneMinute => "1m",
            Granularity::FiveMinutes => "5m",
            Granularity::FifteenMinutes => "15m",
            Granularity::ThirtyMinutes => "30m",
            Granularity::OneHour => "1H",
            Granularity::FourHours => "4H",
            Granularity::OneDay => "1D",
            Granularity::OneWeek => "1W",
            Granularity::OneMonth => "1M",
        }
    }
}

impl FromStr for Granularity {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "1m" => Ok(Granularity::OneMinute),
            "5m" => Ok(Granularity::FiveMinutes),
            "15m" => Ok(Granularity::FifteenMinutes),
            "30m" => Ok(Granularity::ThirtyMinutes),
            "1H" => Ok(Granularity::OneHour),
            "4H" => Ok(Granularity::FourHours),
            "1D" => Ok(Granularity::OneDay),
            "1W" => Ok(Granularity::OneWeek),
            "1M" => Ok(Granularity::OneMonth),
            _ => Err(anyhow!("Unsupported timeframe: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_sensitive_for_minutes_and_months() {
        assert_eq!("1m".parse::<Granularity>().unwrap(), Granularity::OneMinute);
        assert_eq!("1M".parse::<Granularity>().unwrap(), Granularity::OneMonth);
        assert!("1h".parse::<Granularity>().is_err());
        assert!("2D".parse::<Granularity>().is_err());
    }

    #[test]
    fn test_week_and_month_are_synthesized_from_days() {
        assert_eq!(Granularity::OneWeek.provider_resolution(), None);
        assert_eq!(Granularity::OneMonth.provider_resolution(), None);
        assert_eq!(Granularity::OneWeek.source(), Granularity::OneDay);
        assert_eq!(Granularity::OneMonth.aggregation(), Some(Aggregation::Monthly));
    }

    #[test]
    fn test_native_resolutions() {
        assert_eq!(Granularity::FourHours.provider_resolution(), Some("4hour"));
        assert_eq!(Granularity::OneDay.provider_resolution(), Some("1day"));
        assert_eq!(Granularity::FifteenMinutes.source(), Granularity::FifteenMinutes);
    }

    #[test]
    fn test_as_str_round_trips_through_from_str() {
        for g in [Granularity::OneHour, Granularity::OneWeek, Granularity::ThirtyMinutes] {
            assert_eq!(g.as_str().parse::<Granularity>().unwrap(), g);
        }
    }
}
