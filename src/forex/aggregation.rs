use chrono::{DateTime, Datelike, Days, NaiveDate};
use tracing::warn;

use crate::forex::candle::Candle;
use crate::forex::granularity::Aggregation;

/**
 * Mechanic:
 * - walk the daily bars in ascending order
 * - derive the period each bar falls in (week by its Monday, month by (year, month))
 * - open an accumulator on a new period, fold into it while the period holds,
 *   emit it when the period changes and once more at the end
 */

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PeriodKey {
    /// Identified by the Monday that starts the week.
    Week(NaiveDate),
    Month { year: i32, month: u32 },
}

impl PeriodKey {
    pub fn for_timestamp(timestamp: i64, aggregation: Aggregation) -> Option<Self> {
        let date = DateTime::from_timestamp(timestamp, 0)?.date_naive();

        match aggregation {
            Aggregation::Weekly => {
                let back = u64::from(date.weekday().num_days_from_monday());
                date.checked_sub_days(Days::new(back)).map(PeriodKey::Week)
            }
            Aggregation::Monthly => Some(PeriodKey::Month {
                year: date.year(),
                month: date.month(),
            }),
        }
    }

    /// Period start, 00:00:00 UTC, as epoch seconds.
    pub fn start_timestamp(&self) -> Option<i64> {
        let day = match *self {
            PeriodKey::Week(monday) => monday,
            PeriodKey::Month { year, month } => NaiveDate::from_ymd_opt(year, month, 1)?,
        };

        Some(day.and_hms_opt(0, 0, 0)?.and_utc().timestamp())
    }
}

pub fn aggregate_weekly(daily: &[Candle]) -> Vec<Candle> {
    aggregate(daily, Aggregation::Weekly)
}

pub fn aggregate_monthly(daily: &[Candle]) -> Vec<Candle> {
    aggregate(daily, Aggregation::Monthly)
}

/// Buckets ascending daily candles into calendar periods. Partial periods at
/// either end are emitted as they are.
pub fn aggregate(daily: &[Candle], aggregation: Aggregation) -> Vec<Candle> {
    let mut periods: Vec<Candle> = Vec::new();
    let mut current: Option<(PeriodKey, Candle)> = None;

    for candle in daily {
        let Some((key, start)) = PeriodKey::for_timestamp(candle.timestamp, aggregation)
            .and_then(|key| key.start_timestamp().map(|start| (key, start)))
        else {
            warn!(timestamp = candle.timestamp, "Skipping candle outside calendar range");
            continue;
        };

        if let Some((open_key, acc)) = current.as_mut() {
            if *open_key == key {
                acc.merge(candle);
                continue;
            }
        }

        if let Some((_, finished)) = current.take() {
            periods.push(finished);
        }
        current = Some((key, Candle { timestamp: start, ..*candle }));
    }

    if let Some((_, finished)) = current {
        periods.push(finished);
    }

    periods
}

#[cfg(test)]
mod tests {
    use super::*;

    const DAY: i64 = 86_400;
    // 2023-01-02 00:00:00 UTC, a Monday
    const MON_2023_01_02: i64 = 1_672_617_600;

    fn day(ts: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Candle {
        Candle::new(ts, open, high, low, close, volume)
    }

    fn flat_days(start: i64, n: i64) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let p = 1.0 + i as f64 * 0.01;
                day(start + i * DAY, p, p + 0.005, p - 0.005, p + 0.002, 1.0)
            })
            .collect()
    }

    #[test]
    fn test_first_week_of_2023() {
        let daily = vec![
            day(MON_2023_01_02, 1.00, 1.02, 0.99, 1.01, 10.0),
            day(MON_2023_01_02 + DAY, 1.01, 1.03, 1.00, 1.02, 11.0),
            day(MON_2023_01_02 + 2 * DAY, 1.02, 1.08, 1.01, 1.03, 12.0),
            day(MON_2023_01_02 + 3 * DAY, 1.03, 1.04, 0.95, 1.04, 13.0),
            day(MON_2023_01_02 + 4 * DAY, 1.04, 1.05, 1.02, 1.05, 14.0),
            day(MON_2023_01_02 + 5 * DAY, 1.05, 1.06, 1.03, 1.06, 15.0),
            day(MON_2023_01_02 + 6 * DAY, 1.06, 1.07, 1.04, 1.07, 16.0),
        ];

        let weekly = aggregate_weekly(&daily);

        assert_eq!(weekly.len(), 1);
        let w = weekly[0];
        assert_eq!(w.timestamp, MON_2023_01_02);
        assert_eq!(w.open, 1.00);
        assert_eq!(w.high, 1.08);
        assert_eq!(w.low, 0.95);
        assert_eq!(w.close, 1.07);
        assert_eq!(w.volume, 91.0);
    }

    #[test]
    fn test_empty_input() {
        assert!(aggregate_weekly(&[]).is_empty());
        assert!(aggregate_monthly(&[]).is_empty());
    }

    #[test]
    fn test_single_sample_week_is_degenerate() {
        // Wednesday 2023-01-04
        let only = day(MON_2023_01_02 + 2 * DAY, 1.10, 1.12, 1.09, 1.11, 3.0);
        let weekly = aggregate_weekly(&[only]);

        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].timestamp, MON_2023_01_02);
        assert_eq!(
            (weekly[0].open, weekly[0].high, weekly[0].low, weekly[0].close),
            (only.open, only.high, only.low, only.close)
        );
    }

    #[test]
    fn test_whole_weeks_produce_one_candle_each() {
        let daily = flat_days(MON_2023_01_02, 5 * 7);
        let weekly = aggregate_weekly(&daily);

        assert_eq!(weekly.len(), 5);
        for (i, w) in weekly.iter().enumerate() {
            assert_eq!(w.timestamp, MON_2023_01_02 + i as i64 * 7 * DAY);
            assert_eq!(w.volume, 7.0);
        }
    }

    #[test]
    fn test_reduction_matches_inputs_per_period() {
        let daily = flat_days(MON_2023_01_02 + 3 * DAY, 40);
        let weekly = aggregate_weekly(&daily);

        for w in &weekly {
            let members: Vec<&Candle> = daily
                .iter()
                .filter(|c| c.timestamp >= w.timestamp && c.timestamp < w.timestamp + 7 * DAY)
                .collect();
            let high = members.iter().map(|c| c.high).fold(f64::MIN, f64::max);
            let low = members.iter().map(|c| c.low).fold(f64::MAX, f64::min);
            let volume: f64 = members.iter().map(|c| c.volume).sum();

            assert_eq!(w.open, members[0].open);
            assert_eq!(w.close, members[members.len() - 1].close);
            assert_eq!(w.high, high);
            assert_eq!(w.low, low);
            assert_eq!(w.volume, volume);
        }
    }

    #[test]
    fn test_output_is_strictly_ascending() {
        let daily = flat_days(MON_2023_01_02 - 10 * DAY, 120);

        for out in [aggregate_weekly(&daily), aggregate_monthly(&daily)] {
            assert!(out.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        }
    }

    #[test]
    fn test_partial_weeks_at_both_ends() {
        // Thursday 2023-01-05 through Tuesday 2023-01-17
        let daily = flat_days(MON_2023_01_02 + 3 * DAY, 13);
        let weekly = aggregate_weekly(&daily);

        assert_eq!(weekly.len(), 3);
        assert_eq!(weekly[0].volume, 4.0);
        assert_eq!(weekly[1].volume, 7.0);
        assert_eq!(weekly[2].volume, 2.0);
    }

    #[test]
    fn test_week_spanning_new_year_stays_one_bucket() {
        // Monday 2024-12-30 through Sunday 2025-01-05
        let mon_2024_12_30 = 1_735_516_800;
        let daily = flat_days(mon_2024_12_30, 7);
        let weekly = aggregate_weekly(&daily);

        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].timestamp, mon_2024_12_30);
    }

    #[test]
    fn test_weeks_before_and_after_new_year_stay_in_order() {
        // Monday 2024-12-16 through Sunday 2025-01-19
        let mon_2024_12_16 = 1_734_307_200;
        let daily = flat_days(mon_2024_12_16, 35);
        let weekly = aggregate_weekly(&daily);

        let starts: Vec<i64> = weekly.iter().map(|w| w.timestamp).collect();
        assert_eq!(
            starts,
            (0..5).map(|w| mon_2024_12_16 + w * 7 * DAY).collect::<Vec<_>>()
        );
        assert!(weekly.iter().all(|w| w.volume == 7.0));

        // 2024-12-30 .. 2025-01-05 is ISO week 1 of 2025 but keeps its Monday key
        let straddling = weekly[2];
        assert_eq!(straddling.timestamp, 1_735_516_800);
        assert_eq!(straddling.open, daily[14].open);
        assert_eq!(straddling.close, daily[20].close);
    }

    #[test]
    fn test_intraday_timestamp_snaps_to_monday_midnight() {
        // Friday 2023-01-06 21:00 UTC
        let friday_evening = MON_2023_01_02 + 4 * DAY + 21 * 3_600;
        let weekly = aggregate_weekly(&[day(friday_evening, 1.0, 1.0, 1.0, 1.0, 0.0)]);
        assert_eq!(weekly[0].timestamp, MON_2023_01_02);
    }

    #[test]
    fn test_monthly_buckets_start_on_the_first() {
        // 2023-01-02 .. 2023-03-12
        let daily = flat_days(MON_2023_01_02, 70);
        let monthly = aggregate_monthly(&daily);

        assert_eq!(monthly.len(), 3);
        assert_eq!(monthly[0].timestamp, 1_672_531_200); // 2023-01-01
        assert_eq!(monthly[1].timestamp, 1_675_209_600); // 2023-02-01
        assert_eq!(monthly[2].timestamp, 1_677_628_800); // 2023-03-01
        assert_eq!(monthly[0].volume, 30.0);
        assert_eq!(monthly[1].volume, 28.0);
        assert_eq!(monthly[2].volume, 12.0);
        assert_eq!(monthly[0].open, daily[0].open);
        assert_eq!(monthly[0].close, daily[29].close);
    }

    #[test]
    fn test_monthly_december_into_january() {
        // 2022-12-15 .. 2023-01-23
        let dec_15 = 1_671_062_400;
        let daily = flat_days(dec_15, 40);
        let monthly = aggregate_monthly(&daily);

        assert_eq!(monthly.len(), 2);
        assert_eq!(monthly[0].timestamp, 1_669_852_800); // 2022-12-01
        assert_eq!(monthly[1].timestamp, 1_672_531_200); // 2023-01-01
        assert_eq!(monthly[0].volume, 17.0);
        assert_eq!(monthly[1].volume, 23.0);
        assert_eq!(monthly[0].close, daily[16].close);
        assert_eq!(monthly[1].open, daily[17].open);
        assert_eq!(monthly[1].high, daily[39].high);
    }

    #[test]
    fn test_period_key_for_sunday_points_back_to_monday() {
        let sunday = MON_2023_01_02 + 6 * DAY;
        let key = PeriodKey::for_timestamp(sunday, Aggregation::Weekly).unwrap();
        assert_eq!(key, PeriodKey::Week(NaiveDate::from_ymd_opt(2023, 1, 2).unwrap()));
        assert_eq!(key.start_timestamp(), Some(MON_2023_01_02));
    }

    #[test]
    fn test_out_of_range_timestamp_is_skipped() {
        let daily = vec![
            day(i64::MAX, 1.0, 1.0, 1.0, 1.0, 1.0),
            day(MON_2023_01_02, 1.0, 1.1, 0.9, 1.0, 1.0),
        ];
        let weekly = aggregate_weekly(&daily);
        assert_eq!(weekly.len(), 1);
        assert_eq!(weekly[0].volume, 1.0);
    }
}
