//! Forecast window extraction.
//!
//! Turns an hourly temperature series into the ordered list of values the
//! decider evaluates. Timestamps are local wall-clock times in the forecast
//! location's timezone, so all arithmetic here is on naive datetimes.

use super::policy::{DayWindowStart, Mode, Policy};
use chrono::{Duration, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// One forecast hour.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct HourlyReading {
    pub time: NaiveDateTime,
    pub temperature_c: f64,
}

impl HourlyReading {
    pub fn new(time: NaiveDateTime, temperature_c: f64) -> Self {
        Self {
            time,
            temperature_c,
        }
    }
}

/// Ordered temperatures relevant to one decision. Timestamps are dropped.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ForecastWindow(Vec<f64>);

impl ForecastWindow {
    pub fn temperatures(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Non-empty and every value strictly above `threshold`.
    pub fn all_above(&self, threshold: f64) -> bool {
        !self.is_empty() && self.0.iter().all(|t| *t > threshold)
    }

    /// Non-empty and every value strictly below `threshold`.
    pub fn all_below(&self, threshold: f64) -> bool {
        !self.is_empty() && self.0.iter().all(|t| *t < threshold)
    }

    /// At least one value strictly below `threshold`.
    pub fn any_below(&self, threshold: f64) -> bool {
        self.0.iter().any(|t| *t < threshold)
    }
}

impl From<Vec<f64>> for ForecastWindow {
    fn from(values: Vec<f64>) -> Self {
        Self(values)
    }
}

/// `now` rounded up to the next full hour.
///
/// Anything within minute 0 counts as on the hour, so a scheduler firing a
/// few seconds late still evaluates the current hour.
pub fn round_up_to_hour(now: NaiveDateTime) -> NaiveDateTime {
    let truncated = now.date().and_time(NaiveTime::MIN) + Duration::hours(i64::from(now.hour()));
    if now.minute() > 0 {
        truncated + Duration::hours(1)
    } else {
        truncated
    }
}

/// Extract the temperatures to evaluate at `now`.
///
/// Day mode returns up to `horizon_hours` consecutive hourly slots; night mode
/// returns every reading from the rounded-up hour through `night_end_hour`
/// on the day after `now`. Slots missing from `readings` are skipped, so an
/// empty window is possible and means no decision can be made.
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use plant_hardening::core::{extract, HourlyReading, Policy};
///
/// let day = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap();
/// let readings: Vec<_> = [10.0, 12.0, 16.0, 17.0, 18.0]
///     .iter()
///     .enumerate()
///     .map(|(i, t)| HourlyReading::new(day.and_hms_opt(10 + i as u32, 0, 0).unwrap(), *t))
///     .collect();
///
/// let now = day.and_hms_opt(10, 15, 0).unwrap();
/// let window = extract(&readings, now, &Policy::default());
/// assert_eq!(window.temperatures(), &[12.0, 16.0, 17.0]);
/// ```
pub fn extract(readings: &[HourlyReading], now: NaiveDateTime, policy: &Policy) -> ForecastWindow {
    let base = round_up_to_hour(now);

    let values: Vec<f64> = match Mode::at(now) {
        Mode::Day => {
            let start = match policy.day_window_start {
                DayWindowStart::RoundedHour => base,
                DayWindowStart::HourAfter => base + Duration::hours(1),
            };
            (0..i64::from(policy.horizon_hours))
                .map(|i| start + Duration::hours(i))
                .filter_map(|slot| {
                    readings
                        .iter()
                        .find(|r| r.time == slot)
                        .map(|r| r.temperature_c)
                })
                .collect()
        }
        Mode::Night => {
            let end = night_end(now, policy.night_end_hour);
            readings
                .iter()
                .filter(|r| r.time >= base && r.time <= end)
                .map(|r| r.temperature_c)
                .collect()
        }
    };

    ForecastWindow(values)
}

/// `night_end_hour` o'clock on the calendar day after `now`.
fn night_end(now: NaiveDateTime, night_end_hour: u32) -> NaiveDateTime {
    let next_day = now.date() + Duration::days(1);
    next_day.and_time(NaiveTime::MIN) + Duration::hours(i64::from(night_end_hour))
}
