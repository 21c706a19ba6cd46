//! Decision policy shared by the extractor and the decider.

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Hour of day at which night mode begins.
pub const NIGHT_START_HOUR: u32 = 23;

/// Threshold separating "safe outside" from "must be inside", in °C.
pub const DEFAULT_THRESHOLD_C: f64 = 15.0;

/// Number of hourly slots evaluated in day mode.
pub const DEFAULT_HORIZON_HOURS: u32 = 3;

/// Hour on the following morning at which the night window closes.
pub const DEFAULT_NIGHT_END_HOUR: u32 = 6;

/// Which time-of-day rules apply to a run.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Mode {
    /// Before 23:00: look at the next few hours.
    Day,
    /// From 23:00: look at the whole night.
    Night,
}

impl Mode {
    pub fn at(now: NaiveDateTime) -> Self {
        if now.hour() < NIGHT_START_HOUR {
            Self::Day
        } else {
            Self::Night
        }
    }
}

/// Where the day-mode window begins relative to the rounded-up hour.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DayWindowStart {
    /// First slot is the rounded-up hour itself.
    #[default]
    RoundedHour,
    /// First slot is one hour after the rounded-up hour.
    HourAfter,
}

/// Condition that brings plants back inside at night.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NightReturn {
    /// At least one overnight value is at or below the threshold.
    #[default]
    NotAllAbove,
    /// At least one overnight value is strictly below the threshold.
    AnyBelow,
}

/// Immutable parameters for window extraction and decisions.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub threshold_c: f64,
    pub horizon_hours: u32,
    pub night_end_hour: u32,
    pub day_window_start: DayWindowStart,
    pub night_return: NightReturn,
}

impl Default for Policy {
    fn default() -> Self {
        Self {
            threshold_c: DEFAULT_THRESHOLD_C,
            horizon_hours: DEFAULT_HORIZON_HOURS,
            night_end_hour: DEFAULT_NIGHT_END_HOUR,
            day_window_start: DayWindowStart::default(),
            night_return: NightReturn::default(),
        }
    }
}
