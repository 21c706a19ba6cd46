//! Pure decision core.
//!
//! This module contains everything that does not touch the outside world:
//! - State definitions via the `State` trait and `PlantState`
//! - Forecast window extraction
//! - Guarded transition rules and the decider
//!
//! All logic in this module is pure (no side effects), following
//! the "pure core, imperative shell" philosophy.

mod decision;
mod forecast;
mod guard;
mod policy;
mod state;

pub use decision::{decide, rules, Decision, Rule};
pub use forecast::{extract, round_up_to_hour, ForecastWindow, HourlyReading};
pub use guard::Guard;
pub use policy::{
    DayWindowStart, Mode, NightReturn, Policy, DEFAULT_HORIZON_HOURS, DEFAULT_NIGHT_END_HOUR,
    DEFAULT_THRESHOLD_C, NIGHT_START_HOUR,
};
pub use state::{PlantState, State, UnknownState};
