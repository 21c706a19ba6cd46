//! Plant hardening: forecast-driven reminders to move plants in and out.
//!
//! Built on the "pure core, imperative shell" philosophy. The decision logic
//! is composed of pure functions with no side effects, while fetching the
//! forecast, persisting the state and sending notifications are isolated
//! behind capability traits and run as Stillwater effects.
//!
//! # Core Concepts
//!
//! - **State**: where the plants are, `PlantState::Inside` or `PlantState::Outside`
//! - **Forecast window**: the hourly temperatures that matter right now
//! - **Rules**: guarded transitions, evaluated in day or night mode
//! - **Cycle**: one scheduled run; observe, decide, then notify and persist
//!
//! # Example
//!
//! ```rust
//! use chrono::NaiveDate;
//! use plant_hardening::core::{decide, extract, HourlyReading, PlantState, Policy};
//!
//! let evening = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap().and_hms_opt(23, 30, 0).unwrap();
//! let readings: Vec<_> = [16.0, 14.0, 15.0, 13.0]
//!     .iter()
//!     .enumerate()
//!     .map(|(i, t)| {
//!         let time = NaiveDate::from_ymd_opt(2025, 5, 11).unwrap().and_hms_opt(i as u32, 0, 0).unwrap();
//!         HourlyReading::new(time, *t)
//!     })
//!     .collect();
//!
//! let policy = Policy::default();
//! let window = extract(&readings, evening, &policy);
//! let decision = decide(PlantState::Outside, &window, evening, &policy);
//!
//! assert_eq!(decision.to, PlantState::Inside);
//! assert!(decision.message.unwrap().contains("bring the plants inside"));
//! ```

pub mod config;
pub mod core;
pub mod effects;
pub mod notify;
pub mod store;
pub mod weather;

// Re-export commonly used types
pub use config::Config;
pub use self::core::{decide, extract, Decision, ForecastWindow, HourlyReading, PlantState, Policy};
pub use effects::{AppEnv, CycleError, CycleOutcome, HardeningCycle, RunMode};
pub use notify::Notifier;
pub use store::StateStore;
pub use weather::WeatherSource;
