//! Effectful shell around the pure decision core, using Stillwater 0.11.0.
//!
//! # Key Concepts
//!
//! - **Environment**: capabilities (`WeatherSource`, `StateStore`, `Notifier`)
//!   are traits implemented by an environment value, so tests can swap in doubles
//! - **Cycle**: observe (fetch + extract + load), decide (pure), commit
//!   (notify, then persist)
//! - **Effects**: each effectful step returns `impl Effect` and is run
//!   against the environment by the caller

mod cycle;
mod env;

pub use cycle::{CycleError, CycleOutcome, HardeningCycle, Observation, RunMode};
pub use env::AppEnv;
