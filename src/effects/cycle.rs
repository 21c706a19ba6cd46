//! One decision cycle: observe, decide, commit.

use crate::core::{decide, extract, Decision, ForecastWindow, PlantState, Policy};
use crate::notify::{NotifyError, Notifier};
use crate::store::{StateStore, StoreError};
use crate::weather::{WeatherError, WeatherSource};
use chrono::NaiveDateTime;
use stillwater::effect::Effect;
use stillwater::prelude::*;
use thiserror::Error;

/// Errors that end a cycle. None of them leave a partial state write behind.
#[derive(Debug, Error)]
pub enum CycleError {
    /// Fetching or decoding the forecast failed; nothing was changed
    #[error(transparent)]
    Weather(#[from] WeatherError),

    /// The reminder could not be delivered; the state was not written
    #[error("Notification failed: {0}")]
    Notification(#[from] NotifyError),

    /// The reminder went out but the new state could not be saved
    #[error("State write failed: {0}")]
    StateWrite(#[from] StoreError),
}

/// Whether a cycle may touch the outside world after deciding.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum RunMode {
    #[default]
    Live,
    /// Decide and log, but neither notify nor persist.
    DryRun,
}

/// Inputs gathered from the environment before deciding.
#[derive(Clone, Debug, PartialEq)]
pub struct Observation {
    pub now: NaiveDateTime,
    pub readings: usize,
    pub window: ForecastWindow,
    pub current: PlantState,
}

/// Result of a completed cycle.
#[derive(Clone, Debug, PartialEq)]
pub struct CycleOutcome {
    pub observation: Observation,
    pub decision: Decision,
    /// True when the notification was sent and the new state saved.
    pub committed: bool,
}

/// A single scheduled evaluation at a fixed instant.
///
/// Invocations must not overlap; the scheduler running the binary is
/// responsible for that.
#[derive(Clone, Debug)]
pub struct HardeningCycle {
    policy: Policy,
    title: String,
    now: NaiveDateTime,
}

impl HardeningCycle {
    pub fn new(policy: Policy, title: impl Into<String>, now: NaiveDateTime) -> Self {
        Self {
            policy,
            title: title.into(),
            now,
        }
    }

    pub fn now(&self) -> NaiveDateTime {
        self.now
    }

    /// Fetch the forecast, extract the window and load the current state.
    pub fn observe<Env>(&self) -> impl Effect<Output = Observation, Error = CycleError, Env = Env>
    where
        Env: WeatherSource + StateStore + Clone + Send + Sync + 'static,
    {
        let policy = self.policy.clone();
        let now = self.now;

        from_fn(move |env: &Env| -> Result<Observation, CycleError> {
            let readings = env.hourly_temperatures()?;
            let window = extract(&readings, now, &policy);
            let current = env.get();
            Ok(Observation {
                now,
                readings: readings.len(),
                window,
                current,
            })
        })
    }

    /// Decide on an observation (pure).
    pub fn decide(&self, observation: &Observation) -> Decision {
        decide(
            observation.current,
            &observation.window,
            observation.now,
            &self.policy,
        )
    }

    /// Send the reminder, then save the new state.
    ///
    /// Yields `false` without touching the environment when the decision
    /// carries no message.
    pub fn commit<Env>(
        &self,
        decision: &Decision,
    ) -> impl Effect<Output = bool, Error = CycleError, Env = Env>
    where
        Env: Notifier + StateStore + Clone + Send + Sync + 'static,
    {
        let decision = decision.clone();
        let title = self.title.clone();

        from_fn(move |env: &Env| -> Result<bool, CycleError> {
            let Some(message) = decision.message.as_deref() else {
                return Ok(false);
            };
            env.send(message, &title)?;
            env.set(decision.to)?;
            Ok(true)
        })
    }

    /// Run observe, decide and (in live mode) commit against `env`.
    pub async fn run<Env>(&self, env: &Env, mode: RunMode) -> Result<CycleOutcome, CycleError>
    where
        Env: WeatherSource + StateStore + Notifier + Clone + Send + Sync + 'static,
    {
        let observation = self.observe::<Env>().run(env).await?;
        tracing::info!(
            now = %observation.now,
            readings = observation.readings,
            window = ?observation.window.temperatures(),
            current = %observation.current,
            "Observed forecast"
        );

        let decision = self.decide(&observation);
        if !decision.changed() {
            tracing::info!(state = %decision.to, "No change");
            return Ok(CycleOutcome {
                observation,
                decision,
                committed: false,
            });
        }

        tracing::info!(
            from = %decision.from,
            to = %decision.to,
            message = decision.message.as_deref().unwrap_or_default(),
            "Transition decided"
        );

        let committed = match mode {
            RunMode::Live => self.commit::<Env>(&decision).run(env).await?,
            RunMode::DryRun => {
                tracing::info!("Dry run, not notifying or saving");
                false
            }
        };

        Ok(CycleOutcome {
            observation,
            decision,
            committed,
        })
    }
}
