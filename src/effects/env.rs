//! Production environment wiring the real collaborators together.

use super::cycle::CycleError;
use crate::config::Config;
use crate::core::{HourlyReading, PlantState};
use crate::notify::{ConfiguredNotifier, LogNotifier, Notifier, NotifyError, WebhookNotifier};
use crate::store::{JsonFileStore, StateStore, StoreError};
use crate::weather::{OpenMeteoClient, WeatherError, WeatherSource};
use std::time::Duration;

/// Open-Meteo forecasts, a JSON state file and the configured notifier.
#[derive(Clone, Debug)]
pub struct AppEnv {
    weather: OpenMeteoClient,
    store: JsonFileStore,
    notifier: ConfiguredNotifier,
}

impl AppEnv {
    pub fn new(weather: OpenMeteoClient, store: JsonFileStore, notifier: ConfiguredNotifier) -> Self {
        Self {
            weather,
            store,
            notifier,
        }
    }

    pub fn from_config(config: &Config) -> Result<Self, CycleError> {
        let weather = OpenMeteoClient::new(
            config.weather.base_url.clone(),
            config.location.clone(),
            Duration::from_secs(config.weather.timeout_secs),
        )?;

        let notifier = match &config.notifier.webhook_url {
            Some(url) => ConfiguredNotifier::Webhook(WebhookNotifier::new(
                url.clone(),
                config.notifier.token.clone(),
                Duration::from_secs(config.notifier.timeout_secs),
            )?),
            None => {
                tracing::debug!("No webhook configured, notifications go to the log");
                ConfiguredNotifier::Log(LogNotifier)
            }
        };

        Ok(Self::new(
            weather,
            JsonFileStore::new(config.state_file.clone()),
            notifier,
        ))
    }
}

impl WeatherSource for AppEnv {
    fn hourly_temperatures(&self) -> Result<Vec<HourlyReading>, WeatherError> {
        self.weather.hourly_temperatures()
    }
}

impl StateStore for AppEnv {
    fn get(&self) -> PlantState {
        self.store.get()
    }

    fn set(&self, state: PlantState) -> Result<(), StoreError> {
        self.store.set(state)
    }
}

impl Notifier for AppEnv {
    fn send(&self, message: &str, title: &str) -> Result<(), NotifyError> {
        self.notifier.send(message, title)
    }
}
