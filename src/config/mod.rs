//! Startup configuration.
//!
//! Values come from, in increasing precedence: built-in defaults, an optional
//! TOML file, `PLANT_HARDENING_*` environment variables and command-line flags.
//! The result is validated once and then passed around immutably.
//!
//! ```toml
//! state_file = "/var/lib/plants/plant_status.json"
//!
//! [location]
//! latitude = 47.3769
//! longitude = 8.5417
//! timezone = "Europe/Zurich"
//!
//! [policy]
//! threshold_c = 15.0
//! horizon_hours = 3
//! night_end_hour = 6
//! day_window_start = "rounded_hour"
//! night_return = "not_all_above"
//!
//! [notifier]
//! webhook_url = "https://push.example.org/hook"
//! ```

use crate::core::Policy;
use crate::notify::DEFAULT_TITLE;
use crate::store::DEFAULT_STATE_FILE;
use crate::weather::{Location, DEFAULT_BASE_URL};
use chrono::{NaiveDateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use stillwater::validation::Validation;
use stillwater::NonEmptyVec;

pub mod error;

pub use error::ConfigError;

/// Config file read when `--config` is not given and the file exists.
pub const DEFAULT_CONFIG_FILE: &str = "plant-hardening.toml";

pub const ENV_STATE_FILE: &str = "PLANT_HARDENING_STATE_FILE";
pub const ENV_WEBHOOK_URL: &str = "PLANT_HARDENING_WEBHOOK_URL";
pub const ENV_WEBHOOK_TOKEN: &str = "PLANT_HARDENING_WEBHOOK_TOKEN";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

type ConfigCheck = Validation<(), NonEmptyVec<ConfigError>>;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WeatherConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for WeatherConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Without a webhook, notifications only go to the log.
    pub webhook_url: Option<String>,
    pub token: Option<String>,
    pub title: String,
    pub timeout_secs: u64,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            webhook_url: None,
            token: None,
            title: DEFAULT_TITLE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub state_file: PathBuf,
    pub location: Location,
    pub policy: Policy,
    pub weather: WeatherConfig,
    pub notifier: NotifierConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            location: Location::default(),
            policy: Policy::default(),
            weather: WeatherConfig::default(),
            notifier: NotifierConfig::default(),
        }
    }
}

impl Config {
    /// Load from `path`, or from [`DEFAULT_CONFIG_FILE`] if it exists, or defaults.
    ///
    /// An explicitly named file must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => (PathBuf::from(DEFAULT_CONFIG_FILE), false),
        };

        if !required && !path.exists() {
            tracing::debug!("No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|e| ConfigError::Read {
            path: path.clone(),
            message: e.to_string(),
        })?;
        let config = Self::from_toml_str(&content).map_err(|message| ConfigError::Parse {
            path: path.clone(),
            message,
        })?;
        tracing::debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Apply `PLANT_HARDENING_*` overrides from the process environment.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides_from(|key| std::env::var(key).ok())
    }

    /// Apply overrides from an arbitrary variable lookup.
    pub fn with_overrides_from<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(state_file) = lookup(ENV_STATE_FILE) {
            self.state_file = PathBuf::from(state_file);
        }
        if let Some(url) = lookup(ENV_WEBHOOK_URL) {
            self.notifier.webhook_url = Some(url);
        }
        if let Some(token) = lookup(ENV_WEBHOOK_TOKEN) {
            self.notifier.token = Some(token);
        }
        self
    }

    /// Check every setting, collecting all problems instead of stopping at the first.
    pub fn validate(&self) -> ConfigCheck {
        let location = &self.location;
        let policy = &self.policy;

        let checks = vec![
            check(
                (-90.0..=90.0).contains(&location.latitude),
                ConfigError::LatitudeOutOfRange(location.latitude),
            ),
            check(
                (-180.0..=180.0).contains(&location.longitude),
                ConfigError::LongitudeOutOfRange(location.longitude),
            ),
            check(
                location.timezone.parse::<Tz>().is_ok(),
                ConfigError::UnknownTimezone(location.timezone.clone()),
            ),
            check(
                policy.threshold_c.is_finite(),
                ConfigError::NonFiniteThreshold(policy.threshold_c),
            ),
            check(policy.horizon_hours > 0, ConfigError::ZeroHorizon),
            check(
                policy.night_end_hour < 24,
                ConfigError::HourOutOfRange {
                    field: "night_end_hour",
                    value: policy.night_end_hour,
                },
            ),
            check(
                !self.state_file.as_os_str().is_empty(),
                ConfigError::Empty("state_file"),
            ),
            check(
                !self.weather.base_url.trim().is_empty(),
                ConfigError::Empty("weather.base_url"),
            ),
            check(
                self.weather.timeout_secs > 0,
                ConfigError::ZeroTimeout("weather.timeout_secs"),
            ),
            check(
                self.notifier
                    .webhook_url
                    .as_deref()
                    .map_or(true, |url| !url.trim().is_empty()),
                ConfigError::Empty("notifier.webhook_url"),
            ),
            check(
                self.notifier.timeout_secs > 0,
                ConfigError::ZeroTimeout("notifier.timeout_secs"),
            ),
        ];

        Validation::all_vec(checks).map(|_| ())
    }

    /// Validate and fold every problem into a single error.
    pub fn validated(self) -> Result<Self, ConfigError> {
        match self.validate() {
            Validation::Success(_) => Ok(self),
            Validation::Failure(errors) => {
                let details: Vec<String> = errors.iter().map(|e| e.to_string()).collect();
                Err(ConfigError::Invalid(details.join("; ")))
            }
        }
    }

    pub fn timezone(&self) -> Result<Tz, ConfigError> {
        self.location
            .timezone
            .parse::<Tz>()
            .map_err(|_| ConfigError::UnknownTimezone(self.location.timezone.clone()))
    }

    /// Current wall-clock time at the forecast location.
    pub fn local_now(&self) -> Result<NaiveDateTime, ConfigError> {
        let tz = self.timezone()?;
        Ok(Utc::now().with_timezone(&tz).naive_local())
    }
}

fn check(ok: bool, error: ConfigError) -> ConfigCheck {
    if ok {
        Validation::success(())
    } else {
        Validation::fail(error)
    }
}
