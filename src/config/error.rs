//! Configuration error types.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while loading or validating configuration
#[derive(Debug, Clone, Error, PartialEq)]
pub enum ConfigError {
    #[error("Cannot read config file {path}: {message}")]
    Read { path: PathBuf, message: String },

    #[error("Cannot parse config file {path}: {message}")]
    Parse { path: PathBuf, message: String },

    #[error("Latitude {0} is outside -90..=90")]
    LatitudeOutOfRange(f64),

    #[error("Longitude {0} is outside -180..=180")]
    LongitudeOutOfRange(f64),

    #[error("Unknown timezone '{0}'")]
    UnknownTimezone(String),

    #[error("Threshold must be a finite temperature, got {0}")]
    NonFiniteThreshold(f64),

    #[error("Forecast horizon must be at least one hour")]
    ZeroHorizon,

    #[error("{field} must be an hour of day (0-23), got {value}")]
    HourOutOfRange { field: &'static str, value: u32 },

    #[error("{0} must not be empty")]
    Empty(&'static str),

    #[error("{0} must be greater than zero")]
    ZeroTimeout(&'static str),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
