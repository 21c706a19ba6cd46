//! State trait and the tracked plant location.
//!
//! States are plain values; inspecting them has no side effects.

use serde::{Deserialize, Serialize};
use std::fmt::{self, Debug};
use std::str::FromStr;

/// Trait for state machine states.
///
/// # Required Traits
///
/// - `Clone`: states are copied into decisions and log events
/// - `PartialEq`: rules match on the current state
/// - `Debug`: states must be debuggable for diagnostics
/// - `Serialize` + `Deserialize`: states are persisted between runs
pub trait State:
    Clone + PartialEq + Debug + Serialize + for<'de> Deserialize<'de> + Send + Sync
{
    /// Get the state's name for display/logging.
    fn name(&self) -> &str;

    /// Check if this is a final (terminal) state.
    ///
    /// Default implementation returns `false`.
    fn is_final(&self) -> bool {
        false
    }
}

/// Where the plants currently are.
///
/// Persisted as `"inside"` / `"outside"`. A fresh installation starts
/// with the plants inside.
///
/// # Example
///
/// ```rust
/// use plant_hardening::core::{PlantState, State};
///
/// let state: PlantState = "outside".parse().unwrap();
/// assert_eq!(state.name(), "outside");
/// assert_eq!(PlantState::default(), PlantState::Inside);
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlantState {
    #[default]
    Inside,
    Outside,
}

impl State for PlantState {
    fn name(&self) -> &str {
        match self {
            Self::Inside => "inside",
            Self::Outside => "outside",
        }
    }
}

impl fmt::Display for PlantState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a persisted or user-supplied state name is unknown.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("Unknown plant state '{0}', expected 'inside' or 'outside'")]
pub struct UnknownState(pub String);

impl FromStr for PlantState {
    type Err = UnknownState;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inside" => Ok(Self::Inside),
            "outside" => Ok(Self::Outside),
            _ => Err(UnknownState(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_name_returns_correct_value() {
        assert_eq!(PlantState::Inside.name(), "inside");
        assert_eq!(PlantState::Outside.name(), "outside");
    }

    #[test]
    fn no_state_is_terminal() {
        assert!(!PlantState::Inside.is_final());
        assert!(!PlantState::Outside.is_final());
    }

    #[test]
    fn default_state_is_inside() {
        assert_eq!(PlantState::default(), PlantState::Inside);
    }

    #[test]
    fn state_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&PlantState::Outside).unwrap(),
            "\"outside\""
        );
        let parsed: PlantState = serde_json::from_str("\"inside\"").unwrap();
        assert_eq!(parsed, PlantState::Inside);
    }

    #[test]
    fn unknown_serialized_state_is_rejected() {
        assert!(serde_json::from_str::<PlantState>("\"greenhouse\"").is_err());
    }

    #[test]
    fn parse_accepts_case_and_whitespace() {
        assert_eq!(" Outside ".parse::<PlantState>(), Ok(PlantState::Outside));
        assert_eq!("INSIDE".parse::<PlantState>(), Ok(PlantState::Inside));
        assert_eq!(
            "porch".parse::<PlantState>(),
            Err(UnknownState("porch".to_string()))
        );
    }

    #[test]
    fn display_matches_name() {
        assert_eq!(PlantState::Outside.to_string(), "outside");
    }
}
