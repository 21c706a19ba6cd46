//! Transition decisions.
//!
//! The decider is a table of guarded rules. Each rule names the mode it
//! applies in, the state it leaves, the state it enters and a guard over
//! the forecast window. At most one rule matches a given state and mode.

use super::forecast::ForecastWindow;
use super::guard::Guard;
use super::policy::{Mode, NightReturn, Policy};
use super::state::{PlantState, State};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

type MessageFn = Box<dyn Fn(&ForecastWindow) -> String + Send + Sync>;

/// A guarded transition between two states.
pub struct Rule<S: State> {
    pub mode: Mode,
    pub from: S,
    pub to: S,
    pub guard: Guard<ForecastWindow>,
    message: MessageFn,
}

impl<S: State> Rule<S> {
    pub fn new<F>(mode: Mode, from: S, to: S, guard: Guard<ForecastWindow>, message: F) -> Self
    where
        F: Fn(&ForecastWindow) -> String + Send + Sync + 'static,
    {
        Self {
            mode,
            from,
            to,
            guard,
            message: Box::new(message),
        }
    }

    /// Check if this rule fires for the current state, mode and window (pure)
    pub fn can_apply(&self, current: &S, mode: Mode, window: &ForecastWindow) -> bool {
        if *current != self.from || mode != self.mode {
            return false;
        }
        self.guard.check(window)
    }

    pub fn message(&self, window: &ForecastWindow) -> String {
        (self.message)(window)
    }
}

/// Outcome of one decision.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub from: PlantState,
    pub to: PlantState,
    /// Present exactly when the state changes.
    pub message: Option<String>,
}

impl Decision {
    fn unchanged(state: PlantState) -> Self {
        Self {
            from: state,
            to: state,
            message: None,
        }
    }

    pub fn changed(&self) -> bool {
        self.message.is_some()
    }
}

/// Build the transition table for a policy.
pub fn rules(policy: &Policy) -> Vec<Rule<PlantState>> {
    let threshold = policy.threshold_c;

    let night_return = match policy.night_return {
        NightReturn::NotAllAbove => {
            Guard::new(move |w: &ForecastWindow| !w.is_empty() && !w.all_above(threshold))
        }
        NightReturn::AnyBelow => Guard::new(move |w: &ForecastWindow| w.any_below(threshold)),
    };

    vec![
        Rule::new(
            Mode::Day,
            PlantState::Inside,
            PlantState::Outside,
            Guard::new(move |w: &ForecastWindow| w.all_above(threshold)),
            move |w| {
                format!(
                    "The next {} hours are forecast above {threshold:.1}°C; move the plants outside.",
                    w.len()
                )
            },
        ),
        Rule::new(
            Mode::Day,
            PlantState::Outside,
            PlantState::Inside,
            Guard::new(move |w: &ForecastWindow| w.all_below(threshold)),
            move |w| {
                format!(
                    "The next {} hours are forecast below {threshold:.1}°C; bring the plants inside.",
                    w.len()
                )
            },
        ),
        Rule::new(
            Mode::Night,
            PlantState::Inside,
            PlantState::Outside,
            Guard::new(move |w: &ForecastWindow| w.all_above(threshold)),
            move |_| {
                format!(
                    "Tonight's temperatures will stay above {threshold:.1}°C; you can leave the plants outside."
                )
            },
        ),
        Rule::new(
            Mode::Night,
            PlantState::Outside,
            PlantState::Inside,
            night_return,
            move |_| {
                format!(
                    "Tonight's temperatures will dip below {threshold:.1}°C; bring the plants inside."
                )
            },
        ),
    ]
}

/// Decide whether the plants should move.
///
/// An empty window never moves them, and because comparisons are strict a
/// value exactly at the threshold counts toward neither "all above" nor
/// "all below".
///
/// # Example
///
/// ```rust
/// use chrono::NaiveDate;
/// use plant_hardening::core::{decide, ForecastWindow, PlantState, Policy};
///
/// let now = NaiveDate::from_ymd_opt(2025, 5, 10).unwrap().and_hms_opt(9, 0, 0).unwrap();
/// let window = ForecastWindow::from(vec![16.0, 17.0, 18.0]);
///
/// let decision = decide(PlantState::Inside, &window, now, &Policy::default());
/// assert_eq!(decision.to, PlantState::Outside);
/// assert!(decision.message.unwrap().contains("move the plants outside"));
/// ```
pub fn decide(
    current: PlantState,
    window: &ForecastWindow,
    now: NaiveDateTime,
    policy: &Policy,
) -> Decision {
    let mode = Mode::at(now);

    rules(policy)
        .iter()
        .find(|rule| rule.can_apply(&current, mode, window))
        .map(|rule| Decision {
            from: current,
            to: rule.to,
            message: Some(rule.message(window)),
        })
        .unwrap_or_else(|| Decision::unchanged(current))
}
