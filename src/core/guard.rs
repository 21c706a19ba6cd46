//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions that determine whether a transition
//! rule applies to a given forecast window.

use std::fmt;
use std::marker::PhantomData;

/// Pure predicate that determines if a transition can execute.
///
/// Guards are evaluated before a transition rule fires. They encapsulate
/// pre-conditions as pure functions over the rule's input.
///
/// # Example
///
/// ```rust
/// use plant_hardening::core::{ForecastWindow, Guard};
///
/// let warm = Guard::new(|w: &ForecastWindow| w.all_above(15.0));
///
/// assert!(warm.check(&ForecastWindow::from(vec![16.0, 17.5])));
/// assert!(!warm.check(&ForecastWindow::from(vec![16.0, 15.0])));
/// ```
pub struct Guard<T> {
    predicate: Box<dyn Fn(&T) -> bool + Send + Sync>,
    _phantom: PhantomData<fn(&T)>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no side effects) and
    /// thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Box::new(predicate),
            _phantom: PhantomData,
        }
    }

    /// Check if the guard allows the transition for this input.
    pub fn check(&self, input: &T) -> bool {
        (self.predicate)(input)
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Guard(..)")
    }
}
