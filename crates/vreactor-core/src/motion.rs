#![forbid(unsafe_code)]

//! Reduced-motion override.
//!
//! [`MotionPreferenceGate`] mirrors `(prefers-reduced-motion: reduce)`. It is
//! evaluated once at startup and again on every change notification. While
//! asserted, other components keep running their logic but the coordinator
//! pins their output to the static resting state.

use crate::host::ScrollBehavior;

/// A change in the gate's state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionChange {
    /// Reduced motion just became active.
    Asserted,
    /// Reduced motion was turned off.
    Released,
}

#[derive(Debug, Clone, Default)]
pub struct MotionPreferenceGate {
    reduced: bool,
    evaluated: bool,
}

impl MotionPreferenceGate {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the current media-query value.
    ///
    /// The first evaluation reports `Asserted` if reduced motion is on (so
    /// resting states are applied at startup) and nothing otherwise. Later
    /// evaluations report only actual changes.
    pub fn evaluate(&mut self, reduced: bool) -> Option<MotionChange> {
        let first = !self.evaluated;
        self.evaluated = true;
        let changed = first || reduced != self.reduced;
        self.reduced = reduced;
        match (changed, reduced) {
            (false, _) => None,
            (true, true) => Some(MotionChange::Asserted),
            (true, false) if first => None,
            (true, false) => Some(MotionChange::Released),
        }
    }

    #[must_use]
    pub fn is_reduced(&self) -> bool {
        self.reduced
    }

    /// Whether decorative animation may run.
    #[must_use]
    pub fn allows_motion(&self) -> bool {
        !self.reduced
    }

    /// Behavior for programmatic scrolling.
    #[must_use]
    pub fn scroll_behavior(&self) -> ScrollBehavior {
        if self.reduced {
            ScrollBehavior::Auto
        } else {
            ScrollBehavior::Smooth
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn startup_without_preference_reports_nothing() {
        let mut gate = MotionPreferenceGate::new();
        assert_eq!(gate.evaluate(false), None);
        assert!(gate.allows_motion());
        assert_eq!(gate.scroll_behavior(), ScrollBehavior::Smooth);
    }

    #[test]
    fn startup_with_preference_asserts() {
        let mut gate = MotionPreferenceGate::new();
        assert_eq!(gate.evaluate(true), Some(MotionChange::Asserted));
        assert_eq!(gate.scroll_behavior(), ScrollBehavior::Auto);
    }

    #[test]
    fn repeated_values_are_quiet() {
        let mut gate = MotionPreferenceGate::new();
        gate.evaluate(true);
        assert_eq!(gate.evaluate(true), None);
    }

    #[test]
    fn toggling_reports_each_edge() {
        let mut gate = MotionPreferenceGate::new();
        gate.evaluate(false);
        assert_eq!(gate.evaluate(true), Some(MotionChange::Asserted));
        assert_eq!(gate.evaluate(false), Some(MotionChange::Released));
        assert!(!gate.is_reduced());
    }
}
