#![forbid(unsafe_code)]

//! Copy-to-clipboard buttons.
//!
//! A button carries its payload in `data-copy`. After a successful write its
//! label is swapped for a confirmation label, and a host timer restores the
//! original. Failures change nothing on the page.
//!
//! Each success bumps the button's epoch and arms a timer tagged with it;
//! only the timer for the latest epoch restores the label, so a second
//! click during confirmation extends it instead of reverting early.

use std::collections::HashMap;

use crate::host::{ElementId, TimerToken};

/// Attribute holding the clipboard payload.
pub const PAYLOAD_ATTRIBUTE: &str = "data-copy";

#[derive(Debug, Clone, Default)]
struct ButtonState {
    original_label: String,
    epoch: u32,
    confirming: bool,
}

/// What to do after a successful copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    /// Timer to arm for restoring the label.
    pub revert: TimerToken,
}

#[derive(Debug, Clone, Default)]
pub struct CopyFeedback {
    buttons: HashMap<ElementId, ButtonState>,
}

impl CopyFeedback {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A write succeeded. `current_label` is the button text right now; it
    /// is remembered only if the button is not already confirming.
    pub fn on_success(&mut self, button: ElementId, current_label: &str) -> Confirmation {
        let state = self.buttons.entry(button).or_default();
        if !state.confirming {
            state.original_label = current_label.to_owned();
            state.confirming = true;
        }
        state.epoch = state.epoch.wrapping_add(1);
        Confirmation {
            revert: TimerToken::CopyRevert {
                button,
                epoch: state.epoch,
            },
        }
    }

    /// A revert timer fired. Returns the label to restore, or `None` if the
    /// timer is stale.
    pub fn on_timer(&mut self, button: ElementId, epoch: u32) -> Option<String> {
        let state = self.buttons.get_mut(&button)?;
        if !state.confirming || state.epoch != epoch {
            return None;
        }
        state.confirming = false;
        Some(state.original_label.clone())
    }

    #[must_use]
    pub fn is_confirming(&self, button: ElementId) -> bool {
        self.buttons.get(&button).is_some_and(|s| s.confirming)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUTTON: ElementId = ElementId(7);

    fn epoch_of(c: &Confirmation) -> u32 {
        let TimerToken::CopyRevert { epoch, .. } = c.revert;
        epoch
    }

    #[test]
    fn success_then_timer_restores_label() {
        let mut fb = CopyFeedback::new();
        let c = fb.on_success(BUTTON, "Copy");
        assert!(fb.is_confirming(BUTTON));
        assert_eq!(fb.on_timer(BUTTON, epoch_of(&c)), Some("Copy".to_string()));
        assert!(!fb.is_confirming(BUTTON));
    }

    #[test]
    fn second_success_keeps_original_and_invalidates_first_timer() {
        let mut fb = CopyFeedback::new();
        let first = fb.on_success(BUTTON, "Copy");
        let second = fb.on_success(BUTTON, "Copied!");
        assert_eq!(fb.on_timer(BUTTON, epoch_of(&first)), None);
        assert_eq!(
            fb.on_timer(BUTTON, epoch_of(&second)),
            Some("Copy".to_string())
        );
    }

    #[test]
    fn unknown_button_timer_is_ignored() {
        let mut fb = CopyFeedback::new();
        assert_eq!(fb.on_timer(ElementId(1), 1), None);
    }
}
