#![forbid(unsafe_code)]

//! Mobile navigation panel state.
//!
//! Two states, [`NavState::Closed`] (initial) and [`NavState::Open`]. Every
//! transition yields a [`NavTransition`] describing the full set of
//! presentation writes, so `aria-expanded`, the open class and the body
//! scroll lock are always rewritten together and cannot drift apart.

/// Panel state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavState {
    #[default]
    Closed,
    Open,
}

impl NavState {
    #[must_use]
    pub const fn is_open(self) -> bool {
        matches!(self, Self::Open)
    }

    /// Value for the toggle's `aria-expanded` attribute.
    #[must_use]
    pub const fn aria_expanded(self) -> &'static str {
        match self {
            Self::Open => "true",
            Self::Closed => "false",
        }
    }
}

/// Why the panel is closing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CloseReason {
    /// A nav link was followed.
    LinkSelected,
    /// Escape pressed while open.
    Escape,
    /// Click outside both the panel and the toggle.
    OutsideClick,
}

/// Result of a state change, to be reflected on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavTransition {
    pub state: NavState,
    /// Return keyboard focus to the toggle control.
    pub focus_toggle: bool,
}

impl NavTransition {
    /// Body scroll is locked exactly while the panel is open.
    #[must_use]
    pub const fn lock_scroll(&self) -> bool {
        self.state.is_open()
    }
}

#[derive(Debug, Clone, Default)]
pub struct NavController {
    state: NavState,
}

impl NavController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn state(&self) -> NavState {
        self.state
    }

    /// Flip between open and closed (hamburger control).
    pub fn toggle(&mut self) -> NavTransition {
        self.state = match self.state {
            NavState::Closed => NavState::Open,
            NavState::Open => NavState::Closed,
        };
        NavTransition {
            state: self.state,
            focus_toggle: false,
        }
    }

    /// Close if open. Returns `None` when already closed.
    pub fn close(&mut self, reason: CloseReason) -> Option<NavTransition> {
        if !self.state.is_open() {
            return None;
        }
        self.state = NavState::Closed;
        Some(NavTransition {
            state: NavState::Closed,
            focus_toggle: reason == CloseReason::Escape,
        })
    }

    /// Keyboard input: only `Escape` while open does anything.
    pub fn on_key(&mut self, key: &str) -> Option<NavTransition> {
        if key == "Escape" {
            self.close(CloseReason::Escape)
        } else {
            None
        }
    }

    /// Document click with containment already resolved.
    pub fn on_document_click(&mut self, inside_panel: bool, on_toggle: bool) -> Option<NavTransition> {
        if inside_panel || on_toggle {
            return None;
        }
        self.close(CloseReason::OutsideClick)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_closed() {
        assert_eq!(NavController::new().state(), NavState::Closed);
    }

    #[test]
    fn toggles_alternate() {
        let mut nav = NavController::new();
        let t = nav.toggle();
        assert_eq!(t.state, NavState::Open);
        assert!(t.lock_scroll());
        assert_eq!(t.state.aria_expanded(), "true");
        let t = nav.toggle();
        assert_eq!(t.state, NavState::Closed);
        assert!(!t.lock_scroll());
        assert_eq!(t.state.aria_expanded(), "false");
    }

    #[test]
    fn close_when_closed_is_noop() {
        let mut nav = NavController::new();
        assert_eq!(nav.close(CloseReason::LinkSelected), None);
    }

    #[test]
    fn escape_closes_and_requests_focus() {
        let mut nav = NavController::new();
        nav.toggle();
        let t = nav.on_key("Escape").unwrap();
        assert_eq!(t.state, NavState::Closed);
        assert!(t.focus_toggle);
    }

    #[test]
    fn other_keys_do_nothing() {
        let mut nav = NavController::new();
        nav.toggle();
        assert_eq!(nav.on_key("Enter"), None);
        assert!(nav.state().is_open());
    }

    #[test]
    fn link_close_does_not_move_focus() {
        let mut nav = NavController::new();
        nav.toggle();
        let t = nav.close(CloseReason::LinkSelected).unwrap();
        assert!(!t.focus_toggle);
    }

    #[test]
    fn outside_click_closes_inside_click_does_not() {
        let mut nav = NavController::new();
        nav.toggle();
        assert_eq!(nav.on_document_click(true, false), None);
        assert_eq!(nav.on_document_click(false, true), None);
        assert!(nav.state().is_open());
        let t = nav.on_document_click(false, false).unwrap();
        assert_eq!(t.state, NavState::Closed);
    }
}
