#![forbid(unsafe_code)]

//! Eased pointer follower for the cursor glow overlay.

use crate::geometry::{Point, Rect};

/// Pointer target and the smoothed position chasing it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    pub target_x: f64,
    pub target_y: f64,
    pub current_x: f64,
    pub current_y: f64,
}

impl PointerState {
    /// Move the current position `ease` of the way toward the target.
    pub fn step(&mut self, ease: f64) -> Point {
        self.current_x += (self.target_x - self.current_x) * ease;
        self.current_y += (self.target_y - self.current_y) * ease;
        Point::new(self.current_x, self.current_y)
    }
}

/// Glow overlay state: position easing plus the "active" flag that shows it.
#[derive(Debug, Clone)]
pub struct CursorGlow {
    pointer: PointerState,
    ease: f64,
    active: bool,
}

impl CursorGlow {
    #[must_use]
    pub fn new(ease: f64) -> Self {
        Self {
            pointer: PointerState::default(),
            ease: ease.clamp(0.0, 1.0),
            active: false,
        }
    }

    /// Record the latest pointer position. Returns `true` if the glow just
    /// became active.
    pub fn on_move(&mut self, at: Point) -> bool {
        self.pointer.target_x = at.x;
        self.pointer.target_y = at.y;
        let activated = !self.active;
        self.active = true;
        activated
    }

    /// Pointer left the document. Returns `true` if the glow was active.
    pub fn on_leave(&mut self) -> bool {
        core::mem::replace(&mut self.active, false)
    }

    /// Advance one frame.
    pub fn step(&mut self) -> Point {
        self.pointer.step(self.ease)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.pointer
    }
}

/// Pointer position relative to a card's box, as `--mouse-x`/`--mouse-y`
/// custom property values.
#[must_use]
pub fn card_pointer_vars(card: &Rect, at: Point) -> [(&'static str, String); 2] {
    [
        ("--mouse-x", format!("{}px", at.x - card.left())),
        ("--mouse-y", format!("{}px", at.y - card.top())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn step_moves_fraction_of_remaining_distance() {
        let mut glow = CursorGlow::new(0.15);
        glow.on_move(Point::new(100.0, 200.0));
        let p = glow.step();
        assert!((p.x - 15.0).abs() < 1e-9);
        assert!((p.y - 30.0).abs() < 1e-9);
        let p = glow.step();
        assert!((p.x - (15.0 + 85.0 * 0.15)).abs() < 1e-9);
    }

    #[test]
    fn converges_to_target() {
        let mut glow = CursorGlow::new(0.15);
        glow.on_move(Point::new(50.0, 50.0));
        let mut p = Point::default();
        for _ in 0..200 {
            p = glow.step();
        }
        assert!((p.x - 50.0).abs() < 1e-6);
    }

    #[test]
    fn card_vars_are_relative_to_the_card() {
        let card = Rect::new(100.0, 50.0, 300.0, 200.0);
        let vars = card_pointer_vars(&card, Point::new(130.0, 60.5));
        assert_eq!(vars[0], ("--mouse-x", "30px".to_string()));
        assert_eq!(vars[1], ("--mouse-y", "10.5px".to_string()));
    }

    #[test]
    fn activation_edges() {
        let mut glow = CursorGlow::new(0.15);
        assert!(glow.on_move(Point::new(1.0, 1.0)));
        assert!(!glow.on_move(Point::new(2.0, 2.0)));
        assert!(glow.on_leave());
        assert!(!glow.on_leave());
        assert!(!glow.is_active());
    }
}
