#![forbid(unsafe_code)]

//! Geometric primitives in CSS pixels.
//!
//! Coordinates follow the DOM: origin at the viewport's top-left, `y` grows
//! downward, values are `f64` as returned by `getBoundingClientRect`.

use crate::error::ReactorError;

/// A point in viewport coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned box, as reported by `getBoundingClientRect`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub const fn left(&self) -> f64 {
        self.x
    }

    #[inline]
    pub const fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    #[inline]
    pub fn area(&self) -> f64 {
        self.width.max(0.0) * self.height.max(0.0)
    }

    /// Whether a point lies inside the box (right/bottom exclusive).
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.left() && p.x < self.right() && p.y >= self.top() && p.y < self.bottom()
    }

    /// Overlap of two boxes.
    ///
    /// Edge-adjacent boxes yield a zero-area rectangle rather than `None`,
    /// matching how the browser reports an element that just touches the
    /// root as intersecting.
    pub fn intersection(&self, other: &Rect) -> Option<Rect> {
        let left = self.left().max(other.left());
        let top = self.top().max(other.top());
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());
        if right < left || bottom < top {
            return None;
        }
        Some(Rect::new(left, top, right - left, bottom - top))
    }

    /// Grow (positive) or shrink (negative) each edge by the given insets.
    pub fn outset(&self, insets: Insets) -> Rect {
        let left = self.left() - insets.left;
        let top = self.top() - insets.top;
        let right = self.right() + insets.right;
        let bottom = self.bottom() + insets.bottom;
        Rect::new(left, top, (right - left).max(0.0), (bottom - top).max(0.0))
    }
}

/// Per-edge offsets, used for observer root margins.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Insets {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Insets {
    #[inline]
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    #[inline]
    pub const fn bottom(px: f64) -> Self {
        Self::new(0.0, 0.0, px, 0.0)
    }

    /// Parse CSS margin shorthand with 1 to 4 pixel components.
    ///
    /// ```
    /// use vreactor_core::geometry::Insets;
    ///
    /// let m = Insets::parse_css("0px 0px -80px 0px").unwrap();
    /// assert_eq!(m.bottom, -80.0);
    /// assert_eq!(Insets::parse_css("8px").unwrap(), Insets::new(8.0, 8.0, 8.0, 8.0));
    /// ```
    pub fn parse_css(s: &str) -> Result<Self, ReactorError> {
        let parts = s
            .split_whitespace()
            .map(parse_px)
            .collect::<Result<Vec<_>, _>>()?;
        match parts.as_slice() {
            [all] => Ok(Self::new(*all, *all, *all, *all)),
            [v, h] => Ok(Self::new(*v, *h, *v, *h)),
            [t, h, b] => Ok(Self::new(*t, *h, *b, *h)),
            [t, r, b, l] => Ok(Self::new(*t, *r, *b, *l)),
            _ => Err(ReactorError::Config(format!(
                "margin {s:?} must have 1 to 4 components"
            ))),
        }
    }

    /// Render back to the shorthand `IntersectionObserver` accepts.
    pub fn to_css(&self) -> String {
        format!(
            "{}px {}px {}px {}px",
            self.top, self.right, self.bottom, self.left
        )
    }
}

fn parse_px(part: &str) -> Result<f64, ReactorError> {
    let number = part.strip_suffix("px").unwrap_or(part);
    number
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ReactorError::Config(format!("margin component {part:?} is not a px length")))
}

/// Fraction of `target` visible inside `root` grown by `margin`.
///
/// Returns `None` when the boxes do not touch at all. A zero-area target
/// that touches the root reports a ratio of `1.0`.
pub fn intersection_ratio(target: &Rect, root: &Rect, margin: Insets) -> Option<f64> {
    let root = root.outset(margin);
    let overlap = target.intersection(&root)?;
    let area = target.area();
    if area <= 0.0 {
        return Some(1.0);
    }
    Some((overlap.area() / area).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intersection_of_disjoint_boxes_is_none() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, 20.0, 5.0, 5.0);
        assert_eq!(a.intersection(&b), None);
    }

    #[test]
    fn touching_boxes_intersect_with_zero_area() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(0.0, 10.0, 10.0, 10.0);
        let i = a.intersection(&b).unwrap();
        assert_eq!(i.area(), 0.0);
    }

    #[test]
    fn negative_bottom_margin_shrinks_root() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let root = viewport.outset(Insets::bottom(-80.0));
        assert_eq!(root.bottom(), 720.0);
        assert_eq!(root.top(), 0.0);
    }

    #[test]
    fn ratio_counts_visible_fraction() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        // Half of a 100px tall box sits below the fold.
        let target = Rect::new(0.0, 750.0, 100.0, 100.0);
        let ratio = intersection_ratio(&target, &viewport, Insets::default()).unwrap();
        assert!((ratio - 0.5).abs() < 1e-9);
        // Shrinking the root by 80px hides it.
        assert_eq!(
            intersection_ratio(&target, &viewport, Insets::bottom(-80.0)),
            None
        );
    }

    #[test]
    fn parse_css_shorthands() {
        assert_eq!(
            Insets::parse_css("1px 2px").unwrap(),
            Insets::new(1.0, 2.0, 1.0, 2.0)
        );
        assert_eq!(
            Insets::parse_css("1px 2px 3px").unwrap(),
            Insets::new(1.0, 2.0, 3.0, 2.0)
        );
        assert_eq!(
            Insets::parse_css("0 0 -50px 0").unwrap(),
            Insets::bottom(-50.0)
        );
        assert!(Insets::parse_css("").is_err());
        assert!(Insets::parse_css("1px 2px 3px 4px 5px").is_err());
        assert!(Insets::parse_css("10%").is_err());
    }

    #[test]
    fn css_round_trip_for_observer_options() {
        assert_eq!(Insets::bottom(-80.0).to_css(), "0px 0px -80px 0px");
    }

    #[test]
    fn contains_excludes_far_edges() {
        let r = Rect::new(0.0, 0.0, 10.0, 10.0);
        assert!(r.contains(Point::new(0.0, 0.0)));
        assert!(!r.contains(Point::new(10.0, 5.0)));
    }
}
