#![forbid(unsafe_code)]

//! Structured CSS transforms.
//!
//! Parallax owns translation and scale, the hero tilt owns rotation. Each
//! writer updates only its own fields of a [`TransformComponents`] record and
//! the full `transform` string is recomposed on every write, so neither
//! writer ever has to parse what the other one left in the style attribute.

use core::fmt;

use crate::geometry::{Point, Rect};

/// The pieces of an element's inline `transform`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransformComponents {
    /// Vertical offset in px.
    pub translate_y: f64,
    pub scale: f64,
    /// Degrees.
    pub rotate_x: f64,
    /// Degrees.
    pub rotate_y: f64,
}

impl Default for TransformComponents {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl TransformComponents {
    pub const IDENTITY: Self = Self {
        translate_y: 0.0,
        scale: 1.0,
        rotate_x: 0.0,
        rotate_y: 0.0,
    };

    /// Replace translation and scale, keeping rotation.
    #[must_use]
    pub fn with_parallax(self, translate_y: f64, scale: f64) -> Self {
        Self {
            translate_y,
            scale,
            ..self
        }
    }

    /// Replace rotation, keeping translation and scale.
    #[must_use]
    pub fn with_tilt(self, tilt: Tilt) -> Self {
        Self {
            rotate_x: tilt.rotate_x,
            rotate_y: tilt.rotate_y,
            ..self
        }
    }

    /// Drop rotation, keeping translation and scale.
    #[must_use]
    pub fn without_tilt(self) -> Self {
        self.with_tilt(Tilt::default())
    }

    #[must_use]
    pub fn has_rotation(&self) -> bool {
        self.rotate_x != 0.0 || self.rotate_y != 0.0
    }

    /// CSS value for the `transform` property.
    #[must_use]
    pub fn to_css(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TransformComponents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translateY({}px) scale({})", self.translate_y, self.scale)?;
        if self.has_rotation() {
            write!(f, " rotateX({}deg) rotateY({}deg)", self.rotate_x, self.rotate_y)?;
        }
        Ok(())
    }
}

/// A 3D tilt, in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Tilt {
    /// Tilt for a pointer inside `region`.
    ///
    /// The pointer's offset from the region center, normalized to
    /// [-0.5, 0.5] on each axis, maps to `rotateX = y * factor` and
    /// `rotateY = -x * factor`. Returns `None` for an empty region.
    #[must_use]
    pub fn from_pointer(region: &Rect, at: Point, factor_deg: f64) -> Option<Self> {
        if region.width <= 0.0 || region.height <= 0.0 {
            return None;
        }
        let x = (at.x - region.left()) / region.width - 0.5;
        let y = (at.y - region.top()) / region.height - 0.5;
        Some(Self {
            rotate_x: y * factor_deg,
            rotate_y: -x * factor_deg,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_renders_without_rotation() {
        assert_eq!(
            TransformComponents::IDENTITY.to_css(),
            "translateY(0px) scale(1)"
        );
    }

    #[test]
    fn parallax_keeps_rotation() {
        let t = TransformComponents::IDENTITY
            .with_tilt(Tilt {
                rotate_x: 2.0,
                rotate_y: -1.0,
            })
            .with_parallax(40.0, 1.05);
        assert_eq!(
            t.to_css(),
            "translateY(40px) scale(1.05) rotateX(2deg) rotateY(-1deg)"
        );
    }

    #[test]
    fn clearing_tilt_keeps_parallax() {
        let t = TransformComponents::IDENTITY
            .with_parallax(12.0, 1.1)
            .with_tilt(Tilt {
                rotate_x: 1.0,
                rotate_y: 1.0,
            })
            .without_tilt();
        assert_eq!(t.translate_y, 12.0);
        assert_eq!(t.scale, 1.1);
        assert!(!t.has_rotation());
    }

    #[test]
    fn tilt_is_zero_at_center_and_bounded_at_corners() {
        let region = Rect::new(100.0, 0.0, 200.0, 100.0);
        let center = Tilt::from_pointer(&region, Point::new(200.0, 50.0), 5.0).unwrap();
        assert_eq!(center, Tilt::default());
        let top_left = Tilt::from_pointer(&region, Point::new(100.0, 0.0), 5.0).unwrap();
        assert_eq!(top_left.rotate_x, -2.5);
        assert_eq!(top_left.rotate_y, 2.5);
    }

    #[test]
    fn empty_region_has_no_tilt() {
        let region = Rect::new(0.0, 0.0, 0.0, 100.0);
        assert_eq!(Tilt::from_pointer(&region, Point::new(0.0, 0.0), 5.0), None);
    }
}
