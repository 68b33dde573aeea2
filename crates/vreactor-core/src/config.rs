#![forbid(unsafe_code)]

//! Reactor configuration.
//!
//! Every threshold the page variants disagree on is a field here rather
//! than a constant. [`ReactorConfig::default`] is the primary variant;
//! [`ReactorConfig::compact`] carries the tighter header trigger and the
//! taller fixed-header offset of the other variant.
//!
//! Configs load from JSON. All fields are optional in the document; missing
//! ones take their defaults:
//!
//! ```
//! use vreactor_core::ReactorConfig;
//!
//! let cfg = ReactorConfig::from_json_str(r#"{ "header_scrolled_threshold": 10 }"#).unwrap();
//! assert_eq!(cfg.header_scrolled_threshold, 10.0);
//! assert_eq!(cfg.anchor_header_offset, 64.0);
//! ```

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ReactorError;
use crate::geometry::Insets;
use crate::reveal::RevealOptions;
use crate::scroll_effects::ParallaxParams;

/// Observer settings for one reveal watcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RevealSettings {
    /// Intersection ratio in [0, 1].
    pub threshold: f64,
    /// CSS margin shorthand in px.
    pub root_margin: String,
}

impl Default for RevealSettings {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: "0px 0px -80px 0px".to_string(),
        }
    }
}

impl RevealSettings {
    /// Defaults for the staggered-group watcher.
    #[must_use]
    pub fn stagger() -> Self {
        Self {
            root_margin: "0px 0px -50px 0px".to_string(),
            ..Self::default()
        }
    }

    /// Validated observer options.
    pub fn options(&self) -> Result<RevealOptions, ReactorError> {
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ReactorError::Config(format!(
                "reveal threshold {} outside [0, 1]",
                self.threshold
            )));
        }
        Ok(RevealOptions {
            threshold: self.threshold,
            root_margin: Insets::parse_css(&self.root_margin)?,
        })
    }
}

/// A partial watcher document, layered over a watcher's own defaults.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RevealOverrides {
    threshold: Option<f64>,
    root_margin: Option<String>,
}

impl RevealOverrides {
    fn over(self, base: RevealSettings) -> RevealSettings {
        RevealSettings {
            threshold: self.threshold.unwrap_or(base.threshold),
            root_margin: self.root_margin.unwrap_or(base.root_margin),
        }
    }
}

fn deserialize_stagger<'de, D: Deserializer<'de>>(d: D) -> Result<RevealSettings, D::Error> {
    Ok(RevealOverrides::deserialize(d)?.over(RevealSettings::stagger()))
}

/// CSS selectors the web host resolves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Selectors {
    pub header: String,
    pub nav_toggle: String,
    pub nav_panel: String,
    pub nav_link: String,
    pub reveal: String,
    pub reveal_stagger: String,
    pub parallax_target: String,
    pub hero: String,
    pub scroll_indicator: String,
    pub copy_button: String,
    pub anchor: String,
    pub external_link: String,
    pub lazy_image: String,
    pub card: String,
}

impl Default for Selectors {
    fn default() -> Self {
        Self {
            header: ".header".into(),
            nav_toggle: ".nav-toggle".into(),
            nav_panel: ".nav".into(),
            nav_link: ".nav__link".into(),
            reveal: ".reveal".into(),
            reveal_stagger: ".reveal-stagger".into(),
            parallax_target: ".hero__artwork img".into(),
            hero: ".hero".into(),
            scroll_indicator: ".hero__scroll".into(),
            copy_button: "[data-copy]".into(),
            anchor: "a[href^=\"#\"]".into(),
            external_link: "a[href^=\"http\"]".into(),
            lazy_image: "img[loading=\"lazy\"]".into(),
            card: ".card, .panel--interactive".into(),
        }
    }
}

/// State classes written onto elements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ClassNames {
    pub header_scrolled: String,
    pub nav_open: String,
    pub nav_link_active: String,
    pub reveal_visible: String,
    pub stagger_visible: String,
    pub cursor_glow: String,
    pub cursor_glow_active: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            header_scrolled: "header--scrolled".into(),
            nav_open: "nav--open".into(),
            nav_link_active: "nav__link--active".into(),
            reveal_visible: "reveal--visible".into(),
            stagger_visible: "reveal-stagger--visible".into(),
            cursor_glow: "cursor-glow".into(),
            cursor_glow_active: "cursor-glow--active".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReactorConfig {
    /// Scroll offset (px) at which the header gains its scrolled state.
    pub header_scrolled_threshold: f64,
    /// Fixed header height (px) kept clear when jumping to an anchor.
    pub anchor_header_offset: f64,
    /// Parallax px of offset per px scrolled.
    pub parallax_factor: f64,
    /// Parallax scale growth per viewport height scrolled.
    pub parallax_scale_factor: f64,
    pub parallax_max_scale: f64,
    /// Scroll offset (px) past which the scroll indicator hides.
    pub indicator_hide_after: f64,
    /// Degrees of hero tilt per unit of normalized pointer offset.
    pub tilt_factor_deg: f64,
    /// Fraction of the remaining distance the glow covers per frame.
    pub cursor_ease: f64,
    pub copy_confirm_ms: u32,
    pub copy_confirm_label: String,
    pub reveal: RevealSettings,
    /// Missing fields fall back to [`RevealSettings::stagger`].
    #[serde(deserialize_with = "deserialize_stagger")]
    pub stagger: RevealSettings,
    pub selectors: Selectors,
    pub classes: ClassNames,
}

impl Default for ReactorConfig {
    fn default() -> Self {
        Self {
            header_scrolled_threshold: 50.0,
            anchor_header_offset: 64.0,
            parallax_factor: 0.4,
            parallax_scale_factor: 0.1,
            parallax_max_scale: 1.15,
            indicator_hide_after: 100.0,
            tilt_factor_deg: 5.0,
            cursor_ease: 0.15,
            copy_confirm_ms: 2000,
            copy_confirm_label: "Copied!".into(),
            reveal: RevealSettings::default(),
            stagger: RevealSettings::stagger(),
            selectors: Selectors::default(),
            classes: ClassNames::default(),
        }
    }
}

impl ReactorConfig {
    /// Variant with a 10px header trigger and a 72px fixed header.
    #[must_use]
    pub fn compact() -> Self {
        Self {
            header_scrolled_threshold: 10.0,
            anchor_header_offset: 72.0,
            ..Self::default()
        }
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, ReactorError> {
        let cfg: Self = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reject values no page could mean.
    pub fn validate(&self) -> Result<(), ReactorError> {
        let non_negative = [
            ("header_scrolled_threshold", self.header_scrolled_threshold),
            ("anchor_header_offset", self.anchor_header_offset),
            ("indicator_hide_after", self.indicator_hide_after),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(ReactorError::Config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        let positive = [
            ("parallax_factor", self.parallax_factor),
            ("parallax_scale_factor", self.parallax_scale_factor),
            ("tilt_factor_deg", self.tilt_factor_deg),
        ];
        for (name, value) in positive {
            if !value.is_finite() || value <= 0.0 {
                return Err(ReactorError::Config(format!(
                    "{name} must be a positive number, got {value}"
                )));
            }
        }
        if !self.parallax_max_scale.is_finite() || self.parallax_max_scale < 1.0 {
            return Err(ReactorError::Config(format!(
                "parallax_max_scale must be at least 1, got {}",
                self.parallax_max_scale
            )));
        }
        if !(self.cursor_ease > 0.0 && self.cursor_ease <= 1.0) {
            return Err(ReactorError::Config(format!(
                "cursor_ease must be in (0, 1], got {}",
                self.cursor_ease
            )));
        }
        self.reveal.options()?;
        self.stagger.options()?;
        Ok(())
    }

    #[must_use]
    pub fn parallax_params(&self) -> ParallaxParams {
        ParallaxParams {
            factor: self.parallax_factor,
            scale_factor: self.parallax_scale_factor,
            max_scale: self.parallax_max_scale,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_validate() {
        ReactorConfig::default().validate().unwrap();
        ReactorConfig::compact().validate().unwrap();
    }

    #[test]
    fn empty_document_is_default() {
        assert_eq!(ReactorConfig::from_json_str("{}").unwrap(), ReactorConfig::default());
    }

    #[test]
    fn nested_partial_documents_merge_with_defaults() {
        let cfg = ReactorConfig::from_json_str(
            r#"{ "stagger": { "threshold": 0.25 }, "classes": { "nav_open": "is-open" } }"#,
        )
        .unwrap();
        assert_eq!(cfg.stagger.threshold, 0.25);
        assert_eq!(cfg.stagger.root_margin, "0px 0px -50px 0px");
        assert_eq!(cfg.classes.nav_open, "is-open");
        assert_eq!(cfg.classes.reveal_visible, "reveal--visible");
    }

    #[test]
    fn stagger_default_margin_differs_from_reveal() {
        let cfg = ReactorConfig::default();
        assert_eq!(
            cfg.stagger.options().unwrap().root_margin,
            Insets::bottom(-50.0)
        );
        assert_eq!(
            cfg.reveal.options().unwrap().root_margin,
            Insets::bottom(-80.0)
        );
    }

    #[test]
    fn partial_watcher_documents_keep_their_own_margins() {
        let cfg = ReactorConfig::from_json_str(r#"{ "stagger": { "threshold": 0.25 } }"#).unwrap();
        assert_eq!(
            cfg.stagger.options().unwrap().root_margin,
            Insets::bottom(-50.0)
        );
        let cfg = ReactorConfig::from_json_str(r#"{ "reveal": { "threshold": 0.25 } }"#).unwrap();
        assert_eq!(
            cfg.reveal.options().unwrap().root_margin,
            Insets::bottom(-80.0)
        );
        assert_eq!(cfg.stagger, RevealSettings::stagger());
        let cfg =
            ReactorConfig::from_json_str(r#"{ "stagger": { "root_margin": "0px 0px -20px 0px" } }"#)
                .unwrap();
        assert_eq!(cfg.stagger.threshold, 0.1);
        assert!(ReactorConfig::from_json_str(r#"{ "stagger": { "margin": "0px" } }"#).is_err());
    }

    #[test]
    fn zero_motion_factors_are_rejected() {
        for field in ["parallax_factor", "parallax_scale_factor", "tilt_factor_deg"] {
            let doc = format!(r#"{{ "{field}": 0 }}"#);
            let err = ReactorConfig::from_json_str(&doc).unwrap_err();
            assert!(matches!(err, ReactorError::Config(msg) if msg.contains(field)));
        }
        assert!(ReactorConfig::from_json_str(r#"{ "header_scrolled_threshold": 0 }"#).is_ok());
    }

    #[test]
    fn out_of_range_threshold_is_rejected() {
        let err = ReactorConfig::from_json_str(r#"{ "reveal": { "threshold": 1.5 } }"#).unwrap_err();
        assert!(matches!(err, ReactorError::Config(msg) if msg.contains("threshold")));
    }

    #[test]
    fn bad_margin_is_rejected() {
        assert!(ReactorConfig::from_json_str(r#"{ "reveal": { "root_margin": "auto" } }"#).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(ReactorConfig::from_json_str(r#"{ "header_threshold": 10 }"#).is_err());
    }

    #[test]
    fn ease_must_be_positive() {
        let cfg = ReactorConfig {
            cursor_ease: 0.0,
            ..ReactorConfig::default()
        };
        assert!(cfg.validate().is_err());
    }
}
