#![forbid(unsafe_code)]

//! Scroll-position derivations: header state, hero parallax and the
//! scroll indicator.
//!
//! Each derivation is a pure function of the latest scroll sample (plus
//! viewport/container geometry for parallax) and is driven by its own
//! frame stream, so no derivation depends on another having run first.
//! All of them are idempotent: the same input yields the same output.

/// Latest scroll sample. No history is kept.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    pub last_y: f64,
}

/// Header "scrolled" state: purely positional, not sticky.
#[derive(Debug, Clone)]
pub struct HeaderState {
    threshold: f64,
    scrolled: Option<bool>,
    scroll: ScrollState,
}

impl HeaderState {
    #[must_use]
    pub fn new(threshold: f64) -> Self {
        Self {
            threshold,
            scrolled: None,
            scroll: ScrollState::default(),
        }
    }

    /// Whether an offset counts as scrolled.
    #[must_use]
    pub fn is_scrolled_at(&self, scroll_y: f64) -> bool {
        scroll_y >= self.threshold
    }

    /// Feed a sample. Returns the new state when it differs from the last
    /// one reported (always on the first sample).
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        self.scroll.last_y = scroll_y;
        let scrolled = self.is_scrolled_at(scroll_y);
        if self.scrolled == Some(scrolled) {
            return None;
        }
        self.scrolled = Some(scrolled);
        Some(scrolled)
    }

    #[must_use]
    pub fn scrolled(&self) -> bool {
        self.scrolled.unwrap_or(false)
    }

    #[must_use]
    pub fn last_sample(&self) -> ScrollState {
        self.scroll
    }
}

/// Scroll indicator visibility.
#[derive(Debug, Clone)]
pub struct IndicatorState {
    hide_after: f64,
    hidden: Option<bool>,
}

impl IndicatorState {
    #[must_use]
    pub fn new(hide_after: f64) -> Self {
        Self {
            hide_after,
            hidden: None,
        }
    }

    /// Returns the new `hidden` value when it changes.
    pub fn update(&mut self, scroll_y: f64) -> Option<bool> {
        let hidden = scroll_y > self.hide_after;
        if self.hidden == Some(hidden) {
            return None;
        }
        self.hidden = Some(hidden);
        Some(hidden)
    }

    #[must_use]
    pub fn hidden(&self) -> bool {
        self.hidden.unwrap_or(false)
    }
}

/// Inline style values for the indicator.
#[must_use]
pub const fn indicator_styles(hidden: bool) -> [(&'static str, &'static str); 2] {
    if hidden {
        [("opacity", "0"), ("pointer-events", "none")]
    } else {
        [("opacity", "1"), ("pointer-events", "auto")]
    }
}

/// Parallax tuning.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxParams {
    /// Vertical offset per px scrolled.
    pub factor: f64,
    /// Scale growth per viewport height scrolled.
    pub scale_factor: f64,
    pub max_scale: f64,
}

impl Default for ParallaxParams {
    fn default() -> Self {
        Self {
            factor: 0.4,
            scale_factor: 0.1,
            max_scale: 1.15,
        }
    }
}

/// Container geometry in document coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxContainer {
    /// Top edge relative to the document (`rect.top + scrollY`).
    pub top: f64,
    pub height: f64,
}

/// Translate/scale for a parallax target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxFrame {
    pub translate_y: f64,
    pub scale: f64,
}

impl ParallaxParams {
    /// Offset and scale at `scroll_y`, or `None` once the page has scrolled
    /// past the container (the last written transform then stays put).
    ///
    /// Overscroll (negative `scroll_y`) is treated as zero so the offset
    /// never goes negative.
    #[must_use]
    pub fn frame(
        &self,
        scroll_y: f64,
        viewport_height: f64,
        container: ParallaxContainer,
    ) -> Option<ParallaxFrame> {
        let scroll_y = scroll_y.max(0.0);
        if scroll_y >= container.top + container.height {
            return None;
        }
        let growth = if viewport_height > 0.0 {
            scroll_y / viewport_height * self.scale_factor
        } else {
            0.0
        };
        Some(ParallaxFrame {
            translate_y: scroll_y * self.factor,
            scale: (1.0 + growth).min(self.max_scale),
        })
    }
}
