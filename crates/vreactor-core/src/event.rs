#![forbid(unsafe_code)]

//! Inputs the coordinator consumes.
//!
//! The host translates each DOM callback into one [`ReactorEvent`] and feeds
//! it to `ViewportReactor::handle`. Samples are read by the host at event
//! time (scroll offset, pointer position), so the reactor never has to call
//! back into the event object.

use crate::geometry::Point;
use crate::host::{ElementId, FrameStream, TimerToken, WatcherId};

/// One intersection observation for an observed element.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub target: ElementId,
    pub is_intersecting: bool,
    /// `intersectionRatio` in [0, 1].
    pub ratio: f64,
}

/// A host-originated input.
#[derive(Debug, Clone, PartialEq)]
pub enum ReactorEvent {
    /// Window scrolled; `scroll_y` sampled at dispatch. One event per
    /// scroll registration, tagged with that registration's frame stream.
    Scroll { stream: FrameStream, scroll_y: f64 },
    /// Pointer moved anywhere over the document (client coordinates).
    PointerMove(Point),
    /// Pointer left the document.
    PointerLeave,
    /// Pointer moved within the hero region.
    HeroPointerMove { hero: ElementId, at: Point },
    HeroPointerLeave { hero: ElementId },
    /// Pointer moved over (or entered) an interactive card.
    CardPointerMove { card: ElementId, at: Point },
    NavToggleClick,
    NavLinkClick { link: ElementId },
    /// Any click on the document, with containment already resolved.
    DocumentClick {
        inside_panel: bool,
        on_toggle: bool,
    },
    /// `KeyboardEvent.key` value.
    KeyDown { key: String },
    AnchorClick { anchor: ElementId },
    CopyClick { button: ElementId },
    ClipboardResult {
        button: ElementId,
        ok: bool,
        detail: Option<String>,
    },
    Timer(TimerToken),
    ImageLoaded { image: ElementId },
    Intersections {
        watcher: WatcherId,
        entries: Vec<IntersectionEntry>,
    },
    /// The reduced-motion media query changed.
    MotionPreferenceChanged { reduced: bool },
    /// An animation frame requested for `stream` is running.
    Frame(FrameStream),
}

/// What the host should do with the originating DOM event afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    #[default]
    Proceed,
    PreventDefault,
}
