#![forbid(unsafe_code)]

//! The seam between the reactor and the page.
//!
//! [`Host`] is everything the coordinator needs from a document: selector
//! queries, geometry reads, presentation writes and scheduling. The browser
//! adapter implements it over `web-sys`; tests use an in-memory DOM.
//!
//! Listener wiring is data, not closures: [`Registration`] records name the
//! event, the target and the throttling policy. The coordinator returns the
//! full list from `mount`, and the host attaches (and later detaches) one
//! listener per record.

use bitflags::bitflags;

use crate::geometry::Rect;

/// Opaque handle for a DOM node, minted by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(pub u32);

bitflags! {
    /// Optional browser features the reactor adapts to.
    #[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Capabilities: u8 {
        /// `IntersectionObserver` is available.
        const INTERSECTION_OBSERVER = 0b0001;
        /// `(pointer: fine)` matches (mouse or trackpad).
        const FINE_POINTER          = 0b0010;
        /// `(prefers-reduced-motion: reduce)` matched at startup.
        const REDUCED_MOTION        = 0b0100;
        /// `navigator.clipboard` is present.
        const CLIPBOARD             = 0b1000;
    }
}

/// Independent frame-callback streams. Each owns its own throttle, so
/// there is no ordering between streams within a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum FrameStream {
    Header,
    Parallax,
    ScrollIndicator,
    HeroTilt,
    /// Continuous cursor easing loop.
    CursorGlow,
}

/// Identifies one reveal watcher (one observer instance on the host).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum WatcherId {
    /// Plain fade-in.
    Reveal,
    /// Staggered group fade.
    Stagger,
}

/// Tokens for one-shot host timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerToken {
    /// Restore a copy button's label. `epoch` disambiguates restarted timers.
    CopyRevert { button: ElementId, epoch: u32 },
}

/// How `scroll_to` should move the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollBehavior {
    Smooth,
    Auto,
}

impl ScrollBehavior {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Smooth => "smooth",
            Self::Auto => "auto",
        }
    }
}

/// Window scroll position and size.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub scroll_y: f64,
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    /// Viewport box in client coordinates.
    #[must_use]
    pub fn client_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

/// Current page location.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PageLocation {
    pub hostname: String,
    pub pathname: String,
}

/// DOM event kinds the reactor listens for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DomEvent {
    Scroll,
    MouseMove,
    MouseLeave,
    Click,
    KeyDown,
    Load,
    /// `MediaQueryList` change notification.
    Change,
}

impl DomEvent {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scroll => "scroll",
            Self::MouseMove => "mousemove",
            Self::MouseLeave => "mouseleave",
            Self::Click => "click",
            Self::KeyDown => "keydown",
            Self::Load => "load",
            Self::Change => "change",
        }
    }
}

/// Media queries the reactor subscribes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaQuery {
    ReducedMotion,
}

impl MediaQuery {
    #[must_use]
    pub const fn query(self) -> &'static str {
        match self {
            Self::ReducedMotion => "(prefers-reduced-motion: reduce)",
        }
    }
}

/// What a listener is attached to, and which reactor input it feeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListenerTarget {
    Window,
    Document,
    Media(MediaQuery),
    NavToggle(ElementId),
    NavLink(ElementId),
    Hero(ElementId),
    Card(ElementId),
    Anchor(ElementId),
    CopyButton(ElementId),
    LazyImage(ElementId),
}

/// Whether a listener's input is delivered immediately or coalesced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ThrottlePolicy {
    Immediate,
    PerFrame(FrameStream),
}

/// One listener the host must attach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Registration {
    pub event: DomEvent,
    pub target: ListenerTarget,
    pub policy: ThrottlePolicy,
    /// Register with `{ passive: true }`.
    pub passive: bool,
}

impl Registration {
    #[must_use]
    pub const fn immediate(event: DomEvent, target: ListenerTarget) -> Self {
        Self {
            event,
            target,
            policy: ThrottlePolicy::Immediate,
            passive: false,
        }
    }

    #[must_use]
    pub const fn per_frame(event: DomEvent, target: ListenerTarget, stream: FrameStream) -> Self {
        Self {
            event,
            target,
            policy: ThrottlePolicy::PerFrame(stream),
            passive: true,
        }
    }
}

/// Document operations the reactor performs.
///
/// Every write is best-effort: an implementation silently ignores handles it
/// no longer knows. Reads of unknown handles return `None`/empty.
pub trait Host {
    /// Optional features present on this host.
    fn capabilities(&self) -> Capabilities;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&mut self, selector: &str) -> Vec<ElementId>;

    /// First element matching a CSS selector.
    fn query_one(&mut self, selector: &str) -> Option<ElementId> {
        self.query_all(selector).into_iter().next()
    }

    /// Nearest inclusive ancestor of `el` matching `selector`.
    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId>;

    /// Element whose id equals `fragment` (without the leading `#`).
    fn element_by_fragment(&mut self, fragment: &str) -> Option<ElementId>;

    /// Create the floating cursor-glow element and append it to the body.
    fn create_overlay(&mut self, class: &str) -> Option<ElementId>;

    fn viewport(&self) -> Viewport;
    fn bounding_rect(&self, el: ElementId) -> Option<Rect>;
    fn location(&self) -> PageLocation;

    fn attribute(&self, el: ElementId, name: &str) -> Option<String>;
    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str);
    fn has_class(&self, el: ElementId, class: &str) -> bool;
    fn add_class(&mut self, el: ElementId, class: &str);
    fn remove_class(&mut self, el: ElementId, class: &str);
    /// Set an inline style property; an empty value removes it.
    fn set_style(&mut self, el: ElementId, property: &str, value: &str);
    fn text(&self, el: ElementId) -> Option<String>;
    fn set_text(&mut self, el: ElementId, text: &str);
    fn focus(&mut self, el: ElementId);

    /// Hostname of a link element (`HTMLAnchorElement.hostname`).
    fn link_hostname(&self, el: ElementId) -> Option<String>;
    /// Whether an image has finished loading (`HTMLImageElement.complete`).
    fn image_complete(&self, el: ElementId) -> bool;

    /// Lock or unlock page scrolling (body `overflow`).
    fn set_body_scroll_locked(&mut self, locked: bool);
    /// Root element inline `scroll-behavior`; `None` removes the override.
    fn set_root_scroll_behavior(&mut self, behavior: Option<ScrollBehavior>);
    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior);

    /// Request one animation-frame callback for `stream`.
    fn request_frame(&mut self, stream: FrameStream);
    fn set_timer(&mut self, token: TimerToken, delay_ms: u32);

    /// Start observing `el` on the given watcher's observer.
    fn observe(&mut self, watcher: WatcherId, el: ElementId);
    fn unobserve(&mut self, watcher: WatcherId, el: ElementId);

    /// Begin an asynchronous clipboard write; completion arrives as a
    /// `ClipboardResult` event.
    fn write_clipboard(&mut self, button: ElementId, text: &str);

    /// Report a failure the page must not show (the browser console).
    fn diagnostic(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn per_frame_registrations_are_passive() {
        let reg = Registration::per_frame(DomEvent::Scroll, ListenerTarget::Window, FrameStream::Header);
        assert!(reg.passive);
        assert_eq!(reg.policy, ThrottlePolicy::PerFrame(FrameStream::Header));
        let click = Registration::immediate(DomEvent::Click, ListenerTarget::Document);
        assert!(!click.passive);
    }

    #[test]
    fn capability_bits_are_independent() {
        let caps = Capabilities::INTERSECTION_OBSERVER | Capabilities::CLIPBOARD;
        assert!(caps.contains(Capabilities::CLIPBOARD));
        assert!(!caps.contains(Capabilities::FINE_POINTER));
    }

    #[test]
    fn dom_event_names_match_the_dom() {
        assert_eq!(DomEvent::MouseMove.as_str(), "mousemove");
        assert_eq!(DomEvent::KeyDown.as_str(), "keydown");
        assert_eq!(ScrollBehavior::Smooth.as_str(), "smooth");
    }
}
