#![forbid(unsafe_code)]

//! In-memory host for deterministic tests.
//!
//! [`FakeHost`] is a tiny DOM: elements carry the selector strings they
//! match (exact string comparison, no CSS parsing), a document-space box,
//! attributes, classes, inline styles and text. Every write is also logged
//! so tests can assert on what the reactor did, not just the end state.
//!
//! Element boxes are stored in document coordinates; `bounding_rect`
//! reports them relative to the current scroll offset like the browser.

use std::collections::{BTreeMap, BTreeSet};

use crate::event::{IntersectionEntry, ReactorEvent};
use crate::geometry::Rect;
use crate::host::{
    Capabilities, DomEvent, ElementId, FrameStream, Host, ListenerTarget, PageLocation,
    ScrollBehavior, ThrottlePolicy, TimerToken, Viewport, WatcherId,
};
use crate::reactor::ViewportReactor;

/// A recorded host mutation.
#[derive(Debug, Clone, PartialEq)]
pub enum Write {
    AddClass(ElementId, String),
    RemoveClass(ElementId, String),
    Attribute(ElementId, String, String),
    Style(ElementId, String, String),
    Text(ElementId, String),
    Focus(ElementId),
    BodyScrollLocked(bool),
    RootScrollBehavior(Option<ScrollBehavior>),
    ScrollTo(f64, ScrollBehavior),
}

#[derive(Debug, Clone, Default)]
struct FakeElement {
    selectors: Vec<String>,
    doc_rect: Option<Rect>,
    parent: Option<ElementId>,
    attributes: BTreeMap<String, String>,
    classes: BTreeSet<String>,
    styles: BTreeMap<String, String>,
    text: String,
    link_hostname: Option<String>,
    complete: bool,
}

#[derive(Debug, Clone)]
pub struct FakeHost {
    caps: Capabilities,
    viewport: Viewport,
    location: PageLocation,
    elements: Vec<FakeElement>,
    writes: Vec<Write>,
    frames: Vec<FrameStream>,
    timers: Vec<(TimerToken, u32)>,
    observed: BTreeSet<(WatcherId, ElementId)>,
    clipboard: Vec<(ElementId, String)>,
    diagnostics: Vec<String>,
    body_locked: bool,
    focused: Option<ElementId>,
}

impl Default for FakeHost {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeHost {
    /// A desktop-like host: observer, fine pointer and clipboard present,
    /// no reduced motion, 1280x800 viewport at the top of the page.
    #[must_use]
    pub fn new() -> Self {
        Self {
            caps: Capabilities::INTERSECTION_OBSERVER
                | Capabilities::FINE_POINTER
                | Capabilities::CLIPBOARD,
            viewport: Viewport {
                scroll_y: 0.0,
                width: 1280.0,
                height: 800.0,
            },
            location: PageLocation {
                hostname: "example.com".into(),
                pathname: "/index.html".into(),
            },
            elements: Vec::new(),
            writes: Vec::new(),
            frames: Vec::new(),
            timers: Vec::new(),
            observed: BTreeSet::new(),
            clipboard: Vec::new(),
            diagnostics: Vec::new(),
            body_locked: false,
            focused: None,
        }
    }

    #[must_use]
    pub fn with_capabilities(mut self, caps: Capabilities) -> Self {
        self.caps = caps;
        self
    }

    #[must_use]
    pub fn with_location(mut self, hostname: &str, pathname: &str) -> Self {
        self.location = PageLocation {
            hostname: hostname.into(),
            pathname: pathname.into(),
        };
        self
    }

    // -- page construction ---------------------------------------------------

    /// Add an element matching `selector` with a document-space box.
    pub fn add(&mut self, selector: &str, doc_rect: Rect) -> ElementId {
        self.add_matching(&[selector], Some(doc_rect))
    }

    /// Add an element matching several selectors.
    pub fn add_matching(&mut self, selectors: &[&str], doc_rect: Option<Rect>) -> ElementId {
        let id = ElementId(self.elements.len() as u32);
        self.elements.push(FakeElement {
            selectors: selectors.iter().map(|s| (*s).to_owned()).collect(),
            doc_rect,
            complete: true,
            ..FakeElement::default()
        });
        id
    }

    pub fn set_parent(&mut self, child: ElementId, parent: ElementId) {
        if let Some(el) = self.el_mut(child) {
            el.parent = Some(parent);
        }
    }

    /// Set an attribute without logging a write.
    pub fn set_attr(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(e) = self.el_mut(el) {
            e.attributes.insert(name.into(), value.into());
        }
    }

    pub fn set_label(&mut self, el: ElementId, text: &str) {
        if let Some(e) = self.el_mut(el) {
            e.text = text.into();
        }
    }

    pub fn set_link_hostname(&mut self, el: ElementId, hostname: &str) {
        if let Some(e) = self.el_mut(el) {
            e.link_hostname = Some(hostname.into());
        }
    }

    pub fn set_complete(&mut self, el: ElementId, complete: bool) {
        if let Some(e) = self.el_mut(el) {
            e.complete = complete;
        }
    }

    pub fn set_scroll_y(&mut self, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
    }

    // -- inspection ----------------------------------------------------------

    #[must_use]
    pub fn writes(&self) -> &[Write] {
        &self.writes
    }

    pub fn clear_writes(&mut self) {
        self.writes.clear();
    }

    #[must_use]
    pub fn class_present(&self, el: ElementId, class: &str) -> bool {
        self.el(el).is_some_and(|e| e.classes.contains(class))
    }

    #[must_use]
    pub fn style(&self, el: ElementId, property: &str) -> Option<&str> {
        self.el(el)?.styles.get(property).map(String::as_str)
    }

    #[must_use]
    pub fn attr(&self, el: ElementId, name: &str) -> Option<&str> {
        self.el(el)?.attributes.get(name).map(String::as_str)
    }

    #[must_use]
    pub fn label(&self, el: ElementId) -> Option<&str> {
        self.el(el).map(|e| e.text.as_str())
    }

    #[must_use]
    pub fn is_observed(&self, watcher: WatcherId, el: ElementId) -> bool {
        self.observed.contains(&(watcher, el))
    }

    #[must_use]
    pub fn body_scroll_locked(&self) -> bool {
        self.body_locked
    }

    #[must_use]
    pub fn focused(&self) -> Option<ElementId> {
        self.focused
    }

    #[must_use]
    pub fn pending_frames(&self) -> &[FrameStream] {
        &self.frames
    }

    #[must_use]
    pub fn timers(&self) -> &[(TimerToken, u32)] {
        &self.timers
    }

    #[must_use]
    pub fn clipboard_writes(&self) -> &[(ElementId, String)] {
        &self.clipboard
    }

    /// Messages sent to the diagnostic channel, oldest first.
    #[must_use]
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    /// Last `scroll_to` issued.
    #[must_use]
    pub fn last_scroll_to(&self) -> Option<(f64, ScrollBehavior)> {
        self.writes.iter().rev().find_map(|w| match w {
            Write::ScrollTo(top, behavior) => Some((*top, *behavior)),
            _ => None,
        })
    }

    /// Entries the browser would report for the currently observed
    /// elements of `watcher`.
    #[must_use]
    pub fn intersections(&self, reactor: &ViewportReactor, watcher: WatcherId) -> Vec<IntersectionEntry> {
        let root = self.viewport.client_rect();
        reactor
            .watcher(watcher)
            .entries_for(&root, |id| {
                if self.is_observed(watcher, id) {
                    self.bounding_rect(id)
                } else {
                    None
                }
            })
    }

    // -- driving -------------------------------------------------------------

    /// Run every frame callback requested so far, once. Callbacks requested
    /// while running are left pending.
    pub fn run_frames(&mut self, reactor: &mut ViewportReactor) {
        let frames = std::mem::take(&mut self.frames);
        for stream in frames {
            reactor.handle(self, ReactorEvent::Frame(stream));
        }
    }

    /// Scroll like the browser: dispatch one scroll event per scroll
    /// registration, report intersections, then run one frame.
    pub fn scroll_to_y(&mut self, reactor: &mut ViewportReactor, scroll_y: f64) {
        self.viewport.scroll_y = scroll_y;
        self.dispatch_scroll(reactor, scroll_y);
        self.report_intersections(reactor);
        self.run_frames(reactor);
    }

    /// Dispatch scroll events without running frames.
    pub fn dispatch_scroll(&mut self, reactor: &mut ViewportReactor, scroll_y: f64) {
        for reg in reactor.wiring() {
            if let (DomEvent::Scroll, ListenerTarget::Window, ThrottlePolicy::PerFrame(stream)) =
                (reg.event, reg.target, reg.policy)
            {
                reactor.handle(self, ReactorEvent::Scroll { stream, scroll_y });
            }
        }
    }

    /// Deliver an observer batch to each watcher that has intersecting
    /// entries.
    pub fn report_intersections(&mut self, reactor: &mut ViewportReactor) {
        for watcher in [WatcherId::Reveal, WatcherId::Stagger] {
            let entries = self.intersections(reactor, watcher);
            if entries.is_empty() {
                continue;
            }
            reactor.handle(self, ReactorEvent::Intersections { watcher, entries });
        }
    }

    fn el(&self, id: ElementId) -> Option<&FakeElement> {
        self.elements.get(id.0 as usize)
    }

    fn el_mut(&mut self, id: ElementId) -> Option<&mut FakeElement> {
        self.elements.get_mut(id.0 as usize)
    }

    fn matches(&self, id: ElementId, selector: &str) -> bool {
        self.el(id)
            .is_some_and(|e| e.selectors.iter().any(|s| s == selector))
    }
}

impl Host for FakeHost {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        (0..self.elements.len() as u32)
            .map(ElementId)
            .filter(|&id| self.matches(id, selector))
            .collect()
    }

    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId> {
        let mut cursor = Some(el);
        while let Some(id) = cursor {
            if self.matches(id, selector) {
                return Some(id);
            }
            cursor = self.el(id)?.parent;
        }
        None
    }

    fn element_by_fragment(&mut self, fragment: &str) -> Option<ElementId> {
        (0..self.elements.len() as u32)
            .map(ElementId)
            .find(|&id| self.attr(id, "id") == Some(fragment))
    }

    fn create_overlay(&mut self, class: &str) -> Option<ElementId> {
        let id = self.add_matching(&[], None);
        if let Some(e) = self.el_mut(id) {
            e.classes.insert(class.into());
        }
        Some(id)
    }

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let doc = self.el(el)?.doc_rect?;
        Some(Rect::new(doc.x, doc.y - self.viewport.scroll_y, doc.width, doc.height))
    }

    fn location(&self) -> PageLocation {
        self.location.clone()
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.attr(el, name).map(str::to_owned)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        self.set_attr(el, name, value);
        self.writes
            .push(Write::Attribute(el, name.into(), value.into()));
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.class_present(el, class)
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.el_mut(el) {
            e.classes.insert(class.into());
        }
        self.writes.push(Write::AddClass(el, class.into()));
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.el_mut(el) {
            e.classes.remove(class);
        }
        self.writes.push(Write::RemoveClass(el, class.into()));
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        if let Some(e) = self.el_mut(el) {
            if value.is_empty() {
                e.styles.remove(property);
            } else {
                e.styles.insert(property.into(), value.into());
            }
        }
        self.writes
            .push(Write::Style(el, property.into(), value.into()));
    }

    fn text(&self, el: ElementId) -> Option<String> {
        self.label(el).map(str::to_owned)
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        self.set_label(el, text);
        self.writes.push(Write::Text(el, text.into()));
    }

    fn focus(&mut self, el: ElementId) {
        self.focused = Some(el);
        self.writes.push(Write::Focus(el));
    }

    fn link_hostname(&self, el: ElementId) -> Option<String> {
        self.el(el)?.link_hostname.clone()
    }

    fn image_complete(&self, el: ElementId) -> bool {
        self.el(el).is_some_and(|e| e.complete)
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        self.body_locked = locked;
        self.writes.push(Write::BodyScrollLocked(locked));
    }

    fn set_root_scroll_behavior(&mut self, behavior: Option<ScrollBehavior>) {
        self.writes.push(Write::RootScrollBehavior(behavior));
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        self.writes.push(Write::ScrollTo(top, behavior));
    }

    fn request_frame(&mut self, stream: FrameStream) {
        self.frames.push(stream);
    }

    fn set_timer(&mut self, token: TimerToken, delay_ms: u32) {
        self.timers.push((token, delay_ms));
    }

    fn observe(&mut self, watcher: WatcherId, el: ElementId) {
        self.observed.insert((watcher, el));
    }

    fn unobserve(&mut self, watcher: WatcherId, el: ElementId) {
        self.observed.remove(&(watcher, el));
    }

    fn write_clipboard(&mut self, button: ElementId, text: &str) {
        self.clipboard.push((button, text.into()));
    }

    fn diagnostic(&mut self, message: &str) {
        self.diagnostics.push(message.into());
    }
}
