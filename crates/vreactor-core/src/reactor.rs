#![forbid(unsafe_code)]

//! The per-page coordinator.
//!
//! [`ViewportReactor`] owns every piece of state the page's presentation
//! depends on (pointer position, scroll-derived flags, nav state, reveal
//! membership, the reduced-motion gate) and applies it through a [`Host`].
//! One instance per page load; nothing is global.
//!
//! # Lifecycle
//!
//! 1. [`ViewportReactor::new`] validates the config.
//! 2. [`mount`](ViewportReactor::mount) discovers elements, applies initial
//!    state and returns the listener [`Registration`]s the host must attach.
//! 3. The host feeds [`ReactorEvent`]s to [`handle`](ViewportReactor::handle).
//! 4. [`unmount`](ViewportReactor::unmount) stops observation; the host then
//!    detaches the listeners it attached in step 2.
//!
//! # Ordering
//!
//! Each frame stream has its own [`FrameThrottle`]. Handlers never read
//! state written by another stream's handler, so the host may run frame
//! callbacks in any order.

use std::collections::BTreeMap;

use crate::anchor::{fragment_of, scroll_target_top};
use crate::clipboard::{CopyFeedback, PAYLOAD_ATTRIBUTE};
use crate::config::ReactorConfig;
use crate::cursor_glow::{CursorGlow, PointerState, card_pointer_vars};
use crate::error::ReactorError;
use crate::event::{Disposition, IntersectionEntry, ReactorEvent};
use crate::frame_throttle::FrameThrottle;
use crate::geometry::Point;
use crate::host::{
    Capabilities, DomEvent, ElementId, FrameStream, Host, ListenerTarget, MediaQuery,
    Registration, ScrollBehavior, TimerToken, WatcherId,
};
use crate::lazy_image;
use crate::links::{EXTERNAL_REL, EXTERNAL_TARGET, is_active_link, is_external};
use crate::motion::{MotionChange, MotionPreferenceGate};
use crate::nav::{CloseReason, NavController, NavState, NavTransition};
use crate::reveal::{RevealStart, RevealWatcher};
use crate::scroll_effects::{
    HeaderState, IndicatorState, ParallaxContainer, ParallaxParams, indicator_styles,
};
use crate::transform::{Tilt, TransformComponents};

/// Elements discovered at mount.
#[derive(Debug, Clone, Default)]
struct PageElements {
    header: Option<ElementId>,
    nav_toggle: Option<ElementId>,
    nav_panel: Option<ElementId>,
    nav_links: Vec<ElementId>,
    hero: Option<ElementId>,
    /// Parallax targets with their owning hero container.
    parallax: Vec<(ElementId, Option<ElementId>)>,
    scroll_indicator: Option<ElementId>,
    copy_buttons: Vec<ElementId>,
    anchors: Vec<ElementId>,
    pending_images: Vec<ElementId>,
    cards: Vec<ElementId>,
    cursor_glow: Option<ElementId>,
}

impl PageElements {
    fn has_nav(&self) -> bool {
        self.nav_toggle.is_some() && self.nav_panel.is_some()
    }
}

#[derive(Debug, Clone, Default)]
struct Throttles {
    header: FrameThrottle<f64>,
    parallax: FrameThrottle<f64>,
    indicator: FrameThrottle<f64>,
    tilt: FrameThrottle<(ElementId, Point)>,
}

impl Throttles {
    fn scroll(&mut self, stream: FrameStream) -> Option<&mut FrameThrottle<f64>> {
        match stream {
            FrameStream::Header => Some(&mut self.header),
            FrameStream::Parallax => Some(&mut self.parallax),
            FrameStream::ScrollIndicator => Some(&mut self.indicator),
            FrameStream::HeroTilt | FrameStream::CursorGlow => None,
        }
    }

    fn clear(&mut self) {
        self.header.clear();
        self.parallax.clear();
        self.indicator.clear();
        self.tilt.clear();
    }
}

/// Coordinator for one page.
#[derive(Debug)]
pub struct ViewportReactor {
    config: ReactorConfig,
    caps: Capabilities,
    page: PageElements,
    motion: MotionPreferenceGate,
    nav: NavController,
    reveal: RevealWatcher,
    stagger: RevealWatcher,
    header: HeaderState,
    indicator: IndicatorState,
    parallax: ParallaxParams,
    throttles: Throttles,
    glow: CursorGlow,
    glow_looping: bool,
    transforms: BTreeMap<ElementId, TransformComponents>,
    copy: CopyFeedback,
    mounted: bool,
}

impl ViewportReactor {
    /// Build a reactor; fails only on an invalid config.
    pub fn new(config: ReactorConfig) -> Result<Self, ReactorError> {
        config.validate()?;
        let reveal = RevealWatcher::new(WatcherId::Reveal, config.reveal.options()?);
        let stagger = RevealWatcher::new(WatcherId::Stagger, config.stagger.options()?);
        Ok(Self {
            caps: Capabilities::empty(),
            page: PageElements::default(),
            motion: MotionPreferenceGate::new(),
            nav: NavController::new(),
            reveal,
            stagger,
            header: HeaderState::new(config.header_scrolled_threshold),
            indicator: IndicatorState::new(config.indicator_hide_after),
            parallax: config.parallax_params(),
            throttles: Throttles::default(),
            glow: CursorGlow::new(config.cursor_ease),
            glow_looping: false,
            transforms: BTreeMap::new(),
            copy: CopyFeedback::new(),
            mounted: false,
            config,
        })
    }

    #[must_use]
    pub fn config(&self) -> &ReactorConfig {
        &self.config
    }

    /// Discover the page, apply initial state and return the listeners to
    /// attach. Mounting twice returns the same wiring without re-running
    /// initialization.
    pub fn mount<H: Host>(&mut self, host: &mut H) -> Vec<Registration> {
        if self.mounted {
            return self.wiring();
        }
        self.mounted = true;
        self.caps = host.capabilities();
        self.discover(host);

        self.mark_active_nav_link(host);
        self.harden_external_links(host);
        self.init_lazy_images(host);
        self.start_watchers(host);

        if self.motion.evaluate(self.caps.contains(Capabilities::REDUCED_MOTION))
            == Some(MotionChange::Asserted)
        {
            self.apply_reduced_motion(host);
        }

        if let Some(header) = self.page.header {
            let scroll_y = host.viewport().scroll_y;
            if let Some(scrolled) = self.header.update(scroll_y) {
                self.write_header(host, header, scrolled);
            }
        }
        self.start_glow_loop(host);

        crate::info!(
            reveal = self.reveal.elements().len(),
            stagger = self.stagger.elements().len(),
            parallax = self.page.parallax.len(),
            nav = self.page.has_nav(),
            reduced_motion = self.motion.is_reduced(),
            "viewport reactor mounted"
        );
        self.wiring()
    }

    /// Stop observing and drop pending frames. The host detaches listeners.
    pub fn unmount<H: Host>(&mut self, host: &mut H) {
        if !self.mounted {
            return;
        }
        for watcher in [&self.reveal, &self.stagger] {
            for id in watcher.hidden() {
                host.unobserve(watcher.id(), id);
            }
        }
        self.throttles.clear();
        self.glow_looping = false;
        self.mounted = false;
        crate::debug!("viewport reactor unmounted");
    }

    /// Listener records for the current page, in a fixed order.
    #[must_use]
    pub fn wiring(&self) -> Vec<Registration> {
        let page = &self.page;
        let mut regs = Vec::new();

        if page.header.is_some() {
            regs.push(Registration::per_frame(
                DomEvent::Scroll,
                ListenerTarget::Window,
                FrameStream::Header,
            ));
        }
        if !page.parallax.is_empty() {
            regs.push(Registration::per_frame(
                DomEvent::Scroll,
                ListenerTarget::Window,
                FrameStream::Parallax,
            ));
        }
        if page.scroll_indicator.is_some() {
            regs.push(Registration::per_frame(
                DomEvent::Scroll,
                ListenerTarget::Window,
                FrameStream::ScrollIndicator,
            ));
        }
        if page.cursor_glow.is_some() {
            regs.push(Registration {
                passive: true,
                ..Registration::immediate(DomEvent::MouseMove, ListenerTarget::Document)
            });
            regs.push(Registration::immediate(
                DomEvent::MouseLeave,
                ListenerTarget::Document,
            ));
        }
        if let (Some(toggle), true) = (page.nav_toggle, page.has_nav()) {
            regs.push(Registration::immediate(
                DomEvent::Click,
                ListenerTarget::NavToggle(toggle),
            ));
            for &link in &page.nav_links {
                regs.push(Registration::immediate(
                    DomEvent::Click,
                    ListenerTarget::NavLink(link),
                ));
            }
            regs.push(Registration::immediate(
                DomEvent::KeyDown,
                ListenerTarget::Document,
            ));
            regs.push(Registration::immediate(
                DomEvent::Click,
                ListenerTarget::Document,
            ));
        }
        if let (Some(hero), true) = (page.hero, self.caps.contains(Capabilities::FINE_POINTER)) {
            regs.push(Registration::per_frame(
                DomEvent::MouseMove,
                ListenerTarget::Hero(hero),
                FrameStream::HeroTilt,
            ));
            regs.push(Registration::immediate(
                DomEvent::MouseLeave,
                ListenerTarget::Hero(hero),
            ));
        }
        for &card in &page.cards {
            regs.push(Registration {
                passive: true,
                ..Registration::immediate(DomEvent::MouseMove, ListenerTarget::Card(card))
            });
        }
        for &anchor in &page.anchors {
            regs.push(Registration::immediate(
                DomEvent::Click,
                ListenerTarget::Anchor(anchor),
            ));
        }
        for &button in &page.copy_buttons {
            regs.push(Registration::immediate(
                DomEvent::Click,
                ListenerTarget::CopyButton(button),
            ));
        }
        for &image in &page.pending_images {
            regs.push(Registration::immediate(
                DomEvent::Load,
                ListenerTarget::LazyImage(image),
            ));
        }
        regs.push(Registration::immediate(
            DomEvent::Change,
            ListenerTarget::Media(MediaQuery::ReducedMotion),
        ));
        regs
    }

    /// Apply one host event.
    pub fn handle<H: Host>(&mut self, host: &mut H, event: ReactorEvent) -> Disposition {
        if !self.mounted {
            return Disposition::Proceed;
        }
        match event {
            ReactorEvent::Scroll { stream, scroll_y } => {
                if let Some(throttle) = self.throttles.scroll(stream)
                    && throttle.push(scroll_y)
                {
                    host.request_frame(stream);
                }
            }
            ReactorEvent::Frame(stream) => self.on_frame(host, stream),
            ReactorEvent::PointerMove(at) => {
                if let Some(glow) = self.page.cursor_glow
                    && self.glow.on_move(at)
                {
                    host.add_class(glow, &self.config.classes.cursor_glow_active);
                }
            }
            ReactorEvent::PointerLeave => {
                if let Some(glow) = self.page.cursor_glow
                    && self.glow.on_leave()
                {
                    host.remove_class(glow, &self.config.classes.cursor_glow_active);
                }
            }
            ReactorEvent::HeroPointerMove { hero, at } => {
                if self.page.hero == Some(hero) && self.throttles.tilt.push((hero, at)) {
                    host.request_frame(FrameStream::HeroTilt);
                }
            }
            ReactorEvent::HeroPointerLeave { hero } => self.reset_tilt(host, hero),
            ReactorEvent::CardPointerMove { card, at } => {
                if let Some(rect) = host.bounding_rect(card) {
                    for (property, value) in card_pointer_vars(&rect, at) {
                        host.set_style(card, property, &value);
                    }
                }
            }
            ReactorEvent::NavToggleClick => {
                if self.page.has_nav() {
                    let transition = self.nav.toggle();
                    self.reflect_nav(host, transition);
                }
            }
            ReactorEvent::NavLinkClick { .. } => {
                if let Some(transition) = self.nav.close(CloseReason::LinkSelected) {
                    self.reflect_nav(host, transition);
                }
            }
            ReactorEvent::DocumentClick {
                inside_panel,
                on_toggle,
            } => {
                if let Some(transition) = self.nav.on_document_click(inside_panel, on_toggle) {
                    self.reflect_nav(host, transition);
                }
            }
            ReactorEvent::KeyDown { key } => {
                if let Some(transition) = self.nav.on_key(&key) {
                    self.reflect_nav(host, transition);
                }
            }
            ReactorEvent::AnchorClick { anchor } => return self.on_anchor_click(host, anchor),
            ReactorEvent::CopyClick { button } => self.on_copy_click(host, button),
            ReactorEvent::ClipboardResult { button, ok, detail } => {
                self.on_clipboard_result(host, button, ok, detail);
            }
            ReactorEvent::Timer(TimerToken::CopyRevert { button, epoch }) => {
                if let Some(label) = self.copy.on_timer(button, epoch) {
                    host.set_text(button, &label);
                }
            }
            ReactorEvent::ImageLoaded { image } => {
                let (property, value) = lazy_image::LOADED_STYLE;
                host.set_style(image, property, value);
            }
            ReactorEvent::Intersections { watcher, entries } => {
                self.on_intersections(host, watcher, &entries);
            }
            ReactorEvent::MotionPreferenceChanged { reduced } => match self.motion.evaluate(reduced) {
                Some(MotionChange::Asserted) => self.apply_reduced_motion(host),
                Some(MotionChange::Released) => self.release_reduced_motion(host),
                None => {}
            },
        }
        Disposition::Proceed
    }

    // -- accessors -----------------------------------------------------------

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.caps
    }

    #[must_use]
    pub fn nav_state(&self) -> NavState {
        self.nav.state()
    }

    #[must_use]
    pub fn nav_toggle(&self) -> Option<ElementId> {
        self.page.nav_toggle
    }

    #[must_use]
    pub fn nav_panel(&self) -> Option<ElementId> {
        self.page.nav_panel
    }

    #[must_use]
    pub fn cursor_glow(&self) -> Option<ElementId> {
        self.page.cursor_glow
    }

    #[must_use]
    pub fn pointer(&self) -> PointerState {
        self.glow.pointer()
    }

    #[must_use]
    pub fn header_scrolled(&self) -> bool {
        self.header.scrolled()
    }

    #[must_use]
    pub fn motion_reduced(&self) -> bool {
        self.motion.is_reduced()
    }

    /// Whether `el` has been revealed by either watcher.
    #[must_use]
    pub fn is_revealed(&self, el: ElementId) -> bool {
        self.reveal.is_visible(el) || self.stagger.is_visible(el)
    }

    #[must_use]
    pub fn watcher(&self, id: WatcherId) -> &RevealWatcher {
        match id {
            WatcherId::Reveal => &self.reveal,
            WatcherId::Stagger => &self.stagger,
        }
    }

    /// Last transform written to a parallax target.
    #[must_use]
    pub fn transform_of(&self, el: ElementId) -> Option<TransformComponents> {
        self.transforms.get(&el).copied()
    }

    // -- mount helpers -------------------------------------------------------

    fn discover<H: Host>(&mut self, host: &mut H) {
        let sel = &self.config.selectors;
        let mut page = PageElements {
            header: host.query_one(&sel.header),
            nav_toggle: host.query_one(&sel.nav_toggle),
            nav_panel: host.query_one(&sel.nav_panel),
            nav_links: host.query_all(&sel.nav_link),
            hero: host.query_one(&sel.hero),
            scroll_indicator: host.query_one(&sel.scroll_indicator),
            copy_buttons: host.query_all(&sel.copy_button),
            anchors: host.query_all(&sel.anchor),
            cards: host.query_all(&sel.card),
            ..PageElements::default()
        };
        for target in host.query_all(&sel.parallax_target) {
            let owner = host.closest(target, &sel.hero);
            page.parallax.push((target, owner));
        }
        if self.caps.contains(Capabilities::FINE_POINTER) {
            page.cursor_glow = host.create_overlay(&self.config.classes.cursor_glow);
        }
        self.page = page;
    }

    fn mark_active_nav_link<H: Host>(&self, host: &mut H) {
        let path = host.location().pathname;
        let class = &self.config.classes.nav_link_active;
        for &link in &self.page.nav_links {
            let href = host.attribute(link, "href").unwrap_or_default();
            if is_active_link(&path, &href) {
                host.add_class(link, class);
            } else {
                host.remove_class(link, class);
            }
        }
    }

    fn harden_external_links<H: Host>(&self, host: &mut H) {
        let page_host = host.location().hostname;
        for link in host.query_all(&self.config.selectors.external_link) {
            let Some(link_host) = host.link_hostname(link) else {
                continue;
            };
            if is_external(&link_host, &page_host) {
                host.set_attribute(link, "rel", EXTERNAL_REL);
                host.set_attribute(link, "target", EXTERNAL_TARGET);
            }
        }
    }

    fn init_lazy_images<H: Host>(&mut self, host: &mut H) {
        for image in host.query_all(&self.config.selectors.lazy_image) {
            let complete = host.image_complete(image);
            for (property, value) in lazy_image::initial_styles(complete) {
                host.set_style(image, property, value);
            }
            if !complete {
                self.page.pending_images.push(image);
            }
        }
    }

    fn start_watchers<H: Host>(&mut self, host: &mut H) {
        let observer = self.caps.contains(Capabilities::INTERSECTION_OBSERVER);
        let reveal_els = host.query_all(&self.config.selectors.reveal);
        let stagger_els = host.query_all(&self.config.selectors.reveal_stagger);
        let classes = &self.config.classes;

        for (watcher, elements, class) in [
            (&mut self.reveal, reveal_els, &classes.reveal_visible),
            (&mut self.stagger, stagger_els, &classes.stagger_visible),
        ] {
            match watcher.start(elements, observer) {
                RevealStart::Observe(ids) => {
                    for id in ids {
                        host.observe(watcher.id(), id);
                    }
                }
                RevealStart::RevealedAll(ids) => {
                    crate::debug!(
                        watcher = ?watcher.id(),
                        count = ids.len(),
                        "intersection observer unavailable; revealing immediately"
                    );
                    for id in ids {
                        host.add_class(id, class);
                    }
                }
            }
        }
    }

    // -- event handlers ------------------------------------------------------

    fn on_frame<H: Host>(&mut self, host: &mut H, stream: FrameStream) {
        match stream {
            FrameStream::Header => {
                let (Some(scroll_y), Some(header)) = (self.throttles.header.fire(), self.page.header)
                else {
                    return;
                };
                if let Some(scrolled) = self.header.update(scroll_y) {
                    self.write_header(host, header, scrolled);
                }
            }
            FrameStream::Parallax => {
                let Some(scroll_y) = self.throttles.parallax.fire() else {
                    return;
                };
                if self.motion.allows_motion() {
                    self.update_parallax(host, scroll_y);
                }
            }
            FrameStream::ScrollIndicator => {
                let (Some(scroll_y), Some(indicator)) =
                    (self.throttles.indicator.fire(), self.page.scroll_indicator)
                else {
                    return;
                };
                if let Some(hidden) = self.indicator.update(scroll_y) {
                    for (property, value) in indicator_styles(hidden) {
                        host.set_style(indicator, property, value);
                    }
                }
            }
            FrameStream::HeroTilt => {
                let Some((hero, at)) = self.throttles.tilt.fire() else {
                    return;
                };
                if self.motion.allows_motion() && self.caps.contains(Capabilities::FINE_POINTER) {
                    self.apply_tilt(host, hero, at);
                }
            }
            FrameStream::CursorGlow => self.step_glow(host),
        }
    }

    fn write_header<H: Host>(&self, host: &mut H, header: ElementId, scrolled: bool) {
        let class = &self.config.classes.header_scrolled;
        if scrolled {
            host.add_class(header, class);
        } else {
            host.remove_class(header, class);
        }
    }

    fn update_parallax<H: Host>(&mut self, host: &mut H, scroll_y: f64) {
        let viewport = host.viewport();
        for &(target, owner) in &self.page.parallax {
            let Some(rect) = owner.and_then(|hero| host.bounding_rect(hero)) else {
                continue;
            };
            let container = ParallaxContainer {
                top: rect.top() + viewport.scroll_y,
                height: rect.height,
            };
            let Some(frame) = self.parallax.frame(scroll_y, viewport.height, container) else {
                continue;
            };
            let transform = self
                .transforms
                .entry(target)
                .or_default()
                .with_parallax(frame.translate_y, frame.scale);
            self.transforms.insert(target, transform);
            host.set_style(target, "transform", &transform.to_css());
        }
    }

    fn apply_tilt<H: Host>(&mut self, host: &mut H, hero: ElementId, at: Point) {
        let Some(rect) = host.bounding_rect(hero) else {
            return;
        };
        let Some(tilt) = Tilt::from_pointer(&rect, at, self.config.tilt_factor_deg) else {
            return;
        };
        for &(target, owner) in &self.page.parallax {
            if owner != Some(hero) {
                continue;
            }
            let transform = self.transforms.entry(target).or_default().with_tilt(tilt);
            self.transforms.insert(target, transform);
            host.set_style(target, "transform", &transform.to_css());
        }
    }

    fn reset_tilt<H: Host>(&mut self, host: &mut H, hero: ElementId) {
        if self.page.hero != Some(hero) {
            return;
        }
        self.throttles.tilt.discard_pending();
        for &(target, owner) in &self.page.parallax {
            if owner != Some(hero) {
                continue;
            }
            let Some(current) = self.transforms.get(&target).copied() else {
                continue;
            };
            if !current.has_rotation() {
                continue;
            }
            let transform = current.without_tilt();
            self.transforms.insert(target, transform);
            host.set_style(target, "transform", &transform.to_css());
        }
    }

    fn start_glow_loop<H: Host>(&mut self, host: &mut H) {
        if self.page.cursor_glow.is_some() && self.motion.allows_motion() && !self.glow_looping {
            self.glow_looping = true;
            host.request_frame(FrameStream::CursorGlow);
        }
    }

    fn step_glow<H: Host>(&mut self, host: &mut H) {
        let Some(glow) = self.page.cursor_glow else {
            self.glow_looping = false;
            return;
        };
        if !self.glow_looping || !self.motion.allows_motion() {
            self.glow_looping = false;
            return;
        }
        let at = self.glow.step();
        host.set_style(glow, "left", &format!("{}px", at.x));
        host.set_style(glow, "top", &format!("{}px", at.y));
        host.request_frame(FrameStream::CursorGlow);
    }

    fn reflect_nav<H: Host>(&self, host: &mut H, transition: NavTransition) {
        let (Some(toggle), Some(panel)) = (self.page.nav_toggle, self.page.nav_panel) else {
            return;
        };
        host.set_attribute(toggle, "aria-expanded", transition.state.aria_expanded());
        if transition.state.is_open() {
            host.add_class(panel, &self.config.classes.nav_open);
        } else {
            host.remove_class(panel, &self.config.classes.nav_open);
        }
        host.set_body_scroll_locked(transition.lock_scroll());
        if transition.focus_toggle {
            host.focus(toggle);
        }
        crate::debug!(state = ?transition.state, "nav panel");
    }

    fn on_anchor_click<H: Host>(&mut self, host: &mut H, anchor: ElementId) -> Disposition {
        let Some(href) = host.attribute(anchor, "href") else {
            return Disposition::Proceed;
        };
        let Some(fragment) = fragment_of(&href) else {
            return Disposition::Proceed;
        };
        let Some(target) = host.element_by_fragment(fragment) else {
            return Disposition::Proceed;
        };
        let Some(rect) = host.bounding_rect(target) else {
            return Disposition::Proceed;
        };
        let top = scroll_target_top(
            rect.top(),
            host.viewport().scroll_y,
            self.config.anchor_header_offset,
        );
        host.scroll_to(top, self.motion.scroll_behavior());
        Disposition::PreventDefault
    }

    fn on_copy_click<H: Host>(&mut self, host: &mut H, button: ElementId) {
        let Some(payload) = host.attribute(button, PAYLOAD_ATTRIBUTE) else {
            return;
        };
        if !self.caps.contains(Capabilities::CLIPBOARD) {
            crate::warn!(button = button.0, "clipboard unavailable; copy skipped");
            host.diagnostic("vreactor: clipboard unavailable; copy skipped");
            return;
        }
        host.write_clipboard(button, &payload);
    }

    fn on_clipboard_result<H: Host>(
        &mut self,
        host: &mut H,
        button: ElementId,
        ok: bool,
        detail: Option<String>,
    ) {
        if !ok {
            let detail = detail.as_deref().unwrap_or("unknown");
            crate::warn!(button = button.0, detail, "clipboard write failed");
            host.diagnostic(&format!("vreactor: clipboard write failed ({detail})"));
            return;
        }
        let label = host.text(button).unwrap_or_default();
        let confirmation = self.copy.on_success(button, &label);
        host.set_text(button, &self.config.copy_confirm_label);
        host.set_timer(confirmation.revert, self.config.copy_confirm_ms);
    }

    fn on_intersections<H: Host>(
        &mut self,
        host: &mut H,
        watcher: WatcherId,
        entries: &[IntersectionEntry],
    ) {
        let (watcher, class) = match watcher {
            WatcherId::Reveal => (&mut self.reveal, &self.config.classes.reveal_visible),
            WatcherId::Stagger => (&mut self.stagger, &self.config.classes.stagger_visible),
        };
        for id in watcher.on_entries(entries) {
            host.unobserve(watcher.id(), id);
            host.add_class(id, class);
        }
    }

    fn apply_reduced_motion<H: Host>(&mut self, host: &mut H) {
        host.set_root_scroll_behavior(Some(ScrollBehavior::Auto));

        for &(target, _) in &self.page.parallax {
            self.transforms.remove(&target);
            host.set_style(target, "transform", "");
        }

        let classes = &self.config.classes;
        for (watcher, class) in [
            (&mut self.reveal, &classes.reveal_visible),
            (&mut self.stagger, &classes.stagger_visible),
        ] {
            for id in watcher.reveal_all() {
                host.unobserve(watcher.id(), id);
                host.add_class(id, class);
            }
            for el in watcher.elements() {
                host.set_style(el.id, "opacity", "1");
                host.set_style(el.id, "transform", "none");
            }
        }

        if let Some(glow) = self.page.cursor_glow {
            host.set_style(glow, "display", "none");
        }
        self.glow_looping = false;
        crate::info!("reduced motion asserted");
    }

    fn release_reduced_motion<H: Host>(&mut self, host: &mut H) {
        host.set_root_scroll_behavior(None);
        if let Some(glow) = self.page.cursor_glow {
            host.set_style(glow, "display", "");
        }
        self.start_glow_loop(host);
        crate::info!("reduced motion released");
    }
}
