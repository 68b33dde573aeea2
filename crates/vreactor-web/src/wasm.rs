#![forbid(unsafe_code)]

use std::cell::RefCell;
use std::rc::Rc;

use js_sys::{Array, Promise, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::{JsFuture, spawn_local};
use web_sys::{
    AddEventListenerOptions, Document, Element, Event, EventTarget, HtmlAnchorElement,
    HtmlElement, HtmlImageElement, IntersectionObserver, IntersectionObserverEntry,
    IntersectionObserverInit, KeyboardEvent, MediaQueryList, MouseEvent, Node, ScrollToOptions,
    Window,
};

use vreactor_core::event::IntersectionEntry;
use vreactor_core::geometry::{Point, Rect};
use vreactor_core::host::{
    Capabilities, DomEvent, ElementId, FrameStream, ListenerTarget, MediaQuery, PageLocation,
    ScrollBehavior, TimerToken, Viewport, WatcherId,
};
use vreactor_core::{
    Disposition, Host, ReactorError, ReactorEvent, Registration, ViewportReactor,
};

use crate::bridge::{DomSample, parse_options, status_json, translate};

const FINE_POINTER_QUERY: &str = "(pointer: fine)";

fn warn(context: &str, err: &JsValue) {
    web_sys::console::warn_2(&JsValue::from_str(context), err);
}

fn js_error(err: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&err.to_string())
}

/// Work the reactor asked for that must run outside its borrow.
enum Effect {
    Frame(FrameStream),
    Timer(TimerToken, u32),
    Clipboard(ElementId, String),
}

/// `Host` over the live document.
///
/// Element handles are indices into `elements`; the same DOM node always
/// maps to the same id.
struct DomHost {
    window: Window,
    document: Document,
    caps: Capabilities,
    elements: Vec<Element>,
    observers: Vec<(WatcherId, IntersectionObserver)>,
    nav_toggle: Option<ElementId>,
    nav_panel: Option<ElementId>,
    effects: Vec<Effect>,
}

impl DomHost {
    fn new() -> Result<Self, JsValue> {
        let window = web_sys::window().ok_or_else(|| js_error(ReactorError::Host("window")))?;
        let document = window
            .document()
            .ok_or_else(|| js_error(ReactorError::Host("document")))?;
        let mut host = Self {
            window,
            document,
            caps: Capabilities::empty(),
            elements: Vec::new(),
            observers: Vec::new(),
            nav_toggle: None,
            nav_panel: None,
            effects: Vec::new(),
        };
        host.caps = host.detect_capabilities();
        Ok(host)
    }

    fn detect_capabilities(&self) -> Capabilities {
        let mut caps = Capabilities::empty();
        if Reflect::has(&self.window, &JsValue::from_str("IntersectionObserver")).unwrap_or(false) {
            caps |= Capabilities::INTERSECTION_OBSERVER;
        }
        if self.media_matches(FINE_POINTER_QUERY) {
            caps |= Capabilities::FINE_POINTER;
        }
        if self.media_matches(MediaQuery::ReducedMotion.query()) {
            caps |= Capabilities::REDUCED_MOTION;
        }
        if Reflect::has(&self.window.navigator(), &JsValue::from_str("clipboard")).unwrap_or(false) {
            caps |= Capabilities::CLIPBOARD;
        }
        caps
    }

    fn media_matches(&self, query: &str) -> bool {
        self.window
            .match_media(query)
            .ok()
            .flatten()
            .is_some_and(|mq| mq.matches())
    }

    fn intern(&mut self, el: Element) -> ElementId {
        if let Some(i) = self.elements.iter().position(|e| *e == el) {
            return ElementId(i as u32);
        }
        self.elements.push(el);
        ElementId((self.elements.len() - 1) as u32)
    }

    fn element(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0 as usize)
    }

    fn html(&self, id: ElementId) -> Option<&HtmlElement> {
        self.element(id)?.dyn_ref::<HtmlElement>()
    }

    fn contains(&self, id: Option<ElementId>, node: Option<&Node>) -> bool {
        id.and_then(|id| self.element(id))
            .is_some_and(|el| node.is_some() && el.contains(node))
    }

    /// Read what the listener for `reg` needs from `event`.
    fn sample(&self, reg: &Registration, event: &Event) -> DomSample {
        let mut sample = DomSample {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            ..DomSample::default()
        };
        if let Some(mouse) = event.dyn_ref::<MouseEvent>() {
            sample.client = Some(Point::new(
                f64::from(mouse.client_x()),
                f64::from(mouse.client_y()),
            ));
        }
        if let Some(key) = event.dyn_ref::<KeyboardEvent>() {
            sample.key = Some(key.key());
        }
        if let Some(mq) = event
            .current_target()
            .and_then(|t| t.dyn_into::<MediaQueryList>().ok())
        {
            sample.matches = mq.matches();
        }
        if reg.event == DomEvent::Click && reg.target == ListenerTarget::Document {
            let node = event.target().and_then(|t| t.dyn_into::<Node>().ok());
            sample.inside_panel = self.contains(self.nav_panel, node.as_ref());
            sample.on_toggle = self.contains(self.nav_toggle, node.as_ref());
        }
        sample
    }

    fn listener_target(&self, target: ListenerTarget) -> Result<Option<EventTarget>, JsValue> {
        let target: EventTarget = match target {
            ListenerTarget::Window => self.window.clone().into(),
            ListenerTarget::Document => self.document.clone().into(),
            ListenerTarget::Media(query) => match self.window.match_media(query.query())? {
                Some(mq) => mq.into(),
                None => return Ok(None),
            },
            ListenerTarget::NavToggle(id)
            | ListenerTarget::NavLink(id)
            | ListenerTarget::Hero(id)
            | ListenerTarget::Card(id)
            | ListenerTarget::Anchor(id)
            | ListenerTarget::CopyButton(id)
            | ListenerTarget::LazyImage(id) => match self.element(id) {
                Some(el) => el.clone().into(),
                None => return Ok(None),
            },
        };
        Ok(Some(target))
    }
}

impl Host for DomHost {
    fn capabilities(&self) -> Capabilities {
        self.caps
    }

    fn query_all(&mut self, selector: &str) -> Vec<ElementId> {
        let list = match self.document.query_selector_all(selector) {
            Ok(list) => list,
            Err(err) => {
                warn("vreactor: bad selector", &err);
                return Vec::new();
            }
        };
        let found: Vec<Element> = (0..list.length())
            .filter_map(|i| list.get(i))
            .filter_map(|node| node.dyn_into::<Element>().ok())
            .collect();
        found.into_iter().map(|el| self.intern(el)).collect()
    }

    fn closest(&mut self, el: ElementId, selector: &str) -> Option<ElementId> {
        let found = self.element(el)?.closest(selector).ok()??;
        Some(self.intern(found))
    }

    fn element_by_fragment(&mut self, fragment: &str) -> Option<ElementId> {
        let found = self.document.get_element_by_id(fragment)?;
        Some(self.intern(found))
    }

    fn create_overlay(&mut self, class: &str) -> Option<ElementId> {
        let el = self.document.create_element("div").ok()?;
        el.set_class_name(class);
        el.set_attribute("aria-hidden", "true").ok()?;
        self.document.body()?.append_child(&el).ok()?;
        Some(self.intern(el))
    }

    fn viewport(&self) -> Viewport {
        let dimension = |v: Result<JsValue, JsValue>| v.ok().and_then(|v| v.as_f64()).unwrap_or(0.0);
        Viewport {
            scroll_y: self.window.scroll_y().unwrap_or(0.0),
            width: dimension(self.window.inner_width()),
            height: dimension(self.window.inner_height()),
        }
    }

    fn bounding_rect(&self, el: ElementId) -> Option<Rect> {
        let r = self.element(el)?.get_bounding_client_rect();
        Some(Rect::new(r.x(), r.y(), r.width(), r.height()))
    }

    fn location(&self) -> PageLocation {
        let location = self.window.location();
        PageLocation {
            hostname: location.hostname().unwrap_or_default(),
            pathname: location.pathname().unwrap_or_default(),
        }
    }

    fn attribute(&self, el: ElementId, name: &str) -> Option<String> {
        self.element(el)?.get_attribute(name)
    }

    fn set_attribute(&mut self, el: ElementId, name: &str, value: &str) {
        if let Some(e) = self.element(el)
            && let Err(err) = e.set_attribute(name, value)
        {
            warn("vreactor: set_attribute failed", &err);
        }
    }

    fn has_class(&self, el: ElementId, class: &str) -> bool {
        self.element(el)
            .is_some_and(|e| e.class_list().contains(class))
    }

    fn add_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            if let Err(err) = e.class_list().add_1(class) {
                warn("vreactor: classList.add failed", &err);
            }
        }
    }

    fn remove_class(&mut self, el: ElementId, class: &str) {
        if let Some(e) = self.element(el) {
            if let Err(err) = e.class_list().remove_1(class) {
                warn("vreactor: classList.remove failed", &err);
            }
        }
    }

    fn set_style(&mut self, el: ElementId, property: &str, value: &str) {
        let Some(html) = self.html(el) else {
            return;
        };
        let style = html.style();
        let result = if value.is_empty() {
            style.remove_property(property).map(drop)
        } else {
            style.set_property(property, value)
        };
        if let Err(err) = result {
            warn("vreactor: style write failed", &err);
        }
    }

    fn text(&self, el: ElementId) -> Option<String> {
        self.element(el)?.text_content()
    }

    fn set_text(&mut self, el: ElementId, text: &str) {
        if let Some(e) = self.element(el) {
            e.set_text_content(Some(text));
        }
    }

    fn focus(&mut self, el: ElementId) {
        if let Some(html) = self.html(el) {
            if let Err(err) = html.focus() {
                warn("vreactor: focus failed", &err);
            }
        }
    }

    fn link_hostname(&self, el: ElementId) -> Option<String> {
        self.element(el)?
            .dyn_ref::<HtmlAnchorElement>()
            .map(HtmlAnchorElement::hostname)
    }

    fn image_complete(&self, el: ElementId) -> bool {
        self.element(el)
            .and_then(|e| e.dyn_ref::<HtmlImageElement>())
            .is_none_or(HtmlImageElement::complete)
    }

    fn set_body_scroll_locked(&mut self, locked: bool) {
        let Some(body) = self.document.body() else {
            return;
        };
        let style = body.style();
        let result = if locked {
            style.set_property("overflow", "hidden")
        } else {
            style.remove_property("overflow").map(drop)
        };
        if let Err(err) = result {
            warn("vreactor: body scroll lock failed", &err);
        }
    }

    fn set_root_scroll_behavior(&mut self, behavior: Option<ScrollBehavior>) {
        let Some(root) = self
            .document
            .document_element()
            .and_then(|el| el.dyn_into::<HtmlElement>().ok())
        else {
            return;
        };
        let style = root.style();
        let result = match behavior {
            Some(behavior) => style.set_property("scroll-behavior", behavior.as_str()),
            None => style.remove_property("scroll-behavior").map(drop),
        };
        if let Err(err) = result {
            warn("vreactor: scroll-behavior write failed", &err);
        }
    }

    fn scroll_to(&mut self, top: f64, behavior: ScrollBehavior) {
        let options = ScrollToOptions::new();
        options.set_top(top);
        options.set_behavior(match behavior {
            ScrollBehavior::Smooth => web_sys::ScrollBehavior::Smooth,
            ScrollBehavior::Auto => web_sys::ScrollBehavior::Auto,
        });
        self.window.scroll_to_with_scroll_to_options(&options);
    }

    fn request_frame(&mut self, stream: FrameStream) {
        self.effects.push(Effect::Frame(stream));
    }

    fn set_timer(&mut self, token: TimerToken, delay_ms: u32) {
        self.effects.push(Effect::Timer(token, delay_ms));
    }

    fn observe(&mut self, watcher: WatcherId, el: ElementId) {
        let observer = self.observers.iter().find(|(id, _)| *id == watcher);
        if let (Some((_, observer)), Some(el)) = (observer, self.element(el)) {
            observer.observe(el);
        }
    }

    fn unobserve(&mut self, watcher: WatcherId, el: ElementId) {
        let observer = self.observers.iter().find(|(id, _)| *id == watcher);
        if let (Some((_, observer)), Some(el)) = (observer, self.element(el)) {
            observer.unobserve(el);
        }
    }

    fn write_clipboard(&mut self, button: ElementId, text: &str) {
        self.effects.push(Effect::Clipboard(button, text.to_owned()));
    }

    fn diagnostic(&mut self, message: &str) {
        web_sys::console::warn_1(&JsValue::from_str(message));
    }
}

struct Shared {
    reactor: ViewportReactor,
    host: DomHost,
}

type SharedRef = Rc<RefCell<Shared>>;

/// Build an event against the host and feed it to the reactor, then run
/// whatever scheduling the reactor requested.
fn dispatch_with(
    shared: &SharedRef,
    make: impl FnOnce(&mut DomHost) -> Option<ReactorEvent>,
) -> Disposition {
    let disposition = {
        let Ok(mut guard) = shared.try_borrow_mut() else {
            warn("vreactor: re-entrant event dropped", &JsValue::UNDEFINED);
            return Disposition::Proceed;
        };
        let Shared { reactor, host } = &mut *guard;
        let Some(event) = make(host) else {
            return Disposition::Proceed;
        };
        reactor.handle(host, event)
    };
    flush(shared);
    disposition
}

fn dispatch(shared: &SharedRef, event: ReactorEvent) -> Disposition {
    dispatch_with(shared, |_| Some(event))
}

fn flush(shared: &SharedRef) {
    let (window, effects) = match shared.try_borrow_mut() {
        Ok(mut guard) => (
            guard.host.window.clone(),
            std::mem::take(&mut guard.host.effects),
        ),
        Err(_) => return,
    };
    for effect in effects {
        match effect {
            Effect::Frame(stream) => {
                let weak = Rc::downgrade(shared);
                let callback = Closure::once_into_js(move |_timestamp: f64| {
                    if let Some(shared) = weak.upgrade() {
                        dispatch(&shared, ReactorEvent::Frame(stream));
                    }
                });
                if let Err(err) = window.request_animation_frame(callback.unchecked_ref()) {
                    warn("vreactor: requestAnimationFrame failed", &err);
                }
            }
            Effect::Timer(token, delay_ms) => {
                let weak = Rc::downgrade(shared);
                let callback = Closure::once_into_js(move || {
                    if let Some(shared) = weak.upgrade() {
                        dispatch(&shared, ReactorEvent::Timer(token));
                    }
                });
                let delay = i32::try_from(delay_ms).unwrap_or(i32::MAX);
                if let Err(err) = window
                    .set_timeout_with_callback_and_timeout_and_arguments_0(
                        callback.unchecked_ref(),
                        delay,
                    )
                {
                    warn("vreactor: setTimeout failed", &err);
                }
            }
            Effect::Clipboard(button, text) => {
                let weak = Rc::downgrade(shared);
                let promise = clipboard_write(&window, &text);
                spawn_local(async move {
                    let result = match promise {
                        Ok(promise) => JsFuture::from(promise).await.map(drop),
                        Err(err) => Err(err),
                    };
                    let Some(shared) = weak.upgrade() else {
                        return;
                    };
                    let (ok, detail) = match result {
                        Ok(()) => (true, None),
                        Err(err) => (false, error_name(&err)),
                    };
                    dispatch(
                        &shared,
                        ReactorEvent::ClipboardResult { button, ok, detail },
                    );
                });
            }
        }
    }
}

fn clipboard_write(window: &Window, text: &str) -> Result<Promise, JsValue> {
    let clipboard = Reflect::get(&window.navigator(), &JsValue::from_str("clipboard"))?
        .dyn_into::<web_sys::Clipboard>()?;
    Ok(clipboard.write_text(text))
}

fn error_name(err: &JsValue) -> Option<String> {
    Reflect::get(err, &JsValue::from_str("name"))
        .ok()
        .and_then(|v| v.as_string())
        .or_else(|| err.as_string())
}

struct Listener {
    target: EventTarget,
    event: &'static str,
    callback: Closure<dyn FnMut(Event)>,
}

/// Page-level reactor bound to the live document.
///
/// JS usage:
///
/// ```text
/// const reactor = new ViewportReactorWeb();
/// reactor.mount(JSON.stringify({ header_scrolled_threshold: 10 }));
/// // ... on page teardown
/// reactor.destroy();
/// ```
#[wasm_bindgen]
pub struct ViewportReactorWeb {
    shared: Option<SharedRef>,
    listeners: Vec<Listener>,
    observer_callbacks: Vec<Closure<dyn FnMut(Array, IntersectionObserver)>>,
}

#[wasm_bindgen]
impl ViewportReactorWeb {
    #[wasm_bindgen(constructor)]
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self {
            shared: None,
            listeners: Vec::new(),
            observer_callbacks: Vec::new(),
        }
    }

    /// Discover the page, apply initial state and attach listeners.
    ///
    /// `options` is an optional JSON config document; unknown keys and
    /// out-of-range values are rejected. Mounting an already mounted
    /// instance is a no-op.
    pub fn mount(&mut self, options: Option<String>) -> Result<(), JsValue> {
        console_error_panic_hook::set_once();
        if self.shared.is_some() {
            return Ok(());
        }
        let config = parse_options(options.as_deref()).map_err(js_error)?;
        let reactor = ViewportReactor::new(config).map_err(js_error)?;
        let host = DomHost::new()?;
        let observing = host.caps.contains(Capabilities::INTERSECTION_OBSERVER);
        let shared = Rc::new(RefCell::new(Shared { reactor, host }));

        if observing {
            for watcher in [WatcherId::Reveal, WatcherId::Stagger] {
                self.create_observer(&shared, watcher)?;
            }
        }

        let wiring = {
            let mut guard = shared.borrow_mut();
            let Shared { reactor, host } = &mut *guard;
            let wiring = reactor.mount(host);
            host.nav_toggle = reactor.nav_toggle();
            host.nav_panel = reactor.nav_panel();
            wiring
        };
        flush(&shared);

        for reg in wiring {
            self.attach(&shared, reg)?;
        }
        self.shared = Some(shared);
        Ok(())
    }

    /// JSON snapshot of the reactor state, for debugging.
    pub fn status(&self) -> Option<String> {
        let shared = self.shared.as_ref()?;
        let guard = shared.try_borrow().ok()?;
        Some(status_json(&guard.reactor))
    }

    /// Detach every listener and observer. Pending frames and timers become
    /// no-ops.
    pub fn destroy(&mut self) {
        if let Some(shared) = self.shared.take()
            && let Ok(mut guard) = shared.try_borrow_mut()
        {
            let Shared { reactor, host } = &mut *guard;
            reactor.unmount(host);
            for (_, observer) in host.observers.drain(..) {
                observer.disconnect();
            }
        }
        for listener in self.listeners.drain(..) {
            if let Err(err) = listener.target.remove_event_listener_with_callback(
                listener.event,
                listener.callback.as_ref().unchecked_ref(),
            ) {
                warn("vreactor: removeEventListener failed", &err);
            }
        }
        self.observer_callbacks.clear();
    }
}

impl ViewportReactorWeb {
    fn create_observer(&mut self, shared: &SharedRef, watcher: WatcherId) -> Result<(), JsValue> {
        let options = shared.borrow().reactor.watcher(watcher).options();
        let weak = Rc::downgrade(shared);
        let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            dispatch_with(&shared, |host| {
                let entries = entries
                    .iter()
                    .filter_map(|v| v.dyn_into::<IntersectionObserverEntry>().ok())
                    .map(|entry| IntersectionEntry {
                        target: host.intern(entry.target()),
                        is_intersecting: entry.is_intersecting(),
                        ratio: entry.intersection_ratio(),
                    })
                    .collect();
                Some(ReactorEvent::Intersections { watcher, entries })
            });
        }) as Box<dyn FnMut(Array, IntersectionObserver)>);

        let init = IntersectionObserverInit::new();
        init.set_threshold(&JsValue::from_f64(options.threshold));
        init.set_root_margin(&options.root_margin.to_css());
        let observer =
            IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
        shared.borrow_mut().host.observers.push((watcher, observer));
        self.observer_callbacks.push(callback);
        Ok(())
    }

    fn attach(&mut self, shared: &SharedRef, reg: Registration) -> Result<(), JsValue> {
        let Some(target) = shared.borrow().host.listener_target(reg.target)? else {
            return Ok(());
        };
        let weak = Rc::downgrade(shared);
        let callback = Closure::wrap(Box::new(move |event: Event| {
            let Some(shared) = weak.upgrade() else {
                return;
            };
            let disposition = dispatch_with(&shared, |host| translate(&reg, host.sample(&reg, &event)));
            if disposition == Disposition::PreventDefault {
                event.prevent_default();
            }
        }) as Box<dyn FnMut(Event)>);

        let options = AddEventListenerOptions::new();
        options.set_passive(reg.passive);
        target.add_event_listener_with_callback_and_add_event_listener_options(
            reg.event.as_str(),
            callback.as_ref().unchecked_ref(),
            &options,
        )?;
        self.listeners.push(Listener {
            target,
            event: reg.event.as_str(),
            callback,
        });
        Ok(())
    }
}

impl Drop for ViewportReactorWeb {
    fn drop(&mut self) {
        self.destroy();
    }
}
