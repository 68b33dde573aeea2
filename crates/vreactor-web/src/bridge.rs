#![forbid(unsafe_code)]

//! DOM-free half of the browser adapter.
//!
//! The wasm layer reads whatever a DOM event carries into a [`DomSample`]
//! and lets [`translate`] decide which [`ReactorEvent`] (if any) that
//! listener produces. Keeping the mapping here means the routing table is
//! covered by native tests.

use vreactor_core::geometry::Point;
use vreactor_core::host::{DomEvent, ListenerTarget, ThrottlePolicy, WatcherId};
use vreactor_core::{ReactorConfig, ReactorError, ReactorEvent, Registration, ViewportReactor};

/// Values read from a DOM event (and the window) when it fires.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomSample {
    /// `window.scrollY` at dispatch.
    pub scroll_y: f64,
    /// `clientX`/`clientY` for mouse events.
    pub client: Option<Point>,
    /// `KeyboardEvent.key`.
    pub key: Option<String>,
    /// Click target lies inside the nav panel.
    pub inside_panel: bool,
    /// Click target lies inside the nav toggle.
    pub on_toggle: bool,
    /// `MediaQueryList.matches` after a change.
    pub matches: bool,
}

/// Map one fired listener to a reactor input.
///
/// Returns `None` when the sample lacks what the event needs (a mouse
/// listener fired without coordinates) or the pair is not one the reactor
/// ever registers.
#[must_use]
pub fn translate(reg: &Registration, sample: DomSample) -> Option<ReactorEvent> {
    let event = match (reg.event, reg.target) {
        (DomEvent::Scroll, ListenerTarget::Window) => {
            let ThrottlePolicy::PerFrame(stream) = reg.policy else {
                return None;
            };
            ReactorEvent::Scroll {
                stream,
                scroll_y: sample.scroll_y,
            }
        }
        (DomEvent::MouseMove, ListenerTarget::Document) => ReactorEvent::PointerMove(sample.client?),
        (DomEvent::MouseLeave, ListenerTarget::Document) => ReactorEvent::PointerLeave,
        (DomEvent::MouseMove, ListenerTarget::Hero(hero)) => ReactorEvent::HeroPointerMove {
            hero,
            at: sample.client?,
        },
        (DomEvent::MouseLeave, ListenerTarget::Hero(hero)) => ReactorEvent::HeroPointerLeave { hero },
        (DomEvent::MouseMove, ListenerTarget::Card(card)) => ReactorEvent::CardPointerMove {
            card,
            at: sample.client?,
        },
        (DomEvent::Click, ListenerTarget::NavToggle(_)) => ReactorEvent::NavToggleClick,
        (DomEvent::Click, ListenerTarget::NavLink(link)) => ReactorEvent::NavLinkClick { link },
        (DomEvent::Click, ListenerTarget::Document) => ReactorEvent::DocumentClick {
            inside_panel: sample.inside_panel,
            on_toggle: sample.on_toggle,
        },
        (DomEvent::KeyDown, ListenerTarget::Document) => ReactorEvent::KeyDown { key: sample.key? },
        (DomEvent::Click, ListenerTarget::Anchor(anchor)) => ReactorEvent::AnchorClick { anchor },
        (DomEvent::Click, ListenerTarget::CopyButton(button)) => ReactorEvent::CopyClick { button },
        (DomEvent::Load, ListenerTarget::LazyImage(image)) => ReactorEvent::ImageLoaded { image },
        (DomEvent::Change, ListenerTarget::Media(_)) => ReactorEvent::MotionPreferenceChanged {
            reduced: sample.matches,
        },
        _ => return None,
    };
    Some(event)
}

/// Parse the JS-side options string. Absent or blank means defaults.
pub fn parse_options(json: Option<&str>) -> Result<ReactorConfig, ReactorError> {
    match json.map(str::trim) {
        None | Some("") => Ok(ReactorConfig::default()),
        Some(s) => ReactorConfig::from_json_str(s),
    }
}

/// Diagnostic snapshot exposed to JS as a JSON string.
#[must_use]
pub fn status_json(reactor: &ViewportReactor) -> String {
    let watcher = |id: WatcherId| {
        let w = reactor.watcher(id);
        serde_json::json!({
            "tracked": w.elements().len(),
            "hidden": w.hidden().count(),
        })
    };
    serde_json::json!({
        "mounted": reactor.is_mounted(),
        "navOpen": reactor.nav_state().is_open(),
        "headerScrolled": reactor.header_scrolled(),
        "reducedMotion": reactor.motion_reduced(),
        "reveal": watcher(WatcherId::Reveal),
        "stagger": watcher(WatcherId::Stagger),
    })
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use vreactor_core::ElementId;
    use vreactor_core::host::{FrameStream, MediaQuery};

    #[test]
    fn scroll_carries_its_stream() {
        let reg = Registration::per_frame(
            DomEvent::Scroll,
            ListenerTarget::Window,
            FrameStream::Parallax,
        );
        let sample = DomSample {
            scroll_y: 120.0,
            ..DomSample::default()
        };
        assert_eq!(
            translate(&reg, sample),
            Some(ReactorEvent::Scroll {
                stream: FrameStream::Parallax,
                scroll_y: 120.0
            })
        );
    }

    #[test]
    fn mouse_events_need_coordinates() {
        let reg = Registration::immediate(DomEvent::MouseMove, ListenerTarget::Card(ElementId(3)));
        assert_eq!(translate(&reg, DomSample::default()), None);

        let sample = DomSample {
            client: Some(Point::new(4.0, 5.0)),
            ..DomSample::default()
        };
        assert_eq!(
            translate(&reg, sample),
            Some(ReactorEvent::CardPointerMove {
                card: ElementId(3),
                at: Point::new(4.0, 5.0)
            })
        );
    }

    #[test]
    fn document_click_reports_containment() {
        let reg = Registration::immediate(DomEvent::Click, ListenerTarget::Document);
        let sample = DomSample {
            on_toggle: true,
            ..DomSample::default()
        };
        assert_eq!(
            translate(&reg, sample),
            Some(ReactorEvent::DocumentClick {
                inside_panel: false,
                on_toggle: true
            })
        );
    }

    #[test]
    fn media_change_reads_matches() {
        let reg = Registration::immediate(
            DomEvent::Change,
            ListenerTarget::Media(MediaQuery::ReducedMotion),
        );
        let sample = DomSample {
            matches: true,
            ..DomSample::default()
        };
        assert_eq!(
            translate(&reg, sample),
            Some(ReactorEvent::MotionPreferenceChanged { reduced: true })
        );
    }

    #[test]
    fn unknown_pairs_are_dropped() {
        let reg = Registration::immediate(DomEvent::Load, ListenerTarget::Window);
        assert_eq!(translate(&reg, DomSample::default()), None);
    }

    #[test]
    fn every_mounted_registration_routes() {
        use vreactor_core::geometry::Rect;
        use vreactor_core::testing::FakeHost;

        let mut host = FakeHost::new();
        host.add(".header", Rect::new(0.0, 0.0, 100.0, 10.0));
        host.add(".nav-toggle", Rect::default());
        host.add(".nav", Rect::default());
        host.add(".nav__link", Rect::default());
        host.add(".hero", Rect::default());
        host.add(".card, .panel--interactive", Rect::default());
        let mut reactor = ViewportReactor::new(ReactorConfig::default()).unwrap();
        let sample = DomSample {
            client: Some(Point::new(1.0, 1.0)),
            key: Some("Escape".into()),
            ..DomSample::default()
        };
        for reg in reactor.mount(&mut host) {
            assert!(translate(&reg, sample.clone()).is_some(), "{reg:?}");
        }
    }

    #[test]
    fn blank_options_use_defaults() {
        assert_eq!(parse_options(None).unwrap(), ReactorConfig::default());
        assert_eq!(parse_options(Some("  ")).unwrap(), ReactorConfig::default());
        let cfg = parse_options(Some(r#"{"anchor_header_offset": 80}"#)).unwrap();
        assert_eq!(cfg.anchor_header_offset, 80.0);
        assert!(parse_options(Some("{not json")).is_err());
    }

    #[test]
    fn status_reports_watchers() {
        let mut host = vreactor_core::testing::FakeHost::new();
        host.add(".reveal", vreactor_core::geometry::Rect::new(0.0, 5000.0, 10.0, 10.0));
        let mut reactor = ViewportReactor::new(ReactorConfig::default()).unwrap();
        reactor.mount(&mut host);
        let v: serde_json::Value = serde_json::from_str(&status_json(&reactor)).unwrap();
        assert_eq!(v["mounted"], true);
        assert_eq!(v["reveal"]["tracked"], 1);
        assert_eq!(v["reveal"]["hidden"], 1);
        assert_eq!(v["navOpen"], false);
    }
}
