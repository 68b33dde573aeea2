//! Property-based invariant tests for the viewport reactor.
//!
//! Verifies:
//! 1. Reveal monotonicity: once visible, an element stays visible for any
//!    later sequence of observer batches.
//! 2. Reveal qualification: an element turns visible only on an entry that
//!    reports it intersecting, whatever the ratio.
//! 3. Nav alternation: after n toggles the panel is open iff n is odd.
//! 4. Header positionality: the scrolled flag after any scroll path depends
//!    only on the final offset.
//! 5. Frame throttle: at most one delivery per frame, carrying the latest sample.
//! 6. Parallax bounds: scale stays within [1, max_scale] and the offset is
//!    proportional to scroll.
//! 7. Tilt bounds: rotation never exceeds half the factor inside the region.
//! 8. Reactor determinism: the same scroll path yields the same writes.

use proptest::prelude::*;
use vreactor_core::event::IntersectionEntry;
use vreactor_core::frame_throttle::FrameThrottle;
use vreactor_core::geometry::{Point, Rect};
use vreactor_core::host::WatcherId;
use vreactor_core::nav::{NavController, NavState};
use vreactor_core::reveal::{RevealOptions, RevealWatcher};
use vreactor_core::scroll_effects::{HeaderState, ParallaxContainer, ParallaxParams};
use vreactor_core::testing::FakeHost;
use vreactor_core::transform::Tilt;
use vreactor_core::{ElementId, ReactorConfig, ViewportReactor};

// ── Strategy helpers ──────────────────────────────────────────────────

const ELEMENTS: u32 = 8;

fn arb_entry() -> impl Strategy<Value = IntersectionEntry> {
    (0..ELEMENTS, any::<bool>(), 0.0f64..=1.0).prop_map(|(id, is_intersecting, ratio)| {
        IntersectionEntry {
            target: ElementId(id),
            is_intersecting,
            ratio,
        }
    })
}

fn arb_batches() -> impl Strategy<Value = Vec<Vec<IntersectionEntry>>> {
    prop::collection::vec(prop::collection::vec(arb_entry(), 0..6), 0..12)
}

fn arb_scroll_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(0.0f64..3000.0, 1..24)
}

fn watcher() -> RevealWatcher {
    let mut w = RevealWatcher::new(WatcherId::Reveal, RevealOptions::default());
    w.start((0..ELEMENTS).map(ElementId), true);
    w
}

proptest! {
    // 1
    #[test]
    fn reveal_is_monotonic(batches in arb_batches()) {
        let mut w = watcher();
        let mut seen = Vec::new();
        for batch in &batches {
            w.on_entries(batch);
            for id in (0..ELEMENTS).map(ElementId) {
                if seen.contains(&id) {
                    prop_assert!(w.is_visible(id), "{id:?} reverted to hidden");
                } else if w.is_visible(id) {
                    seen.push(id);
                }
            }
        }
    }

    // 2
    #[test]
    fn reveal_requires_qualifying_entry(batches in arb_batches()) {
        let mut w = watcher();
        for batch in &batches {
            let was_hidden: Vec<ElementId> = w.hidden().collect();
            let newly = w.on_entries(batch);
            for id in &newly {
                prop_assert!(batch.iter().any(|e| e.target == *id && e.is_intersecting));
            }
            for id in was_hidden {
                if batch.iter().any(|e| e.target == id && e.is_intersecting) {
                    prop_assert!(newly.contains(&id), "{id:?} intersected but stayed hidden");
                }
            }
        }
    }

    // 3
    #[test]
    fn nav_toggle_alternates(n in 0usize..40) {
        let mut nav = NavController::new();
        for _ in 0..n {
            nav.toggle();
        }
        let expected = if n % 2 == 1 { NavState::Open } else { NavState::Closed };
        prop_assert_eq!(nav.state(), expected);
    }

    // 4
    #[test]
    fn header_state_is_positional(path in arb_scroll_path(), threshold in 0.0f64..200.0) {
        let mut header = HeaderState::new(threshold);
        for &y in &path {
            header.update(y);
        }
        let last = *path.last().unwrap();
        prop_assert_eq!(header.scrolled(), last >= threshold);
    }

    // 5
    #[test]
    fn throttle_delivers_latest_once_per_frame(
        frames in prop::collection::vec(prop::collection::vec(0u32..1000, 0..10), 1..10)
    ) {
        let mut throttle = FrameThrottle::new();
        for samples in &frames {
            let requests = samples.iter().filter(|&&s| throttle.push(s)).count();
            prop_assert!(requests <= 1);
            let delivered = throttle.fire();
            prop_assert_eq!(delivered, samples.last().copied());
            prop_assert_eq!(throttle.fire(), None);
        }
    }

    // 6
    #[test]
    fn parallax_stays_within_bounds(
        scroll_y in -500.0f64..5000.0,
        viewport_height in 1.0f64..2000.0,
        top in 0.0f64..500.0,
        height in 1.0f64..3000.0,
    ) {
        let params = ParallaxParams::default();
        let container = ParallaxContainer { top, height };
        if let Some(frame) = params.frame(scroll_y, viewport_height, container) {
            prop_assert!(frame.scale >= 1.0);
            prop_assert!(frame.scale <= params.max_scale);
            let y = scroll_y.max(0.0);
            prop_assert!((frame.translate_y - y * params.factor).abs() < 1e-9);
        } else {
            prop_assert!(scroll_y.max(0.0) >= top + height);
        }
    }

    // 7
    #[test]
    fn tilt_is_bounded_inside_region(
        w in 1.0f64..2000.0,
        h in 1.0f64..2000.0,
        fx in 0.0f64..=1.0,
        fy in 0.0f64..=1.0,
        factor in 0.0f64..20.0,
    ) {
        let region = Rect::new(10.0, 20.0, w, h);
        let at = Point::new(10.0 + fx * w, 20.0 + fy * h);
        let tilt = Tilt::from_pointer(&region, at, factor).unwrap();
        prop_assert!(tilt.rotate_x.abs() <= factor / 2.0 + 1e-9);
        prop_assert!(tilt.rotate_y.abs() <= factor / 2.0 + 1e-9);
    }

    // 8
    #[test]
    fn reactor_is_deterministic(path in arb_scroll_path()) {
        let run = |path: &[f64]| {
            let mut host = FakeHost::new();
            host.add(".header", Rect::new(0.0, 0.0, 1280.0, 64.0));
            let hero = host.add(".hero", Rect::new(0.0, 0.0, 1280.0, 900.0));
            let img = host.add(".hero__artwork img", Rect::new(0.0, 100.0, 400.0, 400.0));
            host.set_parent(img, hero);
            host.add(".reveal", Rect::new(0.0, 1500.0, 400.0, 200.0));
            let mut reactor = ViewportReactor::new(ReactorConfig::default()).unwrap();
            reactor.mount(&mut host);
            for &y in path {
                host.scroll_to_y(&mut reactor, y);
            }
            host.writes().to_vec()
        };
        prop_assert_eq!(run(&path), run(&path));
    }
}
