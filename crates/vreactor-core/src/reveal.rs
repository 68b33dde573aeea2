#![forbid(unsafe_code)]

//! One-shot reveal of elements as they scroll into view.
//!
//! A [`RevealWatcher`] tracks a set of elements, each with a `visible` flag.
//! When the host's intersection observer reports an element intersecting
//! the (margin-adjusted) viewport, the flag flips to `true` and the element
//! is dropped from observation. The threshold only tells the observer when
//! to call back; an element too tall to ever reach it still reveals on its
//! first intersecting entry.
//!
//! # Invariants
//!
//! 1. `visible` only ever goes `false -> true`; scrolling out never re-hides.
//! 2. Each element is reported as newly revealed at most once.
//! 3. Without observer support every element is revealed at start
//!    (fail-open: content must never stay hidden).

use std::collections::HashMap;

use crate::event::IntersectionEntry;
use crate::geometry::{Insets, Rect, intersection_ratio};
use crate::host::{ElementId, WatcherId};

/// Observer options for one watcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RevealOptions {
    /// `intersectionRatio` at which the host observer calls back, in [0, 1].
    pub threshold: f64,
    /// Root margin applied to the viewport.
    pub root_margin: Insets,
}

impl Default for RevealOptions {
    fn default() -> Self {
        Self {
            threshold: 0.1,
            root_margin: Insets::bottom(-80.0),
        }
    }
}

/// An element under reveal control.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReactorElement {
    pub id: ElementId,
    pub visible: bool,
}

/// How a watcher begins once its elements are known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RevealStart {
    /// Observe these elements.
    Observe(Vec<ElementId>),
    /// Observation unavailable: these were revealed immediately.
    RevealedAll(Vec<ElementId>),
}

#[derive(Debug, Clone)]
pub struct RevealWatcher {
    id: WatcherId,
    options: RevealOptions,
    elements: Vec<ReactorElement>,
    index: HashMap<ElementId, usize>,
}

impl RevealWatcher {
    #[must_use]
    pub fn new(id: WatcherId, options: RevealOptions) -> Self {
        Self {
            id,
            options,
            elements: Vec::new(),
            index: HashMap::new(),
        }
    }

    #[must_use]
    pub fn id(&self) -> WatcherId {
        self.id
    }

    #[must_use]
    pub fn options(&self) -> RevealOptions {
        self.options
    }

    /// Register elements (duplicates are ignored) and decide how to start.
    pub fn start(
        &mut self,
        elements: impl IntoIterator<Item = ElementId>,
        observer_available: bool,
    ) -> RevealStart {
        for id in elements {
            if self.index.contains_key(&id) {
                continue;
            }
            self.index.insert(id, self.elements.len());
            self.elements.push(ReactorElement { id, visible: false });
        }
        if observer_available {
            RevealStart::Observe(self.hidden().collect())
        } else {
            RevealStart::RevealedAll(self.reveal_all())
        }
    }

    /// Apply a batch of observer entries; returns the newly revealed
    /// elements, which the caller must stop observing.
    pub fn on_entries(&mut self, entries: &[IntersectionEntry]) -> Vec<ElementId> {
        let mut revealed = Vec::new();
        for entry in entries {
            if !self.qualifies(entry) {
                continue;
            }
            if self.mark_visible(entry.target) {
                revealed.push(entry.target);
            }
        }
        revealed
    }

    /// Reveal every still-hidden element.
    pub fn reveal_all(&mut self) -> Vec<ElementId> {
        let mut revealed = Vec::new();
        for el in &mut self.elements {
            if !el.visible {
                el.visible = true;
                revealed.push(el.id);
            }
        }
        revealed
    }

    /// Whether an observer entry reveals its target.
    #[must_use]
    pub fn qualifies(&self, entry: &IntersectionEntry) -> bool {
        entry.is_intersecting
    }

    /// Compute observer entries from geometry, the way the browser would for
    /// this watcher's threshold and margin.
    pub fn entries_for(
        &self,
        viewport: &Rect,
        mut rect_of: impl FnMut(ElementId) -> Option<Rect>,
    ) -> Vec<IntersectionEntry> {
        self.hidden()
            .filter_map(|id| {
                let rect = rect_of(id)?;
                let ratio = intersection_ratio(&rect, viewport, self.options.root_margin);
                Some(IntersectionEntry {
                    target: id,
                    is_intersecting: ratio.is_some(),
                    ratio: ratio.unwrap_or(0.0),
                })
            })
            .collect()
    }

    #[must_use]
    pub fn is_visible(&self, id: ElementId) -> bool {
        self.index
            .get(&id)
            .is_some_and(|&i| self.elements[i].visible)
    }

    #[must_use]
    pub fn tracks(&self, id: ElementId) -> bool {
        self.index.contains_key(&id)
    }

    /// Elements not yet revealed, in registration order.
    pub fn hidden(&self) -> impl Iterator<Item = ElementId> + '_ {
        self.elements.iter().filter(|e| !e.visible).map(|e| e.id)
    }

    #[must_use]
    pub fn elements(&self) -> &[ReactorElement] {
        &self.elements
    }

    fn mark_visible(&mut self, id: ElementId) -> bool {
        let Some(&i) = self.index.get(&id) else {
            return false;
        };
        let el = &mut self.elements[i];
        if el.visible {
            return false;
        }
        el.visible = true;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, is_intersecting: bool, ratio: f64) -> IntersectionEntry {
        IntersectionEntry {
            target: ElementId(id),
            is_intersecting,
            ratio,
        }
    }

    fn watcher_with(ids: &[u32]) -> RevealWatcher {
        let mut w = RevealWatcher::new(WatcherId::Reveal, RevealOptions::default());
        let start = w.start(ids.iter().copied().map(ElementId), true);
        assert!(matches!(start, RevealStart::Observe(_)));
        w
    }

    #[test]
    fn intersecting_entry_reveals_once() {
        let mut w = watcher_with(&[1, 2]);
        assert_eq!(w.on_entries(&[entry(1, true, 0.5)]), vec![ElementId(1)]);
        assert!(w.is_visible(ElementId(1)));
        assert!(!w.is_visible(ElementId(2)));
        assert!(w.on_entries(&[entry(1, true, 1.0)]).is_empty());
    }

    #[test]
    fn scrolling_out_never_rehides() {
        let mut w = watcher_with(&[1]);
        w.on_entries(&[entry(1, true, 0.2)]);
        w.on_entries(&[entry(1, false, 0.0)]);
        assert!(w.is_visible(ElementId(1)));
    }

    #[test]
    fn low_ratio_intersection_reveals() {
        let mut w = watcher_with(&[1]);
        assert_eq!(w.on_entries(&[entry(1, true, 0.05)]), vec![ElementId(1)]);
        assert!(w.is_visible(ElementId(1)));
    }

    #[test]
    fn non_intersecting_entry_is_ignored() {
        let mut w = watcher_with(&[1]);
        assert!(w.on_entries(&[entry(1, false, 0.0)]).is_empty());
        assert!(!w.is_visible(ElementId(1)));
    }

    #[test]
    fn element_taller_than_ten_viewports_reveals() {
        let w = watcher_with(&[1]);
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let entries = w.entries_for(&viewport, |_| Some(Rect::new(0.0, 0.0, 1000.0, 12000.0)));
        assert!(entries[0].ratio < w.options().threshold);
        assert!(w.qualifies(&entries[0]));
    }

    #[test]
    fn unknown_targets_are_ignored() {
        let mut w = watcher_with(&[1]);
        assert!(w.on_entries(&[entry(9, true, 1.0)]).is_empty());
        assert!(!w.tracks(ElementId(9)));
    }

    #[test]
    fn missing_observer_fails_open() {
        let mut w = RevealWatcher::new(WatcherId::Stagger, RevealOptions::default());
        let start = w.start([ElementId(3), ElementId(4)], false);
        assert_eq!(
            start,
            RevealStart::RevealedAll(vec![ElementId(3), ElementId(4)])
        );
        assert!(w.hidden().next().is_none());
    }

    #[test]
    fn duplicate_registration_is_ignored() {
        let mut w = RevealWatcher::new(WatcherId::Reveal, RevealOptions::default());
        w.start([ElementId(1), ElementId(1)], true);
        assert_eq!(w.elements().len(), 1);
    }

    #[test]
    fn entries_for_respects_margin() {
        let w = watcher_with(&[1, 2]);
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let entries = w.entries_for(&viewport, |id| match id.0 {
            // Fully inside.
            1 => Some(Rect::new(0.0, 100.0, 100.0, 100.0)),
            // Inside the raw viewport but within the -80px bottom margin.
            _ => Some(Rect::new(0.0, 730.0, 100.0, 60.0)),
        });
        assert_eq!(entries.len(), 2);
        assert!(w.qualifies(&entries[0]));
        assert!(!entries[1].is_intersecting);
    }
}
