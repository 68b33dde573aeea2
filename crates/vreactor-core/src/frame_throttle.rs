#![forbid(unsafe_code)]

//! Per-frame throttling for high-frequency host events.
//!
//! Browsers deliver `scroll` and `mousemove` far more often than the page
//! repaints. [`FrameThrottle`] coalesces them so a handler runs at most once
//! per animation frame:
//!
//! - [`push`](FrameThrottle::push) records the latest sample and reports
//!   whether the caller must schedule a frame callback. Only the first push
//!   after an idle period does; later pushes just overwrite the sample.
//! - [`fire`](FrameThrottle::fire) is called from the frame callback. It
//!   clears the in-flight flag *before* handing back the sample, so an event
//!   arriving during the handler schedules the next frame.
//!
//! # Design
//!
//! "Latest wins" (trailing edge): intermediate samples between two frames
//! are discarded, never queued. Every push is represented by exactly one
//! later `fire` that observes a sample at least as new as it.
//!
//! ```
//! use vreactor_core::frame_throttle::FrameThrottle;
//!
//! let mut throttle = FrameThrottle::new();
//! assert!(throttle.push(10.0));   // schedule a frame
//! assert!(!throttle.push(20.0));  // already in flight
//! assert!(!throttle.push(30.0));
//! assert_eq!(throttle.fire(), Some(30.0));
//! assert_eq!(throttle.fire(), None); // spurious callback
//! ```

/// Coalesces samples into at most one delivery per frame.
///
/// Not thread-safe; intended for the host's single event loop.
#[derive(Debug, Clone)]
pub struct FrameThrottle<T> {
    /// Latest sample observed since the last fire.
    pending: Option<T>,
    /// A frame callback has been requested and has not yet run.
    in_flight: bool,
    /// Diagnostic: pushes absorbed into an already scheduled frame.
    coalesced: u64,
    /// Diagnostic: frames delivered.
    fired: u64,
}

impl<T> Default for FrameThrottle<T> {
    fn default() -> Self {
        Self {
            pending: None,
            in_flight: false,
            coalesced: 0,
            fired: 0,
        }
    }
}

impl<T> FrameThrottle<T> {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a sample.
    ///
    /// Returns `true` when the caller must request a frame callback.
    pub fn push(&mut self, sample: T) -> bool {
        self.pending = Some(sample);
        if self.in_flight {
            self.coalesced = self.coalesced.saturating_add(1);
            return false;
        }
        self.in_flight = true;
        true
    }

    /// Run from the frame callback: clears the in-flight flag and yields
    /// the latest sample, if any.
    pub fn fire(&mut self) -> Option<T> {
        self.in_flight = false;
        let sample = self.pending.take();
        if sample.is_some() {
            self.fired = self.fired.saturating_add(1);
        }
        sample
    }

    /// Whether a frame callback is outstanding.
    #[must_use]
    pub fn in_flight(&self) -> bool {
        self.in_flight
    }

    /// Drop the pending sample but keep the outstanding frame, which will
    /// then fire empty.
    pub fn discard_pending(&mut self) {
        self.pending = None;
    }

    /// Drop any pending sample and forget the outstanding frame.
    ///
    /// Use when the handler is being torn down.
    pub fn clear(&mut self) {
        self.pending = None;
        self.in_flight = false;
    }

    /// Pushes absorbed without scheduling.
    #[must_use]
    pub fn coalesced_count(&self) -> u64 {
        self.coalesced
    }

    /// Frames that delivered a sample.
    #[must_use]
    pub fn fired_count(&self) -> u64 {
        self.fired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_throttle_is_idle() {
        let throttle: FrameThrottle<u32> = FrameThrottle::new();
        assert!(!throttle.in_flight());
        assert_eq!(throttle.coalesced_count(), 0);
    }

    #[test]
    fn first_push_schedules_later_pushes_coalesce() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.push(1));
        assert!(throttle.in_flight());
        assert!(!throttle.push(2));
        assert!(!throttle.push(3));
        assert_eq!(throttle.coalesced_count(), 2);
        assert_eq!(throttle.fire(), Some(3));
        assert!(!throttle.in_flight());
    }

    #[test]
    fn push_after_fire_schedules_again() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.push(1));
        assert_eq!(throttle.fire(), Some(1));
        assert!(throttle.push(2));
        assert_eq!(throttle.fire(), Some(2));
        assert_eq!(throttle.fired_count(), 2);
    }

    #[test]
    fn fire_without_push_is_harmless() {
        let mut throttle: FrameThrottle<u8> = FrameThrottle::new();
        assert_eq!(throttle.fire(), None);
        assert_eq!(throttle.fired_count(), 0);
    }

    #[test]
    fn discard_keeps_frame_in_flight() {
        let mut throttle = FrameThrottle::new();
        assert!(throttle.push(1));
        throttle.discard_pending();
        assert!(!throttle.push(2));
        throttle.discard_pending();
        assert_eq!(throttle.fire(), None);
        assert!(throttle.push(3));
    }

    #[test]
    fn clear_drops_pending_and_flag() {
        let mut throttle = FrameThrottle::new();
        throttle.push("a");
        throttle.clear();
        assert!(!throttle.in_flight());
        assert_eq!(throttle.fire(), None);
        assert!(throttle.push("b"));
    }
}
