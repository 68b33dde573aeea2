#![forbid(unsafe_code)]

//! Core: host-independent state for a page's viewport-driven presentation.
//!
//! Every behavior here is a pure state transition plus a batch of writes
//! against a [`host::Host`]. The browser adapter lives in `vreactor-web`;
//! tests drive the same code through [`testing::FakeHost`].

pub mod anchor;
pub mod clipboard;
pub mod config;
pub mod cursor_glow;
pub mod error;
pub mod event;
pub mod frame_throttle;
pub mod geometry;
pub mod host;
pub mod lazy_image;
pub mod links;
pub mod logging;
pub mod motion;
pub mod nav;
pub mod reactor;
pub mod reveal;
pub mod scroll_effects;
pub mod transform;

#[cfg(any(test, feature = "test-helpers"))]
pub mod testing;

pub use config::ReactorConfig;
pub use error::ReactorError;
pub use event::{Disposition, ReactorEvent};
pub use host::{Capabilities, ElementId, Host, Registration};
pub use reactor::ViewportReactor;

#[cfg(feature = "tracing")]
pub use logging::{debug, info, warn};
