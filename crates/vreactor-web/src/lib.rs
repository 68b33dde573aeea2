#![forbid(unsafe_code)]

//! Browser adapter for `vreactor-core`.
//!
//! The wasm build exports `ViewportReactorWeb`, which implements the core
//! `Host` over `web_sys`, attaches the listeners the reactor asks for and
//! schedules its frame callbacks, timers, observers and clipboard writes.
//!
//! Everything that does not touch the DOM lives in [`bridge`] so it can be
//! tested natively.

pub mod bridge;

#[cfg(target_arch = "wasm32")]
mod wasm;

#[cfg(target_arch = "wasm32")]
pub use wasm::ViewportReactorWeb;

/// Native builds compile this crate as a stub so `cargo check --workspace` stays
/// green on non-wasm targets.
#[cfg(not(target_arch = "wasm32"))]
#[derive(Debug, Default)]
pub struct ViewportReactorWeb;

#[cfg(not(target_arch = "wasm32"))]
impl ViewportReactorWeb {
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self
    }
}
