#![forbid(unsafe_code)]

//! Reactor log events.
//!
//! The reactor logs at three levels: `info` for mount and unmount, `debug`
//! for per-event decisions and `warn` for degraded paths such as a missing
//! observer. Call sites use `crate::info!` and friends; with the `tracing`
//! feature these are the `tracing` macros, and without it they expand to
//! nothing so the default wasm build carries no logging code.
//!
//! Failures a page owner needs to see in the browser go through
//! [`Host::diagnostic`](crate::Host::diagnostic) instead, which works with
//! or without this feature.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
mod disabled {
    #[macro_export]
    macro_rules! debug {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! info {
        ($($arg:tt)*) => {};
    }

    #[macro_export]
    macro_rules! warn {
        ($($arg:tt)*) => {};
    }
}

/// Default filter when `RUST_LOG` is unset: reactor events at `info`,
/// everything else at `warn`.
#[cfg(feature = "tracing-json")]
pub const DEFAULT_FILTER: &str = "warn,vreactor_core=info";

/// Install a global JSON subscriber for native runs (scenario replays,
/// harness binaries). Returns `false` if one was already installed.
#[cfg(feature = "tracing-json")]
pub fn init_json_subscriber() -> bool {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_target(true)
        .try_init()
        .is_ok()
}
