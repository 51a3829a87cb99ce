#![forbid(unsafe_code)]

//! Structured-logging facade.
//!
//! With the `tracing` cargo feature enabled the engine emits `debug!` and
//! `trace!` events on phase transitions, release resolutions, and
//! dismissals, and this module re-exports the `tracing` macros so embedders
//! can log through the same dependency. Without the feature the module is
//! empty and every logging call site compiles away.

#[cfg(feature = "tracing")]
pub use tracing::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
