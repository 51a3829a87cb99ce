#![forbid(unsafe_code)]

//! Core: gesture tracking, spring settling, and the bottom-sheet phase machine.
//!
//! # Role in snapsheet
//! `snapsheet-core` is the whole engine. It converts a host-supplied stream
//! of pointer and resize events plus a per-frame tick into a single numeric
//! panel position (percent of viewport height) and a lifecycle phase.
//!
//! # Primary responsibilities
//! - **Event**: canonical host-input events (pointer touches, resize).
//! - **Geometry**: viewport size classes and the snap-point tables derived
//!   from them.
//! - **Spring**: damped harmonic oscillator that settles the panel onto a
//!   snap point, inheriting flick velocity from a released drag.
//! - **Gesture**: drag-session tracking, axis-lock classification, overdrag
//!   clamping, and release resolution.
//! - **BottomSheet**: the orchestrator tying the above together. At any
//!   instant exactly one authority (gesture or spring) writes the position.
//!
//! # How it fits in the system
//! The embedding host owns the actual surface (DOM, terminal, native view).
//! It reports events via [`sheet::BottomSheet::handle_event`], advances time
//! via [`sheet::BottomSheet::tick`], flips the open intent, and reads back
//! `position()`/`phase()` each frame to place the panel. The engine never
//! blocks, never reads a clock, and holds no handles to the host.

pub mod animation;
pub mod event;
pub mod geometry;
pub mod gesture;
pub mod logging;
pub mod sheet;

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{
    debug, debug_span, error, error_span, info, info_span, trace, trace_span, warn, warn_span,
};
