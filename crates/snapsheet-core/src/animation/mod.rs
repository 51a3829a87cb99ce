#![forbid(unsafe_code)]

//! Frame-driven animation primitives.
//!
//! [`Animation`] is the minimal contract the orchestrator needs from a
//! motion source: advance by a time delta, report completion, expose a
//! scalar value. The engine ships one implementation, the damped
//! [`spring::Spring`]; the trait keeps the settle loop testable with
//! scripted stand-ins.

use std::time::Duration;

pub mod spring;

pub use spring::{Spring, SpringProfile};

/// A time-driven scalar animation.
pub trait Animation {
    /// Advance the animation by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has finished.
    fn is_complete(&self) -> bool;

    /// Current scalar value.
    fn value(&self) -> f64;

    /// Return to the initial state.
    fn reset(&mut self);
}
