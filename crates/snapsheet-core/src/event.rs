#![forbid(unsafe_code)]

//! Canonical host-input events.
//!
//! The engine is headless: the embedding host (browser shim, native shell,
//! test harness) translates its own input stream into these types and feeds
//! them to the sheet. All events derive `Clone` and `PartialEq` for use in
//! tests and pattern matching.
//!
//! # Design Notes
//!
//! - Coordinates are f64 client pixels, origin at the top-left, y growing
//!   downward.
//! - Pointer events carry their full touch-point list. `Down` and `Move`
//!   with an empty list are degenerate inputs the engine ignores without
//!   mutating any state; `Up` and `Cancel` legitimately arrive with no
//!   remaining touches.

use smallvec::{SmallVec, smallvec};

/// A single contact point in client-pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TouchPoint {
    /// Horizontal client coordinate.
    pub x: f64,
    /// Vertical client coordinate (grows downward).
    pub y: f64,
}

impl TouchPoint {
    /// Create a touch point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Touch-point list storage. Two inline slots cover every single-finger
/// gesture without allocating.
pub type TouchList = SmallVec<[TouchPoint; 2]>;

/// Which part of a pointer interaction an event reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerPhase {
    /// A contact began.
    Down,
    /// An existing contact moved.
    Move,
    /// The contact lifted normally.
    Up,
    /// The contact was interrupted by the host (e.g. a system gesture).
    Cancel,
}

/// A pointer event with its touch points.
#[derive(Debug, Clone, PartialEq)]
pub struct PointerEvent {
    /// The interaction phase this event reports.
    pub phase: PointerPhase,
    /// Touch points at the time of the event.
    pub touches: TouchList,
}

impl PointerEvent {
    /// A single-touch pointer-down at the given coordinates.
    #[must_use]
    pub fn down(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Down,
            touches: smallvec![TouchPoint::new(x, y)],
        }
    }

    /// A single-touch pointer-move to the given coordinates.
    #[must_use]
    pub fn moved(x: f64, y: f64) -> Self {
        Self {
            phase: PointerPhase::Move,
            touches: smallvec![TouchPoint::new(x, y)],
        }
    }

    /// A pointer-up with no remaining touches.
    #[must_use]
    pub fn up() -> Self {
        Self {
            phase: PointerPhase::Up,
            touches: SmallVec::new(),
        }
    }

    /// A host-initiated pointer cancellation.
    #[must_use]
    pub fn cancel() -> Self {
        Self {
            phase: PointerPhase::Cancel,
            touches: SmallVec::new(),
        }
    }

    /// The primary (first) touch point, if any.
    #[must_use]
    pub fn primary(&self) -> Option<TouchPoint> {
        self.touches.first().copied()
    }
}

/// Canonical input event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A pointer interaction.
    Pointer(PointerEvent),

    /// The viewport was resized.
    Resize {
        /// New viewport width in client pixels.
        width: f64,
        /// New viewport height in client pixels.
        height: f64,
    },
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
