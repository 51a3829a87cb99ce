#![forbid(unsafe_code)]

//! Drag-session tracking and release resolution.
//!
//! [`DragTracker`] owns the ephemeral drag session: it exists only between
//! a pointer-down and the matching up/cancel, and every coordinate the
//! session needs lives inside it, with no shared mutable cells between
//! callbacks. The tracker converts motion into a clamped live position for
//! the orchestrator to write, and converts a release into a
//! [`ReleaseOutcome`] naming the snap point to settle on.
//!
//! # Classification
//!
//! A drag is *vertical* when `|dy| > |dx| × 0.5` or `|dy| > 20 px`. The
//! absolute tie-break favors vertical intent once movement exceeds a small
//! distance even when not strictly dominant, so a slow diagonal start does
//! not stick as "unclassified". Horizontal drags are fully absorbed: they
//! never move the panel and release back to the starting snap point.
//!
//! # Invariants
//!
//! 1. At most one session exists; a new pointer-down replaces any stale one.
//! 2. `release`/`cancel` are idempotent: without a session they are silent
//!    no-ops (duplicate `touchend` + synthetic mouse events are common).
//! 3. Motion output is clamped to the overdrag window
//!    `[−overdrag, full + overdrag]`.
//! 4. A release transitions at most one snap point per gesture, in the drag
//!    direction, saturating at the extremes.
//!
//! # Failure Modes
//!
//! - Zero-height viewport: drag percentages become non-finite and the
//!   gesture is treated as "not a valid vertical drag" (re-settle in
//!   place). Nothing panics.
//! - A cancelled session ignores its deltas entirely: the gesture was
//!   interrupted, not released, so it re-settles in place with no velocity.

use std::time::Duration;

use crate::geometry::{SnapPoint, SnapTable, Viewport};

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Thresholds for drag classification and release resolution.
#[derive(Debug, Clone)]
pub struct GestureConfig {
    /// Horizontal-dominance factor: vertical when `|dy| > |dx| × ratio`.
    pub vertical_ratio: f64,
    /// Absolute vertical distance (px) past which a drag is vertical
    /// regardless of `|dx|`.
    pub vertical_slop: f64,
    /// Displacement (percent of viewport height) required to step to the
    /// adjacent snap point on release.
    pub transition_threshold: f64,
    /// Permitted excursion (percent) beyond the outermost snap values while
    /// dragging, conveying elastic resistance.
    pub overdrag: f64,
    /// Assumed frame duration for the release-velocity estimate.
    pub frame_estimate: Duration,
}

impl Default for GestureConfig {
    fn default() -> Self {
        Self {
            vertical_ratio: 0.5,
            vertical_slop: 20.0,
            transition_threshold: 25.0,
            overdrag: 15.0,
            frame_estimate: Duration::from_micros(16_667),
        }
    }
}

// ---------------------------------------------------------------------------
// Session state
// ---------------------------------------------------------------------------

/// An active drag, from pointer-down to the matching up/cancel.
#[derive(Debug, Clone, Copy)]
struct DragSession {
    start_x: f64,
    start_y: f64,
    last_x: f64,
    last_y: f64,
    /// Vertical delta of the most recent move, for the release-velocity
    /// estimate (final-frame approximation).
    last_step_dy: f64,
    /// Live panel position when the session began.
    origin_position: f64,
    /// Logical snap point active when the session began.
    origin_snap: SnapPoint,
}

impl DragSession {
    fn deltas(&self) -> (f64, f64) {
        (self.last_x - self.start_x, self.last_y - self.start_y)
    }
}

/// What a finished drag asks the orchestrator to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReleaseOutcome {
    /// Animate to `target`, seeding the spring with `velocity`
    /// (percent per second).
    Settle {
        /// Snap point to settle on.
        target: SnapPoint,
        /// Seed velocity carried into the settle.
        velocity: f64,
    },
    /// The drag resolved past `Closed`; route through the dismissal
    /// lifecycle instead of settling on a numeric rest.
    Dismiss {
        /// Seed velocity carried into the exit settle.
        velocity: f64,
    },
}

// ---------------------------------------------------------------------------
// DragTracker
// ---------------------------------------------------------------------------

/// Converts pointer coordinates into live positions and release decisions.
#[derive(Debug, Clone)]
pub struct DragTracker {
    config: GestureConfig,
    session: Option<DragSession>,
}

impl Default for DragTracker {
    fn default() -> Self {
        Self::new(GestureConfig::default())
    }
}

impl DragTracker {
    /// Create a tracker with the given thresholds.
    #[must_use]
    pub fn new(config: GestureConfig) -> Self {
        Self {
            config,
            session: None,
        }
    }

    /// Whether a drag session is in progress.
    #[inline]
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// The snap point active when the current session began.
    #[must_use]
    pub fn origin_snap(&self) -> Option<SnapPoint> {
        self.session.map(|s| s.origin_snap)
    }

    /// Get a reference to the current configuration.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &GestureConfig {
        &self.config
    }

    /// Begin a session at `(x, y)` with the panel at `position` on
    /// `snap`. A session already in progress is replaced.
    pub fn begin(&mut self, x: f64, y: f64, position: f64, snap: SnapPoint) {
        self.session = Some(DragSession {
            start_x: x,
            start_y: y,
            last_x: x,
            last_y: y,
            last_step_dy: 0.0,
            origin_position: position,
            origin_snap: snap,
        });
    }

    /// Record motion to `(x, y)`. Returns the new live position when the
    /// session classifies as vertical, `None` otherwise; a horizontal
    /// drag must never move the panel.
    pub fn motion(&mut self, x: f64, y: f64, viewport: &Viewport, table: &SnapTable) -> Option<f64> {
        let session = self.session.as_mut()?;
        session.last_step_dy = y - session.last_y;
        session.last_x = x;
        session.last_y = y;

        let (dx, dy) = session.deltas();
        if !self.config.is_vertical(dx, dy) {
            return None;
        }

        let delta_percent = dy / viewport.height * 100.0;
        if !delta_percent.is_finite() {
            return None;
        }

        let raw = session.origin_position - delta_percent;
        Some(raw.clamp(-self.config.overdrag, table.full + self.config.overdrag))
    }

    /// End the session and resolve its outcome. Idempotent: without an
    /// active session this is a silent no-op.
    pub fn release(&mut self, viewport: &Viewport) -> Option<ReleaseOutcome> {
        let session = self.session.take()?;

        let (dx, dy) = session.deltas();
        let drag_percent = dy / viewport.height * 100.0;

        // Invalid vertical drags are fully absorbed: back to where the
        // gesture started, no injected velocity.
        if !self.config.is_vertical(dx, dy) || !drag_percent.is_finite() {
            return Some(ReleaseOutcome::Settle {
                target: session.origin_snap,
                velocity: 0.0,
            });
        }

        // Final-frame velocity estimate over an assumed constant frame
        // time; negated because screen y grows downward while the panel
        // position grows upward.
        let step_percent = session.last_step_dy / viewport.height * 100.0;
        let mut velocity = -step_percent / self.config.frame_estimate.as_secs_f64();
        if !velocity.is_finite() {
            velocity = 0.0;
        }

        let target = if drag_percent.abs() > self.config.transition_threshold {
            if drag_percent > 0.0 {
                session.origin_snap.step_down()
            } else {
                session.origin_snap.step_up()
            }
        } else {
            session.origin_snap
        };

        if target == SnapPoint::Closed && session.origin_snap != SnapPoint::Closed {
            Some(ReleaseOutcome::Dismiss { velocity })
        } else {
            Some(ReleaseOutcome::Settle { target, velocity })
        }
    }

    /// Abort the session (`touchcancel`): re-settle in place regardless of
    /// deltas, with no injected velocity. Idempotent.
    pub fn cancel(&mut self) -> Option<ReleaseOutcome> {
        let session = self.session.take()?;
        Some(ReleaseOutcome::Settle {
            target: session.origin_snap,
            velocity: 0.0,
        })
    }
}

impl GestureConfig {
    /// The axis-lock classification shared by motion and release.
    #[must_use]
    pub fn is_vertical(&self, dx: f64, dy: f64) -> bool {
        dy.abs() > dx.abs() * self.vertical_ratio || dy.abs() > self.vertical_slop
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
