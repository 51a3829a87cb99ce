#![forbid(unsafe_code)]

//! Damped harmonic oscillator (spring) settling.
//!
//! Provides physically-based motion for the panel's settle transitions.
//! Based on the classical damped spring equation:
//!
//!   acceleration = (−tension × (position − target) − friction × velocity) / mass
//!
//! # Parameters
//!
//! - **tension** (k): restoring force strength. Higher = faster response.
//! - **friction** (c): velocity drag. Higher = less oscillation.
//! - **mass** (m): inertia. The shipped profiles both use 1.0.
//!
//! Two profiles cover every transition the panel makes:
//! [`SpringProfile::gentle`] (120/14/1) for the entrance, visibly slower on
//! a ~300 ms scale, and [`SpringProfile::normal`] (280/30/1) for snap
//! changes, drag releases, and resize re-settles.
//!
//! # Integration
//!
//! Semi-implicit Euler, stepped at ≈1/60 s. `advance()` subdivides larger
//! deltas so a stalled host frame cannot destabilize the simulation.
//!
//! # Invariants
//!
//! 1. The spring is at rest only when `|position − target| < 0.1` and
//!    `|velocity| < 0.1`; reaching rest snaps `position` exactly onto
//!    `target` and zeroes `velocity`.
//! 2. An at-rest spring does not move until something displaces it
//!    (`set_target`, `set_position`) or re-energizes it (`set_velocity`).
//! 3. Retargeting an in-flight spring supersedes the previous run: the
//!    latest target wins, nothing is queued.
//! 4. Profile parameters are clamped on construction (minimum tension and
//!    mass, non-negative friction); a degenerate profile cannot divide by
//!    zero or run away.
//!
//! # Failure Modes
//!
//! - Zero friction: oscillates indefinitely; the rest condition may never
//!   hold. Not clamped away; callers own their profiles.
//! - Non-finite targets or velocities are the caller's bug; the simulation
//!   propagates them. The orchestrator guards its inputs with `is_finite`.

use std::time::Duration;

use super::Animation;

/// Maximum dt per integration step (one 60 Hz display frame). Larger
/// deltas are subdivided for numerical stability.
const FRAME_STEP_SECS: f64 = 1.0 / 60.0;

/// Displacement (percent of viewport height) below which the spring may rest.
const DEFAULT_REST_DISPLACEMENT: f64 = 0.1;

/// Velocity (percent per second) below which the spring may rest.
const DEFAULT_REST_VELOCITY: f64 = 0.1;

/// Minimum tension to prevent degenerate springs.
const MIN_TENSION: f64 = 0.1;

/// Minimum mass to prevent division blow-up.
const MIN_MASS: f64 = 0.001;

/// Oscillator parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpringProfile {
    /// Restoring force coefficient.
    pub tension: f64,
    /// Damping coefficient.
    pub friction: f64,
    /// Simulated mass.
    pub mass: f64,
}

impl SpringProfile {
    /// Create a profile, clamping degenerate parameters.
    #[must_use]
    pub fn new(tension: f64, friction: f64, mass: f64) -> Self {
        Self {
            tension: tension.max(MIN_TENSION),
            friction: friction.max(0.0),
            mass: mass.max(MIN_MASS),
        }
    }

    /// Entrance profile: slow, soft settle on a ~300 ms scale.
    #[must_use]
    pub fn gentle() -> Self {
        Self::new(120.0, 14.0, 1.0)
    }

    /// Default profile for snap changes, drag releases, and resize
    /// re-settles.
    #[must_use]
    pub fn normal() -> Self {
        Self::new(280.0, 30.0, 1.0)
    }
}

impl Default for SpringProfile {
    fn default() -> Self {
        Self::normal()
    }
}

/// A damped harmonic oscillator over the panel position.
///
/// Position and target are in percent of viewport height; velocity is in
/// percent per second. The state persists across drag sessions: a drag
/// writes the position directly through [`set_position`](Spring::set_position)
/// while the simulation is suspended, and a release seeds
/// [`set_velocity`](Spring::set_velocity) so a flick carries into the settle.
#[derive(Debug, Clone)]
pub struct Spring {
    position: f64,
    velocity: f64,
    target: f64,
    initial: f64,
    profile: SpringProfile,
    rest_displacement: f64,
    rest_velocity: f64,
    at_rest: bool,
}

impl Spring {
    /// Create a spring starting at `initial` and targeting `target`, with
    /// the [`SpringProfile::normal`] profile.
    #[must_use]
    pub fn new(initial: f64, target: f64) -> Self {
        Self {
            position: initial,
            velocity: 0.0,
            target,
            initial,
            profile: SpringProfile::normal(),
            rest_displacement: DEFAULT_REST_DISPLACEMENT,
            rest_velocity: DEFAULT_REST_VELOCITY,
            at_rest: false,
        }
    }

    /// Create a spring already at rest at `position`.
    #[must_use]
    pub fn resting(position: f64) -> Self {
        let mut spring = Self::new(position, position);
        spring.at_rest = true;
        spring
    }

    /// Set the parameter profile (builder pattern).
    #[must_use]
    pub fn with_profile(mut self, profile: SpringProfile) -> Self {
        self.profile = profile;
        self
    }

    /// Set the displacement rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_displacement(mut self, threshold: f64) -> Self {
        self.rest_displacement = threshold.abs();
        self
    }

    /// Set the velocity rest threshold (builder pattern).
    #[must_use]
    pub fn with_rest_velocity(mut self, threshold: f64) -> Self {
        self.rest_velocity = threshold.abs();
        self
    }

    /// Current position (percent of viewport height).
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Current velocity (percent per second).
    #[inline]
    #[must_use]
    pub fn velocity(&self) -> f64 {
        self.velocity
    }

    /// Current target.
    #[inline]
    #[must_use]
    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current parameter profile.
    #[inline]
    #[must_use]
    pub fn profile(&self) -> SpringProfile {
        self.profile
    }

    /// Whether the spring has settled on its target.
    #[inline]
    #[must_use]
    pub fn is_at_rest(&self) -> bool {
        self.at_rest
    }

    /// Swap the parameter profile for subsequent steps.
    pub fn set_profile(&mut self, profile: SpringProfile) {
        self.profile = profile;
    }

    /// Retarget the spring. Wakes it when the new target leaves the spring
    /// displaced beyond the rest threshold.
    pub fn set_target(&mut self, target: f64) {
        self.target = target;
        if (self.position - self.target).abs() > self.rest_displacement {
            self.at_rest = false;
        }
    }

    /// Overwrite the velocity (release flick seeding). Wakes the spring
    /// when the seed exceeds the rest threshold.
    pub fn set_velocity(&mut self, velocity: f64) {
        self.velocity = velocity;
        if velocity.abs() > self.rest_velocity {
            self.at_rest = false;
        }
    }

    /// Move the position without running the simulation. Used by the drag
    /// authority while the spring is suspended; velocity is preserved.
    pub fn set_position(&mut self, position: f64) {
        self.position = position;
        if (self.position - self.target).abs() > self.rest_displacement {
            self.at_rest = false;
        }
    }

    /// Jump to `position` at rest, discarding velocity and target.
    pub fn snap_to(&mut self, position: f64) {
        self.position = position;
        self.target = position;
        self.velocity = 0.0;
        self.at_rest = true;
    }

    /// Perform a single integration step of `dt` seconds.
    fn step(&mut self, dt: f64) {
        // Semi-implicit Euler:
        // 1. Compute acceleration from the current position.
        // 2. Update velocity.
        // 3. Update position from the new velocity.
        let displacement = self.position - self.target;
        let spring_force = -self.profile.tension * displacement;
        let damping_force = -self.profile.friction * self.velocity;
        let acceleration = (spring_force + damping_force) / self.profile.mass;

        self.velocity += acceleration * dt;
        self.position += self.velocity * dt;
    }

    /// Advance the spring by `dt`, subdividing if necessary for stability.
    pub fn advance(&mut self, dt: Duration) {
        if self.at_rest {
            return;
        }

        let total_secs = dt.as_secs_f64();
        if total_secs <= 0.0 {
            return;
        }

        let mut remaining = total_secs;
        while remaining > 0.0 {
            let step_dt = remaining.min(FRAME_STEP_SECS);
            self.step(step_dt);
            remaining -= step_dt;
        }

        // Rest check: snap exactly onto the target so the panel never
        // asymptotes forever a fraction of a percent away.
        let displacement = (self.position - self.target).abs();
        if displacement < self.rest_displacement && self.velocity.abs() < self.rest_velocity {
            self.position = self.target;
            self.velocity = 0.0;
            self.at_rest = true;
        }
    }
}

impl Animation for Spring {
    fn tick(&mut self, dt: Duration) {
        self.advance(dt);
    }

    fn is_complete(&self) -> bool {
        self.at_rest
    }

    fn value(&self) -> f64 {
        self.position
    }

    fn reset(&mut self) {
        self.position = self.initial;
        self.velocity = 0.0;
        self.at_rest = false;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
