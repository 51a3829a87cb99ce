#![forbid(unsafe_code)]

//! Position orchestrator: the sheet's phase machine.
//!
//! [`BottomSheet`] ties the gesture tracker, the spring, and the snap
//! tables together. At every instant exactly one authority, tagged by
//! [`PositionDriver`], writes the panel position: the spring during
//! entrance/settle/exit, the drag session while a finger is down. The tag
//! is switched explicitly on each phase transition; the two authorities
//! never race.
//!
//! # State Machine
//!
//! ```text
//! Hidden → Opening → Open(snap) ⇄ Dragging → Settling(snap) → Open(snap)
//!                    Open(any) → Closing → Hidden
//! ```
//!
//! # Invariants
//!
//! 1. The spring is never ticked while a drag session is active; it
//!    resumes authority the instant the release hands off a target.
//! 2. `on_dismiss` fires exactly once per user-initiated close and never
//!    for an externally driven `open_intent = false`. Overlapping dismiss
//!    paths in the same tick are no-ops after the first.
//! 3. The gentle entrance profile is consumed once per open session:
//!    cleared when the first settle completes or when any normal-profile
//!    animation supersedes it.
//! 4. Flipping the open intent back on during the close delay cancels the
//!    pending hide and re-enters `Opening`; the panel never hides while
//!    freshly reopened.
//!
//! # Failure Modes
//!
//! - Pointer-down with an empty touch list: ignored, no session starts.
//! - Release/cancel without a session: silent no-op.
//! - Resize while hidden: table refresh only, no transition.

use std::fmt;
use std::time::Duration;

use crate::animation::Animation;
use crate::animation::spring::{Spring, SpringProfile};
use crate::event::{Event, PointerEvent, PointerPhase};
use crate::geometry::{SizeClass, SnapPoint, SnapTable, Viewport};
use crate::gesture::{DragTracker, GestureConfig, ReleaseOutcome};

// ---------------------------------------------------------------------------
// Phase and driver
// ---------------------------------------------------------------------------

/// Top-level lifecycle state of the panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PanelPhase {
    /// Not mounted; the initial and terminal state.
    #[default]
    Hidden,
    /// Entrance transition toward [`SnapPoint::Half`].
    Opening,
    /// Resting at (or idling around) a snap point.
    Open(SnapPoint),
    /// A drag session owns the position.
    Dragging,
    /// A release handed the spring a target; the settle is in flight.
    Settling(SnapPoint),
    /// Exit transition; the hide delay is counting down.
    Closing,
}

impl PanelPhase {
    /// Whether the panel should be rendered at all.
    #[inline]
    #[must_use]
    pub fn is_visible(self) -> bool {
        !matches!(self, Self::Hidden)
    }

    /// Whether a transition is in flight.
    #[inline]
    #[must_use]
    pub fn is_animating(self) -> bool {
        matches!(self, Self::Opening | Self::Settling(_) | Self::Closing)
    }
}

/// Which subsystem is allowed to write the panel position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionDriver {
    /// The spring simulation advances the position on each tick.
    Spring,
    /// The active drag session writes the position directly.
    Gesture,
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Timing and threshold configuration for the sheet.
#[derive(Debug, Clone)]
pub struct SheetConfig {
    /// Gesture classification thresholds.
    pub gesture: GestureConfig,
    /// Duration of the `Opening` phase before `Open(Half)` is reported.
    pub open_duration: Duration,
    /// Delay between entering `Closing` and flipping to `Hidden`, covering
    /// the host's exit transition.
    pub close_delay: Duration,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            gesture: GestureConfig::default(),
            open_duration: Duration::from_millis(300),
            close_delay: Duration::from_millis(300),
        }
    }
}

// ---------------------------------------------------------------------------
// BottomSheet
// ---------------------------------------------------------------------------

type DismissCallback = Box<dyn FnMut()>;

/// The bottom-sheet engine.
///
/// Feed it host events via [`handle_event`](Self::handle_event), advance it
/// once per display frame via [`tick`](Self::tick), and read back
/// [`position`](Self::position) (percent of viewport height) and
/// [`phase`](Self::phase) to place the panel.
pub struct BottomSheet {
    config: SheetConfig,
    viewport: Viewport,
    table: SnapTable,
    phase: PanelPhase,
    driver: PositionDriver,
    spring: Spring,
    tracker: DragTracker,
    /// Logical snap point the sheet is at or moving toward.
    active_snap: SnapPoint,
    /// Remaining `Opening` phase time.
    opening_remaining: Duration,
    /// Remaining time before `Closing` flips to `Hidden`.
    hide_remaining: Duration,
    /// Gentle entrance profile still owed to the current open session.
    initial_open: bool,
    /// A dismissal already fired for the current close gesture.
    dismiss_fired: bool,
    on_dismiss: Option<DismissCallback>,
}

impl fmt::Debug for BottomSheet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BottomSheet")
            .field("phase", &self.phase)
            .field("driver", &self.driver)
            .field("active_snap", &self.active_snap)
            .field("position", &self.spring.position())
            .finish_non_exhaustive()
    }
}

impl BottomSheet {
    /// Create a hidden sheet for the given viewport with default timings.
    #[must_use]
    pub fn new(viewport: Viewport) -> Self {
        Self::with_config(viewport, SheetConfig::default())
    }

    /// Create a hidden sheet with explicit configuration.
    #[must_use]
    pub fn with_config(viewport: Viewport, config: SheetConfig) -> Self {
        let table = SnapTable::for_viewport(&viewport);
        let tracker = DragTracker::new(config.gesture.clone());
        Self {
            config,
            viewport,
            table,
            phase: PanelPhase::Hidden,
            driver: PositionDriver::Spring,
            spring: Spring::resting(table.closed),
            tracker,
            active_snap: SnapPoint::Closed,
            opening_remaining: Duration::ZERO,
            hide_remaining: Duration::ZERO,
            initial_open: false,
            dismiss_fired: false,
            on_dismiss: None,
        }
    }

    /// Register the dismissal callback, invoked exactly once per
    /// user-initiated close.
    pub fn set_on_dismiss(&mut self, callback: impl FnMut() + 'static) {
        self.on_dismiss = Some(Box::new(callback));
    }

    /// Current lifecycle phase.
    #[inline]
    #[must_use]
    pub fn phase(&self) -> PanelPhase {
        self.phase
    }

    /// Current position authority.
    #[inline]
    #[must_use]
    pub fn driver(&self) -> PositionDriver {
        self.driver
    }

    /// Current panel position in percent of viewport height.
    #[inline]
    #[must_use]
    pub fn position(&self) -> f64 {
        self.spring.position()
    }

    /// The logical snap point the sheet is at or moving toward.
    #[inline]
    #[must_use]
    pub fn active_snap(&self) -> SnapPoint {
        self.active_snap
    }

    /// Whether the panel should be rendered.
    #[inline]
    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.phase.is_visible()
    }

    /// Whether all motion has come to rest (open at a snap point or
    /// hidden).
    #[must_use]
    pub fn is_settled(&self) -> bool {
        matches!(self.phase, PanelPhase::Open(_) | PanelPhase::Hidden) && self.spring.is_at_rest()
    }

    /// The viewport's current size class.
    #[inline]
    #[must_use]
    pub fn size_class(&self) -> SizeClass {
        self.viewport.size_class()
    }

    /// The active snap table.
    #[inline]
    #[must_use]
    pub fn snap_table(&self) -> SnapTable {
        self.table
    }

    // -- External intent --------------------------------------------------

    /// Flip the host's open intent. `true` drives `Hidden → Opening` (or
    /// cancels a pending hide); `false` drives `→ Closing → Hidden`
    /// without firing the dismissal callback.
    pub fn set_open_intent(&mut self, open: bool) {
        if open {
            match self.phase {
                PanelPhase::Hidden => self.begin_open(true),
                // Reopened before the hide delay elapsed: cancel the
                // pending hide and re-enter Opening from where we are.
                PanelPhase::Closing => self.begin_open(false),
                _ => {}
            }
        } else if self.phase.is_visible() && self.phase != PanelPhase::Closing {
            self.begin_close(false);
        }
    }

    /// Request a snap point directly (snap buttons). `Closed` routes
    /// through the dismissal lifecycle. Ignored while hidden, closing, or
    /// mid-drag (the gesture keeps exclusive position authority).
    pub fn snap_to(&mut self, snap: SnapPoint) {
        match self.phase {
            PanelPhase::Hidden | PanelPhase::Closing | PanelPhase::Dragging => return,
            _ => {}
        }
        if snap == SnapPoint::Closed {
            self.begin_close(true);
            return;
        }
        self.active_snap = snap;
        self.phase = PanelPhase::Settling(snap);
        self.driver = PositionDriver::Spring;
        self.animate_to(self.table.value(snap));
    }

    /// The host's backdrop was pressed: a user-initiated dismissal.
    pub fn backdrop_pressed(&mut self) {
        if self.phase.is_visible() {
            self.begin_close(true);
        }
    }

    // -- Events ------------------------------------------------------------

    /// Process one host event. Events are handled fully, in arrival order.
    pub fn handle_event(&mut self, event: &Event) {
        match event {
            Event::Pointer(pointer) => self.handle_pointer(pointer),
            Event::Resize { width, height } => self.handle_resize(*width, *height),
        }
    }

    fn handle_pointer(&mut self, pointer: &PointerEvent) {
        match pointer.phase {
            PointerPhase::Down => {
                // Empty touch list: degenerate event, no session starts.
                let Some(touch) = pointer.primary() else {
                    return;
                };
                if !matches!(self.phase, PanelPhase::Open(_) | PanelPhase::Settling(_)) {
                    return;
                }
                self.tracker
                    .begin(touch.x, touch.y, self.spring.position(), self.active_snap);
                self.phase = PanelPhase::Dragging;
                self.driver = PositionDriver::Gesture;
                #[cfg(feature = "tracing")]
                tracing::trace!(x = touch.x, y = touch.y, "drag session started");
            }
            PointerPhase::Move => {
                let Some(touch) = pointer.primary() else {
                    return;
                };
                if let Some(raw) = self.tracker.motion(touch.x, touch.y, &self.viewport, &self.table)
                {
                    self.spring.set_position(raw);
                }
            }
            PointerPhase::Up => {
                let outcome = self.tracker.release(&self.viewport);
                self.apply_release(outcome);
            }
            PointerPhase::Cancel => {
                let outcome = self.tracker.cancel();
                self.apply_release(outcome);
            }
        }
    }

    fn apply_release(&mut self, outcome: Option<ReleaseOutcome>) {
        // No session was active: duplicate or stray end event.
        let Some(outcome) = outcome else {
            return;
        };
        #[cfg(feature = "tracing")]
        tracing::debug!(?outcome, "drag released");
        match outcome {
            ReleaseOutcome::Settle { target, velocity } => {
                self.spring.set_velocity(velocity);
                self.active_snap = target;
                self.phase = PanelPhase::Settling(target);
                self.driver = PositionDriver::Spring;
                self.animate_to(self.table.value(target));
            }
            ReleaseOutcome::Dismiss { velocity } => {
                self.spring.set_velocity(velocity);
                self.driver = PositionDriver::Spring;
                self.begin_close(true);
            }
        }
    }

    fn handle_resize(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height);
        self.table = SnapTable::for_viewport(&self.viewport);
        match self.phase {
            PanelPhase::Hidden => {}
            // Release resolves against the refreshed table.
            PanelPhase::Dragging => {}
            PanelPhase::Opening => self.spring.set_target(self.table.half),
            PanelPhase::Closing => self.spring.set_target(self.table.closed),
            // Same logical snap point, new numeric value; no phase change.
            PanelPhase::Open(snap) | PanelPhase::Settling(snap) => {
                self.animate_to(self.table.value(snap));
            }
        }
    }

    // -- Frame tick --------------------------------------------------------

    /// Advance the engine by one frame delta. The host calls this from its
    /// display-refresh callback; the two fixed 300 ms delays count down
    /// here as well.
    pub fn tick(&mut self, dt: Duration) {
        match self.phase {
            PanelPhase::Hidden => {}
            // The gesture owns the position; the spring stays suspended.
            PanelPhase::Dragging => {}
            PanelPhase::Opening => {
                self.spring.tick(dt);
                self.finish_initial_settle_if_resting();
                self.opening_remaining = self.opening_remaining.saturating_sub(dt);
                if self.opening_remaining.is_zero() {
                    // Steady-state hand-off: flag flip only, no position
                    // jump; the spring keeps whatever motion remains.
                    self.phase = PanelPhase::Open(self.active_snap);
                    #[cfg(feature = "tracing")]
                    tracing::debug!(snap = ?self.active_snap, "entrance complete");
                }
            }
            PanelPhase::Open(_) => {
                self.spring.tick(dt);
                self.finish_initial_settle_if_resting();
            }
            PanelPhase::Settling(target) => {
                self.spring.tick(dt);
                if self.spring.is_at_rest() {
                    self.phase = PanelPhase::Open(target);
                }
            }
            PanelPhase::Closing => {
                self.spring.tick(dt);
                self.hide_remaining = self.hide_remaining.saturating_sub(dt);
                if self.hide_remaining.is_zero() {
                    self.finish_hide();
                }
            }
        }
    }

    // -- Internal transitions ----------------------------------------------

    fn begin_open(&mut self, from_hidden: bool) {
        if from_hidden {
            // Position snaps to Closed with no animation; motion starts on
            // the next frame.
            self.spring.snap_to(self.table.closed);
        }
        self.phase = PanelPhase::Opening;
        self.driver = PositionDriver::Spring;
        self.initial_open = true;
        self.dismiss_fired = false;
        self.opening_remaining = self.config.open_duration;
        self.hide_remaining = Duration::ZERO;
        self.active_snap = SnapPoint::Half;
        self.spring.set_profile(SpringProfile::gentle());
        self.spring.set_target(self.table.half);
        #[cfg(feature = "tracing")]
        tracing::debug!(from_hidden, "opening");
    }

    fn begin_close(&mut self, user_initiated: bool) {
        // First resolved dismissal wins; later paths in the same tick are
        // no-ops.
        if matches!(self.phase, PanelPhase::Closing | PanelPhase::Hidden) {
            return;
        }
        // Any live drag session ends with its authority.
        let _ = self.tracker.cancel();
        self.phase = PanelPhase::Closing;
        self.driver = PositionDriver::Spring;
        self.active_snap = SnapPoint::Closed;
        self.hide_remaining = self.config.close_delay;
        self.animate_to(self.table.closed);
        #[cfg(feature = "tracing")]
        tracing::debug!(user_initiated, "closing");
        if user_initiated && !self.dismiss_fired {
            self.dismiss_fired = true;
            if let Some(callback) = self.on_dismiss.as_mut() {
                callback();
            }
        }
    }

    /// Retarget the spring with the normal profile. The gentle entrance
    /// profile is consumed by any later animation.
    fn animate_to(&mut self, value: f64) {
        self.initial_open = false;
        self.spring.set_profile(SpringProfile::normal());
        self.spring.set_target(value);
    }

    fn finish_initial_settle_if_resting(&mut self) {
        if self.initial_open && self.spring.is_at_rest() {
            self.initial_open = false;
        }
    }

    fn finish_hide(&mut self) {
        self.phase = PanelPhase::Hidden;
        self.driver = PositionDriver::Spring;
        self.active_snap = SnapPoint::Closed;
        self.spring.snap_to(self.table.closed);
        self.dismiss_fired = false;
        #[cfg(feature = "tracing")]
        tracing::debug!("hidden");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    const FRAME: Duration = Duration::from_millis(16);
    const MOBILE: Viewport = Viewport::new(375.0, 800.0);

    fn open_sheet() -> BottomSheet {
        let mut sheet = BottomSheet::new(MOBILE);
        sheet.set_open_intent(true);
        settle(&mut sheet, 200);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
        sheet
    }

    fn settle(sheet: &mut BottomSheet, max_frames: usize) {
        for _ in 0..max_frames {
            sheet.tick(FRAME);
            if sheet.is_settled() {
                break;
            }
        }
    }

    fn drag(sheet: &mut BottomSheet, from: (f64, f64), to: (f64, f64), steps: usize) {
        sheet.handle_event(&Event::Pointer(PointerEvent::down(from.0, from.1)));
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            sheet.handle_event(&Event::Pointer(PointerEvent::moved(x, y)));
            sheet.tick(FRAME);
        }
        sheet.handle_event(&Event::Pointer(PointerEvent::up()));
    }

    fn dismiss_counter(sheet: &mut BottomSheet) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        sheet.set_on_dismiss(move || inner.set(inner.get() + 1));
        count
    }

    // --- Opening ---

    #[test]
    fn starts_hidden_at_zero() {
        let sheet = BottomSheet::new(MOBILE);
        assert_eq!(sheet.phase(), PanelPhase::Hidden);
        assert_eq!(sheet.position(), 0.0);
        assert!(!sheet.is_visible());
    }

    #[test]
    fn open_intent_enters_opening_then_open_at_half() {
        let mut sheet = BottomSheet::new(MOBILE);
        sheet.set_open_intent(true);
        assert_eq!(sheet.phase(), PanelPhase::Opening);
        assert!(sheet.phase().is_animating());
        assert_eq!(sheet.position(), 0.0, "position snaps to Closed first");

        sheet.tick(FRAME);
        assert!(sheet.position() > 0.0, "motion starts on the next frame");

        // The phase flips at the fixed 300 ms mark regardless of residual
        // spring motion.
        let mut elapsed = Duration::ZERO;
        while sheet.phase() == PanelPhase::Opening {
            sheet.tick(FRAME);
            elapsed += FRAME;
            assert!(elapsed <= Duration::from_millis(400));
        }
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));

        settle(&mut sheet, 200);
        assert_eq!(sheet.position(), 50.0);
    }

    #[test]
    fn open_intent_while_open_is_noop() {
        let mut sheet = open_sheet();
        sheet.set_open_intent(true);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
    }

    // --- Dragging ---

    #[test]
    fn drag_up_past_threshold_settles_at_full() {
        let mut sheet = open_sheet();
        // 30 percent of 800 px upward.
        drag(&mut sheet, (100.0, 600.0), (100.0, 360.0), 8);
        assert_eq!(sheet.phase(), PanelPhase::Settling(SnapPoint::Full));

        settle(&mut sheet, 300);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Full));
        assert_eq!(sheet.position(), 85.0);
    }

    #[test]
    fn drag_below_threshold_resettles_in_place() {
        let mut sheet = open_sheet();
        // 10 percent up: below the 25 percent transition threshold.
        drag(&mut sheet, (100.0, 600.0), (100.0, 520.0), 4);
        settle(&mut sheet, 300);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
        assert_eq!(sheet.position(), 50.0);
    }

    #[test]
    fn drag_does_not_skip_snap_points() {
        let mut sheet = open_sheet();
        // A huge 60 percent upward drag still only steps Half → Full.
        drag(&mut sheet, (100.0, 700.0), (100.0, 220.0), 10);
        settle(&mut sheet, 300);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Full));
    }

    #[test]
    fn horizontal_drag_never_moves_panel() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        sheet.handle_event(&Event::Pointer(PointerEvent::moved(150.0, 605.0)));
        assert_eq!(sheet.position(), 50.0);
        sheet.handle_event(&Event::Pointer(PointerEvent::up()));
        settle(&mut sheet, 300);
        assert_eq!(sheet.position(), 50.0);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
    }

    #[test]
    fn dragging_suspends_spring_authority() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        assert_eq!(sheet.phase(), PanelPhase::Dragging);
        assert_eq!(sheet.driver(), PositionDriver::Gesture);

        sheet.handle_event(&Event::Pointer(PointerEvent::moved(100.0, 520.0)));
        let held = sheet.position();
        // Ticking while dragging must not move the panel.
        sheet.tick(FRAME);
        sheet.tick(FRAME);
        assert_eq!(sheet.position(), held);
    }

    #[test]
    fn empty_touch_list_down_is_ignored() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent {
            phase: PointerPhase::Down,
            touches: crate::event::TouchList::new(),
        }));
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
        assert_eq!(sheet.driver(), PositionDriver::Spring);
    }

    #[test]
    fn duplicate_up_events_are_noops() {
        let mut sheet = open_sheet();
        drag(&mut sheet, (100.0, 600.0), (100.0, 520.0), 4);
        let phase = sheet.phase();
        // Synthetic mouse event after touchend.
        sheet.handle_event(&Event::Pointer(PointerEvent::up()));
        assert_eq!(sheet.phase(), phase);
    }

    #[test]
    fn cancel_resettles_in_place_despite_large_drag() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        sheet.handle_event(&Event::Pointer(PointerEvent::moved(100.0, 200.0)));
        sheet.handle_event(&Event::Pointer(PointerEvent::cancel()));
        settle(&mut sheet, 300);
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
        assert_eq!(sheet.position(), 50.0);
    }

    #[test]
    fn drag_can_grab_a_settling_sheet() {
        let mut sheet = open_sheet();
        drag(&mut sheet, (100.0, 600.0), (100.0, 360.0), 8);
        assert_eq!(sheet.phase(), PanelPhase::Settling(SnapPoint::Full));
        sheet.tick(FRAME);

        // Grab mid-settle: the spring is suspended immediately.
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 300.0)));
        assert_eq!(sheet.phase(), PanelPhase::Dragging);
        let held = sheet.position();
        sheet.tick(FRAME);
        assert_eq!(sheet.position(), held);
    }

    // --- Dismissal ---

    #[test]
    fn drag_down_past_threshold_dismisses_once_and_hides() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);

        // 30 percent of 800 px downward from Half.
        drag(&mut sheet, (100.0, 300.0), (100.0, 540.0), 8);
        assert_eq!(sheet.phase(), PanelPhase::Closing);
        assert_eq!(dismissals.get(), 1);

        // The collaborator reacts by dropping the intent; no second fire.
        sheet.set_open_intent(false);
        assert_eq!(dismissals.get(), 1);

        // Hidden after the fixed delay.
        for _ in 0..25 {
            sheet.tick(FRAME);
        }
        assert_eq!(sheet.phase(), PanelPhase::Hidden);
        assert_eq!(sheet.position(), 0.0);
    }

    #[test]
    fn overlapping_dismiss_paths_fire_once() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);

        drag(&mut sheet, (100.0, 300.0), (100.0, 540.0), 8);
        // Backdrop press lands in the same tick as the drag resolution.
        sheet.backdrop_pressed();
        assert_eq!(dismissals.get(), 1);
    }

    #[test]
    fn backdrop_press_dismisses() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);
        sheet.backdrop_pressed();
        assert_eq!(sheet.phase(), PanelPhase::Closing);
        assert_eq!(dismissals.get(), 1);
    }

    #[test]
    fn close_button_routes_through_dismissal() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);
        sheet.snap_to(SnapPoint::Closed);
        assert_eq!(sheet.phase(), PanelPhase::Closing);
        assert_eq!(dismissals.get(), 1);
    }

    #[test]
    fn external_close_does_not_fire_dismissal() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);
        sheet.set_open_intent(false);
        assert_eq!(sheet.phase(), PanelPhase::Closing);
        assert_eq!(dismissals.get(), 0);
    }

    #[test]
    fn dismissal_can_fire_again_next_session() {
        let mut sheet = open_sheet();
        let dismissals = dismiss_counter(&mut sheet);
        sheet.backdrop_pressed();
        for _ in 0..25 {
            sheet.tick(FRAME);
        }
        assert_eq!(sheet.phase(), PanelPhase::Hidden);

        sheet.set_open_intent(true);
        settle(&mut sheet, 200);
        sheet.backdrop_pressed();
        assert_eq!(dismissals.get(), 2);
    }

    // --- Closing / reopening ---

    #[test]
    fn reopen_during_close_delay_cancels_pending_hide() {
        let mut sheet = open_sheet();
        sheet.set_open_intent(false);
        assert_eq!(sheet.phase(), PanelPhase::Closing);
        sheet.tick(FRAME);
        let mid_close = sheet.position();
        assert!(mid_close > 0.0);

        sheet.set_open_intent(true);
        assert_eq!(sheet.phase(), PanelPhase::Opening);
        assert_eq!(
            sheet.position(),
            mid_close,
            "reopening keeps the current position"
        );

        // The cancelled hide never lands.
        for _ in 0..60 {
            sheet.tick(FRAME);
        }
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
    }

    #[test]
    fn close_during_drag_tears_down_session() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        sheet.handle_event(&Event::Pointer(PointerEvent::moved(100.0, 500.0)));
        sheet.set_open_intent(false);
        assert_eq!(sheet.phase(), PanelPhase::Closing);

        // The stray up event after teardown is a silent no-op.
        sheet.handle_event(&Event::Pointer(PointerEvent::up()));
        assert_eq!(sheet.phase(), PanelPhase::Closing);
    }

    #[test]
    fn pointer_down_ignored_while_hidden_and_closing() {
        let mut sheet = BottomSheet::new(MOBILE);
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        assert_eq!(sheet.phase(), PanelPhase::Hidden);

        let mut sheet = open_sheet();
        sheet.set_open_intent(false);
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        assert_eq!(sheet.phase(), PanelPhase::Closing);
    }

    // --- Snap requests ---

    #[test]
    fn snap_request_settles_with_spring() {
        let mut sheet = open_sheet();
        sheet.snap_to(SnapPoint::Full);
        assert_eq!(sheet.phase(), PanelPhase::Settling(SnapPoint::Full));
        settle(&mut sheet, 300);
        assert_eq!(sheet.position(), 85.0);
    }

    #[test]
    fn snap_request_ignored_mid_drag() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        sheet.snap_to(SnapPoint::Full);
        assert_eq!(sheet.phase(), PanelPhase::Dragging);
    }

    // --- Resize ---

    #[test]
    fn resize_retargets_same_logical_snap() {
        let mut sheet = open_sheet();
        assert_eq!(sheet.size_class(), SizeClass::Mobile);
        assert_eq!(sheet.position(), 50.0);

        sheet.handle_event(&Event::Resize {
            width: 1440.0,
            height: 900.0,
        });
        assert_eq!(sheet.size_class(), SizeClass::Desktop);
        // No phase change; the spring re-settles toward the new value.
        assert_eq!(sheet.phase(), PanelPhase::Open(SnapPoint::Half));
        assert_eq!(sheet.active_snap(), SnapPoint::Half);

        settle(&mut sheet, 300);
        assert_eq!(sheet.position(), 35.0);
    }

    #[test]
    fn resize_while_hidden_changes_nothing_visible() {
        let mut sheet = BottomSheet::new(MOBILE);
        sheet.handle_event(&Event::Resize {
            width: 1440.0,
            height: 900.0,
        });
        assert_eq!(sheet.phase(), PanelPhase::Hidden);
        assert_eq!(sheet.position(), 0.0);
        assert_eq!(sheet.snap_table().half, 35.0);
    }

    #[test]
    fn resize_during_drag_updates_table_for_release() {
        let mut sheet = open_sheet();
        sheet.handle_event(&Event::Pointer(PointerEvent::down(100.0, 600.0)));
        sheet.handle_event(&Event::Resize {
            width: 1440.0,
            height: 900.0,
        });
        assert_eq!(sheet.phase(), PanelPhase::Dragging);

        sheet.handle_event(&Event::Pointer(PointerEvent::up()));
        settle(&mut sheet, 300);
        // Zero displacement: back to Half, now resolved at the desktop
        // value.
        assert_eq!(sheet.position(), 35.0);
    }

    // --- Entrance profile ---

    #[test]
    fn entrance_uses_gentle_profile_then_normal() {
        let mut sheet = BottomSheet::new(MOBILE);
        sheet.set_open_intent(true);
        assert_eq!(
            sheet.spring.profile(),
            SpringProfile::gentle(),
            "entrance runs on the gentle profile"
        );
        settle(&mut sheet, 300);

        sheet.snap_to(SnapPoint::Full);
        assert_eq!(
            sheet.spring.profile(),
            SpringProfile::normal(),
            "later transitions run on the normal profile"
        );
    }
}
