#![forbid(unsafe_code)]

//! Deterministic scripted host for the sheet engine.
//!
//! [`ScriptedHost`] stands in for the real embedding environment: it owns a
//! [`BottomSheet`], feeds it pointer/resize events, advances it with a
//! fixed 16 ms frame clock, and records every frame into a [`Trace`]. The
//! trace serializes to a golden JSON layout and hashes to a `blake3`
//! fingerprint, so two runs of the same script can be compared with a
//! single string equality.
//!
//! The engine reads no clock and holds no host handles, so a scripted run
//! is fully deterministic: same script, same trace, same fingerprint.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use snapsheet_core::event::{Event, PointerEvent};
use snapsheet_core::geometry::{SnapPoint, Viewport};
use snapsheet_core::sheet::{BottomSheet, PanelPhase};

/// Fixed frame step used by every script (60 Hz).
pub const FRAME: Duration = Duration::from_millis(16);

// ---------------------------------------------------------------------------
// Trace
// ---------------------------------------------------------------------------

/// One recorded frame of engine output.
#[derive(Debug, Clone, PartialEq)]
pub struct TraceFrame {
    /// Frame counter at recording time.
    pub frame: u64,
    /// Panel position in percent of viewport height.
    pub position: f64,
    /// Phase label (see [`phase_label`]).
    pub phase: String,
}

/// Position/phase history of a scripted run.
#[derive(Debug, Clone, Default)]
pub struct Trace {
    frames: Vec<TraceFrame>,
}

impl Trace {
    /// Recorded frames, in order.
    #[must_use]
    pub fn frames(&self) -> &[TraceFrame] {
        &self.frames
    }

    /// Position of the most recent frame, if any.
    #[must_use]
    pub fn last_position(&self) -> Option<f64> {
        self.frames.last().map(|f| f.position)
    }

    /// Serialize to the golden JSON layout.
    #[must_use]
    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(
            self.frames
                .iter()
                .map(|f| {
                    serde_json::json!({
                        "frame": f.frame,
                        "position": f.position,
                        "phase": f.phase,
                    })
                })
                .collect(),
        )
    }

    /// Stable hex fingerprint of the trace for determinism comparisons.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        blake3::hash(self.to_json().to_string().as_bytes())
            .to_hex()
            .to_string()
    }

    fn push(&mut self, frame: u64, position: f64, phase: PanelPhase) {
        self.frames.push(TraceFrame {
            frame,
            position,
            phase: phase_label(phase),
        });
    }
}

/// Stable string label for a phase, used in golden traces.
#[must_use]
pub fn phase_label(phase: PanelPhase) -> String {
    fn snap(snap: SnapPoint) -> &'static str {
        match snap {
            SnapPoint::Closed => "closed",
            SnapPoint::Half => "half",
            SnapPoint::Full => "full",
        }
    }
    match phase {
        PanelPhase::Hidden => "hidden".to_owned(),
        PanelPhase::Opening => "opening".to_owned(),
        PanelPhase::Open(s) => format!("open:{}", snap(s)),
        PanelPhase::Dragging => "dragging".to_owned(),
        PanelPhase::Settling(s) => format!("settling:{}", snap(s)),
        PanelPhase::Closing => "closing".to_owned(),
    }
}

// ---------------------------------------------------------------------------
// ScriptedHost
// ---------------------------------------------------------------------------

/// Drives a [`BottomSheet`] with scripted gestures under a fixed frame
/// clock, counting dismissals through the sheet's callback.
pub struct ScriptedHost {
    sheet: BottomSheet,
    trace: Trace,
    frame: u64,
    dismissals: Rc<Cell<usize>>,
}

impl ScriptedHost {
    /// Create a host with a hidden sheet on a `width × height` viewport.
    #[must_use]
    pub fn new(width: f64, height: f64) -> Self {
        let mut sheet = BottomSheet::new(Viewport::new(width, height));
        let dismissals = Rc::new(Cell::new(0));
        let counter = Rc::clone(&dismissals);
        sheet.set_on_dismiss(move || counter.set(counter.get() + 1));
        Self {
            sheet,
            trace: Trace::default(),
            frame: 0,
            dismissals,
        }
    }

    /// The sheet under test.
    #[must_use]
    pub fn sheet(&self) -> &BottomSheet {
        &self.sheet
    }

    /// Mutable access for scripts that need raw engine calls.
    pub fn sheet_mut(&mut self) -> &mut BottomSheet {
        &mut self.sheet
    }

    /// The recorded trace so far.
    #[must_use]
    pub fn trace(&self) -> &Trace {
        &self.trace
    }

    /// How many times the sheet reported a user-initiated dismissal.
    #[must_use]
    pub fn dismissals(&self) -> usize {
        self.dismissals.get()
    }

    /// Flip the open intent on.
    pub fn open(&mut self) {
        self.sheet.set_open_intent(true);
    }

    /// Flip the open intent off (external close, no dismissal).
    pub fn close_intent(&mut self) {
        self.sheet.set_open_intent(false);
    }

    /// Press the backdrop.
    pub fn backdrop(&mut self) {
        self.sheet.backdrop_pressed();
    }

    /// Send a pointer-down without advancing time.
    pub fn pointer_down(&mut self, x: f64, y: f64) {
        self.sheet
            .handle_event(&Event::Pointer(PointerEvent::down(x, y)));
    }

    /// Send a pointer-move without advancing time.
    pub fn pointer_move(&mut self, x: f64, y: f64) {
        self.sheet
            .handle_event(&Event::Pointer(PointerEvent::moved(x, y)));
    }

    /// Send a pointer-up without advancing time.
    pub fn pointer_up(&mut self) {
        self.sheet.handle_event(&Event::Pointer(PointerEvent::up()));
    }

    /// Send a pointer-cancel without advancing time.
    pub fn pointer_cancel(&mut self) {
        self.sheet
            .handle_event(&Event::Pointer(PointerEvent::cancel()));
    }

    /// Resize the viewport.
    pub fn resize(&mut self, width: f64, height: f64) {
        tracing::debug!(width, height, "scripted resize");
        self.sheet.handle_event(&Event::Resize { width, height });
    }

    /// Advance `frames` fixed steps, recording each.
    pub fn run(&mut self, frames: usize) {
        for _ in 0..frames {
            self.step();
        }
    }

    /// Advance until the sheet reports all motion at rest, bounded by
    /// `max_frames`. Returns the number of frames consumed.
    pub fn settle(&mut self, max_frames: usize) -> usize {
        for consumed in 0..max_frames {
            if self.sheet.is_settled() {
                return consumed;
            }
            self.step();
        }
        max_frames
    }

    /// Script a straight-line drag from `from` to `to` in `steps` equal
    /// moves, one frame per move.
    pub fn drag(&mut self, from: (f64, f64), to: (f64, f64), steps: usize) {
        tracing::debug!(?from, ?to, steps, "scripted drag");
        self.pointer_down(from.0, from.1);
        self.step();
        for i in 1..=steps {
            let t = i as f64 / steps as f64;
            let x = from.0 + (to.0 - from.0) * t;
            let y = from.1 + (to.1 - from.1) * t;
            self.pointer_move(x, y);
            self.step();
        }
        self.pointer_up();
        self.step();
    }

    fn step(&mut self) {
        self.sheet.tick(FRAME);
        self.frame += 1;
        self.trace
            .push(self.frame, self.sheet.position(), self.sheet.phase());
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
