//! Test utilities for snapsheet.
//!
//! [`SheetHarness`] wraps a [`SheetController`], records every notification and
//! callback it produces, and advances time in fixed frames so tests can assert
//! on settled states without hand-rolling tick loops.
//!
//! # Example
//!
//! ```rust
//! use snapsheet::{SheetConfig, SheetEvent, SheetPhase};
//! use snapsheet_test_utils::SheetHarness;
//!
//! let mut harness = SheetHarness::new(SheetConfig::new(["25%", "50%"]), 800.0);
//!
//! harness.send(SheetEvent::Present);
//! harness.settle();
//!
//! assert_eq!(harness.phase(), SheetPhase::Open(0));
//! assert_eq!(harness.changes(), vec![0]);
//! ```

use std::sync::Arc;

use parking_lot::Mutex;
use snapsheet::{PanRegions, SheetConfig, SheetController, SheetEvent, SheetNotification, SheetPhase};

/// Frame length used by [`SheetHarness::settle`], in seconds.
pub const DEFAULT_FRAME: f32 = 1.0 / 60.0;

/// Upper bound on frames [`SheetHarness::settle`] will run.
pub const MAX_SETTLE_FRAMES: usize = 10_000;

/// A recorded callback invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackRecord {
    /// `on_change(index)`
    Change(i32),
    /// `on_animate(from, to)`
    Animate(i32, i32),
}

/// Drives a controller and records what it reports.
///
/// Callbacks record through a shared `Mutex` so the log can be read while the
/// controller still owns the closures.
#[derive(Debug)]
pub struct SheetHarness {
    controller: SheetController,
    callbacks: Arc<Mutex<Vec<CallbackRecord>>>,
    notifications: Vec<SheetNotification>,
    frame: f32,
}

impl SheetHarness {
    /// Create a harness around a configured, closed sheet.
    pub fn new(config: SheetConfig, viewport_height: f32) -> Self {
        Self::wrap(SheetController::with_config(config, viewport_height))
    }

    /// Create a harness around a sheet that has never been configured.
    pub fn unconfigured(viewport_height: f32) -> Self {
        Self::wrap(SheetController::new(viewport_height))
    }

    fn wrap(mut controller: SheetController) -> Self {
        let callbacks = Arc::new(Mutex::new(Vec::new()));

        let changes = Arc::clone(&callbacks);
        controller.set_on_change(move |index| changes.lock().push(CallbackRecord::Change(index)));

        let animations = Arc::clone(&callbacks);
        controller.set_on_animate(move |from, to| {
            animations.lock().push(CallbackRecord::Animate(from, to))
        });

        Self {
            controller,
            callbacks,
            notifications: Vec::new(),
            frame: DEFAULT_FRAME,
        }
    }

    /// Use a different frame length for [`advance`](Self::advance) and
    /// [`settle`](Self::settle).
    pub fn with_frame(mut self, seconds: f32) -> Self {
        self.frame = seconds;
        self
    }

    /// The wrapped controller.
    pub fn controller(&self) -> &SheetController {
        &self.controller
    }

    /// Shortcut for `controller().phase()`.
    pub fn phase(&self) -> SheetPhase {
        self.controller.phase()
    }

    /// Shortcut for `controller().translate_y()`.
    pub fn translate_y(&self) -> f32 {
        self.controller.translate_y()
    }

    /// Apply an event, recording and returning its notifications.
    pub fn send(&mut self, event: SheetEvent) -> Vec<SheetNotification> {
        let out = self.controller.handle_event(event);
        self.notifications.extend_from_slice(&out);
        out
    }

    /// Run a whole drag: start in `region`, feed each cumulative delta, then
    /// release at the last delta with `release_velocity`.
    pub fn drag(&mut self, region: PanRegions, deltas: &[f32], release_velocity: f32) {
        self.send(SheetEvent::DragStart { region });
        for &delta_y in deltas {
            self.send(SheetEvent::DragMove {
                delta_y,
                velocity_y: release_velocity,
            });
        }
        let delta_y = deltas.last().copied().unwrap_or(0.0);
        self.send(SheetEvent::DragEnd {
            delta_y,
            velocity_y: release_velocity,
        });
    }

    /// Advance time by `seconds` in whole frames.
    pub fn advance(&mut self, seconds: f32) {
        let mut remaining = seconds;
        while remaining > 0.0 {
            let dt = remaining.min(self.frame);
            self.send(SheetEvent::Tick { dt });
            remaining -= dt;
        }
    }

    /// Tick until no transition is in flight. Returns the number of frames run.
    pub fn settle(&mut self) -> usize {
        let mut frames = 0;
        while matches!(self.phase(), SheetPhase::Transitioning { .. }) && frames < MAX_SETTLE_FRAMES {
            let dt = self.frame;
            self.send(SheetEvent::Tick { dt });
            frames += 1;
        }
        frames
    }

    /// Every notification since creation or the last [`clear`](Self::clear).
    pub fn notifications(&self) -> &[SheetNotification] {
        &self.notifications
    }

    /// Every callback invocation since creation or the last clear.
    pub fn callbacks(&self) -> Vec<CallbackRecord> {
        self.callbacks.lock().clone()
    }

    /// Indices passed to `on_change`, in order.
    pub fn changes(&self) -> Vec<i32> {
        self.callbacks
            .lock()
            .iter()
            .filter_map(|record| match record {
                CallbackRecord::Change(index) => Some(*index),
                CallbackRecord::Animate(..) => None,
            })
            .collect()
    }

    /// Forget recorded notifications and callbacks.
    pub fn clear(&mut self) {
        self.notifications.clear();
        self.callbacks.lock().clear();
    }
}

/// Install a test subscriber so controller logs show up in failing tests.
pub fn init_logging() {
    snapsheet_core::logging::init_for_tests();
}
