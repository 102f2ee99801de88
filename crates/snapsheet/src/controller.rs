//! The sheet state machine and its imperative handle.
//!
//! [`SheetController`] is a reducer over [`SheetEvent`]s. Every event is applied
//! synchronously and answered with the [`SheetNotification`]s it caused; the
//! same notifications are forwarded to the `on_change`/`on_animate` callbacks.
//! Nothing here can fail: out-of-range indices, calls before configuration and
//! redundant requests are ignored.
//!
//! # Example
//!
//! ```
//! use snapsheet::{SheetConfig, SheetController, SheetPhase};
//!
//! let mut sheet = SheetController::with_config(SheetConfig::new(["25%", "50%", "90%"]), 800.0);
//!
//! sheet.present();
//! sheet.tick(0.3);
//! assert_eq!(sheet.phase(), SheetPhase::Open(0));
//! assert_eq!(sheet.translate_y(), 600.0);
//!
//! sheet.expand();
//! sheet.tick(0.3);
//! assert_eq!(sheet.phase(), SheetPhase::Open(2));
//! assert_eq!(sheet.translate_y(), 80.0);
//! ```

use std::fmt;

use snapsheet_core::profiling::profile_function;

use crate::animation::{AnimationTarget, SheetAnimator};
use crate::config::{SheetConfig, SheetTuning};
use crate::event::{SheetEvent, SheetNotification};
use crate::gesture::{GestureRelease, GestureSession, PanRegions};
use crate::snap_point::{SnapPoint, SnapPoints, SnapTarget};

/// Visibility and indices of a sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SheetState {
    /// True while content is mounted, including during the closing transition.
    pub is_visible: bool,
    /// Where the sheet last settled.
    pub current: SnapTarget,
    /// Where the sheet is heading (equal to `current` at rest).
    pub target: SnapTarget,
}

impl SheetState {
    /// Settled index, `-1` when closed.
    pub fn current_index(&self) -> i32 {
        self.current.as_i32()
    }

    /// Target index, `-1` when closing or closed.
    pub fn target_index(&self) -> i32 {
        self.target.as_i32()
    }
}

/// Coarse state of the machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetPhase {
    /// Hidden and unmounted.
    Closed,
    /// A transition is in flight.
    Transitioning {
        /// Where the sheet last settled.
        from: SnapTarget,
        /// Where it is heading.
        to: SnapTarget,
    },
    /// A drag is tracking the pointer.
    Dragging {
        /// Snap index the drag is measured against.
        anchor: usize,
    },
    /// At rest on a snap point.
    Open(usize),
}

/// Decide where a released drag should go.
///
/// Distances and velocities are positive downward. The distance threshold is
/// `min(height * distance_ratio, max_distance)` for the anchor's height.
pub fn commit_decision(
    release: &GestureRelease,
    snap_points: &SnapPoints,
    tuning: &SheetTuning,
    allow_close: bool,
) -> SnapTarget {
    let anchor = release.anchor;
    let height = snap_points.height(anchor).unwrap_or(0.0);
    let distance = tuning.distance_threshold(height);
    let velocity = tuning.velocity_threshold;

    if release.delta_y > distance || release.velocity_y > velocity {
        let at_lowest = anchor == 0;
        if allow_close && (at_lowest || release.delta_y > tuning.close_distance(height)) {
            return SnapTarget::Closed;
        }
        return SnapTarget::Index(anchor.saturating_sub(1));
    }

    let upward = release.delta_y < -distance || release.velocity_y < -velocity;
    if upward && snap_points.contains(anchor + 1) {
        return SnapTarget::Index(anchor + 1);
    }

    SnapTarget::Index(anchor)
}

type ChangeCallback = Box<dyn FnMut(i32)>;
type AnimateCallback = Box<dyn FnMut(i32, i32)>;

/// Draggable snap-point sheet.
pub struct SheetController {
    config: Option<SheetConfig>,
    snap_points: SnapPoints,
    state: SheetState,
    animator: SheetAnimator,
    gesture: Option<GestureSession>,
    on_change: Option<ChangeCallback>,
    on_animate: Option<AnimateCallback>,
}

impl fmt::Debug for SheetController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SheetController")
            .field("config", &self.config)
            .field("snap_points", &self.snap_points)
            .field("state", &self.state)
            .field("animator", &self.animator)
            .field("gesture", &self.gesture)
            .finish_non_exhaustive()
    }
}

impl SheetController {
    /// Create an unconfigured, closed sheet. Every request is ignored until
    /// [`configure`](Self::configure) is called.
    pub fn new(viewport_height: f32) -> Self {
        let snap_points = SnapPoints::new(Vec::new(), viewport_height);
        Self {
            animator: SheetAnimator::new(snap_points.closed_translate_y()),
            config: None,
            snap_points,
            state: SheetState::default(),
            gesture: None,
            on_change: None,
            on_animate: None,
        }
    }

    /// Create a closed sheet with `config`.
    pub fn with_config(config: SheetConfig, viewport_height: f32) -> Self {
        let mut controller = Self::new(viewport_height);
        controller.configure(config);
        controller
    }

    /// Set the callback fired when a transition settles (`-1` for closed).
    pub fn on_change(mut self, callback: impl FnMut(i32) + 'static) -> Self {
        self.set_on_change(callback);
        self
    }

    /// Set the callback fired when a transition begins, with `(from, to)`.
    pub fn on_animate(mut self, callback: impl FnMut(i32, i32) + 'static) -> Self {
        self.set_on_animate(callback);
        self
    }

    /// Replace the settle callback.
    pub fn set_on_change(&mut self, callback: impl FnMut(i32) + 'static) {
        self.on_change = Some(Box::new(callback));
    }

    /// Replace the transition-start callback.
    pub fn set_on_animate(&mut self, callback: impl FnMut(i32, i32) + 'static) {
        self.on_animate = Some(Box::new(callback));
    }

    // ----- Queries --------------------------------------------------------

    /// Current configuration, if any.
    pub fn config(&self) -> Option<&SheetConfig> {
        self.config.as_ref()
    }

    /// Resolved snap points.
    pub fn snap_points(&self) -> &SnapPoints {
        &self.snap_points
    }

    /// Visibility and indices.
    pub fn state(&self) -> SheetState {
        self.state
    }

    /// Coarse state of the machine.
    pub fn phase(&self) -> SheetPhase {
        if let Some(gesture) = &self.gesture {
            return SheetPhase::Dragging {
                anchor: gesture.anchor(),
            };
        }
        if !self.state.is_visible {
            return SheetPhase::Closed;
        }
        if self.animator.is_animating() {
            return SheetPhase::Transitioning {
                from: self.state.current,
                to: self.state.target,
            };
        }
        match self.state.current {
            SnapTarget::Index(index) => SheetPhase::Open(index),
            SnapTarget::Closed => SheetPhase::Closed,
        }
    }

    /// Check if content should be mounted.
    pub fn is_visible(&self) -> bool {
        self.state.is_visible
    }

    /// Settled index, `-1` when closed.
    pub fn current_index(&self) -> i32 {
        self.state.current_index()
    }

    /// Check if a drag is in progress.
    pub fn is_dragging(&self) -> bool {
        self.gesture.is_some()
    }

    /// The drag in progress.
    pub fn gesture(&self) -> Option<&GestureSession> {
        self.gesture.as_ref()
    }

    /// Current animated values.
    pub fn values(&self) -> AnimationTarget {
        self.animator.values()
    }

    /// Current vertical offset.
    pub fn translate_y(&self) -> f32 {
        self.animator.translate_y()
    }

    /// Current backdrop opacity.
    pub fn backdrop_opacity(&self) -> f32 {
        self.animator.backdrop_opacity()
    }

    // ----- Imperative API -------------------------------------------------

    /// Replace the configuration.
    pub fn configure(&mut self, config: SheetConfig) {
        self.handle_event(SheetEvent::Configure(config));
    }

    /// Change the viewport height.
    pub fn set_viewport_height(&mut self, viewport_height: f32) {
        self.handle_event(SheetEvent::Resize { viewport_height });
    }

    /// Show at the configured initial index.
    pub fn present(&mut self) {
        self.handle_event(SheetEvent::Present);
    }

    /// Animate to closed.
    pub fn dismiss(&mut self) {
        self.handle_event(SheetEvent::Dismiss);
    }

    /// Alias for [`dismiss`](Self::dismiss).
    pub fn close(&mut self) {
        self.dismiss();
    }

    /// Move to the highest snap index.
    pub fn expand(&mut self) {
        self.handle_event(SheetEvent::Expand);
    }

    /// Move to snap index 0.
    pub fn collapse(&mut self) {
        self.handle_event(SheetEvent::Collapse);
    }

    /// Move to `index`; ignored if out of range.
    pub fn snap_to_index(&mut self, index: usize) {
        self.handle_event(SheetEvent::SnapToIndex(index));
    }

    /// Move to the snap point matching `descriptor` exactly; ignored if absent.
    pub fn snap_to_position(&mut self, descriptor: impl Into<SnapPoint>) {
        self.handle_event(SheetEvent::SnapToPosition(descriptor.into()));
    }

    /// Start a drag in `region`.
    pub fn begin_drag(&mut self, region: PanRegions) {
        self.handle_event(SheetEvent::DragStart { region });
    }

    /// Feed a drag sample.
    pub fn drag(&mut self, delta_y: f32, velocity_y: f32) {
        self.handle_event(SheetEvent::DragMove {
            delta_y,
            velocity_y,
        });
    }

    /// Release the drag.
    pub fn end_drag(&mut self, delta_y: f32, velocity_y: f32) {
        self.handle_event(SheetEvent::DragEnd {
            delta_y,
            velocity_y,
        });
    }

    /// The backdrop was tapped.
    pub fn backdrop_tap(&mut self) {
        self.handle_event(SheetEvent::BackdropTap);
    }

    /// The platform back action fired.
    pub fn back_pressed(&mut self) {
        self.handle_event(SheetEvent::BackPressed);
    }

    /// Advance time by `dt` seconds.
    pub fn tick(&mut self, dt: f32) {
        self.handle_event(SheetEvent::Tick { dt });
    }

    // ----- Reducer --------------------------------------------------------

    /// Apply one event and return the notifications it produced.
    ///
    /// Registered callbacks have already run when this returns.
    pub fn handle_event(&mut self, event: SheetEvent) -> Vec<SheetNotification> {
        profile_function!();

        let mut out = Vec::new();

        match event {
            SheetEvent::Configure(config) => self.apply_config(config, &mut out),
            SheetEvent::Resize { viewport_height } => self.apply_resize(viewport_height),
            SheetEvent::Present => self.apply_present(&mut out),
            SheetEvent::Dismiss => self.apply_dismiss(&mut out),
            SheetEvent::Expand => {
                if let Some(top) = self.snap_points.highest_index() {
                    self.apply_snap(top, &mut out);
                }
            }
            SheetEvent::Collapse => self.apply_snap(0, &mut out),
            SheetEvent::SnapToIndex(index) => self.apply_snap(index, &mut out),
            SheetEvent::SnapToPosition(point) => match self.snap_points.index_of(&point) {
                Some(index) => self.apply_snap(index, &mut out),
                None => tracing::trace!("No snap point matches '{}'", point),
            },
            SheetEvent::DragStart { region } => self.apply_drag_start(region),
            SheetEvent::DragMove {
                delta_y,
                velocity_y,
            } => self.apply_drag_move(delta_y, velocity_y),
            SheetEvent::DragEnd {
                delta_y,
                velocity_y,
            } => self.apply_drag_end(delta_y, velocity_y, &mut out),
            SheetEvent::BackdropTap | SheetEvent::BackPressed => {
                if self.allows_close() {
                    self.apply_dismiss(&mut out);
                } else {
                    tracing::trace!("Close request ignored: pan-down-to-close disabled");
                }
            }
            SheetEvent::Tick { dt } => self.apply_tick(dt, &mut out),
        }

        self.notify(&out);
        out
    }

    fn notify(&mut self, notifications: &[SheetNotification]) {
        for notification in notifications {
            match *notification {
                SheetNotification::Animate { from, to } => {
                    if let Some(callback) = self.on_animate.as_mut() {
                        callback(from.as_i32(), to.as_i32());
                    }
                }
                SheetNotification::Changed(target) => {
                    if let Some(callback) = self.on_change.as_mut() {
                        callback(target.as_i32());
                    }
                }
                SheetNotification::Mounted | SheetNotification::Unmounted => {}
            }
        }
    }

    fn allows_close(&self) -> bool {
        self.config
            .as_ref()
            .is_some_and(|config| config.enable_pan_down_to_close)
    }

    /// Visible and not on the way out.
    fn is_open_or_opening(&self) -> bool {
        self.state.is_visible && !self.state.target.is_closed()
    }

    /// Start a transition toward `target`, mounting content first if needed.
    fn transition_to(&mut self, target: SnapTarget, out: &mut Vec<SheetNotification>) {
        if !self.animator.animate_to(target, &self.snap_points) {
            tracing::trace!("Transition to {:?} ignored: unknown snap index", target);
            return;
        }

        if !self.state.is_visible {
            self.state.is_visible = true;
            out.push(SheetNotification::Mounted);
        }

        tracing::debug!(
            "Sheet transition {} -> {}",
            self.state.current.as_i32(),
            target.as_i32()
        );

        self.state.target = target;
        out.push(SheetNotification::Animate {
            from: self.state.current,
            to: target,
        });
    }

    fn settle(&mut self, target: SnapTarget, out: &mut Vec<SheetNotification>) {
        self.state.current = target;
        self.state.target = target;
        out.push(SheetNotification::Changed(target));

        if target.is_closed() {
            self.state.is_visible = false;
            out.push(SheetNotification::Unmounted);
        }

        tracing::debug!("Sheet settled at {}", target.as_i32());
    }

    fn apply_config(&mut self, config: SheetConfig, out: &mut Vec<SheetNotification>) {
        self.animator.set_duration(config.animation_duration);
        self.animator.set_easing(config.easing);
        self.snap_points = SnapPoints::new(config.snap_points.clone(), self.snap_points.viewport_height());
        self.config = Some(config);

        let dropped_drag = self.gesture.take().is_some();
        if dropped_drag {
            tracing::trace!("Drag dropped by reconfiguration");
        }

        if !self.state.is_visible {
            self.animator.jump_to(SnapTarget::Closed, &self.snap_points);
            return;
        }

        // A held sheet has no transition left to settle it.
        let unsettled = !self.animator.is_animating() && self.state.current != self.state.target;

        match self.state.target {
            SnapTarget::Closed => {
                self.animator.animate_to(SnapTarget::Closed, &self.snap_points);
            }
            SnapTarget::Index(index) => match self.snap_points.highest_index() {
                None => self.transition_to(SnapTarget::Closed, out),
                Some(top) if index > top => self.transition_to(SnapTarget::Index(top), out),
                Some(_) if dropped_drag || unsettled => {
                    self.transition_to(SnapTarget::Index(index), out)
                }
                Some(_) => self.reposition(),
            },
        }
    }

    fn apply_resize(&mut self, viewport_height: f32) {
        self.snap_points.set_viewport_height(viewport_height);
        if self.gesture.is_none() {
            self.reposition();
        }
    }

    /// Keep the sheet on its target after snap heights moved.
    fn reposition(&mut self) {
        let target = self.state.target;
        if self.animator.is_animating() {
            self.animator.animate_to(target, &self.snap_points);
        } else {
            self.animator.jump_to(target, &self.snap_points);
        }
    }

    fn apply_present(&mut self, out: &mut Vec<SheetNotification>) {
        let Some(initial) = self
            .config
            .as_ref()
            .filter(|config| config.is_presentable())
            .map(|config| SnapTarget::Index(config.index))
        else {
            tracing::trace!("Present ignored: sheet not presentable");
            return;
        };

        let interrupted_drag = self.gesture.take().is_some();
        let redirect = self.animator.is_animating() && self.state.target != initial;

        if !self.is_open_or_opening() || redirect || interrupted_drag {
            self.transition_to(initial, out);
        }
    }

    fn apply_dismiss(&mut self, out: &mut Vec<SheetNotification>) {
        if !self.is_open_or_opening() {
            tracing::trace!("Dismiss ignored: already closed or closing");
            return;
        }
        self.gesture = None;
        self.transition_to(SnapTarget::Closed, out);
    }

    fn apply_snap(&mut self, index: usize, out: &mut Vec<SheetNotification>) {
        if !self.state.is_visible || !self.snap_points.contains(index) {
            tracing::trace!("Snap to {} ignored", index);
            return;
        }

        let target = SnapTarget::Index(index);
        let interrupted_drag = self.gesture.take().is_some();
        if self.state.target == target && !interrupted_drag {
            return;
        }

        self.transition_to(target, out);
    }

    fn apply_drag_start(&mut self, region: PanRegions) {
        let Some(config) = self.config.as_ref() else {
            return;
        };
        if region.is_empty() || !config.pan_regions().contains(region) {
            tracing::trace!("Drag ignored in disabled region {:?}", region);
            return;
        }
        let SnapTarget::Index(anchor) = self.state.target else {
            return;
        };
        if !self.state.is_visible {
            return;
        }

        // Grabbing mid-transition freezes the sheet where it is.
        self.animator.cancel();
        self.gesture = Some(GestureSession::begin(
            self.animator.translate_y(),
            anchor,
            region,
        ));
    }

    fn apply_drag_move(&mut self, delta_y: f32, velocity_y: f32) {
        let (Some(gesture), Some(config)) = (self.gesture.as_mut(), self.config.as_ref()) else {
            return;
        };

        let at_top = self.snap_points.highest_index() == Some(gesture.anchor());
        let projected = gesture.update(delta_y, velocity_y, &config.resistance(), at_top);

        let viewport = self.snap_points.viewport_height();
        let translate_y = projected.clamp(0.0, viewport);
        let backdrop_opacity = self.backdrop_for_offset(translate_y);

        tracing::trace!("Drag {} -> translate_y {}", delta_y, translate_y);

        self.animator.set_direct(AnimationTarget {
            translate_y,
            backdrop_opacity,
        });
    }

    /// Fully dimmed at or above the lowest snap point, fading out toward closed.
    fn backdrop_for_offset(&self, translate_y: f32) -> f32 {
        let shown = self.snap_points.viewport_height() - translate_y;
        match self.snap_points.height(0) {
            Some(lowest) if lowest > 0.0 => (shown / lowest).clamp(0.0, 1.0),
            _ if shown > 0.0 => 1.0,
            _ => 0.0,
        }
    }

    fn apply_drag_end(&mut self, delta_y: f32, velocity_y: f32, out: &mut Vec<SheetNotification>) {
        let (Some(gesture), Some(config)) = (self.gesture.take(), self.config.as_ref()) else {
            return;
        };

        let release = gesture.release(delta_y, velocity_y);
        let target = commit_decision(
            &release,
            &self.snap_points,
            &config.tuning,
            config.enable_pan_down_to_close,
        );

        tracing::debug!(
            "Drag released at {} (v={}) from {}: committing to {}",
            release.delta_y,
            release.velocity_y,
            release.anchor,
            target.as_i32()
        );

        self.transition_to(target, out);
    }

    fn apply_tick(&mut self, dt: f32, out: &mut Vec<SheetNotification>) {
        if self.gesture.is_some() {
            return;
        }
        if let Some(target) = self.animator.update(dt) {
            self.settle(target, out);
        }
    }
}
