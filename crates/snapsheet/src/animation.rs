//! Animation engine for the sheet's continuous outputs.
//!
//! Two values are driven: the sheet's vertical offset and the backdrop opacity.
//! A committed transition eases both in parallel over a fixed duration; a live
//! gesture instead assigns the offset directly, which cancels any transition in
//! flight. Only one driver is ever active.
//!
//! # Example
//!
//! ```
//! use snapsheet::animation::SheetAnimator;
//! use snapsheet::snap_point::{SnapPoints, SnapTarget};
//!
//! let points = SnapPoints::new(vec!["50%".into()], 800.0);
//! let mut animator = SheetAnimator::new(points.closed_translate_y());
//!
//! animator.animate_to(SnapTarget::Index(0), &points);
//! assert_eq!(animator.update(0.15), None);
//! assert_eq!(animator.update(0.2), Some(SnapTarget::Index(0)));
//! assert_eq!(animator.translate_y(), 400.0);
//! ```

use snapsheet_core::profiling::profile_function;

use crate::snap_point::{SnapPoints, SnapTarget};

/// Default transition duration in seconds.
pub const DEFAULT_DURATION: f32 = 0.3;

/// Easing functions for transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum EasingFunction {
    /// Linear interpolation
    Linear,
    /// Quadratic ease out (slow end)
    QuadOut,
    /// Quadratic ease in and out
    QuadInOut,
    /// Cubic ease out
    #[default]
    CubicOut,
    /// Cubic ease in-out
    CubicInOut,
}

impl EasingFunction {
    /// Apply the easing function to a normalized time value (0.0 to 1.0).
    pub fn apply(&self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            EasingFunction::Linear => t,
            EasingFunction::QuadOut => t * (2.0 - t),
            EasingFunction::QuadInOut => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            EasingFunction::CubicOut => {
                let t = t - 1.0;
                t * t * t + 1.0
            }
            EasingFunction::CubicInOut => {
                let t = t * 2.0;
                if t < 1.0 {
                    0.5 * t * t * t
                } else {
                    let t = t - 2.0;
                    0.5 * (t * t * t + 2.0)
                }
            }
        }
    }
}

/// Animation state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationState {
    /// Animation is running
    Running,
    /// Animation is completed
    Completed,
}

/// A single eased value moving from `from` to `to`.
#[derive(Debug, Clone)]
pub struct Animation {
    /// Start value
    from: f32,
    /// End value
    to: f32,
    /// Duration in seconds
    duration: f32,
    /// Elapsed time in seconds
    elapsed: f32,
    /// Easing function
    easing: EasingFunction,
    /// Animation state
    state: AnimationState,
}

impl Animation {
    /// Create a new animation between two values.
    pub fn new(from: f32, to: f32) -> Self {
        Self {
            from,
            to,
            duration: DEFAULT_DURATION,
            elapsed: 0.0,
            easing: EasingFunction::default(),
            state: AnimationState::Running,
        }
    }

    /// Set the duration in seconds.
    pub fn duration(mut self, duration: f32) -> Self {
        self.duration = duration.max(0.0);
        self
    }

    /// Set the easing function.
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Get the end value.
    pub fn target(&self) -> f32 {
        self.to
    }

    /// Get the current value.
    pub fn value(&self) -> f32 {
        if self.state == AnimationState::Completed || self.duration <= 0.0 {
            return self.to;
        }

        let t = (self.elapsed / self.duration).clamp(0.0, 1.0);
        self.from + (self.to - self.from) * self.easing.apply(t)
    }

    /// Get the current state.
    pub fn state(&self) -> AnimationState {
        self.state
    }

    /// Check if the animation has finished.
    pub fn is_complete(&self) -> bool {
        self.state == AnimationState::Completed
    }

    /// Update the animation by delta time.
    ///
    /// Returns true if the animation is still running.
    pub fn update(&mut self, delta_time: f32) -> bool {
        if self.state == AnimationState::Completed {
            return false;
        }

        self.elapsed += delta_time.max(0.0);

        if self.elapsed >= self.duration {
            self.elapsed = self.duration;
            self.state = AnimationState::Completed;
            return false;
        }

        true
    }
}

/// The continuous values the engine drives.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct AnimationTarget {
    /// Vertical offset of the sheet from the top of the viewport.
    pub translate_y: f32,
    /// Backdrop opacity (0.0 to 1.0).
    pub backdrop_opacity: f32,
}

impl AnimationTarget {
    /// Resting values for `target`, `None` for an unknown snap index.
    pub fn resting(target: SnapTarget, snap_points: &SnapPoints) -> Option<Self> {
        let translate_y = snap_points.translate_y(target)?;
        let backdrop_opacity = if target.is_closed() { 0.0 } else { 1.0 };
        Some(Self {
            translate_y,
            backdrop_opacity,
        })
    }
}

#[derive(Debug, Clone)]
struct Transition {
    target: SnapTarget,
    translate_y: Animation,
    backdrop_opacity: Animation,
}

/// Drives [`AnimationTarget`] toward a committed snap target.
#[derive(Debug, Clone)]
pub struct SheetAnimator {
    values: AnimationTarget,
    transition: Option<Transition>,
    duration: f32,
    easing: EasingFunction,
}

impl SheetAnimator {
    /// Create an animator resting closed at `closed_translate_y`.
    pub fn new(closed_translate_y: f32) -> Self {
        Self {
            values: AnimationTarget {
                translate_y: closed_translate_y,
                backdrop_opacity: 0.0,
            },
            transition: None,
            duration: DEFAULT_DURATION,
            easing: EasingFunction::default(),
        }
    }

    /// Set the transition duration in seconds for subsequent transitions.
    pub fn set_duration(&mut self, duration: f32) {
        self.duration = if duration.is_finite() {
            duration.max(0.0)
        } else {
            DEFAULT_DURATION
        };
    }

    /// Set the easing for subsequent transitions.
    pub fn set_easing(&mut self, easing: EasingFunction) {
        self.easing = easing;
    }

    /// Current values.
    pub fn values(&self) -> AnimationTarget {
        self.values
    }

    /// Current vertical offset.
    pub fn translate_y(&self) -> f32 {
        self.values.translate_y
    }

    /// Current backdrop opacity.
    pub fn backdrop_opacity(&self) -> f32 {
        self.values.backdrop_opacity
    }

    /// Check if a transition is in flight.
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Target of the transition in flight.
    pub fn animating_to(&self) -> Option<SnapTarget> {
        self.transition.as_ref().map(|t| t.target)
    }

    /// Start easing toward `target` from the current values.
    ///
    /// Supersedes any transition already in flight. Returns `false` (and leaves
    /// everything untouched) when `target` names an unknown snap index.
    pub fn animate_to(&mut self, target: SnapTarget, snap_points: &SnapPoints) -> bool {
        let Some(end) = AnimationTarget::resting(target, snap_points) else {
            return false;
        };

        self.transition = Some(Transition {
            target,
            translate_y: Animation::new(self.values.translate_y, end.translate_y)
                .duration(self.duration)
                .easing(self.easing),
            backdrop_opacity: Animation::new(self.values.backdrop_opacity, end.backdrop_opacity)
                .duration(self.duration)
                .easing(self.easing),
        });
        true
    }

    /// Place the values at `target` immediately, cancelling any transition.
    pub fn jump_to(&mut self, target: SnapTarget, snap_points: &SnapPoints) -> bool {
        let Some(end) = AnimationTarget::resting(target, snap_points) else {
            return false;
        };
        self.transition = None;
        self.values = end;
        true
    }

    /// Assign values directly, as a gesture does. Cancels any transition.
    pub fn set_direct(&mut self, values: AnimationTarget) {
        self.transition = None;
        self.values = values;
    }

    /// Cancel the transition in flight, freezing the values where they are.
    ///
    /// Returns the target that was being animated to.
    pub fn cancel(&mut self) -> Option<SnapTarget> {
        self.transition.take().map(|t| t.target)
    }

    /// Advance the transition by `dt` seconds.
    ///
    /// Returns the target once both values have finished; the values then sit
    /// exactly on the target.
    pub fn update(&mut self, dt: f32) -> Option<SnapTarget> {
        profile_function!();

        let transition = self.transition.as_mut()?;

        transition.translate_y.update(dt);
        transition.backdrop_opacity.update(dt);

        self.values = AnimationTarget {
            translate_y: transition.translate_y.value(),
            backdrop_opacity: transition.backdrop_opacity.value(),
        };

        if transition.translate_y.is_complete() && transition.backdrop_opacity.is_complete() {
            return self.transition.take().map(|t| t.target);
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points() -> SnapPoints {
        SnapPoints::new(vec!["25%".into(), "50%".into(), "90%".into()], 800.0)
    }

    #[test]
    fn test_linear_easing() {
        let easing = EasingFunction::Linear;
        assert_eq!(easing.apply(0.0), 0.0);
        assert_eq!(easing.apply(0.5), 0.5);
        assert_eq!(easing.apply(1.0), 1.0);
    }

    #[test]
    fn test_easing_endpoints() {
        for easing in [
            EasingFunction::QuadOut,
            EasingFunction::QuadInOut,
            EasingFunction::CubicOut,
            EasingFunction::CubicInOut,
        ] {
            assert!(easing.apply(0.0).abs() < 1e-6, "{:?}", easing);
            assert!((easing.apply(1.0) - 1.0).abs() < 1e-6, "{:?}", easing);
            assert!((easing.apply(2.0) - 1.0).abs() < 1e-6, "{:?}", easing);
        }
    }

    #[test]
    fn test_animation_update() {
        let mut anim = Animation::new(0.0, 1.0)
            .duration(1.0)
            .easing(EasingFunction::Linear);

        assert_eq!(anim.value(), 0.0);

        assert!(anim.update(0.5));
        assert!((anim.value() - 0.5).abs() < 0.01);

        assert!(!anim.update(0.5));
        assert_eq!(anim.value(), 1.0);
        assert_eq!(anim.state(), AnimationState::Completed);
    }

    #[test]
    fn test_zero_duration_completes_immediately() {
        let mut anim = Animation::new(3.0, 7.0).duration(0.0);
        assert_eq!(anim.value(), 7.0);
        assert!(!anim.update(0.0));
        assert!(anim.is_complete());
    }

    #[test]
    fn test_animator_starts_closed() {
        let animator = SheetAnimator::new(800.0);
        assert_eq!(animator.translate_y(), 800.0);
        assert_eq!(animator.backdrop_opacity(), 0.0);
        assert!(!animator.is_animating());
    }

    #[test]
    fn test_animate_to_index_completes_on_target() {
        let points = points();
        let mut animator = SheetAnimator::new(points.closed_translate_y());

        assert!(animator.animate_to(SnapTarget::Index(2), &points));
        assert_eq!(animator.animating_to(), Some(SnapTarget::Index(2)));

        assert_eq!(animator.update(0.1), None);
        let mid = animator.values();
        assert!(mid.translate_y < 800.0 && mid.translate_y > 80.0);
        assert!(mid.backdrop_opacity > 0.0 && mid.backdrop_opacity < 1.0);

        assert_eq!(animator.update(0.1), None);
        assert_eq!(animator.update(0.2), Some(SnapTarget::Index(2)));
        assert_eq!(animator.translate_y(), 80.0);
        assert_eq!(animator.backdrop_opacity(), 1.0);
        assert!(!animator.is_animating());
        assert_eq!(animator.update(0.1), None);
    }

    #[test]
    fn test_animate_to_unknown_index_is_rejected() {
        let points = points();
        let mut animator = SheetAnimator::new(points.closed_translate_y());

        assert!(!animator.animate_to(SnapTarget::Index(9), &points));
        assert!(!animator.is_animating());
        assert_eq!(animator.translate_y(), 800.0);
    }

    #[test]
    fn test_redirect_starts_from_current_values() {
        let points = points();
        let mut animator = SheetAnimator::new(points.closed_translate_y());

        animator.animate_to(SnapTarget::Index(2), &points);
        animator.update(0.15);
        let mid = animator.translate_y();

        animator.animate_to(SnapTarget::Index(0), &points);
        assert_eq!(animator.translate_y(), mid);
        assert_eq!(animator.update(0.3), Some(SnapTarget::Index(0)));
        assert_eq!(animator.translate_y(), 600.0);
    }

    #[test]
    fn test_set_direct_cancels_transition() {
        let points = points();
        let mut animator = SheetAnimator::new(points.closed_translate_y());

        animator.animate_to(SnapTarget::Index(1), &points);
        animator.set_direct(AnimationTarget {
            translate_y: 500.0,
            backdrop_opacity: 0.5,
        });

        assert!(!animator.is_animating());
        assert_eq!(animator.update(1.0), None);
        assert_eq!(animator.translate_y(), 500.0);
    }

    #[test]
    fn test_jump_and_cancel() {
        let points = points();
        let mut animator = SheetAnimator::new(points.closed_translate_y());

        assert!(animator.jump_to(SnapTarget::Index(1), &points));
        assert_eq!(animator.translate_y(), 400.0);
        assert_eq!(animator.backdrop_opacity(), 1.0);

        animator.animate_to(SnapTarget::Closed, &points);
        assert_eq!(animator.cancel(), Some(SnapTarget::Closed));
        assert_eq!(animator.cancel(), None);
    }
}
