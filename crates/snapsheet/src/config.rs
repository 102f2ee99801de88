//! Sheet configuration.
//!
//! # Example
//!
//! ```
//! use snapsheet::config::SheetConfig;
//!
//! let config = SheetConfig::new(["25%", "50%", "90%"])
//!     .index(1)
//!     .pan_down_to_close(false)
//!     .resistance_factor(3.0);
//!
//! assert_eq!(config.snap_points.len(), 3);
//! assert!(config.is_presentable());
//! ```

use crate::animation::{DEFAULT_DURATION, EasingFunction};
use crate::gesture::{DEFAULT_RESISTANCE_FACTOR, PanRegions, Resistance, UPWARD_RESISTANCE_MULTIPLIER};
use crate::snap_point::SnapPoint;

/// Constants of the release-time commit decision.
///
/// These are tuned by feel; override them rather than editing the defaults.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetTuning {
    /// Fraction of the current snap height a drag must cover to commit.
    pub distance_ratio: f32,
    /// Upper bound on the distance threshold, in pixels.
    pub max_distance: f32,
    /// Release velocity that commits regardless of distance.
    pub velocity_threshold: f32,
    /// Fraction of the current snap height past which a downward drag closes.
    pub close_ratio: f32,
    /// Multiplier on the resistance factor for upward drags.
    pub upward_resistance_multiplier: f32,
}

impl Default for SheetTuning {
    fn default() -> Self {
        Self {
            distance_ratio: 0.2,
            max_distance: 50.0,
            velocity_threshold: 0.3,
            close_ratio: 0.25,
            upward_resistance_multiplier: UPWARD_RESISTANCE_MULTIPLIER,
        }
    }
}

impl SheetTuning {
    /// Drag distance needed to commit from a snap point of `height` pixels.
    pub fn distance_threshold(&self, height: f32) -> f32 {
        (height * self.distance_ratio).min(self.max_distance)
    }

    /// Drag distance past which a downward drag closes the sheet.
    pub fn close_distance(&self, height: f32) -> f32 {
        height * self.close_ratio
    }
}

/// Configuration for one sheet.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SheetConfig {
    /// Resting heights, lowest first.
    pub snap_points: Vec<SnapPoint>,
    /// Snap index used by `present()`.
    pub index: usize,
    /// Whether a downward drag, backdrop tap or back press may close the sheet.
    pub enable_pan_down_to_close: bool,
    /// Whether drags on the content area move the sheet.
    pub enable_content_panning_gesture: bool,
    /// Whether drags on the handle move the sheet.
    pub enable_handle_panning_gesture: bool,
    /// Divisor damping raw drag distance.
    pub over_drag_resistance_factor: f32,
    /// Transition duration in seconds.
    pub animation_duration: f32,
    /// Transition easing.
    pub easing: EasingFunction,
    /// Commit decision constants.
    pub tuning: SheetTuning,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            snap_points: Vec::new(),
            index: 0,
            enable_pan_down_to_close: true,
            enable_content_panning_gesture: true,
            enable_handle_panning_gesture: true,
            over_drag_resistance_factor: DEFAULT_RESISTANCE_FACTOR,
            animation_duration: DEFAULT_DURATION,
            easing: EasingFunction::default(),
            tuning: SheetTuning::default(),
        }
    }
}

impl SheetConfig {
    /// Create a configuration with the given snap points and defaults otherwise.
    pub fn new<I, P>(snap_points: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<SnapPoint>,
    {
        Self {
            snap_points: snap_points.into_iter().map(Into::into).collect(),
            ..Self::default()
        }
    }

    /// Set the initial snap index.
    pub fn index(mut self, index: usize) -> Self {
        self.index = index;
        self
    }

    /// Allow or forbid closing by drag, backdrop tap or back press.
    pub fn pan_down_to_close(mut self, enabled: bool) -> Self {
        self.enable_pan_down_to_close = enabled;
        self
    }

    /// Allow or forbid drags that start on the content area.
    pub fn content_panning(mut self, enabled: bool) -> Self {
        self.enable_content_panning_gesture = enabled;
        self
    }

    /// Allow or forbid drags that start on the handle.
    pub fn handle_panning(mut self, enabled: bool) -> Self {
        self.enable_handle_panning_gesture = enabled;
        self
    }

    /// Set the over-drag resistance factor.
    pub fn resistance_factor(mut self, factor: f32) -> Self {
        self.over_drag_resistance_factor = factor;
        self
    }

    /// Set the transition duration in seconds.
    pub fn animation_duration(mut self, seconds: f32) -> Self {
        self.animation_duration = seconds;
        self
    }

    /// Set the transition easing.
    pub fn easing(mut self, easing: EasingFunction) -> Self {
        self.easing = easing;
        self
    }

    /// Replace the commit decision constants.
    pub fn tuning(mut self, tuning: SheetTuning) -> Self {
        self.tuning = tuning;
        self
    }

    /// Check whether `present()` can open a sheet with this configuration.
    pub fn is_presentable(&self) -> bool {
        self.index < self.snap_points.len()
    }

    /// Regions that accept drags.
    pub fn pan_regions(&self) -> PanRegions {
        let mut regions = PanRegions::NONE;
        regions.set(PanRegions::CONTENT, self.enable_content_panning_gesture);
        regions.set(PanRegions::HANDLE, self.enable_handle_panning_gesture);
        regions
    }

    /// Resistance derived from the factor and tuning.
    pub fn resistance(&self) -> Resistance {
        Resistance {
            factor: self.over_drag_resistance_factor,
            upward_multiplier: self.tuning.upward_resistance_multiplier,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = SheetConfig::default();

        assert!(config.snap_points.is_empty());
        assert_eq!(config.index, 0);
        assert!(config.enable_pan_down_to_close);
        assert_eq!(config.over_drag_resistance_factor, 2.5);
        assert_eq!(config.animation_duration, 0.3);
        assert_eq!(config.pan_regions(), PanRegions::ALL);
        assert!(!config.is_presentable());
    }

    #[test]
    fn test_new_accepts_mixed_descriptors() {
        let config = SheetConfig::new(vec![SnapPoint::from("40%"), SnapPoint::Pixels(500.0)]);
        assert_eq!(config.snap_points[0], SnapPoint::Percent(40));
        assert_eq!(config.snap_points[1], SnapPoint::Pixels(500.0));
    }

    #[test]
    fn test_out_of_range_index_not_presentable() {
        let config = SheetConfig::new(["50%"]).index(1);
        assert!(!config.is_presentable());
    }

    #[test]
    fn test_pan_regions() {
        let config = SheetConfig::new(["50%"]).content_panning(false);
        assert_eq!(config.pan_regions(), PanRegions::HANDLE);

        let config = config.handle_panning(false);
        assert!(config.pan_regions().is_empty());
    }

    #[test]
    fn test_thresholds() {
        let tuning = SheetTuning::default();

        assert_eq!(tuning.distance_threshold(200.0), 40.0);
        assert_eq!(tuning.distance_threshold(720.0), 50.0);
        assert_eq!(tuning.distance_threshold(0.0), 0.0);
        assert_eq!(tuning.close_distance(200.0), 50.0);
    }

    #[test]
    fn test_resistance_uses_tuning() {
        let config = SheetConfig::new(["50%"]).resistance_factor(2.0);
        let resistance = config.resistance();

        assert_eq!(resistance.factor, 2.0);
        assert_eq!(resistance.project(-10.0, false), -10.0);
    }
}
