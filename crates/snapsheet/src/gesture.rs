//! Drag gesture tracking for the sheet.
//!
//! A [`GestureSession`] lives from pointer-down to release. It remembers where
//! the sheet was when the drag started and turns raw pointer travel into damped
//! visual travel, so the user has to pull further than the sheet moves.

use bitflags::bitflags;

/// Default divisor applied to raw drag distance.
pub const DEFAULT_RESISTANCE_FACTOR: f32 = 2.5;

/// Multiplier applied to the resistance factor for upward drags.
pub const UPWARD_RESISTANCE_MULTIPLIER: f32 = 0.5;

bitflags! {
    /// Regions of the sheet that accept drag input.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PanRegions: u8 {
        /// No region accepts drags.
        const NONE    = 0;
        /// The scrollable content area.
        const CONTENT = 1 << 0;
        /// The grab handle above the content.
        const HANDLE  = 1 << 1;
        /// Every region.
        const ALL     = Self::CONTENT.bits() | Self::HANDLE.bits();
    }
}

impl Default for PanRegions {
    fn default() -> Self {
        PanRegions::ALL
    }
}

/// Shapes raw drag distance into visual travel.
///
/// Downward drags are divided by the full factor; upward drags by
/// `factor * upward_multiplier`, so expanding feels lighter than closing.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Resistance {
    /// Divisor for downward drags.
    pub factor: f32,
    /// Multiplier on `factor` for upward drags.
    pub upward_multiplier: f32,
}

impl Default for Resistance {
    fn default() -> Self {
        Self {
            factor: DEFAULT_RESISTANCE_FACTOR,
            upward_multiplier: UPWARD_RESISTANCE_MULTIPLIER,
        }
    }
}

impl Resistance {
    /// Create a resistance with the given downward factor.
    pub fn new(factor: f32) -> Self {
        Self {
            factor,
            ..Self::default()
        }
    }

    fn divisor(value: f32, fallback: f32) -> f32 {
        if value.is_finite() && value > 0.0 {
            value
        } else {
            fallback
        }
    }

    /// Project raw `delta_y` to visual travel.
    ///
    /// `at_top` means the sheet is already at its highest snap point, where
    /// upward travel stops entirely.
    pub fn project(&self, delta_y: f32, at_top: bool) -> f32 {
        let factor = Self::divisor(self.factor, DEFAULT_RESISTANCE_FACTOR);

        if delta_y > 0.0 {
            delta_y / factor
        } else if delta_y < 0.0 && !at_top {
            let upward = Self::divisor(self.upward_multiplier, UPWARD_RESISTANCE_MULTIPLIER);
            delta_y / (factor * upward)
        } else {
            0.0
        }
    }
}

/// Final sample of a drag, handed to the commit decision.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureRelease {
    /// Snap index the drag is measured against.
    pub anchor: usize,
    /// Cumulative raw drag distance (positive is downward).
    pub delta_y: f32,
    /// Release velocity (positive is downward).
    pub velocity_y: f32,
}

/// State of one continuous drag.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    /// Offset of the sheet when the drag began.
    base_offset: f32,
    /// Cumulative raw pointer travel since the drag began.
    delta_y: f32,
    /// Most recent velocity sample.
    velocity_y: f32,
    /// Snap index the drag started from (or was heading to).
    anchor: usize,
    /// Region that started the drag.
    region: PanRegions,
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}

impl GestureSession {
    /// Start a drag with the sheet currently at `base_offset`.
    pub fn begin(base_offset: f32, anchor: usize, region: PanRegions) -> Self {
        Self {
            base_offset,
            delta_y: 0.0,
            velocity_y: 0.0,
            anchor,
            region,
        }
    }

    /// Offset captured at gesture start.
    pub fn base_offset(&self) -> f32 {
        self.base_offset
    }

    /// Raw cumulative travel.
    pub fn delta_y(&self) -> f32 {
        self.delta_y
    }

    /// Last velocity sample.
    pub fn velocity_y(&self) -> f32 {
        self.velocity_y
    }

    /// Snap index the drag is anchored to.
    pub fn anchor(&self) -> usize {
        self.anchor
    }

    /// Region the drag started in.
    pub fn region(&self) -> PanRegions {
        self.region
    }

    /// Record a sample and return the projected offset.
    ///
    /// The result is `base_offset` plus resistance-shaped travel; callers clamp
    /// it to the viewport.
    pub fn update(
        &mut self,
        delta_y: f32,
        velocity_y: f32,
        resistance: &Resistance,
        at_top: bool,
    ) -> f32 {
        self.delta_y = finite_or_zero(delta_y);
        self.velocity_y = finite_or_zero(velocity_y);
        self.projected_offset(resistance, at_top)
    }

    /// Offset for the current sample.
    pub fn projected_offset(&self, resistance: &Resistance, at_top: bool) -> f32 {
        self.base_offset + resistance.project(self.delta_y, at_top)
    }

    /// End the drag with its final sample.
    pub fn release(mut self, delta_y: f32, velocity_y: f32) -> GestureRelease {
        self.delta_y = finite_or_zero(delta_y);
        self.velocity_y = finite_or_zero(velocity_y);
        GestureRelease {
            anchor: self.anchor,
            delta_y: self.delta_y,
            velocity_y: self.velocity_y,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_downward_drag_uses_full_factor() {
        let resistance = Resistance::default();
        assert_eq!(resistance.project(50.0, false), 20.0);
        assert_eq!(resistance.project(50.0, true), 20.0);
    }

    #[test]
    fn test_upward_drag_uses_half_factor() {
        let resistance = Resistance::default();
        assert_eq!(resistance.project(-50.0, false), -40.0);
    }

    #[test]
    fn test_upward_drag_stops_at_top() {
        let resistance = Resistance::default();
        assert_eq!(resistance.project(-50.0, true), 0.0);
        assert_eq!(resistance.project(0.0, false), 0.0);
    }

    #[test]
    fn test_bad_factor_falls_back() {
        let resistance = Resistance::new(0.0);
        assert_eq!(resistance.project(25.0, false), 10.0);

        let resistance = Resistance::new(f32::NAN);
        assert_eq!(resistance.project(25.0, false), 10.0);
    }

    #[test]
    fn test_custom_factor() {
        let resistance = Resistance::new(4.0);
        assert_eq!(resistance.project(40.0, false), 10.0);
        assert_eq!(resistance.project(-40.0, false), -20.0);
    }

    #[test]
    fn test_session_projects_from_base() {
        let resistance = Resistance::default();
        let mut session = GestureSession::begin(600.0, 0, PanRegions::HANDLE);

        assert_eq!(session.update(25.0, 0.1, &resistance, false), 610.0);
        assert_eq!(session.update(-25.0, -0.1, &resistance, false), 580.0);
        assert_eq!(session.delta_y(), -25.0);
        assert_eq!(session.region(), PanRegions::HANDLE);
    }

    #[test]
    fn test_session_ignores_non_finite_samples() {
        let resistance = Resistance::default();
        let mut session = GestureSession::begin(300.0, 1, PanRegions::CONTENT);

        assert_eq!(session.update(f32::NAN, f32::INFINITY, &resistance, false), 300.0);
        assert_eq!(session.velocity_y(), 0.0);
    }

    #[test]
    fn test_release_carries_anchor() {
        let session = GestureSession::begin(400.0, 1, PanRegions::ALL);
        let release = session.release(60.0, 0.05);

        assert_eq!(release.anchor, 1);
        assert_eq!(release.delta_y, 60.0);
        assert_eq!(release.velocity_y, 0.05);
    }

    #[test]
    fn test_pan_regions_default_all() {
        let regions = PanRegions::default();
        assert!(regions.contains(PanRegions::CONTENT));
        assert!(regions.contains(PanRegions::HANDLE));
    }
}
