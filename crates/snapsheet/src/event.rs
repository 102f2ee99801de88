//! Inputs to and outputs from the sheet controller.

use crate::config::SheetConfig;
use crate::gesture::PanRegions;
use crate::snap_point::{SnapPoint, SnapTarget};

/// Everything the controller reacts to.
#[derive(Debug, Clone, PartialEq)]
pub enum SheetEvent {
    /// Replace the configuration wholesale.
    Configure(SheetConfig),
    /// The viewport changed height.
    Resize {
        /// New viewport height in pixels.
        viewport_height: f32,
    },
    /// Show at the configured initial index.
    Present,
    /// Animate to closed.
    Dismiss,
    /// Move to the highest snap index.
    Expand,
    /// Move to snap index 0.
    Collapse,
    /// Move to a specific snap index.
    SnapToIndex(usize),
    /// Move to the snap index whose descriptor matches exactly.
    SnapToPosition(SnapPoint),
    /// A drag began in the given region.
    DragStart {
        /// Region under the pointer.
        region: PanRegions,
    },
    /// A drag sample: cumulative travel and current velocity.
    DragMove {
        /// Cumulative travel since the drag began (positive is downward).
        delta_y: f32,
        /// Current velocity (positive is downward).
        velocity_y: f32,
    },
    /// The pointer was released.
    DragEnd {
        /// Final cumulative travel.
        delta_y: f32,
        /// Release velocity.
        velocity_y: f32,
    },
    /// The backdrop was tapped.
    BackdropTap,
    /// The platform back action fired.
    BackPressed,
    /// Advance time by `dt` seconds.
    Tick {
        /// Elapsed seconds since the previous tick.
        dt: f32,
    },
}

/// Lifecycle notifications, in the order they happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SheetNotification {
    /// Content must be mounted; emitted before an opening transition starts.
    Mounted,
    /// A transition is starting.
    Animate {
        /// Index the sheet is leaving.
        from: SnapTarget,
        /// Index the sheet is heading to.
        to: SnapTarget,
    },
    /// A transition settled at this target.
    Changed(SnapTarget),
    /// Content may be unmounted; emitted once a closing transition completes.
    Unmounted,
}
