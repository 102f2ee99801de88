//! Snapsheet - a draggable, snap-point modal sheet controller.
//!
//! This crate owns the interactive core of a bottom sheet:
//! - Snap points as viewport percentages or absolute heights
//! - Resistance-shaped drag tracking
//! - Velocity-aware release decisions (step, close or snap back)
//! - Eased transitions for the sheet offset and backdrop opacity
//! - An imperative lifecycle: present, dismiss, expand, collapse, snap
//!
//! Rendering, input delivery and content scrolling belong to the host. The
//! controller consumes normalized drag samples and time steps and reports
//! where the sheet is and what just happened.
//!
//! ## Quick Start
//!
//! ```rust
//! use snapsheet::{PanRegions, SheetConfig, SheetController, SheetPhase};
//!
//! let mut sheet = SheetController::with_config(SheetConfig::new(["25%", "50%", "90%"]), 800.0)
//!     .on_change(|index| println!("settled at {index}"));
//!
//! sheet.present();
//! sheet.tick(0.3);
//!
//! // A short, slow pull down from the lowest snap point closes the sheet.
//! sheet.begin_drag(PanRegions::HANDLE);
//! sheet.drag(60.0, 0.05);
//! sheet.end_drag(60.0, 0.05);
//! sheet.tick(0.3);
//!
//! assert_eq!(sheet.phase(), SheetPhase::Closed);
//! ```

pub mod animation;
pub mod config;
pub mod controller;
pub mod event;
pub mod gesture;
pub mod snap_point;

pub use animation::{AnimationTarget, EasingFunction, SheetAnimator};
pub use config::{SheetConfig, SheetTuning};
pub use controller::{SheetController, SheetPhase, SheetState, commit_decision};
pub use event::{SheetEvent, SheetNotification};
pub use gesture::{GestureRelease, GestureSession, PanRegions, Resistance};
pub use snap_point::{SnapPoint, SnapPointError, SnapPoints, SnapTarget};
