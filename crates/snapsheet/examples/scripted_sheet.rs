//! Replays a scripted sheet session and logs every lifecycle step.
//!
//! The sheet is described in JSON, the same way a host would load it from its
//! own settings. Run with `RUST_LOG=snapsheet=debug` to see the controller's
//! internal decisions as well.

use snapsheet::{PanRegions, SheetConfig, SheetController, SheetEvent, SheetNotification};

const SHEET_JSON: &str = r#"{
    "snap_points": ["25%", "50%", "90%"],
    "index": 0,
    "over_drag_resistance_factor": 2.5
}"#;

const FRAME: f32 = 1.0 / 60.0;

fn run(sheet: &mut SheetController, label: &str, events: Vec<SheetEvent>) {
    tracing::info!("-- {}", label);
    for event in events {
        for notification in sheet.handle_event(event) {
            log_notification(notification);
        }
    }

    // Let any transition play out.
    for _ in 0..60 {
        for notification in sheet.handle_event(SheetEvent::Tick { dt: FRAME }) {
            log_notification(notification);
        }
    }

    tracing::info!(
        "   phase={:?} translate_y={:.1} backdrop={:.2}",
        sheet.phase(),
        sheet.translate_y(),
        sheet.backdrop_opacity()
    );
}

fn log_notification(notification: SheetNotification) {
    match notification {
        SheetNotification::Mounted => tracing::info!("   mount content"),
        SheetNotification::Animate { from, to } => {
            tracing::info!("   animate {} -> {}", from.as_i32(), to.as_i32())
        }
        SheetNotification::Changed(target) => tracing::info!("   settled at {}", target.as_i32()),
        SheetNotification::Unmounted => tracing::info!("   unmount content"),
    }
}

fn drag(delta_y: f32, velocity_y: f32) -> Vec<SheetEvent> {
    let steps = 6;
    let mut events = vec![SheetEvent::DragStart {
        region: PanRegions::HANDLE,
    }];
    events.extend((1..=steps).map(|i| SheetEvent::DragMove {
        delta_y: delta_y * i as f32 / steps as f32,
        velocity_y,
    }));
    events.push(SheetEvent::DragEnd {
        delta_y,
        velocity_y,
    });
    events
}

fn main() -> Result<(), serde_json::Error> {
    snapsheet_core::logging::init();

    let config: SheetConfig = serde_json::from_str(SHEET_JSON)?;
    let mut sheet = SheetController::with_config(config, 800.0);

    run(&mut sheet, "present", vec![SheetEvent::Present]);
    run(&mut sheet, "flick up", drag(-120.0, -1.2));
    run(&mut sheet, "tiny nudge (cancelled)", drag(12.0, 0.02));
    run(&mut sheet, "expand", vec![SheetEvent::Expand]);
    run(&mut sheet, "snap to 25%", vec![SheetEvent::SnapToPosition("25%".into())]);
    run(&mut sheet, "pull down to close", drag(60.0, 0.05));
    run(&mut sheet, "dismiss again (no-op)", vec![SheetEvent::Dismiss]);

    Ok(())
}
