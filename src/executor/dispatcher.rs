// Scenario step dispatcher.
use std::time::Duration;

use crate::errors::ProbeResult;
use crate::executor::coordinator::map_point;
use crate::executor::input::InputDevice;
use crate::perception::traits::SurfaceLocator;
use crate::perception::types::{Canvas, ScreenPoint, ScreenRect};
use crate::scenario::state::Step;

/// Performs one step. Surface bounds are looked up fresh for every step so a
/// moved or resized player is still hit where the canvas is drawn now.
pub async fn dispatch(
    step: &Step,
    canvas: &Canvas,
    locator: &dyn SurfaceLocator,
    device: &dyn InputDevice,
) -> ProbeResult<()> {
    match step {
        Step::Tap { at } => {
            let bounds = locator.bounds().await?;
            let target = map_point(canvas, &bounds, *at)?;
            warn_outside(&bounds, target);
            tracing::info!(logical = ?at, screen = ?target, "tap");
            device.tap(target).await
        }
        Step::Drag { from, to, steps } => {
            let bounds = locator.bounds().await?;
            let start = map_point(canvas, &bounds, *from)?;
            let end = map_point(canvas, &bounds, *to)?;
            warn_outside(&bounds, start);
            warn_outside(&bounds, end);
            tracing::info!(from = ?start, to = ?end, steps, "drag");
            device.drag(start, end, *steps).await
        }
        Step::Key { key } => {
            tracing::info!(key = %key, "key press");
            device.press_key(*key).await
        }
        Step::Pause { ms } => {
            tokio::time::sleep(Duration::from_millis(*ms)).await;
            Ok(())
        }
    }
}

fn warn_outside(bounds: &ScreenRect, point: ScreenPoint) {
    if !bounds.contains(point) {
        tracing::warn!(bounds = ?bounds, point = ?point, "input lands outside the player surface");
    }
}
