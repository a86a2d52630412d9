// Canvas-to-screen coordinate mapping.
use crate::errors::{ProbeError, ProbeResult};
use crate::perception::types::{Canvas, LogicalPoint, ScreenPoint, ScreenRect};

/// Maps a point on the logical canvas to the host screen pixel it is drawn at.
///
/// The canvas is scaled uniformly to fit inside `bounds` and centred, so one
/// axis may carry a letterbox or pillarbox offset. Coordinates are rounded to
/// the nearest pixel with halves rounded away from zero.
///
/// `bounds` is read fresh on every call; callers must not reuse a stale rect
/// across a resize or rotation.
pub fn map_point(canvas: &Canvas, bounds: &ScreenRect, point: LogicalPoint) -> ProbeResult<ScreenPoint> {
    if bounds.width <= 0 || bounds.height <= 0 {
        return Err(ProbeError::InvalidBounds {
            width: bounds.width,
            height: bounds.height,
        });
    }

    let bounds_w = f64::from(bounds.width);
    let bounds_h = f64::from(bounds.height);

    let stretch_x = bounds_w / canvas.width();
    let stretch_y = bounds_h / canvas.height();
    let scale = stretch_x.min(stretch_y);

    let rendered_w = canvas.width() * scale;
    let rendered_h = canvas.height() * scale;
    let offset_x = (bounds_w - rendered_w) / 2.0;
    let offset_y = (bounds_h - rendered_h) / 2.0;

    let x = (f64::from(bounds.left) + offset_x + point.x * scale).round() as i32;
    let y = (f64::from(bounds.top) + offset_y + point.y * scale).round() as i32;
    Ok(ScreenPoint::new(x, y))
}
