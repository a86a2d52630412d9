use serde::{Deserialize, Serialize};

use crate::errors::{ProbeError, ProbeResult};

/// Native coordinate space of the content, in logical units.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Canvas {
    width: f64,
    height: f64,
}

impl Canvas {
    pub fn new(width: f64, height: f64) -> ProbeResult<Self> {
        if !(width > 0.0 && height > 0.0) || !width.is_finite() || !height.is_finite() {
            return Err(ProbeError::Config(format!(
                "canvas must have positive finite dimensions, got {width}x{height}"
            )));
        }
        Ok(Self { width, height })
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn contains(&self, point: LogicalPoint) -> bool {
        (0.0..=self.width).contains(&point.x) && (0.0..=self.height).contains(&point.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogicalPoint {
    pub x: f64,
    pub y: f64,
}

impl LogicalPoint {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenPoint {
    pub x: i32,
    pub y: i32,
}

impl ScreenPoint {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Axis-aligned rectangle in host screen pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScreenRect {
    pub left: i32,
    pub top: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenRect {
    pub const fn new(left: i32, top: i32, width: i32, height: i32) -> Self {
        Self { left, top, width, height }
    }

    pub fn right(&self) -> i32 {
        self.left + self.width
    }

    pub fn bottom(&self) -> i32 {
        self.top + self.height
    }

    /// Edge-inclusive containment.
    pub fn contains(&self, point: ScreenPoint) -> bool {
        (self.left..=self.right()).contains(&point.x) && (self.top..=self.bottom()).contains(&point.y)
    }

    pub fn center(&self) -> ScreenPoint {
        ScreenPoint::new(self.left + self.width / 2, self.top + self.height / 2)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canvas_rejects_degenerate_sizes() {
        assert!(Canvas::new(550.0, 400.0).is_ok());
        assert!(Canvas::new(0.0, 400.0).is_err());
        assert!(Canvas::new(550.0, -1.0).is_err());
        assert!(Canvas::new(f64::NAN, 400.0).is_err());
        assert!(Canvas::new(f64::INFINITY, 400.0).is_err());
    }

    #[test]
    fn rect_containment_includes_edges() {
        let rect = ScreenRect::new(10, 20, 100, 50);
        assert!(rect.contains(ScreenPoint::new(10, 20)));
        assert!(rect.contains(ScreenPoint::new(110, 70)));
        assert!(!rect.contains(ScreenPoint::new(111, 70)));
        assert!(!rect.contains(ScreenPoint::new(9, 20)));
        assert_eq!(rect.center(), ScreenPoint::new(60, 45));
    }
}
