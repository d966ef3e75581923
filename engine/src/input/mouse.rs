//! Pointer Input Module
//!
//! Pointer buttons, screen positions and scroll deltas shared by mouse and
//! touch input. Positions are raw pixels with the origin at the top-left of
//! the viewport.

use glam::Vec2;

/// Pointer button identifiers, independent of windowing system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (left mouse, single tap)
    Left,
    Middle,
    /// Secondary button, used for camera rotation
    Right,
    /// Back/forward and vendor buttons, by platform index
    Other(u16),
}

/// Screen point in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn to_vec2(self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    /// Pixel motion from `previous` to this point, as `(dx, dy)`.
    pub fn delta_from(&self, previous: &Position) -> (f32, f32) {
        let d = self.to_vec2() - previous.to_vec2();
        (d.x, d.y)
    }

    /// Span between two points, used for pinch gestures.
    pub fn distance(&self, other: &Position) -> f32 {
        self.to_vec2().distance(other.to_vec2())
    }
}

/// Wheel motion in notches. Positive `y` pulls the camera back.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ScrollDelta {
    pub x: f32,
    pub y: f32,
}

/// Pixels of trackpad scroll counted as one wheel notch
const PIXELS_PER_NOTCH: f64 = 100.0;

impl ScrollDelta {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Convert a trackpad pixel delta to notches.
    pub fn from_pixels(x: f64, y: f64) -> Self {
        Self::new((x / PIXELS_PER_NOTCH) as f32, (y / PIXELS_PER_NOTCH) as f32)
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }
}
