//! Canvas coordinates.
//!
//! A [`Position`] is measured from the visual centre of the canvas, with
//! **positive y pointing up**. Screen space has y growing downward, so the
//! conversion flips the sign of y:
//!
//! ```text
//! screen.x = center.x + x
//! screen.y = center.y - y
//! ```

use serde::{Deserialize, Serialize};
use std::ops::{Add, Sub};

/// Integer canvas coordinate relative to the canvas centre (y up)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const ZERO: Position = Position { x: 0, y: 0 };

    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset_by(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x.saturating_add(dx),
            y: self.y.saturating_add(dy),
        }
    }

    /// Map to screen space given the screen-space centre of the canvas
    pub fn to_screen(self, center: (f64, f64)) -> (f64, f64) {
        (center.0 + f64::from(self.x), center.1 - f64::from(self.y))
    }

    /// Map a screen-space point back to a canvas position, rounding to the nearest unit
    pub fn from_screen(point: (f64, f64), center: (f64, f64)) -> Self {
        Self {
            x: (point.0 - center.0).round() as i32,
            y: (center.1 - point.1).round() as i32,
        }
    }
}

impl Add for Position {
    type Output = Position;

    fn add(self, rhs: Position) -> Position {
        self.offset_by(rhs.x, rhs.y)
    }
}

impl Sub for Position {
    type Output = Position;

    fn sub(self, rhs: Position) -> Position {
        Position {
            x: self.x.saturating_sub(rhs.x),
            y: self.y.saturating_sub(rhs.y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_screen_mapping_flips_y() {
        let p = Position::new(10, -20);
        assert_eq!(p.to_screen((100.0, 100.0)), (110.0, 120.0));
        assert_eq!(Position::from_screen((110.0, 120.0), (100.0, 100.0)), p);
    }

    #[test]
    fn test_arithmetic() {
        let p = Position::new(3, 4) + Position::new(1, -1);
        assert_eq!(p, Position::new(4, 3));
        assert_eq!(p - Position::new(4, 3), Position::ZERO);
        assert_eq!(Position::new(i32::MAX, 0).offset_by(1, 0).x, i32::MAX);
    }

    #[test]
    fn test_serializes_as_two_field_record() {
        let json = serde_json::to_string(&Position::new(10, -20)).unwrap();
        assert_eq!(json, r#"{"x":10,"y":-20}"#);
    }
}
