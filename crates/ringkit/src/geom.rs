use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Sum of absolute coordinate differences.
    pub fn manhattan(&self, other: Point) -> f64 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }

    pub fn is_empty(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Translate to `translate`, then rotate by `rotate` degrees about the local origin.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Transform {
    pub translate: Point,
    pub rotate: f64,
}

impl Transform {
    pub const IDENTITY: Transform = Transform {
        translate: Point::ORIGIN,
        rotate: 0.0,
    };

    pub fn new(translate: Point, rotate: f64) -> Self {
        Self { translate, rotate }
    }

    /// Maps a point from the group's local space into its parent's space.
    pub fn apply(&self, p: Point) -> Point {
        let (sin, cos) = self.rotate.to_radians().sin_cos();
        Point::new(
            self.translate.x + p.x * cos - p.y * sin,
            self.translate.y + p.x * sin + p.y * cos,
        )
    }

    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "translate({},{}) rotate({})",
            self.translate.x, self.translate.y, self.rotate
        )
    }
}
