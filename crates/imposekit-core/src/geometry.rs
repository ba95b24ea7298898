//! Geometric primitives for the layout editor.
//!
//! All coordinates are in millimeters with the origin at the bottom-left
//! corner of the sheet, +X to the right and +Y up. Rotation is restricted
//! to quarter turns; a slot's *logical* box never changes under rotation,
//! only the *rendered* box does (it shares the logical box's center).

use serde::{Deserialize, Serialize};
use std::fmt;

/// A point in millimeter space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    /// Creates a new point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.2}, {:.2})", self.x, self.y)
    }
}

/// An axis-aligned rectangle in millimeter space.
///
/// `(x, y)` is the bottom-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    /// Creates a new rectangle.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// The right edge (`x + w`).
    pub fn right(&self) -> f64 {
        self.x + self.w
    }

    /// The top edge (`y + h`).
    pub fn top(&self) -> f64 {
        self.y + self.h
    }

    /// The center point.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.w / 2.0, self.y + self.h / 2.0)
    }

    /// Returns the rectangle translated by (dx, dy).
    pub fn translated(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.w, self.h)
    }

    /// Checks whether the point lies inside the rectangle (inclusive),
    /// expanded by `tolerance` on every side.
    pub fn contains(&self, p: Point, tolerance: f64) -> bool {
        p.x >= self.x - tolerance
            && p.x <= self.right() + tolerance
            && p.y >= self.y - tolerance
            && p.y <= self.top() + tolerance
    }

    /// Checks whether two rectangles overlap.
    pub fn intersects(&self, other: &Rect) -> bool {
        self.x < other.right() && self.right() > other.x && self.y < other.top() && self.top() > other.y
    }
}

/// A quarter-turn rotation applied to a slot for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u16", into = "u16")]
pub enum Rotation {
    #[default]
    R0,
    R90,
    R180,
    R270,
}

impl Rotation {
    /// Rotation angle in degrees.
    pub fn degrees(&self) -> u16 {
        match self {
            Rotation::R0 => 0,
            Rotation::R90 => 90,
            Rotation::R180 => 180,
            Rotation::R270 => 270,
        }
    }

    /// Builds a rotation from degrees, normalizing modulo 360.
    /// Non-quarter-turn angles yield `None`.
    pub fn from_degrees(deg: i32) -> Option<Self> {
        match deg.rem_euclid(360) {
            0 => Some(Rotation::R0),
            90 => Some(Rotation::R90),
            180 => Some(Rotation::R180),
            270 => Some(Rotation::R270),
            _ => None,
        }
    }

    /// True when the rotation swaps the rendered width and height.
    pub fn is_sideways(&self) -> bool {
        matches!(self, Rotation::R90 | Rotation::R270)
    }

    /// Composes two rotations.
    pub fn plus(&self, other: Rotation) -> Rotation {
        Rotation::from_degrees(self.degrees() as i32 + other.degrees() as i32)
            .unwrap_or(Rotation::R0)
    }
}

impl From<Rotation> for u16 {
    fn from(r: Rotation) -> u16 {
        r.degrees()
    }
}

impl TryFrom<u16> for Rotation {
    type Error = String;

    fn try_from(deg: u16) -> std::result::Result<Self, Self::Error> {
        Rotation::from_degrees(deg as i32).ok_or_else(|| format!("Invalid rotation: {}", deg))
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}

/// Computes the rendered bounding box of a logical box under rotation.
///
/// For 90°/270° the rendered width/height are the logical height/width; the
/// rendered box is centered on the same center as the logical box, so
/// rotating a slot in place never shifts its center. The rest of the system
/// (snapping, grouping, spacing) relies on this contract when reasoning
/// about visible edges.
pub fn render_box(logical: &Rect, rotation: Rotation) -> Rect {
    if !rotation.is_sideways() {
        return *logical;
    }
    let center = logical.center();
    Rect::new(
        center.x - logical.h / 2.0,
        center.y - logical.w / 2.0,
        logical.h,
        logical.w,
    )
}
