//! Screen-space geometry primitives.
//!
//! All coordinates live in the shared virtual-screen plane: 32-bit signed,
//! with Y growing downward.  Displays to the left of or above the primary
//! one have negative coordinates.

use std::fmt;

/// Errors from geometric computations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeometryError {
    /// An operation that needs at least one point got none.
    #[error("invalid input: {0}")]
    InvalidInput(&'static str),
}

/// A point in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Pack both coordinates into one 64-bit value, X in the high half and
    /// Y in the low half.
    ///
    /// Each half holds the two's-complement bits of its coordinate, so
    /// negative values survive [`Point::unpack`] unchanged.
    pub fn pack(self) -> u64 {
        ((self.x as u32 as u64) << 32) | (self.y as u32 as u64)
    }

    /// Inverse of [`Point::pack`].
    pub fn unpack(packed: u64) -> Self {
        Self {
            x: (packed >> 32) as u32 as i32,
            y: (packed & 0xFFFF_FFFF) as u32 as i32,
        }
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// A display bounding box.
///
/// `right` and `bottom` are exclusive edges, as the OS reports them: a
/// 1920×1080 display at the origin is `Rect::new(0, 0, 1920, 1080)`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rect {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl Rect {
    pub fn new(left: i32, top: i32, right: i32, bottom: i32) -> Self {
        Self {
            left,
            top,
            right,
            bottom,
        }
    }

    pub fn width(&self) -> i64 {
        self.right as i64 - self.left as i64
    }

    pub fn height(&self) -> i64 {
        self.bottom as i64 - self.top as i64
    }

    /// Midpoint of the rectangle, truncating toward zero.
    ///
    /// The sums are taken in 64 bits; the halved result always lies between
    /// the two edges, so it fits back into `i32`.
    pub fn center(&self) -> Point {
        Point {
            x: ((self.left as i64 + self.right as i64) / 2) as i32,
            y: ((self.top as i64 + self.bottom as i64) / 2) as i32,
        }
    }

    /// Whether `point` lies inside the rectangle (right/bottom exclusive).
    pub fn contains(&self, point: Point) -> bool {
        point.x >= self.left && point.x < self.right && point.y >= self.top && point.y < self.bottom
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {}, {}) {}x{}",
            self.left,
            self.top,
            self.right,
            self.bottom,
            self.width(),
            self.height()
        )
    }
}

/// Arithmetic mean of `points`.
///
/// Fails on an empty slice instead of dividing by zero.
pub fn centroid(points: &[Point]) -> Result<(f64, f64), GeometryError> {
    if points.is_empty() {
        return Err(GeometryError::InvalidInput("centroid of an empty point set"));
    }
    let (sum_x, sum_y) = points.iter().fold((0.0, 0.0), |(sx, sy), p| {
        (sx + p.x as f64, sy + p.y as f64)
    });
    let n = points.len() as f64;
    Ok((sum_x / n, sum_y / n))
}
