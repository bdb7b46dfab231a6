use core::fmt;
use std::ops::{Add, Div, Sub};

/// A coordinate on a terrain grid. Both components are bytes, so grids are capped at
/// 256x256 cells and the arithmetic operators wrap around at that boundary.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Point {
    pub x: u8,
    pub y: u8,
}

impl Point {
    pub const fn new(x: u8, y: u8) -> Point {
        Point { x, y }
    }

    /// Straight-line distance to another point.
    pub fn euclidean_distance_to(&self, other: &Point) -> f64 {
        let dx = self.x as f64 - other.x as f64;
        let dy = self.y as f64 - other.y as f64;
        (dx * dx + dy * dy).sqrt()
    }

    /// Absolute per-axis differences to another point.
    pub fn axis_deltas(&self, other: &Point) -> (u32, u32) {
        (
            self.x.abs_diff(other.x) as u32,
            self.y.abs_diff(other.y) as u32,
        )
    }

    /// Moves the point by a signed offset. Unlike `+`, this refuses to wrap around the
    /// edge of the coordinate space and returns [None] instead.
    pub fn checked_offset(&self, dx: i8, dy: i8) -> Option<Point> {
        let x = self.x.checked_add_signed(dx)?;
        let y = self.y.checked_add_signed(dy)?;
        Some(Point::new(x, y))
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, rhs: Point) -> Point {
        Point::new(self.x.wrapping_add(rhs.x), self.y.wrapping_add(rhs.y))
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x.wrapping_sub(rhs.x), self.y.wrapping_sub(rhs.y))
    }
}

impl Div<u8> for Point {
    type Output = Point;

    fn div(self, rhs: u8) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

impl From<(u8, u8)> for Point {
    fn from((x, y): (u8, u8)) -> Point {
        Point::new(x, y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}
