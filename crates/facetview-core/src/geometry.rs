use std::fmt;

use serde::{Deserialize, Serialize};

/// A 2D point in world coordinates on the horizontal X/Z plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub z: f64,
}

impl Point {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }
}

/// An axis-aligned bounding box with inclusive corners.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn from_points(points: &[Point]) -> Option<Self> {
        if points.is_empty() {
            return None;
        }
        let mut min_x = f64::MAX;
        let mut min_z = f64::MAX;
        let mut max_x = f64::MIN;
        let mut max_z = f64::MIN;
        for p in points {
            min_x = min_x.min(p.x);
            min_z = min_z.min(p.z);
            max_x = max_x.max(p.x);
            max_z = max_z.max(p.z);
        }
        Some(Self {
            min: Point::new(min_x, min_z),
            max: Point::new(max_x, max_z),
        })
    }

    pub fn contains_point(&self, p: &Point) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.z >= self.min.z && p.z <= self.max.z
    }
}

/// An integer rectangle in world space covering `min_x..min_x + size_x` by
/// `min_z..min_z + size_z` (half-open).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rect2i {
    pub min_x: i32,
    pub min_z: i32,
    pub size_x: i32,
    pub size_z: i32,
}

impl Rect2i {
    /// Negative sizes collapse to an empty rectangle.
    pub fn new(min_x: i32, min_z: i32, size_x: i32, size_z: i32) -> Self {
        Self {
            min_x,
            min_z,
            size_x: size_x.max(0),
            size_z: size_z.max(0),
        }
    }

    pub fn from_min_max(min_x: i32, min_z: i32, max_x: i32, max_z: i32) -> Self {
        Self::new(min_x, min_z, max_x - min_x, max_z - min_z)
    }

    /// Exclusive.
    pub fn max_x(&self) -> i32 {
        self.min_x + self.size_x
    }

    /// Exclusive.
    pub fn max_z(&self) -> i32 {
        self.min_z + self.size_z
    }

    pub fn area(&self) -> usize {
        self.size_x as usize * self.size_z as usize
    }

    pub fn is_empty(&self) -> bool {
        self.size_x == 0 || self.size_z == 0
    }

    pub fn contains(&self, x: i32, z: i32) -> bool {
        x >= self.min_x && x < self.max_x() && z >= self.min_z && z < self.max_z()
    }

    /// Row-major index of a world coordinate inside this rectangle.
    pub fn index_of(&self, x: i32, z: i32) -> Option<usize> {
        if !self.contains(x, z) {
            return None;
        }
        let lx = (x - self.min_x) as usize;
        let lz = (z - self.min_z) as usize;
        Some(lz * self.size_x as usize + lx)
    }
}

impl fmt::Display for Rect2i {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}, {}]..[{}, {}]",
            self.min_x,
            self.min_z,
            self.max_x(),
            self.max_z()
        )
    }
}
