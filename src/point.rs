use std::{cmp::Ordering, fmt};

use rand::{distributions::{Distribution, Standard, Uniform}, Rng};

use crate::{Axis, Error, KdPoint, Result};


/// An immutable point in the plane.
/// Equality is exact coordinate equality, there is no epsilon.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    x: f64,
    y: f64
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self{x, y}
    }

    pub fn x(&self) -> f64 {
        self.x
    }

    pub fn y(&self) -> f64 {
        self.y
    }

    /// Get the coordinate along `axis`
    pub fn coord(&self, axis: Axis) -> f64 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y
        }
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Euclidean distance.  Tour lengths are sums of these, so this is always the
    /// real sqrt and never a squared stand in.
    pub fn distance_to(&self, other: &Self) -> f64 {
        self.distance_squared_to(other).sqrt()
    }

    pub fn distance_squared_to(&self, other: &Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx*dx + dy*dy
    }
}

impl KdPoint for Point {
    type Distance = f64;

    fn sqdist(&self, other: &Self) -> f64 {
        self.distance_squared_to(other)
    }

    fn validate(&self) -> Result<()> {
        if self.is_finite() { Ok(()) } else { Err(Error::InvalidPoint{x: self.x, y: self.y}) }
    }

    fn cmp(&self, other: &Self, axis: Axis) -> Ordering {
        // only finite points make it into a tree, so the fallback is unreachable there
        self.coord(axis).partial_cmp(&other.coord(axis)).unwrap_or(Ordering::Equal)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self{x, y}
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Uniformly random points in the unit square
impl Distribution<Point> for Standard {
    fn sample<R>(&self, rng: &mut R) -> Point where R: Rng + ?Sized {
        Point{x: rng.gen(), y: rng.gen()}
    }
}

/// Uniformly random points with both coordinates drawn from the same range
impl Distribution<Point> for Uniform<f64> {
    fn sample<R>(&self, rng: &mut R) -> Point where R: Rng + ?Sized {
        let x = Distribution::<f64>::sample(self, rng);
        let y = Distribution::<f64>::sample(self, rng);
        Point{x, y}
    }
}
