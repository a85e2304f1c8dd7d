use std::fmt;

use crate::{point::Point, Axis, Error, KdRegion, Result};


/// Axis aligned closed rectangle [xmin, xmax] x [ymin, ymax].
/// Bounds may be infinite, which is how the KD tree represents the regions of
/// subtrees when no bounded domain is known.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    xmin: f64,
    ymin: f64,
    xmax: f64,
    ymax: f64
}

impl Rect {
    /// The whole plane
    pub const UNBOUNDED: Self = Self{xmin: f64::NEG_INFINITY, ymin: f64::NEG_INFINITY, xmax: f64::INFINITY, ymax: f64::INFINITY};
    /// [0, 1] x [0, 1]
    pub const UNIT: Self = Self{xmin: 0.0, ymin: 0.0, xmax: 1.0, ymax: 1.0};

    /// Construct a rectangle, returning `Error::InvertedBounds` unless
    /// xmin <= xmax and ymin <= ymax
    pub fn try_new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Result<Self> {
        if xmin <= xmax && ymin <= ymax {
            Ok(Self{xmin, ymin, xmax, ymax})
        } else {
            Err(Error::InvertedBounds{xmin, ymin, xmax, ymax})
        }
    }

    /// Construct a rectangle from bounds the caller already knows are ordered.
    ///
    /// # Panics
    /// If xmin > xmax or ymin > ymax, or any bound is NaN.
    pub fn new(xmin: f64, ymin: f64, xmax: f64, ymax: f64) -> Self {
        match Self::try_new(xmin, ymin, xmax, ymax) {
            Ok(rect) => rect,
            Err(e) => panic!("{}", e)
        }
    }

    pub fn xmin(&self) -> f64 { self.xmin }
    pub fn ymin(&self) -> f64 { self.ymin }
    pub fn xmax(&self) -> f64 { self.xmax }
    pub fn ymax(&self) -> f64 { self.ymax }

    pub fn contains(&self, point: &Point) -> bool {
        self.xmin <= point.x() && point.x() <= self.xmax
            && self.ymin <= point.y() && point.y() <= self.ymax
    }

    /// Squared distance from `point` to the closest point of the rectangle.
    /// Zero inside, otherwise the point is clamped onto the rectangle per axis.
    /// This never exceeds the squared distance to any point inside, which is what
    /// makes it safe to prune with.
    pub fn squared_distance_to(&self, point: &Point) -> f64 {
        let dx = if point.x() < self.xmin {
            self.xmin - point.x()
        } else if point.x() > self.xmax {
            point.x() - self.xmax
        } else { 0.0 };
        let dy = if point.y() < self.ymin {
            self.ymin - point.y()
        } else if point.y() > self.ymax {
            point.y() - self.ymax
        } else { 0.0 };
        dx*dx + dy*dy
    }

    pub fn distance_to(&self, point: &Point) -> f64 {
        self.squared_distance_to(point).sqrt()
    }
}

impl KdRegion for Rect {
    type Point = Point;

    fn split(&self, point: &Point, axis: Axis) -> (Self, Self) {
        let mut sub0 = *self;
        let mut sub1 = *self;
        match axis {
            Axis::X => {
                sub0.xmax = point.x();
                sub1.xmin = point.x();
            }
            Axis::Y => {
                sub0.ymax = point.y();
                sub1.ymin = point.y();
            }
        }
        (sub0, sub1)
    }

    fn min_sqdist(&self, point: &Point) -> f64 {
        self.squared_distance_to(point)
    }
}

impl Default for Rect {
    fn default() -> Self {
        Self::UNBOUNDED
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}] x [{}, {}]", self.xmin, self.xmax, self.ymin, self.ymax)
    }
}

#[cfg(test)]
mod tests {
    use rand::{distributions::{Distribution, Uniform}, Rng};

    use super::*;

    const TRIALS: usize = 200;
    const SAMPLES: usize = 50;

    #[test]
    fn inside_is_zero() {
        let r = Rect::new(0.0, 0.0, 2.0, 1.0);
        assert_eq!(r.squared_distance_to(&Point::new(1.0, 0.5)), 0.0);
        assert_eq!(r.squared_distance_to(&Point::new(2.0, 1.0)), 0.0);
        assert!(r.contains(&Point::new(0.0, 1.0)));
        assert!(!r.contains(&Point::new(-0.1, 0.5)));
    }

    #[test]
    fn outside_clamps() {
        let r = Rect::new(0.0, 0.0, 2.0, 1.0);
        // straight out along one axis
        assert_eq!(r.squared_distance_to(&Point::new(5.0, 0.5)), 9.0);
        assert_eq!(r.squared_distance_to(&Point::new(1.0, -2.0)), 4.0);
        // off a corner
        assert_eq!(r.squared_distance_to(&Point::new(5.0, 5.0)), 9.0 + 16.0);
        assert_eq!(r.distance_to(&Point::new(-3.0, 5.0)), 5.0);
    }

    #[test]
    fn unbounded() {
        let mut rng = rand::thread_rng();
        let dist = Uniform::new_inclusive(-1e9, 1e9);
        for _ in 0..TRIALS {
            let p: Point = dist.sample(&mut rng);
            assert_eq!(Rect::UNBOUNDED.squared_distance_to(&p), 0.0);
        }
        let (left, right) = Rect::UNBOUNDED.split(&Point::new(3.0, 4.0), Axis::X);
        assert_eq!(left.squared_distance_to(&Point::new(5.0, 100.0)), 4.0);
        assert_eq!(right.squared_distance_to(&Point::new(5.0, 100.0)), 0.0);
        assert_eq!(Rect::default(), Rect::UNBOUNDED);
    }

    #[test]
    fn bad_bounds() {
        assert!(matches!(Rect::try_new(1.0, 0.0, 0.0, 1.0), Err(Error::InvertedBounds{..})));
        assert!(Rect::try_new(0.0, 1.0, 1.0, 0.0).is_err());
        assert!(Rect::try_new(0.0, f64::NAN, 1.0, 1.0).is_err());
        assert!(Rect::try_new(0.0, 0.0, 0.0, 0.0).is_ok());
    }

    #[test]
    #[should_panic]
    fn new_panics_on_bad_bounds() {
        Rect::new(0.0, 0.0, -1.0, 1.0);
    }

    #[test]
    fn split_halves() {
        let r = Rect::UNIT;
        let p = Point::new(0.25, 0.75);
        let (bottom, top) = r.split(&p, Axis::Y);
        assert_eq!(bottom, Rect::new(0.0, 0.0, 1.0, 0.75));
        assert_eq!(top, Rect::new(0.0, 0.75, 1.0, 1.0));
        let (left, right) = r.split(&p, Axis::X);
        assert_eq!(left, Rect::new(0.0, 0.0, 0.25, 1.0));
        assert_eq!(right, Rect::new(0.25, 0.0, 1.0, 1.0));
    }

    #[test]
    fn lower_bound() {
        let mut rng = rand::thread_rng();
        let corner_dist = Uniform::new_inclusive(-5.0, 5.0);
        let query_dist = Uniform::new_inclusive(-20.0, 20.0);
        for _ in 0..TRIALS {
            let (a, b): (Point, Point) = (corner_dist.sample(&mut rng), corner_dist.sample(&mut rng));
            let r = Rect::new(a.x().min(b.x()), a.y().min(b.y()), a.x().max(b.x()), a.y().max(b.y()));
            let q: Point = query_dist.sample(&mut rng);
            let bound = r.squared_distance_to(&q);
            for _ in 0..SAMPLES {
                let inside = Point::new(rng.gen_range(r.xmin()..=r.xmax()), rng.gen_range(r.ymin()..=r.ymax()));
                assert!(bound <= q.distance_squared_to(&inside), "{} is not a lower bound for {} in {}", bound, q, r);
            }
            // the bound is attained by clamping q onto r
            let clamped = Point::new(q.x().clamp(r.xmin(), r.xmax()), q.y().clamp(r.ymin(), r.ymax()));
            assert_eq!(bound, q.distance_squared_to(&clamped));
        }
    }

    #[test]
    fn display() {
        assert_eq!(Rect::UNIT.to_string(), "[0, 1] x [0, 1]");
    }
}
