pub mod error;
pub mod point;
pub mod rect;
pub mod kdtree;
pub mod tour;

use std::{cmp::Ordering, fmt};

use num_traits::Zero;

pub use error::{Error, Result};
pub use kdtree::KdTree;
pub use point::Point;
pub use rect::Rect;
pub use tour::{Canvas, Strategy, Tour};



/// Which coordinate a KD tree node splits on.
/// `X` is a vertical splitting line, `Y` a horizontal one.  The root splits on `X`
/// and every level below alternates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Axis {
    X,
    Y
}

impl Axis {
    /// The axis used by the children of a node splitting on `self`
    pub fn next(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X
        }
    }
}



pub trait KdPoint: Sized + PartialEq + Clone + fmt::Debug {
    type Distance: PartialOrd + Zero + Copy;
    fn sqdist(&self, other: &Self) -> Self::Distance;
    /// Reject points that can't be ordered along every axis
    fn validate(&self) -> Result<()>;
    fn cmp(&self, other: &Self, axis: Axis) -> Ordering;
}

pub trait KdRegion: Sized + Clone {
    type Point: KdPoint;
    /// Split the region by the line through `point` perpendicular to `axis`,
    /// returning the (less, greater or equal) halves
    fn split(&self, point: &Self::Point, axis: Axis) -> (Self, Self);
    /// Lower bound on the sqdist from `point` to anything inside the region,
    /// zero if `point` is inside
    fn min_sqdist(&self, point: &Self::Point) -> <Self::Point as KdPoint>::Distance;
}



pub enum WalkDecision {
    Continue,
    SkipChildren,
    Stop
}
