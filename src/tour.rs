use std::fmt;

use log::{debug, trace, warn};

use crate::{kdtree::KdTree, point::Point, rect::Rect, Error, KdPoint, Result};

/// Index of the first node inserted, which stays the start of the tour forever
const START: usize = 0;

/// How `Tour::insert_nearest` finds the tour point closest to a new point.
/// Fixed when the tour is created.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Scan every point in the tour
    #[default]
    Naive,
    /// Ask a KD tree holding every point in the tour
    KdTree
}

/// Receives a tour for drawing.  See `Tour::draw`.
pub trait Canvas {
    fn point(&mut self, p: &Point);
    fn line(&mut self, a: &Point, b: &Point);
}

#[derive(Debug, Clone)]
enum Locator {
    Naive,
    Indexed(KdTree)
}

#[derive(Debug, Clone)]
struct Node {
    point: Point,
    next: usize
}

/// A closed tour built by the nearest insertion heuristic: each new point goes right after
/// the point already in the tour that is closest to it.
/// Nodes live in an arena and link to their successor by index, the last successor being the
/// start again, so a tour with one point is its own successor.  Points are never removed.
#[derive(Debug, Clone)]
pub struct Tour {
    nodes: Vec<Node>,
    locator: Locator
}

impl Tour {
    pub fn new(strategy: Strategy) -> Self {
        debug!("new tour, strategy {:?}", strategy);
        let locator = match strategy {
            Strategy::Naive => Locator::Naive,
            Strategy::KdTree => Locator::Indexed(KdTree::new())
        };
        Self{nodes: Vec::new(), locator}
    }

    /// Create a KD tree backed tour for points known to lie in `bounds`.
    /// Inserting a point outside `bounds` fails with `Error::OutOfBounds`.
    pub fn with_bounds(bounds: Rect) -> Self {
        debug!("new tour, strategy KdTree, bounds {}", bounds);
        Self{nodes: Vec::new(), locator: Locator::Indexed(KdTree::with_bounds(bounds))}
    }

    /// Create a tour visiting `points` in exactly the given order, mostly for debugging.
    /// Fails if any point is invalid.
    pub fn from_cycle(points: impl IntoIterator<Item = Point>, strategy: Strategy) -> Result<Self> {
        let mut res = Self::new(strategy);
        for point in points {
            point.validate()?;
            let idx = res.nodes.len();
            if let Some(last) = res.nodes.last_mut() {
                last.next = idx;
            }
            res.nodes.push(Node{point, next: START});
            if let Locator::Indexed(kdt) = &mut res.locator {
                kdt.insert(point)?;
            }
        }
        Ok(res)
    }

    pub fn strategy(&self) -> Strategy {
        match self.locator {
            Locator::Naive => Strategy::Naive,
            Locator::Indexed(_) => Strategy::KdTree
        }
    }

    /// Get the number of points in the tour, counting repeated points every time
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Total length of the closed tour, including the edge from the last point back to the start.
    /// Zero for tours with fewer than two points.
    pub fn length(&self) -> f64 {
        self.edges().map(|(a, b)|a.distance_to(b)).sum()
    }

    /// Insert `point` right after the tour point closest to it.
    /// If several tour points are equally close, `Strategy::Naive` takes the first in tour order and
    /// `Strategy::KdTree` the first the tree visits (see `KdTree::nearest`).
    /// Fails without changing the tour if the point is invalid, or lies outside the bounds
    /// of a tour made by `Tour::with_bounds`.
    pub fn insert_nearest(&mut self, point: Point) -> Result<()> {
        point.validate()?;
        if let Locator::Indexed(kdt) = &self.locator {
            if !kdt.bounds().contains(&point) {
                return Err(Error::OutOfBounds);
            }
        }
        let idx = self.nodes.len();
        match idx {
            0 => self.nodes.push(Node{point, next: START}),
            1 => {
                self.nodes[START].next = idx;
                self.nodes.push(Node{point, next: START});
            }
            _ => {
                let anchor = self.nearest_node(&point)?;
                trace!("inserting {} after {} ({:?})", point, self.nodes[anchor].point, self.strategy());
                let next = self.nodes[anchor].next;
                self.nodes.push(Node{point, next});
                self.nodes[anchor].next = idx;
            }
        }
        if let Locator::Indexed(kdt) = &mut self.locator {
            kdt.insert(point)?;
        }
        Ok(())
    }

    /// Insert points in order with `Tour::insert_nearest`, stopping at the first one that fails.
    /// Returns how many were inserted.
    pub fn try_extend(&mut self, points: impl IntoIterator<Item = Point>) -> Result<usize> {
        let mut count = 0;
        for point in points {
            self.insert_nearest(point)?;
            count += 1;
        }
        Ok(count)
    }

    /// Iterate over the points once around the tour, beginning at the start
    pub fn iter(&self) -> impl Iterator<Item = &Point> + '_ {
        self.cycle().map(|i|&self.nodes[i].point)
    }

    /// Iterate over every edge once around the tour, including the closing edge back to the start.
    /// A tour with one point has a single edge from the point to itself.
    pub fn edges(&self) -> impl Iterator<Item = (&Point, &Point)> + '_ {
        self.cycle().map(|i|{
            let node = &self.nodes[i];
            (&node.point, &self.nodes[node.next].point)
        })
    }

    /// Draw every point and the edge leaving it, once around the tour.  Does nothing for an empty tour.
    pub fn draw(&self, canvas: &mut impl Canvas) {
        for (a, b) in self.edges() {
            canvas.point(a);
            canvas.line(a, b);
        }
    }

    fn cycle(&self) -> Cycle<'_> {
        Cycle{nodes: &self.nodes, start: if self.nodes.is_empty() { None } else { Some(START) }, iter: START}
    }

    /// Find the node to splice a new point after.  Only called with at least two nodes.
    fn nearest_node(&self, point: &Point) -> Result<usize> {
        match &self.locator {
            Locator::Naive => {
                let mut best = START;
                let mut best_dist = self.nodes[START].point.distance_to(point);
                for i in self.cycle() {
                    let dist = self.nodes[i].point.distance_to(point);
                    if dist < best_dist {
                        best = i;
                        best_dist = dist;
                    }
                }
                Ok(best)
            }
            Locator::Indexed(kdt) => {
                // the tree only knows points, so look for the first node holding that point
                let found = kdt.nearest(point)?.and_then(|nearest|
                    self.cycle().find(|&i|self.nodes[i].point == *nearest));
                debug_assert!(found.is_some(), "KD tree returned a point that is not in the tour");
                if found.is_none() {
                    warn!("KD tree and tour are out of sync, inserting {} after the start", point);
                }
                Ok(found.unwrap_or(START))
            }
        }
    }

    #[cfg(test)]
    fn check(&self) -> std::result::Result<(), TourError> {
        use TourError::*;
        if self.is_empty() {
            return Ok(());
        }
        let mut seen = vec![false; self.len()];
        let mut i = START;
        for _ in 0..self.len() {
            if seen[i] {
                return Err(ShortCycle(i));
            }
            seen[i] = true;
            i = self.nodes.get(i).ok_or(BrokenLink(i))?.next;
            if i >= self.len() {
                return Err(BrokenLink(i));
            }
        }
        if i != START {
            return Err(LongCycle);
        }
        if let Locator::Indexed(kdt) = &self.locator {
            if self.iter().any(|p|!kdt.contains(p)) || kdt.len() > self.len() {
                return Err(IndexMismatch);
            }
        }
        Ok(())
    }
}

impl Default for Tour {
    fn default() -> Self {
        Self::new(Strategy::default())
    }
}

/// One point per line in tour order, or `(empty)`
impl fmt::Display for Tour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "(empty)");
        }
        for point in self.iter() {
            writeln!(f, "{}", point)?;
        }
        Ok(())
    }
}

/// Walks node indices from the start until it comes back around
struct Cycle<'a> {
    nodes: &'a [Node],
    start: Option<usize>,
    iter: usize
}

impl<'a> Iterator for Cycle<'a> {
    type Item = usize;
    fn next(&mut self) -> Option<usize> {
        let start = self.start?;
        let res = self.iter;
        self.iter = self.nodes[res].next;
        if self.iter == start { self.start = None }
        Some(res)
    }
}

#[cfg(test)]
#[derive(Debug, PartialEq)]
enum TourError {
    /// Came back to a node before visiting all of them
    ShortCycle(usize),
    /// Still not back at the start after visiting every node
    LongCycle,
    BrokenLink(usize),
    IndexMismatch
}
