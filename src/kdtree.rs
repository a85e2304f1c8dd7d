use std::cmp::Ordering;

use num_traits::Zero;

use crate::{rect::Rect, Axis, Error, KdPoint, KdRegion, Result, WalkDecision};

type Distance<R> = <<R as KdRegion>::Point as KdPoint>::Distance;

#[derive(Debug, Clone)]
struct Node<R: KdRegion> {
    point: R::Point,
    /// The part of the plane this subtree is responsible for
    region: R,
    axis: Axis,
    /// [strictly less on `axis`, greater or equal on `axis`]
    children: [Option<usize>; 2]
}

/// A KD tree that is built incrementally, one point at a time, and answers nearest neighbor queries.
/// Nodes split alternately on x and y, starting with x at the root.  Unlike a tree built all at once from
/// medians, the shape depends on insertion order, so no balance is guaranteed.
/// Nodes are kept in an arena (the root is always at index 0) and link to their children by index.
/// Every node remembers the region its subtree covers, and queries prune a subtree whenever the
/// squared distance to that region is not strictly less than the best squared distance found so far.
/// Points are unique: inserting a point equal to one already in the tree does nothing.
#[derive(Debug, Clone)]
pub struct KdTree<R: KdRegion = Rect> {
    bounds: R,
    nodes: Vec<Node<R>>
}

impl KdTree<Rect> {
    /// Create an empty tree over the whole plane
    pub fn new() -> Self {
        Self::with_bounds(Rect::UNBOUNDED)
    }
}

impl Default for KdTree<Rect> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: KdRegion> KdTree<R> {
    /// Create an empty tree whose points must all lie in `bounds`.
    /// Tight bounds let the root's children prune sooner, but any point outside them is rejected.
    pub fn with_bounds(bounds: R) -> Self {
        Self{bounds, nodes: Vec::new()}
    }

    /// Get the number of distinct points in the tree
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The region the root is responsible for
    pub fn bounds(&self) -> &R {
        &self.bounds
    }

    /// Insert a point, returning true if it was added or false if an equal point was already present.
    /// Fails without changing the tree if the point is invalid (see `KdPoint::validate`) or outside
    /// the bounds of the tree.
    pub fn insert(&mut self, point: R::Point) -> Result<bool> {
        point.validate()?;
        if self.bounds.min_sqdist(&point) > <Distance<R> as Zero>::zero() {
            return Err(Error::OutOfBounds);
        }
        if self.nodes.is_empty() {
            self.nodes.push(Node{point, region: self.bounds.clone(), axis: Axis::X, children: [None, None]});
            return Ok(true);
        }
        let mut idx = 0;
        loop {
            let node = &self.nodes[idx];
            // duplicates have to be caught before branching, an equal point always compares Equal and goes right
            if node.point == point {
                return Ok(false);
            }
            let side = Self::side(&point, node);
            match node.children[side] {
                Some(child) => idx = child,
                None => {
                    let (sub0, sub1) = node.region.split(&node.point, node.axis);
                    let region = if side == 0 { sub0 } else { sub1 };
                    let axis = node.axis.next();
                    let new_idx = self.nodes.len();
                    self.nodes.push(Node{point, region, axis, children: [None, None]});
                    self.nodes[idx].children[side] = Some(new_idx);
                    return Ok(true);
                }
            }
        }
    }

    /// Insert points in order, stopping at the first one that fails.
    /// Returns how many new points were added.
    pub fn try_extend(&mut self, points: impl IntoIterator<Item = R::Point>) -> Result<usize> {
        let mut added = 0;
        for point in points {
            if self.insert(point)? {
                added += 1;
            }
        }
        Ok(added)
    }

    /// Return true if the tree contains a point exactly equal to `point`
    pub fn contains(&self, point: &R::Point) -> bool {
        self.find(point).is_some()
    }

    /// Return the point in the tree closest to `query`, or None if the tree is empty.
    /// If several points are equally close, the first one visited wins: the root, then at every node the
    /// side `query` would be inserted into before the other side.
    pub fn nearest(&self, query: &R::Point) -> Result<Option<&R::Point>> {
        query.validate()?;
        Ok(self.search(query, &mut |_, _, _|()))
    }

    /// Branch and bound search behind `nearest`.  `visit` is called with each node whose point is
    /// actually compared against the query, whether it is a far child that had to pass the region check,
    /// and the best sqdist known when it was reached.
    fn search<'a>(&'a self, query: &R::Point, visit: &mut impl FnMut(usize, bool, Distance<R>)) -> Option<&'a R::Point> {
        let root = self.nodes.first()?;
        let mut best = &root.point;
        let mut best_sqdist = query.sqdist(best);
        // (node, whether its region still has to be checked against best_sqdist when popped)
        let mut todo = vec![(0, false)];
        while let Some((idx, check)) = todo.pop() {
            let node = &self.nodes[idx];
            if check && node.region.min_sqdist(query) >= best_sqdist {
                continue;
            }
            visit(idx, check, best_sqdist);
            let d = query.sqdist(&node.point);
            if d < best_sqdist {
                best = &node.point;
                best_sqdist = d;
            }
            let side = Self::side(query, node);
            // far side goes on the stack first so the whole near subtree is searched before it
            if let Some(far) = node.children[1 - side] {
                todo.push((far, true));
            }
            if let Some(near) = node.children[side] {
                todo.push((near, false));
            }
        }
        Some(best)
    }

	/// Iterate over all points in the tree in depth first order,
	/// calling a visitor function on each point.  The visitor function
	/// is also given the region of the subtree corresponding to the point,
	/// and may return a WalkDecision to instruct the traversal to skip the
	/// subtree or to stop the traversal entirely.
    pub fn walk<'a>(&'a self, visitor: &mut impl FnMut(&'a R, &'a R::Point) -> WalkDecision) {
        if self.nodes.is_empty() { return }
        let mut todo = vec![0];
        while let Some(idx) = todo.pop() {
            let node = &self.nodes[idx];
            match visitor(&node.region, &node.point) {
                WalkDecision::Stop => return,
                WalkDecision::SkipChildren => continue,
                WalkDecision::Continue => ()
            }
            todo.extend(node.children.iter().rev().flatten());
        }
    }

    /// Borrowing iterator over the points in insertion order
    pub fn iter(&self) -> Iter<'_, R> {
        self.into_iter()
    }

    fn side(point: &R::Point, node: &Node<R>) -> usize {
        match point.cmp(&node.point, node.axis) {
            Ordering::Less => 0,
            _ => 1
        }
    }

    fn find(&self, point: &R::Point) -> Option<usize> {
        let mut idx = if self.nodes.is_empty() { None } else { Some(0) };
        while let Some(i) = idx {
            let node = &self.nodes[i];
            if &node.point == point {
                return Some(i);
            }
            idx = node.children[Self::side(point, node)];
        }
        None
    }

    #[cfg(test)]
    fn check_node(&self, idx: usize) -> bool where R: PartialEq {
        let node = &self.nodes[idx];
        if node.region.min_sqdist(&node.point) > <Distance<R> as Zero>::zero() {
            return false;
        }
        // every point must be reachable by the same descent insert uses
        if self.find(&node.point) != Some(idx) {
            return false;
        }
        let (sub0, sub1) = node.region.split(&node.point, node.axis);
        for (child, sub) in node.children.iter().zip([sub0, sub1]) {
            let Some(child) = *child else { continue };
            let c = &self.nodes[child];
            if c.axis != node.axis.next() || c.region != sub {
                return false;
            }
        }
        true
    }

    #[cfg(test)]
    pub(crate) fn check_tree(&self) -> bool where R: PartialEq {
        if self.nodes.first().is_some_and(|root|root.axis != Axis::X || root.region != self.bounds) {
            return false;
        }
        let mut count = 0;
        self.walk(&mut |_, _|{
            count += 1;
            WalkDecision::Continue
        });
        count == self.len() && (0..self.len()).all(|idx|self.check_node(idx))
    }

    #[cfg(test)]
    pub(crate) fn nearest_naive(&self, query: &R::Point) -> Option<&R::Point> {
        let mut best: Option<(&R::Point, Distance<R>)> = None;
        for point in self {
            let d = query.sqdist(point);
            if best.as_ref().map_or(true, |(_, b)|d < *b) {
                best = Some((point, d));
            }
        }
        best.map(|(p, _)|p)
    }
}

pub struct Iter<'a, R: KdRegion> {
    nodes: std::slice::Iter<'a, Node<R>>
}

impl<'a, R: KdRegion> Iterator for Iter<'a, R> {
    type Item = &'a R::Point;
    fn next(&mut self) -> Option<Self::Item> {
        self.nodes.next().map(|node|&node.point)
    }
    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

impl<'a, R: KdRegion> IntoIterator for &'a KdTree<R> {
	type Item = &'a R::Point;
	type IntoIter = Iter<'a, R>;
	fn into_iter(self) -> Self::IntoIter {
		Iter{nodes: self.nodes.iter()}
	}
}
