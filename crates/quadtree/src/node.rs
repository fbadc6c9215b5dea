//! The recursive quad tree node.
//!
//! A node is either a leaf holding at most `capacity` unique points, or an
//! internal node holding exactly four children that partition its bounds.
//! Inserting past the capacity subdivides a leaf; removal merges children
//! back into a leaf once their combined count fits again.

use crate::error::QuadTreeError;
use crate::geometry::{Bounds, Point, Quadrant};
use std::collections::HashSet;
use std::mem;

/// The variant of a quad tree node.
///
/// A node is exclusively one of the two at any instant.
#[derive(Debug)]
pub enum NodeKind {
    /// Not yet subdivided; holds its points directly.
    Leaf(HashSet<Point>),
    /// Subdivided into four children covering the four quadrants.
    Internal(Box<Children>),
}

/// The four children of an internal node, one per quadrant.
#[derive(Debug)]
pub struct Children {
    pub top_left: QuadTreeNode,
    pub top_right: QuadTreeNode,
    pub bottom_left: QuadTreeNode,
    pub bottom_right: QuadTreeNode,
}

impl Children {
    /// Create four empty leaf children by splitting `bounds` at its midpoint.
    fn split(bounds: Bounds, capacity: usize) -> Self {
        Self {
            top_left: QuadTreeNode::quadrant_leaf(bounds.quadrant(Quadrant::TopLeft), capacity),
            top_right: QuadTreeNode::quadrant_leaf(bounds.quadrant(Quadrant::TopRight), capacity),
            bottom_left: QuadTreeNode::quadrant_leaf(bounds.quadrant(Quadrant::BottomLeft), capacity),
            bottom_right: QuadTreeNode::quadrant_leaf(
                bounds.quadrant(Quadrant::BottomRight),
                capacity,
            ),
        }
    }

    fn child_mut(&mut self, quadrant: Quadrant) -> &mut QuadTreeNode {
        match quadrant {
            Quadrant::TopLeft => &mut self.top_left,
            Quadrant::TopRight => &mut self.top_right,
            Quadrant::BottomLeft => &mut self.bottom_left,
            Quadrant::BottomRight => &mut self.bottom_right,
        }
    }

    /// The children in top-left, top-right, bottom-left, bottom-right order.
    pub fn iter(&self) -> impl Iterator<Item = &QuadTreeNode> {
        [
            &self.top_left,
            &self.top_right,
            &self.bottom_left,
            &self.bottom_right,
        ]
        .into_iter()
    }

    fn iter_mut(&mut self) -> impl Iterator<Item = &mut QuadTreeNode> {
        [
            &mut self.top_left,
            &mut self.top_right,
            &mut self.bottom_left,
            &mut self.bottom_right,
        ]
        .into_iter()
    }

    /// Combined logical point count across all four children.
    fn len(&self) -> usize {
        self.iter().map(QuadTreeNode::len).sum()
    }

    fn collect_points(&self, out: &mut HashSet<Point>) {
        for child in self.iter() {
            child.collect_points(out);
        }
    }
}

/// A quad tree (node). Each point represented by the quad tree is unique.
#[derive(Debug)]
pub struct QuadTreeNode {
    kind: NodeKind,
    bounds: Bounds,
    capacity: usize,
}

impl QuadTreeNode {
    /// Create an empty leaf node with the given bounds and node capacity.
    ///
    /// Fails fast on malformed inputs: a capacity of zero could never hold a
    /// point without subdividing forever, and inverted bounds would produce
    /// nonsensical subdivision geometry. Zero-extent bounds are permitted.
    pub fn new(bounds: Bounds, capacity: usize) -> Result<Self, QuadTreeError> {
        if capacity == 0 {
            return Err(QuadTreeError::ZeroCapacity);
        }
        let (min, max) = (bounds.min(), bounds.max());
        if min.x > max.x || min.y > max.y {
            return Err(QuadTreeError::InvertedBounds {
                min_x: min.x,
                min_y: min.y,
                max_x: max.x,
                max_y: max.y,
            });
        }
        Ok(Self::quadrant_leaf(bounds, capacity))
    }

    /// Child constructor: bounds come from a parent's subdivision and are
    /// already well-formed.
    fn quadrant_leaf(bounds: Bounds, capacity: usize) -> Self {
        Self {
            kind: NodeKind::Leaf(HashSet::new()),
            bounds,
            capacity,
        }
    }

    /// The bounds this node is responsible for.
    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// The node capacity, shared by every node in the tree.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current variant, for structural traversal (e.g. by a renderer).
    #[inline]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Add a point to the quad tree (node).
    ///
    /// Inserting a point that is already present is a no-op. A leaf that
    /// exceeds its capacity subdivides and redistributes every held point,
    /// the new one included, through the internal routing path.
    pub fn insert(&mut self, point: Point) {
        match &mut self.kind {
            NodeKind::Leaf(points) => {
                points.insert(point);
                if points.len() <= self.capacity {
                    return;
                }

                let points = mem::take(points);
                self.kind =
                    NodeKind::Internal(Box::new(Children::split(self.bounds, self.capacity)));
                for point in points {
                    self.insert(point);
                }
            }
            NodeKind::Internal(children) => {
                children.child_mut(self.bounds.quadrant_of(point)).insert(point);
            }
        }
    }

    /// Remove a point from the quad tree (node).
    ///
    /// Removing an absent point is a no-op. After routing through an
    /// internal node the merge check always runs: if the four children
    /// together hold no more than `capacity` points, they collapse into a
    /// single leaf. A single remove can cascade the collapse up the chain of
    /// recursive returns, one level per return.
    pub fn remove(&mut self, point: Point) {
        match &mut self.kind {
            NodeKind::Leaf(points) => {
                points.remove(&point);
            }
            NodeKind::Internal(children) => {
                children.child_mut(self.bounds.quadrant_of(point)).remove(point);

                if children.len() <= self.capacity {
                    let mut merged = HashSet::new();
                    children.collect_points(&mut merged);
                    self.kind = NodeKind::Leaf(merged);
                }
            }
        }
    }

    /// Remove all points, flattening the subtree back to a single empty leaf
    /// at its original bounds.
    pub fn clear(&mut self) {
        if let NodeKind::Internal(children) = &mut self.kind {
            for child in children.iter_mut() {
                child.clear();
            }
        }
        self.kind = NodeKind::Leaf(HashSet::new());
    }

    /// All points of the quad tree (node), gathered by recursing over any
    /// children. Computed on demand, never cached.
    pub fn points(&self) -> HashSet<Point> {
        let mut points = HashSet::with_capacity(self.len());
        self.collect_points(&mut points);
        points
    }

    fn collect_points(&self, out: &mut HashSet<Point>) {
        match &self.kind {
            NodeKind::Leaf(points) => out.extend(points.iter().copied()),
            NodeKind::Internal(children) => children.collect_points(out),
        }
    }

    /// Logical point count of the subtree, without materializing the union.
    pub fn len(&self) -> usize {
        match &self.kind {
            NodeKind::Leaf(points) => points.len(),
            NodeKind::Internal(children) => children.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(capacity: usize) -> QuadTreeNode {
        QuadTreeNode::new(Bounds::new(0.0, 0.0, 20.0, 20.0), capacity).unwrap()
    }

    fn points_of(node: &QuadTreeNode) -> Vec<(f64, f64)> {
        let mut points: Vec<_> = node.points().iter().map(|p| (p.x, p.y)).collect();
        points.sort_by(|a, b| a.partial_cmp(b).unwrap());
        points
    }

    #[test]
    fn test_new_rejects_zero_capacity() {
        let result = QuadTreeNode::new(Bounds::new(0.0, 0.0, 10.0, 10.0), 0);
        assert_eq!(result.unwrap_err(), QuadTreeError::ZeroCapacity);
    }

    #[test]
    fn test_new_rejects_inverted_bounds() {
        let result = QuadTreeNode::new(Bounds::new(10.0, 0.0, 0.0, 10.0), 1);
        assert!(matches!(
            result.unwrap_err(),
            QuadTreeError::InvertedBounds { .. }
        ));
    }

    #[test]
    fn test_new_permits_zero_extent_bounds() {
        let node = QuadTreeNode::new(Bounds::new(5.0, 5.0, 5.0, 5.0), 1).unwrap();
        assert!(node.is_empty());
    }

    #[test]
    fn test_insert_within_capacity_stays_leaf() {
        let mut node = tree(3);
        node.insert(Point::new(1.0, 1.0));
        node.insert(Point::new(2.0, 2.0));
        node.insert(Point::new(3.0, 3.0));

        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert_eq!(node.len(), 3);
    }

    #[test]
    fn test_insert_duplicate_is_noop() {
        let mut node = tree(1);
        node.insert(Point::new(1.0, 1.0));
        node.insert(Point::new(1.0, 1.0));

        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert_eq!(node.len(), 1);
    }

    #[test]
    fn test_split_preserves_point_set() {
        let mut node = tree(2);
        node.insert(Point::new(2.0, 2.0));
        node.insert(Point::new(18.0, 2.0));
        node.insert(Point::new(18.0, 18.0));

        let NodeKind::Internal(children) = node.kind() else {
            panic!("expected internal node after exceeding capacity");
        };
        assert_eq!(children.bottom_left.len(), 1);
        assert_eq!(children.bottom_right.len(), 1);
        assert_eq!(children.top_right.len(), 1);
        assert_eq!(children.top_left.len(), 0);
        assert_eq!(
            points_of(&node),
            vec![(2.0, 2.0), (18.0, 2.0), (18.0, 18.0)]
        );
    }

    #[test]
    fn test_split_child_bounds() {
        let mut node = tree(1);
        node.insert(Point::new(2.0, 2.0));
        node.insert(Point::new(18.0, 18.0));

        let NodeKind::Internal(children) = node.kind() else {
            panic!("expected internal node");
        };
        let top_left = children.top_left.bounds();
        assert_eq!(top_left.min(), Point::new(0.0, 10.0));
        assert_eq!(top_left.max(), Point::new(10.0, 20.0));
        let bottom_right = children.bottom_right.bounds();
        assert_eq!(bottom_right.min(), Point::new(10.0, 0.0));
        assert_eq!(bottom_right.max(), Point::new(20.0, 10.0));
    }

    #[test]
    fn test_midpoint_insert_routes_bottom_left_and_cascades() {
        // (10, 10) sits exactly on the midpoint of [0,0]-[20,20]; the
        // non-strict rule sends it bottom-left, into the same quadrant as
        // (0, 0), which forces a second-level split there.
        let mut node = tree(1);
        node.insert(Point::new(0.0, 0.0));
        node.insert(Point::new(10.0, 10.0));

        let NodeKind::Internal(children) = node.kind() else {
            panic!("expected internal root");
        };
        assert_eq!(children.top_left.len(), 0);
        assert_eq!(children.top_right.len(), 0);
        assert_eq!(children.bottom_right.len(), 0);
        assert_eq!(children.bottom_left.len(), 2);

        // The bottom-left child ([0,0]-[10,10], midpoint (5,5)) had to split
        // in turn: (0,0) stays bottom-left, (10,10) goes top-right.
        let NodeKind::Internal(grandchildren) = children.bottom_left.kind() else {
            panic!("expected the bottom-left child to subdivide");
        };
        assert_eq!(points_of(&grandchildren.bottom_left), vec![(0.0, 0.0)]);
        assert_eq!(points_of(&grandchildren.top_right), vec![(10.0, 10.0)]);
    }

    #[test]
    fn test_remove_absent_point_is_noop() {
        let mut node = tree(2);
        node.insert(Point::new(1.0, 1.0));
        node.remove(Point::new(9.0, 9.0));

        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert_eq!(points_of(&node), vec![(1.0, 1.0)]);
    }

    #[test]
    fn test_remove_collapses_parent() {
        // Three points in one quadrant exceed capacity 2 and split the root;
        // removing one brings the total back to 2 and merges it again.
        let mut node = tree(2);
        node.insert(Point::new(1.0, 1.0));
        node.insert(Point::new(2.0, 2.0));
        node.insert(Point::new(3.0, 3.0));
        assert!(matches!(node.kind(), NodeKind::Internal(_)));

        node.remove(Point::new(3.0, 3.0));

        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert_eq!(points_of(&node), vec![(1.0, 1.0), (2.0, 2.0)]);
    }

    #[test]
    fn test_remove_cascades_collapse_through_levels() {
        // Both points crowd the bottom-left corner, stacking two levels of
        // subdivision with capacity 1. Removing one collapses every level on
        // the way back up.
        let mut node = tree(1);
        node.insert(Point::new(1.0, 1.0));
        node.insert(Point::new(2.0, 2.0));
        assert!(matches!(node.kind(), NodeKind::Internal(_)));

        node.remove(Point::new(2.0, 2.0));

        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert_eq!(points_of(&node), vec![(1.0, 1.0)]);
    }

    #[test]
    fn test_remove_absent_from_internal_keeps_structure() {
        let mut node = tree(2);
        node.insert(Point::new(1.0, 1.0));
        node.insert(Point::new(2.0, 2.0));
        node.insert(Point::new(3.0, 3.0));
        assert!(matches!(node.kind(), NodeKind::Internal(_)));

        // The merge check runs on the way back up, but the total is still
        // above capacity, so nothing changes.
        node.remove(Point::new(19.0, 19.0));

        assert!(matches!(node.kind(), NodeKind::Internal(_)));
        assert_eq!(
            points_of(&node),
            vec![(1.0, 1.0), (2.0, 2.0), (3.0, 3.0)]
        );
    }

    #[test]
    fn test_clear_flattens_to_empty_leaf() {
        let mut node = tree(1);
        for i in 0..8 {
            node.insert(Point::new(i as f64, (i * 2 % 19) as f64));
        }
        assert!(matches!(node.kind(), NodeKind::Internal(_)));

        node.clear();
        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert!(node.is_empty());
        assert_eq!(node.bounds().min(), Point::new(0.0, 0.0));
        assert_eq!(node.bounds().max(), Point::new(20.0, 20.0));

        // Idempotent.
        node.clear();
        assert!(matches!(node.kind(), NodeKind::Leaf(_)));
        assert!(node.is_empty());
    }

    #[test]
    fn test_len_matches_points_len() {
        let mut node = tree(2);
        let inputs = [
            (1.0, 1.0),
            (19.0, 1.0),
            (1.0, 19.0),
            (19.0, 19.0),
            (10.0, 10.0),
            (5.0, 5.0),
            (1.0, 1.0), // duplicate
        ];
        for (x, y) in inputs {
            node.insert(Point::new(x, y));
            assert_eq!(node.len(), node.points().len());
        }
        assert_eq!(node.len(), 6);

        node.remove(Point::new(10.0, 10.0));
        assert_eq!(node.len(), node.points().len());
        assert_eq!(node.len(), 5);
    }
}
