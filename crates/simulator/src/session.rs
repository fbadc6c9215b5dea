//! Interactive session state.
//!
//! A session owns one quad tree plus the ordered history of inserted points,
//! so the most recent insertion can be undone. The tree itself stores a set
//! and has no notion of insertion order.

use crate::config::Config;
use glam::DVec2;
use quadtree::{Bounds, Point, QuadTreeError, QuadTreeNode};
use rand::Rng;
use thiserror::Error;
use tracing::debug;

/// Minimum selectable node capacity.
pub const MIN_CAPACITY: usize = 1;
/// Maximum selectable node capacity.
pub const MAX_CAPACITY: usize = 10;

/// Errors that can occur when configuring a session.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("node capacity {0} is out of range 1-10")]
    CapacityOutOfRange(usize),

    #[error(transparent)]
    Tree(#[from] QuadTreeError),
}

/// An interactive simulator session.
#[derive(Debug)]
pub struct Session {
    tree: QuadTreeNode,
    /// Points in the order they were added, latest last.
    history: Vec<Point>,
}

impl Session {
    /// Create a session on a square board with its origin at (0, 0).
    pub fn new(config: &Config) -> Result<Self, SessionError> {
        let size = config.board.size;
        Self::with_bounds(Bounds::new(0.0, 0.0, size, size), config.tree.capacity)
    }

    pub fn with_bounds(bounds: Bounds, capacity: usize) -> Result<Self, SessionError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(SessionError::CapacityOutOfRange(capacity));
        }
        Ok(Self {
            tree: QuadTreeNode::new(bounds, capacity)?,
            history: Vec::new(),
        })
    }

    #[inline]
    pub fn tree(&self) -> &QuadTreeNode {
        &self.tree
    }

    #[inline]
    pub fn history(&self) -> &[Point] {
        &self.history
    }

    #[inline]
    pub fn bounds(&self) -> Bounds {
        self.tree.bounds()
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.tree.capacity()
    }

    /// Add a point to the board.
    pub fn add(&mut self, point: Point) {
        debug!("add point ({}, {})", point.x, point.y);
        self.history.push(point);
        self.tree.insert(point);
    }

    /// Undo the most recent insertion.
    ///
    /// Returns the undone point, or `None` when the history is empty.
    pub fn undo(&mut self) -> Option<Point> {
        let point = self.history.pop()?;
        // A point added twice stays alive until its last history entry is
        // undone; only drop it from the tree when no earlier entry remains.
        if !self.history.contains(&point) {
            self.tree.remove(point);
        }
        debug!("undo point ({}, {})", point.x, point.y);
        Some(point)
    }

    /// Clear the board and the history.
    pub fn clear(&mut self) {
        debug!("clear board");
        self.history.clear();
        self.tree.clear();
    }

    /// Rebuild the tree with a new node capacity and replay the history into
    /// it, keeping the board consistent with what was added so far.
    pub fn set_capacity(&mut self, capacity: usize) -> Result<(), SessionError> {
        if !(MIN_CAPACITY..=MAX_CAPACITY).contains(&capacity) {
            return Err(SessionError::CapacityOutOfRange(capacity));
        }
        debug!("rebuild tree with capacity {capacity}");
        let mut tree = QuadTreeNode::new(self.tree.bounds(), capacity)?;
        for &point in &self.history {
            tree.insert(point);
        }
        self.tree = tree;
        Ok(())
    }

    /// Scatter `n` uniformly random points across the board.
    pub fn scatter(&mut self, n: usize) {
        let bounds = self.tree.bounds();
        let mut rng = rand::rng();
        for _ in 0..n {
            let position = DVec2::new(
                rng.random_range(bounds.min().x..=bounds.max().x),
                rng.random_range(bounds.min().y..=bounds.max().y),
            );
            self.add(position.into());
        }
    }
}
