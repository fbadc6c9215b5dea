//! Quad tree error types.

use thiserror::Error;

/// Errors that can occur when constructing a quad tree.
///
/// The mutating operations themselves are total; only construction with
/// malformed inputs is rejected.
#[derive(Debug, Error, PartialEq)]
pub enum QuadTreeError {
    #[error("node capacity must be at least 1")]
    ZeroCapacity,

    #[error("inverted bounds: min ({min_x}, {min_y}) exceeds max ({max_x}, {max_y})")]
    InvertedBounds {
        min_x: f64,
        min_y: f64,
        max_x: f64,
        max_y: f64,
    },
}
