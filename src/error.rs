//! Error types for region growing.
//!
//! Every variant of [`RegionGrowError`] is a precondition failure detected
//! before the traversal touches any output grid.

use thiserror::Error;

use crate::grid::Coord;

/// Rejected region-growing request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionGrowError {
    /// Seed lies outside `[0, rows) x [0, cols)`.
    #[error("seed {seed} is outside the {rows}x{cols} grid (row must be 0-{max_row}, col must be 0-{max_col})",
        max_row = .rows.saturating_sub(1), max_col = .cols.saturating_sub(1))]
    InvalidSeed { seed: Coord, rows: usize, cols: usize },

    /// Tolerance is negative or above the sample type's ceiling.
    #[error("tolerance {tolerance} is out of range, expected a value between 0-{max}")]
    InvalidTolerance { tolerance: i64, max: i64 },

    /// Overlay grid does not have the intensity grid's shape.
    #[error("overlay shape {actual:?} does not match grid shape {expected:?}")]
    OverlayShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    /// Fill value equals the unmarked sentinel, so membership would be unreadable.
    #[error("fill value {value} collides with the unmarked sentinel")]
    InvalidFillValue { value: u8 },
}

/// Malformed coordinate text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseCoordError {
    #[error("expected a coordinate in the form (row,col), row,col or row col; got {0:?}")]
    Malformed(String),
    #[error("invalid coordinate component {0:?}")]
    Component(String),
}

pub type Result<T> = std::result::Result<T, RegionGrowError>;
