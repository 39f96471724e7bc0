//! Grid accessor: bounds checks and neighbor enumeration over an intensity grid.
//!
//! The accessor never reads a sample without a prior bounds check. Reads go
//! through [`Pixel`], a coordinate that can only be obtained from
//! [`GridAccessor::checked`], so an out-of-bounds read is unrepresentable.

use std::fmt;
use std::str::FromStr;

use ndarray::ArrayView2;
use serde::{Deserialize, Serialize};

use crate::error::ParseCoordError;

/// Moore neighborhood offsets: row offset outer, column offset inner.
const MOORE_OFFSETS: [(i64, i64); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Integer sample type of an intensity grid.
pub trait Intensity: Copy + Send + Sync + From<u8> + 'static {
    /// Largest representable intensity; upper bound for tolerances.
    const CEILING: i64;

    fn level(self) -> i64;
}

impl Intensity for u8 {
    const CEILING: i64 = u8::MAX as i64;

    #[inline]
    fn level(self) -> i64 {
        self as i64
    }
}

impl Intensity for u16 {
    const CEILING: i64 = u16::MAX as i64;

    #[inline]
    fn level(self) -> i64 {
        self as i64
    }
}

/// A `(row, col)` grid coordinate. May lie outside any grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Coord {
    pub row: i64,
    pub col: i64,
}

impl Coord {
    pub const fn new(row: i64, col: i64) -> Self {
        Self { row, col }
    }

    #[inline]
    pub fn offset(self, drow: i64, dcol: i64) -> Self {
        Self::new(self.row + drow, self.col + dcol)
    }
}

impl From<(i64, i64)> for Coord {
    fn from((row, col): (i64, i64)) -> Self {
        Self::new(row, col)
    }
}

impl fmt::Display for Coord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// Parses `(row,col)`, `row,col` or `row col`.
impl FromStr for Coord {
    type Err = ParseCoordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let inner = trimmed
            .strip_prefix('(')
            .and_then(|rest| rest.strip_suffix(')'))
            .unwrap_or(trimmed);

        let parts: Vec<&str> = if inner.contains(',') {
            inner.split(',').map(str::trim).collect()
        } else {
            inner.split_whitespace().collect()
        };

        if parts.len() != 2 {
            return Err(ParseCoordError::Malformed(s.to_string()));
        }

        let parse = |part: &str| {
            part.parse::<i64>()
                .map_err(|_| ParseCoordError::Component(part.to_string()))
        };
        Ok(Self::new(parse(parts[0])?, parse(parts[1])?))
    }
}

/// A coordinate proven to lie inside a specific grid's bounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pixel {
    row: usize,
    col: usize,
}

impl Pixel {
    pub fn row(self) -> usize {
        self.row
    }

    pub fn col(self) -> usize {
        self.col
    }

    /// `[row, col]` index for ndarray access.
    #[inline]
    pub fn index(self) -> [usize; 2] {
        [self.row, self.col]
    }

    pub fn coord(self) -> Coord {
        Coord::new(self.row as i64, self.col as i64)
    }
}

/// Read-only, bounds-safe view over an intensity grid.
#[derive(Debug, Clone, Copy)]
pub struct GridAccessor<'a, T> {
    grid: ArrayView2<'a, T>,
}

impl<'a, T: Intensity> GridAccessor<'a, T> {
    pub fn new(grid: ArrayView2<'a, T>) -> Self {
        Self { grid }
    }

    pub fn rows(&self) -> usize {
        self.grid.nrows()
    }

    pub fn cols(&self) -> usize {
        self.grid.ncols()
    }

    pub fn dim(&self) -> (usize, usize) {
        self.grid.dim()
    }

    pub fn view(&self) -> ArrayView2<'a, T> {
        self.grid
    }

    /// True iff `0 <= row < rows` and `0 <= col < cols`.
    #[inline]
    pub fn in_bounds(&self, coord: Coord) -> bool {
        coord.row >= 0
            && coord.col >= 0
            && (coord.row as u64) < self.rows() as u64
            && (coord.col as u64) < self.cols() as u64
    }

    /// Validate `coord` against this grid.
    #[inline]
    pub fn checked(&self, coord: Coord) -> Option<Pixel> {
        self.in_bounds(coord).then(|| Pixel {
            row: coord.row as usize,
            col: coord.col as usize,
        })
    }

    /// Sample at a validated pixel.
    #[inline]
    pub fn value_at(&self, pixel: Pixel) -> T {
        self.grid[pixel.index()]
    }

    /// The eight Moore neighbors of `coord`, unfiltered by bounds.
    ///
    /// Order is fixed: row offset -1, 0, +1 outer, column offset -1, 0, +1 inner.
    pub fn neighbors8(&self, coord: Coord) -> impl Iterator<Item = Coord> {
        MOORE_OFFSETS
            .into_iter()
            .map(move |(drow, dcol)| coord.offset(drow, dcol))
    }
}
