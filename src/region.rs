//! Tolerance-bounded region growing (flood fill) from a single seed.
//!
//! The traversal is breadth-first over the Moore neighborhood. A neighbor joins
//! the region when it is in bounds, not yet marked, and its intensity differs
//! from the pixel being expanded by at most the tolerance. Tolerance is
//! pairwise, so the region may drift in intensity over many short steps.
//!
//! Pixels are marked when enqueued, not when dequeued, so no coordinate is ever
//! queued twice. Together with the fixed neighbor order and FIFO queue this
//! makes the result deterministic for a given grid, seed and tolerance.

use std::collections::VecDeque;

use log::{debug, warn};
use ndarray::{Array2, ArrayView2, ArrayViewMut2};
use serde::Serialize;

use crate::error::{RegionGrowError, Result};
use crate::grid::{Coord, GridAccessor, Intensity, Pixel};
use crate::options::{GrowOptions, DEFAULT_FILL_VALUE, DEFAULT_UNMARKED_VALUE};

/// Inclusive bounding box of a region.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RegionBounds {
    pub min_row: usize,
    pub min_col: usize,
    pub max_row: usize,
    pub max_col: usize,
}

impl RegionBounds {
    fn single(pixel: Pixel) -> Self {
        Self {
            min_row: pixel.row(),
            min_col: pixel.col(),
            max_row: pixel.row(),
            max_col: pixel.col(),
        }
    }

    fn include(&mut self, pixel: Pixel) {
        self.min_row = self.min_row.min(pixel.row());
        self.min_col = self.min_col.min(pixel.col());
        self.max_row = self.max_row.max(pixel.row());
        self.max_col = self.max_col.max(pixel.col());
    }

    pub fn height(&self) -> usize {
        self.max_row - self.min_row + 1
    }

    pub fn width(&self) -> usize {
        self.max_col - self.min_col + 1
    }
}

/// Per-pixel region membership produced by one traversal.
///
/// Cells hold either the fill value (in region) or the unmarked sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipGrid {
    cells: Array2<u8>,
    fill_value: u8,
    unmarked_value: u8,
    pixel_count: usize,
    bounds: Option<RegionBounds>,
}

impl MembershipGrid {
    fn unmarked(dim: (usize, usize), fill_value: u8, unmarked_value: u8) -> Self {
        Self {
            cells: Array2::from_elem(dim, unmarked_value),
            fill_value,
            unmarked_value,
            pixel_count: 0,
            bounds: None,
        }
    }

    #[inline]
    fn is_pixel_marked(&self, pixel: Pixel) -> bool {
        self.cells[pixel.index()] == self.fill_value
    }

    fn mark(&mut self, pixel: Pixel) {
        self.cells[pixel.index()] = self.fill_value;
        self.pixel_count += 1;
        match self.bounds.as_mut() {
            Some(bounds) => bounds.include(pixel),
            None => self.bounds = Some(RegionBounds::single(pixel)),
        }
    }

    /// True if `(row, col)` is inside the grid and in the region.
    pub fn is_marked(&self, row: usize, col: usize) -> bool {
        self.cells
            .get([row, col])
            .is_some_and(|&v| v == self.fill_value)
    }

    pub fn pixel_count(&self) -> usize {
        self.pixel_count
    }

    pub fn bounds(&self) -> Option<RegionBounds> {
        self.bounds
    }

    pub fn fill_value(&self) -> u8 {
        self.fill_value
    }

    pub fn unmarked_value(&self) -> u8 {
        self.unmarked_value
    }

    pub fn dim(&self) -> (usize, usize) {
        self.cells.dim()
    }

    pub fn as_array(&self) -> ArrayView2<'_, u8> {
        self.cells.view()
    }

    pub fn into_array(self) -> Array2<u8> {
        self.cells
    }

    /// Coordinates of region pixels in row-major order.
    pub fn iter_marked(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.cells
            .indexed_iter()
            .filter(move |(_, &v)| v == self.fill_value)
            .map(|(idx, _)| idx)
    }
}

/// Drives breadth-first region growth over a shared, read-only grid.
///
/// The grower holds no traversal state, so one grower (or several sharing the
/// same grid) can serve independent seeds, including from multiple threads.
#[derive(Debug, Clone, Copy)]
pub struct RegionGrower<'a, T> {
    grid: GridAccessor<'a, T>,
}

impl<'a, T: Intensity> RegionGrower<'a, T> {
    pub fn new(grid: GridAccessor<'a, T>) -> Self {
        Self { grid }
    }

    pub fn from_view(image: ArrayView2<'a, T>) -> Self {
        Self::new(GridAccessor::new(image))
    }

    pub fn grid(&self) -> &GridAccessor<'a, T> {
        &self.grid
    }

    /// Grow a region with the default fill (0) and unmarked (255) values.
    pub fn grow(&self, seed: Coord, tolerance: i64) -> Result<MembershipGrid> {
        let options = GrowOptions {
            tolerance,
            fill_value: DEFAULT_FILL_VALUE,
            unmarked_value: DEFAULT_UNMARKED_VALUE,
        };
        self.grow_with(seed, &options, None)
    }

    /// Grow a region, optionally writing the fill value into `overlay`.
    ///
    /// All preconditions are checked before anything is written: on error the
    /// overlay is untouched and no membership grid is produced.
    pub fn grow_with(
        &self,
        seed: Coord,
        options: &GrowOptions,
        overlay: Option<&mut Array2<T>>,
    ) -> Result<MembershipGrid> {
        self.grow_into(seed, options, overlay.map(|o| o.view_mut()))
    }

    /// Like [`grow_with`](Self::grow_with) but writes through a mutable view.
    pub fn grow_into(
        &self,
        seed: Coord,
        options: &GrowOptions,
        overlay: Option<ArrayViewMut2<'_, T>>,
    ) -> Result<MembershipGrid> {
        let seed_pixel = self.validate(seed, options, overlay.as_ref())?;

        debug!(
            "region grow: seed={} tolerance={} grid={}x{}",
            seed,
            options.tolerance,
            self.grid.rows(),
            self.grid.cols()
        );

        let mut traversal = Traversal {
            grid: &self.grid,
            tolerance: options.tolerance,
            membership: MembershipGrid::unmarked(
                self.grid.dim(),
                options.fill_value,
                options.unmarked_value,
            ),
            overlay,
            overlay_value: T::from(options.fill_value),
            frontier: VecDeque::new(),
        };

        // The seed is the only unconditional mark. Its direct neighbors are
        // compared against the seed's own intensity.
        traversal.mark(seed_pixel);
        traversal.expand(seed_pixel);

        let mut expansions = 1usize;
        while let Some(pixel) = traversal.frontier.pop_front() {
            traversal.expand(pixel);
            expansions += 1;
        }

        let membership = traversal.membership;
        debug!(
            "region grow: marked {} pixels in {} expansions, bounds={:?}",
            membership.pixel_count(),
            expansions,
            membership.bounds()
        );
        Ok(membership)
    }

    fn validate(
        &self,
        seed: Coord,
        options: &GrowOptions,
        overlay: Option<&ArrayViewMut2<'_, T>>,
    ) -> Result<Pixel> {
        let result = self
            .grid
            .checked(seed)
            .ok_or(RegionGrowError::InvalidSeed {
                seed,
                rows: self.grid.rows(),
                cols: self.grid.cols(),
            })
            .and_then(|pixel| {
                options.validate::<T>()?;
                match overlay {
                    Some(ov) if ov.dim() != self.grid.dim() => {
                        Err(RegionGrowError::OverlayShapeMismatch {
                            expected: self.grid.dim(),
                            actual: ov.dim(),
                        })
                    }
                    _ => Ok(pixel),
                }
            });

        if let Err(err) = &result {
            warn!("region grow rejected: {err}");
        }
        result
    }
}

/// State owned by one traversal.
struct Traversal<'g, 'a, 'o, T> {
    grid: &'g GridAccessor<'a, T>,
    tolerance: i64,
    membership: MembershipGrid,
    overlay: Option<ArrayViewMut2<'o, T>>,
    overlay_value: T,
    frontier: VecDeque<Pixel>,
}

impl<T: Intensity> Traversal<'_, '_, '_, T> {
    fn mark(&mut self, pixel: Pixel) {
        self.membership.mark(pixel);
        if let Some(overlay) = self.overlay.as_mut() {
            overlay[pixel.index()] = self.overlay_value;
        }
    }

    /// Mark and enqueue every qualifying neighbor of `pixel`, using `pixel`'s
    /// intensity as the comparison baseline.
    fn expand(&mut self, pixel: Pixel) {
        let grid = self.grid;
        let baseline = grid.value_at(pixel).level();

        for coord in grid.neighbors8(pixel.coord()) {
            let Some(neighbor) = grid.checked(coord) else {
                continue;
            };
            if self.membership.is_pixel_marked(neighbor) {
                continue;
            }
            let diff = (grid.value_at(neighbor).level() - baseline).abs();
            if diff <= self.tolerance {
                self.mark(neighbor);
                self.frontier.push_back(neighbor);
            }
        }
    }
}

/// Grow a region over `image` from `seed`.
///
/// # Arguments
/// * `image` - Single-channel intensity grid (rows, cols)
/// * `seed` - Starting coordinate
/// * `options` - Tolerance and membership values
/// * `overlay` - Optional render target, usually a copy of `image`
///
/// # Returns
/// Membership grid, or the precondition that failed
pub fn grow_region<T: Intensity>(
    image: ArrayView2<'_, T>,
    seed: Coord,
    options: &GrowOptions,
    overlay: Option<&mut Array2<T>>,
) -> Result<MembershipGrid> {
    RegionGrower::from_view(image).grow_with(seed, options, overlay)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn count(m: &MembershipGrid) -> usize {
        m.iter_marked().count()
    }

    #[test]
    fn test_uniform_grid_fills_everything() {
        let image = Array2::<u8>::from_elem((3, 3), 100);
        let grower = RegionGrower::from_view(image.view());

        let m = grower.grow(Coord::new(1, 1), 0).unwrap();
        assert_eq!(m.pixel_count(), 9);
        assert!(m.as_array().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_isolated_center() {
        let mut image = Array2::<u8>::from_elem((3, 3), 200);
        image[[1, 1]] = 100;
        let grower = RegionGrower::from_view(image.view());

        let m = grower.grow(Coord::new(1, 1), 10).unwrap();
        assert_eq!(m.pixel_count(), 1);
        assert!(m.is_marked(1, 1));
        assert_eq!(m.as_array()[[0, 0]], 255);
    }

    #[test]
    fn test_single_pixel_grid() {
        let image = array![[42u8]];
        let grower = RegionGrower::from_view(image.view());

        for tol in [0, 1, 128, 255] {
            let m = grower.grow(Coord::new(0, 0), tol).unwrap();
            assert_eq!(m.pixel_count(), 1);
            assert_eq!(
                m.bounds(),
                Some(RegionBounds {
                    min_row: 0,
                    min_col: 0,
                    max_row: 0,
                    max_col: 0
                })
            );
        }
    }

    #[test]
    fn test_invalid_seed() {
        let image = Array2::<u8>::from_elem((3, 3), 7);
        let mut overlay = image.clone();
        let grower = RegionGrower::from_view(image.view());

        let err = grower
            .grow_with(Coord::new(-1, 0), &GrowOptions::default(), Some(&mut overlay))
            .unwrap_err();
        assert!(matches!(err, RegionGrowError::InvalidSeed { rows: 3, cols: 3, .. }));
        assert_eq!(overlay, image);
    }

    #[test]
    fn test_invalid_tolerance() {
        let image = Array2::<u8>::from_elem((3, 3), 7);
        let mut overlay = image.clone();
        let grower = RegionGrower::from_view(image.view());

        let err = grower
            .grow_with(
                Coord::new(1, 1),
                &GrowOptions::with_tolerance(300),
                Some(&mut overlay),
            )
            .unwrap_err();
        assert_eq!(
            err,
            RegionGrowError::InvalidTolerance {
                tolerance: 300,
                max: 255
            }
        );
        assert_eq!(overlay, image);
    }

    #[test]
    fn test_overlay_shape_mismatch_leaves_overlay_untouched() {
        let image = Array2::<u8>::from_elem((3, 3), 7);
        let mut overlay = Array2::<u8>::from_elem((2, 3), 9);
        let grower = RegionGrower::from_view(image.view());

        let err = grower
            .grow_with(Coord::new(0, 0), &GrowOptions::default(), Some(&mut overlay))
            .unwrap_err();
        assert_eq!(
            err,
            RegionGrowError::OverlayShapeMismatch {
                expected: (3, 3),
                actual: (2, 3)
            }
        );
        assert!(overlay.iter().all(|&v| v == 9));
    }

    #[test]
    fn test_empty_grid_rejects_any_seed() {
        let image = Array2::<u8>::zeros((0, 0));
        let grower = RegionGrower::from_view(image.view());
        assert!(matches!(
            grower.grow(Coord::new(0, 0), 0),
            Err(RegionGrowError::InvalidSeed { .. })
        ));
    }

    #[test]
    fn test_overlay_receives_fill_value() {
        let image = array![[10u8, 12, 90], [11, 13, 95], [80, 85, 99]];
        let mut overlay = image.clone();
        let opts = GrowOptions::with_tolerance(3).fill_value(1);

        let m = grow_region(image.view(), Coord::new(0, 0), &opts, Some(&mut overlay)).unwrap();

        assert_eq!(m.pixel_count(), 4);
        assert_eq!(overlay, array![[1u8, 1, 90], [1, 1, 95], [80, 85, 99]]);
        assert_eq!(m.as_array(), array![[1u8, 1, 255], [1, 1, 255], [255, 255, 255]]);
    }

    #[test]
    fn test_overlay_does_not_change_region() {
        let image = array![[0u8, 5, 10, 15], [50, 55, 60, 65], [5, 5, 200, 5]];
        let opts = GrowOptions::with_tolerance(6);
        let mut overlay = image.clone();

        let with = grow_region(image.view(), Coord::new(0, 0), &opts, Some(&mut overlay)).unwrap();
        let without = grow_region(image.view(), Coord::new(0, 0), &opts, None).unwrap();
        assert_eq!(with, without);
    }

    #[test]
    fn test_region_drifts_pairwise() {
        // Each step differs by 10, end to end by 90.
        let image = array![[0u8, 10, 20, 30, 40, 50, 60, 70, 80, 90]];
        let grower = RegionGrower::from_view(image.view());

        let m = grower.grow(Coord::new(0, 0), 10).unwrap();
        assert_eq!(m.pixel_count(), 10);

        let m = grower.grow(Coord::new(0, 0), 9).unwrap();
        assert_eq!(m.pixel_count(), 1);
    }

    #[test]
    fn test_diagonal_connectivity() {
        let image = array![[5u8, 200, 200], [200, 5, 200], [200, 200, 5]];
        let grower = RegionGrower::from_view(image.view());

        let m = grower.grow(Coord::new(0, 0), 0).unwrap();
        assert_eq!(count(&m), 3);
        assert!(m.is_marked(2, 2));
        assert!(!m.is_marked(0, 1));
    }

    #[test]
    fn test_custom_unmarked_value() {
        let image = array![[1u8, 1], [9, 9]];
        let opts = GrowOptions::with_tolerance(0).fill_value(255).unmarked_value(0);

        let m = grow_region(image.view(), Coord::new(1, 1), &opts, None).unwrap();
        assert_eq!(m.as_array(), array![[0u8, 0], [255, 255]]);
        assert_eq!(m.pixel_count(), 2);
    }

    #[test]
    fn test_u16_grid() {
        let image = array![[1000u16, 1200, 4000], [1100, 1300, 4095]];
        let mut overlay = image.clone();
        let opts = GrowOptions::with_tolerance(300);

        let m = grow_region(image.view(), Coord::new(0, 0), &opts, Some(&mut overlay)).unwrap();
        assert_eq!(m.pixel_count(), 4);
        assert_eq!(overlay, array![[0u16, 0, 4000], [0, 0, 4095]]);

        let wide = GrowOptions::with_tolerance(3000);
        assert!(grow_region(image.view(), Coord::new(0, 0), &wide, None).is_ok());
    }

    #[test]
    fn test_bounds_and_iter_marked() {
        let image = array![
            [9u8, 9, 9, 9],
            [9, 1, 1, 9],
            [9, 9, 1, 9],
            [9, 9, 9, 9]
        ];
        let grower = RegionGrower::from_view(image.view());
        let m = grower.grow(Coord::new(1, 1), 0).unwrap();

        let bounds = m.bounds().unwrap();
        assert_eq!((bounds.min_row, bounds.min_col), (1, 1));
        assert_eq!((bounds.max_row, bounds.max_col), (2, 2));
        assert_eq!((bounds.height(), bounds.width()), (2, 2));
        assert_eq!(
            m.iter_marked().collect::<Vec<_>>(),
            vec![(1, 1), (1, 2), (2, 2)]
        );
        assert!(!m.is_marked(10, 10));
    }
}
