//! Visualizations derived from a membership grid.
//!
//! - **Selection mask**: 255 inside the region, 0 outside
//! - **Overlay**: source image with region pixels replaced by the fill value
//! - **Outline**: region pixels touching the outside (marching-ants style)
//!
//! Rendering is row-parallel; results do not depend on thread scheduling.

use ndarray::{Array2, ArrayView2, Zip};
use rayon::prelude::*;

use crate::grid::Intensity;
use crate::region::MembershipGrid;

/// Selection mask (255 = in region, 0 = not in region).
pub fn selection_mask(membership: &MembershipGrid) -> Array2<u8> {
    let fill = membership.fill_value();
    Zip::from(membership.as_array()).par_map_collect(|&v| if v == fill { 255 } else { 0 })
}

/// Render the region onto a copy of `source`.
///
/// Matches the overlay written during traversal when `fill` is the
/// membership's fill value.
///
/// # Panics
/// If `source` and `membership` shapes differ.
pub fn render_overlay<T: Intensity>(
    source: ArrayView2<'_, T>,
    membership: &MembershipGrid,
    fill: T,
) -> Array2<T> {
    let marked = membership.fill_value();
    Zip::from(source)
        .and(membership.as_array())
        .par_map_collect(|&s, &m| if m == marked { fill } else { s })
}

/// Boundary pixels of the region (255), everything else 0.
///
/// A region pixel is on the boundary when one of its 4-connected neighbors
/// is outside the region or outside the grid.
pub fn region_outline(membership: &MembershipGrid) -> Array2<u8> {
    let (rows, cols) = membership.dim();

    let data: Vec<u8> = (0..rows)
        .into_par_iter()
        .flat_map_iter(|row| {
            (0..cols).map(move |col| {
                if is_boundary(membership, row, col) {
                    255
                } else {
                    0
                }
            })
        })
        .collect();

    Array2::from_shape_vec((rows, cols), data).expect("one outline value per grid cell")
}

#[inline]
fn is_boundary(membership: &MembershipGrid, row: usize, col: usize) -> bool {
    if !membership.is_marked(row, col) {
        return false;
    }
    row == 0
        || col == 0
        || !membership.is_marked(row - 1, col)
        || !membership.is_marked(row + 1, col)
        || !membership.is_marked(row, col - 1)
        || !membership.is_marked(row, col + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Coord;
    use crate::options::GrowOptions;
    use crate::region::{grow_region, RegionGrower};
    use ndarray::array;

    #[test]
    fn test_selection_mask() {
        let image = array![[1u8, 1, 9], [1, 9, 9]];
        let m = RegionGrower::from_view(image.view())
            .grow(Coord::new(0, 0), 0)
            .unwrap();

        assert_eq!(selection_mask(&m), array![[255u8, 255, 0], [255, 0, 0]]);
    }

    #[test]
    fn test_render_overlay_matches_traversal_overlay() {
        let image = array![[10u8, 20, 30, 200], [15, 25, 35, 210], [90, 91, 92, 220]];
        let opts = GrowOptions::with_tolerance(10).fill_value(3);
        let mut overlay = image.clone();

        let m = grow_region(image.view(), Coord::new(0, 0), &opts, Some(&mut overlay)).unwrap();
        let rendered = render_overlay(image.view(), &m, 3u8);
        assert_eq!(rendered, overlay);
    }

    #[test]
    fn test_outline_of_solid_block() {
        let mut image = Array2::<u8>::zeros((5, 5));
        for r in 1..4 {
            for c in 1..4 {
                image[[r, c]] = 100;
            }
        }
        let m = RegionGrower::from_view(image.view())
            .grow(Coord::new(2, 2), 0)
            .unwrap();
        let outline = region_outline(&m);

        assert_eq!(outline[[2, 2]], 0);
        assert_eq!(outline[[1, 1]], 255);
        assert_eq!(outline[[1, 2]], 255);
        assert_eq!(outline[[3, 3]], 255);
        assert_eq!(outline[[0, 0]], 0);
        assert_eq!(outline.iter().filter(|&&v| v == 255).count(), 8);
    }

    #[test]
    fn test_outline_touches_grid_border() {
        let image = Array2::<u8>::from_elem((3, 3), 50);
        let m = RegionGrower::from_view(image.view())
            .grow(Coord::new(0, 0), 0)
            .unwrap();
        let outline = region_outline(&m);

        assert_eq!(outline[[1, 1]], 0);
        assert_eq!(outline.iter().filter(|&&v| v == 255).count(), 8);
    }
}
