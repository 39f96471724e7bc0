//! RegionGrow Rust Extensions
//!
//! Tolerance-based region growing (flood fill) on single-channel intensity
//! grids, with Python bindings via PyO3 and WASM bindings for JavaScript.
//!
//! ## Image Format
//! Intensity grids are 2-D arrays of shape (rows, cols):
//! - `u8`: 8-bit samples (0-255), tolerance 0-255
//! - `u16`: 16-bit samples (0-65535), tolerance 0-65535
//!
//! ## Growth Rule
//! Starting from a seed pixel, every in-bounds Moore neighbor whose intensity
//! differs from the pixel being expanded by at most the tolerance joins the
//! region. Expansion is breadth-first and deterministic.
//!
//! ## Outputs
//! - **Membership grid**: fill value (default 0) in the region, unmarked
//!   sentinel (default 255) elsewhere
//! - **Overlay**: optional copy of the source with the region painted in the
//!   fill value, written during traversal
//! - **Derived renders**: selection mask and region outline, see [`render`]

pub mod error;
pub mod grid;
pub mod options;
pub mod region;
pub mod render;

#[cfg(feature = "cli")]
pub mod io;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use error::{ParseCoordError, RegionGrowError, Result};
pub use grid::{Coord, GridAccessor, Intensity, Pixel};
pub use options::GrowOptions;
pub use region::{grow_region, MembershipGrid, RegionBounds, RegionGrower};

// Python bindings (only when python feature is enabled)
#[cfg(feature = "python")]
mod python {
    use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
    use pyo3::exceptions::PyValueError;
    use pyo3::prelude::*;

    use crate::grid::{Coord, Intensity};
    use crate::options::GrowOptions;
    use crate::region::RegionGrower;
    use crate::render;

    type GrowOutput<'py, T> = (Bound<'py, PyArray2<u8>>, Bound<'py, PyArray2<T>>);

    fn grow_impl<'py, T: Intensity + numpy::Element>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, T>,
        seed: Coord,
        options: GrowOptions,
    ) -> PyResult<GrowOutput<'py, T>> {
        let input = image.as_array();
        let mut overlay = input.to_owned();
        let membership = RegionGrower::from_view(input)
            .grow_with(seed, &options, Some(&mut overlay))
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok((
            membership.into_array().into_pyarray(py),
            overlay.into_pyarray(py),
        ))
    }

    // ========================================================================
    // Region Growing
    // ========================================================================

    /// Grow a region from a seed pixel on a u8 grayscale image.
    ///
    /// # Arguments
    /// * `image` - 2-D u8 array (rows, cols)
    /// * `row`, `col` - Seed coordinate
    /// * `tolerance` - Max intensity difference between neighbors (0-255)
    /// * `fill_value` - Value marking region pixels (default: 0)
    /// * `unmarked_value` - Value marking pixels outside the region (default: 255)
    ///
    /// # Returns
    /// Tuple of (membership grid, overlay). Raises ValueError for an
    /// out-of-bounds seed or out-of-range tolerance.
    #[pyfunction]
    #[pyo3(signature = (image, row, col, tolerance=50, fill_value=0, unmarked_value=255))]
    pub fn region_grow<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        row: i64,
        col: i64,
        tolerance: i64,
        fill_value: u8,
        unmarked_value: u8,
    ) -> PyResult<GrowOutput<'py, u8>> {
        let options = GrowOptions {
            tolerance,
            fill_value,
            unmarked_value,
        };
        grow_impl(py, image, Coord::new(row, col), options)
    }

    /// Grow a region on a u16 image (e.g. 12/16-bit captures).
    ///
    /// Same as `region_grow`; tolerance range is 0-65535.
    #[pyfunction]
    #[pyo3(signature = (image, row, col, tolerance=50, fill_value=0, unmarked_value=255))]
    pub fn region_grow_u16<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u16>,
        row: i64,
        col: i64,
        tolerance: i64,
        fill_value: u8,
        unmarked_value: u8,
    ) -> PyResult<GrowOutput<'py, u16>> {
        let options = GrowOptions {
            tolerance,
            fill_value,
            unmarked_value,
        };
        grow_impl(py, image, Coord::new(row, col), options)
    }

    // ========================================================================
    // Derived Renders
    // ========================================================================

    /// Selection mask (255 = in region) for a grown region.
    #[pyfunction]
    #[pyo3(signature = (image, row, col, tolerance=50))]
    pub fn region_mask<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        row: i64,
        col: i64,
        tolerance: i64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let membership = RegionGrower::from_view(image.as_array())
            .grow(Coord::new(row, col), tolerance)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(render::selection_mask(&membership).into_pyarray(py))
    }

    /// Outline (255 = boundary pixel) of a grown region.
    #[pyfunction]
    #[pyo3(signature = (image, row, col, tolerance=50))]
    pub fn region_outline<'py>(
        py: Python<'py>,
        image: PyReadonlyArray2<'py, u8>,
        row: i64,
        col: i64,
        tolerance: i64,
    ) -> PyResult<Bound<'py, PyArray2<u8>>> {
        let membership = RegionGrower::from_view(image.as_array())
            .grow(Coord::new(row, col), tolerance)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(render::region_outline(&membership).into_pyarray(py))
    }

    /// RegionGrow Rust extension module
    #[pymodule]
    pub fn regiongrow_rust(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(region_grow, m)?)?;
        m.add_function(wrap_pyfunction!(region_grow_u16, m)?)?;
        m.add_function(wrap_pyfunction!(region_mask, m)?)?;
        m.add_function(wrap_pyfunction!(region_outline, m)?)?;
        Ok(())
    }
}

#[cfg(feature = "python")]
pub use python::regiongrow_rust;
