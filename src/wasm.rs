//! WebAssembly exports for region growing.
//!
//! These functions are exposed to JavaScript via wasm-bindgen. Images are flat
//! row-major u8 grayscale buffers (length = width * height). Invalid seeds or
//! tolerances are returned as JavaScript errors.

use ndarray::{Array2, ArrayView2};
use wasm_bindgen::prelude::*;

use crate::grid::Coord;
use crate::options::GrowOptions;
use crate::region::{MembershipGrid, RegionGrower};

fn grow(
    data: &[u8],
    width: usize,
    height: usize,
    row: i32,
    col: i32,
    options: GrowOptions,
    overlay: Option<&mut Array2<u8>>,
) -> Result<MembershipGrid, JsValue> {
    let input = ArrayView2::from_shape((height, width), data)
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {e}")))?;

    RegionGrower::from_view(input)
        .grow_with(Coord::new(row as i64, col as i64), &options, overlay)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Grow a region and return its membership grid.
///
/// # Arguments
/// * `data` - Flat grayscale bytes (length = width * height)
/// * `width` - Image width in pixels
/// * `height` - Image height in pixels
/// * `row`, `col` - Seed coordinate
/// * `tolerance` - Max intensity difference between neighbors (0-255)
/// * `fill_value` - Value marking region pixels (others are 255, or 0 when fill is 255)
///
/// # Returns
/// Flat membership grid, row-major
#[wasm_bindgen]
pub fn region_grow_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    row: i32,
    col: i32,
    tolerance: i32,
    fill_value: u8,
) -> Result<Vec<u8>, JsValue> {
    let unmarked = if fill_value == u8::MAX { 0 } else { u8::MAX };
    let options = GrowOptions::with_tolerance(tolerance as i64)
        .fill_value(fill_value)
        .unmarked_value(unmarked);

    let membership = grow(data, width, height, row, col, options, None)?;
    Ok(membership.into_array().into_raw_vec_and_offset().0)
}

/// Grow a region and return the source with the region painted in `fill_value`.
///
/// # Returns
/// Flat grayscale bytes, same layout as `data`
#[wasm_bindgen]
pub fn region_overlay_wasm(
    data: &[u8],
    width: usize,
    height: usize,
    row: i32,
    col: i32,
    tolerance: i32,
    fill_value: u8,
) -> Result<Vec<u8>, JsValue> {
    let unmarked = if fill_value == u8::MAX { 0 } else { u8::MAX };
    let options = GrowOptions::with_tolerance(tolerance as i64)
        .fill_value(fill_value)
        .unmarked_value(unmarked);

    let mut overlay = Array2::from_shape_vec((height, width), data.to_vec())
        .map_err(|e| JsValue::from_str(&format!("Invalid dimensions: {e}")))?;
    grow(data, width, height, row, col, options, Some(&mut overlay))?;
    Ok(overlay.into_raw_vec_and_offset().0)
}
