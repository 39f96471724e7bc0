//! File I/O for the `region-grow` tool.
//!
//! - `load_grayscale`: decode any supported image into an 8-bit intensity grid
//! - `save_grayscale`: encode an 8-bit grid (format chosen by extension)
//! - `load_config`: read the JSON tool configuration
//! - `write_json_file`: pretty-print a serializable value to disk

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{GrayImage, ImageBuffer, Luma};
use ndarray::{Array2, ArrayView2};
use serde::{Deserialize, Serialize};

use crate::options::GrowOptions;

pub const DEFAULT_OVERLAY_PATH: &str = "output.jpg";
pub const DEFAULT_REGION_MAP_PATH: &str = "regionMap.jpg";

/// JSON configuration for one tool run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolConfig {
    pub input: Option<PathBuf>,
    /// Seed as text, e.g. `"(12, 40)"`.
    pub seed: Option<String>,
    /// When absent, the tolerance is asked for interactively.
    pub grow: Option<GrowOptions>,
    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Source image with the region painted in the fill value.
    pub overlay: PathBuf,
    /// Membership grid as an image.
    pub region_map: PathBuf,
    /// Optional JSON summary of the grown region.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub summary: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            overlay: PathBuf::from(DEFAULT_OVERLAY_PATH),
            region_map: PathBuf::from(DEFAULT_REGION_MAP_PATH),
            summary: None,
        }
    }
}

pub fn load_config(path: &Path) -> Result<ToolConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("failed to read config {}", path.display()))?;
    serde_json::from_str(&data)
        .with_context(|| format!("failed to parse config {}", path.display()))
}

/// Load an image from disk as an 8-bit grayscale grid of shape (rows, cols).
pub fn load_grayscale(path: &Path) -> Result<Array2<u8>> {
    let img = image::open(path)
        .with_context(|| format!("failed to open {}", path.display()))?
        .into_luma8();
    let rows = img.height() as usize;
    let cols = img.width() as usize;
    Array2::from_shape_vec((rows, cols), img.into_raw())
        .with_context(|| format!("unexpected pixel buffer size for {}", path.display()))
}

/// Save an 8-bit grid as a grayscale image.
pub fn save_grayscale(grid: ArrayView2<'_, u8>, path: &Path) -> Result<()> {
    ensure_parent_dir(path)?;
    let (rows, cols) = grid.dim();
    let data: Vec<u8> = grid.iter().copied().collect();
    let image: GrayImage = ImageBuffer::<Luma<u8>, Vec<u8>>::from_raw(cols as u32, rows as u32, data)
        .context("failed to create image buffer")?;
    image
        .save(path)
        .with_context(|| format!("failed to save {}", path.display()))
}

/// Serialize a value as pretty JSON to `path`, creating parent directories.
pub fn write_json_file<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    ensure_parent_dir(path)?;
    let json = serde_json::to_string_pretty(value)
        .with_context(|| format!("failed to serialize JSON for {}", path.display()))?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("failed to create {}", parent.display()))?;
        }
    }
    Ok(())
}
