//! Region growing configuration.

use serde::{Deserialize, Serialize};

use crate::error::{RegionGrowError, Result};
use crate::grid::Intensity;

/// Default tolerance; a reasonable starting point for 8-bit photographs.
pub const DEFAULT_TOLERANCE: i64 = 50;
/// Membership value for pixels inside the region.
pub const DEFAULT_FILL_VALUE: u8 = 0;
/// Membership value for pixels not (yet) in the region.
pub const DEFAULT_UNMARKED_VALUE: u8 = 255;

/// Parameters of a single traversal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GrowOptions {
    /// Maximum absolute intensity difference between adjacent region pixels.
    pub tolerance: i64,
    /// Value written to membership (and overlay) cells inside the region.
    pub fill_value: u8,
    /// Value of membership cells outside the region.
    pub unmarked_value: u8,
}

impl Default for GrowOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            fill_value: DEFAULT_FILL_VALUE,
            unmarked_value: DEFAULT_UNMARKED_VALUE,
        }
    }
}

impl GrowOptions {
    pub fn with_tolerance(tolerance: i64) -> Self {
        Self {
            tolerance,
            ..Self::default()
        }
    }

    pub fn fill_value(mut self, value: u8) -> Self {
        self.fill_value = value;
        self
    }

    pub fn unmarked_value(mut self, value: u8) -> Self {
        self.unmarked_value = value;
        self
    }

    /// Check tolerance range and membership convention for sample type `T`.
    pub fn validate<T: Intensity>(&self) -> Result<()> {
        if !(0..=T::CEILING).contains(&self.tolerance) {
            return Err(RegionGrowError::InvalidTolerance {
                tolerance: self.tolerance,
                max: T::CEILING,
            });
        }
        if self.fill_value == self.unmarked_value {
            return Err(RegionGrowError::InvalidFillValue {
                value: self.fill_value,
            });
        }
        Ok(())
    }
}
