//! Configuration for the spatial map.

use lette_foundation::{Error, Result, SIMILAR_EPSILON};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`SpatialMap`](crate::SpatialMap).
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SpatialConfig {
    /// Side length of one grid cell, in world units.
    pub cell_size: f32,

    /// Squared corner displacement under which an update is skipped.
    pub similar_epsilon: f32,
}

impl Default for SpatialConfig {
    fn default() -> Self {
        Self {
            cell_size: Self::DEFAULT_CELL_SIZE,
            similar_epsilon: SIMILAR_EPSILON,
        }
    }
}

impl SpatialConfig {
    /// Default cell size: two 32px tiles.
    pub const DEFAULT_CELL_SIZE: f32 = 64.0;

    /// Creates a configuration with the given cell size.
    #[must_use]
    pub fn new(cell_size: f32) -> Self {
        Self {
            cell_size,
            ..Self::default()
        }
    }

    /// Builder method to set the cell size.
    #[must_use]
    pub fn with_cell_size(mut self, cell_size: f32) -> Self {
        self.cell_size = cell_size;
        self
    }

    /// Builder method to set the update skip threshold.
    #[must_use]
    pub fn with_similar_epsilon(mut self, epsilon: f32) -> Self {
        self.similar_epsilon = epsilon;
        self
    }

    /// Checks that the cell size is finite and positive.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error otherwise.
    pub fn validate(&self) -> Result<()> {
        if self.cell_size.is_finite() && self.cell_size > 0.0 {
            Ok(())
        } else {
            Err(Error::invalid_cell_size(self.cell_size))
        }
    }
}
