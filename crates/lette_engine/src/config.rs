//! Engine configuration.

use std::time::Duration;

use lette_foundation::Result;
use lette_storage::SpatialConfig;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration for a [`LoaderSystem`](crate::LoaderSystem).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LoaderConfig {
    /// Delay before a reload triggered by a file change starts.
    ///
    /// Editors tend to write a file in several steps; waiting lets the last
    /// write land before it is read.
    pub reload_debounce: Duration,

    /// Prefix for worker thread names. The loader's folder is appended.
    pub thread_name_prefix: String,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            reload_debounce: Duration::from_millis(50),
            thread_name_prefix: "lette-loader".to_string(),
        }
    }
}

impl LoaderConfig {
    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method to set the reload debounce.
    #[must_use]
    pub fn with_reload_debounce(mut self, debounce: Duration) -> Self {
        self.reload_debounce = debounce;
        self
    }

    /// Builder method to set the worker thread name prefix.
    #[must_use]
    pub fn with_thread_name_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.thread_name_prefix = prefix.into();
        self
    }
}

/// Top-level configuration for a [`GameState`](crate::GameState).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EngineConfig {
    /// Spatial map tuning.
    pub spatial: SpatialConfig,

    /// Resource loader tuning, shared by every loader.
    pub loader: LoaderConfig,

    /// Scale from simulation positions to pixels.
    pub pixels_per_meter: f32,

    /// Grow sprite boxes by [`BLEED`](lette_foundation::BLEED) so neighbours
    /// sharing an edge still register as overlapping.
    pub bleed_bounds: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            spatial: SpatialConfig::default(),
            loader: LoaderConfig::default(),
            pixels_per_meter: Self::DEFAULT_PIXELS_PER_METER,
            bleed_bounds: true,
        }
    }
}

impl EngineConfig {
    /// Default position scale.
    pub const DEFAULT_PIXELS_PER_METER: f32 = 32.0;

    /// Creates the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Preset for tests and tools: no reload delay, exact sprite boxes.
    #[must_use]
    pub fn immediate() -> Self {
        Self {
            loader: LoaderConfig::default().with_reload_debounce(Duration::ZERO),
            bleed_bounds: false,
            ..Self::default()
        }
    }

    /// Builder method to set the spatial configuration.
    #[must_use]
    pub fn with_spatial(mut self, spatial: SpatialConfig) -> Self {
        self.spatial = spatial;
        self
    }

    /// Builder method to set the loader configuration.
    #[must_use]
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        self.loader = loader;
        self
    }

    /// Builder method to set the position scale.
    #[must_use]
    pub fn with_pixels_per_meter(mut self, pixels_per_meter: f32) -> Self {
        self.pixels_per_meter = pixels_per_meter;
        self
    }

    /// Builder method to toggle bleeding of sprite boxes.
    #[must_use]
    pub fn with_bleed_bounds(mut self, bleed: bool) -> Self {
        self.bleed_bounds = bleed;
        self
    }

    /// Checks the nested spatial configuration.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error if the cell size is unusable.
    pub fn validate(&self) -> Result<()> {
        self.spatial.validate()
    }
}
