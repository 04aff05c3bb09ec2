//! Generational storage and spatial indexing for Lette.
//!
//! This crate provides:
//! - [`GenIdxAllocator`] - Generational slot allocation with a LIFO free list
//! - [`GenArr`] - Dense arena of values addressed by [`GenIdx`](lette_foundation::GenIdx)
//! - [`SpatialMap`] - Uniform grid for broad-phase region queries
//! - [`SpatialConfig`] - Grid tuning

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod allocator;
pub mod arena;
pub mod config;
pub mod spatial;

pub use allocator::GenIdxAllocator;
pub use arena::GenArr;
pub use config::SpatialConfig;
pub use spatial::{SpatialEntry, SpatialMap};
