//! Core geometry, generational handles, and errors for Lette.
//!
//! This crate provides:
//! - [`Aabb`] - Axis-aligned bounding boxes with half-open overlap
//! - [`IRect`] - Integer rectangles over grid cells
//! - [`GenIdx`] - Generational handles for pooled storage
//! - [`Error`] - Rich error types with context

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod aabb;
pub mod error;
pub mod handle;
pub mod rect;

pub use aabb::{Aabb, BLEED, SIMILAR_EPSILON};
pub use error::{Error, ErrorKind, Result};
pub use glam::{IVec2, Vec2};
pub use handle::GenIdx;
pub use rect::IRect;
