//! Lette - generational pools and spatial indexing for a 2D game
//!
//! This crate re-exports all layers of the Lette system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 2: lette_engine      World, components, resource loaders, tick systems
//! Layer 1: lette_storage     Generational allocator and arena, spatial map
//! Layer 0: lette_foundation  Core types (Aabb, IRect, GenIdx, Error)
//! ```

pub use lette_engine as engine;
pub use lette_foundation as foundation;
pub use lette_storage as storage;
