//! Integration tests for Layer 1: Storage
//!
//! Tests for the generational allocator, arenas, and the spatial map.

mod allocator;
mod arena;
mod spatial;
