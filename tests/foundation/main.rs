//! Integration tests for Layer 0: Foundation
//!
//! Tests for bounding boxes, integer rectangles, handles, and errors.

mod aabb;
mod handles;
