//! Integration tests for bounding boxes and integer rectangles
//!
//! Tests overlap rules, rounding onto the integer grid, and similarity.

use lette_foundation::{Aabb, IRect, IVec2, Vec2};

// =============================================================================
// Overlap
// =============================================================================

#[test]
fn contained_box_overlaps() {
    assert!(Aabb::new(0.0, 0.0, 1.0, 1.0).overlaps(&Aabb::new(-1.0, -1.0, 2.0, 2.0)));
}

#[test]
fn touching_edge_does_not_overlap() {
    assert!(!Aabb::new(0.0, 0.0, 1.0, 1.0).overlaps(&Aabb::new(1.0, 0.0, 1.0, 1.0)));
    assert!(!Aabb::new(0.0, 0.0, 1.0, 1.0).overlaps(&Aabb::new(1.0, 0.0, 2.0, 1.0)));
    assert!(!Aabb::new(0.0, 0.0, 1.0, 1.0).overlaps(&Aabb::new(0.0, 1.0, 1.0, 2.0)));
}

#[test]
fn slight_overlap_counts() {
    assert!(Aabb::new(0.0, 0.0, 1.0, 1.0).overlaps(&Aabb::new(0.99, 0.0, 1.0, 1.0)));
}

#[test]
fn bleed_turns_touching_into_overlap() {
    let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
    let b = Aabb::new(1.0, 0.0, 2.0, 1.0);
    assert!(!a.overlaps(&b));
    assert!(a.bleed().overlaps(&b));
}

// =============================================================================
// Rounding
// =============================================================================

#[test]
fn round_snaps_outward() {
    assert_eq!(Aabb::new(0.0, 0.0, 0.1, 0.1).round(), IRect::new(0, 0, 1, 1));
    assert_eq!(Aabb::new(-0.1, -0.1, 0.2, 0.2).round(), IRect::new(-1, -1, 2, 2));
    assert_eq!(Aabb::new(-0.5, 0.5, 3.0, 1.0).round(), IRect::new(-1, 0, 4, 1));
}

#[test]
fn round_of_integer_box_is_exact() {
    assert_eq!(Aabb::new(2.0, 3.0, 5.0, 7.0).round(), IRect::new(2, 3, 3, 4));
}

#[test]
fn scaling_before_rounding() {
    let cell_size = 10.0;
    assert_eq!((Aabb::new(-1.0, -1.0, 2.0, 2.0) / cell_size).round(), IRect::new(-1, -1, 2, 2));
}

#[test]
fn rect_cells_are_column_major() {
    let cells: Vec<_> = IRect::new(-1, 0, 2, 2).cells().collect();
    assert_eq!(
        cells,
        vec![
            IVec2::new(-1, 0),
            IVec2::new(-1, 1),
            IVec2::new(0, 0),
            IVec2::new(0, 1),
        ]
    );
}

#[test]
fn rect_to_aabb() {
    let rect = IRect::new(1, 2, 3, 4);
    assert_eq!(Aabb::from(rect), Aabb::new(1.0, 2.0, 4.0, 6.0));
}

// =============================================================================
// Similarity
// =============================================================================

#[test]
fn tiny_moves_are_similar() {
    let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
    assert!(a.similar(&(a + Vec2::new(0.001, 0.0))));
    assert!(!a.similar(&(a + Vec2::new(0.1, 0.0))));
}

#[test]
fn resizing_breaks_similarity() {
    let a = Aabb::new(0.0, 0.0, 1.0, 1.0);
    assert!(!a.similar(&Aabb::new(0.0, 0.0, 1.5, 1.0)));
}

// =============================================================================
// Validation
// =============================================================================

#[test]
fn inverted_box_is_rejected() {
    assert!(Aabb::new(1.0, 0.0, 0.0, 1.0).validate().is_err());
    assert!(Aabb::new(0.0, 0.0, 0.0, 0.0).validate().is_ok());
}

#[test]
fn from_pos_size() {
    let b = Aabb::from_pos_size(Vec2::new(2.0, 3.0), Vec2::new(4.0, 5.0));
    assert_eq!(b, Aabb::new(2.0, 3.0, 6.0, 8.0));
    assert_eq!(b.size(), Vec2::new(4.0, 5.0));
    assert_eq!(b.center(), Vec2::new(4.0, 5.5));
}
