//! Integration tests for the component table
//!
//! Tests kind names and handle bookkeeping.

use lette_engine::{Component, ComponentKind, Level, ResourceHandle, Sprite, Tiles};
use lette_foundation::{Aabb, ErrorKind, GenIdx};

#[test]
fn every_kind_has_a_unique_name() {
    let mut names: Vec<_> = ComponentKind::ALL.iter().map(|k| k.name()).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), ComponentKind::ALL.len());
}

#[test]
fn names_parse_back() {
    for kind in ComponentKind::ALL {
        assert_eq!(kind.to_string().parse::<ComponentKind>().unwrap(), kind);
    }
}

#[test]
fn unknown_names_fail() {
    let err = "physics".parse::<ComponentKind>().unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownComponent(_)));
}

#[test]
fn components_report_their_kind() {
    assert_eq!(Component::from(Aabb::new(0.0, 0.0, 1.0, 1.0)).kind(), ComponentKind::Aabb);
    assert_eq!(Component::from(Tiles::new("ground")).kind(), ComponentKind::Tiles);
}

#[test]
fn handles_start_unresolved() {
    assert!(!Sprite::new("hero").is_resolved());
    assert!(!Tiles::new("ground").is_resolved());
    assert!(!Level::new("intro").is_resolved());
}

#[test]
fn retargeting_a_level_forgets_its_revision() {
    let mut level = Level::new("intro");
    level.set_idx(GenIdx::new(1, 1));
    level.revision = 3;

    level.retarget("outro");
    assert_eq!(level.src, "outro");
    assert!(level.idx.is_null());
    assert_eq!(level.revision, 0);
}
