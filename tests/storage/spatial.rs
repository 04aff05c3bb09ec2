//! Integration tests for the spatial map
//!
//! Tests cell indexing, region queries, incremental updates, and removal.

use std::collections::HashSet;

use lette_foundation::{Aabb, IRect};
use lette_storage::{SpatialConfig, SpatialMap};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

fn region(map: &SpatialMap<i32>, bounds: Aabb) -> HashSet<i32> {
    map.region(bounds, false).copied().collect()
}

// =============================================================================
// Cell Indexing
// =============================================================================

#[test]
fn cell_indices() {
    let tens = SpatialMap::<i32>::new(10.0).unwrap();
    assert_eq!(tens.indices(Aabb::new(0.0, 0.0, 1.0, 1.0)), IRect::new(0, 0, 1, 1));
    assert_eq!(tens.indices(Aabb::new(-1.0, -1.0, 2.0, 2.0)), IRect::new(-1, -1, 2, 2));

    let ones = SpatialMap::<i32>::new(1.0).unwrap();
    assert_eq!(ones.indices(Aabb::new(-0.5, 0.5, 3.0, 1.0)), IRect::new(-1, 0, 4, 1));
}

#[test]
fn cells_for_creates_only_on_request() {
    let mut map = SpatialMap::<i32>::new(10.0).unwrap();
    assert_eq!(map.cells_for(Aabb::new(0.0, 0.0, 1.0, 1.0), false).count(), 0);
    assert_eq!(map.cells_for(Aabb::new(-1.0, -1.0, 2.0, 2.0), true).count(), 4);
    assert_eq!(map.cell_count(), 4);
}

// =============================================================================
// Region Queries
// =============================================================================

#[test]
fn insert_update_remove() {
    let mut map = SpatialMap::new(1.0).unwrap();
    let mut entry = map.add(1, Aabb::new(0.0, 0.0, 1.0, 1.0)).unwrap();
    assert_eq!(region(&map, Aabb::new(-1.0, -1.0, 2.0, 2.0)), HashSet::from([1]));

    map.update(&mut entry, Aabb::new(3.0, 3.0, 4.0, 4.0)).unwrap();
    assert!(region(&map, Aabb::new(-1.0, -1.0, 2.0, 2.0)).is_empty());
    assert_eq!(region(&map, Aabb::new(2.0, 2.0, 3.5, 3.5)), HashSet::from([1]));

    map.remove(&entry);
    assert!(region(&map, Aabb::new(-1.0, -1.0, 5.0, 5.0)).is_empty());
}

#[test]
fn shared_cell_update() {
    let mut map = SpatialMap::new(1.0).unwrap();
    let mut one = map.add(1, Aabb::new(0.25, 0.25, 0.75, 0.75)).unwrap();
    map.add(2, Aabb::new(0.25, 0.25, 0.75, 0.75)).unwrap();
    assert_eq!(region(&map, Aabb::new(0.0, 0.0, 1.0, 1.0)), HashSet::from([1, 2]));

    map.update(&mut one, Aabb::new(-0.75, 0.25, -0.25, 0.75)).unwrap();
    assert_eq!(region(&map, Aabb::new(0.0, 0.0, 1.0, 1.0)), HashSet::from([2]));
    assert_eq!(region(&map, Aabb::new(-1.0, 0.0, 0.0, 1.0)), HashSet::from([1]));

    map.update(&mut one, Aabb::new(-9.5, 1.0, -8.5, 2.0)).unwrap();
    assert_eq!(region(&map, Aabb::new(-10.0, -8.0, 0.0, 3.0)), HashSet::from([1]));
}

#[test]
fn idempotent_removal() {
    let mut map = SpatialMap::new(1.0).unwrap();
    let entry = map.add(1, Aabb::new(0.0, 0.0, 2.0, 2.0)).unwrap();
    map.add(2, Aabb::new(5.0, 5.0, 6.0, 6.0)).unwrap();

    map.remove(&entry);
    let cells = map.cell_count();
    let found = region(&map, Aabb::new(-10.0, -10.0, 10.0, 10.0));

    map.remove(&entry);
    assert_eq!(map.cell_count(), cells);
    assert_eq!(region(&map, Aabb::new(-10.0, -10.0, 10.0, 10.0)), found);
}

#[test]
fn multi_cell_entries_are_yielded_once() {
    let mut map = SpatialMap::new(1.0).unwrap();
    map.add(9, Aabb::new(0.0, 0.0, 10.0, 10.0)).unwrap();

    assert_eq!(map.region(Aabb::new(-1.0, -1.0, 11.0, 11.0), false).count(), 1);
}

#[test]
fn composite_values_dedup_structurally() {
    let mut map = SpatialMap::new(1.0).unwrap();
    map.add(("door", 1), Aabb::new(0.0, 0.0, 3.0, 1.0)).unwrap();
    map.add(("door", 2), Aabb::new(0.0, 0.0, 3.0, 1.0)).unwrap();

    assert_eq!(map.region(Aabb::new(0.0, 0.0, 3.0, 1.0), false).count(), 2);
    assert_eq!(map.len(), 2);
}

// =============================================================================
// Randomized Agreement
// =============================================================================

#[test]
fn seeded_world_matches_brute_force() {
    let mut rng = ChaCha8Rng::seed_from_u64(0x1e77e);
    let mut map = SpatialMap::with_config(SpatialConfig::new(8.0).with_similar_epsilon(0.0)).unwrap();

    let mut boxes = Vec::new();
    let mut entries = Vec::new();
    for i in 0..200 {
        let x = rng.gen_range(-100.0..100.0);
        let y = rng.gen_range(-100.0..100.0);
        let b = Aabb::new(x, y, x + rng.gen_range(0.5..20.0), y + rng.gen_range(0.5..20.0));
        boxes.push(b);
        entries.push(map.add(i, b).unwrap());
    }

    for step in 0..5 {
        for (i, entry) in entries.iter_mut().enumerate() {
            let dx = rng.gen_range(-6.0..6.0);
            let dy = rng.gen_range(-6.0..6.0);
            let moved = Aabb::new(
                boxes[i].min.x + dx,
                boxes[i].min.y + dy,
                boxes[i].max.x + dx,
                boxes[i].max.y + dy,
            );
            map.update(entry, moved).unwrap();
            boxes[i] = moved;
        }

        let qx = rng.gen_range(-100.0..80.0);
        let qy = rng.gen_range(-100.0..80.0);
        let query = Aabb::new(qx, qy, qx + 40.0, qy + 30.0);

        let expected: HashSet<i32> = boxes
            .iter()
            .enumerate()
            .filter(|(_, b)| b.overlaps(&query))
            .map(|(i, _)| i32::try_from(i).unwrap())
            .collect();
        assert_eq!(region(&map, query), expected, "step {step}");
    }
}
