//! Uniform-grid spatial map for broad-phase region queries.
//!
//! Space is cut into square cells of `cell_size`. An entry is stored in every
//! cell its box's rounded footprint touches, so a region query only has to
//! visit the cells under the query box. Moving entries are updated
//! incrementally: only the cells they leave or enter are touched.
//!
//! # Invariant
//!
//! Between calls, an entry with bounds `b` is present in exactly the cells of
//! [`SpatialMap::indices`]`(b)`. A cell with no entries is either missing or
//! empty; queries treat both the same, and removal prunes emptied cells.

use std::collections::{HashMap, HashSet};
use std::hash::Hash;

use lette_foundation::{Aabb, Error, IRect, IVec2, Result};

use crate::config::SpatialConfig;

/// A value placed in the map together with the box it was placed under.
///
/// Returned by [`SpatialMap::add`] and handed back to
/// [`SpatialMap::update`]/[`SpatialMap::remove`]. The bounds are only changed
/// by the map itself.
#[derive(Clone, Debug, PartialEq)]
pub struct SpatialEntry<T> {
    bounds: Aabb,
    value: T,
}

impl<T> SpatialEntry<T> {
    /// The box this entry is currently filed under.
    #[must_use]
    pub fn bounds(&self) -> Aabb {
        self.bounds
    }

    /// The stored value.
    #[must_use]
    pub fn value(&self) -> &T {
        &self.value
    }
}

/// A uniform grid of cells, each holding the entries that touch it.
///
/// Values are matched by equality when entries are removed or moved, and
/// region queries yield each value once even when it spans several cells.
#[derive(Clone, Debug)]
pub struct SpatialMap<T> {
    config: SpatialConfig,
    cells: HashMap<IVec2, Vec<SpatialEntry<T>>>,
}

impl<T> Default for SpatialMap<T> {
    fn default() -> Self {
        Self {
            config: SpatialConfig::default(),
            cells: HashMap::new(),
        }
    }
}

impl<T> SpatialMap<T> {
    /// Creates an empty map with the given cell size.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error if `cell_size` is not finite and
    /// positive.
    pub fn new(cell_size: f32) -> Result<Self> {
        Self::with_config(SpatialConfig::new(cell_size))
    }

    /// Creates an empty map from a full configuration.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error if the configured cell size is not
    /// finite and positive.
    pub fn with_config(config: SpatialConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            cells: HashMap::new(),
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &SpatialConfig {
        &self.config
    }

    /// Side length of one cell.
    #[must_use]
    pub fn cell_size(&self) -> f32 {
        self.config.cell_size
    }

    /// The range of cell coordinates a box's footprint touches.
    #[must_use]
    pub fn indices(&self, bounds: Aabb) -> IRect {
        (bounds / self.config.cell_size).round()
    }

    /// Like [`SpatialMap::indices`], for boxes about to be stored.
    ///
    /// # Errors
    ///
    /// - `InvertedBounds` if `bounds` has `min > max`
    /// - `OutOfRange` if `bounds` is not finite or its cells fall outside
    ///   `i32` coordinates
    pub fn checked_indices(&self, bounds: Aabb) -> Result<IRect> {
        let bounds = bounds.validate()?;
        (bounds / self.config.cell_size)
            .try_round()
            .ok_or_else(|| Error::out_of_range(bounds))
    }

    /// The existing cells under `bounds`. Missing cells are skipped.
    pub fn cells(&self, bounds: Aabb) -> impl Iterator<Item = &[SpatialEntry<T>]> + '_ {
        self.indices(bounds)
            .cells()
            .filter_map(|cell| self.cells.get(&cell).map(Vec::as_slice))
    }

    /// The cells under `bounds`, creating empty ones first when `create` is set.
    pub fn cells_for(
        &mut self,
        bounds: Aabb,
        create: bool,
    ) -> impl Iterator<Item = &[SpatialEntry<T>]> + '_ {
        if create {
            for cell in self.indices(bounds).cells() {
                self.cells.entry(cell).or_default();
            }
        }
        self.cells(bounds)
    }

    /// Number of cells currently allocated, including empty ones.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Returns true if no cell holds an entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Drops every entry and cell.
    pub fn clear(&mut self) {
        self.cells.clear();
    }
}

impl<T: Clone + PartialEq> SpatialMap<T> {
    /// Files `value` under `bounds` and returns the entry for later updates.
    ///
    /// # Errors
    ///
    /// Returns an `InvertedBounds` or `OutOfRange` error, as
    /// [`SpatialMap::checked_indices`] does; nothing is stored then.
    pub fn add(&mut self, value: T, bounds: Aabb) -> Result<SpatialEntry<T>> {
        let cells = self.checked_indices(bounds)?;
        let entry = SpatialEntry { bounds, value };
        for cell in cells.cells() {
            self.cells.entry(cell).or_default().push(entry.clone());
        }
        Ok(entry)
    }

    /// Removes an entry from every cell it is filed under.
    ///
    /// Removing an entry that is not present does nothing.
    pub fn remove(&mut self, entry: &SpatialEntry<T>) {
        for cell in self.indices(entry.bounds).cells() {
            self.remove_from_cell(cell, &entry.value);
        }
    }

    /// Moves an entry to `bounds`, touching only the cells that change.
    ///
    /// Skipped when the new box is within the configured similarity epsilon
    /// of the current one. Otherwise the entry is dropped from cells it left,
    /// refreshed in cells it stays in, appended to cells it entered, and its
    /// bounds are rewritten in place. Returns whether anything moved.
    ///
    /// # Errors
    ///
    /// Returns an `InvertedBounds` or `OutOfRange` error, as
    /// [`SpatialMap::checked_indices`] does; the map and entry are left
    /// unchanged.
    pub fn update(&mut self, entry: &mut SpatialEntry<T>, bounds: Aabb) -> Result<bool> {
        let new = self.checked_indices(bounds)?;
        if entry
            .bounds
            .similar_within(&bounds, self.config.similar_epsilon)
        {
            return Ok(false);
        }

        let old = self.indices(entry.bounds);

        for cell in old.cells().filter(|cell| !new.contains(*cell)) {
            self.remove_from_cell(cell, &entry.value);
        }

        entry.bounds = bounds;

        for cell in new.cells() {
            let list = self.cells.entry(cell).or_default();
            match list.iter_mut().find(|e| e.value == entry.value) {
                Some(existing) => existing.bounds = bounds,
                None => list.push(entry.clone()),
            }
        }

        Ok(true)
    }

    /// Returns true if the entry's value is filed in any of its cells.
    #[must_use]
    pub fn contains(&self, entry: &SpatialEntry<T>) -> bool {
        self.cells(entry.bounds)
            .any(|cell| cell.iter().any(|e| e.value == entry.value))
    }

    fn remove_from_cell(&mut self, cell: IVec2, value: &T) {
        if let Some(list) = self.cells.get_mut(&cell) {
            list.retain(|e| e.value != *value);
            if list.is_empty() {
                self.cells.remove(&cell);
            }
        }
    }
}

impl<T: Eq + Hash> SpatialMap<T> {
    /// Values filed in the cells under `bounds`, each yielded once.
    ///
    /// Unless `loose` is set, only values whose stored bounds overlap `bounds`
    /// are yielded; a loose query returns everything in the visited cells.
    /// The sequence is rebuilt on every call and borrows the map, so the map
    /// cannot change while it is being consumed.
    pub fn region(&self, bounds: Aabb, loose: bool) -> impl Iterator<Item = &T> + '_ {
        let mut seen = HashSet::new();
        self.cells(bounds)
            .flat_map(|cell| cell.iter())
            .filter(move |e| loose || e.bounds.overlaps(&bounds))
            .map(|e| &e.value)
            .filter(move |value| seen.insert(*value))
    }

    /// Number of distinct values in the map.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells
            .values()
            .flatten()
            .map(|e| &e.value)
            .collect::<HashSet<_>>()
            .len()
    }
}
