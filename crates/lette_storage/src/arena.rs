//! Generational arena storage.
//!
//! A `GenArr` pairs a [`GenIdxAllocator`] with a dense payload vector. Every
//! read and write is checked against the allocator, so a handle that has been
//! freed (or whose slot has been handed to someone else) can never observe or
//! clobber the current occupant.

use lette_foundation::GenIdx;

use crate::allocator::GenIdxAllocator;

/// One payload slot, tagged with the generation that wrote it.
#[derive(Debug, Clone)]
struct Entry<T> {
    value: Option<T>,
    generation: u32,
}

impl<T> Default for Entry<T> {
    fn default() -> Self {
        Self {
            value: None,
            generation: 0,
        }
    }
}

/// Dense pool of optional payloads keyed by generational handles.
///
/// Allocating a handle does not store anything; the slot reads as absent
/// until [`GenArr::set`] fills it. Writes through a dead handle are dropped
/// silently: a writer that finished after its handle was freed must not
/// resurrect the slot.
#[derive(Debug, Clone)]
pub struct GenArr<T> {
    allocator: GenIdxAllocator,
    backing: Vec<Entry<T>>,
}

impl<T> Default for GenArr<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> GenArr<T> {
    /// Creates an empty arena.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty arena with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            allocator: GenIdxAllocator::with_capacity(capacity),
            backing: Vec::with_capacity(capacity),
        }
    }

    /// The allocator that decides which handles are alive.
    #[must_use]
    pub fn allocator(&self) -> &GenIdxAllocator {
        &self.allocator
    }

    /// Allocates a handle whose slot starts out empty.
    pub fn alloc(&mut self) -> GenIdx {
        let idx = self.allocator.alloc();
        if self.backing.len() < self.allocator.len() {
            self.backing.resize_with(self.allocator.len(), Entry::default);
        }
        idx
    }

    /// Allocates a handle and stores `value` behind it.
    pub fn insert(&mut self, value: T) -> GenIdx {
        let idx = self.alloc();
        self.backing[idx.slot()] = Entry {
            value: Some(value),
            generation: idx.generation,
        };
        idx
    }

    /// Frees a handle and drops its payload.
    ///
    /// Returns `false` if the handle was already dead.
    pub fn dealloc(&mut self, idx: GenIdx) -> bool {
        if !self.allocator.dealloc(idx) {
            return false;
        }
        self.backing[idx.slot()].value = None;
        true
    }

    /// Returns true if the handle is alive.
    #[must_use]
    pub fn is_alive(&self, idx: GenIdx) -> bool {
        self.allocator.is_alive(idx)
    }

    /// Reads the payload behind a live handle.
    ///
    /// Returns `None` when the handle is dead, stale, or not yet written.
    #[must_use]
    pub fn get(&self, idx: GenIdx) -> Option<&T> {
        if !self.allocator.is_alive(idx) {
            return None;
        }
        self.backing
            .get(idx.slot())
            .filter(|entry| entry.generation == idx.generation)
            .and_then(|entry| entry.value.as_ref())
    }

    /// Mutable access to the payload behind a live handle.
    pub fn get_mut(&mut self, idx: GenIdx) -> Option<&mut T> {
        if !self.allocator.is_alive(idx) {
            return None;
        }
        self.backing
            .get_mut(idx.slot())
            .filter(|entry| entry.generation == idx.generation)
            .and_then(|entry| entry.value.as_mut())
    }

    /// Stores `value` behind a live handle, replacing any previous payload.
    ///
    /// Returns `false` and drops `value` if the handle is not alive.
    pub fn set(&mut self, idx: GenIdx, value: T) -> bool {
        if !self.allocator.is_alive(idx) {
            return false;
        }
        if self.backing.len() <= idx.slot() {
            self.backing.resize_with(idx.slot() + 1, Entry::default);
        }
        self.backing[idx.slot()] = Entry {
            value: Some(value),
            generation: idx.generation,
        };
        true
    }

    /// Removes the payload behind a live handle, leaving the handle alive.
    pub fn take(&mut self, idx: GenIdx) -> Option<T> {
        if !self.allocator.is_alive(idx) {
            return None;
        }
        self.backing
            .get_mut(idx.slot())
            .filter(|entry| entry.generation == idx.generation)
            .and_then(|entry| entry.value.take())
    }

    /// Number of live handles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.allocator.live_count()
    }

    /// Returns true if no handle is alive.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.allocator.live_count() == 0
    }

    /// Iterates over `(handle, payload)` for every live, filled slot.
    ///
    /// The iterator is recomputed on each call and reflects the arena as it is
    /// now.
    pub fn iter(&self) -> impl Iterator<Item = (GenIdx, &T)> + '_ {
        let allocator = &self.allocator;
        self.backing.iter().enumerate().filter_map(move |(index, entry)| {
            let idx = slot_handle(index, entry.generation);
            match &entry.value {
                Some(value) if allocator.is_alive(idx) => Some((idx, value)),
                _ => None,
            }
        })
    }

    /// Mutable variant of [`GenArr::iter`].
    pub fn iter_mut(&mut self) -> impl Iterator<Item = (GenIdx, &mut T)> + '_ {
        let allocator = &self.allocator;
        self.backing
            .iter_mut()
            .enumerate()
            .filter_map(move |(index, entry)| {
                let idx = slot_handle(index, entry.generation);
                match &mut entry.value {
                    Some(value) if allocator.is_alive(idx) => Some((idx, value)),
                    _ => None,
                }
            })
    }

    /// Iterates over every live, filled payload.
    pub fn values(&self) -> impl Iterator<Item = &T> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Mutable variant of [`GenArr::values`].
    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut T> + '_ {
        self.iter_mut().map(|(_, value)| value)
    }

    /// Iterates over every live handle, filled or not.
    pub fn handles(&self) -> impl Iterator<Item = GenIdx> + '_ {
        self.allocator.iter()
    }
}

#[allow(clippy::cast_possible_truncation)]
fn slot_handle(index: usize, generation: u32) -> GenIdx {
    GenIdx::new(index as u32, generation)
}
