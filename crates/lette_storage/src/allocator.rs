//! Generational index allocation.
//!
//! The `GenIdxAllocator` hands out [`GenIdx`] handles and tracks which of
//! them are still alive, so that references into pooled storage can detect
//! when their slot has been freed and reused.

// Slot counts are bounded by u32 handles
#![allow(clippy::cast_possible_truncation)]

use lette_foundation::GenIdx;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Liveness record for one slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
struct Slot {
    alive: bool,
    generation: u32,
}

/// Issues reuse-safe handles and tracks their liveness.
///
/// Freed indices are reused last-in first-out before the slot array grows.
/// Every allocation stamps a fresh generation from a single monotonic
/// counter; freeing a slot keeps its generation, so handles to it stay stale.
///
/// The counter is 32 bits wide. After `u32::MAX` allocations it wraps back
/// to 1 (zero stays reserved for [`GenIdx::NULL`]), so a handle held across
/// that many allocations could alias a later occupant of its slot. `alloc`
/// never fails; callers that keep handles that long must refresh them.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenIdxAllocator {
    /// One record per index ever handed out.
    slots: Vec<Slot>,
    /// Free list of indices available for reuse.
    free: Vec<u32>,
    /// Generation stamped on the next allocation. Never zero; wraps to 1.
    next_generation: u32,
    /// Count of live handles.
    live_count: usize,
}

impl Default for GenIdxAllocator {
    fn default() -> Self {
        Self::new()
    }
}

impl GenIdxAllocator {
    /// Creates an empty allocator.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty allocator with room for `capacity` slots.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            next_generation: 1,
            live_count: 0,
        }
    }

    /// Allocates a new live handle.
    ///
    /// Reuses the most recently freed index when one is available, otherwise
    /// grows the slot array.
    pub fn alloc(&mut self) -> GenIdx {
        let generation = self.next_generation;
        // Wraps after u32::MAX allocations, skipping the null generation.
        self.next_generation = self.next_generation.wrapping_add(1).max(1);
        self.live_count += 1;

        let slot = Slot {
            alive: true,
            generation,
        };

        if let Some(index) = self.free.pop() {
            self.slots[index as usize] = slot;
            GenIdx::new(index, generation)
        } else {
            let index = self.slots.len() as u32;
            self.slots.push(slot);
            GenIdx::new(index, generation)
        }
    }

    /// Frees a handle.
    ///
    /// Returns `false` and does nothing if the handle is stale, null, or
    /// already freed, so a double free is harmless.
    pub fn dealloc(&mut self, idx: GenIdx) -> bool {
        if !self.is_alive(idx) {
            return false;
        }

        self.slots[idx.slot()].alive = false;
        self.free.push(idx.index);
        self.live_count -= 1;
        true
    }

    /// Returns true if the handle's slot is alive and carries its generation.
    #[must_use]
    pub fn is_alive(&self, idx: GenIdx) -> bool {
        self.slots
            .get(idx.slot())
            .is_some_and(|slot| slot.alive && slot.generation == idx.generation)
    }

    /// Number of slots ever allocated (live or free).
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Returns true if no slot was ever allocated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of live handles.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.live_count
    }

    /// The generation last stamped on a slot, whether it is alive or not.
    #[must_use]
    pub fn generation(&self, index: u32) -> Option<u32> {
        self.slots.get(index as usize).map(|slot| slot.generation)
    }

    /// Iterates over all live handles in index order.
    pub fn iter(&self) -> impl Iterator<Item = GenIdx> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, slot)| slot.alive)
            .map(|(index, slot)| GenIdx::new(index as u32, slot.generation))
    }
}
