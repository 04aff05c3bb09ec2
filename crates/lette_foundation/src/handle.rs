//! Generational handles into pooled storage.

use std::fmt;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Reuse-safe reference to a pooled slot.
///
/// A handle names a slot by `index` and pins the `generation` that was live
/// when it was issued. Once the slot is freed and handed out again, the new
/// occupant carries a different generation, so the old handle is detectably
/// stale forever.
///
/// A generation of `0` is never issued and marks the null handle.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GenIdx {
    /// Slot index in the backing storage.
    pub index: u32,
    /// Generation stamped on the slot when this handle was allocated.
    pub generation: u32,
}

impl GenIdx {
    /// The unset handle. Never alive in any allocator.
    pub const NULL: Self = Self {
        index: 0,
        generation: 0,
    };

    /// Creates a handle from its raw parts.
    #[must_use]
    pub const fn new(index: u32, generation: u32) -> Self {
        Self { index, generation }
    }

    /// Returns true if this is the null handle.
    #[must_use]
    pub const fn is_null(self) -> bool {
        self.generation == 0
    }

    /// Slot index as a `usize`, for indexing backing vectors.
    #[must_use]
    pub const fn slot(self) -> usize {
        self.index as usize
    }
}

impl fmt::Debug for GenIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "GenIdx(null)")
        } else {
            write!(f, "GenIdx({}v{})", self.index, self.generation)
        }
    }
}

impl fmt::Display for GenIdx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_null() {
            write!(f, "null")
        } else {
            write!(f, "#{}", self.index)
        }
    }
}
