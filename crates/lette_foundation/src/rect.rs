//! Integer rectangles over grid-cell coordinates.

use std::fmt;

use glam::IVec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An integer rectangle anchored at `(x, y)` with a `width` and `height`.
///
/// Used to describe the inclusive range of grid cells a box touches: the cells
/// covered are `x..x + width` by `y..y + height`. A rectangle with a
/// non-positive side covers no cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IRect {
    /// Left edge.
    pub x: i32,
    /// Top edge.
    pub y: i32,
    /// Horizontal extent.
    pub width: i32,
    /// Vertical extent.
    pub height: i32,
}

impl IRect {
    /// Creates a rectangle from its anchor and size.
    #[must_use]
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive lower corner.
    #[must_use]
    pub const fn min(&self) -> IVec2 {
        IVec2::new(self.x, self.y)
    }

    /// Exclusive upper corner, saturating at the edge of `i32`.
    #[must_use]
    pub const fn max(&self) -> IVec2 {
        IVec2::new(
            self.x.saturating_add(self.width),
            self.y.saturating_add(self.height),
        )
    }

    /// Returns true if the rectangle covers no cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Number of cells covered.
    #[must_use]
    pub fn area(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width as usize * self.height as usize
        }
    }

    /// Returns true if the cell lies within the rectangle.
    #[must_use]
    pub fn contains(&self, cell: IVec2) -> bool {
        let max = self.max();
        cell.x >= self.x && cell.x < max.x && cell.y >= self.y && cell.y < max.y
    }

    /// Iterates every covered cell, column by column.
    pub fn cells(&self) -> impl Iterator<Item = IVec2> + use<> {
        let min = self.min();
        let max = self.max();
        (min.x..max.x).flat_map(move |x| (min.y..max.y).map(move |y| IVec2::new(x, y)))
    }
}

impl fmt::Display for IRect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {}x{})", self.x, self.y, self.width, self.height)
    }
}
