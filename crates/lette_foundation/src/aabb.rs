//! Axis-aligned bounding boxes.

use std::fmt;
use std::ops::{Add, Div, Mul, Sub};

use glam::Vec2;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::rect::IRect;

/// Expansion applied on every side by [`Aabb::bleed`].
pub const BLEED: f32 = 0.001;

/// Squared corner displacement under which two boxes count as unmoved.
pub const SIMILAR_EPSILON: f32 = 0.001;

/// A 2D box spanning `min..max` on both axes.
///
/// Boxes that get stored anywhere must satisfy `min <= max` componentwise;
/// [`Aabb::validate`] checks this at API boundaries. Overlap is half-open:
/// boxes that only share an edge do not overlap.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Aabb {
    /// Lower corner.
    pub min: Vec2,
    /// Upper corner.
    pub max: Vec2,
}

impl Aabb {
    /// Creates a box from corner coordinates.
    #[must_use]
    pub const fn new(min_x: f32, min_y: f32, max_x: f32, max_y: f32) -> Self {
        Self {
            min: Vec2::new(min_x, min_y),
            max: Vec2::new(max_x, max_y),
        }
    }

    /// Creates a box from its two corners.
    #[must_use]
    pub const fn from_min_max(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Creates a box anchored at `pos` extending by `size`.
    #[must_use]
    pub fn from_pos_size(pos: Vec2, size: Vec2) -> Self {
        Self {
            min: pos,
            max: pos + size,
        }
    }

    /// Extent on both axes.
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }

    /// Midpoint.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Returns true if `min <= max` on both axes and no coordinate is NaN.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.min.x <= self.max.x && self.min.y <= self.max.y
    }

    /// Returns the box unchanged if it is well formed.
    ///
    /// # Errors
    ///
    /// Returns an `InvertedBounds` error if `min > max` on either axis.
    pub fn validate(self) -> Result<Self> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::inverted_bounds(self))
        }
    }

    /// Strict overlap test. Touching edges do not count.
    #[must_use]
    pub fn overlaps(&self, other: &Aabb) -> bool {
        self.min.x < other.max.x
            && other.min.x < self.max.x
            && self.min.y < other.max.y
            && other.min.y < self.max.y
    }

    /// Snaps the box outward to integer coordinates.
    ///
    /// The result is anchored at `floor(min)` with size
    /// `ceil(max) - floor(min)`. Coordinates beyond `i32` saturate; use
    /// [`Aabb::try_round`] where that must be detected.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn round(&self) -> IRect {
        let min = self.min.floor();
        let max = self.max.ceil();
        IRect::new(
            min.x as i32,
            min.y as i32,
            (max.x - min.x) as i32,
            (max.y - min.y) as i32,
        )
    }

    /// Like [`Aabb::round`], but `None` when a corner is not finite or the
    /// snapped rectangle does not fit in `i32` coordinates.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn try_round(&self) -> Option<IRect> {
        // 2^31, the first float past i32::MAX.
        const LIMIT: f32 = 2_147_483_648.0;
        let fits = |v: f32| (-LIMIT..LIMIT).contains(&v);

        let min = self.min.floor();
        let max = self.max.ceil();
        if !(fits(min.x) && fits(min.y) && fits(max.x) && fits(max.y)) {
            return None;
        }
        let (x, y) = (min.x as i32, min.y as i32);
        let width = (max.x as i32).checked_sub(x)?;
        let height = (max.y as i32).checked_sub(y)?;
        Some(IRect::new(x, y, width, height))
    }

    /// Component-wise intersection.
    ///
    /// Disjoint inputs yield an inverted box; check [`Aabb::overlaps`] first
    /// when emptiness matters.
    #[must_use]
    pub fn intersect(&self, other: &Aabb) -> Aabb {
        Aabb {
            min: self.min.max(other.min),
            max: self.max.min(other.max),
        }
    }

    /// Grows the box by [`BLEED`] on every side.
    #[must_use]
    pub fn bleed(&self) -> Aabb {
        let bleed = Vec2::splat(BLEED);
        Aabb {
            min: self.min - bleed,
            max: self.max + bleed,
        }
    }

    /// Returns true if both corners moved less than [`SIMILAR_EPSILON`]
    /// (squared distance).
    #[must_use]
    pub fn similar(&self, other: &Aabb) -> bool {
        self.similar_within(other, SIMILAR_EPSILON)
    }

    /// Like [`Aabb::similar`] with an explicit squared-distance threshold.
    #[must_use]
    pub fn similar_within(&self, other: &Aabb, epsilon: f32) -> bool {
        self.min.distance_squared(other.min) < epsilon
            && self.max.distance_squared(other.max) < epsilon
    }
}

impl Mul<f32> for Aabb {
    type Output = Aabb;

    fn mul(self, rhs: f32) -> Aabb {
        Aabb::from_min_max(self.min * rhs, self.max * rhs)
    }
}

impl Div<f32> for Aabb {
    type Output = Aabb;

    fn div(self, rhs: f32) -> Aabb {
        Aabb::from_min_max(self.min / rhs, self.max / rhs)
    }
}

impl Div<Vec2> for Aabb {
    type Output = Aabb;

    fn div(self, rhs: Vec2) -> Aabb {
        Aabb::from_min_max(self.min / rhs, self.max / rhs)
    }
}

impl Add<Vec2> for Aabb {
    type Output = Aabb;

    fn add(self, rhs: Vec2) -> Aabb {
        Aabb::from_min_max(self.min + rhs, self.max + rhs)
    }
}

impl Sub<Vec2> for Aabb {
    type Output = Aabb;

    fn sub(self, rhs: Vec2) -> Aabb {
        Aabb::from_min_max(self.min - rhs, self.max - rhs)
    }
}

impl From<IRect> for Aabb {
    fn from(rect: IRect) -> Self {
        Aabb::from_min_max(rect.min().as_vec2(), rect.max().as_vec2())
    }
}

impl fmt::Display for Aabb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}:{}]", self.min, self.max)
    }
}
