//! Components that can be attached to world entities.
//!
//! The set is closed: [`Component`] is the sum of every kind and
//! [`ComponentKind`] names them. Level files carry lists of `Component`
//! values, and the world applies them one at a time through
//! [`World::replace`](crate::World::replace).

use std::fmt;
use std::str::FromStr;

use lette_foundation::{Aabb, Error, GenIdx, Result, Vec2};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Resource handles
// =============================================================================

/// A component that names a resource by key and caches its arena handle.
///
/// The handle starts null. A loader fills it in the first tick it sees the
/// component, reusing the handle of any earlier reference to the same key.
pub trait ResourceHandle {
    /// Resource key, relative to the loader's folder.
    fn src(&self) -> &str;

    /// Cached arena handle, or [`GenIdx::NULL`] when unresolved.
    fn idx(&self) -> GenIdx;

    /// Stores a resolved handle.
    fn set_idx(&mut self, idx: GenIdx);

    /// Replaces the resource key.
    fn set_src(&mut self, src: String);

    /// Returns true once a loader has assigned a handle.
    fn is_resolved(&self) -> bool {
        !self.idx().is_null()
    }

    /// Points the component at a different resource.
    ///
    /// Clears the cached handle so the next loader run resolves the new key.
    fn retarget(&mut self, src: impl Into<String>)
    where
        Self: Sized,
    {
        self.set_src(src.into());
        self.set_idx(GenIdx::NULL);
    }
}

macro_rules! resource_handle {
    ($ty:ty) => {
        impl ResourceHandle for $ty {
            fn src(&self) -> &str {
                &self.src
            }

            fn idx(&self) -> GenIdx {
                self.idx
            }

            fn set_idx(&mut self, idx: GenIdx) {
                self.idx = idx;
            }

            fn set_src(&mut self, src: String) {
                self.src = src;
            }
        }
    };
}

// =============================================================================
// Component types
// =============================================================================

/// Simulation position, in meters.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Pos(pub Vec2);

/// Draws one entry of a sprite sheet.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sprite {
    /// Sheet key.
    pub src: String,
    /// Resolved sheet handle.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub idx: GenIdx,
    /// Sheet entry, wrapped around the sheet's entry count.
    #[cfg_attr(feature = "serde", serde(default))]
    pub entry: usize,
}

impl Sprite {
    /// Creates an unresolved sprite drawing the first entry of `src`.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }

    /// Builder method to select a sheet entry.
    #[must_use]
    pub fn with_entry(mut self, entry: usize) -> Self {
        self.entry = entry;
        self
    }
}

resource_handle!(Sprite);

/// Draws a tile layer from a tileset.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tiles {
    /// Tileset key.
    pub src: String,
    /// Resolved tileset handle.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub idx: GenIdx,
}

impl Tiles {
    /// Creates an unresolved tile layer.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            idx: GenIdx::NULL,
        }
    }
}

resource_handle!(Tiles);

/// Instantiates the entities of a level definition.
///
/// `revision` records which load of the definition the current owned
/// entities were built from; it is reset whenever the handle changes.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Level {
    /// Level key.
    pub src: String,
    /// Resolved definition handle.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub idx: GenIdx,
    /// Loader revision the owned entities were built from. Zero means never.
    #[cfg_attr(feature = "serde", serde(skip))]
    pub revision: u64,
}

impl Level {
    /// Creates an unresolved level.
    #[must_use]
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            ..Self::default()
        }
    }
}

impl ResourceHandle for Level {
    fn src(&self) -> &str {
        &self.src
    }

    fn idx(&self) -> GenIdx {
        self.idx
    }

    fn set_idx(&mut self, idx: GenIdx) {
        self.idx = idx;
        self.revision = 0;
    }

    fn set_src(&mut self, src: String) {
        self.src = src;
    }
}

/// Marks an entity as instantiated by a level entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Owner(pub GenIdx);

/// Stable name of an entity within its level.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Id(pub String);

impl From<&str> for Id {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

// =============================================================================
// Component
// =============================================================================

/// Any component, tagged by kind.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(Serialize, Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum Component {
    /// Position.
    Pos(Pos),
    /// Sprite.
    Sprite(Sprite),
    /// Tile layer.
    Tiles(Tiles),
    /// Level instance.
    Level(Level),
    /// Owning level entity.
    Owner(Owner),
    /// Entity name.
    Id(Id),
    /// World-space bounding box, tracked by the spatial map.
    Aabb(Aabb),
}

impl Component {
    /// The kind of this component.
    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        match self {
            Self::Pos(_) => ComponentKind::Pos,
            Self::Sprite(_) => ComponentKind::Sprite,
            Self::Tiles(_) => ComponentKind::Tiles,
            Self::Level(_) => ComponentKind::Level,
            Self::Owner(_) => ComponentKind::Owner,
            Self::Id(_) => ComponentKind::Id,
            Self::Aabb(_) => ComponentKind::Aabb,
        }
    }
}

macro_rules! component_from {
    ($($variant:ident($ty:ty)),* $(,)?) => {
        $(
            impl From<$ty> for Component {
                fn from(value: $ty) -> Self {
                    Self::$variant(value)
                }
            }
        )*
    };
}

component_from!(
    Pos(Pos),
    Sprite(Sprite),
    Tiles(Tiles),
    Level(Level),
    Owner(Owner),
    Id(Id),
    Aabb(Aabb),
);

// =============================================================================
// ComponentKind
// =============================================================================

/// Names the component kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum ComponentKind {
    /// [`Pos`]
    Pos,
    /// [`Sprite`]
    Sprite,
    /// [`Tiles`]
    Tiles,
    /// [`Level`]
    Level,
    /// [`Owner`]
    Owner,
    /// [`Id`]
    Id,
    /// [`Aabb`]
    Aabb,
}

impl ComponentKind {
    /// Every kind, in declaration order.
    pub const ALL: [ComponentKind; 7] = [
        Self::Pos,
        Self::Sprite,
        Self::Tiles,
        Self::Level,
        Self::Owner,
        Self::Id,
        Self::Aabb,
    ];

    /// Lowercase name used in level files.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pos => "pos",
            Self::Sprite => "sprite",
            Self::Tiles => "tiles",
            Self::Level => "level",
            Self::Owner => "owner",
            Self::Id => "id",
            Self::Aabb => "aabb",
        }
    }

    /// Looks a kind up by name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// Returns an `UnknownComponent` error if no kind has that name.
    pub fn from_name(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::unknown_component(name))
    }
}

impl FromStr for ComponentKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_name(s)
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
