//! Resource payloads produced by the loaders.
//!
//! These carry only the data the simulation needs. Decoding textures and the
//! on-disk formats belong to whoever implements
//! [`ResourceLoader`](crate::ResourceLoader).

use lette_foundation::{IVec2, Vec2};

use crate::component::{Component, Id};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// =============================================================================
// Sprite sheets
// =============================================================================

/// One animation strip image inside a sheet.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SheetEntry {
    /// Image file, relative to the sheet.
    pub src: String,
    /// Frame size in pixels.
    pub size: Vec2,
    /// Offset from the entity position to the frame's top-left corner.
    pub decal: Vec2,
    /// Frames per second.
    pub fps: u32,
}

impl SheetEntry {
    /// Milliseconds per frame, or `None` for a still image.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn frame_time(&self) -> Option<f32> {
        (self.fps > 0).then(|| 1000.0 / self.fps as f32)
    }
}

/// A sprite sheet.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Sheet {
    /// Key the sheet was loaded from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub src: String,
    /// Entries, selected by [`Sprite::entry`](crate::Sprite::entry).
    pub entries: Vec<SheetEntry>,
}

impl Sheet {
    /// The entry a sprite index selects, wrapping around the entry count.
    #[must_use]
    pub fn entry(&self, index: usize) -> Option<&SheetEntry> {
        if self.entries.is_empty() {
            None
        } else {
            self.entries.get(index % self.entries.len())
        }
    }
}

// =============================================================================
// Tilesets
// =============================================================================

/// One tileset image.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct TilesetEntry {
    /// Image file, relative to the tileset.
    pub src: String,
    /// Frames per second.
    pub fps: f32,
}

/// A tileset.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Tileset {
    /// Key the tileset was loaded from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub src: String,
    /// Tile size in pixels.
    pub size: IVec2,
    /// Layers.
    pub entries: Vec<TilesetEntry>,
}

// =============================================================================
// Levels
// =============================================================================

/// The components of one entity a level spawns.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EntityDefinition {
    /// Name given to the spawned entity, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub id: Option<Id>,
    /// Components applied in order.
    pub components: Vec<Component>,
}

impl EntityDefinition {
    /// Creates an anonymous definition.
    #[must_use]
    pub fn new(components: Vec<Component>) -> Self {
        Self {
            id: None,
            components,
        }
    }

    /// Builder method to name the spawned entity.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(Id(id.into()));
        self
    }
}

/// A level: the entities it owns.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LevelDefinition {
    /// Key the level was loaded from.
    #[cfg_attr(feature = "serde", serde(default))]
    pub src: String,
    /// Entities spawned for each instance of the level.
    pub entities: Vec<EntityDefinition>,
}
