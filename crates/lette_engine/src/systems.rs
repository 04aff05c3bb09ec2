//! Per-tick systems that derive world state from loaded resources.

use log::{debug, warn};

use lette_foundation::{Aabb, GenIdx};

use crate::component::{Component, ComponentKind, Level, Owner, Pos, ResourceHandle};
use crate::config::EngineConfig;
use crate::loader::LoaderSystem;
use crate::resource::{LevelDefinition, Sheet, SheetEntry};
use crate::world::World;

// =============================================================================
// BoundsSystem
// =============================================================================

/// Derives each sprite's world-space box from its position and sheet entry.
///
/// Entities whose sheet has not loaded yet keep whatever bounds they had.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoundsSystem {
    pixels_per_meter: f32,
    bleed: bool,
}

impl Default for BoundsSystem {
    fn default() -> Self {
        Self::from_config(&EngineConfig::default())
    }
}

impl BoundsSystem {
    /// Creates a bounds system.
    #[must_use]
    pub fn new(pixels_per_meter: f32, bleed: bool) -> Self {
        Self {
            pixels_per_meter,
            bleed,
        }
    }

    /// Creates a bounds system from engine settings.
    #[must_use]
    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.pixels_per_meter, config.bleed_bounds)
    }

    /// The box a sprite entry occupies at `pos`.
    ///
    /// The frame is anchored so that `decal` lands on the scaled position.
    #[must_use]
    pub fn sprite_bounds(&self, Pos(pos): Pos, entry: &SheetEntry) -> Aabb {
        let min = pos * self.pixels_per_meter - entry.decal;
        let bounds = Aabb::from_min_max(min, min + entry.size);
        if self.bleed { bounds.bleed() } else { bounds }
    }

    /// Updates the bounds of every positioned sprite whose sheet is loaded.
    ///
    /// A box the spatial map rejects, such as one from a sheet entry with a
    /// negative size, is logged and that entity keeps its previous bounds.
    /// Returns how many entities were given bounds.
    pub fn run(&self, world: &mut World, sheets: &LoaderSystem<Sheet>) -> usize {
        let updates: Vec<(GenIdx, Aabb)> = world
            .with(ComponentKind::Sprite)
            .filter_map(|entity| {
                let pos = world.pos(entity)?;
                let sprite = world.sprite(entity)?;
                let entry = sheets.get(sprite.idx())?.entry(sprite.entry)?;
                Some((entity, self.sprite_bounds(pos, entry)))
            })
            .collect();

        let mut updated = 0;
        for (entity, bounds) in updates {
            match world.replace(entity, bounds) {
                Ok(()) => updated += 1,
                Err(err) => warn!("entity {entity}: kept previous bounds: {err}"),
            }
        }
        updated
    }
}

// =============================================================================
// LevelSystem
// =============================================================================

/// Instantiates level definitions into owned entities.
///
/// Whenever a level's definition is (re)loaded, the entities the level
/// entity owns are destroyed and rebuilt from the new definition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct LevelSystem;

impl LevelSystem {
    /// Creates a level system.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Rebuilds every level whose loaded revision changed.
    ///
    /// Entity definitions that cannot be applied are logged and skipped.
    /// Returns how many levels were rebuilt.
    pub fn run(&self, world: &mut World, levels: &LoaderSystem<LevelDefinition>) -> usize {
        let pending: Vec<(GenIdx, Level, u64)> = world
            .with(ComponentKind::Level)
            .filter_map(|entity| {
                let level = world.level(entity)?;
                levels.get(level.idx())?;
                let revision = levels.revision(level.idx())?;
                (revision != level.revision).then(|| (entity, level.clone(), revision))
            })
            .collect();

        for (entity, level, revision) in &pending {
            let Some(def) = levels.get(level.idx()) else {
                continue;
            };
            Self::instantiate(world, *entity, def);

            let rebuilt = Level {
                revision: *revision,
                ..level.clone()
            };
            // The level entity itself is alive: it was just listed.
            if let Err(err) = world.replace(*entity, rebuilt) {
                warn!("could not update level {}: {err}", level.src);
            }
        }
        pending.len()
    }

    fn instantiate(world: &mut World, owner: GenIdx, def: &LevelDefinition) {
        let stale: Vec<GenIdx> = world.owned_by(owner).collect();
        for entity in &stale {
            world.destroy(*entity);
        }

        let mut spawned = 0;
        for (i, edef) in def.entities.iter().enumerate() {
            let components = std::iter::once(Component::Owner(Owner(owner)))
                .chain(edef.id.clone().map(Component::Id))
                .chain(edef.components.iter().cloned());
            match world.spawn_with(components) {
                Ok(_) => spawned += 1,
                Err(err) => warn!("level {}: skipped entity {i}: {err}", def.src),
            }
        }
        debug!(
            "level {}: replaced {} entities with {spawned}",
            def.src,
            stale.len()
        );
    }
}
