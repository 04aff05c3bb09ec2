//! Tick orchestration for Lette.
//!
//! A tick is one pass of the simulation thread. Each tick:
//! 1. Resolves resource handles on new or retargeted components
//! 2. Commits resource loads that finished since the last tick
//! 3. Rebuilds levels whose definitions changed
//! 4. Recomputes sprite bounds, which moves entities in the spatial map

use log::debug;

use lette_foundation::{Aabb, GenIdx, Result};

use crate::component::{Component, Level};
use crate::config::EngineConfig;
use crate::loader::{LoaderSystem, ResourceLoader};
use crate::resource::{LevelDefinition, Sheet, Tileset};
use crate::systems::{BoundsSystem, LevelSystem};
use crate::world::World;

// =============================================================================
// Tick Report
// =============================================================================

/// What a tick did.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Tick number, starting at 1.
    pub tick: u64,
    /// Component handles resolved this tick.
    pub resolved: usize,
    /// Resource loads committed this tick.
    pub committed: usize,
    /// Levels rebuilt this tick.
    pub levels_rebuilt: usize,
    /// Entities whose bounds were recomputed.
    pub bounds_updated: usize,
}

// =============================================================================
// Game State
// =============================================================================

/// The running game: world, resource loaders, and systems.
#[derive(Debug)]
pub struct GameState {
    config: EngineConfig,
    world: World,
    sheets: LoaderSystem<Sheet>,
    tilesets: LoaderSystem<Tileset>,
    levels: LoaderSystem<LevelDefinition>,
    bounds: BoundsSystem,
    level_system: LevelSystem,
    tick_number: u64,
}

impl GameState {
    /// Creates a game state with one loader per resource kind.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error for an unusable spatial configuration.
    pub fn new(
        config: EngineConfig,
        sheets: impl ResourceLoader<Sheet> + 'static,
        tilesets: impl ResourceLoader<Tileset> + 'static,
        levels: impl ResourceLoader<LevelDefinition> + 'static,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            world: World::new(config.spatial)?,
            sheets: LoaderSystem::with_config(sheets, config.loader.clone()),
            tilesets: LoaderSystem::with_config(tilesets, config.loader.clone()),
            levels: LoaderSystem::with_config(levels, config.loader.clone()),
            bounds: BoundsSystem::from_config(&config),
            level_system: LevelSystem::new(),
            tick_number: 0,
            config,
        })
    }

    /// Spawns a level entity for `src`. Its entities appear once it loads.
    pub fn start_level(&mut self, src: impl Into<String>) -> GenIdx {
        let level = self.world.spawn();
        // A freshly spawned entity is alive, so this cannot fail.
        let _ = self.world.replace(level, Level::new(src));
        level
    }

    /// Spawns an entity with the given components.
    ///
    /// # Errors
    ///
    /// Fails if a component is rejected; nothing is spawned then.
    pub fn spawn(&mut self, components: impl IntoIterator<Item = Component>) -> Result<GenIdx> {
        self.world.spawn_with(components)
    }

    /// Runs one tick.
    ///
    /// Failed loads and rejected sprite boxes are logged by the loaders and
    /// systems; they never stop the tick.
    pub fn update(&mut self) -> TickReport {
        self.tick_number += 1;

        let resolved = self.sheets.run(self.world.sprites_mut())
            + self.tilesets.run(self.world.tiles_mut())
            + self.levels.run(self.world.levels_mut());

        let committed = self.sheets.poll() + self.tilesets.poll() + self.levels.poll();

        let levels_rebuilt = self.level_system.run(&mut self.world, &self.levels);
        let bounds_updated = self.bounds.run(&mut self.world, &self.sheets);

        let report = TickReport {
            tick: self.tick_number,
            resolved,
            committed,
            levels_rebuilt,
            bounds_updated,
        };
        if resolved + committed + levels_rebuilt > 0 {
            debug!("tick {report:?}");
        }
        report
    }

    /// Entities whose bounds overlap the viewport.
    pub fn visible(&self, viewport: Aabb) -> impl Iterator<Item = GenIdx> + '_ {
        self.world.region(viewport)
    }

    /// Forwards a content file change to every loader.
    ///
    /// Returns whether any loader started a reload.
    pub fn on_changed(&mut self, path: &str) -> bool {
        let sheets = self.sheets.on_changed(path);
        let tilesets = self.tilesets.on_changed(path);
        let levels = self.levels.on_changed(path);
        sheets || tilesets || levels
    }

    /// Cancels every in-flight load. The world stays readable.
    pub fn destroy(&mut self) {
        self.sheets.shutdown();
        self.tilesets.shutdown();
        self.levels.shutdown();
    }

    /// Returns the current tick number.
    #[must_use]
    pub fn tick_number(&self) -> u64 {
        self.tick_number
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The world.
    #[must_use]
    pub fn world(&self) -> &World {
        &self.world
    }

    /// Mutable access to the world.
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    /// The sprite sheet loader.
    #[must_use]
    pub fn sheets(&self) -> &LoaderSystem<Sheet> {
        &self.sheets
    }

    /// The tileset loader.
    #[must_use]
    pub fn tilesets(&self) -> &LoaderSystem<Tileset> {
        &self.tilesets
    }

    /// The level loader.
    #[must_use]
    pub fn levels(&self) -> &LoaderSystem<LevelDefinition> {
        &self.levels
    }

    /// Number of loads still running across all loaders.
    #[must_use]
    pub fn in_flight(&self) -> usize {
        self.sheets.in_flight() + self.tilesets.in_flight() + self.levels.in_flight()
    }
}
