//! World, components, resource loaders, and tick systems for Lette.
//!
//! This crate provides:
//! - [`World`] - Entities with a spatial index over their bounds
//! - [`Component`] - The closed set of entity components
//! - [`LoaderSystem`] - Background resource loading into generational arenas
//! - [`BoundsSystem`] and [`LevelSystem`] - Per-tick derived state
//! - [`GameState`] - Tick orchestration

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod component;
pub mod config;
pub mod loader;
pub mod resource;
pub mod state;
pub mod systems;
pub mod world;

pub use component::{
    Component, ComponentKind, Id, Level, Owner, Pos, ResourceHandle, Sprite, Tiles,
};
pub use config::{EngineConfig, LoaderConfig};
pub use loader::{CancelToken, FileLoader, FnLoader, LoaderSystem, ResourceLoader};
pub use resource::{EntityDefinition, LevelDefinition, Sheet, SheetEntry, Tileset, TilesetEntry};
pub use state::{GameState, TickReport};
pub use systems::{BoundsSystem, LevelSystem};
pub use world::World;
