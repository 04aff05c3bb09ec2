//! Entity storage with a spatial index over entity bounds.
//!
//! Entities live in a [`GenArr`]; each holds at most one component of each
//! [`ComponentKind`]. The [`Aabb`] component is special: attaching it files
//! the entity in the world's [`SpatialMap`], replacing it moves the entity
//! incrementally, and removing it (or destroying the entity) takes it out.

use lette_foundation::{Aabb, Error, GenIdx, Result};
use lette_storage::{GenArr, SpatialConfig, SpatialEntry, SpatialMap};

use crate::component::{Component, ComponentKind, Id, Level, Owner, Pos, Sprite, Tiles};

/// Components of one entity.
#[derive(Clone, Debug, Default)]
struct EntityData {
    pos: Option<Pos>,
    sprite: Option<Sprite>,
    tiles: Option<Tiles>,
    level: Option<Level>,
    owner: Option<Owner>,
    id: Option<Id>,
    /// The entity's bounds, as filed in the spatial map.
    aabb: Option<SpatialEntry<GenIdx>>,
}

impl EntityData {
    fn has(&self, kind: ComponentKind) -> bool {
        match kind {
            ComponentKind::Pos => self.pos.is_some(),
            ComponentKind::Sprite => self.sprite.is_some(),
            ComponentKind::Tiles => self.tiles.is_some(),
            ComponentKind::Level => self.level.is_some(),
            ComponentKind::Owner => self.owner.is_some(),
            ComponentKind::Id => self.id.is_some(),
            ComponentKind::Aabb => self.aabb.is_some(),
        }
    }

    fn get(&self, kind: ComponentKind) -> Option<Component> {
        match kind {
            ComponentKind::Pos => self.pos.map(Component::Pos),
            ComponentKind::Sprite => self.sprite.clone().map(Component::Sprite),
            ComponentKind::Tiles => self.tiles.clone().map(Component::Tiles),
            ComponentKind::Level => self.level.clone().map(Component::Level),
            ComponentKind::Owner => self.owner.map(Component::Owner),
            ComponentKind::Id => self.id.clone().map(Component::Id),
            ComponentKind::Aabb => self.aabb.as_ref().map(|e| Component::Aabb(e.bounds())),
        }
    }
}

/// All entities and the spatial index over their bounds.
#[derive(Clone, Debug)]
pub struct World {
    entities: GenArr<EntityData>,
    spatial: SpatialMap<GenIdx>,
}

impl Default for World {
    fn default() -> Self {
        Self {
            entities: GenArr::new(),
            spatial: SpatialMap::default(),
        }
    }
}

impl World {
    /// Creates an empty world.
    ///
    /// # Errors
    ///
    /// Returns an `InvalidCellSize` error for an unusable spatial configuration.
    pub fn new(config: SpatialConfig) -> Result<Self> {
        Ok(Self {
            entities: GenArr::new(),
            spatial: SpatialMap::with_config(config)?,
        })
    }

    // =========================================================================
    // Lifecycle
    // =========================================================================

    /// Creates an entity with no components.
    pub fn spawn(&mut self) -> GenIdx {
        self.entities.insert(EntityData::default())
    }

    /// Creates an entity and applies `components` in order.
    ///
    /// # Errors
    ///
    /// Fails if any component is rejected; the half-built entity is destroyed.
    pub fn spawn_with(&mut self, components: impl IntoIterator<Item = Component>) -> Result<GenIdx> {
        let entity = self.spawn();
        for component in components {
            if let Err(err) = self.replace(entity, component) {
                self.destroy(entity);
                return Err(err);
            }
        }
        Ok(entity)
    }

    /// Destroys an entity, removing it from the spatial map.
    ///
    /// Returns false if the handle was already dead.
    pub fn destroy(&mut self, entity: GenIdx) -> bool {
        let Some(data) = self.entities.take(entity) else {
            return false;
        };
        if let Some(entry) = &data.aabb {
            self.spatial.remove(entry);
        }
        self.entities.dealloc(entity)
    }

    /// Returns true if the entity exists.
    #[must_use]
    pub fn is_alive(&self, entity: GenIdx) -> bool {
        self.entities.get(entity).is_some()
    }

    /// Number of entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Returns true if the world has no entities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    // =========================================================================
    // Components
    // =========================================================================

    /// Attaches a component, replacing any existing one of the same kind.
    ///
    /// # Errors
    ///
    /// - `StaleHandle` if the entity does not exist
    /// - `InvertedBounds` for an `Aabb` with `min > max`, or `OutOfRange` for
    ///   one the spatial map cannot file; the entity keeps its previous bounds
    pub fn replace(&mut self, entity: GenIdx, component: impl Into<Component>) -> Result<()> {
        let Some(data) = self.entities.get_mut(entity) else {
            return Err(Error::stale_handle(entity));
        };

        match component.into() {
            Component::Pos(pos) => data.pos = Some(pos),
            Component::Sprite(sprite) => data.sprite = Some(sprite),
            Component::Tiles(tiles) => data.tiles = Some(tiles),
            Component::Level(level) => data.level = Some(level),
            Component::Owner(owner) => data.owner = Some(owner),
            Component::Id(id) => data.id = Some(id),
            Component::Aabb(bounds) => match &mut data.aabb {
                Some(entry) => {
                    self.spatial.update(entry, bounds)?;
                }
                None => data.aabb = Some(self.spatial.add(entity, bounds)?),
            },
        }
        Ok(())
    }

    /// Detaches a component and returns it.
    ///
    /// Dead entities and missing components yield `None`.
    pub fn remove(&mut self, entity: GenIdx, kind: ComponentKind) -> Option<Component> {
        let data = self.entities.get_mut(entity)?;
        match kind {
            ComponentKind::Pos => data.pos.take().map(Component::Pos),
            ComponentKind::Sprite => data.sprite.take().map(Component::Sprite),
            ComponentKind::Tiles => data.tiles.take().map(Component::Tiles),
            ComponentKind::Level => data.level.take().map(Component::Level),
            ComponentKind::Owner => data.owner.take().map(Component::Owner),
            ComponentKind::Id => data.id.take().map(Component::Id),
            ComponentKind::Aabb => {
                let entry = data.aabb.take()?;
                self.spatial.remove(&entry);
                Some(Component::Aabb(entry.bounds()))
            }
        }
    }

    /// A copy of one component of an entity.
    #[must_use]
    pub fn get(&self, entity: GenIdx, kind: ComponentKind) -> Option<Component> {
        self.entities.get(entity)?.get(kind)
    }

    /// Returns true if the entity has a component of `kind`.
    #[must_use]
    pub fn has(&self, entity: GenIdx, kind: ComponentKind) -> bool {
        self.entities.get(entity).is_some_and(|data| data.has(kind))
    }

    /// Position of an entity.
    #[must_use]
    pub fn pos(&self, entity: GenIdx) -> Option<Pos> {
        self.entities.get(entity)?.pos
    }

    /// Sprite of an entity.
    #[must_use]
    pub fn sprite(&self, entity: GenIdx) -> Option<&Sprite> {
        self.entities.get(entity)?.sprite.as_ref()
    }

    /// Tile layer of an entity.
    #[must_use]
    pub fn tiles(&self, entity: GenIdx) -> Option<&Tiles> {
        self.entities.get(entity)?.tiles.as_ref()
    }

    /// Level instance of an entity.
    #[must_use]
    pub fn level(&self, entity: GenIdx) -> Option<&Level> {
        self.entities.get(entity)?.level.as_ref()
    }

    /// Owning level entity of an entity.
    #[must_use]
    pub fn owner(&self, entity: GenIdx) -> Option<GenIdx> {
        self.entities.get(entity)?.owner.map(|Owner(owner)| owner)
    }

    /// Name of an entity.
    #[must_use]
    pub fn id(&self, entity: GenIdx) -> Option<&str> {
        self.entities.get(entity)?.id.as_ref().map(|Id(id)| id.as_str())
    }

    /// Bounds of an entity, as filed in the spatial map.
    #[must_use]
    pub fn aabb(&self, entity: GenIdx) -> Option<Aabb> {
        self.entities.get(entity)?.aabb.as_ref().map(SpatialEntry::bounds)
    }

    /// Mutable access to every sprite, for loaders resolving handles.
    pub fn sprites_mut(&mut self) -> impl Iterator<Item = &mut Sprite> + '_ {
        self.entities.values_mut().filter_map(|data| data.sprite.as_mut())
    }

    /// Mutable access to every tile layer, for loaders resolving handles.
    pub fn tiles_mut(&mut self) -> impl Iterator<Item = &mut Tiles> + '_ {
        self.entities.values_mut().filter_map(|data| data.tiles.as_mut())
    }

    /// Mutable access to every level instance, for loaders resolving handles.
    pub fn levels_mut(&mut self) -> impl Iterator<Item = &mut Level> + '_ {
        self.entities.values_mut().filter_map(|data| data.level.as_mut())
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Every live entity.
    pub fn entities(&self) -> impl Iterator<Item = GenIdx> + '_ {
        self.entities.handles()
    }

    /// Every entity with a component of `kind`.
    pub fn with(&self, kind: ComponentKind) -> impl Iterator<Item = GenIdx> + '_ {
        self.entities
            .iter()
            .filter(move |(_, data)| data.has(kind))
            .map(|(entity, _)| entity)
    }

    /// Every entity owned by `owner`.
    pub fn owned_by(&self, owner: GenIdx) -> impl Iterator<Item = GenIdx> + '_ {
        self.entities
            .iter()
            .filter(move |(_, data)| data.owner == Some(Owner(owner)))
            .map(|(entity, _)| entity)
    }

    /// The first entity named `id`.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<GenIdx> {
        self.entities
            .iter()
            .find(|(_, data)| data.id.as_ref().is_some_and(|Id(name)| name == id))
            .map(|(entity, _)| entity)
    }

    /// Entities whose bounds overlap `bounds`, each yielded once.
    pub fn region(&self, bounds: Aabb) -> impl Iterator<Item = GenIdx> + '_ {
        self.spatial.region(bounds, false).copied()
    }

    /// The spatial map over entity bounds.
    #[must_use]
    pub fn spatial(&self) -> &SpatialMap<GenIdx> {
        &self.spatial
    }
}
