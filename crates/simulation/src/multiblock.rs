//! Multiblocks: small anchored structures (engines, gun mounts) detected
//! independently of crafts. The registry here is the authoritative owner,
//! indexed by `(world, region)`; crafts hold bare ids as non-owning handles.
//!
//! Liveness is checked by lookup: ids are monotonic and never reused, so a
//! handle whose id is absent from the registry is dead, which is an expected
//! state and never an error.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::world::{region_of, WorldId};

/// Non-owning handle to a multiblock instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MultiblockId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MultiblockKind {
    Engine,
    GunMount,
    Reactor,
}

/// A placed multiblock: a kind anchored at an origin voxel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultiblockInstance {
    pub id: MultiblockId,
    pub kind: MultiblockKind,
    pub origin: IVec3,
    pub world: WorldId,
}

impl MultiblockInstance {
    /// The same instance re-anchored at `origin` in `world`. Keeps the id, so
    /// handles held elsewhere stay valid across a relocation.
    pub fn with_origin(&self, origin: IVec3, world: WorldId) -> Self {
        Self {
            id: self.id,
            kind: self.kind,
            origin,
            world,
        }
    }
}

/// Authoritative per-region store of all multiblock instances.
#[derive(Resource, Default)]
pub struct MultiblockRegistry {
    by_region: HashMap<(WorldId, IVec3), Vec<MultiblockInstance>>,
    index: HashMap<MultiblockId, (WorldId, IVec3)>,
    next_id: u64,
}

impl MultiblockRegistry {
    /// Place a new multiblock and return its handle.
    pub fn place(&mut self, kind: MultiblockKind, origin: IVec3, world: WorldId) -> MultiblockId {
        let id = MultiblockId(self.next_id);
        self.next_id += 1;
        let region = region_of(origin);
        self.by_region.entry((world, region)).or_default().push(
            MultiblockInstance {
                id,
                kind,
                origin,
                world,
            },
        );
        self.index.insert(id, (world, region));
        id
    }

    /// Re-insert a relocated instance. The instance's `origin`/`world` decide
    /// the region entry; the id index follows.
    pub fn insert(&mut self, instance: MultiblockInstance) {
        let key = (instance.world, region_of(instance.origin));
        self.index.insert(instance.id, key);
        self.by_region.entry(key).or_default().push(instance);
    }

    /// All instances anchored in `region` of `world`.
    pub fn in_region(&self, world: WorldId, region: IVec3) -> &[MultiblockInstance] {
        self.by_region
            .get(&(world, region))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get(&self, id: MultiblockId) -> Option<&MultiblockInstance> {
        let key = self.index.get(&id)?;
        self.by_region
            .get(key)?
            .iter()
            .find(|instance| instance.id == id)
    }

    /// Remove and return the instance behind `id`. `None` means the handle
    /// was dangling; callers drop it silently.
    pub fn remove(&mut self, id: MultiblockId) -> Option<MultiblockInstance> {
        let key = self.index.remove(&id)?;
        let entry = self.by_region.get_mut(&key)?;
        let idx = entry.iter().position(|instance| instance.id == id)?;
        let instance = entry.swap_remove(idx);
        if entry.is_empty() {
            self.by_region.remove(&key);
        }
        Some(instance)
    }

    pub fn is_live(&self, id: MultiblockId) -> bool {
        self.index.contains_key(&id)
    }
}

pub struct MultiblockPlugin;

impl Plugin for MultiblockPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<MultiblockRegistry>();
    }
}
