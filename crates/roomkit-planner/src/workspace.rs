//! Workspace store and selection state.
//!
//! The store is the single shared mutable structure every pipeline stage
//! operates on. It is always passed explicitly (never ambient), and every
//! mutator returns the prior state of the touched entity so callers can
//! audit what a plan actually changed. There is no per-field locking: a
//! plan application owns the store via `&mut` for its full duration, which
//! is exactly the serialization the concurrency model requires.

use roomkit_core::{Bounds, EntityId, StoreError};
use serde::{Deserialize, Serialize};

use crate::model::{Wall, WorkspaceAsset, WorkspaceShape};

/// An entity removed from the store, returned for auditability.
#[derive(Debug, Clone, PartialEq)]
pub enum RemovedEntity {
    Asset(WorkspaceAsset),
    Shape(WorkspaceShape),
    Wall(Wall),
}

/// Flat entity table for one workspace.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkspaceStore {
    assets: Vec<WorkspaceAsset>,
    shapes: Vec<WorkspaceShape>,
    walls: Vec<Wall>,
}

impl WorkspaceStore {
    /// Creates an empty workspace.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an asset, returning its id.
    pub fn append_asset(&mut self, asset: WorkspaceAsset) -> EntityId {
        let id = asset.id;
        self.assets.push(asset);
        id
    }

    /// Appends a shape, returning its id.
    pub fn append_shape(&mut self, shape: WorkspaceShape) -> EntityId {
        let id = shape.id;
        self.shapes.push(shape);
        id
    }

    /// Appends a wall, returning its id.
    pub fn append_wall(&mut self, wall: Wall) -> EntityId {
        let id = wall.id;
        self.walls.push(wall);
        id
    }

    /// Looks up an asset by id.
    pub fn asset(&self, id: EntityId) -> Option<&WorkspaceAsset> {
        self.assets.iter().find(|a| a.id == id)
    }

    /// Looks up a wall by id.
    pub fn wall(&self, id: EntityId) -> Option<&Wall> {
        self.walls.iter().find(|w| w.id == id)
    }

    /// Looks up a shape by id.
    pub fn shape(&self, id: EntityId) -> Option<&WorkspaceShape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Applies `patch` to the asset with `id`. Returns the asset's prior
    /// state, or `None` when the id resolves to nothing.
    pub fn update_asset<F>(&mut self, id: EntityId, patch: F) -> Option<WorkspaceAsset>
    where
        F: FnOnce(&mut WorkspaceAsset),
    {
        let asset = self.assets.iter_mut().find(|a| a.id == id)?;
        let prior = asset.clone();
        patch(asset);
        Some(prior)
    }

    /// Applies `patch` to the shape with `id`. Returns the prior state.
    pub fn update_shape<F>(&mut self, id: EntityId, patch: F) -> Option<WorkspaceShape>
    where
        F: FnOnce(&mut WorkspaceShape),
    {
        let shape = self.shapes.iter_mut().find(|s| s.id == id)?;
        let prior = shape.clone();
        patch(shape);
        Some(prior)
    }

    /// Applies `patch` to the wall with `id`. Returns the prior state.
    pub fn update_wall<F>(&mut self, id: EntityId, patch: F) -> Option<Wall>
    where
        F: FnOnce(&mut Wall),
    {
        let wall = self.walls.iter_mut().find(|w| w.id == id)?;
        let prior = wall.clone();
        patch(wall);
        Some(prior)
    }

    /// Removes whichever entity carries `id`, searching assets, then
    /// shapes, then walls. Returns the removed entity for audit.
    pub fn remove_by_id(&mut self, id: EntityId) -> Option<RemovedEntity> {
        if let Some(pos) = self.assets.iter().position(|a| a.id == id) {
            return Some(RemovedEntity::Asset(self.assets.remove(pos)));
        }
        if let Some(pos) = self.shapes.iter().position(|s| s.id == id) {
            return Some(RemovedEntity::Shape(self.shapes.remove(pos)));
        }
        if let Some(pos) = self.walls.iter().position(|w| w.id == id) {
            return Some(RemovedEntity::Wall(self.walls.remove(pos)));
        }
        None
    }

    /// Removes everything. Returns `(assets, shapes, walls)` removal counts.
    pub fn clear(&mut self) -> (usize, usize, usize) {
        let counts = (self.assets.len(), self.shapes.len(), self.walls.len());
        self.assets.clear();
        self.shapes.clear();
        self.walls.clear();
        counts
    }

    /// Current assets in insertion order.
    pub fn assets(&self) -> &[WorkspaceAsset] {
        &self.assets
    }

    /// Current shapes in insertion order.
    pub fn shapes(&self) -> &[WorkspaceShape] {
        &self.shapes
    }

    /// Current walls in insertion order.
    pub fn walls(&self) -> &[Wall] {
        &self.walls
    }

    /// `true` when any entity carries `id`.
    pub fn contains(&self, id: EntityId) -> bool {
        self.assets.iter().any(|a| a.id == id)
            || self.shapes.iter().any(|s| s.id == id)
            || self.walls.iter().any(|w| w.id == id)
    }

    /// Total entity count across all three families.
    pub fn len(&self) -> usize {
        self.assets.len() + self.shapes.len() + self.walls.len()
    }

    /// `true` when the workspace holds no entities.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bounding box of the wall geometry, or `None` when no walls exist.
    pub fn wall_bounds(&self) -> Option<Bounds> {
        let mut walls = self.walls.iter();
        let first = walls.next()?.bounds();
        Some(walls.fold(first, |acc, w| acc.union(&w.bounds())))
    }

    /// Marks the given assets as members of `group_id`. Returns the ids
    /// that actually resolved to assets.
    pub fn assign_group(&mut self, members: &[EntityId], group_id: EntityId) -> Vec<EntityId> {
        let mut assigned = Vec::new();
        for asset in self.assets.iter_mut() {
            if members.contains(&asset.id) && !asset.is_group {
                asset.group_id = Some(group_id);
                assigned.push(asset.id);
            }
        }
        assigned
    }

    /// Clears membership of every asset in `group_id`, leaving positions
    /// untouched. Returns the ids of the former members.
    pub fn clear_group(&mut self, group_id: EntityId) -> Vec<EntityId> {
        let mut cleared = Vec::new();
        for asset in self.assets.iter_mut() {
            if asset.group_id == Some(group_id) {
                asset.group_id = None;
                cleared.push(asset.id);
            }
        }
        cleared
    }

    /// Ids of all member assets of `group_id`.
    pub fn group_members(&self, group_id: EntityId) -> Vec<EntityId> {
        self.assets
            .iter()
            .filter(|a| a.group_id == Some(group_id))
            .map(|a| a.id)
            .collect()
    }

    /// Serializes the workspace to pretty JSON.
    pub fn to_json(&self) -> Result<String, StoreError> {
        serde_json::to_string_pretty(self).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })
    }

    /// Restores a workspace from JSON produced by [`Self::to_json`].
    pub fn from_json(json: &str) -> Result<Self, StoreError> {
        serde_json::from_str(json).map_err(|e| StoreError::Serialization {
            message: e.to_string(),
        })
    }
}

/// External selection state, touched only by select/deselect operations
/// and `deleteSelected`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    ids: Vec<EntityId>,
}

impl Selection {
    /// Creates an empty selection.
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently selected ids, in selection order.
    pub fn current(&self) -> &[EntityId] {
        &self.ids
    }

    /// Replaces the selection, dropping duplicate ids.
    pub fn set(&mut self, ids: Vec<EntityId>) {
        self.ids.clear();
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Removes the given ids from the selection.
    pub fn remove(&mut self, ids: &[EntityId]) {
        self.ids.retain(|id| !ids.contains(id));
    }

    /// Clears the selection.
    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// `true` when nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// The shared mutable context threaded through every pipeline stage.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WorkspaceContext {
    pub store: WorkspaceStore,
    pub selection: Selection,
}

impl WorkspaceContext {
    /// Creates an empty context.
    pub fn new() -> Self {
        Self::default()
    }
}
