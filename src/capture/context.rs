//! The export context: the session-lifetime dedup cache for geometry.
//!
//! Models are registered by structural key and assigned a stable id exactly
//! once; fluids are registered directly under caller-supplied ids. Insertion
//! order is significant: it becomes archive-entry emission order.

use std::collections::HashMap;

use crate::mesh::{Mesh, EMPTY_MESH};
use crate::types::BlockState;

/// The structural identity of a static block shape. Two blocks that look
/// the same produce equal keys regardless of where they sit in the world.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ModelKey {
    /// Block name, e.g., "minecraft:stone".
    pub name: String,
    /// Block properties, sorted by key so equal states hash equally.
    pub properties: Vec<(String, String)>,
    /// Bitmask of faces visible after neighbor culling.
    pub visible_faces: u8,
    /// Whether the block renders transparent.
    pub transparent: bool,
}

impl ModelKey {
    pub fn new(state: &BlockState, visible_faces: u8, transparent: bool) -> Self {
        let mut properties: Vec<(String, String)> = state
            .properties
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        properties.sort();

        Self {
            name: state.name.clone(),
            properties,
            visible_faces,
            transparent,
        }
    }

    /// Base string used when generating an id for this key.
    fn id_base(&self) -> &str {
        self.name.split(':').nth(1).unwrap_or(&self.name)
    }
}

/// Session-lifetime cache mapping geometry to stable archive ids.
///
/// Mutated by capture operations only; the finalize pass takes the exporter
/// by value, so the cache is necessarily read-only once serialization begins.
#[derive(Debug, Default)]
pub struct ExportContext {
    models: HashMap<ModelKey, String>,
    model_order: Vec<ModelKey>,
    fluids: Vec<(String, Mesh)>,
    id_counts: HashMap<String, u32>,
}

impl ExportContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the stable id for a structural key, allocating one on first
    /// sight. Re-registering an equal key returns the existing id and
    /// performs no other work.
    pub fn register_model(&mut self, key: ModelKey) -> String {
        if let Some(id) = self.models.get(&key) {
            return id.clone();
        }

        let id = self.next_id(key.id_base());
        self.models.insert(key.clone(), id.clone());
        self.model_order.push(key);
        id
    }

    /// Look up the id of an already-registered key.
    pub fn model_id(&self, key: &ModelKey) -> Option<&str> {
        self.models.get(key).map(String::as_str)
    }

    /// Store a fluid mesh under a caller-supplied id. Fluid geometry is
    /// never deduplicated by content; re-registering an id replaces the
    /// mesh but keeps its emission position.
    pub fn register_fluid(&mut self, id: impl Into<String>, mesh: Mesh) {
        let id = id.into();
        if let Some(entry) = self.fluids.iter_mut().find(|(n, _)| *n == id) {
            entry.1 = mesh;
        } else {
            self.fluids.push((id, mesh));
        }
    }

    /// Allocate a fresh id for a fluid domain of the given kind.
    pub(crate) fn gen_fluid_id(&mut self, kind: &str) -> String {
        self.next_id(&format!("fluid.{}", kind))
    }

    /// Registered models in registration order.
    pub fn models(&self) -> impl Iterator<Item = (&ModelKey, &str)> {
        self.model_order
            .iter()
            .map(move |key| (key, self.models[key].as_str()))
    }

    /// Registered fluids in registration order.
    pub fn fluids(&self) -> impl Iterator<Item = (&str, &Mesh)> {
        self.fluids.iter().map(|(id, mesh)| (id.as_str(), mesh))
    }

    pub fn model_count(&self) -> usize {
        self.model_order.len()
    }

    pub fn fluid_count(&self) -> usize {
        self.fluids.len()
    }

    /// Whether an id will have a `mesh/` entry in the archive (a model id,
    /// a fluid id, or the reserved empty mesh).
    pub fn contains_mesh(&self, id: &str) -> bool {
        id == EMPTY_MESH
            || self.models.values().any(|v| v == id)
            || self.fluids.iter().any(|(n, _)| n == id)
    }

    fn next_id(&mut self, base: &str) -> String {
        let count = self.id_counts.entry(base.to_string()).or_insert(0);
        let id = if *count == 0 {
            base.to_string()
        } else {
            format!("{}.{}", base, count)
        };
        *count += 1;
        id
    }
}
