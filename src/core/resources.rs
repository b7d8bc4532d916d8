use std::collections::{BTreeSet, HashSet};

use log::{debug, warn};

use super::backend::{GeometryId, MaterialId, RenderBackend};

/// Live set of geometry and material ids created for one scene
///
/// Every release goes through the ledger so each id reaches the backend at
/// most once.
#[derive(Debug, Default)]
pub struct ResourceLedger {
    geometries: HashSet<GeometryId>,
    materials: HashSet<MaterialId>,
    released_geometries: HashSet<GeometryId>,
    released_materials: HashSet<MaterialId>,
}

impl ResourceLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn track_geometry(&mut self, id: GeometryId) -> GeometryId {
        self.geometries.insert(id);
        id
    }

    pub fn track_material(&mut self, id: MaterialId) -> MaterialId {
        self.materials.insert(id);
        id
    }

    /// Releases `id` through `backend`; false if it was not live
    pub fn release_geometry<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, id: GeometryId) -> bool {
        if self.geometries.remove(&id) {
            backend.release_geometry(id);
            self.released_geometries.insert(id);
            true
        } else {
            if self.released_geometries.contains(&id) {
                warn!("Geometry {:?} already released", id);
            } else {
                warn!("Geometry {:?} was never created", id);
            }
            false
        }
    }

    pub fn release_material<B: RenderBackend + ?Sized>(&mut self, backend: &mut B, id: MaterialId) -> bool {
        if self.materials.remove(&id) {
            backend.release_material(id);
            self.released_materials.insert(id);
            true
        } else {
            if self.released_materials.contains(&id) {
                warn!("Material {:?} already released", id);
            } else {
                warn!("Material {:?} was never created", id);
            }
            false
        }
    }

    /// Releases whatever is still live, oldest id first. Returns the count.
    pub fn release_all<B: RenderBackend + ?Sized>(&mut self, backend: &mut B) -> usize {
        let geometries: BTreeSet<_> = self.geometries.iter().copied().collect();
        let materials: BTreeSet<_> = self.materials.iter().copied().collect();
        let count = geometries.len() + materials.len();

        for id in geometries {
            self.release_geometry(backend, id);
        }
        for id in materials {
            self.release_material(backend, id);
        }
        if count > 0 {
            debug!("Released {} remaining resources", count);
        }
        count
    }

    pub fn live(&self) -> usize {
        self.geometries.len() + self.materials.len()
    }

    pub fn live_geometries(&self) -> usize {
        self.geometries.len()
    }

    pub fn live_materials(&self) -> usize {
        self.materials.len()
    }

    pub fn released(&self) -> usize {
        self.released_geometries.len() + self.released_materials.len()
    }
}
