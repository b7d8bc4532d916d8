use anyhow::Result;

use super::surface::{SurfaceSize, TargetId};
use crate::geometry::Mesh;
use crate::material::Material;
use crate::scene::Scene;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct GeometryId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MaterialId(pub u64);

/// Geometry handed to a backend for upload
#[derive(Debug, Clone, Copy)]
pub enum GeometryData<'a> {
    Mesh(&'a Mesh),
    /// Dynamic point buffer; contents are streamed from the scene every frame
    Points { count: usize },
}

/// Renderer bound to one render target
///
/// Ids returned by `create_*` stay valid until released. Releasing an id
/// twice is a caller bug; the resource ledger keeps that from happening.
pub trait RenderBackend {
    fn target(&self) -> TargetId;

    fn create_geometry(&mut self, data: GeometryData<'_>) -> Result<GeometryId>;

    fn create_material(&mut self, material: &Material) -> Result<MaterialId>;

    fn release_geometry(&mut self, id: GeometryId);

    fn release_material(&mut self, id: MaterialId);

    fn set_size(&mut self, size: SurfaceSize);

    fn render(&mut self, scene: &Scene) -> Result<()>;

    /// Frees the target and everything still owned by the backend
    fn dispose(&mut self);
}

/// Creates a backend for each mount
pub trait BackendFactory {
    type Backend: RenderBackend;

    fn create(&mut self, size: SurfaceSize) -> Result<Self::Backend>;
}
