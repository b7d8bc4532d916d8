//! Procedural geometry for the decorative scene.
//!
//! Every builder here is a pure function of its inputs; randomized placement
//! takes the random source as an argument so callers decide on seeding.

mod cylinder;
mod extrude;
mod heart;
mod lathe;
mod particles;
mod rose;

use glam::Vec3;

use crate::math::AABB;

pub use cylinder::cylinder;
pub use extrude::{extrude, ExtrudeSettings, Outline, OutlineBuilder, CURVE_SEGMENTS};
pub use heart::{
    build_heart, heart_extrude_settings, heart_outline, scatter_hearts, HeartSeed, HEART_COUNT,
};
pub use lathe::lathe;
pub use particles::{Particle, ParticleField, ParticleHue, PARTICLE_COUNT};
pub use rose::{
    build_bud, build_petal, build_stem, bud_profile, petal_layout, petal_outline,
    PetalPlacement, PETAL_EXTRUDE, PETAL_LAYER_COUNT, PETAL_SCALES, PETAL_Y_OFFSETS,
    PETALS_PER_LAYER,
};

/// Indexed triangle mesh with per-vertex normals
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn bounds(&self) -> Option<AABB> {
        AABB::from_points(&self.positions)
    }

    /// Appends a vertex with its normal and returns its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(position);
        self.normals.push(normal);
        index
    }

    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Merges `other` into this mesh, rebasing its indices
    pub fn append(&mut self, other: Mesh) {
        let base = self.positions.len() as u32;
        self.positions.extend(other.positions);
        self.normals.extend(other.normals);
        self.indices.extend(other.indices.into_iter().map(|i| i + base));
    }

    /// Replaces the normals with area-weighted averages of adjacent face normals
    pub fn compute_vertex_normals(&mut self) {
        let mut normals = vec![Vec3::ZERO; self.positions.len()];
        for tri in self.indices.chunks_exact(3) {
            let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
            let face = (self.positions[b] - self.positions[a])
                .cross(self.positions[c] - self.positions[a]);
            normals[a] += face;
            normals[b] += face;
            normals[c] += face;
        }
        self.normals = normals
            .into_iter()
            .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
            .collect();
    }
}
