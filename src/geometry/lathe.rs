use std::f32::consts::TAU;

use glam::{Vec2, Vec3};

use super::Mesh;

/// Surface of revolution: sweeps `profile` (x = radius, y = height) around
/// the Y axis in `segments` steps.
pub fn lathe(profile: &[Vec2], segments: u32) -> Mesh {
    let segments = segments.max(3);
    let rows = profile.len() as u32;
    let mut mesh = Mesh::default();

    for i in 0..=segments {
        let phi = i as f32 / segments as f32 * TAU;
        let (sin, cos) = phi.sin_cos();
        for p in profile {
            mesh.push_vertex(Vec3::new(p.x * sin, p.y, p.x * cos), Vec3::ZERO);
        }
    }

    for i in 0..segments {
        for j in 0..rows.saturating_sub(1) {
            let a = j + i * rows;
            let b = j + (i + 1) * rows;
            let c = (j + 1) + (i + 1) * rows;
            let d = (j + 1) + i * rows;
            mesh.push_triangle(a, b, d);
            mesh.push_triangle(c, d, b);
        }
    }

    mesh.compute_vertex_normals();
    mesh
}
