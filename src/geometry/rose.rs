use std::f32::consts::{FRAC_PI_2, TAU};

use anyhow::Result;
use glam::{Vec2, Vec3};

use super::cylinder::cylinder;
use super::extrude::{extrude, ExtrudeSettings, Outline, OutlineBuilder};
use super::lathe::lathe;
use super::Mesh;
use crate::math::Transform;

pub const PETAL_LAYER_COUNT: usize = 3;
pub const PETALS_PER_LAYER: [usize; PETAL_LAYER_COUNT] = [6, 8, 10];
pub const PETAL_SCALES: [f32; PETAL_LAYER_COUNT] = [0.8, 1.0, 1.2];
pub const PETAL_Y_OFFSETS: [f32; PETAL_LAYER_COUNT] = [0.1, 0.0, -0.1];

pub const PETAL_EXTRUDE: ExtrudeSettings = ExtrudeSettings {
    steps: 2,
    depth: 0.05,
    bevel_thickness: 0.01,
    bevel_size: 0.01,
    bevel_offset: 0.0,
    bevel_segments: 1,
};

const BUD_SEGMENTS: u32 = 32;
const STEM_SEGMENTS: u32 = 32;

pub fn bud_profile() -> Vec<Vec2> {
    (0..10)
        .map(|i| {
            let i = i as f32;
            Vec2::new((i * 0.2).sin() * 0.3 + 0.1, (i - 5.0) * 0.1)
        })
        .collect()
}

pub fn build_bud() -> Mesh {
    lathe(&bud_profile(), BUD_SEGMENTS)
}

pub fn petal_outline() -> Outline {
    OutlineBuilder::begin(0.0, 0.0)
        .cubic_bezier_to((0.1, 0.5), (0.4, 0.7), (0.5, 0.5))
        .cubic_bezier_to((0.6, 0.7), (0.9, 0.5), (1.0, 0.0))
        .cubic_bezier_to((0.9, -0.5), (0.6, -0.7), (0.5, -0.5))
        .cubic_bezier_to((0.4, -0.7), (0.1, -0.5), (0.0, 0.0))
        .close()
}

/// One petal mesh; every petal in the rose shares it
pub fn build_petal() -> Result<Mesh> {
    extrude(&petal_outline(), &PETAL_EXTRUDE)
}

pub fn build_stem() -> Mesh {
    cylinder(0.03, 0.03, 1.0, STEM_SEGMENTS)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PetalPlacement {
    pub layer: usize,
    pub index: usize,
    pub transform: Transform,
}

/// Local transforms of every petal, innermost layer first
pub fn petal_layout() -> Vec<PetalPlacement> {
    let mut placements = Vec::with_capacity(PETALS_PER_LAYER.iter().sum());
    for layer in 0..PETAL_LAYER_COUNT {
        let n = PETALS_PER_LAYER[layer];
        let s = PETAL_SCALES[layer];
        let y = PETAL_Y_OFFSETS[layer];
        for index in 0..n {
            let a = TAU * index as f32 / n as f32;
            let transform = Transform::from_position(Vec3::new(a.cos() * 0.3 * s, y, a.sin() * 0.3 * s))
                .with_rotation(Vec3::new(FRAC_PI_2 - 0.2, a + FRAC_PI_2, 0.0))
                .with_uniform_scale(s);
            placements.push(PetalPlacement {
                layer,
                index,
                transform,
            });
        }
    }
    placements
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bud_profile_points() {
        let profile = bud_profile();
        assert_eq!(profile.len(), 10);
        assert!((profile[0] - Vec2::new(0.1, -0.5)).length() < 1e-6);
        let last = Vec2::new(1.8f32.sin() * 0.3 + 0.1, 0.4);
        assert!((profile[9] - last).length() < 1e-6);
    }

    #[test]
    fn petal_outline_resolution() {
        // start point plus four sampled segments, closing duplicate dropped
        assert_eq!(petal_outline().len(), 4 * super::super::CURVE_SEGMENTS);
    }

    #[test]
    fn layout_has_24_petals() {
        let layout = petal_layout();
        assert_eq!(layout.len(), 24);
        for layer in 0..PETAL_LAYER_COUNT {
            let count = layout.iter().filter(|p| p.layer == layer).count();
            assert_eq!(count, PETALS_PER_LAYER[layer]);
        }
    }

    #[test]
    fn second_petal_of_outer_layer() {
        let p = petal_layout()
            .into_iter()
            .find(|p| p.layer == 2 && p.index == 1)
            .unwrap();
        let a = TAU / 10.0;
        let t = p.transform;
        assert!((t.position - Vec3::new(a.cos() * 0.36, -0.1, a.sin() * 0.36)).length() < 1e-6);
        assert!((t.rotation.y - (a + FRAC_PI_2)).abs() < 1e-6);
        assert!((t.rotation.x - (FRAC_PI_2 - 0.2)).abs() < 1e-6);
        assert_eq!(t.scale, Vec3::splat(1.2));
    }

    #[test]
    fn stem_is_one_unit_tall() {
        let bounds = build_stem().bounds().unwrap();
        assert!((bounds.extent().y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn petal_mesh_builds() {
        let mesh = build_petal().unwrap();
        assert!(!mesh.is_empty());
        assert_eq!(mesh.positions.len(), mesh.normals.len());
    }
}
