use std::f32::consts::PI;

use anyhow::Result;
use glam::Vec3;
use rand::Rng;

use super::extrude::{extrude, ExtrudeSettings, Outline, OutlineBuilder};
use super::Mesh;

pub const HEART_COUNT: usize = 15;

/// Heart silhouette of six cubic segments, scaled by `k`
pub fn heart_outline(k: f32) -> Outline {
    let s = |x: f32, y: f32| (x * k, y * k);
    OutlineBuilder::begin(0.5 * k, 0.5 * k)
        .cubic_bezier_to(s(0.5, 0.5), s(0.4, 0.0), s(0.0, 0.0))
        .cubic_bezier_to(s(-0.6, 0.0), s(-0.6, 0.7), s(-0.6, 0.7))
        .cubic_bezier_to(s(-0.6, 1.1), s(-0.3, 1.5), s(0.5, 1.9))
        .cubic_bezier_to(s(1.3, 1.5), s(1.6, 1.1), s(1.6, 0.7))
        .cubic_bezier_to(s(1.6, 0.7), s(1.6, 0.0), s(1.0, 0.0))
        .cubic_bezier_to(s(0.7, 0.0), s(0.5, 0.5), s(0.5, 0.5))
        .close()
}

pub fn heart_extrude_settings(k: f32) -> ExtrudeSettings {
    ExtrudeSettings {
        steps: 1,
        depth: 0.1 * k,
        bevel_thickness: 0.02 * k,
        bevel_size: 0.02 * k,
        bevel_offset: 0.0,
        bevel_segments: 1,
    }
}

pub fn build_heart(k: f32) -> Result<Mesh> {
    extrude(&heart_outline(k), &heart_extrude_settings(k))
}

/// Randomized parameters of one floating heart
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeartSeed {
    pub scale: f32,
    pub position: Vec3,
    pub rotation: Vec3,
    pub speed: f32,
    pub rotation_speed: f32,
}

impl HeartSeed {
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let mut in_range = |lo: f32, hi: f32| rng.gen_range(lo..hi);
        let scale = in_range(0.1, 0.2);
        let position = Vec3::new(
            in_range(-5.0, 5.0),
            in_range(-5.0, 5.0),
            in_range(-5.0, 5.0),
        );
        let rotation = Vec3::new(in_range(0.0, PI), in_range(0.0, PI), in_range(0.0, PI));
        let speed = in_range(0.001, 0.003);
        let rotation_speed = in_range(0.005, 0.015);
        Self {
            scale,
            position,
            rotation,
            speed,
            rotation_speed,
        }
    }
}

pub fn scatter_hearts<R: Rng + ?Sized>(rng: &mut R) -> Vec<HeartSeed> {
    (0..HEART_COUNT).map(|_| HeartSeed::random(rng)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn outline_scales_with_k() {
        let unit = heart_outline(1.0);
        let small = heart_outline(0.1);
        assert_eq!(unit.len(), small.len());
        for (a, b) in unit.points().iter().zip(small.points()) {
            assert!((*a * 0.1 - *b).length() < 1e-5);
        }
    }

    #[test]
    fn outline_spans_the_heart_shape() {
        let outline = heart_outline(1.0);
        let xs = outline.points().iter().map(|p| p.x);
        let ys = outline.points().iter().map(|p| p.y);
        let min_x = xs.clone().fold(f32::INFINITY, f32::min);
        let max_x = xs.fold(f32::NEG_INFINITY, f32::max);
        let max_y = ys.fold(f32::NEG_INFINITY, f32::max);
        assert!((min_x + 0.6).abs() < 0.05);
        assert!((max_x - 1.6).abs() < 0.05);
        assert!((max_y - 1.9).abs() < 1e-4);
    }

    #[test]
    fn heart_mesh_depth_includes_bevel() {
        let k = 0.15;
        let mesh = build_heart(k).unwrap();
        let bounds = mesh.bounds().unwrap();
        assert!((bounds.min.z + 0.02 * k).abs() < 1e-5);
        assert!((bounds.max.z - 0.12 * k).abs() < 1e-5);
    }

    #[test]
    fn scattered_hearts_respect_ranges() {
        let mut rng = StdRng::seed_from_u64(11);
        let hearts = scatter_hearts(&mut rng);
        assert_eq!(hearts.len(), HEART_COUNT);
        for h in &hearts {
            assert!((0.1..0.2).contains(&h.scale));
            assert!(h.position.abs().max_element() <= 5.0);
            assert!(h.rotation.min_element() >= 0.0 && h.rotation.max_element() < PI);
            assert!((0.001..0.003).contains(&h.speed));
            assert!((0.005..0.015).contains(&h.rotation_speed));
        }
    }
}
