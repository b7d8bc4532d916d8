use std::f32::consts::TAU;

use glam::Vec3;

use super::Mesh;

/// Capped cylinder centred on the origin along Y
pub fn cylinder(radius_top: f32, radius_bottom: f32, height: f32, radial_segments: u32) -> Mesh {
    let segments = radial_segments.max(3);
    let half = height * 0.5;
    let slope = (radius_bottom - radius_top) / height;
    let mut mesh = Mesh::default();

    // Torso: two rings, top (v = 0) and bottom (v = 1)
    for v in 0..=1u32 {
        let radius = v as f32 * (radius_bottom - radius_top) + radius_top;
        let y = -(v as f32) * height + half;
        for x in 0..=segments {
            let theta = x as f32 / segments as f32 * TAU;
            let (sin, cos) = theta.sin_cos();
            let normal = Vec3::new(sin, slope, cos).normalize();
            mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
        }
    }
    let ring = segments + 1;
    for x in 0..segments {
        let a = x;
        let b = ring + x;
        let c = ring + x + 1;
        let d = x + 1;
        mesh.push_triangle(a, b, d);
        mesh.push_triangle(b, c, d);
    }

    mesh.append(cap(radius_top, half, segments, true));
    mesh.append(cap(radius_bottom, -half, segments, false));
    mesh
}

fn cap(radius: f32, y: f32, segments: u32, top: bool) -> Mesh {
    let normal = if top { Vec3::Y } else { Vec3::NEG_Y };
    let mut mesh = Mesh::default();
    let center = mesh.push_vertex(Vec3::new(0.0, y, 0.0), normal);

    for x in 0..=segments {
        let theta = x as f32 / segments as f32 * TAU;
        let (sin, cos) = theta.sin_cos();
        mesh.push_vertex(Vec3::new(radius * sin, y, radius * cos), normal);
    }
    for x in 1..=segments {
        if top {
            mesh.push_triangle(center, x, x + 1);
        } else {
            mesh.push_triangle(center, x + 1, x);
        }
    }
    mesh
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cylinder_spans_height() {
        let mesh = cylinder(0.03, 0.03, 1.0, 32);
        let bounds = mesh.bounds().unwrap();

        assert!((bounds.min.y + 0.5).abs() < 1e-6);
        assert!((bounds.max.y - 0.5).abs() < 1e-6);
        assert!(bounds.max.x <= 0.03 + 1e-6);
    }

    #[test]
    fn cylinder_triangle_count() {
        let mesh = cylinder(1.0, 1.0, 2.0, 8);
        // torso 2 per segment, each cap 1 per segment
        assert_eq!(mesh.triangle_count(), 8 * 2 + 8 * 2);
    }

    #[test]
    fn cap_faces_point_outward() {
        let mesh = cylinder(1.0, 1.0, 2.0, 8);
        let tops = mesh
            .positions
            .iter()
            .zip(&mesh.normals)
            .filter(|(p, n)| (p.y - 1.0).abs() < 1e-6 && **n == Vec3::Y)
            .count();
        assert_eq!(tops, 1 + 9);
    }
}
