use std::f32::consts::FRAC_PI_2;

use anyhow::{anyhow, ensure, Result};
use glam::{Vec2, Vec3};
use lyon::geom::CubicBezierSegment;
use lyon::math::point;
use lyon::path::Path;
use lyon::tessellation::{BuffersBuilder, FillOptions, FillTessellator, FillVertex, VertexBuffers};

use super::Mesh;

/// Samples taken along each bezier segment when flattening an outline
pub const CURVE_SEGMENTS: usize = 12;

/// How a flat outline is pushed into a solid
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtrudeSettings {
    pub steps: u32,
    pub depth: f32,
    pub bevel_thickness: f32,
    pub bevel_size: f32,
    pub bevel_offset: f32,
    pub bevel_segments: u32,
}

impl ExtrudeSettings {
    /// Straight extrusion without a bevel
    pub fn flat(depth: f32, steps: u32) -> Self {
        Self {
            steps,
            depth,
            bevel_thickness: 0.0,
            bevel_size: 0.0,
            bevel_offset: 0.0,
            bevel_segments: 0,
        }
    }

    /// Z position and outline expansion of every ring, front to back
    fn layers(&self) -> Vec<(f32, f32)> {
        let steps = self.steps.max(1);
        let segments = self.bevel_segments;
        let bevel = |b: u32| {
            let t = b as f32 / segments as f32 * FRAC_PI_2;
            (
                self.bevel_thickness * t.cos(),
                self.bevel_size * t.sin() + self.bevel_offset,
            )
        };

        let mut layers = Vec::with_capacity((steps + 1 + 2 * segments) as usize);
        for b in 0..segments {
            let (z, expand) = bevel(b);
            layers.push((-z, expand));
        }
        for step in 0..=steps {
            layers.push((
                self.depth * step as f32 / steps as f32,
                self.bevel_size + self.bevel_offset,
            ));
        }
        for b in (0..segments).rev() {
            let (z, expand) = bevel(b);
            layers.push((self.depth + z, expand));
        }
        layers
    }
}

/// Closed, counter-clockwise polygon in the XY plane
#[derive(Debug, Clone, PartialEq)]
pub struct Outline {
    points: Vec<Vec2>,
}

impl Outline {
    /// Drops repeated points and the closing duplicate, then winds the
    /// polygon counter-clockwise.
    pub fn from_points(points: Vec<Vec2>) -> Self {
        let mut cleaned: Vec<Vec2> = Vec::with_capacity(points.len());
        for p in points {
            if cleaned.last().map_or(true, |last| last.distance(p) > 1e-6) {
                cleaned.push(p);
            }
        }
        if cleaned.len() > 1 && cleaned[0].distance(cleaned[cleaned.len() - 1]) <= 1e-6 {
            cleaned.pop();
        }

        let mut outline = Self { points: cleaned };
        if outline.signed_area() < 0.0 {
            outline.points.reverse();
        }
        outline
    }

    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Shoelace area; positive for counter-clockwise winding
    pub fn signed_area(&self) -> f32 {
        let n = self.points.len();
        (0..n)
            .map(|i| self.points[i].perp_dot(self.points[(i + 1) % n]))
            .sum::<f32>()
            * 0.5
    }

    /// Per-point outward direction, scaled so that edges move by one unit
    fn bevel_directions(&self) -> Vec<Vec2> {
        let n = self.points.len();
        let edge_normal = |e: Vec2| Vec2::new(e.y, -e.x).normalize_or_zero();

        (0..n)
            .map(|i| {
                let prev = self.points[(i + n - 1) % n];
                let cur = self.points[i];
                let next = self.points[(i + 1) % n];
                let n1 = edge_normal(cur - prev);
                let n2 = edge_normal(next - cur);
                let bisector = (n1 + n2).try_normalize().unwrap_or(n1);
                bisector / bisector.dot(n1).max(0.25)
            })
            .collect()
    }

    fn expanded(&self, directions: &[Vec2], amount: f32) -> Vec<Vec2> {
        self.points
            .iter()
            .zip(directions)
            .map(|(p, d)| *p + *d * amount)
            .collect()
    }
}

/// Path-style builder that flattens cubic beziers into an [`Outline`]
#[derive(Debug, Clone)]
pub struct OutlineBuilder {
    current: Vec2,
    points: Vec<Vec2>,
}

impl OutlineBuilder {
    pub fn begin(x: f32, y: f32) -> Self {
        let start = Vec2::new(x, y);
        Self {
            current: start,
            points: vec![start],
        }
    }

    pub fn cubic_bezier_to(mut self, ctrl1: (f32, f32), ctrl2: (f32, f32), to: (f32, f32)) -> Self {
        let segment = CubicBezierSegment {
            from: point(self.current.x, self.current.y),
            ctrl1: point(ctrl1.0, ctrl1.1),
            ctrl2: point(ctrl2.0, ctrl2.1),
            to: point(to.0, to.1),
        };
        for i in 1..=CURVE_SEGMENTS {
            let p = segment.sample(i as f32 / CURVE_SEGMENTS as f32);
            self.points.push(Vec2::new(p.x, p.y));
        }
        self.current = Vec2::new(to.0, to.1);
        self
    }

    pub fn close(self) -> Outline {
        Outline::from_points(self.points)
    }
}

/// Extrudes `outline` along +Z with optional bevelled rims.
///
/// The front cap sits at `-bevel_thickness`, the back cap at
/// `depth + bevel_thickness`.
pub fn extrude(outline: &Outline, settings: &ExtrudeSettings) -> Result<Mesh> {
    ensure!(
        outline.len() >= 3,
        "outline needs at least three points, got {}",
        outline.len()
    );

    let directions = outline.bevel_directions();
    let layers = settings.layers();
    let rings: Vec<Vec<Vec3>> = layers
        .iter()
        .map(|&(z, amount)| {
            outline
                .expanded(&directions, amount)
                .into_iter()
                .map(|p| p.extend(z))
                .collect()
        })
        .collect();

    let mut mesh = Mesh::default();
    let n = outline.len();
    for pair in rings.windows(2) {
        let (lower, upper) = (&pair[0], &pair[1]);
        for i in 0..n {
            let j = (i + 1) % n;
            side_quad(&mut mesh, lower[i], lower[j], upper[j], upper[i]);
        }
    }

    let (front_z, front_amount) = layers[0];
    let (back_z, back_amount) = layers[layers.len() - 1];
    mesh.append(cap(&outline.expanded(&directions, front_amount), front_z, false)?);
    mesh.append(cap(&outline.expanded(&directions, back_amount), back_z, true)?);
    Ok(mesh)
}

fn side_quad(mesh: &mut Mesh, a0: Vec3, b0: Vec3, b1: Vec3, a1: Vec3) {
    let edge = b0 - a0;
    let normal = edge
        .cross(a1 - a0)
        .try_normalize()
        .unwrap_or_else(|| Vec3::new(edge.y, -edge.x, 0.0).normalize_or_zero());

    let ia0 = mesh.push_vertex(a0, normal);
    let ib0 = mesh.push_vertex(b0, normal);
    let ib1 = mesh.push_vertex(b1, normal);
    let ia1 = mesh.push_vertex(a1, normal);
    mesh.push_triangle(ia0, ib0, ib1);
    mesh.push_triangle(ia0, ib1, ia1);
}

fn cap(ring: &[Vec2], z: f32, facing_back: bool) -> Result<Mesh> {
    let mut builder = Path::builder();
    builder.begin(point(ring[0].x, ring[0].y));
    for p in &ring[1..] {
        builder.line_to(point(p.x, p.y));
    }
    builder.end(true);
    let path = builder.build();

    let mut buffers: VertexBuffers<Vec2, u32> = VertexBuffers::new();
    FillTessellator::new()
        .tessellate_path(
            &path,
            &FillOptions::default(),
            &mut BuffersBuilder::new(&mut buffers, |vertex: FillVertex| {
                Vec2::new(vertex.position().x, vertex.position().y)
            }),
        )
        .map_err(|e| anyhow!("cap tessellation failed: {e:?}"))?;

    let normal = if facing_back { Vec3::Z } else { Vec3::NEG_Z };
    let mut mesh = Mesh::default();
    for v in &buffers.vertices {
        mesh.push_vertex(v.extend(z), normal);
    }
    for tri in buffers.indices.chunks_exact(3) {
        let [a, b, c] = [tri[0], tri[1], tri[2]];
        let (pa, pb, pc) = (
            buffers.vertices[a as usize],
            buffers.vertices[b as usize],
            buffers.vertices[c as usize],
        );
        let counter_clockwise = (pb - pa).perp_dot(pc - pa) > 0.0;
        if counter_clockwise == facing_back {
            mesh.push_triangle(a, b, c);
        } else {
            mesh.push_triangle(a, c, b);
        }
    }
    Ok(mesh)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square() -> Outline {
        Outline::from_points(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(1.0, 0.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(0.0, 1.0),
        ])
    }

    #[test]
    fn outline_is_wound_counter_clockwise() {
        let clockwise = Outline::from_points(vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 1.0),
            Vec2::new(1.0, 1.0),
            Vec2::new(1.0, 0.0),
        ]);
        assert!(clockwise.signed_area() > 0.0);
        assert!((clockwise.signed_area() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn outline_drops_closing_duplicate() {
        let outline = OutlineBuilder::begin(0.0, 0.0)
            .cubic_bezier_to((0.0, 1.0), (1.0, 1.0), (1.0, 0.0))
            .cubic_bezier_to((1.0, -1.0), (0.0, -1.0), (0.0, 0.0))
            .close();
        assert_eq!(outline.len(), 2 * CURVE_SEGMENTS);
        assert_ne!(outline.points()[0], outline.points()[outline.len() - 1]);
    }

    #[test]
    fn flat_extrusion_counts() {
        let mesh = extrude(&square(), &ExtrudeSettings::flat(0.5, 1)).unwrap();
        // 4 side quads plus two 2-triangle caps
        assert_eq!(mesh.triangle_count(), 4 * 2 + 2 + 2);

        let bounds = mesh.bounds().unwrap();
        assert!(bounds.min.z.abs() < 1e-6);
        assert!((bounds.max.z - 0.5).abs() < 1e-6);
    }

    #[test]
    fn bevel_grows_the_solid() {
        let settings = ExtrudeSettings {
            steps: 2,
            depth: 0.5,
            bevel_thickness: 0.1,
            bevel_size: 0.1,
            bevel_offset: 0.0,
            bevel_segments: 1,
        };
        let mesh = extrude(&square(), &settings).unwrap();
        let bounds = mesh.bounds().unwrap();

        assert!((bounds.min.z + 0.1).abs() < 1e-6);
        assert!((bounds.max.z - 0.6).abs() < 1e-6);
        assert!((bounds.min.x + 0.1).abs() < 1e-5);
        assert!((bounds.max.y - 1.1).abs() < 1e-5);
    }

    #[test]
    fn caps_face_away_from_each_other() {
        let mesh = extrude(&square(), &ExtrudeSettings::flat(1.0, 1)).unwrap();
        for tri in mesh.indices.chunks_exact(3) {
            let n = mesh.normals[tri[0] as usize];
            if n.z.abs() < 0.5 {
                continue;
            }
            let [a, b, c] = [0, 1, 2].map(|k| mesh.positions[tri[k] as usize]);
            let face = (b - a).cross(c - a);
            assert!(face.dot(n) > 0.0, "cap triangle wound against its normal");
        }
    }

    #[test]
    fn degenerate_outline_is_rejected() {
        let line = Outline::from_points(vec![Vec2::ZERO, Vec2::X]);
        assert!(extrude(&line, &ExtrudeSettings::flat(1.0, 1)).is_err());
    }

    #[test]
    fn side_normals_are_unit_length() {
        let mesh = extrude(&square(), &ExtrudeSettings::flat(1.0, 3)).unwrap();
        assert!(mesh.normals.iter().all(|n| (n.length() - 1.0).abs() < 1e-5));
    }
}
