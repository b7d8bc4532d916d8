use anyhow::{Context, Result};
use glam::{Mat4, Vec3};
use log::info;
use rand::Rng;

use crate::camera::PerspectiveCamera;
use crate::core::{GeometryData, GeometryId, MaterialId, RenderBackend, ResourceLedger, SurfaceSize};
use crate::geometry::{
    build_bud, build_heart, build_petal, build_stem, petal_layout, scatter_hearts, Mesh,
    ParticleField, PETALS_PER_LAYER, PETAL_LAYER_COUNT,
};
use crate::material::{
    bud_material, heart_material, particle_material, petal_material, stem_material, Material,
};
use crate::math::{hex_to_rgb, Transform};

const ROSE_POSITION: Vec3 = Vec3::new(0.0, -0.5, -2.0);
const ROSE_SCALE: f32 = 0.8;
const STEM_OFFSET: f32 = -0.8;

/// One drawable: a geometry, a material and where to put them
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderObject {
    pub label: &'static str,
    pub geometry: GeometryId,
    pub material: MaterialId,
    pub transform: Transform,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Petal {
    pub layer: usize,
    pub object: RenderObject,
}

/// Bud, petals and stem under one group transform
#[derive(Debug, Clone)]
pub struct Rose {
    pub transform: Transform,
    pub bud: RenderObject,
    pub petals: Vec<Petal>,
    pub stem: RenderObject,
}

#[derive(Debug, Clone)]
pub struct ParticleCloud {
    pub object: RenderObject,
    pub field: ParticleField,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Heart {
    pub object: RenderObject,
    pub speed: f32,
    pub rotation_speed: f32,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Vec3,
    pub intensity: f32,
}

/// Light arriving from `direction` (pointing towards the light)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    pub color: Vec3,
    pub intensity: f32,
    pub direction: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub color: Vec3,
    pub intensity: f32,
    pub range: f32,
    pub position: Vec3,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lights {
    pub ambient: AmbientLight,
    pub directional: DirectionalLight,
    pub point: PointLight,
}

impl Default for Lights {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: hex_to_rgb(0xffffff),
                intensity: 0.6,
            },
            directional: DirectionalLight {
                color: hex_to_rgb(0xffffff),
                intensity: 0.7,
                direction: Vec3::new(5.0, 10.0, 5.0).normalize(),
            },
            point: PointLight {
                color: hex_to_rgb(0xffaaff),
                intensity: 1.5,
                range: 10.0,
                position: Vec3::new(-2.0, 1.0, 3.0),
            },
        }
    }
}

/// Object counts, used to check that every mount builds the same scene
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneCounts {
    pub buds: usize,
    pub stems: usize,
    pub petals_per_layer: Vec<usize>,
    pub particles: usize,
    pub hearts: usize,
}

/// Everything one mount renders
#[derive(Debug, Clone)]
pub struct Scene {
    pub camera: PerspectiveCamera,
    pub lights: Lights,
    pub rose: Rose,
    pub particles: ParticleCloud,
    pub hearts: Vec<Heart>,
}

impl Scene {
    /// Every render object, rose parts first
    pub fn objects(&self) -> impl Iterator<Item = &RenderObject> + '_ {
        std::iter::once(&self.rose.bud)
            .chain(self.rose.petals.iter().map(|p| &p.object))
            .chain(std::iter::once(&self.rose.stem))
            .chain(std::iter::once(&self.particles.object))
            .chain(self.hearts.iter().map(|h| &h.object))
    }

    /// Visits each object with its world matrix
    pub fn for_each_drawable(&self, mut f: impl FnMut(&RenderObject, Mat4)) {
        let rose = self.rose.transform.matrix();
        f(&self.rose.bud, rose * self.rose.bud.transform.matrix());
        for petal in &self.rose.petals {
            f(&petal.object, rose * petal.object.transform.matrix());
        }
        f(&self.rose.stem, rose * self.rose.stem.transform.matrix());
        f(&self.particles.object, self.particles.object.transform.matrix());
        for heart in &self.hearts {
            f(&heart.object, heart.object.transform.matrix());
        }
    }

    pub fn counts(&self) -> SceneCounts {
        let mut petals_per_layer = vec![0; PETAL_LAYER_COUNT];
        for petal in &self.rose.petals {
            petals_per_layer[petal.layer] += 1;
        }
        SceneCounts {
            buds: 1,
            stems: 1,
            petals_per_layer,
            particles: self.particles.field.len(),
            hearts: self.hearts.len(),
        }
    }
}

struct Uploader<'a, B: ?Sized> {
    backend: &'a mut B,
    ledger: &'a mut ResourceLedger,
}

impl<B: RenderBackend + ?Sized> Uploader<'_, B> {
    fn mesh(&mut self, mesh: &Mesh) -> Result<GeometryId> {
        let id = self.backend.create_geometry(GeometryData::Mesh(mesh))?;
        Ok(self.ledger.track_geometry(id))
    }

    fn points(&mut self, count: usize) -> Result<GeometryId> {
        let id = self.backend.create_geometry(GeometryData::Points { count })?;
        Ok(self.ledger.track_geometry(id))
    }

    fn material(&mut self, material: Material) -> Result<MaterialId> {
        let id = self.backend.create_material(&material)?;
        Ok(self.ledger.track_material(id))
    }
}

/// Builds the decorative scene on `backend`.
///
/// Every id created is tracked in `ledger`; on error the ids created so far
/// are still in the ledger for the caller to release.
pub fn assemble_scene<B, R>(
    backend: &mut B,
    ledger: &mut ResourceLedger,
    size: SurfaceSize,
    rng: &mut R,
) -> Result<Scene>
where
    B: RenderBackend + ?Sized,
    R: Rng + ?Sized,
{
    let mut upload = Uploader { backend, ledger };

    let rose = build_rose(&mut upload).context("Failed to build rose")?;

    let field = ParticleField::generate(rng);
    let particles = ParticleCloud {
        object: RenderObject {
            label: "particles",
            geometry: upload.points(field.len())?,
            material: upload.material(particle_material())?,
            transform: Transform::IDENTITY,
        },
        field,
    };

    let heart_material = upload.material(heart_material())?;
    let hearts = scatter_hearts(rng)
        .into_iter()
        .map(|seed| {
            let mesh = build_heart(seed.scale).context("Failed to build heart")?;
            Ok(Heart {
                object: RenderObject {
                    label: "heart",
                    geometry: upload.mesh(&mesh)?,
                    material: heart_material,
                    transform: Transform::from_position(seed.position).with_rotation(seed.rotation),
                },
                speed: seed.speed,
                rotation_speed: seed.rotation_speed,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let scene = Scene {
        camera: PerspectiveCamera::new(size),
        lights: Lights::default(),
        rose,
        particles,
        hearts,
    };
    info!(
        "Scene assembled: {} objects, {} resources",
        scene.objects().count(),
        upload.ledger.live()
    );
    Ok(scene)
}

fn build_rose<B: RenderBackend + ?Sized>(upload: &mut Uploader<'_, B>) -> Result<Rose> {
    let bud = RenderObject {
        label: "bud",
        geometry: upload.mesh(&build_bud())?,
        material: upload.material(bud_material())?,
        transform: Transform::IDENTITY,
    };

    let petal_geometry = upload.mesh(&build_petal()?)?;
    let petal_material = upload.material(petal_material())?;
    let petals: Vec<Petal> = petal_layout()
        .into_iter()
        .map(|placement| Petal {
            layer: placement.layer,
            object: RenderObject {
                label: "petal",
                geometry: petal_geometry,
                material: petal_material,
                transform: placement.transform,
            },
        })
        .collect();
    debug_assert_eq!(petals.len(), PETALS_PER_LAYER.iter().sum::<usize>());

    let stem = RenderObject {
        label: "stem",
        geometry: upload.mesh(&build_stem())?,
        material: upload.material(stem_material())?,
        transform: Transform::from_position(Vec3::new(0.0, STEM_OFFSET, 0.0)),
    };

    Ok(Rose {
        transform: Transform::from_position(ROSE_POSITION).with_uniform_scale(ROSE_SCALE),
        bud,
        petals,
        stem,
    })
}
