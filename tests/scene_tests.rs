use std::collections::HashSet;

use apology_scene::core::{BackendFactory, ResourceLedger, SurfaceSize};
use apology_scene::headless::RecordingFactory;
use apology_scene::material::Material;
use apology_scene::scene::{assemble_scene, Scene};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assemble(seed: u64) -> (Scene, ResourceLedger) {
    let mut factory = RecordingFactory::new();
    let mut backend = factory.create(SurfaceSize::new(1280, 720)).unwrap();
    let mut ledger = ResourceLedger::new();
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = assemble_scene(&mut backend, &mut ledger, SurfaceSize::new(1280, 720), &mut rng)
        .unwrap();
    (scene, ledger)
}

#[test]
fn test_scene_counts() {
    let (scene, _) = assemble(1);
    let counts = scene.counts();
    assert_eq!(counts.buds, 1);
    assert_eq!(counts.stems, 1);
    assert_eq!(counts.petals_per_layer, vec![6, 8, 10]);
    assert_eq!(counts.particles, 1000);
    assert_eq!(counts.hearts, 15);
    // bud + 24 petals + stem + particles + 15 hearts
    assert_eq!(scene.objects().count(), 42);
}

#[test]
fn test_every_object_id_is_tracked() {
    let (scene, ledger) = assemble(2);
    let geometries: HashSet<_> = scene.objects().map(|o| o.geometry).collect();
    let materials: HashSet<_> = scene.objects().map(|o| o.material).collect();

    assert_eq!(ledger.live_geometries(), geometries.len());
    assert_eq!(ledger.live_materials(), materials.len());
}

#[test]
fn test_petals_share_mesh_and_material() {
    let (scene, _) = assemble(3);
    let petals = &scene.rose.petals;
    assert!(petals.iter().all(|p| p.object.geometry == petals[0].object.geometry));
    assert!(petals.iter().all(|p| p.object.material == petals[0].object.material));
    assert_ne!(petals[0].object.material, scene.rose.bud.material);
}

#[test]
fn test_hearts_share_material_but_not_mesh() {
    let (scene, _) = assemble(4);
    let first = scene.hearts[0].object;
    assert!(scene.hearts.iter().all(|h| h.object.material == first.material));

    let meshes: HashSet<_> = scene.hearts.iter().map(|h| h.object.geometry).collect();
    assert_eq!(meshes.len(), scene.hearts.len());
}

#[test]
fn test_camera_and_rose_placement() {
    let (scene, _) = assemble(5);
    assert_eq!(scene.camera.position, Vec3::new(0.0, 0.0, 3.0));
    assert_eq!(scene.camera.fov_y_degrees, 75.0);
    assert_eq!(scene.camera.aspect, 1280.0 / 720.0);

    assert_eq!(scene.rose.transform.position, Vec3::new(0.0, -0.5, -2.0));
    assert_eq!(scene.rose.transform.scale, Vec3::splat(0.8));
    assert_eq!(scene.rose.stem.transform.position.y, -0.8);
}

#[test]
fn test_lights() {
    let (scene, _) = assemble(6);
    let lights = scene.lights;
    assert_eq!(lights.ambient.intensity, 0.6);
    assert_eq!(lights.directional.intensity, 0.7);
    assert!((lights.directional.direction - Vec3::new(5.0, 10.0, 5.0).normalize()).length() < 1e-6);
    assert_eq!(lights.point.intensity, 1.5);
    assert_eq!(lights.point.range, 10.0);
    assert_eq!(lights.point.position, Vec3::new(-2.0, 1.0, 3.0));
}

#[test]
fn test_heart_placement_ranges() {
    let (scene, _) = assemble(7);
    for heart in &scene.hearts {
        let t = heart.object.transform;
        assert!(t.position.abs().max_element() <= 5.0);
        assert!(t.rotation.min_element() >= 0.0);
        assert!(t.rotation.max_element() < std::f32::consts::PI);
        assert!((0.001..0.003).contains(&heart.speed));
        assert!((0.005..0.015).contains(&heart.rotation_speed));
    }
}

#[test]
fn test_same_seed_same_scene() {
    let (a, _) = assemble(99);
    let (b, _) = assemble(99);
    assert_eq!(a.particles.field.particles(), b.particles.field.particles());
    let positions = |s: &Scene| -> Vec<Vec3> {
        s.hearts.iter().map(|h| h.object.transform.position).collect()
    };
    assert_eq!(positions(&a), positions(&b));
}

#[test]
fn test_rose_children_are_drawn_in_rose_space() {
    let (scene, _) = assemble(8);
    let mut bud_origin = None;
    scene.for_each_drawable(|object, model| {
        if object.label == "bud" {
            bud_origin = Some(model.w_axis.truncate());
        }
    });
    assert_eq!(bud_origin, Some(Vec3::new(0.0, -0.5, -2.0)));
}

#[test]
fn test_particle_material_is_additive_points() {
    let mut factory = RecordingFactory::new();
    let stats = factory.stats();
    let mut backend = factory.create(SurfaceSize::new(64, 64)).unwrap();
    let mut ledger = ResourceLedger::new();
    let mut rng = StdRng::seed_from_u64(0);
    assemble_scene(&mut backend, &mut ledger, SurfaceSize::new(64, 64), &mut rng).unwrap();

    assert_eq!(stats.borrow().points_allocated, 1000);
    match apology_scene::material::particle_material() {
        Material::Points(points) => {
            assert!(points.additive && points.transparent && points.vertex_colors);
            assert!(!points.depth_write);
            assert_eq!(points.size, 0.1);
        }
        other => panic!("unexpected particle material {:?}", other),
    }
}
