use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use apology_scene::core::{update_frame, update_particles, BackendFactory, ResourceLedger, SurfaceSize};
use apology_scene::geometry::{build_heart, build_petal, ParticleField};
use apology_scene::headless::{RecordingFactory, FRAME_INTERVAL};
use apology_scene::scene::{assemble_scene, Scene};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn build_scene() -> (Scene, StdRng) {
    let size = SurfaceSize::new(1280, 720);
    let mut backend = RecordingFactory::new().create(size).unwrap();
    let mut ledger = ResourceLedger::new();
    let mut rng = StdRng::seed_from_u64(42);
    let scene = assemble_scene(&mut backend, &mut ledger, size, &mut rng).unwrap();
    (scene, rng)
}

fn bench_frame_tick(c: &mut Criterion) {
    let (mut scene, mut rng) = build_scene();
    let mut frame = 0u32;

    c.bench_function("frame_tick", |b| {
        b.iter(|| {
            frame = frame.wrapping_add(1);
            update_frame(black_box(&mut scene), FRAME_INTERVAL * frame, &mut rng);
        })
    });
}

fn bench_particle_update(c: &mut Criterion) {
    let mut group = c.benchmark_group("particle_update");
    let mut rng = StdRng::seed_from_u64(7);

    for fields in [1usize, 4, 16] {
        let mut particles: Vec<_> = (0..fields)
            .flat_map(|_| ParticleField::generate(&mut rng).particles().to_vec())
            .collect();
        group.bench_with_input(
            BenchmarkId::from_parameter(particles.len()),
            &particles.len(),
            |b, _| {
                b.iter(|| update_particles(black_box(&mut particles), 1234.0, &mut rng));
            },
        );
    }
    group.finish();
}

fn bench_scene_assembly(c: &mut Criterion) {
    c.bench_function("scene_assembly", |b| b.iter(|| black_box(build_scene())));
}

fn bench_extrusion(c: &mut Criterion) {
    let mut group = c.benchmark_group("extrusion");
    group.bench_function("petal", |b| b.iter(|| black_box(build_petal().unwrap())));
    group.bench_function("heart", |b| b.iter(|| black_box(build_heart(0.15).unwrap())));
    group.finish();
}

criterion_group!(
    benches,
    bench_frame_tick,
    bench_particle_update,
    bench_scene_assembly,
    bench_extrusion
);
criterion_main!(benches);
