use std::time::Duration;

use rand::Rng;

use crate::geometry::Particle;
use crate::scene::{Heart, Rose, Scene};

pub const ROSE_SPIN: f32 = 0.003;
pub const PARTICLE_RISE: f32 = 0.005;
/// Particles and hearts wrap from the top of this band to the bottom
pub const DRIFT_LIMIT: f32 = 5.0;

/// Advances the scene by one tick; `elapsed` is the time since mount.
pub fn update_frame<R: Rng + ?Sized>(scene: &mut Scene, elapsed: Duration, rng: &mut R) {
    let t = elapsed.as_secs_f64() * 1000.0;
    update_rose(&mut scene.rose, t);
    update_particles(scene.particles.field.particles_mut(), t, rng);
    update_hearts(&mut scene.hearts, rng);
}

/// Slow spin around Y with a gentle nod around X
pub fn update_rose(rose: &mut Rose, t_ms: f64) {
    rose.transform.rotation.y += ROSE_SPIN;
    rose.transform.rotation.x = ((t_ms * 0.0003).sin() * 0.05) as f32;
}

pub fn update_particles<R: Rng + ?Sized>(particles: &mut [Particle], t_ms: f64, rng: &mut R) {
    for (i, p) in particles.iter_mut().enumerate() {
        p.position.y += PARTICLE_RISE;
        if p.position.y > DRIFT_LIMIT {
            p.position.y = -DRIFT_LIMIT;
        }
        let twinkle = ((t_ms * 0.005 + i as f64).sin() * 0.02 + 0.08) as f32;
        p.size = twinkle * rng.gen_range(0.5..1.0);
    }
}

pub fn update_hearts<R: Rng + ?Sized>(hearts: &mut [Heart], rng: &mut R) {
    for heart in hearts {
        let transform = &mut heart.object.transform;
        let rs = heart.rotation_speed;
        transform.position.y += heart.speed;
        transform.rotation.x += rs;
        transform.rotation.y += rs / 2.0;
        transform.rotation.z += rs / 3.0;

        if transform.position.y > DRIFT_LIMIT {
            transform.position.y = -DRIFT_LIMIT;
            transform.position.x = rng.gen_range(-DRIFT_LIMIT..=DRIFT_LIMIT);
            transform.position.z = rng.gen_range(-DRIFT_LIMIT..=DRIFT_LIMIT);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    use crate::core::{GeometryId, MaterialId};
    use crate::scene::RenderObject;
    use crate::math::Transform;

    fn particle(y: f32) -> Particle {
        Particle {
            position: Vec3::new(1.0, y, 2.0),
            color: Vec3::ONE,
            size: 0.1,
        }
    }

    fn heart(y: f32) -> Heart {
        Heart {
            object: RenderObject {
                label: "heart",
                geometry: GeometryId(1),
                material: MaterialId(1),
                transform: Transform::from_position(Vec3::new(1.0, y, 1.0))
                    .with_rotation(Vec3::new(0.1, 0.2, 0.3)),
            },
            speed: 0.002,
            rotation_speed: 0.012,
        }
    }

    #[test]
    fn particle_rises_and_wraps() {
        let mut rng = StdRng::seed_from_u64(1);
        let mut particles = [particle(0.0), particle(4.999)];
        update_particles(&mut particles, 0.0, &mut rng);

        assert!((particles[0].position.y - 0.005).abs() < 1e-6);
        assert_eq!(particles[1].position.y, -5.0);
        assert_eq!(particles[1].position.x, 1.0);
    }

    #[test]
    fn particle_size_stays_in_twinkle_band() {
        let mut rng = StdRng::seed_from_u64(2);
        let mut particles: Vec<_> = (0..100).map(|_| particle(0.0)).collect();
        for tick in 0..50 {
            update_particles(&mut particles, tick as f64 * 16.0, &mut rng);
            for p in &particles {
                // (0.08 ± 0.02) scaled by [0.5, 1)
                assert!(p.size >= 0.03 - 1e-6 && p.size < 0.1);
            }
        }
    }

    #[test]
    fn heart_reset_keeps_rotation() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut hearts = [heart(4.9995)];
        update_hearts(&mut hearts, &mut rng);

        let t = hearts[0].object.transform;
        assert_eq!(t.position.y, -5.0);
        assert!(t.position.x.abs() <= 5.0 && t.position.z.abs() <= 5.0);
        assert!((t.rotation - Vec3::new(0.112, 0.206, 0.304)).length() < 1e-6);
    }

    #[test]
    fn heart_drifts_and_tumbles() {
        let mut rng = StdRng::seed_from_u64(4);
        let mut hearts = [heart(0.0)];
        update_hearts(&mut hearts, &mut rng);

        let t = hearts[0].object.transform;
        assert!((t.position.y - 0.002).abs() < 1e-7);
        assert_eq!(t.position.x, 1.0);
    }
}
