use glam::Vec3;
use rand::Rng;

use crate::math::hex_to_rgb;

pub const PARTICLE_COUNT: usize = 1000;

/// The three particle tints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticleHue {
    Pink,
    Purple,
    Gold,
}

impl ParticleHue {
    /// Picks a tint from a uniform draw in [0, 1)
    pub fn from_bucket(h: f32) -> Self {
        if h < 0.33 {
            Self::Pink
        } else if h < 0.66 {
            Self::Purple
        } else {
            Self::Gold
        }
    }

    pub fn hex(self) -> u32 {
        match self {
            Self::Pink => 0xffaaff,
            Self::Purple => 0xcc99ff,
            Self::Gold => 0xffddaa,
        }
    }

    pub fn color(self) -> Vec3 {
        hex_to_rgb(self.hex())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    pub position: Vec3,
    pub color: Vec3,
    pub size: f32,
}

/// Fixed-size particle buffer, mutated in place every frame
#[derive(Debug, Clone)]
pub struct ParticleField {
    particles: Box<[Particle]>,
}

impl ParticleField {
    pub fn generate<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let particles = (0..PARTICLE_COUNT)
            .map(|_| {
                let position = Vec3::new(
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                    rng.gen_range(-10.0..10.0),
                );
                let hue = ParticleHue::from_bucket(rng.gen::<f32>());
                Particle {
                    position,
                    color: hue.color(),
                    size: rng.gen_range(0.05..0.15),
                }
            })
            .collect();
        Self { particles }
    }

    pub fn len(&self) -> usize {
        self.particles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.particles.is_empty()
    }

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }
}
