use glam::Vec3;

use crate::math::hex_to_rgb;

/// Physically based surface with optional emission and transparency
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StandardMaterial {
    pub color: Vec3,
    pub roughness: f32,
    pub metalness: f32,
    pub opacity: f32,
    pub emissive: Vec3,
    pub emissive_intensity: f32,
    pub double_sided: bool,
}

impl StandardMaterial {
    pub fn new(hex: u32) -> Self {
        Self {
            color: hex_to_rgb(hex),
            roughness: 1.0,
            metalness: 0.0,
            opacity: 1.0,
            emissive: Vec3::ZERO,
            emissive_intensity: 1.0,
            double_sided: false,
        }
    }

    pub fn roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness;
        self
    }

    pub fn metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness;
        self
    }

    pub fn opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    pub fn emissive(mut self, hex: u32, intensity: f32) -> Self {
        self.emissive = hex_to_rgb(hex);
        self.emissive_intensity = intensity;
        self
    }

    pub fn double_sided(mut self) -> Self {
        self.double_sided = true;
        self
    }

    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// Screen-facing sprites with per-vertex color and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointsMaterial {
    pub size: f32,
    pub vertex_colors: bool,
    pub additive: bool,
    pub transparent: bool,
    pub depth_write: bool,
    pub size_attenuation: bool,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Material {
    Standard(StandardMaterial),
    Points(PointsMaterial),
}

pub fn bud_material() -> Material {
    Material::Standard(StandardMaterial::new(0xff007f).roughness(0.4).metalness(0.1))
}

pub fn petal_material() -> Material {
    Material::Standard(
        StandardMaterial::new(0xff3399)
            .roughness(0.5)
            .metalness(0.1)
            .double_sided(),
    )
}

pub fn stem_material() -> Material {
    Material::Standard(StandardMaterial::new(0x228b22).roughness(0.6))
}

pub fn heart_material() -> Material {
    Material::Standard(
        StandardMaterial::new(0xffc0cb)
            .opacity(0.7)
            .roughness(0.3)
            .metalness(0.1)
            .emissive(0xffc0cb, 0.3)
            .double_sided(),
    )
}

pub fn particle_material() -> Material {
    Material::Points(PointsMaterial {
        size: 0.1,
        vertex_colors: true,
        additive: true,
        transparent: true,
        depth_write: false,
        size_attenuation: true,
    })
}
