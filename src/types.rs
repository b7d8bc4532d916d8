use glam::Mat4;

use crate::geometry::{Mesh, Particle};
use crate::material::{Material, PointsMaterial, StandardMaterial};
use crate::scene::{Lights, Scene};

/// Dynamic offsets into the object buffer must be multiples of this
pub const OBJECT_STRIDE: u64 = 256;

/// Interleaved mesh vertex
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct MeshVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
}

impl MeshVertex {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x3];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRIBUTES,
        }
    }

    pub fn interleave(mesh: &Mesh) -> Vec<Self> {
        mesh.positions
            .iter()
            .zip(&mesh.normals)
            .map(|(p, n)| Self {
                position: p.to_array(),
                normal: n.to_array(),
            })
            .collect()
    }
}

/// Per-frame camera and light data, bind group 0
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct GlobalsUniform {
    pub view_proj: [[f32; 4]; 4],
    pub camera_position: [f32; 4],
    /// rgb premultiplied by intensity
    pub ambient: [f32; 4],
    pub sun_direction: [f32; 4],
    pub sun_color: [f32; 4],
    /// w is the light range
    pub point_position: [f32; 4],
    pub point_color: [f32; 4],
    /// width, height, projection x scale, projection y scale
    pub viewport: [f32; 4],
}

impl GlobalsUniform {
    pub fn new(scene: &Scene, width: u32, height: u32) -> Self {
        let camera = &scene.camera;
        let projection = camera.projection();
        let Lights {
            ambient,
            directional,
            point,
        } = scene.lights;

        Self {
            view_proj: camera.view_projection().to_cols_array_2d(),
            camera_position: camera.position.extend(1.0).to_array(),
            ambient: (ambient.color * ambient.intensity).extend(0.0).to_array(),
            sun_direction: directional.direction.extend(0.0).to_array(),
            sun_color: (directional.color * directional.intensity).extend(0.0).to_array(),
            point_position: point.position.extend(point.range).to_array(),
            point_color: (point.color * point.intensity).extend(0.0).to_array(),
            viewport: [
                width as f32,
                height as f32,
                projection.x_axis.x,
                projection.y_axis.y,
            ],
        }
    }
}

/// Per-draw data, bind group 1 with a dynamic offset
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ObjectUniform {
    pub model: [[f32; 4]; 4],
    pub normal_matrix: [[f32; 4]; 4],
    /// rgb and opacity
    pub color: [f32; 4],
    pub emissive: [f32; 4],
    /// Standard: roughness, metalness, double sided.
    /// Points: base size, size attenuation.
    pub params: [f32; 4],
}

impl ObjectUniform {
    pub fn new(model: Mat4, material: &Material) -> Self {
        let normal_matrix = model.inverse().transpose().to_cols_array_2d();
        let model = model.to_cols_array_2d();
        match material {
            Material::Standard(StandardMaterial {
                color,
                roughness,
                metalness,
                opacity,
                emissive,
                emissive_intensity,
                double_sided,
            }) => Self {
                model,
                normal_matrix,
                color: color.extend(*opacity).to_array(),
                emissive: (*emissive * *emissive_intensity).extend(0.0).to_array(),
                params: [*roughness, *metalness, f32::from(u8::from(*double_sided)), 0.0],
            },
            Material::Points(PointsMaterial {
                size,
                size_attenuation,
                ..
            }) => Self {
                model,
                normal_matrix,
                color: [1.0; 4],
                emissive: [0.0; 4],
                params: [*size, f32::from(u8::from(*size_attenuation)), 0.0, 0.0],
            },
        }
    }
}

/// One particle sprite, stepped per instance
#[repr(C)]
#[derive(Copy, Clone, Debug, bytemuck::Pod, bytemuck::Zeroable)]
pub struct ParticleInstance {
    pub position: [f32; 3],
    pub size: f32,
    pub color: [f32; 3],
    pub _pad: f32,
}

impl ParticleInstance {
    const ATTRIBUTES: [wgpu::VertexAttribute; 2] =
        wgpu::vertex_attr_array![0 => Float32x4, 1 => Float32x4];

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<Self>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &Self::ATTRIBUTES,
        }
    }
}

impl From<&Particle> for ParticleInstance {
    fn from(p: &Particle) -> Self {
        Self {
            position: p.position.to_array(),
            size: p.size,
            color: p.color.to_array(),
            _pad: 0.0,
        }
    }
}
