use std::collections::HashMap;
use std::rc::Rc;

use anyhow::{bail, Result};
use wgpu::util::DeviceExt;

use crate::compositor::SharedTargets;
use crate::core::{
    BackendFactory, GeometryData, GeometryId, MaterialId, RenderBackend, SurfaceSize, TargetId,
};
use crate::gpu_context::GpuContext;
use crate::material::Material;
use crate::scene::Scene;
use crate::types::{GlobalsUniform, MeshVertex, ObjectUniform, ParticleInstance, OBJECT_STRIDE};

pub const SCENE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;
const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;
const INITIAL_OBJECT_CAPACITY: u64 = 64;

enum GpuGeometry {
    Mesh {
        vertices: wgpu::Buffer,
        indices: wgpu::Buffer,
        index_count: u32,
    },
    Points {
        instances: wgpu::Buffer,
        capacity: u32,
    },
}

impl GpuGeometry {
    fn destroy(&self) {
        match self {
            Self::Mesh {
                vertices, indices, ..
            } => {
                vertices.destroy();
                indices.destroy();
            }
            Self::Points { instances, .. } => instances.destroy(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DrawPass {
    Opaque,
    OpaqueDoubleSided,
    Points,
    Blended,
}

struct Draw {
    geometry: GeometryId,
    pass: DrawPass,
    /// View-space z of the object origin, for back-to-front sorting
    depth: f32,
    offset: u32,
}

struct Pipelines {
    opaque: wgpu::RenderPipeline,
    opaque_double_sided: wgpu::RenderPipeline,
    points: wgpu::RenderPipeline,
    blended: wgpu::RenderPipeline,
}

impl Pipelines {
    fn get(&self, pass: DrawPass) -> &wgpu::RenderPipeline {
        match pass {
            DrawPass::Opaque => &self.opaque,
            DrawPass::OpaqueDoubleSided => &self.opaque_double_sided,
            DrawPass::Points => &self.points,
            DrawPass::Blended => &self.blended,
        }
    }
}

struct RenderTarget {
    color: wgpu::Texture,
    depth: wgpu::Texture,
    color_view: wgpu::TextureView,
    depth_view: wgpu::TextureView,
}

impl RenderTarget {
    fn new(device: &wgpu::Device, size: SurfaceSize) -> Self {
        let extent = wgpu::Extent3d {
            width: size.width.max(1),
            height: size.height.max(1),
            depth_or_array_layers: 1,
        };
        let texture = |label, format, usage| {
            device.create_texture(&wgpu::TextureDescriptor {
                label: Some(label),
                size: extent,
                mip_level_count: 1,
                sample_count: 1,
                dimension: wgpu::TextureDimension::D2,
                format,
                usage,
                view_formats: &[],
            })
        };

        let color = texture(
            "Scene Color Target",
            SCENE_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::TEXTURE_BINDING,
        );
        let depth = texture(
            "Scene Depth Target",
            DEPTH_FORMAT,
            wgpu::TextureUsages::RENDER_ATTACHMENT,
        );
        let color_view = color.create_view(&wgpu::TextureViewDescriptor::default());
        let depth_view = depth.create_view(&wgpu::TextureViewDescriptor::default());
        Self {
            color,
            depth,
            color_view,
            depth_view,
        }
    }

    fn destroy(&self) {
        self.color.destroy();
        self.depth.destroy();
    }
}

/// Forward renderer drawing the scene into an offscreen target that the
/// compositor shows on the window
pub struct WgpuBackend {
    gpu: GpuContext,
    id: TargetId,
    targets: SharedTargets,
    size: SurfaceSize,
    target: RenderTarget,
    globals_buffer: wgpu::Buffer,
    globals_bind_group: wgpu::BindGroup,
    object_layout: wgpu::BindGroupLayout,
    object_buffer: wgpu::Buffer,
    object_capacity: u64,
    object_bind_group: wgpu::BindGroup,
    pipelines: Pipelines,
    geometries: HashMap<GeometryId, GpuGeometry>,
    materials: HashMap<MaterialId, Material>,
    next_id: u64,
    disposed: bool,
}

impl WgpuBackend {
    pub fn new(gpu: GpuContext, targets: SharedTargets, id: TargetId, size: SurfaceSize) -> Self {
        let device = gpu.device();
        let target = RenderTarget::new(device, size);

        let globals_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Globals Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
        });
        let object_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Object Bind Group Layout"),
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: true,
                    min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                },
                count: None,
            }],
        });

        let globals_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Globals Buffer"),
            size: std::mem::size_of::<GlobalsUniform>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let globals_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Globals Bind Group"),
            layout: &globals_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: globals_buffer.as_entire_binding(),
            }],
        });

        let (object_buffer, object_bind_group) =
            Self::create_object_buffer(device, &object_layout, INITIAL_OBJECT_CAPACITY);
        let pipelines = Self::create_pipelines(device, &globals_layout, &object_layout);

        targets.borrow_mut().publish(id, target.color_view.clone());

        Self {
            gpu,
            id,
            targets,
            size,
            target,
            globals_buffer,
            globals_bind_group,
            object_layout,
            object_buffer,
            object_capacity: INITIAL_OBJECT_CAPACITY,
            object_bind_group,
            pipelines,
            geometries: HashMap::new(),
            materials: HashMap::new(),
            next_id: 0,
            disposed: false,
        }
    }

    fn create_object_buffer(
        device: &wgpu::Device,
        layout: &wgpu::BindGroupLayout,
        capacity: u64,
    ) -> (wgpu::Buffer, wgpu::BindGroup) {
        let buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("Object Uniform Buffer"),
            size: capacity * OBJECT_STRIDE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Object Bind Group"),
            layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &buffer,
                    offset: 0,
                    size: wgpu::BufferSize::new(std::mem::size_of::<ObjectUniform>() as u64),
                }),
            }],
        });
        (buffer, bind_group)
    }

    fn create_pipelines(
        device: &wgpu::Device,
        globals_layout: &wgpu::BindGroupLayout,
        object_layout: &wgpu::BindGroupLayout,
    ) -> Pipelines {
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Scene Pipeline Layout"),
            bind_group_layouts: &[globals_layout, object_layout],
            push_constant_ranges: &[],
        });
        let mesh_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Scene Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("scene.wgsl").into()),
        });
        let points_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("Particle Shader"),
            source: wgpu::ShaderSource::Wgsl(include_str!("particles.wgsl").into()),
        });

        let depth_state = |depth_write_enabled| {
            Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled,
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            })
        };

        let pipeline = |label: &str,
                        shader: &wgpu::ShaderModule,
                        vertex_layout: wgpu::VertexBufferLayout<'static>,
                        cull_mode: Option<wgpu::Face>,
                        blend: wgpu::BlendState,
                        depth_write: bool| {
            device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
                label: Some(label),
                layout: Some(&layout),
                vertex: wgpu::VertexState {
                    module: shader,
                    entry_point: Some("vs_main"),
                    buffers: &[vertex_layout],
                    compilation_options: Default::default(),
                },
                fragment: Some(wgpu::FragmentState {
                    module: shader,
                    entry_point: Some("fs_main"),
                    targets: &[Some(wgpu::ColorTargetState {
                        format: SCENE_FORMAT,
                        blend: Some(blend),
                        write_mask: wgpu::ColorWrites::ALL,
                    })],
                    compilation_options: Default::default(),
                }),
                primitive: wgpu::PrimitiveState {
                    topology: wgpu::PrimitiveTopology::TriangleList,
                    front_face: wgpu::FrontFace::Ccw,
                    cull_mode,
                    ..Default::default()
                },
                depth_stencil: depth_state(depth_write),
                multisample: wgpu::MultisampleState::default(),
                multiview: None,
                cache: None,
            })
        };

        let additive = wgpu::BlendState {
            color: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::SrcAlpha,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
            alpha: wgpu::BlendComponent {
                src_factor: wgpu::BlendFactor::One,
                dst_factor: wgpu::BlendFactor::One,
                operation: wgpu::BlendOperation::Add,
            },
        };

        Pipelines {
            opaque: pipeline(
                "Opaque Mesh Pipeline",
                &mesh_shader,
                MeshVertex::layout(),
                Some(wgpu::Face::Back),
                wgpu::BlendState::REPLACE,
                true,
            ),
            opaque_double_sided: pipeline(
                "Double Sided Mesh Pipeline",
                &mesh_shader,
                MeshVertex::layout(),
                None,
                wgpu::BlendState::REPLACE,
                true,
            ),
            points: pipeline(
                "Particle Pipeline",
                &points_shader,
                ParticleInstance::layout(),
                None,
                additive,
                false,
            ),
            blended: pipeline(
                "Transparent Mesh Pipeline",
                &mesh_shader,
                MeshVertex::layout(),
                None,
                wgpu::BlendState::ALPHA_BLENDING,
                false,
            ),
        }
    }

    fn ensure_object_capacity(&mut self, count: u64) {
        if count <= self.object_capacity {
            return;
        }
        let capacity = count.next_power_of_two();
        self.object_buffer.destroy();
        let (buffer, bind_group) =
            Self::create_object_buffer(self.gpu.device(), &self.object_layout, capacity);
        self.object_buffer = buffer;
        self.object_bind_group = bind_group;
        self.object_capacity = capacity;
    }

    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn size(&self) -> SurfaceSize {
        self.size
    }
}

impl RenderBackend for WgpuBackend {
    fn target(&self) -> TargetId {
        self.id
    }

    fn create_geometry(&mut self, data: GeometryData<'_>) -> Result<GeometryId> {
        if self.disposed {
            bail!("backend already disposed");
        }
        let device = self.gpu.device();
        let geometry = match data {
            GeometryData::Mesh(mesh) => {
                if mesh.is_empty() {
                    bail!("cannot upload an empty mesh");
                }
                let vertices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Vertex Buffer"),
                    contents: bytemuck::cast_slice(&MeshVertex::interleave(mesh)),
                    usage: wgpu::BufferUsages::VERTEX,
                });
                let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                    label: Some("Mesh Index Buffer"),
                    contents: bytemuck::cast_slice(&mesh.indices),
                    usage: wgpu::BufferUsages::INDEX,
                });
                GpuGeometry::Mesh {
                    vertices,
                    indices,
                    index_count: mesh.indices.len() as u32,
                }
            }
            GeometryData::Points { count } => {
                let instances = device.create_buffer(&wgpu::BufferDescriptor {
                    label: Some("Particle Instance Buffer"),
                    size: (count.max(1) * std::mem::size_of::<ParticleInstance>()) as u64,
                    usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
                    mapped_at_creation: false,
                });
                GpuGeometry::Points {
                    instances,
                    capacity: count as u32,
                }
            }
        };

        let id = GeometryId(self.next_id());
        self.geometries.insert(id, geometry);
        Ok(id)
    }

    fn create_material(&mut self, material: &Material) -> Result<MaterialId> {
        if self.disposed {
            bail!("backend already disposed");
        }
        let id = MaterialId(self.next_id());
        self.materials.insert(id, *material);
        Ok(id)
    }

    fn release_geometry(&mut self, id: GeometryId) {
        if let Some(geometry) = self.geometries.remove(&id) {
            geometry.destroy();
        }
    }

    fn release_material(&mut self, id: MaterialId) {
        self.materials.remove(&id);
    }

    fn set_size(&mut self, size: SurfaceSize) {
        if size.is_empty() || size == self.size || self.disposed {
            return;
        }
        self.size = size;
        self.target.destroy();
        self.target = RenderTarget::new(self.gpu.device(), size);
        self.targets
            .borrow_mut()
            .publish(self.id, self.target.color_view.clone());
    }

    fn render(&mut self, scene: &Scene) -> Result<()> {
        if self.disposed {
            bail!("backend already disposed");
        }

        let globals = GlobalsUniform::new(scene, self.size.width, self.size.height);
        self.gpu
            .queue()
            .write_buffer(&self.globals_buffer, 0, bytemuck::bytes_of(&globals));

        let view = scene.camera.view();
        let mut draws: Vec<Draw> = Vec::new();
        let mut uniforms: Vec<u8> = Vec::new();
        let mut invalid = None;
        scene.for_each_drawable(|object, model| {
            let (Some(material), Some(geometry)) = (
                self.materials.get(&object.material),
                self.geometries.get(&object.geometry),
            ) else {
                invalid = Some(object.label);
                return;
            };
            let pass = match (material, geometry) {
                (Material::Points(_), GpuGeometry::Points { .. }) => DrawPass::Points,
                (Material::Standard(m), GpuGeometry::Mesh { .. }) if m.is_transparent() => {
                    DrawPass::Blended
                }
                (Material::Standard(m), GpuGeometry::Mesh { .. }) if m.double_sided => {
                    DrawPass::OpaqueDoubleSided
                }
                (Material::Standard(_), GpuGeometry::Mesh { .. }) => DrawPass::Opaque,
                _ => {
                    invalid = Some(object.label);
                    return;
                }
            };

            let offset = draws.len() as u64 * OBJECT_STRIDE;
            uniforms.resize(offset as usize, 0);
            uniforms.extend_from_slice(bytemuck::bytes_of(&ObjectUniform::new(model, material)));
            draws.push(Draw {
                geometry: object.geometry,
                pass,
                depth: (view * model.w_axis).z,
                offset: offset as u32,
            });
        });
        if let Some(label) = invalid {
            bail!("{} references an unknown or mismatched geometry/material", label);
        }

        self.ensure_object_capacity(draws.len() as u64);
        self.gpu.queue().write_buffer(&self.object_buffer, 0, &uniforms);

        let mut point_count = 0;
        if let Some(GpuGeometry::Points { instances, capacity }) =
            self.geometries.get(&scene.particles.object.geometry)
        {
            let data: Vec<ParticleInstance> = scene
                .particles
                .field
                .particles()
                .iter()
                .take(*capacity as usize)
                .map(ParticleInstance::from)
                .collect();
            point_count = data.len() as u32;
            self.gpu
                .queue()
                .write_buffer(instances, 0, bytemuck::cast_slice(&data));
        }

        // Farthest first; only the blended pass depends on it
        draws.sort_by(|a, b| a.depth.total_cmp(&b.depth));

        let mut encoder = self
            .gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });
        {
            let mut render_pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &self.target.color_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::TRANSPARENT),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &self.target.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                occlusion_query_set: None,
                timestamp_writes: None,
            });
            render_pass.set_bind_group(0, &self.globals_bind_group, &[]);

            for pass in [
                DrawPass::Opaque,
                DrawPass::OpaqueDoubleSided,
                DrawPass::Points,
                DrawPass::Blended,
            ] {
                render_pass.set_pipeline(self.pipelines.get(pass));
                for draw in draws.iter().filter(|d| d.pass == pass) {
                    render_pass.set_bind_group(1, &self.object_bind_group, &[draw.offset]);
                    match &self.geometries[&draw.geometry] {
                        GpuGeometry::Mesh {
                            vertices,
                            indices,
                            index_count,
                        } => {
                            render_pass.set_vertex_buffer(0, vertices.slice(..));
                            render_pass.set_index_buffer(indices.slice(..), wgpu::IndexFormat::Uint32);
                            render_pass.draw_indexed(0..*index_count, 0, 0..1);
                        }
                        GpuGeometry::Points { instances, .. } => {
                            render_pass.set_vertex_buffer(0, instances.slice(..));
                            render_pass.draw(0..6, 0..point_count);
                        }
                    }
                }
            }
        }

        self.gpu.queue().submit(std::iter::once(encoder.finish()));
        Ok(())
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for geometry in self.geometries.values() {
            geometry.destroy();
        }
        self.geometries.clear();
        self.materials.clear();
        self.targets.borrow_mut().withdraw(self.id);
        self.target.destroy();
        self.object_buffer.destroy();
        self.globals_buffer.destroy();
        self.disposed = true;
    }
}

/// Creates one [`WgpuBackend`] per mount, each with a fresh target id
pub struct WgpuBackendFactory {
    gpu: GpuContext,
    targets: SharedTargets,
    next_target: u64,
}

impl WgpuBackendFactory {
    pub fn new(gpu: GpuContext, targets: SharedTargets) -> Self {
        Self {
            gpu,
            targets,
            next_target: 0,
        }
    }
}

impl BackendFactory for WgpuBackendFactory {
    type Backend = WgpuBackend;

    fn create(&mut self, size: SurfaceSize) -> Result<WgpuBackend> {
        self.next_target += 1;
        Ok(WgpuBackend::new(
            self.gpu.clone(),
            Rc::clone(&self.targets),
            TargetId(self.next_target),
            size,
        ))
    }
}
