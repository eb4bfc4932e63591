//! GPU-side instanced objects and their surface materials

use crate::expansion_uniform::SharedExpansion;
use crate::pipeline::{BlendMode, ObjectUniforms};
use crate::primitives::Mesh;
use glam::Mat4;
use std::rc::Rc;
use tinsel_core::Color;
use tinsel_ornaments::ExplosionInstance;
use wgpu::util::DeviceExt;

/// Surface parameters for one instanced object. Colors are sRGB as written;
/// conversion to linear happens when uniforms are built.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMaterial {
    pub base_color: Color,
    pub opacity: f32,
    pub emissive: Color,
    pub emissive_intensity: f32,
    pub roughness: f32,
    pub metalness: f32,
    /// How strongly the lighting rig's star glow adds to emission
    pub glow_weight: f32,
    pub unlit: bool,
    pub blend: BlendMode,
    /// Reads the shared expansion uniform
    pub deformed: bool,
}

impl Default for SurfaceMaterial {
    fn default() -> Self {
        Self {
            base_color: Color::WHITE,
            opacity: 1.0,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            roughness: 0.5,
            metalness: 0.0,
            glow_weight: 0.0,
            unlit: false,
            blend: BlendMode::Opaque,
            deformed: true,
        }
    }
}

impl SurfaceMaterial {
    pub fn needles() -> Self {
        Self {
            base_color: Color::from_hex(0x042818),
            roughness: 0.85,
            metalness: 0.05,
            ..Default::default()
        }
    }

    pub fn pearls() -> Self {
        Self {
            base_color: Color::from_hex(0xFFF0E0),
            emissive: Color::from_hex(0x443322),
            emissive_intensity: 0.3,
            roughness: 0.7,
            metalness: 0.1,
            ..Default::default()
        }
    }

    pub fn ribbons() -> Self {
        Self {
            base_color: Color::from_hex(0xFFDD88),
            opacity: 0.7,
            roughness: 0.2,
            metalness: 0.8,
            blend: BlendMode::Additive,
            ..Default::default()
        }
    }

    pub fn silver() -> Self {
        Self {
            base_color: Color::WHITE,
            emissive: Color::from_hex(0x222233),
            emissive_intensity: 0.5,
            roughness: 0.1,
            metalness: 1.0,
            ..Default::default()
        }
    }

    pub fn star() -> Self {
        Self {
            base_color: Color::from_hex(0xFFFDEE),
            emissive: Color::from_hex(0xFFCC66),
            emissive_intensity: 0.8,
            glow_weight: 1.0,
            roughness: 0.4,
            metalness: 0.6,
            deformed: false,
            ..Default::default()
        }
    }

    pub fn wish() -> Self {
        Self {
            base_color: Color::from_hex(0xFFD27A),
            opacity: 0.9,
            emissive: Color::from_hex(0xFFB845),
            emissive_intensity: 1.2,
            roughness: 0.3,
            metalness: 0.5,
            blend: BlendMode::Additive,
            ..Default::default()
        }
    }

    pub fn ripple() -> Self {
        Self {
            base_color: Color::from_hex(0xFFE6B0),
            unlit: true,
            blend: BlendMode::Additive,
            deformed: false,
            ..Default::default()
        }
    }

    pub fn uniforms(&self, model: Mat4) -> ObjectUniforms {
        let base = self.base_color.to_linear();
        let emissive = self.emissive.to_linear();
        ObjectUniforms {
            model: model.to_cols_array_2d(),
            base_color: [base.r, base.g, base.b, self.opacity],
            emissive: emissive.with_intensity(self.emissive_intensity),
            surface: [
                self.roughness,
                self.metalness,
                self.glow_weight,
                if self.unlit { 1.0 } else { 0.0 },
            ],
        }
    }
}

/// Geometry, instances and object uniforms of one drawable class
pub struct InstancedObject {
    label: String,
    vertex_buffer: wgpu::Buffer,
    index_buffer: wgpu::Buffer,
    index_count: u32,
    instance_buffer: wgpu::Buffer,
    instance_capacity: usize,
    instance_count: u32,
    object_buffer: wgpu::Buffer,
    object_bind_group: wgpu::BindGroup,
    material: SurfaceMaterial,
    expansion: Option<Rc<SharedExpansion>>,
}

impl InstancedObject {
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        mesh: &Mesh,
        instances: &[ExplosionInstance],
        material: SurfaceMaterial,
        object_layout: &wgpu::BindGroupLayout,
        expansion: Option<Rc<SharedExpansion>>,
    ) -> Self {
        let vertex_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Vertex Buffer")),
            contents: bytemuck::cast_slice(&mesh.vertices),
            usage: wgpu::BufferUsages::VERTEX,
        });
        let index_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Index Buffer")),
            contents: bytemuck::cast_slice(&mesh.indices),
            usage: wgpu::BufferUsages::INDEX,
        });

        let instance_capacity = instances.len().max(1);
        let instance_buffer = if instances.is_empty() {
            create_instance_buffer(device, label, instance_capacity)
        } else {
            device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some(&format!("{label} Instance Buffer")),
                contents: bytemuck::cast_slice(instances),
                usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            })
        };

        let object_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{label} Object Buffer")),
            contents: bytemuck::bytes_of(&material.uniforms(Mat4::IDENTITY)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let object_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: object_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: object_buffer.as_entire_binding(),
            }],
            label: Some(&format!("{label} Object Bind Group")),
        });

        Self {
            label: label.to_string(),
            vertex_buffer,
            index_buffer,
            index_count: mesh.indices.len() as u32,
            instance_buffer,
            instance_capacity,
            instance_count: instances.len() as u32,
            object_buffer,
            object_bind_group,
            material,
            expansion,
        }
    }

    /// Replace the instance data, growing the buffer when it no longer fits
    pub fn write_instances(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        instances: &[ExplosionInstance],
    ) {
        if instances.len() > self.instance_capacity {
            let capacity = instances.len().next_power_of_two();
            self.instance_buffer.destroy();
            self.instance_buffer = create_instance_buffer(device, &self.label, capacity);
            self.instance_capacity = capacity;
        }
        if !instances.is_empty() {
            queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(instances));
        }
        self.instance_count = instances.len() as u32;
    }

    /// Update the object transform for this frame
    pub fn write_object(&self, queue: &wgpu::Queue, model: Mat4) {
        queue.write_buffer(
            &self.object_buffer,
            0,
            bytemuck::bytes_of(&self.material.uniforms(model)),
        );
    }

    /// Record the draw; the caller has already set the matching pipeline
    pub fn draw(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.instance_count == 0 || self.index_count == 0 {
            return;
        }
        pass.set_bind_group(1, &self.object_bind_group, &[]);
        if let Some(expansion) = &self.expansion {
            pass.set_bind_group(2, expansion.bind_group(), &[]);
        }
        pass.set_vertex_buffer(0, self.vertex_buffer.slice(..));
        pass.set_vertex_buffer(1, self.instance_buffer.slice(..));
        pass.set_index_buffer(self.index_buffer.slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..self.index_count, 0, 0..self.instance_count);
    }

    /// Free every GPU buffer this object owns
    pub fn release(self) {
        self.vertex_buffer.destroy();
        self.index_buffer.destroy();
        self.instance_buffer.destroy();
        self.object_buffer.destroy();
        tracing::debug!(target: "render", label = %self.label, "released instanced object");
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn material(&self) -> &SurfaceMaterial {
        &self.material
    }

    pub fn instance_count(&self) -> u32 {
        self.instance_count
    }
}

fn create_instance_buffer(device: &wgpu::Device, label: &str, capacity: usize) -> wgpu::Buffer {
    device.create_buffer(&wgpu::BufferDescriptor {
        label: Some(&format!("{label} Instance Buffer")),
        size: (capacity * std::mem::size_of::<ExplosionInstance>()) as wgpu::BufferAddress,
        usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    })
}
