//! Surface pipeline setup for composed shader variants

use crate::compose::ComposedShader;
use crate::context::RenderError;
use crate::expansion_uniform::SharedExpansion;
use crate::primitives::Vertex;
use bytemuck::{Pod, Zeroable};
use tinsel_ornaments::ExplosionInstance;

/// Base per-instance attributes every variant reads: model matrix columns
/// and tint. Extensions append theirs after these.
const BASE_INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 5] = wgpu::vertex_attr_array![
    4 => Float32x4,
    5 => Float32x4,
    6 => Float32x4,
    7 => Float32x4,
    8 => Float32x4,
];

/// Per-frame uniforms (bind group 0)
#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
pub struct FrameUniforms {
    pub view_proj: [[f32; 4]; 4],
    pub camera_pos: [f32; 4],
    pub fog: [f32; 4],
    pub ambient: [f32; 4],
    pub main_dir: [f32; 4],
    pub main_color: [f32; 4],
    pub rim_pos: [f32; 4],
    pub rim_color: [f32; 4],
    pub bottom_pos: [f32; 4],
    pub bottom_color: [f32; 4],
    /// exposure, bloom, star glow, seconds
    pub tone: [f32; 4],
}

/// Per-object uniforms (bind group 1)
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ObjectUniforms {
    pub model: [[f32; 4]; 4],
    pub base_color: [f32; 4],
    pub emissive: [f32; 4],
    /// roughness, metalness, star glow weight, unlit flag
    pub surface: [f32; 4],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlendMode {
    /// Depth-writing, no blending
    Opaque,
    /// SrcAlpha + One, depth test only
    Additive,
}

impl BlendMode {
    fn blend_state(self) -> Option<wgpu::BlendState> {
        match self {
            BlendMode::Opaque => Some(wgpu::BlendState::REPLACE),
            BlendMode::Additive => Some(wgpu::BlendState {
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
            }),
        }
    }

    fn writes_depth(self) -> bool {
        matches!(self, BlendMode::Opaque)
    }
}

/// Bind group layouts shared by every surface variant
pub struct SurfaceLayouts {
    pub frame: wgpu::BindGroupLayout,
    pub object: wgpu::BindGroupLayout,
}

impl SurfaceLayouts {
    pub fn new(device: &wgpu::Device) -> Self {
        let uniform_entry = |visibility| wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        };

        let frame = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
            label: Some("Frame Bind Group Layout"),
        });
        let object = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[uniform_entry(wgpu::ShaderStages::VERTEX_FRAGMENT)],
            label: Some("Object Bind Group Layout"),
        });

        Self { frame, object }
    }
}

/// Instance buffer layout for a composed variant
pub fn instance_attributes(shader: &ComposedShader) -> Vec<wgpu::VertexAttribute> {
    BASE_INSTANCE_ATTRIBUTES
        .iter()
        .chain(shader.instance_attributes.iter())
        .copied()
        .collect()
}

/// One compiled surface variant
pub struct SurfacePipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub blend: BlendMode,
    pub deformed: bool,
}

impl SurfacePipeline {
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        layouts: &SurfaceLayouts,
        shader: &ComposedShader,
        blend: BlendMode,
        expansion: Option<&SharedExpansion>,
        label: &str,
    ) -> Result<Self, RenderError> {
        let expansion_layout = match (shader.uses_expansion, expansion) {
            (true, Some(shared)) => Some(shared.layout()),
            (true, None) => return Err(RenderError::MissingExpansion(label.to_string())),
            (false, _) => None,
        };

        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(shader.source.as_str().into()),
        });

        let mut bind_group_layouts = vec![&layouts.frame, &layouts.object];
        if let Some(layout) = expansion_layout {
            bind_group_layouts.push(layout);
        }

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(label),
            bind_group_layouts: &bind_group_layouts,
            push_constant_ranges: &[],
        });

        let attributes = instance_attributes(shader);
        let instance_layout = wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<ExplosionInstance>() as wgpu::BufferAddress,
            step_mode: wgpu::VertexStepMode::Instance,
            attributes: &attributes,
        };

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some("vs_main"),
                buffers: &[Vertex::desc(), instance_layout],
                compilation_options: Default::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format,
                    blend: blend.blend_state(),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: Default::default(),
            }),
            // Ornaments are thin and tumble, so both faces are shaded
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },
            depth_stencil: Some(wgpu::DepthStencilState {
                format: wgpu::TextureFormat::Depth32Float,
                depth_write_enabled: blend.writes_depth(),
                depth_compare: wgpu::CompareFunction::Less,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState::default(),
            multiview: None,
            cache: None,
        });

        tracing::debug!(
            target: "render",
            label,
            extensions = ?shader.extensions,
            ?blend,
            "built surface pipeline"
        );

        Ok(Self {
            pipeline,
            blend,
            deformed: shader.uses_expansion,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compose::compose;
    use crate::deform::{explosion_extension, DeformParams};

    #[test]
    fn uniform_sizes_are_vec4_aligned() {
        assert_eq!(std::mem::size_of::<FrameUniforms>(), 64 + 10 * 16);
        assert_eq!(std::mem::size_of::<ObjectUniforms>(), 112);
    }

    #[test]
    fn base_attributes_cover_model_and_tint() {
        let offsets: Vec<u64> = BASE_INSTANCE_ATTRIBUTES.iter().map(|a| a.offset).collect();
        assert_eq!(offsets, vec![0, 16, 32, 48, 64]);
    }

    #[test]
    fn deformed_variant_appends_explosion_attributes() {
        let composed = compose(
            crate::SURFACE_TEMPLATE,
            &[explosion_extension(&DeformParams::default())],
        )
        .unwrap();
        let attributes = instance_attributes(&composed);
        assert_eq!(attributes.len(), 8);
        let stride = std::mem::size_of::<ExplosionInstance>() as u64;
        for attr in &attributes {
            assert!(attr.offset + attr.format.size() <= stride);
        }

        let plain = compose(crate::SURFACE_TEMPLATE, &[]).unwrap();
        assert_eq!(instance_attributes(&plain).len(), 5);
    }

    #[test]
    fn only_opaque_writes_depth() {
        assert!(BlendMode::Opaque.writes_depth());
        assert!(!BlendMode::Additive.writes_depth());
    }
}
