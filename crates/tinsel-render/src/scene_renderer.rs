//! Scene renderer: uploads the tree once, mirrors the wish slot and
//! draws every instanced object with the shared expansion bound.

use crate::camera::OrbitCamera;
use crate::compose::compose;
use crate::context::{RenderContext, RenderError};
use crate::deform::{explosion_extension, DeformParams};
use crate::expansion_uniform::SharedExpansion;
use crate::instanced::{InstancedObject, SurfaceMaterial};
use crate::pipeline::{BlendMode, FrameUniforms, SurfaceLayouts, SurfacePipeline};
use crate::primitives::{
    create_box_mesh, create_cone_mesh, create_octahedron_mesh, create_ring_mesh,
    create_sphere_mesh, create_star_mesh, Mesh, StarShape,
};
use crate::SURFACE_TEMPLATE;
use glam::{Mat4, Vec3};
use std::collections::HashMap;
use std::rc::Rc;
use tinsel_core::{Color, Transform};
use tinsel_ornaments::{ExplosionInstance, TreeOrnaments, WishSlot};
use tinsel_runtime::{ExpansionHandle, FrameSnapshot, LightingPreset, RippleView};
use wgpu::util::DeviceExt;

const WHITE_TINT: [f32; 4] = [1.0, 1.0, 1.0, 1.0];

/// Fixed light placement and colors; intensities come from the light rig
#[derive(Debug, Clone, Copy)]
pub struct SceneLights {
    pub ambient: Color,
    pub main_color: Color,
    /// Position the main directional light shines from
    pub main_from: Vec3,
    pub rim_color: Color,
    pub rim_position: Vec3,
    pub bottom_color: Color,
    pub bottom_position: Vec3,
    pub bottom_range: f32,
    /// Bottom fill at full main intensity
    pub bottom_intensity: f32,
    pub fog_color: Color,
    pub fog_density: f32,
}

impl Default for SceneLights {
    fn default() -> Self {
        Self {
            ambient: Color::from_hex(0x112211),
            main_color: Color::from_hex(0xFFDDAA),
            main_from: Vec3::new(6.0, 8.0, 8.0),
            rim_color: Color::from_hex(0x6688AA),
            rim_position: Vec3::new(-10.0, 5.0, -5.0),
            bottom_color: Color::from_hex(0xAA8866),
            bottom_position: Vec3::new(0.0, -6.0, 2.0),
            bottom_range: 10.0,
            bottom_intensity: 1.5,
            fog_color: Color::from_hex(0x030504),
            fog_density: 0.02,
        }
    }
}

impl SceneLights {
    /// Pack camera, light levels and tone settings for the frame uniform
    pub fn frame_uniforms(&self, view_proj: Mat4, camera_pos: Vec3, levels: &LightingPreset, seconds: f32) -> FrameUniforms {
        let linear = |c: Color| c.to_linear();
        let fog = linear(self.fog_color);
        let bottom = self.bottom_intensity * levels.main / LightingPreset::lit().main;

        FrameUniforms {
            view_proj: view_proj.to_cols_array_2d(),
            camera_pos: camera_pos.extend(1.0).to_array(),
            fog: [fog.r, fog.g, fog.b, self.fog_density],
            ambient: linear(self.ambient).with_intensity(levels.ambient),
            main_dir: self.main_from.normalize_or_zero().extend(0.0).to_array(),
            main_color: linear(self.main_color).with_intensity(levels.main),
            rim_pos: self.rim_position.extend(0.0).to_array(),
            rim_color: linear(self.rim_color).with_intensity(levels.rim),
            bottom_pos: self.bottom_position.extend(self.bottom_range).to_array(),
            bottom_color: linear(self.bottom_color).with_intensity(bottom),
            tone: [levels.exposure, levels.bloom, levels.star_glow, seconds],
        }
    }

    pub fn clear_color(&self) -> wgpu::Color {
        let c = self.fog_color.to_linear();
        wgpu::Color {
            r: c.r as f64,
            g: c.g as f64,
            b: c.b as f64,
            a: 1.0,
        }
    }
}

/// Ring instances for the live ripples, each turned to face the camera
pub fn ripple_instances(ripples: &[RippleView], camera_pos: Vec3) -> Vec<ExplosionInstance> {
    ripples
        .iter()
        .map(|ripple| {
            let transform = Transform::from_position(ripple.center)
                .with_rotation(Transform::looking_at(ripple.center, camera_pos, Vec3::Y))
                .with_uniform_scale(ripple.radius);
            ExplosionInstance::fixed(&transform, [1.0, 1.0, 1.0, ripple.alpha])
        })
        .collect()
}

pub struct SceneRenderer {
    layouts: SurfaceLayouts,
    pipelines: HashMap<(BlendMode, bool), SurfacePipeline>,
    expansion: Rc<SharedExpansion>,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    lights: SceneLights,
    needles: InstancedObject,
    pearls: InstancedObject,
    ribbons: InstancedObject,
    silver: InstancedObject,
    star: InstancedObject,
    ripples: InstancedObject,
    wish: Option<InstancedObject>,
    wish_generation: u64,
    wish_mesh: Mesh,
}

impl SceneRenderer {
    pub fn new(
        ctx: &RenderContext,
        ornaments: &TreeOrnaments,
        expansion: ExpansionHandle,
        deform: &DeformParams,
    ) -> Result<Self, RenderError> {
        let device = &ctx.device;
        let layouts = SurfaceLayouts::new(device);
        let shared = SharedExpansion::new(device, expansion);

        let deformed_shader = compose(SURFACE_TEMPLATE, &[explosion_extension(deform)])?;
        let static_shader = compose(SURFACE_TEMPLATE, &[])?;

        let mut pipelines = HashMap::new();
        for blend in [BlendMode::Opaque, BlendMode::Additive] {
            pipelines.insert(
                (blend, true),
                SurfacePipeline::new(
                    device,
                    ctx.format(),
                    &layouts,
                    &deformed_shader,
                    blend,
                    Some(&shared),
                    &format!("Deformed {blend:?} Pipeline"),
                )?,
            );
            pipelines.insert(
                (blend, false),
                SurfacePipeline::new(
                    device,
                    ctx.format(),
                    &layouts,
                    &static_shader,
                    blend,
                    None,
                    &format!("Static {blend:?} Pipeline"),
                )?,
            );
        }

        let lights = SceneLights::default();
        let frame_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Frame Uniform Buffer"),
            contents: bytemuck::bytes_of(&lights.frame_uniforms(
                Mat4::IDENTITY,
                Vec3::ZERO,
                &LightingPreset::unlit(),
                0.0,
            )),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layouts.frame,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
            label: Some("Frame Bind Group"),
        });

        let ornament = |label: &str, mesh: Mesh, class: &tinsel_ornaments::InstanceClass, material| {
            InstancedObject::new(
                device,
                label,
                &mesh,
                &class.pack(WHITE_TINT),
                material,
                &layouts.object,
                Some(shared.clone()),
            )
        };
        let needles = ornament(
            "Needles",
            create_cone_mesh(0.06, 0.25, 3),
            &ornaments.needles,
            SurfaceMaterial::needles(),
        );
        let pearls = ornament(
            "Pearls",
            create_sphere_mesh(0.12, 32, 32),
            &ornaments.pearls,
            SurfaceMaterial::pearls(),
        );
        let ribbons = ornament(
            "Ribbons",
            create_box_mesh(0.12, 0.02, 0.3),
            &ornaments.ribbons,
            SurfaceMaterial::ribbons(),
        );
        let silver = ornament(
            "Silver",
            create_octahedron_mesh(0.06),
            &ornaments.silver,
            SurfaceMaterial::silver(),
        );

        let star = InstancedObject::new(
            device,
            "Star",
            &create_star_mesh(&StarShape::default()),
            &[ExplosionInstance::fixed(&Transform::IDENTITY, WHITE_TINT)],
            SurfaceMaterial::star(),
            &layouts.object,
            None,
        );
        let ripples = InstancedObject::new(
            device,
            "Ripples",
            &create_ring_mesh(0.85, 1.0, 48),
            &[],
            SurfaceMaterial::ripple(),
            &layouts.object,
            None,
        );

        tracing::info!(
            target: "render",
            instances = ornaments.total(),
            "uploaded tree ornaments"
        );

        Ok(Self {
            layouts,
            pipelines,
            expansion: shared,
            frame_buffer,
            frame_bind_group,
            lights,
            needles,
            pearls,
            ribbons,
            silver,
            star,
            ripples,
            wish: None,
            wish_generation: 0,
            wish_mesh: create_octahedron_mesh(0.04),
        })
    }

    /// Rebuild the wish object when the slot holds a newer set. The old
    /// buffers are destroyed before the new ones are created.
    pub fn sync_wish(&mut self, device: &wgpu::Device, slot: &WishSlot) {
        if slot.generation() == self.wish_generation {
            return;
        }
        if let Some(previous) = self.wish.take() {
            previous.release();
        }
        self.wish = slot.current().map(|class| {
            tracing::info!(target: "render", particles = class.len(), "uploading wish particles");
            InstancedObject::new(
                device,
                "Wish",
                &self.wish_mesh,
                &class.pack(WHITE_TINT),
                SurfaceMaterial::wish(),
                &self.layouts.object,
                Some(self.expansion.clone()),
            )
        });
        self.wish_generation = slot.generation();
    }

    fn objects(&self) -> impl Iterator<Item = &InstancedObject> {
        [
            Some(&self.needles),
            Some(&self.pearls),
            Some(&self.silver),
            Some(&self.star),
            Some(&self.ribbons),
            self.wish.as_ref(),
            Some(&self.ripples),
        ]
        .into_iter()
        .flatten()
    }

    /// Draw one frame
    pub fn render(
        &mut self,
        ctx: &mut RenderContext,
        camera: &OrbitCamera,
        frame: &FrameSnapshot,
        wish: &WishSlot,
    ) -> Result<(), RenderError> {
        self.sync_wish(&ctx.device, wish);

        let Some(output) = ctx.acquire()? else {
            return Ok(());
        };
        let view = output
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        let camera_pos = camera.position();
        ctx.queue.write_buffer(
            &self.frame_buffer,
            0,
            bytemuck::bytes_of(&self.lights.frame_uniforms(
                camera.view_proj(),
                camera_pos,
                &frame.lights,
                frame.seconds,
            )),
        );
        self.expansion.write(&ctx.queue);

        let pose = &frame.pose;
        self.needles.write_object(&ctx.queue, pose.tree);
        self.pearls.write_object(&ctx.queue, pose.tree);
        self.silver.write_object(&ctx.queue, pose.tree);
        self.ribbons.write_object(&ctx.queue, pose.ribbons);
        self.star.write_object(&ctx.queue, pose.star);
        if let Some(wish) = &self.wish {
            wish.write_object(&ctx.queue, Mat4::IDENTITY);
        }
        self.ripples.write_object(&ctx.queue, Mat4::IDENTITY);
        self.ripples.write_instances(
            &ctx.device,
            &ctx.queue,
            &ripple_instances(&frame.ripples, camera_pos),
        );

        let mut encoder = ctx
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Scene Encoder"),
            });

        {
            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("Scene Pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(self.lights.clear_color()),
                        store: wgpu::StoreOp::Store,
                    },
                })],
                depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                    view: &ctx.depth_view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(1.0),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                }),
                timestamp_writes: None,
                occlusion_query_set: None,
            });

            pass.set_bind_group(0, &self.frame_bind_group, &[]);

            // Opaque first so additive layers depth-test against it
            for blend in [BlendMode::Opaque, BlendMode::Additive] {
                for object in self.objects().filter(|o| o.material().blend == blend) {
                    let key = (blend, object.material().deformed);
                    if let Some(surface) = self.pipelines.get(&key) {
                        pass.set_pipeline(&surface.pipeline);
                        object.draw(&mut pass);
                    }
                }
            }
        }

        ctx.queue.submit(std::iter::once(encoder.finish()));
        output.present();
        Ok(())
    }
}
