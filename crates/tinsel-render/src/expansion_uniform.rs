//! The one GPU copy of the expansion scalar, bound at group 2 by every
//! deformed material.

use bytemuck::{Pod, Zeroable};
use std::cell::Cell;
use std::rc::Rc;
use tinsel_runtime::ExpansionHandle;
use wgpu::util::DeviceExt;

/// Matches WGSL `ExpansionUniform` (16 bytes)
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct ExpansionUniform {
    pub value: f32,
    pub _pad: [f32; 3],
}

impl ExpansionUniform {
    pub fn new(value: f32) -> Self {
        Self {
            value,
            _pad: [0.0; 3],
        }
    }
}

/// Shared expansion binding. Materials hold it by `Rc`, so a single
/// `write` per frame updates every deformed draw at once.
pub struct SharedExpansion {
    buffer: wgpu::Buffer,
    layout: wgpu::BindGroupLayout,
    bind_group: wgpu::BindGroup,
    handle: ExpansionHandle,
    uploaded: Cell<f32>,
}

impl SharedExpansion {
    pub fn new(device: &wgpu::Device, handle: ExpansionHandle) -> Rc<Self> {
        let initial = handle.get();
        let buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Expansion Uniform Buffer"),
            contents: bytemuck::bytes_of(&ExpansionUniform::new(initial)),
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
        });

        let layout = Self::create_layout(device);

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            layout: &layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: buffer.as_entire_binding(),
            }],
            label: Some("Expansion Bind Group"),
        });

        Rc::new(Self {
            buffer,
            layout,
            bind_group,
            handle,
            uploaded: Cell::new(initial),
        })
    }

    fn create_layout(device: &wgpu::Device) -> wgpu::BindGroupLayout {
        device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            entries: &[wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::VERTEX,
                ty: wgpu::BindingType::Buffer {
                    ty: wgpu::BufferBindingType::Uniform,
                    has_dynamic_offset: false,
                    min_binding_size: None,
                },
                count: None,
            }],
            label: Some("Expansion Bind Group Layout"),
        })
    }

    /// Copy the register's current value into the uniform. Call once per
    /// frame before the pass is encoded.
    pub fn write(&self, queue: &wgpu::Queue) -> f32 {
        let value = self.handle.get();
        queue.write_buffer(&self.buffer, 0, bytemuck::bytes_of(&ExpansionUniform::new(value)));
        self.uploaded.set(value);
        value
    }

    /// Value most recently uploaded
    pub fn uploaded(&self) -> f32 {
        self.uploaded.get()
    }

    pub fn layout(&self) -> &wgpu::BindGroupLayout {
        &self.layout
    }

    pub fn bind_group(&self) -> &wgpu::BindGroup {
        &self.bind_group
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_is_sixteen_bytes() {
        assert_eq!(std::mem::size_of::<ExpansionUniform>(), 16);
        let uniform = ExpansionUniform::new(2.5);
        let bytes = bytemuck::bytes_of(&uniform);
        assert_eq!(&bytes[0..4], &2.5f32.to_ne_bytes());
    }
}
