//! Instance classes: rest poses plus the per-instance explosion attributes,
//! and the packed GPU instance layout.

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use tinsel_core::Transform;

/// Per-instance explosion parameters, stored as parallel arrays
#[derive(Debug, Clone, Default)]
pub struct ExplosionAttributes {
    directions: Vec<Vec3>,
    speeds: Vec<f32>,
    axes: Vec<Vec3>,
}

impl ExplosionAttributes {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            directions: Vec::with_capacity(capacity),
            speeds: Vec::with_capacity(capacity),
            axes: Vec::with_capacity(capacity),
        }
    }

    fn push(&mut self, direction: Vec3, speed: f32, axis: Vec3) {
        self.directions.push(direction);
        self.speeds.push(speed);
        self.axes.push(axis);
    }

    pub fn len(&self) -> usize {
        self.directions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.directions.is_empty()
    }

    /// Radial travel direction per instance
    pub fn directions(&self) -> &[Vec3] {
        &self.directions
    }

    /// Progress multiplier per instance
    pub fn speeds(&self) -> &[f32] {
        &self.speeds
    }

    /// Tumble axis per instance
    pub fn axes(&self) -> &[Vec3] {
        &self.axes
    }
}

/// Borrowed view of one instance
#[derive(Debug, Clone, Copy)]
pub struct InstanceView<'a> {
    pub transform: &'a Transform,
    pub direction: Vec3,
    pub speed: f32,
    pub axis: Vec3,
}

/// A homogeneous group of instances sharing geometry and material
#[derive(Debug, Clone)]
pub struct InstanceClass {
    name: String,
    transforms: Vec<Transform>,
    attributes: ExplosionAttributes,
}

impl InstanceClass {
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_capacity(name, 0)
    }

    pub fn with_capacity(name: impl Into<String>, capacity: usize) -> Self {
        Self {
            name: name.into(),
            transforms: Vec::with_capacity(capacity),
            attributes: ExplosionAttributes::with_capacity(capacity),
        }
    }

    /// Append one instance. The only way to grow a class, so the four arrays
    /// always stay the same length.
    pub fn push(&mut self, transform: Transform, direction: Vec3, speed: f32, axis: Vec3) {
        debug_assert!(speed > 0.0, "explosion speed must be positive, got {speed}");
        self.transforms.push(transform);
        self.attributes.push(direction, speed, axis);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    pub fn attributes(&self) -> &ExplosionAttributes {
        &self.attributes
    }

    pub fn instance(&self, index: usize) -> Option<InstanceView<'_>> {
        let transform = self.transforms.get(index)?;
        Some(InstanceView {
            transform,
            direction: self.attributes.directions[index],
            speed: self.attributes.speeds[index],
            axis: self.attributes.axes[index],
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = InstanceView<'_>> + '_ {
        (0..self.len()).filter_map(move |i| self.instance(i))
    }

    /// Pack every instance for GPU upload
    pub fn pack(&self, tint: [f32; 4]) -> Vec<ExplosionInstance> {
        self.iter()
            .map(|view| {
                ExplosionInstance::new(view.transform, view.direction, view.speed, view.axis, tint)
            })
            .collect()
    }
}

/// GPU instance data, matching the WGSL `InstanceInput` locations.
/// 112 bytes: model matrix columns, tint, direction + speed, axis + pad.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct ExplosionInstance {
    pub model: [[f32; 4]; 4],
    pub tint: [f32; 4],
    pub direction: [f32; 3],
    pub speed: f32,
    pub rotation_axis: [f32; 3],
    pub _pad: f32,
}

impl ExplosionInstance {
    pub fn new(transform: &Transform, direction: Vec3, speed: f32, axis: Vec3, tint: [f32; 4]) -> Self {
        Self {
            model: transform.to_cols(),
            tint,
            direction: direction.to_array(),
            speed,
            rotation_axis: axis.to_array(),
            _pad: 0.0,
        }
    }

    /// An instance that never moves with expansion (star, ripples)
    pub fn fixed(transform: &Transform, tint: [f32; 4]) -> Self {
        Self::new(transform, Vec3::ZERO, 0.0, Vec3::Y, tint)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_keeps_arrays_parallel() {
        let mut class = InstanceClass::with_capacity("test", 3);
        for i in 0..3 {
            class.push(
                Transform::from_position(Vec3::new(i as f32, 0.0, 0.0)),
                Vec3::X,
                0.5,
                Vec3::Y,
            );
        }
        assert_eq!(class.len(), 3);
        assert_eq!(class.attributes().len(), 3);
        assert_eq!(class.attributes().directions().len(), 3);
        assert_eq!(class.attributes().speeds().len(), 3);
        assert_eq!(class.attributes().axes().len(), 3);
        assert!(class.instance(3).is_none());
        assert_eq!(class.instance(2).unwrap().transform.position.x, 2.0);
    }

    #[test]
    fn pack_copies_attributes() {
        let mut class = InstanceClass::new("pack");
        class.push(Transform::from_position(Vec3::new(1.0, 2.0, 3.0)), Vec3::Z, 1.25, Vec3::X);
        let packed = class.pack([1.0, 0.5, 0.25, 1.0]);
        assert_eq!(packed.len(), 1);
        assert_eq!(packed[0].model[3], [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(packed[0].direction, [0.0, 0.0, 1.0]);
        assert_eq!(packed[0].speed, 1.25);
        assert_eq!(packed[0].rotation_axis, [1.0, 0.0, 0.0]);
        assert_eq!(packed[0].tint, [1.0, 0.5, 0.25, 1.0]);
    }

    #[test]
    fn fixed_instance_has_zero_speed() {
        let instance = ExplosionInstance::fixed(&Transform::IDENTITY, [1.0; 4]);
        assert_eq!(instance.speed, 0.0);
        assert_eq!(instance.direction, [0.0; 3]);
    }

    #[test]
    fn explosion_instance_layout() {
        assert_eq!(std::mem::size_of::<ExplosionInstance>(), 112);
        assert_eq!(std::mem::align_of::<ExplosionInstance>(), 4);
    }
}
