//! Explosion deformation: the shader extension every ornament material
//! composes in, and the CPU reference of the same per-vertex math.

use crate::compose::{ShaderExtension, ShaderFragment};
use glam::{Mat3, Vec3};
use tinsel_core::DeformConfig;

/// Instance buffer offsets of the explosion attributes inside `ExplosionInstance`
const DIRECTION_OFFSET: wgpu::BufferAddress = 80;
const SPEED_OFFSET: wgpu::BufferAddress = 92;
const AXIS_OFFSET: wgpu::BufferAddress = 96;

/// Name under which the extension is registered
pub const EXPLOSION_EXTENSION: &str = "explosion";

/// Tunables baked into the composed shader as constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeformParams {
    /// World distance travelled per unit of progress
    pub scale: f32,
    /// Tumble radians per unit of progress
    pub gain: f32,
    /// Progress below which no tumble is applied
    pub threshold: f32,
}

impl Default for DeformParams {
    fn default() -> Self {
        Self {
            scale: 7.0,
            gain: 2.5,
            threshold: 0.01,
        }
    }
}

impl From<&DeformConfig> for DeformParams {
    fn from(config: &DeformConfig) -> Self {
        Self {
            scale: config.scale_factor,
            gain: config.rotation_gain,
            threshold: config.rotation_threshold,
        }
    }
}

/// Rotation about an arbitrary axis (Rodrigues), laid out exactly like the
/// WGSL `rotation_matrix` helper.
pub fn rotation_matrix(axis: Vec3, angle: f32) -> Mat3 {
    let a = axis.normalize_or_zero();
    let (s, c) = angle.sin_cos();
    let oc = 1.0 - c;
    Mat3::from_cols(
        Vec3::new(oc * a.x * a.x + c, oc * a.x * a.y + a.z * s, oc * a.z * a.x - a.y * s),
        Vec3::new(oc * a.x * a.y - a.z * s, oc * a.y * a.y + c, oc * a.y * a.z + a.x * s),
        Vec3::new(oc * a.z * a.x + a.y * s, oc * a.y * a.z - a.x * s, oc * a.z * a.z + c),
    )
}

/// Displace one pivot-relative vertex position for the given expansion.
pub fn deform_point(
    params: &DeformParams,
    local: Vec3,
    direction: Vec3,
    speed: f32,
    axis: Vec3,
    expansion: f32,
) -> Vec3 {
    let progress = expansion * speed;
    let moved = local + direction * progress * params.scale;
    if progress > params.threshold {
        rotation_matrix(axis, progress * params.gain) * moved
    } else {
        moved
    }
}

/// WGSL float literal that always carries a decimal point or exponent
fn wgsl_f32(value: f32) -> String {
    format!("{value:?}")
}

/// Extension that injects the explosion/assembly deformation into the
/// surface template's vertex stage.
pub fn explosion_extension(params: &DeformParams) -> ShaderExtension {
    let bindings = "\
struct ExpansionUniform {
    value: f32,
    _pad0: f32,
    _pad1: f32,
    _pad2: f32,
};

@group(2) @binding(0)
var<uniform> expansion: ExpansionUniform;";

    let instance_inputs = "\
    @location(10) direction: vec3<f32>,
    @location(11) speed: f32,
    @location(12) rotation_axis: vec3<f32>,";

    let functions = format!(
        "\
const DEFORM_SCALE: f32 = {scale};
const DEFORM_GAIN: f32 = {gain};
const DEFORM_THRESHOLD: f32 = {threshold};

fn rotation_matrix(axis: vec3<f32>, angle: f32) -> mat3x3<f32> {{
    let a = normalize(axis);
    let s = sin(angle);
    let c = cos(angle);
    let oc = 1.0 - c;
    return mat3x3<f32>(
        vec3<f32>(oc * a.x * a.x + c, oc * a.x * a.y + a.z * s, oc * a.z * a.x - a.y * s),
        vec3<f32>(oc * a.x * a.y - a.z * s, oc * a.y * a.y + c, oc * a.y * a.z + a.x * s),
        vec3<f32>(oc * a.z * a.x + a.y * s, oc * a.y * a.z - a.x * s, oc * a.z * a.z + c)
    );
}}",
        scale = wgsl_f32(params.scale),
        gain = wgsl_f32(params.gain),
        threshold = wgsl_f32(params.threshold),
    );

    let deform = "\
    let progress = expansion.value * inst.speed;
    local_pos = local_pos + inst.direction * progress * DEFORM_SCALE;
    if (progress > DEFORM_THRESHOLD) {
        let tumble = rotation_matrix(inst.rotation_axis, progress * DEFORM_GAIN);
        local_pos = tumble * local_pos;
        local_normal = tumble * local_normal;
    }";

    ShaderExtension {
        name: EXPLOSION_EXTENSION.to_string(),
        fragments: vec![
            ShaderFragment::new("bindings", bindings),
            ShaderFragment::new("instance_inputs", instance_inputs),
            ShaderFragment::new("functions", functions),
            ShaderFragment::new("deform", deform),
        ],
        instance_attributes: vec![
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: DIRECTION_OFFSET,
                shader_location: 10,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32,
                offset: SPEED_OFFSET,
                shader_location: 11,
            },
            wgpu::VertexAttribute {
                format: wgpu::VertexFormat::Float32x3,
                offset: AXIS_OFFSET,
                shader_location: 12,
            },
        ],
        uses_expansion: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytemuck::Zeroable;
    use glam::Quat;
    use tinsel_ornaments::ExplosionInstance;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn rotation_matches_quaternion() {
        let axis = Vec3::new(0.3, 0.8, -0.5).normalize();
        for angle in [0.0, 0.4, 1.7, 3.1, -2.2] {
            let expected = Quat::from_axis_angle(axis, angle);
            let m = rotation_matrix(axis, angle);
            for v in [Vec3::X, Vec3::Y, Vec3::new(0.2, -1.5, 0.7)] {
                assert!(close(m * v, expected * v), "angle {angle}");
            }
        }
    }

    #[test]
    fn rotation_normalizes_axis() {
        let m = rotation_matrix(Vec3::new(0.0, 3.0, 0.0), 1.0);
        let expected = Quat::from_rotation_y(1.0);
        assert!(close(m * Vec3::X, expected * Vec3::X));
    }

    #[test]
    fn rest_pose_at_zero_expansion() {
        let params = DeformParams::default();
        let local = Vec3::new(0.1, 0.2, 0.3);
        let out = deform_point(&params, local, Vec3::X, 1.5, Vec3::Y, 0.0);
        assert_eq!(out, local);
    }

    #[test]
    fn small_progress_translates_without_tumble() {
        let params = DeformParams::default();
        // progress 0.005 sits below the 0.01 threshold
        let out = deform_point(&params, Vec3::ZERO, Vec3::Z, 0.5, Vec3::Y, 0.01);
        assert!(close(out, Vec3::new(0.0, 0.0, 0.005 * 7.0)));
    }

    #[test]
    fn large_progress_translates_then_tumbles() {
        let params = DeformParams::default();
        let local = Vec3::new(0.05, 0.1, 0.0);
        let direction = Vec3::new(1.0, 0.2, 0.0).normalize();
        let axis = Vec3::new(0.0, 0.6, 0.8);
        let (speed, expansion) = (1.2, 2.0);

        let progress = expansion * speed;
        let expected = Quat::from_axis_angle(axis, progress * params.gain)
            * (local + direction * progress * params.scale);
        let out = deform_point(&params, local, direction, speed, axis, expansion);
        assert!(close(out, expected));
    }

    #[test]
    fn displacement_grows_with_speed() {
        let params = DeformParams::default();
        let slow = deform_point(&params, Vec3::ZERO, Vec3::Y, 0.5, Vec3::Y, 3.0);
        let fast = deform_point(&params, Vec3::ZERO, Vec3::Y, 1.5, Vec3::Y, 3.0);
        // Tumbling about the travel direction leaves the offset unchanged
        assert!((slow.y - 10.5).abs() < 1e-4);
        assert!((fast.y - 31.5).abs() < 1e-4);
    }

    #[test]
    fn params_follow_config() {
        let config = DeformConfig {
            scale_factor: 3.0,
            rotation_gain: 1.0,
            rotation_threshold: 0.5,
        };
        let params = DeformParams::from(&config);
        assert_eq!(params, DeformParams { scale: 3.0, gain: 1.0, threshold: 0.5 });
    }

    #[test]
    fn constants_are_baked_as_float_literals() {
        let ext = explosion_extension(&DeformParams {
            scale: 3.0,
            gain: 2.5,
            threshold: 0.25,
        });
        let functions = ext
            .fragments
            .iter()
            .find(|f| f.slot == "functions")
            .unwrap();
        assert!(functions.code.contains("const DEFORM_SCALE: f32 = 3.0;"));
        assert!(functions.code.contains("const DEFORM_GAIN: f32 = 2.5;"));
        assert!(functions.code.contains("const DEFORM_THRESHOLD: f32 = 0.25;"));
        assert!(ext.uses_expansion);
    }

    #[test]
    fn attribute_offsets_match_instance_layout() {
        let ext = explosion_extension(&DeformParams::default());
        let sample = ExplosionInstance::zeroed();
        let base = &sample as *const ExplosionInstance as usize;
        let offsets = [
            &sample.direction as *const _ as usize - base,
            &sample.speed as *const _ as usize - base,
            &sample.rotation_axis as *const _ as usize - base,
        ];
        for (attr, offset) in ext.instance_attributes.iter().zip(offsets) {
            assert_eq!(attr.offset as usize, offset);
        }
        let locations: Vec<u32> = ext.instance_attributes.iter().map(|a| a.shader_location).collect();
        assert_eq!(locations, vec![10, 11, 12]);
    }
}
