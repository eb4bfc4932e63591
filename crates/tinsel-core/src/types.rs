//! Spatial and color types

use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};

/// A rest pose: position, rotation and scale of one instance at expansion 0
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform {
    pub position: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    pub const IDENTITY: Self = Self {
        position: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    pub fn from_position(position: Vec3) -> Self {
        Self {
            position,
            ..Self::IDENTITY
        }
    }

    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.rotation = rotation;
        self
    }

    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_uniform_scale(self, scale: f32) -> Self {
        self.with_scale(Vec3::splat(scale))
    }

    /// Scale, then rotate, then translate
    pub fn to_matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.position)
    }

    /// Column-major matrix ready for GPU upload
    pub fn to_cols(&self) -> [[f32; 4]; 4] {
        self.to_matrix().to_cols_array_2d()
    }

    /// Rotation that points local +Z at `target`, keeping `up` as the reference up
    /// axis. Mirrors the object (not camera) look-at convention.
    pub fn looking_at(position: Vec3, target: Vec3, up: Vec3) -> Quat {
        let forward = (target - position).normalize_or_zero();
        if forward == Vec3::ZERO {
            return Quat::IDENTITY;
        }
        let mut right = up.cross(forward);
        if right.length_squared() < 1e-12 {
            // Looking straight along `up`
            right = Vec3::X.cross(forward);
        }
        let right = right.normalize();
        let true_up = forward.cross(right);
        Quat::from_mat3(&glam::Mat3::from_cols(right, true_up, forward))
    }
}

/// RGBA color
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self {
        r: 1.0,
        g: 1.0,
        b: 1.0,
        a: 1.0,
    };
    pub const BLACK: Self = Self {
        r: 0.0,
        g: 0.0,
        b: 0.0,
        a: 1.0,
    };

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xFF) as f32 / 255.0,
            g: ((hex >> 8) & 0xFF) as f32 / 255.0,
            b: (hex & 0xFF) as f32 / 255.0,
            a: 1.0,
        }
    }

    pub fn with_alpha(mut self, a: f32) -> Self {
        self.a = a;
        self
    }

    pub fn to_array(&self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Convert sRGB-encoded components (as written in hex) to linear light.
    /// Alpha is left untouched.
    pub fn to_linear(&self) -> Self {
        fn decode(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Self::new(decode(self.r), decode(self.g), decode(self.b), self.a)
    }

    /// RGB packed with an intensity in the alpha slot
    pub fn with_intensity(&self, intensity: f32) -> [f32; 4] {
        [self.r, self.g, self.b, intensity]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transform_default() {
        let t = Transform::default();
        assert_eq!(t.position, Vec3::ZERO);
        assert_eq!(t.rotation, Quat::IDENTITY);
        assert_eq!(t.scale, Vec3::ONE);
    }

    #[test]
    fn test_transform_matrix_translation() {
        let t = Transform::from_position(Vec3::new(1.0, 2.0, 3.0)).with_uniform_scale(2.0);
        let m = t.to_cols();
        assert_eq!(m[3], [1.0, 2.0, 3.0, 1.0]);
        assert!((m[0][0] - 2.0).abs() < 1e-6);
    }

    #[test]
    fn test_looking_at_points_z_at_target() {
        let position = Vec3::new(3.0, 1.0, 0.0);
        let q = Transform::looking_at(position, Vec3::new(0.0, 1.0, 0.0), Vec3::Y);
        let forward = q * Vec3::Z;
        assert!((forward - Vec3::NEG_X).length() < 1e-5);
    }

    #[test]
    fn test_looking_at_degenerate_target() {
        let q = Transform::looking_at(Vec3::ONE, Vec3::ONE, Vec3::Y);
        assert_eq!(q, Quat::IDENTITY);
    }

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xFF8844);
        assert!((c.r - 1.0).abs() < 0.01);
        assert!((c.g - 0.533).abs() < 0.01);
        assert!((c.b - 0.267).abs() < 0.01);
    }

    #[test]
    fn test_color_to_linear() {
        let white = Color::WHITE.to_linear();
        assert!((white.r - 1.0).abs() < 1e-6);
        let mid = Color::from_hex(0x808080).with_alpha(0.5).to_linear();
        assert!((mid.g - 0.2159).abs() < 1e-3);
        assert_eq!(mid.a, 0.5);
        assert_eq!(Color::BLACK.to_linear().r, 0.0);
    }
}
