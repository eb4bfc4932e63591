//! Auto-rotating orbit camera and pointer picking rays

use glam::{Mat4, Vec3, Vec4};
use std::f32::consts::PI;
use tinsel_runtime::PointerRay;

/// Camera circling the tree at a fixed distance
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    pub target: Vec3,
    pub distance: f32,
    /// Vertical field of view in degrees
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub aspect: f32,
    /// Angle around the Y axis in radians
    pub azimuth: f32,
    /// Angle from the +Y axis in radians
    pub polar: f32,
    pub min_polar: f32,
    pub max_polar: f32,
    /// Turns per minute
    pub auto_rotate_speed: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 18.0,
            fov: 45.0,
            near: 0.1,
            far: 200.0,
            aspect: 16.0 / 9.0,
            azimuth: 0.0,
            polar: PI / 2.0,
            min_polar: PI / 3.0,
            max_polar: PI / 1.8,
            auto_rotate_speed: 0.5,
        }
    }
}

impl OrbitCamera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(&self) -> Vec3 {
        let (sin_p, cos_p) = self.polar.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();
        self.target + Vec3::new(sin_p * sin_a, cos_p, sin_p * cos_a) * self.distance
    }

    /// Advance the automatic orbit
    pub fn update(&mut self, dt: f32) {
        self.azimuth += 2.0 * PI / 60.0 * self.auto_rotate_speed * dt;
        self.azimuth %= 2.0 * PI;
    }

    /// Drag-orbit, with the polar angle kept inside its clamp
    pub fn orbit(&mut self, delta_azimuth: f32, delta_polar: f32) {
        self.azimuth += delta_azimuth;
        self.polar = (self.polar + delta_polar).clamp(self.min_polar, self.max_polar);
    }

    pub fn set_aspect(&mut self, width: u32, height: u32) {
        self.aspect = width.max(1) as f32 / height.max(1) as f32;
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position(), self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view_proj(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// World-space ray through a pixel of a `width` x `height` viewport
    pub fn screen_ray(&self, px: f32, py: f32, width: f32, height: f32) -> PointerRay {
        let ndc_x = px / width.max(1.0) * 2.0 - 1.0;
        let ndc_y = 1.0 - py / height.max(1.0) * 2.0;

        let inverse = self.view_proj().inverse();
        let near = inverse * Vec4::new(ndc_x, ndc_y, 0.0, 1.0);
        let far = inverse * Vec4::new(ndc_x, ndc_y, 1.0, 1.0);
        let near = near.truncate() / near.w;
        let far = far.truncate() / far.w;

        PointerRay::new(self.position(), far - near)
    }
}
