//! Pointer rays and the hit tests the scene needs

use glam::Vec3;

/// World-space ray cast from the camera through the cursor
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerRay {
    pub origin: Vec3,
    /// Unit length
    pub direction: Vec3,
}

impl PointerRay {
    /// Build a ray, normalizing the direction. A zero direction falls back to -Z.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self {
            origin,
            direction: direction.try_normalize().unwrap_or(Vec3::NEG_Z),
        }
    }

    pub fn at(&self, t: f32) -> Vec3 {
        self.origin + self.direction * t
    }
}

/// Distance along the ray to the nearest front-facing sphere hit
pub fn ray_hits_sphere(ray: &PointerRay, center: Vec3, radius: f32) -> Option<f32> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let discriminant = b * b - c;
    if discriminant < 0.0 {
        return None;
    }
    let root = discriminant.sqrt();
    let near = -b - root;
    if near >= 0.0 {
        return Some(near);
    }
    // Origin inside the sphere
    let far = -b + root;
    (far >= 0.0).then_some(far)
}

/// Point where the ray crosses the z = 0 plane, if it does so in front of the origin
pub fn ray_plane_z0(ray: &PointerRay) -> Option<Vec3> {
    if ray.direction.z.abs() < 1e-6 {
        return None;
    }
    let t = -ray.origin.z / ray.direction.z;
    (t >= 0.0).then(|| ray.at(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn straight_ray_hits_sphere() {
        let ray = PointerRay::new(Vec3::new(0.0, 0.0, 18.0), Vec3::NEG_Z);
        let t = ray_hits_sphere(&ray, Vec3::ZERO, 1.0).unwrap();
        assert!((t - 17.0).abs() < 1e-5);
    }

    #[test]
    fn offset_ray_misses_sphere() {
        let ray = PointerRay::new(Vec3::new(2.0, 0.0, 18.0), Vec3::NEG_Z);
        assert!(ray_hits_sphere(&ray, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn sphere_behind_origin_is_missed() {
        let ray = PointerRay::new(Vec3::new(0.0, 0.0, 18.0), Vec3::Z);
        assert!(ray_hits_sphere(&ray, Vec3::ZERO, 1.0).is_none());
    }

    #[test]
    fn origin_inside_sphere_hits_far_side() {
        let ray = PointerRay::new(Vec3::ZERO, Vec3::X);
        let t = ray_hits_sphere(&ray, Vec3::ZERO, 2.0).unwrap();
        assert!((t - 2.0).abs() < 1e-5);
    }

    #[test]
    fn plane_intersection() {
        let ray = PointerRay::new(Vec3::new(1.0, 2.0, 10.0), Vec3::new(0.0, -0.1, -1.0));
        let hit = ray_plane_z0(&ray).unwrap();
        assert!(hit.z.abs() < 1e-5);
        assert!((hit.y - 1.0).abs() < 1e-4);
        assert!((hit.x - 1.0).abs() < 1e-5);
    }

    #[test]
    fn parallel_ray_misses_plane() {
        let ray = PointerRay::new(Vec3::new(0.0, 0.0, 5.0), Vec3::X);
        assert!(ray_plane_z0(&ray).is_none());
    }

    #[test]
    fn direction_is_normalized() {
        let ray = PointerRay::new(Vec3::ZERO, Vec3::new(0.0, 3.0, 4.0));
        assert!((ray.direction.length() - 1.0).abs() < 1e-6);
        assert_eq!(PointerRay::new(Vec3::ZERO, Vec3::ZERO).direction, Vec3::NEG_Z);
    }
}
