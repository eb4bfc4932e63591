//! Shape profiles: everything that distinguishes one ornament class's
//! placement and explosion parameters from another's.

use crate::sampler::Interval;
use glam::Vec3;
use std::f32::consts::FRAC_PI_2;

/// Height of the cone apex used by every stock taper
pub const APEX_HEIGHT: f32 = 11.5;

/// Radius envelope narrowing linearly with height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Taper {
    pub base_radius: f32,
    pub apex_height: f32,
    /// Constant added after tapering, keeps a thin trunk near the apex
    pub floor: f32,
}

impl Taper {
    pub const fn new(base_radius: f32, apex_height: f32, floor: f32) -> Self {
        Self {
            base_radius,
            apex_height,
            floor,
        }
    }

    pub fn radius_at(&self, y: f32) -> f32 {
        self.base_radius * (1.0 - y / self.apex_height) + self.floor
    }
}

/// How heights are drawn for scattered classes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerticalDistribution {
    /// `u^exponent`; above 1.0 packs instances toward the base
    pub exponent: f32,
    pub span: f32,
}

impl VerticalDistribution {
    pub const fn uniform(span: f32) -> Self {
        Self {
            exponent: 1.0,
            span,
        }
    }

    pub const fn power_law(exponent: f32, span: f32) -> Self {
        Self { exponent, span }
    }

    /// Map a uniform `u` in [0, 1) to a height in [0, span)
    pub fn height(&self, u: f32) -> f32 {
        u.powf(self.exponent) * self.span
    }
}

/// Where instances go around the trunk
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Placement {
    /// Random height and angle; radius is the taper times a random factor
    Scattered {
        vertical: VerticalDistribution,
        jitter: Interval,
    },
    /// Deterministic coil: instance `i` of `n` sits at `t = i/n` along it
    Helix {
        turns: f32,
        height_span: f32,
        /// Full width of the x/z positional noise
        jitter: f32,
    },
}

/// Rest rotation policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Orientation {
    Upright,
    /// Face the trunk axis at the instance's height, then tilt about local X
    FaceAxis { tilt: f32 },
    /// Face a point slightly ahead and above along the coil
    AlongHelix { lead_angle: f32, rise: f32 },
    /// Independent random Euler angles in [0, max_angle)
    Tumbled { max_angle: f32 },
}

/// Rest scale policy
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScalePolicy {
    Uniform(Interval),
    /// Unit x/y, random stretch along local z
    StretchZ(Interval),
}

/// Explosion direction: normalize `(position - center) * (1, vertical_scale, 1)`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionPolicy {
    pub center: Vec3,
    /// Below 1.0 flattens the burst; 0.0 makes it purely horizontal
    pub vertical_scale: f32,
}

impl DirectionPolicy {
    pub const fn radial(center: Vec3) -> Self {
        Self {
            center,
            vertical_scale: 1.0,
        }
    }

    /// Unit direction for an instance at `position`. A zero vector falls back to +Y.
    pub fn direction(&self, position: Vec3) -> Vec3 {
        let offset = (position - self.center) * Vec3::new(1.0, self.vertical_scale, 1.0);
        offset.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Full placement and explosion recipe for one ornament class
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeProfile {
    pub name: &'static str,
    pub taper: Taper,
    pub placement: Placement,
    pub orientation: Orientation,
    pub scale: ScalePolicy,
    pub direction: DirectionPolicy,
    pub speed: Interval,
}

impl ShapeProfile {
    /// Dense needle fill, packed toward the base, bursting mostly sideways
    pub fn needles() -> Self {
        Self {
            name: "needles",
            taper: Taper::new(3.6, APEX_HEIGHT, 0.3),
            placement: Placement::Scattered {
                vertical: VerticalDistribution::power_law(1.6, 11.0),
                jitter: Interval::new(0.4, 1.0),
            },
            orientation: Orientation::FaceAxis {
                tilt: FRAC_PI_2 + 0.35,
            },
            scale: ScalePolicy::Uniform(Interval::new(0.5, 1.0)),
            direction: DirectionPolicy {
                center: Vec3::ZERO,
                vertical_scale: 0.1,
            },
            speed: Interval::new(0.2, 0.7),
        }
    }

    /// Thin shell of pearls bursting from mid-height
    pub fn pearls() -> Self {
        Self {
            name: "pearls",
            taper: Taper::new(3.6, APEX_HEIGHT, 0.3),
            placement: Placement::Scattered {
                vertical: VerticalDistribution::uniform(10.0),
                jitter: Interval::new(0.92, 1.07),
            },
            orientation: Orientation::Upright,
            scale: ScalePolicy::Uniform(Interval::new(0.7, 1.0)),
            direction: DirectionPolicy::radial(Vec3::new(0.0, 5.0, 0.0)),
            speed: Interval::new(0.5, 1.3),
        }
    }

    /// Continuous ribbon coil, flying out horizontally
    pub fn ribbons() -> Self {
        Self {
            name: "ribbons",
            taper: Taper::new(4.0, APEX_HEIGHT, 0.5),
            placement: Placement::Helix {
                turns: 5.5,
                height_span: 10.5,
                jitter: 0.2,
            },
            orientation: Orientation::AlongHelix {
                lead_angle: 0.1,
                rise: 0.5,
            },
            scale: ScalePolicy::StretchZ(Interval::new(1.0, 1.5)),
            direction: DirectionPolicy {
                center: Vec3::ZERO,
                vertical_scale: 0.0,
            },
            speed: Interval::new(0.8, 1.3),
        }
    }

    /// Light silver shards scattered through the volume, the fastest debris
    pub fn silver() -> Self {
        Self {
            name: "silver",
            taper: Taper::new(3.6, APEX_HEIGHT, 0.0),
            placement: Placement::Scattered {
                vertical: VerticalDistribution::uniform(11.0),
                jitter: Interval::new(0.5, 1.0),
            },
            orientation: Orientation::Tumbled { max_angle: 3.0 },
            scale: ScalePolicy::Uniform(Interval::new(0.5, 1.0)),
            direction: DirectionPolicy::radial(Vec3::new(0.0, 5.0, 0.0)),
            speed: Interval::new(0.5, 1.7),
        }
    }

    /// Largest radius any instance of this class may have at height `y`
    pub fn max_radius_at(&self, y: f32) -> f32 {
        match self.placement {
            Placement::Scattered { jitter, .. } => self.taper.radius_at(y) * jitter.max,
            Placement::Helix { jitter, .. } => {
                // x and z jitter each up to jitter/2
                self.taper.radius_at(y) + jitter * std::f32::consts::FRAC_1_SQRT_2
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taper_narrows_with_height() {
        let taper = Taper::new(3.6, APEX_HEIGHT, 0.3);
        assert!((taper.radius_at(0.0) - 3.9).abs() < 1e-6);
        assert!(taper.radius_at(5.0) < taper.radius_at(1.0));
        assert!((taper.radius_at(APEX_HEIGHT) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn power_law_biases_toward_base() {
        let dense = VerticalDistribution::power_law(1.6, 11.0);
        let flat = VerticalDistribution::uniform(11.0);
        assert!(dense.height(0.5) < flat.height(0.5));
        assert_eq!(dense.height(0.0), 0.0);
    }

    #[test]
    fn horizontal_direction_policy_drops_y() {
        let policy = ShapeProfile::ribbons().direction;
        let dir = policy.direction(Vec3::new(3.0, 7.0, 4.0));
        assert!(dir.y.abs() < 1e-6);
        assert!((dir - Vec3::new(0.6, 0.0, 0.8)).length() < 1e-5);
    }

    #[test]
    fn degenerate_direction_falls_back_to_up() {
        let policy = DirectionPolicy::radial(Vec3::new(0.0, 5.0, 0.0));
        assert_eq!(policy.direction(Vec3::new(0.0, 5.0, 0.0)), Vec3::Y);
    }

    #[test]
    fn silver_outpaces_ribbons() {
        assert!(ShapeProfile::silver().speed.max > ShapeProfile::ribbons().speed.max);
    }
}
