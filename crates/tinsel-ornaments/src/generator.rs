//! Procedural instance placement
//!
//! Turns a [`ShapeProfile`] and a count into an [`InstanceClass`]: rest poses
//! inside the tapered cone plus parallel explosion direction, speed and
//! tumble axis samples.

use crate::instance::InstanceClass;
use crate::profile::{Orientation, Placement, ScalePolicy, ShapeProfile};
use crate::sampler::Sampler;
use glam::{EulerRot, Quat, Vec3};
use std::f32::consts::TAU;
use tinsel_core::{OrnamentCounts, Transform};

/// Position on the cone before orientation is chosen
struct Placed {
    position: Vec3,
    angle: f32,
    /// Un-jittered radius on the coil (helix only)
    coil_radius: f32,
}

/// Generate `count` instances of the given class profile
pub fn generate<S: Sampler + ?Sized>(
    profile: &ShapeProfile,
    count: usize,
    sampler: &mut S,
) -> InstanceClass {
    let mut class = InstanceClass::with_capacity(profile.name, count);

    for i in 0..count {
        let placed = place(profile, i, count, sampler);
        let rotation = orient(profile.orientation, &placed, sampler);
        let scale = match profile.scale {
            ScalePolicy::Uniform(range) => Vec3::splat(range.sample(sampler)),
            ScalePolicy::StretchZ(range) => Vec3::new(1.0, 1.0, range.sample(sampler)),
        };

        let direction = profile.direction.direction(placed.position);
        let speed = profile.speed.sample(sampler);
        let axis = sampler.positive_axis();

        let transform = Transform::from_position(placed.position)
            .with_rotation(rotation)
            .with_scale(scale);
        class.push(transform, direction, speed, axis);
    }

    tracing::debug!(target: "ornaments", class = profile.name, count, "generated instance class");
    class
}

/// The four stock ornament classes of the tree
#[derive(Debug, Clone)]
pub struct TreeOrnaments {
    pub needles: InstanceClass,
    pub pearls: InstanceClass,
    pub ribbons: InstanceClass,
    pub silver: InstanceClass,
}

impl TreeOrnaments {
    /// Generate every class from its stock profile
    pub fn generate<S: Sampler + ?Sized>(counts: &OrnamentCounts, sampler: &mut S) -> Self {
        Self {
            needles: generate(&ShapeProfile::needles(), counts.needles, sampler),
            pearls: generate(&ShapeProfile::pearls(), counts.pearls, sampler),
            ribbons: generate(&ShapeProfile::ribbons(), counts.ribbons, sampler),
            silver: generate(&ShapeProfile::silver(), counts.silver, sampler),
        }
    }

    pub fn classes(&self) -> [&InstanceClass; 4] {
        [&self.needles, &self.pearls, &self.ribbons, &self.silver]
    }

    pub fn total(&self) -> usize {
        self.classes().iter().map(|c| c.len()).sum()
    }
}

fn place<S: Sampler + ?Sized>(
    profile: &ShapeProfile,
    index: usize,
    count: usize,
    sampler: &mut S,
) -> Placed {
    match profile.placement {
        Placement::Scattered { vertical, jitter } => {
            let y = vertical.height(sampler.next_f32());
            let r = profile.taper.radius_at(y) * jitter.sample(sampler);
            let angle = sampler.angle();
            Placed {
                position: Vec3::new(angle.cos() * r, y, angle.sin() * r),
                angle,
                coil_radius: r,
            }
        }
        Placement::Helix {
            turns,
            height_span,
            jitter,
        } => {
            let t = index as f32 / count as f32;
            let y = t * height_span;
            let r = profile.taper.radius_at(y);
            let angle = t * TAU * turns;
            let half = jitter * 0.5;
            let x = angle.cos() * r + sampler.jitter(half);
            let z = angle.sin() * r + sampler.jitter(half);
            Placed {
                position: Vec3::new(x, y, z),
                angle,
                coil_radius: r,
            }
        }
    }
}

fn orient<S: Sampler + ?Sized>(orientation: Orientation, placed: &Placed, sampler: &mut S) -> Quat {
    let position = placed.position;
    match orientation {
        Orientation::Upright => Quat::IDENTITY,
        Orientation::FaceAxis { tilt } => {
            let trunk = Vec3::new(0.0, position.y, 0.0);
            Transform::looking_at(position, trunk, Vec3::Y) * Quat::from_rotation_x(tilt)
        }
        Orientation::AlongHelix { lead_angle, rise } => {
            let ahead = placed.angle + lead_angle;
            let target = Vec3::new(
                ahead.cos() * placed.coil_radius,
                position.y + rise,
                ahead.sin() * placed.coil_radius,
            );
            Transform::looking_at(position, target, Vec3::Y)
        }
        Orientation::Tumbled { max_angle } => Quat::from_euler(
            EulerRot::XYZ,
            sampler.range(0.0, max_angle),
            sampler.range(0.0, max_angle),
            sampler.range(0.0, max_angle),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::XorShiftSampler;

    fn assert_parallel(class: &InstanceClass, n: usize) {
        let attrs = class.attributes();
        assert_eq!(class.transforms().len(), n);
        assert_eq!(attrs.directions().len(), n);
        assert_eq!(attrs.speeds().len(), n);
        assert_eq!(attrs.axes().len(), n);
    }

    #[test]
    fn needles_stay_inside_cone() {
        let profile = ShapeProfile::needles();
        let mut rng = XorShiftSampler::new(1);
        let class = generate(&profile, 20_000, &mut rng);
        assert_parallel(&class, 20_000);

        for t in class.transforms() {
            let p = t.position;
            assert!((0.0..=11.0).contains(&p.y), "y out of range: {}", p.y);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            assert!(
                radius <= profile.taper.radius_at(p.y) + 1e-4,
                "radius {radius} exceeds taper at y={}",
                p.y
            );
        }
    }

    #[test]
    fn needles_concentrate_near_base() {
        let mut rng = XorShiftSampler::new(2);
        let class = generate(&ShapeProfile::needles(), 5_000, &mut rng);
        let lower = class
            .transforms()
            .iter()
            .filter(|t| t.position.y < 5.5)
            .count();
        // u^1.6 < 0.5 for u < 0.648
        assert!(lower > 3_000, "expected base-heavy distribution, got {lower}");
    }

    #[test]
    fn every_class_has_unit_directions_and_axes() {
        let mut rng = XorShiftSampler::new(3);
        for profile in [
            ShapeProfile::needles(),
            ShapeProfile::pearls(),
            ShapeProfile::ribbons(),
            ShapeProfile::silver(),
        ] {
            let class = generate(&profile, 500, &mut rng);
            assert_parallel(&class, 500);
            for view in class.iter() {
                assert!((view.direction.length() - 1.0).abs() < 1e-4, "{}", profile.name);
                assert!((view.axis.length() - 1.0).abs() < 1e-4, "{}", profile.name);
                assert!(profile.speed.contains(view.speed), "{}", profile.name);
            }
        }
    }

    #[test]
    fn pearls_form_thin_shell() {
        let profile = ShapeProfile::pearls();
        let mut rng = XorShiftSampler::new(4);
        let class = generate(&profile, 700, &mut rng);
        for t in class.transforms() {
            let p = t.position;
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            let taper = profile.taper.radius_at(p.y);
            assert!(radius >= taper * 0.92 - 1e-4 && radius <= taper * 1.07 + 1e-4);
            assert_eq!(t.rotation, Quat::IDENTITY);
        }
    }

    #[test]
    fn ribbons_follow_a_coil() {
        let profile = ShapeProfile::ribbons();
        let mut rng = XorShiftSampler::new(5);
        let n = 2_500;
        let class = generate(&profile, n, &mut rng);

        // Heights are deterministic and increase monotonically along the coil
        let heights: Vec<f32> = class.transforms().iter().map(|t| t.position.y).collect();
        assert!(heights.windows(2).all(|w| w[1] > w[0]));
        assert!((heights[100] - 100.0 / n as f32 * 10.5).abs() < 1e-4);

        for (i, t) in class.transforms().iter().enumerate() {
            let p = t.position;
            let angle = i as f32 / n as f32 * TAU * 5.5;
            let r = profile.taper.radius_at(p.y);
            assert!((p.x - angle.cos() * r).abs() <= 0.1 + 1e-4);
            assert!((p.z - angle.sin() * r).abs() <= 0.1 + 1e-4);
            let radius = (p.x * p.x + p.z * p.z).sqrt();
            assert!(radius <= profile.max_radius_at(p.y) + 1e-4);
            assert!((t.scale.x - 1.0).abs() < 1e-6 && t.scale.z >= 1.0);
        }

        for view in class.iter() {
            assert!(view.direction.y.abs() < 1e-6);
        }
    }

    #[test]
    fn needles_face_the_trunk_before_tilting() {
        let mut rng = XorShiftSampler::new(6);
        let class = generate(&ShapeProfile::needles(), 50, &mut rng);
        for t in class.transforms() {
            // Undo the tilt and the local +Z axis should point at the trunk
            let untilted = t.rotation * Quat::from_rotation_x(-(std::f32::consts::FRAC_PI_2 + 0.35));
            let forward = untilted * Vec3::Z;
            let to_trunk = Vec3::new(-t.position.x, 0.0, -t.position.z).normalize();
            assert!((forward - to_trunk).length() < 1e-3);
        }
    }

    #[test]
    fn needle_directions_are_flattened() {
        let mut rng = XorShiftSampler::new(7);
        let class = generate(&ShapeProfile::needles(), 1_000, &mut rng);
        for view in class.iter() {
            let p = view.transform.position;
            let expected = Vec3::new(p.x, p.y * 0.1, p.z).normalize();
            assert!((view.direction - expected).length() < 1e-4);
        }
    }

    #[test]
    fn same_seed_same_class() {
        let a = generate(&ShapeProfile::silver(), 100, &mut XorShiftSampler::new(11));
        let b = generate(&ShapeProfile::silver(), 100, &mut XorShiftSampler::new(11));
        assert_eq!(a.transforms(), b.transforms());
        assert_eq!(a.attributes().speeds(), b.attributes().speeds());
    }

    #[test]
    fn tree_uses_configured_counts() {
        let counts = OrnamentCounts {
            needles: 300,
            pearls: 20,
            ribbons: 50,
            silver: 10,
        };
        let tree = TreeOrnaments::generate(&counts, &mut XorShiftSampler::new(8));
        assert_eq!(tree.needles.len(), 300);
        assert_eq!(tree.ribbons.name(), "ribbons");
        assert_eq!(tree.total(), 380);
    }

    #[test]
    fn zero_count_is_empty() {
        let class = generate(&ShapeProfile::pearls(), 0, &mut XorShiftSampler::new(1));
        assert!(class.is_empty());
    }
}
