//! Time- and expansion-driven motion of the tree, ribbon coil and star

use glam::{Mat4, Quat, Vec3};

/// Scene seconds to animation time
pub const TIME_SCALE: f32 = 0.3;

/// Motion constants of the scene graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Choreography {
    pub tree_scale: f32,
    pub tree_offset: Vec3,
    /// Radians per unit of animation time
    pub tree_spin: f32,
    /// Extra spin of the ribbon coil relative to the tree
    pub ribbon_drift: f32,
    pub star_spin: f32,
    pub star_height: f32,
    pub star_bob: f32,
    /// Star lift per unit of expansion, in tree space
    pub star_rise: f32,
    /// World-space radius used for pointer hits on the star
    pub star_hit_radius: f32,
}

impl Default for Choreography {
    fn default() -> Self {
        Self {
            tree_scale: 0.75,
            tree_offset: Vec3::new(0.0, -4.0, 0.0),
            tree_spin: 0.2,
            ribbon_drift: 0.05,
            star_spin: -0.5,
            star_height: 11.2,
            star_bob: 0.15,
            star_rise: 2.5,
            star_hit_radius: 1.0,
        }
    }
}

/// Object-to-world matrices for one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScenePose {
    /// Needles, pearls and silver
    pub tree: Mat4,
    pub ribbons: Mat4,
    pub star: Mat4,
    pub star_center: Vec3,
}

impl Choreography {
    pub fn pose(&self, seconds: f32, expansion: f32) -> ScenePose {
        let t = seconds * TIME_SCALE;
        let tree = Mat4::from_scale_rotation_translation(
            Vec3::splat(self.tree_scale),
            Quat::from_rotation_y(t * self.tree_spin),
            self.tree_offset,
        );
        let ribbons = tree * Mat4::from_rotation_y(t * self.ribbon_drift);

        let star_y = self.star_height + (t * 2.0).sin() * self.star_bob + expansion * self.star_rise;
        let star_local = Mat4::from_rotation_translation(
            Quat::from_rotation_y(t * self.star_spin),
            Vec3::new(0.0, star_y, 0.0),
        );
        let star = tree * star_local;

        ScenePose {
            tree,
            ribbons,
            star,
            star_center: star.transform_point3(Vec3::ZERO),
        }
    }
}
