//! Transient ripple rings spawned where the pointer lands

use glam::Vec3;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleSettings {
    /// Seconds from spawn to removal
    pub lifetime: f32,
    pub start_radius: f32,
    pub end_radius: f32,
    pub start_alpha: f32,
    /// Oldest ripples are dropped beyond this
    pub capacity: usize,
}

impl Default for RippleSettings {
    fn default() -> Self {
        Self {
            lifetime: 1.2,
            start_radius: 0.1,
            end_radius: 1.6,
            start_alpha: 0.8,
            capacity: 16,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Ripple {
    center: Vec3,
    age: f32,
}

/// Render-ready state of one ripple
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RippleView {
    pub center: Vec3,
    pub radius: f32,
    pub alpha: f32,
}

#[derive(Debug, Clone, Default)]
pub struct RippleField {
    ripples: Vec<Ripple>,
    settings: RippleSettings,
}

impl RippleField {
    pub fn new(settings: RippleSettings) -> Self {
        Self {
            ripples: Vec::with_capacity(settings.capacity),
            settings,
        }
    }

    pub fn settings(&self) -> &RippleSettings {
        &self.settings
    }

    pub fn spawn(&mut self, center: Vec3) {
        if self.settings.capacity == 0 {
            return;
        }
        if self.ripples.len() >= self.settings.capacity {
            self.ripples.remove(0);
        }
        self.ripples.push(Ripple { center, age: 0.0 });
    }

    /// Age every ripple and drop the expired ones
    pub fn tick(&mut self, dt: f32) {
        let lifetime = self.settings.lifetime;
        for ripple in &mut self.ripples {
            ripple.age += dt;
        }
        self.ripples.retain(|r| r.age < lifetime);
    }

    pub fn len(&self) -> usize {
        self.ripples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ripples.is_empty()
    }

    /// Oldest first
    pub fn views(&self) -> impl Iterator<Item = RippleView> + '_ {
        let s = self.settings;
        self.ripples.iter().map(move |r| {
            let t = (r.age / s.lifetime).clamp(0.0, 1.0);
            // Ease-out growth, linear fade
            let grow = 1.0 - (1.0 - t) * (1.0 - t);
            RippleView {
                center: r.center,
                radius: s.start_radius + (s.end_radius - s.start_radius) * grow,
                alpha: s.start_alpha * (1.0 - t),
            }
        })
    }
}
