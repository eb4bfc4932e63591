//! Random sampling policy, kept apart from the placement algorithms so a
//! seeded sampler makes every generator reproducible.

use glam::Vec3;
use std::f32::consts::TAU;

/// Closed-open interval `[min, max)` used for per-class random ranges
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// A degenerate interval that always samples `value`
    pub const fn fixed(value: f32) -> Self {
        Self {
            min: value,
            max: value,
        }
    }

    pub fn sample<S: Sampler + ?Sized>(&self, sampler: &mut S) -> f32 {
        debug_assert!(self.min <= self.max, "inverted interval {self:?}");
        sampler.range(self.min, self.max)
    }

    /// Inclusive at both ends: `min + u * (max - min)` may round up to `max`
    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Source of uniform randomness for generators
pub trait Sampler {
    /// Returns a float in [0, 1)
    fn next_f32(&mut self) -> f32;

    /// Returns a float in [min, max)
    fn range(&mut self, min: f32, max: f32) -> f32 {
        min + self.next_f32() * (max - min)
    }

    /// Uniform angle in [0, 2π)
    fn angle(&mut self) -> f32 {
        self.next_f32() * TAU
    }

    /// Symmetric jitter in [-half, half)
    fn jitter(&mut self, half: f32) -> f32 {
        self.range(-half, half)
    }

    /// Unit direction with lateral components in [-0.5, 0.5) and z in [0.5, 1),
    /// so it always leans toward +Z
    fn hemisphere_biased(&mut self) -> Vec3 {
        Vec3::new(self.range(-0.5, 0.5), self.range(-0.5, 0.5), self.range(0.5, 1.0)).normalize()
    }

    /// Unit tumble axis with all components drawn from [0, 1)
    fn positive_axis(&mut self) -> Vec3 {
        let axis = Vec3::new(self.next_f32(), self.next_f32(), self.next_f32());
        axis.try_normalize().unwrap_or(Vec3::Y)
    }
}

/// Lightweight xorshift32 PRNG, deterministic for a given seed
#[derive(Debug, Clone)]
pub struct XorShiftSampler {
    state: u32,
}

impl XorShiftSampler {
    pub fn new(seed: u32) -> Self {
        Self {
            state: if seed == 0 { 1 } else { seed },
        }
    }

    /// Independent sequence number `stream` derived from one seed.
    /// Stream 0 is the same as `new(seed)`.
    pub fn stream(seed: u32, stream: u32) -> Self {
        if stream == 0 {
            return Self::new(seed);
        }
        Self::new(seed.rotate_left(16) ^ stream.wrapping_mul(0x9E37_79B9))
    }

    /// Seed from the wall clock, for runs that should differ each launch
    pub fn clock_seed() -> u32 {
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.subsec_nanos() ^ (d.as_secs() as u32))
            .unwrap_or(0x5EED_5EED)
    }

    fn next_u32(&mut self) -> u32 {
        let mut x = self.state;
        x ^= x << 13;
        x ^= x >> 17;
        x ^= x << 5;
        self.state = x;
        x
    }
}

impl Sampler for XorShiftSampler {
    fn next_f32(&mut self) -> f32 {
        // Top 24 bits fit the f32 mantissa exactly, so the result never rounds up to 1.0
        (self.next_u32() >> 8) as f32 / (1u32 << 24) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_bounds() {
        let mut rng = XorShiftSampler::new(42);
        for _ in 0..10_000 {
            let v = rng.range(0.0, 10.0);
            assert!((0.0..10.0).contains(&v));
        }
    }

    #[test]
    fn same_seed_same_sequence() {
        let mut a = XorShiftSampler::new(7);
        let mut b = XorShiftSampler::new(7);
        for _ in 0..100 {
            assert_eq!(a.next_f32(), b.next_f32());
        }
    }

    #[test]
    fn streams_from_one_seed_diverge() {
        for seed in [1u32, 42, 0xDEAD_BEEF] {
            let mut tree = XorShiftSampler::stream(seed, 0);
            let mut wish = XorShiftSampler::stream(seed, 1);
            let mut plain = XorShiftSampler::new(seed);
            let tree_draws: Vec<f32> = (0..16).map(|_| tree.next_f32()).collect();
            let wish_draws: Vec<f32> = (0..16).map(|_| wish.next_f32()).collect();
            let plain_draws: Vec<f32> = (0..16).map(|_| plain.next_f32()).collect();
            assert_eq!(tree_draws, plain_draws);
            assert_ne!(tree_draws, wish_draws);
        }
    }

    #[test]
    fn zero_seed_does_not_stall() {
        let mut rng = XorShiftSampler::new(0);
        let first = rng.next_f32();
        let second = rng.next_f32();
        assert_ne!(first, second);
    }

    #[test]
    fn hemisphere_biased_leans_forward() {
        let mut rng = XorShiftSampler::new(31);
        for _ in 0..1000 {
            let dir = rng.hemisphere_biased();
            assert!((dir.length() - 1.0).abs() < 1e-4);
            // z >= 0.5 against |x|,|y| <= 0.5
            assert!(dir.z >= dir.x.abs() && dir.z >= dir.y.abs());
        }
    }

    #[test]
    fn positive_axis_is_normalized() {
        let mut rng = XorShiftSampler::new(9);
        for _ in 0..1000 {
            let axis = rng.positive_axis();
            assert!((axis.length() - 1.0).abs() < 1e-4);
            assert!(axis.min_element() >= 0.0);
        }
    }

    #[test]
    fn interval_sampling_stays_inside() {
        let mut rng = XorShiftSampler::new(5);
        let interval = Interval::new(0.92, 1.07);
        for _ in 0..1000 {
            assert!(interval.contains(interval.sample(&mut rng)));
        }
        assert!(Interval::fixed(1.0).contains(Interval::fixed(1.0).sample(&mut rng)));
    }
}
