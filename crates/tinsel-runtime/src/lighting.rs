//! Lighting rig: intensities eased toward the active preset every tick

use tinsel_core::LightingConfig;

/// One full set of light intensities
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightingPreset {
    pub ambient: f32,
    pub main: f32,
    pub rim: f32,
    /// Tone-mapping exposure
    pub exposure: f32,
    pub bloom: f32,
    /// Emissive intensity of the star
    pub star_glow: f32,
}

impl LightingPreset {
    /// Dim scene shown before the star is first clicked
    pub const fn unlit() -> Self {
        Self {
            ambient: 0.15,
            main: 0.3,
            rim: 0.4,
            exposure: 0.7,
            bloom: 0.3,
            star_glow: 0.25,
        }
    }

    /// Full lighting after the star is clicked
    pub const fn lit() -> Self {
        Self {
            ambient: 0.6,
            main: 2.2,
            rim: 2.0,
            exposure: 1.2,
            bloom: 0.8,
            star_glow: 0.8,
        }
    }

    fn channels(&self) -> [f32; 6] {
        [self.ambient, self.main, self.rim, self.exposure, self.bloom, self.star_glow]
    }

    fn channels_mut(&mut self) -> [&mut f32; 6] {
        [
            &mut self.ambient,
            &mut self.main,
            &mut self.rim,
            &mut self.exposure,
            &mut self.bloom,
            &mut self.star_glow,
        ]
    }

    /// Largest per-channel difference
    pub fn distance(&self, other: &Self) -> f32 {
        self.channels()
            .iter()
            .zip(other.channels())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f32::max)
    }
}

/// Current intensities plus the preset they are easing toward
#[derive(Debug, Clone)]
pub struct LightRig {
    current: LightingPreset,
    target: LightingPreset,
    smoothing: f32,
}

impl Default for LightRig {
    fn default() -> Self {
        Self::new(&LightingConfig::default())
    }
}

impl LightRig {
    /// Starts settled on the unlit preset
    pub fn new(config: &LightingConfig) -> Self {
        Self {
            current: LightingPreset::unlit(),
            target: LightingPreset::unlit(),
            smoothing: config.smoothing,
        }
    }

    pub fn set_target(&mut self, preset: LightingPreset) {
        self.target = preset;
    }

    pub fn levels(&self) -> LightingPreset {
        self.current
    }

    pub fn target(&self) -> LightingPreset {
        self.target
    }

    pub fn is_settled(&self, epsilon: f32) -> bool {
        self.current.distance(&self.target) <= epsilon
    }

    /// Each channel covers `smoothing` of its remaining distance
    pub fn tick(&mut self) -> LightingPreset {
        let target = self.target.channels();
        for (value, goal) in self.current.channels_mut().into_iter().zip(target) {
            *value += (goal - *value) * self.smoothing;
        }
        self.current
    }
}
