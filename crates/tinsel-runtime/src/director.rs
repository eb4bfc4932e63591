//! Director: owns the per-frame scene state and applies queued input between
//! frames.
//!
//! Frame order is fixed: drain events, advance the clock, smooth expansion
//! (which writes the shared register), ease lights, age ripples, then pose the
//! scene. Anything that renders after `frame()` returns sees this tick's
//! expansion value.

use crate::choreography::{Choreography, ScenePose};
use crate::clock::GameClock;
use crate::event::SceneEvent;
use crate::event_bus::EventBus;
use crate::expansion::{ExpansionDriver, ExpansionHandle};
use crate::input::{ray_hits_sphere, ray_plane_z0, PointerRay};
use crate::lighting::{LightRig, LightingPreset};
use crate::ripple::{RippleField, RippleSettings, RippleView};
use crate::state::{SceneMode, WishPrompt};
use tinsel_core::{SceneConfig, TinselError};
use tinsel_ornaments::{Sampler, WishSeeder, WishSlot};

/// Everything the renderer needs for one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub seconds: f32,
    pub delta: f32,
    pub expansion: f32,
    pub lights: LightingPreset,
    pub pose: ScenePose,
    pub ripples: Vec<RippleView>,
    pub mode: SceneMode,
    pub modal_open: bool,
    pub wish_generation: u64,
}

pub struct Director {
    clock: GameClock,
    expansion: ExpansionDriver,
    lights: LightRig,
    ripples: RippleField,
    mode: SceneMode,
    prompt: WishPrompt,
    choreography: Choreography,
    events: EventBus<SceneEvent>,
    seeder: WishSeeder,
    sampler: Box<dyn Sampler>,
    wish: WishSlot,
    last_pose: ScenePose,
    viewer_heading: f32,
}

impl Director {
    pub fn new(config: &SceneConfig, seeder: WishSeeder, sampler: Box<dyn Sampler>) -> Self {
        let choreography = Choreography::default();
        Self {
            clock: GameClock::new(),
            expansion: ExpansionDriver::new(&config.expansion),
            lights: LightRig::new(&config.lighting),
            ripples: RippleField::new(RippleSettings::default()),
            mode: SceneMode::default(),
            prompt: WishPrompt::new(),
            last_pose: choreography.pose(0.0, 0.0),
            choreography,
            events: EventBus::new(),
            seeder,
            sampler,
            wish: WishSlot::new(),
            viewer_heading: 0.0,
        }
    }

    /// Queue an event; it is applied at the start of the next frame
    pub fn push(&mut self, event: SceneEvent) {
        self.events.push(event);
    }

    /// Read-only view of the expansion register for deformed materials
    pub fn expansion_handle(&self) -> ExpansionHandle {
        self.expansion.handle()
    }

    pub fn wish(&self) -> &WishSlot {
        &self.wish
    }

    pub fn prompt(&self) -> &WishPrompt {
        &self.prompt
    }

    pub fn mode(&self) -> SceneMode {
        self.mode
    }

    /// Camera azimuth about +Y; new wishes are laid out facing it
    pub fn set_viewer_heading(&mut self, radians: f32) {
        self.viewer_heading = radians;
    }

    pub fn expansion(&self) -> &ExpansionDriver {
        &self.expansion
    }

    /// Advance by wall-clock time
    pub fn frame(&mut self) -> FrameSnapshot {
        self.apply_events();
        self.clock.tick();
        self.step()
    }

    /// Advance by an explicit step
    pub fn advance(&mut self, seconds: f64) -> FrameSnapshot {
        self.apply_events();
        self.clock.advance(seconds);
        self.step()
    }

    fn step(&mut self) -> FrameSnapshot {
        let expansion = self.expansion.tick();
        let lights = self.lights.tick();
        let delta = self.clock.delta_time as f32;
        self.ripples.tick(delta);

        let seconds = self.clock.seconds();
        self.last_pose = self.choreography.pose(seconds, expansion);

        FrameSnapshot {
            seconds,
            delta,
            expansion,
            lights,
            pose: self.last_pose,
            ripples: self.ripples.views().collect(),
            mode: self.mode,
            modal_open: self.prompt.is_open(),
            wish_generation: self.wish.generation(),
        }
    }

    fn apply_events(&mut self) {
        for event in self.events.drain() {
            match event {
                SceneEvent::PointerDown { ray } => self.pointer_down(&ray),
                SceneEvent::WheelScrolled { pixels } => self.expansion.nudge(pixels),
                SceneEvent::DraftInput(c) => self.prompt.push_char(c),
                SceneEvent::DraftBackspace => self.prompt.backspace(),
                SceneEvent::DraftSubmitted => {
                    if self.prompt.is_open() {
                        let text = self.prompt.submit();
                        self.submit_wish(&text);
                    }
                }
                SceneEvent::WishSubmitted(text) => {
                    self.prompt.close();
                    self.submit_wish(&text);
                }
                SceneEvent::ModalCloseRequested => self.prompt.close(),
            }
        }
    }

    fn pointer_down(&mut self, ray: &PointerRay) {
        let star = self.last_pose.star_center;
        if ray_hits_sphere(ray, star, self.choreography.star_hit_radius).is_some() {
            self.ripples.spawn(star);
            if self.mode.illuminate() {
                self.lights.set_target(LightingPreset::lit());
                tracing::info!(target: "director", "star clicked, lighting up the scene");
            }
            self.prompt.toggle();
            return;
        }
        if let Some(point) = ray_plane_z0(ray) {
            self.ripples.spawn(point);
        }
    }

    /// Seed and install a wish, dropping the set it replaces
    fn submit_wish(&mut self, text: &str) {
        let text = text.trim();
        if text.is_empty() {
            tracing::debug!(target: "director", "ignoring empty wish");
            return;
        }
        match self.seeder.seed(text, self.viewer_heading, self.sampler.as_mut()) {
            Ok(class) => {
                let particles = class.len();
                if let Some(previous) = self.wish.replace(class) {
                    tracing::debug!(target: "director", released = previous.len(), "released previous wish");
                }
                tracing::info!(
                    target: "director",
                    wish = text,
                    particles,
                    generation = self.wish.generation(),
                    "wish installed"
                );
            }
            Err(TinselError::NoCoverage(_)) => {
                tracing::warn!(target: "director", wish = text, "wish rendered no visible pixels, keeping previous");
            }
            Err(err) => {
                tracing::warn!(target: "director", wish = text, "wish rejected: {err}");
            }
        }
    }
}
