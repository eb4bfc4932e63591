//! Tinsel Runtime - per-frame scene driving
//!
//! Provides the building blocks the player ticks once per frame:
//! - `GameClock` - monotonic scene time with a frame clamp
//! - `ExpansionDriver` - smoothed expansion scalar written to a shared register
//! - `LightRig` - lighting intensities eased toward the unlit/lit presets
//! - `RippleField` - transient pointer ripples
//! - `SceneEvent` / `EventBus` - input queued between frames
//! - `Director` - applies events and produces a `FrameSnapshot`

mod choreography;
mod clock;
mod director;
mod event;
mod event_bus;
mod expansion;
mod input;
mod lighting;
mod ripple;
mod state;

pub use choreography::{Choreography, ScenePose, TIME_SCALE};
pub use clock::{GameClock, MAX_FRAME_TIME};
pub use director::{Director, FrameSnapshot};
pub use event::SceneEvent;
pub use event_bus::EventBus;
pub use expansion::{ExpansionDriver, ExpansionHandle, ExpansionRegister, EXPANSION_MAX};
pub use input::{ray_hits_sphere, ray_plane_z0, PointerRay};
pub use lighting::{LightRig, LightingPreset};
pub use ripple::{RippleField, RippleSettings, RippleView};
pub use state::{SceneMode, WishModal, WishPrompt};
