//! Scene events

use crate::input::PointerRay;

/// Input delivered by the window layer, applied by the director between frames
#[derive(Debug, Clone, PartialEq)]
pub enum SceneEvent {
    /// Primary button pressed; the ray is already in world space
    PointerDown { ray: PointerRay },
    /// Wheel travel in pixels, positive when scrolling down
    WheelScrolled { pixels: f32 },
    /// A character typed while the wish prompt is open
    DraftInput(char),
    DraftBackspace,
    /// Submit whatever is in the wish prompt
    DraftSubmitted,
    /// Submit a wish directly, bypassing the prompt
    WishSubmitted(String),
    ModalCloseRequested,
}
