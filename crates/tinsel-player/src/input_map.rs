//! Translate winit input into scene events

use std::f32::consts::TAU;
use tinsel_runtime::SceneEvent;
use winit::event::MouseScrollDelta;
use winit::keyboard::{Key, NamedKey};

/// Pixels per wheel notch for line-based scrolling
pub const LINE_HEIGHT_PIXELS: f32 = 100.0;

/// Wheel travel in pixels, positive when scrolling down (toward the user)
pub fn wheel_pixels(delta: MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => -y * LINE_HEIGHT_PIXELS,
        MouseScrollDelta::PixelDelta(position) => -position.y as f32,
    }
}

/// Orbit angles for a cursor drag: a drag across the full window height
/// turns the camera one full revolution. Dragging right or down moves the
/// view the opposite way, like grabbing the scene.
pub fn drag_orbit(dx: f32, dy: f32, window_height: u32) -> (f32, f32) {
    let per_pixel = TAU / window_height.max(1) as f32;
    (-dx * per_pixel, -dy * per_pixel)
}

/// Events for a key press while the wish prompt is open
pub fn prompt_key(key: &Key, text: Option<&str>) -> Vec<SceneEvent> {
    match key {
        Key::Named(NamedKey::Enter) => vec![SceneEvent::DraftSubmitted],
        Key::Named(NamedKey::Backspace) => vec![SceneEvent::DraftBackspace],
        Key::Named(NamedKey::Escape) => vec![SceneEvent::ModalCloseRequested],
        _ => text
            .unwrap_or_default()
            .chars()
            .filter(|c| !c.is_control())
            .map(SceneEvent::DraftInput)
            .collect(),
    }
}

/// Window title showing the prompt state
pub fn window_title(modal_open: bool, draft: &str) -> String {
    if modal_open {
        format!("Tinsel - make a wish: {draft}_")
    } else {
        "Tinsel".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::dpi::PhysicalPosition;

    #[test]
    fn scrolling_down_is_positive() {
        assert_eq!(wheel_pixels(MouseScrollDelta::LineDelta(0.0, -1.0)), 100.0);
        assert_eq!(wheel_pixels(MouseScrollDelta::LineDelta(0.0, 2.0)), -200.0);
        assert_eq!(
            wheel_pixels(MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -35.0))),
            35.0
        );
    }

    #[test]
    fn named_keys_drive_the_prompt() {
        assert_eq!(
            prompt_key(&Key::Named(NamedKey::Enter), Some("\r")),
            vec![SceneEvent::DraftSubmitted]
        );
        assert_eq!(
            prompt_key(&Key::Named(NamedKey::Backspace), None),
            vec![SceneEvent::DraftBackspace]
        );
        assert_eq!(
            prompt_key(&Key::Named(NamedKey::Escape), None),
            vec![SceneEvent::ModalCloseRequested]
        );
    }

    #[test]
    fn typed_text_becomes_draft_input() {
        let events = prompt_key(&Key::Character("é".into()), Some("é"));
        assert_eq!(events, vec![SceneEvent::DraftInput('é')]);

        let space = prompt_key(&Key::Named(NamedKey::Space), Some(" "));
        assert_eq!(space, vec![SceneEvent::DraftInput(' ')]);

        assert!(prompt_key(&Key::Named(NamedKey::Tab), Some("\t")).is_empty());
    }

    #[test]
    fn full_height_drag_is_one_turn() {
        let (azimuth, polar) = drag_orbit(720.0, 0.0, 720);
        assert!((azimuth + TAU).abs() < 1e-5);
        assert_eq!(polar, 0.0);

        let (azimuth, polar) = drag_orbit(0.0, -36.0, 720);
        assert_eq!(azimuth, 0.0);
        assert!((polar - TAU / 20.0).abs() < 1e-5);

        // Zero-height window while minimized
        let (azimuth, _) = drag_orbit(1.0, 0.0, 0);
        assert!(azimuth.is_finite());
    }

    #[test]
    fn title_reflects_draft() {
        assert_eq!(window_title(false, "ignored"), "Tinsel");
        assert_eq!(window_title(true, "joy"), "Tinsel - make a wish: joy_");
    }
}
