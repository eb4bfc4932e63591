//! Player application implementing winit ApplicationHandler
//!
//! Feeds window input to the director as scene events, then advances and
//! draws one frame per redraw.

use crate::input_map::{drag_orbit, prompt_key, wheel_pixels, window_title};
use anyhow::{Context, Result};
use std::sync::Arc;
use tinsel_ornaments::TreeOrnaments;
use tinsel_render::{DeformParams, OrbitCamera, RenderContext, SceneRenderer};
use tinsel_runtime::{Director, SceneEvent};
use winit::application::ApplicationHandler;
use winit::dpi::{PhysicalPosition, PhysicalSize};
use winit::event::{ElementState, MouseButton, WindowEvent};
use winit::event_loop::ActiveEventLoop;
use winit::keyboard::{Key, NamedKey};
use winit::window::{Fullscreen, Window, WindowId};

/// Scene content prepared before the window opens
pub struct SceneSetup {
    pub director: Director,
    pub ornaments: TreeOrnaments,
    pub deform: DeformParams,
}

pub struct TinselApp {
    director: Director,
    ornaments: TreeOrnaments,
    deform: DeformParams,

    // Rendering
    window: Option<Arc<Window>>,
    render_context: Option<RenderContext>,
    scene_renderer: Option<SceneRenderer>,
    camera: OrbitCamera,

    cursor: PhysicalPosition<f64>,
    dragging: bool,
    title: String,
    pub fullscreen: bool,
}

impl TinselApp {
    pub fn new(setup: SceneSetup, fullscreen: bool) -> Self {
        Self {
            director: setup.director,
            ornaments: setup.ornaments,
            deform: setup.deform,
            window: None,
            render_context: None,
            scene_renderer: None,
            camera: OrbitCamera::new(),
            cursor: PhysicalPosition::new(0.0, 0.0),
            dragging: false,
            title: window_title(false, ""),
            fullscreen,
        }
    }

    fn initialize(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let window_attrs = Window::default_attributes()
            .with_title(self.title.as_str())
            .with_inner_size(PhysicalSize::new(1280, 720));

        let window = Arc::new(
            event_loop
                .create_window(window_attrs)
                .context("Failed to create window")?,
        );

        if self.fullscreen {
            window.set_fullscreen(Some(Fullscreen::Borderless(None)));
        }

        let render_context = pollster::block_on(RenderContext::new(window.clone()))
            .context("Failed to initialize GPU")?;
        self.camera
            .set_aspect(render_context.size.width, render_context.size.height);

        let scene_renderer = SceneRenderer::new(
            &render_context,
            &self.ornaments,
            self.director.expansion_handle(),
            &self.deform,
        )
        .context("Failed to build scene renderer")?;

        self.window = Some(window);
        self.render_context = Some(render_context);
        self.scene_renderer = Some(scene_renderer);
        Ok(())
    }

    fn pointer_down(&mut self) {
        let Some(context) = &self.render_context else {
            return;
        };
        let ray = self.camera.screen_ray(
            self.cursor.x as f32,
            self.cursor.y as f32,
            context.size.width as f32,
            context.size.height as f32,
        );
        self.director.push(SceneEvent::PointerDown { ray });
    }

    fn cursor_moved(&mut self, position: PhysicalPosition<f64>) {
        if self.dragging {
            if let Some(context) = &self.render_context {
                let (azimuth, polar) = drag_orbit(
                    (position.x - self.cursor.x) as f32,
                    (position.y - self.cursor.y) as f32,
                    context.size.height,
                );
                self.camera.orbit(azimuth, polar);
            }
        }
        self.cursor = position;
    }

    fn key_pressed(&mut self, event_loop: &ActiveEventLoop, key: &Key, text: Option<&str>) {
        if self.director.prompt().is_open() {
            for event in prompt_key(key, text) {
                self.director.push(event);
            }
            return;
        }

        match key {
            Key::Named(NamedKey::Escape) => event_loop.exit(),
            Key::Named(NamedKey::F11) => {
                if let Some(window) = &self.window {
                    if window.fullscreen().is_some() {
                        window.set_fullscreen(None);
                    } else {
                        window.set_fullscreen(Some(Fullscreen::Borderless(None)));
                    }
                }
            }
            _ => {}
        }
    }

    fn refresh_title(&mut self) {
        let prompt = self.director.prompt();
        let title = window_title(prompt.is_open(), prompt.draft());
        if title != self.title {
            if let Some(window) = &self.window {
                window.set_title(&title);
            }
            self.title = title;
        }
    }

    fn redraw(&mut self) {
        self.director.set_viewer_heading(self.camera.azimuth);
        let frame = self.director.frame();
        self.camera.update(frame.delta);
        self.refresh_title();

        let (Some(context), Some(renderer)) = (&mut self.render_context, &mut self.scene_renderer)
        else {
            return;
        };
        if let Err(e) = renderer.render(context, &self.camera, &frame, self.director.wish()) {
            tracing::error!(target: "render", error = %e, "frame failed");
        }
    }
}

impl ApplicationHandler for TinselApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_none() {
            if let Err(e) = self.initialize(event_loop) {
                tracing::error!(error = %format!("{e:#}"), "startup failed");
                event_loop.exit();
            }
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(new_size) => {
                if let Some(context) = &mut self.render_context {
                    context.resize(new_size);
                    self.camera.set_aspect(new_size.width, new_size.height);
                }
            }

            WindowEvent::CursorMoved { position, .. } => self.cursor_moved(position),

            WindowEvent::MouseInput {
                state,
                button: MouseButton::Left,
                ..
            } => {
                self.dragging = state == ElementState::Pressed;
                if self.dragging {
                    self.pointer_down();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.director.push(SceneEvent::WheelScrolled {
                    pixels: wheel_pixels(delta),
                });
            }

            WindowEvent::KeyboardInput { event, .. } if event.state == ElementState::Pressed => {
                self.key_pressed(event_loop, &event.logical_key, event.text.as_deref());
            }

            WindowEvent::RedrawRequested => self.redraw(),

            _ => {}
        }
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}
