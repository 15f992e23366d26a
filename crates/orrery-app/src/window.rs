//! Window creation, event handling and the per-frame loop via winit.

use std::sync::Arc;

use orrery_config::{CameraConfig, Config, LightingConfig};
use orrery_math::{DVec3, format_distance};
use orrery_mesh::Mesh;
use orrery_orbit::SolarSystem;
use orrery_render::{Camera, Light, RenderSettings, Renderer, SurfaceError};
use orrery_scene::{FrameArena, RenderableHandle, build_frame_list};
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::{DeviceEvent, DeviceId, WindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Window, WindowAttributes, WindowId};

use crate::clock::SimClock;
use crate::error::AppError;
use crate::fps::{FpsCounter, fps_title};
use crate::input::{CameraController, InputAction, set_cursor_grabbed};

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            f64::from(config.window.width),
            f64::from(config.window.height),
        ))
}

pub fn render_settings_from_config(config: &Config) -> RenderSettings {
    let [r, g, b] = config.render.clear_color;
    RenderSettings {
        clear_color: wgpu::Color { r, g, b, a: 1.0 },
        body_scale: config.render.body_scale,
        min_display_radius: config.render.min_display_radius,
        mesh_scale: config.render.mesh_scale,
        wireframe: config.render.wireframe,
        vsync: config.window.vsync,
    }
}

/// Camera on +Z looking at the origin.
pub fn camera_from_config(config: &CameraConfig, width: u32, height: u32) -> Camera {
    let mut camera = Camera {
        position: DVec3::new(0.0, 0.0, config.start_distance),
        target: DVec3::ZERO,
        up: DVec3::Y,
        fov_y: config.fov_degrees.to_radians(),
        near: config.near,
        far: config.far,
        ..Camera::default()
    };
    camera.set_aspect_ratio(width as f32, height as f32);
    camera
}

pub fn light_from_config(config: &LightingConfig) -> Light {
    Light {
        position: DVec3::from_array(config.position),
        ambient: config.ambient,
        diffuse: config.diffuse,
        specular: config.specular,
        shininess: config.shininess,
    }
}

/// Everything alive while the window is open.
///
/// Fields drop top to bottom, the reverse of how they were acquired:
/// per-frame state first, then the renderer and its GPU resources, then the
/// window, and the solar system loaded before startup last.
pub struct AppContext {
    fps: FpsCounter,
    arena: FrameArena,
    clock: SimClock,
    light: Light,
    camera: Camera,
    controller: CameraController,
    renderable: RenderableHandle,
    renderer: Renderer,
    title: String,
    window: Arc<Window>,
    system: SolarSystem,
}

impl AppContext {
    /// Open the window, start the renderer and upload the body mesh.
    fn new(
        event_loop: &ActiveEventLoop,
        config: &Config,
        system: SolarSystem,
        mesh: &Mesh,
    ) -> Result<Self, AppError> {
        let window = Arc::new(event_loop.create_window(window_attributes_from_config(config))?);
        let mut renderer = Renderer::new(window.clone(), render_settings_from_config(config))?;
        let renderable = renderer.upload_to_gpu(mesh);

        let (width, height) = renderer.size();
        let camera = camera_from_config(&config.camera, width, height);
        info!(
            "Camera at {} from the origin, {}x{}",
            format_distance(camera.distance()),
            width,
            height
        );

        Ok(Self {
            fps: FpsCounter::new(),
            arena: FrameArena::with_capacity(system.len()),
            clock: SimClock::new(config.simulation.time_step_seconds),
            light: light_from_config(&config.lighting),
            camera,
            controller: CameraController::new(
                config.camera.orbit_sensitivity,
                config.camera.dolly_sensitivity,
            ),
            system,
            renderable,
            renderer,
            title: config.window.title.clone(),
            window,
        })
    }

    /// Advance time, rebuild the frame's entity list and draw it.
    ///
    /// Returns `false` when rendering cannot continue.
    fn frame(&mut self) -> bool {
        let time = self.clock.advance();
        self.system.update(time);

        let result = {
            let mut scope = self.arena.begin_frame();
            let list = build_frame_list(&mut scope, &self.system, self.renderable);
            self.renderer.render(&list, &self.camera, &self.light)
        };

        match result {
            Ok(()) => {}
            Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
            Err(SurfaceError::Lost) => {
                warn!("Surface lost, reconfiguring");
                let size = self.window.inner_size();
                self.renderer.resize(size.width, size.height);
            }
            Err(SurfaceError::OutOfMemory) => {
                error!("GPU out of memory");
                return false;
            }
        }

        if let Some(fps) = self.fps.frame() {
            self.window.set_title(&fps_title(&self.title, fps));
        }
        true
    }

    fn resize(&mut self, width: u32, height: u32) {
        if width == 0 || height == 0 {
            return;
        }
        self.renderer.resize(width, height);
        self.camera.set_aspect_ratio(width as f32, height as f32);
        debug!("Window resized to {width}x{height}");
    }

    fn apply(&mut self, action: InputAction) {
        match action {
            InputAction::GrabCursor => set_cursor_grabbed(&self.window, true),
            InputAction::ReleaseCursor => set_cursor_grabbed(&self.window, false),
            InputAction::ToggleWireframe => {
                let on = self.renderer.toggle_wireframe();
                info!("Wireframe {}", if on { "on" } else { "off" });
            }
            InputAction::Relevel => self.camera.relevel(),
        }
    }
}

/// The winit application: holds the loaded scene until the window exists,
/// then the live [`AppContext`].
pub struct App {
    config: Config,
    pending: Option<(SolarSystem, Mesh)>,
    context: Option<AppContext>,
    error: Option<AppError>,
}

impl App {
    pub fn new(config: Config, system: SolarSystem, mesh: Mesh) -> Self {
        Self {
            config,
            pending: Some((system, mesh)),
            context: None,
            error: None,
        }
    }

    /// The fatal error that stopped the loop, if any.
    pub fn into_result(self) -> Result<(), AppError> {
        self.error.map_or(Ok(()), Err)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, err: AppError) {
        self.error = Some(err);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        let Some((system, mesh)) = self.pending.take() else {
            return;
        };
        match AppContext::new(event_loop, &self.config, system, &mesh) {
            Ok(context) => {
                context.window.request_redraw();
                self.context = Some(context);
            }
            Err(err) => self.fail(event_loop, err),
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let Some(context) = self.context.as_mut() else {
            return;
        };

        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(size) => context.resize(size.width, size.height),
            WindowEvent::MouseInput { state, button, .. } => {
                let action = context.controller.on_mouse_button(button, state);
                context.apply(action);
            }
            WindowEvent::MouseWheel { delta, .. } => {
                context.controller.on_scroll(delta, &mut context.camera);
            }
            WindowEvent::KeyboardInput { event, .. } => {
                if let Some(action) =
                    context
                        .controller
                        .on_key(&event.logical_key, event.state, event.repeat)
                {
                    context.apply(action);
                }
            }
            WindowEvent::RedrawRequested => {
                if context.frame() {
                    context.window.request_redraw();
                } else {
                    event_loop.exit();
                }
            }
            _ => {}
        }
    }

    fn device_event(&mut self, _event_loop: &ActiveEventLoop, _id: DeviceId, event: DeviceEvent) {
        if let DeviceEvent::MouseMotion { delta: (dx, dy) } = event
            && let Some(context) = self.context.as_mut()
        {
            context
                .controller
                .on_mouse_motion(dx, dy, &mut context.camera);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(context) = self.context.take() {
            info!(
                frames = context.clock.frame_count(),
                sim_days = context.clock.time() / orrery_math::SECONDS_PER_DAY,
                "Releasing renderer and window"
            );
        }
    }
}

/// Open the window and run the frame loop until it is closed.
///
/// # Errors
///
/// Event-loop failures and any error that prevented the window or renderer
/// from starting.
#[instrument(skip_all)]
pub fn run(config: Config, system: SolarSystem, mesh: Mesh) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    let mut app = App::new(config, system, mesh);
    event_loop.run_app(&mut app)?;
    app.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_attributes_use_config() {
        let mut config = Config::default();
        config.window.title = "Test".to_string();
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Test");
    }

    #[test]
    fn test_camera_from_config() {
        let config = CameraConfig::default();
        let camera = camera_from_config(&config, 1024, 768);
        assert_eq!(camera.position, DVec3::new(0.0, 0.0, config.start_distance));
        assert_eq!(camera.target, DVec3::ZERO);
        assert!((camera.fov_y - std::f64::consts::FRAC_PI_4).abs() < 1e-12);
        assert!((camera.aspect_ratio - 1024.0 / 768.0).abs() < 1e-6);
        assert_eq!(camera.near, config.near);
        assert_eq!(camera.far, config.far);
    }

    #[test]
    fn test_default_config_matches_renderer_defaults() {
        let config = Config::default();
        let settings = render_settings_from_config(&config);
        assert_eq!(settings, RenderSettings::default());
        assert_eq!(light_from_config(&config.lighting), Light::default());
    }

    #[test]
    fn test_zero_sized_camera_keeps_aspect() {
        let camera = camera_from_config(&CameraConfig::default(), 0, 0);
        assert!(camera.aspect_ratio.is_finite());
        assert!(camera.aspect_ratio > 0.0);
    }
}
