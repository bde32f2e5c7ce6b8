use std::sync::Arc;
use std::time::Instant;

use winit::{
    application::ApplicationHandler,
    dpi::{LogicalSize, PhysicalSize},
    event::{DeviceEvent, DeviceId, ElementState, KeyEvent, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowAttributes, WindowId},
};

use crate::config::ViewerConfig;
use crate::error::{Result, TattieError};
use crate::gfx::lighting::{Color, ColorEncoding};
use crate::gfx::rendering::{FrameContext, RenderEngine};
use crate::gfx::scene::Scene;
use crate::presets::PresetSettings;
use crate::ui::{lighting_panel, UiManager};

/// The viewer application
///
/// The preset scene is built up front so that missing assets fail before a
/// window ever opens. GPU setup happens on the first `resumed` event.
pub struct TattieApp {
    event_loop: EventLoop<()>,
    app_state: AppState,
}

struct AppState {
    config: ViewerConfig,
    settings: PresetSettings,
    scene: Scene,
    window: Option<Arc<Window>>,
    render_engine: Option<RenderEngine>,
    ui_manager: Option<UiManager>,
    last_frame: Instant,
    error: Option<TattieError>,
}

impl TattieApp {
    pub fn new(config: ViewerConfig) -> Result<Self> {
        let event_loop = EventLoop::new()?;
        let (scene, settings) = config.preset.build(config.aspect(), &config.assets)?;

        Ok(Self {
            event_loop,
            app_state: AppState {
                config,
                settings,
                scene,
                window: None,
                render_engine: None,
                ui_manager: None,
                last_frame: Instant::now(),
                error: None,
            },
        })
    }

    /// Runs until the window closes
    ///
    /// Errors raised while setting up the window or GPU end the loop and are
    /// returned here.
    pub fn run(mut self) -> Result<()> {
        self.event_loop.set_control_flow(ControlFlow::Poll);
        self.event_loop.run_app(&mut self.app_state)?;

        match self.app_state.error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl AppState {
    fn init_graphics(&mut self, event_loop: &ActiveEventLoop) -> Result<()> {
        let attributes = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        let window = Arc::new(event_loop.create_window(attributes)?);

        let (width, height) = window.inner_size().into();
        let mut render_engine = pollster::block_on(RenderEngine::new(
            window.clone(),
            width,
            height,
            self.config.vsync,
        ))?;

        let requested = self.requested_encoding();
        let surface_format = render_engine.surface_format();
        if surface_format.is_srgb() && requested == ColorEncoding::Linear {
            log::warn!(
                "Surface {:?} always encodes to sRGB, linear output will look brighter",
                surface_format
            );
        }

        // The clear color is written without conversion, so an sRGB surface
        // gets it pre-decoded to land on the same stored value.
        let clear = self.config.clear_color;
        let clear = if surface_format.is_srgb() {
            Color::from_srgb(clear.r, clear.g, clear.b)
        } else {
            clear
        };
        render_engine.set_clear_color(clear.into());

        self.scene.camera_manager.resize(width, height);
        render_engine.prepare_scene(&mut self.scene);

        if self.config.show_ui {
            let mut ui_manager = UiManager::new(
                render_engine.device(),
                render_engine.queue(),
                surface_format,
                &window,
            );
            ui_manager.update_display_size(width, height);
            self.ui_manager = Some(ui_manager);
        }

        log::info!(
            "Viewer ready: preset '{}', {}x{}, {:?}",
            self.config.preset.name(),
            width,
            height,
            surface_format
        );

        self.window = Some(window);
        self.render_engine = Some(render_engine);
        Ok(())
    }

    fn requested_encoding(&self) -> ColorEncoding {
        self.config.output_encoding_for(self.settings.output_encoding)
    }

    fn fail(&mut self, event_loop: &ActiveEventLoop, error: TattieError) {
        log::error!("{}", error);
        self.error = Some(error);
        event_loop.exit();
    }

    fn handle_key(&mut self, event: &KeyEvent) {
        if event.state == ElementState::Pressed
            && event.physical_key == PhysicalKey::Code(KeyCode::Space)
            && !event.repeat
        {
            self.scene.spin_paused = !self.scene.spin_paused;
        }
        self.scene.camera_manager.process_keyboard_event(event);
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render_engine)) =
            (self.window.clone(), self.render_engine.as_mut())
        else {
            return;
        };

        let now = Instant::now();
        let dt = (now - self.last_frame).as_secs_f32();
        self.last_frame = now;

        self.scene.update(dt);

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            let scene = &mut self.scene;
            let preset = self.config.preset;
            let mut materials_changed = false;
            ui_manager.update_logic(&window, |ui| {
                materials_changed = lighting_panel(ui, scene, preset);
            });
            if materials_changed {
                render_engine.update_materials(&mut self.scene);
            }
        }

        let output_encoding = render_engine.shader_output_encoding(
            self.config
                .output_encoding_for(self.settings.output_encoding),
        );
        let frame = FrameContext::build(&self.scene, dt, output_encoding);

        let result = match self.ui_manager.as_mut() {
            Some(ui_manager) => render_engine.render_frame(
                &frame,
                &mut self.scene,
                Some(|device: &wgpu::Device,
                      queue: &wgpu::Queue,
                      encoder: &mut wgpu::CommandEncoder,
                      view: &wgpu::TextureView| {
                    ui_manager.render_display_only(device, queue, encoder, view);
                }),
            ),
            None => render_engine.render_frame_simple(&frame, &mut self.scene),
        };

        match result {
            Ok(()) => {}
            Err(wgpu::SurfaceError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
            }
            Err(error) => log::warn!("Dropped frame: {}", error),
        }
    }
}

/// Escape quits even while the UI holds keyboard focus
fn is_escape_press(event: &WindowEvent) -> bool {
    match event {
        WindowEvent::KeyboardInput { event, .. } => is_quit_key(event.physical_key, event.state),
        _ => false,
    }
}

fn is_quit_key(key: PhysicalKey, state: ElementState) -> bool {
    key == PhysicalKey::Code(KeyCode::Escape) && state == ElementState::Pressed
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() || self.error.is_some() {
            return;
        }

        if let Err(error) = self.init_graphics(event_loop) {
            self.fail(event_loop, error);
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WindowEvent,
    ) {
        let Some(window) = self.window.clone() else {
            return;
        };

        if is_escape_press(&event) {
            event_loop.exit();
            return;
        }

        if let Some(ui_manager) = self.ui_manager.as_mut() {
            if ui_manager.handle_window_event(&window, window_id, &event) {
                window.request_redraw();
                return;
            }
        }

        match event {
            WindowEvent::KeyboardInput { event, .. } => self.handle_key(&event),
            WindowEvent::Resized(PhysicalSize { width, height }) => {
                self.scene.camera_manager.resize(width, height);
                if let Some(render_engine) = self.render_engine.as_mut() {
                    render_engine.resize(width, height);
                }
                if let Some(ui_manager) = self.ui_manager.as_mut() {
                    ui_manager.update_display_size(width, height);
                }
            }
            WindowEvent::CloseRequested => event_loop.exit(),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        let Some(window) = self.window.as_ref() else {
            return;
        };

        if self
            .ui_manager
            .as_ref()
            .is_some_and(|ui_manager| ui_manager.wants_input())
        {
            self.scene.camera_manager.process_captured_event(&event);
            return;
        }

        self.scene.camera_manager.process_event(&event, window);
    }

    fn about_to_wait(&mut self, _event_loop: &ActiveEventLoop) {
        if let Some(window) = self.window.as_ref() {
            window.request_redraw();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quit_key() {
        assert!(is_quit_key(
            PhysicalKey::Code(KeyCode::Escape),
            ElementState::Pressed
        ));
        assert!(!is_quit_key(
            PhysicalKey::Code(KeyCode::Escape),
            ElementState::Released
        ));
        assert!(!is_quit_key(
            PhysicalKey::Code(KeyCode::Space),
            ElementState::Pressed
        ));
        assert!(!is_escape_press(&WindowEvent::CloseRequested));
    }
}
