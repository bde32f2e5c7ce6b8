use winit::{
    dpi::PhysicalPosition,
    event::{DeviceEvent, ElementState, KeyEvent, MouseScrollDelta},
    keyboard::{KeyCode, PhysicalKey},
    window::Window,
};

use super::orbit_camera::OrbitCamera;

/// Orbit controls: drag to rotate, shift-drag to pan, wheel to zoom
///
/// A disabled controller ignores all input, which is how presets without
/// orbit controls keep a fixed camera.
pub struct CameraController {
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub enabled: bool,
    is_shift_held: bool,
    is_mouse_pressed: bool,
}

impl CameraController {
    pub fn new(rotate_speed: f32, zoom_speed: f32) -> Self {
        Self {
            rotate_speed,
            zoom_speed,
            pan_speed: 0.01,
            enabled: true,
            is_shift_held: false,
            is_mouse_pressed: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            ..Self::new(0.0, 0.0)
        }
    }

    pub fn process_events(
        &mut self,
        event: &DeviceEvent,
        window: &Window,
        camera: &mut OrbitCamera,
    ) {
        if !self.enabled {
            return;
        }

        match event {
            DeviceEvent::Button {
                button: 0, // Left Mouse Button
                state,
            } => {
                self.is_mouse_pressed = *state == ElementState::Pressed;
            }
            DeviceEvent::MouseWheel { delta, .. } => {
                let scroll_amount = -match delta {
                    MouseScrollDelta::LineDelta(_, scroll) => *scroll,
                    MouseScrollDelta::PixelDelta(PhysicalPosition { y: scroll, .. }) => {
                        *scroll as f32
                    }
                };
                camera.add_distance(scroll_amount * self.zoom_speed);
                window.request_redraw();
            }
            DeviceEvent::MouseMotion { delta } => {
                if self.is_mouse_pressed {
                    self.apply_drag(camera, (delta.0 as f32, delta.1 as f32));
                    window.request_redraw();
                }
            }
            _ => (),
        }
    }

    /// Rotates, or pans while shift is held
    pub fn apply_drag(&self, camera: &mut OrbitCamera, delta: (f32, f32)) {
        if self.is_shift_held {
            camera.pan((-delta.0 * self.pan_speed, delta.1 * self.pan_speed));
        } else {
            camera.add_yaw(-delta.0 * self.rotate_speed);
            camera.add_pitch(delta.1 * self.rotate_speed);
        }
    }

    pub fn process_keyed_events(&mut self, event: &KeyEvent, camera: &mut OrbitCamera) {
        if !self.enabled {
            return;
        }

        match event {
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::ShiftLeft | KeyCode::ShiftRight),
                state,
                ..
            } => {
                self.is_shift_held = *state == ElementState::Pressed;
            }
            KeyEvent {
                physical_key: PhysicalKey::Code(KeyCode::KeyC),
                state: ElementState::Pressed,
                ..
            } => {
                if self.is_shift_held {
                    log::debug!("Resetting camera to its initial pose");
                    camera.reset_to_default();
                }
            }
            _ => (),
        }
    }

    /// Handles an event the UI captured
    ///
    /// Only a button release gets through, so a drag that started over the
    /// scene and ended over the UI does not keep rotating the camera.
    pub fn process_captured_event(&mut self, event: &DeviceEvent) {
        if let DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        } = event
        {
            self.release();
        }
    }

    pub fn release(&mut self) {
        self.is_mouse_pressed = false;
    }

    pub fn is_panning(&self) -> bool {
        self.is_mouse_pressed && self.is_shift_held
    }

    pub fn is_rotating(&self) -> bool {
        self.is_mouse_pressed && !self.is_shift_held
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Zero};

    #[test]
    fn test_drag_rotates_around_target() {
        let controller = CameraController::new(0.01, 0.1);
        let mut camera = OrbitCamera::new(5.0, 0.0, 0.0, Vector3::zero(), 1.0);
        controller.apply_drag(&mut camera, (-50.0, 0.0));

        assert!((camera.yaw - 0.5).abs() < 1e-6);
        let radius = (camera.eye.x.powi(2) + camera.eye.z.powi(2)).sqrt();
        assert!((radius - 5.0).abs() < 1e-4);
    }

    #[test]
    fn test_release_over_ui_ends_drag() {
        let mut controller = CameraController::new(0.01, 0.1);
        controller.is_mouse_pressed = true;

        controller.process_captured_event(&DeviceEvent::MouseMotion { delta: (4.0, 2.0) });
        assert!(controller.is_rotating());

        controller.process_captured_event(&DeviceEvent::Button {
            button: 0,
            state: ElementState::Released,
        });
        assert!(!controller.is_rotating());
        assert!(!controller.is_panning());
    }

    #[test]
    fn test_disabled_controller_state() {
        let controller = CameraController::disabled();
        assert!(!controller.enabled);
        assert!(!controller.is_rotating());
        assert!(!controller.is_panning());
    }
}
