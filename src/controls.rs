//! Camera controls updated once per frame by the frame driver

use glam::Vec3;

use crate::camera::PerspectiveCamera;
use crate::core::{Button, Controller};

/// Radians of orbit per pixel of pointer drag
pub const ROTATE_SPEED: f32 = 0.005;
/// Radians of orbit per frame while an orbit key is held
pub const KEY_ROTATE_SPEED: f32 = 0.02;
/// Fraction of the distance removed per wheel line
pub const ZOOM_SPEED: f32 = 0.1;

const MAX_PITCH: f32 = 89.0_f32 * std::f32::consts::PI / 180.0;

/// Per-frame hook invoked after the scene has been drawn
pub trait Controls {
    /// Feed this frame's input; called before [`Controls::update`]
    fn handle_input(&mut self, _input: &dyn Controller) {}

    /// Apply pending motion to the camera
    fn update(&mut self, camera: &mut PerspectiveCamera);
}

/// Orbits the camera around a target point on a sphere
#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    pub target: Vec3,
    pub min_distance: f32,
    pub max_distance: f32,
    yaw: f32,
    pitch: f32,
    distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_zoom: f32,
}

impl OrbitControls {
    /// Start from the camera's current position and look-at target
    pub fn from_camera(camera: &PerspectiveCamera) -> Self {
        let target = camera.target();
        let offset = camera.position - target;
        let distance = offset.length().max(f32::EPSILON);

        Self {
            target,
            min_distance: 0.5,
            max_distance: 500.0,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / distance).clamp(-1.0, 1.0).asin(),
            distance,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 0.0,
        }
    }

    /// Queue an orbit by the given angles in radians
    pub fn rotate(&mut self, yaw: f32, pitch: f32) {
        self.pending_yaw += yaw;
        self.pending_pitch += pitch;
    }

    /// Queue a dolly; positive moves towards the target
    pub fn zoom(&mut self, steps: f32) {
        self.pending_zoom += steps;
    }

    pub fn distance(&self) -> f32 {
        self.distance
    }

    pub fn angles(&self) -> (f32, f32) {
        (self.yaw, self.pitch)
    }

    fn offset(&self) -> Vec3 {
        Vec3::new(
            self.distance * self.pitch.cos() * self.yaw.sin(),
            self.distance * self.pitch.sin(),
            self.distance * self.pitch.cos() * self.yaw.cos(),
        )
    }
}

impl Controls for OrbitControls {
    fn handle_input(&mut self, input: &dyn Controller) {
        if input.is_down(Button::MouseLeft) {
            let (dx, dy) = input.pointer_delta();
            self.rotate(-dx * ROTATE_SPEED, dy * ROTATE_SPEED);
        }

        let axis = |positive: Button, negative: Button| match (input.is_down(positive), input.is_down(negative)) {
            (true, false) => 1.0,
            (false, true) => -1.0,
            _ => 0.0,
        };
        self.rotate(
            axis(Button::Left, Button::Right) * KEY_ROTATE_SPEED,
            axis(Button::Up, Button::Down) * KEY_ROTATE_SPEED,
        );
        self.zoom(input.scroll_delta() + axis(Button::ZoomIn, Button::ZoomOut) * 0.1);
    }

    fn update(&mut self, camera: &mut PerspectiveCamera) {
        self.yaw += self.pending_yaw;
        self.pitch = (self.pitch + self.pending_pitch).clamp(-MAX_PITCH, MAX_PITCH);
        self.distance = (self.distance * (1.0 - ZOOM_SPEED).powf(self.pending_zoom))
            .clamp(self.min_distance, self.max_distance);

        self.pending_yaw = 0.0;
        self.pending_pitch = 0.0;
        self.pending_zoom = 0.0;

        camera.position = self.target + self.offset();
        camera.look_at(self.target);
    }
}
