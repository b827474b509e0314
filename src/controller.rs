//! Per-frame first-person steering.
//!
//! Motion is direct position integration at a fixed per-frame step: holding
//! an action displaces the camera by a constant amount each frame, with no
//! velocity or inertia. The step is per *frame*, not wall-clock-scaled;
//! frame pacing comes from vsync. A deliberate simplification, not a gap
//! waiting for dt-scaling and acceleration curves.

use glam::Vec3;

use crate::camera::{Camera, PITCH_LIMIT};
use crate::input::{Action, Input};

/// World units moved per frame while a horizontal action is held.
pub const MOVE_SPEED: f32 = 0.15;
/// Vertical motion runs at half the horizontal rate.
pub const CLIMB_SPEED: f32 = MOVE_SPEED * 0.5;
/// Radians of yaw/pitch per pixel of mouse travel.
pub const LOOK_SENSITIVITY: f32 = 0.005;

/// Read-only camera pose emitted once per frame for status display.
/// Formatting is the host's concern.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraSnapshot {
    pub position: Vec3,
    pub yaw: f32,
    pub pitch: f32,
}

/// First-person steering applied to a [`Camera`] once per frame.
#[derive(Clone, Copy, Debug)]
pub struct FirstPerson {
    pub move_speed: f32,
    pub climb_speed: f32,
    pub sensitivity: f32,
}

impl Default for FirstPerson {
    fn default() -> Self {
        Self {
            move_speed: MOVE_SPEED,
            climb_speed: CLIMB_SPEED,
            sensitivity: LOOK_SENSITIVITY,
        }
    }
}

impl FirstPerson {
    pub fn new() -> Self {
        Self::default()
    }

    /// Advances the camera one frame.
    ///
    /// Held actions displace the position first. The horizontal basis comes
    /// from yaw alone so looking up never slows walking, and vertical actions
    /// run along world Y regardless of view direction. The consumed look
    /// delta then turns the camera: dragging right turns right, dragging up
    /// looks up, and pitch is clamped to [`PITCH_LIMIT`].
    pub fn steer(&self, camera: &mut Camera, input: &mut Input) -> CameraSnapshot {
        let heading = camera.heading();
        let right = camera.right();

        if input.action_down(Action::Forward) {
            camera.position += heading * self.move_speed;
        }
        if input.action_down(Action::Back) {
            camera.position -= heading * self.move_speed;
        }
        if input.action_down(Action::Right) {
            camera.position += right * self.move_speed;
        }
        if input.action_down(Action::Left) {
            camera.position -= right * self.move_speed;
        }
        if input.action_down(Action::Up) {
            camera.position.y += self.climb_speed;
        }
        if input.action_down(Action::Down) {
            camera.position.y -= self.climb_speed;
        }

        let look = input.take_look_delta();
        camera.yaw += look.x * self.sensitivity;
        camera.pitch = (camera.pitch - look.y * self.sensitivity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        CameraSnapshot {
            position: camera.position,
            yaw: camera.yaw,
            pitch: camera.pitch,
        }
    }
}
