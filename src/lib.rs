//! # Skytower
//!
//! A first-person fly-through of a procedural tower cityscape: a grid of
//! color-faced cube buildings around one tall central tower, rendered with
//! wgpu and steered with WASD plus mouse look.
//!
//! The crate splits along the frame's data flow. Input state feeds the
//! [`FirstPerson`] controller, which mutates the [`Camera`]; the camera
//! yields the frame's view and projection matrices; [`CityLayout`] produces
//! a model transform per building; and the [`ScenePass`] uploads the
//! matrices and issues one indexed draw per object against the shared cube
//! [`Mesh`]. Everything up to the pass is pure and runs headless, so the
//! whole steering-and-transform path is unit tested without a GPU.
//!
//! ```no_run
//! use skytower::AppConfig;
//!
//! fn main() -> anyhow::Result<()> {
//!     skytower::run(AppConfig::new().title("Skytower").size(1280, 720))
//! }
//! ```
//!
//! An immersive (VR) session is modeled by the [`XrSession`] state machine;
//! while a session is active its [`PoseProvider`] supplies the view matrix
//! in place of the desktop camera's.

mod app;
mod camera;
mod controller;
mod gpu;
mod input;
mod mesh;
mod scene;
mod scene_pass;
mod xr;

pub use app::{AppConfig, run};
pub use camera::{Camera, PITCH_LIMIT};
pub use controller::{CLIMB_SPEED, CameraSnapshot, FirstPerson, LOOK_SENSITIVITY, MOVE_SPEED};
pub use gpu::{GpuContext, GpuError};
pub use input::{Action, Input};
pub use mesh::{FACE_PALETTE, Geometry, Mesh, Transform, Vertex};
pub use scene::CityLayout;
pub use scene_pass::{FrameCamera, LIGHT_POSITION, ScenePass};
pub use xr::{PoseProvider, SessionState, TransitionError, XrSession};

// Re-export the math types appearing in the public API
pub use glam::{Mat4, Vec2, Vec3};

// Re-export commonly used winit types for convenience
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;
