//! First-person camera state and the projection/view math.
//!
//! One convention is used crate-wide, including the shader: right-handed
//! world with +Y up, column vectors, and `projection * view * model`
//! composition. Clip-space depth is wgpu's 0..1 range. Yaw 0 looks toward
//! +Z and grows turning toward +X; pitch is positive looking up.
//!
//! All angles are radians; distances are scene-arbitrary world units.

use glam::{Mat4, Vec3};

/// Pitch is clamped just short of straight up/down so the view basis never
/// becomes collinear with world up, which would degenerate `look_at`.
pub const PITCH_LIMIT: f32 = std::f32::consts::FRAC_PI_2 - 0.01;

/// Camera pose and projection parameters.
///
/// Mutated once per frame by the controller; owned by the frame loop.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
    /// World-space position.
    pub position: Vec3,
    /// Rotation about the vertical axis, radians.
    pub yaw: f32,
    /// Rotation about the horizontal axis, radians, within [`PITCH_LIMIT`].
    pub pitch: f32,
    /// Vertical field of view, radians.
    pub fov: f32,
    /// Near clipping plane.
    pub near: f32,
    /// Far clipping plane.
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            yaw: 0.0,
            pitch: 0.0,
            fov: std::f32::consts::FRAC_PI_3,
            near: 0.1,
            far: 1000.0,
        }
    }
}

impl Camera {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Set the vertical field of view in degrees.
    pub fn fov(mut self, fov_degrees: f32) -> Self {
        self.fov = fov_degrees.to_radians();
        self
    }

    pub fn clip_planes(mut self, near: f32, far: f32) -> Self {
        self.near = near;
        self.far = far;
        self
    }

    /// Unit forward vector from yaw and pitch.
    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.sin() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.cos() * self.pitch.cos(),
        )
    }

    /// Horizontal forward vector from yaw alone; movement ignores pitch.
    pub fn heading(&self) -> Vec3 {
        Vec3::new(self.yaw.sin(), 0.0, self.yaw.cos())
    }

    /// Horizontal right vector, for strafing.
    pub fn right(&self) -> Vec3 {
        Vec3::new(self.yaw.cos(), 0.0, -self.yaw.sin())
    }

    /// The point one unit ahead along the view direction.
    pub fn look_target(&self) -> Vec3 {
        self.position + self.forward()
    }

    /// World-to-camera transform.
    ///
    /// Precondition: pitch within [`PITCH_LIMIT`], so the forward vector is
    /// never parallel to world up.
    pub fn view_matrix(&self) -> Mat4 {
        debug_assert!(self.pitch.abs() <= PITCH_LIMIT);
        Mat4::look_at_rh(self.position, self.look_target(), Vec3::Y)
    }

    /// Camera-to-clip transform for the given viewport aspect ratio,
    /// recomputed each frame to track resizes.
    ///
    /// Degenerate parameters (`aspect == 0`, `near == far`) are programmer
    /// errors, checked in debug builds rather than handled.
    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        debug_assert!(aspect > 0.0);
        debug_assert!(self.fov > 0.0 && self.fov < std::f32::consts::PI);
        debug_assert!(0.0 < self.near && self.near < self.far);
        Mat4::perspective_rh(self.fov, aspect, self.near, self.far)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Mat3;

    #[test]
    fn identity_is_multiplicative_identity() {
        let m = Camera::new()
            .position(Vec3::new(3.0, 1.0, -2.0))
            .projection_matrix(1.6)
            * Mat4::from_translation(Vec3::new(0.5, 0.25, 4.0));
        assert_eq!(Mat4::IDENTITY * m, m);
        assert_eq!(m * Mat4::IDENTITY, m);
    }

    #[test]
    fn perspective_maps_near_and_far_plane_centers() {
        let camera = Camera::new().clip_planes(0.1, 1000.0);
        let proj = camera.projection_matrix(16.0 / 9.0);

        // Eye space looks down -Z; wgpu clip depth runs 0 (near) to 1 (far).
        let near = proj.project_point3(Vec3::new(0.0, 0.0, -camera.near));
        let far = proj.project_point3(Vec3::new(0.0, 0.0, -camera.far));
        assert!(near.z.abs() < 1e-6);
        assert!((far.z - 1.0).abs() < 1e-4);
    }

    #[test]
    fn view_basis_is_orthonormal() {
        let mut camera = Camera::new().position(Vec3::new(4.0, 2.0, -7.0));
        camera.yaw = 1.2;
        camera.pitch = -0.7;

        let basis = Mat3::from_mat4(camera.view_matrix());
        let product = basis * basis.transpose();
        assert!(product.abs_diff_eq(Mat3::IDENTITY, 1e-5));
    }

    #[test]
    fn forward_is_unit_length_everywhere() {
        let mut camera = Camera::new();
        for yaw in [-3.0f32, -0.4, 0.0, 1.0, 2.9] {
            for pitch in [-1.5f32, -0.3, 0.0, 0.8, 1.5] {
                camera.yaw = yaw;
                camera.pitch = pitch;
                assert!((camera.forward().length() - 1.0).abs() < 1e-6);
            }
        }
    }

    #[test]
    fn yaw_zero_faces_positive_z() {
        let camera = Camera::new().position(Vec3::new(0.0, 2.0, 15.0));
        assert!(camera.forward().abs_diff_eq(Vec3::Z, 1e-6));
        assert!(camera.right().abs_diff_eq(Vec3::X, 1e-6));
        assert!(
            camera
                .look_target()
                .abs_diff_eq(Vec3::new(0.0, 2.0, 16.0), 1e-6)
        );
    }

    #[test]
    fn heading_ignores_pitch() {
        let mut camera = Camera::new();
        camera.yaw = 0.9;
        camera.pitch = 1.2;
        let heading = camera.heading();
        assert_eq!(heading.y, 0.0);
        assert!((heading.length() - 1.0).abs() < 1e-6);
    }
}
