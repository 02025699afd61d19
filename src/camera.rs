//! Orbit camera with view and projection matrices.

use glam::{Mat4, Vec3};

/// Camera orbiting a fixed target point.
///
/// The eye position is derived from spherical coordinates (yaw, pitch,
/// distance) around `target`, so rotating and zooming never drift the
/// look-at point.
#[derive(Debug, Clone)]
pub struct OrbitCamera {
    /// Point the camera looks at and orbits around.
    pub target: Vec3,
    /// Horizontal angle around the target, in radians.
    pub yaw: f32,
    /// Vertical angle above the target plane, in radians.
    pub pitch: f32,
    /// Distance from the target to the eye.
    pub distance: f32,
    /// Field of view in radians.
    pub fov: f32,
    /// Aspect ratio (width/height).
    pub aspect: f32,
    /// Near clip plane.
    pub near: f32,
    /// Far clip plane.
    pub far: f32,
}

impl OrbitCamera {
    /// Create a camera from an explicit eye position looking at a target.
    pub fn from_eye(eye: Vec3, target: Vec3, fov: f32, aspect: f32) -> Self {
        let offset = eye - target;
        let distance = offset.length().max(f32::EPSILON);
        let pitch = (offset.y / distance).asin();
        let yaw = offset.z.atan2(offset.x);

        Self {
            target,
            yaw,
            pitch,
            distance,
            fov,
            aspect,
            near: 0.1,
            far: 1000.0,
        }
    }

    /// Eye position in world space.
    pub fn eye(&self) -> Vec3 {
        let (yaw_sin, yaw_cos) = self.yaw.sin_cos();
        let (pitch_sin, pitch_cos) = self.pitch.sin_cos();
        self.target
            + self.distance
                * Vec3::new(pitch_cos * yaw_cos, pitch_sin, pitch_cos * yaw_sin)
    }

    /// Build the view matrix.
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    /// Build the projection matrix.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect, self.near, self.far)
    }

    /// Build combined view-projection matrix.
    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Update aspect ratio (call when the window resizes).
    pub fn set_aspect(&mut self, aspect: f32) {
        self.aspect = aspect;
    }
}

/// Damped orbit control state driving an [`OrbitCamera`].
///
/// Input nudges the target angles/distance; `apply` eases the camera toward
/// them each frame so the motion keeps a little inertia.
#[derive(Debug, Clone)]
pub struct OrbitController {
    target_yaw: f32,
    target_pitch: f32,
    target_distance: f32,
    /// Fraction of the remaining delta applied per frame (0..1].
    pub damping: f32,
    /// Minimum allowed orbit distance.
    pub min_distance: f32,
    /// Maximum allowed orbit distance.
    pub max_distance: f32,
}

impl OrbitController {
    /// Create a controller seeded from the camera's current pose.
    pub fn new(camera: &OrbitCamera, damping: f32, min_distance: f32, max_distance: f32) -> Self {
        Self {
            target_yaw: camera.yaw,
            target_pitch: camera.pitch,
            target_distance: camera.distance.clamp(min_distance, max_distance),
            damping,
            min_distance,
            max_distance,
        }
    }

    /// Rotate by yaw/pitch deltas. Pitch stays strictly inside +/- 90 degrees.
    pub fn rotate(&mut self, yaw_delta: f32, pitch_delta: f32) {
        self.target_yaw += yaw_delta;
        self.target_pitch = (self.target_pitch + pitch_delta).clamp(
            -std::f32::consts::FRAC_PI_2 + 0.001,
            std::f32::consts::FRAC_PI_2 - 0.001,
        );
    }

    /// Zoom by a scroll delta (positive = closer), clamped to the distance limits.
    pub fn zoom(&mut self, scroll_delta: f32) {
        self.target_distance = (self.target_distance - scroll_delta)
            .clamp(self.min_distance, self.max_distance);
    }

    /// Ease the camera toward the controller targets for one frame.
    pub fn apply(&self, camera: &mut OrbitCamera) {
        camera.yaw += (self.target_yaw - camera.yaw) * self.damping;
        camera.pitch += (self.target_pitch - camera.pitch) * self.damping;
        camera.distance += (self.target_distance - camera.distance) * self.damping;
    }

    /// Snap the camera to the controller targets immediately.
    pub fn snap(&self, camera: &mut OrbitCamera) {
        camera.yaw = self.target_yaw;
        camera.pitch = self.target_pitch;
        camera.distance = self.target_distance;
    }
}

/// Uniform data sent to the GPU for camera transforms.
#[repr(C)]
#[derive(Debug, Copy, Clone, bytemuck::Pod, bytemuck::Zeroable)]
pub struct CameraUniform {
    /// View-projection matrix
    pub view_proj: [[f32; 4]; 4],
    /// Camera position in world space
    pub camera_pos: [f32; 4],
}

impl CameraUniform {
    /// Create camera uniform from camera.
    pub fn from_camera(camera: &OrbitCamera) -> Self {
        let eye = camera.eye();
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: [eye.x, eye.y, eye.z, 1.0],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_eye_roundtrip() {
        let eye = Vec3::new(3.0, 3.0, 5.0);
        let camera = OrbitCamera::from_eye(eye, Vec3::ZERO, 75f32.to_radians(), 16.0 / 9.0);

        let recovered = camera.eye();
        assert!((recovered - eye).length() < 0.001);
    }

    #[test]
    fn test_pitch_clamp() {
        let camera = OrbitCamera::from_eye(Vec3::new(3.0, 3.0, 5.0), Vec3::ZERO, 1.3, 1.0);
        let mut controller = OrbitController::new(&camera, 0.1, 3.0, 10.0);

        controller.rotate(0.0, std::f32::consts::PI);
        let mut camera = camera;
        controller.snap(&mut camera);
        assert!(camera.pitch < std::f32::consts::FRAC_PI_2);

        controller.rotate(0.0, -std::f32::consts::PI * 2.0);
        controller.snap(&mut camera);
        assert!(camera.pitch > -std::f32::consts::FRAC_PI_2);
    }

    #[test]
    fn test_zoom_clamp() {
        let camera = OrbitCamera::from_eye(Vec3::new(3.0, 3.0, 5.0), Vec3::ZERO, 1.3, 1.0);
        let mut controller = OrbitController::new(&camera, 0.1, 3.0, 10.0);
        let mut camera = camera;

        controller.zoom(100.0);
        controller.snap(&mut camera);
        assert!((camera.distance - 3.0).abs() < 0.001);

        controller.zoom(-100.0);
        controller.snap(&mut camera);
        assert!((camera.distance - 10.0).abs() < 0.001);
    }

    #[test]
    fn test_damping_converges() {
        let mut camera = OrbitCamera::from_eye(Vec3::new(3.0, 3.0, 5.0), Vec3::ZERO, 1.3, 1.0);
        let mut controller = OrbitController::new(&camera, 0.1, 3.0, 10.0);
        controller.rotate(1.0, 0.2);

        for _ in 0..200 {
            controller.apply(&mut camera);
        }

        let mut snapped = camera.clone();
        controller.snap(&mut snapped);
        assert!((camera.yaw - snapped.yaw).abs() < 0.001);
        assert!((camera.pitch - snapped.pitch).abs() < 0.001);
    }

    #[test]
    fn test_view_projection_matrix() {
        let camera = OrbitCamera::from_eye(Vec3::new(3.0, 3.0, 5.0), Vec3::ZERO, 1.3, 16.0 / 9.0);
        let vp = camera.view_projection_matrix();

        // Matrix should be invertible
        assert!(vp.determinant().abs() > 0.0);
    }
}
