use glam::Vec3;

use crate::core::DisplayContext;

pub const DEFAULT_FOV: f32 = 45.0;
pub const DEFAULT_NEAR: f32 = 1.0;
pub const DEFAULT_FAR: f32 = 1000.0;

/// Perspective camera oriented by a look-at target
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    /// Vertical field of view in degrees
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
    pub up: Vec3,
    target: Vec3,
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        Self {
            fov,
            aspect,
            near,
            far,
            position: Vec3::ZERO,
            up: Vec3::Y,
            target: Vec3::ZERO,
        }
    }

    /// Default lens with the aspect ratio of `viewport`
    pub fn for_viewport(viewport: &DisplayContext) -> Self {
        Self::new(DEFAULT_FOV, viewport.aspect(), DEFAULT_NEAR, DEFAULT_FAR)
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    /// Unit view direction; looks down -Z when position and target coincide
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Z)
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(self.up).try_normalize().unwrap_or(Vec3::X)
    }

    /// Up vector orthogonal to forward and right
    pub fn true_up(&self) -> Vec3 {
        self.right().cross(self.forward())
    }

    /// World-space ray through normalized device coordinates in [-1, 1]
    ///
    /// +Y in NDC points up; the returned direction is normalized.
    pub fn primary_ray(&self, ndc_x: f32, ndc_y: f32) -> (Vec3, Vec3) {
        let half_height = (self.fov.to_radians() * 0.5).tan();
        let half_width = half_height * self.aspect;

        let dir = self.forward()
            + self.right() * (ndc_x * half_width)
            + self.true_up() * (ndc_y * half_height);

        (self.position, dir.normalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera_at(position: Vec3) -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(45.0, 4.0 / 3.0, 1.0, 1000.0).with_position(position);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_target_defaults_to_origin() {
        let camera = PerspectiveCamera::new(45.0, 1.0, 1.0, 1000.0).with_position(Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target(), Vec3::ZERO);
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-6);
    }

    #[test]
    fn test_center_ray_hits_target() {
        let camera = camera_at(Vec3::new(1.0, 2.0, 5.0));
        let (origin, dir) = camera.primary_ray(0.0, 0.0);
        let expected = (Vec3::ZERO - origin).normalize();
        assert!((dir - expected).length() < 1e-5);
    }

    #[test]
    fn test_positive_ndc_y_points_up() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let (_, dir) = camera.primary_ray(0.0, 1.0);
        assert!(dir.y > 0.0);
        let (_, dir) = camera.primary_ray(1.0, 0.0);
        assert!(dir.x > 0.0);
    }

    #[test]
    fn test_edge_ray_matches_fov() {
        let camera = camera_at(Vec3::new(0.0, 0.0, 5.0));
        let (_, dir) = camera.primary_ray(0.0, 1.0);
        let angle = dir.angle_between(camera.forward()).to_degrees();
        assert!((angle - 22.5).abs() < 0.01);
    }

    #[test]
    fn test_degenerate_look_at() {
        let camera = camera_at(Vec3::ZERO);
        assert_eq!(camera.forward(), Vec3::NEG_Z);
        let (origin, dir) = camera.primary_ray(0.5, -0.5);
        assert!(origin.is_finite() && dir.is_finite());
    }
}
