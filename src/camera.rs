use glam::{Mat4, Vec3};

use crate::core::SurfaceSize;

pub const FOV_Y_DEGREES: f32 = 75.0;
pub const NEAR: f32 = 0.1;
pub const FAR: f32 = 100.0;

/// Fixed perspective camera looking down -Z
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerspectiveCamera {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    pub position: Vec3,
}

impl PerspectiveCamera {
    pub fn new(size: SurfaceSize) -> Self {
        let mut camera = Self {
            fov_y_degrees: FOV_Y_DEGREES,
            aspect: 1.0,
            near: NEAR,
            far: FAR,
            position: Vec3::new(0.0, 0.0, 3.0),
        };
        camera.set_aspect(size);
        camera
    }

    /// Recomputes the aspect ratio; empty sizes keep the previous value
    pub fn set_aspect(&mut self, size: SurfaceSize) {
        if !size.is_empty() {
            self.aspect = size.width as f32 / size.height as f32;
        }
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y_degrees.to_radians(), self.aspect, self.near, self.far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection() * self.view()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_follows_surface() {
        let mut camera = PerspectiveCamera::new(SurfaceSize::new(1024, 768));
        assert_eq!(camera.aspect, 1024.0 / 768.0);

        camera.set_aspect(SurfaceSize::new(500, 1000));
        assert_eq!(camera.aspect, 0.5);

        camera.set_aspect(SurfaceSize::new(0, 1000));
        assert_eq!(camera.aspect, 0.5);
    }

    #[test]
    fn origin_projects_to_screen_center() {
        let camera = PerspectiveCamera::new(SurfaceSize::new(800, 600));
        let clip = camera.view_projection() * Vec3::ZERO.extend(1.0);
        let ndc = clip.truncate() / clip.w;
        assert!(ndc.x.abs() < 1e-6 && ndc.y.abs() < 1e-6);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn points_behind_camera_are_clipped() {
        let camera = PerspectiveCamera::new(SurfaceSize::new(800, 600));
        let clip = camera.view_projection() * Vec3::new(0.0, 0.0, 5.0).extend(1.0);
        assert!(clip.w < 0.0);
    }
}
