//! Top-down camera following the player

use asteroids_engine::foundation::math::{Mat4, Point3, Vec3};

use crate::config::CameraConfig;

/// Height the camera looks down from
const EYE_HEIGHT: f32 = 10.0;

const Z_NEAR: f32 = 0.1;
const Z_FAR: f32 = 10_000.0;

/// Orthographic camera centered on a target in the XY plane
#[derive(Debug, Clone)]
pub struct Camera {
    half_width: f32,
    min_half_width: f32,
    max_half_width: f32,
    zoom_speed: f32,
    aspect: f32,
    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Camera at its narrowest zoom for a `viewport` in pixels
    #[must_use]
    pub fn new(config: &CameraConfig, viewport: (u32, u32)) -> Self {
        let min_half_width = config.min_half_width.min(config.max_half_width);
        let (width, height) = viewport;
        #[allow(clippy::cast_precision_loss)]
        let aspect = if height == 0 { 1.0 } else { width as f32 / height as f32 };

        let mut camera = Self {
            half_width: min_half_width,
            min_half_width,
            max_half_width: config.max_half_width,
            zoom_speed: config.zoom_speed,
            aspect,
            view: Mat4::identity(),
            projection: Mat4::identity(),
        };
        camera.follow(&Vec3::zeros());
        camera
    }

    /// Narrow the view by `zoom_speed * delta_time`, down to the minimum
    pub fn zoom_in(&mut self, delta_time: f32) {
        self.half_width = (self.half_width - self.zoom_speed * delta_time).max(self.min_half_width);
    }

    /// Widen the view by `zoom_speed * delta_time`, up to the maximum
    pub fn zoom_out(&mut self, delta_time: f32) {
        self.half_width = (self.half_width + self.zoom_speed * delta_time).min(self.max_half_width);
    }

    /// Center the view on `target` and refresh both matrices
    pub fn follow(&mut self, target: &Vec3) {
        let eye = Point3::new(target.x, target.y, EYE_HEIGHT);
        let center = Point3::new(target.x, target.y, 0.0);
        self.view = Mat4::look_at_rh(&eye, &center, &Vec3::y());

        let half_height = self.half_width;
        let half_width = self.half_width * self.aspect;
        self.projection = Mat4::new_orthographic(-half_width, half_width, -half_height, half_height, Z_NEAR, Z_FAR);
    }

    /// World-to-camera transform
    #[must_use]
    pub const fn view(&self) -> &Mat4 {
        &self.view
    }

    /// Camera-to-clip transform
    #[must_use]
    pub const fn projection(&self) -> &Mat4 {
        &self.projection
    }

    /// Current vertical half-extent of the view
    #[must_use]
    pub const fn half_width(&self) -> f32 {
        self.half_width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_zoom_is_clamped() {
        let mut camera = Camera::new(&CameraConfig::default(), (1024, 768));
        camera.zoom_in(1.0);
        assert_relative_eq!(camera.half_width(), 1_000.0);

        camera.zoom_out(1.0);
        assert_relative_eq!(camera.half_width(), 1_600.0);
        camera.zoom_out(1_000.0);
        assert_relative_eq!(camera.half_width(), 100_000.0);
    }

    #[test]
    fn test_target_maps_to_view_center() {
        let mut camera = Camera::new(&CameraConfig::default(), (800, 800));
        let target = Vec3::new(250.0, -40.0, 0.0);
        camera.follow(&target);

        let clip = camera.projection() * camera.view() * target.push(1.0);
        assert_relative_eq!(clip.x, 0.0, epsilon = 1e-4);
        assert_relative_eq!(clip.y, 0.0, epsilon = 1e-4);
    }

    #[test]
    fn test_projection_respects_aspect() {
        let camera = Camera::new(&CameraConfig::default(), (2000, 1000));
        let edge = camera.projection() * camera.view() * Vec3::new(2_000.0, 1_000.0, 0.0).push(1.0);
        assert_relative_eq!(edge.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(edge.y, 1.0, epsilon = 1e-4);
    }
}
