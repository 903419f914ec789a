// Copyright @yucwang 2026

use crate::core::camera::Camera;
use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::ray::Ray;

/// Ideal pinhole projection. The field of view and aspect ratio are
/// baked into two screen-plane basis vectors at construction, so ray
/// generation is a single affine map from image coordinates.
pub struct PinholeCamera {
    origin: Vector3f,
    forward: Vector3f,
    // Half-extents of the screen plane one unit along the view axis,
    // oriented along image x and image y.
    screen_x: Vector3f,
    screen_y: Vector3f,
}

impl PinholeCamera {
    pub fn new(
        origin: Vector3f,
        target: Vector3f,
        up: Vector3f,
        fov_y_radians: Float,
        aspect: Float,
    ) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(&up).normalize();
        // right and forward are orthonormal, so this is already unit.
        let true_up = right.cross(&forward);
        let half_extent = (0.5 * fov_y_radians).tan();

        Self {
            origin,
            forward,
            screen_x: right * (half_extent * aspect),
            screen_y: true_up * half_extent,
        }
    }
}

impl Camera for PinholeCamera {
    fn sample(&self, offset: Vector2f, _size: Vector2f) -> Ray {
        // [0, 1)^2 to [-1, 1]^2, with image y growing downward.
        let s = 2.0 * offset.x - 1.0;
        let t = 1.0 - 2.0 * offset.y;
        let dir = self.forward + self.screen_x * s + self.screen_y * t;
        // Ray construction normalizes the direction.
        Ray::new(self.origin, dir, 0.0)
    }
}
