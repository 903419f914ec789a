// Copyright @yucwang 2026

use crate::math::constants::Vector2f;
use crate::math::ray::Ray;

/// Maps an image-plane position to a primary ray. `offset` is the
/// continuous position in [0, 1)^2, `size` the extent of one pixel.
pub trait Camera: Send + Sync {
    fn sample(&self, offset: Vector2f, size: Vector2f) -> Ray;
}
