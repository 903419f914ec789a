// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// Rec. 709 luminance of a linear RGB radiance value.
pub fn luminance(c: &Vector3f) -> Float {
    0.2126 * c.x + 0.7152 * c.y + 0.0722 * c.z
}

pub fn is_finite(c: &Vector3f) -> bool {
    c.x.is_finite() && c.y.is_finite() && c.z.is_finite()
}

/// Rescale `c` so its luminance does not exceed `max_luminance`.
/// Chroma is preserved.
pub fn clamp_luminance(c: Vector3f, max_luminance: Float) -> Vector3f {
    let l = luminance(&c);
    if l > max_luminance {
        c * (max_luminance / l)
    } else {
        c
    }
}
