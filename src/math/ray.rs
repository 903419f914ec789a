// Copyright 2020 @TwoCookingMice

use super::constants::{Float, Vector3f};

/// A half-line with a minimum parametric distance below which hits are
/// ignored, so a ray leaving a surface does not immediately re-hit it.
/// Immutable once constructed.
pub struct Ray {
    orig: Vector3f,
    dir: Vector3f,
    min_dist: Float,
}

impl Ray {
    pub fn new(orig: Vector3f, dir: Vector3f, min_dist: Float) -> Self {
        Self { orig, dir: dir.normalize(), min_dist }
    }

    pub fn orig(&self) -> Vector3f {
        self.orig
    }

    pub fn dir(&self) -> Vector3f {
        self.dir
    }

    pub fn min_dist(&self) -> Float {
        self.min_dist
    }

    pub fn at(&self, t: Float) -> Vector3f {
        self.orig + self.dir * t
    }
}

/* Tests for Ray */

#[cfg(test)]
mod tests {
    use super::{Ray, Vector3f};

    #[test]
    fn test_ray_normalizes_direction() {
        let o = Vector3f::new(0.0, 0.0, 0.0);
        let d = Vector3f::new(2.0, 0.0, 0.0);
        let ray = Ray::new(o, d, 0.0);
        assert_eq!(o, ray.orig());
        assert!((ray.dir().norm() - 1.0).abs() < 1e-6);

        let p = ray.at(3.0);
        assert!((p.x - 3.0).abs() < 1e-6);
        assert!(p.y.abs() < 1e-6);
        assert!(p.z.abs() < 1e-6);
    }

    #[test]
    fn test_ray_min_dist() {
        let ray = Ray::new(Vector3f::zeros(), Vector3f::new(0.0, 0.0, 1.0), 1e-5);
        assert_eq!(ray.min_dist(), 1e-5);
    }
}
