// Copyright @yucwang 2023

use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray;

/// A single triangle with a precomputed geometric normal and area. The
/// id is assigned by the scene when the triangle is registered.
#[derive(Debug, Clone)]
pub struct Triangle {
    p0: Vector3f,
    p1: Vector3f,
    p2: Vector3f,
    normal: Vector3f,
    area: Float,
    id: usize,
}

impl Triangle {
    pub fn new(p0: Vector3f, p1: Vector3f, p2: Vector3f) -> Self {
        let cross = (p1 - p0).cross(&(p2 - p0));
        let area = 0.5 * cross.norm();
        let normal = if area > 0.0 {
            cross.normalize()
        } else {
            Vector3f::new(0.0, 0.0, 1.0)
        };
        Self { p0, p1, p2, normal, area, id: 0 }
    }

    pub(crate) fn with_id(mut self, id: usize) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> usize {
        self.id
    }

    pub fn normal(&self) -> Vector3f {
        self.normal
    }

    pub fn area(&self) -> Float {
        self.area
    }

    /// Signed distance from `p` to the support plane; positive on the
    /// side the normal points into.
    pub fn get_relative_location_to_plane(&self, p: Vector3f) -> Float {
        (p - self.p0).dot(&self.normal)
    }

    /// Uniform point on the surface from two unit uniforms.
    pub fn sample_point(&self, u1: Float, u2: Float) -> Vector3f {
        let su = u1.sqrt();
        self.p0 * (1.0 - su) + self.p1 * (su * (1.0 - u2)) + self.p2 * (su * u2)
    }

    /// Möller–Trumbore. Hits closer than the ray's minimum distance are
    /// ignored.
    pub fn intersect(&self, ray: &Ray) -> Option<Float> {
        let e1 = self.p1 - self.p0;
        let e2 = self.p2 - self.p0;
        let pvec = ray.dir().cross(&e2);
        let det = e1.dot(&pvec);
        if det.abs() < 1e-12 {
            return None;
        }
        let inv_det = 1.0 / det;
        let tvec = ray.orig() - self.p0;
        let u = tvec.dot(&pvec) * inv_det;
        if !(0.0..=1.0).contains(&u) {
            return None;
        }
        let qvec = tvec.cross(&e1);
        let v = ray.dir().dot(&qvec) * inv_det;
        if v < 0.0 || u + v > 1.0 {
            return None;
        }
        let t = e2.dot(&qvec) * inv_det;
        if t <= ray.min_dist() {
            return None;
        }
        Some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn xy_triangle() -> Triangle {
        Triangle::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(2.0, 0.0, 0.0),
            Vector3f::new(0.0, 2.0, 0.0),
        )
    }

    #[test]
    fn test_area_and_normal() {
        let tri = xy_triangle();
        assert!((tri.area() - 2.0).abs() < 1e-5);
        assert!((tri.normal() - Vector3f::new(0.0, 0.0, 1.0)).norm() < 1e-5);
    }

    #[test]
    fn test_relative_location_sign() {
        let tri = xy_triangle();
        assert!(tri.get_relative_location_to_plane(Vector3f::new(0.0, 0.0, 1.0)) > 0.0);
        assert!(tri.get_relative_location_to_plane(Vector3f::new(0.0, 0.0, -1.0)) < 0.0);
    }

    #[test]
    fn test_sample_point_stays_on_triangle() {
        let tri = xy_triangle();
        let us = [(0.0, 0.0), (0.9, 0.1), (0.5, 0.5), (0.2, 0.8), (0.999, 0.999)];
        for (u1, u2) in us {
            let p = tri.sample_point(u1, u2);
            // On the plane.
            assert!(tri.get_relative_location_to_plane(p).abs() < 1e-5);
            // Inside the barycentric simplex.
            assert!(p.x >= -1e-5 && p.y >= -1e-5);
            assert!(p.x / 2.0 + p.y / 2.0 <= 1.0 + 1e-5);
        }
    }

    #[test]
    fn test_intersect_hit_and_miss() {
        let tri = xy_triangle();
        let hit = Ray::new(Vector3f::new(0.5, 0.5, 3.0), Vector3f::new(0.0, 0.0, -1.0), 0.0);
        let t = tri.intersect(&hit).expect("expected intersection");
        assert!((t - 3.0).abs() < 1e-5);

        let miss = Ray::new(Vector3f::new(3.0, 3.0, 3.0), Vector3f::new(0.0, 0.0, -1.0), 0.0);
        assert!(tri.intersect(&miss).is_none());

        let parallel = Ray::new(Vector3f::new(0.5, 0.5, 3.0), Vector3f::new(1.0, 0.0, 0.0), 0.0);
        assert!(tri.intersect(&parallel).is_none());
    }

    #[test]
    fn test_intersect_honours_min_dist() {
        let tri = xy_triangle();
        let ray = Ray::new(Vector3f::new(0.5, 0.5, 3.0), Vector3f::new(0.0, 0.0, -1.0), 4.0);
        assert!(tri.intersect(&ray).is_none());
    }
}
