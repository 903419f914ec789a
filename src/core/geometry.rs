// Copyright @yucwang 2026

use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};
use crate::math::ray::Ray;

use std::sync::Arc;

/// Result of a closest-hit query. `triangle_id` plus the scene is enough
/// to rebuild shading state at the hit.
pub struct IntersectionInfo {
    pub intersected: bool,
    pub dist: Float,
    pub pos: Vector3f,
    pub normal: Vector3f,
    pub front: bool,
    pub triangle_id: i64,
}

impl IntersectionInfo {
    pub fn miss() -> Self {
        Self {
            intersected: false,
            dist: Float::INFINITY,
            pos: Vector3f::zeros(),
            normal: Vector3f::zeros(),
            front: false,
            triangle_id: -1,
        }
    }
}

/// Closest-hit oracle over the scene geometry.
pub trait SceneGeometry: Send + Sync {
    fn query(&self, ray: &Ray) -> IntersectionInfo;

    fn query_hit_triangle_id(&self, ray: &Ray) -> i64 {
        self.query(ray).triangle_id
    }
}

/// Linear scan over the scene's triangle list. Plenty at the scale the
/// core is exercised; an acceleration structure drops in behind the same
/// trait.
pub struct BruteForceGeometry {
    scene: Arc<Scene>,
}

impl BruteForceGeometry {
    pub fn new(scene: Arc<Scene>) -> Self {
        Self { scene }
    }
}

impl SceneGeometry for BruteForceGeometry {
    fn query(&self, ray: &Ray) -> IntersectionInfo {
        let mut closest = IntersectionInfo::miss();
        for triangle in self.scene.triangles() {
            if let Some(t) = triangle.intersect(ray) {
                if t < closest.dist {
                    let normal = triangle.normal();
                    closest = IntersectionInfo {
                        intersected: true,
                        dist: t,
                        pos: ray.at(t),
                        normal,
                        front: ray.dir().dot(&normal) < 0.0,
                        triangle_id: triangle.id() as i64,
                    };
                }
            }
        }
        closest
    }
}
