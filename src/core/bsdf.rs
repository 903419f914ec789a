// Copyright @yucwang 2023

use crate::core::geometry::IntersectionInfo;
use crate::core::scene::Scene;
use crate::math::constants::{Float, Vector3f};

use std::sync::Arc;

/// Classification of a sampled scattering direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SurfaceScatteringEvent {
    Diffuse,
    Specular,
    Emission,
    Absorb,
}

impl SurfaceScatteringEvent {
    /// Delta events come from a Dirac distribution; light sampling
    /// contributes no mass to such directions.
    pub fn is_delta(event: SurfaceScatteringEvent) -> bool {
        event == SurfaceScatteringEvent::Specular
    }
}

/// A direction sampled from a material, in the shading frame.
pub struct SurfaceSample {
    pub wo: Vector3f,
    pub f: Vector3f,
    pub pdf: Float,
    pub event: SurfaceScatteringEvent,
}

/// Reflectance model in the local shading frame (normal = +z).
pub trait SurfaceMaterial: Send + Sync {
    fn evaluate(&self, wi: Vector3f, wo: Vector3f) -> Vector3f;
    fn sample(&self, wi: Vector3f, u1: Float, u2: Float) -> SurfaceSample;
    fn probability_density(&self, wi: Vector3f, wo: Vector3f) -> Float;

    fn is_emissive(&self) -> bool {
        false
    }

    fn is_delta(&self) -> bool {
        false
    }

    /// Radiance emitted into the front hemisphere; zero for
    /// non-emissive materials. Drives emissive-power light selection.
    fn emitted_radiance(&self) -> Vector3f {
        Vector3f::zeros()
    }
}

/// Orthonormal shading frame anchored at an intersection normal.
struct ShadingFrame {
    tangent: Vector3f,
    bitangent: Vector3f,
    normal: Vector3f,
}

impl ShadingFrame {
    fn new(normal: Vector3f) -> Self {
        let up = if normal.z.abs() < 0.999 {
            Vector3f::new(0.0, 0.0, 1.0)
        } else {
            Vector3f::new(1.0, 0.0, 0.0)
        };
        let tangent = normal.cross(&up).normalize();
        let bitangent = normal.cross(&tangent).normalize();
        Self { tangent, bitangent, normal }
    }

    fn to_local(&self, v: &Vector3f) -> Vector3f {
        Vector3f::new(v.dot(&self.tangent), v.dot(&self.bitangent), v.dot(&self.normal))
    }

    fn to_world(&self, v: &Vector3f) -> Vector3f {
        self.tangent * v.x + self.bitangent * v.y + self.normal * v.z
    }
}

/// A material bound to a concrete intersection: world-space directions
/// in, world-space directions out. This is the only BSDF view the
/// integrators ever see.
pub struct Bsdf {
    material: Arc<dyn SurfaceMaterial>,
    frame: ShadingFrame,
}

impl Bsdf {
    pub fn new(scene: &Scene, info: &IntersectionInfo) -> Self {
        let material = scene.material(info.triangle_id as usize).clone();
        Self {
            material,
            frame: ShadingFrame::new(info.normal),
        }
    }

    pub fn evaluate(&self, in_dir: Vector3f, out_dir: Vector3f) -> Vector3f {
        let wi = self.frame.to_local(&in_dir);
        let wo = self.frame.to_local(&out_dir);
        self.material.evaluate(wi, wo)
    }

    pub fn sample(
        &self,
        in_dir: Vector3f,
        u1: Float,
        u2: Float,
    ) -> (Vector3f, Vector3f, Float, SurfaceScatteringEvent) {
        let wi = self.frame.to_local(&in_dir);
        let sample = self.material.sample(wi, u1, u2);
        let out_dir = self.frame.to_world(&sample.wo);
        (out_dir, sample.f, sample.pdf, sample.event)
    }

    pub fn probability_density(&self, in_dir: Vector3f, out_dir: Vector3f) -> Float {
        let wi = self.frame.to_local(&in_dir);
        let wo = self.frame.to_local(&out_dir);
        self.material.probability_density(wi, wo)
    }

    pub fn is_emissive(&self) -> bool {
        self.material.is_emissive()
    }

    pub fn is_delta(&self) -> bool {
        self.material.is_delta()
    }
}
