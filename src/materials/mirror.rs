// Copyright @yucwang 2026

use crate::core::bsdf::{SurfaceMaterial, SurfaceSample, SurfaceScatteringEvent};
use crate::math::constants::{Float, Vector3f};

/// Perfect specular reflector. Sampling is the only way to get a
/// direction out of it; evaluation against an arbitrary direction pair
/// is zero because the lobe is a delta.
pub struct MirrorMaterial {
    reflectance: Vector3f,
}

impl MirrorMaterial {
    pub fn new(reflectance: Vector3f) -> Self {
        Self { reflectance }
    }
}

impl SurfaceMaterial for MirrorMaterial {
    fn evaluate(&self, _wi: Vector3f, _wo: Vector3f) -> Vector3f {
        Vector3f::zeros()
    }

    fn sample(&self, wi: Vector3f, _u1: Float, _u2: Float) -> SurfaceSample {
        let wo = Vector3f::new(-wi.x, -wi.y, wi.z);
        let cos_theta = wo.z.abs().max(1e-6);
        SurfaceSample {
            wo,
            // The cosine applied by the integrator cancels here.
            f: self.reflectance / cos_theta,
            pdf: 1.0,
            event: SurfaceScatteringEvent::Specular,
        }
    }

    fn probability_density(&self, _wi: Vector3f, _wo: Vector3f) -> Float {
        0.0
    }

    fn is_delta(&self) -> bool {
        true
    }
}
