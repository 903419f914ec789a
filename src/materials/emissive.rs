// Copyright @yucwang 2026

use crate::core::bsdf::{SurfaceMaterial, SurfaceSample, SurfaceScatteringEvent};
use crate::math::constants::{Float, Vector3f};

/// One-sided diffuse area light. Evaluation returns the emitted
/// radiance for directions leaving the front face; the path tracer
/// terminates on emissive hits, so this material never scatters.
pub struct AreaLightMaterial {
    radiance: Vector3f,
}

impl AreaLightMaterial {
    pub fn new(radiance: Vector3f) -> Self {
        Self { radiance }
    }
}

impl SurfaceMaterial for AreaLightMaterial {
    fn evaluate(&self, _wi: Vector3f, wo: Vector3f) -> Vector3f {
        if wo.z > 0.0 {
            self.radiance
        } else {
            Vector3f::zeros()
        }
    }

    fn sample(&self, _wi: Vector3f, _u1: Float, _u2: Float) -> SurfaceSample {
        SurfaceSample {
            wo: Vector3f::new(0.0, 0.0, 1.0),
            f: Vector3f::zeros(),
            pdf: 0.0,
            event: SurfaceScatteringEvent::Emission,
        }
    }

    fn probability_density(&self, _wi: Vector3f, _wo: Vector3f) -> Float {
        0.0
    }

    fn is_emissive(&self) -> bool {
        true
    }

    fn emitted_radiance(&self) -> Vector3f {
        self.radiance
    }
}
