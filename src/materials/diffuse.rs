// Copyright @yucwang 2023

use crate::core::bsdf::{SurfaceMaterial, SurfaceSample, SurfaceScatteringEvent};
use crate::math::constants::{Float, INV_PI, Vector2f, Vector3f};
use crate::math::warp::{sample_cosine_hemisphere, sample_cosine_hemisphere_pdf};

pub struct LambertianDiffuseMaterial {
    albedo: Vector3f,
}

impl LambertianDiffuseMaterial {
    pub fn new(albedo: Vector3f) -> Self {
        Self { albedo }
    }
}

impl SurfaceMaterial for LambertianDiffuseMaterial {
    fn evaluate(&self, wi: Vector3f, wo: Vector3f) -> Vector3f {
        if wi.z * wo.z <= 0.0 {
            return Vector3f::zeros();
        }
        self.albedo * INV_PI
    }

    fn sample(&self, wi: Vector3f, u1: Float, u2: Float) -> SurfaceSample {
        let mut wo = sample_cosine_hemisphere(&Vector2f::new(u1, u2));
        if wi.z < 0.0 {
            wo.z = -wo.z;
        }
        SurfaceSample {
            wo,
            f: self.albedo * INV_PI,
            pdf: sample_cosine_hemisphere_pdf(wo.z.abs()),
            event: SurfaceScatteringEvent::Diffuse,
        }
    }

    fn probability_density(&self, wi: Vector3f, wo: Vector3f) -> Float {
        if wi.z * wo.z <= 0.0 {
            return 0.0;
        }
        sample_cosine_hemisphere_pdf(wo.z.abs())
    }
}
