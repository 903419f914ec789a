// Copyright @yucwang 2026

use crate::core::medium::{VolumeEvent, VolumeMaterial};
use crate::core::sampler::StateSequence;
use crate::math::constants::{Float, Vector3f};
use crate::math::warp::sample_uniform_sphere;

/// Homogeneous medium with an isotropic phase function. `sigma_t` is the
/// extinction coefficient; `albedo` the single-scattering albedo, i.e.
/// the probability that a medium event scatters instead of absorbing.
pub struct HomogeneousMedium {
    sigma_t: Float,
    albedo: Float,
}

impl HomogeneousMedium {
    pub fn new(sigma_t: Float, albedo: Float) -> Self {
        Self {
            sigma_t,
            albedo: albedo.clamp(0.0, 1.0),
        }
    }
}

impl VolumeMaterial for HomogeneousMedium {
    fn sample_free_distance(&self, rand: &mut dyn StateSequence) -> Float {
        if self.sigma_t <= 0.0 {
            return Float::INFINITY;
        }
        -(1.0 - rand.next()).ln() / self.sigma_t
    }

    fn sample_event(&self, rand: &mut dyn StateSequence) -> VolumeEvent {
        if rand.next() < self.albedo {
            VolumeEvent::Scattering
        } else {
            VolumeEvent::Absorption
        }
    }

    fn sample_phase(&self, rand: &mut dyn StateSequence) -> Vector3f {
        let u = rand.next2();
        sample_uniform_sphere(&u)
    }

    fn get_attenuation(&self, dist: Float) -> Vector3f {
        let tr = (-self.sigma_t * dist).exp();
        Vector3f::new(tr, tr, tr)
    }
}
