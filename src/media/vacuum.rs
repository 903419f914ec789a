// Copyright @yucwang 2026

use crate::core::medium::{VolumeEvent, VolumeMaterial};
use crate::core::sampler::StateSequence;
use crate::math::constants::{Float, Vector3f};

/// Placeholder medium for scenes without an atmosphere: rays fly
/// forever, nothing scatters, nothing attenuates. Consumes no samples,
/// so paths keep the same primary-sample layout with or without it.
pub struct VacuumMedium;

impl VacuumMedium {
    pub fn new() -> Self {
        Self
    }
}

impl Default for VacuumMedium {
    fn default() -> Self {
        Self::new()
    }
}

impl VolumeMaterial for VacuumMedium {
    fn sample_free_distance(&self, _rand: &mut dyn StateSequence) -> Float {
        Float::INFINITY
    }

    fn sample_event(&self, _rand: &mut dyn StateSequence) -> VolumeEvent {
        VolumeEvent::Absorption
    }

    fn sample_phase(&self, _rand: &mut dyn StateSequence) -> Vector3f {
        Vector3f::new(0.0, 0.0, 1.0)
    }

    fn get_attenuation(&self, _dist: Float) -> Vector3f {
        Vector3f::new(1.0, 1.0, 1.0)
    }
}
