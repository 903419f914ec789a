// Copyright @yucwang 2026

use crate::core::rng::SplitMixRng;
use crate::math::constants::Float;

/// Primary-sample-space state of a Kelemen-style PSSMLT chain: a lazily
/// grown vector of coordinates in [0, 1) plus the image resolution,
/// which scales the pixel-coordinate perturbation.
///
/// States 0 and 1 are reserved for the image-plane position.
#[derive(Debug, Clone)]
pub struct PSSMLTMarkovChain {
    resolution_x: Float,
    resolution_y: Float,
    states: Vec<Float>,
}

impl PSSMLTMarkovChain {
    pub fn new(resolution_x: usize, resolution_y: usize) -> Self {
        Self {
            resolution_x: resolution_x as Float,
            resolution_y: resolution_y as Float,
            states: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn states(&self) -> &[Float] {
        &self.states
    }

    /// The k-th coordinate, extending the chain with fresh uniforms when
    /// k is past the end.
    pub fn get_state(&mut self, k: usize, rng: &mut SplitMixRng) -> Float {
        while self.states.len() <= k {
            self.states.push(rng.next_f32());
        }
        self.states[k]
    }

    /// A uniform restart of the whole sample vector: the fresh chain is
    /// empty and refills lazily.
    pub fn large_step(&self) -> Self {
        Self {
            resolution_x: self.resolution_x,
            resolution_y: self.resolution_y,
            states: Vec::new(),
        }
    }

    /// Kelemen exponential small-step mutation of every coordinate. The
    /// two pixel coordinates move with a scale tied to the resolution,
    /// the rest with fixed scales.
    pub fn mutate(&self, strength: Float, rng: &mut SplitMixRng) -> Self {
        let mut result = self.clone();
        let delta_pixel = 2.0 / (result.resolution_x + result.resolution_y);
        result.get_state(1, rng);
        result.states[0] = Self::perturb(
            result.states[0],
            delta_pixel * strength,
            0.1 * strength,
            rng,
        );
        result.states[1] = Self::perturb(
            result.states[1],
            delta_pixel * strength,
            0.1 * strength,
            rng,
        );
        for i in 2..result.states.len() {
            result.states[i] = Self::perturb(
                result.states[i],
                1.0 / 1024.0 * strength,
                1.0 / 64.0 * strength,
                rng,
            );
        }
        result
    }

    /// Exponentially distributed perturbation between inner scale `s1`
    /// and outer scale `s2`, wrapped onto the unit torus.
    fn perturb(value: Float, s1: Float, s2: Float, rng: &mut SplitMixRng) -> Float {
        let mut result;
        let mut r = rng.next_f32();
        if r < 0.5 {
            r *= 2.0;
            result = value + s2 * (-(s2 / s1).ln() * r).exp();
        } else {
            r = (r - 0.5) * 2.0;
            result = value - s2 * (-(s2 / s1).ln() * r).exp();
        }
        result -= result.floor();
        // floor() of a value just below an integer can round the wrap to
        // exactly 1.0 in f32.
        if result >= 1.0 {
            result = 0.0;
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_state_extends_lazily() {
        let mut chain = PSSMLTMarkovChain::new(8, 8);
        let mut rng = SplitMixRng::new(3);
        assert_eq!(chain.len(), 0);
        let v = chain.get_state(5, &mut rng);
        assert_eq!(chain.len(), 6);
        assert_eq!(chain.get_state(5, &mut rng), v);
        assert_eq!(chain.len(), 6);
    }

    #[test]
    fn test_large_step_restarts_states() {
        let mut chain = PSSMLTMarkovChain::new(8, 8);
        let mut rng = SplitMixRng::new(3);
        chain.get_state(9, &mut rng);
        let fresh = chain.large_step();
        assert!(fresh.is_empty());
    }

    #[test]
    fn test_mutate_keeps_unit_interval() {
        let mut rng = SplitMixRng::new(17);
        let mut chain = PSSMLTMarkovChain::new(64, 64);
        chain.get_state(19, &mut rng);
        for _ in 0..200 {
            chain = chain.mutate(1.0, &mut rng);
            assert_eq!(chain.len(), 20);
            for &s in chain.states() {
                assert!((0.0..1.0).contains(&s), "state escaped [0,1): {}", s);
            }
        }
    }

    #[test]
    fn test_mutate_allocates_pixel_states() {
        let mut rng = SplitMixRng::new(5);
        let chain = PSSMLTMarkovChain::new(16, 16);
        let mutated = chain.mutate(1.0, &mut rng);
        assert!(mutated.len() >= 2);
    }

    #[test]
    fn test_mutate_moves_small_distances() {
        let mut rng = SplitMixRng::new(29);
        let mut chain = PSSMLTMarkovChain::new(512, 512);
        chain.get_state(9, &mut rng);
        let before: Vec<Float> = chain.states().to_vec();
        let after = chain.mutate(1.0, &mut rng);
        for i in 2..before.len() {
            let d = (after.states()[i] - before[i]).abs();
            let wrapped = d.min(1.0 - d);
            assert!(wrapped <= 1.0 / 64.0 + 1e-6, "event perturbation too large: {}", wrapped);
        }
    }
}
