// Copyright @yucwang 2026

use crate::core::config::ConfigError;
use crate::core::markov_chain::PSSMLTMarkovChain;
use crate::core::rng::SplitMixRng;
use crate::math::constants::{Float, Vector2f};

use std::sync::Arc;

/// A stateless sample source: the value at `(index, dimension)` is a pure
/// function of the sampler, so any path can be replayed exactly.
pub trait Sampler: Send + Sync {
    fn sample(&self, index: u64, dimension: u64) -> Float;
}

/// "prand": a splitmix-style hash of (seed, path index, dimension),
/// producing uniform values in [0, 1).
pub struct PrandSampler {
    seed: u64,
}

impl PrandSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl Sampler for PrandSampler {
    fn sample(&self, index: u64, dimension: u64) -> Float {
        let mut z = self
            .seed
            .wrapping_add(index.wrapping_mul(0x9E37_79B9_7F4A_7C15))
            .wrapping_add(dimension.wrapping_mul(0xD1B5_4A32_D192_ED03));
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^= z >> 31;
        ((z >> 40) as Float) / ((1u64 << 24) as Float)
    }
}

/// Name-keyed sampler factory.
pub fn create_sampler(name: &str, seed: u64) -> Result<Arc<dyn Sampler>, ConfigError> {
    match name {
        "prand" => Ok(Arc::new(PrandSampler::new(seed))),
        _ => Err(ConfigError::UnknownSampler(name.to_string())),
    }
}

/// A stream of uniform [0, 1) samples consumed by one path. Dimension
/// allocation is implicit in call order, so the path tracer must draw
/// samples in a fixed order.
pub trait StateSequence {
    fn next(&mut self) -> Float;

    fn next2(&mut self) -> Vector2f {
        let x = self.next();
        let y = self.next();
        Vector2f::new(x, y)
    }
}

/// Independent stream for path `index`, backed by a stateless sampler.
pub struct RandomStateSequence {
    sampler: Arc<dyn Sampler>,
    index: u64,
    dimension: u64,
}

impl RandomStateSequence {
    pub fn new(sampler: Arc<dyn Sampler>, index: u64) -> Self {
        Self { sampler, index, dimension: 0 }
    }
}

impl StateSequence for RandomStateSequence {
    fn next(&mut self) -> Float {
        let value = self.sampler.sample(self.index, self.dimension);
        self.dimension += 1;
        value
    }
}

/// Reads primary-sample-space coordinates out of a Markov chain, lazily
/// extending the chain with fresh uniforms past its current length.
pub struct McStateSequence<'a> {
    chain: &'a mut PSSMLTMarkovChain,
    rng: &'a mut SplitMixRng,
    cursor: usize,
}

impl<'a> McStateSequence<'a> {
    pub fn new(chain: &'a mut PSSMLTMarkovChain, rng: &'a mut SplitMixRng) -> Self {
        Self { chain, rng, cursor: 0 }
    }
}

impl StateSequence for McStateSequence<'_> {
    fn next(&mut self) -> Float {
        let value = self.chain.get_state(self.cursor, self.rng);
        self.cursor += 1;
        value
    }
}
