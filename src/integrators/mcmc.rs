// Copyright @yucwang 2026

use crate::core::camera::Camera;
use crate::core::config::{Config, ConfigError};
use crate::core::geometry::SceneGeometry;
use crate::core::markov_chain::PSSMLTMarkovChain;
use crate::core::rng::SplitMixRng;
use crate::core::sampler::{McStateSequence, RandomStateSequence, Sampler, create_sampler};
use crate::core::scene::Scene;
use crate::integrators::path::{PathContribution, PathTracer};
use crate::math::bitmap::Bitmap;
use crate::math::constants::{Float, PIXEL_COORD_EPS};
use crate::math::spectrum::{is_finite, luminance};
use crate::renderers::accumulator::ImageAccumulator;
use crate::renderers::renderer::Renderer;

use log::info;
use std::sync::Arc;

/// One point of the Markov chain: the primary-sample vector, the path
/// contribution it maps to, and the scalar target density (luminance).
struct McmcState {
    chain: PSSMLTMarkovChain,
    pc: PathContribution,
    sc: Float,
}

/// Kelemen-style PSSMLT over the path-contribution functional. Holds a
/// `PathTracer` as the functional being sampled; image writes go
/// through expected-value splatting and are normalized by the global
/// sample count.
pub struct McmcRenderer {
    tracer: PathTracer,
    estimation_sampler: Arc<dyn Sampler>,
    large_step_prob: Float,
    estimation_rounds: Float,
    mutation_strength: Float,
    accumulator: ImageAccumulator,
    sample_count: u64,
    b: Float,
    current: Option<McmcState>,
    rng: SplitMixRng,
}

impl McmcRenderer {
    pub fn new(
        config: &Config,
        scene: Arc<Scene>,
        geometry: Arc<dyn SceneGeometry>,
        camera: Arc<dyn Camera>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let tracer = PathTracer::from_config(config, scene, geometry, camera, width, height)?;
        let seed = config.get_int("seed", 0)? as u64;
        Ok(Self {
            tracer,
            // Normalization always runs over plain pseudorandom paths,
            // independent of the configured sampler.
            estimation_sampler: create_sampler("prand", seed)?,
            large_step_prob: config.get_real("large_step_prob", 0.3)?,
            estimation_rounds: config.get_real("estimation_rounds", 1.0)?,
            mutation_strength: config.get_real_required("mutation_strength")?,
            accumulator: ImageAccumulator::new(width, height),
            sample_count: 0,
            b: 0.0,
            current: None,
            // Offset so the chain stream never lines up with a prand
            // path stream built from the same seed.
            rng: SplitMixRng::new(seed.wrapping_add(0x5851_F42D_4C95_7F2D)),
        })
    }

    /// Mean scalar contribution over uniform samples; converts the
    /// stationary density of the chain back into radiance units.
    pub fn normalization_constant(&self) -> Float {
        self.b
    }

    fn scalar_contribution_function(pc: &PathContribution) -> Float {
        luminance(&pc.c)
    }

    fn evaluate(
        tracer: &PathTracer,
        chain: &mut PSSMLTMarkovChain,
        rng: &mut SplitMixRng,
    ) -> (PathContribution, Float) {
        let mut rand = McStateSequence::new(chain, rng);
        let pc = tracer.get_path_contribution(&mut rand);
        let sc = Self::scalar_contribution_function(&pc);
        (pc, sc)
    }

    /// Estimates `b` over `W * H * estimation_rounds` independent paths
    /// and seeds the chain. Runs once, before the first Metropolis
    /// stage.
    fn run_estimation_phase(&mut self) {
        let width = self.tracer.width();
        let height = self.tracer.height();
        let num_samples =
            (((width * height) as Float * self.estimation_rounds) as u64).max(1);
        let mut total_sc = 0.0f64;
        for i in 0..num_samples {
            let mut rand = RandomStateSequence::new(self.estimation_sampler.clone(), i);
            let pc = self.tracer.get_path_contribution(&mut rand);
            total_sc += Self::scalar_contribution_function(&pc) as f64;
        }
        self.b = (total_sc / num_samples as f64) as Float;
        info!("PSSMLT normalization constant b = {}", self.b);

        let mut chain = PSSMLTMarkovChain::new(width, height);
        let (pc, sc) = Self::evaluate(&self.tracer, &mut chain, &mut self.rng);
        self.current = Some(McmcState { chain, pc, sc });
    }

    /// Expected-value splat: `scale` carries the Metropolis weighting,
    /// and the write is amplified by the pixel count so that dividing
    /// the buffer by the sample count yields the estimator.
    fn write_path_contribution(&mut self, cont: &PathContribution, scale: Float) {
        if !is_finite(&cont.c) || !scale.is_finite() {
            log::warn!("dropping non-finite splat at ({}, {})", cont.x, cont.y);
            return;
        }
        let width = self.tracer.width();
        let height = self.tracer.height();
        let in_range = |v: Float| (0.0..=1.0 - PIXEL_COORD_EPS).contains(&v);
        if in_range(cont.x) && in_range(cont.y) {
            let ix = ((cont.x * width as Float) as usize).min(width - 1);
            let iy = ((cont.y * height as Float) as usize).min(height - 1);
            let value = cont.c * ((width * height) as Float * scale);
            self.accumulator.splat(ix, iy, value);
        }
    }
}

impl Renderer for McmcRenderer {
    fn render_stage(&mut self) {
        if self.current.is_none() {
            self.run_estimation_phase();
        }
        let width = self.tracer.width();
        let height = self.tracer.height();
        let iterations = width * height;

        let mut current = match self.current.take() {
            Some(state) => state,
            None => return,
        };

        for _ in 0..iterations {
            let is_large = self.rng.next_f32() <= self.large_step_prob;
            let mut new_chain = if is_large {
                current.chain.large_step()
            } else {
                current.chain.mutate(self.mutation_strength, &mut self.rng)
            };
            let (pc, sc) = Self::evaluate(&self.tracer, &mut new_chain, &mut self.rng);
            let new_state = McmcState { chain: new_chain, pc, sc };

            let a = if current.sc > 0.0 {
                (new_state.sc / current.sc).clamp(0.0, 1.0)
            } else {
                1.0
            };

            // Both candidate states are written every iteration with
            // weights that keep the estimator unbiased.
            let is_large_weight = if is_large { 1.0 } else { 0.0 };
            if new_state.sc > 0.0 {
                let scale = (a + is_large_weight)
                    / (new_state.sc / self.b + self.large_step_prob);
                self.write_path_contribution(&new_state.pc, scale);
            }
            if current.sc > 0.0 {
                let scale = (1.0 - a) / (current.sc / self.b + self.large_step_prob);
                self.write_path_contribution(&current.pc, scale);
            }

            if self.rng.next_f32() <= a {
                current = new_state;
            }
            self.sample_count += 1;
        }

        self.current = Some(current);
    }

    fn get_output(&self) -> Bitmap {
        if self.sample_count == 0 {
            return Bitmap::new(self.tracer.width(), self.tracer.height());
        }
        self.accumulator.get_scaled(1.0 / self.sample_count as Float)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bsdf::SurfaceMaterial;
    use crate::core::geometry::BruteForceGeometry;
    use crate::integrators::path::PathTracingRenderer;
    use crate::materials::emissive::AreaLightMaterial;
    use crate::math::constants::Vector3f;
    use crate::sensors::pinhole::PinholeCamera;
    use crate::shapes::triangle::Triangle;

    /// A wall-to-wall emissive panel: every camera ray sees the same
    /// radiance, so both integrators should reproduce it exactly.
    fn glowing_wall_scene(radiance: Float) -> (Arc<Scene>, Arc<dyn SceneGeometry>, Arc<dyn Camera>)
    {
        let mut scene = Scene::new();
        let light: Arc<dyn SurfaceMaterial> =
            Arc::new(AreaLightMaterial::new(Vector3f::new(radiance, radiance, radiance)));
        // Facing +z, toward the camera.
        scene.add_triangle(
            Triangle::new(
                Vector3f::new(-20.0, -20.0, -2.0),
                Vector3f::new(20.0, -20.0, -2.0),
                Vector3f::new(20.0, 20.0, -2.0),
            ),
            light.clone(),
        );
        scene.add_triangle(
            Triangle::new(
                Vector3f::new(-20.0, -20.0, -2.0),
                Vector3f::new(20.0, 20.0, -2.0),
                Vector3f::new(-20.0, 20.0, -2.0),
            ),
            light,
        );
        let scene = Arc::new(scene);
        let geometry: Arc<dyn SceneGeometry> = Arc::new(BruteForceGeometry::new(scene.clone()));
        let camera: Arc<dyn Camera> = Arc::new(PinholeCamera::new(
            Vector3f::new(0.0, 0.0, 0.0),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
            1.0,
        ));
        (scene, geometry, camera)
    }

    #[test]
    fn test_mutation_strength_is_required() {
        let (scene, geometry, camera) = glowing_wall_scene(1.0);
        let config = Config::new();
        let result = McmcRenderer::new(&config, scene, geometry, camera, 8, 8);
        assert!(matches!(result, Err(ConfigError::MissingKey(_))));
    }

    #[test]
    fn test_estimation_phase_measures_brightness() {
        let (scene, geometry, camera) = glowing_wall_scene(2.0);
        let mut config = Config::new();
        config.set("mutation_strength", 1.0);
        let mut renderer = McmcRenderer::new(&config, scene, geometry, camera, 8, 8).unwrap();
        renderer.render_stage();
        let b = renderer.normalization_constant();
        assert!((b - 2.0).abs() < 0.05, "b = {}", b);
    }

    #[test]
    fn test_mcmc_agrees_with_path_tracer() {
        let (scene, geometry, camera) = glowing_wall_scene(2.0);

        let pt_config = Config::new();
        let mut pt = PathTracingRenderer::new(
            &pt_config,
            scene.clone(),
            geometry.clone(),
            camera.clone(),
            16,
            16,
        )
        .unwrap();
        for _ in 0..4 {
            pt.render_stage();
        }

        let mut mcmc_config = Config::new();
        mcmc_config
            .set("mutation_strength", 1.0)
            .set("estimation_rounds", 4);
        let mut mcmc =
            McmcRenderer::new(&mcmc_config, scene, geometry, camera, 16, 16).unwrap();
        for _ in 0..10 {
            mcmc.render_stage();
        }

        let pt_mean = pt.get_output().mean_luminance();
        let mcmc_mean = mcmc.get_output().mean_luminance();
        assert!(pt_mean > 0.0);
        let rel = (mcmc_mean - pt_mean).abs() / pt_mean;
        assert!(
            rel < 0.1,
            "PT mean {} vs MCMC mean {} differ by {}",
            pt_mean,
            mcmc_mean,
            rel
        );
    }

    #[test]
    fn test_mcmc_sample_count_normalizes_output() {
        let (scene, geometry, camera) = glowing_wall_scene(1.0);
        let mut config = Config::new();
        config.set("mutation_strength", 1.0);
        let mut renderer = McmcRenderer::new(&config, scene, geometry, camera, 8, 8).unwrap();

        // Before any stage the output is defined and black.
        let empty = renderer.get_output();
        assert!(empty.raw().iter().all(|c| *c == Vector3f::zeros()));

        renderer.render_stage();
        let image = renderer.get_output();
        for c in image.raw() {
            assert!(is_finite(c));
            assert!(c.x >= 0.0);
        }
        // The stage ran W * H Metropolis iterations.
        assert_eq!(renderer.sample_count, 64);
    }

    #[test]
    fn test_mcmc_runs_are_deterministic() {
        let (scene, geometry, camera) = glowing_wall_scene(1.5);
        let mut config = Config::new();
        config.set("mutation_strength", 1.0);

        let mut first = McmcRenderer::new(
            &config,
            scene.clone(),
            geometry.clone(),
            camera.clone(),
            8,
            8,
        )
        .unwrap();
        let mut second = McmcRenderer::new(&config, scene, geometry, camera, 8, 8).unwrap();
        for _ in 0..3 {
            first.render_stage();
            second.render_stage();
        }
        assert_eq!(first.get_output(), second.get_output());
    }
}
