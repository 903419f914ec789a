// Copyright @yucwang 2026

use crate::core::bsdf::{Bsdf, SurfaceScatteringEvent};
use crate::core::camera::Camera;
use crate::core::config::{Config, ConfigError};
use crate::core::geometry::{IntersectionInfo, SceneGeometry};
use crate::core::medium::{VolumeEvent, VolumeMaterial, VolumeStack};
use crate::core::sampler::{RandomStateSequence, Sampler, StateSequence, create_sampler};
use crate::core::scene::Scene;
use crate::math::bitmap::Bitmap;
use crate::math::constants::{
    Float, PDF_FLOOR, PIXEL_COORD_EPS, RAY_ORIGIN_OFFSET, Vector2f, Vector3f,
};
use crate::math::ray::Ray;
use crate::math::spectrum::{clamp_luminance, is_finite, luminance};
use crate::media::vacuum::VacuumMedium;
use crate::renderers::accumulator::ImageAccumulator;
use crate::renderers::renderer::Renderer;

use std::sync::{Arc, Mutex};
use std::thread;

/// What one finished path hands back: an image-plane position in
/// [0, 1)^2 and the radiance carried toward the camera through it.
#[derive(Debug, Clone)]
pub struct PathContribution {
    pub x: Float,
    pub y: Float,
    pub c: Vector3f,
}

impl PathContribution {
    pub fn new(x: Float, y: Float, c: Vector3f) -> Self {
        Self { x, y, c }
    }
}

/// The path-contribution functional shared by the path tracer and the
/// Metropolis sampler: primary samples in, one `PathContribution` out.
/// It owns no image state, so integrators can evaluate it from any
/// thread and under any sample source.
pub struct PathTracer {
    scene: Arc<Scene>,
    geometry: Arc<dyn SceneGeometry>,
    camera: Arc<dyn Camera>,
    width: usize,
    height: usize,
    direct_lighting: bool,
    direct_lighting_bsdf: usize,
    direct_lighting_light: usize,
    full_direct_lighting: bool,
    luminance_clamping: Float,
    russian_roulette: bool,
    min_path_length: u32,
    max_path_length: u32,
}

impl PathTracer {
    pub fn from_config(
        config: &Config,
        scene: Arc<Scene>,
        geometry: Arc<dyn SceneGeometry>,
        camera: Arc<dyn Camera>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let direct_lighting = config.get_bool("direct_lighting", true)?;
        let direct_lighting_bsdf = config.get_int("direct_lighting_bsdf", 1)?;
        let direct_lighting_light = config.get_int("direct_lighting_light", 1)?;
        if direct_lighting_bsdf < 0 || direct_lighting_light < 0 {
            return Err(ConfigError::InvalidValue {
                key: "direct_lighting_bsdf".to_string(),
                reason: "sample counts must be non-negative".to_string(),
            });
        }
        if direct_lighting_bsdf + direct_lighting_light == 0 {
            return Err(ConfigError::InvalidValue {
                key: "direct_lighting_bsdf".to_string(),
                reason: "direct_lighting_bsdf + direct_lighting_light must not be 0".to_string(),
            });
        }
        let min_path_length = config.get_int("min_path_length", 1)?;
        let max_path_length = config.get_int("max_path_length", 64)?;
        if min_path_length < 1 || max_path_length < min_path_length {
            return Err(ConfigError::InvalidValue {
                key: "min_path_length".to_string(),
                reason: "need 1 <= min_path_length <= max_path_length".to_string(),
            });
        }

        Ok(Self {
            scene,
            geometry,
            camera,
            width,
            height,
            direct_lighting,
            direct_lighting_bsdf: direct_lighting_bsdf as usize,
            direct_lighting_light: direct_lighting_light as usize,
            full_direct_lighting: config.get_bool("full_direct_lighting", false)?,
            luminance_clamping: config.get_real("luminance_clamping", 0.0)?,
            russian_roulette: config.get_bool("russian_roulette", true)?,
            min_path_length: min_path_length as u32,
            max_path_length: max_path_length as u32,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    fn path_length_in_range(&self, path_length: u32) -> bool {
        self.min_path_length <= path_length && path_length <= self.max_path_length
    }

    /// Evaluates one full path under the given sample stream. The first
    /// two samples position the path on the image plane.
    pub fn get_path_contribution(&self, rand: &mut dyn StateSequence) -> PathContribution {
        let offset = rand.next2();
        let size = Vector2f::new(
            1.0 / self.width as Float,
            1.0 / self.height as Float,
        );
        let ray = self.camera.sample(offset, size);
        let mut color = self.trace(ray, rand);
        if self.luminance_clamping > 0.0 {
            color = clamp_luminance(color, self.luminance_clamping);
        }
        PathContribution::new(offset.x, offset.y, color)
    }

    /// Radiance arriving along `ray`, estimated with one path.
    pub fn trace(&self, ray: Ray, rand: &mut dyn StateSequence) -> Vector3f {
        let mut radiance = Vector3f::zeros();
        let mut importance = Vector3f::new(1.0, 1.0, 1.0);
        let atmosphere: Arc<dyn VolumeMaterial> = match self.scene.atmosphere() {
            Some(medium) => medium.clone(),
            None => Arc::new(VacuumMedium::new()),
        };
        let stack = VolumeStack::new(atmosphere);
        let mut ray = ray;

        for depth in 1..=self.max_path_length {
            let volume = stack.top().clone();
            let info = self.geometry.query(&ray);
            let safe_distance = volume.sample_free_distance(rand);
            let mut f = Vector3f::new(1.0, 1.0, 1.0);
            let out_ray;

            if info.intersected && info.dist < safe_distance {
                // Made it to the next surface.
                let bsdf = Bsdf::new(&self.scene, &info);
                let in_dir = -ray.dir();
                if bsdf.is_emissive() {
                    let count = info.front && (depth == 1 || !self.direct_lighting);
                    if count && self.path_length_in_range(depth) {
                        radiance += importance.component_mul(&bsdf.evaluate(info.normal, in_dir));
                    }
                    break;
                }
                if self.direct_lighting
                    && !bsdf.is_delta()
                    && self.path_length_in_range(depth + 1)
                {
                    radiance += importance.component_mul(&self.calculate_direct_lighting(
                        in_dir,
                        &info,
                        &bsdf,
                        volume.as_ref(),
                        rand,
                    ));
                }
                let (out_dir, value, pdf, _event) = bsdf.sample(in_dir, rand.next(), rand.next());
                if pdf < PDF_FLOOR {
                    break;
                }
                let cos_out = out_dir.dot(&info.normal).abs();
                f = value * (cos_out / pdf);
                out_ray = Ray::new(info.pos + out_dir * RAY_ORIGIN_OFFSET, out_dir, 0.0);
            } else if volume.sample_event(rand) == VolumeEvent::Scattering {
                // Scattered inside the medium before reaching a surface.
                let orig = ray.orig() + ray.dir() * safe_distance;
                let in_dir = -ray.dir();
                if self.direct_lighting && self.path_length_in_range(depth + 1) {
                    radiance += importance.component_mul(&self.calculate_volumetric_direct_lighting(
                        in_dir,
                        orig,
                        volume.as_ref(),
                        rand,
                    ));
                }
                // The phase direction is importance sampled: pdf one.
                let out_dir = volume.sample_phase(rand);
                out_ray = Ray::new(orig + out_dir * RAY_ORIGIN_OFFSET, out_dir, 0.0);
            } else {
                // Absorbed by the medium.
                break;
            }

            ray = out_ray;
            importance = importance.component_mul(&f);
            if self.russian_roulette {
                let p = luminance(&importance);
                if p <= 1.0 {
                    if rand.next() < p {
                        importance /= p;
                    } else {
                        break;
                    }
                }
            }
        }

        radiance
    }

    /// Next-event estimation at a surface vertex: either one light
    /// triangle drawn by emissive power, or all of them.
    fn calculate_direct_lighting(
        &self,
        in_dir: Vector3f,
        info: &IntersectionInfo,
        bsdf: &Bsdf,
        volume: &dyn VolumeMaterial,
        rand: &mut dyn StateSequence,
    ) -> Vector3f {
        let mut acc = Vector3f::zeros();
        if !self.full_direct_lighting {
            let u = rand.next();
            if let Some((tri_id, triangle_pdf)) = self.scene.sample_triangle_light_emission(u) {
                // A light behind the shading point is rejected without
                // resampling; that slightly favors front-facing lights.
                let tri = self.scene.triangle(tri_id);
                if tri.get_relative_location_to_plane(info.pos) > 0.0 {
                    acc += self.direct_lighting_from_triangle(in_dir, info, bsdf, volume, rand, tri_id)
                        / triangle_pdf;
                }
            }
        } else {
            for idx in 0..self.scene.emissive_triangles().len() {
                let tri_id = self.scene.emissive_triangles()[idx];
                let tri = self.scene.triangle(tri_id);
                if tri.get_relative_location_to_plane(info.pos) > 0.0 {
                    acc += self.direct_lighting_from_triangle(in_dir, info, bsdf, volume, rand, tri_id);
                }
            }
        }
        acc
    }

    /// MIS between BSDF sampling and area sampling of one light
    /// triangle, balance heuristic over the actual sub-sample counts.
    fn direct_lighting_from_triangle(
        &self,
        in_dir: Vector3f,
        info: &IntersectionInfo,
        bsdf: &Bsdf,
        volume: &dyn VolumeMaterial,
        rand: &mut dyn StateSequence,
        tri_id: usize,
    ) -> Vector3f {
        let tri = self.scene.triangle(tri_id);
        let n_bsdf = self.direct_lighting_bsdf;
        let n_light = self.direct_lighting_light;
        let mut acc = Vector3f::zeros();

        for i in 0..(n_bsdf + n_light) {
            let sample_bsdf = i < n_bsdf;
            let mut f;
            let mut bsdf_p;
            let out_dir;
            let mut event = SurfaceScatteringEvent::Diffuse;
            if sample_bsdf {
                let (dir, value, pdf, ev) = bsdf.sample(in_dir, rand.next(), rand.next());
                out_dir = dir;
                f = value;
                bsdf_p = pdf;
                event = ev;
            } else {
                let pos = tri.sample_point(rand.next(), rand.next());
                let to_light = pos - info.pos;
                if to_light.norm() == 0.0 {
                    continue;
                }
                out_dir = to_light.normalize();
                f = Vector3f::zeros();
                bsdf_p = 0.0;
            }

            let shadow_ray = Ray::new(info.pos, out_dir, RAY_ORIGIN_OFFSET);
            let test = self.geometry.query(&shadow_ray);
            if test.triangle_id != tri_id as i64 {
                // Hits nothing or something else.
                continue;
            }
            if !sample_bsdf {
                f = bsdf.evaluate(in_dir, out_dir);
                bsdf_p = bsdf.probability_density(in_dir, out_dir);
            }

            let co = out_dir.dot(&info.normal).abs();
            let cos_light = out_dir.dot(&tri.normal()).abs();
            let d = test.pos - info.pos;
            let light_p = d.dot(&d) / (tri.area() * cos_light);
            let light_bsdf = Bsdf::new(&self.scene, &test);
            let emission = light_bsdf.evaluate(test.normal, -out_dir);
            let throughput = emission
                .component_mul(&f)
                .component_mul(&volume.get_attenuation(test.dist))
                * co;

            if sample_bsdf && SurfaceScatteringEvent::is_delta(event) {
                // Area sampling has no mass on a delta direction.
                acc += throughput / (n_bsdf as Float * bsdf_p);
            } else {
                acc += throughput
                    / (n_bsdf as Float * bsdf_p + n_light as Float * light_p);
            }
        }
        acc
    }

    /// Single-strategy light probe from inside a medium: one phase
    /// direction, counted when it reaches an emissive front face.
    fn calculate_volumetric_direct_lighting(
        &self,
        _in_dir: Vector3f,
        orig: Vector3f,
        volume: &dyn VolumeMaterial,
        rand: &mut dyn StateSequence,
    ) -> Vector3f {
        let mut lighting = Vector3f::zeros();
        let out_dir = volume.sample_phase(rand);
        let out_ray = Ray::new(orig, out_dir, RAY_ORIGIN_OFFSET);
        let test = self.geometry.query(&out_ray);
        if test.intersected && test.front {
            let light_bsdf = Bsdf::new(&self.scene, &test);
            if light_bsdf.is_emissive() {
                let emission = light_bsdf.evaluate(test.normal, -out_dir);
                lighting += emission.component_mul(&volume.get_attenuation(test.dist));
            }
        }
        lighting
    }
}

/// Clamp, bin and add one contribution; anything non-finite is dropped
/// here so it can never reach the image.
fn write_path_contribution(accumulator: &mut ImageAccumulator, cont: &PathContribution) {
    if !is_finite(&cont.c) {
        log::warn!("dropping non-finite path contribution at ({}, {})", cont.x, cont.y);
        return;
    }
    let x = cont.x.clamp(0.0, 1.0 - PIXEL_COORD_EPS);
    let y = cont.y.clamp(0.0, 1.0 - PIXEL_COORD_EPS);
    let ix = ((x * accumulator.width() as Float) as usize).min(accumulator.width() - 1);
    let iy = ((y * accumulator.height() as Float) as usize).min(accumulator.height() - 1);
    accumulator.accumulate(ix, iy, cont.c);
}

/// Plain Monte Carlo renderer: one independent path per stage iteration,
/// fanned out over worker threads by contiguous path-index ranges.
pub struct PathTracingRenderer {
    tracer: PathTracer,
    sampler: Arc<dyn Sampler>,
    accumulator: ImageAccumulator,
    index: u64,
}

impl PathTracingRenderer {
    pub fn new(
        config: &Config,
        scene: Arc<Scene>,
        geometry: Arc<dyn SceneGeometry>,
        camera: Arc<dyn Camera>,
        width: usize,
        height: usize,
    ) -> Result<Self, ConfigError> {
        let tracer = PathTracer::from_config(config, scene, geometry, camera, width, height)?;
        let sampler_name = config.get_str("sampler", "prand");
        let seed = config.get_int("seed", 0)? as u64;
        let sampler = create_sampler(&sampler_name, seed)?;
        Ok(Self {
            tracer,
            sampler,
            accumulator: ImageAccumulator::new(width, height),
            index: 0,
        })
    }
}

impl Renderer for PathTracingRenderer {
    fn render_stage(&mut self) {
        let width = self.tracer.width();
        let height = self.tracer.height();
        let total = width * height;
        let start_index = self.index;

        let thread_count = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
        let chunk = (total + thread_count - 1) / thread_count;
        let tracer = &self.tracer;
        let sampler = &self.sampler;
        let locals: Mutex<Vec<Option<ImageAccumulator>>> =
            Mutex::new((0..thread_count).map(|_| None).collect());

        thread::scope(|scope| {
            for worker in 0..thread_count {
                let lo = worker * chunk;
                let hi = ((worker + 1) * chunk).min(total);
                if lo >= hi {
                    continue;
                }
                let locals = &locals;
                scope.spawn(move || {
                    let mut local = ImageAccumulator::new(width, height);
                    for i in lo..hi {
                        let path_index = start_index + i as u64;
                        let mut rand = RandomStateSequence::new(sampler.clone(), path_index);
                        let cont = tracer.get_path_contribution(&mut rand);
                        write_path_contribution(&mut local, &cont);
                    }
                    let mut slots = match locals.lock() {
                        Ok(guard) => guard,
                        Err(poisoned) => poisoned.into_inner(),
                    };
                    slots[worker] = Some(local);
                });
            }
        });

        // Workers are reduced in index order so repeat renders sum in
        // the same order.
        let slots = match locals.into_inner() {
            Ok(slots) => slots,
            Err(poisoned) => poisoned.into_inner(),
        };
        for slot in slots.into_iter().flatten() {
            self.accumulator.merge(&slot);
        }
        self.index += total as u64;
    }

    fn get_output(&self) -> Bitmap {
        self.accumulator.get_averaged()
    }
}
