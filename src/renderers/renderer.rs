// Copyright @yucwang 2021

use crate::core::camera::Camera;
use crate::core::config::{Config, ConfigError};
use crate::core::geometry::SceneGeometry;
use crate::core::scene::Scene;
use crate::integrators::mcmc::McmcRenderer;
use crate::integrators::path::PathTracingRenderer;
use crate::math::bitmap::Bitmap;

use std::sync::Arc;

/// A renderer advances in stages; a caller that wants to stop early just
/// stops calling `render_stage`. `get_output` may be read between
/// stages.
pub trait Renderer {
    fn render_stage(&mut self);
    fn get_output(&self) -> Bitmap;
}

/// Name-keyed renderer factory: "pt" for the path tracer, "mcmcpt" for
/// the Metropolis sampler on top of it.
pub fn create_renderer(
    name: &str,
    config: &Config,
    scene: Arc<Scene>,
    geometry: Arc<dyn SceneGeometry>,
    camera: Arc<dyn Camera>,
    width: usize,
    height: usize,
) -> Result<Box<dyn Renderer>, ConfigError> {
    match name {
        "pt" => Ok(Box::new(PathTracingRenderer::new(
            config, scene, geometry, camera, width, height,
        )?)),
        "mcmcpt" => Ok(Box::new(McmcRenderer::new(
            config, scene, geometry, camera, width, height,
        )?)),
        _ => Err(ConfigError::InvalidValue {
            key: "renderer".to_string(),
            reason: format!("unknown renderer: {}", name),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::diffuse::LambertianDiffuseMaterial;
    use crate::math::constants::Vector3f;
    use crate::sensors::pinhole::PinholeCamera;
    use crate::shapes::triangle::Triangle;
    use crate::core::geometry::BruteForceGeometry;

    #[test]
    fn test_factory_rejects_unknown_renderer() {
        let mut scene = Scene::new();
        scene.add_triangle(
            Triangle::new(
                Vector3f::new(-1.0, -1.0, -2.0),
                Vector3f::new(1.0, -1.0, -2.0),
                Vector3f::new(0.0, 1.0, -2.0),
            ),
            std::sync::Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.5, 0.5, 0.5))),
        );
        let scene = Arc::new(scene);
        let geometry: Arc<dyn SceneGeometry> = Arc::new(BruteForceGeometry::new(scene.clone()));
        let camera: Arc<dyn Camera> = Arc::new(PinholeCamera::new(
            Vector3f::zeros(),
            Vector3f::new(0.0, 0.0, -1.0),
            Vector3f::new(0.0, 1.0, 0.0),
            1.0,
            1.0,
        ));
        let config = Config::new();
        assert!(create_renderer("pt", &config, scene.clone(), geometry.clone(), camera.clone(), 4, 4).is_ok());
        assert!(create_renderer("sppm", &config, scene, geometry, camera, 4, 4).is_err());
    }
}
