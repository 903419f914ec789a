// Copyright @yucwang 2026

use crate::core::bsdf::SurfaceMaterial;
use crate::core::medium::VolumeMaterial;
use crate::math::constants::Float;
use crate::math::spectrum::luminance;
use crate::shapes::triangle::Triangle;

use std::sync::Arc;

/// Triangle soup with per-triangle materials, a precomputed
/// emissive-power distribution for light selection, and an optional
/// atmosphere medium enclosing the whole scene.
pub struct Scene {
    triangles: Vec<Triangle>,
    materials: Vec<Arc<dyn SurfaceMaterial>>,
    emissive_triangles: Vec<usize>,
    // Cumulative emissive power, parallel to emissive_triangles.
    emissive_power_cdf: Vec<Float>,
    atmosphere: Option<Arc<dyn VolumeMaterial>>,
}

impl Scene {
    pub fn new() -> Self {
        Self {
            triangles: Vec::new(),
            materials: Vec::new(),
            emissive_triangles: Vec::new(),
            emissive_power_cdf: Vec::new(),
            atmosphere: None,
        }
    }

    /// Adds a triangle and returns its id. The emissive-power
    /// distribution is maintained incrementally.
    pub fn add_triangle(&mut self, triangle: Triangle, material: Arc<dyn SurfaceMaterial>) -> usize {
        let id = self.triangles.len();
        let triangle = triangle.with_id(id);
        if material.is_emissive() {
            let power = triangle.area() * luminance(&material.emitted_radiance());
            if power > 0.0 {
                let base = self.emissive_power_cdf.last().copied().unwrap_or(0.0);
                self.emissive_triangles.push(id);
                self.emissive_power_cdf.push(base + power);
            }
        }
        self.triangles.push(triangle);
        self.materials.push(material);
        id
    }

    pub fn set_atmosphere(&mut self, medium: Arc<dyn VolumeMaterial>) {
        self.atmosphere = Some(medium);
    }

    pub fn atmosphere(&self) -> Option<&Arc<dyn VolumeMaterial>> {
        self.atmosphere.as_ref()
    }

    pub fn triangles(&self) -> &[Triangle] {
        &self.triangles
    }

    pub fn triangle(&self, id: usize) -> &Triangle {
        &self.triangles[id]
    }

    pub fn material(&self, id: usize) -> &Arc<dyn SurfaceMaterial> {
        &self.materials[id]
    }

    pub fn emissive_triangles(&self) -> &[usize] {
        &self.emissive_triangles
    }

    /// Draws one emissive triangle with probability proportional to its
    /// emitted power. Returns the triangle id and the selection
    /// probability, or None when the scene has no lights.
    pub fn sample_triangle_light_emission(&self, u: Float) -> Option<(usize, Float)> {
        let total = *self.emissive_power_cdf.last()?;
        let target = u * total;
        let slot = match self
            .emissive_power_cdf
            .binary_search_by(|probe| probe.partial_cmp(&target).unwrap())
        {
            Ok(i) => (i + 1).min(self.emissive_power_cdf.len() - 1),
            Err(i) => i.min(self.emissive_power_cdf.len() - 1),
        };
        let prev = if slot == 0 { 0.0 } else { self.emissive_power_cdf[slot - 1] };
        let pdf = (self.emissive_power_cdf[slot] - prev) / total;
        Some((self.emissive_triangles[slot], pdf))
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::materials::diffuse::LambertianDiffuseMaterial;
    use crate::materials::emissive::AreaLightMaterial;
    use crate::math::constants::Vector3f;

    fn unit_triangle(z: Float) -> Triangle {
        Triangle::new(
            Vector3f::new(0.0, 0.0, z),
            Vector3f::new(1.0, 0.0, z),
            Vector3f::new(0.0, 1.0, z),
        )
    }

    fn wide_triangle(z: Float) -> Triangle {
        Triangle::new(
            Vector3f::new(0.0, 0.0, z),
            Vector3f::new(3.0, 0.0, z),
            Vector3f::new(0.0, 2.0, z),
        )
    }

    #[test]
    fn test_lookup_by_id() {
        let mut scene = Scene::new();
        let diffuse = Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.5, 0.5, 0.5)));
        let id0 = scene.add_triangle(unit_triangle(0.0), diffuse.clone());
        let id1 = scene.add_triangle(unit_triangle(1.0), diffuse);
        assert_eq!(id0, 0);
        assert_eq!(id1, 1);
        assert_eq!(scene.triangle(1).id(), 1);
        assert!(scene.emissive_triangles().is_empty());
        assert!(scene.sample_triangle_light_emission(0.5).is_none());
    }

    #[test]
    fn test_light_selection_is_power_proportional() {
        let mut scene = Scene::new();
        let diffuse = Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.5, 0.5, 0.5)));
        let light = Arc::new(AreaLightMaterial::new(Vector3f::new(1.0, 1.0, 1.0)));
        scene.add_triangle(unit_triangle(0.0), diffuse);
        let small = scene.add_triangle(unit_triangle(1.0), light.clone()); // area 0.5
        let big = scene.add_triangle(wide_triangle(2.0), light); // area 3.0

        // Powers 0.5 and 3.0: the split point sits at 1/7.
        let (id_lo, pdf_lo) = scene.sample_triangle_light_emission(0.1).unwrap();
        assert_eq!(id_lo, small);
        assert!((pdf_lo - 0.5 / 3.5).abs() < 1e-5);

        let (id_hi, pdf_hi) = scene.sample_triangle_light_emission(0.9).unwrap();
        assert_eq!(id_hi, big);
        assert!((pdf_hi - 3.0 / 3.5).abs() < 1e-5);

        assert!((pdf_lo + pdf_hi - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_light_selection_edge_values() {
        let mut scene = Scene::new();
        let light = Arc::new(AreaLightMaterial::new(Vector3f::new(1.0, 1.0, 1.0)));
        scene.add_triangle(unit_triangle(0.0), light.clone());
        scene.add_triangle(unit_triangle(1.0), light);
        // u at the extremes still resolves to a valid triangle.
        assert!(scene.sample_triangle_light_emission(0.0).is_some());
        let (id, _) = scene.sample_triangle_light_emission(0.9999999).unwrap();
        assert!(id <= 1);
    }
}
