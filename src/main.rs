// Copyright 2020 TwoCookingMice

#![allow(dead_code)]

pub extern crate nalgebra as na;

mod core;
mod io;
mod integrators;
mod materials;
mod math;
mod media;
mod renderers;
mod sensors;
mod shapes;

use self::core::bsdf::SurfaceMaterial;
use self::core::camera::Camera;
use self::core::config::Config;
use self::core::geometry::{BruteForceGeometry, SceneGeometry};
use self::core::scene::Scene;
use self::io::exr_utils;
use self::materials::diffuse::LambertianDiffuseMaterial;
use self::materials::emissive::AreaLightMaterial;
use self::math::constants::Vector3f;
use self::renderers::renderer::create_renderer;
use self::sensors::pinhole::PinholeCamera;
use self::shapes::triangle::Triangle;

use indicatif::{ProgressBar, ProgressStyle};
use std::env;
use std::sync::Arc;

fn add_quad(
    scene: &mut Scene,
    p00: Vector3f,
    p10: Vector3f,
    p11: Vector3f,
    p01: Vector3f,
    material: Arc<dyn SurfaceMaterial>,
) {
    scene.add_triangle(Triangle::new(p00, p10, p11), material.clone());
    scene.add_triangle(Triangle::new(p00, p11, p01), material);
}

// Built-in Cornell-style box: diffuse walls, one ceiling light.
fn build_box_scene() -> (Arc<Scene>, Arc<dyn SceneGeometry>, Arc<dyn Camera>) {
    let mut scene = Scene::new();
    let white = Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.73, 0.73, 0.73)));
    let red = Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.65, 0.05, 0.05)));
    let green = Arc::new(LambertianDiffuseMaterial::new(Vector3f::new(0.12, 0.45, 0.15)));
    let light = Arc::new(AreaLightMaterial::new(Vector3f::new(15.0, 15.0, 15.0)));

    // Floor (normal +y).
    add_quad(
        &mut scene,
        Vector3f::new(-1.0, 0.0, -2.0),
        Vector3f::new(1.0, 0.0, -2.0),
        Vector3f::new(1.0, 0.0, 0.0),
        Vector3f::new(-1.0, 0.0, 0.0),
        white.clone(),
    );
    // Ceiling (normal -y).
    add_quad(
        &mut scene,
        Vector3f::new(-1.0, 2.0, -2.0),
        Vector3f::new(-1.0, 2.0, 0.0),
        Vector3f::new(1.0, 2.0, 0.0),
        Vector3f::new(1.0, 2.0, -2.0),
        white.clone(),
    );
    // Back wall (normal +z).
    add_quad(
        &mut scene,
        Vector3f::new(-1.0, 0.0, -2.0),
        Vector3f::new(-1.0, 2.0, -2.0),
        Vector3f::new(1.0, 2.0, -2.0),
        Vector3f::new(1.0, 0.0, -2.0),
        white,
    );
    // Left wall (normal +x).
    add_quad(
        &mut scene,
        Vector3f::new(-1.0, 0.0, -2.0),
        Vector3f::new(-1.0, 0.0, 0.0),
        Vector3f::new(-1.0, 2.0, 0.0),
        Vector3f::new(-1.0, 2.0, -2.0),
        red,
    );
    // Right wall (normal -x).
    add_quad(
        &mut scene,
        Vector3f::new(1.0, 0.0, -2.0),
        Vector3f::new(1.0, 2.0, -2.0),
        Vector3f::new(1.0, 2.0, 0.0),
        Vector3f::new(1.0, 0.0, 0.0),
        green,
    );
    // Ceiling light (normal -y), slightly below the ceiling.
    add_quad(
        &mut scene,
        Vector3f::new(-0.4, 1.98, -1.4),
        Vector3f::new(-0.4, 1.98, -0.6),
        Vector3f::new(0.4, 1.98, -0.6),
        Vector3f::new(0.4, 1.98, -1.4),
        light,
    );

    let scene = Arc::new(scene);
    let geometry: Arc<dyn SceneGeometry> = Arc::new(BruteForceGeometry::new(scene.clone()));
    let camera: Arc<dyn Camera> = Arc::new(PinholeCamera::new(
        Vector3f::new(0.0, 1.0, 2.8),
        Vector3f::new(0.0, 1.0, 0.0),
        Vector3f::new(0.0, 1.0, 0.0),
        0.7,
        1.0,
    ));
    (scene, geometry, camera)
}

fn main() {
    env::set_var("RUST_LOG", "info");
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 2 {
        eprintln!(
            "Usage: {} <output.exr> [--renderer pt|mcmcpt] [--size N] [--stages N] [--seed N] [--set KEY VALUE]",
            args[0]
        );
        std::process::exit(1);
    }

    let output_path = &args[1];
    let mut renderer_name = String::from("pt");
    let mut size: usize = 128;
    let mut stages: usize = 16;
    let mut config = Config::new();
    config.set("mutation_strength", 1.0);

    let mut i = 2;
    while i < args.len() {
        match args[i].as_str() {
            "--renderer" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    renderer_name = v.clone();
                }
            }
            "--size" => {
                i += 1;
                size = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(size);
            }
            "--stages" => {
                i += 1;
                stages = args.get(i).and_then(|v| v.parse::<usize>().ok()).unwrap_or(stages);
            }
            "--seed" => {
                i += 1;
                if let Some(v) = args.get(i) {
                    config.set("seed", v.clone());
                }
            }
            "--set" => {
                if let (Some(key), Some(value)) = (args.get(i + 1), args.get(i + 2)) {
                    config.set(key, value.clone());
                }
                i += 2;
            }
            _ => {}
        }
        i += 1;
    }

    let (scene, geometry, camera) = build_box_scene();
    let mut renderer =
        match create_renderer(&renderer_name, &config, scene, geometry, camera, size, size) {
            Ok(renderer) => renderer,
            Err(e) => {
                eprintln!("failed to initialize renderer: {}", e);
                std::process::exit(1);
            }
        };

    log::info!("rendering {}x{} with {} over {} stages", size, size, renderer_name, stages);
    let progress = ProgressBar::new(stages as u64);
    progress.set_style(
        ProgressStyle::with_template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} stages")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );
    for _ in 0..stages {
        renderer.render_stage();
        progress.inc(1);
    }
    progress.finish_and_clear();

    let image = renderer.get_output();
    exr_utils::write_exr_to_file(&image, output_path);
}
