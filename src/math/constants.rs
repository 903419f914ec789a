/* Copyright 2020 @Yuchen Wong */

use nalgebra as na;

pub type Float = f32;
pub type Int = i32;
pub type UInt = u32;

pub type Vector2f = na::Vector2<Float>;
pub type Vector3f = na::Vector3<Float>;

pub const EPSILON: Float = 1e-4;
pub const PI: Float = 3.14159265359;
pub const INV_PI: Float = 0.31830988618;

// Offset applied along the outgoing direction when a ray respawns at a
// surface or medium event.
pub const RAY_ORIGIN_OFFSET: Float = 1e-5;

// A sampled pdf below this is degenerate and ends the path.
pub const PDF_FLOOR: Float = 1e-20;

// Image-plane coordinates are clamped to [0, 1 - PIXEL_COORD_EPS] before
// the pixel index is derived.
pub const PIXEL_COORD_EPS: Float = 1e-7;
