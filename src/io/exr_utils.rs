/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

// Write a rendered image to an OpenEXR file.
pub fn write_exr_to_file(bitmap: &Bitmap, file_path: &str) {
    log::info!(
        "Writing OpenEXR image ({}x{}) to: {}.",
        bitmap.width(),
        bitmap.height(),
        file_path
    );

    write_rgb_file(file_path, bitmap.width(), bitmap.height(), |x, y| {
        let c = bitmap[(x, y)];
        (c.x, c.y, c.z)
    })
    .unwrap_or_else(|e| panic!("failed to write {}: {}", file_path, e));
}
