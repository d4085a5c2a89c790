use image::{Rgba, RgbaImage};

use crate::annotate::model::Color;
use crate::annotate::render::blend_pixel;

/// Flattens `overlay` onto a copy of `base`.
///
/// Both rasters must share dimensions; overlay pixels outside the base are
/// ignored. Fully transparent overlay pixels leave the base bit-identical.
pub fn composite_overlay(base: &RgbaImage, overlay: &RgbaImage) -> RgbaImage {
    if base.dimensions() != overlay.dimensions() {
        tracing::warn!(
            "overlay {:?} does not match image {:?}; compositing the overlapping area",
            overlay.dimensions(),
            base.dimensions()
        );
    }

    let mut output = base.clone();
    blend_in_place(&mut output, overlay);
    output
}

fn blend_in_place(base: &mut RgbaImage, top: &RgbaImage) {
    let (width, height) = top.dimensions();
    for (x, y, dst) in base.enumerate_pixels_mut() {
        if x >= width || y >= height {
            continue;
        }
        let src = top.get_pixel(x, y);
        if src[3] == 0 {
            continue;
        }
        let [r, g, b, a] = dst.0;
        let [sr, sg, sb, sa] = src.0;
        let blended = blend_pixel(Color::rgba(r, g, b, a), Color::rgba(sr, sg, sb, sa));
        *dst = Rgba(blended.to_rgba_array());
    }
}
