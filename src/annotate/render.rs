use ab_glyph::{point, Font, ScaleFont};
use image::{Rgba, RgbaImage};

use crate::annotate::font::Face;
use crate::annotate::model::{Color, Point};

/// Integer pixel rectangle used to bound raster work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Coordinates are pinned to this range before conversion so rect spans fit in `i32`.
const COORD_LIMIT: f32 = (1u32 << 29) as f32;

fn to_pixel(value: f32) -> i32 {
    value.clamp(-COORD_LIMIT, COORD_LIMIT) as i32
}

impl PixelRect {
    pub fn from_points(a: Point, b: Point, pad: f32) -> Self {
        let min_x = to_pixel((a.x.min(b.x) - pad).floor());
        let min_y = to_pixel((a.y.min(b.y) - pad).floor());
        let max_x = to_pixel((a.x.max(b.x) + pad).ceil());
        let max_y = to_pixel((a.y.max(b.y) + pad).ceil());
        Self {
            x: min_x,
            y: min_y,
            width: max_x.saturating_sub(min_x).saturating_add(1).max(1),
            height: max_y.saturating_sub(min_y).saturating_add(1).max(1),
        }
    }

    pub fn clamp(self, width: u32, height: u32) -> Option<PixelRect> {
        let max_w = width as i32;
        let max_h = height as i32;
        let x0 = self.x.clamp(0, max_w);
        let y0 = self.y.clamp(0, max_h);
        let x1 = self.x.saturating_add(self.width).clamp(0, max_w);
        let y1 = self.y.saturating_add(self.height).clamp(0, max_h);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some(PixelRect {
            x: x0,
            y: y0,
            width: x1 - x0,
            height: y1 - y0,
        })
    }
}

/// Source-over blend of `top` onto `bottom` (both straight alpha).
pub fn blend_pixel(bottom: Color, top: Color) -> Color {
    if top.a == 255 {
        return top;
    }
    if top.a == 0 {
        return bottom;
    }

    let sa = top.a as f32 / 255.0;
    let da = bottom.a as f32 / 255.0;
    let out_a = sa + da * (1.0 - sa);

    if out_a <= f32::EPSILON {
        return Color::TRANSPARENT;
    }

    let blend = |s: u8, d: u8| -> u8 {
        (((s as f32 * sa) + (d as f32 * da * (1.0 - sa))) / out_a)
            .round()
            .clamp(0.0, 255.0) as u8
    };

    Color {
        r: blend(top.r, bottom.r),
        g: blend(top.g, bottom.g),
        b: blend(top.b, bottom.b),
        a: (out_a * 255.0).round().clamp(0.0, 255.0) as u8,
    }
}

fn color_at(img: &RgbaImage, x: u32, y: u32) -> Color {
    let [r, g, b, a] = img.get_pixel(x, y).0;
    Color::rgba(r, g, b, a)
}

pub fn blend_into(img: &mut RgbaImage, x: i32, y: i32, color: Color) {
    if x < 0 || y < 0 || x >= img.width() as i32 || y >= img.height() as i32 {
        return;
    }
    let (x, y) = (x as u32, y as u32);
    let blended = blend_pixel(color_at(img, x, y), color);
    img.put_pixel(x, y, Rgba(blended.to_rgba_array()));
}

// f64 keeps pixel precision when an endpoint lies far off the image.
fn point_segment_distance_sq(p: Point, start: Point, end: Point) -> f32 {
    let (px, py) = (p.x as f64, p.y as f64);
    let (sx, sy) = (start.x as f64, start.y as f64);
    let (vx, vy) = (end.x as f64 - sx, end.y as f64 - sy);
    let len_sq = vx * vx + vy * vy;
    let t = if len_sq <= f64::EPSILON {
        0.0
    } else {
        (((px - sx) * vx + (py - sy) * vy) / len_sq).clamp(0.0, 1.0)
    };
    let (dx, dy) = (px - (sx + vx * t), py - (sy + vy * t));
    (dx * dx + dy * dy) as f32
}

/// Rasterizes a round-capped segment `line_width` pixels wide. Pixels are
/// covered when their centre lies within half the width of the segment.
pub fn draw_segment(img: &mut RgbaImage, start: Point, end: Point, color: Color, line_width: f32) {
    let radius = (line_width * 0.5).max(0.5);
    let Some(bounds) =
        PixelRect::from_points(start, end, radius + 1.0).clamp(img.width(), img.height())
    else {
        return;
    };

    let radius_sq = radius * radius;
    for y in bounds.y..(bounds.y + bounds.height) {
        for x in bounds.x..(bounds.x + bounds.width) {
            let centre = Point::new(x as f32 + 0.5, y as f32 + 0.5);
            if point_segment_distance_sq(centre, start, end) <= radius_sq {
                blend_into(img, x, y, color);
            }
        }
    }
}

/// Fills one line of text whose line box starts at `top_left`.
pub fn draw_text(
    img: &mut RgbaImage,
    face: &Face,
    size_px: f32,
    top_left: Point,
    text: &str,
    color: Color,
) {
    if text.is_empty() {
        return;
    }
    let scaled = face.font().as_scaled(face.px_scale(size_px));
    let mut caret = point(top_left.x, top_left.y + face.ascent(size_px));
    let mut previous = None;
    for ch in text.chars() {
        let mut glyph = scaled.scaled_glyph(ch);
        if let Some(previous) = previous {
            caret.x += scaled.kern(previous, glyph.id);
        }
        previous = Some(glyph.id);
        glyph.position = caret;
        caret.x += scaled.h_advance(glyph.id);
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            let bounds = outlined.px_bounds();
            outlined.draw(|x, y, coverage| {
                let px = x as i32 + bounds.min.x as i32;
                let py = y as i32 + bounds.min.y as i32;
                let alpha = (color.a as f32 * coverage).round().clamp(0.0, 255.0) as u8;
                if alpha > 0 {
                    blend_into(img, px, py, Color { a: alpha, ..color });
                }
            });
        }
    }
}

/// Resets a rectangle to fully transparent pixels.
pub fn clear_rect(img: &mut RgbaImage, rect: PixelRect) {
    let Some(rect) = rect.clamp(img.width(), img.height()) else {
        return;
    };
    for y in rect.y..(rect.y + rect.height) {
        for x in rect.x..(rect.x + rect.width) {
            img.put_pixel(x as u32, y as u32, Rgba([0, 0, 0, 0]));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annotate::font::face_for_family;

    fn painted(img: &RgbaImage) -> usize {
        img.pixels().filter(|px| px.0[3] != 0).count()
    }

    #[test]
    fn opaque_blend_replaces_and_transparent_blend_keeps() {
        let bottom = Color::rgba(10, 20, 30, 255);
        assert_eq!(blend_pixel(bottom, Color::rgba(1, 2, 3, 255)), Color::rgba(1, 2, 3, 255));
        assert_eq!(blend_pixel(bottom, Color::rgba(1, 2, 3, 0)), bottom);
    }

    #[test]
    fn half_alpha_blends_expected_pixel() {
        let out = blend_pixel(Color::rgba(100, 100, 100, 255), Color::rgba(200, 0, 0, 128));
        assert_eq!(out, Color::rgba(150, 50, 50, 255));
    }

    #[test]
    fn segment_covers_its_endpoints_and_nothing_far_away() {
        let mut img = RgbaImage::new(32, 32);
        let red = Color::rgba(255, 0, 0, 255);
        draw_segment(&mut img, Point::new(4.0, 4.0), Point::new(20.0, 20.0), red, 2.0);

        assert_eq!(img.get_pixel(4, 4).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(12, 12).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(19, 19).0, [255, 0, 0, 255]);
        assert_eq!(img.get_pixel(28, 4).0[3], 0);
    }

    #[test]
    fn segment_clips_at_edges() {
        let mut img = RgbaImage::new(8, 8);
        draw_segment(
            &mut img,
            Point::new(-20.0, 4.0),
            Point::new(40.0, 4.0),
            Color::BLACK,
            2.0,
        );
        assert!(painted(&img) >= 8);
    }

    #[test]
    fn far_off_segment_endpoints_do_not_overflow() {
        let mut img = RgbaImage::new(16, 16);
        draw_segment(
            &mut img,
            Point::new(-3.0e9, 4.0),
            Point::new(3.0e9, 4.0),
            Color::BLACK,
            2.0,
        );
        assert_eq!(img.get_pixel(8, 4).0, [0, 0, 0, 255]);

        let rect = PixelRect::from_points(Point::new(-3.0e9, -3.0e9), Point::new(3.0e9, 3.0e9), 1.0);
        assert_eq!(
            rect.clamp(16, 16),
            Some(PixelRect {
                x: 0,
                y: 0,
                width: 16,
                height: 16
            })
        );
    }

    #[test]
    fn text_paints_glyph_pixels_below_top_left() {
        let face = face_for_family("Georgia").expect("bundled face");
        let mut img = RgbaImage::new(64, 32);
        draw_text(&mut img, face, 15.0, Point::new(2.0, 2.0), "Hi", Color::BLACK);

        assert!(painted(&img) > 0);
        assert!(img
            .enumerate_pixels()
            .filter(|(_, _, px)| px.0[3] != 0)
            .all(|(_, y, _)| y >= 2));
    }

    #[test]
    fn clear_rect_resets_to_transparent() {
        let mut img = RgbaImage::from_pixel(4, 4, Rgba([9, 9, 9, 255]));
        clear_rect(
            &mut img,
            PixelRect {
                x: 0,
                y: 0,
                width: 2,
                height: 4,
            },
        );
        assert_eq!(img.get_pixel(1, 3).0, [0, 0, 0, 0]);
        assert_eq!(img.get_pixel(2, 0).0, [9, 9, 9, 255]);
    }
}
