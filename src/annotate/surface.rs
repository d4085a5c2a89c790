use image::RgbaImage;

use crate::annotate::font::face_for_family;
use crate::annotate::model::{Color, FontSpec, Point};
use crate::annotate::render::{self, PixelRect};

pub const DEFAULT_LINE_WIDTH: f32 = 2.0;

/// A 2D raster canvas that draw commands replay onto.
///
/// Styling is ambient, like a canvas 2D context: commands set the state they
/// need between `save` and `restore`.
pub trait Surface {
    fn width(&self) -> u32;
    fn height(&self) -> u32;

    /// Pushes a copy of the current drawing state.
    fn save(&mut self);
    /// Pops back to the most recently saved drawing state. Unbalanced calls are ignored.
    fn restore(&mut self);

    fn set_stroke_color(&mut self, color: Color);
    fn set_fill_color(&mut self, color: Color);
    fn set_font(&mut self, font: &FontSpec);
    fn set_line_width(&mut self, width: f32);

    fn stroke_segment(&mut self, from: Point, to: Point);
    /// Fills `text` with its line box's top-left corner at `at` (hanging baseline).
    fn fill_text(&mut self, text: &str, at: Point);
    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32);
}

#[derive(Debug, Clone, PartialEq)]
pub struct DrawState {
    pub stroke: Color,
    pub fill: Color,
    pub font: FontSpec,
    pub line_width: f32,
}

impl Default for DrawState {
    fn default() -> Self {
        Self {
            stroke: Color::BLACK,
            fill: Color::BLACK,
            font: FontSpec::default(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

/// The overlay layer: a transparent RGBA raster plus a canvas-style state stack.
#[derive(Debug, Clone)]
pub struct RasterSurface {
    pixels: RgbaImage,
    state: DrawState,
    saved: Vec<DrawState>,
}

impl RasterSurface {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            pixels: RgbaImage::new(width, height),
            state: DrawState::default(),
            saved: Vec::new(),
        }
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }

    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// Wipes every pixel without touching the drawing state.
    pub fn clear(&mut self) {
        for px in self.pixels.pixels_mut() {
            px.0 = [0, 0, 0, 0];
        }
    }

    pub fn is_blank(&self) -> bool {
        self.pixels.pixels().all(|px| px.0[3] == 0)
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> u32 {
        self.pixels.width()
    }

    fn height(&self) -> u32 {
        self.pixels.height()
    }

    fn save(&mut self) {
        self.saved.push(self.state.clone());
    }

    fn restore(&mut self) {
        if let Some(state) = self.saved.pop() {
            self.state = state;
        }
    }

    fn set_stroke_color(&mut self, color: Color) {
        self.state.stroke = color;
    }

    fn set_fill_color(&mut self, color: Color) {
        self.state.fill = color;
    }

    fn set_font(&mut self, font: &FontSpec) {
        self.state.font = font.clone();
    }

    fn set_line_width(&mut self, width: f32) {
        if width.is_finite() && width > 0.0 {
            self.state.line_width = width;
        }
    }

    fn stroke_segment(&mut self, from: Point, to: Point) {
        render::draw_segment(
            &mut self.pixels,
            from,
            to,
            self.state.stroke,
            self.state.line_width,
        );
    }

    fn fill_text(&mut self, text: &str, at: Point) {
        let Some(face) = face_for_family(&self.state.font.family) else {
            tracing::warn!("no font face available; skipping text '{text}'");
            return;
        };
        render::draw_text(
            &mut self.pixels,
            face,
            self.state.font.size.px(),
            at,
            text,
            self.state.fill,
        );
    }

    fn clear_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let rect = PixelRect {
            x: x.floor() as i32,
            y: y.floor() as i32,
            width: width.ceil().max(0.0) as i32,
            height: height.ceil().max(0.0) as i32,
        };
        render::clear_rect(&mut self.pixels, rect);
    }
}
