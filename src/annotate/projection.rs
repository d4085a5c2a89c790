use crate::annotate::model::Point;

/// Ratio of image pixels to display pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    factor: f32,
}

impl Default for Projection {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Projection {
    pub const IDENTITY: Self = Self { factor: 1.0 };

    pub fn new(factor: f32) -> Self {
        if factor.is_finite() && factor > 0.0 {
            Self { factor }
        } else {
            tracing::warn!("ignoring invalid projection factor {factor}; using 1.0");
            Self::IDENTITY
        }
    }

    /// Derives the factor for an image of `natural` size shown `display_width`
    /// pixels wide. The aspect ratio is preserved, so the height ratio equals
    /// the width ratio.
    pub fn for_image(natural: (u32, u32), display_width: Option<f32>) -> Self {
        let (natural_width, natural_height) = natural;
        let Some(display_width) = display_width else {
            return Self::IDENTITY;
        };
        if natural_width == 0 || natural_height == 0 {
            return Self::IDENTITY;
        }
        if !display_width.is_finite() || display_width <= 0.0 {
            tracing::warn!("ignoring display width {display_width}; drawing at natural size");
            return Self::IDENTITY;
        }
        if display_width == natural_width as f32 {
            return Self::IDENTITY;
        }

        let display_height = display_width * natural_height as f32 / natural_width as f32;
        Self::new(natural_height as f32 / display_height)
    }

    pub fn factor(self) -> f32 {
        self.factor
    }

    /// Maps a display-space point relative to `canvas_origin` into canvas space.
    pub fn to_canvas(self, display: Point, canvas_origin: Point) -> Point {
        (display - canvas_origin) * self.factor
    }

    /// Maps a canvas-space point back to display space, relative to the canvas origin.
    pub fn to_display(self, canvas: Point) -> Point {
        canvas / self.factor
    }
}
