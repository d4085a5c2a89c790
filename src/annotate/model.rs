use std::fmt;
use std::ops::{Div, Mul, Sub};
use std::str::FromStr;

use crate::annotate::error::AnnotatorError;

pub const DEFAULT_FONT_FAMILY: &str = "Georgia";
pub const DEFAULT_FONT_SIZE: &str = "15px";
pub const DEFAULT_COLOR: &str = "#1218CE";

/// A position in canvas (image) space unless stated otherwise.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, rhs: Point) -> Point {
        Point::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Point {
    type Output = Point;

    fn mul(self, rhs: f32) -> Point {
        Point::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f32> for Point {
    type Output = Point;

    fn div(self, rhs: f32) -> Point {
        Point::new(self.x / rhs, self.y / rhs)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// `DEFAULT_COLOR` as a value.
    pub const DEFAULT_INK: Self = Self::rgba(0x12, 0x18, 0xCE, 255);

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn to_rgba_array(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Parses `#RGB`, `#RRGGBB` or `#RRGGBBAA`.
    pub fn from_hex(value: &str) -> Result<Self, AnnotatorError> {
        let invalid = || AnnotatorError::InvalidColor(value.to_owned());
        let digits = value.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !digits.is_ascii() {
            return Err(invalid());
        }
        let channel = |s: &str| u8::from_str_radix(s, 16).map_err(|_| invalid());

        match digits.len() {
            3 => {
                let mut out = [0u8; 3];
                for (slot, ch) in out.iter_mut().zip(digits.chars()) {
                    let nibble = ch.to_digit(16).ok_or_else(invalid)? as u8;
                    *slot = nibble * 17;
                }
                Ok(Self::rgba(out[0], out[1], out[2], 255))
            }
            6 => Ok(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                255,
            )),
            8 => Ok(Self::rgba(
                channel(&digits[0..2])?,
                channel(&digits[2..4])?,
                channel(&digits[4..6])?,
                channel(&digits[6..8])?,
            )),
            _ => Err(invalid()),
        }
    }
}

impl FromStr for Color {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

/// Font size in pixels, parsed from a CSS-like `"15px"` / `"12pt"` string.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSize(pub f32);

impl FontSize {
    pub fn px(self) -> f32 {
        self.0
    }
}

impl FromStr for FontSize {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AnnotatorError::InvalidFontSize(s.to_owned());
        let trimmed = s.trim();
        let (number, scale) = if let Some(n) = trimmed.strip_suffix("px") {
            (n, 1.0)
        } else if let Some(n) = trimmed.strip_suffix("pt") {
            (n, 4.0 / 3.0)
        } else {
            (trimmed, 1.0)
        };
        let value: f32 = number.trim().parse().map_err(|_| invalid())?;
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid());
        }
        Ok(FontSize(value * scale))
    }
}

/// Font descriptor: family plus size.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub family: String,
    pub size: FontSize,
}

impl FontSpec {
    pub fn new(family: impl Into<String>, size: FontSize) -> Self {
        Self {
            family: family.into(),
            size,
        }
    }

    pub fn parse(family: &str, size: &str) -> Result<Self, AnnotatorError> {
        Ok(Self::new(family, size.parse()?))
    }

    /// The same face at `factor` times the size.
    pub fn scaled(&self, factor: f32) -> Self {
        Self::new(self.family.clone(), FontSize(self.size.px() * factor))
    }
}

impl Default for FontSpec {
    fn default() -> Self {
        Self::new(DEFAULT_FONT_FAMILY, FontSize(15.0))
    }
}

impl fmt::Display for FontSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}px {}", self.size.px(), self.family)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolKind {
    Pencil,
    Text,
}

impl ToolKind {
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Pencil => "pencil",
            ToolKind::Text => "text",
        }
    }
}

impl FromStr for ToolKind {
    type Err = AnnotatorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "pencil" => Ok(ToolKind::Pencil),
            "text" => Ok(ToolKind::Text),
            other => Err(AnnotatorError::UnknownTool(other.to_owned())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_default_color() {
        assert_eq!(
            Color::from_hex(DEFAULT_COLOR).unwrap(),
            Color::rgba(0x12, 0x18, 0xce, 255)
        );
    }

    #[test]
    fn parses_short_and_alpha_hex() {
        assert_eq!(Color::from_hex("#fa0").unwrap(), Color::rgba(255, 170, 0, 255));
        assert_eq!(
            Color::from_hex("#01020380").unwrap(),
            Color::rgba(1, 2, 3, 128)
        );
    }

    #[test]
    fn rejects_malformed_colors() {
        for bad in ["1218CE", "#12", "#zzzzzz", "#1218CE0", ""] {
            assert!(
                matches!(Color::from_hex(bad), Err(AnnotatorError::InvalidColor(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn font_size_units() {
        assert_eq!("15px".parse::<FontSize>().unwrap(), FontSize(15.0));
        assert_eq!("12pt".parse::<FontSize>().unwrap(), FontSize(16.0));
        assert_eq!(" 20 ".parse::<FontSize>().unwrap(), FontSize(20.0));
        assert!("big".parse::<FontSize>().is_err());
        assert!("-3px".parse::<FontSize>().is_err());
    }

    #[test]
    fn tool_names() {
        assert_eq!("pencil".parse::<ToolKind>().unwrap(), ToolKind::Pencil);
        assert_eq!("text".parse::<ToolKind>().unwrap(), ToolKind::Text);
        assert!(matches!(
            "eraser".parse::<ToolKind>(),
            Err(AnnotatorError::UnknownTool(name)) if name == "eraser"
        ));
    }

    #[test]
    fn font_spec_display_matches_css_shorthand() {
        let font = FontSpec::parse("Georgia", "15px").unwrap();
        assert_eq!(font.to_string(), "15px Georgia");
        assert_eq!(font.scaled(2.0).size, FontSize(30.0));
    }
}
