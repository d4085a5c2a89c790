use serde::{Deserialize, Serialize};

use crate::annotate::error::AnnotatorError;
use crate::annotate::model::{
    Color, FontSpec, DEFAULT_COLOR, DEFAULT_FONT_FAMILY, DEFAULT_FONT_SIZE,
};
use crate::annotate::surface::DEFAULT_LINE_WIDTH;

/// User facing annotator configuration, stored as JSON.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnnotatorSettings {
    #[serde(default = "default_font_family")]
    pub font_family: String,
    #[serde(default = "default_font_size")]
    pub font_size: String,
    #[serde(default = "default_color")]
    pub color: String,
    /// Width the image is displayed at; `None` means natural size.
    #[serde(default)]
    pub display_width: Option<f32>,
    #[serde(default = "default_line_width")]
    pub line_width: f32,
}

impl Default for AnnotatorSettings {
    fn default() -> Self {
        Self {
            font_family: default_font_family(),
            font_size: default_font_size(),
            color: default_color(),
            display_width: None,
            line_width: default_line_width(),
        }
    }
}

impl AnnotatorSettings {
    pub fn load(path: &str) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path).unwrap_or_default();
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_json::from_str(&content)?)
    }

    pub fn save(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Parses the string fields into drawing values.
    pub fn style(&self) -> Result<Style, AnnotatorError> {
        let color = Color::from_hex(&self.color)?;
        let font = FontSpec::parse(&self.font_family, &self.font_size)?;
        let line_width = if self.line_width.is_finite() && self.line_width > 0.0 {
            self.line_width
        } else {
            tracing::warn!(
                "line width {} is not positive; using {}",
                self.line_width,
                DEFAULT_LINE_WIDTH
            );
            DEFAULT_LINE_WIDTH
        };
        Ok(Style {
            color,
            font,
            line_width,
        })
    }
}

/// Resolved drawing style applied to newly started commands.
#[derive(Debug, Clone, PartialEq)]
pub struct Style {
    pub color: Color,
    pub font: FontSpec,
    pub line_width: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            color: Color::DEFAULT_INK,
            font: FontSpec::default(),
            line_width: DEFAULT_LINE_WIDTH,
        }
    }
}

fn default_font_family() -> String {
    DEFAULT_FONT_FAMILY.to_string()
}

fn default_font_size() -> String {
    DEFAULT_FONT_SIZE.to_string()
}

fn default_color() -> String {
    DEFAULT_COLOR.to_string()
}

fn default_line_width() -> f32 {
    DEFAULT_LINE_WIDTH
}
