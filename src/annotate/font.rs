use ab_glyph::{Font, FontArc, ScaleFont};
use eframe::egui;
use once_cell::sync::Lazy;

const MONOSPACE_FAMILIES: &[&str] = &[
    "monospace",
    "courier",
    "courier new",
    "consolas",
    "menlo",
    "monaco",
];

/// A rasterizable font face taken from the bundled egui font set.
#[derive(Clone)]
pub struct Face {
    font: FontArc,
    scale: f32,
    y_offset_factor: f32,
    y_offset: f32,
}

impl std::fmt::Debug for Face {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Face")
            .field("scale", &self.scale)
            .field("y_offset_factor", &self.y_offset_factor)
            .field("y_offset", &self.y_offset)
            .finish_non_exhaustive()
    }
}

impl Face {
    pub fn font(&self) -> &FontArc {
        &self.font
    }

    /// Pixel scale to rasterize at for a nominal `size_px`.
    pub fn px_scale(&self, size_px: f32) -> f32 {
        size_px * self.scale
    }

    pub fn ascent(&self, size_px: f32) -> f32 {
        self.font.as_scaled(self.px_scale(size_px)).ascent()
            + self.y_offset_factor * size_px
            + self.y_offset
    }

    /// Distance between consecutive baselines.
    pub fn line_height(&self, size_px: f32) -> f32 {
        let scaled = self.font.as_scaled(self.px_scale(size_px));
        scaled.ascent() - scaled.descent() + scaled.line_gap()
    }
}

struct Faces {
    proportional: Option<Face>,
    monospace: Option<Face>,
}

static FACES: Lazy<Faces> = Lazy::new(|| {
    let definitions = egui::FontDefinitions::default();
    Faces {
        proportional: load_family(&definitions, &egui::FontFamily::Proportional),
        monospace: load_family(&definitions, &egui::FontFamily::Monospace),
    }
});

fn load_family(definitions: &egui::FontDefinitions, family: &egui::FontFamily) -> Option<Face> {
    let name = definitions.families.get(family)?.first()?;
    let data = definitions.font_data.get(name)?;
    let font = match &data.font {
        std::borrow::Cow::Borrowed(bytes) => {
            ab_glyph::FontRef::try_from_slice_and_index(*bytes, data.index)
                .map(FontArc::from)
                .ok()
        }
        std::borrow::Cow::Owned(bytes) => {
            ab_glyph::FontVec::try_from_vec_and_index(bytes.clone(), data.index)
                .map(FontArc::from)
                .ok()
        }
    };
    if font.is_none() {
        tracing::error!("bundled font '{name}' could not be parsed");
    }
    Some(Face {
        font: font?,
        scale: data.tweak.scale,
        y_offset_factor: data.tweak.y_offset_factor,
        y_offset: data.tweak.y_offset,
    })
}

fn is_monospace(family: &str) -> bool {
    family.split(',').any(|candidate| {
        let candidate = candidate.trim().trim_matches(|c| c == '"' || c == '\'');
        MONOSPACE_FAMILIES
            .iter()
            .any(|known| candidate.eq_ignore_ascii_case(known))
    })
}

/// Resolves a CSS-style family name onto one of the bundled faces.
pub fn face_for_family(family: &str) -> Option<&'static Face> {
    let faces = &*FACES;
    if is_monospace(family) {
        faces.monospace.as_ref().or(faces.proportional.as_ref())
    } else {
        faces.proportional.as_ref()
    }
}

/// Rendered line height for `family` at `size_px`, in the same units as `size_px`.
pub fn line_height(family: &str, size_px: f32) -> f32 {
    match face_for_family(family) {
        Some(face) => face.line_height(size_px),
        None => size_px * 1.2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn monospace_aliases_are_recognised() {
        assert!(is_monospace("monospace"));
        assert!(is_monospace("'Courier New', serif"));
        assert!(!is_monospace("Georgia"));
    }

    #[test]
    fn bundled_faces_are_available() {
        assert!(face_for_family("Georgia").is_some());
        assert!(face_for_family("monospace").is_some());
    }

    #[test]
    fn line_height_scales_with_size() {
        let small = line_height("Georgia", 15.0);
        let large = line_height("Georgia", 30.0);
        assert!(small > 10.0, "line height {small} too small for 15px");
        assert!((large - small * 2.0).abs() < 0.01);
    }
}
