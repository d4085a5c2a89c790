use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use image::{DynamicImage, ImageOutputFormat, RgbaImage};

use crate::annotate::error::AnnotatorError;

pub const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    #[default]
    Png,
    Jpeg,
}

impl ExportFormat {
    /// Maps a mime type onto a supported format. Anything unsupported falls back to PNG.
    pub fn from_mime(mime: &str) -> Self {
        match mime.trim().to_ascii_lowercase().as_str() {
            "image/png" => ExportFormat::Png,
            "image/jpeg" | "image/jpg" => ExportFormat::Jpeg,
            other => {
                tracing::warn!("unsupported export type '{other}'; encoding as image/png");
                ExportFormat::Png
            }
        }
    }

    pub fn mime(self) -> &'static str {
        match self {
            ExportFormat::Png => "image/png",
            ExportFormat::Jpeg => "image/jpeg",
        }
    }
}

/// Encodes `raster` in `format`. JPEG drops the alpha channel.
pub fn encode(raster: &RgbaImage, format: ExportFormat) -> Result<Vec<u8>, AnnotatorError> {
    let image = DynamicImage::ImageRgba8(raster.clone());
    let mut bytes = Vec::new();
    let result = match format {
        ExportFormat::Png => image.write_to(&mut Cursor::new(&mut bytes), ImageOutputFormat::Png),
        ExportFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8()).write_to(
            &mut Cursor::new(&mut bytes),
            ImageOutputFormat::Jpeg(JPEG_QUALITY),
        ),
    };
    result.map_err(|err| AnnotatorError::Encode(err.to_string()))?;
    Ok(bytes)
}

/// Encodes `raster` as a `data:<mime>;base64,...` URI.
pub fn to_data_uri(raster: &RgbaImage, format: ExportFormat) -> Result<String, AnnotatorError> {
    let bytes = encode(raster, format)?;
    Ok(format!(
        "data:{};base64,{}",
        format.mime(),
        general_purpose::STANDARD.encode(bytes)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    #[test]
    fn mime_mapping_falls_back_to_png() {
        assert_eq!(ExportFormat::from_mime("image/png"), ExportFormat::Png);
        assert_eq!(ExportFormat::from_mime("image/jpeg"), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_mime("IMAGE/JPG"), ExportFormat::Jpeg);
        assert_eq!(ExportFormat::from_mime("image/webp"), ExportFormat::Png);
    }

    #[test]
    fn png_data_uri_decodes_back_to_raster() {
        let mut raster = RgbaImage::from_pixel(5, 4, Rgba([1, 2, 3, 255]));
        raster.put_pixel(2, 2, Rgba([9, 8, 7, 100]));

        let uri = to_data_uri(&raster, ExportFormat::Png).unwrap();
        let payload = uri.strip_prefix("data:image/png;base64,").unwrap();
        let bytes = general_purpose::STANDARD.decode(payload).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(decoded, raster);
    }

    #[test]
    fn jpeg_export_keeps_dimensions() {
        let raster = RgbaImage::from_pixel(16, 8, Rgba([200, 10, 10, 255]));
        let bytes = encode(&raster, ExportFormat::Jpeg).unwrap();
        let decoded = image::load_from_memory(&bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (16, 8));
    }
}
