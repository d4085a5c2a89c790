use anyhow::{anyhow, bail, Context, Result};
use base64::{engine::general_purpose, Engine as _};
use image::RgbaImage;

/// Decodes an image source into an RGBA raster at its natural size.
///
/// `source` is either a `data:<mime>;base64,<payload>` URI or a filesystem path.
pub fn decode_source(source: &str) -> Result<RgbaImage> {
    if let Some(uri) = source.strip_prefix("data:") {
        return decode_data_uri(uri);
    }
    let image = image::open(source).with_context(|| format!("open image {source}"))?;
    Ok(image.to_rgba8())
}

fn decode_data_uri(uri: &str) -> Result<RgbaImage> {
    let (header, payload) = uri
        .split_once(',')
        .ok_or_else(|| anyhow!("data URI has no payload"))?;
    let Some(mime) = header.strip_suffix(";base64") else {
        bail!("data URI '{header}' is not base64 encoded");
    };
    let bytes = general_purpose::STANDARD
        .decode(payload.trim())
        .with_context(|| format!("decode base64 payload of {mime} data URI"))?;
    let image = image::load_from_memory(&bytes)
        .with_context(|| format!("decode {mime} image data"))?;
    Ok(image.to_rgba8())
}
