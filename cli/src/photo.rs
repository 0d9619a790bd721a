//! Loading ingredient photos from disk.

use std::path::Path;

use anyhow::{bail, Context, Result};
use image::ImageFormat;
use recipesnap_core::ImageInput;

/// Formats the vision model accepts.
pub const ALLOWED_FORMATS: &[ImageFormat] = &[
    ImageFormat::Jpeg,
    ImageFormat::Png,
    ImageFormat::Gif,
    ImageFormat::WebP,
];

/// Maximum photo size (10MB).
pub const MAX_FILE_SIZE: usize = 10 * 1024 * 1024;

/// Read a photo and work out its media type from its contents, or failing
/// that its extension.
pub fn load_photo(path: &Path) -> Result<ImageInput> {
    let data = std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;

    if data.len() > MAX_FILE_SIZE {
        bail!(
            "{} is too large ({} bytes, max {})",
            path.display(),
            data.len(),
            MAX_FILE_SIZE
        );
    }

    let format = image::guess_format(&data)
        .or_else(|_| ImageFormat::from_path(path))
        .with_context(|| format!("Could not detect image format of {}", path.display()))?;

    if !ALLOWED_FORMATS.contains(&format) {
        bail!(
            "Unsupported image format: {:?}. Allowed: JPEG, PNG, GIF, WebP",
            format
        );
    }

    let image = ImageInput::new(data, format.to_mime_type())?;
    tracing::debug!(
        path = %path.display(),
        media_type = image.media_type(),
        image = %image.id().short(),
        "Loaded photo"
    );
    Ok(image)
}
