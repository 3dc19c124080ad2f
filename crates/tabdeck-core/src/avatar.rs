//! Avatar import — image file to inline `data:` URI.

use std::path::Path;

use anyhow::{Context, Result};
use base64::Engine;

const IMAGE_TYPES: &[(&str, &str)] = &[
    ("png", "image/png"),
    ("jpg", "image/jpeg"),
    ("jpeg", "image/jpeg"),
    ("gif", "image/gif"),
    ("webp", "image/webp"),
    ("bmp", "image/bmp"),
    ("svg", "image/svg+xml"),
];

fn mime_for(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    IMAGE_TYPES
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, mime)| *mime)
}

/// Encode raw image bytes as a data URI.
pub fn to_data_uri(mime: &str, bytes: &[u8]) -> String {
    let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
    format!("data:{};base64,{}", mime, payload)
}

/// Read an image file and return it as a data URI.
pub fn encode_avatar(path: &Path) -> Result<String> {
    let mime = mime_for(path)
        .with_context(|| format!("Not a supported image type: {}", path.display()))?;
    let bytes = std::fs::read(path)
        .with_context(|| format!("Failed to read avatar: {}", path.display()))?;
    Ok(to_data_uri(mime, &bytes))
}
