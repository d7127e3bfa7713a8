//! Reading file content: image sniffing and the text/data-URL split.

use base64::prelude::*;
use serde::Serialize;

/// The reply payload of a `read` operation.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadOutput {
    /// Raw text, or a `data:` URL for sniffed images.
    pub content: String,
    pub is_image: bool,
}

impl ReadOutput {
    /// Classify raw bytes: known image signatures become a base64
    /// data URL, everything else is returned as (lossy) UTF-8 text.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        if let Some(mime) = sniff_image(bytes) {
            return Self {
                content: format!("data:{mime};base64,{}", BASE64_STANDARD.encode(bytes)),
                is_image: true,
            };
        }
        Self {
            content: String::from_utf8_lossy(bytes).into_owned(),
            is_image: false,
        }
    }
}

/// Detect common image formats by their magic bytes.
fn sniff_image(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        Some("image/png")
    } else if bytes.starts_with(b"\xff\xd8\xff") {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        Some("image/gif")
    } else if bytes.starts_with(b"BM") && bytes.len() > 14 {
        Some("image/bmp")
    } else if bytes.len() > 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}
