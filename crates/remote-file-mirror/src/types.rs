//! Image format detection

use image::ImageFormat;

/// Image formats the mirror will store locally.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageKind {
    Jpeg,
    Png,
    Gif,
}

impl ImageKind {
    /// All storable kinds, in probe order.
    pub const ALL: [ImageKind; 3] = [ImageKind::Jpeg, ImageKind::Png, ImageKind::Gif];

    /// File extension for the local copy, including the leading dot.
    pub fn ext(&self) -> &'static str {
        match self {
            ImageKind::Jpeg => ".jpg",
            ImageKind::Png => ".png",
            ImageKind::Gif => ".gif",
        }
    }

    /// Identify the image format from header bytes. Formats other than
    /// JPEG, PNG, and GIF are rejected.
    pub fn sniff(bytes: &[u8]) -> Option<ImageKind> {
        match image::guess_format(bytes) {
            Ok(ImageFormat::Jpeg) => Some(ImageKind::Jpeg),
            Ok(ImageFormat::Png) => Some(ImageKind::Png),
            Ok(ImageFormat::Gif) => Some(ImageKind::Gif),
            _ => None,
        }
    }
}
