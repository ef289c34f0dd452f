//! Embedded image resources.

use serde::{Deserialize, Serialize};

/// Raster formats the markup can declare for an image payload.
///
/// Only [`ImageType::Png`] is decoded; the others are recognised so that
/// diagnostics can name them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageType {
    /// Windows bitmap
    Bmp,
    /// GIF
    Gif,
    /// JPEG
    Jpeg,
    /// PNG
    Png,
    /// PCX
    Pcx,
    /// PNM
    Pnm,
    /// TIFF
    Tiff,
    /// XPM
    Xpm,
    /// Icon
    Ico,
}

impl ImageType {
    /// MIME type of the format.
    pub fn mime_type(&self) -> &'static str {
        match self {
            ImageType::Bmp => "image/bmp",
            ImageType::Gif => "image/gif",
            ImageType::Jpeg => "image/jpeg",
            ImageType::Png => "image/png",
            ImageType::Pcx => "image/x-pcx",
            ImageType::Pnm => "image/x-portable-anymap",
            ImageType::Tiff => "image/tiff",
            ImageType::Xpm => "image/x-xpixmap",
            ImageType::Ico => "image/x-icon",
        }
    }

    /// File extension of the format.
    pub fn extension(&self) -> &'static str {
        match self {
            ImageType::Bmp => "bmp",
            ImageType::Gif => "gif",
            ImageType::Jpeg => "jpg",
            ImageType::Png => "png",
            ImageType::Pcx => "pcx",
            ImageType::Pnm => "pnm",
            ImageType::Tiff => "tiff",
            ImageType::Xpm => "xpm",
            ImageType::Ico => "ico",
        }
    }
}

impl std::fmt::Display for ImageType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension().to_uppercase())
    }
}

/// A decoded image ready to be placed into a sink.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddedImage {
    /// Raw encoded image bytes
    #[serde(skip_serializing, default)]
    pub data: Vec<u8>,

    /// Encoded format of `data`
    pub image_type: ImageType,

    /// Width in pixels
    pub width: u32,

    /// Height in pixels
    pub height: u32,
}

impl EmbeddedImage {
    /// PNG file signature.
    pub const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    /// Create a PNG image resource.
    pub fn png(data: Vec<u8>, width: u32, height: u32) -> Self {
        Self {
            data,
            image_type: ImageType::Png,
            width,
            height,
        }
    }

    /// MIME type of the image data.
    pub fn mime_type(&self) -> &'static str {
        self.image_type.mime_type()
    }

    /// Get the size of the image data in bytes.
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Check whether the data carries the PNG signature.
    pub fn has_png_signature(&self) -> bool {
        self.data.starts_with(&Self::PNG_MAGIC)
    }

    /// Get a suggested filename based on the format and ID.
    pub fn suggested_filename(&self, id: &str) -> String {
        format!("{}.{}", id, self.image_type.extension())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_png_resource() {
        let mut data = EmbeddedImage::PNG_MAGIC.to_vec();
        data.extend_from_slice(&[0, 0, 0, 13]);
        let img = EmbeddedImage::png(data, 4, 3);
        assert!(img.has_png_signature());
        assert_eq!(img.mime_type(), "image/png");
        assert_eq!(img.size(), 12);
    }

    #[test]
    fn test_suggested_filename() {
        let img = EmbeddedImage::png(vec![], 1, 1);
        assert_eq!(img.suggested_filename("image-1"), "image-1.png");
    }

    #[test]
    fn test_image_type_display() {
        assert_eq!(ImageType::Jpeg.to_string(), "JPG");
        assert_eq!(ImageType::Png.to_string(), "PNG");
    }
}
