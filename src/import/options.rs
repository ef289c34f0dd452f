//! Import options and configuration.

use serde::{Deserialize, Serialize};

use crate::model::FontStyle;

/// Offsets added to every emitted left/right indent and tab stop.
///
/// This lets a fragment written for one page geometry be placed into a
/// document with different page margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditionalMargins {
    /// Added to left indents and tab stops
    pub left: i32,

    /// Added to right indents
    pub right: i32,
}

impl AdditionalMargins {
    /// Create a margin pair.
    pub fn new(left: i32, right: i32) -> Self {
        Self { left, right }
    }
}

/// Text encoding of the markup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TextEncoding {
    /// UTF-8
    #[default]
    Utf8,
}

impl TextEncoding {
    /// Check whether an encoding label from an XML declaration names this
    /// encoding.
    pub fn matches_label(&self, label: &str) -> bool {
        match self {
            TextEncoding::Utf8 => {
                let label = label.trim().to_ascii_lowercase();
                label == "utf-8" || label == "utf8"
            }
        }
    }
}

/// Options for importing a fragment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOptions {
    /// Margin offsets applied to emitted paragraph geometry
    pub margins: AdditionalMargins,

    /// Style a root layout inherits from
    pub default_font: FontStyle,

    /// Declared text encoding
    pub encoding: TextEncoding,

    /// Text written in place of an image that cannot be decoded
    pub image_placeholder: String,
}

impl ImportOptions {
    /// Create new import options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set margin offsets.
    pub fn with_margins(mut self, left: i32, right: i32) -> Self {
        self.margins = AdditionalMargins::new(left, right);
        self
    }

    /// Set the default font style.
    pub fn with_default_font(mut self, font: FontStyle) -> Self {
        self.default_font = font;
        self
    }

    /// Set the declared text encoding.
    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = encoding;
        self
    }

    /// Set the placeholder written for undecodable images.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.image_placeholder = text.into();
        self
    }
}

impl Default for ImportOptions {
    fn default() -> Self {
        Self {
            margins: AdditionalMargins::default(),
            default_font: FontStyle::default(),
            encoding: TextEncoding::Utf8,
            image_placeholder: "[Image could not be loaded]".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_options_builder() {
        let options = ImportOptions::new()
            .with_margins(50, 10)
            .with_default_font(FontStyle::new("Arial", 10))
            .with_placeholder("(missing image)");

        assert_eq!(options.margins, AdditionalMargins::new(50, 10));
        assert_eq!(options.default_font.font_face, "Arial");
        assert_eq!(options.image_placeholder, "(missing image)");
    }

    #[test]
    fn test_default_options() {
        let options = ImportOptions::default();
        assert_eq!(options.margins, AdditionalMargins::default());
        assert_eq!(options.encoding, TextEncoding::Utf8);
        assert_eq!(options.default_font, FontStyle::default());
    }

    #[test]
    fn test_encoding_labels() {
        assert!(TextEncoding::Utf8.matches_label("UTF-8"));
        assert!(TextEncoding::Utf8.matches_label("utf8"));
        assert!(!TextEncoding::Utf8.matches_label("ISO-8859-1"));
    }
}
