//! Character-level style types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An RGB colour as written in the markup (`#RRGGBB`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red component
    pub r: u8,
    /// Green component
    pub g: u8,
    /// Blue component
    pub b: u8,
}

impl Color {
    /// Black (`#000000`).
    pub const BLACK: Color = Color::rgb(0, 0, 0);

    /// White (`#FFFFFF`).
    pub const WHITE: Color = Color::rgb(0xff, 0xff, 0xff);

    /// Create a colour from its components.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Hex form with a leading `#`, upper case.
    pub fn to_hex(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.trim().strip_prefix('#').unwrap_or(s.trim());
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(format!("expected #RRGGBB, got '{}'", s));
        }
        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| format!("invalid colour '{}'", s))
        };
        Ok(Color::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

/// Resolved character style of one nesting level.
///
/// Every level carries a complete style: the markup only lists the
/// attributes that differ from the enclosing level, and the cascade fills
/// in the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FontStyle {
    /// Font face name
    pub font_face: String,

    /// Font size in points
    pub font_size: u32,

    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Text colour
    pub foreground_color: Color,

    /// Background colour
    pub background_color: Color,

    /// Hyperlink target (text runs only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl FontStyle {
    /// Create a plain style with the given face and size.
    pub fn new(font_face: impl Into<String>, font_size: u32) -> Self {
        Self {
            font_face: font_face.into(),
            font_size,
            ..Default::default()
        }
    }

    /// Check if any emphasis is applied.
    pub fn has_emphasis(&self) -> bool {
        self.bold || self.italic || self.underline
    }
}

impl Default for FontStyle {
    fn default() -> Self {
        Self {
            font_face: "Courier New".to_string(),
            font_size: 12,
            bold: false,
            italic: false,
            underline: false,
            foreground_color: Color::BLACK,
            background_color: Color::WHITE,
            url: None,
        }
    }
}
