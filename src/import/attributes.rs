//! Translation of markup attribute codes into model values.
//!
//! Every function here is total on its documented inputs and returns
//! `None` for anything else; the caller turns `None` into a diagnostic and
//! keeps the inherited value.

use crate::model::{Alignment, BulletStyle, Color, ImageType, LineSpacing};

/// Toolkit code for a bold font weight.
pub const FONT_WEIGHT_BOLD: i32 = 92;

/// Numeric (CSS-style) bold weight written by newer toolkit versions.
pub const FONT_WEIGHT_BOLD_NUMERIC: i32 = 700;

/// Toolkit code for an italic font style.
pub const FONT_STYLE_ITALIC: i32 = 93;

/// A style property named by an attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Property {
    // Character properties
    /// `bgcolor`
    BackgroundColor,
    /// `fontface`
    FontFace,
    /// `fontpointsize`, or its alias `fontsize`
    FontSize,
    /// `fontstyle`
    FontStyle,
    /// `fontunderlined`
    FontUnderlined,
    /// `fontweight`
    FontWeight,
    /// `textcolor`
    TextColor,
    /// `url`
    Url,

    // Paragraph properties
    /// `alignment`
    Alignment,
    /// `linespacing`
    LineSpacing,
    /// `leftindent`
    LeftIndent,
    /// `rightindent`
    RightIndent,
    /// `leftsubindent`
    LeftSubIndent,
    /// `parspacingbefore`
    SpacingBefore,
    /// `parspacingafter`
    SpacingAfter,
    /// `tabs`
    Tabs,
    /// `bulletnumber`
    BulletNumber,
    /// `bulletstyle`
    BulletStyle,
    /// `bulletfont`
    BulletFont,
    /// `bulletsymbol`
    BulletSymbol,
    /// `bullettext`
    BulletText,
}

impl Property {
    /// Look up the property an attribute name refers to.
    pub fn from_name(name: &str) -> Option<Property> {
        let property = match name {
            "bgcolor" => Property::BackgroundColor,
            "fontface" => Property::FontFace,
            "fontsize" | "fontpointsize" => Property::FontSize,
            "fontstyle" => Property::FontStyle,
            "fontunderlined" => Property::FontUnderlined,
            "fontweight" => Property::FontWeight,
            "textcolor" => Property::TextColor,
            "url" => Property::Url,
            "alignment" => Property::Alignment,
            "linespacing" => Property::LineSpacing,
            "leftindent" => Property::LeftIndent,
            "rightindent" => Property::RightIndent,
            "leftsubindent" => Property::LeftSubIndent,
            "parspacingbefore" => Property::SpacingBefore,
            "parspacingafter" => Property::SpacingAfter,
            "tabs" => Property::Tabs,
            "bulletnumber" => Property::BulletNumber,
            "bulletstyle" => Property::BulletStyle,
            "bulletfont" => Property::BulletFont,
            "bulletsymbol" => Property::BulletSymbol,
            "bullettext" => Property::BulletText,
            _ => return None,
        };
        Some(property)
    }

    /// Check if this is a character property.
    pub fn is_character(&self) -> bool {
        matches!(
            self,
            Property::BackgroundColor
                | Property::FontFace
                | Property::FontSize
                | Property::FontStyle
                | Property::FontUnderlined
                | Property::FontWeight
                | Property::TextColor
                | Property::Url
        )
    }

    /// Check if this is a paragraph property.
    pub fn is_paragraph(&self) -> bool {
        !self.is_character()
    }

    /// Check if this property belongs to a bullet specification.
    pub fn is_bullet(&self) -> bool {
        matches!(
            self,
            Property::BulletNumber
                | Property::BulletStyle
                | Property::BulletFont
                | Property::BulletSymbol
                | Property::BulletText
        )
    }
}

/// Parse an alignment code.
pub fn parse_alignment(value: &str) -> Option<Alignment> {
    match value.trim() {
        "1" => Some(Alignment::Left),
        "2" => Some(Alignment::Center),
        "3" => Some(Alignment::Right),
        _ => None,
    }
}

/// Parse a line spacing code.
pub fn parse_line_spacing(value: &str) -> Option<LineSpacing> {
    match value.trim() {
        "0" | "10" => Some(LineSpacing::Normal),
        "15" => Some(LineSpacing::OneAndHalf),
        "20" => Some(LineSpacing::Double),
        other => other.parse().ok().map(LineSpacing::ExplicitUnits),
    }
}

/// Parse a `"0"`/`"1"` flag. Anything but `"1"` is false.
pub fn parse_flag(value: &str) -> bool {
    value.trim() == "1"
}

/// Parse a font weight code into a bold flag.
pub fn parse_weight(value: &str) -> Option<bool> {
    let code = parse_int(value)?;
    Some(code == FONT_WEIGHT_BOLD || code == FONT_WEIGHT_BOLD_NUMERIC)
}

/// Parse a font style code into an italic flag.
pub fn parse_italic(value: &str) -> Option<bool> {
    let code = parse_int(value)?;
    Some(code == FONT_STYLE_ITALIC)
}

/// Parse a decimal integer.
pub fn parse_int(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// Parse a font size in points.
pub fn parse_font_size(value: &str) -> Option<u32> {
    value.trim().parse().ok().filter(|size| *size > 0)
}

/// Parse a comma separated list of tab stop positions.
///
/// Empty pieces (a trailing comma, for example) are skipped.
pub fn parse_tabs(value: &str) -> Option<Vec<i32>> {
    value
        .split(',')
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.parse().ok())
        .collect()
}

/// Parse a colour.
pub fn parse_color(value: &str) -> Option<Color> {
    value.parse().ok()
}

/// Parse a bullet style mask, written as a decimal integer.
pub fn parse_bullet_style(value: &str) -> Option<BulletStyle> {
    value.trim().parse::<u16>().ok().map(BulletStyle)
}

/// Parse a bullet symbol codepoint.
pub fn parse_symbol_code(value: &str) -> Option<u32> {
    value.trim().parse().ok()
}

/// Map an image type code to a raster format.
pub fn parse_image_type(value: &str) -> Option<ImageType> {
    match value.trim() {
        "1" => Some(ImageType::Bmp),
        "3" => Some(ImageType::Ico),
        "9" => Some(ImageType::Xpm),
        "11" => Some(ImageType::Tiff),
        "13" => Some(ImageType::Gif),
        "15" => Some(ImageType::Png),
        "17" => Some(ImageType::Jpeg),
        "19" => Some(ImageType::Pnm),
        "21" => Some(ImageType::Pcx),
        _ => None,
    }
}
