//! Style cascade resolution.
//!
//! Each style-bearing element lists only the attributes that differ from
//! its enclosing element. [`resolve`] turns a parent's resolved style plus
//! those overrides into a complete, immutable snapshot for the new level.
//! Nested levels start from that snapshot, so an override flows downward
//! into everything the element contains and never sideways into siblings.

use log::debug;

use super::attributes::{self, Property};
use super::report::{Diagnostic, DiagnosticKind};
use crate::model::{BulletSpec, FontStyle, ParagraphStyle};

/// A style-bearing nesting level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Level {
    /// A block of paragraphs sharing defaults
    Layout,
    /// A paragraph
    Paragraph,
    /// A run of text
    Text,
    /// A single symbol character
    Symbol,
}

impl Level {
    /// Element name of the level in the markup.
    pub fn element_name(&self) -> &'static str {
        match self {
            Level::Layout => "paragraphlayout",
            Level::Paragraph => "paragraph",
            Level::Text => "text",
            Level::Symbol => "symbol",
        }
    }

    fn accepts(&self, property: Property) -> bool {
        match self {
            Level::Layout | Level::Paragraph => property != Property::Url,
            Level::Text => property.is_character(),
            Level::Symbol => property.is_character() && property != Property::Url,
        }
    }
}

/// Fully resolved style of one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolvedStyle {
    /// Character style
    pub font: FontStyle,

    /// Paragraph style; passed through unchanged by text and symbol levels
    pub paragraph: ParagraphStyle,
}

impl ResolvedStyle {
    /// Root style built from a default font.
    pub fn root(font: FontStyle) -> Self {
        Self {
            font,
            paragraph: ParagraphStyle::default(),
        }
    }
}

/// Resolve the style of a level entered below `parent`.
///
/// The new style starts as a copy of the parent's, then each recognised
/// attribute overwrites its field. Attributes that are unknown, not valid
/// on this level, or carry an invalid value are reported and skipped.
pub fn resolve<K, V>(
    level: Level,
    parent: &ResolvedStyle,
    attributes: &[(K, V)],
) -> (ResolvedStyle, Vec<Diagnostic>)
where
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut style = parent.clone();
    let mut diagnostics = Vec::new();

    // Hyperlinks belong to a single run
    if level == Level::Text {
        style.font.url = None;
    }

    for (name, value) in attributes {
        let (name, value) = (name.as_ref(), value.as_ref());
        let Some(property) = Property::from_name(name) else {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownAttribute,
                format!("{}=\"{}\" on <{}>", name, value, level.element_name()),
            ));
            continue;
        };
        if !level.accepts(property) {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnknownAttribute,
                format!("{} is not valid on <{}>", name, level.element_name()),
            ));
            continue;
        }

        let applied = if property.is_character() {
            apply_character(&mut style.font, property, value)
        } else {
            apply_paragraph(&mut style.paragraph, property, value)
        };
        if !applied {
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::InvalidAttribute,
                format!(
                    "{}=\"{}\" on <{}> ignored",
                    name,
                    value,
                    level.element_name()
                ),
            ));
        }
    }

    debug!(
        "resolved <{}>: font={} {}pt bold={} italic={} underline={}",
        level.element_name(),
        style.font.font_face,
        style.font.font_size,
        style.font.bold,
        style.font.italic,
        style.font.underline
    );

    (style, diagnostics)
}

/// Apply one character property. Returns false if the value is invalid.
fn apply_character(font: &mut FontStyle, property: Property, value: &str) -> bool {
    match property {
        Property::BackgroundColor => set(&mut font.background_color, attributes::parse_color(value)),
        Property::TextColor => set(&mut font.foreground_color, attributes::parse_color(value)),
        Property::FontFace => {
            let face = value.trim();
            if face.is_empty() {
                return false;
            }
            font.font_face = face.to_string();
            true
        }
        Property::FontSize => set(&mut font.font_size, attributes::parse_font_size(value)),
        Property::FontWeight => set(&mut font.bold, attributes::parse_weight(value)),
        Property::FontStyle => set(&mut font.italic, attributes::parse_italic(value)),
        Property::FontUnderlined => {
            font.underline = attributes::parse_flag(value);
            true
        }
        Property::Url => {
            font.url = Some(value.to_string()).filter(|u| !u.is_empty());
            true
        }
        _ => false,
    }
}

/// Apply one paragraph property. Returns false if the value is invalid.
fn apply_paragraph(paragraph: &mut ParagraphStyle, property: Property, value: &str) -> bool {
    match property {
        Property::Alignment => set(&mut paragraph.alignment, attributes::parse_alignment(value)),
        Property::LineSpacing => set(
            &mut paragraph.line_spacing,
            attributes::parse_line_spacing(value),
        ),
        Property::LeftIndent => set(&mut paragraph.left_indent, attributes::parse_int(value)),
        Property::RightIndent => set(&mut paragraph.right_indent, attributes::parse_int(value)),
        Property::LeftSubIndent => set(
            &mut paragraph.first_line_indent,
            attributes::parse_int(value),
        ),
        Property::SpacingBefore => set(&mut paragraph.spacing_before, attributes::parse_int(value)),
        Property::SpacingAfter => set(&mut paragraph.spacing_after, attributes::parse_int(value)),
        Property::Tabs => set(&mut paragraph.tab_stops, attributes::parse_tabs(value)),
        _ if property.is_bullet() => {
            let bullet = paragraph.bullet.get_or_insert_with(BulletSpec::default);
            apply_bullet(bullet, property, value)
        }
        _ => false,
    }
}

fn apply_bullet(bullet: &mut BulletSpec, property: Property, value: &str) -> bool {
    match property {
        Property::BulletNumber => match attributes::parse_int(value) {
            Some(n) => {
                bullet.number = Some(n);
                true
            }
            None => false,
        },
        Property::BulletStyle => set(&mut bullet.style, attributes::parse_bullet_style(value)),
        Property::BulletFont => {
            bullet.font_face = Some(value.to_string()).filter(|f| !f.is_empty());
            true
        }
        Property::BulletSymbol => match attributes::parse_symbol_code(value) {
            Some(code) => {
                bullet.symbol = Some(code);
                true
            }
            None => false,
        },
        Property::BulletText => {
            bullet.text = Some(value.to_string()).filter(|t| !t.is_empty());
            true
        }
        _ => false,
    }
}

fn set<T>(field: &mut T, value: Option<T>) -> bool {
    match value {
        Some(v) => {
            *field = v;
            true
        }
        None => false,
    }
}

/// Insertion-ordered set of font faces seen during one import.
#[derive(Debug, Clone, Default)]
pub struct FontTable {
    faces: Vec<String>,
}

impl FontTable {
    /// Create a table seeded with the default face.
    pub fn new(default_face: &str) -> Self {
        Self {
            faces: vec![default_face.to_string()],
        }
    }

    /// Add a face if it is not present. Returns true if it was added.
    pub fn insert(&mut self, face: &str) -> bool {
        if self.contains(face) {
            return false;
        }
        self.faces.push(face.to_string());
        true
    }

    /// Check whether a face is present.
    pub fn contains(&self, face: &str) -> bool {
        self.faces.iter().any(|f| f == face)
    }

    /// Faces in first-seen order.
    pub fn faces(&self) -> &[String] {
        &self.faces
    }

    /// Consume the table, returning the faces.
    pub fn into_faces(self) -> Vec<String> {
        self.faces
    }
}
