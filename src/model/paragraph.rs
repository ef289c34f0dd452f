//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

use super::FontStyle;

/// A paragraph of imported content.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in write order
    pub content: Vec<InlineContent>,

    /// Paragraph format in effect when the paragraph was started
    pub style: ParagraphFormat,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty paragraph with the given format.
    pub fn with_format(style: ParagraphFormat) -> Self {
        Self {
            content: Vec::new(),
            style,
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_run(TextRun::new(text));
        p
    }

    /// Add a styled text run, merging it into the previous run when the
    /// styles are identical.
    pub fn add_run(&mut self, run: TextRun) {
        if run.is_empty() {
            return;
        }
        if let Some(InlineContent::Text(last)) = self.content.last_mut() {
            if last.style == run.style {
                last.text.push_str(&run.text);
                return;
            }
        }
        self.content.push(InlineContent::Text(run));
    }

    /// Add an image reference.
    pub fn add_image(&mut self, resource_id: impl Into<String>) {
        self.content.push(InlineContent::Image {
            resource_id: resource_id.into(),
            alt_text: None,
        });
    }

    /// Get plain text content of the paragraph.
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.as_str(),
                InlineContent::Image { alt_text, .. } => alt_text.as_deref().unwrap_or(""),
            })
            .collect()
    }

    /// Last character of the paragraph's text, if any.
    pub fn last_char(&self) -> Option<char> {
        self.content.iter().rev().find_map(|c| match c {
            InlineContent::Text(run) => run.text.chars().last(),
            // Images occupy one position that is not a space
            InlineContent::Image { .. } => Some('\u{FFFC}'),
        })
    }

    /// Check if the paragraph has no content.
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Number of images in the paragraph.
    pub fn image_count(&self) -> usize {
        self.content
            .iter()
            .filter(|c| matches!(c, InlineContent::Image { .. }))
            .count()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// An inline image
    Image {
        /// Resource ID
        resource_id: String,
        /// Alternative text
        alt_text: Option<String>,
    },
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Character style in effect for the run
    pub style: FontStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self::styled(text, FontStyle::default())
    }

    /// Create a text run with an explicit style.
    pub fn styled(text: impl Into<String>, style: FontStyle) -> Self {
        Self {
            text: text.into(),
            style,
        }
    }

    /// Check if this run is empty.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }
}

/// Horizontal paragraph alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
}

/// Line spacing of a paragraph.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LineSpacing {
    /// Single spacing
    #[default]
    Normal,
    /// One and a half lines
    OneAndHalf,
    /// Double spacing
    Double,
    /// Explicit spacing in tenths of a line
    ExplicitUnits(i32),
}

/// Bullet style bits as stored in the markup.
///
/// The value is a 16-bit mask; the low nibbles select the numbering scheme
/// and the high nibbles the punctuation around the number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BulletStyle(pub u16);

impl BulletStyle {
    const ARABIC: u16 = 0x0001;
    const LETTERS_UPPER: u16 = 0x0002;
    const LETTERS_LOWER: u16 = 0x0004;
    const ROMAN_UPPER: u16 = 0x0008;
    const ROMAN_LOWER: u16 = 0x0010;
    const SYMBOL: u16 = 0x0020;
    const PARENTHESES: u16 = 0x0080;
    const PERIOD: u16 = 0x0100;
    const STANDARD: u16 = 0x0200;
    const RIGHT_PARENTHESIS: u16 = 0x0400;

    /// The mask rendered as four lower-case hex digits.
    pub fn hex_code(&self) -> String {
        format!("{:04x}", self.0)
    }

    /// No bullet or number at all.
    pub fn is_none(&self) -> bool {
        self.0 == 0
    }

    /// Bullet drawn from a symbol font.
    pub fn is_symbol(&self) -> bool {
        self.0 & Self::SYMBOL != 0
    }

    /// Standard round bullet.
    pub fn is_standard(&self) -> bool {
        self.0 & Self::STANDARD != 0
    }

    /// Numbered list of any scheme.
    pub fn is_numbered(&self) -> bool {
        self.0
            & (Self::ARABIC
                | Self::LETTERS_UPPER
                | Self::LETTERS_LOWER
                | Self::ROMAN_UPPER
                | Self::ROMAN_LOWER)
            != 0
    }

    /// Number followed by a period.
    pub fn has_period(&self) -> bool {
        self.0 & Self::PERIOD != 0
    }

    /// Number wrapped in parentheses.
    pub fn has_parentheses(&self) -> bool {
        self.0 & Self::PARENTHESES != 0
    }

    /// Number followed by a right parenthesis.
    pub fn has_right_parenthesis(&self) -> bool {
        self.0 & Self::RIGHT_PARENTHESIS != 0
    }

    /// Short human-readable classification, used in diagnostics.
    pub fn describe(&self) -> &'static str {
        if self.is_symbol() {
            "symbol bullet"
        } else if self.is_standard() {
            "standard bullet"
        } else if self.is_numbered() {
            if self.has_period() {
                "numbered list (period)"
            } else if self.has_parentheses() {
                "numbered list (parentheses)"
            } else if self.has_right_parenthesis() {
                "numbered list (right parenthesis)"
            } else {
                "numbered list"
            }
        } else {
            "bullet"
        }
    }
}

/// Bullet or numbering attributes of a paragraph.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BulletSpec {
    /// Item number for numbered lists
    pub number: Option<i32>,

    /// Style bits
    pub style: BulletStyle,

    /// Font face used for symbol bullets
    pub font_face: Option<String>,

    /// Symbol codepoint for symbol bullets
    pub symbol: Option<u32>,

    /// Literal bullet text
    pub text: Option<String>,
}

impl BulletSpec {
    /// Check whether the bullet asks for any visible decoration.
    pub fn is_active(&self) -> bool {
        !self.style.is_none() || self.number.is_some() || self.symbol.is_some() || self.text.is_some()
    }
}

/// Paragraph style of one nesting level, as written in the source markup.
///
/// Indents and tab stops are in source units; see [`ParagraphFormat`] for
/// the margin-adjusted values handed to a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Line spacing
    pub line_spacing: LineSpacing,

    /// Left indent
    pub left_indent: i32,

    /// Indent of the first line relative to the left indent
    pub first_line_indent: i32,

    /// Right indent
    pub right_indent: i32,

    /// Space before the paragraph
    pub spacing_before: i32,

    /// Space after the paragraph
    pub spacing_after: i32,

    /// Tab stop positions
    pub tab_stops: Vec<i32>,

    /// Bullet or numbering, if the paragraph asks for one
    pub bullet: Option<BulletSpec>,
}

impl ParagraphStyle {
    /// Apply additional page margins, producing the format a sink receives.
    ///
    /// Sums saturate at the `i32` range.
    pub fn to_format(&self, left_adjust: i32, right_adjust: i32) -> ParagraphFormat {
        ParagraphFormat {
            alignment: self.alignment,
            line_spacing: self.line_spacing,
            left_indent: self.left_indent.saturating_add(left_adjust),
            first_line_indent: self.first_line_indent,
            right_indent: self.right_indent.saturating_add(right_adjust),
            spacing_before: self.spacing_before,
            spacing_after: self.spacing_after,
            tab_stops: self
                .tab_stops
                .iter()
                .map(|t| t.saturating_add(left_adjust))
                .collect(),
        }
    }
}

/// Paragraph format emitted to a sink.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParagraphFormat {
    /// Text alignment
    pub alignment: Alignment,

    /// Line spacing
    pub line_spacing: LineSpacing,

    /// Left indent, margin applied
    pub left_indent: i32,

    /// Indent of the first line relative to the left indent
    pub first_line_indent: i32,

    /// Right indent, margin applied
    pub right_indent: i32,

    /// Space before the paragraph
    pub spacing_before: i32,

    /// Space after the paragraph
    pub spacing_after: i32,

    /// Tab stops, left margin applied
    pub tab_stops: Vec<i32>,
}
