//! The output side of an import.
//!
//! An import never owns the rich-text buffer it writes into. It borrows a
//! [`RichTextSink`] for the duration of one fragment and replays the
//! fragment as a sequence of style and content calls, so several fragments
//! can be appended into the same buffer one after another.
//!
//! # Example
//!
//! ```
//! use rtimport::sink::{RecordingSink, SinkOp};
//! use rtimport::{import_str, ImportOptions};
//!
//! let xml = r#"<richtext><paragraphlayout><paragraph><text>Hi</text></paragraph></paragraphlayout></richtext>"#;
//! let mut sink = RecordingSink::new();
//! import_str(xml, &mut sink, &ImportOptions::default()).unwrap();
//!
//! assert!(sink.ops().iter().any(|op| matches!(op, SinkOp::WriteText(t) if t == "Hi")));
//! ```

use serde::{Deserialize, Serialize};

use crate::model::{EmbeddedImage, FontStyle, ParagraphFormat};

/// A rich-text buffer that accepts imported content.
///
/// Calls arrive in document order. Styles are sticky: a style set once
/// applies to all following writes until the next style call.
pub trait RichTextSink {
    /// Set the paragraph format for the paragraph being written.
    fn set_paragraph_style(&mut self, format: &ParagraphFormat);

    /// Set the character style for following text.
    fn set_character_style(&mut self, style: &FontStyle);

    /// Append text in the current character style.
    fn write_text(&mut self, text: &str);

    /// Append an image at the current position.
    fn write_image(&mut self, image: &EmbeddedImage);

    /// Terminate the current paragraph.
    fn end_paragraph(&mut self);

    /// The character immediately before the insertion point, if any.
    fn last_char(&self) -> Option<char>;
}

impl<S: RichTextSink + ?Sized> RichTextSink for &mut S {
    fn set_paragraph_style(&mut self, format: &ParagraphFormat) {
        (**self).set_paragraph_style(format)
    }

    fn set_character_style(&mut self, style: &FontStyle) {
        (**self).set_character_style(style)
    }

    fn write_text(&mut self, text: &str) {
        (**self).write_text(text)
    }

    fn write_image(&mut self, image: &EmbeddedImage) {
        (**self).write_image(image)
    }

    fn end_paragraph(&mut self) {
        (**self).end_paragraph()
    }

    fn last_char(&self) -> Option<char> {
        (**self).last_char()
    }
}

/// One recorded sink call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", content = "args", rename_all = "snake_case")]
pub enum SinkOp {
    /// `set_paragraph_style`
    SetParagraphStyle(ParagraphFormat),
    /// `set_character_style`
    SetCharacterStyle(FontStyle),
    /// `write_text`
    WriteText(String),
    /// `write_image`, recorded by format, size and leading bytes
    WriteImage {
        /// Width in pixels
        width: u32,
        /// Height in pixels
        height: u32,
        /// Encoded byte length
        len: usize,
        /// Up to the first eight bytes of the encoded data
        head: Vec<u8>,
    },
    /// `end_paragraph`
    EndParagraph,
}

impl SinkOp {
    /// Check if this op writes content rather than style.
    pub fn is_content(&self) -> bool {
        matches!(
            self,
            SinkOp::WriteText(_) | SinkOp::WriteImage { .. } | SinkOp::EndParagraph
        )
    }
}

/// Sink that records every call, for tests and tracing.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    ops: Vec<SinkOp>,
    last_char: Option<char>,
}

impl RecordingSink {
    /// Create an empty recording sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a sink whose insertion point follows the given text.
    pub fn after_text(text: &str) -> Self {
        Self {
            ops: Vec::new(),
            last_char: text.chars().last(),
        }
    }

    /// All recorded calls in order.
    pub fn ops(&self) -> &[SinkOp] {
        &self.ops
    }

    /// Take the recorded calls, leaving the sink empty.
    pub fn take_ops(&mut self) -> Vec<SinkOp> {
        std::mem::take(&mut self.ops)
    }

    /// Concatenation of all written text.
    pub fn text(&self) -> String {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::WriteText(t) => Some(t.as_str()),
                SinkOp::EndParagraph => Some("\n"),
                _ => None,
            })
            .collect()
    }

    /// Paragraph formats in emission order.
    pub fn paragraph_styles(&self) -> Vec<&ParagraphFormat> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::SetParagraphStyle(f) => Some(f),
                _ => None,
            })
            .collect()
    }

    /// Character styles in emission order.
    pub fn character_styles(&self) -> Vec<&FontStyle> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::SetCharacterStyle(s) => Some(s),
                _ => None,
            })
            .collect()
    }

    /// Texts passed to `write_text`, one entry per call.
    pub fn writes(&self) -> Vec<&str> {
        self.ops
            .iter()
            .filter_map(|op| match op {
                SinkOp::WriteText(t) => Some(t.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Number of `write_image` calls.
    pub fn image_count(&self) -> usize {
        self.ops
            .iter()
            .filter(|op| matches!(op, SinkOp::WriteImage { .. }))
            .count()
    }
}

impl RichTextSink for RecordingSink {
    fn set_paragraph_style(&mut self, format: &ParagraphFormat) {
        self.ops.push(SinkOp::SetParagraphStyle(format.clone()));
    }

    fn set_character_style(&mut self, style: &FontStyle) {
        self.ops.push(SinkOp::SetCharacterStyle(style.clone()));
    }

    fn write_text(&mut self, text: &str) {
        if let Some(c) = text.chars().last() {
            self.last_char = Some(c);
        }
        self.ops.push(SinkOp::WriteText(text.to_string()));
    }

    fn write_image(&mut self, image: &EmbeddedImage) {
        self.last_char = Some('\u{FFFC}');
        self.ops.push(SinkOp::WriteImage {
            width: image.width,
            height: image.height,
            len: image.data.len(),
            head: image.data.iter().take(8).copied().collect(),
        });
    }

    fn end_paragraph(&mut self) {
        self.last_char = Some('\n');
        self.ops.push(SinkOp::EndParagraph);
    }

    fn last_char(&self) -> Option<char> {
        self.last_char
    }
}
