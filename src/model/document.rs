//! In-memory rich-text document.

use super::{EmbeddedImage, FontStyle, Paragraph, ParagraphFormat, TextRun};
use crate::sink::RichTextSink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A composite rich-text document built up from imported fragments.
///
/// `Document` is the crate's own [`RichTextSink`]. Importing a fragment
/// appends to it; nothing already in the document is touched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Document {
    /// Paragraphs in order; the last one may still be open
    pub paragraphs: Vec<Paragraph>,

    /// Embedded images keyed by resource ID
    pub resources: HashMap<String, EmbeddedImage>,

    #[serde(skip)]
    paragraph_open: bool,

    #[serde(skip)]
    current_format: ParagraphFormat,

    #[serde(skip)]
    current_style: FontStyle,
}

impl Document {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of paragraphs, including an open trailing one.
    pub fn paragraph_count(&self) -> usize {
        self.paragraphs.len()
    }

    /// Number of embedded images.
    pub fn image_count(&self) -> usize {
        self.resources.len()
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&EmbeddedImage> {
        self.resources.get(id)
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.paragraphs.iter().all(|p| p.is_empty())
    }

    /// Get plain text content of the entire document, one line per paragraph.
    pub fn plain_text(&self) -> String {
        self.paragraphs
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Character style that following writes will use.
    pub fn current_style(&self) -> &FontStyle {
        &self.current_style
    }

    fn open_paragraph(&mut self) -> &mut Paragraph {
        if !self.paragraph_open {
            self.paragraphs
                .push(Paragraph::with_format(self.current_format.clone()));
            self.paragraph_open = true;
        }
        // A paragraph was pushed above if none was open
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    fn next_resource_id(&self) -> String {
        format!("image-{}", self.resources.len() + 1)
    }
}

impl RichTextSink for Document {
    fn set_paragraph_style(&mut self, format: &ParagraphFormat) {
        self.current_format = format.clone();
        if self.paragraph_open {
            if let Some(last) = self.paragraphs.last_mut() {
                last.style = format.clone();
            }
        }
    }

    fn set_character_style(&mut self, style: &FontStyle) {
        self.current_style = style.clone();
    }

    fn write_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let run = TextRun::styled(text, self.current_style.clone());
        self.open_paragraph().add_run(run);
    }

    fn write_image(&mut self, image: &EmbeddedImage) {
        let id = self.next_resource_id();
        self.resources.insert(id.clone(), image.clone());
        self.open_paragraph().add_image(id);
    }

    fn end_paragraph(&mut self) {
        self.open_paragraph();
        self.paragraph_open = false;
    }

    fn last_char(&self) -> Option<char> {
        let last = self.paragraphs.last()?;
        if !self.paragraph_open {
            return Some('\n');
        }
        match last.last_char() {
            Some(c) => Some(c),
            None if self.paragraphs.len() > 1 => Some('\n'),
            None => None,
        }
    }
}
