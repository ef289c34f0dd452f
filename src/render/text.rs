//! Plain text rendering for imported documents.

use crate::error::Result;
use crate::model::{Document, InlineContent};

use super::RenderOptions;

/// Convert a document to plain text, one line per paragraph.
///
/// Images are written as `[image-N]` markers unless image output is
/// disabled in `options`.
pub fn to_text(doc: &Document, options: &RenderOptions) -> Result<String> {
    let mut output = String::new();

    for (i, para) in doc.paragraphs.iter().enumerate() {
        if i > 0 {
            output.push('\n');
        }
        if options.indent_text && para.style.left_indent > 0 {
            let width = (para.style.left_indent / options.indent_unit.max(1)) as usize;
            output.push_str(&" ".repeat(width));
        }
        for item in &para.content {
            match item {
                InlineContent::Text(run) => output.push_str(&run.text),
                InlineContent::Image { resource_id, .. } => {
                    if options.include_images {
                        output.push_str(&format!("[{}]", resource_id));
                    }
                }
            }
        }
    }

    Ok(output.trim_end().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{EmbeddedImage, ParagraphFormat};
    use crate::sink::RichTextSink;

    #[test]
    fn test_to_text() {
        let mut doc = Document::new();
        doc.write_text("Hello, world!");
        doc.end_paragraph();
        doc.write_text("Second paragraph.");
        doc.end_paragraph();

        let result = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(result, "Hello, world!\nSecond paragraph.");
    }

    #[test]
    fn test_image_markers_and_indent() {
        let mut doc = Document::new();
        doc.set_paragraph_style(&ParagraphFormat {
            left_indent: 100,
            ..Default::default()
        });
        doc.write_text("see ");
        doc.write_image(&EmbeddedImage::png(EmbeddedImage::PNG_MAGIC.to_vec(), 1, 1));
        doc.end_paragraph();

        let plain = to_text(&doc, &RenderOptions::default()).unwrap();
        assert_eq!(plain, "see [image-1]");

        let options = RenderOptions::new().with_indent(true).with_images(false);
        let indented = to_text(&doc, &options).unwrap();
        assert_eq!(indented, format!("{}see", " ".repeat(2)));
    }
}
