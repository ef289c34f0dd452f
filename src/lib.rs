//! # rtimport
//!
//! Rich-text fragment import with cascading styles.
//!
//! A fragment is an XML tree of layouts, paragraphs, text runs, symbols and
//! embedded images. Each element lists only the style attributes that
//! differ from its parent. Importing a fragment resolves that cascade and
//! replays the content into a [`RichTextSink`]: the crate's own
//! [`Document`], a [`RecordingSink`], or any buffer that implements the
//! trait.
//!
//! ## Quick Start
//!
//! ```
//! use rtimport::{import_str, Document, ImportOptions};
//!
//! let xml = r#"<richtext>
//!   <paragraphlayout fontweight="92" alignment="2">
//!     <paragraph><text>Centered and bold</text></paragraph>
//!   </paragraphlayout>
//! </richtext>"#;
//!
//! let mut doc = Document::new();
//! let report = import_str(xml, &mut doc, &ImportOptions::new().with_margins(50, 0))?;
//!
//! assert!(report.is_clean());
//! assert_eq!(doc.plain_text(), "Centered and bold");
//! assert_eq!(doc.paragraphs[0].style.left_indent, 50);
//! # Ok::<(), rtimport::Error>(())
//! ```
//!
//! ## Features
//!
//! - **Style cascade**: layout, paragraph, text and symbol levels with
//!   override isolation between siblings
//! - **Margin adjustment**: extra left/right margins applied to indents and
//!   tab stops
//! - **Embedded images**: hex PNG payloads, split across any number of
//!   character events
//! - **Tolerant import**: unknown markup and bad values become diagnostics
//! - **Multiple output formats**: Markdown, plain text, JSON

pub mod error;
pub mod import;
pub mod model;
pub mod render;
pub mod sink;

// Re-export commonly used types
pub use error::{Error, Result};
pub use import::{
    import_bytes, import_file, import_reader, import_str, AdditionalMargins, Diagnostic,
    DiagnosticKind, ImportOptions, ImportReport, ImportStats, Importer, TextEncoding,
};
pub use model::{
    Alignment, Color, Document, EmbeddedImage, FontStyle, ImageType, InlineContent, LineSpacing,
    Paragraph, ParagraphFormat, TextRun,
};
pub use render::{JsonFormat, RenderOptions};
pub use sink::{RecordingSink, RichTextSink, SinkOp};

use std::path::Path;

use log::info;

/// Import a fragment file into a new document.
///
/// # Example
///
/// ```no_run
/// use rtimport::{import_document, ImportOptions};
///
/// let (doc, report) = import_document("fragment.xml", &ImportOptions::default()).unwrap();
/// println!("{} paragraphs, {} warnings", doc.paragraph_count(), report.diagnostics.len());
/// ```
pub fn import_document<P: AsRef<Path>>(
    path: P,
    options: &ImportOptions,
) -> Result<(Document, ImportReport)> {
    let mut doc = Document::new();
    let report = import_file(path, &mut doc, options)?;
    Ok((doc, report))
}

/// Extract plain text from a fragment file.
///
/// # Example
///
/// ```no_run
/// use rtimport::extract_text;
///
/// let text = extract_text("fragment.xml").unwrap();
/// println!("{}", text);
/// ```
pub fn extract_text<P: AsRef<Path>>(path: P) -> Result<String> {
    let (doc, _) = import_document(path, &ImportOptions::default())?;
    render::to_text(&doc, &RenderOptions::default())
}

/// Convert a fragment file to Markdown.
///
/// # Example
///
/// ```no_run
/// use rtimport::to_markdown;
///
/// let markdown = to_markdown("fragment.xml").unwrap();
/// std::fs::write("output.md", markdown).unwrap();
/// ```
pub fn to_markdown<P: AsRef<Path>>(path: P) -> Result<String> {
    let (doc, _) = import_document(path, &ImportOptions::default())?;
    render::to_markdown(&doc, &RenderOptions::default())
}

/// Builder for importing one or more fragments into a single document.
///
/// Fragments are appended in order. Each fragment gets a fresh importer,
/// so no style state carries over from one fragment to the next.
///
/// # Example
///
/// ```
/// use rtimport::RtImport;
///
/// let result = RtImport::new()
///     .with_margins(30, 0)
///     .with_image_prefix("images/")
///     .import_str(r#"<richtext><paragraph><text>one</text></paragraph></richtext>"#)?
///     .import_str(r#"<richtext><paragraph><text>two</text></paragraph></richtext>"#)?;
///
/// assert_eq!(result.to_text()?, "one\ntwo");
/// # Ok::<(), rtimport::Error>(())
/// ```
pub struct RtImport {
    import_options: ImportOptions,
    render_options: RenderOptions,
}

impl RtImport {
    /// Create a new builder with default options.
    pub fn new() -> Self {
        Self {
            import_options: ImportOptions::default(),
            render_options: RenderOptions::default(),
        }
    }

    /// Set extra left/right margins.
    pub fn with_margins(mut self, left: i32, right: i32) -> Self {
        self.import_options = self.import_options.with_margins(left, right);
        self
    }

    /// Set the default font a root layout inherits from.
    pub fn with_default_font(mut self, font: FontStyle) -> Self {
        self.import_options = self.import_options.with_default_font(font);
        self
    }

    /// Set the placeholder written for undecodable images.
    pub fn with_placeholder(mut self, text: impl Into<String>) -> Self {
        self.import_options = self.import_options.with_placeholder(text);
        self
    }

    /// Set image output directory.
    pub fn with_image_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.render_options = self.render_options.with_image_dir(dir);
        self
    }

    /// Set the image path prefix used in Markdown output.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.render_options = self.render_options.with_image_prefix(prefix);
        self
    }

    /// Replace the render options.
    pub fn with_render_options(mut self, options: RenderOptions) -> Self {
        self.render_options = options;
        self
    }

    /// Import a first fragment from a string.
    pub fn import_str(self, xml: &str) -> Result<RtImportResult> {
        self.into_result().import_str(xml)
    }

    /// Import a first fragment from a file.
    pub fn import_file<P: AsRef<Path>>(self, path: P) -> Result<RtImportResult> {
        self.into_result().import_file(path)
    }

    /// Import every file in order into one document.
    pub fn import_files<I, P>(self, paths: I) -> Result<RtImportResult>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut result = self.into_result();
        for path in paths {
            result = result.import_file(path)?;
        }
        Ok(result)
    }

    fn into_result(self) -> RtImportResult {
        RtImportResult {
            document: Document::new(),
            report: ImportReport::default(),
            import_options: self.import_options,
            render_options: self.render_options,
        }
    }
}

impl Default for RtImport {
    fn default() -> Self {
        Self::new()
    }
}

/// A document built from imported fragments.
pub struct RtImportResult {
    /// The composite document
    pub document: Document,
    /// Diagnostics and counters of all fragments, in import order
    pub report: ImportReport,
    import_options: ImportOptions,
    render_options: RenderOptions,
}

impl RtImportResult {
    /// Append another fragment from a string.
    pub fn import_str(mut self, xml: &str) -> Result<Self> {
        let report = import_str(xml, &mut self.document, &self.import_options)?;
        self.absorb(report);
        Ok(self)
    }

    /// Append another fragment from a file.
    pub fn import_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self> {
        let report = import_file(path, &mut self.document, &self.import_options)?;
        self.absorb(report);
        Ok(self)
    }

    /// Convert to Markdown.
    pub fn to_markdown(&self) -> Result<String> {
        render::to_markdown(&self.document, &self.render_options)
    }

    /// Convert to plain text.
    pub fn to_text(&self) -> Result<String> {
        render::to_text(&self.document, &self.render_options)
    }

    /// Convert to JSON.
    pub fn to_json(&self, format: JsonFormat) -> Result<String> {
        render::to_json(&self.document, format)
    }

    /// Get plain text without rendering options.
    pub fn plain_text(&self) -> String {
        self.document.plain_text()
    }

    /// Get the document.
    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Write embedded images into the configured image directory.
    ///
    /// Returns the paths written. Does nothing without an image directory.
    pub fn save_images(&self) -> Result<Vec<std::path::PathBuf>> {
        let Some(dir) = self.render_options.image_dir.as_ref() else {
            return Ok(Vec::new());
        };
        std::fs::create_dir_all(dir)?;

        let mut ids: Vec<&String> = self.document.resources.keys().collect();
        ids.sort();
        let mut written = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(image) = self.document.get_resource(id) {
                let path = dir.join(image.suggested_filename(id));
                std::fs::write(&path, &image.data)?;
                written.push(path);
            }
        }
        info!("saved {} images to {}", written.len(), dir.display());
        Ok(written)
    }

    fn absorb(&mut self, report: ImportReport) {
        self.report.stats.merge(&report.stats);
        self.report.diagnostics.extend(report.diagnostics);
        for face in report.font_faces {
            if !self.report.font_faces.contains(&face) {
                self.report.font_faces.push(face);
            }
        }
    }
}
