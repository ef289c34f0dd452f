//! Fragment import: replaying styled markup into a rich-text sink.
//!
//! An [`Importer`] is the event-handler surface of one import. A tokenizer
//! pushes element starts, character data and element ends into it; the
//! importer resolves the style cascade and emits style and content calls on
//! the borrowed [`RichTextSink`]. [`import_str`] and friends drive an
//! importer from XML text using `quick-xml`.
//!
//! # Example
//!
//! ```
//! use rtimport::import::{ImportOptions, Importer};
//! use rtimport::model::Document;
//!
//! let mut doc = Document::new();
//! let options = ImportOptions::new().with_margins(50, 0);
//!
//! let mut importer = Importer::new(&mut doc, &options);
//! importer.start_element("paragraphlayout", &[("alignment", "1")]);
//! importer.start_element::<&str, &str>("paragraph", &[]);
//! importer.start_element::<&str, &str>("text", &[]);
//! importer.characters("Hello");
//! importer.end_element("text");
//! importer.end_element("paragraph");
//! importer.end_element("paragraphlayout");
//! let report = importer.finish();
//!
//! assert!(report.is_clean());
//! assert_eq!(doc.plain_text(), "Hello");
//! assert_eq!(doc.paragraphs[0].style.left_indent, 50);
//! ```

pub mod attributes;
pub mod cascade;
pub mod image;
mod options;
mod reader;
mod report;
pub mod text;

pub use cascade::{FontTable, Level, ResolvedStyle};
pub use options::{AdditionalMargins, ImportOptions, TextEncoding};
pub use reader::{import_bytes, import_file, import_reader, import_str};
pub use report::{Diagnostic, DiagnosticKind, ImportReport, ImportStats};

use log::{debug, trace, warn};

use crate::sink::RichTextSink;
use self::image::{PayloadDecoder, PayloadStart};

/// Element name of the document root.
pub const ROOT_ELEMENT: &str = "richtext";
/// Element name of an image holder.
pub const IMAGE_ELEMENT: &str = "image";
/// Element name of an image payload.
pub const DATA_ELEMENT: &str = "data";

/// Kind of an open element.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ElementKind {
    Root,
    Level(Level),
    ImageHolder,
    ImagePayload,
    Unknown(String),
}

impl ElementKind {
    fn from_name(name: &str) -> Self {
        match name {
            ROOT_ELEMENT => ElementKind::Root,
            "paragraphlayout" => ElementKind::Level(Level::Layout),
            "paragraph" => ElementKind::Level(Level::Paragraph),
            "text" => ElementKind::Level(Level::Text),
            "symbol" => ElementKind::Level(Level::Symbol),
            IMAGE_ELEMENT => ElementKind::ImageHolder,
            DATA_ELEMENT => ElementKind::ImagePayload,
            other => ElementKind::Unknown(other.to_string()),
        }
    }

    fn name(&self) -> &str {
        match self {
            ElementKind::Root => ROOT_ELEMENT,
            ElementKind::Level(level) => level.element_name(),
            ElementKind::ImageHolder => IMAGE_ELEMENT,
            ElementKind::ImagePayload => DATA_ELEMENT,
            ElementKind::Unknown(name) => name,
        }
    }
}

/// One open element with the style snapshot it resolved to.
#[derive(Debug, Clone)]
struct Frame {
    kind: ElementKind,
    style: ResolvedStyle,
    /// Character data of a text run, written when the run closes
    text: String,
}

impl Frame {
    fn new(kind: ElementKind, style: ResolvedStyle) -> Self {
        Self {
            kind,
            style,
            text: String::new(),
        }
    }

    fn is_text(&self) -> bool {
        self.kind == ElementKind::Level(Level::Text)
    }
}

/// Event handler that imports one fragment into a sink.
///
/// All state (the element stack, font table and image buffer) belongs to
/// this instance and is dropped with it. The sink is only borrowed.
pub struct Importer<'s, S: RichTextSink + ?Sized> {
    sink: &'s mut S,
    margins: AdditionalMargins,
    placeholder: String,
    root: ResolvedStyle,
    stack: Vec<Frame>,
    fonts: FontTable,
    images: PayloadDecoder,
    report: ImportReport,
}

impl<'s, S: RichTextSink + ?Sized> Importer<'s, S> {
    /// Create an importer writing into `sink`.
    pub fn new(sink: &'s mut S, options: &ImportOptions) -> Self {
        Self {
            sink,
            margins: options.margins,
            placeholder: options.image_placeholder.clone(),
            root: ResolvedStyle::root(options.default_font.clone()),
            stack: Vec::new(),
            fonts: FontTable::new(&options.default_font.font_face),
            images: PayloadDecoder::new(),
            report: ImportReport::default(),
        }
    }

    /// Number of open elements.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Font faces seen so far, default face first.
    pub fn font_faces(&self) -> &[String] {
        self.fonts.faces()
    }

    /// Diagnostics recorded so far.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.report.diagnostics
    }

    /// Handle an element start.
    pub fn start_element<K, V>(&mut self, name: &str, attributes: &[(K, V)])
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let kind = ElementKind::from_name(name);
        // Unknown markup inside a run must not split its character data
        if !matches!(kind, ElementKind::Unknown(_)) {
            self.flush_text();
        }
        let style = match &kind {
            ElementKind::Level(level) => self.enter_level(*level, attributes),
            ElementKind::ImageHolder => {
                self.open_image(attributes);
                self.current_style().clone()
            }
            ElementKind::ImagePayload => {
                self.open_payload(attributes);
                self.current_style().clone()
            }
            ElementKind::Root => self.current_style().clone(),
            ElementKind::Unknown(_) => {
                let listed: Vec<String> = attributes
                    .iter()
                    .map(|(k, v)| format!(" {}=\"{}\"", k.as_ref(), v.as_ref()))
                    .collect();
                self.record(Diagnostic::new(
                    DiagnosticKind::UnknownElement,
                    format!("<{}{}>", name, listed.concat()),
                ));
                self.current_style().clone()
            }
        };
        self.stack.push(Frame::new(kind, style));
    }

    /// Handle character data.
    ///
    /// Data of a text run is buffered and normalized as a whole when the run
    /// ends or a known element opens inside it.
    pub fn characters(&mut self, data: &str) {
        if let Some(frame) = self.stack.last_mut().filter(|frame| frame.is_text()) {
            trace!("text data {:?}", data);
            frame.text.push_str(data);
            return;
        }

        let kind = self.stack.last().map(|frame| &frame.kind);
        match kind {
            Some(ElementKind::Level(Level::Symbol)) => self.write_symbol(data),
            Some(ElementKind::ImagePayload) => self.images.push(data),
            _ => {
                if data.trim().is_empty() {
                    return;
                }
                let preview: String = data.chars().take(40).collect();
                let context = kind.map(ElementKind::name).unwrap_or("document").to_string();
                self.record(Diagnostic::new(
                    DiagnosticKind::UnhandledText,
                    format!("\"{}\" inside <{}>", preview, context),
                ));
            }
        }
    }

    /// Handle an element end.
    pub fn end_element(&mut self, name: &str) {
        let Some(frame) = self.stack.pop() else {
            self.record(Diagnostic::new(
                DiagnosticKind::MismatchedEnd,
                format!("</{}> with no open element", name),
            ));
            return;
        };
        if frame.kind.name() != name {
            self.record(Diagnostic::new(
                DiagnosticKind::MismatchedEnd,
                format!("</{}> closes <{}>", name, frame.kind.name()),
            ));
        }

        match frame.kind {
            ElementKind::Level(Level::Text) => self.write_text(&frame.text),
            ElementKind::Level(Level::Paragraph) => {
                self.sink.end_paragraph();
                self.report.stats.add_paragraph();
            }
            ElementKind::ImagePayload => self.close_payload(),
            ElementKind::ImageHolder => self.images.close_holder(),
            _ => {}
        }

        if self.stack.is_empty() {
            debug!("top-level <{}> closed", frame.kind.name());
        }
    }

    /// Finish the import and return its report.
    pub fn finish(mut self) -> ImportReport {
        let pending: Vec<String> = self
            .stack
            .iter_mut()
            .filter(|frame| frame.is_text())
            .map(|frame| std::mem::take(&mut frame.text))
            .collect();
        for data in pending {
            self.write_text(&data);
        }

        if let Some(frame) = self.stack.last() {
            let message = format!(
                "{} element(s) left open, innermost <{}>",
                self.stack.len(),
                frame.kind.name()
            );
            self.record(Diagnostic::new(DiagnosticKind::MismatchedEnd, message));
        }
        let mut report = self.report;
        report.font_faces = self.fonts.into_faces();
        report
    }

    fn current_style(&self) -> &ResolvedStyle {
        self.stack
            .last()
            .map(|frame| &frame.style)
            .unwrap_or(&self.root)
    }

    fn enter_level<K, V>(&mut self, level: Level, attributes: &[(K, V)]) -> ResolvedStyle
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let (style, diagnostics) = cascade::resolve(level, self.current_style(), attributes);
        for diagnostic in diagnostics {
            self.record(diagnostic);
        }
        if self.fonts.insert(&style.font.font_face) {
            debug!("new font face '{}'", style.font.font_face);
        }

        match level {
            Level::Text | Level::Symbol => {
                if level == Level::Text {
                    self.report.stats.add_text_run();
                }
                self.sink.set_character_style(&style.font);
            }
            Level::Paragraph => {
                let format = style
                    .paragraph
                    .to_format(self.margins.left, self.margins.right);
                debug!(
                    "paragraph style: {:?} {:?} indent {}/{}/{} tabs {:?}",
                    format.alignment,
                    format.line_spacing,
                    format.left_indent,
                    format.first_line_indent,
                    format.right_indent,
                    format.tab_stops
                );
                self.sink.set_paragraph_style(&format);
                if let Some(bullet) = style.paragraph.bullet.as_ref().filter(|b| b.is_active()) {
                    let message = format!(
                        "{} (style {}) rendered without bullet",
                        bullet.style.describe(),
                        bullet.style.hex_code()
                    );
                    self.record(Diagnostic::new(DiagnosticKind::UnsupportedFeature, message));
                }
            }
            Level::Layout => {}
        }
        style
    }

    fn open_image<K, V>(&mut self, attributes: &[(K, V)])
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut declared = None;
        for (key, value) in attributes {
            match key.as_ref() {
                "imagetype" => declared = Some(value.as_ref().to_string()),
                other => self.record(Diagnostic::new(
                    DiagnosticKind::UnknownAttribute,
                    format!("{}=\"{}\" on <{}>", other, value.as_ref(), IMAGE_ELEMENT),
                )),
            }
        }

        let image_type = declared.as_deref().and_then(attributes::parse_image_type);
        if self.images.open_holder(image_type) {
            return;
        }
        let message = match (image_type, declared) {
            (Some(kind), _) => format!("{} images are not supported", kind),
            (None, Some(code)) => format!("unknown image type code '{}'", code),
            (None, None) => "image without imagetype".to_string(),
        };
        self.record(Diagnostic::new(DiagnosticKind::UnsupportedImageType, message));
    }

    fn open_payload<K, V>(&mut self, attributes: &[(K, V)])
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        for (key, value) in attributes {
            self.record(Diagnostic::new(
                DiagnosticKind::UnknownAttribute,
                format!("{}=\"{}\" on <{}>", key.as_ref(), value.as_ref(), DATA_ELEMENT),
            ));
        }
        if self.images.open_payload() == PayloadStart::Orphan {
            self.record(Diagnostic::new(
                DiagnosticKind::UnknownElement,
                format!("<{}> outside <{}>", DATA_ELEMENT, IMAGE_ELEMENT),
            ));
        }
    }

    fn close_payload(&mut self) {
        match self.images.close_payload() {
            Some(Ok(image)) => {
                self.sink.write_image(&image);
                self.report.stats.add_image();
            }
            Some(Err(err)) => {
                self.record(Diagnostic::new(DiagnosticKind::ImageDecode, err.to_string()));
                self.sink.write_text(&self.placeholder);
                self.sink.end_paragraph();
                self.report.stats.add_placeholder();
            }
            None => {}
        }
    }

    /// Write the buffered data of an open text run.
    fn flush_text(&mut self) {
        let Some(frame) = self.stack.last_mut().filter(|frame| frame.is_text()) else {
            return;
        };
        if frame.text.is_empty() {
            return;
        }
        let data = std::mem::take(&mut frame.text);
        self.write_text(&data);
    }

    fn write_text(&mut self, data: &str) {
        let text = text::normalize_text(data, self.sink.last_char());
        if text.is_empty() {
            return;
        }
        self.report.stats.count_text(&text);
        self.sink.write_text(&text);
    }

    fn write_symbol(&mut self, data: &str) {
        match text::decode_symbol(data) {
            Ok(Some(symbol)) => {
                let mut buf = [0u8; 4];
                self.sink.write_text(symbol.encode_utf8(&mut buf));
                self.report.stats.add_symbol();
            }
            Ok(None) => {}
            Err(message) => self.record(Diagnostic::new(DiagnosticKind::UnhandledText, message)),
        }
    }

    fn record(&mut self, diagnostic: Diagnostic) {
        warn!("{}", diagnostic);
        self.report.diagnostics.push(diagnostic);
    }
}
