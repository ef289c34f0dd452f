//! Import result with diagnostics and statistics.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal import problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Element outside the known vocabulary
    UnknownElement,
    /// Attribute outside the element's vocabulary
    UnknownAttribute,
    /// Known attribute with a value outside its domain
    InvalidAttribute,
    /// Image payload of a format that is not decoded
    UnsupportedImageType,
    /// Image payload that could not be decoded
    ImageDecode,
    /// Feature present in the markup but not rendered
    UnsupportedFeature,
    /// Character data outside any element that takes text
    UnhandledText,
    /// End tag that does not match the open element
    MismatchedEnd,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DiagnosticKind::UnknownElement => "unknown element",
            DiagnosticKind::UnknownAttribute => "unknown attribute",
            DiagnosticKind::InvalidAttribute => "invalid attribute",
            DiagnosticKind::UnsupportedImageType => "unsupported image type",
            DiagnosticKind::ImageDecode => "image decode",
            DiagnosticKind::UnsupportedFeature => "unsupported feature",
            DiagnosticKind::UnhandledText => "unhandled text",
            DiagnosticKind::MismatchedEnd => "mismatched end",
        };
        f.write_str(name)
    }
}

/// A non-fatal problem found while importing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Problem category
    pub kind: DiagnosticKind,

    /// Human-readable detail
    pub message: String,
}

impl Diagnostic {
    /// Create a diagnostic.
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind, self.message)
    }
}

/// Counters collected during one import.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportStats {
    /// Paragraphs ended
    pub paragraph_count: u32,

    /// Text elements entered
    pub text_run_count: u32,

    /// Symbols written
    pub symbol_count: u32,

    /// Images written
    pub image_count: u32,

    /// Placeholders written for images that failed to decode
    pub placeholder_count: u32,

    /// Characters written as text
    pub char_count: u32,
}

impl ImportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment text run count.
    pub fn add_text_run(&mut self) {
        self.text_run_count += 1;
    }

    /// Increment symbol count.
    pub fn add_symbol(&mut self) {
        self.symbol_count += 1;
    }

    /// Increment image count.
    pub fn add_image(&mut self) {
        self.image_count += 1;
    }

    /// Increment placeholder count.
    pub fn add_placeholder(&mut self) {
        self.placeholder_count += 1;
    }

    /// Add the character count of written text.
    pub fn count_text(&mut self, text: &str) {
        self.char_count += text.chars().count() as u32;
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ImportStats) {
        self.paragraph_count += other.paragraph_count;
        self.text_run_count += other.text_run_count;
        self.symbol_count += other.symbol_count;
        self.image_count += other.image_count;
        self.placeholder_count += other.placeholder_count;
        self.char_count += other.char_count;
    }
}

/// Outcome of importing one fragment.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImportReport {
    /// Non-fatal problems in encounter order
    pub diagnostics: Vec<Diagnostic>,

    /// Counters
    pub stats: ImportStats,

    /// Distinct font faces seen, starting with the default face
    pub font_faces: Vec<String>,
}

impl ImportReport {
    /// Check whether the import produced no diagnostics.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Diagnostics of one kind.
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }

    /// Count of diagnostics of one kind.
    pub fn count(&self, kind: DiagnosticKind) -> usize {
        self.diagnostics_of(kind).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_import_stats_count_text() {
        let mut stats = ImportStats::new();
        stats.count_text("héllo");
        assert_eq!(stats.char_count, 5);
    }

    #[test]
    fn test_import_stats_merge() {
        let mut stats1 = ImportStats::new();
        stats1.paragraph_count = 5;
        stats1.image_count = 1;

        let stats2 = ImportStats {
            paragraph_count: 3,
            placeholder_count: 2,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.paragraph_count, 8);
        assert_eq!(stats1.image_count, 1);
        assert_eq!(stats1.placeholder_count, 2);
    }

    #[test]
    fn test_report_counts_by_kind() {
        let report = ImportReport {
            diagnostics: vec![
                Diagnostic::new(DiagnosticKind::UnknownElement, "<foo>"),
                Diagnostic::new(DiagnosticKind::UnknownAttribute, "bar"),
                Diagnostic::new(DiagnosticKind::UnknownElement, "<baz>"),
            ],
            ..Default::default()
        };
        assert!(!report.is_clean());
        assert_eq!(report.count(DiagnosticKind::UnknownElement), 2);
        assert_eq!(report.count(DiagnosticKind::ImageDecode), 0);
    }

    #[test]
    fn test_diagnostic_display() {
        let d = Diagnostic::new(DiagnosticKind::UnsupportedImageType, "JPG");
        assert_eq!(d.to_string(), "unsupported image type: JPG");
    }
}
