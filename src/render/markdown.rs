//! Markdown rendering for imported documents.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::error::Result;
use crate::model::{Document, FontStyle, InlineContent, Paragraph, TextRun};

use super::RenderOptions;

/// Block markers that are only special at the start of a line.
static LINE_START_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\s*)(?:(#{1,6}|>|[-+])|(\d+)\.)(\s|$)").expect("valid line-start pattern")
});

/// Convert a document to Markdown.
pub fn to_markdown(doc: &Document, options: &RenderOptions) -> Result<String> {
    let renderer = MarkdownRenderer::new(options.clone());
    renderer.render(doc)
}

/// Markdown renderer.
pub struct MarkdownRenderer {
    options: RenderOptions,
}

impl MarkdownRenderer {
    /// Create a new Markdown renderer.
    pub fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Render a document to Markdown.
    pub fn render(&self, doc: &Document) -> Result<String> {
        let mut output = String::new();
        for para in &doc.paragraphs {
            self.render_paragraph(&mut output, doc, para);
        }
        Ok(output.trim().to_string())
    }

    fn render_paragraph(&self, output: &mut String, doc: &Document, para: &Paragraph) {
        if para.is_empty() {
            return;
        }

        let mut line = String::new();
        for item in &para.content {
            match item {
                InlineContent::Text(run) => self.render_text_run(&mut line, run),
                InlineContent::Image {
                    resource_id,
                    alt_text,
                } => {
                    if !self.options.include_images {
                        continue;
                    }
                    let file = doc
                        .get_resource(resource_id)
                        .map(|image| image.suggested_filename(resource_id))
                        .unwrap_or_else(|| resource_id.clone());
                    let alt = alt_text.as_deref().unwrap_or(resource_id);
                    line.push_str(&format!(
                        "![{}]({}{})",
                        alt, self.options.image_path_prefix, file
                    ));
                }
            }
        }

        if self.options.escape_special_chars {
            line = escape_line_start(&line);
        }
        output.push_str(&line);
        output.push_str("\n\n");
    }

    fn render_text_run(&self, output: &mut String, run: &TextRun) {
        let text = if self.options.escape_special_chars {
            escape_markdown(&run.text)
        } else {
            run.text.clone()
        };

        let styled = if self.options.emphasis {
            apply_text_style(&text, &run.style)
        } else {
            text
        };

        match run.style.url.as_deref() {
            Some(url) if self.options.links => output.push_str(&format!("[{}]({})", styled, url)),
            _ => output.push_str(&styled),
        }
    }
}

/// Escape a block marker at the start of a rendered paragraph.
fn escape_line_start(line: &str) -> String {
    LINE_START_MARKER
        .replace(line, |caps: &Captures| {
            let indent = &caps[1];
            let trailing = &caps[4];
            match (caps.get(2), caps.get(3)) {
                (Some(marker), _) => format!("{}\\{}{}", indent, marker.as_str(), trailing),
                (None, Some(number)) => format!("{}{}\\.{}", indent, number.as_str(), trailing),
                (None, None) => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Wrap text in emphasis markers, keeping edge whitespace outside them.
fn apply_text_style(text: &str, style: &FontStyle) -> String {
    let core = text.trim();
    if core.is_empty() || !style.has_emphasis() {
        return text.to_string();
    }
    let start = text.len() - text.trim_start().len();
    let end = start + core.len();

    let mut result = core.to_string();
    if style.italic {
        result = format!("*{}*", result);
    }
    if style.bold {
        result = format!("**{}**", result);
    }
    if style.underline {
        result = format!("<u>{}</u>", result);
    }

    format!("{}{}{}", &text[..start], result, &text[end..])
}

/// Escape special Markdown characters.
/// Only escape characters that could be misinterpreted as inline syntax;
/// line-start markers are handled per paragraph.
fn escape_markdown(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\\' | '`' | '*' | '_' | '[' | ']' | '<' => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }
    result
}
