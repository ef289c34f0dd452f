//! Rendering options and configuration.

use std::path::PathBuf;

/// Options for rendering document content.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Directory to save extracted images
    pub image_dir: Option<PathBuf>,

    /// Prefix for image paths in output (e.g., "./images/")
    pub image_path_prefix: String,

    /// Emit image references
    pub include_images: bool,

    /// Escape special Markdown characters
    pub escape_special_chars: bool,

    /// Render bold, italic and underline in Markdown
    pub emphasis: bool,

    /// Render hyperlinked runs as Markdown links
    pub links: bool,

    /// Indent plain text lines by the paragraph's left indent
    pub indent_text: bool,

    /// Indent units per space when `indent_text` is set
    pub indent_unit: i32,
}

impl RenderOptions {
    /// Create new render options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the image directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.image_dir = Some(dir.into());
        self
    }

    /// Set the image path prefix.
    pub fn with_image_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.image_path_prefix = prefix.into();
        self
    }

    /// Enable or disable image references.
    pub fn with_images(mut self, include: bool) -> Self {
        self.include_images = include;
        self
    }

    /// Enable or disable Markdown escaping.
    pub fn with_escaping(mut self, escape: bool) -> Self {
        self.escape_special_chars = escape;
        self
    }

    /// Enable or disable emphasis markers.
    pub fn with_emphasis(mut self, emphasis: bool) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Enable or disable links.
    pub fn with_links(mut self, links: bool) -> Self {
        self.links = links;
        self
    }

    /// Enable or disable indentation of plain text.
    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent_text = indent;
        self
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            image_dir: None,
            image_path_prefix: String::new(),
            include_images: true,
            escape_special_chars: true,
            emphasis: true,
            links: true,
            indent_text: false,
            indent_unit: 50,
        }
    }
}
