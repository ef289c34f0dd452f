//! Error types for rtimport library.

use std::io;
use thiserror::Error;

/// Result type alias for rtimport operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while importing a fragment.
///
/// Problems inside a well-formed fragment (unknown elements, bad attribute
/// values, undecodable images) are never errors; they are recorded as
/// [`Diagnostic`](crate::import::Diagnostic)s and the import carries on.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The markup tokenizer rejected the input.
    #[error("Markup error at byte {position}: {message}")]
    Markup {
        /// Byte offset reported by the tokenizer
        position: u64,
        /// Tokenizer message
        message: String,
    },

    /// Start and end tags do not pair up.
    #[error("Unbalanced markup: {0}")]
    UnbalancedMarkup(String),

    /// The input is not valid in the declared text encoding.
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The fragment declares an encoding other than the supported one.
    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    /// Error during rendering (Markdown, text, JSON).
    #[error("Rendering error: {0}")]
    Render(String),
}

impl From<std::str::Utf8Error> for Error {
    fn from(err: std::str::Utf8Error) -> Self {
        Error::Encoding(err.to_string())
    }
}
