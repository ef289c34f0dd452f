//! Accumulation and decoding of hex-encoded image payloads.

use log::{debug, trace};
use thiserror::Error;

use crate::model::{EmbeddedImage, ImageType};

/// Why an accumulated payload could not become an image.
#[derive(Error, Debug)]
pub enum ImageDecodeError {
    /// The payload was empty.
    #[error("image payload is empty")]
    Empty,

    /// The payload is not a sequence of hex digit pairs.
    #[error("invalid hex payload: {0}")]
    Hex(#[from] hex::FromHexError),

    /// The bytes do not form a readable image.
    #[error("invalid image data: {0}")]
    Image(#[from] image::ImageError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Idle,
    Armed(ImageType),
    Rejected,
    Accumulating(ImageType),
}

/// State machine for one image holder and its payload.
#[derive(Debug)]
pub struct PayloadDecoder {
    state: State,
    buffer: String,
}

/// What opening a payload element did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadStart {
    /// Accumulation started
    Accumulating,
    /// The enclosing holder declared an unsupported type
    Rejected,
    /// No holder is open
    Orphan,
}

impl PayloadDecoder {
    /// Create an idle decoder.
    pub fn new() -> Self {
        Self {
            state: State::Idle,
            buffer: String::new(),
        }
    }

    /// Open a holder with the declared type. Returns false if the type is
    /// not supported, in which case its payloads are skipped.
    pub fn open_holder(&mut self, image_type: Option<ImageType>) -> bool {
        match image_type {
            Some(ImageType::Png) => {
                self.state = State::Armed(ImageType::Png);
                true
            }
            _ => {
                self.state = State::Rejected;
                false
            }
        }
    }

    /// Close the holder.
    pub fn close_holder(&mut self) {
        self.state = State::Idle;
        self.buffer.clear();
    }

    /// Open a payload element, clearing the buffer.
    pub fn open_payload(&mut self) -> PayloadStart {
        self.buffer.clear();
        match self.state {
            State::Armed(kind) | State::Accumulating(kind) => {
                self.state = State::Accumulating(kind);
                PayloadStart::Accumulating
            }
            State::Rejected => PayloadStart::Rejected,
            State::Idle => PayloadStart::Orphan,
        }
    }

    /// Check if payload text is being collected.
    pub fn is_accumulating(&self) -> bool {
        matches!(self.state, State::Accumulating(_))
    }

    /// Append payload text verbatim.
    pub fn push(&mut self, data: &str) {
        if self.is_accumulating() {
            trace!("image payload chunk of {} chars", data.len());
            self.buffer.push_str(data);
        }
    }

    /// Close the payload element and decode what was collected.
    ///
    /// Returns `None` if no payload was being collected.
    pub fn close_payload(&mut self) -> Option<Result<EmbeddedImage, ImageDecodeError>> {
        let State::Accumulating(kind) = self.state else {
            return None;
        };
        self.state = State::Armed(kind);
        let hex_text = std::mem::take(&mut self.buffer);
        Some(decode_payload(&hex_text))
    }
}

impl Default for PayloadDecoder {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode a complete hex payload into a PNG image.
///
/// ASCII whitespace between hex digits is ignored.
pub fn decode_payload(hex_text: &str) -> Result<EmbeddedImage, ImageDecodeError> {
    let digits: String = hex_text
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    if digits.is_empty() {
        return Err(ImageDecodeError::Empty);
    }

    let data = hex::decode(&digits)?;
    let decoded = image::load_from_memory_with_format(&data, image::ImageFormat::Png)?;
    debug!(
        "decoded {}x{} image from {} bytes",
        decoded.width(),
        decoded.height(),
        data.len()
    );
    Ok(EmbeddedImage::png(data, decoded.width(), decoded.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn png_hex(width: u32, height: u32) -> String {
        let img = image::RgbImage::from_pixel(width, height, image::Rgb([200, 10, 10]));
        let mut bytes = Cursor::new(Vec::new());
        img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
        hex::encode_upper(bytes.into_inner())
    }

    #[test]
    fn test_decode_split_payload() {
        let hex_text = png_hex(3, 2);
        let third = hex_text.len() / 3;

        let mut decoder = PayloadDecoder::new();
        assert!(decoder.open_holder(Some(ImageType::Png)));
        assert_eq!(decoder.open_payload(), PayloadStart::Accumulating);
        decoder.push(&hex_text[..third]);
        decoder.push(&hex_text[third..2 * third]);
        decoder.push(&hex_text[2 * third..]);

        let image = decoder.close_payload().unwrap().unwrap();
        assert!(image.has_png_signature());
        assert_eq!((image.width, image.height), (3, 2));
        assert!(decoder.close_payload().is_none());
    }

    #[test]
    fn test_whitespace_between_chunks_is_ignored() {
        let hex_text = png_hex(1, 1);
        let wrapped = format!("{}\n  {}", &hex_text[..10], &hex_text[10..]);
        assert!(decode_payload(&wrapped).is_ok());
    }

    #[test]
    fn test_empty_and_truncated_payloads() {
        assert!(matches!(decode_payload(""), Err(ImageDecodeError::Empty)));
        assert!(matches!(decode_payload("89504"), Err(ImageDecodeError::Hex(_))));
        assert!(matches!(
            decode_payload("89504E470D0A1A0A"),
            Err(ImageDecodeError::Image(_))
        ));
        assert!(matches!(decode_payload("zz"), Err(ImageDecodeError::Hex(_))));
    }

    #[test]
    fn test_rejected_holder_skips_payload() {
        let mut decoder = PayloadDecoder::new();
        assert!(!decoder.open_holder(Some(ImageType::Jpeg)));
        assert_eq!(decoder.open_payload(), PayloadStart::Rejected);
        decoder.push("FFD8");
        assert!(!decoder.is_accumulating());
        assert!(decoder.close_payload().is_none());
    }

    #[test]
    fn test_orphan_payload() {
        let mut decoder = PayloadDecoder::new();
        assert_eq!(decoder.open_payload(), PayloadStart::Orphan);
        assert!(decoder.close_payload().is_none());
    }

    #[test]
    fn test_new_payload_clears_buffer() {
        let hex_text = png_hex(1, 1);
        let mut decoder = PayloadDecoder::new();
        decoder.open_holder(Some(ImageType::Png));
        decoder.open_payload();
        decoder.push("DEADBEEF");
        decoder.open_payload();
        decoder.push(&hex_text);
        assert!(decoder.close_payload().unwrap().is_ok());
    }
}
