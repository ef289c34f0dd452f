//! Cleanup of text and symbol character data.
//!
//! The markup writer wraps runs that begin or end with a space in quotation
//! marks. These rules strip those delimiters again. They operate on the
//! complete character data of one text element and are applied in a fixed
//! order.

const QUOTE: char = '"';

/// Normalize character data of a text run.
///
/// `previous` is the character immediately before the insertion point in
/// the sink. Returns the text to write, which may be empty.
pub fn normalize_text(data: &str, previous: Option<char>) -> String {
    match data {
        "\"" => return String::new(),
        "\" " => return " ".to_string(),
        ".\"" => return ".".to_string(),
        _ => {}
    }

    let chars: Vec<char> = data.chars().collect();
    let len = chars.len();
    if len < 2 {
        return data.to_string();
    }

    let quoted = chars[0] == QUOTE || chars[len - 1] == QUOTE;
    let spaced = chars[0] == ' ' || chars[1] == ' ' || chars[len - 2] == ' ' || chars[len - 1] == ' ';
    if !(quoted && spaced) {
        return data.to_string();
    }

    let mut start = 0;
    if chars[0] == QUOTE {
        start = 1;
        // Keep the space after the quote only when the sink already ends in one
        if chars[1] == ' ' && previous != Some(' ') {
            start = 2;
        }
    }
    let mut end = len;
    if end > start && chars[end - 1] == QUOTE {
        end -= 1;
    }

    chars[start..end].iter().collect()
}

/// Decode character data of a symbol element.
///
/// Whitespace-only data yields `Ok(None)`, as does the newline code (10).
/// Otherwise the data must be a decimal Unicode scalar value.
pub fn decode_symbol(data: &str) -> Result<Option<char>, String> {
    let trimmed = data.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let code: u32 = trimmed
        .parse()
        .map_err(|_| format!("symbol code '{}' is not a number", trimmed))?;
    match char::from_u32(code) {
        Some('\n') => Ok(None),
        Some(symbol) => Ok(Some(symbol)),
        None => Err(format!("symbol code {} is not a valid character", code)),
    }
}
