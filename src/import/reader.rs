//! Driving an [`Importer`] from XML text.
//!
//! The tokenizer may split character data into several events (around
//! entity references and CDATA sections, for example). Adjacent text is
//! coalesced here so the importer sees one `characters` call per run.

use std::fmt::Display;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::{debug, info};
use quick_xml::escape::unescape;
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use super::{ImportOptions, ImportReport, Importer, TextEncoding};
use crate::error::{Error, Result};
use crate::sink::RichTextSink;

/// Import a fragment held in a string.
///
/// Errors are reserved for input that cannot be tokenized or whose tags
/// do not pair up. Everything the importer can tolerate is reported in the
/// returned [`ImportReport`] instead.
pub fn import_str<S>(xml: &str, sink: &mut S, options: &ImportOptions) -> Result<ImportReport>
where
    S: RichTextSink + ?Sized,
{
    let xml = xml.strip_prefix('\u{feff}').unwrap_or(xml);
    let mut reader = Reader::from_reader(xml.as_bytes());
    reader.config_mut().trim_text(false);

    let mut importer = Importer::new(sink, options);
    let mut buf = Vec::with_capacity(64);
    let mut open: Vec<String> = Vec::with_capacity(8);
    let mut pending = String::new();

    loop {
        let event = reader.read_event_into(&mut buf).map_err(|err| Error::Markup {
            position: reader.error_position(),
            message: err.to_string(),
        })?;
        match event {
            Event::Decl(decl) => {
                if let Some(label) = decl.encoding() {
                    let label = label.map_err(|err| markup_error(&reader, err))?;
                    let label = String::from_utf8_lossy(&label).into_owned();
                    if !options.encoding.matches_label(&label) {
                        return Err(Error::UnsupportedEncoding(label));
                    }
                }
            }
            Event::Start(e) => {
                flush(&mut pending, &mut importer);
                let (name, attributes) = element_parts(&reader, &e)?;
                importer.start_element(&name, &attributes);
                open.push(name);
            }
            Event::Empty(e) => {
                flush(&mut pending, &mut importer);
                let (name, attributes) = element_parts(&reader, &e)?;
                importer.start_element(&name, &attributes);
                importer.end_element(&name);
            }
            Event::End(e) => {
                flush(&mut pending, &mut importer);
                let name = decode_name(&reader, e.name().as_ref())?;
                match open.pop() {
                    Some(expected) if expected == name => importer.end_element(&name),
                    Some(expected) => {
                        return Err(Error::UnbalancedMarkup(format!(
                            "expected </{}>, found </{}>",
                            expected, name
                        )))
                    }
                    None => {
                        return Err(Error::UnbalancedMarkup(format!(
                            "</{}> without matching start tag",
                            name
                        )))
                    }
                }
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| markup_error(&reader, err))?;
                pending.push_str(&text);
            }
            Event::CData(e) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| markup_error(&reader, err))?;
                pending.push_str(&text);
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(|err| markup_error(&reader, err))?;
                let entity = format!("&{};", name);
                let resolved = unescape(&entity).map_err(|err| markup_error(&reader, err))?;
                pending.push_str(&resolved);
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    flush(&mut pending, &mut importer);

    if let Some(name) = open.last() {
        return Err(Error::UnbalancedMarkup(format!("<{}> is never closed", name)));
    }

    let report = importer.finish();
    debug!(
        "imported {} paragraphs, {} images, {} diagnostics",
        report.stats.paragraph_count,
        report.stats.image_count,
        report.diagnostics.len()
    );
    Ok(report)
}

/// Import a fragment from raw bytes in the configured encoding.
pub fn import_bytes<S>(bytes: &[u8], sink: &mut S, options: &ImportOptions) -> Result<ImportReport>
where
    S: RichTextSink + ?Sized,
{
    let text = match options.encoding {
        TextEncoding::Utf8 => std::str::from_utf8(bytes)?,
    };
    import_str(text, sink, options)
}

/// Import a fragment from a reader.
pub fn import_reader<R, S>(mut reader: R, sink: &mut S, options: &ImportOptions) -> Result<ImportReport>
where
    R: Read,
    S: RichTextSink + ?Sized,
{
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes)?;
    import_bytes(&bytes, sink, options)
}

/// Import a fragment from a file.
pub fn import_file<P, S>(path: P, sink: &mut S, options: &ImportOptions) -> Result<ImportReport>
where
    P: AsRef<Path>,
    S: RichTextSink + ?Sized,
{
    let path = path.as_ref();
    info!("importing {}", path.display());
    let file = File::open(path)?;
    import_reader(BufReader::new(file), sink, options)
}

fn flush<S: RichTextSink + ?Sized>(pending: &mut String, importer: &mut Importer<'_, S>) {
    if !pending.is_empty() {
        importer.characters(pending);
        pending.clear();
    }
}

fn markup_error(reader: &Reader<&[u8]>, err: impl Display) -> Error {
    Error::Markup {
        position: reader.buffer_position(),
        message: err.to_string(),
    }
}

fn decode_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String> {
    let decoded = reader
        .decoder()
        .decode(raw)
        .map_err(|err| markup_error(reader, err))?;
    let local_name = decoded.rsplit(':').next().unwrap_or(decoded.as_ref());
    Ok(local_name.to_string())
}

/// Local element name and attributes, with namespace declarations dropped.
fn element_parts(reader: &Reader<&[u8]>, e: &BytesStart<'_>) -> Result<(String, Vec<(String, String)>)> {
    let name = decode_name(reader, e.name().as_ref())?;
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(|err| markup_error(reader, err))?;
        let key = reader
            .decoder()
            .decode(attr.key.as_ref())
            .map_err(|err| markup_error(reader, err))?;
        if key == "xmlns" || key.starts_with("xmlns:") {
            continue;
        }
        let raw = reader
            .decoder()
            .decode(&attr.value)
            .map_err(|err| markup_error(reader, err))?;
        let value = unescape(&raw).map_err(|err| markup_error(reader, err))?;
        attributes.push((key.into_owned(), value.into_owned()));
    }
    Ok((name, attributes))
}
