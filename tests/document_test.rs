//! Integration tests for importing into the in-memory document.

use std::fs;
use std::io::Cursor;

use rtimport::render::{to_markdown, to_text};
use rtimport::{
    import_file, import_reader, import_str, Document, Error, ImportOptions, InlineContent,
    JsonFormat, RenderOptions, RtImport,
};

fn png_hex() -> String {
    let img = image::GrayImage::from_pixel(3, 3, image::Luma([90]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    hex::encode(bytes.into_inner())
}

const LETTER: &str = r##"<?xml version="1.0" encoding="UTF-8"?>
<richtext version="1.0.0.0" xmlns="http://www.wxwidgets.org">
  <paragraphlayout textcolor="#000000" fontpointsize="10" fontface="Times New Roman" alignment="1">
    <paragraph alignment="2">
      <text fontweight="92">Dear reader,</text>
    </paragraph>
    <paragraph>
      <text>Visit </text>
      <text url="https://example.org" fontunderlined="1">our site</text>
      <text>. Thanks!</text>
    </paragraph>
  </paragraphlayout>
</richtext>"##;

#[test]
fn test_fragments_append_into_one_document() {
    let mut doc = Document::new();
    let options = ImportOptions::default();

    import_str(LETTER, &mut doc, &options).unwrap();
    let first_count = doc.paragraph_count();
    import_str(LETTER, &mut doc, &options).unwrap();

    assert_eq!(first_count, 2);
    assert_eq!(doc.paragraph_count(), 4);
    assert_eq!(
        doc.plain_text(),
        "Dear reader,\nVisit our site. Thanks!\nDear reader,\nVisit our site. Thanks!"
    );
}

#[test]
fn test_document_keeps_styles_per_run() {
    let mut doc = Document::new();
    import_str(LETTER, &mut doc, &ImportOptions::default()).unwrap();

    let heading = &doc.paragraphs[0];
    assert_eq!(heading.style.alignment, rtimport::Alignment::Center);
    match &heading.content[0] {
        InlineContent::Text(run) => {
            assert!(run.style.bold);
            assert_eq!(run.style.font_face, "Times New Roman");
        }
        other => panic!("unexpected content {:?}", other),
    }

    let body = &doc.paragraphs[1];
    assert_eq!(body.content.len(), 3);
}

#[test]
fn test_markdown_rendering() {
    let mut doc = Document::new();
    import_str(LETTER, &mut doc, &ImportOptions::default()).unwrap();

    let markdown = to_markdown(&doc, &RenderOptions::default()).unwrap();
    assert_eq!(
        markdown,
        "**Dear reader,**\n\nVisit [<u>our site</u>](https://example.org). Thanks!"
    );
}

#[test]
fn test_image_stored_as_resource() {
    let xml = format!(
        r#"<richtext><paragraph><text>Logo: </text><image imagetype="15"><data>{}</data></image></paragraph></richtext>"#,
        png_hex()
    );
    let mut doc = Document::new();
    let report = import_str(&xml, &mut doc, &ImportOptions::default()).unwrap();

    assert!(report.is_clean());
    assert_eq!(doc.image_count(), 1);
    let image = doc.get_resource("image-1").unwrap();
    assert!(image.has_png_signature());
    assert_eq!((image.width, image.height), (3, 3));

    let text = to_text(&doc, &RenderOptions::default()).unwrap();
    assert_eq!(text, "Logo: [image-1]");
}

#[test]
fn test_placeholder_ends_paragraph() {
    let xml = r#"<richtext><paragraph><text>before</text><image imagetype="15"><data>zz</data></image><text>after</text></paragraph></richtext>"#;
    let mut doc = Document::new();
    import_str(xml, &mut doc, &ImportOptions::default()).unwrap();

    assert_eq!(doc.image_count(), 0);
    assert_eq!(
        doc.plain_text(),
        "before[Image could not be loaded]\nafter"
    );
}

#[test]
fn test_import_file_and_reader() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("letter.xml");
    fs::write(&path, LETTER).unwrap();

    let mut from_file = Document::new();
    import_file(&path, &mut from_file, &ImportOptions::default()).unwrap();

    let mut from_reader = Document::new();
    let file = fs::File::open(&path).unwrap();
    import_reader(file, &mut from_reader, &ImportOptions::default()).unwrap();

    assert_eq!(from_file.plain_text(), from_reader.plain_text());
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut doc = Document::new();
    let result = import_file(dir.path().join("nope.xml"), &mut doc, &ImportOptions::default());
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_builder_saves_images() {
    let dir = tempfile::tempdir().unwrap();
    let images = dir.path().join("images");
    let xml = format!(
        r#"<richtext><paragraph><image imagetype="15"><data>{}</data></image></paragraph></richtext>"#,
        png_hex()
    );

    let result = RtImport::new()
        .with_image_dir(&images)
        .with_image_prefix("images/")
        .import_str(&xml)
        .unwrap();

    let saved = result.save_images().unwrap();
    assert_eq!(saved, vec![images.join("image-1.png")]);
    assert!(fs::read(&saved[0]).unwrap().starts_with(&[0x89, b'P', b'N', b'G']));
    assert_eq!(result.to_markdown().unwrap(), "![image-1](images/image-1.png)");
}

#[test]
fn test_json_output() {
    let result = RtImport::new().import_str(LETTER).unwrap();
    let json = result.to_json(JsonFormat::Compact).unwrap();

    let value: serde_json::Value = serde_json::from_str(&json).unwrap();
    let paragraphs = value["paragraphs"].as_array().unwrap();
    assert_eq!(paragraphs.len(), 2);
    assert_eq!(paragraphs[0]["style"]["alignment"], "center");
    assert_eq!(paragraphs[1]["content"][1]["style"]["url"], "https://example.org");
}
