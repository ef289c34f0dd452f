//! Integration tests for fragment import through the public API.

use std::io::Cursor;

use rtimport::import::Importer;
use rtimport::{
    import_str, Alignment, DiagnosticKind, FontStyle, ImportOptions, LineSpacing, RecordingSink,
    SinkOp,
};

const NONE: &[(&str, &str)] = &[];

fn png_hex(width: u32, height: u32) -> String {
    let img = image::RgbaImage::from_pixel(width, height, image::Rgba([0, 128, 255, 255]));
    let mut bytes = Cursor::new(Vec::new());
    img.write_to(&mut bytes, image::ImageFormat::Png).unwrap();
    hex::encode_upper(bytes.into_inner())
}

fn run(xml: &str, options: &ImportOptions) -> (RecordingSink, rtimport::ImportReport) {
    let mut sink = RecordingSink::new();
    let report = import_str(xml, &mut sink, options).unwrap();
    (sink, report)
}

#[test]
fn test_cascade_inheritance() {
    let xml = r#"<richtext><paragraphlayout alignment="1"><paragraph><text>x</text></paragraph></paragraphlayout></richtext>"#;
    let (sink, report) = run(xml, &ImportOptions::default());

    assert!(report.is_clean());
    assert_eq!(sink.paragraph_styles()[0].alignment, Alignment::Left);
    assert_eq!(sink.character_styles(), vec![&FontStyle::default()]);
}

#[test]
fn test_cascade_override_isolation() {
    let xml = r#"<richtext>
  <paragraphlayout alignment="1">
    <paragraph alignment="3" leftindent="100"><text>first</text></paragraph>
    <paragraph><text>second</text></paragraph>
  </paragraphlayout>
</richtext>"#;
    let (sink, _) = run(xml, &ImportOptions::new().with_margins(50, 0));

    let styles = sink.paragraph_styles();
    assert_eq!(styles.len(), 2);
    assert_eq!(styles[0].alignment, Alignment::Right);
    assert_eq!(styles[0].left_indent, 150);
    assert_eq!(styles[1].alignment, Alignment::Left);
    assert_eq!(styles[1].left_indent, 50);
}

#[test]
fn test_character_overrides_flow_down_not_sideways() {
    let xml = r##"<richtext>
  <paragraphlayout fontface="Arial" fontpointsize="10">
    <paragraph fontweight="92">
      <text fontstyle="93" textcolor="#FF0000">a</text>
      <text>b</text>
    </paragraph>
    <paragraph><text>c</text></paragraph>
  </paragraphlayout>
</richtext>"##;
    let (sink, report) = run(xml, &ImportOptions::default());
    assert!(report.is_clean());

    let styles = sink.character_styles();
    assert_eq!(styles.len(), 3);
    assert!(styles[0].bold && styles[0].italic);
    assert_eq!(styles[0].foreground_color.to_hex(), "#FF0000");
    assert!(styles[1].bold && !styles[1].italic);
    assert_eq!(styles[1].foreground_color, rtimport::Color::BLACK);
    assert!(!styles[2].bold);
    assert!(styles.iter().all(|s| s.font_face == "Arial" && s.font_size == 10));
}

#[test]
fn test_margin_offset_idempotence() {
    let xml = r#"<richtext><paragraphlayout tabs="200,400"><paragraph/></paragraphlayout></richtext>"#;
    let options = ImportOptions::new().with_margins(30, 0);

    let (first, _) = run(xml, &options);
    let (second, _) = run(xml, &options);

    assert_eq!(first.paragraph_styles()[0].tab_stops, vec![230, 430]);
    assert_eq!(first.ops(), second.ops());
}

#[test]
fn test_right_margin_and_first_line_indent() {
    let xml = r#"<richtext><paragraph leftindent="10" leftsubindent="20" rightindent="5" linespacing="15" parspacingafter="40"/></richtext>"#;
    let (sink, _) = run(xml, &ImportOptions::new().with_margins(100, 7));

    let style = sink.paragraph_styles()[0];
    assert_eq!(style.left_indent, 110);
    assert_eq!(style.first_line_indent, 20);
    assert_eq!(style.right_indent, 12);
    assert_eq!(style.line_spacing, LineSpacing::OneAndHalf);
    assert_eq!(style.spacing_after, 40);
}

#[test]
fn test_extreme_indents_saturate() {
    let xml = r#"<richtext><paragraph leftindent="2147483647" rightindent="-2147483648" tabs="2147483647,5"/></richtext>"#;
    let (sink, report) = run(xml, &ImportOptions::new().with_margins(1, -1));

    assert!(report.is_clean());
    let style = sink.paragraph_styles()[0];
    assert_eq!(style.left_indent, i32::MAX);
    assert_eq!(style.right_indent, i32::MIN);
    assert_eq!(style.tab_stops, vec![i32::MAX, 6]);
}

#[test]
fn test_text_normalization_table() {
    let cases = [
        ("\"", "x", ""),
        ("\" ", "x", " "),
        (".\"", "x", "."),
        ("\" hello \"", "x", "hello "),
    ];
    let options = ImportOptions::default();

    for (data, before, expected) in cases {
        let mut sink = RecordingSink::after_text(before);
        let mut importer = Importer::new(&mut sink, &options);
        importer.start_element("text", NONE);
        importer.characters(data);
        importer.end_element("text");
        importer.finish();

        let written: String = sink.writes().concat();
        assert_eq!(written, expected, "input {:?}", data);
    }
}

#[test]
fn test_normalization_sees_previous_run() {
    // The second run follows a space written by the first
    let xml = r#"<richtext><paragraph><text>a </text><text fontweight="92">" bold"</text></paragraph></richtext>"#;
    let (sink, _) = run(xml, &ImportOptions::default());
    assert_eq!(sink.writes(), vec!["a ", " bold"]);
}

#[test]
fn test_image_split_across_events() {
    let payload = png_hex(2, 2);
    let third = payload.len() / 3;
    let mut sink = RecordingSink::new();
    let options = ImportOptions::default();

    let mut importer = Importer::new(&mut sink, &options);
    importer.start_element::<&str, &str>("paragraph", &[]);
    importer.start_element("image", &[("imagetype", "15")]);
    importer.start_element("data", NONE);
    importer.characters(&payload[..third]);
    importer.characters(&payload[third..2 * third]);
    importer.characters(&payload[2 * third..]);
    importer.end_element("data");
    importer.end_element("image");
    importer.end_element("paragraph");
    let report = importer.finish();

    assert!(report.is_clean());
    assert_eq!(sink.image_count(), 1);
    let head = sink
        .ops()
        .iter()
        .find_map(|op| match op {
            SinkOp::WriteImage { head, width, .. } => Some((head.clone(), *width)),
            _ => None,
        })
        .unwrap();
    assert_eq!(head.0, vec![0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);
    assert_eq!(head.1, 2);
}

#[test]
fn test_image_payload_via_reader() {
    let payload = png_hex(4, 1);
    let wrapped: Vec<&str> = payload
        .as_bytes()
        .chunks(64)
        .map(|c| std::str::from_utf8(c).unwrap())
        .collect();
    let xml = format!(
        r#"<richtext><paragraph><image imagetype="15"><data>{}</data></image></paragraph></richtext>"#,
        wrapped.join("\n")
    );
    let (sink, report) = run(&xml, &ImportOptions::default());
    assert_eq!(sink.image_count(), 1);
    assert_eq!(report.stats.image_count, 1);
}

#[test]
fn test_bad_payloads_write_one_placeholder() {
    for payload in ["", "89504E470D0A1A0A0000", "89504"] {
        let xml = format!(
            r#"<richtext><paragraph><image imagetype="15"><data>{}</data></image></paragraph></richtext>"#,
            payload
        );
        let options = ImportOptions::new().with_placeholder("[missing]");
        let (sink, report) = run(&xml, &options);

        assert_eq!(sink.image_count(), 0, "payload {:?}", payload);
        assert_eq!(sink.writes(), vec!["[missing]"]);
        assert_eq!(report.count(DiagnosticKind::ImageDecode), 1);
        assert_eq!(report.stats.placeholder_count, 1);
    }
}

#[test]
fn test_unsupported_image_type_is_skipped() {
    let xml = r#"<richtext><paragraph><image imagetype="17"><data>FFD8FFE0</data></image></paragraph></richtext>"#;
    let (sink, report) = run(xml, &ImportOptions::default());

    assert_eq!(sink.image_count(), 0);
    assert!(sink.writes().is_empty());
    assert_eq!(report.count(DiagnosticKind::UnsupportedImageType), 1);
    assert!(report.diagnostics[0].message.contains("JPG"));
}

#[test]
fn test_unknown_element_tolerance() {
    let plain = r#"<richtext><paragraphlayout alignment="2"><paragraph><text fontweight="92">a</text><text>b</text></paragraph></paragraphlayout></richtext>"#;
    let variants = [
        r#"<richtext><widget id="7" kind="x"/><paragraphlayout alignment="2"><paragraph><text fontweight="92">a</text><text>b</text></paragraph></paragraphlayout></richtext>"#,
        r#"<richtext><paragraphlayout alignment="2"><paragraph><shape w="1"/><text fontweight="92">a</text><text>b</text></paragraph></paragraphlayout></richtext>"#,
        r#"<richtext><paragraphlayout alignment="2"><paragraph><text fontweight="92">a</text><marker a="1" b="2"></marker><text>b</text></paragraph></paragraphlayout></richtext>"#,
    ];
    let options = ImportOptions::default();
    let (expected, _) = run(plain, &options);

    for xml in variants {
        let (sink, report) = run(xml, &options);
        assert_eq!(sink.ops(), expected.ops(), "{}", xml);
        assert_eq!(report.count(DiagnosticKind::UnknownElement), 1);
    }
}

#[test]
fn test_unknown_element_inside_text_run() {
    let plain = r#"<richtext><paragraph><text>x</text><text>" hello"</text></paragraph></richtext>"#;
    let variants = [
        r#"<richtext><paragraph><text>x</text><text>"<marker/> hello"</text></paragraph></richtext>"#,
        r#"<richtext><paragraph><text>x</text><text>" hel<marker id="1"></marker>lo"</text></paragraph></richtext>"#,
        r#"<richtext><paragraph><text>x</text><text>" hello<marker/>"</text></paragraph></richtext>"#,
    ];
    let options = ImportOptions::default();
    let (expected, _) = run(plain, &options);
    assert_eq!(expected.writes(), vec!["x", "hello"]);

    for xml in variants {
        let (sink, report) = run(xml, &options);
        assert_eq!(sink.ops(), expected.ops(), "{}", xml);
        assert_eq!(report.count(DiagnosticKind::UnknownElement), 1);
    }
}

#[test]
fn test_unknown_element_logs_attributes() {
    let xml = r#"<richtext><widget id="7" kind="x"/></richtext>"#;
    let (_, report) = run(xml, &ImportOptions::default());
    assert_eq!(report.diagnostics[0].message, r#"<widget id="7" kind="x">"#);
}

#[test]
fn test_invalid_and_misplaced_attributes() {
    let xml = r#"<richtext><paragraphlayout alignment="9" url="http://x"><paragraph><symbol url="http://y">65</symbol></paragraph></paragraphlayout></richtext>"#;
    let (sink, report) = run(xml, &ImportOptions::default());

    assert_eq!(report.count(DiagnosticKind::InvalidAttribute), 1);
    assert_eq!(report.count(DiagnosticKind::UnknownAttribute), 2);
    assert_eq!(sink.paragraph_styles()[0].alignment, Alignment::Left);
    assert_eq!(sink.writes(), vec!["A"]);
}

#[test]
fn test_url_belongs_to_one_run() {
    let xml = r#"<richtext><paragraph><text url="https://example.com">link</text><text>plain</text></paragraph></richtext>"#;
    let (sink, _) = run(xml, &ImportOptions::default());

    let styles = sink.character_styles();
    assert_eq!(styles[0].url.as_deref(), Some("https://example.com"));
    assert_eq!(styles[1].url, None);
}

#[test]
fn test_bulleted_paragraph_rendered_plain() {
    let xml = r#"<richtext><paragraph bulletstyle="512" bulletsymbol="183" bulletfont="Symbol"><text>item</text></paragraph></richtext>"#;
    let (sink, report) = run(xml, &ImportOptions::default());

    assert_eq!(report.count(DiagnosticKind::UnsupportedFeature), 1);
    assert_eq!(sink.text(), "item\n");
}

#[test]
fn test_default_font_option() {
    let xml = r#"<richtext><paragraph><text>x</text></paragraph></richtext>"#;
    let options = ImportOptions::new().with_default_font(FontStyle::new("Arial", 9));
    let (sink, report) = run(xml, &options);

    assert_eq!(sink.character_styles()[0].font_face, "Arial");
    assert_eq!(report.font_faces, vec!["Arial"]);
}
