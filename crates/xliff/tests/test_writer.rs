mod common;

use common::{SAMPLE, by_id, first, read, write, write_compact, xliff};
use xliff_om::{
    Document, Error, NodeKind, OutputDetail, Reader, Result, Slot, Writer, WriterSettings,
};

const CORE: &str = r#"xmlns="urn:oasis:names:tc:xliff:document:2.0""#;

fn space_document() -> Result<Document> {
    read(&xliff(
        r#"srcLang="en""#,
        concat!(
            r#"<file id="f1" xml:space="preserve">"#,
            r#"<unit id="u1"><segment><source>a</source></segment></unit>"#,
            r#"<unit id="u2" xml:space="default"><segment><source>b</source></segment></unit>"#,
            r#"</file>"#
        ),
    ))
}

#[test]
fn test_inherited_space_is_written_only_where_it_differs() -> Result<()> {
    let document = space_document()?;
    let xml = write_compact(&document, OutputDetail::Minimal)?;
    let expected = format!(
        concat!(
            r#"<xliff {} version="2.0" srcLang="en">"#,
            r#"<file id="f1" xml:space="preserve">"#,
            r#"<unit id="u1"><segment><source>a</source></segment></unit>"#,
            r#"<unit id="u2" xml:space="default"><segment><source>b</source></segment></unit>"#,
            r#"</file></xliff>"#
        ),
        CORE
    );
    assert_eq!(xml, expected);
    Ok(())
}

#[test]
fn test_full_detail_writes_inherited_space() -> Result<()> {
    let document = space_document()?;
    let xml = write_compact(&document, OutputDetail::Full)?;
    assert!(xml.contains(r#"srcLang="en" xml:space="default"><file "#), "{}", xml);
    assert!(
        xml.contains(r#"<unit id="u1" canResegment="yes" translate="yes" srcDir="auto" trgDir="auto" xml:space="preserve">"#),
        "{}",
        xml
    );
    assert!(
        xml.contains(r#"<source xml:lang="en" xml:space="preserve">a</source>"#),
        "{}",
        xml
    );
    assert!(xml.contains(r#"<segment canResegment="yes" state="initial">"#), "{}", xml);
    Ok(())
}

fn translate_document() -> Result<Document> {
    read(&xliff(
        r#"srcLang="en""#,
        r#"<file id="f1"><unit id="u1" translate="yes"><segment><source>a</source></segment></unit></file>"#,
    ))
}

#[test]
fn test_detail_levels() -> Result<()> {
    let mut document = translate_document()?;

    let minimal = write_compact(&document, OutputDetail::Minimal)?;
    assert!(minimal.contains(r#"<unit id="u1"><segment>"#), "{}", minimal);

    let explicit = write_compact(&document, OutputDetail::Explicit)?;
    assert!(explicit.contains(r#"<unit id="u1" translate="yes">"#), "{}", explicit);
    assert!(!explicit.contains("canResegment"), "{}", explicit);

    // Materialized values are not explicit.
    let unit = first(&document, NodeKind::Unit);
    document.materialize_attributes(unit);
    assert!(!document.is_explicit(unit, "canResegment"));
    assert_eq!(write_compact(&document, OutputDetail::Explicit)?, explicit);
    assert_eq!(write_compact(&document, OutputDetail::Minimal)?, minimal);

    let full = write_compact(&document, OutputDetail::Full)?;
    assert!(full.contains(r#"canResegment="yes""#), "{}", full);
    Ok(())
}

#[test]
fn test_minimal_keeps_values_that_override_inheritance() -> Result<()> {
    let mut document = translate_document()?;
    let file = first(&document, NodeKind::File);
    document.set_attribute(file, "translate", "no")?;
    let xml = write_compact(&document, OutputDetail::Minimal)?;
    assert!(xml.contains(r#"<file id="f1" translate="no">"#), "{}", xml);
    assert!(xml.contains(r#"<unit id="u1" translate="yes">"#), "{}", xml);
    Ok(())
}

#[test]
fn test_required_attribute_missing_on_write() -> Result<()> {
    let (mut document, root) = Document::with_root("en")?;
    let file = document.create(NodeKind::File);
    document.append(root, file)?;
    let err = Writer::default().serialize_to_string(&document).unwrap_err();
    assert!(
        matches!(err, Error::MissingAttribute { host: NodeKind::File, attribute: "id" }),
        "{}",
        err
    );
    Ok(())
}

#[test]
fn test_validators_run_before_output() -> Result<()> {
    let (mut document, root) = Document::with_root("en")?;
    for _ in 0..2 {
        let file = document.create(NodeKind::File);
        document.set_attribute(file, "id", "dup")?;
        document.append(root, file)?;
    }
    let mut out = Vec::new();
    let err = Writer::default().serialize(&mut out, &document).unwrap_err();
    assert_eq!(err.validation_code(), Some(1001));
    assert!(out.is_empty());

    let written = Writer::new(WriterSettings::default().without_validators())
        .serialize_to_string(&document)?;
    assert_eq!(written.matches("<file ").count(), 2);
    Ok(())
}

#[test]
fn test_schema_order_regardless_of_insertion_order() -> Result<()> {
    let (mut document, root) = Document::with_root("en")?;
    let file = document.create(NodeKind::File);
    document.set_attribute(file, "id", "f1")?;
    document.append(root, file)?;

    let group = document.create(NodeKind::Group);
    document.set_attribute(group, "id", "g1")?;
    document.append(file, group)?;
    let unit = document.create(NodeKind::Unit);
    document.set_attribute(unit, "id", "u1")?;
    document.append(file, unit)?;
    let segment = document.create(NodeKind::Segment);
    document.append(unit, segment)?;
    let source = document.create(NodeKind::Source);
    document.append(segment, source)?;
    let target = document.create(NodeKind::Target);
    document.add_child(segment, Slot::Target, target)?;
    document.set_attribute(root, "trgLang", "de")?;

    let notes = document.create(NodeKind::Notes);
    document.append(file, notes)?;
    let note = document.create(NodeKind::Note);
    document.set_text(note, "late")?;
    document.append(notes, note)?;
    let skeleton = document.create(NodeKind::Skeleton);
    document.set_attribute(skeleton, "href", "a.skl")?;
    document.append(file, skeleton)?;

    let xml = write_compact(&document, OutputDetail::Minimal)?;
    assert!(
        xml.contains(concat!(
            r#"<file id="f1"><skeleton href="a.skl"/><notes><note>late</note></notes>"#,
            r#"<group id="g1"/><unit id="u1"><segment><source/><target/></segment></unit></file>"#
        )),
        "{}",
        xml
    );
    Ok(())
}

#[test]
fn test_indentation() -> Result<()> {
    let document = read(SAMPLE)?;
    let tabs = Writer::new(
        WriterSettings::default()
            .with_indent_chars("\t")
            .with_declaration(false),
    )
    .serialize_to_string(&document)?;
    assert!(tabs.contains("\n\t<file "), "{}", tabs);
    assert!(tabs.contains("\n\t\t\t<unit id=\"u1\""), "{}", tabs);
    assert!(
        tabs.contains(r#"<source>Open <pc id="1" dataRefStart="d1" dataRefEnd="d2">the</pc> file</source>"#),
        "{}",
        tabs
    );

    let flat = write_compact(&document, OutputDetail::Minimal)?;
    assert!(!flat.contains('\n'), "{}", flat);

    let err = Writer::new(WriterSettings::default().with_indent_chars("ab"))
        .serialize_to_string(&document)
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    Ok(())
}

#[test]
fn test_declaration() -> Result<()> {
    let (document, _) = Document::with_root("en")?;
    let xml = write(&document, OutputDetail::Minimal)?;
    assert!(xml.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?>"#), "{}", xml);
    let bare = write_compact(&document, OutputDetail::Minimal)?;
    assert!(bare.starts_with("<xliff "), "{}", bare);
    Ok(())
}

#[test]
fn test_escaping() -> Result<()> {
    let document = read(&xliff(
        r#"srcLang="en""#,
        r#"<file id="f1"><unit id="u1" name="a&amp;b"><segment><source>1 &lt; 2 &amp; 3</source></segment></unit></file>"#,
    ))?;
    let xml = write_compact(&document, OutputDetail::Minimal)?;
    assert!(xml.contains(r#"<unit id="u1" name="a&amp;b">"#), "{}", xml);
    assert!(xml.contains("<source>1 &lt; 2 &amp; 3</source>"), "{}", xml);
    Ok(())
}

#[test]
fn test_character_data_leaves_stay_well_formed() -> Result<()> {
    let mut document = read(&xliff(
        r#"srcLang="en""#,
        r#"<file id="f1"><unit id="u1"><segment><source>a</source></segment></unit></file>"#,
    ))?;
    let source = first(&document, NodeKind::Source);
    assert!(matches!(
        document.create_leaf(NodeKind::Comment, "a--b"),
        Err(Error::InvalidArgument { .. })
    ));
    assert!(matches!(
        document.create_leaf(NodeKind::ProcessingInstruction, "tool ?>"),
        Err(Error::InvalidArgument { .. })
    ));

    let comment = document.create_leaf(NodeKind::Comment, " note ")?;
    document.append(source, comment)?;
    let cdata = document.create_leaf(NodeKind::CData, "x]]>y")?;
    document.append(source, cdata)?;

    let xml = write_compact(&document, OutputDetail::Minimal)?;
    assert!(
        xml.contains("<source>a<!-- note --><![CDATA[x]]]]><![CDATA[>y]]></source>"),
        "{}",
        xml
    );
    let reread = read(&xml)?;
    assert_eq!(reread.plain_text(first(&reread, NodeKind::Source)), "ax]]>y");
    Ok(())
}

#[test]
fn test_extensions_can_be_left_out() -> Result<()> {
    let document = read(SAMPLE)?;
    let with = write(&document, OutputDetail::Minimal)?;
    assert!(with.contains(r#"xmlns:my="urn:example:tool""#), "{}", with);
    assert!(with.contains(r#"my:build="42""#), "{}", with);
    assert!(with.contains("<my:flag>on</my:flag>"), "{}", with);

    let without = Writer::new(WriterSettings::default().with_extensions(false))
        .serialize_to_string(&document)?;
    assert!(!without.contains("xmlns:my"), "{}", without);
    assert!(!without.contains("my:build"), "{}", without);
    assert!(!without.contains("<my:"), "{}", without);
    assert!(without.contains(r#"xmlns:mda="#), "{}", without);
    Ok(())
}

#[test]
fn test_serialize_fragment() -> Result<()> {
    let document = read(SAMPLE)?;
    let segment = by_id(&document, NodeKind::Segment, "s1");
    let source = document.child(segment, Slot::Source).expect("source");
    let pc = document
        .children(source)
        .find(|n| document.kind(*n) == NodeKind::SpanningCode)
        .expect("pc");

    let mut writer = Writer::new(WriterSettings::default().with_indent(false));
    assert_eq!(
        writer.serialize_fragment(&document, pc)?,
        r#"<pc id="1" dataRefStart="d1" dataRefEnd="d2">the</pc>"#
    );

    let unit = by_id(&document, NodeKind::Unit, "u1");
    let fragment = writer.serialize_fragment(&document, unit)?;
    assert!(fragment.starts_with(r#"<unit xmlns:gls="urn:oasis:names:tc:xliff:glossary:2.0""#), "{}", fragment);
    assert!(!fragment.contains(CORE), "{}", fragment);

    let err = writer
        .serialize_fragment(&document, document.document_node())
        .unwrap_err();
    assert!(matches!(err, Error::InvalidArgument { .. }));
    Ok(())
}

#[test]
fn test_fragment_round_trip_through_reader() -> Result<()> {
    let mut document = read(SAMPLE)?;
    let segment = by_id(&document, NodeKind::Segment, "s2");
    let source = document.child(segment, Slot::Source).expect("source");
    let mut writer = Writer::new(WriterSettings::default().with_indent(false));
    let ph = document.list(source, Slot::Content)[1];
    let fragment = writer.serialize_fragment(&document, ph)?;

    let unit = by_id(&document, NodeKind::Unit, "u3");
    let target_segment = document.list(unit, Slot::Subunits)[0];
    let target_source = document.child(target_segment, Slot::Source).expect("source");
    let before = document.children(target_source).count();
    Reader::default().deserialize_fragment(&mut document, target_source, &fragment)?;
    assert_eq!(document.children(target_source).count(), before + 1);
    Ok(())
}

#[test]
fn test_serialize_path() -> Result<()> {
    let document = read(SAMPLE)?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("out.xlf");
    Writer::default().serialize_path(&path, &document)?;
    let written = std::fs::read_to_string(&path)?;
    assert!(written.starts_with("<?xml"), "{}", written);
    let reread = Reader::default().deserialize_path(&path)?;
    common::assert_equivalent(&document, &reread);
    Ok(())
}

#[test]
fn test_settings_from_json() -> Result<()> {
    let settings: WriterSettings = serde_json::from_str(
        r#"{"detail": "explicit", "indent": false, "include_declaration": false}"#,
    )
    .expect("settings");
    let document = translate_document()?;
    let xml = Writer::new(settings).serialize_to_string(&document)?;
    assert!(xml.starts_with("<xliff "), "{}", xml);
    assert!(xml.contains(r#"translate="yes""#), "{}", xml);
    Ok(())
}
