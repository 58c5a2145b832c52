#![allow(dead_code)]

use xliff_om::metadata::Registry;
use xliff_om::{
    Document, NodeId, NodeKind, OutputDetail, Reader, ReaderSettings, Result, Writer,
    WriterSettings,
};

/// A document exercising every modeled namespace, extensions, inline codes
/// and attribute inheritance.
pub const SAMPLE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0"
       xmlns:mda="urn:oasis:names:tc:xliff:metadata:2.0"
       xmlns:gls="urn:oasis:names:tc:xliff:glossary:2.0"
       xmlns:ctr="urn:oasis:names:tc:xliff:changetracking:2.0"
       xmlns:my="urn:example:tool"
       version="2.0" srcLang="en-US" trgLang="fr-FR" my:build="42">
  <file id="f1" original="app/strings.json" translate="no" xml:space="preserve">
    <skeleton href="skeleton.skl"/>
    <mda:metadata>
      <mda:metaGroup category="tool">
        <mda:meta type="name">converter</mda:meta>
      </mda:metaGroup>
    </mda:metadata>
    <my:settings mode="strict">
      <my:flag>on</my:flag>
    </my:settings>
    <notes>
      <note id="n1" priority="2" appliesTo="source">File level note</note>
    </notes>
    <group id="g1" name="menus" translate="yes">
      <unit id="u1" name="open">
        <gls:glossary>
          <gls:glossEntry id="ge1">
            <gls:term source="company">file</gls:term>
            <gls:translation id="t1">fichier</gls:translation>
            <gls:definition>A stored document.</gls:definition>
          </gls:glossEntry>
        </gls:glossary>
        <ctr:changeTrack>
          <ctr:revisions appliesTo="target" currentVersion="r2">
            <ctr:revision author="pat" datetime="2024-03-01T09:30:00Z" version="r1">
              <ctr:item property="content">Ouvrir</ctr:item>
            </ctr:revision>
          </ctr:revisions>
        </ctr:changeTrack>
        <originalData>
          <data id="d1">&lt;b&gt;</data>
          <data id="d2">&lt;/b&gt;</data>
        </originalData>
        <segment id="s1" state="translated">
          <source>Open <pc id="1" dataRefStart="d1" dataRefEnd="d2">the</pc> file</source>
          <target>Ouvrir <pc id="1" dataRefStart="d1" dataRefEnd="d2">le</pc> fichier</target>
        </segment>
        <ignorable><source> </source></ignorable>
        <segment id="s2"><source>Line<ph id="2"/><cp hex="0009"/>end</source></segment>
      </unit>
      <unit id="u2" xml:space="default">
        <segment state="reviewed" subState="my:checked">
          <source>Save <sc id="3" type="fmt"/>now<ec startRef="3"/><![CDATA[ <raw> ]]><!-- kept --></source>
          <target>Enregistrer <sc id="3" type="fmt"/>maintenant<ec startRef="3"/></target>
        </segment>
      </unit>
    </group>
    <unit id="u3">
      <segment><source>Hi <mrk id="m1" translate="no" type="term">there</mrk><sm id="m2" type="comment"/>x<em startRef="m2"/></source></segment>
    </unit>
  </file>
</xliff>
"#;

/// Wraps a body in an `xliff` root declaring the core namespace.
pub fn xliff(attributes: &str, body: &str) -> String {
    format!(
        r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" {}>{}</xliff>"#,
        attributes, body
    )
}

/// Wraps units in a single file of a document with `srcLang="en"`.
pub fn with_units(units: &str) -> String {
    xliff(r#"srcLang="en" trgLang="de""#, &format!(r#"<file id="f1">{}</file>"#, units))
}

pub fn read(xml: &str) -> Result<Document> {
    Reader::new(ReaderSettings::default()).deserialize_str(xml)
}

pub fn read_with(settings: ReaderSettings, xml: &str) -> Result<Document> {
    Reader::new(settings).deserialize_str(xml)
}

pub fn write(document: &Document, detail: OutputDetail) -> Result<String> {
    Writer::new(WriterSettings::default().with_detail(detail)).serialize_to_string(document)
}

/// Compact output without declaration or indentation, for string assertions.
pub fn write_compact(document: &Document, detail: OutputDetail) -> Result<String> {
    Writer::new(
        WriterSettings::default()
            .with_detail(detail)
            .with_indent(false)
            .with_declaration(false),
    )
    .serialize_to_string(document)
}

pub fn all_of_kind(document: &Document, kind: NodeKind) -> Vec<NodeId> {
    document
        .descendants(document.document_node())
        .into_iter()
        .filter(|n| document.kind(*n) == kind)
        .collect()
}

pub fn first(document: &Document, kind: NodeKind) -> NodeId {
    all_of_kind(document, kind)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("no {} in document", kind))
}

pub fn by_id(document: &Document, kind: NodeKind, id: &str) -> NodeId {
    all_of_kind(document, kind)
        .into_iter()
        .find(|n| document.id(*n) == Some(id))
        .unwrap_or_else(|| panic!("no {} with id '{}'", kind, id))
}

pub fn str_attr(document: &Document, node: NodeId, name: &str) -> Option<String> {
    document
        .get_attribute(node, name)
        .map(|value| value.to_string())
}

/// Asserts that two documents have the same shape, text, extension content
/// and effective attribute values.
pub fn assert_equivalent(left: &Document, right: &Document) {
    let left_nodes = left.descendants(left.document_node());
    let right_nodes = right.descendants(right.document_node());
    assert_eq!(
        left_nodes.len(),
        right_nodes.len(),
        "documents have different node counts"
    );
    for (l, r) in left_nodes.into_iter().zip(right_nodes) {
        let kind = left.kind(l);
        assert_eq!(kind, right.kind(r), "node kinds differ");
        assert_eq!(
            left.children(l).count(),
            right.children(r).count(),
            "{} has a different number of children",
            kind
        );
        assert_eq!(left.text(l), right.text(r), "{} text differs", kind);
        assert_eq!(
            left.extensions(l),
            right.extensions(r),
            "{} extension content differs",
            kind
        );
        for descriptor in Registry::resolve(kind).descriptor.attributes {
            assert_eq!(
                left.effective_value(l, descriptor.name),
                right.effective_value(r, descriptor.name),
                "effective value of {}@{} differs",
                kind,
                descriptor.name
            );
        }
    }
}
