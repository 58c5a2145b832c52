//! The static element catalog.
//!
//! One `static` [`NodeDescriptor`] per node kind. The catalog is pure data;
//! all derived lookups live in [`crate::metadata::Registry`].

pub mod structural;
pub mod inline;
pub mod module;

use super::descriptor::NodeDescriptor;
use crate::names::WireName;
use crate::node::NodeKind;

pub const DIRECTIONS: &[&str] = &["ltr", "rtl", "auto"];
pub const SPACE: &[&str] = &["default", "preserve"];
pub const STATES: &[&str] = &["initial", "translated", "reviewed", "final"];
pub const APPLIES_TO: &[&str] = &["source", "target"];
pub const CAN_REORDER: &[&str] = &["yes", "firstNo", "no"];
pub const CODE_TYPES: &[&str] = &["fmt", "ui", "quote", "link", "image", "other"];

static TEXT: NodeDescriptor = NodeDescriptor::leaf(NodeKind::Text, WireName::synthetic("#text"));
static CDATA: NodeDescriptor =
    NodeDescriptor::leaf(NodeKind::CData, WireName::synthetic("#cdata-section"));
static COMMENT: NodeDescriptor =
    NodeDescriptor::leaf(NodeKind::Comment, WireName::synthetic("#comment"));
static PROCESSING_INSTRUCTION: NodeDescriptor = NodeDescriptor::leaf(
    NodeKind::ProcessingInstruction,
    WireName::synthetic("#processing-instruction"),
);

/// Every element that can appear on the wire.
pub static ELEMENTS: &[&NodeDescriptor] = &[
    &structural::XLIFF,
    &structural::FILE,
    &structural::SKELETON,
    &structural::GROUP,
    &structural::UNIT,
    &structural::SEGMENT,
    &structural::IGNORABLE,
    &structural::NOTES,
    &structural::NOTE,
    &structural::ORIGINAL_DATA,
    &structural::DATA,
    &structural::SOURCE,
    &structural::TARGET,
    &inline::CODE_POINT,
    &inline::PLACEHOLDER,
    &inline::SPANNING_CODE,
    &inline::START_CODE,
    &inline::END_CODE,
    &inline::MARKER,
    &inline::START_MARKER,
    &inline::END_MARKER,
    &module::METADATA,
    &module::META_GROUP,
    &module::META,
    &module::GLOSSARY,
    &module::GLOSS_ENTRY,
    &module::TERM,
    &module::TRANSLATION,
    &module::DEFINITION,
    &module::CHANGE_TRACK,
    &module::REVISIONS,
    &module::REVISION,
    &module::REVISION_ITEM,
];

/// The descriptor of `kind`.
pub fn descriptor(kind: NodeKind) -> &'static NodeDescriptor {
    match kind {
        NodeKind::Document => &structural::DOCUMENT,
        NodeKind::Xliff => &structural::XLIFF,
        NodeKind::File => &structural::FILE,
        NodeKind::Skeleton => &structural::SKELETON,
        NodeKind::Group => &structural::GROUP,
        NodeKind::Unit => &structural::UNIT,
        NodeKind::Segment => &structural::SEGMENT,
        NodeKind::Ignorable => &structural::IGNORABLE,
        NodeKind::Notes => &structural::NOTES,
        NodeKind::Note => &structural::NOTE,
        NodeKind::OriginalData => &structural::ORIGINAL_DATA,
        NodeKind::Data => &structural::DATA,
        NodeKind::Source => &structural::SOURCE,
        NodeKind::Target => &structural::TARGET,
        NodeKind::CodePoint => &inline::CODE_POINT,
        NodeKind::Placeholder => &inline::PLACEHOLDER,
        NodeKind::SpanningCode => &inline::SPANNING_CODE,
        NodeKind::StartCode => &inline::START_CODE,
        NodeKind::EndCode => &inline::END_CODE,
        NodeKind::Marker => &inline::MARKER,
        NodeKind::StartMarker => &inline::START_MARKER,
        NodeKind::EndMarker => &inline::END_MARKER,
        NodeKind::Metadata => &module::METADATA,
        NodeKind::MetaGroup => &module::META_GROUP,
        NodeKind::Meta => &module::META,
        NodeKind::Glossary => &module::GLOSSARY,
        NodeKind::GlossEntry => &module::GLOSS_ENTRY,
        NodeKind::Term => &module::TERM,
        NodeKind::Translation => &module::TRANSLATION,
        NodeKind::Definition => &module::DEFINITION,
        NodeKind::ChangeTrack => &module::CHANGE_TRACK,
        NodeKind::Revisions => &module::REVISIONS,
        NodeKind::Revision => &module::REVISION,
        NodeKind::RevisionItem => &module::REVISION_ITEM,
        NodeKind::Text => &TEXT,
        NodeKind::CData => &CDATA,
        NodeKind::Comment => &COMMENT,
        NodeKind::ProcessingInstruction => &PROCESSING_INSTRUCTION,
    }
}
