//! The document tree.
//!
//! Nodes live in an arena owned by [`Document`] and are addressed by
//! [`NodeId`] handles. Parent links are stored beside each node, so the
//! single-owner rule is a lookup rather than a reference-counting concern.

mod attributes;
mod document;
mod extension;
pub(crate) mod inheritance;

use std::fmt;

pub use attributes::AttributeSlot;
pub use document::Document;
pub use extension::{
    Extension, ExtensionAttribute, ExtensionBag, ExtensionContent, ExtensionElement,
    ExtensionItem,
};

use crate::metadata::catalog;

/// Handle to a node inside a [`Document`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    pub(crate) fn new(index: usize) -> Self {
        Self(index as u32)
    }

    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Every kind of node the model knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// The synthetic owner of the `xliff` root.
    Document,
    Xliff,
    File,
    Skeleton,
    Group,
    Unit,
    Segment,
    Ignorable,
    Notes,
    Note,
    OriginalData,
    Data,
    Source,
    Target,
    /// `cp`
    CodePoint,
    /// `ph`
    Placeholder,
    /// `pc`
    SpanningCode,
    /// `sc`
    StartCode,
    /// `ec`
    EndCode,
    /// `mrk`
    Marker,
    /// `sm`
    StartMarker,
    /// `em`
    EndMarker,
    /// `mda:metadata`
    Metadata,
    /// `mda:metaGroup`
    MetaGroup,
    /// `mda:meta`
    Meta,
    /// `gls:glossary`
    Glossary,
    /// `gls:glossEntry`
    GlossEntry,
    /// `gls:term`
    Term,
    /// `gls:translation`
    Translation,
    /// `gls:definition`
    Definition,
    /// `ctr:changeTrack`
    ChangeTrack,
    /// `ctr:revisions`
    Revisions,
    /// `ctr:revision`
    Revision,
    /// `ctr:item`
    RevisionItem,
    /// Character data inside mixed content.
    Text,
    /// A CDATA section inside mixed content.
    CData,
    /// A comment inside mixed content.
    Comment,
    /// A processing instruction inside mixed content.
    ProcessingInstruction,
}

impl NodeKind {
    /// Text, CDATA, comment and processing-instruction leaves.
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeKind::Text | NodeKind::CData | NodeKind::Comment | NodeKind::ProcessingInstruction
        )
    }

    /// Inline codes and markers.
    pub fn is_inline(self) -> bool {
        matches!(
            self,
            NodeKind::CodePoint
                | NodeKind::Placeholder
                | NodeKind::SpanningCode
                | NodeKind::StartCode
                | NodeKind::EndCode
                | NodeKind::Marker
                | NodeKind::StartMarker
                | NodeKind::EndMarker
        )
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(catalog::descriptor(*self).wire.local)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_display_uses_wire_name() {
        assert_eq!(NodeKind::Unit.to_string(), "unit");
        assert_eq!(NodeKind::SpanningCode.to_string(), "pc");
        assert_eq!(NodeKind::GlossEntry.to_string(), "glossEntry");
        assert_eq!(NodeKind::Text.to_string(), "#text");
    }

    #[test]
    fn test_kind_classes() {
        assert!(NodeKind::CData.is_character_data());
        assert!(!NodeKind::Note.is_character_data());
        assert!(NodeKind::EndMarker.is_inline());
        assert!(!NodeKind::Source.is_inline());
    }
}
