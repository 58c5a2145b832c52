//! Metadata (`mda`), Glossary (`gls`) and Change Tracking (`ctr`) modules.

use crate::metadata::descriptor::{
    AttributeDescriptor as A, ChildDescriptor as C, ContentModel, NodeDescriptor, Slot,
    SlotDescriptor as S,
};
use crate::names::{CHANGE_TRACKING_NAMESPACE, GLOSSARY_NAMESPACE, METADATA_NAMESPACE, WireName};
use crate::node::NodeKind;
use crate::value::AttributeType as T;

const fn mda(local: &'static str) -> WireName {
    WireName::module("mda", METADATA_NAMESPACE, local)
}

const fn gls(local: &'static str) -> WireName {
    WireName::module("gls", GLOSSARY_NAMESPACE, local)
}

const fn ctr(local: &'static str) -> WireName {
    WireName::module("ctr", CHANGE_TRACKING_NAMESPACE, local)
}

/// `mda:metadata` as a child of a core structural element.
pub const fn metadata_child(ordinal: u8) -> C {
    C::new(mda("metadata"), NodeKind::Metadata, ordinal, Slot::Metadata)
}

/// `gls:glossary` as a child of `unit`.
pub const fn glossary_child(ordinal: u8) -> C {
    C::new(gls("glossary"), NodeKind::Glossary, ordinal, Slot::Glossary)
}

/// `ctr:changeTrack` as a child of a core structural element.
pub const fn change_track_child(ordinal: u8) -> C {
    C::new(ctr("changeTrack"), NodeKind::ChangeTrack, ordinal, Slot::ChangeTrack)
}

const REQUIRED_ITEMS: &[S] = &[S::many(Slot::Items).required()];

pub static METADATA: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("id", T::Identifier)],
    children: &[C::new(mda("metaGroup"), NodeKind::MetaGroup, 1, Slot::Items)],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::Metadata, mda("metadata"))
};

pub static META_GROUP: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::new("id", T::Identifier),
        A::new("category", T::String),
        A::new("appliesTo", T::Enum(&["source", "target", "ignorable"])),
    ],
    children: &[
        C::new(mda("metaGroup"), NodeKind::MetaGroup, 1, Slot::Items),
        C::new(mda("meta"), NodeKind::Meta, 1, Slot::Items),
    ],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::MetaGroup, mda("metaGroup"))
};

pub static META: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("type", T::String).required()],
    content: ContentModel::Text { ordinal: 1 },
    ..NodeDescriptor::leaf(NodeKind::Meta, mda("meta"))
};

pub static GLOSSARY: NodeDescriptor = NodeDescriptor {
    children: &[C::new(gls("glossEntry"), NodeKind::GlossEntry, 1, Slot::Items)],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::Glossary, gls("glossary"))
};

pub static GLOSS_ENTRY: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::GlossEntry,
    wire: gls("glossEntry"),
    attributes: &[A::new("id", T::Identifier), A::new("ref", T::Iri)],
    children: &[
        C::new(gls("term"), NodeKind::Term, 1, Slot::Term),
        C::new(gls("translation"), NodeKind::Translation, 2, Slot::Translations),
        C::new(gls("definition"), NodeKind::Definition, 3, Slot::Definition),
    ],
    slots: &[
        S::one(Slot::Term).required(),
        S::many(Slot::Translations),
        S::one(Slot::Definition),
    ],
    content: ContentModel::Elements,
    extension_ordinal: Some(4),
    extension_attributes: true,
};

pub static TERM: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("source", T::String)],
    content: ContentModel::Text { ordinal: 1 },
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Term, gls("term"))
};

pub static TRANSLATION: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::new("id", T::Identifier),
        A::new("ref", T::Iri),
        A::new("source", T::String),
    ],
    content: ContentModel::Text { ordinal: 1 },
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Translation, gls("translation"))
};

pub static DEFINITION: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("source", T::String)],
    content: ContentModel::Text { ordinal: 1 },
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Definition, gls("definition"))
};

pub static CHANGE_TRACK: NodeDescriptor = NodeDescriptor {
    children: &[C::new(ctr("revisions"), NodeKind::Revisions, 1, Slot::Items)],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::ChangeTrack, ctr("changeTrack"))
};

pub static REVISIONS: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::new("appliesTo", T::String).required(),
        A::new("ref", T::Identifier),
        A::new("currentVersion", T::Identifier),
    ],
    children: &[C::new(ctr("revision"), NodeKind::Revision, 1, Slot::Items)],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Revisions, ctr("revisions"))
};

pub static REVISION: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::new("author", T::String),
        A::new("datetime", T::DateTime),
        A::new("version", T::Identifier),
    ],
    children: &[C::new(ctr("item"), NodeKind::RevisionItem, 1, Slot::Items)],
    slots: REQUIRED_ITEMS,
    content: ContentModel::Elements,
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Revision, ctr("revision"))
};

pub static REVISION_ITEM: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("property", T::String).required()],
    content: ContentModel::Text { ordinal: 1 },
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::RevisionItem, ctr("item"))
};
