//! Structural elements of the core vocabulary.

use super::inline::{DATA_CHILDREN, INLINE_CHILDREN};
use super::module::{change_track_child, glossary_child, metadata_child};
use super::{APPLIES_TO, DIRECTIONS, SPACE, STATES};
use crate::metadata::descriptor::{
    AttributeDescriptor as A, ChildDescriptor as C, ContentModel, Inheritance, NodeDescriptor,
    Slot, SlotDescriptor as S,
};
use crate::names::WireName;
use crate::node::NodeKind;
use crate::value::AttributeType as T;

/// The only value `data/@xml:space` may take.
pub const DATA_SPACE: &str = "preserve";

/// Returns the schema-fixed value of an attribute, if it has one.
///
/// Only `xml:space` on `data` is fixed.
pub fn fixed_value(kind: NodeKind, attribute: &str) -> Option<&'static str> {
    match (kind, attribute) {
        (NodeKind::Data, "space") => Some(DATA_SPACE),
        _ => None,
    }
}

const ID: A = A::new("id", T::Identifier);
const REQUIRED_ID: A = ID.required();
const CAN_RESEGMENT: A = A::new("canResegment", T::Bool)
    .default_value("yes")
    .inherit(Inheritance::FromParent);
const TRANSLATE: A = A::new("translate", T::Bool)
    .default_value("yes")
    .inherit(Inheritance::FromParent);
const SRC_DIR: A = A::new("srcDir", T::Enum(DIRECTIONS))
    .default_value("auto")
    .inherit(Inheritance::FromParent);
const TRG_DIR: A = A::new("trgDir", T::Enum(DIRECTIONS))
    .default_value("auto")
    .inherit(Inheritance::FromParent);
const XML_SPACE: A = A::xml("space", "space", T::Enum(SPACE))
    .default_value("default")
    .inherit(Inheritance::FromParent);
const CONTENT_SPACE: A = A::xml("space", "space", T::Enum(SPACE))
    .default_value("default")
    .inherit(Inheritance::FromAncestor {
        kind: NodeKind::Unit,
        attribute: "space",
    });

const fn wire(local: &'static str) -> WireName {
    WireName::core(local)
}

pub static DOCUMENT: NodeDescriptor = NodeDescriptor {
    children: &[C::new(wire("xliff"), NodeKind::Xliff, 1, Slot::Root)],
    slots: &[S::one(Slot::Root)],
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::Document, WireName::synthetic("#document"))
};

pub static XLIFF: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Xliff,
    wire: wire("xliff"),
    attributes: &[
        A::new("version", T::String).required(),
        A::new("srcLang", T::Language).required(),
        A::new("trgLang", T::Language),
        A::xml("space", "space", T::Enum(SPACE)).default_value("default"),
    ],
    children: &[C::new(wire("file"), NodeKind::File, 1, Slot::Files)],
    slots: &[S::many(Slot::Files)],
    content: ContentModel::Elements,
    extension_ordinal: None,
    extension_attributes: true,
};

pub static FILE: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::File,
    wire: wire("file"),
    attributes: &[
        REQUIRED_ID,
        CAN_RESEGMENT,
        A::new("original", T::Iri),
        TRANSLATE,
        SRC_DIR,
        TRG_DIR,
        XML_SPACE,
    ],
    children: &[
        C::new(wire("skeleton"), NodeKind::Skeleton, 1, Slot::Skeleton),
        metadata_child(2),
        change_track_child(2),
        C::new(wire("notes"), NodeKind::Notes, 3, Slot::Notes),
        C::new(wire("group"), NodeKind::Group, 4, Slot::Containers),
        C::new(wire("unit"), NodeKind::Unit, 4, Slot::Containers),
    ],
    slots: &[
        S::one(Slot::Skeleton),
        S::one(Slot::Metadata),
        S::one(Slot::ChangeTrack),
        S::one(Slot::Notes),
        S::many(Slot::Containers).required(),
    ],
    content: ContentModel::Elements,
    extension_ordinal: Some(2),
    extension_attributes: true,
};

pub static SKELETON: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("href", T::Iri)],
    content: ContentModel::Text { ordinal: 1 },
    extension_ordinal: Some(1),
    ..NodeDescriptor::leaf(NodeKind::Skeleton, wire("skeleton"))
};

pub static GROUP: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Group,
    wire: wire("group"),
    attributes: &[
        REQUIRED_ID,
        A::new("name", T::String),
        CAN_RESEGMENT,
        TRANSLATE,
        SRC_DIR,
        TRG_DIR,
        A::new("type", T::String),
        XML_SPACE,
    ],
    children: &[
        metadata_child(1),
        change_track_child(1),
        C::new(wire("notes"), NodeKind::Notes, 2, Slot::Notes),
        C::new(wire("group"), NodeKind::Group, 3, Slot::Containers),
        C::new(wire("unit"), NodeKind::Unit, 3, Slot::Containers),
    ],
    slots: &[
        S::one(Slot::Metadata),
        S::one(Slot::ChangeTrack),
        S::one(Slot::Notes),
        S::many(Slot::Containers),
    ],
    content: ContentModel::Elements,
    extension_ordinal: Some(1),
    extension_attributes: true,
};

pub static UNIT: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Unit,
    wire: wire("unit"),
    attributes: &[
        REQUIRED_ID,
        A::new("name", T::String),
        CAN_RESEGMENT,
        TRANSLATE,
        SRC_DIR,
        TRG_DIR,
        A::new("type", T::String),
        XML_SPACE,
    ],
    children: &[
        metadata_child(1),
        glossary_child(1),
        change_track_child(1),
        C::new(wire("notes"), NodeKind::Notes, 2, Slot::Notes),
        C::new(wire("originalData"), NodeKind::OriginalData, 3, Slot::OriginalData),
        C::new(wire("segment"), NodeKind::Segment, 4, Slot::Subunits),
        C::new(wire("ignorable"), NodeKind::Ignorable, 4, Slot::Subunits),
    ],
    slots: &[
        S::one(Slot::Metadata),
        S::one(Slot::Glossary),
        S::one(Slot::ChangeTrack),
        S::one(Slot::Notes),
        S::one(Slot::OriginalData),
        S::many(Slot::Subunits).required(),
    ],
    content: ContentModel::Elements,
    extension_ordinal: Some(1),
    extension_attributes: true,
};

const SUBUNIT_CHILDREN: &[C] = &[
    C::new(wire("source"), NodeKind::Source, 1, Slot::Source),
    C::new(wire("target"), NodeKind::Target, 2, Slot::Target),
];

const SUBUNIT_SLOTS: &[S] = &[S::one(Slot::Source).required(), S::one(Slot::Target)];

pub static SEGMENT: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Segment,
    wire: wire("segment"),
    attributes: &[
        ID,
        CAN_RESEGMENT,
        A::new("state", T::Enum(STATES))
            .default_value("initial")
            .dependents(&["subState"]),
        A::new("subState", T::String),
    ],
    children: SUBUNIT_CHILDREN,
    slots: SUBUNIT_SLOTS,
    content: ContentModel::Elements,
    extension_ordinal: None,
    extension_attributes: false,
};

pub static IGNORABLE: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Ignorable,
    wire: wire("ignorable"),
    attributes: &[ID],
    children: SUBUNIT_CHILDREN,
    slots: SUBUNIT_SLOTS,
    content: ContentModel::Elements,
    extension_ordinal: None,
    extension_attributes: false,
};

pub static NOTES: NodeDescriptor = NodeDescriptor {
    children: &[C::new(wire("note"), NodeKind::Note, 1, Slot::Items)],
    slots: &[S::many(Slot::Items).required()],
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::Notes, wire("notes"))
};

pub static NOTE: NodeDescriptor = NodeDescriptor {
    attributes: &[
        ID,
        A::new("appliesTo", T::Enum(APPLIES_TO)),
        A::new("category", T::String),
        A::new("priority", T::Integer { min: 1, max: 10 }).default_value("1"),
    ],
    content: ContentModel::Text { ordinal: 1 },
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::Note, wire("note"))
};

pub static ORIGINAL_DATA: NodeDescriptor = NodeDescriptor {
    children: &[C::new(wire("data"), NodeKind::Data, 1, Slot::Items)],
    slots: &[S::many(Slot::Items).required()],
    content: ContentModel::Elements,
    ..NodeDescriptor::leaf(NodeKind::OriginalData, wire("originalData"))
};

pub static DATA: NodeDescriptor = NodeDescriptor {
    attributes: &[
        REQUIRED_ID,
        A::new("dir", T::Enum(DIRECTIONS)).default_value("auto"),
        A::xml("space", "space", T::Enum(SPACE)).default_value(DATA_SPACE),
    ],
    children: DATA_CHILDREN,
    slots: &[S::many(Slot::Content)],
    content: ContentModel::Mixed { ordinal: 1 },
    ..NodeDescriptor::leaf(NodeKind::Data, wire("data"))
};

pub static SOURCE: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::xml("lang", "lang", T::Language).inherit(Inheritance::FromAncestor {
            kind: NodeKind::Xliff,
            attribute: "srcLang",
        }),
        CONTENT_SPACE,
    ],
    children: INLINE_CHILDREN,
    slots: &[S::many(Slot::Content)],
    content: ContentModel::Mixed { ordinal: 1 },
    ..NodeDescriptor::leaf(NodeKind::Source, wire("source"))
};

pub static TARGET: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::xml("lang", "lang", T::Language).inherit(Inheritance::FromAncestor {
            kind: NodeKind::Xliff,
            attribute: "trgLang",
        }),
        CONTENT_SPACE,
        A::new("order", T::Integer {
            min: 1,
            max: i64::MAX,
        }),
    ],
    children: INLINE_CHILDREN,
    slots: &[S::many(Slot::Content)],
    content: ContentModel::Mixed { ordinal: 1 },
    ..NodeDescriptor::leaf(NodeKind::Target, wire("target"))
};
