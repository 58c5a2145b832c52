//! Inline codes and annotation markers.
//!
//! `pc` and `mrk` carry mixed content; every other inline element is empty.

use super::{CAN_REORDER, CODE_TYPES, DIRECTIONS};
use crate::metadata::descriptor::{
    AttributeDescriptor as A, ChildDescriptor as C, ContentModel, Inheritance, NodeDescriptor,
    Slot, SlotDescriptor as S,
};
use crate::names::WireName;
use crate::node::NodeKind;
use crate::node::inheritance::{
    code_direction, end_code_requires_id, end_code_requires_start_ref, marker_translate,
};
use crate::value::AttributeType as T;

const fn wire(local: &'static str) -> WireName {
    WireName::core(local)
}

/// Children accepted by `source`, `target`, `pc` and `mrk`.
pub const INLINE_CHILDREN: &[C] = &[
    C::new(wire("cp"), NodeKind::CodePoint, 1, Slot::Content),
    C::new(wire("ph"), NodeKind::Placeholder, 1, Slot::Content),
    C::new(wire("pc"), NodeKind::SpanningCode, 1, Slot::Content),
    C::new(wire("sc"), NodeKind::StartCode, 1, Slot::Content),
    C::new(wire("ec"), NodeKind::EndCode, 1, Slot::Content),
    C::new(wire("mrk"), NodeKind::Marker, 1, Slot::Content),
    C::new(wire("sm"), NodeKind::StartMarker, 1, Slot::Content),
    C::new(wire("em"), NodeKind::EndMarker, 1, Slot::Content),
];

/// Children accepted by `data`.
pub const DATA_CHILDREN: &[C] = &[C::new(wire("cp"), NodeKind::CodePoint, 1, Slot::Content)];

const MIXED_SLOTS: &[S] = &[S::many(Slot::Content)];

const ID: A = A::new("id", T::Identifier).required();
const CAN_COPY: A = A::new("canCopy", T::Bool).default_value("yes");
const CAN_DELETE: A = A::new("canDelete", T::Bool).default_value("yes");
const CAN_REORDER_ATTR: A = A::new("canReorder", T::Enum(CAN_REORDER)).default_value("yes");
const COPY_OF: A = A::new("copyOf", T::Identifier);
const SUB_TYPE: A = A::new("subType", T::String);
const TYPE: A = A::new("type", T::Enum(CODE_TYPES)).dependents(&["subType"]);
const DIR: A = A::new("dir", T::Enum(DIRECTIONS)).inherit(Inheritance::Callback(code_direction));
const ISOLATED: A = A::new("isolated", T::Bool).default_value("no");
const DATA_REF: A = A::new("dataRef", T::Identifier);
const DISP: A = A::new("disp", T::String);
const EQUIV: A = A::new("equiv", T::String).default_value("");
const SUB_FLOWS: A = A::new("subFlows", T::String);

const MARKER_TRANSLATE: A =
    A::new("translate", T::Bool).inherit(Inheritance::Callback(marker_translate));
const MARKER_TYPE: A = A::new("type", T::String).default_value("generic");

pub static CODE_POINT: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("hex", T::HexCodePoint).required()],
    ..NodeDescriptor::leaf(NodeKind::CodePoint, wire("cp"))
};

pub static PLACEHOLDER: NodeDescriptor = NodeDescriptor {
    attributes: &[
        ID,
        CAN_COPY,
        CAN_DELETE,
        CAN_REORDER_ATTR,
        COPY_OF,
        DATA_REF,
        DISP,
        EQUIV,
        SUB_FLOWS,
        TYPE,
        SUB_TYPE,
    ],
    ..NodeDescriptor::leaf(NodeKind::Placeholder, wire("ph"))
};

pub static SPANNING_CODE: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::SpanningCode,
    wire: wire("pc"),
    attributes: &[
        ID,
        CAN_COPY,
        CAN_DELETE,
        A::new("canOverlap", T::Bool).default_value("no"),
        CAN_REORDER_ATTR,
        COPY_OF,
        A::new("dataRefStart", T::Identifier),
        A::new("dataRefEnd", T::Identifier),
        DIR,
        A::new("dispStart", T::String),
        A::new("dispEnd", T::String),
        A::new("equivStart", T::String).default_value(""),
        A::new("equivEnd", T::String).default_value(""),
        A::new("subFlowsStart", T::String),
        A::new("subFlowsEnd", T::String),
        TYPE,
        SUB_TYPE,
    ],
    children: INLINE_CHILDREN,
    slots: MIXED_SLOTS,
    content: ContentModel::Mixed { ordinal: 1 },
    extension_ordinal: None,
    extension_attributes: false,
};

pub static START_CODE: NodeDescriptor = NodeDescriptor {
    attributes: &[
        ID,
        CAN_COPY,
        CAN_DELETE,
        A::new("canOverlap", T::Bool).default_value("yes"),
        CAN_REORDER_ATTR,
        COPY_OF,
        DATA_REF,
        DIR,
        DISP,
        EQUIV,
        ISOLATED,
        SUB_FLOWS,
        TYPE,
        SUB_TYPE,
    ],
    ..NodeDescriptor::leaf(NodeKind::StartCode, wire("sc"))
};

pub static END_CODE: NodeDescriptor = NodeDescriptor {
    attributes: &[
        A::new("id", T::Identifier).resolver(end_code_requires_id),
        CAN_COPY,
        CAN_DELETE,
        A::new("canOverlap", T::Bool).default_value("yes"),
        CAN_REORDER_ATTR,
        COPY_OF,
        DATA_REF,
        DIR,
        DISP,
        EQUIV,
        ISOLATED,
        A::new("startRef", T::Identifier).resolver(end_code_requires_start_ref),
        SUB_FLOWS,
        TYPE,
        SUB_TYPE,
    ],
    ..NodeDescriptor::leaf(NodeKind::EndCode, wire("ec"))
};

pub static MARKER: NodeDescriptor = NodeDescriptor {
    kind: NodeKind::Marker,
    wire: wire("mrk"),
    attributes: &[
        ID,
        MARKER_TRANSLATE,
        MARKER_TYPE,
        A::new("ref", T::Iri),
        A::new("value", T::String),
    ],
    children: INLINE_CHILDREN,
    slots: MIXED_SLOTS,
    content: ContentModel::Mixed { ordinal: 1 },
    extension_ordinal: None,
    extension_attributes: true,
};

pub static START_MARKER: NodeDescriptor = NodeDescriptor {
    attributes: &[
        ID,
        MARKER_TRANSLATE,
        MARKER_TYPE,
        A::new("ref", T::Iri),
        A::new("value", T::String),
    ],
    extension_attributes: true,
    ..NodeDescriptor::leaf(NodeKind::StartMarker, wire("sm"))
};

pub static END_MARKER: NodeDescriptor = NodeDescriptor {
    attributes: &[A::new("startRef", T::Identifier).required()],
    ..NodeDescriptor::leaf(NodeKind::EndMarker, wire("em"))
};
