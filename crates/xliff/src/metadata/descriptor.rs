//! Static descriptor types.
//!
//! Every node kind is described by one [`NodeDescriptor`] living in a
//! `static` table. Descriptors are plain data: the registry derives its
//! lookup tables from them, the reader uses them to accept input and the
//! writer uses them to order and filter output.

use std::fmt;

use crate::names::WireName;
use crate::node::{Document, NodeId, NodeKind};
use crate::value::{AttributeType, AttributeValue};

/// Computes an effective value for nodes whose inheritance is not a plain lookup.
pub type InheritCallback = fn(&Document, NodeId) -> Option<AttributeValue>;

/// Decides at runtime whether an attribute is required given its siblings.
pub type OutputResolver = fn(&Document, NodeId) -> bool;

/// How an unset attribute obtains its effective value.
#[derive(Debug, Clone, Copy)]
pub enum Inheritance {
    /// No inheritance; the default (if any) applies.
    None,
    /// The same-named attribute of the immediate parent.
    FromParent,
    /// The named attribute of the nearest ancestor of the given kind.
    FromAncestor {
        kind: NodeKind,
        attribute: &'static str,
    },
    /// The node computes the value itself.
    Callback(InheritCallback),
}

/// Static description of one attribute of a node kind.
#[derive(Debug, Clone, Copy)]
pub struct AttributeDescriptor {
    /// Name used by the object model API (`"space"` for `xml:space`).
    pub name: &'static str,
    /// Name on the wire.
    pub wire: WireName,
    /// Converter between wire strings and typed values.
    pub ty: AttributeType,
    /// Statically required.
    pub required: bool,
    /// Schema default in wire form.
    pub default: Option<&'static str>,
    /// Inheritance specification.
    pub inheritance: Inheritance,
    /// Attributes that, when written, force this one to be written as well.
    pub dependents: &'static [&'static str],
    /// Optional runtime check that can make this attribute required.
    pub output_resolver: Option<OutputResolver>,
}

impl AttributeDescriptor {
    /// An optional, unqualified attribute with no default.
    pub const fn new(name: &'static str, ty: AttributeType) -> Self {
        Self {
            name,
            wire: WireName::plain(name),
            ty,
            required: false,
            default: None,
            inheritance: Inheritance::None,
            dependents: &[],
            output_resolver: None,
        }
    }

    /// An attribute in the `xml` namespace, exposed under `name`.
    pub const fn xml(name: &'static str, local: &'static str, ty: AttributeType) -> Self {
        let mut descriptor = Self::new(name, ty);
        descriptor.wire = WireName::xml(local);
        descriptor
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub const fn default_value(mut self, value: &'static str) -> Self {
        self.default = Some(value);
        self
    }

    pub const fn inherit(mut self, inheritance: Inheritance) -> Self {
        self.inheritance = inheritance;
        self
    }

    pub const fn dependents(mut self, dependents: &'static [&'static str]) -> Self {
        self.dependents = dependents;
        self
    }

    pub const fn resolver(mut self, resolver: OutputResolver) -> Self {
        self.output_resolver = Some(resolver);
        self
    }

    /// The default converted to a typed value.
    pub fn default_typed(&self) -> Option<AttributeValue> {
        self.default.and_then(|raw| self.ty.parse(raw).ok())
    }

    /// Returns true if the attribute must be present on `node`.
    pub fn is_required(&self, document: &Document, node: NodeId) -> bool {
        self.required
            || self
                .output_resolver
                .is_some_and(|resolver| resolver(document, node))
    }
}

/// Typed child lists. Each node kind declares the subset it owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    /// The document node's `xliff` root.
    Root,
    /// `file` children of `xliff`.
    Files,
    Skeleton,
    /// `mda:metadata`.
    Metadata,
    /// `gls:glossary`.
    Glossary,
    /// `ctr:changeTrack`.
    ChangeTrack,
    Notes,
    /// `group` and `unit` children of `file` and `group`.
    Containers,
    OriginalData,
    /// `segment` and `ignorable` children of `unit`.
    Subunits,
    Source,
    Target,
    /// The repeated items of a container (`note`, `data`, `meta`, ...).
    Items,
    /// Mixed content: text leaves and inline codes.
    Content,
    Term,
    Translations,
    Definition,
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Slot::Root => "root",
            Slot::Files => "file",
            Slot::Skeleton => "skeleton",
            Slot::Metadata => "metadata",
            Slot::Glossary => "glossary",
            Slot::ChangeTrack => "changeTrack",
            Slot::Notes => "notes",
            Slot::Containers => "group/unit",
            Slot::OriginalData => "originalData",
            Slot::Subunits => "segment/ignorable",
            Slot::Source => "source",
            Slot::Target => "target",
            Slot::Items => "item",
            Slot::Content => "content",
            Slot::Term => "term",
            Slot::Translations => "translation",
            Slot::Definition => "definition",
        };
        f.write_str(name)
    }
}

/// A typed child list declared by a node kind.
#[derive(Debug, Clone, Copy)]
pub struct SlotDescriptor {
    pub slot: Slot,
    /// Holds at most one item.
    pub single: bool,
    /// Must hold at least one item once the node is complete.
    pub required: bool,
}

impl SlotDescriptor {
    pub const fn many(slot: Slot) -> Self {
        Self {
            slot,
            single: false,
            required: false,
        }
    }

    pub const fn one(slot: Slot) -> Self {
        Self {
            slot,
            single: true,
            required: false,
        }
    }

    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

/// A child element a node kind accepts.
#[derive(Debug, Clone, Copy)]
pub struct ChildDescriptor {
    pub wire: WireName,
    pub kind: NodeKind,
    /// Ordinal group; content must appear in non-decreasing group order.
    pub ordinal: u8,
    /// The list that stores it.
    pub slot: Slot,
}

impl ChildDescriptor {
    pub const fn new(wire: WireName, kind: NodeKind, ordinal: u8, slot: Slot) -> Self {
        Self {
            wire,
            kind,
            ordinal,
            slot,
        }
    }
}

/// What kind of character content a node accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentModel {
    /// Elements only; whitespace between them is insignificant.
    Elements,
    /// Text stored in the node itself, at the given ordinal.
    Text { ordinal: u8 },
    /// Text interleaved with inline elements, stored as leaf nodes in [`Slot::Content`].
    Mixed { ordinal: u8 },
    /// Nothing at all (leaf nodes).
    Empty,
}

impl ContentModel {
    /// The ordinal at which character data is accepted, if any.
    pub fn text_ordinal(&self) -> Option<u8> {
        match self {
            ContentModel::Text { ordinal } | ContentModel::Mixed { ordinal } => Some(*ordinal),
            _ => None,
        }
    }

    pub fn is_mixed(&self) -> bool {
        matches!(self, ContentModel::Mixed { .. })
    }
}

/// Static description of one node kind.
#[derive(Debug)]
pub struct NodeDescriptor {
    pub kind: NodeKind,
    pub wire: WireName,
    pub attributes: &'static [AttributeDescriptor],
    pub children: &'static [ChildDescriptor],
    pub slots: &'static [SlotDescriptor],
    pub content: ContentModel,
    /// Ordinal group of foreign elements; `None` rejects them.
    pub extension_ordinal: Option<u8>,
    /// Whether foreign attributes are accepted.
    pub extension_attributes: bool,
}

impl NodeDescriptor {
    /// A descriptor with no attributes, children or content.
    pub const fn leaf(kind: NodeKind, wire: WireName) -> Self {
        Self {
            kind,
            wire,
            attributes: &[],
            children: &[],
            slots: &[],
            content: ContentModel::Empty,
            extension_ordinal: None,
            extension_attributes: false,
        }
    }

    /// Index of `slot` within [`NodeDescriptor::slots`].
    pub fn slot_index(&self, slot: Slot) -> Option<usize> {
        self.slots.iter().position(|s| s.slot == slot)
    }

    /// The child descriptor storing `kind`, if any.
    pub fn child_for_kind(&self, kind: NodeKind) -> Option<&'static ChildDescriptor> {
        self.children.iter().find(|c| c.kind == kind)
    }
}
