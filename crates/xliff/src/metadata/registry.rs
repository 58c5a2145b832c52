//! Process-wide metadata registry.
//!
//! [`TypeMetadata`] is derived once per node kind from the static catalog and
//! cached for the lifetime of the process. The cache is read-mostly: the
//! common path takes a shared lock, and a kind is only built under the write
//! lock when it has not been seen yet.

use std::collections::HashMap;
use std::sync::{Arc, LazyLock};

use parking_lot::RwLock;
use tracing::trace;

use super::catalog;
use super::descriptor::{AttributeDescriptor, ChildDescriptor, NodeDescriptor, Slot};
use crate::node::{Document, NodeId, NodeKind};

static CACHE: LazyLock<RwLock<HashMap<NodeKind, Arc<TypeMetadata>>>> =
    LazyLock::new(|| RwLock::new(HashMap::new()));

/// Element kinds keyed by local name, then namespace.
static KINDS_BY_WIRE: LazyLock<HashMap<&'static str, Vec<(Option<&'static str>, NodeKind)>>> =
    LazyLock::new(|| {
        let mut map: HashMap<&'static str, Vec<(Option<&'static str>, NodeKind)>> =
            HashMap::new();
        for descriptor in catalog::ELEMENTS {
            map.entry(descriptor.wire.local)
                .or_default()
                .push((descriptor.wire.namespace, descriptor.kind));
        }
        map
    });

/// One group of the declared output order.
#[derive(Debug, Clone)]
pub struct OutputGroup {
    pub ordinal: u8,
    /// Indices into the descriptor's slot list, in declaration order.
    pub slots: Vec<usize>,
    /// Plain text is written in this group.
    pub text: bool,
    /// Extension elements are written in this group.
    pub extensions: bool,
}

/// Lookup tables derived from a [`NodeDescriptor`].
#[derive(Debug)]
pub struct TypeMetadata {
    pub descriptor: &'static NodeDescriptor,
    by_name: HashMap<&'static str, &'static AttributeDescriptor>,
    by_wire: HashMap<&'static str, Vec<(Option<&'static str>, &'static AttributeDescriptor)>>,
    children: HashMap<&'static str, Vec<(Option<&'static str>, &'static ChildDescriptor)>>,
    output: Vec<OutputGroup>,
}

impl TypeMetadata {
    fn build(descriptor: &'static NodeDescriptor) -> Self {
        let mut by_name = HashMap::new();
        let mut by_wire: HashMap<_, Vec<_>> = HashMap::new();
        for attribute in descriptor.attributes {
            assert!(
                by_name.insert(attribute.name, attribute).is_none(),
                "{} declares attribute '{}' twice",
                descriptor.kind,
                attribute.name
            );
            if let Some(raw) = attribute.default {
                assert!(
                    attribute.ty.parse(raw).is_ok(),
                    "default '{}' of {}@{} does not convert",
                    raw,
                    descriptor.kind,
                    attribute.name
                );
            }
            by_wire
                .entry(attribute.wire.local)
                .or_default()
                .push((attribute.wire.namespace, attribute));
        }
        for attribute in descriptor.attributes {
            for dependent in attribute.dependents {
                assert!(
                    by_name.contains_key(dependent),
                    "{}@{} names unknown dependent '{}'",
                    descriptor.kind,
                    attribute.name,
                    dependent
                );
            }
        }

        let mut children: HashMap<&'static str, Vec<(Option<&'static str>, &'static ChildDescriptor)>> =
            HashMap::new();
        let mut slot_ordinals: Vec<Option<u8>> = vec![None; descriptor.slots.len()];
        for child in descriptor.children {
            let entry = children.entry(child.wire.local).or_default();
            if let Some((_, existing)) = entry.iter().find(|(ns, _)| *ns == child.wire.namespace) {
                assert_eq!(
                    existing.ordinal, child.ordinal,
                    "{} declares <{}> with inconsistent ordinals",
                    descriptor.kind, child.wire
                );
                continue;
            }
            entry.push((child.wire.namespace, child));

            let index = descriptor.slot_index(child.slot).unwrap_or_else(|| {
                panic!("{} maps <{}> to undeclared slot {}", descriptor.kind, child.wire, child.slot)
            });
            match slot_ordinals[index] {
                Some(ordinal) => assert_eq!(
                    ordinal, child.ordinal,
                    "{} slot {} mixes ordinal groups",
                    descriptor.kind, child.slot
                ),
                None => slot_ordinals[index] = Some(child.ordinal),
            }
        }

        let text_ordinal = descriptor.content.text_ordinal();
        let slot_ordinals: Vec<u8> = slot_ordinals
            .into_iter()
            .zip(descriptor.slots)
            .map(|(ordinal, slot)| match (ordinal, slot.slot) {
                (Some(ordinal), _) => ordinal,
                // Mixed content owns its slot even without inline children.
                (None, Slot::Content) => text_ordinal.unwrap_or(1),
                (None, other) => panic!("{} declares slot {} with no children", descriptor.kind, other),
            })
            .collect();

        let mut ordinals: Vec<u8> = slot_ordinals.clone();
        ordinals.extend(text_ordinal);
        ordinals.extend(descriptor.extension_ordinal);
        ordinals.sort_unstable();
        ordinals.dedup();

        let output = ordinals
            .into_iter()
            .map(|ordinal| OutputGroup {
                ordinal,
                slots: (0..descriptor.slots.len())
                    .filter(|i| slot_ordinals[*i] == ordinal)
                    .collect(),
                text: !descriptor.content.is_mixed() && text_ordinal == Some(ordinal),
                extensions: descriptor.extension_ordinal == Some(ordinal),
            })
            .collect();

        Self {
            descriptor,
            by_name,
            by_wire,
            children,
            output,
        }
    }

    pub fn kind(&self) -> NodeKind {
        self.descriptor.kind
    }

    /// Attribute descriptor by object model name.
    pub fn attribute(&self, name: &str) -> Option<&'static AttributeDescriptor> {
        self.by_name.get(name).copied()
    }

    /// Attribute descriptor by wire name.
    pub fn attribute_by_wire(
        &self,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<&'static AttributeDescriptor> {
        self.by_wire
            .get(local)?
            .iter()
            .find(|(_, attribute)| attribute.wire.matches(namespace, local))
            .map(|(_, attribute)| *attribute)
    }

    /// Child descriptor by wire name.
    pub fn child(&self, namespace: Option<&str>, local: &str) -> Option<&'static ChildDescriptor> {
        self.children
            .get(local)?
            .iter()
            .find(|(_, child)| child.wire.matches(namespace, local))
            .map(|(_, child)| *child)
    }

    /// Declared output order, ascending by ordinal.
    pub fn output_order(&self) -> &[OutputGroup] {
        &self.output
    }
}

/// Entry point to the process-wide metadata cache.
pub struct Registry;

impl Registry {
    /// Returns the metadata of `kind`, building it on first use.
    pub fn resolve(kind: NodeKind) -> Arc<TypeMetadata> {
        if let Some(metadata) = CACHE.read().get(&kind) {
            return Arc::clone(metadata);
        }
        let mut cache = CACHE.write();
        Arc::clone(cache.entry(kind).or_insert_with(|| {
            trace!(%kind, "building type metadata");
            Arc::new(TypeMetadata::build(catalog::descriptor(kind)))
        }))
    }

    /// Maps a wire name to an element kind.
    pub fn lookup_kind(namespace: Option<&str>, local: &str) -> Option<NodeKind> {
        KINDS_BY_WIRE
            .get(local)?
            .iter()
            .find(|(ns, _)| ns.filter(|ns| !ns.is_empty()) == namespace.filter(|ns| !ns.is_empty()))
            .map(|(_, kind)| *kind)
    }

    /// Creates a default node for a wire name. `None` is not an error; the
    /// caller decides between a format error and extension handling.
    pub fn create_element(
        document: &mut Document,
        namespace: Option<&str>,
        local: &str,
    ) -> Option<NodeId> {
        Self::lookup_kind(namespace, local).map(|kind| document.create(kind))
    }
}
