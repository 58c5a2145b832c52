//! Attribute inheritance, explicit dependencies and runtime output resolvers.
//!
//! Resolution is read-only and lazy: it only runs when a node has no local
//! value, from [`Document::effective_value`] or from the writer's minimal
//! output comparison.

use super::document::Document;
use super::{NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::metadata::{AttributeDescriptor, Inheritance, Registry, TypeMetadata};
use crate::value::AttributeValue;

/// The inherited part of an attribute's effective value.
pub(crate) fn inherited(
    document: &Document,
    id: NodeId,
    descriptor: &AttributeDescriptor,
) -> Option<AttributeValue> {
    match descriptor.inheritance {
        Inheritance::None => None,
        Inheritance::FromParent => {
            let parent = document.parent(id)?;
            declares(document, parent, descriptor.name)
                .then(|| document.effective_value(parent, descriptor.name))
                .flatten()
        }
        Inheritance::FromAncestor { kind, attribute } => {
            let ancestor = document.ancestor_of_kind(id, kind)?;
            document.effective_value(ancestor, attribute)
        }
        Inheritance::Callback(callback) => callback(document, id),
    }
}

fn declares(document: &Document, id: NodeId, name: &str) -> bool {
    Registry::resolve(document.kind(id)).attribute(name).is_some()
}

/// `dir` of `pc`, `sc` and `ec`.
///
/// Enclosing `pc` elements pass on their own `dir`; otherwise the value is
/// the `srcDir` or `trgDir` of the nearest structural ancestor, depending on
/// whether the code sits in a `source` or a `target`.
pub(crate) fn code_direction(document: &Document, id: NodeId) -> Option<AttributeValue> {
    for ancestor in document.ancestors(id) {
        match document.kind(ancestor) {
            NodeKind::SpanningCode => {
                if let Some(value) = document.get_attribute(ancestor, "dir") {
                    return Some(value.clone());
                }
            }
            NodeKind::Marker => {}
            NodeKind::Source => return structural_value(document, ancestor, "srcDir"),
            NodeKind::Target => return structural_value(document, ancestor, "trgDir"),
            _ => return None,
        }
    }
    None
}

/// `translate` of `mrk` and `sm`: the nearest enclosing marker that sets it,
/// else the enclosing structural element.
pub(crate) fn marker_translate(document: &Document, id: NodeId) -> Option<AttributeValue> {
    for ancestor in document.ancestors(id) {
        match document.kind(ancestor) {
            NodeKind::Marker => {
                if let Some(value) = document.get_attribute(ancestor, "translate") {
                    return Some(value.clone());
                }
            }
            _ if declares(document, ancestor, "translate") => {
                return document.effective_value(ancestor, "translate");
            }
            _ => {}
        }
    }
    None
}

fn structural_value(document: &Document, from: NodeId, name: &str) -> Option<AttributeValue> {
    document
        .ancestors(from)
        .find(|a| declares(document, *a, name))
        .and_then(|a| document.effective_value(a, name))
}

fn is_isolated(document: &Document, id: NodeId) -> bool {
    document
        .effective_value(id, "isolated")
        .and_then(|v| v.as_bool())
        .unwrap_or(false)
}

/// An isolated `ec` has no `sc` to point at and must carry its own `id`.
pub(crate) fn end_code_requires_id(document: &Document, id: NodeId) -> bool {
    is_isolated(document, id)
}

/// A paired `ec` refers back to its `sc` through `startRef`.
pub(crate) fn end_code_requires_start_ref(document: &Document, id: NodeId) -> bool {
    !is_isolated(document, id)
}

/// Reader post-condition for attributes: dependencies and required values.
pub(crate) fn check_attributes(
    document: &Document,
    id: NodeId,
    metadata: &TypeMetadata,
) -> Result<()> {
    let host = metadata.kind();
    for attribute in metadata.descriptor.attributes {
        if document.get_attribute(id, attribute.name).is_some() {
            continue;
        }
        if let Some(dependent) = attribute
            .dependents
            .iter()
            .copied()
            .find(|d| document.get_attribute(id, d).is_some())
        {
            return Err(Error::DependencyMissing {
                host,
                attribute: attribute.name,
                dependent,
            });
        }
        if attribute.is_required(document, id) {
            return Err(Error::MissingAttribute {
                host,
                attribute: attribute.name,
            });
        }
    }
    Ok(())
}
