//! Attribute access on document nodes.

use super::document::Document;
use super::{NodeId, inheritance};
use crate::error::{Error, Result};
use crate::metadata::AttributeDescriptor;
use crate::value::AttributeValue;

/// A stored attribute value.
#[derive(Debug, Clone)]
pub struct AttributeSlot {
    pub value: AttributeValue,
    /// Set by the application or read from input, as opposed to materialized
    /// from inheritance or a default.
    pub explicit: bool,
    pub descriptor: &'static AttributeDescriptor,
}

impl Document {
    fn attribute_descriptor(&self, id: NodeId, name: &str) -> Result<&'static AttributeDescriptor> {
        let metadata = self.metadata(id);
        metadata.attribute(name).ok_or_else(|| Error::UnknownAttribute {
            host: metadata.kind(),
            attribute: name.to_string(),
        })
    }

    /// The local value of an attribute. Unknown names have no value.
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&AttributeValue> {
        self.node(id).attributes.get(name).map(|slot| &slot.value)
    }

    /// The `id` attribute, when it is set.
    pub fn id(&self, node: NodeId) -> Option<&str> {
        self.get_attribute(node, "id").and_then(AttributeValue::as_str)
    }

    /// Returns true if the attribute was set explicitly.
    pub fn is_explicit(&self, id: NodeId, name: &str) -> bool {
        self.node(id)
            .attributes
            .get(name)
            .is_some_and(|slot| slot.explicit)
    }

    /// Sets an attribute from its wire form.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, raw: &str) -> Result<()> {
        let descriptor = self.attribute_descriptor(id, name)?;
        let value = descriptor
            .ty
            .parse(raw)
            .map_err(|reason| self.invalid_value(id, descriptor, raw, reason))?;
        self.store_attribute(id, descriptor, value, true);
        Ok(())
    }

    /// Sets an attribute from a typed value.
    pub fn set_attribute_value(
        &mut self,
        id: NodeId,
        name: &str,
        value: impl Into<AttributeValue>,
    ) -> Result<()> {
        let descriptor = self.attribute_descriptor(id, name)?;
        let value = value.into();
        let shown = value.to_string();
        let value = descriptor
            .ty
            .check(value)
            .map_err(|reason| self.invalid_value(id, descriptor, &shown, reason))?;
        self.store_attribute(id, descriptor, value, true);
        Ok(())
    }

    /// Removes the local value, returning it.
    pub fn clear_attribute(&mut self, id: NodeId, name: &str) -> Result<Option<AttributeValue>> {
        self.attribute_descriptor(id, name)?;
        Ok(self
            .node_mut(id)
            .attributes
            .remove(name)
            .map(|slot| slot.value))
    }

    /// Names and values of the locally stored attributes.
    pub fn attributes(&self, id: NodeId) -> impl Iterator<Item = (&'static str, &AttributeValue)> {
        self.node(id)
            .attributes
            .values()
            .map(|slot| (slot.descriptor.name, &slot.value))
    }

    /// The value that applies to a node: local, else inherited, else default.
    pub fn effective_value(&self, id: NodeId, name: &str) -> Option<AttributeValue> {
        if let Some(value) = self.get_attribute(id, name) {
            return Some(value.clone());
        }
        let descriptor = self.metadata(id).attribute(name)?;
        inheritance::inherited(self, id, descriptor).or_else(|| descriptor.default_typed())
    }

    /// The value inheritance alone would supply, ignoring the local value and the default.
    pub fn inherited_value(&self, id: NodeId, name: &str) -> Option<AttributeValue> {
        let descriptor = self.metadata(id).attribute(name)?;
        inheritance::inherited(self, id, descriptor)
    }

    /// Stores the effective value of every unset attribute as a non-explicit
    /// value. Such values are only written with full output detail.
    pub fn materialize_attributes(&mut self, id: NodeId) {
        let metadata = self.metadata(id);
        for descriptor in metadata.descriptor.attributes {
            if self.get_attribute(id, descriptor.name).is_some() {
                continue;
            }
            if let Some(value) = self.effective_value(id, descriptor.name) {
                self.store_attribute(id, descriptor, value, false);
            }
        }
    }

    pub(crate) fn store_attribute(
        &mut self,
        id: NodeId,
        descriptor: &'static AttributeDescriptor,
        value: AttributeValue,
        explicit: bool,
    ) {
        self.node_mut(id).attributes.insert(
            descriptor.name,
            AttributeSlot {
                value,
                explicit,
                descriptor,
            },
        );
    }

    pub(crate) fn invalid_value(
        &self,
        id: NodeId,
        descriptor: &AttributeDescriptor,
        raw: &str,
        reason: String,
    ) -> Error {
        Error::InvalidValue {
            host: self.kind(id),
            attribute: descriptor.wire.to_string(),
            value: raw.to_string(),
            reason,
        }
    }
}
