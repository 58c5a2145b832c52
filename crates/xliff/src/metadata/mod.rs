//! Per-kind metadata: static descriptors, the catalog and the registry.

pub mod catalog;
mod descriptor;
mod registry;

pub use descriptor::{
    AttributeDescriptor, ChildDescriptor, ContentModel, InheritCallback, Inheritance,
    NodeDescriptor, OutputResolver, Slot, SlotDescriptor,
};
pub use registry::{OutputGroup, Registry, TypeMetadata};
