//! # XLIFF 2.0 object model
//!
//! A schema-driven codec for XLIFF 2.0 documents: a typed document tree, a
//! streaming reader that checks element order and completeness as it goes,
//! and a writer that reproduces schema order and filters attribute values by
//! an output-detail policy.
//!
//! ## Architecture
//!
//! - **Metadata**: every node kind is described by a static
//!   [`metadata::NodeDescriptor`] (attributes, children with their ordinal
//!   groups, typed child lists, content model). [`metadata::Registry`]
//!   derives lookup tables from it once per kind and caches them process-wide.
//! - **Document**: nodes live in an arena owned by [`Document`] and are
//!   addressed by [`NodeId`]. Each node has one parent, typed child lists,
//!   attribute slots and an extension bag for foreign content.
//! - **Inheritance**: unset attributes resolve through the parent, a typed
//!   ancestor or a per-kind callback (see [`Document::effective_value`]).
//! - **Codec**: [`Reader`] and [`Writer`] drive quick-xml. Validators run
//!   after reading and before writing.
//!
//! ## Modules
//!
//! Core, Metadata (`mda`), Glossary (`gls`) and Change Tracking (`ctr`) are
//! modeled. The other XLIFF modules are recognized and rejected; anything in
//! a foreign namespace is kept as extension content.
//!
//! ## Example
//!
//! ```rust
//! use xliff_om::{Document, NodeKind, OutputDetail, Reader, ReaderSettings, Writer, WriterSettings};
//!
//! let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en" trgLang="fr">
//!   <file id="f1">
//!     <unit id="u1">
//!       <segment state="translated"><source>Hello</source><target>Bonjour</target></segment>
//!     </unit>
//!   </file>
//! </xliff>"#;
//!
//! let document = Reader::new(ReaderSettings::default()).deserialize_str(xml)?;
//! let unit = document
//!     .descendants(document.document_node())
//!     .into_iter()
//!     .find(|n| document.kind(*n) == NodeKind::Unit)
//!     .unwrap();
//! assert_eq!(document.id(unit), Some("u1"));
//!
//! let out = Writer::new(WriterSettings::default().with_detail(OutputDetail::Minimal))
//!     .serialize_to_string(&document)?;
//! assert!(out.contains(r#"<segment state="translated">"#));
//! # Ok::<(), xliff_om::Error>(())
//! ```

pub mod config;
pub mod error;
pub mod extension;
pub mod metadata;
pub mod names;
pub mod node;
pub mod validation;
pub mod value;
pub mod xml;

pub use config::{OutputDetail, ReaderSettings, WriterSettings};
pub use error::{Error, Result};
pub use extension::{ExtensionHandler, ExtensionHandlers, GenericExtensionHandler};
pub use metadata::Slot;
pub use names::{
    CHANGE_TRACKING_NAMESPACE, GLOSSARY_NAMESPACE, METADATA_NAMESPACE, XLIFF_NAMESPACE,
    XML_NAMESPACE, XmlName,
};
pub use node::{Document, NodeId, NodeKind};
pub use validation::{StandardValidator, ValidationError, Validator};
pub use value::{AttributeType, AttributeValue};
pub use xml::{Reader, Writer};
