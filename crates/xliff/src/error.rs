//! Error types for reading, writing and editing XLIFF documents.
//!
//! The variants fall into the categories callers need to tell apart:
//!
//! | Category | Variants | Raised by |
//! |----------|----------|-----------|
//! | Argument | `InvalidArgument` | any public entry point |
//! | Format | `UnknownElement`, `InvalidAttribute`, `OutOfOrder`, `MissingChild`, `MissingAttribute`, `DependencyMissing`, `UnexpectedText`, `MissingRoot`, `UnknownEntity` | reader (and writer for required attributes) |
//! | Value | `InvalidValue`, `UnknownAttribute`, `FixedAttribute` | setters, reader, writer |
//! | Tree | `NodeReuse`, `ChildNotAllowed`, `SlotOccupied` | ownership lists, reader |
//! | Validation | `Validation` | pluggable validators |
//! | Configuration | `HandlerAlreadyRegistered`, `NamespaceCollision`, `InvalidName` | handler registry, writer |
//! | Pass-through | `Xml`, `Escape`, `Io`, `Utf8`, `FromUtf8` | underlying tokenizer and I/O |
//!
//! Tokenizer errors are never wrapped into format errors, so "not XML" stays
//! distinguishable from "not a valid XLIFF structure".

// Error enum variant fields are self-documenting via their #[error(...)] messages
#![allow(missing_docs)]

use thiserror::Error;

use crate::metadata::Slot;
use crate::node::NodeKind;
use crate::validation::ValidationError;

/// The primary error type for all object model operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid direct input to an API call.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// An element that is not declared for its host and not acceptable as extension content.
    #[error("unknown element <{name}> in {host}")]
    UnknownElement { name: String, host: NodeKind },

    /// An attribute that is neither declared for its host nor storable as extension content.
    #[error("invalid attribute name '{name}' on {host}")]
    InvalidAttribute { name: String, host: NodeKind },

    /// Content that appears after content of a later ordinal group.
    #[error("<{name}> is out of order in {host}")]
    OutOfOrder { name: String, host: NodeKind },

    /// A container that requires at least one item is empty.
    #[error("{host} requires at least one {slot} item")]
    MissingChild { host: NodeKind, slot: Slot },

    /// A required attribute has no value.
    #[error("{host} requires attribute '{attribute}'")]
    MissingAttribute {
        host: NodeKind,
        attribute: &'static str,
    },

    /// An attribute is present while an attribute it depends on is not.
    #[error("attribute '{dependent}' on {host} requires '{attribute}' to be specified")]
    DependencyMissing {
        host: NodeKind,
        attribute: &'static str,
        dependent: &'static str,
    },

    /// Non-whitespace text inside an element that does not accept text.
    #[error("text is not allowed in {host}")]
    UnexpectedText { host: NodeKind },

    /// The input contained no `<xliff>` root element.
    #[error("document has no <xliff> root element")]
    MissingRoot,

    /// An entity reference that is neither a character reference nor predefined.
    #[error("unknown entity reference '&{name};'")]
    UnknownEntity { name: String },

    /// A value rejected by an attribute converter.
    #[error("invalid value '{value}' for attribute '{attribute}' on {host}: {reason}")]
    InvalidValue {
        host: NodeKind,
        attribute: String,
        value: String,
        reason: String,
    },

    /// An attribute name the node kind does not declare.
    #[error("{host} has no attribute named '{attribute}'")]
    UnknownAttribute { host: NodeKind, attribute: String },

    /// An attribute whose value is fixed by the schema carries another value.
    #[error("attribute '{attribute}' on {host} must be '{expected}' but is '{actual}'")]
    FixedAttribute {
        host: NodeKind,
        attribute: &'static str,
        expected: &'static str,
        actual: String,
    },

    /// Attaching a node that already has a parent.
    #[error("{kind} node is already attached to a parent")]
    NodeReuse { kind: NodeKind },

    /// A child kind the parent's list does not accept.
    #[error("{host} cannot hold {child} in its {slot} list")]
    ChildNotAllowed {
        host: NodeKind,
        child: NodeKind,
        slot: Slot,
    },

    /// A single-valued list that already holds an item.
    #[error("the {slot} of {host} is already occupied")]
    SlotOccupied { host: NodeKind, slot: Slot },

    /// A semantic violation reported by a validator.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A second extension handler for the same namespace.
    #[error("an extension handler is already registered for namespace '{namespace}'")]
    HandlerAlreadyRegistered { namespace: String },

    /// One prefix bound to two namespaces in the same document.
    #[error("prefix '{prefix}' is bound to both '{first}' and '{second}'")]
    NamespaceCollision {
        prefix: String,
        first: String,
        second: String,
    },

    /// A prefix, local name or namespace URI that violates XML naming rules.
    #[error("invalid XML name: '{name}'")]
    InvalidName { name: String },

    /// Errors raised by the quick-xml tokenizer.
    #[error(transparent)]
    Xml(#[from] quick_xml::Error),

    /// Malformed escape sequences in text or attribute values.
    #[error(transparent)]
    Escape(#[from] quick_xml::escape::EscapeError),

    /// Underlying stream errors.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Input bytes that are not UTF-8.
    #[error(transparent)]
    Utf8(#[from] std::str::Utf8Error),

    /// Output bytes that are not UTF-8.
    #[error(transparent)]
    FromUtf8(#[from] std::string::FromUtf8Error),
}

impl Error {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Error::InvalidArgument {
            message: message.into(),
        }
    }

    /// Returns true for structural violations detected while reading.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            Error::UnknownElement { .. }
                | Error::InvalidAttribute { .. }
                | Error::OutOfOrder { .. }
                | Error::MissingChild { .. }
                | Error::MissingAttribute { .. }
                | Error::DependencyMissing { .. }
                | Error::UnexpectedText { .. }
                | Error::MissingRoot
                | Error::UnknownEntity { .. }
                | Error::InvalidValue { .. }
                | Error::UnknownAttribute { .. }
                | Error::ChildNotAllowed { .. }
                | Error::SlotOccupied { .. }
        )
    }

    /// Returns true for errors reported by validators.
    pub fn is_validation_error(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// Returns the stable numeric code of a validation error.
    pub fn validation_code(&self) -> Option<u32> {
        match self {
            Error::Validation(e) => Some(e.code),
            _ => None,
        }
    }

    /// Returns true for errors produced by the XML tokenizer itself.
    pub fn is_syntax_error(&self) -> bool {
        matches!(self, Error::Xml(_) | Error::Escape(_) | Error::Utf8(_))
    }
}

/// Result type alias for object model operations.
pub type Result<T> = std::result::Result<T, Error>;
