//! Extension handler contract and registry.
//!
//! The reader consults a handler whenever it meets an attribute or element
//! in a foreign namespace: the handler materializes the item and decides
//! whether to store it in the host node's [`ExtensionBag`]. The writer never
//! calls handlers; it re-emits whatever the bag holds.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::{Error, Result};
use crate::names::XmlName;
use crate::node::{ExtensionAttribute, ExtensionBag, ExtensionElement, ExtensionItem};

/// Materializes and stores foreign content for one namespace.
///
/// Every method has a default that keeps the content as generic data, so a
/// handler only overrides what it wants to filter or reshape.
pub trait ExtensionHandler: Send + Sync {
    /// Creates the placeholder for a foreign attribute. `None` rejects it.
    fn create_attribute(&self, name: &XmlName, value: &str) -> Option<ExtensionAttribute> {
        Some(ExtensionAttribute::new(name.clone(), value))
    }

    /// Creates the shell of a foreign element; the reader fills in its
    /// attributes and content. `None` rejects it.
    fn create_element(&self, name: &XmlName) -> Option<ExtensionElement> {
        Some(ExtensionElement::new(name.clone()))
    }

    /// Stores a materialized item. Returns false to reject it.
    fn store(&self, bag: &mut ExtensionBag, namespace: &str, item: ExtensionItem) -> bool {
        bag.push(namespace, item);
        true
    }
}

/// The default handler: keeps everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct GenericExtensionHandler;

impl ExtensionHandler for GenericExtensionHandler {}

/// Handlers keyed by namespace, plus the default used for the rest.
#[derive(Clone)]
pub struct ExtensionHandlers {
    handlers: HashMap<String, Arc<dyn ExtensionHandler>>,
    default: Arc<dyn ExtensionHandler>,
}

impl Default for ExtensionHandlers {
    fn default() -> Self {
        Self {
            handlers: HashMap::new(),
            default: Arc::new(GenericExtensionHandler),
        }
    }
}

impl fmt::Debug for ExtensionHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut namespaces: Vec<&String> = self.handlers.keys().collect();
        namespaces.sort();
        f.debug_struct("ExtensionHandlers")
            .field("namespaces", &namespaces)
            .finish_non_exhaustive()
    }
}

impl ExtensionHandlers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers the handler for `namespace`.
    ///
    /// # Errors
    ///
    /// `Error::HandlerAlreadyRegistered` if the namespace already has one, and
    /// `Error::InvalidArgument` for an empty namespace.
    pub fn register(&mut self, namespace: &str, handler: Arc<dyn ExtensionHandler>) -> Result<()> {
        if namespace.is_empty() {
            return Err(Error::invalid_argument("extension namespace must not be empty"));
        }
        if self.handlers.contains_key(namespace) {
            return Err(Error::HandlerAlreadyRegistered {
                namespace: namespace.to_string(),
            });
        }
        self.handlers.insert(namespace.to_string(), handler);
        Ok(())
    }

    /// Replaces the handler used for namespaces without a registration.
    pub fn set_default(&mut self, handler: Arc<dyn ExtensionHandler>) {
        self.default = handler;
    }

    pub fn is_registered(&self, namespace: &str) -> bool {
        self.handlers.contains_key(namespace)
    }

    /// The handler responsible for `namespace`.
    pub fn handler_for(&self, namespace: &str) -> &Arc<dyn ExtensionHandler> {
        self.handlers.get(namespace).unwrap_or(&self.default)
    }
}
