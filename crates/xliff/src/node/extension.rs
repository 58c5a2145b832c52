//! Foreign content preserved on a node.

use crate::names::XmlName;

/// A foreign attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionAttribute {
    pub name: XmlName,
    pub value: String,
}

impl ExtensionAttribute {
    pub fn new(name: XmlName, value: impl Into<String>) -> Self {
        Self {
            name,
            value: value.into(),
        }
    }
}

/// Content of a foreign element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionContent {
    Element(ExtensionElement),
    Text(String),
}

/// A generic foreign element tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionElement {
    pub name: XmlName,
    pub attributes: Vec<ExtensionAttribute>,
    pub children: Vec<ExtensionContent>,
}

impl ExtensionElement {
    pub fn new(name: XmlName) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Value of an attribute by local name.
    pub fn attribute(&self, local: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name.local == local)
            .map(|a| a.value.as_str())
    }

    /// Child elements, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &ExtensionElement> {
        self.children.iter().filter_map(|c| match c {
            ExtensionContent::Element(e) => Some(e),
            ExtensionContent::Text(_) => None,
        })
    }

    /// Concatenated text of this element and its descendants.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for child in &self.children {
            match child {
                ExtensionContent::Text(t) => out.push_str(t),
                ExtensionContent::Element(e) => out.push_str(&e.text()),
            }
        }
        out
    }

    /// Appends text, merging with a trailing text child.
    pub fn push_text(&mut self, text: &str) {
        if let Some(ExtensionContent::Text(last)) = self.children.last_mut() {
            last.push_str(text);
        } else {
            self.children.push(ExtensionContent::Text(text.to_string()));
        }
    }
}

/// One item handed to an extension handler for storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtensionItem {
    Attribute(ExtensionAttribute),
    Element(ExtensionElement),
}

/// The foreign content of one namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    pub namespace: String,
    pub attributes: Vec<ExtensionAttribute>,
    pub elements: Vec<ExtensionElement>,
}

/// Ordered foreign-content fragments, one per namespace. Always present,
/// empty for most nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtensionBag {
    fragments: Vec<Extension>,
}

impl ExtensionBag {
    pub fn is_empty(&self) -> bool {
        self.fragments
            .iter()
            .all(|f| f.attributes.is_empty() && f.elements.is_empty())
    }

    pub fn fragments(&self) -> &[Extension] {
        &self.fragments
    }

    /// The fragment for `namespace`, created on first use.
    pub fn fragment_mut(&mut self, namespace: &str) -> &mut Extension {
        let index = match self.fragments.iter().position(|f| f.namespace == namespace) {
            Some(index) => index,
            None => {
                self.fragments.push(Extension {
                    namespace: namespace.to_string(),
                    attributes: Vec::new(),
                    elements: Vec::new(),
                });
                self.fragments.len() - 1
            }
        };
        &mut self.fragments[index]
    }

    pub fn fragment(&self, namespace: &str) -> Option<&Extension> {
        self.fragments.iter().find(|f| f.namespace == namespace)
    }

    /// Stores an item under its namespace.
    pub fn push(&mut self, namespace: &str, item: ExtensionItem) {
        let fragment = self.fragment_mut(namespace);
        match item {
            ExtensionItem::Attribute(a) => fragment.attributes.push(a),
            ExtensionItem::Element(e) => fragment.elements.push(e),
        }
    }

    /// All foreign attributes, fragment by fragment.
    pub fn attributes(&self) -> impl Iterator<Item = &ExtensionAttribute> {
        self.fragments.iter().flat_map(|f| f.attributes.iter())
    }

    /// All foreign elements, fragment by fragment.
    pub fn elements(&self) -> impl Iterator<Item = &ExtensionElement> {
        self.fragments.iter().flat_map(|f| f.elements.iter())
    }

    /// Drops everything stored for `namespace`.
    pub fn remove(&mut self, namespace: &str) -> Option<Extension> {
        let index = self.fragments.iter().position(|f| f.namespace == namespace)?;
        Some(self.fragments.remove(index))
    }

    pub fn clear(&mut self) {
        self.fragments.clear();
    }
}
