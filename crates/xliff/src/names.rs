//! Namespace constants and qualified names.
//!
//! Every name the codec handles falls into one of four namespace classes:
//! the XLIFF core vocabulary, one of the closed set of module vocabularies,
//! the reserved `xml` namespace, or anything else (foreign content, only ever
//! preserved as extensions).

use std::fmt;

/// XLIFF 2.0 core namespace.
pub const XLIFF_NAMESPACE: &str = "urn:oasis:names:tc:xliff:document:2.0";

/// Metadata module namespace (`mda`).
pub const METADATA_NAMESPACE: &str = "urn:oasis:names:tc:xliff:metadata:2.0";

/// Glossary module namespace (`gls`).
pub const GLOSSARY_NAMESPACE: &str = "urn:oasis:names:tc:xliff:glossary:2.0";

/// Change Tracking module namespace (`ctr`).
pub const CHANGE_TRACKING_NAMESPACE: &str = "urn:oasis:names:tc:xliff:changetracking:2.0";

/// The reserved `xml` namespace (`xml:space`, `xml:lang`).
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// The reserved `xmlns` namespace.
pub const XMLNS_NAMESPACE: &str = "http://www.w3.org/2000/xmlns/";

/// Module namespaces with their conventional prefixes.
///
/// Only `mda`, `gls` and `ctr` have element catalogs; the others are
/// recognized so that their content is never mistaken for extension data.
pub const MODULE_NAMESPACES: &[(&str, &str)] = &[
    ("mda", METADATA_NAMESPACE),
    ("gls", GLOSSARY_NAMESPACE),
    ("ctr", CHANGE_TRACKING_NAMESPACE),
    ("fs", "urn:oasis:names:tc:xliff:fs:2.0"),
    ("mtc", "urn:oasis:names:tc:xliff:matches:2.0"),
    ("res", "urn:oasis:names:tc:xliff:resourcedata:2.0"),
    ("slr", "urn:oasis:names:tc:xliff:sizerestriction:2.0"),
    ("val", "urn:oasis:names:tc:xliff:validation:2.0"),
];

/// Classification of a namespace URI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NamespaceKind {
    /// No namespace (unprefixed attributes).
    None,
    /// The XLIFF core namespace.
    Core,
    /// One of [`MODULE_NAMESPACES`].
    Module,
    /// The reserved `xml` namespace.
    Xml,
    /// Anything else.
    Foreign,
}

/// Classifies a namespace URI.
pub fn classify(namespace: Option<&str>) -> NamespaceKind {
    match namespace {
        None | Some("") => NamespaceKind::None,
        Some(XLIFF_NAMESPACE) => NamespaceKind::Core,
        Some(XML_NAMESPACE) => NamespaceKind::Xml,
        Some(ns) if MODULE_NAMESPACES.iter().any(|(_, uri)| *uri == ns) => NamespaceKind::Module,
        Some(_) => NamespaceKind::Foreign,
    }
}

/// Returns true if content in `namespace` may be stored as extension data.
pub fn is_foreign(namespace: Option<&str>) -> bool {
    classify(namespace) == NamespaceKind::Foreign
}

/// Returns the conventional prefix of a module namespace.
pub fn module_prefix(namespace: &str) -> Option<&'static str> {
    MODULE_NAMESPACES
        .iter()
        .find(|(_, uri)| *uri == namespace)
        .map(|(prefix, _)| *prefix)
}

/// A statically declared wire name, used by the descriptor catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct WireName {
    /// Conventional prefix used when writing.
    pub prefix: Option<&'static str>,
    /// Namespace URI, `None` for unqualified attributes.
    pub namespace: Option<&'static str>,
    /// Local name.
    pub local: &'static str,
}

impl WireName {
    /// An element in the XLIFF core namespace.
    pub const fn core(local: &'static str) -> Self {
        Self {
            prefix: None,
            namespace: Some(XLIFF_NAMESPACE),
            local,
        }
    }

    /// An element in a module namespace.
    pub const fn module(prefix: &'static str, namespace: &'static str, local: &'static str) -> Self {
        Self {
            prefix: Some(prefix),
            namespace: Some(namespace),
            local,
        }
    }

    /// An unqualified attribute.
    pub const fn plain(local: &'static str) -> Self {
        Self {
            prefix: None,
            namespace: None,
            local,
        }
    }

    /// An attribute in the `xml` namespace.
    pub const fn xml(local: &'static str) -> Self {
        Self {
            prefix: Some("xml"),
            namespace: Some(XML_NAMESPACE),
            local,
        }
    }

    /// A name outside any namespace (synthetic nodes such as text).
    pub const fn synthetic(local: &'static str) -> Self {
        Self::plain(local)
    }

    /// Returns true if this name has the given namespace and local name.
    pub fn matches(&self, namespace: Option<&str>, local: &str) -> bool {
        self.local == local && self.namespace.filter(|ns| !ns.is_empty()) == namespace.filter(|ns| !ns.is_empty())
    }
}

impl fmt::Display for WireName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(self.local),
        }
    }
}

/// A qualified name read from, or destined for, the wire.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct XmlName {
    /// The prefix as written, if any.
    pub prefix: Option<String>,
    /// The resolved namespace URI, if any.
    pub namespace: Option<String>,
    /// The local name.
    pub local: String,
}

impl XmlName {
    /// Creates a name with an explicit prefix and namespace.
    pub fn new(
        prefix: Option<impl Into<String>>,
        namespace: Option<impl Into<String>>,
        local: impl Into<String>,
    ) -> Self {
        Self {
            prefix: prefix.map(Into::into),
            namespace: namespace.map(Into::into),
            local: local.into(),
        }
    }

    /// Creates a name in `namespace` with the given prefix.
    pub fn qualified(prefix: &str, namespace: &str, local: &str) -> Self {
        Self {
            prefix: Some(prefix.to_string()),
            namespace: Some(namespace.to_string()),
            local: local.to_string(),
        }
    }

    /// Creates an unqualified name.
    pub fn local(local: &str) -> Self {
        Self {
            prefix: None,
            namespace: None,
            local: local.to_string(),
        }
    }

    /// Returns the namespace URI as a string slice.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Returns the namespace class of this name.
    pub fn kind(&self) -> NamespaceKind {
        classify(self.namespace())
    }
}

impl From<WireName> for XmlName {
    fn from(name: WireName) -> Self {
        Self {
            prefix: name.prefix.map(str::to_string),
            namespace: name.namespace.map(str::to_string),
            local: name.local.to_string(),
        }
    }
}

impl fmt::Display for XmlName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.prefix {
            Some(prefix) => write!(f, "{}:{}", prefix, self.local),
            None => f.write_str(&self.local),
        }
    }
}

/// Splits a raw `prefix:local` name.
pub(crate) fn split_qname(raw: &str) -> (Option<&str>, &str) {
    match raw.split_once(':') {
        Some((prefix, local)) => (Some(prefix), local),
        None => (None, raw),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify() {
        assert_eq!(classify(Some(XLIFF_NAMESPACE)), NamespaceKind::Core);
        assert_eq!(classify(Some(METADATA_NAMESPACE)), NamespaceKind::Module);
        assert_eq!(
            classify(Some("urn:oasis:names:tc:xliff:matches:2.0")),
            NamespaceKind::Module
        );
        assert_eq!(classify(Some(XML_NAMESPACE)), NamespaceKind::Xml);
        assert_eq!(classify(Some("urn:example:tool")), NamespaceKind::Foreign);
        assert_eq!(classify(None), NamespaceKind::None);
        assert!(is_foreign(Some("urn:example:tool")));
        assert!(!is_foreign(Some(GLOSSARY_NAMESPACE)));
    }

    #[test]
    fn test_module_prefix() {
        assert_eq!(module_prefix(METADATA_NAMESPACE), Some("mda"));
        assert_eq!(module_prefix(CHANGE_TRACKING_NAMESPACE), Some("ctr"));
        assert_eq!(module_prefix("urn:example"), None);
    }

    #[test]
    fn test_wire_name_matches() {
        let unit = WireName::core("unit");
        assert!(unit.matches(Some(XLIFF_NAMESPACE), "unit"));
        assert!(!unit.matches(None, "unit"));
        assert_eq!(WireName::xml("space").to_string(), "xml:space");
        assert!(WireName::plain("id").matches(None, "id"));
        assert!(WireName::plain("id").matches(Some(""), "id"));
    }

    #[test]
    fn test_split_qname() {
        assert_eq!(split_qname("mda:meta"), (Some("mda"), "meta"));
        assert_eq!(split_qname("unit"), (None, "unit"));
    }
}
