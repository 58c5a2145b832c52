//! Namespace bookkeeping shared by the reader and the writer.

use tracing::trace;

use crate::error::{Error, Result};
use crate::names::{self, NamespaceKind, XML_NAMESPACE, XLIFF_NAMESPACE, XmlName};

/// In-scope namespace bindings while reading.
///
/// One frame per open element; `None` as prefix is the default namespace,
/// `None` as URI an undeclared default (`xmlns=""`).
#[derive(Debug, Default)]
pub(crate) struct Scopes {
    stack: Vec<Vec<(Option<String>, Option<String>)>>,
}

impl Scopes {
    /// Bindings for parsing a fragment inside a live document: core as the
    /// default namespace and every module under its conventional prefix.
    pub(crate) fn for_fragment() -> Self {
        let mut bindings = vec![(None, Some(XLIFF_NAMESPACE.to_string()))];
        bindings.extend(
            names::MODULE_NAMESPACES
                .iter()
                .map(|(prefix, uri)| (Some(prefix.to_string()), Some(uri.to_string()))),
        );
        Self {
            stack: vec![bindings],
        }
    }

    pub(crate) fn push(&mut self, bindings: Vec<(Option<String>, Option<String>)>) {
        self.stack.push(bindings);
    }

    pub(crate) fn pop(&mut self) {
        self.stack.pop();
    }

    /// Resolves a prefix to its namespace URI.
    pub(crate) fn resolve(&self, prefix: Option<&str>) -> Result<Option<String>> {
        if prefix == Some("xml") {
            return Ok(Some(XML_NAMESPACE.to_string()));
        }
        for frame in self.stack.iter().rev() {
            if let Some((_, uri)) = frame.iter().find(|(p, _)| p.as_deref() == prefix) {
                return Ok(uri.clone());
            }
        }
        match prefix {
            None => Ok(None),
            Some(p) => Err(Error::InvalidName {
                name: format!("{}: (undeclared prefix)", p),
            }),
        }
    }
}

/// Declarations collected by the writer's pre-pass.
#[derive(Debug, Default)]
pub(crate) struct NamespaceTable {
    /// Declaration order: `(prefix, uri)`; `None` is the default namespace.
    declarations: Vec<(Option<String>, String)>,
    generated: usize,
}

impl NamespaceTable {
    /// A table for a whole document: core is the default namespace.
    pub(crate) fn for_document() -> Self {
        Self {
            declarations: vec![(None, XLIFF_NAMESPACE.to_string())],
            generated: 0,
        }
    }

    /// A table for a fragment written into a host that already binds core.
    pub(crate) fn for_fragment() -> Self {
        Self::default()
    }

    pub(crate) fn declarations(&self) -> &[(Option<String>, String)] {
        &self.declarations
    }

    /// The prefix bound to `uri`: `Some(None)` for the default namespace.
    pub(crate) fn prefix_of(&self, uri: &str) -> Option<Option<&str>> {
        if uri == XML_NAMESPACE {
            return Some(Some("xml"));
        }
        self.declarations
            .iter()
            .find(|(_, u)| u == uri)
            .map(|(p, _)| p.as_deref())
    }

    fn uri_of(&self, prefix: &str) -> Option<&str> {
        self.declarations
            .iter()
            .find(|(p, _)| p.as_deref() == Some(prefix))
            .map(|(_, u)| u.as_str())
    }

    fn check_uri(uri: &str) -> Result<()> {
        if xliff_om_support::is_namespace_uri(uri) {
            Ok(())
        } else {
            Err(Error::InvalidName {
                name: uri.to_string(),
            })
        }
    }

    fn check_ncname(name: &str) -> Result<()> {
        if xliff_om_support::is_ncname(name) {
            Ok(())
        } else {
            Err(Error::InvalidName {
                name: name.to_string(),
            })
        }
    }

    fn bind(&mut self, prefix: &str, uri: &str) -> Result<()> {
        match self.uri_of(prefix) {
            Some(existing) if existing == uri => Ok(()),
            Some(existing) => Err(Error::NamespaceCollision {
                prefix: prefix.to_string(),
                first: existing.to_string(),
                second: uri.to_string(),
            }),
            None => {
                trace!(prefix, uri, "declaring namespace");
                self.declarations
                    .push((Some(prefix.to_string()), uri.to_string()));
                Ok(())
            }
        }
    }

    /// Ensures a module namespace is declared under its conventional prefix.
    pub(crate) fn require_module(&mut self, uri: &str) -> Result<()> {
        if self.prefix_of(uri).is_some() {
            return Ok(());
        }
        let prefix = names::module_prefix(uri).ok_or_else(|| Error::InvalidName {
            name: uri.to_string(),
        })?;
        self.bind(prefix, uri)
    }

    /// Validates a name found in extension content and declares its namespace.
    pub(crate) fn require(&mut self, name: &XmlName) -> Result<()> {
        Self::check_ncname(&name.local)?;
        if let Some(prefix) = &name.prefix {
            Self::check_ncname(prefix)?;
        }
        let Some(uri) = name.namespace() else {
            return Ok(());
        };
        Self::check_uri(uri)?;
        match names::classify(Some(uri)) {
            NamespaceKind::Xml => return Ok(()),
            NamespaceKind::Core if self.prefix_of(uri).is_some() => return Ok(()),
            NamespaceKind::Module => return self.require_module(uri),
            _ => {}
        }
        match (&name.prefix, self.prefix_of(uri)) {
            (Some(prefix), Some(Some(bound))) if prefix == bound => Ok(()),
            // A recorded prefix must not be bound to another namespace, even
            // when the namespace already has a prefix of its own.
            (Some(prefix), _) if self.uri_of(prefix).is_some_and(|u| u != uri) => {
                Err(Error::NamespaceCollision {
                    prefix: prefix.clone(),
                    first: self.uri_of(prefix).unwrap_or_default().to_string(),
                    second: uri.to_string(),
                })
            }
            (_, Some(_)) => Ok(()),
            (Some(prefix), None) if prefix != "xml" && prefix != "xmlns" => {
                let prefix = prefix.clone();
                self.bind(&prefix, uri)
            }
            _ => {
                let prefix = self.generate_prefix();
                self.bind(&prefix, uri)
            }
        }
    }

    fn generate_prefix(&mut self) -> String {
        loop {
            self.generated += 1;
            let candidate = format!("ext{}", self.generated);
            if self.uri_of(&candidate).is_none() {
                return candidate;
            }
        }
    }

    /// Renders a name with the prefix its namespace is declared under.
    ///
    /// Unbound namespaces (only possible for unqualified names) render bare.
    pub(crate) fn qualified(&self, name: &XmlName) -> String {
        match name.namespace().and_then(|uri| self.prefix_of(uri)) {
            Some(Some(prefix)) => format!("{}:{}", prefix, name.local),
            _ => name.local.clone(),
        }
    }
}
