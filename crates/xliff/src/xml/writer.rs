//! Writer: a [`Document`] to XML in declared schema order.
//!
//! Content is emitted group by group in ascending ordinal order. Attribute
//! values are filtered by [`OutputDetail`]. Mixed content is rendered
//! without indentation so that whitespace inside `source`, `target` and
//! friends is never altered.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use quick_xml::Writer as XmlWriter;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use tracing::{debug, trace};

use super::namespaces::NamespaceTable;
use crate::config::{OutputDetail, WriterSettings};
use crate::error::{Error, Result};
use crate::metadata::catalog::structural;
use crate::metadata::{AttributeDescriptor, TypeMetadata};
use crate::names::{NamespaceKind, WireName, XLIFF_NAMESPACE};
use crate::node::{Document, ExtensionContent, ExtensionElement, NodeId, NodeKind};
use crate::value::AttributeValue;

/// Serializes documents and inline fragments.
///
/// ```rust
/// use xliff_om::{Document, Writer, WriterSettings};
///
/// let (document, _root) = Document::with_root("en").unwrap();
/// let xml = Writer::new(WriterSettings::default().with_declaration(false))
///     .serialize_to_string(&document)
///     .unwrap();
/// assert_eq!(
///     xml,
///     r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en"/>"#
/// );
/// ```
#[derive(Debug, Default)]
pub struct Writer {
    settings: WriterSettings,
}

impl Writer {
    pub fn new(settings: WriterSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &WriterSettings {
        &self.settings
    }

    /// Writes a complete document.
    ///
    /// Validators run before anything is written. The document must have an
    /// `xliff` root.
    pub fn serialize<W: Write>(&mut self, output: W, document: &Document) -> Result<()> {
        let root = document
            .root()
            .ok_or_else(|| Error::invalid_argument("document has no xliff root"))?;
        let (indent_char, indent_size) = self.settings.indent_unit()?;
        for validator in &self.settings.validators {
            validator.validate(document)?;
        }

        // The emitter owns all per-call state and is dropped on every path.
        let mut emitter = Emitter::new(&self.settings, document, NamespaceTable::for_document());
        emitter.collect(root)?;

        let mut xml = if self.settings.indent && indent_size > 0 {
            XmlWriter::new_with_indent(output, indent_char, indent_size)
        } else {
            XmlWriter::new(output)
        };
        if self.settings.include_declaration {
            xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;
        }
        emitter.write_node(&mut xml, root, false, true)?;
        xml.into_inner().flush()?;

        debug!(
            elements = emitter.elements,
            namespaces = emitter.namespaces.declarations().len(),
            detail = %self.settings.detail,
            "serialized document"
        );
        Ok(())
    }

    pub fn serialize_to_vec(&mut self, document: &Document) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        self.serialize(&mut out, document)?;
        Ok(out)
    }

    pub fn serialize_to_string(&mut self, document: &Document) -> Result<String> {
        Ok(String::from_utf8(self.serialize_to_vec(document)?)?)
    }

    pub fn serialize_path(&mut self, path: impl AsRef<Path>, document: &Document) -> Result<()> {
        let file = File::create(path.as_ref())?;
        self.serialize(BufWriter::new(file), document)
    }

    /// Writes one node and its subtree as a fragment.
    ///
    /// The core namespace is assumed to be the default namespace of the
    /// surrounding document and is not declared; any other namespace the
    /// subtree needs is declared on the fragment's outermost element.
    /// Validators do not run.
    pub fn serialize_fragment(&mut self, document: &Document, node: NodeId) -> Result<String> {
        if !document.contains(node) || node == document.document_node() {
            return Err(Error::invalid_argument(format!(
                "node {} cannot be written as a fragment",
                node
            )));
        }
        let (indent_char, indent_size) = self.settings.indent_unit()?;
        let mut emitter = Emitter::new(&self.settings, document, NamespaceTable::for_fragment());
        emitter.collect(node)?;

        let mut out = Vec::new();
        let mut xml = if self.settings.indent && indent_size > 0 {
            XmlWriter::new_with_indent(&mut out, indent_char, indent_size)
        } else {
            XmlWriter::new(&mut out)
        };
        emitter.write_node(&mut xml, node, false, true)?;
        trace!(kind = %document.kind(node), "serialized fragment");
        Ok(String::from_utf8(out)?)
    }
}

/// Per-call writing state.
struct Emitter<'a> {
    settings: &'a WriterSettings,
    document: &'a Document,
    namespaces: NamespaceTable,
    /// The default namespace in scope at the current output position.
    default_namespace: Option<String>,
    elements: usize,
}

impl<'a> Emitter<'a> {
    fn new(settings: &'a WriterSettings, document: &'a Document, namespaces: NamespaceTable) -> Self {
        Self {
            settings,
            document,
            namespaces,
            default_namespace: Some(XLIFF_NAMESPACE.to_string()),
            elements: 0,
        }
    }

    /// Pre-pass: declares every namespace the subtree needs.
    fn collect(&mut self, from: NodeId) -> Result<()> {
        for node in self.document.descendants(from) {
            let descriptor = self.document.metadata(node).descriptor;
            if let Some(uri) = descriptor.wire.namespace
                && crate::names::classify(Some(uri)) == NamespaceKind::Module
            {
                self.namespaces.require_module(uri)?;
            }
            if !self.settings.include_extensions {
                continue;
            }
            let bag = self.document.extensions(node);
            for attribute in bag.attributes() {
                self.namespaces.require(&attribute.name)?;
            }
            for element in bag.elements() {
                self.collect_extension(element)?;
            }
        }
        Ok(())
    }

    fn collect_extension(&mut self, element: &ExtensionElement) -> Result<()> {
        self.namespaces.require(&element.name)?;
        for attribute in &element.attributes {
            self.namespaces.require(&attribute.name)?;
        }
        for child in element.elements() {
            self.collect_extension(child)?;
        }
        Ok(())
    }

    fn element_name(&self, wire: WireName) -> String {
        match wire.namespace.and_then(|uri| self.namespaces.prefix_of(uri)) {
            Some(Some(prefix)) => format!("{}:{}", prefix, wire.local),
            _ => wire.local.to_string(),
        }
    }

    /// Decides which native attributes to write and with which values.
    fn native_attributes(
        &self,
        node: NodeId,
        metadata: &TypeMetadata,
    ) -> Result<Vec<(&'static AttributeDescriptor, AttributeValue)>> {
        let host = metadata.kind();
        let attributes = metadata.descriptor.attributes;
        let mut chosen = Vec::with_capacity(attributes.len());
        for descriptor in attributes {
            chosen.push(self.select(node, host, descriptor)?);
        }

        // A written attribute forces every attribute it depends on.
        loop {
            let mut changed = false;
            for (index, descriptor) in attributes.iter().enumerate() {
                if chosen[index].is_some() {
                    continue;
                }
                let Some(dependent) = descriptor.dependents.iter().copied().find(|name| {
                    attributes
                        .iter()
                        .position(|a| a.name == *name)
                        .is_some_and(|i| chosen[i].is_some())
                }) else {
                    continue;
                };
                let value = self
                    .document
                    .effective_value(node, descriptor.name)
                    .ok_or(Error::DependencyMissing {
                        host,
                        attribute: descriptor.name,
                        dependent,
                    })?;
                chosen[index] = Some(value);
                changed = true;
            }
            if !changed {
                break;
            }
        }

        Ok(attributes
            .iter()
            .zip(chosen)
            .filter_map(|(descriptor, value)| value.map(|v| (descriptor, v)))
            .collect())
    }

    fn select(
        &self,
        node: NodeId,
        host: NodeKind,
        descriptor: &'static AttributeDescriptor,
    ) -> Result<Option<AttributeValue>> {
        if descriptor.is_required(self.document, node) {
            return self
                .document
                .effective_value(node, descriptor.name)
                .map(Some)
                .ok_or(Error::MissingAttribute {
                    host,
                    attribute: descriptor.name,
                });
        }

        let explicit = self
            .document
            .get_attribute(node, descriptor.name)
            .filter(|_| self.document.is_explicit(node, descriptor.name));
        match self.settings.detail {
            OutputDetail::Full => Ok(self.document.effective_value(node, descriptor.name)),
            OutputDetail::Explicit => Ok(explicit.cloned()),
            OutputDetail::Minimal => {
                let Some(value) = explicit else {
                    return Ok(None);
                };
                if let Some(expected) = structural::fixed_value(host, descriptor.name) {
                    return if value.as_str() == Some(expected) {
                        Ok(None)
                    } else {
                        Err(Error::FixedAttribute {
                            host,
                            attribute: descriptor.name,
                            expected,
                            actual: value.to_string(),
                        })
                    };
                }
                let differs_from_default = descriptor.default_typed().as_ref() != Some(value);
                let differs_from_inherited = self
                    .document
                    .inherited_value(node, descriptor.name)
                    .is_some_and(|inherited| &inherited != value);
                Ok((differs_from_default || differs_from_inherited).then(|| value.clone()))
            }
        }
    }

    fn has_content(&self, node: NodeId) -> bool {
        let document = self.document;
        document.children(node).next().is_some()
            || document.text(node).is_some_and(|t| !t.is_empty())
            || (self.settings.include_extensions && document.extensions(node).elements().next().is_some())
    }

    /// Writes a node. `flat` is set once output is inside unindented content;
    /// `outermost` adds the namespace declarations.
    fn write_node<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        node: NodeId,
        flat: bool,
        outermost: bool,
    ) -> Result<()> {
        let document = self.document;
        let kind = document.kind(node);
        if kind.is_character_data() {
            return self.write_leaf(xml, node, kind);
        }

        let metadata = document.metadata(node);
        let name = self.element_name(metadata.descriptor.wire);
        let mut start = BytesStart::new(name.as_str());
        if outermost {
            for (prefix, uri) in self.namespaces.declarations() {
                match prefix {
                    Some(prefix) => start.push_attribute((format!("xmlns:{}", prefix).as_str(), uri.as_str())),
                    None => start.push_attribute(("xmlns", uri.as_str())),
                }
            }
        }
        for (descriptor, value) in self.native_attributes(node, &metadata)? {
            start.push_attribute((descriptor.wire.to_string().as_str(), value.to_string().as_str()));
        }
        if self.settings.include_extensions {
            for attribute in document.extensions(node).attributes() {
                let key = self.namespaces.qualified(&attribute.name);
                start.push_attribute((key.as_str(), attribute.value.as_str()));
            }
        }
        self.elements += 1;
        trace!(element = %name, "writing element");

        if !self.has_content(node) {
            xml.write_event(Event::Empty(start))?;
            return Ok(());
        }
        xml.write_event(Event::Start(start))?;

        let keep_whitespace = metadata.descriptor.content.is_mixed() || document.text(node).is_some();
        if keep_whitespace && !flat {
            let mut inner = XmlWriter::new(Vec::new());
            self.write_content(&mut inner, node, &metadata, true)?;
            let rendered = String::from_utf8(inner.into_inner())?;
            xml.write_event(Event::Text(BytesText::from_escaped(rendered)))?;
        } else {
            self.write_content(xml, node, &metadata, flat)?;
        }

        xml.write_event(Event::End(BytesEnd::new(name.as_str())))?;
        Ok(())
    }

    /// Children, text and extension elements in declared order.
    fn write_content<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        node: NodeId,
        metadata: &TypeMetadata,
        flat: bool,
    ) -> Result<()> {
        let document = self.document;
        let lists = &document.node(node).lists;
        let include_extensions = self.settings.include_extensions;
        let mut extensions_written = false;

        for group in metadata.output_order() {
            for index in &group.slots {
                for child in &lists[*index] {
                    self.write_node(xml, *child, flat, false)?;
                }
            }
            if group.text
                && let Some(text) = document.text(node)
                && !text.is_empty()
            {
                xml.write_event(Event::Text(BytesText::new(text)))?;
            }
            if group.extensions && include_extensions {
                self.write_extensions(xml, node, flat)?;
                extensions_written = true;
            }
        }
        if include_extensions && !extensions_written {
            self.write_extensions(xml, node, flat)?;
        }
        Ok(())
    }

    fn write_extensions<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        node: NodeId,
        flat: bool,
    ) -> Result<()> {
        let document = self.document;
        for element in document.extensions(node).elements() {
            self.write_extension_element(xml, element, flat)?;
        }
        Ok(())
    }

    fn write_extension_element<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        element: &ExtensionElement,
        flat: bool,
    ) -> Result<()> {
        let name = self.namespaces.qualified(&element.name);
        let mut start = BytesStart::new(name.as_str());

        // Unprefixed names rely on the default namespace in scope.
        let outer_default = self.default_namespace.clone();
        match element.name.namespace() {
            None if self.default_namespace.is_some() => {
                start.push_attribute(("xmlns", ""));
                self.default_namespace = None;
            }
            Some(uri)
                if self.namespaces.prefix_of(uri) == Some(None)
                    && self.default_namespace.as_deref() != Some(uri) =>
            {
                start.push_attribute(("xmlns", uri));
                self.default_namespace = Some(uri.to_string());
            }
            _ => {}
        }
        for attribute in &element.attributes {
            let key = self.namespaces.qualified(&attribute.name);
            start.push_attribute((key.as_str(), attribute.value.as_str()));
        }

        let result = self.write_extension_body(xml, element, start, &name, flat);
        self.default_namespace = outer_default;
        result
    }

    fn write_extension_body<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        element: &ExtensionElement,
        start: BytesStart<'_>,
        name: &str,
        flat: bool,
    ) -> Result<()> {
        if element.children.is_empty() {
            xml.write_event(Event::Empty(start))?;
            return Ok(());
        }
        xml.write_event(Event::Start(start))?;

        let has_text = element
            .children
            .iter()
            .any(|c| matches!(c, ExtensionContent::Text(_)));
        if has_text && !flat {
            let mut inner = XmlWriter::new(Vec::new());
            self.write_extension_children(&mut inner, element, true)?;
            let rendered = String::from_utf8(inner.into_inner())?;
            xml.write_event(Event::Text(BytesText::from_escaped(rendered)))?;
        } else {
            self.write_extension_children(xml, element, flat)?;
        }

        xml.write_event(Event::End(BytesEnd::new(name)))?;
        Ok(())
    }

    fn write_extension_children<W: Write>(
        &mut self,
        xml: &mut XmlWriter<W>,
        element: &ExtensionElement,
        flat: bool,
    ) -> Result<()> {
        for child in &element.children {
            match child {
                ExtensionContent::Text(text) => {
                    xml.write_event(Event::Text(BytesText::new(text)))?;
                }
                ExtensionContent::Element(inner) => {
                    self.write_extension_element(xml, inner, flat)?;
                }
            }
        }
        Ok(())
    }

    fn write_leaf<W: Write>(&mut self, xml: &mut XmlWriter<W>, node: NodeId, kind: NodeKind) -> Result<()> {
        let text = self.document.text(node).unwrap_or_default();
        match kind {
            NodeKind::Text => xml.write_event(Event::Text(BytesText::new(text)))?,
            NodeKind::CData => {
                // `]]>` cannot appear inside one section; split it across two.
                let mut rest = text;
                while let Some(pos) = rest.find("]]>") {
                    xml.write_event(Event::CData(BytesCData::new(&rest[..pos + 2])))?;
                    rest = &rest[pos + 2..];
                }
                xml.write_event(Event::CData(BytesCData::new(rest)))?
            }
            NodeKind::Comment => xml.write_event(Event::Comment(BytesText::from_escaped(text)))?,
            NodeKind::ProcessingInstruction => xml.write_event(Event::PI(BytesPI::new(text)))?,
            _ => {
                return Err(Error::invalid_argument(format!(
                    "{} is not a character data kind",
                    kind
                )));
            }
        }
        Ok(())
    }
}
