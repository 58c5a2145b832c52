//! Streaming reader: quick-xml events to a [`Document`].
//!
//! The reader keeps one frame per open element. A frame remembers the node
//! being filled and the highest ordinal group consumed so far, so children
//! that arrive out of the declared order are rejected as they stream in.
//! Completeness checks run when an element closes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;

use quick_xml::Reader as XmlReader;
use quick_xml::errors::IllFormedError;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesStart, Event};
use tracing::{debug, trace, warn};

use super::namespaces::Scopes;
use crate::config::ReaderSettings;
use crate::error::{Error, Result};
use crate::metadata::{ContentModel, Registry, Slot, TypeMetadata};
use crate::names::{self, XmlName, split_qname};
use crate::node::{
    Document, ExtensionAttribute, ExtensionContent, ExtensionElement, ExtensionItem, NodeId,
    NodeKind,
};

/// Deserializes XLIFF 2.0 documents.
///
/// A reader holds no state between calls; each call builds its own frame
/// stack and namespace scopes.
///
/// ```rust
/// use xliff_om::{Reader, ReaderSettings};
///
/// let xml = r#"<xliff xmlns="urn:oasis:names:tc:xliff:document:2.0" version="2.0" srcLang="en-us"/>"#;
/// let document = Reader::new(ReaderSettings::default()).deserialize_str(xml).unwrap();
/// let root = document.root().unwrap();
/// assert_eq!(document.get_attribute(root, "srcLang").and_then(|v| v.as_str()), Some("en-us"));
/// ```
#[derive(Debug, Default)]
pub struct Reader {
    settings: ReaderSettings,
}

impl Reader {
    pub fn new(settings: ReaderSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ReaderSettings {
        &self.settings
    }

    /// Reads a complete document, then runs every configured validator.
    pub fn deserialize<R: BufRead>(&mut self, input: R) -> Result<Document> {
        let mut reader = XmlReader::from_reader(input);
        reader.config_mut().trim_text(false);

        let mut document = Document::new();
        let start = document.document_node();
        let elements = {
            let mut parse = Parse::new(reader, &mut document, &self.settings, Scopes::default(), start);
            parse.run()?;
            parse.elements
        };

        if document.root().is_none() {
            return Err(Error::MissingRoot);
        }
        for validator in &self.settings.validators {
            validator.validate(&document)?;
        }
        debug!(
            elements,
            nodes = document.len(),
            validators = self.settings.validators.len(),
            "deserialized document"
        );
        Ok(document)
    }

    pub fn deserialize_str(&mut self, input: &str) -> Result<Document> {
        self.deserialize(input.as_bytes())
    }

    pub fn deserialize_slice(&mut self, input: &[u8]) -> Result<Document> {
        self.deserialize(input)
    }

    pub fn deserialize_path(&mut self, path: impl AsRef<Path>) -> Result<Document> {
        let file = File::open(path.as_ref())?;
        self.deserialize(BufReader::new(file))
    }

    /// Parses inline content and appends it to a live mixed-content node
    /// (`source`, `target`, `pc`, `mrk` or `data`).
    ///
    /// The core namespace is the default namespace of the fragment and the
    /// module prefixes are pre-bound. Validators do not run. On error the
    /// host is left as it was.
    pub fn deserialize_fragment(
        &mut self,
        document: &mut Document,
        host: NodeId,
        fragment: &str,
    ) -> Result<()> {
        if !document.contains(host) {
            return Err(Error::invalid_argument(format!(
                "node {} does not belong to this document",
                host
            )));
        }
        if !document.metadata(host).descriptor.content.is_mixed() {
            return Err(Error::invalid_argument(format!(
                "{} does not hold inline content",
                document.kind(host)
            )));
        }

        let before = document.list(host, Slot::Content).len();
        let trailing = document
            .list(host, Slot::Content)
            .last()
            .copied()
            .filter(|last| document.kind(*last) == NodeKind::Text)
            .map(|last| (last, document.text(last).map(str::to_string)));

        let mut reader = XmlReader::from_str(fragment);
        reader.config_mut().trim_text(false);
        let result = {
            let mut parse = Parse::new(reader, document, &self.settings, Scopes::for_fragment(), host);
            parse.run().map(|_| parse.elements)
        };

        match result {
            Ok(elements) => {
                trace!(host = %document.kind(host), elements, "deserialized fragment");
                Ok(())
            }
            Err(e) => {
                while document.list(host, Slot::Content).len() > before {
                    let last = document.list(host, Slot::Content).len() - 1;
                    document.remove_at(host, Slot::Content, last)?;
                }
                if let Some((leaf, text)) = trailing {
                    document.node_mut(leaf).text = text;
                }
                Err(e)
            }
        }
    }
}

struct Frame {
    node: NodeId,
    metadata: Arc<TypeMetadata>,
    last_ordinal: u8,
}

/// Attributes of one start tag, split into namespace declarations and the rest.
type Bindings = Vec<(Option<String>, Option<String>)>;
type RawAttributes = Vec<(String, String)>;

/// Per-call parsing state.
struct Parse<'a, R> {
    reader: XmlReader<R>,
    buf: Vec<u8>,
    document: &'a mut Document,
    settings: &'a ReaderSettings,
    scopes: Scopes,
    frames: Vec<Frame>,
    elements: usize,
}

impl<'a, R: BufRead> Parse<'a, R> {
    fn new(
        reader: XmlReader<R>,
        document: &'a mut Document,
        settings: &'a ReaderSettings,
        scopes: Scopes,
        start: NodeId,
    ) -> Self {
        let frame = Frame {
            node: start,
            metadata: document.metadata(start),
            last_ordinal: 0,
        };
        Self {
            reader,
            buf: Vec::new(),
            document,
            settings,
            scopes,
            frames: vec![frame],
            elements: 0,
        }
    }

    fn next_event(&mut self) -> Result<Event<'static>> {
        self.buf.clear();
        let event = self.reader.read_event_into(&mut self.buf)?;
        Ok(event.into_owned())
    }

    fn run(&mut self) -> Result<()> {
        loop {
            match self.next_event()? {
                Event::Start(e) => self.start(&e, false)?,
                Event::Empty(e) => self.start(&e, true)?,
                Event::End(_) => self.end()?,
                Event::Text(t) => self.text(std::str::from_utf8(&t)?)?,
                Event::GeneralRef(r) => {
                    let resolved = resolve_reference(std::str::from_utf8(&r)?)?;
                    self.text(&resolved)?
                }
                Event::CData(c) => self.cdata(std::str::from_utf8(&c)?)?,
                Event::Comment(c) => self.leaf(NodeKind::Comment, std::str::from_utf8(&c)?)?,
                Event::PI(p) => self.leaf(NodeKind::ProcessingInstruction, std::str::from_utf8(&p)?)?,
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => break,
            }
        }
        if self.frames.len() > 1 {
            let open = self.current()?.metadata.kind();
            return Err(missing_end_tag(open.to_string()));
        }
        Ok(())
    }

    fn current(&self) -> Result<&Frame> {
        self.frames
            .last()
            .ok_or_else(|| Error::invalid_argument("reader frame stack is empty"))
    }

    /// Records that content of `ordinal` was consumed by the current frame.
    fn check_order(&mut self, ordinal: u8, name: &str) -> Result<()> {
        let frame = self
            .frames
            .last_mut()
            .ok_or_else(|| Error::invalid_argument("reader frame stack is empty"))?;
        if ordinal < frame.last_ordinal {
            return Err(Error::OutOfOrder {
                name: name.to_string(),
                host: frame.metadata.kind(),
            });
        }
        frame.last_ordinal = ordinal;
        Ok(())
    }

    fn start(&mut self, e: &BytesStart<'_>, empty: bool) -> Result<()> {
        let raw = std::str::from_utf8(e.name().as_ref())?.to_string();
        let (bindings, attributes) = split_attributes(e)?;
        self.scopes.push(bindings);
        let (prefix, local) = split_qname(&raw);
        let namespace = self.scopes.resolve(prefix)?;

        let (parent, metadata) = {
            let frame = self.current()?;
            (frame.node, Arc::clone(&frame.metadata))
        };
        let host = metadata.kind();

        if let Some(child) = metadata.child(namespace.as_deref(), local) {
            self.check_order(child.ordinal, &raw)?;
            let node = Registry::create_element(self.document, namespace.as_deref(), local)
                .ok_or_else(|| Error::UnknownElement {
                    name: raw.clone(),
                    host,
                })?;
            self.read_attributes(node, &attributes)?;
            if !self
                .document
                .store_child(parent, namespace.as_deref(), local, node)?
            {
                return Err(Error::UnknownElement { name: raw, host });
            }
            trace!(element = %raw, parent = %host, "read element");
            self.elements += 1;
            if empty {
                self.scopes.pop();
                self.document.check_node(node)?;
            } else {
                self.frames.push(Frame {
                    node,
                    metadata: self.document.metadata(node),
                    last_ordinal: 0,
                });
            }
            return Ok(());
        }

        let extension_ordinal = metadata.descriptor.extension_ordinal;
        match (namespace, extension_ordinal) {
            (Some(uri), Some(ordinal))
                if self.settings.include_extensions && names::is_foreign(Some(uri.as_str())) =>
            {
                self.check_order(ordinal, &raw)?;
                let settings = self.settings;
                let handler = settings.handlers.handler_for(&uri);
                let name = XmlName::new(prefix, Some(uri.as_str()), local);
                let mut element = handler
                    .create_element(&name)
                    .ok_or_else(|| Error::UnknownElement {
                        name: raw.clone(),
                        host,
                    })?;
                element.attributes = self.extension_attributes(&attributes)?;
                let element = if empty {
                    self.scopes.pop();
                    element
                } else {
                    self.read_extension_content(element)?
                };
                let stored = handler.store(
                    self.document.extensions_mut(parent),
                    &uri,
                    ExtensionItem::Element(element),
                );
                if !stored {
                    return Err(Error::UnknownElement { name: raw, host });
                }
                trace!(namespace = %uri, element = %raw, host = %host, "stored extension element");
                Ok(())
            }
            _ => Err(Error::UnknownElement { name: raw, host }),
        }
    }

    fn read_attributes(&mut self, node: NodeId, attributes: &[(String, String)]) -> Result<()> {
        let metadata = self.document.metadata(node);
        let host = metadata.kind();
        let settings = self.settings;
        for (raw, value) in attributes {
            let (prefix, local) = split_qname(raw);
            // Unprefixed attributes are in no namespace.
            let namespace = match prefix {
                Some(p) => self.scopes.resolve(Some(p))?,
                None => None,
            };

            if let Some(descriptor) = metadata.attribute_by_wire(namespace.as_deref(), local) {
                let typed = descriptor
                    .ty
                    .parse(value)
                    .map_err(|reason| self.document.invalid_value(node, descriptor, value, reason))?;
                self.document.store_attribute(node, descriptor, typed, true);
                continue;
            }

            let stored = match namespace {
                Some(uri)
                    if settings.include_extensions
                        && metadata.descriptor.extension_attributes
                        && names::is_foreign(Some(uri.as_str())) =>
                {
                    let handler = settings.handlers.handler_for(&uri);
                    let name = XmlName::new(prefix, Some(uri.as_str()), local);
                    handler.create_attribute(&name, value).is_some_and(|attribute| {
                        handler.store(
                            self.document.extensions_mut(node),
                            &uri,
                            ExtensionItem::Attribute(attribute),
                        )
                    })
                }
                _ => false,
            };
            if !stored {
                return Err(Error::InvalidAttribute {
                    name: raw.clone(),
                    host,
                });
            }
            trace!(attribute = %raw, host = %host, "stored extension attribute");
        }
        Ok(())
    }

    fn extension_attributes(
        &self,
        attributes: &[(String, String)],
    ) -> Result<Vec<ExtensionAttribute>> {
        attributes
            .iter()
            .map(|(raw, value)| {
                let (prefix, local) = split_qname(raw);
                let namespace = match prefix {
                    Some(p) => self.scopes.resolve(Some(p))?,
                    None => None,
                };
                Ok(ExtensionAttribute::new(
                    XmlName::new(prefix, namespace, local),
                    value.clone(),
                ))
            })
            .collect()
    }

    fn extension_start(&mut self, e: &BytesStart<'_>) -> Result<ExtensionElement> {
        let raw = std::str::from_utf8(e.name().as_ref())?.to_string();
        let (bindings, attributes) = split_attributes(e)?;
        self.scopes.push(bindings);
        let (prefix, local) = split_qname(&raw);
        let namespace = self.scopes.resolve(prefix)?;
        let mut element = ExtensionElement::new(XmlName::new(prefix, namespace, local));
        element.attributes = self.extension_attributes(&attributes)?;
        Ok(element)
    }

    /// Reads the subtree of a foreign element up to and including its end tag.
    fn read_extension_content(&mut self, root: ExtensionElement) -> Result<ExtensionElement> {
        let mut stack = vec![root];
        loop {
            match self.next_event()? {
                Event::Start(e) => {
                    let element = self.extension_start(&e)?;
                    stack.push(element);
                }
                Event::Empty(e) => {
                    let element = self.extension_start(&e)?;
                    self.scopes.pop();
                    if let Some(parent) = stack.last_mut() {
                        parent.children.push(ExtensionContent::Element(element));
                    }
                }
                Event::End(_) => {
                    self.scopes.pop();
                    let Some(mut done) = stack.pop() else {
                        return Err(Error::invalid_argument("extension element stack is empty"));
                    };
                    drop_formatting_whitespace(&mut done);
                    match stack.last_mut() {
                        Some(parent) => parent.children.push(ExtensionContent::Element(done)),
                        None => return Ok(done),
                    }
                }
                Event::Text(t) => push_text(&mut stack, std::str::from_utf8(&t)?),
                Event::GeneralRef(r) => {
                    let resolved = resolve_reference(std::str::from_utf8(&r)?)?;
                    push_text(&mut stack, &resolved)
                }
                Event::CData(c) => push_text(&mut stack, std::str::from_utf8(&c)?),
                Event::Comment(_) | Event::PI(_) => {
                    trace!("dropping comment or processing instruction in extension content")
                }
                Event::Decl(_) | Event::DocType(_) => {}
                Event::Eof => {
                    let open = stack.last().map(|e| e.name.to_string()).unwrap_or_default();
                    return Err(missing_end_tag(open));
                }
            }
        }
    }

    fn end(&mut self) -> Result<()> {
        self.scopes.pop();
        if self.frames.len() <= 1 {
            return Err(Error::invalid_argument("end tag without an open element"));
        }
        if let Some(frame) = self.frames.pop() {
            self.document.check_node(frame.node)?;
        }
        Ok(())
    }

    fn text(&mut self, text: &str) -> Result<()> {
        let (node, metadata) = {
            let frame = self.current()?;
            (frame.node, Arc::clone(&frame.metadata))
        };
        match metadata.descriptor.content {
            ContentModel::Mixed { ordinal } | ContentModel::Text { ordinal } => {
                self.check_order(ordinal, "#text")?;
                self.document.append_text(node, text)
            }
            _ if is_whitespace(text) => Ok(()),
            _ => Err(Error::UnexpectedText {
                host: metadata.kind(),
            }),
        }
    }

    fn cdata(&mut self, text: &str) -> Result<()> {
        let content = self.current()?.metadata.descriptor.content;
        match content {
            ContentModel::Mixed { .. } => self.leaf(NodeKind::CData, text),
            _ => self.text(text),
        }
    }

    /// Comments and processing instructions: kept as leaves in mixed content,
    /// dropped everywhere else.
    fn leaf(&mut self, kind: NodeKind, text: &str) -> Result<()> {
        let (node, metadata) = {
            let frame = self.current()?;
            (frame.node, Arc::clone(&frame.metadata))
        };
        match metadata.descriptor.content {
            ContentModel::Mixed { ordinal } => {
                self.check_order(ordinal, &kind.to_string())?;
                let leaf = self.document.create_leaf(kind, text)?;
                self.document.add_child(node, Slot::Content, leaf)
            }
            _ => {
                warn!(host = %metadata.kind(), "dropping {} outside inline content", kind);
                Ok(())
            }
        }
    }
}

fn split_attributes(e: &BytesStart<'_>) -> Result<(Bindings, RawAttributes)> {
    let mut bindings = Vec::new();
    let mut attributes = Vec::new();
    for attr in e.attributes() {
        let attr = attr.map_err(quick_xml::Error::from)?;
        let key = std::str::from_utf8(attr.key.as_ref())?;
        let value = unescape(std::str::from_utf8(&attr.value)?)?.into_owned();
        if key == "xmlns" {
            bindings.push((None, (!value.is_empty()).then_some(value)));
        } else if let Some(prefix) = key.strip_prefix("xmlns:") {
            if value.is_empty() || !xliff_om_support::is_ncname(prefix) {
                return Err(Error::InvalidName {
                    name: key.to_string(),
                });
            }
            bindings.push((Some(prefix.to_string()), Some(value)));
        } else {
            attributes.push((key.to_string(), value));
        }
    }
    Ok((bindings, attributes))
}

/// Resolves the name of an entity reference (without `&` and `;`).
fn resolve_reference(name: &str) -> Result<String> {
    let code_point = if let Some(hex) = name.strip_prefix("#x") {
        Some(u32::from_str_radix(hex, 16).ok())
    } else {
        name.strip_prefix('#').map(|decimal| decimal.parse::<u32>().ok())
    };
    let resolved = match code_point {
        Some(value) => value
            .and_then(char::from_u32)
            .filter(|c| xliff_om_support::is_xml_char(*c))
            .map(String::from),
        None => resolve_predefined_entity(name).map(str::to_string),
    };
    resolved.ok_or_else(|| Error::UnknownEntity {
        name: name.to_string(),
    })
}

fn is_whitespace(text: &str) -> bool {
    text.bytes().all(|b| matches!(b, b' ' | b'\n' | b'\r' | b'\t'))
}

fn push_text(stack: &mut [ExtensionElement], text: &str) {
    if let Some(current) = stack.last_mut() {
        current.push_text(text);
    }
}

/// Whitespace between the child elements of a foreign element is layout,
/// not content.
fn drop_formatting_whitespace(element: &mut ExtensionElement) {
    if element.elements().next().is_none() {
        return;
    }
    element.children.retain(|child| match child {
        ExtensionContent::Text(text) => !is_whitespace(text),
        ExtensionContent::Element(_) => true,
    });
}

fn missing_end_tag(name: String) -> Error {
    Error::Xml(quick_xml::Error::IllFormed(IllFormedError::MissingEndTag(name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_reference() {
        assert_eq!(resolve_reference("amp").unwrap(), "&");
        assert_eq!(resolve_reference("#x41").unwrap(), "A");
        assert_eq!(resolve_reference("#66").unwrap(), "B");
        assert!(matches!(
            resolve_reference("nbsp"),
            Err(Error::UnknownEntity { name }) if name == "nbsp"
        ));
        assert!(resolve_reference("#x0").is_err());
    }

    #[test]
    fn test_drop_formatting_whitespace() {
        let mut element = ExtensionElement::new(XmlName::qualified("my", "urn:my", "a"));
        element.push_text("\n  ");
        element
            .children
            .push(ExtensionContent::Element(ExtensionElement::new(XmlName::local("b"))));
        element.push_text("\n");
        drop_formatting_whitespace(&mut element);
        assert_eq!(element.children.len(), 1);

        let mut text_only = ExtensionElement::new(XmlName::local("c"));
        text_only.push_text("  ");
        drop_formatting_whitespace(&mut text_only);
        assert_eq!(text_only.children.len(), 1);
    }
}
