use std::collections::HashMap;
use std::sync::Arc;

use tracing::trace;

use super::attributes::AttributeSlot;
use super::extension::ExtensionBag;
use super::{NodeId, NodeKind};
use crate::error::{Error, Result};
use crate::metadata::{ContentModel, Registry, Slot, TypeMetadata};

#[derive(Debug, Clone)]
pub(crate) struct NodeData {
    pub(crate) kind: NodeKind,
    pub(crate) parent: Option<NodeId>,
    pub(crate) attributes: HashMap<&'static str, AttributeSlot>,
    /// One list per declared slot, aligned with the descriptor's slot order.
    pub(crate) lists: Vec<Vec<NodeId>>,
    pub(crate) text: Option<String>,
    pub(crate) extensions: ExtensionBag,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        let metadata = Registry::resolve(kind);
        Self {
            kind,
            parent: None,
            attributes: HashMap::new(),
            lists: vec![Vec::new(); metadata.descriptor.slots.len()],
            text: None,
            extensions: ExtensionBag::default(),
        }
    }
}

/// An XLIFF document: an arena of nodes plus the synthetic document node.
///
/// Every method taking a [`NodeId`] expects a handle created by this
/// document and panics otherwise, like slice indexing.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// Creates an empty document holding only the synthetic document node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData::new(NodeKind::Document)],
        }
    }

    /// Creates a document with an `xliff` root carrying `version="2.0"` and `srcLang`.
    pub fn with_root(source_language: &str) -> Result<(Self, NodeId)> {
        let mut document = Self::new();
        let root = document.create(NodeKind::Xliff);
        document.set_attribute(root, "version", "2.0")?;
        document.set_attribute(root, "srcLang", source_language)?;
        document.append(document.document_node(), root)?;
        Ok((document, root))
    }

    /// The synthetic node owning the root element.
    pub fn document_node(&self) -> NodeId {
        NodeId::new(0)
    }

    /// The `xliff` root element, if attached.
    pub fn root(&self) -> Option<NodeId> {
        self.list(self.document_node(), Slot::Root).first().copied()
    }

    /// Creates a detached node of `kind` with no attributes set.
    pub fn create(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    /// Creates a detached character-data leaf (`Text`, `CData`, `Comment`
    /// or `ProcessingInstruction`).
    pub fn create_leaf(&mut self, kind: NodeKind, text: impl Into<String>) -> Result<NodeId> {
        if !kind.is_character_data() {
            return Err(Error::invalid_argument(format!(
                "{} is not a character data kind",
                kind
            )));
        }
        let text = text.into();
        check_character_data(kind, &text)?;
        let id = self.create(kind);
        self.node_mut(id).text = Some(text);
        Ok(id)
    }

    /// Number of nodes in the arena, including detached ones.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the arena holds only the document node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Returns true if `id` belongs to this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    pub(crate) fn node(&self, id: NodeId) -> &NodeData {
        &self.nodes[id.index()]
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut NodeData {
        &mut self.nodes[id.index()]
    }

    pub fn kind(&self, id: NodeId) -> NodeKind {
        self.node(id).kind
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).parent
    }

    pub(crate) fn metadata(&self, id: NodeId) -> Arc<TypeMetadata> {
        Registry::resolve(self.kind(id))
    }

    /// Walks the parent chain, nearest ancestor first.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |current| self.parent(*current))
    }

    /// The nearest ancestor of the given kind.
    pub fn ancestor_of_kind(&self, id: NodeId, kind: NodeKind) -> Option<NodeId> {
        self.ancestors(id).find(|a| self.kind(*a) == kind)
    }

    /// The items of one typed list, in insertion order. Empty when the kind
    /// does not declare the slot.
    pub fn list(&self, id: NodeId, slot: Slot) -> &[NodeId] {
        match self.metadata(id).descriptor.slot_index(slot) {
            Some(index) => &self.node(id).lists[index],
            None => &[],
        }
    }

    /// The first item of a typed list.
    pub fn child(&self, id: NodeId, slot: Slot) -> Option<NodeId> {
        self.list(id, slot).first().copied()
    }

    /// All children, list by list in declaration order, each in insertion order.
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.node(id).lists.iter().flatten().copied()
    }

    /// Children of a given kind.
    pub fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> impl Iterator<Item = NodeId> + '_ {
        self.children(id).filter(move |c| self.kind(*c) == kind)
    }

    /// Depth-first, pre-order walk of the subtree rooted at `id`, including `id`.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            out.push(current);
            let children: Vec<NodeId> = self.children(current).collect();
            stack.extend(children.into_iter().rev());
        }
        out
    }

    /// Foreign content attached to a node.
    pub fn extensions(&self, id: NodeId) -> &ExtensionBag {
        &self.node(id).extensions
    }

    pub fn extensions_mut(&mut self, id: NodeId) -> &mut ExtensionBag {
        &mut self.node_mut(id).extensions
    }

    fn accepts(metadata: &TypeMetadata, slot: Slot, child: NodeKind) -> bool {
        let descriptor = metadata.descriptor;
        descriptor
            .children
            .iter()
            .any(|c| c.slot == slot && c.kind == child)
            || (slot == Slot::Content && descriptor.content.is_mixed() && child.is_character_data())
    }

    /// The slot that stores `child` kinds under `parent` kinds.
    fn slot_for(metadata: &TypeMetadata, child: NodeKind) -> Option<Slot> {
        metadata
            .descriptor
            .child_for_kind(child)
            .map(|c| c.slot)
            .or_else(|| {
                (metadata.descriptor.content.is_mixed() && child.is_character_data())
                    .then_some(Slot::Content)
            })
    }

    fn check_attach(&self, parent: NodeId, slot: Slot, child: NodeId) -> Result<usize> {
        let child_kind = self.kind(child);
        if self.parent(child).is_some() {
            return Err(Error::NodeReuse { kind: child_kind });
        }
        if child == parent || self.ancestors(parent).any(|a| a == child) {
            return Err(Error::invalid_argument(format!(
                "cannot attach {} below itself",
                child_kind
            )));
        }
        let metadata = self.metadata(parent);
        let host = metadata.kind();
        let index = metadata
            .descriptor
            .slot_index(slot)
            .filter(|_| Self::accepts(&metadata, slot, child_kind))
            .ok_or(Error::ChildNotAllowed {
                host,
                child: child_kind,
                slot,
            })?;
        if metadata.descriptor.slots[index].single && !self.node(parent).lists[index].is_empty() {
            return Err(Error::SlotOccupied { host, slot });
        }
        Ok(index)
    }

    /// Appends `child` to the `slot` list of `parent`.
    pub fn add_child(&mut self, parent: NodeId, slot: Slot, child: NodeId) -> Result<()> {
        let index = self.check_attach(parent, slot, child)?;
        self.node_mut(parent).lists[index].push(child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Appends `child` to whichever list of `parent` stores its kind.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        let metadata = self.metadata(parent);
        let slot = Self::slot_for(&metadata, self.kind(child)).ok_or(Error::ChildNotAllowed {
            host: metadata.kind(),
            child: self.kind(child),
            slot: Slot::Content,
        })?;
        self.add_child(parent, slot, child)
    }

    /// Inserts `child` at `position` in the `slot` list of `parent`.
    pub fn insert_child(
        &mut self,
        parent: NodeId,
        slot: Slot,
        position: usize,
        child: NodeId,
    ) -> Result<()> {
        let index = self.check_attach(parent, slot, child)?;
        let list = &mut self.node_mut(parent).lists[index];
        if position > list.len() {
            return Err(Error::invalid_argument(format!(
                "index {} is out of bounds for a list of {}",
                position,
                list.len()
            )));
        }
        list.insert(position, child);
        self.node_mut(child).parent = Some(parent);
        Ok(())
    }

    /// Detaches `child` from `parent`. Returns false if it was not a child.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> bool {
        let found = self.node(parent).lists.iter().enumerate().find_map(|(index, list)| {
            list.iter()
                .position(|c| *c == child)
                .map(|position| (index, position))
        });
        match found {
            Some((index, position)) => {
                self.node_mut(parent).lists[index].remove(position);
                self.node_mut(child).parent = None;
                true
            }
            None => false,
        }
    }

    /// Detaches `id` from its parent, if any.
    pub fn detach(&mut self, id: NodeId) -> bool {
        match self.parent(id) {
            Some(parent) => self.remove_child(parent, id),
            None => false,
        }
    }

    fn list_index(&self, parent: NodeId, slot: Slot, position: usize) -> Result<usize> {
        let metadata = self.metadata(parent);
        let index = metadata
            .descriptor
            .slot_index(slot)
            .ok_or_else(|| Error::invalid_argument(format!("{} has no {} list", metadata.kind(), slot)))?;
        let len = self.node(parent).lists[index].len();
        if position >= len {
            return Err(Error::invalid_argument(format!(
                "index {} is out of bounds for a list of {}",
                position, len
            )));
        }
        Ok(index)
    }

    /// Removes and returns the item at `position` of a typed list.
    pub fn remove_at(&mut self, parent: NodeId, slot: Slot, position: usize) -> Result<NodeId> {
        let index = self.list_index(parent, slot, position)?;
        let child = self.node_mut(parent).lists[index].remove(position);
        self.node_mut(child).parent = None;
        Ok(child)
    }

    /// Replaces the item at `position`, detaching and returning the previous occupant.
    pub fn set_child_at(
        &mut self,
        parent: NodeId,
        slot: Slot,
        position: usize,
        child: NodeId,
    ) -> Result<NodeId> {
        let index = self.list_index(parent, slot, position)?;
        let previous = self.node(parent).lists[index][position];
        if previous == child {
            return Ok(previous);
        }
        self.node_mut(parent).lists[index].remove(position);
        self.node_mut(previous).parent = None;
        if let Err(e) = self.insert_child(parent, slot, position, child) {
            // Restore the previous occupant so a failed replacement changes nothing.
            self.node_mut(parent).lists[index].insert(position, previous);
            self.node_mut(previous).parent = Some(parent);
            return Err(e);
        }
        Ok(previous)
    }

    /// Stores `child` in the list declared for the wire name under `parent`.
    ///
    /// Returns `Ok(false)` when `parent` declares no such child or the kinds
    /// do not match, leaving the caller free to try extension handling.
    pub fn store_child(
        &mut self,
        parent: NodeId,
        namespace: Option<&str>,
        local: &str,
        child: NodeId,
    ) -> Result<bool> {
        let metadata = self.metadata(parent);
        match metadata.child(namespace, local) {
            Some(descriptor) if descriptor.kind == self.kind(child) => {
                trace!(parent = %metadata.kind(), child = local, "storing child");
                self.add_child(parent, descriptor.slot, child)?;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Sets the text of a node.
    ///
    /// Plain-text nodes and character-data leaves store it directly; mixed
    /// content nodes drop their current content and hold a single text leaf.
    pub fn set_text(&mut self, id: NodeId, text: impl Into<String>) -> Result<()> {
        let kind = self.kind(id);
        let content = self.metadata(id).descriptor.content;
        match content {
            ContentModel::Text { .. } => {
                self.node_mut(id).text = Some(text.into());
                Ok(())
            }
            ContentModel::Mixed { .. } => {
                let items: Vec<NodeId> = self.list(id, Slot::Content).to_vec();
                for item in items {
                    self.remove_child(id, item);
                }
                let leaf = self.create_leaf(NodeKind::Text, text)?;
                self.add_child(id, Slot::Content, leaf)
            }
            _ if kind.is_character_data() => {
                let text = text.into();
                check_character_data(kind, &text)?;
                self.node_mut(id).text = Some(text);
                Ok(())
            }
            _ => Err(Error::UnexpectedText { host: kind }),
        }
    }

    /// Appends text, merging with a trailing text leaf in mixed content.
    pub fn append_text(&mut self, id: NodeId, text: &str) -> Result<()> {
        let kind = self.kind(id);
        match self.metadata(id).descriptor.content {
            ContentModel::Text { .. } => {
                self.node_mut(id)
                    .text
                    .get_or_insert_with(String::new)
                    .push_str(text);
                Ok(())
            }
            ContentModel::Mixed { .. } => {
                if let Some(last) = self.list(id, Slot::Content).last().copied()
                    && self.kind(last) == NodeKind::Text
                {
                    self.node_mut(last)
                        .text
                        .get_or_insert_with(String::new)
                        .push_str(text);
                    return Ok(());
                }
                let leaf = self.create_leaf(NodeKind::Text, text)?;
                self.add_child(id, Slot::Content, leaf)
            }
            _ => Err(Error::UnexpectedText { host: kind }),
        }
    }

    /// The text stored on the node itself (plain-text nodes and leaves).
    pub fn text(&self, id: NodeId) -> Option<&str> {
        self.node(id).text.as_deref()
    }

    /// The character data of a subtree, ignoring markup, comments and
    /// processing instructions. `cp` contributes its code point.
    pub fn plain_text(&self, id: NodeId) -> String {
        let mut out = String::new();
        for node in self.descendants(id) {
            match self.kind(node) {
                NodeKind::Comment | NodeKind::ProcessingInstruction => {}
                NodeKind::CodePoint => {
                    if let Some(c) = self
                        .get_attribute(node, "hex")
                        .and_then(|v| v.as_str())
                        .and_then(xliff_om_support::parse_hex_code_point)
                        .and_then(char::from_u32)
                    {
                        out.push(c);
                    }
                }
                _ => {
                    if let Some(text) = self.text(node) {
                        out.push_str(text);
                    }
                }
            }
        }
        out
    }

    /// Checks the completeness rules of one node: required lists are not
    /// empty, dependencies are satisfied, required attributes are present.
    pub fn check_node(&self, id: NodeId) -> Result<()> {
        let metadata = self.metadata(id);
        for (index, slot) in metadata.descriptor.slots.iter().enumerate() {
            if slot.required && self.node(id).lists[index].is_empty() {
                return Err(Error::MissingChild {
                    host: metadata.kind(),
                    slot: slot.slot,
                });
            }
        }
        super::inheritance::check_attributes(self, id, &metadata)
    }
}

/// Rejects comment and processing instruction content that cannot be written
/// back as well-formed XML.
fn check_character_data(kind: NodeKind, text: &str) -> Result<()> {
    let problem = match kind {
        NodeKind::Comment if text.contains("--") || text.ends_with('-') => {
            "a comment must not contain '--' or end with '-'"
        }
        NodeKind::ProcessingInstruction => {
            let target = text
                .split(|c: char| c.is_ascii_whitespace())
                .next()
                .unwrap_or_default();
            if text.contains("?>") {
                "a processing instruction must not contain '?>'"
            } else if !xliff_om_support::is_ncname(target) || target.eq_ignore_ascii_case("xml") {
                "a processing instruction must start with a target name other than 'xml'"
            } else {
                return Ok(());
            }
        }
        _ => return Ok(()),
    };
    Err(Error::invalid_argument(format!("{:?}: {}", text, problem)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_document_has_no_root() {
        let doc = Document::new();
        assert!(doc.root().is_none());
        assert!(doc.is_empty());
        assert_eq!(doc.kind(doc.document_node()), NodeKind::Document);
    }

    #[test]
    fn test_append_infers_slot() {
        let (mut doc, root) = Document::with_root("en").unwrap();
        let file = doc.create(NodeKind::File);
        doc.append(root, file).unwrap();
        let unit = doc.create(NodeKind::Unit);
        doc.append(file, unit).unwrap();
        let notes = doc.create(NodeKind::Notes);
        doc.append(file, notes).unwrap();
        assert_eq!(doc.list(file, Slot::Containers), &[unit]);
        assert_eq!(doc.child(file, Slot::Notes), Some(notes));
        assert_eq!(doc.parent(unit), Some(file));
        assert_eq!(doc.root(), Some(root));
    }

    #[test]
    fn test_single_slot_rejects_second_item() {
        let mut doc = Document::new();
        let segment = doc.create(NodeKind::Segment);
        let first = doc.create(NodeKind::Source);
        let second = doc.create(NodeKind::Source);
        doc.append(segment, first).unwrap();
        let err = doc.append(segment, second).unwrap_err();
        assert!(matches!(err, Error::SlotOccupied { slot: Slot::Source, .. }));
        assert_eq!(doc.parent(second), None);
    }

    #[test]
    fn test_wrong_kind_for_slot() {
        let mut doc = Document::new();
        let unit = doc.create(NodeKind::Unit);
        let note = doc.create(NodeKind::Note);
        let err = doc.add_child(unit, Slot::Subunits, note).unwrap_err();
        assert!(matches!(err, Error::ChildNotAllowed { .. }));
    }

    #[test]
    fn test_cycle_is_rejected() {
        let mut doc = Document::new();
        let group = doc.create(NodeKind::Group);
        let inner = doc.create(NodeKind::Group);
        doc.append(group, inner).unwrap();
        assert!(doc.append(inner, group).is_err());
    }

    #[test]
    fn test_append_text_merges_leaves() {
        let mut doc = Document::new();
        let source = doc.create(NodeKind::Source);
        doc.append_text(source, "Hello ").unwrap();
        doc.append_text(source, "world").unwrap();
        assert_eq!(doc.list(source, Slot::Content).len(), 1);
        let ph = doc.create(NodeKind::Placeholder);
        doc.append(source, ph).unwrap();
        doc.append_text(source, "!").unwrap();
        assert_eq!(doc.list(source, Slot::Content).len(), 3);
        assert_eq!(doc.plain_text(source), "Hello world!");
    }

    #[test]
    fn test_set_text_on_structural_node_fails() {
        let mut doc = Document::new();
        let unit = doc.create(NodeKind::Unit);
        assert!(matches!(
            doc.set_text(unit, "x"),
            Err(Error::UnexpectedText { host: NodeKind::Unit })
        ));
        let note = doc.create(NodeKind::Note);
        doc.set_text(note, "remember").unwrap();
        assert_eq!(doc.text(note), Some("remember"));
    }

    #[test]
    fn test_plain_text_includes_code_points() {
        let mut doc = Document::new();
        let source = doc.create(NodeKind::Source);
        doc.append_text(source, "a").unwrap();
        let cp = doc.create(NodeKind::CodePoint);
        doc.set_attribute(cp, "hex", "0042").unwrap();
        doc.append(source, cp).unwrap();
        let comment = doc.create_leaf(NodeKind::Comment, "ignored").unwrap();
        doc.append(source, comment).unwrap();
        assert_eq!(doc.plain_text(source), "aB");
    }

    #[test]
    fn test_character_data_must_stay_well_formed() {
        let mut doc = Document::new();
        for text in ["a--b", "trailing-"] {
            assert!(matches!(
                doc.create_leaf(NodeKind::Comment, text),
                Err(Error::InvalidArgument { .. })
            ));
        }
        for text in ["tool a?>b", "", " tool", "xml version"] {
            assert!(matches!(
                doc.create_leaf(NodeKind::ProcessingInstruction, text),
                Err(Error::InvalidArgument { .. })
            ));
        }

        let comment = doc.create_leaf(NodeKind::Comment, " a - b ").unwrap();
        assert!(matches!(doc.set_text(comment, "a--b"), Err(Error::InvalidArgument { .. })));
        assert_eq!(doc.text(comment), Some(" a - b "));
        let pi = doc.create_leaf(NodeKind::ProcessingInstruction, "tool hint").unwrap();
        assert!(matches!(doc.set_text(pi, "tool ?>"), Err(Error::InvalidArgument { .. })));
        doc.set_text(pi, "tool other").unwrap();
        assert_eq!(doc.text(pi), Some("tool other"));

        // CDATA and plain text carry no such restriction.
        assert!(doc.create_leaf(NodeKind::CData, "a]]>b").is_ok());
        assert!(doc.create_leaf(NodeKind::Text, "a--b?>").is_ok());
    }

    #[test]
    fn test_check_node_reports_missing_child() {
        let mut doc = Document::new();
        let notes = doc.create(NodeKind::Notes);
        assert!(matches!(
            doc.check_node(notes),
            Err(Error::MissingChild { host: NodeKind::Notes, .. })
        ));
        let note = doc.create(NodeKind::Note);
        doc.append(notes, note).unwrap();
        assert!(doc.check_node(notes).is_ok());
    }
}
