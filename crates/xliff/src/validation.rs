//! Semantic validation.
//!
//! Validators inspect a fully built document. The reader runs them after
//! the tree is complete, the writer before anything is emitted. Each
//! violation carries a stable numeric code:
//!
//! | Code | Rule |
//! |------|------|
//! | 1001 | `file` ids are unique in the document |
//! | 1002 | `group` and `unit` ids are unique within their `file` |
//! | 1003 | `segment` and `ignorable` ids are unique within their `unit` |
//! | 1004 | inline ids are unique among all `source` (or all `target`) content of a unit |
//! | 1005 | every `ec`/`em` `startRef` names an `sc`/`sm` on the same side of the unit |
//! | 1006 | every data reference names a `data` element of the unit |
//! | 1007 | a `target` requires `trgLang` on the root |
//! | 1008 | `xml:lang` of `source`/`target` matches `srcLang`/`trgLang` |

use std::collections::HashSet;
use std::fmt;

use thiserror::Error;

use crate::metadata::Slot;
use crate::node::{Document, NodeId, NodeKind};

/// A semantic violation with a stable code.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("validation error {code}: {message}")]
pub struct ValidationError {
    pub code: u32,
    pub message: String,
}

impl ValidationError {
    pub fn new(code: u32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

/// A pluggable document check.
pub trait Validator: Send + Sync {
    fn validate(&self, document: &Document) -> Result<(), ValidationError>;
}

impl fmt::Debug for dyn Validator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Validator")
    }
}

impl<F> Validator for F
where
    F: Fn(&Document) -> Result<(), ValidationError> + Send + Sync,
{
    fn validate(&self, document: &Document) -> Result<(), ValidationError> {
        self(document)
    }
}

/// The built-in rules listed in the module documentation.
#[derive(Debug, Default, Clone, Copy)]
pub struct StandardValidator;

const INLINE_WITH_ID: &[NodeKind] = &[
    NodeKind::Placeholder,
    NodeKind::SpanningCode,
    NodeKind::StartCode,
    NodeKind::EndCode,
    NodeKind::Marker,
    NodeKind::StartMarker,
];

fn unique<'a>(
    document: &'a Document,
    nodes: impl IntoIterator<Item = NodeId>,
    code: u32,
    scope: &str,
) -> Result<(), ValidationError> {
    let mut seen: HashSet<&'a str> = HashSet::new();
    for node in nodes {
        if let Some(id) = document.id(node)
            && !seen.insert(id)
        {
            return Err(ValidationError::new(
                code,
                format!("duplicate {} id '{}' in {}", document.kind(node), id, scope),
            ));
        }
    }
    Ok(())
}

fn of_kinds<'a>(
    document: &'a Document,
    nodes: &'a [NodeId],
    kinds: &'a [NodeKind],
) -> impl Iterator<Item = NodeId> + 'a {
    nodes
        .iter()
        .copied()
        .filter(move |n| kinds.contains(&document.kind(*n)))
}

fn string_attr<'a>(document: &'a Document, node: NodeId, name: &str) -> Option<&'a str> {
    document.get_attribute(node, name).and_then(|v| v.as_str())
}

impl StandardValidator {
    fn check_unit(&self, document: &Document, unit: NodeId) -> Result<(), ValidationError> {
        let unit_id = document.id(unit).unwrap_or_default();
        unique(
            document,
            document.list(unit, Slot::Subunits).iter().copied(),
            1003,
            &format!("unit '{}'", unit_id),
        )?;

        let subunits = document.list(unit, Slot::Subunits);
        for side in [Slot::Source, Slot::Target] {
            let contents: Vec<NodeId> = subunits
                .iter()
                .filter_map(|s| document.child(*s, side))
                .collect();
            // Inline ids are scoped to one side of the whole unit.
            let inline: Vec<NodeId> = contents
                .iter()
                .flat_map(|c| document.descendants(*c))
                .filter(|n| INLINE_WITH_ID.contains(&document.kind(*n)))
                .collect();
            unique(
                document,
                inline.iter().copied(),
                1004,
                &format!("the {} side of unit '{}'", side, unit_id),
            )?;
            let starts: HashSet<&str> = inline
                .iter()
                .filter(|n| matches!(document.kind(**n), NodeKind::StartCode | NodeKind::StartMarker))
                .filter_map(|n| document.id(*n))
                .collect();
            for node in contents.iter().flat_map(|c| document.descendants(*c)) {
                if !matches!(document.kind(node), NodeKind::EndCode | NodeKind::EndMarker) {
                    continue;
                }
                if let Some(start_ref) = string_attr(document, node, "startRef")
                    && !starts.contains(start_ref)
                {
                    return Err(ValidationError::new(
                        1005,
                        format!(
                            "{} startRef '{}' has no matching start in unit '{}'",
                            document.kind(node),
                            start_ref,
                            unit_id
                        ),
                    ));
                }
            }
        }

        let data_ids: HashSet<&str> = document
            .child(unit, Slot::OriginalData)
            .map(|original| {
                document
                    .list(original, Slot::Items)
                    .iter()
                    .filter_map(|d| document.id(*d))
                    .collect()
            })
            .unwrap_or_default();
        for node in document.descendants(unit) {
            for name in ["dataRef", "dataRefStart", "dataRefEnd"] {
                if let Some(reference) = string_attr(document, node, name)
                    && !data_ids.contains(reference)
                {
                    return Err(ValidationError::new(
                        1006,
                        format!(
                            "{} {} '{}' is not defined in unit '{}'",
                            document.kind(node),
                            name,
                            reference,
                            unit_id
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Validator for StandardValidator {
    fn validate(&self, document: &Document) -> Result<(), ValidationError> {
        let Some(root) = document.root() else {
            return Ok(());
        };
        let files = document.list(root, Slot::Files);
        unique(document, files.iter().copied(), 1001, "the document")?;

        let src_lang = string_attr(document, root, "srcLang");
        let trg_lang = string_attr(document, root, "trgLang");

        for file in files {
            let file_id = document.id(*file).unwrap_or_default();
            let nodes = document.descendants(*file);
            unique(
                document,
                of_kinds(document, &nodes, &[NodeKind::Group, NodeKind::Unit]),
                1002,
                &format!("file '{}'", file_id),
            )?;
            for unit in of_kinds(document, &nodes, &[NodeKind::Unit]) {
                self.check_unit(document, unit)?;
            }
            for node in of_kinds(document, &nodes, &[NodeKind::Source, NodeKind::Target]) {
                let (expected, attribute) = match document.kind(node) {
                    NodeKind::Source => (src_lang, "srcLang"),
                    _ => (trg_lang, "trgLang"),
                };
                if document.kind(node) == NodeKind::Target && trg_lang.is_none() {
                    return Err(ValidationError::new(
                        1007,
                        format!("file '{}' has a target but the document declares no trgLang", file_id),
                    ));
                }
                if let Some(lang) = string_attr(document, node, "lang")
                    && expected.is_some_and(|e| !e.eq_ignore_ascii_case(lang))
                {
                    return Err(ValidationError::new(
                        1008,
                        format!(
                            "{} xml:lang '{}' does not match {} in file '{}'",
                            document.kind(node),
                            lang,
                            attribute,
                            file_id
                        ),
                    ));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A root with one file holding one unit with one segment.
    fn skeleton() -> (Document, NodeId, NodeId, NodeId) {
        let (mut doc, root) = Document::with_root("en").unwrap();
        let file = doc.create(NodeKind::File);
        doc.set_attribute(file, "id", "f1").unwrap();
        doc.append(root, file).unwrap();
        let unit = doc.create(NodeKind::Unit);
        doc.set_attribute(unit, "id", "u1").unwrap();
        doc.append(file, unit).unwrap();
        let segment = doc.create(NodeKind::Segment);
        doc.append(unit, segment).unwrap();
        let source = doc.create(NodeKind::Source);
        doc.append(segment, source).unwrap();
        (doc, file, unit, source)
    }

    fn code(doc: &Document) -> Option<u32> {
        StandardValidator.validate(doc).err().map(|e| e.code)
    }

    #[test]
    fn test_valid_document() {
        let (doc, ..) = skeleton();
        assert_eq!(code(&doc), None);
        assert!(StandardValidator.validate(&Document::new()).is_ok());
    }

    #[test]
    fn test_unit_ids_are_scoped_to_their_file() {
        let (mut doc, file, ..) = skeleton();
        let group = doc.create(NodeKind::Group);
        doc.set_attribute(group, "id", "g1").unwrap();
        doc.append(file, group).unwrap();
        let nested = doc.create(NodeKind::Unit);
        doc.set_attribute(nested, "id", "u1").unwrap();
        doc.append(group, nested).unwrap();
        assert_eq!(code(&doc), Some(1002));

        doc.set_attribute(nested, "id", "u2").unwrap();
        assert_eq!(code(&doc), None);

        let root = doc.root().unwrap();
        let second = doc.create(NodeKind::File);
        doc.set_attribute(second, "id", "f2").unwrap();
        doc.append(root, second).unwrap();
        let unit = doc.create(NodeKind::Unit);
        doc.set_attribute(unit, "id", "u1").unwrap();
        doc.append(second, unit).unwrap();
        assert_eq!(code(&doc), None);
    }

    #[test]
    fn test_markers_need_matching_start() {
        let (mut doc, _, _, source) = skeleton();
        let sm = doc.create(NodeKind::StartMarker);
        doc.set_attribute(sm, "id", "m1").unwrap();
        doc.append(source, sm).unwrap();
        let em = doc.create(NodeKind::EndMarker);
        doc.set_attribute(em, "startRef", "m1").unwrap();
        doc.append(source, em).unwrap();
        assert_eq!(code(&doc), None);

        doc.set_attribute(em, "startRef", "m2").unwrap();
        let err = StandardValidator.validate(&doc).unwrap_err();
        assert_eq!(err.code, 1005);
        assert!(err.message.contains("m2"), "{}", err);
    }

    #[test]
    fn test_start_on_other_side_does_not_count() {
        let (mut doc, _, unit, source) = skeleton();
        doc.set_attribute(doc.root().unwrap(), "trgLang", "de").unwrap();
        let sc = doc.create(NodeKind::StartCode);
        doc.set_attribute(sc, "id", "1").unwrap();
        doc.append(source, sc).unwrap();
        let segment = doc.list(unit, Slot::Subunits)[0];
        let target = doc.create(NodeKind::Target);
        doc.append(segment, target).unwrap();
        let ec = doc.create(NodeKind::EndCode);
        doc.set_attribute(ec, "startRef", "1").unwrap();
        doc.append(target, ec).unwrap();
        assert_eq!(code(&doc), Some(1005));
    }

    #[test]
    fn test_inline_ids_span_segments() {
        let (mut doc, _, unit, source) = skeleton();
        doc.set_attribute(doc.root().unwrap(), "trgLang", "de").unwrap();
        let ph = doc.create(NodeKind::Placeholder);
        doc.set_attribute(ph, "id", "1").unwrap();
        doc.append(source, ph).unwrap();

        // The same id on the target side is expected.
        let first = doc.list(unit, Slot::Subunits)[0];
        let target = doc.create(NodeKind::Target);
        doc.append(first, target).unwrap();
        let twin = doc.create(NodeKind::Placeholder);
        doc.set_attribute(twin, "id", "1").unwrap();
        doc.append(target, twin).unwrap();
        assert_eq!(code(&doc), None);

        let second = doc.create(NodeKind::Segment);
        doc.append(unit, second).unwrap();
        let other = doc.create(NodeKind::Source);
        doc.append(second, other).unwrap();
        let clash = doc.create(NodeKind::Placeholder);
        doc.set_attribute(clash, "id", "1").unwrap();
        doc.append(other, clash).unwrap();
        let err = StandardValidator.validate(&doc).unwrap_err();
        assert_eq!(err.code, 1004);
        assert!(err.message.contains("u1"), "{}", err);

        doc.set_attribute(clash, "id", "2").unwrap();
        assert_eq!(code(&doc), None);
    }

    #[test]
    fn test_data_references() {
        let (mut doc, _, unit, source) = skeleton();
        let ph = doc.create(NodeKind::Placeholder);
        doc.set_attribute(ph, "id", "1").unwrap();
        doc.set_attribute(ph, "dataRef", "d1").unwrap();
        doc.append(source, ph).unwrap();
        assert_eq!(code(&doc), Some(1006));

        let original = doc.create(NodeKind::OriginalData);
        doc.append(unit, original).unwrap();
        let data = doc.create(NodeKind::Data);
        doc.set_attribute(data, "id", "d1").unwrap();
        doc.append(original, data).unwrap();
        assert_eq!(code(&doc), None);
    }

    #[test]
    fn test_language_checks() {
        let (mut doc, _, unit, source) = skeleton();
        doc.set_attribute(source, "lang", "EN").unwrap();
        assert_eq!(code(&doc), None);
        doc.set_attribute(source, "lang", "de").unwrap();
        assert_eq!(code(&doc), Some(1008));
        doc.clear_attribute(source, "lang").unwrap();

        let segment = doc.list(unit, Slot::Subunits)[0];
        let target = doc.create(NodeKind::Target);
        doc.append(segment, target).unwrap();
        assert_eq!(code(&doc), Some(1007));
        doc.set_attribute(doc.root().unwrap(), "trgLang", "de").unwrap();
        assert_eq!(code(&doc), None);
    }

    #[test]
    fn test_closure_validator() {
        let (doc, ..) = skeleton();
        let always =
            |_: &Document| -> Result<(), ValidationError> { Err(ValidationError::new(9000, "custom")) };
        let validator: &dyn Validator = &always;
        let err = validator.validate(&doc).unwrap_err();
        assert_eq!(err.to_string(), "validation error 9000: custom");
    }
}
