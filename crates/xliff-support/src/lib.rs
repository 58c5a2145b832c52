//! Lexical checkers for the value spaces used by XLIFF attributes.
//!
//! The object model stores every attribute through a converter; converters
//! call into this crate to decide whether a raw string is an acceptable
//! identifier, language tag or IRI before it reaches a document.

use std::sync::LazyLock;

use regex::Regex;

const NAME_START: &str = r"A-Za-z_\x{C0}-\x{D6}\x{D8}-\x{F6}\x{F8}-\x{2FF}\x{370}-\x{37D}\x{37F}-\x{1FFF}\x{200C}-\x{200D}\x{2070}-\x{218F}\x{2C00}-\x{2FEF}\x{3001}-\x{D7FF}\x{F900}-\x{FDCF}\x{FDF0}-\x{FFFD}\x{10000}-\x{EFFFF}";
const NAME_REST: &str = r"\-.0-9\x{B7}\x{300}-\x{36F}\x{203F}-\x{2040}";

static NMTOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[{NAME_START}:{NAME_REST}]+$")).expect("NMTOKEN pattern is valid")
});

static NCNAME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!("^[{NAME_START}][{NAME_START}{NAME_REST}]*$"))
        .expect("NCName pattern is valid")
});

// Approximates BCP 47: a primary subtag plus any number of alphanumeric
// subtags. Subtags are not checked against the registry.
static LANGUAGE_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z]{1,8}(-[A-Za-z0-9]{1,8})*$").expect("language tag pattern is valid")
});

static HEX_CODE_POINT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9A-Fa-f]{1,6}$").expect("hex pattern is valid"));

/// Returns true when `value` matches the XML `NMTOKEN` production.
///
/// XLIFF identifiers (`id`, `startRef`, `dataRef`, ...) are NMTOKENs.
pub fn is_nmtoken(value: &str) -> bool {
    NMTOKEN.is_match(value)
}

/// Returns true when `value` matches the XML Namespaces `NCName` production.
///
/// Used for element local names and namespace prefixes.
pub fn is_ncname(value: &str) -> bool {
    NCNAME.is_match(value)
}

/// Returns true when `value` looks like a BCP 47 language tag (`en`, `en-US`, `zh-Hant-TW`).
pub fn is_language_tag(value: &str) -> bool {
    LANGUAGE_TAG.is_match(value)
}

/// Returns true when `value` can be used as an IRI reference.
///
/// Empty references are allowed (same-document references).
pub fn is_iri(value: &str) -> bool {
    !value.chars().any(|c| {
        c.is_whitespace()
            || c.is_control()
            || matches!(c, '<' | '>' | '"' | '{' | '}' | '|' | '\\' | '^' | '`')
    })
}

/// Parses the hexadecimal code point carried by `<cp hex="..."/>`.
///
/// Returns `None` if the text is not hexadecimal or lies outside the Unicode range.
pub fn parse_hex_code_point(value: &str) -> Option<u32> {
    if !HEX_CODE_POINT.is_match(value) {
        return None;
    }
    u32::from_str_radix(value, 16)
        .ok()
        .filter(|cp| *cp <= 0x10FFFF)
}

/// Returns true when `c` may appear literally in an XML 1.0 document.
pub fn is_xml_char(c: char) -> bool {
    matches!(
        c as u32,
        0x9 | 0xA | 0xD | 0x20..=0xD7FF | 0xE000..=0xFFFD | 0x10000..=0x10FFFF
    )
}

/// Returns true when `value` is a usable namespace URI: non-empty and a valid IRI.
pub fn is_namespace_uri(value: &str) -> bool {
    !value.is_empty() && is_iri(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_nmtoken() {
        assert!(is_nmtoken("u1"));
        assert!(is_nmtoken("1"));
        assert!(is_nmtoken("seg-1.a"));
        assert!(!is_nmtoken(""));
        assert!(!is_nmtoken("has space"));
        assert!(!is_nmtoken("a/b"));
    }

    #[test]
    fn test_is_ncname() {
        assert!(is_ncname("mda"));
        assert!(is_ncname("_x"));
        assert!(!is_ncname("1abc"));
        assert!(!is_ncname("a:b"));
        assert!(!is_ncname(""));
    }

    #[test]
    fn test_is_language_tag() {
        assert!(is_language_tag("en"));
        assert!(is_language_tag("en-us"));
        assert!(is_language_tag("zh-Hant-TW"));
        assert!(!is_language_tag("en_US"));
        assert!(!is_language_tag(""));
        assert!(!is_language_tag("toolongprimary"));
    }

    #[test]
    fn test_is_iri() {
        assert!(is_iri("http://example.com/a?b=c#d"));
        assert!(is_iri("#m1"));
        assert!(is_iri(""));
        assert!(!is_iri("has space"));
        assert!(!is_iri("a<b"));
    }

    #[test]
    fn test_parse_hex_code_point() {
        assert_eq!(parse_hex_code_point("0001"), Some(1));
        assert_eq!(parse_hex_code_point("FFFD"), Some(0xFFFD));
        assert_eq!(parse_hex_code_point("110000"), None);
        assert_eq!(parse_hex_code_point("xyz"), None);
    }

    #[test]
    fn test_is_xml_char() {
        assert!(is_xml_char('a'));
        assert!(is_xml_char('\n'));
        assert!(!is_xml_char('\u{1}'));
    }
}
