//! Typed attribute values and their converters.
//!
//! Attribute slots never hold raw strings: every value goes through an
//! [`AttributeType`], which both parses the wire form and checks values set
//! programmatically. The canonical wire form is produced by `Display`.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveDateTime};

/// `xs:dateTime` without a timezone.
const LOCAL_DATE_TIME: &str = "%Y-%m-%dT%H:%M:%S%.f";

/// A converted attribute value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttributeValue {
    /// Free text, identifiers, language tags and IRIs.
    Text(String),
    /// `yes` / `no`.
    Bool(bool),
    /// Bounded integers such as note priority.
    Integer(i64),
    /// One member of a closed enumeration.
    Enum(&'static str),
    /// `xs:dateTime` values used by change tracking.
    DateTime(DateTime<FixedOffset>),
    /// `xs:dateTime` written without a timezone.
    LocalDateTime(NaiveDateTime),
}

impl AttributeValue {
    /// Returns the value as a string slice when it is textual or enumerated.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            AttributeValue::Text(s) => Some(s),
            AttributeValue::Enum(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the boolean value, if this is a boolean.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            AttributeValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns the integer value, if this is an integer.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            AttributeValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Returns the timestamp, if this is a date-time.
    pub fn as_date_time(&self) -> Option<&DateTime<FixedOffset>> {
        match self {
            AttributeValue::DateTime(dt) => Some(dt),
            _ => None,
        }
    }

    /// Returns the timestamp without timezone, if this is a local date-time.
    pub fn as_local_date_time(&self) -> Option<&NaiveDateTime> {
        match self {
            AttributeValue::LocalDateTime(dt) => Some(dt),
            _ => None,
        }
    }
}

impl fmt::Display for AttributeValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttributeValue::Text(s) => f.write_str(s),
            AttributeValue::Bool(true) => f.write_str("yes"),
            AttributeValue::Bool(false) => f.write_str("no"),
            AttributeValue::Integer(i) => write!(f, "{}", i),
            AttributeValue::Enum(s) => f.write_str(s),
            AttributeValue::DateTime(dt) => f.write_str(&dt.to_rfc3339()),
            AttributeValue::LocalDateTime(dt) => write!(f, "{}", dt.format(LOCAL_DATE_TIME)),
        }
    }
}

impl From<&str> for AttributeValue {
    fn from(value: &str) -> Self {
        AttributeValue::Text(value.to_string())
    }
}

impl From<String> for AttributeValue {
    fn from(value: String) -> Self {
        AttributeValue::Text(value)
    }
}

impl From<bool> for AttributeValue {
    fn from(value: bool) -> Self {
        AttributeValue::Bool(value)
    }
}

impl From<i64> for AttributeValue {
    fn from(value: i64) -> Self {
        AttributeValue::Integer(value)
    }
}

impl From<DateTime<FixedOffset>> for AttributeValue {
    fn from(value: DateTime<FixedOffset>) -> Self {
        AttributeValue::DateTime(value)
    }
}

impl From<NaiveDateTime> for AttributeValue {
    fn from(value: NaiveDateTime) -> Self {
        AttributeValue::LocalDateTime(value)
    }
}

/// The converter attached to an attribute descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeType {
    /// Any string.
    String,
    /// An XML `NMTOKEN` (`id`, `startRef`, `dataRef`, ...).
    Identifier,
    /// A BCP 47 language tag.
    Language,
    /// An IRI reference.
    Iri,
    /// `yes` / `no`.
    Bool,
    /// An integer within an inclusive range.
    Integer { min: i64, max: i64 },
    /// A closed set of tokens.
    Enum(&'static [&'static str]),
    /// An `xs:dateTime`, with or without a timezone.
    DateTime,
    /// A hexadecimal Unicode code point (stored as text).
    HexCodePoint,
}

impl AttributeType {
    /// Converts a wire string into a typed value.
    ///
    /// The error string describes why the value was rejected; callers wrap it
    /// into [`crate::Error::InvalidValue`] with the attribute and host.
    pub fn parse(&self, raw: &str) -> Result<AttributeValue, String> {
        match self {
            AttributeType::String => Ok(AttributeValue::Text(raw.to_string())),
            AttributeType::Identifier => {
                if xliff_om_support::is_nmtoken(raw) {
                    Ok(AttributeValue::Text(raw.to_string()))
                } else {
                    Err("not a valid identifier token".to_string())
                }
            }
            AttributeType::Language => {
                if xliff_om_support::is_language_tag(raw) {
                    Ok(AttributeValue::Text(raw.to_string()))
                } else {
                    Err("not a valid language tag".to_string())
                }
            }
            AttributeType::Iri => {
                if xliff_om_support::is_iri(raw) {
                    Ok(AttributeValue::Text(raw.to_string()))
                } else {
                    Err("not a valid IRI reference".to_string())
                }
            }
            AttributeType::Bool => match raw {
                "yes" => Ok(AttributeValue::Bool(true)),
                "no" => Ok(AttributeValue::Bool(false)),
                _ => Err("expected 'yes' or 'no'".to_string()),
            },
            AttributeType::Integer { min, max } => {
                let value: i64 = raw
                    .trim()
                    .parse()
                    .map_err(|e| format!("not an integer: {}", e))?;
                if value < *min || value > *max {
                    return Err(format!("must be between {} and {}", min, max));
                }
                Ok(AttributeValue::Integer(value))
            }
            AttributeType::Enum(allowed) => allowed
                .iter()
                .copied()
                .find(|token| *token == raw)
                .map(AttributeValue::Enum)
                .ok_or_else(|| format!("expected one of: {}", allowed.join(", "))),
            AttributeType::DateTime => match DateTime::parse_from_rfc3339(raw) {
                Ok(dt) => Ok(AttributeValue::DateTime(dt)),
                Err(_) => NaiveDateTime::parse_from_str(raw, LOCAL_DATE_TIME)
                    .map(AttributeValue::LocalDateTime)
                    .map_err(|e| format!("not a valid date-time: {}", e)),
            },
            AttributeType::HexCodePoint => match xliff_om_support::parse_hex_code_point(raw) {
                Some(_) => Ok(AttributeValue::Text(raw.to_string())),
                None => Err("not a hexadecimal code point".to_string()),
            },
        }
    }

    /// Checks a value supplied programmatically and normalizes it.
    ///
    /// Text values are accepted for every type and converted through
    /// [`AttributeType::parse`], so `"yes"` is as good as `Bool(true)`.
    pub fn check(&self, value: AttributeValue) -> Result<AttributeValue, String> {
        match (self, value) {
            (_, AttributeValue::Text(raw)) => self.parse(&raw),
            (AttributeType::Bool, v @ AttributeValue::Bool(_)) => Ok(v),
            (AttributeType::Integer { .. }, AttributeValue::Integer(i)) => {
                self.parse(&i.to_string())
            }
            (AttributeType::Enum(_), AttributeValue::Enum(token)) => self.parse(token),
            (AttributeType::DateTime, v @ AttributeValue::DateTime(_)) => Ok(v),
            (AttributeType::DateTime, v @ AttributeValue::LocalDateTime(_)) => Ok(v),
            (ty, v) => Err(format!("a {} value cannot hold {:?}", ty, v)),
        }
    }
}

impl fmt::Display for AttributeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeType::String => "string",
            AttributeType::Identifier => "identifier",
            AttributeType::Language => "language",
            AttributeType::Iri => "IRI",
            AttributeType::Bool => "yes/no",
            AttributeType::Integer { .. } => "integer",
            AttributeType::Enum(_) => "enumerated",
            AttributeType::DateTime => "date-time",
            AttributeType::HexCodePoint => "code point",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATES: &[&str] = &["initial", "translated", "reviewed", "final"];

    #[test]
    fn test_parse_bool() {
        assert_eq!(AttributeType::Bool.parse("yes"), Ok(AttributeValue::Bool(true)));
        assert_eq!(AttributeType::Bool.parse("no"), Ok(AttributeValue::Bool(false)));
        assert!(AttributeType::Bool.parse("true").is_err());
        assert_eq!(AttributeValue::Bool(false).to_string(), "no");
    }

    #[test]
    fn test_parse_integer_range() {
        let priority = AttributeType::Integer { min: 1, max: 10 };
        assert_eq!(priority.parse("3"), Ok(AttributeValue::Integer(3)));
        assert!(priority.parse("0").is_err());
        assert!(priority.parse("11").is_err());
        assert!(priority.parse("high").is_err());
    }

    #[test]
    fn test_parse_enum() {
        let ty = AttributeType::Enum(STATES);
        assert_eq!(ty.parse("final"), Ok(AttributeValue::Enum("final")));
        let err = ty.parse("done").unwrap_err();
        assert!(err.contains("initial"));
    }

    #[test]
    fn test_parse_identifier_and_language() {
        assert!(AttributeType::Identifier.parse("u1").is_ok());
        assert!(AttributeType::Identifier.parse("u 1").is_err());
        assert!(AttributeType::Language.parse("en-US").is_ok());
        assert!(AttributeType::Language.parse("en_US").is_err());
    }

    #[test]
    fn test_date_time_roundtrip() {
        let value = AttributeType::DateTime
            .parse("2024-03-01T10:15:00+02:00")
            .unwrap();
        let again = AttributeType::DateTime.parse(&value.to_string()).unwrap();
        assert_eq!(value, again);
        assert!(AttributeType::DateTime.parse("yesterday").is_err());
    }

    #[test]
    fn test_date_time_without_offset() {
        let value = AttributeType::DateTime.parse("2024-03-01T09:30:00").unwrap();
        assert!(value.as_date_time().is_none());
        assert_eq!(value.to_string(), "2024-03-01T09:30:00");

        let fractional = AttributeType::DateTime
            .parse("2024-03-01T09:30:00.250")
            .unwrap();
        assert_eq!(fractional.to_string(), "2024-03-01T09:30:00.250");
        let local = fractional.as_local_date_time().unwrap();
        assert_eq!(local.and_utc().timestamp_subsec_millis(), 250);

        assert!(AttributeType::DateTime.parse("2024-03-01").is_err());
        assert!(AttributeType::DateTime.parse("2024-03-01T25:00:00").is_err());
    }

    #[test]
    fn test_check_normalizes_text() {
        assert_eq!(
            AttributeType::Bool.check(AttributeValue::from("yes")),
            Ok(AttributeValue::Bool(true))
        );
        assert_eq!(
            AttributeType::Enum(STATES).check(AttributeValue::from("reviewed")),
            Ok(AttributeValue::Enum("reviewed"))
        );
        assert!(AttributeType::Bool.check(AttributeValue::Integer(1)).is_err());
        assert!(
            AttributeType::Integer { min: 1, max: 10 }
                .check(AttributeValue::Integer(42))
                .is_err()
        );
    }

    #[test]
    fn test_hex_code_point() {
        assert!(AttributeType::HexCodePoint.parse("0001").is_ok());
        assert!(AttributeType::HexCodePoint.parse("D800").is_ok());
        assert!(AttributeType::HexCodePoint.parse("zz").is_err());
    }
}
