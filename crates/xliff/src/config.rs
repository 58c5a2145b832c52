//! Reader and writer settings.
//!
//! The plain-data parts derive serde so they can be loaded from a JSON (or
//! any serde format) configuration file; plug-ins (validators, extension
//! handlers) are attached in code.
//!
//! ```rust
//! use xliff_om::{OutputDetail, WriterSettings};
//!
//! let settings = WriterSettings {
//!     detail: OutputDetail::Full,
//!     indent: false,
//!     ..Default::default()
//! };
//! assert!(settings.validate().is_ok());
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::extension::ExtensionHandlers;
use crate::validation::{StandardValidator, Validator};

/// How aggressively the writer omits attribute values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputDetail {
    /// Only explicitly set values that differ from the default or from what
    /// would be inherited.
    #[default]
    Minimal,
    /// Every explicitly set value.
    Explicit,
    /// Every value that resolves, including defaults and inherited values.
    Full,
}

impl fmt::Display for OutputDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputDetail::Minimal => write!(f, "minimal"),
            OutputDetail::Explicit => write!(f, "explicit"),
            OutputDetail::Full => write!(f, "full"),
        }
    }
}

impl FromStr for OutputDetail {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "minimal" => Ok(OutputDetail::Minimal),
            "explicit" => Ok(OutputDetail::Explicit),
            "full" => Ok(OutputDetail::Full),
            _ => Err(Error::invalid_argument(format!(
                "unknown output detail '{}' (expected minimal, explicit or full)",
                s
            ))),
        }
    }
}

fn standard_validators() -> Vec<Arc<dyn Validator>> {
    vec![Arc::new(StandardValidator)]
}

/// Settings for [`crate::Reader`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReaderSettings {
    /// Keep foreign content in extension bags. When false, foreign elements
    /// are format errors.
    pub include_extensions: bool,

    /// Validators run on the finished document.
    #[serde(skip)]
    pub validators: Vec<Arc<dyn Validator>>,

    /// Extension handlers by namespace.
    #[serde(skip)]
    pub handlers: ExtensionHandlers,
}

impl Default for ReaderSettings {
    fn default() -> Self {
        Self {
            include_extensions: true,
            validators: standard_validators(),
            handlers: ExtensionHandlers::default(),
        }
    }
}

impl fmt::Debug for ReaderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReaderSettings")
            .field("include_extensions", &self.include_extensions)
            .field("validators", &self.validators.len())
            .field("handlers", &self.handlers)
            .finish()
    }
}

impl ReaderSettings {
    pub fn with_extensions(mut self, include: bool) -> Self {
        self.include_extensions = include;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    /// Removes every validator, including the standard one.
    pub fn without_validators(mut self) -> Self {
        self.validators.clear();
        self
    }

    pub fn with_handlers(mut self, handlers: ExtensionHandlers) -> Self {
        self.handlers = handlers;
        self
    }
}

/// Settings for [`crate::Writer`].
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterSettings {
    /// Indent nested elements. Mixed content is never indented.
    pub indent: bool,

    /// One indentation level: a run of a single whitespace character.
    pub indent_chars: String,

    pub detail: OutputDetail,

    /// Write foreign content stored in extension bags.
    pub include_extensions: bool,

    /// Write the `<?xml ...?>` declaration.
    pub include_declaration: bool,

    /// Validators run before anything is written.
    #[serde(skip)]
    pub validators: Vec<Arc<dyn Validator>>,
}

impl Default for WriterSettings {
    fn default() -> Self {
        Self {
            indent: true,
            indent_chars: "  ".to_string(),
            detail: OutputDetail::Minimal,
            include_extensions: true,
            include_declaration: true,
            validators: standard_validators(),
        }
    }
}

impl fmt::Debug for WriterSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WriterSettings")
            .field("indent", &self.indent)
            .field("indent_chars", &self.indent_chars)
            .field("detail", &self.detail)
            .field("include_extensions", &self.include_extensions)
            .field("include_declaration", &self.include_declaration)
            .field("validators", &self.validators.len())
            .finish()
    }
}

impl WriterSettings {
    pub fn with_detail(mut self, detail: OutputDetail) -> Self {
        self.detail = detail;
        self
    }

    pub fn with_indent(mut self, indent: bool) -> Self {
        self.indent = indent;
        self
    }

    pub fn with_indent_chars(mut self, chars: impl Into<String>) -> Self {
        self.indent_chars = chars.into();
        self
    }

    pub fn with_extensions(mut self, include: bool) -> Self {
        self.include_extensions = include;
        self
    }

    pub fn with_declaration(mut self, include: bool) -> Self {
        self.include_declaration = include;
        self
    }

    pub fn with_validator(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validators.push(validator);
        self
    }

    pub fn without_validators(mut self) -> Self {
        self.validators.clear();
        self
    }

    /// Checks that the indentation string is usable.
    pub fn validate(&self) -> Result<()> {
        self.indent_unit().map(|_| ())
    }

    /// The indentation character and its repeat count.
    pub(crate) fn indent_unit(&self) -> Result<(u8, usize)> {
        let bytes = self.indent_chars.as_bytes();
        match bytes.first() {
            None => Ok((b' ', 0)),
            Some(&first)
                if matches!(first, b' ' | b'\t') && bytes.iter().all(|b| *b == first) =>
            {
                Ok((first, bytes.len()))
            }
            Some(_) => Err(Error::invalid_argument(format!(
                "indent_chars must repeat a single space or tab, got {:?}",
                self.indent_chars
            ))),
        }
    }
}
