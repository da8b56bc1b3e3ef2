//! Per-conversion options.
//!
//! Options are typed fields; each [`Conversion`](crate::Conversion) accepts a
//! fixed subset of them and rejects the rest rather than ignoring them.
//!
//! | Key | Type | Used by |
//! |-----|------|---------|
//! | `format` (alias `fmt`) | strftime pattern | `str_to_datetime`, `datetime_to_str` |
//! | `indent` | non-negative integer | `dict_to_json`, `dict_to_xml` |
//! | `encoding` | `utf-8`, `ascii`, `latin-1` | `str_to_base64`, `base64_to_str` |
//! | `root_tag` | XML name | `dict_to_xml` |
//! | `sort_keys` | boolean literal | `dict_to_json`, `dict_to_yaml` |
//! | `collisions` | `overwrite`, `error` | `xml_to_dict` |

use std::fmt;
use std::str::FromStr;

use crate::encoding::TextEncoding;
use crate::error::{ConvertError, Result};
use crate::scalar::str_to_bool;
use crate::xml::CollisionPolicy;

/// Names of the recognized options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OptionKey {
    Format,
    Indent,
    Encoding,
    RootTag,
    SortKeys,
    Collisions,
}

impl OptionKey {
    pub const ALL: [OptionKey; 6] = [
        OptionKey::Format,
        OptionKey::Indent,
        OptionKey::Encoding,
        OptionKey::RootTag,
        OptionKey::SortKeys,
        OptionKey::Collisions,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            OptionKey::Format => "format",
            OptionKey::Indent => "indent",
            OptionKey::Encoding => "encoding",
            OptionKey::RootTag => "root_tag",
            OptionKey::SortKeys => "sort_keys",
            OptionKey::Collisions => "collisions",
        }
    }
}

impl fmt::Display for OptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for OptionKey {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('-', "_");
        if normalized == "fmt" {
            return Ok(OptionKey::Format);
        }
        OptionKey::ALL
            .into_iter()
            .find(|key| key.name() == normalized)
            .ok_or_else(|| ConvertError::invalid_option(s, "unknown option"))
    }
}

/// Options for a single conversion. Unset fields take the conversion's
/// default.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Datetime pattern; defaults to `%Y-%m-%d %H:%M:%S`.
    pub format: Option<String>,
    /// Spaces per nesting level; compact output when unset.
    pub indent: Option<usize>,
    /// Text encoding for Base64; defaults to UTF-8.
    pub encoding: Option<TextEncoding>,
    /// Root element name for XML output; defaults to `root`.
    pub root_tag: Option<String>,
    /// Key sorting; defaults to `false` for JSON and `true` for YAML.
    pub sort_keys: Option<bool>,
    /// Attribute/child collision handling for XML input.
    pub collisions: Option<CollisionPolicy>,
}

impl ConvertOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_format(mut self, format: impl Into<String>) -> Self {
        self.format = Some(format.into());
        self
    }

    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn with_encoding(mut self, encoding: TextEncoding) -> Self {
        self.encoding = Some(encoding);
        self
    }

    pub fn with_root_tag(mut self, root_tag: impl Into<String>) -> Self {
        self.root_tag = Some(root_tag.into());
        self
    }

    pub fn with_sort_keys(mut self, sort_keys: bool) -> Self {
        self.sort_keys = Some(sort_keys);
        self
    }

    pub fn with_collisions(mut self, policy: CollisionPolicy) -> Self {
        self.collisions = Some(policy);
        self
    }

    /// Sets an option from its textual key and value.
    ///
    /// Keys may use `-` or `_` (`root-tag`, `root_tag`), and `fmt` is
    /// accepted for `format`.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        match key.parse::<OptionKey>()? {
            OptionKey::Format => self.format = Some(value.to_string()),
            OptionKey::Indent => {
                let indent = value.trim().parse::<usize>().map_err(|e| {
                    ConvertError::invalid_option("indent", format!("'{}': {}", value, e))
                })?;
                self.indent = Some(indent);
            }
            OptionKey::Encoding => self.encoding = Some(value.parse()?),
            OptionKey::RootTag => self.root_tag = Some(value.to_string()),
            OptionKey::SortKeys => {
                let sort_keys = str_to_bool(value).map_err(|_| {
                    ConvertError::invalid_option("sort_keys", format!("'{}' is not a boolean", value))
                })?;
                self.sort_keys = Some(sort_keys);
            }
            OptionKey::Collisions => self.collisions = Some(value.parse()?),
        }
        Ok(())
    }

    /// Builds options from `(key, value)` pairs.
    pub fn from_pairs<I, K, V>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = Self::default();
        for (key, value) in pairs {
            options.set(key.as_ref(), value.as_ref())?;
        }
        Ok(options)
    }

    /// Returns the keys that have been set.
    pub fn present(&self) -> Vec<OptionKey> {
        let mut keys = Vec::new();
        if self.format.is_some() {
            keys.push(OptionKey::Format);
        }
        if self.indent.is_some() {
            keys.push(OptionKey::Indent);
        }
        if self.encoding.is_some() {
            keys.push(OptionKey::Encoding);
        }
        if self.root_tag.is_some() {
            keys.push(OptionKey::RootTag);
        }
        if self.sort_keys.is_some() {
            keys.push(OptionKey::SortKeys);
        }
        if self.collisions.is_some() {
            keys.push(OptionKey::Collisions);
        }
        keys
    }
}
