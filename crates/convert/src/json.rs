//! JSON conversion functions.
//!
//! Thin wrappers around `serde_json`. Object key order is preserved in both
//! directions unless sorting is asked for.
//!
//! Single-line output puts a space after every `,` and `:`
//! (`{"a": 1, "b": [1, 2]}`).

use std::io;

use serde::Serialize;
use serde_json::Value as JsonValue;
use serde_json::ser::{Formatter, PrettyFormatter};

use crate::error::{ConvertError, Result};

const FORMAT: &str = "JSON";

/// Parses JSON text into a structured value.
///
/// # Examples
///
/// ```
/// use helios_convert::json::json_to_dict;
///
/// let value = json_to_dict(r#"{"name": "Alice", "age": 30}"#)?;
/// assert_eq!(value["age"], 30);
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn json_to_dict(json: &str) -> Result<JsonValue> {
    serde_json::from_str(json).map_err(|e| ConvertError::malformed(FORMAT, e))
}

/// Serializes a structured value to JSON text.
///
/// Without `indent` the output is a single line with `", "` and `": "`
/// separators. With `indent` each nesting level is indented by that many
/// spaces.
pub fn dict_to_json(value: &JsonValue, indent: Option<usize>, sort_keys: bool) -> Result<String> {
    let sorted;
    let value = if sort_keys {
        sorted = sort_object_keys(value.clone());
        &sorted
    } else {
        value
    };

    match indent {
        None => write_with(value, SpacedFormatter),
        Some(width) => {
            let indent = " ".repeat(width);
            write_with(value, PrettyFormatter::with_indent(indent.as_bytes()))
        }
    }
}

fn write_with<F: Formatter>(value: &JsonValue, formatter: F) -> Result<String> {
    let mut buffer = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    value
        .serialize(&mut serializer)
        .map_err(|e| to_json_error(value, e))?;
    String::from_utf8(buffer).map_err(|e| to_json_error(value, e))
}

/// Single-line formatter with a space after each item and key separator.
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first { Ok(()) } else { writer.write_all(b", ") }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Recursively orders object keys lexicographically.
pub(crate) fn sort_object_keys(value: JsonValue) -> JsonValue {
    match value {
        JsonValue::Object(obj) => {
            let mut entries: Vec<(String, JsonValue)> = obj.into_iter().collect();
            entries.sort_by(|(a, _), (b, _)| a.cmp(b));
            JsonValue::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sort_object_keys(v)))
                    .collect(),
            )
        }
        JsonValue::Array(items) => {
            JsonValue::Array(items.into_iter().map(sort_object_keys).collect())
        }
        other => other,
    }
}

/// Short rendering of a value for error messages.
pub(crate) fn describe(value: &JsonValue) -> String {
    const MAX: usize = 64;
    let rendered = value.to_string();
    if rendered.chars().count() > MAX {
        let truncated: String = rendered.chars().take(MAX).collect();
        format!("{}...", truncated)
    } else {
        rendered
    }
}

fn to_json_error(value: &JsonValue, err: impl std::fmt::Display) -> ConvertError {
    ConvertError::conversion(describe(value), FORMAT, err)
}
