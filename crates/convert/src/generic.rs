//! The format-neutral pivot representation used by the XML transcoder.
//!
//! A [`GenericMap`] is an insertion-ordered mapping from string keys to
//! [`GenericValue`]s. Values are strings, nested maps, or sequences; sequences
//! only ever arise from repeated sibling elements.
//!
//! ## Bridging to JSON
//!
//! | `serde_json::Value` | `GenericValue` |
//! |---------------------|----------------|
//! | `"text"` | `Scalar("text")` |
//! | `42`, `1.5`, `true` | `Scalar("42")`, `Scalar("1.5")`, `Scalar("true")` |
//! | `null` | `Map({})` (an empty element) |
//! | `[a, b]` | `Sequence([a, b])` |
//! | `{"k": v}` | `Map({"k": v})` |
//!
//! The opposite direction is lossless: scalars become JSON strings, maps
//! become objects, and sequences become arrays.
//!
//! `GenericValue` also implements serde's traits with the same untagged
//! shapes, so a [`GenericMap`] can be written or read directly by any serde
//! format. Only strings, objects and arrays deserialize.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Reserved key holding an element's direct text content.
pub const TEXT_KEY: &str = "_text";

/// Ordered mapping from string key to [`GenericValue`].
pub type GenericMap = IndexMap<String, GenericValue>;

/// A node in the pivot representation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GenericValue {
    /// Character data or an attribute value.
    Scalar(String),
    /// A nested element.
    Map(GenericMap),
    /// Repeated sibling elements sharing one tag.
    Sequence(Vec<GenericValue>),
}

impl GenericValue {
    pub fn as_scalar(&self) -> Option<&str> {
        match self {
            GenericValue::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&GenericMap> {
        match self {
            GenericValue::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[GenericValue]> {
        match self {
            GenericValue::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Short description of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            GenericValue::Scalar(_) => "scalar",
            GenericValue::Map(_) => "map",
            GenericValue::Sequence(_) => "sequence",
        }
    }
}

impl From<&str> for GenericValue {
    fn from(s: &str) -> Self {
        GenericValue::Scalar(s.to_string())
    }
}

impl From<String> for GenericValue {
    fn from(s: String) -> Self {
        GenericValue::Scalar(s)
    }
}

impl From<GenericMap> for GenericValue {
    fn from(map: GenericMap) -> Self {
        GenericValue::Map(map)
    }
}

impl From<Vec<GenericValue>> for GenericValue {
    fn from(items: Vec<GenericValue>) -> Self {
        GenericValue::Sequence(items)
    }
}

impl From<GenericValue> for JsonValue {
    fn from(value: GenericValue) -> Self {
        match value {
            GenericValue::Scalar(s) => JsonValue::String(s),
            GenericValue::Map(map) => JsonValue::Object(
                map.into_iter()
                    .map(|(k, v)| (k, JsonValue::from(v)))
                    .collect(),
            ),
            GenericValue::Sequence(items) => {
                JsonValue::Array(items.into_iter().map(JsonValue::from).collect())
            }
        }
    }
}

impl From<JsonValue> for GenericValue {
    fn from(value: JsonValue) -> Self {
        match value {
            JsonValue::Null => GenericValue::Map(GenericMap::new()),
            JsonValue::Bool(b) => GenericValue::Scalar(b.to_string()),
            JsonValue::Number(n) => GenericValue::Scalar(n.to_string()),
            JsonValue::String(s) => GenericValue::Scalar(s),
            JsonValue::Array(items) => {
                GenericValue::Sequence(items.into_iter().map(GenericValue::from).collect())
            }
            JsonValue::Object(obj) => GenericValue::Map(json_object_to_map(obj)),
        }
    }
}

/// Converts a JSON object into a [`GenericMap`], keeping key order.
pub fn json_object_to_map(obj: serde_json::Map<String, JsonValue>) -> GenericMap {
    obj.into_iter()
        .map(|(k, v)| (k, GenericValue::from(v)))
        .collect()
}

/// Converts a [`GenericMap`] into a JSON object value.
pub fn map_to_json(map: GenericMap) -> JsonValue {
    JsonValue::from(GenericValue::Map(map))
}
