//! # Helios Convert
//!
//! Conversions between primitive values, date-times, Base64 text and the
//! structured document formats JSON, YAML and XML.
//!
//! ## Features
//!
//! - **Scalars**: strings to and from integers, floats and booleans.
//! - **Date-times**: strftime-style parsing and formatting via `chrono`.
//! - **Base64**: text encoding with a selectable character encoding.
//! - **JSON/YAML**: documents to and from `serde_json::Value`.
//! - **XML**: an element tree ([`MarkupNode`]) and a transcoder between trees
//!   and [`GenericMap`]s.
//!
//! ## Architecture
//!
//! Each format lives in its own module with plain functions. The [`router`]
//! sits on top and resolves a `(source, target)` pair to one of the closed
//! set of [`Conversion`]s, checks its options, and runs it.
//!
//! ## XML ↔ Map Mapping
//!
//! | XML | Map |
//! |-----|-----|
//! | `<r a="1"/>` | `{"a": "1"}` |
//! | `<r>hi</r>` | `{"_text": "hi"}` |
//! | `<r><x>1</x></r>` | `{"x": {"_text": "1"}}` |
//! | `<r><x>1</x><x>2</x></r>` | `{"x": [{"_text": "1"}, {"_text": "2"}]}` |
//!
//! ## Examples
//!
//! ```
//! use helios_convert::{convert, ConvertOptions, Kind, Value};
//!
//! let options = ConvertOptions::default();
//! let dict = convert(Value::from("<root><x>hi</x></root>"), Kind::Xml, Kind::Dict, &options)?;
//! let json = convert(dict, Kind::Dict, Kind::Json, &options)?;
//! assert_eq!(json, Value::from(r#"{"x": {"_text": "hi"}}"#));
//! # Ok::<(), helios_convert::ConvertError>(())
//! ```

pub mod datetime;
pub mod encoding;
pub mod error;
pub mod generic;
pub mod json;
pub mod options;
pub mod router;
pub mod scalar;
pub mod xml;
pub mod yaml;

// Re-export common types
pub use error::{ConvertError, ErrorKind, Result};
pub use generic::{GenericMap, GenericValue, TEXT_KEY};
pub use options::{ConvertOptions, OptionKey};
pub use xml::MarkupNode;

// Re-export the router at top level for convenience
pub use router::{Conversion, Kind, Value, convert, convert_named};
