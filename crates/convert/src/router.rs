//! The conversion router: the single entry point over every converter.
//!
//! A request names a source and a target [`Kind`]. The pair is resolved to
//! one of the closed set of [`Conversion`]s up front; pairs outside that set
//! fail with [`ConvertError::UnsupportedConversion`] before any work is done.
//! Failures inside a conversion are wrapped in [`ConvertError::Failed`] so the
//! caller can see which pair was attempted.

use std::fmt;

use chrono::NaiveDateTime;
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::datetime::{self, DEFAULT_FORMAT};
use crate::encoding::{self, TextEncoding};
use crate::error::{ConvertError, Result};
use crate::generic::{json_object_to_map, map_to_json};
use crate::json;
use crate::options::{ConvertOptions, OptionKey};
use crate::scalar;
use crate::xml::{self, DEFAULT_ROOT_TAG};
use crate::yaml;

/// The kinds of value a conversion reads or produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Str,
    Int,
    Float,
    Bool,
    /// Structured data (objects, arrays, scalars).
    Dict,
    /// JSON text.
    Json,
    /// YAML text.
    Yaml,
    /// XML text.
    Xml,
    DateTime,
    /// Base64 text.
    Base64,
}

impl Kind {
    pub const ALL: [Kind; 10] = [
        Kind::Str,
        Kind::Int,
        Kind::Float,
        Kind::Bool,
        Kind::Dict,
        Kind::Json,
        Kind::Yaml,
        Kind::Xml,
        Kind::DateTime,
        Kind::Base64,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Kind::Str => "str",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Bool => "bool",
            Kind::Dict => "dict",
            Kind::Json => "json",
            Kind::Yaml => "yaml",
            Kind::Xml => "xml",
            Kind::DateTime => "datetime",
            Kind::Base64 => "base64",
        }
    }

    /// Looks up a kind by name, ignoring ASCII case.
    pub fn from_name(name: &str) -> Option<Kind> {
        let name = name.trim();
        Kind::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A value passed into or returned from the router.
///
/// Text-bearing kinds (`str`, `json`, `yaml`, `xml`, `base64`) all travel as
/// [`Value::Str`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
    Dict(JsonValue),
}

impl Value {
    /// Short description of the variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Str(_) => "str",
            Value::Int(_) => "int",
            Value::Float(_) => "float",
            Value::Bool(_) => "bool",
            Value::DateTime(_) => "datetime",
            Value::Dict(_) => "dict",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&JsonValue> {
        match self {
            Value::Dict(value) => Some(value),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Str(s) => f.write_str(s),
            Value::Int(i) => write!(f, "{}", i),
            Value::Float(x) => f.write_str(&scalar::float_to_str(*x)),
            Value::Bool(b) => f.write_str(&scalar::bool_to_str(*b)),
            Value::DateTime(dt) => write!(f, "{}", dt.format(DEFAULT_FORMAT)),
            Value::Dict(value) => write!(f, "{}", value),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<NaiveDateTime> for Value {
    fn from(dt: NaiveDateTime) -> Self {
        Value::DateTime(dt)
    }
}

impl From<JsonValue> for Value {
    fn from(value: JsonValue) -> Self {
        Value::Dict(value)
    }
}

/// Every supported source/target pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Conversion {
    StrToInt,
    StrToFloat,
    StrToBool,
    StrToDateTime,
    StrToBase64,
    IntToStr,
    FloatToStr,
    BoolToStr,
    DateTimeToStr,
    Base64ToStr,
    JsonToDict,
    DictToJson,
    YamlToDict,
    DictToYaml,
    XmlToDict,
    DictToXml,
}

impl Conversion {
    pub const ALL: [Conversion; 16] = [
        Conversion::StrToInt,
        Conversion::StrToFloat,
        Conversion::StrToBool,
        Conversion::StrToDateTime,
        Conversion::StrToBase64,
        Conversion::IntToStr,
        Conversion::FloatToStr,
        Conversion::BoolToStr,
        Conversion::DateTimeToStr,
        Conversion::Base64ToStr,
        Conversion::JsonToDict,
        Conversion::DictToJson,
        Conversion::YamlToDict,
        Conversion::DictToYaml,
        Conversion::XmlToDict,
        Conversion::DictToXml,
    ];

    /// Resolves a source/target pair.
    pub fn between(from: Kind, to: Kind) -> Result<Conversion> {
        Conversion::ALL
            .into_iter()
            .find(|c| c.source() == from && c.target() == to)
            .ok_or_else(|| ConvertError::UnsupportedConversion {
                from: from.to_string(),
                to: to.to_string(),
            })
    }

    pub fn source(&self) -> Kind {
        self.kinds().0
    }

    pub fn target(&self) -> Kind {
        self.kinds().1
    }

    fn kinds(&self) -> (Kind, Kind) {
        match self {
            Conversion::StrToInt => (Kind::Str, Kind::Int),
            Conversion::StrToFloat => (Kind::Str, Kind::Float),
            Conversion::StrToBool => (Kind::Str, Kind::Bool),
            Conversion::StrToDateTime => (Kind::Str, Kind::DateTime),
            Conversion::StrToBase64 => (Kind::Str, Kind::Base64),
            Conversion::IntToStr => (Kind::Int, Kind::Str),
            Conversion::FloatToStr => (Kind::Float, Kind::Str),
            Conversion::BoolToStr => (Kind::Bool, Kind::Str),
            Conversion::DateTimeToStr => (Kind::DateTime, Kind::Str),
            Conversion::Base64ToStr => (Kind::Base64, Kind::Str),
            Conversion::JsonToDict => (Kind::Json, Kind::Dict),
            Conversion::DictToJson => (Kind::Dict, Kind::Json),
            Conversion::YamlToDict => (Kind::Yaml, Kind::Dict),
            Conversion::DictToYaml => (Kind::Dict, Kind::Yaml),
            Conversion::XmlToDict => (Kind::Xml, Kind::Dict),
            Conversion::DictToXml => (Kind::Dict, Kind::Xml),
        }
    }

    /// Options this conversion recognizes. Any other option is rejected.
    pub fn accepted_options(&self) -> &'static [OptionKey] {
        match self {
            Conversion::StrToDateTime | Conversion::DateTimeToStr => &[OptionKey::Format],
            Conversion::StrToBase64 | Conversion::Base64ToStr => &[OptionKey::Encoding],
            Conversion::DictToJson => &[OptionKey::Indent, OptionKey::SortKeys],
            Conversion::DictToYaml => &[OptionKey::SortKeys],
            Conversion::XmlToDict => &[OptionKey::Collisions],
            Conversion::DictToXml => &[OptionKey::RootTag, OptionKey::Indent],
            Conversion::StrToInt
            | Conversion::StrToFloat
            | Conversion::StrToBool
            | Conversion::IntToStr
            | Conversion::FloatToStr
            | Conversion::BoolToStr
            | Conversion::JsonToDict
            | Conversion::YamlToDict => &[],
        }
    }

    /// Runs this conversion without router context on errors.
    pub fn apply(&self, value: Value, options: &ConvertOptions) -> Result<Value> {
        self.check_options(options)?;

        match self {
            Conversion::StrToInt => Ok(Value::Int(scalar::str_to_int(&self.text(value)?)?)),
            Conversion::StrToFloat => {
                Ok(Value::Float(scalar::str_to_float(&self.text(value)?)?))
            }
            Conversion::StrToBool => Ok(Value::Bool(scalar::str_to_bool(&self.text(value)?)?)),
            Conversion::StrToDateTime => {
                let format = options.format.as_deref().unwrap_or(DEFAULT_FORMAT);
                let parsed = datetime::str_to_datetime(&self.text(value)?, format)?;
                Ok(Value::DateTime(parsed))
            }
            Conversion::StrToBase64 => {
                let encoding = options.encoding.unwrap_or_default();
                Ok(Value::Str(encoding::str_to_base64(&self.text(value)?, encoding)?))
            }
            Conversion::IntToStr => match value {
                Value::Int(i) => Ok(Value::Str(scalar::int_to_str(i))),
                other => Err(self.wrong_input(&other)),
            },
            Conversion::FloatToStr => match value {
                Value::Float(x) => Ok(Value::Str(scalar::float_to_str(x))),
                other => Err(self.wrong_input(&other)),
            },
            Conversion::BoolToStr => match value {
                Value::Bool(b) => Ok(Value::Str(scalar::bool_to_str(b))),
                other => Err(self.wrong_input(&other)),
            },
            Conversion::DateTimeToStr => match value {
                Value::DateTime(dt) => {
                    let format = options.format.as_deref().unwrap_or(DEFAULT_FORMAT);
                    Ok(Value::Str(datetime::datetime_to_str(&dt, format)?))
                }
                other => Err(self.wrong_input(&other)),
            },
            Conversion::Base64ToStr => {
                let encoding: TextEncoding = options.encoding.unwrap_or_default();
                Ok(Value::Str(encoding::base64_to_str(&self.text(value)?, encoding)?))
            }
            Conversion::JsonToDict => Ok(Value::Dict(json::json_to_dict(&self.text(value)?)?)),
            Conversion::DictToJson => {
                let dict = self.dict(value)?;
                let sort_keys = options.sort_keys.unwrap_or(false);
                Ok(Value::Str(json::dict_to_json(&dict, options.indent, sort_keys)?))
            }
            Conversion::YamlToDict => Ok(Value::Dict(yaml::yaml_to_dict(&self.text(value)?)?)),
            Conversion::DictToYaml => {
                let dict = self.dict(value)?;
                let sort_keys = options.sort_keys.unwrap_or(true);
                Ok(Value::Str(yaml::dict_to_yaml(&dict, sort_keys)?))
            }
            Conversion::XmlToDict => {
                let policy = options.collisions.unwrap_or_default();
                let map = xml::xml_to_dict(&self.text(value)?, policy)?;
                Ok(Value::Dict(map_to_json(map)))
            }
            Conversion::DictToXml => {
                let map = match self.dict(value)? {
                    JsonValue::Object(obj) => json_object_to_map(obj),
                    other => {
                        return Err(ConvertError::conversion(
                            json::describe(&other),
                            "XML",
                            "only an object can become the root element",
                        ));
                    }
                };
                let root_tag = options.root_tag.as_deref().unwrap_or(DEFAULT_ROOT_TAG);
                Ok(Value::Str(xml::dict_to_xml(&map, root_tag, options.indent)?))
            }
        }
    }

    fn check_options(&self, options: &ConvertOptions) -> Result<()> {
        let accepted = self.accepted_options();
        match options.present().into_iter().find(|key| !accepted.contains(key)) {
            Some(key) => Err(ConvertError::invalid_option(
                key.name(),
                format!("not recognized by {}", self),
            )),
            None => Ok(()),
        }
    }

    fn text(&self, value: Value) -> Result<String> {
        match value {
            Value::Str(s) => Ok(s),
            other => Err(self.wrong_input(&other)),
        }
    }

    fn dict(&self, value: Value) -> Result<JsonValue> {
        match value {
            Value::Dict(dict) => Ok(dict),
            other => Err(self.wrong_input(&other)),
        }
    }

    fn wrong_input(&self, value: &Value) -> ConvertError {
        ConvertError::conversion(
            value.to_string(),
            self.target().name(),
            format!(
                "expected a {} input for {}, got {}",
                self.expected_input(),
                self,
                value.type_name()
            ),
        )
    }

    fn expected_input(&self) -> &'static str {
        match self.source() {
            Kind::Json | Kind::Yaml | Kind::Xml | Kind::Base64 => "str",
            other => other.name(),
        }
    }
}

impl fmt::Display for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_to_{}", self.source(), self.target())
    }
}

/// Converts `value` from one kind to another.
///
/// # Examples
///
/// ```
/// use helios_convert::{convert, ConvertOptions, Kind, Value};
///
/// let n = convert("42".into(), Kind::Str, Kind::Int, &ConvertOptions::default())?;
/// assert_eq!(n, Value::Int(42));
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn convert(value: Value, from: Kind, to: Kind, options: &ConvertOptions) -> Result<Value> {
    let conversion = Conversion::between(from, to)?;
    debug!(conversion = %conversion, "Converting value");

    conversion
        .apply(value, options)
        .map_err(|e| ConvertError::Failed {
            conversion: conversion.to_string(),
            source: Box::new(e),
        })
}

/// Converts `value` between kinds given by name (`"str"`, `"json"`, ...).
///
/// Unknown kind names are reported as an unsupported conversion.
pub fn convert_named(value: Value, from: &str, to: &str, options: &ConvertOptions) -> Result<Value> {
    match (Kind::from_name(from), Kind::from_name(to)) {
        (Some(from), Some(to)) => convert(value, from, to, options),
        _ => Err(ConvertError::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        }),
    }
}
