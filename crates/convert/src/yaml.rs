//! YAML conversion functions.
//!
//! YAML documents are read through `serde_yaml::Value` and normalized into
//! `serde_json::Value`, so that every structured value in this crate has one
//! representation:
//!
//! - Non-string mapping keys (numbers, booleans, null) are stringified.
//! - Tags (`!custom value`) are dropped and the tagged value is kept.
//! - Non-finite floats (`.inf`, `.nan`) have no JSON form and are rejected.

use serde_json::Value as JsonValue;
use serde_yaml::Value as YamlValue;

use crate::error::{ConvertError, Result};
use crate::json::{describe, sort_object_keys};

const FORMAT: &str = "YAML";

/// Parses YAML text into a structured value. An empty document yields `null`.
///
/// # Examples
///
/// ```
/// use helios_convert::yaml::yaml_to_dict;
///
/// let value = yaml_to_dict("name: Alice\nage: 30")?;
/// assert_eq!(value["name"], "Alice");
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn yaml_to_dict(yaml: &str) -> Result<JsonValue> {
    let value: YamlValue =
        serde_yaml::from_str(yaml).map_err(|e| ConvertError::malformed(FORMAT, e))?;
    convert_yaml_value(value)
}

/// Serializes a structured value to block-style YAML text.
pub fn dict_to_yaml(value: &JsonValue, sort_keys: bool) -> Result<String> {
    let result = if sort_keys {
        serde_yaml::to_string(&sort_object_keys(value.clone()))
    } else {
        serde_yaml::to_string(value)
    };
    result.map_err(|e| ConvertError::conversion(describe(value), FORMAT, e))
}

/// Convert a `serde_yaml::Value` to a `serde_json::Value`.
fn convert_yaml_value(value: YamlValue) -> Result<JsonValue> {
    Ok(match value {
        YamlValue::Null => JsonValue::Null,
        YamlValue::Bool(b) => JsonValue::Bool(b),
        YamlValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::from(i)
            } else if let Some(u) = n.as_u64() {
                JsonValue::from(u)
            } else {
                let f = n.as_f64().unwrap_or(f64::NAN);
                serde_json::Number::from_f64(f)
                    .map(JsonValue::Number)
                    .ok_or_else(|| {
                        ConvertError::conversion(
                            n.to_string(),
                            "JSON number",
                            "non-finite floats cannot be represented",
                        )
                    })?
            }
        }
        YamlValue::String(s) => JsonValue::String(s),
        YamlValue::Sequence(seq) => JsonValue::Array(
            seq.into_iter()
                .map(convert_yaml_value)
                .collect::<Result<Vec<_>>>()?,
        ),
        YamlValue::Mapping(map) => {
            let mut obj = serde_json::Map::with_capacity(map.len());
            for (k, v) in map {
                obj.insert(key_to_string(k)?, convert_yaml_value(v)?);
            }
            JsonValue::Object(obj)
        }
        YamlValue::Tagged(tagged) => convert_yaml_value(tagged.value)?,
    })
}

fn key_to_string(key: YamlValue) -> Result<String> {
    match key {
        YamlValue::String(s) => Ok(s),
        YamlValue::Number(n) => Ok(n.to_string()),
        YamlValue::Bool(b) => Ok(b.to_string()),
        YamlValue::Null => Ok("null".to_string()),
        YamlValue::Tagged(tagged) => key_to_string(tagged.value),
        other => Err(ConvertError::conversion(
            format!("{:?}", other),
            "mapping key",
            "only scalar keys are supported",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_parse_nested_document() -> Result<()> {
        let value = yaml_to_dict("server:\n  host: localhost\n  ports: [80, 443]\n  tls: true")?;
        assert_eq!(
            value,
            json!({"server": {"host": "localhost", "ports": [80, 443], "tls": true}})
        );
        Ok(())
    }

    #[test]
    fn test_scalar_keys_are_stringified() -> Result<()> {
        let value = yaml_to_dict("1: one\ntrue: yes\n~: nothing")?;
        assert_eq!(value["1"], "one");
        assert_eq!(value["true"], "yes");
        assert_eq!(value["null"], "nothing");
        Ok(())
    }

    #[test]
    fn test_tags_are_dropped() -> Result<()> {
        let value = yaml_to_dict("when: !date 2023-05-15")?;
        assert_eq!(value["when"], "2023-05-15");
        Ok(())
    }

    #[test]
    fn test_empty_document_is_null() -> Result<()> {
        assert_eq!(yaml_to_dict("")?, JsonValue::Null);
        Ok(())
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let err = yaml_to_dict("x: .inf").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_malformed_yaml() {
        let err = yaml_to_dict("a: [1, 2").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::MalformedInput);
    }

    #[test]
    fn test_dict_to_yaml_sorted_and_unsorted() -> Result<()> {
        let value = json!({"name": "Alice", "age": 30});
        assert_eq!(dict_to_yaml(&value, true)?, "age: 30\nname: Alice\n");
        assert_eq!(dict_to_yaml(&value, false)?, "name: Alice\nage: 30\n");
        Ok(())
    }
}
