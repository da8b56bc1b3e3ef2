//! Conversions between strings and integers, floats, and booleans.

use crate::error::{ConvertError, Result};

/// Strings accepted as `true`, compared case-insensitively.
pub const TRUE_LITERALS: [&str; 6] = ["true", "1", "t", "y", "yes", "on"];

/// Strings accepted as `false`, compared case-insensitively.
pub const FALSE_LITERALS: [&str; 6] = ["false", "0", "f", "n", "no", "off"];

/// Parses a signed 64-bit integer. Surrounding whitespace is ignored.
pub fn str_to_int(value: &str) -> Result<i64> {
    value
        .trim()
        .parse::<i64>()
        .map_err(|e| ConvertError::conversion(value, "integer", e))
}

/// Parses a 64-bit float. Surrounding whitespace is ignored; `inf`, `nan`
/// and `infinity` are accepted in any case.
pub fn str_to_float(value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .map_err(|e| ConvertError::conversion(value, "float", e))
}

/// Parses a boolean from one of [`TRUE_LITERALS`] or [`FALSE_LITERALS`].
///
/// Matching is case-insensitive but otherwise exact; anything else is an
/// error rather than a default.
pub fn str_to_bool(value: &str) -> Result<bool> {
    let lowered = value.to_lowercase();
    if TRUE_LITERALS.contains(&lowered.as_str()) {
        Ok(true)
    } else if FALSE_LITERALS.contains(&lowered.as_str()) {
        Ok(false)
    } else {
        Err(ConvertError::conversion(
            value,
            "boolean",
            "not a recognized boolean literal",
        ))
    }
}

pub fn int_to_str(value: i64) -> String {
    value.to_string()
}

/// Renders a float. Integral finite values keep a trailing `.0`.
pub fn float_to_str(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 && value.abs() < 1e16 {
        format!("{:.1}", value)
    } else {
        value.to_string()
    }
}

pub fn bool_to_str(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_str_to_int() -> Result<()> {
        assert_eq!(str_to_int("42")?, 42);
        assert_eq!(str_to_int(" -7 \n")?, -7);
        assert_eq!(str_to_int("+3")?, 3);
        assert!(str_to_int("4.2").is_err());
        assert!(str_to_int("").is_err());

        let err = str_to_int("99999999999999999999").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().contains("'99999999999999999999'"));
        assert!(err.to_string().contains("integer"));
        Ok(())
    }

    #[test]
    fn test_str_to_float() -> Result<()> {
        assert_eq!(str_to_float("3.14")?, 3.14);
        assert_eq!(str_to_float(" 1e3 ")?, 1000.0);
        assert!(str_to_float("inf")?.is_infinite());
        assert!(str_to_float("NaN")?.is_nan());
        assert!(str_to_float("three").is_err());
        Ok(())
    }

    #[test]
    fn test_str_to_bool_case_insensitive() -> Result<()> {
        for literal in ["TRUE", "Yes", "ON", "t", "1", "y"] {
            assert!(str_to_bool(literal)?, "{}", literal);
        }
        for literal in ["False", "NO", "off", "F", "0", "n"] {
            assert!(!str_to_bool(literal)?, "{}", literal);
        }
        Ok(())
    }

    #[test]
    fn test_str_to_bool_rejects_unknown() {
        for literal in ["maybe", "", " yes", "2"] {
            let err = str_to_bool(literal).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Conversion, "{:?}", literal);
        }
    }

    #[test]
    fn test_to_str() {
        assert_eq!(int_to_str(-12), "-12");
        assert_eq!(float_to_str(3.0), "3.0");
        assert_eq!(float_to_str(3.14), "3.14");
        assert_eq!(float_to_str(f64::INFINITY), "inf");
        assert_eq!(bool_to_str(true), "true");
        assert_eq!(bool_to_str(false), "false");
    }
}
