//! Base64 encoding of text, and the character encodings text is carried in.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::{ConvertError, Result};

/// Character encoding used to turn text into bytes before Base64 encoding, and
/// bytes back into text after decoding.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TextEncoding {
    #[default]
    Utf8,
    Ascii,
    /// ISO-8859-1: each byte is the code point of the same value.
    Latin1,
}

impl TextEncoding {
    /// Encodes text to bytes, failing on the first character the encoding
    /// cannot represent.
    pub fn encode(&self, text: &str) -> Result<Vec<u8>> {
        match self {
            TextEncoding::Utf8 => Ok(text.as_bytes().to_vec()),
            TextEncoding::Ascii => self.encode_below(text, 0x80),
            TextEncoding::Latin1 => self.encode_below(text, 0x100),
        }
    }

    /// Decodes bytes to text, failing on the first invalid byte sequence.
    pub fn decode(&self, bytes: &[u8]) -> Result<String> {
        match self {
            TextEncoding::Utf8 => String::from_utf8(bytes.to_vec())
                .map_err(|e| ConvertError::conversion(lossy_preview(bytes), "utf-8 text", e)),
            TextEncoding::Ascii => match bytes.iter().position(|b| !b.is_ascii()) {
                Some(index) => Err(ConvertError::conversion(
                    lossy_preview(bytes),
                    "ascii text",
                    format!("byte 0x{:02x} at offset {} is not ASCII", bytes[index], index),
                )),
                None => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
            },
            TextEncoding::Latin1 => Ok(bytes.iter().map(|&b| char::from(b)).collect()),
        }
    }

    fn encode_below(&self, text: &str, limit: u32) -> Result<Vec<u8>> {
        text.chars()
            .enumerate()
            .map(|(index, c)| {
                u8::try_from(u32::from(c))
                    .ok()
                    .filter(|_| u32::from(c) < limit)
                    .ok_or_else(|| {
                        ConvertError::conversion(
                            text,
                            format!("{} bytes", self),
                            format!("character '{}' at position {} is not representable", c, index),
                        )
                    })
            })
            .collect()
    }
}

impl fmt::Display for TextEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextEncoding::Utf8 => write!(f, "utf-8"),
            TextEncoding::Ascii => write!(f, "ascii"),
            TextEncoding::Latin1 => write!(f, "latin-1"),
        }
    }
}

impl FromStr for TextEncoding {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "utf-8" | "utf8" | "u8" => Ok(TextEncoding::Utf8),
            "ascii" | "us-ascii" => Ok(TextEncoding::Ascii),
            "latin-1" | "latin1" | "iso-8859-1" | "iso8859-1" | "l1" => Ok(TextEncoding::Latin1),
            _ => Err(ConvertError::invalid_option(
                "encoding",
                format!("unknown encoding '{}'", s),
            )),
        }
    }
}

/// Encodes text as standard padded Base64.
///
/// # Examples
///
/// ```
/// use helios_convert::encoding::{str_to_base64, TextEncoding};
///
/// assert_eq!(str_to_base64("Hello World!", TextEncoding::Utf8)?, "SGVsbG8gV29ybGQh");
/// # Ok::<(), helios_convert::ConvertError>(())
/// ```
pub fn str_to_base64(text: &str, encoding: TextEncoding) -> Result<String> {
    let bytes = encoding.encode(text)?;
    Ok(STANDARD.encode(bytes))
}

/// Decodes standard Base64 and interprets the bytes in `encoding`.
pub fn base64_to_str(encoded: &str, encoding: TextEncoding) -> Result<String> {
    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| ConvertError::conversion(encoded, "base64", e))?;
    encoding.decode(&bytes)
}

fn lossy_preview(bytes: &[u8]) -> String {
    String::from_utf8_lossy(&bytes[..bytes.len().min(32)]).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ErrorKind;

    #[test]
    fn test_round_trip_utf8() -> Result<()> {
        let encoded = str_to_base64("Grüße, 世界", TextEncoding::Utf8)?;
        assert_eq!(base64_to_str(&encoded, TextEncoding::Utf8)?, "Grüße, 世界");
        Ok(())
    }

    #[test]
    fn test_known_vectors() -> Result<()> {
        assert_eq!(str_to_base64("", TextEncoding::Utf8)?, "");
        assert_eq!(str_to_base64("f", TextEncoding::Utf8)?, "Zg==");
        assert_eq!(base64_to_str("SGVsbG8gV29ybGQh", TextEncoding::Utf8)?, "Hello World!");
        Ok(())
    }

    #[test]
    fn test_latin1() -> Result<()> {
        let encoded = str_to_base64("é", TextEncoding::Latin1)?;
        assert_eq!(encoded, "6Q==");
        assert_eq!(base64_to_str(&encoded, TextEncoding::Latin1)?, "é");
        assert!(base64_to_str(&encoded, TextEncoding::Utf8).is_err());
        Ok(())
    }

    #[test]
    fn test_ascii_rejects_wide_characters() {
        let err = str_to_base64("naïve", TextEncoding::Ascii).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
        assert!(err.to_string().contains("'ï'"));
        assert!(str_to_base64("€", TextEncoding::Latin1).is_err());
    }

    #[test]
    fn test_invalid_base64() {
        let err = base64_to_str("not base64!", TextEncoding::Utf8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Conversion);
    }

    #[test]
    fn test_encoding_names() {
        assert_eq!("UTF-8".parse::<TextEncoding>().ok(), Some(TextEncoding::Utf8));
        assert_eq!("utf_8".parse::<TextEncoding>().ok(), Some(TextEncoding::Utf8));
        assert_eq!("ISO-8859-1".parse::<TextEncoding>().ok(), Some(TextEncoding::Latin1));
        assert_eq!("ascii".parse::<TextEncoding>().ok(), Some(TextEncoding::Ascii));
        assert!("ebcdic".parse::<TextEncoding>().is_err());
    }
}
