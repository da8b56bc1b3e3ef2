//! Error types for conversions.
//!
//! Every failure a conversion can produce is a [`ConvertError`]. Callers that
//! only care about the broad category of a failure match on
//! [`ConvertError::kind`] instead of the individual variants.

use std::fmt;

use thiserror::Error;

/// The broad category of a conversion failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The input text does not parse as the claimed source format.
    MalformedInput,
    /// The input is structurally valid but cannot be mapped to the target.
    Conversion,
    /// The requested source/target pair has no converter.
    UnsupportedConversion,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::MalformedInput => write!(f, "malformed input"),
            ErrorKind::Conversion => write!(f, "conversion error"),
            ErrorKind::UnsupportedConversion => write!(f, "unsupported conversion"),
        }
    }
}

/// Error type for every conversion in this crate.
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Input text is not well-formed in its source format (JSON, YAML, XML).
    #[error("invalid {format}: {reason}")]
    MalformedInput { format: &'static str, reason: String },

    /// A value could not be converted to the target type.
    #[error("cannot convert '{value}' to {target}: {reason}")]
    Conversion {
        value: String,
        target: String,
        reason: String,
    },

    /// An element name is empty or not a legal XML name.
    #[error("invalid XML tag name: '{name}'")]
    InvalidTagName { name: String },

    /// A child element collided with an attribute or text entry.
    #[error("child element '{key}' of <{tag}> collides with an existing attribute or text entry")]
    KeyCollision { key: String, tag: String },

    /// An option was given that the conversion does not recognize, or its
    /// value could not be parsed.
    #[error("invalid option '{option}': {reason}")]
    InvalidOption { option: String, reason: String },

    /// No converter exists for the requested pair.
    #[error("unsupported conversion from {from} to {to}")]
    UnsupportedConversion { from: String, to: String },

    /// A failure inside a routed conversion, tagged with the attempted pair.
    #[error("{conversion}: {source}")]
    Failed {
        conversion: String,
        #[source]
        source: Box<ConvertError>,
    },
}

impl ConvertError {
    /// Returns the category of this error, looking through router context.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ConvertError::MalformedInput { .. } => ErrorKind::MalformedInput,
            ConvertError::Conversion { .. }
            | ConvertError::InvalidTagName { .. }
            | ConvertError::KeyCollision { .. }
            | ConvertError::InvalidOption { .. } => ErrorKind::Conversion,
            ConvertError::UnsupportedConversion { .. } => ErrorKind::UnsupportedConversion,
            ConvertError::Failed { source, .. } => source.kind(),
        }
    }

    /// Returns the innermost error, skipping any router context.
    pub fn root_cause(&self) -> &ConvertError {
        match self {
            ConvertError::Failed { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub(crate) fn malformed(format: &'static str, reason: impl fmt::Display) -> Self {
        ConvertError::MalformedInput {
            format,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn conversion(
        value: impl Into<String>,
        target: impl Into<String>,
        reason: impl fmt::Display,
    ) -> Self {
        ConvertError::Conversion {
            value: value.into(),
            target: target.into(),
            reason: reason.to_string(),
        }
    }

    pub(crate) fn invalid_option(option: impl Into<String>, reason: impl fmt::Display) -> Self {
        ConvertError::InvalidOption {
            option: option.into(),
            reason: reason.to_string(),
        }
    }
}

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;
