//! Command-line configuration for `hconv`.
//!
//! Every flag can also be set through the environment.
//!
//! | Variable | Default | Description |
//! |----------|---------|-------------|
//! | `HCONV_INPUT` | - | Read the value from this file |
//! | `HCONV_FORMAT` | - | Datetime pattern |
//! | `HCONV_INDENT` | - | Indent width for JSON and XML output |
//! | `HCONV_ENCODING` | - | Text encoding for Base64 |
//! | `HCONV_ROOT_TAG` | - | Root element name for XML output |
//! | `HCONV_SORT_KEYS` | - | Sort object keys in JSON/YAML output |
//! | `HCONV_COLLISIONS` | - | `overwrite` or `error` for XML input |
//! | `HCONV_LOG_LEVEL` | warn | Log level |

use std::path::PathBuf;

use clap::Parser;
use helios_convert::{ConvertOptions, Kind};

/// Converts a value between kinds.
#[derive(Debug, Clone, Parser)]
#[command(name = "hconv")]
#[command(about = "Convert values between strings, numbers, datetimes, Base64, JSON, YAML and XML")]
pub struct CliConfig {
    /// Source kind (str, int, float, bool, datetime, base64, dict, json, yaml, xml).
    pub from: String,

    /// Target kind.
    pub to: String,

    /// Value to convert. Read from `--input` or stdin when omitted.
    pub value: Option<String>,

    /// Read the value from a file.
    #[arg(short, long, env = "HCONV_INPUT", conflicts_with = "value")]
    pub input: Option<PathBuf>,

    /// Datetime pattern (strftime syntax).
    #[arg(long, env = "HCONV_FORMAT")]
    pub format: Option<String>,

    /// Indent width for JSON and XML output.
    #[arg(long, env = "HCONV_INDENT")]
    pub indent: Option<usize>,

    /// Text encoding for Base64 (utf-8, ascii, latin-1).
    #[arg(long, env = "HCONV_ENCODING")]
    pub encoding: Option<String>,

    /// Root element name for XML output.
    #[arg(long, env = "HCONV_ROOT_TAG")]
    pub root_tag: Option<String>,

    /// Sort object keys in JSON and YAML output.
    #[arg(long, env = "HCONV_SORT_KEYS")]
    pub sort_keys: Option<bool>,

    /// Attribute/child collision handling for XML input (overwrite, error).
    #[arg(long, env = "HCONV_COLLISIONS")]
    pub collisions: Option<String>,

    /// Extra option as key=value. May be repeated.
    #[arg(long = "opt", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long, env = "HCONV_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            from: "str".to_string(),
            to: "str".to_string(),
            value: None,
            input: None,
            format: None,
            indent: None,
            encoding: None,
            root_tag: None,
            sort_keys: None,
            collisions: None,
            extra: Vec::new(),
            log_level: "warn".to_string(),
        }
    }
}

impl CliConfig {
    /// Validates the configuration and returns errors if any.
    pub fn validate(&self) -> Result<(), Vec<String>> {
        let mut errors = Vec::new();

        for (label, name) in [("source", &self.from), ("target", &self.to)] {
            if Kind::from_name(name).is_none() {
                errors.push(format!("Unknown {} kind '{}'", label, name));
            }
        }

        if !["error", "warn", "info", "debug", "trace"]
            .contains(&self.log_level.to_ascii_lowercase().as_str())
        {
            errors.push(format!("Unknown log level '{}'", self.log_level));
        }

        for pair in &self.extra {
            if !pair.contains('=') {
                errors.push(format!("Option '{}' is not of the form key=value", pair));
            }
        }

        if let Err(e) = self.to_options() {
            errors.push(e.to_string());
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    /// Collects the options given on the command line.
    ///
    /// Dedicated flags are applied after `--opt` pairs, so they win.
    pub fn to_options(&self) -> helios_convert::Result<ConvertOptions> {
        let mut options = ConvertOptions::default();

        for pair in &self.extra {
            if let Some((key, value)) = pair.split_once('=') {
                options.set(key, value)?;
            }
        }

        if let Some(format) = &self.format {
            options.format = Some(format.clone());
        }
        if let Some(indent) = self.indent {
            options.indent = Some(indent);
        }
        if let Some(encoding) = &self.encoding {
            options.encoding = Some(encoding.parse()?);
        }
        if let Some(root_tag) = &self.root_tag {
            options.root_tag = Some(root_tag.clone());
        }
        if let Some(sort_keys) = self.sort_keys {
            options.sort_keys = Some(sort_keys);
        }
        if let Some(collisions) = &self.collisions {
            options.collisions = Some(collisions.parse()?);
        }

        Ok(options)
    }

    /// Creates a configuration for converting `from` to `to`.
    #[cfg(test)]
    pub fn for_pair(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use helios_convert::encoding::TextEncoding;
    use helios_convert::xml::CollisionPolicy;

    #[test]
    fn test_default_config() {
        let config = CliConfig::default();
        assert_eq!(config.log_level, "warn");
        assert!(config.validate().is_ok());
        assert_eq!(config.to_options().ok(), Some(ConvertOptions::default()));
    }

    #[test]
    fn test_parse_arguments() {
        let config = CliConfig::try_parse_from([
            "hconv",
            "dict",
            "xml",
            r#"{"a": 1}"#,
            "--root-tag",
            "doc",
            "--indent",
            "2",
        ])
        .unwrap();

        assert_eq!(config.from, "dict");
        assert_eq!(config.to, "xml");
        assert_eq!(config.value.as_deref(), Some(r#"{"a": 1}"#));
        assert_eq!(
            config.to_options().unwrap(),
            ConvertOptions::new().with_root_tag("doc").with_indent(2)
        );
    }

    #[test]
    fn test_flags_override_extra_options() {
        let config = CliConfig {
            extra: vec!["encoding=ascii".to_string(), "collisions=error".to_string()],
            encoding: Some("latin-1".to_string()),
            ..CliConfig::for_pair("str", "base64")
        };

        let options = config.to_options().unwrap();
        assert_eq!(options.encoding, Some(TextEncoding::Latin1));
        assert_eq!(options.collisions, Some(CollisionPolicy::Error));
    }

    #[test]
    fn test_validation_collects_every_problem() {
        let config = CliConfig {
            log_level: "loud".to_string(),
            extra: vec!["indent".to_string()],
            collisions: Some("merge".to_string()),
            ..CliConfig::for_pair("text", "int")
        };

        let errors = config.validate().unwrap_err();
        assert_eq!(errors.len(), 4);
        assert!(errors[0].contains("'text'"));
    }
}
