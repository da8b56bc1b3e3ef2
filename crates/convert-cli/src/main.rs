//! `hconv`: convert a value between kinds from the command line.
//!
//! The converted value is written to stdout. Dictionaries are printed as
//! indented JSON. Logs go to stderr.

mod config;

use std::io::Read;

use anyhow::{Context, bail};
use clap::Parser;
use helios_convert::datetime::{self, DEFAULT_FORMAT};
use helios_convert::{Kind, Value, convert, json, scalar};
use tracing::{debug, info};

use crate::config::CliConfig;

fn init_logging(level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("helios_convert={},hconv={}", level, level)));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Reads the raw input from the positional argument, `--input`, or stdin.
fn read_input(config: &CliConfig) -> anyhow::Result<String> {
    if let Some(value) = &config.value {
        return Ok(value.clone());
    }
    if let Some(path) = &config.input {
        debug!(path = %path.display(), "Reading input file");
        return std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()));
    }

    let mut buffer = String::new();
    std::io::stdin()
        .read_to_string(&mut buffer)
        .context("Failed to read stdin")?;
    // A single trailing newline comes from the shell, not the value.
    if buffer.ends_with('\n') {
        buffer.pop();
        if buffer.ends_with('\r') {
            buffer.pop();
        }
    }
    Ok(buffer)
}

/// Turns raw command-line text into a value of the source kind.
fn parse_input(kind: Kind, raw: String) -> anyhow::Result<Value> {
    Ok(match kind {
        Kind::Str | Kind::Json | Kind::Yaml | Kind::Xml | Kind::Base64 => Value::Str(raw),
        Kind::Int => Value::Int(scalar::str_to_int(&raw)?),
        Kind::Float => Value::Float(scalar::str_to_float(&raw)?),
        Kind::Bool => Value::Bool(scalar::str_to_bool(&raw)?),
        Kind::DateTime => Value::DateTime(
            datetime::str_to_datetime(raw.trim(), DEFAULT_FORMAT)
                .context("Datetime input must look like 2023-05-15 14:30:00")?,
        ),
        Kind::Dict => Value::Dict(json::json_to_dict(&raw).context("Dict input must be JSON")?),
    })
}

fn render(value: &Value) -> anyhow::Result<String> {
    match value {
        Value::Dict(dict) => Ok(json::dict_to_json(dict, Some(2), false)?),
        other => Ok(other.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();
    init_logging(&config.log_level);

    if let Err(errors) = config.validate() {
        for error in &errors {
            eprintln!("Configuration error: {}", error);
        }
        std::process::exit(1);
    }

    let (Some(from), Some(to)) = (Kind::from_name(&config.from), Kind::from_name(&config.to))
    else {
        bail!("Unknown kind in '{}' -> '{}'", config.from, config.to);
    };
    let options = config.to_options()?;

    info!(from = %from, to = %to, "Starting conversion");

    let input = parse_input(from, read_input(&config)?)?;
    let output = convert(input, from, to, &options)?;
    println!("{}", render(&output)?);

    Ok(())
}
