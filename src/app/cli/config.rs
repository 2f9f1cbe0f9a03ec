//! TOML configuration file parsing and loading
//!
//! Keys mirror the long flag names. A configuration value only fills a setting
//! the command line left unset.

use crate::core::validation::{ValidationError, MAX_TIMEOUT_SECS};
use std::path::PathBuf;

use super::args::Args;

/// Keys understood in the configuration file
pub const CONFIG_KEYS: &[&str] = &[
    "url",
    "stream",
    "timeout",
    "creds",
    "format",
    "order",
    "clamp-negative",
    "color",
    "log-level",
    "log-format",
    "log-file",
];

/// A configuration file that was found and applied
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedConfig {
    pub path: PathBuf,
    /// Keys present in the file but not understood
    pub ignored_keys: Vec<String>,
}

impl Args {
    /// Default location: `<config_dir>/streamlag/streamlag.toml`
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("streamlag").join("streamlag.toml"))
    }

    /// Load the named or default configuration file into `args`
    ///
    /// A named file must exist; a missing default file is not an error.
    pub async fn load_config_file(
        args: &mut Self,
        default_path: Option<PathBuf>,
    ) -> Result<Option<LoadedConfig>, ValidationError> {
        let path = match args.config_file.clone() {
            Some(path) => {
                if !path.exists() {
                    return Err(ValidationError::new(&format!(
                        "The specified configuration file does not exist: {}",
                        path.display()
                    )));
                }
                path
            }
            None => match default_path {
                Some(path) if path.exists() => path,
                _ => return Ok(None),
            },
        };

        let contents = tokio::fs::read_to_string(&path).await.map_err(|e| {
            ValidationError::new(&format!(
                "Error reading configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        let config = toml::from_str::<toml::Table>(&contents).map_err(|e| {
            ValidationError::new(&format!(
                "Error parsing configuration file {}: {}",
                path.display(),
                e
            ))
        })?;

        let ignored_keys = Self::apply_toml_values(args, &config).map_err(|e| {
            ValidationError::new(&format!(
                "Error in configuration file {}: {}",
                path.display(),
                e.details()
            ))
        })?;

        Ok(Some(LoadedConfig { path, ignored_keys }))
    }

    /// Apply TOML configuration values to Args, returning keys it did not use
    pub fn apply_toml_values(
        args: &mut Self,
        config: &toml::Table,
    ) -> Result<Vec<String>, ValidationError> {
        // Config `url` sits below both -u and --url
        if args.url.is_none() && args.short_url.is_none() {
            args.url = url_value(config)?;
        }
        fill(&mut args.stream, string_value(config, "stream")?);
        fill(&mut args.timeout, timeout_value(config)?);
        fill(&mut args.creds, string_value(config, "creds")?.map(PathBuf::from));
        fill(&mut args.format, string_value(config, "format")?);
        fill(&mut args.order, string_value(config, "order")?);
        if let Some(clamp) = bool_value(config, "clamp-negative")? {
            args.clamp_negative |= clamp;
        }
        fill(&mut args.color, bool_value(config, "color")?);
        fill(&mut args.log_level, string_value(config, "log-level")?);
        fill(&mut args.log_format, string_value(config, "log-format")?);
        fill(&mut args.log_file, string_value(config, "log-file")?);

        Ok(config
            .keys()
            .filter(|key| !CONFIG_KEYS.contains(&key.as_str()))
            .cloned()
            .collect())
    }
}

fn fill<T>(target: &mut Option<T>, value: Option<T>) {
    if target.is_none() {
        *target = value;
    }
}

fn wrong_type(key: &str, expected: &str, value: &toml::Value) -> ValidationError {
    ValidationError::new(&format!(
        "Key '{}' must be {} (found {})",
        key,
        expected,
        value.type_str()
    ))
}

fn string_value(config: &toml::Table, key: &str) -> Result<Option<String>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(other) => Err(wrong_type(key, "a string", other)),
    }
}

fn bool_value(config: &toml::Table, key: &str) -> Result<Option<bool>, ValidationError> {
    match config.get(key) {
        None => Ok(None),
        Some(toml::Value::Boolean(b)) => Ok(Some(*b)),
        Some(other) => Err(wrong_type(key, "a boolean", other)),
    }
}

fn timeout_value(config: &toml::Table) -> Result<Option<u64>, ValidationError> {
    match config.get("timeout") {
        None => Ok(None),
        Some(toml::Value::Integer(secs)) => match u64::try_from(*secs) {
            Ok(secs @ 1..=MAX_TIMEOUT_SECS) => Ok(Some(secs)),
            _ => Err(ValidationError::new(&format!(
                "Key 'timeout' must be between 1 and {} seconds (found {})",
                MAX_TIMEOUT_SECS, secs
            ))),
        },
        Some(other) => Err(wrong_type("timeout", "an integer", other)),
    }
}

// A single URL string or an array of server URLs
fn url_value(config: &toml::Table) -> Result<Option<String>, ValidationError> {
    match config.get("url") {
        None => Ok(None),
        Some(toml::Value::String(s)) => Ok(Some(s.clone())),
        Some(toml::Value::Array(items)) => {
            let servers = items
                .iter()
                .map(|item| {
                    item.as_str()
                        .map(str::to_string)
                        .ok_or_else(|| wrong_type("url", "a string or array of strings", item))
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Some(servers.join(",")))
        }
        Some(other) => Err(wrong_type("url", "a string or array of strings", other)),
    }
}
