//! CLI argument validation utilities
//!
//! Checks the merged command line and configuration values before any
//! connection is attempted, and turns them into session options.

use crate::broker::types::ConnectionSettings;
use crate::core::validation::{
    validate_broker_url, validate_stream_name, ValidationError, MAX_TIMEOUT_SECS,
};
use crate::lag::api::SessionOptions;

use super::args::Args;

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error", "off"];
const LOG_FORMATS: &[&str] = &["text", "ext", "json"];

impl Args {
    /// Validate CLI arguments for consistency and constraints
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_stream_name(self.stream_name())?;
        validate_broker_url(&self.broker_url())?;
        self.validate_timeout()?;
        self.validate_creds()?;
        self.validate_choices()?;
        Ok(())
    }

    fn validate_timeout(&self) -> Result<(), ValidationError> {
        match self.timeout {
            Some(0) => Err(ValidationError::new(
                "Option --timeout must be at least 1 second",
            )),
            Some(secs) if secs > MAX_TIMEOUT_SECS => Err(ValidationError::new(&format!(
                "Option --timeout must be at most {} seconds (found {})",
                MAX_TIMEOUT_SECS, secs
            ))),
            _ => Ok(()),
        }
    }

    fn validate_creds(&self) -> Result<(), ValidationError> {
        if let Some(creds) = &self.creds {
            if !creds.is_file() {
                return Err(ValidationError::new(&format!(
                    "Credentials file does not exist: '{}'",
                    creds.display()
                )));
            }
        }
        Ok(())
    }

    // Config file values bypass clap's value parsers
    fn validate_choices(&self) -> Result<(), ValidationError> {
        if self.report_format().is_err() {
            return Err(ValidationError::new(&format!(
                "Unknown report format '{}' (expected text, table or json)",
                self.format.as_deref().unwrap_or_default()
            )));
        }
        if self.report_order().is_err() {
            return Err(ValidationError::new(&format!(
                "Unknown report order '{}' (expected broker, name or lag)",
                self.order.as_deref().unwrap_or_default()
            )));
        }
        if let Some(level) = self.log_level.as_deref() {
            if !LOG_LEVELS.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ValidationError::new(&format!(
                    "Unknown log level '{}'",
                    level
                )));
            }
        }
        if let Some(format) = self.log_format.as_deref() {
            if !LOG_FORMATS.contains(&format) {
                return Err(ValidationError::new(&format!(
                    "Unknown log format '{}' (expected text, ext or json)",
                    format
                )));
            }
        }
        Ok(())
    }

    /// Session options for validated arguments
    ///
    /// Connection establishment gets the same budget as the network deadline.
    pub fn session_options(&self) -> Result<SessionOptions, ValidationError> {
        let timeout = self.timeout_duration();
        let connection = ConnectionSettings {
            url: validate_broker_url(&self.broker_url())?,
            creds_file: self.creds.clone(),
            connect_timeout: timeout,
            ..ConnectionSettings::default()
        };
        let order = self
            .report_order()
            .map_err(|e| ValidationError::new(&format!("Invalid report order: {}", e)))?;

        Ok(SessionOptions {
            connection,
            timeout,
            order,
        })
    }
}
