//! Validation utilities for CLI arguments and configuration values
//!
//! Everything here runs before any network activity, so a rejected value never
//! costs a broker connection.

use std::fmt;

/// Characters JetStream does not accept in a stream name
const FORBIDDEN_STREAM_CHARS: &[char] = &['.', '*', '>', '/', '\\'];

/// Validation error with a user-facing message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    message: String,
}

impl ValidationError {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }

    /// Message suitable for showing directly to the operator
    pub fn details(&self) -> &str {
        &self.message
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ValidationError {}

impl crate::core::error_handling::ContextualError for ValidationError {
    fn is_user_actionable(&self) -> bool {
        true
    }

    fn user_message(&self) -> Option<&str> {
        Some(&self.message)
    }
}

/// Validate a stream name and return it trimmed
pub fn validate_stream_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new(
            "Stream name must be provided via the --stream flag or the 'stream' config key",
        ));
    }

    if let Some(bad) = trimmed
        .chars()
        .find(|c| c.is_whitespace() || c.is_control() || FORBIDDEN_STREAM_CHARS.contains(c))
    {
        return Err(ValidationError::new(&format!(
            "Stream name '{}' contains invalid character {:?}",
            trimmed, bad
        )));
    }

    Ok(trimmed.to_string())
}

/// Validate a broker URL (one or more comma-separated server addresses)
pub fn validate_broker_url(url: &str) -> Result<String, ValidationError> {
    let trimmed = url.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::new("Broker URL cannot be empty"));
    }

    for server in trimmed.split(',') {
        let server = server.trim();
        if server.is_empty() {
            return Err(ValidationError::new(&format!(
                "Broker URL '{}' contains an empty server entry",
                trimmed
            )));
        }
        if server.chars().any(char::is_whitespace) {
            return Err(ValidationError::new(&format!(
                "Broker URL '{}' contains whitespace",
                server
            )));
        }
        if let Some((scheme, _)) = server.split_once("://") {
            if !matches!(scheme, "nats" | "tls" | "ws" | "wss") {
                return Err(ValidationError::new(&format!(
                    "Broker URL '{}' uses unsupported scheme '{}'",
                    server, scheme
                )));
            }
        }
    }

    Ok(trimmed.to_string())
}

/// Validate positive integer value
pub fn validate_positive_int(value: &str) -> Result<u64, String> {
    match value.trim().parse::<u64>() {
        Ok(0) => Err("Value must be greater than 0".to_string()),
        Ok(n) => Ok(n),
        Err(_) => Err(format!("'{}' is not a valid positive integer", value)),
    }
}

/// Upper bound for the network timeout, in seconds
pub const MAX_TIMEOUT_SECS: u64 = 3600;

/// Positive integer no larger than [`MAX_TIMEOUT_SECS`]
pub fn validate_timeout_secs(value: &str) -> Result<u64, String> {
    let secs = validate_positive_int(value)?;
    if secs > MAX_TIMEOUT_SECS {
        return Err(format!(
            "Timeout of {} seconds exceeds the maximum of {}",
            secs, MAX_TIMEOUT_SECS
        ));
    }
    Ok(secs)
}
