//! Generic error handling utilities
//!
//! Lets the application report any domain error the same way: operator-fixable
//! problems show their own message, broker and system failures show the
//! operation that failed with the underlying detail at debug level.

/// Trait for errors that can distinguish between user-actionable and system errors
///
/// When `is_user_actionable()` returns `true`, `user_message()` must return
/// `Some(message)`. When it returns `false`, `user_message()` returns `None`.
pub trait ContextualError: std::error::Error {
    /// Returns true if the operator can fix this by changing the invocation
    ///
    /// Examples: missing stream name, malformed broker URL, bad config value.
    /// Counter-examples: broker unreachable, stream deleted, deadline exceeded.
    fn is_user_actionable(&self) -> bool;

    /// Returns the specific user message if this is a user-actionable error
    fn user_message(&self) -> Option<&str>;
}

/// Log errors with appropriate detail level based on error specificity
///
/// # Examples
/// ```rust,no_run
/// # use streamlag::core::error_handling::log_error_with_context;
/// # use streamlag::core::validation::ValidationError;
/// let err = ValidationError::new("Stream name must be provided");
/// log_error_with_context(&err, "Configuration loading");
/// // Logs: "FATAL: Stream name must be provided"
/// ```
pub fn log_error_with_context<E: ContextualError + std::fmt::Display + std::fmt::Debug>(
    error: &E,
    operation_context: &str,
) {
    match error.user_message().filter(|_| error.is_user_actionable()) {
        Some(user_msg) => log::error!("FATAL: {}", user_msg),
        None => log::error!("FATAL: {}: {}", operation_context, error),
    }
    log::debug!("DEBUG_DETAILS: {:?}", error);
}
