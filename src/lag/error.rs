//! Lag Error Types

use crate::broker::error::BrokerError;
use crate::core::validation::ValidationError;
use std::time::Duration;

/// Network phase an error occurred in
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum_macros::Display)]
pub enum Operation {
    #[strum(serialize = "connect")]
    Connect,
    #[strum(serialize = "resolve stream")]
    ResolveStream,
    #[strum(serialize = "fetch stream info")]
    FetchStreamInfo,
    #[strum(serialize = "list consumers")]
    ListConsumers,
}

/// Why a bounded operation did not complete
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Interruption {
    Expired,
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LagError {
    #[error("Invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("Error connecting to broker at '{url}': {message}")]
    ConnectionFailure { url: String, message: String },

    #[error("Error getting stream info for '{stream}' ({operation}): {message}")]
    StreamUnavailable {
        stream: String,
        operation: Operation,
        message: String,
    },

    #[error("Error listing consumers on stream '{stream}': {message}")]
    ConsumerListUnavailable { stream: String, message: String },

    #[error("Deadline of {budget:?} exceeded during '{operation}' on stream '{stream}'")]
    DeadlineExceeded {
        operation: Operation,
        stream: String,
        budget: Duration,
    },

    #[error("Cancelled during '{operation}' on stream '{stream}'")]
    Cancelled { operation: Operation, stream: String },

    #[error("Error writing report for stream '{stream}': {message}")]
    Output { stream: String, message: String },
}

impl LagError {
    /// Map an interrupted network phase to the matching error
    pub fn interrupted(
        interruption: Interruption,
        operation: Operation,
        stream: &str,
        budget: Duration,
    ) -> Self {
        match interruption {
            Interruption::Expired => LagError::DeadlineExceeded {
                operation,
                stream: stream.to_string(),
                budget,
            },
            Interruption::Cancelled => LagError::Cancelled {
                operation,
                stream: stream.to_string(),
            },
        }
    }

    pub fn stream_unavailable(stream: &str, operation: Operation, cause: BrokerError) -> Self {
        LagError::StreamUnavailable {
            stream: stream.to_string(),
            operation,
            message: cause.to_string(),
        }
    }

    pub fn consumer_list_unavailable(stream: &str, cause: BrokerError) -> Self {
        LagError::ConsumerListUnavailable {
            stream: stream.to_string(),
            message: cause.to_string(),
        }
    }

    pub fn output(stream: &str, cause: std::io::Error) -> Self {
        LagError::Output {
            stream: stream.to_string(),
            message: cause.to_string(),
        }
    }

    /// Whether reports gathered before this error may still be emitted
    ///
    /// Only a broker-side listing failure qualifies. An expired deadline or a
    /// shutdown request ends output at the point of failure.
    pub fn permits_partial_output(&self) -> bool {
        matches!(self, LagError::ConsumerListUnavailable { .. })
    }

    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            LagError::InvalidArgument { .. } => 2,
            LagError::Cancelled { .. } => 130,
            _ => 1,
        }
    }
}

impl From<ValidationError> for LagError {
    fn from(err: ValidationError) -> Self {
        LagError::InvalidArgument {
            message: err.details().to_string(),
        }
    }
}

impl crate::core::error_handling::ContextualError for LagError {
    fn is_user_actionable(&self) -> bool {
        matches!(self, LagError::InvalidArgument { .. })
    }

    fn user_message(&self) -> Option<&str> {
        match self {
            LagError::InvalidArgument { message } => Some(message),
            _ => None,
        }
    }
}

/// Result type for lag operations
pub type LagResult<T> = Result<T, LagError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error_handling::ContextualError;

    #[test]
    fn test_messages_name_operation_and_stream() {
        let err = LagError::interrupted(
            Interruption::Expired,
            Operation::FetchStreamInfo,
            "ORDERS",
            Duration::from_secs(10),
        );
        let text = err.to_string();
        assert!(text.contains("fetch stream info"), "got: {}", text);
        assert!(text.contains("ORDERS"));
        assert!(text.contains("10s"));

        let err = LagError::consumer_list_unavailable(
            "ORDERS",
            BrokerError::request("stream deleted"),
        );
        assert!(err.to_string().contains("ORDERS"));
        assert!(err.to_string().contains("stream deleted"));
    }

    #[test]
    fn test_cancelled_interruption() {
        let err = LagError::interrupted(
            Interruption::Cancelled,
            Operation::ListConsumers,
            "ORDERS",
            Duration::from_secs(1),
        );
        assert_eq!(
            err,
            LagError::Cancelled {
                operation: Operation::ListConsumers,
                stream: "ORDERS".to_string()
            }
        );
        assert_eq!(err.exit_code(), 130);
    }

    #[test]
    fn test_exit_codes_and_actionability() {
        let invalid: LagError = ValidationError::new("Stream name must be provided").into();
        assert_eq!(invalid.exit_code(), 2);
        assert!(invalid.is_user_actionable());
        assert_eq!(invalid.user_message(), Some("Stream name must be provided"));

        let unavailable = LagError::stream_unavailable(
            "ORDERS",
            Operation::ResolveStream,
            BrokerError::StreamNotFound {
                stream: "ORDERS".to_string(),
            },
        );
        assert_eq!(unavailable.exit_code(), 1);
        assert!(!unavailable.is_user_actionable());
        assert_eq!(unavailable.user_message(), None);
    }

    #[test]
    fn test_partial_output_only_after_listing_error() {
        let listing = LagError::consumer_list_unavailable("ORDERS", BrokerError::request("gone"));
        assert!(listing.permits_partial_output());

        for interruption in [Interruption::Expired, Interruption::Cancelled] {
            let err = LagError::interrupted(
                interruption,
                Operation::ListConsumers,
                "ORDERS",
                Duration::from_secs(5),
            );
            assert!(!err.permits_partial_output(), "{:?}", err);
        }
    }
}
