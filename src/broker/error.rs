//! Broker Error Types

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrokerError {
    #[error("Unable to connect to '{url}': {message}")]
    Connect { url: String, message: String },

    #[error("Stream not found: {stream}")]
    StreamNotFound { stream: String },

    #[error("Request failed: {message}")]
    Request { message: String },
}

impl BrokerError {
    pub fn request(message: impl ToString) -> Self {
        BrokerError::Request {
            message: message.to_string(),
        }
    }
}

/// Result type for broker operations
pub type BrokerResult<T> = Result<T, BrokerError>;
