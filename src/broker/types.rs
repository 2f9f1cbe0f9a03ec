//! Data exchanged across the broker boundary

use std::path::PathBuf;
use std::time::Duration;

/// Default broker endpoint when nothing else is configured
pub const DEFAULT_BROKER_URL: &str = "nats://localhost:4222";

/// How to reach the broker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionSettings {
    /// One or more comma-separated server URLs
    pub url: String,
    /// Optional credentials file (JWT + nkey seed)
    pub creds_file: Option<PathBuf>,
    /// Bound on establishing the initial connection
    pub connect_timeout: Duration,
    /// Name the client announces to the server
    pub client_name: String,
}

impl Default for ConnectionSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_BROKER_URL.to_string(),
            creds_file: None,
            connect_timeout: Duration::from_secs(10),
            client_name: concat!("streamlag/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Sequence state of a stream as reported by the broker
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StreamState {
    pub name: String,
    pub first_sequence: u64,
    pub last_sequence: u64,
    pub messages: u64,
    pub consumer_count: usize,
}

/// One consumer bound to a stream
///
/// An empty `durable_name` marks an ephemeral consumer.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ConsumerDescriptor {
    /// Broker-assigned consumer name (equals the durable name for durables)
    pub name: String,
    pub durable_name: String,
    /// Stream sequence of the last message delivered to this consumer
    pub delivered_stream_seq: u64,
    /// Messages matching the consumer filter not yet delivered, per the broker
    pub num_pending: u64,
}

impl ConsumerDescriptor {
    pub fn durable(name: &str, delivered_stream_seq: u64) -> Self {
        Self {
            name: name.to_string(),
            durable_name: name.to_string(),
            delivered_stream_seq,
            num_pending: 0,
        }
    }

    pub fn ephemeral(name: &str, delivered_stream_seq: u64) -> Self {
        Self {
            name: name.to_string(),
            durable_name: String::new(),
            delivered_stream_seq,
            num_pending: 0,
        }
    }

    pub fn with_pending(mut self, num_pending: u64) -> Self {
        self.num_pending = num_pending;
        self
    }

    pub fn is_durable(&self) -> bool {
        !self.durable_name.is_empty()
    }
}
