//! Traits the lag core is written against

use crate::broker::error::BrokerResult;
use crate::broker::types::{ConnectionSettings, ConsumerDescriptor, StreamState};
use async_trait::async_trait;
use futures::stream::BoxStream;

/// Lazy, finite listing of every consumer bound to a stream
///
/// Adapters fetch further pages as the listing is polled; an `Err` item means
/// the listing broke off and nothing after it is meaningful.
pub type ConsumerListing = BoxStream<'static, BrokerResult<ConsumerDescriptor>>;

/// Establishes broker connections
#[async_trait]
pub trait BrokerConnector: Send + Sync {
    async fn connect(&self, settings: &ConnectionSettings) -> BrokerResult<Box<dyn StreamBroker>>;
}

/// An open broker connection
#[async_trait]
pub trait StreamBroker: Send + Sync {
    /// Endpoint this connection was made to, for log and error messages
    fn endpoint(&self) -> &str;

    /// Look a stream up by name in the broker's stream registry
    async fn resolve_stream(&self, name: &str) -> BrokerResult<Box<dyn StreamHandle>>;

    /// Flush and release the connection
    async fn close(&self) -> BrokerResult<()>;
}

/// A resolved stream
#[async_trait]
pub trait StreamHandle: Send + Sync {
    fn name(&self) -> &str;

    /// Query the stream's current sequence state from the broker
    async fn info(&mut self) -> BrokerResult<StreamState>;

    /// Start listing the consumers bound to this stream
    fn consumers(&self) -> ConsumerListing;
}
