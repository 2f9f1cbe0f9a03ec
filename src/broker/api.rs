//! Broker API
//!
//! Public surface of the broker boundary, following the same pattern as
//! `lag::api`.

// Traits the lag core is written against
pub use crate::broker::traits::{BrokerConnector, ConsumerListing, StreamBroker, StreamHandle};

// Error handling
pub use crate::broker::error::{BrokerError, BrokerResult};

// Data exchanged across the boundary
pub use crate::broker::types::{ConnectionSettings, ConsumerDescriptor, StreamState};

// Adapters
pub use crate::broker::memory::{MemoryBroker, StreamFault};
pub use crate::broker::nats::NatsConnector;
