//! Broker Boundary
//!
//! Everything the lag core needs from a message broker, expressed as three
//! small async traits, plus the adapters that implement them.
//!
//! ## Adapters
//!
//! - **nats**: NATS JetStream through `async-nats`
//! - **memory**: in-process broker with fault injection, used by tests and demos
//!
//! The boundary is read-only: nothing here creates, updates, or deletes
//! streams or consumers.

pub mod api;
pub mod error;
pub mod memory;
pub mod nats;
pub mod traits;
pub mod types;

pub use error::{BrokerError, BrokerResult};
pub use traits::{BrokerConnector, ConsumerListing, StreamBroker, StreamHandle};
pub use types::{ConnectionSettings, ConsumerDescriptor, StreamState};
