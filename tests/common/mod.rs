//! Common test utilities and helpers
//!
//! Broker fixtures shared by the integration suites.

use streamlag::broker::api::{ConsumerDescriptor, MemoryBroker};

/// ORDERS at sequence 1000: durables A (caught up), B (50 behind), C (caught up)
/// interleaved with two ephemeral consumers
pub fn orders_broker() -> MemoryBroker {
    MemoryBroker::new()
        .with_stream("ORDERS", 1000)
        .with_consumer("ORDERS", ConsumerDescriptor::durable("A", 1000))
        .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("Xk31pQ", 700))
        .with_consumer("ORDERS", ConsumerDescriptor::durable("B", 950).with_pending(50))
        .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("Zr08aa", 1000))
        .with_consumer("ORDERS", ConsumerDescriptor::durable("C", 1000))
}

/// A stream with only ephemeral consumers
pub fn ephemeral_only_broker() -> MemoryBroker {
    MemoryBroker::new()
        .with_stream("EVENTS", 42)
        .with_consumer("EVENTS", ConsumerDescriptor::ephemeral("tmp1", 40))
}
