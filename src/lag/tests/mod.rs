//! Test modules for the lag core
//!
//! Organised by component; every suite runs against the in-memory broker.

mod reporter;

use crate::broker::api::{
    BrokerConnector, ConnectionSettings, ConsumerDescriptor, MemoryBroker, StreamBroker,
};

/// ORDERS at sequence 1000 with durables A, B, C and two ephemeral consumers
pub(crate) fn orders_broker() -> MemoryBroker {
    MemoryBroker::new()
        .with_stream("ORDERS", 1000)
        .with_consumer("ORDERS", ConsumerDescriptor::durable("A", 1000))
        .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("eph-1", 400))
        .with_consumer("ORDERS", ConsumerDescriptor::durable("B", 950).with_pending(50))
        .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("eph-2", 1000))
        .with_consumer("ORDERS", ConsumerDescriptor::durable("C", 1000))
}

pub(crate) async fn open(broker: &MemoryBroker) -> Box<dyn StreamBroker> {
    broker
        .connect(&ConnectionSettings::default())
        .await
        .expect("memory broker accepts connections")
}
