//! streamlag: JetStream consumer lag reporting
//!
//! The [`lag`] core is broker-agnostic and runs against any
//! [`broker::BrokerConnector`]; the binary wires it to NATS.

pub mod app;
pub mod broker;
pub mod core;
pub mod lag;
