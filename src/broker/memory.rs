//! In-memory broker
//!
//! Holds streams and consumer cursors in process so the lag core can be
//! exercised without a server. Faults can be injected per stream to reproduce
//! unreachable brokers, missing streams, and requests that never answer.
//!
//! # Example
//!
//! ```rust
//! use streamlag::broker::api::{ConsumerDescriptor, MemoryBroker};
//!
//! let broker = MemoryBroker::new()
//!     .with_stream("ORDERS", 1000)
//!     .with_consumer("ORDERS", ConsumerDescriptor::durable("billing", 950));
//! assert_eq!(broker.connect_count(), 0);
//! ```

use crate::broker::error::{BrokerError, BrokerResult};
use crate::broker::traits::{BrokerConnector, ConsumerListing, StreamBroker, StreamHandle};
use crate::broker::types::{ConnectionSettings, ConsumerDescriptor, StreamState};
use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Failure to inject into one stream's requests
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StreamFault {
    #[default]
    None,
    /// Stream lookup fails with a request error
    ResolveFails(String),
    /// Stream lookup never answers
    ResolveHangs,
    /// Stream info fails with a request error
    InfoFails(String),
    /// Stream info never answers
    InfoHangs,
    /// Listing yields this many consumers, then fails
    ListingFailsAfter(usize, String),
    /// Listing yields this many consumers, then never answers
    ListingHangsAfter(usize),
}

#[derive(Debug, Clone, Default)]
struct MemoryStream {
    state: StreamState,
    consumers: Vec<ConsumerDescriptor>,
    fault: StreamFault,
}

#[derive(Debug, Default)]
struct MemoryState {
    streams: HashMap<String, MemoryStream>,
    refuse_connections: Option<String>,
    connects: usize,
    closes: usize,
}

/// Shared in-memory broker; clones observe the same state
#[derive(Debug, Clone, Default)]
pub struct MemoryBroker {
    state: Arc<Mutex<MemoryState>>,
    endpoint: String,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self {
            state: Arc::default(),
            endpoint: "memory://local".to_string(),
        }
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A poisoned lock only means another test thread panicked mid-update
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Add (or replace) a stream whose sequences run 1..=last_seq
    pub fn with_stream(self, name: &str, last_seq: u64) -> Self {
        self.lock().streams.insert(
            name.to_string(),
            MemoryStream {
                state: StreamState {
                    name: name.to_string(),
                    first_sequence: u64::from(last_seq > 0),
                    last_sequence: last_seq,
                    messages: last_seq,
                    consumer_count: 0,
                },
                ..MemoryStream::default()
            },
        );
        self
    }

    /// Bind a consumer to an existing stream
    pub fn with_consumer(self, stream: &str, consumer: ConsumerDescriptor) -> Self {
        if let Some(entry) = self.lock().streams.get_mut(stream) {
            entry.consumers.push(consumer);
            entry.state.consumer_count = entry.consumers.len();
        }
        self
    }

    pub fn with_fault(self, stream: &str, fault: StreamFault) -> Self {
        self.set_fault(stream, fault);
        self
    }

    /// Make every connection attempt fail with `message`
    pub fn refusing_connections(self, message: &str) -> Self {
        self.lock().refuse_connections = Some(message.to_string());
        self
    }

    pub fn set_fault(&self, stream: &str, fault: StreamFault) {
        if let Some(entry) = self.lock().streams.get_mut(stream) {
            entry.fault = fault;
        }
    }

    /// Append `count` messages to a stream, advancing its head
    pub fn publish(&self, stream: &str, count: u64) {
        if let Some(entry) = self.lock().streams.get_mut(stream) {
            if entry.state.first_sequence == 0 && count > 0 {
                entry.state.first_sequence = 1;
            }
            entry.state.last_sequence += count;
            entry.state.messages += count;
        }
    }

    /// Move a consumer's delivery cursor
    pub fn deliver(&self, stream: &str, consumer: &str, delivered_stream_seq: u64) {
        if let Some(entry) = self.lock().streams.get_mut(stream) {
            for descriptor in entry.consumers.iter_mut().filter(|c| c.name == consumer) {
                descriptor.delivered_stream_seq = delivered_stream_seq;
            }
        }
    }

    /// Number of successful or attempted connections
    pub fn connect_count(&self) -> usize {
        self.lock().connects
    }

    /// Number of times a connection was closed
    pub fn close_count(&self) -> usize {
        self.lock().closes
    }

    fn stream(&self, name: &str) -> Option<MemoryStream> {
        self.lock().streams.get(name).cloned()
    }
}

#[async_trait]
impl BrokerConnector for MemoryBroker {
    async fn connect(&self, settings: &ConnectionSettings) -> BrokerResult<Box<dyn StreamBroker>> {
        let refused = {
            let mut state = self.lock();
            state.connects += 1;
            state.refuse_connections.clone()
        };
        if let Some(message) = refused {
            return Err(BrokerError::Connect {
                url: settings.url.clone(),
                message,
            });
        }
        Ok(Box::new(MemoryBroker {
            state: self.state.clone(),
            endpoint: settings.url.clone(),
        }))
    }
}

#[async_trait]
impl StreamBroker for MemoryBroker {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn resolve_stream(&self, name: &str) -> BrokerResult<Box<dyn StreamHandle>> {
        let entry = self.stream(name).ok_or_else(|| BrokerError::StreamNotFound {
            stream: name.to_string(),
        })?;
        match entry.fault {
            StreamFault::ResolveFails(message) => Err(BrokerError::Request { message }),
            StreamFault::ResolveHangs => futures::future::pending().await,
            _ => Ok(Box::new(MemoryStreamHandle {
                name: name.to_string(),
                broker: self.clone(),
            })),
        }
    }

    async fn close(&self) -> BrokerResult<()> {
        self.lock().closes += 1;
        Ok(())
    }
}

struct MemoryStreamHandle {
    name: String,
    broker: MemoryBroker,
}

impl MemoryStreamHandle {
    fn current(&self) -> BrokerResult<MemoryStream> {
        self.broker
            .stream(&self.name)
            .ok_or_else(|| BrokerError::StreamNotFound {
                stream: self.name.clone(),
            })
    }
}

#[async_trait]
impl StreamHandle for MemoryStreamHandle {
    fn name(&self) -> &str {
        &self.name
    }

    async fn info(&mut self) -> BrokerResult<StreamState> {
        let entry = self.current()?;
        match entry.fault {
            StreamFault::InfoFails(message) => Err(BrokerError::Request { message }),
            StreamFault::InfoHangs => futures::future::pending().await,
            _ => Ok(entry.state),
        }
    }

    fn consumers(&self) -> ConsumerListing {
        let entry = match self.current() {
            Ok(entry) => entry,
            Err(err) => return stream::once(async move { Err(err) }).boxed(),
        };

        let mut consumers = entry.consumers;
        match entry.fault {
            StreamFault::ListingFailsAfter(count, message) => {
                consumers.truncate(count);
                stream::iter(consumers.into_iter().map(Ok))
                    .chain(stream::once(async move {
                        Err(BrokerError::Request { message })
                    }))
                    .boxed()
            }
            StreamFault::ListingHangsAfter(count) => {
                consumers.truncate(count);
                stream::iter(consumers.into_iter().map(Ok))
                    .chain(stream::pending())
                    .boxed()
            }
            _ => stream::iter(consumers.into_iter().map(Ok)).boxed(),
        }
    }
}
