//! NATS JetStream adapter
//!
//! Maps the broker traits onto `async-nats`. Only read operations are used:
//! stream lookup, stream info, and the paged consumer listing.

use crate::broker::error::{BrokerError, BrokerResult};
use crate::broker::traits::{BrokerConnector, ConsumerListing, StreamBroker, StreamHandle};
use crate::broker::types::{ConnectionSettings, ConsumerDescriptor, StreamState};
use async_nats::jetstream::context::{GetStreamError, GetStreamErrorKind};
use async_nats::jetstream::{self, consumer, ErrorCode};
use async_trait::async_trait;
use futures::StreamExt;

/// Connects to NATS servers
#[derive(Debug, Clone, Copy, Default)]
pub struct NatsConnector;

#[async_trait]
impl BrokerConnector for NatsConnector {
    async fn connect(&self, settings: &ConnectionSettings) -> BrokerResult<Box<dyn StreamBroker>> {
        let connect_error = |message: String| BrokerError::Connect {
            url: settings.url.clone(),
            message,
        };

        let mut options = async_nats::ConnectOptions::new()
            .name(&settings.client_name)
            .connection_timeout(settings.connect_timeout);

        if let Some(creds) = &settings.creds_file {
            log::debug!("Using credentials file: {}", creds.display());
            options = options.credentials_file(creds).await.map_err(|e| {
                connect_error(format!(
                    "cannot load credentials file '{}': {}",
                    creds.display(),
                    e
                ))
            })?;
        }

        let client = options
            .connect(settings.url.as_str())
            .await
            .map_err(|e| connect_error(e.to_string()))?;

        Ok(Box::new(NatsBroker {
            url: settings.url.clone(),
            jetstream: jetstream::new(client.clone()),
            client,
        }))
    }
}

/// An open NATS connection with a JetStream context
pub struct NatsBroker {
    url: String,
    client: async_nats::Client,
    jetstream: jetstream::Context,
}

#[async_trait]
impl StreamBroker for NatsBroker {
    fn endpoint(&self) -> &str {
        &self.url
    }

    async fn resolve_stream(&self, name: &str) -> BrokerResult<Box<dyn StreamHandle>> {
        match self.jetstream.get_stream(name).await {
            Ok(stream) => Ok(Box::new(NatsStream {
                name: name.to_string(),
                stream,
            })),
            Err(err) => Err(stream_lookup_error(name, err)),
        }
    }

    async fn close(&self) -> BrokerResult<()> {
        // The socket closes once the last client clone is dropped
        self.client.flush().await.map_err(BrokerError::request)
    }
}

struct NatsStream {
    name: String,
    stream: jetstream::stream::Stream,
}

#[async_trait]
impl StreamHandle for NatsStream {
    fn name(&self) -> &str {
        &self.name
    }

    async fn info(&mut self) -> BrokerResult<StreamState> {
        let info = self.stream.info().await.map_err(BrokerError::request)?;
        Ok(StreamState {
            name: info.config.name.clone(),
            first_sequence: info.state.first_sequence,
            last_sequence: info.state.last_sequence,
            messages: info.state.messages,
            consumer_count: info.state.consumer_count,
        })
    }

    fn consumers(&self) -> ConsumerListing {
        self.stream
            .consumers()
            .map(|item| item.map(descriptor_from_info).map_err(BrokerError::request))
            .boxed()
    }
}

fn descriptor_from_info(info: consumer::Info) -> ConsumerDescriptor {
    ConsumerDescriptor {
        name: info.name,
        durable_name: info.config.durable_name.unwrap_or_default(),
        delivered_stream_seq: info.delivered.stream_sequence,
        num_pending: info.num_pending,
    }
}

fn stream_lookup_error(name: &str, err: GetStreamError) -> BrokerError {
    match err.kind() {
        GetStreamErrorKind::JetStream(js) if js.error_code() == ErrorCode::STREAM_NOT_FOUND => {
            BrokerError::StreamNotFound {
                stream: name.to_string(),
            }
        }
        _ => BrokerError::request(err),
    }
}
