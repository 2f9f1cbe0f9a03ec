//! Lag Session
//!
//! One invocation end to end: validate, connect, snapshot the stream, enumerate
//! consumer lag into a sink, and close the connection on every path.

use crate::broker::traits::{BrokerConnector, StreamBroker};
use crate::broker::types::ConnectionSettings;
use crate::core::shutdown::ShutdownCoordinator;
use crate::core::validation::validate_stream_name;
use crate::lag::deadline::{Deadline, DEFAULT_BUDGET};
use crate::lag::error::{Interruption, LagError, LagResult, Operation};
use crate::lag::inspector::fetch_stream_snapshot;
use crate::lag::reporter::enumerate_lag;
use crate::lag::sink::ReportSink;
use crate::lag::types::{sort_reports, LagSummary, ReportOrder};
use futures::StreamExt;
use std::time::Duration;

/// Settings for a lag session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionOptions {
    pub connection: ConnectionSettings,
    /// Budget shared by stream resolution, stream info and consumer listing
    pub timeout: Duration,
    pub order: ReportOrder,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            connection: ConnectionSettings::default(),
            timeout: DEFAULT_BUDGET,
            order: ReportOrder::default(),
        }
    }
}

pub struct LagSession<C: BrokerConnector> {
    connector: C,
    options: SessionOptions,
}

impl<C: BrokerConnector> LagSession<C> {
    pub fn new(connector: C, options: SessionOptions) -> Self {
        Self { connector, options }
    }

    pub fn options(&self) -> &SessionOptions {
        &self.options
    }

    /// Produce the lag report for `stream_name` into `sink`
    ///
    /// An invalid stream name fails before any connection is attempted. Once
    /// connected, the connection is closed whatever the outcome.
    pub async fn run<S: ReportSink + ?Sized>(
        &self,
        stream_name: &str,
        shutdown: Option<&ShutdownCoordinator>,
        sink: &mut S,
    ) -> LagResult<LagSummary> {
        let stream_name = validate_stream_name(stream_name)?;

        let broker = self.connect(&stream_name, shutdown).await?;
        let outcome = self.report(broker.as_ref(), &stream_name, shutdown, sink).await;

        log::debug!("Closing connection to {}", broker.endpoint());
        if let Err(e) = broker.close().await {
            log::warn!("Error closing connection to {}: {}", broker.endpoint(), e);
        }
        outcome
    }

    async fn connect(
        &self,
        stream_name: &str,
        shutdown: Option<&ShutdownCoordinator>,
    ) -> LagResult<Box<dyn StreamBroker>> {
        let settings = &self.options.connection;
        log::info!("Connecting to broker at {}...", settings.url);

        let mut deadline = Deadline::start(settings.connect_timeout);
        if let Some(coordinator) = shutdown {
            deadline = deadline.with_shutdown(coordinator.signal());
        }

        let broker = match deadline.bound(self.connector.connect(settings)).await {
            Ok(Ok(broker)) => broker,
            Ok(Err(cause)) => {
                return Err(LagError::ConnectionFailure {
                    url: settings.url.clone(),
                    message: cause.to_string(),
                })
            }
            Err(Interruption::Expired) => {
                return Err(LagError::ConnectionFailure {
                    url: settings.url.clone(),
                    message: format!("no connection within {:?}", settings.connect_timeout),
                })
            }
            Err(Interruption::Cancelled) => {
                return Err(LagError::Cancelled {
                    operation: Operation::Connect,
                    stream: stream_name.to_string(),
                })
            }
        };

        log::info!("Successfully connected to {}.", broker.endpoint());
        Ok(broker)
    }

    async fn report<S: ReportSink + ?Sized>(
        &self,
        broker: &dyn StreamBroker,
        stream_name: &str,
        shutdown: Option<&ShutdownCoordinator>,
        sink: &mut S,
    ) -> LagResult<LagSummary> {
        let order = self.options.order;
        let mut deadline = Deadline::start(self.options.timeout);
        if let Some(coordinator) = shutdown {
            deadline = deadline.with_shutdown(coordinator.signal());
        }

        let (handle, snapshot) = fetch_stream_snapshot(broker, stream_name, &mut deadline).await?;
        let output = |e: std::io::Error| LagError::output(stream_name, e);
        sink.begin(&snapshot).map_err(output)?;

        let mut reports = enumerate_lag(handle.as_ref(), snapshot.last_seq, deadline);
        let mut held = Vec::new();
        let mut failure = None;
        while let Some(item) = reports.next().await {
            match item {
                Ok(report) if order.is_sorted() => held.push(report),
                Ok(report) => sink.record(&report).map_err(output)?,
                Err(e) => {
                    failure = Some(e);
                    break;
                }
            }
        }

        // Held reports outlive only a broker-side listing error; once the
        // deadline has passed or shutdown was requested nothing more is emitted
        if failure.as_ref().map_or(true, LagError::permits_partial_output) {
            sort_reports(&mut held, order);
            for report in &held {
                sink.record(report).map_err(output)?;
            }
        } else if !held.is_empty() {
            log::debug!("Discarding {} unsorted report(s) after interruption", held.len());
        }

        if let Some(error) = failure {
            sink.abort(&error).map_err(output)?;
            return Err(error);
        }

        let tally = reports.tally();
        let summary = LagSummary {
            snapshot,
            durable: tally.durable,
            ephemeral: tally.ephemeral,
        };
        if !summary.has_durable_consumers() {
            log::debug!("No durable consumers found on stream '{}'", stream_name);
        }
        sink.finish(&summary).map_err(output)?;
        Ok(summary)
    }
}
