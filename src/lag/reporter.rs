//! Consumer Lag Reporter
//!
//! Drains the broker's consumer listing and turns every durable consumer into a
//! [`LagReport`] computed against one stream snapshot. The result is a lazy
//! stream: nothing is requested from the broker until it is polled.

use crate::broker::traits::{ConsumerListing, StreamHandle};
use crate::lag::deadline::Deadline;
use crate::lag::error::{LagError, LagResult, Operation};
use crate::lag::types::LagReport;
use futures::stream::{self, BoxStream, Stream, StreamExt};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::task::{Context, Poll};

/// Counts of consumers seen so far by one enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EnumerationTally {
    pub durable: usize,
    pub ephemeral: usize,
}

#[derive(Debug, Default)]
struct TallyCounters {
    durable: AtomicUsize,
    ephemeral: AtomicUsize,
}

/// Lazy stream of lag reports for one stream
///
/// After an `Err` item the stream ends. Reports yielded before the error stay
/// valid; callers that print as they go will have printed them already.
pub struct LagReportStream {
    inner: BoxStream<'static, LagResult<LagReport>>,
    counters: Arc<TallyCounters>,
}

impl LagReportStream {
    /// Consumers seen so far, durable and ephemeral
    pub fn tally(&self) -> EnumerationTally {
        EnumerationTally {
            durable: self.counters.durable.load(Ordering::Relaxed),
            ephemeral: self.counters.ephemeral.load(Ordering::Relaxed),
        }
    }
}

impl Stream for LagReportStream {
    type Item = LagResult<LagReport>;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        self.inner.as_mut().poll_next(cx)
    }
}

struct Enumeration {
    stream_name: String,
    stream_last_seq: u64,
    listing: ConsumerListing,
    deadline: Deadline,
    counters: Arc<TallyCounters>,
    finished: bool,
}

impl Enumeration {
    /// Pull listing items until one produces output or the listing ends
    async fn next_report(&mut self) -> Option<LagResult<LagReport>> {
        if self.finished {
            return None;
        }
        loop {
            let budget = self.deadline.budget();
            let item = match self.deadline.bound(self.listing.next()).await {
                Ok(item) => item,
                Err(interruption) => {
                    self.finished = true;
                    return Some(Err(LagError::interrupted(
                        interruption,
                        Operation::ListConsumers,
                        &self.stream_name,
                        budget,
                    )));
                }
            };

            match item {
                None => {
                    self.finished = true;
                    return None;
                }
                Some(Err(cause)) => {
                    self.finished = true;
                    return Some(Err(LagError::consumer_list_unavailable(
                        &self.stream_name,
                        cause,
                    )));
                }
                Some(Ok(consumer)) => match LagReport::for_consumer(&consumer, self.stream_last_seq) {
                    Some(report) => {
                        self.counters.durable.fetch_add(1, Ordering::Relaxed);
                        log::debug!(
                            "Consumer '{}' delivered {} of {} (lag {})",
                            report.consumer_name,
                            report.consumer_last_seq,
                            report.stream_last_seq,
                            report.lag
                        );
                        return Some(Ok(report));
                    }
                    None => {
                        self.counters.ephemeral.fetch_add(1, Ordering::Relaxed);
                        log::debug!("Skipping ephemeral consumer '{}'", consumer.name);
                    }
                },
            }
        }
    }
}

/// Enumerate the durable consumers of `handle` and compute their lag
///
/// Every report uses `stream_last_seq`, so lags within one run are comparable
/// with each other. The listing is bounded by `deadline`, which normally is the
/// same deadline the stream snapshot was fetched under.
pub fn enumerate_lag(
    handle: &dyn StreamHandle,
    stream_last_seq: u64,
    deadline: Deadline,
) -> LagReportStream {
    let counters = Arc::new(TallyCounters::default());
    let state = Enumeration {
        stream_name: handle.name().to_string(),
        stream_last_seq,
        listing: handle.consumers(),
        deadline,
        counters: counters.clone(),
        finished: false,
    };

    let inner = stream::unfold(state, |mut state| async move {
        let item = state.next_report().await?;
        Some((item, state))
    })
    .boxed();

    LagReportStream { inner, counters }
}
