//! Lag data model

use crate::broker::types::{ConsumerDescriptor, StreamState};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;

/// Point-in-time view of a stream's sequence state
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StreamSnapshot {
    pub name: String,
    pub last_seq: u64,
    pub first_seq: u64,
    pub messages: u64,
    pub consumer_count: usize,
    pub taken_at: DateTime<Utc>,
}

impl StreamSnapshot {
    /// Capture broker state for `name`, stamped with the current time
    pub fn capture(name: &str, state: StreamState) -> Self {
        Self {
            name: name.to_string(),
            last_seq: state.last_sequence,
            first_seq: state.first_sequence,
            messages: state.messages,
            consumer_count: state.consumer_count,
            taken_at: Utc::now(),
        }
    }
}

/// Lag of one durable consumer against the run's stream snapshot
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LagReport {
    pub consumer_name: String,
    pub stream_last_seq: u64,
    pub consumer_last_seq: u64,
    pub lag: i64,
    pub num_pending: u64,
}

impl LagReport {
    /// Build the report for a consumer; `None` for ephemeral consumers
    pub fn for_consumer(consumer: &ConsumerDescriptor, stream_last_seq: u64) -> Option<Self> {
        if !consumer.is_durable() {
            return None;
        }
        Some(Self {
            consumer_name: consumer.durable_name.clone(),
            stream_last_seq,
            consumer_last_seq: consumer.delivered_stream_seq,
            lag: compute_lag(stream_last_seq, consumer.delivered_stream_seq),
            num_pending: consumer.num_pending,
        })
    }

    /// Lag as shown to operators; `clamp_negative` turns "ahead" into 0
    pub fn display_lag(&self, clamp_negative: bool) -> i64 {
        if clamp_negative {
            self.lag.max(0)
        } else {
            self.lag
        }
    }
}

/// `stream_last_seq - consumer_last_seq`, exact whenever the result fits in i64
///
/// Negative values are legitimate: the consumer cursor was read after the
/// stream snapshot and has moved past it.
pub fn compute_lag(stream_last_seq: u64, consumer_last_seq: u64) -> i64 {
    let diff = i128::from(stream_last_seq) - i128::from(consumer_last_seq);
    i64::try_from(diff).unwrap_or(if diff < 0 { i64::MIN } else { i64::MAX })
}

/// Order in which reports are handed to the sink
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    strum_macros::Display,
    strum_macros::EnumString,
    strum_macros::EnumIter,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ReportOrder {
    /// Whatever order the broker lists consumers in
    #[default]
    Broker,
    /// Ascending consumer name
    Name,
    /// Most lag first, ties by name
    Lag,
}

impl ReportOrder {
    /// Whether the listing must be fully read before emitting
    pub fn is_sorted(self) -> bool {
        !matches!(self, ReportOrder::Broker)
    }
}

/// Sort reports in place; `Broker` leaves them untouched
pub fn sort_reports(reports: &mut [LagReport], order: ReportOrder) {
    match order {
        ReportOrder::Broker => {}
        ReportOrder::Name => reports.sort_by(|a, b| a.consumer_name.cmp(&b.consumer_name)),
        ReportOrder::Lag => reports.sort_by(|a, b| match b.lag.cmp(&a.lag) {
            Ordering::Equal => a.consumer_name.cmp(&b.consumer_name),
            other => other,
        }),
    }
}

/// Outcome of a completed run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LagSummary {
    pub snapshot: StreamSnapshot,
    /// Durable consumers reported
    pub durable: usize,
    /// Ephemeral consumers seen and skipped
    pub ephemeral: usize,
}

impl LagSummary {
    pub fn has_durable_consumers(&self) -> bool {
        self.durable > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn test_compute_lag_exact() {
        assert_eq!(compute_lag(1000, 950), 50);
        assert_eq!(compute_lag(1000, 1000), 0);
        assert_eq!(compute_lag(950, 1000), -50);
        assert_eq!(compute_lag(0, 0), 0);
        assert_eq!(compute_lag(0, 7), -7);
        for (stream, consumer) in [(1u64, 0u64), (12345, 54321), (u32::MAX as u64, 3)] {
            assert_eq!(
                compute_lag(stream, consumer) as i128,
                stream as i128 - consumer as i128
            );
        }
    }

    #[test]
    fn test_compute_lag_saturates_outside_i64() {
        assert_eq!(compute_lag(u64::MAX, 0), i64::MAX);
        assert_eq!(compute_lag(0, u64::MAX), i64::MIN);
        assert_eq!(compute_lag(i64::MAX as u64, 0), i64::MAX);
    }

    #[test]
    fn test_ephemeral_consumer_has_no_report() {
        let ephemeral = ConsumerDescriptor::ephemeral("Xy12", 900);
        assert_eq!(LagReport::for_consumer(&ephemeral, 1000), None);
    }

    #[test]
    fn test_report_uses_durable_name_and_pending() {
        let mut consumer = ConsumerDescriptor::durable("billing", 950).with_pending(50);
        consumer.name = "billing".to_string();
        let report = LagReport::for_consumer(&consumer, 1000).unwrap();
        assert_eq!(report.consumer_name, "billing");
        assert_eq!(report.stream_last_seq, 1000);
        assert_eq!(report.consumer_last_seq, 950);
        assert_eq!(report.lag, 50);
        assert_eq!(report.num_pending, 50);
    }

    #[test]
    fn test_display_lag_clamps_only_when_asked() {
        let report = LagReport::for_consumer(&ConsumerDescriptor::durable("a", 1005), 1000).unwrap();
        assert_eq!(report.lag, -5);
        assert_eq!(report.display_lag(false), -5);
        assert_eq!(report.display_lag(true), 0);
    }

    fn report(name: &str, lag: i64) -> LagReport {
        LagReport {
            consumer_name: name.to_string(),
            stream_last_seq: 100,
            consumer_last_seq: (100 - lag) as u64,
            lag,
            num_pending: 0,
        }
    }

    #[test]
    fn test_sort_reports() {
        let original = vec![report("c", 5), report("a", 0), report("b", 5)];

        let mut by_broker = original.clone();
        sort_reports(&mut by_broker, ReportOrder::Broker);
        assert_eq!(by_broker, original);

        let mut by_name = original.clone();
        sort_reports(&mut by_name, ReportOrder::Name);
        let names: Vec<_> = by_name.iter().map(|r| r.consumer_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);

        let mut by_lag = original;
        sort_reports(&mut by_lag, ReportOrder::Lag);
        let names: Vec<_> = by_lag.iter().map(|r| r.consumer_name.as_str()).collect();
        assert_eq!(names, ["b", "c", "a"]);
    }

    #[test]
    fn test_report_order_names() {
        assert_eq!(ReportOrder::from_str("name").unwrap(), ReportOrder::Name);
        assert_eq!(ReportOrder::from_str("LAG").unwrap(), ReportOrder::Lag);
        assert!(ReportOrder::from_str("created").is_err());
        let names: Vec<String> = ReportOrder::iter().map(|o| o.to_string()).collect();
        assert_eq!(names, ["broker", "name", "lag"]);
        assert!(!ReportOrder::Broker.is_sorted());
        assert!(ReportOrder::Lag.is_sorted());
    }
}
