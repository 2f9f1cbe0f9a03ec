//! Report sinks
//!
//! A session hands its results to a [`ReportSink`] as they become available:
//! the snapshot first, then one call per durable consumer, then either
//! `finish` or `abort`.

use crate::lag::error::LagError;
use crate::lag::types::{LagReport, LagSummary, StreamSnapshot};
use std::io;

pub trait ReportSink {
    /// Stream snapshot fetched; reports follow
    fn begin(&mut self, snapshot: &StreamSnapshot) -> io::Result<()>;

    /// One durable consumer's lag
    fn record(&mut self, report: &LagReport) -> io::Result<()>;

    /// Enumeration completed
    fn finish(&mut self, summary: &LagSummary) -> io::Result<()>;

    /// Enumeration failed after `begin`; reports already recorded stand
    fn abort(&mut self, error: &LagError) -> io::Result<()>;
}

/// Sink that keeps everything in memory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectingSink {
    pub snapshot: Option<StreamSnapshot>,
    pub reports: Vec<LagReport>,
    pub summary: Option<LagSummary>,
    pub error: Option<LagError>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn consumer_names(&self) -> Vec<&str> {
        self.reports
            .iter()
            .map(|r| r.consumer_name.as_str())
            .collect()
    }

    pub fn lag_of(&self, consumer: &str) -> Option<i64> {
        self.reports
            .iter()
            .find(|r| r.consumer_name == consumer)
            .map(|r| r.lag)
    }
}

impl ReportSink for CollectingSink {
    fn begin(&mut self, snapshot: &StreamSnapshot) -> io::Result<()> {
        self.snapshot = Some(snapshot.clone());
        Ok(())
    }

    fn record(&mut self, report: &LagReport) -> io::Result<()> {
        self.reports.push(report.clone());
        Ok(())
    }

    fn finish(&mut self, summary: &LagSummary) -> io::Result<()> {
        self.summary = Some(summary.clone());
        Ok(())
    }

    fn abort(&mut self, error: &LagError) -> io::Result<()> {
        self.error = Some(error.clone());
        Ok(())
    }
}
