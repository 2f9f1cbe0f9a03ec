//! Lag API
//!
//! Public surface of the lag core.

// End-to-end session
pub use crate::lag::session::{LagSession, SessionOptions};

// Components
pub use crate::lag::deadline::{Deadline, DEFAULT_BUDGET};
pub use crate::lag::inspector::fetch_stream_snapshot;
pub use crate::lag::reporter::{enumerate_lag, EnumerationTally, LagReportStream};

// Output
pub use crate::lag::sink::{CollectingSink, ReportSink};

// Error handling
pub use crate::lag::error::{Interruption, LagError, LagResult, Operation};

// Data model
pub use crate::lag::types::{
    compute_lag, sort_reports, LagReport, LagSummary, ReportOrder, StreamSnapshot,
};
