//! Consumer Lag
//!
//! Computes how far each durable consumer of a stream trails the stream head.
//!
//! ## Flow
//!
//! 1. **Inspector**: resolve the stream and capture `last_seq` once
//! 2. **Reporter**: lazily drain the consumer listing, skip ephemeral
//!    consumers, and compute `lag = last_seq - delivered_stream_seq` against
//!    that single snapshot
//! 3. **Session**: wraps both with connection handling, one shared deadline,
//!    cancellation, ordering, and delivery to a [`sink::ReportSink`]
//!
//! Lag is reported as a signed value. Zero means caught up; a negative value
//! means the consumer cursor was read after the snapshot and has moved past it.

pub mod api;
pub mod deadline;
pub mod error;
pub mod inspector;
pub mod reporter;
pub mod session;
pub mod sink;
pub mod types;

pub use error::{LagError, LagResult};

#[cfg(test)]
mod tests;
