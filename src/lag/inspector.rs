//! Stream Inspector
//!
//! Resolves a stream by name and captures its head sequence.

use crate::broker::traits::{StreamBroker, StreamHandle};
use crate::core::validation::validate_stream_name;
use crate::lag::deadline::Deadline;
use crate::lag::error::{LagError, LagResult, Operation};
use crate::lag::types::StreamSnapshot;

/// Resolve `stream_name` and fetch its current state, both under `deadline`
///
/// The name is validated before anything is sent to the broker. The returned
/// handle is the one the consumer listing must be taken from.
pub async fn fetch_stream_snapshot(
    broker: &dyn StreamBroker,
    stream_name: &str,
    deadline: &mut Deadline,
) -> LagResult<(Box<dyn StreamHandle>, StreamSnapshot)> {
    let stream_name = validate_stream_name(stream_name)?;
    let budget = deadline.budget();

    let mut handle = deadline
        .bound(broker.resolve_stream(&stream_name))
        .await
        .map_err(|i| LagError::interrupted(i, Operation::ResolveStream, &stream_name, budget))?
        .map_err(|e| LagError::stream_unavailable(&stream_name, Operation::ResolveStream, e))?;

    let state = deadline
        .bound(handle.info())
        .await
        .map_err(|i| LagError::interrupted(i, Operation::FetchStreamInfo, &stream_name, budget))?
        .map_err(|e| LagError::stream_unavailable(&stream_name, Operation::FetchStreamInfo, e))?;

    if state.name != stream_name {
        log::debug!(
            "Broker reports stream '{}' for requested name '{}'",
            state.name,
            stream_name
        );
    }

    let snapshot = StreamSnapshot::capture(&stream_name, state);
    log::info!(
        "Checking stream '{}' (last sequence: {})...",
        snapshot.name,
        snapshot.last_seq
    );
    Ok((handle, snapshot))
}
