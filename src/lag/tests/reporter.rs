//! Consumer Lag Reporter tests

#[cfg(test)]
mod tests {
    use crate::broker::api::{ConsumerDescriptor, MemoryBroker, StreamFault};
    use crate::lag::api::{
        enumerate_lag, fetch_stream_snapshot, Deadline, EnumerationTally, LagError, LagReport,
        Operation,
    };
    use crate::lag::tests::{open, orders_broker};
    use futures::StreamExt;
    use std::collections::HashMap;
    use std::time::Duration;

    async fn collect(broker: &MemoryBroker, budget: Duration) -> (Vec<Result<LagReport, LagError>>, EnumerationTally) {
        let conn = open(broker).await;
        let mut deadline = Deadline::start(budget);
        let (handle, snapshot) = fetch_stream_snapshot(conn.as_ref(), "ORDERS", &mut deadline)
            .await
            .unwrap();
        let mut reports = enumerate_lag(handle.as_ref(), snapshot.last_seq, deadline);
        let mut items = Vec::new();
        while let Some(item) = reports.next().await {
            items.push(item);
        }
        (items, reports.tally())
    }

    #[tokio::test]
    async fn test_durable_consumers_get_lag_against_one_snapshot() {
        let (items, tally) = collect(&orders_broker(), Duration::from_secs(10)).await;

        let lags: HashMap<String, i64> = items
            .into_iter()
            .map(|item| item.unwrap())
            .map(|r| {
                assert_eq!(r.stream_last_seq, 1000);
                (r.consumer_name, r.lag)
            })
            .collect();

        assert_eq!(lags.len(), 3);
        assert_eq!(lags["A"], 0);
        assert_eq!(lags["B"], 50);
        assert_eq!(lags["C"], 0);
        assert!(!lags.contains_key("eph-1"));
        assert_eq!(tally, EnumerationTally { durable: 3, ephemeral: 2 });
    }

    #[tokio::test]
    async fn test_broker_order_is_preserved() {
        let (items, _) = collect(&orders_broker(), Duration::from_secs(10)).await;
        let names: Vec<String> = items
            .into_iter()
            .map(|item| item.unwrap().consumer_name)
            .collect();
        assert_eq!(names, ["A", "B", "C"]);
    }

    #[tokio::test]
    async fn test_consumer_ahead_of_snapshot_has_negative_lag() {
        let broker = MemoryBroker::new()
            .with_stream("ORDERS", 100)
            .with_consumer("ORDERS", ConsumerDescriptor::durable("fast", 104));
        let (items, _) = collect(&broker, Duration::from_secs(10)).await;
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].as_ref().unwrap().lag, -4);
    }

    #[tokio::test]
    async fn test_only_ephemeral_consumers_yield_empty_stream() {
        let broker = MemoryBroker::new()
            .with_stream("ORDERS", 100)
            .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("e1", 10))
            .with_consumer("ORDERS", ConsumerDescriptor::ephemeral("e2", 20));
        let (items, tally) = collect(&broker, Duration::from_secs(10)).await;
        assert!(items.is_empty());
        assert_eq!(tally, EnumerationTally { durable: 0, ephemeral: 2 });
    }

    #[tokio::test]
    async fn test_listing_failure_keeps_earlier_reports_and_ends() {
        let broker = orders_broker().with_fault(
            "ORDERS",
            StreamFault::ListingFailsAfter(3, "stream deleted".into()),
        );
        let (items, _) = collect(&broker, Duration::from_secs(10)).await;

        // A, eph-1, B listed; then the failure
        assert_eq!(items.len(), 3);
        assert_eq!(items[0].as_ref().unwrap().consumer_name, "A");
        assert_eq!(items[1].as_ref().unwrap().consumer_name, "B");
        match &items[2] {
            Err(LagError::ConsumerListUnavailable { stream, message }) => {
                assert_eq!(stream, "ORDERS");
                assert!(message.contains("stream deleted"));
            }
            other => panic!("unexpected item: {:?}", other),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hanging_listing_hits_deadline_and_stops() {
        let broker = orders_broker().with_fault("ORDERS", StreamFault::ListingHangsAfter(1));
        let (items, tally) = collect(&broker, Duration::from_secs(5)).await;

        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(
            items[1],
            Err(LagError::DeadlineExceeded {
                operation: Operation::ListConsumers,
                ..
            })
        ));
        assert_eq!(tally.durable, 1);
    }

    #[tokio::test]
    async fn test_nothing_requested_until_polled() {
        let broker = orders_broker();
        let conn = open(&broker).await;
        let mut deadline = Deadline::start(Duration::from_secs(10));
        let (handle, snapshot) = fetch_stream_snapshot(conn.as_ref(), "ORDERS", &mut deadline)
            .await
            .unwrap();

        let reports = enumerate_lag(handle.as_ref(), snapshot.last_seq, deadline);
        assert_eq!(reports.tally(), EnumerationTally::default());
    }
}
