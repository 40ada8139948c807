//! Racing writers on one (job, operation) over a multi-threaded runtime.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;

use jobtrack_core::{KeySchema, MetricValue, StoreValue};
use jobtrack_service::{InMemoryStore, KeyValueStore, MetricsTracker};

const TASKS: i64 = 16;
const CALLS_PER_TASK: i64 = 50;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_increments_are_not_lost() {
    for schema in [KeySchema::Legacy, KeySchema::Segmented] {
        let tracker = MetricsTracker::new(Arc::new(InMemoryStore::new()), schema);

        let mut handles = Vec::new();
        for _ in 0..TASKS {
            let t = tracker.clone();
            handles.push(tokio::spawn(async move {
                for _ in 0..CALLS_PER_TASK {
                    t.track_duration("J", "O", 3).await.unwrap();
                    t.track_count("J", "O", 2).await.unwrap();
                    tokio::task::yield_now().await;
                }
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        let calls = TASKS * CALLS_PER_TASK;
        let m = tracker.metrics("J").await.unwrap();
        assert_eq!(m["O.total.count"], MetricValue::Int(calls), "{schema:?}");
        assert_eq!(m["O.total.duration"], MetricValue::Int(calls * 3), "{schema:?}");
        assert_eq!(m["O.count"], MetricValue::Int(calls * 2), "{schema:?}");
        assert_eq!(m["O.avg.duration"], MetricValue::Float(3.0), "{schema:?}");
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn set_if_absent_has_one_winner() {
    let store = Arc::new(InMemoryStore::new());

    let mut handles = Vec::new();
    for i in 0..TASKS {
        let s = store.clone();
        handles.push(tokio::spawn(async move {
            let won = s.set_if_absent("first", StoreValue::Int(i)).await.unwrap();
            won.then_some(i)
        }));
    }
    let mut winners = Vec::new();
    for h in handles {
        winners.extend(h.await.unwrap());
    }

    assert_eq!(winners.len(), 1);
    assert_eq!(store.get("first").await.unwrap(), Some(StoreValue::Int(winners[0])));
    assert_eq!(store.len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn racing_running_calls_keep_one_first_executed() {
    let store = Arc::new(InMemoryStore::new());
    let tracker = MetricsTracker::new(store.clone(), KeySchema::Segmented);
    assert!(store.is_empty());

    let mut handles = Vec::new();
    for i in 0..TASKS {
        let t = tracker.clone();
        handles.push(tokio::spawn(async move {
            t.track_running("J", i % 2 == 0).await.unwrap();
            t.first_executed("J").await.unwrap().unwrap()
        }));
    }
    let mut seen = Vec::new();
    for h in handles {
        seen.push(h.await.unwrap());
    }

    // every caller observed the same first stamp, never overwritten later
    let first = tracker.first_executed("J").await.unwrap().unwrap();
    assert!(seen.iter().all(|ts| *ts == first), "{seen:?}");
    let last = tracker.last_executed("J").await.unwrap().unwrap();
    assert!(first <= last);

    // running, firstExecuted, lastExecuted
    assert_eq!(store.keys("1:J.").await.unwrap().len(), 3);
}
