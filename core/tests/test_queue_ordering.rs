//! Queue ordering properties.
//!
//! For any insert sequence into an ordered queue, a forward traversal must
//! yield a non-decreasing key sequence with job id breaking ties; without an
//! ordering, traversal is strict reverse-insertion order.

use proptest::prelude::*;
use sched_simulator_core_rs::{Job, JobQueue, QueueOrder};

fn traversal_keys(queue: &JobQueue, order: QueueOrder) -> Vec<(u64, u64)> {
    queue
        .iter()
        .map(|(_, job)| match order {
            QueueOrder::RemainingTime => (job.remaining_time(), job.id()),
            QueueOrder::ServiceTime => (job.service_time(), job.id()),
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_ordered_traversal_is_sorted(services in proptest::collection::vec(0u64..40, 0..40)) {
        for order in [QueueOrder::RemainingTime, QueueOrder::ServiceTime] {
            let mut queue = JobQueue::ordered(order);
            for (i, svc) in services.iter().enumerate() {
                queue.insert(Job::new(i as u64, 0, *svc));
            }

            let keys = traversal_keys(&queue, order);
            let mut sorted = keys.clone();
            sorted.sort();
            prop_assert_eq!(&keys, &sorted);

            // (key, id) pairs are unique: the order is strict.
            sorted.dedup();
            prop_assert_eq!(sorted.len(), keys.len());
        }
    }

    #[test]
    fn prop_order_survives_removals(
        services in proptest::collection::vec(0u64..40, 1..40),
        remove_seed in 0usize..1000,
    ) {
        let mut queue = JobQueue::ordered(QueueOrder::RemainingTime);
        let mut entries = Vec::new();
        for (i, svc) in services.iter().enumerate() {
            entries.push(queue.insert(Job::new(i as u64, 0, *svc)));
        }

        // Remove roughly half the entries, scattered by the seed.
        for (i, entry) in entries.iter().enumerate() {
            if (i + remove_seed) % 2 == 0 {
                queue.remove(*entry).unwrap();
            }
        }

        let keys = traversal_keys(&queue, QueueOrder::RemainingTime);
        let mut sorted = keys.clone();
        sorted.sort();
        prop_assert_eq!(keys, sorted);
    }

    #[test]
    fn prop_unordered_is_reverse_insertion(count in 0usize..40) {
        let mut queue = JobQueue::unordered();
        for i in 0..count {
            queue.insert(Job::new(i as u64, 0, 1));
        }

        let ids: Vec<u64> = queue.iter().map(|(_, j)| j.id()).collect();
        let expected: Vec<u64> = (0..count as u64).rev().collect();
        prop_assert_eq!(ids, expected);
    }

    #[test]
    fn prop_removed_handles_go_stale(services in proptest::collection::vec(1u64..10, 1..20)) {
        let mut queue = JobQueue::ordered(QueueOrder::ServiceTime);
        let entries: Vec<_> = services
            .iter()
            .enumerate()
            .map(|(i, svc)| queue.insert(Job::new(i as u64, 0, *svc)))
            .collect();

        for entry in &entries {
            queue.remove(*entry).unwrap();
            prop_assert!(queue.remove(*entry).is_err());
            prop_assert!(queue.job(*entry).is_none());
        }
        prop_assert!(queue.is_empty());
    }
}

#[test]
fn test_equal_keys_are_ordered_by_id() {
    let mut queue = JobQueue::ordered(QueueOrder::ServiceTime);
    for id in [9, 1, 5, 3, 7] {
        queue.insert(Job::new(id, 0, 6));
    }

    let ids: Vec<u64> = queue.iter().map(|(_, j)| j.id()).collect();
    assert_eq!(ids, vec![1, 3, 5, 7, 9]);
}
