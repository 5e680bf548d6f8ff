//! Mutual exclusion and fairness under contention.

use crate::prelude::manager;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::time::{sleep, timeout, Duration};
use weir_coord::MemoryStore;

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn at_most_one_holder_at_a_time() {
    const CALLERS: usize = 8;

    let store = MemoryStore::new();
    let active = Arc::new(AtomicUsize::new(0));
    let mut tasks = Vec::new();

    for _ in 0..CALLERS {
        let mgr = manager(&store);
        let active = Arc::clone(&active);
        tasks.push(tokio::spawn(async move {
            let handle = mgr.lock("shared").await.unwrap();

            let holders = active.fetch_add(1, Ordering::SeqCst) + 1;
            assert_eq!(holders, 1, "two holders inside the critical section");
            sleep(Duration::from_millis(2)).await;
            active.fetch_sub(1, Ordering::SeqCst);

            mgr.unlock(&handle).await.unwrap();
        }));
    }

    timeout(Duration::from_secs(10), async {
        for task in tasks {
            task.await.unwrap();
        }
    })
    .await
    .unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn grants_follow_candidate_sequence_order() {
    const CALLERS: usize = 6;

    let store = MemoryStore::new();
    let grant_order = Arc::new(Mutex::new(Vec::new()));
    let mut tasks = Vec::new();

    for _ in 0..CALLERS {
        let mgr = manager(&store);
        let grant_order = Arc::clone(&grant_order);
        tasks.push(tokio::spawn(async move {
            let handle = mgr.lock("shared").await.unwrap();
            grant_order.lock().unwrap().push(handle.path.clone());
            mgr.unlock(&handle).await.unwrap();
        }));
    }

    timeout(Duration::from_secs(10), async {
        for task in tasks {
            task.await.unwrap();
        }
    })
    .await
    .unwrap();

    // Completion order must equal the store-assigned sequence order: a
    // candidate is granted only once every lower candidate has released.
    let order = grant_order.lock().unwrap();
    let mut sorted = order.clone();
    sorted.sort();
    assert_eq!(*order, sorted);
    assert_eq!(order.len(), CALLERS);
}

#[tokio::test]
async fn independent_resources_are_granted_concurrently() {
    let store = MemoryStore::new();

    let a = manager(&store).lock("res-a").await.unwrap();
    let b = manager(&store).lock("res-b").await.unwrap();

    assert_ne!(a.path, b.path);
    assert!(a.path.starts_with("/lock/res-a/"));
    assert!(b.path.starts_with("/lock/res-b/"));
}
