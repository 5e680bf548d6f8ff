//! Composite acquisition across multiple resources.

use crate::prelude::manager;
use tokio::time::{sleep, timeout, Duration};
use weir_coord::{MemoryStore, NodeStore};
use weir_lock::LockVector;

#[tokio::test]
async fn empty_vector_grants_nothing_immediately() {
    let store = MemoryStore::new();
    let granted = manager(&store)
        .lock_vector(&LockVector::new())
        .await
        .unwrap();
    assert!(granted.is_empty());
}

#[tokio::test]
async fn completion_requires_every_resource() {
    let store = MemoryStore::new();
    let other = manager(&store);
    let held_b = other.lock("b").await.unwrap();

    let session = store.session();
    let mgr = manager(&store);
    let mut composite = tokio::spawn(async move {
        mgr.lock_vector(&LockVector::new().add("a").add("b")).await
    });

    // Wait for the chain to queue behind "b", then confirm it is stalled
    timeout(Duration::from_secs(5), async {
        loop {
            if session.node_exists("/lock/b")
                && session.children("/lock/b").await.unwrap().len() == 2
            {
                break;
            }
            sleep(Duration::from_millis(5)).await;
        }
    })
    .await
    .unwrap();
    assert!(timeout(Duration::from_millis(100), &mut composite)
        .await
        .is_err());

    other.unlock(&held_b).await.unwrap();

    let granted = timeout(Duration::from_secs(5), composite)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(granted.handles()[0].resource, "a");
    assert_eq!(granted.handles()[1].resource, "b");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn overlapping_vectors_in_agreed_order_all_complete() {
    const VECTORS: usize = 4;

    let store = MemoryStore::new();
    let mut tasks = Vec::new();
    for _ in 0..VECTORS {
        let mgr = manager(&store);
        tasks.push(tokio::spawn(async move {
            let vector = LockVector::new().add("x").add("y").add("z");
            let granted = mgr.lock_vector(&vector).await?;
            mgr.unlock_all(granted).await
        }));
    }

    timeout(Duration::from_secs(10), async {
        for task in tasks {
            task.await.unwrap().unwrap();
        }
    })
    .await
    .unwrap();
}
