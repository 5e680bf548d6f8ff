//! Waiters make progress when holders release or disappear.

use crate::prelude::manager;
use tokio::time::{timeout, Duration};
use weir_coord::MemoryStore;
use weir_lock::LockManager;

#[tokio::test]
async fn release_wakes_exactly_the_next_waiter() {
    let store = MemoryStore::new();
    let holder = manager(&store);
    let held = holder.lock("file1").await.unwrap();

    let waiter_mgr = manager(&store);
    let mut waiter = tokio::spawn(async move { waiter_mgr.lock("file1").await });

    // No grant while held
    assert!(timeout(Duration::from_millis(100), &mut waiter)
        .await
        .is_err());

    holder.unlock(&held).await.unwrap();

    let granted = timeout(Duration::from_secs(5), waiter)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(granted.resource, "file1");
}

#[tokio::test]
async fn repeated_handoff_reaches_every_waiter() {
    let store = MemoryStore::new();
    let first = manager(&store);
    let held = first.lock("file1").await.unwrap();

    let mut waiters = Vec::new();
    for _ in 0..4 {
        let mgr = manager(&store);
        waiters.push(tokio::spawn(async move {
            let handle = mgr.lock("file1").await?;
            mgr.unlock(&handle).await?;
            Ok::<_, weir_lock::LockError>(())
        }));
    }

    first.unlock(&held).await.unwrap();

    timeout(Duration::from_secs(10), async {
        for waiter in waiters {
            waiter.await.unwrap().unwrap();
        }
    })
    .await
    .unwrap();
}

#[tokio::test]
async fn session_expiry_is_indistinguishable_from_release() {
    let store = MemoryStore::new();
    let dying_session = store.session();
    let dying = LockManager::new(dying_session.clone());
    dying.lock("file1").await.unwrap();

    let waiter_mgr = manager(&store);
    let mut waiter = tokio::spawn(async move { waiter_mgr.lock("file1").await });
    assert!(timeout(Duration::from_millis(100), &mut waiter)
        .await
        .is_err());

    // The holder's process dies; its ephemeral candidate disappears and the
    // watch event this fires looks exactly like an unlock
    dying_session.expire();

    let granted = timeout(Duration::from_secs(5), waiter)
        .await
        .unwrap()
        .unwrap()
        .unwrap();
    assert_eq!(granted.resource, "file1");
}

#[tokio::test]
async fn relock_after_release_starts_a_new_attempt() {
    let store = MemoryStore::new();
    let mgr = manager(&store);

    let first = mgr.lock("file1").await.unwrap();
    mgr.unlock(&first).await.unwrap();
    let second = mgr.lock("file1").await.unwrap();

    // A fresh candidate, later in sequence order than the released one
    assert_ne!(first.path, second.path);
    assert!(second.path > first.path);
}
