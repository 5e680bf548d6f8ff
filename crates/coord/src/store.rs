// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The `NodeStore` trait: contract between the lock protocol and the
//! coordination service
//!
//! Implementations must provide linearizable node creation with
//! monotonically increasing, lexicographically ordered sequence suffixes,
//! and reliable one-shot watch delivery.

use crate::error::StoreError;
use crate::event::WatchEvent;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

/// How a node is created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CreateMode {
    /// Survives the creating session
    Persistent,
    /// Persistent, with a service-assigned sequence suffix
    PersistentSequential,
    /// Deleted automatically when the creating session ends
    Ephemeral,
    /// Ephemeral, with a service-assigned sequence suffix
    EphemeralSequential,
}

impl CreateMode {
    pub fn is_ephemeral(&self) -> bool {
        matches!(self, CreateMode::Ephemeral | CreateMode::EphemeralSequential)
    }

    pub fn is_sequential(&self) -> bool {
        matches!(
            self,
            CreateMode::PersistentSequential | CreateMode::EphemeralSequential
        )
    }
}

/// A registered one-shot watch.
///
/// Awaiting `wait` suspends until the next qualifying event at the watched
/// path. The watch is consumed by delivery and must be re-registered for
/// further notifications.
#[derive(Debug)]
pub struct Watch {
    rx: oneshot::Receiver<WatchEvent>,
}

impl Watch {
    pub fn new(rx: oneshot::Receiver<WatchEvent>) -> Self {
        Self { rx }
    }

    /// Wait for the watch to fire.
    ///
    /// Fails with `ConnectionLoss` if the store went away before the event
    /// was delivered.
    pub async fn wait(self) -> Result<WatchEvent, StoreError> {
        self.rx.await.map_err(|_| StoreError::ConnectionLoss)
    }
}

/// Hierarchical node store with create/delete/list/watch primitives
#[async_trait]
pub trait NodeStore: Clone + Send + Sync + 'static {
    /// Create a node at `path`.
    ///
    /// For sequential modes the service appends a zero-padded counter and
    /// the returned path carries the assigned suffix; for plain modes the
    /// returned path equals `path`.
    async fn create(
        &self,
        path: &str,
        data: Vec<u8>,
        mode: CreateMode,
    ) -> Result<String, StoreError>;

    /// Delete the node at `path`. Fails with `NotEmpty` if it has children.
    async fn delete(&self, path: &str) -> Result<(), StoreError>;

    /// List the names (final segments) of the direct children of `path`.
    ///
    /// Order is unspecified; callers sort or scan as needed.
    async fn children(&self, path: &str) -> Result<Vec<String>, StoreError>;

    /// Register a one-shot watch on `path`.
    ///
    /// The watch fires on creation, deletion, or data change of the node
    /// itself, and on creation or deletion of a direct child. Registration
    /// succeeds even if the node does not exist yet.
    async fn watch(&self, path: &str) -> Result<Watch, StoreError>;
}
