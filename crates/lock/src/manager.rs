// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! The sequential-ephemeral-node acquire protocol
//!
//! Acquisition creates an ephemeral sequential candidate under the
//! resource's lock node and waits until that candidate is the
//! lexicographically smallest sibling. Waiting is watch-driven: every
//! waiter arms a one-shot watch on the parent and re-lists children when it
//! fires. The parent-level watch is deliberately coarse - every waiter
//! wakes on every event and only the true minimum proceeds. That trades
//! efficiency under heavy contention for a protocol with no per-sibling
//! bookkeeping.

use crate::error::LockError;
use crate::request::{LockHandle, LockRequest};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Mutex;
use weir_coord::{path, CreateMode, NodeStore};

/// Width of the store's zero-padded sequence suffix.
const SEQUENCE_WIDTH: usize = 10;

fn default_root() -> String {
    "/lock".to_string()
}

fn default_candidate_prefix() -> String {
    "lock-".to_string()
}

/// Lock manager configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LockManagerConfig {
    /// Namespace node under which per-resource lock nodes live
    #[serde(default = "default_root")]
    pub root: String,
    /// Name prefix for candidate nodes; the store appends the sequence
    #[serde(default = "default_candidate_prefix")]
    pub candidate_prefix: String,
}

impl Default for LockManagerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            candidate_prefix: default_candidate_prefix(),
        }
    }
}

impl LockManagerConfig {
    pub fn with_root(mut self, root: impl Into<String>) -> Self {
        self.root = root.into();
        self
    }
}

/// Client-side lock manager over a coordination store.
///
/// Clones share the submission mutex, so every clone belongs to the same
/// process-wide serialization domain for request initiation.
#[derive(Clone)]
pub struct LockManager<S: NodeStore> {
    store: S,
    config: LockManagerConfig,
    /// Serializes the initiation phase (parent setup + candidate creation)
    /// across all callers and resources. Waiting happens outside it.
    submit: Arc<Mutex<()>>,
}

impl<S: NodeStore> LockManager<S> {
    pub fn new(store: S) -> Self {
        Self::with_config(store, LockManagerConfig::default())
    }

    pub fn with_config(store: S, config: LockManagerConfig) -> Self {
        Self {
            store,
            config,
            submit: Arc::new(Mutex::new(())),
        }
    }

    pub fn config(&self) -> &LockManagerConfig {
        &self.config
    }

    /// Acquire the lock on `resource`, suspending until granted.
    ///
    /// The returned handle is the grant; pass it to [`unlock`] to release.
    /// Validation and setup failures are returned as errors - the caller is
    /// never left waiting on an abandoned attempt.
    ///
    /// [`unlock`]: LockManager::unlock
    pub async fn lock(&self, resource: &str) -> Result<LockHandle, LockError> {
        self.validate_resource(resource)?;
        let parent_path = path::join(&self.config.root, resource);
        let mut request = LockRequest::new(resource, &parent_path);

        let candidate_path;
        {
            let _guard = self.submit.lock().await;
            self.ensure_chain(&parent_path).await?;
            let candidate_stem = path::join(&parent_path, &self.config.candidate_prefix);
            candidate_path = self
                .store
                .create(&candidate_stem, Vec::new(), CreateMode::EphemeralSequential)
                .await?;
            request.candidate_created(path::last_segment(&candidate_path));
        }
        tracing::debug!(
            resource,
            candidate = request.candidate().unwrap_or_default(),
            "lock candidate created"
        );

        match self.wait_until_front(request, &parent_path).await {
            Ok(handle) => Ok(handle),
            Err(err) => {
                // The attempt is abandoned, so the candidate must go with
                // it: while the session lives an orphan candidate reaches
                // the front of the queue and blocks every other acquirer,
                // and the caller holds no handle to release it.
                if let Err(cleanup_err) = self.store.delete(&candidate_path).await {
                    tracing::warn!(
                        path = %candidate_path,
                        %cleanup_err,
                        "failed to remove abandoned lock candidate"
                    );
                }
                Err(err)
            }
        }
    }

    /// Check-and-wait loop: grant once the candidate is the minimum
    /// sibling, otherwise wait for the parent watch and re-check.
    async fn wait_until_front(
        &self,
        request: LockRequest,
        parent_path: &str,
    ) -> Result<LockHandle, LockError> {
        loop {
            let mut children = self.store.children(parent_path).await?;
            if !request.is_front(&children) {
                // Arm the watch, then re-list: a release that lands between
                // the two listings fires the watch instead of being missed.
                let watch = self.store.watch(parent_path).await?;
                children = self.store.children(parent_path).await?;
                if !request.is_front(&children) {
                    tracing::debug!(
                        resource = request.resource(),
                        siblings = children.len(),
                        "lock busy, waiting"
                    );
                    let event = watch.wait().await?;
                    tracing::debug!(resource = request.resource(), %event, "watch fired, re-checking");
                    continue;
                }
                // Granted on the re-list. The unfired watch stays registered
                // until the next event on the parent, which finds its
                // receiver gone and discards it.
            }
            tracing::info!(
                resource = request.resource(),
                candidate = request.candidate().unwrap_or_default(),
                "lock granted"
            );
            return Ok(request.grant());
        }
    }

    /// Release a granted lock.
    ///
    /// Releasing twice is safe: a handle whose node is already gone counts
    /// as released.
    pub async fn unlock(&self, handle: &LockHandle) -> Result<(), LockError> {
        match self.store.delete(&handle.path).await {
            Ok(()) => {
                tracing::info!(resource = %handle.resource, path = %handle.path, "lock released");
                Ok(())
            }
            Err(err) if err.is_no_node() => {
                tracing::debug!(path = %handle.path, "lock node already gone");
                Ok(())
            }
            Err(err) => Err(err.into()),
        }
    }

    fn validate_resource(&self, resource: &str) -> Result<(), LockError> {
        if resource.is_empty() || resource.contains('/') {
            return Err(LockError::InvalidResourceName(resource.to_string()));
        }
        let candidate_len = self.config.root.len()
            + 1
            + resource.len()
            + 1
            + self.config.candidate_prefix.len()
            + SEQUENCE_WIDTH;
        if candidate_len > path::MAX_PATH_LEN {
            return Err(LockError::ResourceNameTooLong(resource.to_string()));
        }
        Ok(())
    }

    /// Create every missing node along `target`, treating creation races
    /// ("already exists") as success.
    async fn ensure_chain(&self, target: &str) -> Result<(), LockError> {
        let mut current = String::new();
        for segment in target[1..].split('/') {
            current.push('/');
            current.push_str(segment);
            match self
                .store
                .create(&current, Vec::new(), CreateMode::Persistent)
                .await
            {
                Ok(_) => {}
                Err(err) if err.is_node_exists() => {}
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "manager_tests.rs"]
mod tests;
