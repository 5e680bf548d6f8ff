// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Ordered multi-resource acquisition
//!
//! A `LockVector` names resources in the order the caller wants them
//! acquired. Acquisition is chained - one outstanding lock request at a
//! time - so no join primitive is needed and the composite completes only
//! when every resource is held.
//!
//! Ordering is the caller's only deadlock-avoidance mechanism: two vectors
//! requesting overlapping resources in different orders can deadlock. All
//! callers sharing resources must agree on one global order; the manager
//! does not sort or deduplicate on their behalf.

use crate::error::LockError;
use crate::manager::LockManager;
use crate::request::LockHandle;
use serde::{Deserialize, Serialize};
use weir_coord::NodeStore;

/// An ordered batch of resource names to acquire as one logical unit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockVector {
    resources: Vec<String>,
}

impl LockVector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a resource. Order is preserved exactly as given.
    pub fn add(mut self, resource: impl Into<String>) -> Self {
        self.resources.push(resource.into());
        self
    }

    pub fn resources(&self) -> &[String] {
        &self.resources
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for LockVector {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            resources: iter.into_iter().map(Into::into).collect(),
        }
    }
}

/// The grants of a completed vector acquisition.
///
/// `handles()[i]` corresponds to `resources()[i]` of the vector that
/// produced it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantedSet {
    handles: Vec<LockHandle>,
}

impl GrantedSet {
    pub fn handles(&self) -> &[LockHandle] {
        &self.handles
    }

    pub fn into_handles(self) -> Vec<LockHandle> {
        self.handles
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}

impl<S: NodeStore> LockManager<S> {
    /// Acquire every resource in `vector`, in order, as one composite
    /// operation.
    ///
    /// An empty vector succeeds immediately with an empty grant set. On
    /// failure partway through, already-granted locks are released (best
    /// effort, reverse order) before the error is returned, so the caller
    /// never observes a partial grant.
    pub async fn lock_vector(&self, vector: &LockVector) -> Result<GrantedSet, LockError> {
        if vector.is_empty() {
            tracing::debug!("empty lock vector, completing immediately");
            return Ok(GrantedSet {
                handles: Vec::new(),
            });
        }

        let mut handles: Vec<LockHandle> = Vec::with_capacity(vector.len());
        for resource in vector.resources() {
            match self.lock(resource).await {
                Ok(handle) => handles.push(handle),
                Err(err) => {
                    tracing::warn!(
                        resource = %resource,
                        granted = handles.len(),
                        %err,
                        "vector acquisition failed, rolling back grants"
                    );
                    for handle in handles.iter().rev() {
                        if let Err(release_err) = self.unlock(handle).await {
                            tracing::warn!(path = %handle.path, %release_err, "rollback release failed");
                        }
                    }
                    return Err(err);
                }
            }
        }

        tracing::info!(count = handles.len(), "lock vector fully granted");
        Ok(GrantedSet { handles })
    }

    /// Release every handle in a grant set, newest first.
    pub async fn unlock_all(&self, set: GrantedSet) -> Result<(), LockError> {
        for handle in set.handles.iter().rev() {
            self.unlock(handle).await?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "vector_tests.rs"]
mod tests;
