// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Per-attempt acquisition state
//!
//! A `LockRequest` tracks one in-flight acquisition of one resource. It is
//! created when the attempt begins and consumed when the grant is handed to
//! the caller as a `LockHandle`. State only moves forward.

use serde::{Deserialize, Serialize};

/// Where an acquisition attempt currently is.
///
/// There is no granted state: granting consumes the request, and the
/// resulting `LockHandle` is the terminal form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestState {
    /// Candidate node not yet created
    Creating,
    /// Candidate created; waiting to become the minimum sibling
    Watching,
}

/// State for one outstanding acquisition attempt on one resource
#[derive(Debug, Clone)]
pub struct LockRequest {
    resource: String,
    parent_path: String,
    candidate: Option<String>,
    state: RequestState,
}

impl LockRequest {
    pub fn new(resource: impl Into<String>, parent_path: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            parent_path: parent_path.into(),
            candidate: None,
            state: RequestState::Creating,
        }
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    /// The candidate node name, once the store has assigned one.
    pub fn candidate(&self) -> Option<&str> {
        self.candidate.as_deref()
    }

    pub fn state(&self) -> RequestState {
        self.state
    }

    /// Record the candidate name assigned by the store and enter the
    /// check-and-wait phase.
    pub fn candidate_created(&mut self, candidate: impl Into<String>) {
        self.candidate = Some(candidate.into());
        self.state = RequestState::Watching;
    }

    /// Whether this request's candidate is the front of the queue.
    pub fn is_front(&self, siblings: &[String]) -> bool {
        match &self.candidate {
            Some(candidate) => lowest_child(siblings) == Some(candidate.as_str()),
            None => false,
        }
    }

    /// Consume the request, producing the handle the caller releases later.
    pub fn grant(self) -> LockHandle {
        let candidate = self.candidate.unwrap_or_default();
        LockHandle {
            resource: self.resource,
            path: format!("{}/{}", self.parent_path, candidate),
        }
    }
}

/// A granted lock: the candidate node path, used later for release
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockHandle {
    pub resource: String,
    pub path: String,
}

impl std::fmt::Display for LockHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.path)
    }
}

/// The lexicographically smallest sibling name.
///
/// Valid as a creation-order comparison because sequence suffixes are
/// fixed-width and zero-padded.
pub fn lowest_child(children: &[String]) -> Option<&str> {
    children.iter().map(String::as_str).min()
}

#[cfg(test)]
#[path = "request_tests.rs"]
mod tests;
