// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Watch events delivered by the coordination store

use serde::{Deserialize, Serialize};

/// What happened at (or directly under) a watched path
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WatchEventKind {
    /// The watched node was created
    Created,
    /// The watched node was deleted
    Deleted,
    /// The watched node's data changed
    Changed,
    /// A direct child of the watched node was created
    ChildCreated,
    /// A direct child of the watched node was deleted
    ChildDeleted,
}

/// A one-shot notification for a watched path.
///
/// `path` is always the path the watch was registered on, not the child
/// that triggered the event. Watchers that need detail re-list children.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WatchEvent {
    pub kind: WatchEventKind,
    pub path: String,
}

impl WatchEvent {
    pub fn new(kind: WatchEventKind, path: impl Into<String>) -> Self {
        Self {
            kind,
            path: path.into(),
        }
    }
}

impl std::fmt::Display for WatchEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} at {}", self.kind, self.path)
    }
}
