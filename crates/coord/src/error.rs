// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for coordination store operations

use thiserror::Error;

/// Errors surfaced by a `NodeStore` implementation
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("node already exists: {0}")]
    NodeExists(String),
    #[error("no such node: {0}")]
    NoNode(String),
    #[error("node has children: {0}")]
    NotEmpty(String),
    #[error("ephemeral nodes cannot have children: {0}")]
    NoChildrenForEphemerals(String),
    #[error("invalid path: {0}")]
    InvalidPath(String),
    #[error("path exceeds {limit} bytes: {path}")]
    PathTooLong { path: String, limit: usize },
    #[error("connection to coordination store lost")]
    ConnectionLoss,
    #[error("session expired")]
    SessionExpired,
}

impl StoreError {
    /// Whether this error means the node was already there.
    ///
    /// Parent-node creation races are resolved by treating this as success.
    pub fn is_node_exists(&self) -> bool {
        matches!(self, StoreError::NodeExists(_))
    }

    /// Whether this error means the node was already gone.
    pub fn is_no_node(&self) -> bool {
        matches!(self, StoreError::NoNode(_))
    }
}
