// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for lock acquisition and release

use thiserror::Error;
use weir_coord::StoreError;

/// Errors surfaced to lock callers.
///
/// Every setup failure is reported explicitly; a caller is never left
/// waiting on an acquisition that was silently abandoned.
#[derive(Debug, Error)]
pub enum LockError {
    #[error("resource name too long: {0}")]
    ResourceNameTooLong(String),
    #[error("invalid resource name: {0:?}")]
    InvalidResourceName(String),
    #[error("coordination store error: {0}")]
    Store(#[from] StoreError),
}
