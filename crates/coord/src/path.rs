// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Path handling for the hierarchical node namespace
//!
//! Paths are absolute, slash-separated, and bounded by a fixed length so
//! that no request can construct an unbounded key.

use crate::error::StoreError;

/// Maximum length in bytes of any node path, including the sequence suffix.
pub const MAX_PATH_LEN: usize = 256;

/// The root path of the namespace.
pub const ROOT: &str = "/";

/// Validate a node path.
///
/// A valid path starts with `/`, has no empty or `.`/`..` segments, no
/// trailing slash (except the root itself), and fits within `MAX_PATH_LEN`.
pub fn validate(path: &str) -> Result<(), StoreError> {
    if path.len() > MAX_PATH_LEN {
        return Err(StoreError::PathTooLong {
            path: path.to_string(),
            limit: MAX_PATH_LEN,
        });
    }
    if path == ROOT {
        return Ok(());
    }
    if !path.starts_with('/') || path.ends_with('/') {
        return Err(StoreError::InvalidPath(path.to_string()));
    }
    for segment in path[1..].split('/') {
        if segment.is_empty() || segment == "." || segment == ".." {
            return Err(StoreError::InvalidPath(path.to_string()));
        }
    }
    Ok(())
}

/// Join a parent path and a child name.
pub fn join(parent: &str, child: &str) -> String {
    if parent == ROOT {
        format!("/{child}")
    } else {
        format!("{parent}/{child}")
    }
}

/// The final path segment (the node's own name).
pub fn last_segment(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// The parent path, or `None` for the root.
pub fn parent(path: &str) -> Option<&str> {
    if path == ROOT {
        return None;
    }
    match path.rfind('/') {
        Some(0) => Some(ROOT),
        Some(idx) => Some(&path[..idx]),
        None => None,
    }
}

#[cfg(test)]
#[path = "path_tests.rs"]
mod tests;
