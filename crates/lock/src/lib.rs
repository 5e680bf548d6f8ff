//! weir-lock: distributed mutual exclusion over a coordination store
//!
//! This crate provides:
//! - `LockManager` - the sequential-ephemeral-node acquire protocol with its
//!   watch-driven retry loop
//! - `LockVector` - ordered multi-resource acquisition chained into one
//!   composite operation
//! - `PooledQueue` - an auxiliary thread-safe FIFO with pooled nodes
//!
//! Processes coordinate only through the store (see `weir-coord`); they
//! never talk to each other directly. Fairness comes from the store's
//! sequence suffixes: lexicographic order over candidates equals creation
//! order.

pub mod error;
pub mod manager;
pub mod queue;
pub mod request;
pub mod vector;

// Re-exports
pub use error::LockError;
pub use manager::{LockManager, LockManagerConfig};
pub use queue::{PoolStats, PooledQueue};
pub use request::{LockHandle, LockRequest, RequestState};
pub use vector::{GrantedSet, LockVector};
