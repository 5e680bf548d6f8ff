//! weir-coord: coordination-service interface for the weir lock manager
//!
//! This crate provides:
//! - The `NodeStore` trait: a hierarchical namespace of nodes with atomic
//!   creation, deletion, child listing, and one-shot watches
//! - Path validation helpers with a fixed length bound
//! - `MemoryStore`, an in-process reference implementation with session
//!   semantics (ephemeral nodes die with their session)

pub mod error;
pub mod event;
pub mod memory;
pub mod path;
pub mod store;

// Re-exports
pub use error::StoreError;
pub use event::{WatchEvent, WatchEventKind};
pub use memory::{MemorySession, MemoryStore, SessionId};
pub use store::{CreateMode, NodeStore, Watch};
