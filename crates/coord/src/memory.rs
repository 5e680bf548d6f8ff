//! In-process reference implementation of `NodeStore`
//!
//! A single shared namespace with session semantics: each `MemorySession`
//! owns the ephemeral nodes it creates, and expiring a session deletes them
//! with the same watch events as an explicit delete. Used as the default
//! in-process backend and by every test in the workspace.

use crate::error::StoreError;
use crate::event::{WatchEvent, WatchEventKind};
use crate::path;
use crate::store::{CreateMode, NodeStore, Watch};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use tokio::sync::oneshot;

/// Identity of a store session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl std::fmt::Display for SessionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

struct NodeRecord {
    data: Vec<u8>,
    /// `Some` for ephemeral nodes: the session that owns them
    owner: Option<SessionId>,
    /// Counter for sequential children, never reused after deletion
    next_sequence: u64,
}

#[derive(Default)]
struct State {
    /// Flat map keyed by full path; BTreeMap so child scans are range scans
    nodes: BTreeMap<String, NodeRecord>,
    /// Pending one-shot watches per path
    watches: HashMap<String, Vec<oneshot::Sender<WatchEvent>>>,
    next_session: u64,
}

impl State {
    fn fire(&mut self, watched_path: &str, kind: WatchEventKind) {
        if let Some(senders) = self.watches.remove(watched_path) {
            for sender in senders {
                // Receiver may be gone; a dropped watch is not an error
                let _ = sender.send(WatchEvent::new(kind, watched_path));
            }
        }
    }

    fn fire_node_and_parent(
        &mut self,
        node_path: &str,
        node_kind: WatchEventKind,
        parent_kind: WatchEventKind,
    ) {
        self.fire(node_path, node_kind);
        if let Some(parent) = path::parent(node_path).map(str::to_string) {
            self.fire(&parent, parent_kind);
        }
    }

    fn child_prefix(parent: &str) -> String {
        if parent == path::ROOT {
            parent.to_string()
        } else {
            format!("{parent}/")
        }
    }

    fn has_children(&self, parent: &str) -> bool {
        let prefix = Self::child_prefix(parent);
        self.nodes
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .next()
            .is_some()
    }
}

fn format_sequence(n: u64) -> String {
    format!("{n:010}")
}

/// Shared in-process node namespace
#[derive(Clone)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        let mut state = State::default();
        state.nodes.insert(
            path::ROOT.to_string(),
            NodeRecord {
                data: Vec::new(),
                owner: None,
                next_sequence: 0,
            },
        );
        Self {
            state: Arc::new(Mutex::new(state)),
        }
    }

    /// Open a new session against this store.
    pub fn session(&self) -> MemorySession {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.next_session += 1;
        let id = SessionId(state.next_session);
        tracing::debug!(%id, "opened store session");
        MemorySession {
            state: Arc::clone(&self.state),
            id,
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

/// One session's handle onto a `MemoryStore`
#[derive(Clone)]
pub struct MemorySession {
    state: Arc<Mutex<State>>,
    id: SessionId,
}

impl MemorySession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Whether a node currently exists. Test/inspection helper.
    pub fn node_exists(&self, node_path: &str) -> bool {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.nodes.contains_key(node_path)
    }

    /// Data stored at a node, if it exists. Test/inspection helper.
    pub fn node_data(&self, node_path: &str) -> Option<Vec<u8>> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.nodes.get(node_path).map(|rec| rec.data.clone())
    }

    /// Number of unfired watch registrations on a path. Test/inspection
    /// helper.
    pub fn pending_watch_count(&self, node_path: &str) -> usize {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state.watches.get(node_path).map_or(0, Vec::len)
    }

    /// End the session: every ephemeral node it owns is deleted, firing the
    /// same watch events as an explicit delete. Indistinguishable from a
    /// normal release to anyone watching.
    pub fn expire(&self) {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let owned: Vec<String> = state
            .nodes
            .iter()
            .filter(|(_, rec)| rec.owner == Some(self.id))
            .map(|(p, _)| p.clone())
            .collect();
        for node_path in owned {
            state.nodes.remove(&node_path);
            state.fire_node_and_parent(
                &node_path,
                WatchEventKind::Deleted,
                WatchEventKind::ChildDeleted,
            );
            tracing::debug!(id = %self.id, path = %node_path, "expired ephemeral node");
        }
        tracing::info!(id = %self.id, "store session expired");
    }
}

#[async_trait]
impl NodeStore for MemorySession {
    async fn create(
        &self,
        node_path: &str,
        data: Vec<u8>,
        mode: CreateMode,
    ) -> Result<String, StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if node_path == path::ROOT {
            return Err(StoreError::NodeExists(node_path.to_string()));
        }
        path::validate(node_path)?;
        let parent = path::parent(node_path)
            .ok_or_else(|| StoreError::InvalidPath(node_path.to_string()))?
            .to_string();

        let parent_rec = state
            .nodes
            .get_mut(&parent)
            .ok_or_else(|| StoreError::NoNode(parent.clone()))?;
        if parent_rec.owner.is_some() {
            return Err(StoreError::NoChildrenForEphemerals(parent));
        }

        let actual_path = if mode.is_sequential() {
            let seq = parent_rec.next_sequence;
            parent_rec.next_sequence += 1;
            let actual = format!("{node_path}{}", format_sequence(seq));
            if actual.len() > path::MAX_PATH_LEN {
                return Err(StoreError::PathTooLong {
                    path: actual,
                    limit: path::MAX_PATH_LEN,
                });
            }
            actual
        } else {
            if state.nodes.contains_key(node_path) {
                return Err(StoreError::NodeExists(node_path.to_string()));
            }
            node_path.to_string()
        };

        state.nodes.insert(
            actual_path.clone(),
            NodeRecord {
                data,
                owner: mode.is_ephemeral().then_some(self.id),
                next_sequence: 0,
            },
        );
        state.fire_node_and_parent(
            &actual_path,
            WatchEventKind::Created,
            WatchEventKind::ChildCreated,
        );
        tracing::debug!(path = %actual_path, ?mode, session = %self.id, "created node");
        Ok(actual_path)
    }

    async fn delete(&self, node_path: &str) -> Result<(), StoreError> {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if !state.nodes.contains_key(node_path) {
            return Err(StoreError::NoNode(node_path.to_string()));
        }
        if state.has_children(node_path) {
            return Err(StoreError::NotEmpty(node_path.to_string()));
        }
        state.nodes.remove(node_path);
        state.fire_node_and_parent(
            node_path,
            WatchEventKind::Deleted,
            WatchEventKind::ChildDeleted,
        );
        tracing::debug!(path = %node_path, session = %self.id, "deleted node");
        Ok(())
    }

    async fn children(&self, node_path: &str) -> Result<Vec<String>, StoreError> {
        let state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if !state.nodes.contains_key(node_path) {
            return Err(StoreError::NoNode(node_path.to_string()));
        }
        let prefix = State::child_prefix(node_path);
        let names = state
            .nodes
            .range(prefix.clone()..)
            .take_while(|(k, _)| k.starts_with(&prefix))
            .filter(|(k, _)| !k[prefix.len()..].contains('/'))
            .map(|(k, _)| k[prefix.len()..].to_string())
            .collect();
        Ok(names)
    }

    async fn watch(&self, node_path: &str) -> Result<Watch, StoreError> {
        path::validate(node_path)?;
        let (tx, rx) = oneshot::channel();
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        state
            .watches
            .entry(node_path.to_string())
            .or_default()
            .push(tx);
        Ok(Watch::new(rx))
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
