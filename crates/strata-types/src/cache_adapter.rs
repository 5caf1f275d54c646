//! Shared (cross-process) snapshot cache collaborator

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt::Debug;
use std::sync::Arc;

/// Raw values of every persisted row, keyed by setting name
pub type RowSet = Arc<HashMap<String, String>>;

#[async_trait]
pub trait SharedCache: Debug + Send + Sync {
	/// Snapshot stored under `key`, if any
	async fn get(&self, key: &str) -> Option<RowSet>;

	/// Store a snapshot. A snapshot under a new key supersedes older ones
	/// implicitly; nothing is patched in place.
	async fn put(&self, key: &str, values: RowSet);

	async fn clear(&self);
}

// vim: ts=4
