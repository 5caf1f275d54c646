//! Request-scoped and shared caches of persisted setting rows

use async_trait::async_trait;
use base64::{Engine, engine::general_purpose::URL_SAFE_NO_PAD};
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::num::NonZeroUsize;
use std::sync::Arc;

use strata_types::cache_adapter::{RowSet, SharedCache};
use strata_types::store_adapter::RowStamp;

use crate::prelude::*;

const CACHE_KEY_PREFIX: &str = "settings/all/";

/// Derive the shared cache key from the current row listing.
///
/// Any row change (value rewrite, insert, delete) changes some stamp and
/// therefore the key. Order of the input doesn't matter.
pub fn cache_key(stamps: &[RowStamp]) -> String {
	let mut stamps: Vec<&RowStamp> = stamps.iter().collect();
	stamps.sort();

	let mut hasher = Sha256::new();
	hasher.update((stamps.len() as u64).to_le_bytes());
	for stamp in stamps {
		hasher.update((stamp.name.len() as u64).to_le_bytes());
		hasher.update(stamp.name.as_bytes());
		hasher.update(stamp.revision.to_le_bytes());
		hasher.update(stamp.updated_at.0.to_le_bytes());
	}

	format!("{}1~{}", CACHE_KEY_PREFIX, URL_SAFE_NO_PAD.encode(hasher.finalize()))
}

/// Per unit-of-work memoization of the persisted row set.
///
/// Starts empty, is populated by the first read, and is cleared by every
/// write performed through it. Never shared between units of work.
#[derive(Debug, Default)]
pub struct RequestScope {
	values: Option<RowSet>,
}

impl RequestScope {
	pub fn new() -> Self {
		Self { values: None }
	}

	pub fn is_populated(&self) -> bool {
		self.values.is_some()
	}

	pub fn values(&self) -> Option<&RowSet> {
		self.values.as_ref()
	}

	/// Raw value of a row, if the scope is populated and the row exists
	pub fn raw(&self, name: &str) -> Option<&str> {
		self.values.as_ref().and_then(|values| values.get(name)).map(String::as_str)
	}

	pub(crate) fn adopt(&mut self, values: RowSet) {
		self.values = Some(values);
	}

	pub fn clear(&mut self) {
		self.values = None;
	}
}

/// In-process shared cache with LRU eviction of old snapshots.
/// Clones share the same underlying cache.
#[derive(Debug, Clone)]
pub struct MemorySharedCache {
	cache: Arc<parking_lot::RwLock<LruCache<String, RowSet>>>,
}

impl MemorySharedCache {
	pub fn new(capacity: usize) -> Self {
		let capacity = NonZeroUsize::new(capacity.max(1)).unwrap_or(NonZeroUsize::MIN);
		Self { cache: Arc::new(parking_lot::RwLock::new(LruCache::new(capacity))) }
	}

	/// Number of snapshots currently held
	pub fn len(&self) -> usize {
		self.cache.read().len()
	}

	pub fn is_empty(&self) -> bool {
		self.cache.read().is_empty()
	}

	/// Look up a snapshot without touching its LRU position
	pub fn peek(&self, key: &str) -> Option<RowSet> {
		self.cache.read().peek(key).cloned()
	}
}

#[async_trait]
impl SharedCache for MemorySharedCache {
	async fn get(&self, key: &str) -> Option<RowSet> {
		let mut cache = self.cache.write();
		cache.get(key).cloned()
	}

	async fn put(&self, key: &str, values: RowSet) {
		let mut cache = self.cache.write();
		cache.put(key.to_string(), values);
	}

	async fn clear(&self) {
		let mut cache = self.cache.write();
		cache.clear();
	}
}


// vim: ts=4
