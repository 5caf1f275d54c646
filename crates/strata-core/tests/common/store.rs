//! In-memory `SettingStore` with call counters

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};

use strata_types::prelude::*;
use strata_types::store_adapter::{PersistedSetting, RowStamp, SettingStore};

const FROZEN_CLOCK: Timestamp = Timestamp(1_000);

#[derive(Debug)]
pub struct MemoryStore {
	rows: parking_lot::Mutex<BTreeMap<String, PersistedSetting>>,
	available: AtomicBool,
	sequence: AtomicI64,
	list_all_calls: AtomicUsize,
	list_stamps_calls: AtomicUsize,
	upsert_calls: AtomicUsize,
}

impl Default for MemoryStore {
	fn default() -> Self {
		Self::new()
	}
}

impl MemoryStore {
	pub fn new() -> Self {
		Self {
			rows: parking_lot::Mutex::new(BTreeMap::new()),
			available: AtomicBool::new(true),
			sequence: AtomicI64::new(0),
			list_all_calls: AtomicUsize::new(0),
			list_stamps_calls: AtomicUsize::new(0),
			upsert_calls: AtomicUsize::new(0),
		}
	}

	/// Write a row directly, bypassing the service.
	///
	/// The update time is frozen so that stamps only differ by the store-wide
	/// revision, like writes landing within the same millisecond.
	pub fn insert_raw(&self, name: &str, value: &str) {
		let updated_at = FROZEN_CLOCK;
		let revision = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
		let mut rows = self.rows.lock();
		rows.insert(
			name.to_string(),
			PersistedSetting { name: name.to_string(), value: value.to_string(), revision, updated_at },
		);
	}

	pub fn raw(&self, name: &str) -> Option<String> {
		self.rows.lock().get(name).map(|row| row.value.clone())
	}

	pub fn row_count(&self) -> usize {
		self.rows.lock().len()
	}

	pub fn set_available(&self, available: bool) {
		self.available.store(available, Ordering::SeqCst);
	}

	/// Number of full loads performed so far
	pub fn full_loads(&self) -> usize {
		self.list_all_calls.load(Ordering::SeqCst)
	}

	pub fn stamp_listings(&self) -> usize {
		self.list_stamps_calls.load(Ordering::SeqCst)
	}

	pub fn upserts(&self) -> usize {
		self.upsert_calls.load(Ordering::SeqCst)
	}
}

#[async_trait]
impl SettingStore for MemoryStore {
	async fn is_available(&self) -> bool {
		self.available.load(Ordering::SeqCst)
	}

	async fn list_stamps(&self) -> StResult<Vec<RowStamp>> {
		self.list_stamps_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.rows.lock().values().map(PersistedSetting::stamp).collect())
	}

	async fn list_all(&self) -> StResult<Vec<PersistedSetting>> {
		self.list_all_calls.fetch_add(1, Ordering::SeqCst);
		Ok(self.rows.lock().values().cloned().collect())
	}

	async fn upsert(&self, name: &str, value: &str) -> StResult<()> {
		self.upsert_calls.fetch_add(1, Ordering::SeqCst);
		self.insert_raw(name, value);
		Ok(())
	}

	async fn delete_by_name(&self, name: &str) -> StResult<bool> {
		Ok(self.rows.lock().remove(name).is_some())
	}
}

// vim: ts=4
