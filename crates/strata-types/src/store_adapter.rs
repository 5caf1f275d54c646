//! Persistence collaborator for setting overrides
//!
//! A store keeps one row per overridden setting. The resolver only ever asks
//! for the full row set (`list_all`) or the cheap row listing used to derive
//! the shared cache key (`list_stamps`).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

use crate::prelude::*;

/// A persisted override row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedSetting {
	pub name: String,
	/// Serialized value, possibly empty
	pub value: String,
	/// Store-wide write sequence number. Every upsert takes a fresh one, so a
	/// deleted and re-created row never repeats an earlier stamp.
	pub revision: i64,
	#[serde(rename = "updatedAt")]
	pub updated_at: Timestamp,
}

impl PersistedSetting {
	pub fn stamp(&self) -> RowStamp {
		RowStamp { name: self.name.clone(), revision: self.revision, updated_at: self.updated_at }
	}
}

/// Row metadata without the value, used to derive the shared cache key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RowStamp {
	pub name: String,
	pub revision: i64,
	#[serde(rename = "updatedAt")]
	pub updated_at: Timestamp,
}

#[async_trait]
pub trait SettingStore: Debug + Send + Sync {
	/// False until the backing schema exists (early bootstrap)
	async fn is_available(&self) -> bool;

	/// Name, revision and update time of every row
	async fn list_stamps(&self) -> StResult<Vec<RowStamp>>;

	/// Full load of every row including values
	async fn list_all(&self) -> StResult<Vec<PersistedSetting>>;

	/// Create the row or update it in place, as one atomic operation.
	/// Assigns the next revision of the store-wide sequence.
	async fn upsert(&self, name: &str, value: &str) -> StResult<()>;

	/// Returns true if a row was removed
	async fn delete_by_name(&self, name: &str) -> StResult<bool>;
}

// vim: ts=4
