//! SQLite-backed setting store
//!
//! Persists one row per overridden setting in the `settings` table. Every
//! write takes the next value of a store-wide revision sequence kept in
//! `settings_meta`, so the row listing (and with it the shared cache key)
//! changes even when the same value is written again or a deleted row is
//! re-created.

#![forbid(unsafe_code)]

use async_trait::async_trait;
use sqlx::sqlite::{self, SqlitePool};
use std::path::Path;

use strata_types::prelude::*;
use strata_types::store_adapter::{PersistedSetting, RowStamp, SettingStore};

mod schema;
mod setting;

#[derive(Debug)]
pub struct SettingStoreSqlite {
	db: SqlitePool,
}

impl SettingStoreSqlite {
	/// Open (or create) the database at `path` and make sure the schema exists
	pub async fn new(path: impl AsRef<Path>) -> StResult<Self> {
		let store = Self::connect(path).await?;
		store.init_schema().await?;
		Ok(store)
	}

	/// Open the database without touching its schema.
	///
	/// The store reports itself unavailable until [`Self::init_schema`] ran.
	pub async fn connect(path: impl AsRef<Path>) -> StResult<Self> {
		let opts = sqlite::SqliteConnectOptions::new()
			.filename(path.as_ref())
			.create_if_missing(true)
			.journal_mode(sqlite::SqliteJournalMode::Wal);
		let db = sqlite::SqlitePoolOptions::new()
			.max_connections(5)
			.connect_with(opts)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)?;

		debug!("Opened settings database: {}", path.as_ref().display());
		Ok(Self { db })
	}

	pub async fn init_schema(&self) -> StResult<()> {
		schema::init_db(&self.db)
			.await
			.inspect_err(|err| warn!("DB: {:#?}", err))
			.map_err(|_| Error::DbError)
	}
}

#[async_trait]
impl SettingStore for SettingStoreSqlite {
	async fn is_available(&self) -> bool {
		schema::has_settings_table(&self.db).await
	}

	async fn list_stamps(&self) -> StResult<Vec<RowStamp>> {
		setting::list_stamps(&self.db).await
	}

	async fn list_all(&self) -> StResult<Vec<PersistedSetting>> {
		setting::list(&self.db).await
	}

	async fn upsert(&self, name: &str, value: &str) -> StResult<()> {
		setting::upsert(&self.db, name, value).await
	}

	async fn delete_by_name(&self, name: &str) -> StResult<bool> {
		setting::delete(&self.db, name).await
	}
}

// vim: ts=4
