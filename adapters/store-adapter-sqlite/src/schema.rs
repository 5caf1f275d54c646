//! Database schema initialization

use sqlx::SqlitePool;

use strata_types::prelude::*;

/// Create the settings tables if they don't exist yet
pub(crate) async fn init_db(db: &SqlitePool) -> Result<(), sqlx::Error> {
	let mut tx = db.begin().await?;

	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings (
		name text NOT NULL,
		value text NOT NULL DEFAULT '',
		revision integer NOT NULL DEFAULT 1,
		updated_at integer NOT NULL,
		PRIMARY KEY(name)
	)",
	)
	.execute(&mut *tx)
	.await?;

	// Write sequence shared by all rows, seeded from existing revisions
	sqlx::query(
		"CREATE TABLE IF NOT EXISTS settings_meta (
		key text NOT NULL,
		value integer NOT NULL,
		PRIMARY KEY(key)
	)",
	)
	.execute(&mut *tx)
	.await?;

	sqlx::query(
		"INSERT OR IGNORE INTO settings_meta (key, value)
		SELECT 'revision', COALESCE(MAX(revision), 0) FROM settings",
	)
	.execute(&mut *tx)
	.await?;

	tx.commit().await?;
	info!("Settings schema ready");
	Ok(())
}

/// Whether the schema has been provisioned
pub(crate) async fn has_settings_table(db: &SqlitePool) -> bool {
	let res: Result<Option<i64>, sqlx::Error> =
		sqlx::query_scalar("SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'settings'")
			.fetch_optional(db)
			.await;

	match res {
		Ok(found) => found.is_some(),
		Err(err) => {
			warn!("DB: {:#?}", err);
			false
		}
	}
}

// vim: ts=4
