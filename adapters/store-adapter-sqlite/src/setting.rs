//! Setting row queries

use sqlx::{Row, SqlitePool};

use strata_types::prelude::*;
use strata_types::store_adapter::{PersistedSetting, RowStamp};

/// Name, revision and update time of every row
pub(crate) async fn list_stamps(db: &SqlitePool) -> StResult<Vec<RowStamp>> {
	let rows = sqlx::query("SELECT name, revision, updated_at FROM settings")
		.fetch_all(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	rows.into_iter()
		.map(|row| -> Result<RowStamp, sqlx::Error> {
			Ok(RowStamp {
				name: row.try_get("name")?,
				revision: row.try_get("revision")?,
				updated_at: Timestamp(row.try_get("updated_at")?),
			})
		})
		.collect::<Result<Vec<_>, sqlx::Error>>()
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)
}

/// Every stored row
pub(crate) async fn list(db: &SqlitePool) -> StResult<Vec<PersistedSetting>> {
	let rows = sqlx::query("SELECT name, value, revision, updated_at FROM settings")
		.fetch_all(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	rows.into_iter()
		.map(|row| -> Result<PersistedSetting, sqlx::Error> {
			Ok(PersistedSetting {
				name: row.try_get("name")?,
				value: row.try_get("value")?,
				revision: row.try_get("revision")?,
				updated_at: Timestamp(row.try_get("updated_at")?),
			})
		})
		.collect::<Result<Vec<_>, sqlx::Error>>()
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)
}

/// Insert a row or rewrite it in place under the next store-wide revision
pub(crate) async fn upsert(db: &SqlitePool, name: &str, value: &str) -> StResult<()> {
	let mut tx = db
		.begin()
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	let revision: i64 = sqlx::query_scalar(
		"UPDATE settings_meta SET value = value + 1 WHERE key = 'revision' RETURNING value",
	)
	.fetch_one(&mut *tx)
	.await
	.inspect_err(|err| warn!("DB: {:#?}", err))
	.map_err(|_| Error::DbError)?;

	sqlx::query(
		"INSERT INTO settings (name, value, revision, updated_at) VALUES (?, ?, ?, ?)
		ON CONFLICT(name) DO UPDATE SET
			value = excluded.value,
			revision = excluded.revision,
			updated_at = excluded.updated_at",
	)
	.bind(name)
	.bind(value)
	.bind(revision)
	.bind(Timestamp::now().0)
	.execute(&mut *tx)
	.await
	.inspect_err(|err| warn!("DB: {:#?}", err))
	.map_err(|_| Error::DbError)?;

	tx.commit().await.inspect_err(|err| warn!("DB: {:#?}", err)).map_err(|_| Error::DbError)?;

	debug!("Stored setting row: {} (revision {})", name, revision);
	Ok(())
}

/// Delete a row, reporting whether it existed
pub(crate) async fn delete(db: &SqlitePool, name: &str) -> StResult<bool> {
	let res = sqlx::query("DELETE FROM settings WHERE name = ?")
		.bind(name)
		.execute(db)
		.await
		.inspect_err(|err| warn!("DB: {:#?}", err))
		.map_err(|_| Error::DbError)?;

	Ok(res.rows_affected() > 0)
}

// vim: ts=4
