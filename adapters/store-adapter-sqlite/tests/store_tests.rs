//! SQLite setting store tests
//!
//! Row storage, revision bumps, availability and use behind the service.

use std::sync::Arc;
use tempfile::TempDir;

use strata_core::{RequestScope, SettingValue, SettingsOpts, SettingsService, StaticFeatures};
use strata_store_adapter_sqlite::SettingStoreSqlite;
use strata_types::store_adapter::SettingStore;

async fn create_test_store() -> (SettingStoreSqlite, TempDir) {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = SettingStoreSqlite::new(temp_dir.path().join("settings.db"))
		.await
		.expect("Failed to create store");
	(store, temp_dir)
}

#[tokio::test]
async fn test_upsert_and_list() {
	let (store, _temp) = create_test_store().await;

	store.upsert("app_title", "Tracker").await.expect("Should insert row");
	store.upsert("host_name", "tracker.example.com").await.expect("Should insert row");

	let mut rows = store.list_all().await.expect("Should list rows");
	rows.sort_by(|a, b| a.name.cmp(&b.name));
	assert_eq!(rows.len(), 2);
	assert_eq!(rows[0].name, "app_title");
	assert_eq!(rows[0].value, "Tracker");
	assert_eq!(rows[0].revision, 1);
	assert_eq!(rows[1].value, "tracker.example.com");
}

#[tokio::test]
async fn test_upsert_rewrites_in_place() {
	let (store, _temp) = create_test_store().await;

	store.upsert("app_title", "First").await.expect("Should insert row");
	store.upsert("app_title", "Second").await.expect("Should update row");
	store.upsert("app_title", "Second").await.expect("Should update row");

	let rows = store.list_all().await.expect("Should list rows");
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].value, "Second");
	assert_eq!(rows[0].revision, 3);

	let stamps = store.list_stamps().await.expect("Should list stamps");
	assert_eq!(stamps, vec![rows[0].stamp()]);
}

#[tokio::test]
async fn test_empty_value_is_stored() {
	let (store, _temp) = create_test_store().await;

	store.upsert("host_name", "").await.expect("Should insert row");

	let rows = store.list_all().await.expect("Should list rows");
	assert_eq!(rows[0].value, "");
}

#[tokio::test]
async fn test_delete_by_name() {
	let (store, _temp) = create_test_store().await;
	store.upsert("app_title", "Tracker").await.expect("Should insert row");

	assert!(store.delete_by_name("app_title").await.expect("Should delete row"));
	assert!(!store.delete_by_name("app_title").await.expect("Should run delete"));
	assert!(store.list_all().await.expect("Should list rows").is_empty());
}

#[tokio::test]
async fn test_recreated_row_gets_new_stamp() {
	let (store, _temp) = create_test_store().await;
	let mut seen = Vec::new();

	for i in 0..20 {
		store.upsert("app_title", &format!("A{}", i)).await.expect("Should insert row");
		seen.extend(store.list_stamps().await.expect("Should list stamps"));
		store.delete_by_name("app_title").await.expect("Should delete row");
		store.upsert("app_title", &format!("B{}", i)).await.expect("Should insert row");
		seen.extend(store.list_stamps().await.expect("Should list stamps"));
		store.delete_by_name("app_title").await.expect("Should delete row");
	}

	let revisions: Vec<i64> = seen.iter().map(|stamp| stamp.revision).collect();
	assert_eq!(revisions, (1..=40).collect::<Vec<_>>());
}

#[tokio::test]
async fn test_revision_sequence_survives_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let path = temp_dir.path().join("settings.db");

	{
		let store = SettingStoreSqlite::new(&path).await.expect("Failed to create store");
		store.upsert("app_title", "First").await.expect("Should insert row");
		store.upsert("host_name", "a.example.com").await.expect("Should insert row");
		store.delete_by_name("host_name").await.expect("Should delete row");
	}

	let store = SettingStoreSqlite::new(&path).await.expect("Failed to reopen store");
	store.upsert("host_name", "a.example.com").await.expect("Should insert row");

	let rows = store.list_all().await.expect("Should list rows");
	let host = rows.iter().find(|row| row.name == "host_name").expect("Row should exist");
	assert_eq!(host.revision, 3);
}

#[tokio::test]
async fn test_availability_follows_schema() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = SettingStoreSqlite::connect(temp_dir.path().join("settings.db"))
		.await
		.expect("Failed to open store");

	assert!(!store.is_available().await);
	store.init_schema().await.expect("Failed to create schema");
	assert!(store.is_available().await);
}

#[tokio::test]
async fn test_rows_survive_reopen() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let path = temp_dir.path().join("settings.db");

	{
		let store = SettingStoreSqlite::new(&path).await.expect("Failed to create store");
		store.upsert("app_title", "Persistent").await.expect("Should insert row");
	}

	let store = SettingStoreSqlite::new(&path).await.expect("Failed to reopen store");
	let rows = store.list_all().await.expect("Should list rows");
	assert_eq!(rows.len(), 1);
	assert_eq!(rows[0].value, "Persistent");
}

#[tokio::test]
async fn test_service_over_sqlite() {
	let temp_dir = TempDir::new().expect("Failed to create temp directory");
	let store = Arc::new(
		SettingStoreSqlite::connect(temp_dir.path().join("settings.db"))
			.await
			.expect("Failed to open store"),
	);
	let opts = SettingsOpts::default().test_mode(true);
	let registry = strata_core::build_registry(&opts).expect("Failed to build registry");
	let service = SettingsService::with_memory_cache(
		Arc::new(registry),
		store.clone(),
		Arc::new(StaticFeatures::none()),
		opts,
	);

	let mut scope = RequestScope::new();
	assert_eq!(service.installation_uuid(&mut scope).await.expect("Should get id"), "unknown");

	store.init_schema().await.expect("Failed to create schema");
	let mut scope = RequestScope::new();
	assert_eq!(service.installation_uuid(&mut scope).await.expect("Should get id"), "test");

	service
		.set(&mut scope, "available_languages", SettingValue::array(["en", "de"]))
		.await
		.expect("Should write setting");

	let mut scope = RequestScope::new();
	assert_eq!(
		service.get(&mut scope, "available_languages").await.expect("Should read setting"),
		Some(SettingValue::array(["en", "de"]))
	);
	assert_eq!(service.installation_uuid(&mut scope).await.expect("Should get id"), "test");
}

#[tokio::test]
async fn test_service_reads_recreated_row() {
	let (store, _temp) = create_test_store().await;
	let store = Arc::new(store);
	let registry = strata_core::build_registry(&SettingsOpts::default())
		.expect("Failed to build registry");
	let service = SettingsService::with_memory_cache(
		Arc::new(registry),
		store.clone(),
		Arc::new(StaticFeatures::none()),
		SettingsOpts::default(),
	);

	for i in 0..50 {
		let first = format!("A{}", i);
		store.upsert("app_title", &first).await.expect("Should insert row");
		let mut scope = RequestScope::new();
		let read = service.get_string(&mut scope, "app_title").await.expect("Should read");
		assert_eq!(read, Some(first));

		store.delete_by_name("app_title").await.expect("Should delete row");
		let second = format!("B{}", i);
		store.upsert("app_title", &second).await.expect("Should insert row");
		let mut scope = RequestScope::new();
		let read = service.get_string(&mut scope, "app_title").await.expect("Should read");
		assert_eq!(read, Some(second));

		store.delete_by_name("app_title").await.expect("Should delete row");
	}
}

// vim: ts=4
