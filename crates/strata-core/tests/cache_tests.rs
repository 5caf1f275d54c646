//! Two-tier cache tests
//!
//! A unit of work loads the row set at most once; snapshots are shared
//! between units of work until a write changes the row listing.

mod common;

use std::collections::HashMap;
use std::sync::Arc;

use common::*;
use strata_core::RequestScope;
use strata_core::settings::cache_key;
use strata_types::cache_adapter::SharedCache;
use strata_types::store_adapter::SettingStore;

async fn current_key(ctx: &TestContext) -> String {
	cache_key(&ctx.store.list_stamps().await.expect("Failed to list stamps"))
}

#[tokio::test]
async fn test_single_full_load_per_scope() {
	let ctx = create_test_service();
	ctx.store.insert_raw("app_title", "Tracker");

	let mut scope = RequestScope::new();
	for name in ["app_title", "host_name", "available_languages", "self_registration", "fog"] {
		ctx.service.get(&mut scope, name).await.expect("read");
	}
	ctx.service.is_set(&mut scope, "login_required").await.expect("read");

	assert!(scope.is_populated());
	assert_eq!(scope.raw("app_title"), Some("Tracker"));
	assert_eq!(ctx.store.full_loads(), 1);
}

#[tokio::test]
async fn test_snapshot_shared_between_scopes() {
	let ctx = create_test_service();
	ctx.store.insert_raw("app_title", "Tracker");

	let mut first = RequestScope::new();
	ctx.service.get(&mut first, "app_title").await.expect("read");
	let mut second = RequestScope::new();
	ctx.service.get(&mut second, "app_title").await.expect("read");

	assert_eq!(ctx.store.full_loads(), 1);
	assert_eq!(ctx.cache.len(), 1);
	assert!(ctx.cache.peek(&current_key(&ctx).await).is_some());
}

#[tokio::test]
async fn test_value_served_from_shared_cache() {
	let ctx = create_test_service();
	let key = current_key(&ctx).await;
	let snapshot: HashMap<String, String> =
		[("available_languages".to_string(), "---\n- en\n- de\n".to_string())].into();
	ctx.cache.put(&key, Arc::new(snapshot)).await;

	let mut scope = RequestScope::new();
	let languages = ctx.service.get_array(&mut scope, "available_languages").await.expect("read");

	assert_eq!(languages, Some(vec![serde_json::json!("en"), serde_json::json!("de")]));
	assert_eq!(scope.raw("available_languages"), Some("---\n- en\n- de\n"));
	assert_eq!(ctx.store.full_loads(), 0);
}

#[tokio::test]
async fn test_write_invalidates_scope_and_key() {
	let ctx = create_test_service();
	let mut scope = RequestScope::new();

	ctx.service.get(&mut scope, "app_title").await.expect("read");
	let old_key = current_key(&ctx).await;
	assert!(scope.is_populated());

	ctx.service.set(&mut scope, "app_title", "Renamed").await.expect("write");
	assert!(!scope.is_populated());

	let new_key = current_key(&ctx).await;
	assert_ne!(old_key, new_key);

	let mut fresh = RequestScope::new();
	assert_eq!(
		ctx.service.get_string(&mut fresh, "app_title").await.expect("read").as_deref(),
		Some("Renamed")
	);
	assert!(ctx.cache.peek(&new_key).is_some());
	assert_eq!(ctx.store.full_loads(), 2);
}

#[tokio::test]
async fn test_rewrite_of_same_value_changes_key() {
	let ctx = create_test_service();
	let mut scope = RequestScope::new();

	ctx.service.set(&mut scope, "host_name", "a.example.com").await.expect("write");
	let first = current_key(&ctx).await;
	ctx.service.set(&mut scope, "host_name", "a.example.com").await.expect("write");
	let second = current_key(&ctx).await;

	assert_ne!(first, second);
}

#[tokio::test]
async fn test_recreated_row_is_not_served_stale() {
	let ctx = create_test_service();

	ctx.store.upsert("app_title", "Original").await.expect("write");
	let mut scope = RequestScope::new();
	assert_eq!(
		ctx.service.get_string(&mut scope, "app_title").await.expect("read").as_deref(),
		Some("Original")
	);
	let old_key = current_key(&ctx).await;

	assert!(ctx.store.delete_by_name("app_title").await.expect("delete"));
	ctx.store.upsert("app_title", "Recreated").await.expect("write");
	assert_ne!(current_key(&ctx).await, old_key);

	let mut scope = RequestScope::new();
	assert_eq!(
		ctx.service.get_string(&mut scope, "app_title").await.expect("read").as_deref(),
		Some("Recreated")
	);
}

#[tokio::test]
async fn test_other_scope_keeps_its_snapshot() {
	let ctx = create_test_service();
	ctx.store.insert_raw("app_title", "Before");

	let mut reader = RequestScope::new();
	ctx.service.get(&mut reader, "app_title").await.expect("read");

	let mut writer = RequestScope::new();
	ctx.service.set(&mut writer, "app_title", "After").await.expect("write");

	// The reader's unit of work stays consistent with what it already saw
	assert_eq!(
		ctx.service.get_string(&mut reader, "app_title").await.expect("read").as_deref(),
		Some("Before")
	);
	let mut fresh = RequestScope::new();
	assert_eq!(
		ctx.service.get_string(&mut fresh, "app_title").await.expect("read").as_deref(),
		Some("After")
	);
}

#[tokio::test]
async fn test_clear_cache() {
	let ctx = create_test_service();
	let mut scope = RequestScope::new();
	ctx.service.get(&mut scope, "app_title").await.expect("read");
	assert!(!ctx.cache.is_empty());

	ctx.service.clear_cache(&mut scope).await;
	assert!(!scope.is_populated());
	assert!(ctx.cache.is_empty());

	ctx.service.get(&mut scope, "app_title").await.expect("read");
	assert_eq!(ctx.store.full_loads(), 2);
}

// vim: ts=4
