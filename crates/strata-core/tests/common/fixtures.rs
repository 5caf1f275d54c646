//! Service builders for tests

use std::sync::Arc;

use strata_core::settings::{FrozenSettingsRegistry, SettingDefinition, SettingsRegistry};
use strata_core::{MemorySharedCache, SettingsOpts, SettingsService, StaticFeatures};

use super::store::MemoryStore;

pub struct TestContext {
	pub service: Arc<SettingsService>,
	pub store: Arc<MemoryStore>,
	pub cache: MemorySharedCache,
}

/// Initialize a tracing subscriber writing to the test output
pub fn setup_test_logging() {
	let _ = tracing_subscriber::fmt()
		.with_test_writer()
		.with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
		.try_init();
}

/// Built-in catalog plus any extra definitions
pub fn test_registry(extra: Vec<SettingDefinition>) -> FrozenSettingsRegistry {
	let mut registry = SettingsRegistry::new();
	strata_core::register_settings(&mut registry).expect("Failed to register built-in settings");
	for def in extra {
		registry.register(def).expect("Failed to register test setting");
	}
	registry.freeze()
}

pub fn create_test_service_with(
	extra: Vec<SettingDefinition>,
	features: StaticFeatures,
	opts: SettingsOpts,
) -> TestContext {
	setup_test_logging();

	let store = Arc::new(MemoryStore::new());
	let cache = MemorySharedCache::new(opts.shared_cache_capacity);
	let service = Arc::new(SettingsService::new(
		Arc::new(test_registry(extra)),
		store.clone(),
		Arc::new(cache.clone()),
		Arc::new(features),
		opts,
	));

	TestContext { service, store, cache }
}

pub fn create_test_service() -> TestContext {
	create_test_service_with(Vec::new(), StaticFeatures::none(), SettingsOpts::default())
}

// vim: ts=4
