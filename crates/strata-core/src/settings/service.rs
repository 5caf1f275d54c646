//! Settings service - resolution, caching, writes and callback dispatch

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use strata_types::cache_adapter::{RowSet, SharedCache};
use strata_types::feature_gate::FeatureGate;
use strata_types::store_adapter::SettingStore;

use crate::config::{DecodePolicy, SettingsOpts};
use crate::prelude::*;

use super::cache::{MemorySharedCache, RequestScope, cache_key};
use super::callback::{CallbackRegistry, SettingChange};
use super::registry::FrozenSettingsRegistry;
use super::serializer;
use super::types::{SettingDefinition, SettingValue};

/// Name of the row holding the installation identifier
pub const INSTALLATION_UUID: &str = "installation_uuid";

const UNKNOWN_INSTALLATION: &str = "unknown";
const TEST_INSTALLATION: &str = "test";

/// Settings service - main interface for reading and writing settings
pub struct SettingsService {
	registry: parking_lot::RwLock<Arc<FrozenSettingsRegistry>>,
	store: Arc<dyn SettingStore>,
	shared_cache: Arc<dyn SharedCache>,
	features: Arc<dyn FeatureGate>,
	callbacks: CallbackRegistry,
	opts: SettingsOpts,
}

impl std::fmt::Debug for SettingsService {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("SettingsService")
			.field("definitions", &self.registry.read().len())
			.field("store", &self.store)
			.field("shared_cache", &self.shared_cache)
			.field("features", &self.features)
			.field("callbacks", &self.callbacks)
			.field("opts", &self.opts)
			.finish()
	}
}

impl SettingsService {
	pub fn new(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn SettingStore>,
		shared_cache: Arc<dyn SharedCache>,
		features: Arc<dyn FeatureGate>,
		opts: SettingsOpts,
	) -> Self {
		Self {
			registry: parking_lot::RwLock::new(registry),
			store,
			shared_cache,
			features,
			callbacks: CallbackRegistry::new(),
			opts,
		}
	}

	/// Service backed by an in-process [`MemorySharedCache`] sized from `opts`
	pub fn with_memory_cache(
		registry: Arc<FrozenSettingsRegistry>,
		store: Arc<dyn SettingStore>,
		features: Arc<dyn FeatureGate>,
		opts: SettingsOpts,
	) -> Self {
		let shared_cache = Arc::new(MemorySharedCache::new(opts.shared_cache_capacity));
		Self::new(registry, store, shared_cache, features, opts)
	}

	/// Current definition registry
	pub fn registry(&self) -> Arc<FrozenSettingsRegistry> {
		self.registry.read().clone()
	}

	/// Swap the whole definition registry (tests and admin tooling)
	pub fn replace_registry(&self, registry: Arc<FrozenSettingsRegistry>) {
		info!("Replacing settings registry ({} definitions)", registry.len());
		*self.registry.write() = registry;
	}

	/// Replace or add a single definition (tests and admin tooling)
	pub fn override_definition(&self, def: SettingDefinition) {
		info!("Overriding setting definition: {}", def.name);
		let mut registry = self.registry.write();
		*registry = Arc::new(registry.with_definition(def));
	}

	pub fn opts(&self) -> &SettingsOpts {
		&self.opts
	}

	/// Row set of the current unit of work, loading it through the cache
	/// chain on first use.
	pub async fn resolve_row_set(&self, scope: &mut RequestScope) -> StResult<RowSet> {
		if let Some(values) = scope.values() {
			return Ok(values.clone());
		}

		let key = cache_key(&self.store.list_stamps().await?);
		if let Some(values) = self.shared_cache.get(&key).await {
			debug!("Settings shared cache hit: {}", key);
			scope.adopt(values.clone());
			return Ok(values);
		}

		debug!("Settings shared cache miss, loading all rows: {}", key);
		let rows = self.store.list_all().await?;
		let values: RowSet =
			Arc::new(rows.into_iter().map(|row| (row.name, row.value)).collect::<HashMap<_, _>>());
		self.shared_cache.put(&key, values.clone()).await;
		scope.adopt(values.clone());
		Ok(values)
	}

	/// Get the effective value of a setting
	pub async fn get(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<SettingValue>> {
		let registry = self.registry();
		let def = registry.lookup(name)?;

		// The fallback doesn't depend on storage
		if let Some(tag) = &def.required_feature
			&& !self.features.has_feature(tag)
		{
			debug!("Feature '{}' not available, using fallback for '{}'", tag, name);
			return Ok(def.gated_fallback.clone());
		}

		let rows = self.resolve_row_set(scope).await?;
		match rows.get(name) {
			Some(raw) if def.is_writable() => self.decode_row(def, raw),
			Some(_) => {
				debug!("Setting '{}' is not writable, ignoring stored value", name);
				Ok(def.default.clone())
			}
			None => Ok(def.default.clone()),
		}
	}

	fn decode_row(&self, def: &SettingDefinition, raw: &str) -> StResult<Option<SettingValue>> {
		match serializer::decode(&def.name, raw, def.format) {
			Ok(value) => Ok(value),
			Err(err) if self.opts.decode_policy == DecodePolicy::Degrade => {
				warn!("{}, using default", err);
				Ok(def.default.clone())
			}
			Err(err) => Err(err),
		}
	}

	/// Truthiness of the effective value, for settings of any format
	pub async fn is_set(&self, scope: &mut RequestScope, name: &str) -> StResult<bool> {
		Ok(self.get(scope, name).await?.is_some_and(|value| value.is_truthy()))
	}

	/// Set setting value with validation, then notify callbacks
	pub async fn set(
		&self,
		scope: &mut RequestScope,
		name: &str,
		value: impl Into<SettingValue>,
	) -> StResult<()> {
		let registry = self.registry();
		let def = registry.lookup(name)?;

		if !def.is_writable() {
			warn!("Rejected write to non-writable setting '{}'", name);
			return Err(Error::NotWritable(name.to_string()));
		}

		let value = def.validate(value.into())?;
		let raw = serializer::encode(name, &value, def.format)?;

		let old_value = match self.get(scope, name).await {
			Ok(old_value) => old_value,
			Err(Error::DecodeError { reason, .. }) => {
				warn!("Overwriting undecodable value of '{}': {}", name, reason);
				None
			}
			Err(err) => return Err(err),
		};

		self.store.upsert(name, &raw).await?;
		scope.clear();
		info!("Setting '{}' updated", name);

		self.callbacks.dispatch(&SettingChange {
			name: name.to_string(),
			value: Some(value),
			old_value,
		});
		Ok(())
	}

	/// Whether a stored override of this setting takes effect
	pub fn is_writable(&self, name: &str) -> StResult<bool> {
		Ok(self.registry().lookup(name)?.is_writable())
	}

	/// Subscribe to successful writes of a setting
	pub fn register_callback<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(&SettingChange) + Send + Sync + 'static,
	{
		self.callbacks.register(name, f);
	}

	pub fn callbacks(&self) -> &CallbackRegistry {
		&self.callbacks
	}

	/// Stable identifier of this installation, created on first use.
	///
	/// Returns `"unknown"` while the store isn't available yet.
	pub async fn installation_uuid(&self, scope: &mut RequestScope) -> StResult<String> {
		if !self.store.is_available().await {
			return Ok(UNKNOWN_INSTALLATION.to_string());
		}

		// Another process may have stored an id since this scope was populated
		scope.clear();
		let rows = self.resolve_row_set(scope).await?;
		if let Some(existing) = rows.get(INSTALLATION_UUID)
			&& !existing.trim().is_empty()
		{
			return Ok(existing.clone());
		}

		let id = if self.opts.test_mode {
			TEST_INSTALLATION.to_string()
		} else {
			uuid::Uuid::new_v4().to_string()
		};
		self.store.upsert(INSTALLATION_UUID, &id).await?;
		scope.clear();
		info!("Generated installation id");

		Ok(id)
	}

	/// Drop both the request scope and every shared snapshot
	pub async fn clear_cache(&self, scope: &mut RequestScope) {
		scope.clear();
		self.shared_cache.clear().await;
		debug!("Settings caches cleared");
	}

	// Typed getters: `Ok(None)` when unset, `ValidationError` on a type mismatch

	pub async fn get_string(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<String>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::String(s) | SettingValue::Symbol(s)) => Ok(Some(s)),
			Some(v) => Err(mismatch(name, "string", &v)),
		}
	}

	pub async fn get_symbol(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<String>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Symbol(s)) => Ok(Some(s)),
			Some(v) => Err(mismatch(name, "symbol", &v)),
		}
	}

	pub async fn get_bool(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<bool>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Bool(b)) => Ok(Some(b)),
			Some(v) => Err(mismatch(name, "boolean", &v)),
		}
	}

	pub async fn get_int(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<i64>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Int(i)) => Ok(Some(i)),
			Some(v) => Err(mismatch(name, "integer", &v)),
		}
	}

	pub async fn get_float(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<f64>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Float(x)) => Ok(Some(x)),
			Some(v) => Err(mismatch(name, "float", &v)),
		}
	}

	pub async fn get_array(
		&self,
		scope: &mut RequestScope,
		name: &str,
	) -> StResult<Option<Vec<serde_json::Value>>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Array(a)) => Ok(Some(a)),
			Some(v) => Err(mismatch(name, "array", &v)),
		}
	}

	pub async fn get_hash(
		&self,
		scope: &mut RequestScope,
		name: &str,
	) -> StResult<Option<serde_json::Map<String, serde_json::Value>>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Hash(h)) => Ok(Some(h)),
			Some(v) => Err(mismatch(name, "hash", &v)),
		}
	}

	pub async fn get_date(&self, scope: &mut RequestScope, name: &str) -> StResult<Option<NaiveDate>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::Date(d)) => Ok(Some(d)),
			Some(v) => Err(mismatch(name, "date", &v)),
		}
	}

	pub async fn get_datetime(
		&self,
		scope: &mut RequestScope,
		name: &str,
	) -> StResult<Option<DateTime<Utc>>> {
		match self.get(scope, name).await? {
			None => Ok(None),
			Some(SettingValue::DateTime(dt)) => Ok(Some(dt)),
			Some(v) => Err(mismatch(name, "datetime", &v)),
		}
	}
}

fn mismatch(name: &str, expected: &str, value: &SettingValue) -> Error {
	Error::ValidationError(format!(
		"Setting '{}' is not a {}, got {}",
		name,
		expected,
		value.type_name()
	))
}

// vim: ts=4
