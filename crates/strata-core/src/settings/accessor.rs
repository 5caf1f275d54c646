//! Per-setting accessors generated from the definition registry
//!
//! The table is built once at startup. Each accessor is bound to one setting
//! name and forwards to the service, so callers get "one accessor per
//! setting" without dispatching on names at every call site.

use chrono::{DateTime, NaiveDate, Utc};
use std::collections::HashMap;
use std::sync::Arc;

use crate::prelude::*;

use super::cache::RequestScope;
use super::service::SettingsService;
use super::types::SettingValue;

#[derive(Debug, Clone)]
pub struct SettingAccessor {
	name: Arc<str>,
	service: Arc<SettingsService>,
}

impl SettingAccessor {
	pub fn name(&self) -> &str {
		&self.name
	}

	pub async fn get(&self, scope: &mut RequestScope) -> StResult<Option<SettingValue>> {
		self.service.get(scope, &self.name).await
	}

	/// Boolean-coercing getter
	pub async fn is_set(&self, scope: &mut RequestScope) -> StResult<bool> {
		self.service.is_set(scope, &self.name).await
	}

	/// Fails with `NotWritable` for non-writable settings
	pub async fn set(
		&self,
		scope: &mut RequestScope,
		value: impl Into<SettingValue>,
	) -> StResult<()> {
		self.service.set(scope, &self.name, value).await
	}

	pub fn is_writable(&self) -> StResult<bool> {
		self.service.is_writable(&self.name)
	}

	pub async fn get_string(&self, scope: &mut RequestScope) -> StResult<Option<String>> {
		self.service.get_string(scope, &self.name).await
	}

	pub async fn get_bool(&self, scope: &mut RequestScope) -> StResult<Option<bool>> {
		self.service.get_bool(scope, &self.name).await
	}

	pub async fn get_int(&self, scope: &mut RequestScope) -> StResult<Option<i64>> {
		self.service.get_int(scope, &self.name).await
	}

	pub async fn get_array(
		&self,
		scope: &mut RequestScope,
	) -> StResult<Option<Vec<serde_json::Value>>> {
		self.service.get_array(scope, &self.name).await
	}

	pub async fn get_symbol(&self, scope: &mut RequestScope) -> StResult<Option<String>> {
		self.service.get_symbol(scope, &self.name).await
	}

	pub async fn get_float(&self, scope: &mut RequestScope) -> StResult<Option<f64>> {
		self.service.get_float(scope, &self.name).await
	}

	pub async fn get_hash(
		&self,
		scope: &mut RequestScope,
	) -> StResult<Option<serde_json::Map<String, serde_json::Value>>> {
		self.service.get_hash(scope, &self.name).await
	}

	pub async fn get_date(&self, scope: &mut RequestScope) -> StResult<Option<NaiveDate>> {
		self.service.get_date(scope, &self.name).await
	}

	pub async fn get_datetime(&self, scope: &mut RequestScope) -> StResult<Option<DateTime<Utc>>> {
		self.service.get_datetime(scope, &self.name).await
	}
}

/// Accessors for every setting registered when the table was built
#[derive(Debug, Clone, Default)]
pub struct AccessorTable {
	accessors: HashMap<Arc<str>, SettingAccessor>,
}

impl AccessorTable {
	pub fn build(service: &Arc<SettingsService>) -> Self {
		let registry = service.registry();
		let accessors: HashMap<Arc<str>, SettingAccessor> = registry
			.all()
			.into_iter()
			.map(|def| {
				let name: Arc<str> = def.name.as_str().into();
				(name.clone(), SettingAccessor { name, service: service.clone() })
			})
			.collect();
		debug!("Built settings accessor table with {} entries", accessors.len());
		Self { accessors }
	}

	pub fn get(&self, name: &str) -> Option<&SettingAccessor> {
		self.accessors.get(name)
	}

	/// Like `get`, failing with `UnknownSetting`
	pub fn accessor(&self, name: &str) -> StResult<&SettingAccessor> {
		self.get(name).ok_or_else(|| Error::UnknownSetting(name.to_string()))
	}

	/// Names with an accessor, sorted
	pub fn names(&self) -> Vec<&str> {
		let mut names: Vec<&str> = self.accessors.keys().map(AsRef::as_ref).collect();
		names.sort_unstable();
		names
	}

	pub fn len(&self) -> usize {
		self.accessors.len()
	}

	pub fn is_empty(&self) -> bool {
		self.accessors.is_empty()
	}
}

// vim: ts=4
