//! Layered settings resolution for Strata.
//!
//! Settings are resolved from static definitions, optional persisted
//! overrides, and feature gating. Persisted rows are cached per unit of work
//! ([`settings::RequestScope`]) and across processes
//! ([`strata_types::cache_adapter::SharedCache`]), the latter keyed by a
//! hash of the current row listing so that a write makes older snapshots
//! unreachable instead of purging them.

#![deny(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![forbid(unsafe_code)]

pub mod catalog;
pub mod config;
pub mod features;
pub mod prelude;
pub mod settings;

pub use config::{DecodePolicy, SettingsOpts};
pub use features::{AllFeatures, StaticFeatures};
pub use settings::{
	AccessorTable, FrozenSettingsRegistry, MemorySharedCache, RequestScope, SettingAccessor,
	SettingChange, SettingDefinition, SettingFormat, SettingValue, SettingsRegistry,
	SettingsService,
};

use strata_types::error::StResult;

pub fn register_settings(registry: &mut settings::SettingsRegistry) -> StResult<()> {
	catalog::register_settings(registry)
}

/// Built-in catalog pinned by the process environment, ready for the service
pub fn build_registry(opts: &SettingsOpts) -> StResult<FrozenSettingsRegistry> {
	let mut registry = SettingsRegistry::new();
	register_settings(&mut registry)?;
	let pinned = registry.apply_env_overrides(&opts.env_prefix, std::env::vars())?;
	tracing::info!("Registered {} settings ({} pinned from environment)", registry.len(), pinned);
	Ok(registry.freeze())
}

// vim: ts=4
