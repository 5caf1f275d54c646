//! Definition registry
//!
//! [`SettingsRegistry`] is filled at startup, then frozen into a
//! [`FrozenSettingsRegistry`] that the service treats as immutable. Test
//! harnesses and admin tooling swap definitions by building a new frozen
//! registry, never by mutating the one in use.

use std::collections::HashMap;

use crate::prelude::*;

use super::serializer;
use super::types::{SettingDefinition, Writability};

/// Mutable registry used during initialization
#[derive(Debug, Clone, Default)]
pub struct SettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl SettingsRegistry {
	pub fn new() -> Self {
		Self { definitions: HashMap::new() }
	}

	/// Register a setting definition, replacing any previous one with the same name
	pub fn register(&mut self, def: SettingDefinition) -> StResult<()> {
		if self.definitions.contains_key(&def.name) {
			debug!("Replacing setting definition: {}", def.name);
		} else {
			debug!("Registering setting: {}", def.name);
		}
		self.definitions.insert(def.name.clone(), def);
		Ok(())
	}

	pub fn lookup(&self, name: &str) -> StResult<&SettingDefinition> {
		self.definitions.get(name).ok_or_else(|| Error::UnknownSetting(name.to_string()))
	}

	/// All definitions, sorted by name
	pub fn all(&self) -> Vec<&SettingDefinition> {
		sorted(self.definitions.values())
	}

	/// Pin settings from environment variables named `<PREFIX>_<NAME>`.
	///
	/// A pinned setting takes the variable's value as its default and is no
	/// longer writable. Returns the number of pinned settings.
	pub fn apply_env_overrides<I, K, V>(&mut self, prefix: &str, vars: I) -> StResult<usize>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let vars: HashMap<String, String> =
			vars.into_iter().map(|(k, v)| (k.as_ref().to_string(), v.as_ref().to_string())).collect();

		let mut pinned = 0;
		for def in self.definitions.values_mut() {
			let var = format!("{}_{}", prefix, def.name.to_ascii_uppercase());
			let Some(raw) = vars.get(&var) else {
				continue;
			};

			let value = serializer::decode(&def.name, raw, def.format).map_err(|err| {
				Error::ConfigError(format!("Invalid value in environment variable {}: {}", var, err))
			})?;
			if let Some(value) = &value {
				def.validate(value.clone()).map_err(|err| {
					Error::ConfigError(format!("Rejected value in {}: {}", var, err))
				})?;
			}

			info!("Setting '{}' pinned from environment ({})", def.name, var);
			def.default = value;
			def.writable = Writability::Fixed(false);
			pinned += 1;
		}

		Ok(pinned)
	}

	/// Freeze the registry (make it immutable)
	pub fn freeze(self) -> FrozenSettingsRegistry {
		info!("Freezing settings registry with {} definitions", self.definitions.len());
		FrozenSettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

/// Immutable registry held by the settings service
#[derive(Debug, Clone, Default)]
pub struct FrozenSettingsRegistry {
	definitions: HashMap<String, SettingDefinition>,
}

impl FrozenSettingsRegistry {
	pub fn get(&self, name: &str) -> Option<&SettingDefinition> {
		self.definitions.get(name)
	}

	/// Get a setting definition, failing with `UnknownSetting` if absent
	pub fn lookup(&self, name: &str) -> StResult<&SettingDefinition> {
		self.get(name).ok_or_else(|| Error::UnknownSetting(name.to_string()))
	}

	/// All definitions, sorted by name
	pub fn all(&self) -> Vec<&SettingDefinition> {
		sorted(self.definitions.values())
	}

	/// Copy of this registry with one definition added or replaced
	pub fn with_definition(&self, def: SettingDefinition) -> FrozenSettingsRegistry {
		let mut definitions = self.definitions.clone();
		definitions.insert(def.name.clone(), def);
		FrozenSettingsRegistry { definitions }
	}

	/// Reopen for modification
	pub fn thaw(self) -> SettingsRegistry {
		SettingsRegistry { definitions: self.definitions }
	}

	pub fn len(&self) -> usize {
		self.definitions.len()
	}

	pub fn is_empty(&self) -> bool {
		self.definitions.is_empty()
	}
}

fn sorted<'a>(defs: impl Iterator<Item = &'a SettingDefinition>) -> Vec<&'a SettingDefinition> {
	let mut defs: Vec<_> = defs.collect();
	defs.sort_by(|a, b| a.name.cmp(&b.name));
	defs
}


// vim: ts=4
