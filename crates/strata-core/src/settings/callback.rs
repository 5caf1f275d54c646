//! Change callbacks
//!
//! Subscribers are notified synchronously after a successful write, in the
//! order they registered. Registering the same handler twice makes it fire
//! twice.

use std::collections::HashMap;
use std::sync::Arc;

use super::types::SettingValue;

/// A committed change of one setting
#[derive(Debug, Clone, PartialEq)]
pub struct SettingChange {
	pub name: String,
	pub value: Option<SettingValue>,
	/// Effective value before the write
	pub old_value: Option<SettingValue>,
}

pub type SettingCallback = Arc<dyn Fn(&SettingChange) + Send + Sync>;

#[derive(Default)]
pub struct CallbackRegistry {
	callbacks: parking_lot::RwLock<HashMap<String, Vec<SettingCallback>>>,
}

impl CallbackRegistry {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn register<F>(&self, name: impl Into<String>, f: F)
	where
		F: Fn(&SettingChange) + Send + Sync + 'static,
	{
		let name = name.into();
		tracing::debug!("Registering callback for setting: {}", name);
		self.callbacks.write().entry(name).or_default().push(Arc::new(f));
	}

	/// Number of callbacks registered for a setting
	pub fn count(&self, name: &str) -> usize {
		self.callbacks.read().get(name).map_or(0, Vec::len)
	}

	pub fn dispatch(&self, change: &SettingChange) {
		// Handlers run without the lock held so they may register further callbacks
		let handlers = self.callbacks.read().get(&change.name).cloned().unwrap_or_default();
		for handler in handlers {
			handler(change);
		}
	}
}

impl std::fmt::Debug for CallbackRegistry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		let callbacks = self.callbacks.read();
		let counts: HashMap<&str, usize> =
			callbacks.iter().map(|(name, list)| (name.as_str(), list.len())).collect();
		f.debug_struct("CallbackRegistry").field("callbacks", &counts).finish()
	}
}


// vim: ts=4
