//! Settings subsystem: definitions, serialization, caching and resolution
//!
//! # Architecture
//!
//! - **Types** (`types.rs`): value model, formats and definitions
//! - **Registry** (`registry.rs`): definition catalog, env overrides
//! - **Serializer** (`serializer.rs`): raw text <-> typed values
//! - **Cache** (`cache.rs`): request scope, shared snapshot cache, cache keys
//! - **Callback** (`callback.rs`): change subscribers
//! - **Service** (`service.rs`): the resolver
//! - **Accessor** (`accessor.rs`): per-name accessor table
//!
//! # Precedence
//!
//! A stored row overrides the definition default only while the definition is
//! writable. A missing feature entitlement replaces whatever was resolved with
//! the definition's gated fallback.

pub mod accessor;
pub mod cache;
pub mod callback;
pub mod registry;
pub mod serializer;
pub mod service;
pub mod types;

pub use accessor::{AccessorTable, SettingAccessor};
pub use cache::{MemorySharedCache, RequestScope, cache_key};
pub use callback::{CallbackRegistry, SettingCallback, SettingChange};
pub use registry::{FrozenSettingsRegistry, SettingsRegistry};
pub use service::{INSTALLATION_UUID, SettingsService};
pub use types::{
	SettingDefinition, SettingDefinitionBuilder, SettingFormat, SettingValidator, SettingValue,
	Writability,
};

// vim: ts=4
