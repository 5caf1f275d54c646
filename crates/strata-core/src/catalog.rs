//! Built-in setting definitions
//!
//! Registers the bootstrap settings every installation has. Applications add
//! their own definitions to the same registry before freezing it.

use crate::prelude::*;
use crate::settings::{
	INSTALLATION_UUID, SettingDefinition, SettingFormat, SettingValue, SettingsRegistry,
};

/// Register all built-in settings
pub fn register_settings(registry: &mut SettingsRegistry) -> StResult<()> {
	registry.register(
		SettingDefinition::builder("app_title")
			.description("Application title shown in the header")
			.default("OpenProject")
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("host_name")
			.description("Host name used in generated links")
			.format(SettingFormat::String)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("self_registration")
			.description("Allow users to register themselves")
			.default(true)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("login_required")
			.description("Require authentication to access public information")
			.default(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("smtp_enable_starttls_auto")
			.description("Upgrade SMTP connections with STARTTLS")
			.default(false)
			.build()?,
	)?;

	// Only configurable through the environment
	registry.register(
		SettingDefinition::builder("smtp_openssl_verify_mode")
			.description("Certificate verification of SMTP connections")
			.default("peer")
			.allowed(["none", "peer"])
			.writable(false)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("available_languages")
			.description("Languages users can choose from")
			.default(SettingValue::array(["en", "de", "fr"]))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("default_projects_modules")
			.description("Modules enabled for new projects")
			.default(SettingValue::array(["work_package_tracking", "wiki"]))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("apiv3_cors_origins")
			.description("Origins allowed for cross-origin API requests")
			.default(SettingValue::array(Vec::<String>::new()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("fog")
			.description("Remote attachment storage configuration")
			.default(SettingValue::Hash(serde_json::Map::new()))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("repository_checkout_data")
			.description("Checkout instructions per repository vendor")
			.format(SettingFormat::Hash)
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder("work_package_list_default_highlighting_mode")
			.description("Default highlighting of work package lists")
			.default(SettingValue::symbol("inline"))
			.allowed(["none", "inline", "status", "priority", "type"].map(SettingValue::symbol))
			.requires_feature("conditional_highlighting", SettingValue::symbol("none"))
			.build()?,
	)?;

	registry.register(
		SettingDefinition::builder(INSTALLATION_UUID)
			.description("Stable identifier of this installation")
			.format(SettingFormat::String)
			.build()?,
	)?;

	Ok(())
}


// vim: ts=4
