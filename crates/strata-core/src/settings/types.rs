//! Settings types and definitions
//!
//! Core value model and the static descriptor of each setting.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use std::fmt::{self, Debug};
use std::sync::Arc;

use crate::prelude::*;

use super::serializer;

/// Type alias for setting validator function
pub type SettingValidator = Arc<dyn Fn(&SettingValue) -> StResult<()> + Send + Sync>;

/// Declared storage format of a setting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SettingFormat {
	String,
	Boolean,
	Integer,
	Float,
	Array,
	Hash,
	Date,
	DateTime,
	Symbol,
}

impl SettingFormat {
	pub fn as_str(self) -> &'static str {
		match self {
			SettingFormat::String => "string",
			SettingFormat::Boolean => "boolean",
			SettingFormat::Integer => "integer",
			SettingFormat::Float => "float",
			SettingFormat::Array => "array",
			SettingFormat::Hash => "hash",
			SettingFormat::Date => "date",
			SettingFormat::DateTime => "datetime",
			SettingFormat::Symbol => "symbol",
		}
	}
}

impl fmt::Display for SettingFormat {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl std::str::FromStr for SettingFormat {
	type Err = Error;

	fn from_str(s: &str) -> StResult<Self> {
		match s {
			"string" => Ok(SettingFormat::String),
			"boolean" => Ok(SettingFormat::Boolean),
			"integer" => Ok(SettingFormat::Integer),
			"float" => Ok(SettingFormat::Float),
			"array" => Ok(SettingFormat::Array),
			"hash" => Ok(SettingFormat::Hash),
			"date" => Ok(SettingFormat::Date),
			"datetime" => Ok(SettingFormat::DateTime),
			"symbol" => Ok(SettingFormat::Symbol),
			_ => Err(Error::ConfigError(format!("unknown setting format: {}", s))),
		}
	}
}

/// Resolved setting value. An unset value is represented as `None` by the
/// resolver, never as a variant.
#[derive(Debug, Clone, PartialEq)]
pub enum SettingValue {
	String(String),
	Bool(bool),
	Int(i64),
	Float(f64),
	Array(Vec<serde_json::Value>),
	Hash(serde_json::Map<String, serde_json::Value>),
	Date(NaiveDate),
	DateTime(DateTime<Utc>),
	Symbol(String),
}

impl SettingValue {
	/// Build an array value from anything convertible to JSON values
	pub fn array<I, V>(items: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<serde_json::Value>,
	{
		SettingValue::Array(items.into_iter().map(Into::into).collect())
	}

	pub fn symbol(s: impl Into<String>) -> Self {
		SettingValue::Symbol(s.into())
	}

	/// The format this value naturally belongs to
	pub fn format(&self) -> SettingFormat {
		match self {
			SettingValue::String(_) => SettingFormat::String,
			SettingValue::Bool(_) => SettingFormat::Boolean,
			SettingValue::Int(_) => SettingFormat::Integer,
			SettingValue::Float(_) => SettingFormat::Float,
			SettingValue::Array(_) => SettingFormat::Array,
			SettingValue::Hash(_) => SettingFormat::Hash,
			SettingValue::Date(_) => SettingFormat::Date,
			SettingValue::DateTime(_) => SettingFormat::DateTime,
			SettingValue::Symbol(_) => SettingFormat::Symbol,
		}
	}

	/// Get the type name for error messages
	pub fn type_name(&self) -> &'static str {
		self.format().as_str()
	}

	/// Boolean coercion used by `is_set`.
	///
	/// Textual values count as false when empty or spelled like a false
	/// boolean (`0`, `f`, `false`, `off`, `no`); numbers when zero;
	/// collections when empty.
	pub fn is_truthy(&self) -> bool {
		match self {
			SettingValue::Bool(b) => *b,
			SettingValue::String(s) | SettingValue::Symbol(s) => {
				!s.is_empty() && serializer::parse_bool(s) != Some(false)
			}
			SettingValue::Int(i) => *i != 0,
			SettingValue::Float(f) => *f != 0.0,
			SettingValue::Array(a) => !a.is_empty(),
			SettingValue::Hash(h) => !h.is_empty(),
			SettingValue::Date(_) | SettingValue::DateTime(_) => true,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			SettingValue::String(s) | SettingValue::Symbol(s) => Some(s),
			_ => None,
		}
	}
}

impl fmt::Display for SettingValue {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SettingValue::String(s) | SettingValue::Symbol(s) => f.write_str(s),
			SettingValue::Bool(b) => write!(f, "{}", b),
			SettingValue::Int(i) => write!(f, "{}", i),
			SettingValue::Float(x) => write!(f, "{}", x),
			SettingValue::Array(a) => {
				write!(f, "{}", serde_json::Value::Array(a.clone()))
			}
			SettingValue::Hash(h) => write!(f, "{}", serde_json::Value::Object(h.clone())),
			SettingValue::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
			SettingValue::DateTime(dt) => {
				f.write_str(&dt.to_rfc3339_opts(SecondsFormat::AutoSi, true))
			}
		}
	}
}

impl From<&str> for SettingValue {
	fn from(s: &str) -> Self {
		SettingValue::String(s.to_string())
	}
}

impl From<String> for SettingValue {
	fn from(s: String) -> Self {
		SettingValue::String(s)
	}
}

impl From<bool> for SettingValue {
	fn from(b: bool) -> Self {
		SettingValue::Bool(b)
	}
}

impl From<i64> for SettingValue {
	fn from(i: i64) -> Self {
		SettingValue::Int(i)
	}
}

impl From<f64> for SettingValue {
	fn from(x: f64) -> Self {
		SettingValue::Float(x)
	}
}

impl From<NaiveDate> for SettingValue {
	fn from(d: NaiveDate) -> Self {
		SettingValue::Date(d)
	}
}

impl From<DateTime<Utc>> for SettingValue {
	fn from(dt: DateTime<Utc>) -> Self {
		SettingValue::DateTime(dt)
	}
}

impl From<serde_json::Map<String, serde_json::Value>> for SettingValue {
	fn from(h: serde_json::Map<String, serde_json::Value>) -> Self {
		SettingValue::Hash(h)
	}
}

/// Whether a stored override may take effect over the static default
#[derive(Clone)]
pub enum Writability {
	Fixed(bool),
	/// Re-evaluated on every check, e.g. for lockdown flags
	Dynamic(Arc<dyn Fn() -> bool + Send + Sync>),
}

impl Writability {
	pub fn check(&self) -> bool {
		match self {
			Writability::Fixed(writable) => *writable,
			Writability::Dynamic(predicate) => predicate(),
		}
	}
}

impl Debug for Writability {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Writability::Fixed(writable) => f.debug_tuple("Fixed").field(writable).finish(),
			Writability::Dynamic(_) => f.write_str("Dynamic"),
		}
	}
}

/// Setting definition - static metadata of one setting
#[derive(Clone)]
pub struct SettingDefinition {
	/// Unique, case-sensitive name
	pub name: String,

	/// Human-readable description
	pub description: String,

	/// Value used when no override applies
	pub default: Option<SettingValue>,

	pub format: SettingFormat,

	pub writable: Writability,

	/// Capability tag the resolved value depends on
	pub required_feature: Option<String>,

	/// Value substituted while `required_feature` is not entitled
	pub gated_fallback: Option<SettingValue>,

	/// Values accepted on write; any value when None
	pub allowed: Option<Vec<SettingValue>>,

	/// Optional validation function
	pub validator: Option<SettingValidator>,
}

impl Debug for SettingDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("SettingDefinition")
			.field("name", &self.name)
			.field("description", &self.description)
			.field("default", &self.default)
			.field("format", &self.format)
			.field("writable", &self.writable)
			.field("required_feature", &self.required_feature)
			.field("gated_fallback", &self.gated_fallback)
			.field("allowed", &self.allowed)
			.field("validator", &self.validator.is_some())
			.finish()
	}
}

impl SettingDefinition {
	/// Create a builder for constructing a SettingDefinition
	pub fn builder(name: impl Into<String>) -> SettingDefinitionBuilder {
		SettingDefinitionBuilder::new(name)
	}

	pub fn is_writable(&self) -> bool {
		self.writable.check()
	}

	/// Check a value about to be written and bring it into the declared format
	pub fn validate(&self, value: SettingValue) -> StResult<SettingValue> {
		let value = serializer::coerce(&self.name, value, self.format)?;

		if let Some(allowed) = &self.allowed
			&& !allowed.contains(&value)
		{
			return Err(Error::ValidationError(format!(
				"'{}' is not an allowed value for setting '{}'",
				value, self.name
			)));
		}

		if let Some(validator) = &self.validator {
			validator(&value)?;
		}

		Ok(value)
	}
}

/// Builder for SettingDefinition with fluent API
pub struct SettingDefinitionBuilder {
	name: String,
	description: String,
	default: Option<SettingValue>,
	format: Option<SettingFormat>,
	writable: Writability,
	required_feature: Option<String>,
	gated_fallback: Option<SettingValue>,
	allowed: Option<Vec<SettingValue>>,
	validator: Option<SettingValidator>,
}

impl SettingDefinitionBuilder {
	pub fn new(name: impl Into<String>) -> Self {
		Self {
			name: name.into(),
			description: String::new(),
			default: None,
			format: None,
			writable: Writability::Fixed(true),
			required_feature: None,
			gated_fallback: None,
			allowed: None,
			validator: None,
		}
	}

	pub fn description(mut self, description: impl Into<String>) -> Self {
		self.description = description.into();
		self
	}

	/// Set the default value. The format is inferred from it unless set explicitly.
	pub fn default(mut self, value: impl Into<SettingValue>) -> Self {
		self.default = Some(value.into());
		self
	}

	pub fn format(mut self, format: SettingFormat) -> Self {
		self.format = Some(format);
		self
	}

	pub fn writable(mut self, writable: bool) -> Self {
		self.writable = Writability::Fixed(writable);
		self
	}

	/// Writability decided by a predicate evaluated on every check
	pub fn writable_if<F>(mut self, f: F) -> Self
	where
		F: Fn() -> bool + Send + Sync + 'static,
	{
		self.writable = Writability::Dynamic(Arc::new(f));
		self
	}

	/// Gate the value behind a feature; `fallback` applies while it is missing
	pub fn requires_feature(
		mut self,
		tag: impl Into<String>,
		fallback: impl Into<SettingValue>,
	) -> Self {
		self.required_feature = Some(tag.into());
		self.gated_fallback = Some(fallback.into());
		self
	}

	pub fn allowed<I, V>(mut self, values: I) -> Self
	where
		I: IntoIterator<Item = V>,
		V: Into<SettingValue>,
	{
		self.allowed = Some(values.into_iter().map(Into::into).collect());
		self
	}

	/// Set a validation function
	pub fn validator<F>(mut self, f: F) -> Self
	where
		F: Fn(&SettingValue) -> StResult<()> + Send + Sync + 'static,
	{
		self.validator = Some(Arc::new(f));
		self
	}

	/// Build the SettingDefinition
	pub fn build(self) -> StResult<SettingDefinition> {
		if self.name.is_empty() {
			return Err(Error::ConfigError("Setting name is required".into()));
		}

		let format = self
			.format
			.or_else(|| self.default.as_ref().map(SettingValue::format))
			.unwrap_or(SettingFormat::String);

		let config_err = |err: Error| Error::ConfigError(format!("{}: {}", self.name, err));
		let default = self
			.default
			.map(|value| serializer::coerce(&self.name, value, format))
			.transpose()
			.map_err(config_err)?;
		let gated_fallback = self
			.gated_fallback
			.map(|value| serializer::coerce(&self.name, value, format))
			.transpose()
			.map_err(config_err)?;
		let allowed = self
			.allowed
			.map(|values| {
				values
					.into_iter()
					.map(|value| serializer::coerce(&self.name, value, format))
					.collect::<StResult<Vec<_>>>()
			})
			.transpose()
			.map_err(config_err)?;

		if let (Some(allowed), Some(default)) = (&allowed, &default)
			&& !allowed.contains(default)
		{
			return Err(Error::ConfigError(format!(
				"Default of setting '{}' is not among its allowed values",
				self.name
			)));
		}

		Ok(SettingDefinition {
			name: self.name,
			description: self.description,
			default,
			format,
			writable: self.writable,
			required_feature: self.required_feature,
			gated_fallback,
			allowed,
			validator: self.validator,
		})
	}
}


// vim: ts=4
