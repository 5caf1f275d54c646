//! Conversion between typed setting values and the store's raw text
//!
//! Scalars are stored as plain text, arrays and hashes as YAML documents.
//! An empty raw value is an unset value for every format except `string`,
//! where it is the empty string.

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};

use crate::prelude::*;

use super::types::{SettingFormat, SettingValue};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Parse the textual boolean spellings accepted in storage and environment
pub fn parse_bool(raw: &str) -> Option<bool> {
	match raw.trim().to_ascii_lowercase().as_str() {
		"1" | "t" | "true" | "yes" | "on" => Some(true),
		"0" | "f" | "false" | "no" | "off" => Some(false),
		_ => None,
	}
}

/// Bring a value into `format`, rejecting values that don't fit it.
///
/// Strings are accepted for symbols and integers for floats.
pub fn coerce(name: &str, value: SettingValue, format: SettingFormat) -> StResult<SettingValue> {
	match (format, value) {
		(SettingFormat::String, v @ SettingValue::String(_))
		| (SettingFormat::Boolean, v @ SettingValue::Bool(_))
		| (SettingFormat::Integer, v @ SettingValue::Int(_))
		| (SettingFormat::Float, v @ SettingValue::Float(_))
		| (SettingFormat::Array, v @ SettingValue::Array(_))
		| (SettingFormat::Hash, v @ SettingValue::Hash(_))
		| (SettingFormat::Date, v @ SettingValue::Date(_))
		| (SettingFormat::DateTime, v @ SettingValue::DateTime(_)) => Ok(v),
		#[allow(clippy::cast_precision_loss)]
		(SettingFormat::Float, SettingValue::Int(i)) => Ok(SettingValue::Float(i as f64)),
		(SettingFormat::Symbol, SettingValue::Symbol(s) | SettingValue::String(s)) => {
			if s.is_empty() || s.chars().any(char::is_whitespace) {
				Err(Error::ValidationError(format!(
					"Invalid symbol for setting '{}': {:?}",
					name, s
				)))
			} else {
				Ok(SettingValue::Symbol(s))
			}
		}
		(format, v) => Err(Error::ValidationError(format!(
			"Type mismatch for setting '{}': expected {}, got {}",
			name,
			format,
			v.type_name()
		))),
	}
}

/// Encode a value for storage
pub fn encode(name: &str, value: &SettingValue, format: SettingFormat) -> StResult<String> {
	let value = coerce(name, value.clone(), format)?;
	let raw = match value {
		SettingValue::String(s) | SettingValue::Symbol(s) => s,
		SettingValue::Bool(b) => String::from(if b { "1" } else { "0" }),
		SettingValue::Int(i) => i.to_string(),
		SettingValue::Float(x) => x.to_string(),
		SettingValue::Array(items) => to_yaml(name, &items)?,
		SettingValue::Hash(map) => to_yaml(name, &map)?,
		SettingValue::Date(d) => d.format(DATE_FORMAT).to_string(),
		SettingValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
	};
	Ok(raw)
}

/// Decode a raw stored value. `Ok(None)` means the row holds no value.
pub fn decode(name: &str, raw: &str, format: SettingFormat) -> StResult<Option<SettingValue>> {
	if format == SettingFormat::String {
		return Ok(Some(SettingValue::String(raw.to_string())));
	}

	let trimmed = raw.trim();
	if trimmed.is_empty() {
		return Ok(None);
	}

	let value = match format {
		SettingFormat::String => SettingValue::String(raw.to_string()),
		SettingFormat::Boolean => SettingValue::Bool(
			parse_bool(trimmed).ok_or_else(|| Error::decode(name, "not a boolean"))?,
		),
		SettingFormat::Integer => {
			SettingValue::Int(trimmed.parse().map_err(|e| Error::decode(name, e))?)
		}
		SettingFormat::Float => {
			SettingValue::Float(trimmed.parse().map_err(|e| Error::decode(name, e))?)
		}
		SettingFormat::Array => match from_yaml(name, raw)? {
			serde_json::Value::Null => return Ok(None),
			serde_json::Value::Array(items) => SettingValue::Array(items),
			other => return Err(Error::decode(name, format!("expected a sequence, got {}", other))),
		},
		SettingFormat::Hash => match from_yaml(name, raw)? {
			serde_json::Value::Null => return Ok(None),
			serde_json::Value::Object(map) => SettingValue::Hash(map),
			other => return Err(Error::decode(name, format!("expected a mapping, got {}", other))),
		},
		SettingFormat::Date => SettingValue::Date(
			NaiveDate::parse_from_str(trimmed, DATE_FORMAT).map_err(|e| Error::decode(name, e))?,
		),
		SettingFormat::DateTime => SettingValue::DateTime(parse_datetime(name, trimmed)?),
		SettingFormat::Symbol => SettingValue::Symbol(trimmed.to_string()),
	};

	Ok(Some(value))
}

fn parse_datetime(name: &str, raw: &str) -> StResult<DateTime<Utc>> {
	if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
		return Ok(dt.with_timezone(&Utc));
	}
	// Older rows were written without an offset and are UTC
	NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S")
		.map(|naive| naive.and_utc())
		.map_err(|e| Error::decode(name, e))
}

fn to_yaml<T: serde::Serialize>(name: &str, value: &T) -> StResult<String> {
	let body = serde_yaml::to_string(value).map_err(|e| {
		Error::ValidationError(format!("Cannot serialize setting '{}': {}", name, e))
	})?;
	Ok(format!("---\n{}", body))
}

fn from_yaml(name: &str, raw: &str) -> StResult<serde_json::Value> {
	let doc: serde_yaml::Value = serde_yaml::from_str(raw).map_err(|e| Error::decode(name, e))?;
	Ok(yaml_to_json(doc))
}

/// Convert a YAML tree into JSON, turning every mapping key into a string
fn yaml_to_json(value: serde_yaml::Value) -> serde_json::Value {
	match value {
		serde_yaml::Value::Null => serde_json::Value::Null,
		serde_yaml::Value::Bool(b) => serde_json::Value::Bool(b),
		serde_yaml::Value::Number(n) => {
			if let Some(i) = n.as_i64() {
				serde_json::Value::from(i)
			} else if let Some(u) = n.as_u64() {
				serde_json::Value::from(u)
			} else {
				n.as_f64()
					.and_then(serde_json::Number::from_f64)
					.map_or(serde_json::Value::Null, serde_json::Value::Number)
			}
		}
		serde_yaml::Value::String(s) => serde_json::Value::String(s),
		serde_yaml::Value::Sequence(items) => {
			serde_json::Value::Array(items.into_iter().map(yaml_to_json).collect())
		}
		serde_yaml::Value::Mapping(map) => serde_json::Value::Object(
			map.into_iter().map(|(k, v)| (key_to_string(k), yaml_to_json(v))).collect(),
		),
		serde_yaml::Value::Tagged(tagged) => yaml_to_json(tagged.value),
	}
}

fn key_to_string(key: serde_yaml::Value) -> String {
	match key {
		// `:git` is symbol notation written by older producers
		serde_yaml::Value::String(s) => match s.strip_prefix(':') {
			Some(rest) if !rest.is_empty() && !rest.starts_with(':') => rest.to_string(),
			_ => s,
		},
		serde_yaml::Value::Null => "null".to_string(),
		serde_yaml::Value::Bool(b) => b.to_string(),
		serde_yaml::Value::Number(n) => n.to_string(),
		serde_yaml::Value::Tagged(tagged) => key_to_string(tagged.value),
		other => serde_yaml::to_string(&other).map(|s| s.trim().to_string()).unwrap_or_default(),
	}
}


// vim: ts=4
