//! Options of the settings service
//!
//! Options have built-in defaults and can be overridden from the process
//! environment:
//!
//! | Variable | Option |
//! |---|---|
//! | `STRATA_TEST_MODE` | `test_mode` |
//! | `STRATA_DECODE_POLICY` | `decode_policy` (`strict` or `degrade`) |
//! | `STRATA_SHARED_CACHE_CAPACITY` | `shared_cache_capacity` |
//! | `STRATA_ENV_PREFIX` | `env_prefix` |

use crate::prelude::*;
use crate::settings::serializer::parse_bool;

pub const DEFAULT_ENV_PREFIX: &str = "STRATA";
const DEFAULT_SHARED_CACHE_CAPACITY: usize = 16;

/// What to do with a stored value that cannot be decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
	/// Fail the read with `DecodeError`
	#[default]
	Strict,
	/// Log a warning and use the definition default
	Degrade,
}

impl std::str::FromStr for DecodePolicy {
	type Err = Error;

	fn from_str(s: &str) -> StResult<Self> {
		match s.trim().to_ascii_lowercase().as_str() {
			"strict" => Ok(DecodePolicy::Strict),
			"degrade" => Ok(DecodePolicy::Degrade),
			_ => Err(Error::ConfigError(format!("unknown decode policy: {}", s))),
		}
	}
}

#[derive(Debug, Clone)]
pub struct SettingsOpts {
	/// Generate the fixed installation id `"test"` instead of a random one
	pub test_mode: bool,
	pub decode_policy: DecodePolicy,
	/// Number of snapshots kept by the in-memory shared cache
	pub shared_cache_capacity: usize,
	/// Prefix of the environment variables that pin setting values
	pub env_prefix: Box<str>,
}

impl Default for SettingsOpts {
	fn default() -> Self {
		Self {
			test_mode: false,
			decode_policy: DecodePolicy::Strict,
			shared_cache_capacity: DEFAULT_SHARED_CACHE_CAPACITY,
			env_prefix: DEFAULT_ENV_PREFIX.into(),
		}
	}
}

impl SettingsOpts {
	/// Defaults overridden by the process environment
	pub fn from_env() -> StResult<Self> {
		Self::from_vars(std::env::vars())
	}

	/// Defaults overridden by the given variables
	pub fn from_vars<I, K, V>(vars: I) -> StResult<Self>
	where
		I: IntoIterator<Item = (K, V)>,
		K: AsRef<str>,
		V: AsRef<str>,
	{
		let mut opts = Self::default();
		for (key, value) in vars {
			let value = value.as_ref();
			match key.as_ref() {
				"STRATA_TEST_MODE" => {
					opts.test_mode = parse_bool(value).ok_or_else(|| {
						Error::ConfigError(format!("STRATA_TEST_MODE is not a boolean: {}", value))
					})?;
				}
				"STRATA_DECODE_POLICY" => opts.decode_policy = value.parse()?,
				"STRATA_SHARED_CACHE_CAPACITY" => {
					opts.shared_cache_capacity = value.trim().parse().map_err(|_| {
						Error::ConfigError(format!(
							"STRATA_SHARED_CACHE_CAPACITY is not a number: {}",
							value
						))
					})?;
				}
				"STRATA_ENV_PREFIX" => opts.env_prefix = value.trim().into(),
				_ => {}
			}
		}
		Ok(opts)
	}

	pub fn test_mode(mut self, test_mode: bool) -> Self {
		self.test_mode = test_mode;
		self
	}

	pub fn decode_policy(mut self, decode_policy: DecodePolicy) -> Self {
		self.decode_policy = decode_policy;
		self
	}

	pub fn shared_cache_capacity(mut self, capacity: usize) -> Self {
		self.shared_cache_capacity = capacity;
		self
	}

	pub fn env_prefix(mut self, prefix: impl Into<Box<str>>) -> Self {
		self.env_prefix = prefix.into();
		self
	}
}


// vim: ts=4
