//! Error type shared by the resolver and all adapters

use std::fmt;

pub type StResult<T> = std::result::Result<T, Error>;

#[derive(Debug)]
pub enum Error {
	/// No definition is registered under this name
	UnknownSetting(String),
	/// The definition does not accept runtime writes
	NotWritable(String),
	/// A value was rejected before it reached storage
	ValidationError(String),
	/// A stored raw value could not be decoded with the declared format
	DecodeError { name: String, reason: String },
	/// Invalid options or environment overrides
	ConfigError(String),
	DbError,
}

impl Error {
	pub fn decode(name: impl Into<String>, reason: impl fmt::Display) -> Self {
		Error::DecodeError { name: name.into(), reason: reason.to_string() }
	}
}

impl fmt::Display for Error {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Error::UnknownSetting(name) => write!(f, "unknown setting: {}", name),
			Error::NotWritable(name) => write!(f, "setting is not writable: {}", name),
			Error::ValidationError(msg) => write!(f, "validation error: {}", msg),
			Error::DecodeError { name, reason } => {
				write!(f, "cannot decode stored value of '{}': {}", name, reason)
			}
			Error::ConfigError(msg) => write!(f, "configuration error: {}", msg),
			Error::DbError => write!(f, "database error"),
		}
	}
}

impl std::error::Error for Error {}


// vim: ts=4
