//! Error types for configuration loading.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
	/// Error parsing TOML syntax or shape.
	#[error("TOML parse error: {0}")]
	Toml(#[from] toml::de::Error),

	/// Error reading a configuration file.
	#[error("I/O error reading {path}: {error}")]
	Io {
		/// Path to the file that failed to read.
		path: PathBuf,
		/// The underlying I/O error.
		error: std::io::Error,
	},

	/// A URL value could not be parsed.
	#[error("invalid URL for {key}: {value:?} ({error})")]
	InvalidUrl {
		/// Configuration key holding the URL.
		key: &'static str,
		/// The rejected value.
		value: String,
		/// The underlying parse error.
		error: url::ParseError,
	},

	/// A URL uses a scheme other than http or https.
	#[error("unsupported scheme for {key}: {value} (expected http or https)")]
	UnsupportedScheme {
		/// Configuration key holding the URL.
		key: &'static str,
		/// The rejected value.
		value: String,
	},

	/// A value is out of its allowed range.
	#[error("invalid value for {key}: {reason}")]
	InvalidValue {
		/// Configuration key.
		key: &'static str,
		/// Why the value was rejected.
		reason: String,
	},
}

/// Result type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;
