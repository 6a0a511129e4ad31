//! Configuration for unipick.
//!
//! Configuration is a TOML file with optional `[picker]` and `[directory]`
//! tables. Every key is optional; missing keys keep their defaults.
//!
//! ```toml
//! [picker]
//! debounce_ms = 500
//!
//! [directory]
//! search_url = "http://universities.hipolabs.com/search"
//! logo_url = "https://logo.clearbit.com"
//! timeout_secs = 10
//! user_agent = "unipick/0.1"
//! ```

mod error;

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use tracing::debug;
use unipick_directory::DirectoryConfig;
use unipick_picker::PickerConfig;
use url::Url;

pub use error::{ConfigError, Result};

/// File name looked up under the user configuration directory.
pub const CONFIG_FILE: &str = "config.toml";

/// Application directory name under the user configuration directory.
pub const APP_DIR: &str = "unipick";

/// Fully resolved configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
	/// Controller tuning.
	pub picker: PickerConfig,
	/// HTTP collaborator settings.
	pub directory: DirectoryConfig,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawConfig {
	picker: RawPicker,
	directory: RawDirectory,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawPicker {
	debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct RawDirectory {
	search_url: Option<String>,
	logo_url: Option<String>,
	timeout_secs: Option<u64>,
	user_agent: Option<String>,
}

impl Config {
	/// Parses and validates configuration from TOML text.
	pub fn from_toml(text: &str) -> Result<Self> {
		let raw: RawConfig = toml::from_str(text)?;
		let mut config = Self::default();

		if let Some(ms) = raw.picker.debounce_ms {
			config.picker.debounce = Duration::from_millis(ms);
		}

		let directory = &mut config.directory;
		if let Some(value) = raw.directory.search_url {
			directory.search_url = parse_http_url("directory.search_url", value)?;
		}
		if let Some(value) = raw.directory.logo_url {
			directory.logo_url = parse_http_url("directory.logo_url", value)?;
		}
		if let Some(secs) = raw.directory.timeout_secs {
			if secs == 0 {
				return Err(ConfigError::InvalidValue {
					key: "directory.timeout_secs",
					reason: "must be greater than zero".to_string(),
				});
			}
			directory.timeout = Duration::from_secs(secs);
		}
		if let Some(agent) = raw.directory.user_agent {
			if agent.trim().is_empty() {
				return Err(ConfigError::InvalidValue {
					key: "directory.user_agent",
					reason: "must not be empty".to_string(),
				});
			}
			directory.user_agent = agent;
		}

		Ok(config)
	}

	/// Reads and parses a configuration file.
	pub fn load(path: &Path) -> Result<Self> {
		let text = std::fs::read_to_string(path).map_err(|error| ConfigError::Io {
			path: path.to_path_buf(),
			error,
		})?;
		Self::from_toml(&text)
	}

	/// Returns `$XDG_CONFIG_HOME/unipick/config.toml` or the platform equivalent.
	pub fn default_path() -> Option<PathBuf> {
		dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
	}

	/// Resolves configuration from an explicit path or the default location.
	///
	/// An explicit path must exist. The default location is optional; when it
	/// is missing the built-in defaults are used. Returns the path that was
	/// loaded, if any.
	pub fn discover(explicit: Option<&Path>) -> Result<(Self, Option<PathBuf>)> {
		if let Some(path) = explicit {
			return Ok((Self::load(path)?, Some(path.to_path_buf())));
		}

		match Self::default_path() {
			Some(path) if path.is_file() => Ok((Self::load(&path)?, Some(path))),
			_ => {
				debug!("no configuration file found, using defaults");
				Ok((Self::default(), None))
			}
		}
	}
}

fn parse_http_url(key: &'static str, value: String) -> Result<Url> {
	let url = Url::parse(&value).map_err(|error| ConfigError::InvalidUrl {
		key,
		value: value.clone(),
		error,
	})?;
	match url.scheme() {
		"http" | "https" => Ok(url),
		_ => Err(ConfigError::UnsupportedScheme { key, value }),
	}
}
