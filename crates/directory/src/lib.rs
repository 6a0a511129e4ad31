//! HTTP collaborators for the picker.
//!
//! [`UniversityDirectory`] searches a university directory by name and
//! [`LogoService`] resolves logos by web domain. Both share one
//! [`reqwest::Client`] configured from [`DirectoryConfig`].

mod error;
mod logos;
mod universities;

use std::time::Duration;

use reqwest::Client;
use url::Url;

pub use error::DirectoryError;
pub use logos::LogoService;
pub use universities::{UniversityDirectory, UniversityRecord};

/// Default directory search endpoint.
pub const DEFAULT_SEARCH_URL: &str = "http://universities.hipolabs.com/search";

/// Default logo endpoint; the domain is appended as a path segment.
pub const DEFAULT_LOGO_URL: &str = "https://logo.clearbit.com";

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Endpoints and transport settings for the HTTP collaborators.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryConfig {
	/// Search endpoint, queried with `?name=<query>`.
	pub search_url: Url,
	/// Base URL logos are resolved under.
	pub logo_url: Url,
	/// Per-request timeout.
	pub timeout: Duration,
	/// `User-Agent` header sent with every request.
	pub user_agent: String,
}

impl Default for DirectoryConfig {
	fn default() -> Self {
		Self {
			search_url: Url::parse(DEFAULT_SEARCH_URL).expect("default search URL is valid"),
			logo_url: Url::parse(DEFAULT_LOGO_URL).expect("default logo URL is valid"),
			timeout: DEFAULT_TIMEOUT,
			user_agent: default_user_agent(),
		}
	}
}

/// Returns the `User-Agent` used when none is configured.
pub fn default_user_agent() -> String {
	format!("unipick/{}", env!("CARGO_PKG_VERSION"))
}

/// Builds the shared HTTP client.
pub fn build_client(config: &DirectoryConfig) -> Result<Client, DirectoryError> {
	Client::builder()
		.timeout(config.timeout)
		.user_agent(config.user_agent.as_str())
		.build()
		.map_err(DirectoryError::Client)
}

/// Builds both collaborators on one shared client.
pub fn connect(config: &DirectoryConfig) -> Result<(UniversityDirectory, LogoService), DirectoryError> {
	let client = build_client(config)?;
	let directory = UniversityDirectory::new(client.clone(), config.search_url.clone());
	let logos = LogoService::new(client, config.logo_url.clone())?;
	Ok((directory, logos))
}
