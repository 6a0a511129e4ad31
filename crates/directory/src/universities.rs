use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use unipick_picker::{DirectoryService, Entity, FetchError};
use url::Url;

use crate::error::{status, transport};

/// A university as reported by the directory service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct UniversityRecord {
	/// Official name.
	pub name: String,
	/// Web domains, primary first.
	#[serde(default)]
	pub domains: Vec<String>,
	/// Country name.
	#[serde(default)]
	pub country: Option<String>,
	/// ISO 3166-1 alpha-2 country code.
	#[serde(default)]
	pub alpha_two_code: Option<String>,
	/// Home page URLs.
	#[serde(default)]
	pub web_pages: Vec<String>,
	/// State or province, when known.
	#[serde(default, rename = "state-province")]
	pub state_province: Option<String>,
}

impl UniversityRecord {
	/// Converts the record into a picker entity keyed by its first domain.
	pub fn into_entity(self) -> Entity {
		let lookup_key = self.domains.into_iter().next();
		let entity = Entity::new(self.name, lookup_key);
		match self.country {
			Some(country) => entity.with_country(country),
			None => entity,
		}
	}
}

/// Name search against a university directory.
#[derive(Debug, Clone)]
pub struct UniversityDirectory {
	client: Client,
	search_url: Url,
}

impl UniversityDirectory {
	/// Creates a directory querying `search_url`.
	pub fn new(client: Client, search_url: Url) -> Self {
		Self { client, search_url }
	}

	fn request_url(&self, query: &str) -> Url {
		let mut url = self.search_url.clone();
		url.query_pairs_mut().append_pair("name", query);
		url
	}
}

#[async_trait]
impl DirectoryService for UniversityDirectory {
	async fn search_entities(&self, query: &str) -> Result<Vec<Entity>, FetchError> {
		let url = self.request_url(query);
		debug!(url = %url, "directory search");

		let response = self.client.get(url.clone()).send().await.map_err(transport)?;
		if !response.status().is_success() {
			return Err(status(response.status(), &url));
		}

		let body = response.bytes().await.map_err(transport)?;
		let records: Vec<UniversityRecord> = serde_json::from_slice(&body).map_err(|e| FetchError::Decode(e.to_string()))?;
		debug!(url = %url, count = records.len(), "directory search returned");

		Ok(records.into_iter().map(UniversityRecord::into_entity).collect())
	}
}
