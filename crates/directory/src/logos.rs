use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::debug;
use unipick_picker::{AssetRef, AssetService, FetchError};
use url::Url;

use crate::DirectoryError;
use crate::error::{status, transport};

/// Logo lookup by web domain.
///
/// A success status means the logo is served at the request URL, which
/// becomes the resolved locator. `404 Not Found` means the service has no
/// logo for the domain.
#[derive(Debug, Clone)]
pub struct LogoService {
	client: Client,
	base: Url,
}

impl LogoService {
	/// Creates a service resolving logos under `base`.
	pub fn new(client: Client, base: Url) -> Result<Self, DirectoryError> {
		if base.cannot_be_a_base() {
			return Err(DirectoryError::NotABase(base));
		}
		Ok(Self { client, base })
	}

	/// Returns the URL a logo for `domain` would be served at.
	pub fn logo_url(&self, domain: &str) -> Url {
		let mut url = self.base.clone();
		if let Ok(mut segments) = url.path_segments_mut() {
			segments.pop_if_empty().push(domain);
		}
		url
	}
}

#[async_trait]
impl AssetService for LogoService {
	async fn fetch_asset(&self, lookup_key: &str) -> Result<AssetRef, FetchError> {
		let url = self.logo_url(lookup_key);
		debug!(url = %url, "logo lookup");

		let response = self.client.get(url.clone()).send().await.map_err(transport)?;
		match response.status() {
			code if code.is_success() => Ok(AssetRef::Resolved(url.into())),
			StatusCode::NOT_FOUND => Ok(AssetRef::Absent),
			code => Err(status(code, &url)),
		}
	}
}
