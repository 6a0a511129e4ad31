use async_trait::async_trait;

use crate::{AssetRef, Entity, FetchError};

/// Directory lookup used to populate the result list.
#[async_trait]
pub trait DirectoryService: Send + Sync {
	/// Returns entities matching `query`. The empty query lists everything.
	///
	/// Transport failures and non-success statuses are reported as `Err`.
	async fn search_entities(&self, query: &str) -> Result<Vec<Entity>, FetchError>;
}

/// Secondary lookup resolving an asset for a selected entity.
#[async_trait]
pub trait AssetService: Send + Sync {
	/// Resolves the asset for `lookup_key`.
	///
	/// A lookup that finds nothing returns `Ok(AssetRef::Absent)`; only a
	/// failed lookup returns `Err`.
	async fn fetch_asset(&self, lookup_key: &str) -> Result<AssetRef, FetchError>;
}
