use crate::{AssetRef, Entity, FetchError, PickerError};

/// Asynchronous request kinds tracked by the controller.
///
/// Each kind has its own sequence counter; staleness is only ever judged
/// against requests of the same kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RequestKind {
	/// Directory search populating the result list.
	Search,
	/// Asset lookup for the current selection.
	Asset,
}

impl RequestKind {
	pub(crate) const fn as_str(self) -> &'static str {
		match self {
			Self::Search => "search",
			Self::Asset => "asset",
		}
	}
}

/// A search issued by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SearchRequest {
	/// Query sent to the directory.
	pub(crate) query: String,
	/// Sequence number assigned at issue time.
	pub(crate) sequence: u64,
}

/// Read-only view of the controller's state for presentation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PickerState {
	pub(crate) entities: Vec<Entity>,
	pub(crate) selection: Option<Entity>,
	pub(crate) asset: Option<AssetRef>,
	pub(crate) loading: bool,
	pub(crate) error: Option<PickerError>,
	pub(crate) latest_search_seq: u64,
	pub(crate) latest_asset_seq: u64,
}

impl PickerState {
	/// Entities from the most recently applied search.
	pub fn entities(&self) -> &[Entity] {
		&self.entities
	}

	/// Currently selected entity.
	pub fn selection(&self) -> Option<&Entity> {
		self.selection.as_ref()
	}

	/// Asset for the current selection, once resolved.
	pub fn asset(&self) -> Option<&AssetRef> {
		self.asset.as_ref()
	}

	/// Whether the latest search is still pending.
	pub const fn loading(&self) -> bool {
		self.loading
	}

	/// Most recent error, until superseded.
	pub fn error(&self) -> Option<&PickerError> {
		self.error.as_ref()
	}

	/// Highest search sequence issued so far.
	pub const fn latest_search_seq(&self) -> u64 {
		self.latest_search_seq
	}

	/// Highest asset sequence issued so far.
	pub const fn latest_asset_seq(&self) -> u64 {
		self.latest_asset_seq
	}

	pub(crate) const fn latest_seq(&self, kind: RequestKind) -> u64 {
		match kind {
			RequestKind::Search => self.latest_search_seq,
			RequestKind::Asset => self.latest_asset_seq,
		}
	}
}

/// Events delivered to the controller's owning task.
#[derive(Debug)]
pub(crate) enum PickerEvent {
	/// The debouncer committed a query.
	QueryCommitted(String),
	/// A directory search finished.
	SearchCompleted {
		request: SearchRequest,
		result: Result<Vec<Entity>, FetchError>,
	},
	/// An asset lookup finished.
	AssetResolved {
		sequence: u64,
		lookup_key: String,
		result: Result<AssetRef, FetchError>,
	},
}
