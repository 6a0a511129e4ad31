//! Error taxonomy for the picker.

use thiserror::Error;

use crate::RequestKind;

/// Failure reported by a collaborator capability.
///
/// Collaborators must return one of these instead of encoding failures in
/// their success values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	/// The request never produced a response (connect, timeout, TLS).
	#[error("transport error: {0}")]
	Transport(String),

	/// The service answered with a non-success status.
	#[error("status {status} from {url}")]
	Status {
		/// HTTP status code.
		status: u16,
		/// URL that produced the status.
		url: String,
	},

	/// The response body could not be decoded.
	#[error("invalid response: {0}")]
	Decode(String),

	/// The collaborator task panicked or was aborted.
	#[error("request task failed: {0}")]
	Panicked(String),
}

/// Error surfaced in [`PickerState::error`](crate::PickerState::error).
///
/// Both kinds are recoverable: the next successful request of the same kind
/// supersedes them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PickerError {
	/// The directory search for `query` failed.
	#[error("search for {query:?} failed: {cause}")]
	SearchFailed {
		/// Query that was being searched.
		query: String,
		/// Underlying collaborator failure.
		cause: FetchError,
	},

	/// The asset lookup for `key` failed.
	#[error("asset lookup for {key:?} failed: {cause}")]
	AssetLookupFailed {
		/// Lookup key that was being resolved.
		key: String,
		/// Underlying collaborator failure.
		cause: FetchError,
	},
}

impl PickerError {
	/// Returns the request kind that produced this error.
	pub const fn kind(&self) -> RequestKind {
		match self {
			Self::SearchFailed { .. } => RequestKind::Search,
			Self::AssetLookupFailed { .. } => RequestKind::Asset,
		}
	}
}

/// Errors from selecting by index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SelectError {
	/// The index does not refer to a currently listed entity.
	#[error("no entity at index {index} ({len} listed)")]
	OutOfRange {
		/// Requested index.
		index: usize,
		/// Number of entities currently listed.
		len: usize,
	},
}
