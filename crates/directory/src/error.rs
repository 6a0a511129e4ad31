use thiserror::Error;
use unipick_picker::FetchError;
use url::Url;

/// Errors constructing the HTTP collaborators.
#[derive(Debug, Error)]
pub enum DirectoryError {
	/// The HTTP client could not be built.
	#[error("failed to build HTTP client: {0}")]
	Client(#[source] reqwest::Error),

	/// The logo base URL cannot have path segments appended.
	#[error("logo URL cannot be used as a base: {0}")]
	NotABase(Url),
}

/// Maps a transport-level reqwest failure onto the picker taxonomy.
pub(crate) fn transport(err: reqwest::Error) -> FetchError {
	if err.is_timeout() {
		FetchError::Transport(format!("timed out: {err}"))
	} else {
		FetchError::Transport(err.to_string())
	}
}

pub(crate) fn status(status: reqwest::StatusCode, url: &Url) -> FetchError {
	FetchError::Status {
		status: status.as_u16(),
		url: url.to_string(),
	}
}
