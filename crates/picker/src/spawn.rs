use std::future::Future;

use tokio::task::JoinHandle;

use crate::{FetchError, RequestKind};

/// Spawns a collaborator call and hands its outcome to `deliver`.
///
/// The call runs on its own task so a panic inside the collaborator surfaces
/// as [`FetchError::Panicked`] instead of tearing down the delivery path.
pub(crate) fn spawn_request<F, T, D>(kind: RequestKind, sequence: u64, fut: F, deliver: D) -> JoinHandle<()>
where
	F: Future<Output = Result<T, FetchError>> + Send + 'static,
	T: Send + 'static,
	D: FnOnce(Result<T, FetchError>) + Send + 'static,
{
	tracing::trace!(request_kind = kind.as_str(), sequence, "picker.spawn_request");
	tokio::spawn(async move {
		let result = match tokio::spawn(fut).await {
			Ok(result) => result,
			Err(err) => {
				tracing::warn!(request_kind = kind.as_str(), sequence, error = %err, "collaborator task failed");
				Err(FetchError::Panicked(err.to_string()))
			}
		};
		deliver(result);
	})
}
