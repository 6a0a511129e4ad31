//! Trailing-edge debouncer for high-frequency input.
//!
//! [`Debouncer::submit`] records a value and (re)starts a quiet-period timer.
//! Only the value present when the timer expires is handed to the consumer;
//! every value submitted before it is discarded.
//!
//! # Timers
//!
//! Each submission spawns a task that sleeps for the configured delay while
//! racing a [`CancellationToken`]. A newer submission, [`Debouncer::cancel`],
//! or dropping the debouncer trips the token. Cancellation is checked first,
//! so a timer that expires in the same tick as its cancellation never emits.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;


/// Timer task for a single pending emission.
struct PendingEmission {
	cancel: CancellationToken,
	handle: JoinHandle<()>,
}

impl PendingEmission {
	fn is_live(&self) -> bool {
		!self.cancel.is_cancelled() && !self.handle.is_finished()
	}
}

/// Rate-limits a stream of values to one emission per quiet period.
///
/// Single consumer, owned by a single task.
pub struct Debouncer<T> {
	delay: Duration,
	consumer: Arc<dyn Fn(T) + Send + Sync>,
	pending: Option<PendingEmission>,
}

impl<T> fmt::Debug for Debouncer<T> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Debouncer")
			.field("delay", &self.delay)
			.field("pending", &self.pending.as_ref().is_some_and(PendingEmission::is_live))
			.finish()
	}
}

impl<T> Debouncer<T>
where
	T: Send + 'static,
{
	/// Creates a debouncer that forwards settled values to `consumer`.
	pub fn new(delay: Duration, consumer: impl Fn(T) + Send + Sync + 'static) -> Self {
		Self {
			delay,
			consumer: Arc::new(consumer),
			pending: None,
		}
	}

	/// Returns the quiet period.
	pub const fn delay(&self) -> Duration {
		self.delay
	}

	/// Records `value` and restarts the timer, discarding any pending value.
	///
	/// Must be called from within a Tokio runtime.
	pub fn submit(&mut self, value: T) {
		self.cancel();

		let cancel = CancellationToken::new();
		let token = cancel.clone();
		let consumer = Arc::clone(&self.consumer);
		let deadline = Instant::now() + self.delay;
		let handle = tokio::spawn(async move {
			tokio::select! {
				biased;
				() = token.cancelled() => {}
				() = tokio::time::sleep_until(deadline) => consumer(value),
			}
		});

		self.pending = Some(PendingEmission { cancel, handle });
	}

	/// Discards the pending value, if any, without emitting it.
	///
	/// Returns true if a scheduled emission was discarded.
	pub fn cancel(&mut self) -> bool {
		let Some(pending) = self.pending.take() else {
			return false;
		};
		let was_live = pending.is_live();
		pending.cancel.cancel();
		was_live
	}

	/// Returns true while an emission is scheduled.
	pub fn is_pending(&self) -> bool {
		self.pending.as_ref().is_some_and(PendingEmission::is_live)
	}
}

impl<T> Drop for Debouncer<T> {
	fn drop(&mut self) {
		if let Some(pending) = self.pending.take() {
			pending.cancel.cancel();
		}
	}
}
