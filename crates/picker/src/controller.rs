//! Search-and-select controller.
//!
//! [`PickerController`] owns the [`PickerState`] and is its only writer.
//!
//! # Event Flow
//!
//! Collaborator calls run on spawned tasks. Their outcomes, together with
//! committed queries from the [`Debouncer`], are sent back over an unbounded
//! channel as events and applied on the task that owns the
//! controller, one at a time. Nothing else mutates state, so no locking is
//! involved.
//!
//! # Staleness
//!
//! Every request carries the sequence number it was issued with. A response
//! is applied only if its sequence still equals the latest issued sequence
//! of its [`RequestKind`]; anything older is dropped without touching state.
//! In-flight requests are never aborted, only ignored.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

use crate::debounce::Debouncer;
use crate::spawn::spawn_request;
use crate::state::{PickerEvent, SearchRequest};
use crate::{
	AssetRef, AssetService, DirectoryService, Entity, FetchError, PickerError, PickerState, RequestKind, SelectError,
};

#[cfg(test)]
mod tests;

/// Default quiet period before a typed query is searched.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(500);

/// Controller tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PickerConfig {
	/// Quiet period applied to [`PickerController::on_query_changed`].
	pub debounce: Duration,
}

impl Default for PickerConfig {
	fn default() -> Self {
		Self { debounce: DEFAULT_DEBOUNCE }
	}
}

/// What handling an operation or event did to a request of some kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
	/// A request was issued and is in flight.
	Pending { kind: RequestKind, sequence: u64 },
	/// A response for the latest request was applied to state.
	Applied { kind: RequestKind, sequence: u64 },
	/// The latest request failed and its error was recorded.
	Failed { kind: RequestKind, sequence: u64 },
	/// A response for a superseded request was dropped.
	Discarded { kind: RequestKind, sequence: u64 },
}

impl Transition {
	/// Returns the request kind.
	pub const fn kind(&self) -> RequestKind {
		match *self {
			Self::Pending { kind, .. } | Self::Applied { kind, .. } | Self::Failed { kind, .. } | Self::Discarded { kind, .. } => kind,
		}
	}

	/// Returns the request sequence number.
	pub const fn sequence(&self) -> u64 {
		match *self {
			Self::Pending { sequence, .. }
			| Self::Applied { sequence, .. }
			| Self::Failed { sequence, .. }
			| Self::Discarded { sequence, .. } => sequence,
		}
	}
}

/// Debounced, race-safe search-and-select controller.
pub struct PickerController {
	state: PickerState,
	directory: Arc<dyn DirectoryService>,
	assets: Arc<dyn AssetService>,
	debouncer: Debouncer<String>,
	events_tx: mpsc::UnboundedSender<PickerEvent>,
	events_rx: mpsc::UnboundedReceiver<PickerEvent>,
	searches_in_flight: usize,
	assets_in_flight: usize,
}

impl fmt::Debug for PickerController {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("PickerController")
			.field("state", &self.state)
			.field("debouncer", &self.debouncer)
			.field("searches_in_flight", &self.searches_in_flight)
			.field("assets_in_flight", &self.assets_in_flight)
			.finish()
	}
}

impl PickerController {
	/// Creates a controller with empty state.
	pub fn new(directory: Arc<dyn DirectoryService>, assets: Arc<dyn AssetService>, config: PickerConfig) -> Self {
		let (events_tx, events_rx) = mpsc::unbounded_channel();
		let committed_tx = events_tx.clone();
		let debouncer = Debouncer::new(config.debounce, move |query| {
			let _ = committed_tx.send(PickerEvent::QueryCommitted(query));
		});

		Self {
			state: PickerState::default(),
			directory,
			assets,
			debouncer,
			events_tx,
			events_rx,
			searches_in_flight: 0,
			assets_in_flight: 0,
		}
	}

	/// Returns the read-only state.
	pub const fn state(&self) -> &PickerState {
		&self.state
	}

	/// Issues the initial "list everything" search with the empty query.
	pub fn initialize(&mut self) -> Transition {
		self.execute_search(String::new())
	}

	/// Feeds raw input to the debouncer.
	///
	/// The search is issued once the input has been quiet for the configured
	/// period and the committed query is taken up by [`Self::next_transition`].
	pub fn on_query_changed(&mut self, raw: impl Into<String>) {
		let raw = raw.into();
		trace!(query = %raw, "query changed");
		self.debouncer.submit(raw);
	}

	/// Issues a search immediately, superseding every earlier search.
	///
	/// Current entities stay visible until the response arrives.
	pub fn execute_search(&mut self, query: impl Into<String>) -> Transition {
		self.state.latest_search_seq += 1;
		let request = SearchRequest {
			query: query.into(),
			sequence: self.state.latest_search_seq,
		};
		let sequence = request.sequence;

		self.state.loading = true;
		self.state.error = None;
		self.searches_in_flight += 1;
		debug!(sequence, query = %request.query, "search issued");

		let directory = Arc::clone(&self.directory);
		let query = request.query.clone();
		let tx = self.events_tx.clone();
		spawn_request(
			RequestKind::Search,
			sequence,
			async move { directory.search_entities(&query).await },
			move |result| {
				let _ = tx.send(PickerEvent::SearchCompleted { request, result });
			},
		);

		Transition::Pending {
			kind: RequestKind::Search,
			sequence,
		}
	}

	/// Changes the selection and starts resolving its asset.
	///
	/// The asset is reset synchronously. Every selection change invalidates
	/// asset lookups issued for earlier selections, including a change to no
	/// selection. Returns `None` when no lookup is issued: nothing selected,
	/// or the entity has no lookup key.
	pub fn on_select(&mut self, entity: Option<Entity>) -> Option<Transition> {
		self.state.selection = entity;
		self.state.asset = None;
		self.state.latest_asset_seq += 1;
		let sequence = self.state.latest_asset_seq;

		let Some(selected) = &self.state.selection else {
			debug!(sequence, "selection cleared");
			return None;
		};
		let Some(lookup_key) = selected.lookup_key.clone() else {
			debug!(sequence, entity = %selected.display_name, "selection has no lookup key, skipping asset lookup");
			return None;
		};

		self.assets_in_flight += 1;
		debug!(sequence, entity = %selected.display_name, lookup_key = %lookup_key, "asset lookup issued");

		let assets = Arc::clone(&self.assets);
		let key = lookup_key.clone();
		let tx = self.events_tx.clone();
		spawn_request(
			RequestKind::Asset,
			sequence,
			async move { assets.fetch_asset(&key).await },
			move |result| {
				let _ = tx.send(PickerEvent::AssetResolved {
					sequence,
					lookup_key,
					result,
				});
			},
		);

		Some(Transition::Pending {
			kind: RequestKind::Asset,
			sequence,
		})
	}

	/// Selects the entity at `index` of the current result list.
	pub fn select_index(&mut self, index: usize) -> Result<Option<Transition>, SelectError> {
		let Some(entity) = self.state.entities.get(index).cloned() else {
			return Err(SelectError::OutOfRange {
				index,
				len: self.state.entities.len(),
			});
		};
		Ok(self.on_select(Some(entity)))
	}

	/// Applies a single event.
	pub(crate) fn handle_event(&mut self, event: PickerEvent) -> Transition {
		match event {
			PickerEvent::QueryCommitted(query) => self.execute_search(query),
			PickerEvent::SearchCompleted { request, result } => self.apply_search(request, result),
			PickerEvent::AssetResolved {
				sequence,
				lookup_key,
				result,
			} => self.apply_asset(sequence, lookup_key, result),
		}
	}

	/// Waits for the next event and applies it.
	///
	/// Returns `None` once the controller has been shut down and every queued
	/// event has been consumed.
	///
	/// Events only originate from the controller's own tasks; callers cannot
	/// inject responses:
	///
	/// ```compile_fail
	/// use unipick_picker::PickerEvent;
	/// ```
	pub async fn next_transition(&mut self) -> Option<Transition> {
		let event = self.events_rx.recv().await?;
		Some(self.handle_event(event))
	}

	/// Applies every event that is already queued without waiting.
	pub fn drain(&mut self) -> Vec<Transition> {
		let mut transitions = Vec::new();
		while let Ok(event) = self.events_rx.try_recv() {
			transitions.push(self.handle_event(event));
		}
		transitions
	}

	/// Applies events until nothing is pending, in flight, or queued.
	pub async fn settle(&mut self) -> Vec<Transition> {
		let mut transitions = Vec::new();
		while !self.is_idle() {
			let Some(transition) = self.next_transition().await else {
				break;
			};
			transitions.push(transition);
		}
		transitions
	}

	/// Returns true when no debounce, request, or event is outstanding.
	pub fn is_idle(&self) -> bool {
		// The debouncer sends before its task finishes, so checking it first
		// guarantees a just-emitted query is seen as queued.
		!self.debouncer.is_pending() && self.searches_in_flight == 0 && self.assets_in_flight == 0 && self.events_rx.is_empty()
	}

	/// Returns the number of requests of `kind` whose responses are outstanding.
	pub const fn in_flight(&self, kind: RequestKind) -> usize {
		match kind {
			RequestKind::Search => self.searches_in_flight,
			RequestKind::Asset => self.assets_in_flight,
		}
	}

	/// Stops accepting results.
	///
	/// Cancels the pending debounce and drops queued events; requests still in
	/// flight complete but their results are never applied.
	pub fn shutdown(&mut self) {
		if self.debouncer.cancel() {
			debug!("discarded pending query on shutdown");
		}
		self.events_rx.close();
		while self.events_rx.try_recv().is_ok() {}
		self.searches_in_flight = 0;
		self.assets_in_flight = 0;
	}

	fn apply_search(&mut self, request: SearchRequest, result: Result<Vec<Entity>, FetchError>) -> Transition {
		let kind = RequestKind::Search;
		let sequence = request.sequence;
		self.searches_in_flight = self.searches_in_flight.saturating_sub(1);

		if sequence != self.state.latest_seq(kind) {
			trace!(sequence, latest = self.state.latest_search_seq, "discarding stale search response");
			return Transition::Discarded { kind, sequence };
		}

		self.state.loading = false;
		match result {
			Ok(entities) => {
				debug!(sequence, count = entities.len(), "search applied");
				self.state.entities = entities;
				Transition::Applied { kind, sequence }
			}
			Err(cause) => {
				warn!(sequence, query = %request.query, error = %cause, "search failed");
				self.state.error = Some(PickerError::SearchFailed {
					query: request.query,
					cause,
				});
				Transition::Failed { kind, sequence }
			}
		}
	}

	fn apply_asset(&mut self, sequence: u64, lookup_key: String, result: Result<AssetRef, FetchError>) -> Transition {
		let kind = RequestKind::Asset;
		self.assets_in_flight = self.assets_in_flight.saturating_sub(1);

		if sequence != self.state.latest_seq(kind) {
			trace!(sequence, latest = self.state.latest_asset_seq, "discarding stale asset response");
			return Transition::Discarded { kind, sequence };
		}

		match result {
			Ok(asset) => {
				debug!(sequence, lookup_key = %lookup_key, absent = asset.is_absent(), "asset applied");
				self.state.asset = Some(asset);
				if self.state.error.as_ref().is_some_and(|err| err.kind() == kind) {
					self.state.error = None;
				}
				Transition::Applied { kind, sequence }
			}
			Err(cause) => {
				warn!(sequence, lookup_key = %lookup_key, error = %cause, "asset lookup failed");
				self.state.error = Some(PickerError::AssetLookupFailed { key: lookup_key, cause });
				Transition::Failed { kind, sequence }
			}
		}
	}
}
